/// Installs a `tracing` fmt subscriber once. Honors `RUST_LOG`-style levels via
/// `ANTIPODE_LOG` (`error`..`trace`), defaulting to `info`.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    use std::sync::Once;
    use tracing::Level;

    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let level = std::env::var("ANTIPODE_LOG")
            .ok()
            .and_then(|v| v.parse::<Level>().ok())
            .unwrap_or(Level::INFO);

        let result = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .try_init();

        if result.is_err() {
            // Someone else already installed a global subscriber; keep theirs.
            log::debug!("tracing subscriber already set");
        }
    });
}

/// On the web the binding installs `console_log`; `tracing` forwards to it via the `log` bridge.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {}
