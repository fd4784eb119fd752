#[cfg(not(target_arch = "wasm32"))]
pub use std::time::{Duration, Instant};
#[cfg(target_arch = "wasm32")]
pub use web_time::{Duration, Instant};

/// Info returned each frame.
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    /// Unclamped delta between this frame and the previous one.
    pub raw_dt: Duration,
    /// Delta after clamping; this is what animations advance by.
    pub dt: Duration,
    /// Smoothed FPS (EMA).
    pub fps: f32,
    /// Incrementing frame index (starts at 1 on first tick).
    pub frame: u64,
}

/// Turns host frame callbacks into clamped animation deltas.
///
/// Every animation in the crate advances by `Tick::dt`, so a stalled tab
/// resumes where it left off instead of jumping to the end of a journey.
#[derive(Debug)]
pub struct FrameClock {
    last: Option<Duration>,
    frame: u64,
    ema_fps: f64,
    clamp_dt: Duration,
    fps_ema_alpha: f64,
    origin: Instant,
}

impl FrameClock {
    /// - `clamp_dt` e.g. 100ms keeps journeys stable after long stalls.
    /// - `fps_ema_alpha` e.g. 0.2 is a reasonable default.
    pub fn new(clamp_dt: Duration, fps_ema_alpha: f64) -> Self {
        Self {
            last: None,
            frame: 0,
            ema_fps: 60.0,
            clamp_dt,
            fps_ema_alpha: fps_ema_alpha.clamp(0.0, 1.0),
            origin: Instant::now(),
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
        self.frame = 0;
        self.ema_fps = 60.0;
    }

    /// Advance using the monotonic clock.
    pub fn tick(&mut self) -> Tick {
        let now = Instant::now().saturating_duration_since(self.origin);
        self.tick_at(now)
    }

    /// Advance to an externally supplied timestamp, e.g. the `DOMHighResTimeStamp`
    /// handed to `requestAnimationFrame`. The first call yields a zero delta.
    pub fn tick_at(&mut self, now: Duration) -> Tick {
        let raw_dt = match self.last {
            Some(last) => now.saturating_sub(last),
            None => Duration::ZERO,
        };
        self.last = Some(now);

        let dt = raw_dt.min(self.clamp_dt);
        self.frame = self.frame.saturating_add(1);

        if raw_dt > Duration::ZERO {
            let inst_fps = 1.0 / raw_dt.as_secs_f64();
            self.ema_fps =
                self.fps_ema_alpha * inst_fps + (1.0 - self.fps_ema_alpha) * self.ema_fps;
        }

        Tick {
            raw_dt,
            dt,
            fps: self.ema_fps as f32,
            frame: self.frame,
        }
    }
}

impl Default for FrameClock {
    /// 100ms clamp and 0.2 EMA.
    fn default() -> Self {
        Self::new(Duration::from_millis(100), 0.2)
    }
}
