use crate::helpers::VisError;
use crate::world::Config;

/// Layers `antipode.toml`, `antipode.local.toml` and `ANTIPODE__*` environment
/// variables (e.g. `ANTIPODE__EARTH_RADIUS=50`) over the defaults.
pub fn load_config() -> Result<Config, VisError> {
    let _ = dotenvy::dotenv();

    let builder = config::Config::builder()
        .add_source(config::File::with_name("antipode").required(false))
        .add_source(config::File::with_name("antipode.local").required(false))
        .add_source(
            config::Environment::with_prefix("ANTIPODE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

    let cfg = builder.build()?;
    let cfg: Config = cfg.try_deserialize()?;
    cfg.validate()?;

    log::info!("Config loaded successfully {:?}", cfg);
    Ok(cfg)
}
