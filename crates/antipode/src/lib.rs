pub mod dynamics;
pub mod geo;
pub mod helpers;
pub mod scene;
pub mod world;

#[cfg(test)]
mod tests;

pub use dynamics::{AnimationId, CameraState, InputEvent, MouseButton};
pub use geo::{antipode, antipode_of, sample_location, GeoPoint, SampleLocation, SAMPLE_LOCATIONS};
pub use helpers::{init_logging, VisError};
pub use scene::{HeadlessScene, MarkerKind, Primitive, SceneBackend, VisualHandle};
pub use world::{load_config, Config, JourneyPhase, Visualizer, VisualizerEvent};

/// Config from `antipode.toml` / `ANTIPODE__*`, or the defaults when none
/// can be loaded.
pub fn get_config() -> Config {
    load_config().unwrap_or_else(|e| {
        log::warn!("Falling back to default config: {}", e);
        Config::default()
    })
}
