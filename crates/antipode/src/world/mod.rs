mod config;
pub use config::*;
mod config_loader;
pub use config_loader::load_config;
mod events;
pub use events::*;
mod journey;
pub use journey::*;
mod visualizer;
pub use visualizer::*;
