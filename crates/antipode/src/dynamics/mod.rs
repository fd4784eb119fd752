pub mod camera;
pub use camera::*;

pub mod orbit;
pub use orbit::*;

pub mod picking;
pub use picking::*;

pub mod input_manager;
pub use input_manager::*;
