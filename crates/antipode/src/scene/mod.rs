pub mod backend;
pub use backend::*;

pub mod headless;
pub use headless::*;

pub mod instance;
pub use instance::*;

pub mod markers;
pub use markers::*;
