pub mod errors;
pub use errors::*;

pub mod easing;
pub use easing::*;

pub mod logging;
pub use logging::*;

pub mod frame_clock;
pub use frame_clock::*;

pub mod channel;
