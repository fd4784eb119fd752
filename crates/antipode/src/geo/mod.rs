pub mod projection;
pub use projection::*;

pub mod antipode;
pub use antipode::*;

pub mod path;
pub use path::*;

pub mod samples;
pub use samples::*;
