pub mod fixtures;
pub mod hotspot;
pub mod picking;
pub mod selection;

pub use hotspot::*;
pub use selection::*;
