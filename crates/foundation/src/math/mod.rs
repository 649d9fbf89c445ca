pub mod geo;
pub mod precision;
pub mod rotation;
pub mod vec;

pub use geo::*;
pub use precision::*;
pub use rotation::*;
pub use vec::*;
