pub mod math;

// Foundation crate: small, well-tested primitives only.
pub use math::{GeoCoordinate, GeoError, Rotation, Vec2, Vec3};
