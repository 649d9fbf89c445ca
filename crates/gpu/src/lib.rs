pub mod camera;
pub mod instance;
pub mod mesh;
pub mod renderer;

pub use camera::*;
pub use instance::*;
pub use renderer::*;
