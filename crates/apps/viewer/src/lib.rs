pub mod config;
pub mod error;
pub mod flat_map;
pub mod geolocation;
pub mod globe;
pub mod interaction;
pub mod nearby;
pub mod panel;
pub mod viewport;

pub use config::ViewerConfig;
pub use error::ViewerError;
pub use globe::{GlobeEvent, GlobeView};
pub use viewport::Viewport;
