use foundation::math::GeoError;
use gpu::RenderError;
use scene::HotspotSetError;

use crate::config::ConfigError;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerError {
    Config(ConfigError),
    Render(RenderError),
    Geo(GeoError),
    Data(HotspotSetError),
}

impl std::fmt::Display for ViewerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewerError::Config(e) => write!(f, "{e}"),
            ViewerError::Render(e) => write!(f, "{e}"),
            ViewerError::Geo(e) => write!(f, "{e}"),
            ViewerError::Data(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::Config(e) => Some(e),
            ViewerError::Render(e) => Some(e),
            ViewerError::Geo(e) => Some(e),
            ViewerError::Data(e) => Some(e),
        }
    }
}

impl From<ConfigError> for ViewerError {
    fn from(e: ConfigError) -> Self {
        ViewerError::Config(e)
    }
}

impl From<RenderError> for ViewerError {
    fn from(e: RenderError) -> Self {
        ViewerError::Render(e)
    }
}

impl From<GeoError> for ViewerError {
    fn from(e: GeoError) -> Self {
        ViewerError::Geo(e)
    }
}

impl From<HotspotSetError> for ViewerError {
    fn from(e: HotspotSetError) -> Self {
        ViewerError::Data(e)
    }
}
