use std::env;
use std::time::Duration;

use gpu::mesh::MAX_SPHERE_SEGMENTS;
use layers::{MarkerPalette, MarkerStyle};
use serde::{Deserialize, Serialize};

use crate::geolocation::PositionOptions;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),
    Invalid { field: &'static str, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "config parse error: {msg}"),
            ConfigError::Invalid { field, reason } => write!(f, "invalid {field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_y_deg: f64,
    pub near: f64,
    pub far: f64,
    /// Camera distance from the globe center.
    pub default_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom button increment.
    pub zoom_step: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 60.0,
            near: 0.1,
            far: 1000.0,
            default_zoom: 2.5,
            min_zoom: 1.5,
            max_zoom: 5.0,
            zoom_step: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Radians of yaw per horizontal pixel dragged.
    pub yaw_per_px: f64,
    /// Radians of pitch per vertical pixel dragged.
    pub pitch_per_px: f64,
    /// Zoom change per wheel delta unit.
    pub zoom_per_wheel: f64,
    /// Pointer travel above which a press counts as a drag rather than a click.
    pub drag_threshold_px: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            yaw_per_px: 0.005,
            pitch_per_px: 0.005,
            zoom_per_wheel: 0.001,
            drag_threshold_px: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub radius: f64,
    pub segments: u32,
    pub texture: Option<String>,
    pub auto_rotate_rad_per_s: f64,
    /// Markers on the far side of the globe cannot be picked.
    pub occlude_far_side: bool,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            segments: 64,
            texture: Some("/earth-texture.jpg".to_string()),
            auto_rotate_rad_per_s: 0.06,
            occlude_far_side: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyleConfig {
    pub color_by_category: bool,
    pub opacity: f32,
    pub lift: f64,
    pub palette: MarkerPalette,
}

impl Default for MarkerStyleConfig {
    fn default() -> Self {
        let style = MarkerStyle::default();
        Self {
            color_by_category: style.color_by_category,
            opacity: style.opacity,
            lift: style.lift,
            palette: style.palette,
        }
    }
}

impl MarkerStyleConfig {
    pub fn style(&self) -> MarkerStyle {
        MarkerStyle {
            visible: true,
            color_by_category: self.color_by_category,
            palette: self.palette,
            opacity: self.opacity,
            lift: self.lift,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub high_accuracy: bool,
    pub timeout_ms: u64,
    pub maximum_age_ms: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: 5_000,
            maximum_age_ms: 60_000,
        }
    }
}

impl LocationConfig {
    pub fn position_options(&self) -> PositionOptions {
        PositionOptions {
            high_accuracy: self.high_accuracy,
            timeout: Duration::from_millis(self.timeout_ms),
            maximum_age: Duration::from_millis(self.maximum_age_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionsConfig {
    pub base_url: String,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.google.com/maps/dir/?api=1".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlatMapConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
}

impl Default for FlatMapConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.5,
            max_zoom: 2.5,
            zoom_step: 0.2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub camera: CameraConfig,
    pub interaction: InteractionConfig,
    pub globe: GlobeConfig,
    pub markers: MarkerStyleConfig,
    pub location: LocationConfig,
    pub directions: DirectionsConfig,
    pub flat_map: FlatMapConfig,
}

impl ViewerConfig {
    /// Missing fields take their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults overridden by `GLOBE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        cfg.apply_env(|key| env::var(key).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let c = &mut self.camera;
        c.fov_y_deg = env_var_f64(&lookup, "GLOBE_FOV_DEG", c.fov_y_deg);
        c.default_zoom = env_var_f64(&lookup, "GLOBE_ZOOM", c.default_zoom);
        c.min_zoom = env_var_f64(&lookup, "GLOBE_MIN_ZOOM", c.min_zoom);
        c.max_zoom = env_var_f64(&lookup, "GLOBE_MAX_ZOOM", c.max_zoom);
        c.zoom_step = env_var_f64(&lookup, "GLOBE_ZOOM_STEP", c.zoom_step);

        let i = &mut self.interaction;
        let drag = env_var_f64(&lookup, "GLOBE_DRAG_SENSITIVITY", i.yaw_per_px);
        i.yaw_per_px = drag;
        i.pitch_per_px = env_var_f64(&lookup, "GLOBE_PITCH_SENSITIVITY", drag);
        i.zoom_per_wheel = env_var_f64(&lookup, "GLOBE_WHEEL_SENSITIVITY", i.zoom_per_wheel);
        i.drag_threshold_px = env_var_f64(&lookup, "GLOBE_DRAG_THRESHOLD_PX", i.drag_threshold_px);

        let g = &mut self.globe;
        g.auto_rotate_rad_per_s = env_var_f64(&lookup, "GLOBE_AUTO_ROTATE", g.auto_rotate_rad_per_s);
        g.segments = env_var_u32(&lookup, "GLOBE_SEGMENTS", g.segments);
        if let Some(texture) = lookup("GLOBE_TEXTURE") {
            g.texture = (!texture.is_empty()).then_some(texture);
        }

        self.markers.color_by_category =
            env_var_bool(&lookup, "GLOBE_COLOR_BY_CATEGORY", self.markers.color_by_category);

        let l = &mut self.location;
        l.timeout_ms = env_var_u64(&lookup, "GLOBE_LOCATION_TIMEOUT_MS", l.timeout_ms);
        l.maximum_age_ms = env_var_u64(&lookup, "GLOBE_LOCATION_MAX_AGE_MS", l.maximum_age_ms);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.camera;
        check(c.fov_y_deg > 0.0 && c.fov_y_deg < 180.0, "camera.fov_y_deg", "must be in (0, 180)")?;
        check(c.near > 0.0 && c.far > c.near, "camera.near/far", "need 0 < near < far")?;
        check(
            c.min_zoom > 0.0 && c.min_zoom <= c.max_zoom,
            "camera.min_zoom/max_zoom",
            "need 0 < min <= max",
        )?;
        check(
            (c.min_zoom..=c.max_zoom).contains(&c.default_zoom),
            "camera.default_zoom",
            "must lie within the zoom bounds",
        )?;
        check(c.zoom_step > 0.0, "camera.zoom_step", "must be positive")?;

        let i = &self.interaction;
        check(
            i.drag_threshold_px.is_finite() && i.drag_threshold_px >= 0.0,
            "interaction.drag_threshold_px",
            "must be non-negative",
        )?;
        check(
            i.yaw_per_px.is_finite() && i.pitch_per_px.is_finite() && i.zoom_per_wheel.is_finite(),
            "interaction",
            "sensitivities must be finite",
        )?;

        let g = &self.globe;
        check(g.radius.is_finite() && g.radius > 0.0, "globe.radius", "must be positive")?;
        check(
            (3..=MAX_SPHERE_SEGMENTS).contains(&g.segments),
            "globe.segments",
            "must be in [3, 1024]",
        )?;
        check(
            g.auto_rotate_rad_per_s.is_finite(),
            "globe.auto_rotate_rad_per_s",
            "must be finite",
        )?;

        let m = &self.markers;
        check(m.lift >= 1.0, "markers.lift", "markers must not sink into the globe")?;
        check((0.0..=1.0).contains(&m.opacity), "markers.opacity", "must be in [0, 1]")?;

        check(self.location.timeout_ms > 0, "location.timeout_ms", "must be positive")?;

        let f = &self.flat_map;
        check(
            f.min_zoom > 0.0 && f.min_zoom <= f.max_zoom,
            "flat_map.min_zoom/max_zoom",
            "need 0 < min <= max",
        )?;
        check(f.zoom_step > 0.0, "flat_map.zoom_step", "must be positive")?;
        Ok(())
    }
}

fn check(ok: bool, field: &'static str, reason: &str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: reason.to_string(),
        })
    }
}

fn env_var_f64(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: f64) -> f64 {
    lookup(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_var_u32(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u32) -> u32 {
    lookup(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_var_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    lookup(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_var_bool(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    match lookup(key).as_deref().map(str::trim) {
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        _ => default,
    }
}
