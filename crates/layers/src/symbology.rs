use scene::{HotspotCategory, Severity};
use serde::{Deserialize, Serialize};

/// Marker size class, derived from hotspot severity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeTier {
    Large,
    Medium,
    Small,
}

impl SizeTier {
    /// `high -> Large`, `medium -> Medium`, anything else `Small`.
    ///
    /// Hotspots without a severity share the `Small` tier with `low`; there is
    /// no separate smaller size for them.
    pub fn for_severity(severity: Option<Severity>) -> Self {
        match severity {
            Some(Severity::High) => SizeTier::Large,
            Some(Severity::Medium) => SizeTier::Medium,
            Some(Severity::Low) | None => SizeTier::Small,
        }
    }

    /// Billboard edge length in globe units.
    pub fn scale(self) -> f64 {
        match self {
            SizeTier::Large => 0.12,
            SizeTier::Medium => 0.09,
            SizeTier::Small => 0.07,
        }
    }

    /// Dot diameter on the flat map.
    pub fn screen_diameter_px(self) -> f64 {
        match self {
            SizeTier::Large => 24.0,
            SizeTier::Medium => 20.0,
            SizeTier::Small => 16.0,
        }
    }
}

/// `0xRRGGBB` colors.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerPalette {
    pub plastic: u32,
    pub ewaste: u32,
    pub recycling: u32,
    pub neutral: u32,
}

impl Default for MarkerPalette {
    fn default() -> Self {
        Self {
            plastic: 0xef4444,
            ewaste: 0xf59e0b,
            recycling: 0x22c55e,
            neutral: 0xffffff,
        }
    }
}

impl MarkerPalette {
    pub fn category(&self, category: HotspotCategory) -> u32 {
        match category {
            HotspotCategory::Plastic => self.plastic,
            HotspotCategory::Ewaste => self.ewaste,
            HotspotCategory::Recycling => self.recycling,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    pub visible: bool,
    /// When off, every marker uses the palette's neutral color.
    pub color_by_category: bool,
    pub palette: MarkerPalette,
    pub opacity: f32,
    /// Marker shell radius as a multiple of the globe radius.
    pub lift: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            visible: true,
            color_by_category: true,
            palette: MarkerPalette::default(),
            opacity: 0.8,
            lift: 1.02,
        }
    }
}

impl MarkerStyle {
    pub fn color_for(&self, category: HotspotCategory) -> u32 {
        if self.color_by_category {
            self.palette.category(category)
        } else {
            self.palette.neutral
        }
    }
}

pub fn rgba_from_hex(hex: u32, alpha: f32) -> [f32; 4] {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), alpha]
}

pub fn css_hex(hex: u32) -> String {
    format!("#{:06x}", hex & 0x00ff_ffff)
}
