use foundation::math::GeoCoordinate;
use foundation::math::precision::stable_total_cmp_f64;
use layers::{MarkerStyle, SizeTier};
use scene::{CategoryFilter, HotspotId, HotspotSet, SelectionChange, SelectionState};

use crate::config::{FlatMapConfig, ViewerConfig};
use crate::interaction::{Effect, InteractionController, PointerEvent};

/// Equirectangular placement as fractions of the map extent, origin top-left.
pub fn equirect_fraction(coord: GeoCoordinate) -> [f64; 2] {
    [(coord.lng() + 180.0) / 360.0, (90.0 - coord.lat()) / 180.0]
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FlatMarker {
    pub hotspot: HotspotId,
    pub location: GeoCoordinate,
    pub size_tier: SizeTier,
    pub color: u32,
}

/// 2D map alternative to the globe, sharing the same gesture handling.
///
/// Dragging pans in longitude (wrapping), the wheel scales the map.
#[derive(Debug, Clone)]
pub struct FlatMapView {
    config: FlatMapConfig,
    style: MarkerStyle,
    controller: InteractionController,
    selection: SelectionState,
    markers: Vec<FlatMarker>,
    width_px: f64,
    height_px: f64,
    zoom: f64,
    lng_offset_deg: f64,
}

impl FlatMapView {
    pub fn new(config: &ViewerConfig, width_px: f64, height_px: f64) -> Self {
        Self {
            config: config.flat_map.clone(),
            style: config.markers.style(),
            controller: InteractionController::new(config.interaction.clone()),
            selection: SelectionState::new(),
            markers: Vec::new(),
            width_px: width_px.max(1.0),
            height_px: height_px.max(1.0),
            zoom: 1.0_f64.clamp(config.flat_map.min_zoom, config.flat_map.max_zoom),
            lng_offset_deg: 0.0,
        }
    }

    pub fn set_hotspots(&mut self, hotspots: &HotspotSet, filter: CategoryFilter) {
        self.markers = hotspots
            .filtered(filter)
            .map(|h| FlatMarker {
                hotspot: h.id,
                location: h.location,
                size_tier: SizeTier::for_severity(h.severity),
                color: self.style.color_for(h.category),
            })
            .collect();
    }

    pub fn markers(&self) -> &[FlatMarker] {
        &self.markers
    }

    pub fn resize(&mut self, width_px: f64, height_px: f64) {
        self.width_px = width_px.max(1.0);
        self.height_px = height_px.max(1.0);
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        if !zoom.is_nan() {
            self.zoom = zoom.clamp(self.config.min_zoom, self.config.max_zoom);
        }
        self.zoom
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.set_zoom(self.zoom + self.config.zoom_step)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.set_zoom(self.zoom - self.config.zoom_step)
    }

    pub fn lng_offset_deg(&self) -> f64 {
        self.lng_offset_deg
    }

    pub fn reset_view(&mut self) {
        self.zoom = 1.0_f64.clamp(self.config.min_zoom, self.config.max_zoom);
        self.lng_offset_deg = 0.0;
    }

    /// Same contract as the globe: returns `true` when the event is consumed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        let t = self.controller.handle(event);
        match t.effect {
            Effect::None => {}
            // Yaw in radians maps to longitude in degrees; vertical drag is ignored.
            Effect::Rotate { d_yaw, .. } => {
                self.lng_offset_deg = (self.lng_offset_deg + d_yaw.to_degrees()).rem_euclid(360.0);
            }
            Effect::Zoom { delta } => {
                self.set_zoom(self.zoom - delta);
            }
            Effect::HitTest { x, y } => {
                self.click(x, y);
            }
        }
        t.consume
    }

    pub fn screen_position(&self, coord: GeoCoordinate) -> [f64; 2] {
        let [u, v] = equirect_fraction(coord);
        let u = (u + self.lng_offset_deg / 360.0).rem_euclid(1.0);
        [
            self.width_px * 0.5 + (u - 0.5) * self.width_px * self.zoom,
            self.height_px * 0.5 + (v - 0.5) * self.height_px * self.zoom,
        ]
    }

    /// Nearest marker dot containing the pointer; ties go to the lower id.
    pub fn hit_test(&self, x_px: f64, y_px: f64) -> Option<HotspotId> {
        let mut best: Option<(f64, HotspotId)> = None;
        for m in &self.markers {
            let [mx, my] = self.screen_position(m.location);
            let d = ((mx - x_px).powi(2) + (my - y_px).powi(2)).sqrt();
            if d > m.size_tier.screen_diameter_px() * 0.5 {
                continue;
            }
            let closer = best.is_none_or(|(bd, bid)| {
                stable_total_cmp_f64(d, bd)
                    .then_with(|| m.hotspot.cmp(&bid))
                    .is_lt()
            });
            if closer {
                best = Some((d, m.hotspot));
            }
        }
        best.map(|(_, id)| id)
    }

    pub fn click(&mut self, x_px: f64, y_px: f64) -> SelectionChange {
        let hit = self.hit_test(x_px, y_px);
        self.selection.apply_pick(hit)
    }

    pub fn selected(&self) -> Option<HotspotId> {
        self.selection.selected()
    }

    pub fn clear_selection(&mut self) -> Option<HotspotId> {
        self.selection.clear()
    }
}
