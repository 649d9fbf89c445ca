use foundation::math::{GeoError, Rotation, Vec3, to_sphere_point};
use gpu::{MarkerInstance, PerspectiveCamera};
use scene::picking::{PickHit, PickOptions, PickTarget, pick_screen};
use scene::{CategoryFilter, Hotspot, HotspotId, HotspotSet};
use serde::Serialize;

use crate::layer::{Layer, LayerId};
use crate::symbology::{MarkerStyle, SizeTier, rgba_from_hex};

/// Renderable projection of a hotspot. Positions are in the globe-local frame.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub hotspot: HotspotId,
    pub position: Vec3,
    pub size_tier: SizeTier,
    pub color: u32,
}

impl Marker {
    pub fn scale(&self) -> f64 {
        self.size_tier.scale()
    }

    pub fn instance(&self, opacity: f32) -> MarkerInstance {
        MarkerInstance {
            position: [
                self.position.x as f32,
                self.position.y as f32,
                self.position.z as f32,
            ],
            size: self.scale() as f32,
            color: rgba_from_hex(self.color, opacity),
        }
    }

    /// Pick volume in world space for the given globe orientation.
    pub fn pick_target(&self, rotation: Rotation) -> PickTarget {
        PickTarget {
            hotspot: self.hotspot,
            center: rotation.apply(self.position),
            radius: self.scale() * 0.5,
        }
    }
}

pub fn build_marker(
    hotspot: &Hotspot,
    globe_radius: f64,
    style: &MarkerStyle,
) -> Result<Marker, GeoError> {
    Ok(Marker {
        hotspot: hotspot.id,
        position: to_sphere_point(hotspot.location, globe_radius * style.lift)?,
        size_tier: SizeTier::for_severity(hotspot.severity),
        color: style.color_for(hotspot.category),
    })
}

/// Resolves a pointer position to the marker under it.
///
/// With `occluder_radius` set, markers on the far side of the globe are not
/// pickable. Returns `None` on a miss.
pub fn hit_test(
    pointer_px: [f64; 2],
    camera: &PerspectiveCamera,
    markers: &[Marker],
    rotation: Rotation,
    occluder_radius: Option<f64>,
) -> Option<PickHit> {
    let targets: Vec<PickTarget> = markers.iter().map(|m| m.pick_target(rotation)).collect();
    let opts = PickOptions {
        occluder_radius,
        ..PickOptions::default()
    };
    pick_screen(
        &targets,
        pointer_px[0],
        pointer_px[1],
        |x, y| camera.ray_through_px(x, y),
        opts,
    )
}

/// Marker set derived from `(hotspots, filter)`.
///
/// `sync` rebuilds the whole set when either input changed and is a no-op
/// otherwise. Markers are never patched in place.
#[derive(Debug, Clone)]
pub struct MarkerLayer {
    id: LayerId,
    globe_radius: f64,
    style: MarkerStyle,
    source: Option<(HotspotSet, CategoryFilter)>,
    markers: Vec<Marker>,
    generation: u64,
}

impl MarkerLayer {
    pub fn new(id: u64, globe_radius: f64, style: MarkerStyle) -> Result<Self, GeoError> {
        let shell = globe_radius * style.lift;
        if !(shell.is_finite() && shell > 0.0) {
            return Err(GeoError::InvalidRadius(shell));
        }
        Ok(Self {
            id: LayerId(id),
            globe_radius,
            style,
            source: None,
            markers: Vec::new(),
            generation: 0,
        })
    }

    /// Returns `true` if the marker set was rebuilt.
    pub fn sync(&mut self, hotspots: &HotspotSet, filter: CategoryFilter) -> Result<bool, GeoError> {
        let unchanged = self
            .source
            .as_ref()
            .is_some_and(|(set, f)| set.same_revision(hotspots) && *f == filter);
        if unchanged {
            return Ok(false);
        }
        self.rebuild(hotspots, filter)?;
        Ok(true)
    }

    pub fn set_style(&mut self, style: MarkerStyle) -> Result<(), GeoError> {
        if style == self.style {
            return Ok(());
        }
        self.style = style;
        if let Some((set, filter)) = self.source.clone() {
            self.rebuild(&set, filter)?;
        }
        Ok(())
    }

    fn rebuild(&mut self, hotspots: &HotspotSet, filter: CategoryFilter) -> Result<(), GeoError> {
        let markers = hotspots
            .filtered(filter)
            .map(|h| build_marker(h, self.globe_radius, &self.style))
            .collect::<Result<Vec<_>, _>>()?;
        self.markers = markers;
        self.source = Some((hotspots.clone(), filter));
        self.generation += 1;
        Ok(())
    }

    pub fn style(&self) -> &MarkerStyle {
        &self.style
    }

    pub fn filter(&self) -> Option<CategoryFilter> {
        self.source.as_ref().map(|(_, f)| *f)
    }

    pub fn markers(&self) -> &[Marker] {
        if self.style.visible { &self.markers[..] } else { &[] }
    }

    pub fn instances(&self) -> Vec<MarkerInstance> {
        self.markers()
            .iter()
            .map(|m| m.instance(self.style.opacity))
            .collect()
    }

    pub fn hit_test(
        &self,
        pointer_px: [f64; 2],
        camera: &PerspectiveCamera,
        rotation: Rotation,
        occlude: bool,
    ) -> Option<HotspotId> {
        let occluder = occlude.then_some(self.globe_radius);
        hit_test(pointer_px, camera, self.markers(), rotation, occluder).map(|h| h.hotspot)
    }
}

impl Layer for MarkerLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::MarkerLayer;
    use crate::layer::Layer;
    use crate::symbology::{MarkerStyle, SizeTier};
    use foundation::math::{Rotation, Vec3};
    use gpu::PerspectiveCamera;
    use scene::fixtures::globe_hotspots;
    use scene::{CategoryFilter, HotspotId};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn layer() -> MarkerLayer {
        MarkerLayer::new(1, 1.0, MarkerStyle::default()).unwrap()
    }

    fn camera() -> PerspectiveCamera {
        let mut cam = PerspectiveCamera::new(60f64.to_radians(), 0.1, 1000.0, 2.5);
        cam.resize(800.0, 600.0);
        cam
    }

    /// Orientation that brings a globe-local point onto the `+Z` axis.
    fn facing(p: Vec3) -> Rotation {
        let h = (p.x * p.x + p.z * p.z).sqrt();
        Rotation::new((-p.x).atan2(p.z), p.y.atan2(h))
    }

    #[test]
    fn filter_selects_matching_hotspots() {
        let set = globe_hotspots().unwrap();
        let mut layer = layer();
        layer.sync(&set, CategoryFilter::Plastic).unwrap();
        let ids: Vec<HotspotId> = layer.markers().iter().map(|m| m.hotspot).collect();
        assert_eq!(ids, vec![HotspotId(1), HotspotId(3), HotspotId(6)]);

        layer.sync(&set, CategoryFilter::All).unwrap();
        assert_eq!(layer.markers().len(), 8);
    }

    #[test]
    fn markers_sit_on_lifted_shell() {
        let set = globe_hotspots().unwrap();
        let mut layer = layer();
        layer.sync(&set, CategoryFilter::All).unwrap();
        for m in layer.markers() {
            assert_close(m.position.length(), 1.02, 1e-9);
        }
        let pacific = layer.markers()[0];
        assert_eq!(pacific.size_tier, SizeTier::Large);
        assert_eq!(pacific.color, 0xef4444);
        let sf = layer.markers()[3];
        assert_eq!(sf.size_tier, SizeTier::Small);
        assert_eq!(sf.color, 0x22c55e);
    }

    #[test]
    fn sync_rebuilds_only_on_change() {
        let set = globe_hotspots().unwrap();
        let mut layer = layer();
        assert!(layer.sync(&set, CategoryFilter::All).unwrap());
        assert!(!layer.sync(&set.clone(), CategoryFilter::All).unwrap());
        assert_eq!(layer.generation(), 1);

        assert!(layer.sync(&set, CategoryFilter::Ewaste).unwrap());
        assert_eq!(layer.markers().len(), 2);

        let reloaded = globe_hotspots().unwrap();
        assert!(layer.sync(&reloaded, CategoryFilter::Ewaste).unwrap());
        assert_eq!(layer.generation(), 3);
    }

    #[test]
    fn monochrome_style_rebuilds_with_neutral_color() {
        let set = globe_hotspots().unwrap();
        let mut layer = layer();
        layer.sync(&set, CategoryFilter::All).unwrap();
        layer
            .set_style(MarkerStyle {
                color_by_category: false,
                ..MarkerStyle::default()
            })
            .unwrap();
        assert_eq!(layer.generation(), 2);
        assert!(layer.markers().iter().all(|m| m.color == 0xffffff));
    }

    #[test]
    fn hidden_layer_has_no_markers() {
        let set = globe_hotspots().unwrap();
        let mut layer = layer();
        layer.sync(&set, CategoryFilter::All).unwrap();
        layer
            .set_style(MarkerStyle {
                visible: false,
                ..MarkerStyle::default()
            })
            .unwrap();
        assert!(layer.instances().is_empty());
    }

    #[test]
    fn picking_at_projected_center_returns_marker() {
        let set = globe_hotspots().unwrap();
        let mut layer = layer();
        layer.sync(&set, CategoryFilter::All).unwrap();
        let cam = camera();

        for m in layer.markers() {
            let rotation = facing(m.position);
            let world = rotation.apply(m.position);
            let px = cam.project_to_px(world).expect("in front of camera");
            assert_eq!(layer.hit_test(px, &cam, rotation, true), Some(m.hotspot));
        }
    }

    #[test]
    fn empty_space_misses() {
        let set = globe_hotspots().unwrap();
        let mut layer = layer();
        layer.sync(&set, CategoryFilter::All).unwrap();
        assert_eq!(layer.hit_test([0.0, 0.0], &camera(), Rotation::IDENTITY, true), None);
    }

    #[test]
    fn far_side_markers_are_occluded() {
        let set = globe_hotspots().unwrap();
        let mut layer = layer();
        layer.sync(&set, CategoryFilter::Plastic).unwrap();
        let cam = camera();

        let target = layer.markers()[0];
        // Turn the marker to the far side, directly behind the globe center.
        let front = facing(target.position);
        let back = Rotation::new(front.yaw + std::f64::consts::PI, -front.pitch);
        let world = back.apply(target.position);
        assert!(world.z < -1.0);

        let center = [400.0, 300.0];
        assert_eq!(layer.hit_test(center, &cam, back, true), None);
        assert_eq!(layer.hit_test(center, &cam, back, false), Some(target.hotspot));
    }
}
