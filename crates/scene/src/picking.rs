use foundation::math::Vec3;
use foundation::math::precision::stable_total_cmp_f64;

use crate::hotspot::HotspotId;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir.scale(t)
    }
}

/// A pickable marker in world space.
///
/// Markers are camera-facing billboards, so their pick volume is the sphere
/// that circumscribes the quad: centered on the marker, radius half its size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickTarget {
    pub hotspot: HotspotId,
    pub center: Vec3,
    pub radius: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub hotspot: HotspotId,
    /// Ray parameter of the entry point (the ray direction is normalized).
    pub distance: f64,
    pub point: Vec3,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    pub max_distance: f64,
    /// Opaque sphere centered at the origin (the globe). Markers behind it are
    /// not pickable.
    pub occluder_radius: Option<f64>,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            max_distance: 1.0e30,
            occluder_radius: None,
        }
    }
}

/// Deterministic ray picking for markers.
///
/// Ordering contract:
/// - The closest hit along the (normalized) ray wins.
/// - If multiple markers are hit at the same distance, the lower `HotspotId` wins.
pub fn pick_ray(targets: &[PickTarget], ray: Ray, opts: PickOptions) -> Option<PickHit> {
    let dir = ray.dir.normalized()?;
    let ray = Ray::new(ray.origin, dir);

    let occluder_t = opts
        .occluder_radius
        .and_then(|r| ray_sphere_entry_t(ray, Vec3::ZERO, r, opts.max_distance));

    let mut best: Option<(f64, HotspotId)> = None;

    for target in targets {
        let Some(t) = ray_sphere_entry_t(ray, target.center, target.radius, opts.max_distance)
        else {
            continue;
        };
        if occluder_t.is_some_and(|ot| ot < t) {
            continue;
        }

        best = match best {
            None => Some((t, target.hotspot)),
            Some((bt, bid)) => {
                let ord = stable_total_cmp_f64(t, bt).then_with(|| target.hotspot.cmp(&bid));
                if ord.is_lt() {
                    Some((t, target.hotspot))
                } else {
                    Some((bt, bid))
                }
            }
        };
    }

    let (t, hotspot) = best?;
    Some(PickHit {
        hotspot,
        distance: t,
        point: ray.at(t),
    })
}

/// Screen picking wrapper.
///
/// The caller supplies a deterministic screen->ray mapping via `make_ray`
/// (usually the camera's unprojection).
pub fn pick_screen<F>(
    targets: &[PickTarget],
    x_px: f64,
    y_px: f64,
    mut make_ray: F,
    opts: PickOptions,
) -> Option<PickHit>
where
    F: FnMut(f64, f64) -> Option<Ray>,
{
    let ray = make_ray(x_px, y_px)?;
    pick_ray(targets, ray, opts)
}

/// Entry distance of a normalized ray into a sphere, if it hits within `[0, t_max]`.
///
/// A ray starting inside the sphere hits at `t = 0`.
fn ray_sphere_entry_t(ray: Ray, center: Vec3, radius: f64, t_max: f64) -> Option<f64> {
    if radius <= 0.0 {
        return None;
    }
    let oc = ray.origin - center;
    let b = oc.dot(ray.dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let s = disc.sqrt();
    let t_exit = -b + s;
    if t_exit < 0.0 {
        return None;
    }
    let t = (-b - s).max(0.0);
    (t <= t_max).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::{PickOptions, PickTarget, Ray, pick_ray, pick_screen};
    use crate::hotspot::HotspotId;
    use foundation::math::Vec3;

    fn target(id: u64, center: Vec3, radius: f64) -> PickTarget {
        PickTarget {
            hotspot: HotspotId(id),
            center,
            radius,
        }
    }

    fn down_x() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0))
    }

    #[test]
    fn ray_picks_nearest_hit() {
        let targets = [
            target(1, Vec3::new(10.0, 0.0, 0.0), 1.0),
            target(2, Vec3::new(5.0, 0.0, 0.0), 1.0),
        ];
        let hit = pick_ray(&targets, down_x(), PickOptions::default()).expect("hit");
        assert_eq!(hit.hotspot, HotspotId(2));
        assert!((hit.distance - 4.0).abs() < 1e-12);
        assert!((hit.point.x - 4.0).abs() < 1e-12);
    }

    #[test]
    fn tie_breaks_by_hotspot_id() {
        let targets = [
            target(7, Vec3::new(5.0, 0.0, 0.0), 1.0),
            target(3, Vec3::new(5.0, 0.0, 0.0), 1.0),
        ];
        let hit = pick_ray(&targets, down_x(), PickOptions::default()).expect("hit");
        assert_eq!(hit.hotspot, HotspotId(3));
    }

    #[test]
    fn miss_returns_none() {
        let targets = [target(1, Vec3::new(5.0, 3.0, 0.0), 1.0)];
        assert_eq!(pick_ray(&targets, down_x(), PickOptions::default()), None);

        let behind = [target(1, Vec3::new(-5.0, 0.0, 0.0), 1.0)];
        assert_eq!(pick_ray(&behind, down_x(), PickOptions::default()), None);
    }

    #[test]
    fn occluder_hides_markers_behind_globe() {
        let origin = Vec3::new(0.0, 0.0, 3.0);
        let ray = Ray::new(origin, Vec3::new(0.0, 0.0, -1.0));
        let back = [target(1, Vec3::new(0.0, 0.0, -1.02), 0.05)];
        let front = [target(2, Vec3::new(0.0, 0.0, 1.02), 0.05)];
        let opts = PickOptions {
            occluder_radius: Some(1.0),
            ..PickOptions::default()
        };

        assert_eq!(pick_ray(&back, ray, opts), None);
        assert_eq!(pick_ray(&front, ray, opts).map(|h| h.hotspot), Some(HotspotId(2)));
        // Without occlusion the back marker is reachable.
        assert!(pick_ray(&back, ray, PickOptions::default()).is_some());
    }

    #[test]
    fn zero_direction_is_rejected() {
        let targets = [target(1, Vec3::ZERO, 1.0)];
        let ray = Ray::new(Vec3::ZERO, Vec3::ZERO);
        assert_eq!(pick_ray(&targets, ray, PickOptions::default()), None);
    }

    #[test]
    fn screen_wrapper_uses_supplied_ray() {
        let targets = [target(1, Vec3::new(5.0, 0.0, 0.0), 1.0)];
        let hit = pick_screen(
            &targets,
            10.0,
            20.0,
            |x, y| {
                assert_eq!((x, y), (10.0, 20.0));
                Some(down_x())
            },
            PickOptions::default(),
        );
        assert_eq!(hit.map(|h| h.hotspot), Some(HotspotId(1)));
        assert_eq!(
            pick_screen(&targets, 0.0, 0.0, |_, _| None, PickOptions::default()),
            None
        );
    }
}
