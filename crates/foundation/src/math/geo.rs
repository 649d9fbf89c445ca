use serde::{Deserialize, Serialize};

use super::Vec3;
use super::precision::round_to;

/// Mean Earth radius used for great-circle distances (kilometers).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeoError {
    InvalidCoordinate { lat: f64, lng: f64 },
    InvalidRadius(f64),
}

impl std::fmt::Display for GeoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoError::InvalidCoordinate { lat, lng } => {
                write!(f, "invalid coordinate: lat={lat} lng={lng}")
            }
            GeoError::InvalidRadius(r) => write!(f, "invalid sphere radius: {r}"),
        }
    }
}

impl std::error::Error for GeoError {}

/// Geographic coordinate in degrees.
///
/// Always within `lat ∈ [-90, 90]`, `lng ∈ [-180, 180]`; the only way to build
/// one (including deserialization) goes through [`GeoCoordinate::new`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoCoordinate", into = "RawGeoCoordinate")]
pub struct GeoCoordinate {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
struct RawGeoCoordinate {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawGeoCoordinate> for GeoCoordinate {
    type Error = GeoError;

    fn try_from(raw: RawGeoCoordinate) -> Result<Self, Self::Error> {
        GeoCoordinate::new(raw.lat, raw.lng)
    }
}

impl From<GeoCoordinate> for RawGeoCoordinate {
    fn from(c: GeoCoordinate) -> Self {
        Self {
            lat: c.lat,
            lng: c.lng,
        }
    }
}

impl GeoCoordinate {
    pub fn new(lat: f64, lng: f64) -> Result<Self, GeoError> {
        let lat_ok = lat.is_finite() && (-90.0..=90.0).contains(&lat);
        let lng_ok = lng.is_finite() && (-180.0..=180.0).contains(&lng);
        if !(lat_ok && lng_ok) {
            return Err(GeoError::InvalidCoordinate { lat, lng });
        }
        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

/// Maps a coordinate onto a sphere of `radius` centered at the origin.
///
/// Y is up (north pole at `+Y`). Latitude is measured from the pole and
/// longitude is offset by 180°, which puts lng 0 on the equator at `(r, 0, 0)`
/// and lng 90°E at `(0, 0, -r)`.
pub fn to_sphere_point(coord: GeoCoordinate, radius: f64) -> Result<Vec3, GeoError> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(GeoError::InvalidRadius(radius));
    }

    let phi = (90.0 - coord.lat).to_radians();
    let theta = (coord.lng + 180.0).to_radians();

    Ok(Vec3::new(
        -radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    ))
}

/// Unrounded great-circle distance in kilometers (haversine).
pub fn haversine_km(a: GeoCoordinate, b: GeoCoordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let s_lat = (d_lat * 0.5).sin();
    let s_lng = (d_lng * 0.5).sin();

    let h = s_lat * s_lat + a.lat.to_radians().cos() * b.lat.to_radians().cos() * s_lng * s_lng;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Great-circle distance in kilometers, rounded to one decimal place.
pub fn distance_km(a: GeoCoordinate, b: GeoCoordinate) -> f64 {
    round_to(haversine_km(a, b), 1)
}

#[cfg(test)]
mod tests {
    use super::{GeoCoordinate, GeoError, distance_km, haversine_km, to_sphere_point};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn coord(lat: f64, lng: f64) -> GeoCoordinate {
        GeoCoordinate::new(lat, lng).expect("valid coordinate")
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(matches!(
            GeoCoordinate::new(90.5, 0.0),
            Err(GeoError::InvalidCoordinate { .. })
        ));
        assert!(GeoCoordinate::new(0.0, -180.01).is_err());
        assert!(GeoCoordinate::new(f64::NAN, 0.0).is_err());
        assert!(GeoCoordinate::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn deserialization_validates() {
        let ok: GeoCoordinate = serde_json::from_str(r#"{"lat": 5.55, "lng": -0.225}"#).unwrap();
        assert_eq!(ok, coord(5.55, -0.225));

        let bad = serde_json::from_str::<GeoCoordinate>(r#"{"lat": 120.0, "lng": 0.0}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn sphere_point_has_requested_radius() {
        let radii = [0.5, 1.0, 1.02, 6371.0];
        let mut lat = -90.0;
        while lat <= 90.0 {
            let mut lng = -180.0;
            while lng <= 180.0 {
                for r in radii {
                    let p = to_sphere_point(coord(lat, lng), r).unwrap();
                    let rel = (p.length() - r).abs() / r;
                    assert!(rel <= 1e-6, "lat={lat} lng={lng} r={r} len={}", p.length());
                }
                lng += 22.5;
            }
            lat += 15.0;
        }
    }

    #[test]
    fn sphere_point_axes() {
        let north = to_sphere_point(coord(90.0, 0.0), 2.0).unwrap();
        assert_close(north.y, 2.0, 1e-12);

        let prime = to_sphere_point(coord(0.0, 0.0), 1.0).unwrap();
        assert_close(prime.x, 1.0, 1e-12);
        assert_close(prime.y, 0.0, 1e-12);
        assert_close(prime.z, 0.0, 1e-12);

        let east = to_sphere_point(coord(0.0, 90.0), 1.0).unwrap();
        assert_close(east.z, -1.0, 1e-12);
    }

    #[test]
    fn sphere_point_rejects_bad_radius() {
        let c = coord(0.0, 0.0);
        assert_eq!(to_sphere_point(c, 0.0), Err(GeoError::InvalidRadius(0.0)));
        assert!(to_sphere_point(c, -1.0).is_err());
        assert!(to_sphere_point(c, f64::INFINITY).is_err());
    }

    #[test]
    fn haversine_identity_and_symmetry() {
        let points = [
            coord(40.7128, -74.0060),
            coord(28.4, -145.6),
            coord(-33.9, 151.2),
            coord(89.9, 179.9),
            coord(-90.0, -180.0),
        ];
        for a in points {
            assert_eq!(haversine_km(a, a), 0.0);
            assert_eq!(distance_km(a, a), 0.0);
            for b in points {
                assert_eq!(haversine_km(a, b), haversine_km(b, a));
                assert_eq!(distance_km(a, b), distance_km(b, a));
            }
        }
    }

    #[test]
    fn haversine_known_distance() {
        // New York -> London, roughly 5570 km.
        let d = distance_km(coord(40.7128, -74.0060), coord(51.5074, -0.1278));
        assert!((5560.0..5580.0).contains(&d), "got {d}");
        assert_eq!(d, (d * 10.0).round() / 10.0);
    }
}
