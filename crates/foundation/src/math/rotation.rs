use serde::{Deserialize, Serialize};

use super::Vec3;

/// Globe orientation as Euler angles (radians).
///
/// Applied as yaw about `+Y` first, then pitch about `+X`:
/// `world = Rx(pitch) * Ry(yaw) * local`.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotation {
    pub yaw: f64,
    pub pitch: f64,
}

impl Rotation {
    pub const IDENTITY: Self = Self::new(0.0, 0.0);

    pub const fn new(yaw: f64, pitch: f64) -> Self {
        Self { yaw, pitch }
    }

    /// Rotates a globe-local point into world space.
    pub fn apply(self, v: Vec3) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();

        let x = v.x * cy + v.z * sy;
        let z = -v.x * sy + v.z * cy;

        Vec3::new(x, v.y * cp - z * sp, v.y * sp + z * cp)
    }

    /// Rotates a world-space vector back into the globe-local frame.
    pub fn apply_inverse(self, v: Vec3) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();

        let y = v.y * cp + v.z * sp;
        let z = -v.y * sp + v.z * cp;

        Vec3::new(v.x * cy - z * sy, y, v.x * sy + z * cy)
    }
}
