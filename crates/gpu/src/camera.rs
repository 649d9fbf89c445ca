use foundation::math::Vec3;
use scene::picking::Ray;

/// Perspective camera on the `+Z` axis looking at the globe center.
///
/// The globe rotates, the camera does not: zoom is the camera distance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_y_rad: f64,
    pub near: f64,
    pub far: f64,
    distance: f64,
    width_px: f64,
    height_px: f64,
}

impl PerspectiveCamera {
    pub fn new(fov_y_rad: f64, near: f64, far: f64, distance: f64) -> Self {
        Self {
            fov_y_rad,
            near,
            far,
            distance,
            width_px: 1.0,
            height_px: 1.0,
        }
    }

    /// Updates the surface size. Returns `true` if anything changed.
    pub fn resize(&mut self, width_px: f64, height_px: f64) -> bool {
        let w = width_px.max(1.0);
        let h = height_px.max(1.0);
        let changed = w != self.width_px || h != self.height_px;
        self.width_px = w;
        self.height_px = h;
        changed
    }

    pub fn set_distance(&mut self, distance: f64) {
        self.distance = distance;
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn size_px(&self) -> [f64; 2] {
        [self.width_px, self.height_px]
    }

    pub fn aspect(&self) -> f64 {
        self.width_px / self.height_px
    }

    pub fn eye(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.distance)
    }

    /// Pixel position (origin top-left) to normalized device coordinates.
    pub fn ndc_from_px(&self, x_px: f64, y_px: f64) -> [f64; 2] {
        [
            (x_px / self.width_px) * 2.0 - 1.0,
            -(y_px / self.height_px) * 2.0 + 1.0,
        ]
    }

    /// World-space ray from the eye through a pixel.
    pub fn ray_through_px(&self, x_px: f64, y_px: f64) -> Option<Ray> {
        if !(x_px.is_finite() && y_px.is_finite()) {
            return None;
        }
        let [nx, ny] = self.ndc_from_px(x_px, y_px);
        let t = (0.5 * self.fov_y_rad).tan();
        let dir = Vec3::new(nx * t * self.aspect(), ny * t, -1.0).normalized()?;
        Some(Ray::new(self.eye(), dir))
    }

    /// World-space point to pixel position; `None` if the point is behind the eye.
    pub fn project_to_px(&self, world: Vec3) -> Option<[f64; 2]> {
        let rel = world - self.eye();
        let depth = -rel.z;
        if depth <= 0.0 {
            return None;
        }
        let t = (0.5 * self.fov_y_rad).tan();
        let nx = rel.x / (depth * t * self.aspect());
        let ny = rel.y / (depth * t);
        Some([
            (nx + 1.0) * 0.5 * self.width_px,
            (1.0 - ny) * 0.5 * self.height_px,
        ])
    }

    /// Column-major view-projection matrix (RH, depth range [0, 1]).
    pub fn view_proj(&self) -> [[f32; 4]; 4] {
        let view = mat4_look_at_rh(
            self.eye().as_array(),
            [0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
        );
        let proj = mat4_perspective_rh_z0(self.fov_y_rad, self.aspect(), self.near, self.far);
        mat4_mul(proj, view)
    }
}

fn mat4_mul(a: [[f32; 4]; 4], b: [[f32; 4]; 4]) -> [[f32; 4]; 4] {
    // Column-major matrix multiply: c = a * b
    let mut c = [[0.0f32; 4]; 4];
    for col in 0..4 {
        for row in 0..4 {
            c[col][row] = a[0][row] * b[col][0]
                + a[1][row] * b[col][1]
                + a[2][row] * b[col][2]
                + a[3][row] * b[col][3];
        }
    }
    c
}

fn mat4_perspective_rh_z0(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> [[f32; 4]; 4] {
    let f = 1.0 / (0.5 * fov_y_rad).tan();
    let m00 = (f / aspect) as f32;
    let m11 = f as f32;
    let m22 = (far / (near - far)) as f32;
    let m23 = ((near * far) / (near - far)) as f32;

    [
        [m00, 0.0, 0.0, 0.0],
        [0.0, m11, 0.0, 0.0],
        [0.0, 0.0, m22, -1.0],
        [0.0, 0.0, m23, 0.0],
    ]
}

fn mat4_look_at_rh(eye: [f64; 3], target: [f64; 3], up: [f64; 3]) -> [[f32; 4]; 4] {
    let to_vec = |a: [f64; 3]| Vec3::new(a[0], a[1], a[2]);
    let eye_v = to_vec(eye);
    let f = (to_vec(target) - eye_v).normalized().unwrap_or(Vec3::new(0.0, 0.0, -1.0));
    let s = f.cross(to_vec(up)).normalized().unwrap_or(Vec3::new(1.0, 0.0, 0.0));
    let u = s.cross(f);

    let ex = -s.dot(eye_v);
    let ey = -u.dot(eye_v);
    let ez = f.dot(eye_v);

    [
        [s.x as f32, u.x as f32, (-f.x) as f32, 0.0],
        [s.y as f32, u.y as f32, (-f.y) as f32, 0.0],
        [s.z as f32, u.z as f32, (-f.z) as f32, 0.0],
        [ex as f32, ey as f32, ez as f32, 1.0],
    ]
}
