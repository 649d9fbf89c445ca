use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct GlobeVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SphereMesh {
    pub vertices: Vec<GlobeVertex>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Upper bound accepted by configuration for globe tessellation.
pub const MAX_SPHERE_SEGMENTS: u32 = 1024;

/// UV sphere with `segments` rings and `segments` slices.
///
/// Texture `u` runs west to east, `v` from the north pole down, matching an
/// equirectangular earth texture. Returns `None` when the vertex count does not
/// fit the `u32` index format.
pub fn generate_sphere_mesh(radius: f32, segments: u32) -> Option<SphereMesh> {
    let lat_segments = segments.max(3);
    let lon_segments = segments.max(3);

    let rings = lat_segments as usize;
    let slices = lon_segments as usize;
    let vertex_count = (rings + 1).checked_mul(slices + 1)?;
    if vertex_count > u32::MAX as usize {
        return None;
    }
    let index_count = rings.checked_mul(slices)?.checked_mul(6)?;

    let mut vertices = Vec::with_capacity(vertex_count);
    for lat in 0..=lat_segments {
        let v = lat as f32 / lat_segments as f32;
        let theta = v * std::f32::consts::PI;
        let sin_t = theta.sin();
        let cos_t = theta.cos();

        for lon in 0..=lon_segments {
            let u = lon as f32 / lon_segments as f32;
            let phi = u * std::f32::consts::TAU;
            let sin_p = phi.sin();
            let cos_p = phi.cos();

            // Same handedness as the marker transform: u=0.5 (lng 0) faces +X.
            let x = -sin_t * cos_p;
            let y = cos_t;
            let z = sin_t * sin_p;
            vertices.push(GlobeVertex {
                position: [x * radius, y * radius, z * radius],
                normal: [x, y, z],
                uv: [u, v],
            });
        }
    }

    let stride = lon_segments + 1;
    let mut indices = Vec::with_capacity(index_count);
    for lat in 0..lat_segments {
        for lon in 0..lon_segments {
            let i0 = lat * stride + lon;
            let i1 = i0 + 1;
            let i2 = i0 + stride;
            let i3 = i2 + 1;

            indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
        }
    }

    Some(SphereMesh { vertices, indices })
}
