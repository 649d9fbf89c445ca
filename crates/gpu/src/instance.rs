use bytemuck::{Pod, Zeroable};

/// Per-marker GPU instance: globe-local position, billboard size, RGBA color.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MarkerInstance {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 4],
}

/// Raw bytes for an instance buffer upload.
pub fn instance_bytes(instances: &[MarkerInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}
