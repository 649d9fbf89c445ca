use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use foundation::math::Rotation;

use crate::camera::PerspectiveCamera;
use crate::instance::{MarkerInstance, instance_bytes};
use crate::mesh::generate_sphere_mesh;

#[derive(Debug, Clone, PartialEq)]
pub struct GlobeSpec {
    pub radius: f64,
    pub segments: u32,
    /// Equirectangular earth texture; `None` renders a plain shaded sphere.
    pub texture: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GlobeSurface {
    Textured,
    Untextured,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerHandle(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    ContextLost,
    TextureLoad(String),
    Disposed,
    Backend(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::ContextLost => write!(f, "render context lost"),
            RenderError::TextureLoad(path) => write!(f, "texture failed to load: {path}"),
            RenderError::Disposed => write!(f, "render backend already disposed"),
            RenderError::Backend(msg) => write!(f, "render backend error: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {}

/// Capability surface the viewport needs from a 3D renderer.
///
/// Everything that is math (rotation, zoom clamping, picking) stays outside
/// this trait so it can be tested without a GPU.
pub trait RenderBackend {
    /// (Re)builds the globe mesh and material. Replaces any previous globe.
    fn build_sphere(&mut self, spec: &GlobeSpec) -> Result<GlobeSurface, RenderError>;
    fn add_marker(&mut self, instance: MarkerInstance) -> Result<MarkerHandle, RenderError>;
    /// Unknown handles are ignored.
    fn remove_marker(&mut self, handle: MarkerHandle);
    /// Applies camera distance (zoom) and projection (aspect) changes.
    fn set_camera(&mut self, camera: &PerspectiveCamera);
    fn render(&mut self, rotation: Rotation) -> Result<(), RenderError>;
    /// Attempts to rebuild the context after `ContextLost`. The caller rebuilds
    /// the globe and markers afterwards.
    fn recreate_context(&mut self) -> Result<(), RenderError>;
    /// Releases geometries, textures and the context. Must tolerate repeat calls.
    fn dispose(&mut self);
}

/// Snapshot of what the last frame drew.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderFrame {
    pub surface: Option<GlobeSurface>,
    pub rotation: Rotation,
    pub view_proj: [[f32; 4]; 4],
    pub markers: Vec<MarkerInstance>,
    pub instance_buffer_bytes: usize,
}

/// Resource and fault-injection state of a [`HeadlessBackend`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlessStats {
    pub geometries: usize,
    pub textures: usize,
    pub live_markers: usize,
    pub globe_triangles: usize,
    pub frames_rendered: u64,
    pub dispose_calls: u32,
    pub releases: u32,
    pub context_recreations: u32,
    pub context_alive: bool,
    pub last_frame: Option<RenderFrame>,

    /// Textures fail to load while set.
    pub fail_texture_loads: bool,
    /// The next `render` reports a lost context.
    pub lose_context_on_next_render: bool,
    /// `recreate_context` fails while set.
    pub fail_context_recreation: bool,
}

/// Read-only handle onto a backend's stats that outlives the backend itself.
#[derive(Debug, Clone)]
pub struct HeadlessProbe(Rc<RefCell<HeadlessStats>>);

impl HeadlessProbe {
    pub fn stats(&self) -> HeadlessStats {
        self.0.borrow().clone()
    }

    pub fn update(&self, f: impl FnOnce(&mut HeadlessStats)) {
        f(&mut self.0.borrow_mut());
    }
}

/// Renderer that builds real CPU-side geometry and instance buffers but never
/// touches a GPU. Used by tests and the command-line tools.
#[derive(Debug)]
pub struct HeadlessBackend {
    stats: Rc<RefCell<HeadlessStats>>,
    surface: Option<GlobeSurface>,
    view_proj: [[f32; 4]; 4],
    markers: BTreeMap<MarkerHandle, MarkerInstance>,
    next_handle: u32,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self {
            stats: Rc::new(RefCell::new(HeadlessStats {
                context_alive: true,
                ..HeadlessStats::default()
            })),
            surface: None,
            view_proj: [[0.0; 4]; 4],
            markers: BTreeMap::new(),
            next_handle: 0,
        }
    }

    pub fn with_probe() -> (Self, HeadlessProbe) {
        let backend = Self::new();
        let probe = backend.probe();
        (backend, probe)
    }

    pub fn probe(&self) -> HeadlessProbe {
        HeadlessProbe(Rc::clone(&self.stats))
    }

    fn sync_counts(&self) {
        let mut s = self.stats.borrow_mut();
        s.live_markers = self.markers.len();
        s.geometries = usize::from(self.surface.is_some());
        s.textures = usize::from(self.surface == Some(GlobeSurface::Textured));
    }

    fn ensure_alive(&self) -> Result<(), RenderError> {
        let s = self.stats.borrow();
        if s.dispose_calls > 0 {
            return Err(RenderError::Disposed);
        }
        if !s.context_alive {
            return Err(RenderError::ContextLost);
        }
        Ok(())
    }
}

impl RenderBackend for HeadlessBackend {
    fn build_sphere(&mut self, spec: &GlobeSpec) -> Result<GlobeSurface, RenderError> {
        self.ensure_alive()?;
        let mesh = generate_sphere_mesh(spec.radius as f32, spec.segments).ok_or_else(|| {
            RenderError::Backend(format!("globe mesh with {} segments is too large", spec.segments))
        })?;

        let surface = match &spec.texture {
            Some(path) if self.stats.borrow().fail_texture_loads => {
                return Err(RenderError::TextureLoad(path.clone()));
            }
            Some(_) => GlobeSurface::Textured,
            None => GlobeSurface::Untextured,
        };
        self.surface = Some(surface);
        self.stats.borrow_mut().globe_triangles = mesh.triangle_count();
        self.sync_counts();
        Ok(surface)
    }

    fn add_marker(&mut self, instance: MarkerInstance) -> Result<MarkerHandle, RenderError> {
        self.ensure_alive()?;
        let handle = MarkerHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.markers.insert(handle, instance);
        self.sync_counts();
        Ok(handle)
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        self.markers.remove(&handle);
        self.sync_counts();
    }

    fn set_camera(&mut self, camera: &PerspectiveCamera) {
        self.view_proj = camera.view_proj();
    }

    fn render(&mut self, rotation: Rotation) -> Result<(), RenderError> {
        self.ensure_alive()?;
        {
            let mut s = self.stats.borrow_mut();
            if s.lose_context_on_next_render {
                s.lose_context_on_next_render = false;
                s.context_alive = false;
                drop(s);
                self.surface = None;
                self.markers.clear();
                self.sync_counts();
                return Err(RenderError::ContextLost);
            }
        }

        let markers: Vec<MarkerInstance> = self.markers.values().copied().collect();
        let frame = RenderFrame {
            surface: self.surface,
            rotation,
            view_proj: self.view_proj,
            instance_buffer_bytes: instance_bytes(&markers).len(),
            markers,
        };
        let mut s = self.stats.borrow_mut();
        s.frames_rendered += 1;
        s.last_frame = Some(frame);
        Ok(())
    }

    fn recreate_context(&mut self) -> Result<(), RenderError> {
        let mut s = self.stats.borrow_mut();
        if s.dispose_calls > 0 {
            return Err(RenderError::Disposed);
        }
        if s.fail_context_recreation {
            return Err(RenderError::Backend("context recreation refused".to_string()));
        }
        s.context_alive = true;
        s.context_recreations += 1;
        Ok(())
    }

    fn dispose(&mut self) {
        let first = {
            let mut s = self.stats.borrow_mut();
            s.dispose_calls += 1;
            s.dispose_calls == 1
        };
        if !first {
            return;
        }
        self.markers.clear();
        self.surface = None;
        self.sync_counts();
        let mut s = self.stats.borrow_mut();
        s.context_alive = false;
        s.releases += 1;
    }
}
