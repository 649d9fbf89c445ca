use foundation::math::Rotation;
use gpu::{
    GlobeSpec, GlobeSurface, MarkerHandle, MarkerInstance, PerspectiveCamera, RenderBackend,
    RenderError,
};
use runtime::Frame;
use tracing::{debug, info, warn};

use crate::config::{CameraConfig, GlobeConfig};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ViewportMode {
    Live,
    /// The render context could not be recovered; nothing is drawn.
    Placeholder,
}

/// Owns the render backend, the camera and the globe orientation.
///
/// Zoom is the camera distance and is clamped on every write. Dropping the
/// viewport disposes the backend.
pub struct Viewport<B: RenderBackend> {
    backend: B,
    camera: PerspectiveCamera,
    camera_cfg: CameraConfig,
    globe_cfg: GlobeConfig,
    rotation: Rotation,
    surface: Option<GlobeSurface>,
    marker_instances: Vec<MarkerInstance>,
    marker_handles: Vec<MarkerHandle>,
    mode: ViewportMode,
    disposed: bool,
}

impl<B: RenderBackend> Viewport<B> {
    pub fn new(
        backend: B,
        camera_cfg: &CameraConfig,
        globe_cfg: &GlobeConfig,
        width_px: f64,
        height_px: f64,
    ) -> Result<Self, RenderError> {
        let mut camera = PerspectiveCamera::new(
            camera_cfg.fov_y_deg.to_radians(),
            camera_cfg.near,
            camera_cfg.far,
            camera_cfg.default_zoom.clamp(camera_cfg.min_zoom, camera_cfg.max_zoom),
        );
        camera.resize(width_px, height_px);

        let mut viewport = Self {
            backend,
            camera,
            camera_cfg: camera_cfg.clone(),
            globe_cfg: globe_cfg.clone(),
            rotation: Rotation::IDENTITY,
            surface: None,
            marker_instances: Vec::new(),
            marker_handles: Vec::new(),
            mode: ViewportMode::Live,
            disposed: false,
        };
        viewport.build_globe()?;
        viewport.backend.set_camera(&viewport.camera);
        Ok(viewport)
    }

    /// Builds the globe, falling back to an untextured sphere if the texture
    /// cannot be loaded.
    fn build_globe(&mut self) -> Result<(), RenderError> {
        let spec = GlobeSpec {
            radius: self.globe_cfg.radius,
            segments: self.globe_cfg.segments,
            texture: self.globe_cfg.texture.clone(),
        };
        let surface = match self.backend.build_sphere(&spec) {
            Err(RenderError::TextureLoad(path)) => {
                warn!("globe texture {path} failed to load; using untextured globe");
                self.backend.build_sphere(&GlobeSpec {
                    texture: None,
                    ..spec
                })?
            }
            other => other?,
        };
        self.surface = Some(surface);
        Ok(())
    }

    /// Replaces every marker on the globe.
    pub fn set_markers(&mut self, instances: Vec<MarkerInstance>) -> Result<(), RenderError> {
        self.ensure_not_disposed()?;
        for handle in self.marker_handles.drain(..) {
            self.backend.remove_marker(handle);
        }
        self.marker_instances = instances;
        if self.mode == ViewportMode::Placeholder {
            return Ok(());
        }
        self.upload_markers()
    }

    fn upload_markers(&mut self) -> Result<(), RenderError> {
        for instance in &self.marker_instances {
            let handle = self.backend.add_marker(*instance)?;
            self.marker_handles.push(handle);
        }
        debug!("uploaded {} markers", self.marker_handles.len());
        Ok(())
    }

    /// Advances auto-rotation (unless a drag is in progress) and renders.
    pub fn tick(&mut self, frame: &Frame, dragging: bool) -> Result<(), RenderError> {
        self.ensure_not_disposed()?;
        if self.mode == ViewportMode::Placeholder {
            return Ok(());
        }
        if !dragging {
            self.rotation.yaw += self.globe_cfg.auto_rotate_rad_per_s * frame.dt_s;
        }
        match self.backend.render(self.rotation) {
            Err(RenderError::ContextLost) => {
                self.recover_context();
                Ok(())
            }
            other => other,
        }
    }

    /// Recreates the context once; if that fails, degrades to placeholder mode.
    fn recover_context(&mut self) {
        warn!("render context lost; recreating");
        self.marker_handles.clear();
        self.surface = None;

        match self.rebuild_context() {
            Ok(()) => {
                self.backend.set_camera(&self.camera);
                info!("render context restored");
            }
            Err(e) => {
                warn!("render context recovery failed ({e}); showing placeholder");
                self.marker_handles.clear();
                self.mode = ViewportMode::Placeholder;
            }
        }
    }

    fn rebuild_context(&mut self) -> Result<(), RenderError> {
        self.backend.recreate_context()?;
        self.build_globe()?;
        self.upload_markers()
    }

    pub fn rotate_by(&mut self, d_yaw: f64, d_pitch: f64) {
        self.rotation.yaw += d_yaw;
        self.rotation.pitch += d_pitch;
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    pub fn zoom(&self) -> f64 {
        self.camera.distance()
    }

    pub fn zoom_bounds(&self) -> (f64, f64) {
        (self.camera_cfg.min_zoom, self.camera_cfg.max_zoom)
    }

    /// Clamps to the zoom bounds. Returns the applied zoom.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        let (lo, hi) = self.zoom_bounds();
        let z = if zoom.is_nan() { self.zoom() } else { zoom.clamp(lo, hi) };
        if z != self.camera.distance() {
            self.camera.set_distance(z);
            self.backend.set_camera(&self.camera);
        }
        z
    }

    pub fn zoom_by(&mut self, delta: f64) -> f64 {
        self.set_zoom(self.zoom() + delta)
    }

    /// Moves the camera one step closer.
    pub fn zoom_in(&mut self) -> f64 {
        self.zoom_by(-self.camera_cfg.zoom_step)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.zoom_by(self.camera_cfg.zoom_step)
    }

    pub fn reset_view(&mut self) {
        self.rotation = Rotation::IDENTITY;
        self.set_zoom(self.camera_cfg.default_zoom);
    }

    pub fn resize(&mut self, width_px: f64, height_px: f64) {
        if self.camera.resize(width_px, height_px) {
            let [w, h] = self.camera.size_px();
            debug!("viewport resized to {w}x{h}");
            self.backend.set_camera(&self.camera);
        }
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn surface(&self) -> Option<GlobeSurface> {
        self.surface
    }

    pub fn mode(&self) -> ViewportMode {
        self.mode
    }

    pub fn marker_count(&self) -> usize {
        self.marker_instances.len()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Releases the backend. Later calls are no-ops.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.marker_handles.clear();
        self.surface = None;
        self.backend.dispose();
        info!("viewport disposed");
    }

    fn ensure_not_disposed(&self) -> Result<(), RenderError> {
        if self.disposed {
            Err(RenderError::Disposed)
        } else {
            Ok(())
        }
    }
}

impl<B: RenderBackend> Drop for Viewport<B> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::{Viewport, ViewportMode};
    use crate::config::{CameraConfig, GlobeConfig};
    use foundation::math::Rotation;
    use gpu::{GlobeSurface, HeadlessBackend, HeadlessProbe, MarkerInstance, RenderError};
    use runtime::Frame;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn viewport() -> (Viewport<HeadlessBackend>, HeadlessProbe) {
        let (backend, probe) = HeadlessBackend::with_probe();
        let vp = Viewport::new(
            backend,
            &CameraConfig::default(),
            &GlobeConfig::default(),
            800.0,
            600.0,
        )
        .unwrap();
        (vp, probe)
    }

    fn instance() -> MarkerInstance {
        MarkerInstance {
            position: [0.0, 0.0, 1.02],
            size: 0.12,
            color: [1.0, 0.0, 0.0, 0.8],
        }
    }

    #[test]
    fn starts_at_default_zoom_with_textured_globe() {
        let (vp, probe) = viewport();
        assert_eq!(vp.zoom(), 2.5);
        assert_eq!(vp.surface(), Some(GlobeSurface::Textured));
        assert_eq!(probe.stats().textures, 1);
    }

    #[test]
    fn any_wheel_sequence_stays_in_bounds() {
        let (mut vp, _probe) = viewport();
        let deltas = [500.0, 9000.0, -120.0, -4000.0, -1e9, 3.0, 1e12, f64::NAN, -0.5];
        for d in deltas {
            let z = vp.zoom_by(d * 0.001);
            assert!((1.5..=5.0).contains(&z), "zoom {z} out of bounds");
            assert!((1.5..=5.0).contains(&vp.zoom()));
        }
    }

    #[test]
    fn zoom_buttons_step_through_clamp() {
        let (mut vp, _probe) = viewport();
        assert_close(vp.zoom_in(), 2.3, 1e-12);
        assert_close(vp.zoom_out(), 2.5, 1e-12);
        for _ in 0..50 {
            vp.zoom_in();
        }
        assert_eq!(vp.zoom(), 1.5);
        for _ in 0..50 {
            vp.zoom_out();
        }
        assert_eq!(vp.zoom(), 5.0);
    }

    #[test]
    fn tick_auto_rotates_only_when_idle() {
        let (mut vp, probe) = viewport();
        let frame = Frame::new(1, 0.5);
        vp.tick(&frame, false).unwrap();
        assert_close(vp.rotation().yaw, 0.03, 1e-12);
        vp.tick(&frame, true).unwrap();
        assert_close(vp.rotation().yaw, 0.03, 1e-12);

        let stats = probe.stats();
        assert_eq!(stats.frames_rendered, 2);
        let last = stats.last_frame.unwrap();
        assert_close(last.rotation.yaw, 0.03, 1e-12);
    }

    #[test]
    fn reset_view_restores_defaults() {
        let (mut vp, _probe) = viewport();
        vp.rotate_by(1.0, -0.4);
        vp.set_zoom(4.0);
        vp.reset_view();
        assert_eq!(vp.rotation(), Rotation::IDENTITY);
        assert_eq!(vp.zoom(), 2.5);
    }

    #[test]
    fn resize_clamps_and_is_idempotent() {
        let (mut vp, _probe) = viewport();
        vp.resize(800.0, 600.0);
        assert_eq!(vp.camera().size_px(), [800.0, 600.0]);
        vp.resize(0.0, 0.0);
        assert_eq!(vp.camera().size_px(), [1.0, 1.0]);
        assert_close(vp.camera().aspect(), 1.0, 1e-12);
    }

    #[test]
    fn set_markers_replaces_previous_set() {
        let (mut vp, probe) = viewport();
        vp.set_markers(vec![instance(); 3]).unwrap();
        assert_eq!(probe.stats().live_markers, 3);
        vp.set_markers(vec![instance(); 2]).unwrap();
        assert_eq!(probe.stats().live_markers, 2);
        assert_eq!(vp.marker_count(), 2);
    }

    #[test]
    fn texture_failure_falls_back_to_plain_globe() {
        let (backend, probe) = HeadlessBackend::with_probe();
        probe.update(|s| s.fail_texture_loads = true);
        let vp = Viewport::new(
            backend,
            &CameraConfig::default(),
            &GlobeConfig::default(),
            800.0,
            600.0,
        )
        .unwrap();
        assert_eq!(vp.surface(), Some(GlobeSurface::Untextured));
        assert_eq!(probe.stats().geometries, 1);
        assert_eq!(probe.stats().textures, 0);
    }

    #[test]
    fn context_loss_is_recovered_once() {
        let (mut vp, probe) = viewport();
        vp.set_markers(vec![instance(); 4]).unwrap();
        probe.update(|s| s.lose_context_on_next_render = true);
        vp.tick(&Frame::default(), false).unwrap();

        let stats = probe.stats();
        assert_eq!(stats.context_recreations, 1);
        assert_eq!(stats.live_markers, 4);
        assert_eq!(vp.mode(), ViewportMode::Live);
        vp.tick(&Frame::default(), false).unwrap();
        assert_eq!(probe.stats().frames_rendered, 1);
    }

    #[test]
    fn failed_recovery_degrades_to_placeholder() {
        let (mut vp, probe) = viewport();
        probe.update(|s| {
            s.lose_context_on_next_render = true;
            s.fail_context_recreation = true;
        });
        vp.tick(&Frame::default(), false).unwrap();
        assert_eq!(vp.mode(), ViewportMode::Placeholder);

        let before = vp.rotation();
        vp.tick(&Frame::new(1, 1.0), false).unwrap();
        assert_eq!(vp.rotation(), before);
        assert_eq!(probe.stats().frames_rendered, 0);
    }

    #[test]
    fn dispose_is_idempotent_and_drop_disposes() {
        let (mut vp, probe) = viewport();
        vp.dispose();
        vp.dispose();
        assert!(vp.is_disposed());
        assert_eq!(probe.stats().dispose_calls, 1);
        assert_eq!(vp.tick(&Frame::default(), false), Err(RenderError::Disposed));
        drop(vp);
        assert_eq!(probe.stats().dispose_calls, 1);

        let (vp, probe) = viewport();
        drop(vp);
        let stats = probe.stats();
        assert_eq!(stats.dispose_calls, 1);
        assert_eq!(stats.geometries, 0);
        assert_eq!(stats.textures, 0);
    }
}
