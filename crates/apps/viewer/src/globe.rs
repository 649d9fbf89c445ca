use gpu::{RenderBackend, RenderError};
use layers::{Layer, MarkerLayer};
use runtime::{Event, EventBus, Frame};
use scene::{CategoryFilter, Hotspot, HotspotId, HotspotSet, SelectionChange, SelectionState};
use tracing::{debug, info};

use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::interaction::{Effect, InteractionController, PointerEvent};
use crate::panel::HotspotPanel;
use crate::viewport::Viewport;

#[derive(Debug, Clone, PartialEq)]
pub enum GlobeEvent {
    MarkersRebuilt { count: usize, generation: u64 },
    Selected(HotspotId),
    SelectionCleared(HotspotId),
}

type SelectCallback = Box<dyn FnMut(&Hotspot)>;

/// Interactive globe: hotspots in, selection out.
pub struct GlobeView<B: RenderBackend> {
    hotspots: HotspotSet,
    filter: CategoryFilter,
    layer: MarkerLayer,
    viewport: Viewport<B>,
    controller: InteractionController,
    selection: SelectionState,
    occlude: bool,
    on_select: Option<SelectCallback>,
    events: EventBus<GlobeEvent>,
    frame: Frame,
}

impl<B: RenderBackend> GlobeView<B> {
    pub fn new(
        backend: B,
        config: &ViewerConfig,
        hotspots: HotspotSet,
        width_px: f64,
        height_px: f64,
    ) -> Result<Self, ViewerError> {
        config.validate()?;
        let viewport = Viewport::new(backend, &config.camera, &config.globe, width_px, height_px)?;
        let layer = MarkerLayer::new(1, config.globe.radius, config.markers.style())?;

        let mut view = Self {
            hotspots,
            filter: CategoryFilter::All,
            layer,
            viewport,
            controller: InteractionController::new(config.interaction.clone()),
            selection: SelectionState::new(),
            occlude: config.globe.occlude_far_side,
            on_select: None,
            events: EventBus::new(),
            frame: Frame::default(),
        };
        view.sync_markers()?;
        Ok(view)
    }

    pub fn on_select_hotspot(&mut self, callback: impl FnMut(&Hotspot) + 'static) {
        self.on_select = Some(Box::new(callback));
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) -> Result<(), ViewerError> {
        self.filter = filter;
        self.sync_markers()
    }

    pub fn set_hotspots(&mut self, hotspots: HotspotSet) -> Result<(), ViewerError> {
        self.hotspots = hotspots;
        if let Some(id) = self.selection.selected() {
            if self.hotspots.get(id).is_none() {
                self.clear_selection();
            }
        }
        self.sync_markers()
    }

    fn sync_markers(&mut self) -> Result<(), ViewerError> {
        if !self.layer.sync(&self.hotspots, self.filter)? {
            return Ok(());
        }
        self.viewport.set_markers(self.layer.instances())?;
        let count = self.layer.markers().len();
        let generation = self.layer.generation();
        info!("rebuilt {count} markers for filter {:?}", self.filter);
        self.events
            .emit(self.frame, GlobeEvent::MarkersRebuilt { count, generation });
        Ok(())
    }

    /// Feeds one pointer event through the gesture machine. Returns `true` if
    /// the host must suppress the event's default action.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        let t = self.controller.handle(event);
        match t.effect {
            Effect::None => {}
            Effect::Rotate { d_yaw, d_pitch } => self.viewport.rotate_by(d_yaw, d_pitch),
            Effect::Zoom { delta } => {
                self.viewport.zoom_by(delta);
            }
            Effect::HitTest { x, y } => {
                self.click(x, y);
            }
        }
        t.consume
    }

    /// Hit-tests a click and updates the selection. A miss leaves it unchanged.
    pub fn click(&mut self, x_px: f64, y_px: f64) -> SelectionChange {
        let hit = self.layer.hit_test(
            [x_px, y_px],
            self.viewport.camera(),
            self.viewport.rotation(),
            self.occlude,
        );
        let change = self.selection.apply_pick(hit);
        let id = match change {
            SelectionChange::Selected(id) | SelectionChange::Reselected(id) => id,
            SelectionChange::Unchanged => {
                debug!("click at ({x_px}, {y_px}) hit nothing");
                return change;
            }
        };
        if let Some(hotspot) = self.hotspots.get(id) {
            if let Some(cb) = self.on_select.as_mut() {
                cb(hotspot);
            }
        }
        self.events.emit(self.frame, GlobeEvent::Selected(id));
        change
    }

    /// Explicit close from the info panel.
    pub fn clear_selection(&mut self) -> Option<HotspotId> {
        let previous = self.selection.clear()?;
        self.events
            .emit(self.frame, GlobeEvent::SelectionCleared(previous));
        Some(previous)
    }

    pub fn tick(&mut self, dt_s: f64) -> Result<(), RenderError> {
        self.frame = self.frame.advance(dt_s);
        self.viewport.tick(&self.frame, self.controller.is_dragging())
    }

    pub fn selected(&self) -> Option<&Hotspot> {
        self.selection.selected().and_then(|id| self.hotspots.get(id))
    }

    pub fn panel(&self) -> Option<HotspotPanel> {
        self.selected().map(HotspotPanel::for_hotspot)
    }

    pub fn drain_events(&mut self) -> Vec<Event<GlobeEvent>> {
        self.events.drain()
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    pub fn layer(&self) -> &MarkerLayer {
        &self.layer
    }

    pub fn viewport(&self) -> &Viewport<B> {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport<B> {
        &mut self.viewport
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn resize(&mut self, width_px: f64, height_px: f64) {
        self.viewport.resize(width_px, height_px);
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.viewport.zoom_in()
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.viewport.zoom_out()
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset_view();
    }

    pub fn dispose(&mut self) {
        self.viewport.dispose();
    }
}
