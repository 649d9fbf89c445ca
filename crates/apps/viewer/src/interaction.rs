//! Pointer gesture state machine.
//!
//! Transitions are pure: `(state, event, config) -> (state', effect)`. The
//! owner applies the effect (rotate, zoom, hit-test) to whatever view it
//! drives, so the same controller serves the globe and the flat map.

use foundation::math::Vec2;

use crate::config::InteractionConfig;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PointerEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    Leave,
    Wheel { delta_y: f64 },
    Click { x: f64, y: f64 },
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum GestureState {
    Idle {
        /// The press that just ended was a drag; swallow its click.
        suppress_click: bool,
    },
    Dragging {
        last: Vec2,
        /// Total pointer path length since the press.
        travel_px: f64,
    },
}

impl Default for GestureState {
    fn default() -> Self {
        GestureState::Idle {
            suppress_click: false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Effect {
    None,
    Rotate { d_yaw: f64, d_pitch: f64 },
    Zoom { delta: f64 },
    HitTest { x: f64, y: f64 },
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transition {
    pub state: GestureState,
    pub effect: Effect,
    /// The host must suppress the event's default action (page scroll).
    pub consume: bool,
}

impl Transition {
    fn to(state: GestureState, effect: Effect) -> Self {
        Self {
            state,
            effect,
            consume: false,
        }
    }
}

pub fn transition(state: GestureState, event: PointerEvent, cfg: &InteractionConfig) -> Transition {
    match (state, event) {
        (_, PointerEvent::Down { x, y }) => Transition::to(
            GestureState::Dragging {
                last: Vec2::new(x, y),
                travel_px: 0.0,
            },
            Effect::None,
        ),
        (GestureState::Dragging { last, travel_px }, PointerEvent::Move { x, y }) => {
            let dx = x - last.x;
            let dy = y - last.y;
            Transition::to(
                GestureState::Dragging {
                    last: Vec2::new(x, y),
                    travel_px: travel_px + Vec2::new(dx, dy).length(),
                },
                Effect::Rotate {
                    d_yaw: dx * cfg.yaw_per_px,
                    d_pitch: dy * cfg.pitch_per_px,
                },
            )
        }
        (GestureState::Idle { .. }, PointerEvent::Move { .. }) => Transition::to(state, Effect::None),
        (GestureState::Dragging { travel_px, .. }, PointerEvent::Up) => Transition::to(
            GestureState::Idle {
                suppress_click: travel_px > cfg.drag_threshold_px,
            },
            Effect::None,
        ),
        (GestureState::Idle { .. }, PointerEvent::Up) => Transition::to(state, Effect::None),
        (_, PointerEvent::Leave) => Transition::to(GestureState::default(), Effect::None),
        (_, PointerEvent::Wheel { delta_y }) => Transition {
            state,
            effect: Effect::Zoom {
                delta: delta_y * cfg.zoom_per_wheel,
            },
            consume: true,
        },
        (GestureState::Idle { suppress_click }, PointerEvent::Click { x, y }) => {
            let effect = if suppress_click {
                Effect::None
            } else {
                Effect::HitTest { x, y }
            };
            Transition::to(GestureState::default(), effect)
        }
        (GestureState::Dragging { travel_px, .. }, PointerEvent::Click { x, y }) => {
            let effect = if travel_px > cfg.drag_threshold_px {
                Effect::None
            } else {
                Effect::HitTest { x, y }
            };
            Transition::to(state, effect)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: GestureState,
    config: InteractionConfig,
}

impl InteractionController {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            state: GestureState::default(),
            config,
        }
    }

    pub fn handle(&mut self, event: PointerEvent) -> Transition {
        let t = transition(self.state, event, &self.config);
        self.state = t.state;
        t
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    pub fn last_pointer(&self) -> Option<Vec2> {
        match self.state {
            GestureState::Dragging { last, .. } => Some(last),
            GestureState::Idle { .. } => None,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }
}
