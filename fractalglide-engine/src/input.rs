use crate::state::RendererState;

/// Pointer activity, already reduced to per-event pixel deltas by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Primary button down: start dragging the plane.
    Pressed,
    /// Primary button up: stop dragging.
    Released,
    /// Pointer moved by `(dx, dy)` pixels since the previous event.
    Moved { dx: f64, dy: f64 },
}

/// An analog input device, polled once per tick.
///
/// `sample()` returns the raw axes `[pan_x, pan_y, _, zoom]`, or `None`
/// while no device is connected — which is a no-op, not an error.
pub trait GamepadSource {
    fn sample(&mut self) -> Option<[f64; 4]>;
}

/// Analog-stick tuning.
#[derive(Debug, Clone, Copy)]
pub struct PadSettings {
    /// Axis magnitudes at or below this are treated as centred.
    pub dead_zone: f64,
    /// Pixels of pan per unit of stick deflection per tick.
    pub move_modifier: f64,
    /// Zoom delta per unit of stick deflection per tick.
    pub scroll_modifier: f64,
}

impl Default for PadSettings {
    fn default() -> Self {
        Self {
            dead_zone: 0.1,
            move_modifier: 15.0,
            scroll_modifier: 20.0,
        }
    }
}

/// Translates pointer, wheel and gamepad input into viewport mutations.
///
/// Every method returns `true` when the viewport actually changed, which is
/// the caller's cue to invalidate the frame.
pub struct InteractionController {
    pad: PadSettings,
    moving: bool,
}

impl InteractionController {
    pub fn new(pad: PadSettings) -> Self {
        Self { pad, moving: false }
    }

    /// Currently in the pointer-drag state.
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn pointer(&mut self, state: &mut RendererState, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Pressed => {
                self.moving = true;
                false
            }
            PointerEvent::Released => {
                self.moving = false;
                false
            }
            PointerEvent::Moved { dx, dy } => {
                if !self.moving {
                    return false;
                }
                state.viewport.pan(state.resolution, dx, dy);
                true
            }
        }
    }

    /// Wheel zoom with the raw hardware delta.
    ///
    /// The host must suppress the event's default scroll action itself; the
    /// engine only sees the delta.
    pub fn wheel(&mut self, state: &mut RendererState, delta_y: f64) -> bool {
        state.viewport.zoom(state.resolution, delta_y)
    }

    /// Apply one gamepad sample. `None` (no device) does nothing.
    pub fn poll_gamepad(&mut self, state: &mut RendererState, sample: Option<[f64; 4]>) -> bool {
        let Some([x1, y1, _, y2]) = sample else {
            return false;
        };

        let mut changed = false;

        let x_move = if x1.abs() > self.pad.dead_zone {
            x1 * self.pad.move_modifier
        } else {
            0.0
        };
        let y_move = if y1.abs() > self.pad.dead_zone {
            y1 * self.pad.move_modifier
        } else {
            0.0
        };
        if x_move != 0.0 || y_move != 0.0 {
            // Stick deflection pushes the plane, so the deltas are negated
            // relative to a pointer drag.
            state.viewport.pan(state.resolution, -x_move, -y_move);
            changed = true;
        }

        if y2.abs() > self.pad.dead_zone {
            changed |= state.viewport.zoom(state.resolution, y2 * self.pad.scroll_modifier);
        }

        changed
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(PadSettings::default())
    }
}
