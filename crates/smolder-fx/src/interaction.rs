//! Clickable controls and the state they drive.
//!
//! Controls are laid out along the bottom edge of the viewport. A click is the
//! rising edge of the primary button: the tick where it is down after a tick
//! where it was up. Holding the button never re-fires.

use smolder_engine::coords::{Rect, Vec2, Viewport};
use smolder_engine::paint::Color;

use crate::clock::RotationDirection;
use crate::config::{ControlLayout, Palette};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ControlId {
    RunPause,
    SpinLeft,
    SpinRight,
    AmbientToggle,
}

impl ControlId {
    /// Layout order, left to right.
    pub const ALL: [ControlId; 4] = [
        ControlId::RunPause,
        ControlId::SpinLeft,
        ControlId::SpinRight,
        ControlId::AmbientToggle,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ControlId::RunPause => "run/pause",
            ControlId::SpinLeft => "spin left",
            ControlId::SpinRight => "spin right",
            ControlId::AmbientToggle => "ambient",
        }
    }
}

/// A clickable rectangle with its base color.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Control {
    pub id: ControlId,
    pub rect: Rect,
    pub color: Color,
}

impl Control {
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        self.rect.contains(p)
    }
}

impl ControlLayout {
    /// Places one control per [`ControlId::ALL`] entry in a row anchored at the
    /// bottom-left corner of `viewport`.
    pub fn build(&self, viewport: Viewport, palette: &Palette) -> Vec<Control> {
        let y = viewport.height - self.height - self.padding;

        ControlId::ALL
            .iter()
            .enumerate()
            .map(|(i, &id)| {
                let x = self.padding + i as f32 * (self.width + self.padding);
                let color = match id {
                    ControlId::RunPause => palette.run_pause,
                    ControlId::SpinLeft | ControlId::SpinRight => palette.spin,
                    ControlId::AmbientToggle => palette.ambient_toggle,
                };
                Control {
                    id,
                    rect: Rect::new(x, y, self.width, self.height),
                    color,
                }
            })
            .collect()
    }
}

/// First control, in layout order, containing `pos`.
pub fn hit_test(controls: &[Control], pos: Vec2) -> Option<&Control> {
    controls.iter().find(|c| c.contains(pos))
}

/// State the controls mutate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct InteractionState {
    pub running: bool,
    pub direction: RotationDirection,
    pub ambient_enabled: bool,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            running: true,
            direction: RotationDirection::Positive,
            ambient_enabled: true,
        }
    }
}

impl InteractionState {
    pub fn apply(&mut self, id: ControlId) {
        match id {
            ControlId::RunPause => self.running = !self.running,
            ControlId::SpinLeft => {
                self.direction = RotationDirection::Negative;
                self.running = true;
            }
            ControlId::SpinRight => {
                self.direction = RotationDirection::Positive;
                self.running = true;
            }
            ControlId::AmbientToggle => self.ambient_enabled = !self.ambient_enabled,
        }
    }
}

/// Pointer snapshot for one tick.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Pointer {
    /// `None` while the pointer is outside the window.
    pub pos: Option<Vec2>,
    /// Primary button held.
    pub down: bool,
}

/// Click edge detection plus the resulting [`InteractionState`].
#[derive(Debug, Clone, Default)]
pub struct InteractionModel {
    state: InteractionState,
    prev_down: bool,
}

impl InteractionModel {
    pub fn new(state: InteractionState) -> Self {
        Self { state, prev_down: false }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Processes one tick of pointer input.
    ///
    /// On a rising edge the first control under the pointer is activated and
    /// returned. A press with no known position activates nothing.
    pub fn on_tick(&mut self, pointer: Pointer, controls: &[Control]) -> Option<ControlId> {
        let clicked = pointer.down && !self.prev_down;
        self.prev_down = pointer.down;

        if !clicked {
            return None;
        }

        let id = hit_test(controls, pointer.pos?)?.id;
        self.state.apply(id);
        Some(id)
    }
}
