use std::collections::HashSet;

use super::types::{InputEvent, Key, KeyState, MouseButton, MouseButtonState, PointerButtonEvent};

/// Current input state for a single window.
///
/// Holds "is down" information and the current pointer position. Consumers
/// poll it once per frame; edge detection is their concern.
#[derive(Debug, Default)]
pub struct InputState {
    /// Pointer position in logical pixels; `None` while outside the window.
    pub pointer_pos: Option<(f32, f32)>,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Folds a platform-agnostic input event into the current state.
    pub fn apply_event(&mut self, ev: InputEvent) {
        match ev {
            InputEvent::Focused(true) => {}
            InputEvent::Focused(false) => {
                // Releases are not delivered while unfocused; drop held state.
                self.keys_down.clear();
                self.buttons_down.clear();
            }

            InputEvent::PointerMoved { x, y } => {
                self.pointer_pos = Some((x, y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    self.keys_down.insert(key);
                }
                KeyState::Released => {
                    self.keys_down.remove(&key);
                }
            },

            InputEvent::PointerButton(PointerButtonEvent { button, state, pos }) => {
                if pos.is_some() {
                    self.pointer_pos = pos;
                }
                match state {
                    MouseButtonState::Pressed => {
                        self.buttons_down.insert(button);
                    }
                    MouseButtonState::Released => {
                        self.buttons_down.remove(&button);
                    }
                }
            }
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(button: MouseButton, pos: Option<(f32, f32)>) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button,
            state: MouseButtonState::Pressed,
            pos,
        })
    }

    // ── pointer ───────────────────────────────────────────────────────────

    #[test]
    fn pointer_moves_and_leaves() {
        let mut s = InputState::default();
        s.apply_event(InputEvent::PointerMoved { x: 10.0, y: 20.0 });
        assert_eq!(s.pointer_pos, Some((10.0, 20.0)));
        s.apply_event(InputEvent::PointerLeft);
        assert_eq!(s.pointer_pos, None);
    }

    #[test]
    fn button_press_and_release() {
        let mut s = InputState::default();
        s.apply_event(press(MouseButton::Left, Some((5.0, 5.0))));
        assert!(s.button_down(MouseButton::Left));
        assert_eq!(s.pointer_pos, Some((5.0, 5.0)));

        s.apply_event(InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Released,
            pos: None,
        }));
        assert!(!s.button_down(MouseButton::Left));
        // A release without position keeps the last known one.
        assert_eq!(s.pointer_pos, Some((5.0, 5.0)));
    }

    // ── keys ──────────────────────────────────────────────────────────────

    #[test]
    fn key_down_tracks_press_release() {
        let mut s = InputState::default();
        s.apply_event(InputEvent::Key {
            key: Key::Escape,
            state: KeyState::Pressed,
            repeat: false,
        });
        assert!(s.key_down(Key::Escape));
        s.apply_event(InputEvent::Key {
            key: Key::Escape,
            state: KeyState::Released,
            repeat: false,
        });
        assert!(!s.key_down(Key::Escape));
    }

    #[test]
    fn focus_loss_clears_held_state() {
        let mut s = InputState::default();
        s.apply_event(InputEvent::Key { key: Key::Space, state: KeyState::Pressed, repeat: false });
        s.apply_event(press(MouseButton::Left, None));
        s.apply_event(InputEvent::Focused(false));
        assert!(s.keys_down.is_empty());
        assert!(s.buttons_down.is_empty());
    }

    #[test]
    fn focus_gain_keeps_held_state() {
        let mut s = InputState::default();
        s.apply_event(InputEvent::Key { key: Key::Space, state: KeyState::Pressed, repeat: false });
        s.apply_event(InputEvent::Focused(true));
        assert!(s.key_down(Key::Space));
    }
}
