use std::collections::HashSet;

use super::types::{InputEvent, Key, KeyState, MouseButton, MouseButtonState};

/// Transitions and accumulated motion since the last redraw.
///
/// Cleared by the runtime after every `on_frame`.
#[derive(Debug, Default)]
pub struct InputFrame {
    pub events: Vec<InputEvent>,

    pub keys_pressed: HashSet<Key>,
    pub keys_released: HashSet<Key>,

    pub buttons_pressed: HashSet<MouseButton>,
    pub buttons_released: HashSet<MouseButton>,

    /// Logical pixels.
    pub pointer_delta: (f32, f32),

    /// Vertical wheel motion in lines; positive scrolls away from the user.
    pub wheel_lines: f32,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.pointer_delta = (0.0, 0.0);
        self.wheel_lines = 0.0;
    }
}

/// Current input state for a single window.
///
/// Holds "is down" information and the pointer position.
/// Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies an event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Avoids stuck keys/buttons when focus changes mid-press.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved { x, y } => {
                if let Some((px, py)) = self.pointer_pos {
                    frame.pointer_delta.0 += x - px;
                    frame.pointer_delta.1 += y - py;
                }
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(*key) {
                        frame.keys_pressed.insert(*key);
                    }
                }
                KeyState::Released => {
                    if self.keys_down.remove(key) {
                        frame.keys_released.insert(*key);
                    }
                }
            },

            InputEvent::PointerButton { button, state } => match state {
                MouseButtonState::Pressed => {
                    if self.buttons_down.insert(*button) {
                        frame.buttons_pressed.insert(*button);
                    }
                }
                MouseButtonState::Released => {
                    if self.buttons_down.remove(button) {
                        frame.buttons_released.insert(*button);
                    }
                }
            },

            InputEvent::MouseWheel(delta) => {
                frame.wheel_lines += delta.lines_y();
            }
        }

        frame.events.push(ev);
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
    use crate::input::MouseWheelDelta;

    fn apply(state: &mut InputState, frame: &mut InputFrame, evs: Vec<InputEvent>) {
        for ev in evs {
            state.apply_event(frame, ev);
        }
    }

    #[test]
    fn pointer_delta_accumulates_after_first_position() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        apply(&mut s, &mut f, vec![
            InputEvent::PointerMoved { x: 10.0, y: 10.0 },
            InputEvent::PointerMoved { x: 15.0, y: 8.0 },
            InputEvent::PointerMoved { x: 20.0, y: 9.0 },
        ]);
        assert_eq!(f.pointer_delta, (10.0, -1.0));
    }

    #[test]
    fn pointer_left_breaks_delta_chain() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        apply(&mut s, &mut f, vec![
            InputEvent::PointerMoved { x: 0.0, y: 0.0 },
            InputEvent::PointerLeft,
            InputEvent::PointerMoved { x: 100.0, y: 100.0 },
        ]);
        assert_eq!(f.pointer_delta, (0.0, 0.0));
    }

    #[test]
    fn key_press_recorded_once() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        let press = InputEvent::Key { key: Key::R, state: KeyState::Pressed, repeat: false };
        apply(&mut s, &mut f, vec![press.clone(), press]);
        assert!(s.key_down(Key::R));
        assert_eq!(f.keys_pressed.len(), 1);
        assert_eq!(f.events.len(), 2);
    }

    #[test]
    fn focus_loss_releases_everything() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        apply(&mut s, &mut f, vec![
            InputEvent::Key { key: Key::ArrowLeft, state: KeyState::Pressed, repeat: false },
            InputEvent::PointerButton { button: MouseButton::Left, state: MouseButtonState::Pressed },
            InputEvent::Focused(false),
        ]);
        assert!(!s.key_down(Key::ArrowLeft));
        assert!(!s.button_down(MouseButton::Left));
    }

    #[test]
    fn wheel_pixels_convert_to_lines() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        apply(&mut s, &mut f, vec![
            InputEvent::MouseWheel(MouseWheelDelta::Line { x: 0.0, y: 1.0 }),
            InputEvent::MouseWheel(MouseWheelDelta::Pixel { x: 0.0, y: 80.0 }),
        ]);
        assert_eq!(f.wheel_lines, 3.0);
    }

    #[test]
    fn frame_clear_resets_deltas() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        apply(&mut s, &mut f, vec![InputEvent::MouseWheel(MouseWheelDelta::Line { x: 0.0, y: 2.0 })]);
        f.clear();
        assert_eq!(f.wheel_lines, 0.0);
        assert!(f.events.is_empty());
    }
}
