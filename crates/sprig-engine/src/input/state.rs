use std::collections::HashSet;
use std::hash::Hash;

use crate::coords::Vec2;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, Modifiers, MouseButton};

/// Held keys and buttons plus pointer position for one window.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,
    /// Logical window pixels; `None` while the pointer is outside.
    pub pointer: Option<Vec2>,
    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

/// Updates `held` and records a transition only when the held set changes,
/// so key repeats never count as new presses.
fn track<T: Copy + Eq + Hash>(
    held: &mut HashSet<T>,
    pressed_now: &mut HashSet<T>,
    released_now: &mut HashSet<T>,
    item: T,
    pressed: bool,
) {
    if pressed {
        if held.insert(item) {
            pressed_now.insert(item);
        }
    } else if held.remove(&item) {
        released_now.insert(item);
    }
}

impl InputState {
    /// Folds `ev` into the held state and records it in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::Key { key, pressed, .. } => track(
                &mut self.keys_down,
                &mut frame.keys_pressed,
                &mut frame.keys_released,
                key,
                pressed,
            ),
            InputEvent::Button { button, pressed } => track(
                &mut self.buttons_down,
                &mut frame.buttons_pressed,
                &mut frame.buttons_released,
                button,
                pressed,
            ),
            InputEvent::PointerMoved(p) => self.pointer = Some(p),
            InputEvent::PointerLeft => self.pointer = None,
            InputEvent::Wheel(delta) => frame.wheel = frame.wheel + delta,
            InputEvent::Modifiers(m) => self.modifiers = m,
            InputEvent::Focus(focused) => {
                self.focused = focused;
                if !focused {
                    // Releases that happen while unfocused are never delivered.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                    self.modifiers = Modifiers::default();
                }
            }
        }
        frame.events.push(ev);
    }

    /// True while `key` is held.
    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// True while `button` is held.
    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    pub fn pointer_position(&self) -> Option<Vec2> {
        self.pointer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, pressed: bool) -> InputEvent {
        InputEvent::Key { key, pressed, repeat: !pressed }
    }

    #[test]
    fn repeated_press_is_reported_once() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::A, true));
        state.apply_event(&mut frame, InputEvent::Key { key: Key::A, pressed: true, repeat: true });

        assert!(state.key_down(Key::A));
        assert!(frame.key_pressed(Key::A));
        assert_eq!(frame.keys_pressed.len(), 1);
        assert_eq!(frame.events.len(), 2);

        frame.clear();
        state.apply_event(&mut frame, key(Key::A, false));
        assert!(!state.key_down(Key::A));
        assert!(frame.key_released(Key::A));
        assert!(!frame.key_pressed(Key::A));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, InputEvent::Button { button: MouseButton::Middle, pressed: false });
        assert!(frame.buttons_released.is_empty());
    }

    #[test]
    fn pointer_tracks_moves_and_leaves() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::PointerMoved(Vec2::new(4.0, 8.0)));
        assert_eq!(state.pointer_position(), Some(Vec2::new(4.0, 8.0)));

        state.apply_event(&mut frame, InputEvent::PointerLeft);
        assert_eq!(state.pointer_position(), None);
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::Space, true));
        state.apply_event(&mut frame, InputEvent::Button { button: MouseButton::Right, pressed: true });
        state.apply_event(&mut frame, InputEvent::Focus(false));

        assert!(!state.key_down(Key::Space));
        assert!(!state.button_down(MouseButton::Right));
    }

    #[test]
    fn wheel_accumulates_until_cleared() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::Wheel(Vec2::new(0.0, 20.0)));
        state.apply_event(&mut frame, InputEvent::Wheel(Vec2::new(3.0, 5.0)));
        assert_eq!(frame.wheel, Vec2::new(3.0, 25.0));

        frame.clear();
        assert_eq!(frame.wheel, Vec2::zero());
    }
}
