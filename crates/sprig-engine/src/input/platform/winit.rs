use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::Window;

use crate::coords::Vec2;
use crate::input::{InputEvent, Key, Modifiers, MouseButton};

/// Logical pixels per wheel "line".
const WHEEL_LINE: f32 = 20.0;

#[rustfmt::skip]
const KEY_TABLE: &[(KeyCode, Key)] = &[
    (KeyCode::Escape, Key::Escape), (KeyCode::Enter, Key::Enter), (KeyCode::Tab, Key::Tab),
    (KeyCode::Backspace, Key::Backspace), (KeyCode::Space, Key::Space), (KeyCode::Delete, Key::Delete),

    (KeyCode::ArrowUp, Key::Up), (KeyCode::ArrowDown, Key::Down),
    (KeyCode::ArrowLeft, Key::Left), (KeyCode::ArrowRight, Key::Right),

    (KeyCode::ShiftLeft, Key::Shift), (KeyCode::ShiftRight, Key::Shift),
    (KeyCode::ControlLeft, Key::Control), (KeyCode::ControlRight, Key::Control),
    (KeyCode::AltLeft, Key::Alt), (KeyCode::AltRight, Key::Alt),
    (KeyCode::SuperLeft, Key::Super), (KeyCode::SuperRight, Key::Super),

    (KeyCode::KeyA, Key::A), (KeyCode::KeyB, Key::B), (KeyCode::KeyC, Key::C), (KeyCode::KeyD, Key::D),
    (KeyCode::KeyE, Key::E), (KeyCode::KeyF, Key::F), (KeyCode::KeyG, Key::G), (KeyCode::KeyH, Key::H),
    (KeyCode::KeyI, Key::I), (KeyCode::KeyJ, Key::J), (KeyCode::KeyK, Key::K), (KeyCode::KeyL, Key::L),
    (KeyCode::KeyM, Key::M), (KeyCode::KeyN, Key::N), (KeyCode::KeyO, Key::O), (KeyCode::KeyP, Key::P),
    (KeyCode::KeyQ, Key::Q), (KeyCode::KeyR, Key::R), (KeyCode::KeyS, Key::S), (KeyCode::KeyT, Key::T),
    (KeyCode::KeyU, Key::U), (KeyCode::KeyV, Key::V), (KeyCode::KeyW, Key::W), (KeyCode::KeyX, Key::X),
    (KeyCode::KeyY, Key::Y), (KeyCode::KeyZ, Key::Z),

    (KeyCode::Digit0, Key::Num0), (KeyCode::Digit1, Key::Num1), (KeyCode::Digit2, Key::Num2),
    (KeyCode::Digit3, Key::Num3), (KeyCode::Digit4, Key::Num4), (KeyCode::Digit5, Key::Num5),
    (KeyCode::Digit6, Key::Num6), (KeyCode::Digit7, Key::Num7), (KeyCode::Digit8, Key::Num8),
    (KeyCode::Digit9, Key::Num9),

    (KeyCode::F1, Key::F1), (KeyCode::F2, Key::F2), (KeyCode::F3, Key::F3), (KeyCode::F4, Key::F4),
    (KeyCode::F5, Key::F5), (KeyCode::F6, Key::F6), (KeyCode::F7, Key::F7), (KeyCode::F8, Key::F8),
    (KeyCode::F9, Key::F9), (KeyCode::F10, Key::F10), (KeyCode::F11, Key::F11), (KeyCode::F12, Key::F12),
];

/// Converts the input-related subset of winit's window events. Everything
/// else yields `None` and is left to the runtime.
pub(crate) fn translate_window_event(window: &Window, event: &WindowEvent) -> Option<InputEvent> {
    let ev = match event {
        WindowEvent::KeyboardInput { event, .. } => InputEvent::Key {
            key: map_key(event.physical_key),
            pressed: event.state == ElementState::Pressed,
            repeat: event.repeat,
        },
        WindowEvent::MouseInput { state, button, .. } => InputEvent::Button {
            button: map_mouse_button(*button),
            pressed: *state == ElementState::Pressed,
        },
        WindowEvent::CursorMoved { position, .. } => {
            InputEvent::PointerMoved(to_logical(window, *position))
        }
        WindowEvent::CursorLeft { .. } => InputEvent::PointerLeft,
        WindowEvent::MouseWheel { delta, .. } => InputEvent::Wheel(match delta {
            MouseScrollDelta::LineDelta(x, y) => Vec2::new(*x, *y) * WHEEL_LINE,
            MouseScrollDelta::PixelDelta(p) => to_logical(window, *p),
        }),
        WindowEvent::ModifiersChanged(m) => InputEvent::Modifiers(map_modifiers(m.state())),
        WindowEvent::Focused(focused) => InputEvent::Focus(*focused),
        _ => return None,
    };
    Some(ev)
}

fn to_logical(window: &Window, pos: PhysicalPosition<f64>) -> Vec2 {
    let logical = pos.to_logical::<f64>(window.scale_factor());
    Vec2::new(logical.x as f32, logical.y as f32)
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        logo: m.super_key(),
    }
}

fn map_mouse_button(b: WinitButton) -> MouseButton {
    match b {
        WinitButton::Left => MouseButton::Left,
        WinitButton::Right => MouseButton::Right,
        WinitButton::Middle => MouseButton::Middle,
        WinitButton::Back => MouseButton::Other(3),
        WinitButton::Forward => MouseButton::Other(4),
        WinitButton::Other(n) => MouseButton::Other(n),
    }
}

fn map_key(pk: PhysicalKey) -> Key {
    match pk {
        PhysicalKey::Code(code) => KEY_TABLE
            .iter()
            .find(|(c, _)| *c == code)
            .map_or(Key::Other(code as u32), |&(_, key)| key),
        PhysicalKey::Unidentified(_) => Key::Other(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_keys_map_through_the_table() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyW)), Key::W);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Digit7)), Key::Num7);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ArrowLeft)), Key::Left);
    }

    #[test]
    fn left_and_right_modifiers_collapse() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ShiftLeft)), Key::Shift);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ShiftRight)), Key::Shift);
    }

    #[test]
    fn unnamed_codes_keep_their_platform_code() {
        assert_eq!(
            map_key(PhysicalKey::Code(KeyCode::NumLock)),
            Key::Other(KeyCode::NumLock as u32)
        );
    }

    #[test]
    fn table_has_no_duplicate_codes() {
        for (i, (code, _)) in KEY_TABLE.iter().enumerate() {
            assert!(!KEY_TABLE[i + 1..].iter().any(|(c, _)| c == code), "{code:?}");
        }
    }

    #[test]
    fn modifier_state_maps_field_by_field() {
        let m = map_modifiers(ModifiersState::SHIFT | ModifiersState::SUPER);
        assert_eq!(m, Modifiers { shift: true, ctrl: false, alt: false, logo: true });
    }

    #[test]
    fn extra_mouse_buttons_become_numbered() {
        assert_eq!(map_mouse_button(WinitButton::Left), MouseButton::Left);
        assert_eq!(map_mouse_button(WinitButton::Back), MouseButton::Other(3));
        assert_eq!(map_mouse_button(WinitButton::Other(9)), MouseButton::Other(9));
    }
}
