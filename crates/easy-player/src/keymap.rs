//! winit physical keys to virtual-key codes

use easy_input::vk;
use winit::keyboard::KeyCode;

/// Virtual-key code for a winit physical key.
///
/// Both sides of Shift, Control and Alt map to the generic code, the way
/// native key messages report them; the keyboard resolves the side from
/// live key state.
pub fn to_vk(code: KeyCode) -> Option<u8> {
    let vk = match code {
        KeyCode::Backspace => vk::BACK,
        KeyCode::Tab => vk::TAB,
        KeyCode::Enter | KeyCode::NumpadEnter => vk::RETURN,
        KeyCode::ShiftLeft | KeyCode::ShiftRight => vk::SHIFT,
        KeyCode::ControlLeft | KeyCode::ControlRight => vk::CONTROL,
        KeyCode::AltLeft | KeyCode::AltRight => vk::MENU,
        KeyCode::Pause => vk::PAUSE,
        KeyCode::CapsLock => vk::CAPITAL,
        KeyCode::Escape => vk::ESCAPE,
        KeyCode::Space => vk::SPACE,
        KeyCode::PageUp => vk::PRIOR,
        KeyCode::PageDown => vk::NEXT,
        KeyCode::End => vk::END,
        KeyCode::Home => vk::HOME,
        KeyCode::ArrowLeft => vk::LEFT,
        KeyCode::ArrowUp => vk::UP,
        KeyCode::ArrowRight => vk::RIGHT,
        KeyCode::ArrowDown => vk::DOWN,
        KeyCode::Insert => vk::INSERT,
        KeyCode::Delete => vk::DELETE,

        KeyCode::Digit0 => vk::KEY_0,
        KeyCode::Digit1 => vk::KEY_1,
        KeyCode::Digit2 => vk::KEY_2,
        KeyCode::Digit3 => vk::KEY_3,
        KeyCode::Digit4 => vk::KEY_4,
        KeyCode::Digit5 => vk::KEY_5,
        KeyCode::Digit6 => vk::KEY_6,
        KeyCode::Digit7 => vk::KEY_7,
        KeyCode::Digit8 => vk::KEY_8,
        KeyCode::Digit9 => vk::KEY_9,

        KeyCode::KeyA => vk::A,
        KeyCode::KeyB => vk::B,
        KeyCode::KeyC => vk::C,
        KeyCode::KeyD => vk::D,
        KeyCode::KeyE => vk::E,
        KeyCode::KeyF => vk::F,
        KeyCode::KeyG => vk::G,
        KeyCode::KeyH => vk::H,
        KeyCode::KeyI => vk::I,
        KeyCode::KeyJ => vk::J,
        KeyCode::KeyK => vk::K,
        KeyCode::KeyL => vk::L,
        KeyCode::KeyM => vk::M,
        KeyCode::KeyN => vk::N,
        KeyCode::KeyO => vk::O,
        KeyCode::KeyP => vk::P,
        KeyCode::KeyQ => vk::Q,
        KeyCode::KeyR => vk::R,
        KeyCode::KeyS => vk::S,
        KeyCode::KeyT => vk::T,
        KeyCode::KeyU => vk::U,
        KeyCode::KeyV => vk::V,
        KeyCode::KeyW => vk::W,
        KeyCode::KeyX => vk::X,
        KeyCode::KeyY => vk::Y,
        KeyCode::KeyZ => vk::Z,

        KeyCode::Numpad0 => vk::NUMPAD0,
        KeyCode::Numpad1 => vk::NUMPAD1,
        KeyCode::Numpad2 => vk::NUMPAD2,
        KeyCode::Numpad3 => vk::NUMPAD3,
        KeyCode::Numpad4 => vk::NUMPAD4,
        KeyCode::Numpad5 => vk::NUMPAD5,
        KeyCode::Numpad6 => vk::NUMPAD6,
        KeyCode::Numpad7 => vk::NUMPAD7,
        KeyCode::Numpad8 => vk::NUMPAD8,
        KeyCode::Numpad9 => vk::NUMPAD9,
        KeyCode::NumpadMultiply => vk::MULTIPLY,
        KeyCode::NumpadAdd => vk::ADD,
        KeyCode::NumpadSubtract => vk::SUBTRACT,
        KeyCode::NumpadDecimal => vk::DECIMAL,
        KeyCode::NumpadDivide => vk::DIVIDE,

        KeyCode::F1 => vk::F1,
        KeyCode::F2 => vk::F2,
        KeyCode::F3 => vk::F3,
        KeyCode::F4 => vk::F4,
        KeyCode::F5 => vk::F5,
        KeyCode::F6 => vk::F6,
        KeyCode::F7 => vk::F7,
        KeyCode::F8 => vk::F8,
        KeyCode::F9 => vk::F9,
        KeyCode::F10 => vk::F10,
        KeyCode::F11 => vk::F11,
        KeyCode::F12 => vk::F12,

        KeyCode::Semicolon => vk::OEM_1,
        KeyCode::Equal => vk::OEM_PLUS,
        KeyCode::Comma => vk::OEM_COMMA,
        KeyCode::Minus => vk::OEM_MINUS,
        KeyCode::Period => vk::OEM_PERIOD,
        KeyCode::Slash => vk::OEM_2,
        KeyCode::Backquote => vk::OEM_3,
        KeyCode::BracketLeft => vk::OEM_4,
        KeyCode::Backslash => vk::OEM_5,
        KeyCode::BracketRight => vk::OEM_6,
        KeyCode::Quote => vk::OEM_7,

        _ => return None,
    };
    Some(vk)
}

/// Side-specific virtual-key code for a winit modifier key
pub(crate) fn modifier_vk(code: KeyCode) -> Option<u8> {
    match code {
        KeyCode::ShiftLeft => Some(vk::LSHIFT),
        KeyCode::ShiftRight => Some(vk::RSHIFT),
        KeyCode::ControlLeft => Some(vk::LCONTROL),
        KeyCode::ControlRight => Some(vk::RCONTROL),
        KeyCode::AltLeft => Some(vk::LMENU),
        KeyCode::AltRight => Some(vk::RMENU),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easy_input::Key;

    #[test]
    fn test_letters_and_arrows() {
        assert_eq!(to_vk(KeyCode::KeyW), Some(vk::W));
        assert_eq!(to_vk(KeyCode::ArrowLeft), Some(vk::LEFT));
        assert_eq!(to_vk(KeyCode::MediaPlayPause), None);
    }

    #[test]
    fn test_modifiers_use_generic_codes() {
        assert_eq!(to_vk(KeyCode::ShiftRight), Some(vk::SHIFT));
        assert_eq!(to_vk(KeyCode::AltLeft), Some(vk::MENU));
        assert_eq!(modifier_vk(KeyCode::ShiftRight), Some(vk::RSHIFT));
        assert_eq!(modifier_vk(KeyCode::KeyA), None);
    }

    #[test]
    fn test_mapped_codes_are_tracked_keys() {
        let codes = [
            KeyCode::Space,
            KeyCode::Quote,
            KeyCode::Numpad5,
            KeyCode::F12,
            KeyCode::Digit7,
        ];
        for code in codes {
            let vk = to_vk(code).unwrap();
            assert!(Key::from_vk(vk).is_some(), "{code:?} maps to untracked {vk:#04x}");
        }
    }
}
