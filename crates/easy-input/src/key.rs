//! Keyboard keys, virtual key codes and platform key messages

/// Virtual key codes as delivered by the platform message pump.
///
/// Values follow the Win32 virtual-key table. `SHIFT`, `CONTROL` and `MENU`
/// are the generic codes sent for either side of the keyboard; the `L*`/`R*`
/// variants name one physical key.
pub mod vk {
    pub const BACK: u8 = 0x08;
    pub const TAB: u8 = 0x09;
    pub const RETURN: u8 = 0x0D;
    pub const SHIFT: u8 = 0x10;
    pub const CONTROL: u8 = 0x11;
    pub const MENU: u8 = 0x12;
    pub const PAUSE: u8 = 0x13;
    pub const CAPITAL: u8 = 0x14;
    pub const ESCAPE: u8 = 0x1B;
    pub const SPACE: u8 = 0x20;
    pub const PRIOR: u8 = 0x21;
    pub const NEXT: u8 = 0x22;
    pub const END: u8 = 0x23;
    pub const HOME: u8 = 0x24;
    pub const LEFT: u8 = 0x25;
    pub const UP: u8 = 0x26;
    pub const RIGHT: u8 = 0x27;
    pub const DOWN: u8 = 0x28;
    pub const INSERT: u8 = 0x2D;
    pub const DELETE: u8 = 0x2E;

    pub const KEY_0: u8 = 0x30;
    pub const KEY_1: u8 = 0x31;
    pub const KEY_2: u8 = 0x32;
    pub const KEY_3: u8 = 0x33;
    pub const KEY_4: u8 = 0x34;
    pub const KEY_5: u8 = 0x35;
    pub const KEY_6: u8 = 0x36;
    pub const KEY_7: u8 = 0x37;
    pub const KEY_8: u8 = 0x38;
    pub const KEY_9: u8 = 0x39;

    pub const A: u8 = 0x41;
    pub const B: u8 = 0x42;
    pub const C: u8 = 0x43;
    pub const D: u8 = 0x44;
    pub const E: u8 = 0x45;
    pub const F: u8 = 0x46;
    pub const G: u8 = 0x47;
    pub const H: u8 = 0x48;
    pub const I: u8 = 0x49;
    pub const J: u8 = 0x4A;
    pub const K: u8 = 0x4B;
    pub const L: u8 = 0x4C;
    pub const M: u8 = 0x4D;
    pub const N: u8 = 0x4E;
    pub const O: u8 = 0x4F;
    pub const P: u8 = 0x50;
    pub const Q: u8 = 0x51;
    pub const R: u8 = 0x52;
    pub const S: u8 = 0x53;
    pub const T: u8 = 0x54;
    pub const U: u8 = 0x55;
    pub const V: u8 = 0x56;
    pub const W: u8 = 0x57;
    pub const X: u8 = 0x58;
    pub const Y: u8 = 0x59;
    pub const Z: u8 = 0x5A;

    pub const NUMPAD0: u8 = 0x60;
    pub const NUMPAD1: u8 = 0x61;
    pub const NUMPAD2: u8 = 0x62;
    pub const NUMPAD3: u8 = 0x63;
    pub const NUMPAD4: u8 = 0x64;
    pub const NUMPAD5: u8 = 0x65;
    pub const NUMPAD6: u8 = 0x66;
    pub const NUMPAD7: u8 = 0x67;
    pub const NUMPAD8: u8 = 0x68;
    pub const NUMPAD9: u8 = 0x69;
    pub const MULTIPLY: u8 = 0x6A;
    pub const ADD: u8 = 0x6B;
    pub const SUBTRACT: u8 = 0x6D;
    pub const DECIMAL: u8 = 0x6E;
    pub const DIVIDE: u8 = 0x6F;

    pub const F1: u8 = 0x70;
    pub const F2: u8 = 0x71;
    pub const F3: u8 = 0x72;
    pub const F4: u8 = 0x73;
    pub const F5: u8 = 0x74;
    pub const F6: u8 = 0x75;
    pub const F7: u8 = 0x76;
    pub const F8: u8 = 0x77;
    pub const F9: u8 = 0x78;
    pub const F10: u8 = 0x79;
    pub const F11: u8 = 0x7A;
    pub const F12: u8 = 0x7B;

    pub const LSHIFT: u8 = 0xA0;
    pub const RSHIFT: u8 = 0xA1;
    pub const LCONTROL: u8 = 0xA2;
    pub const RCONTROL: u8 = 0xA3;
    pub const LMENU: u8 = 0xA4;
    pub const RMENU: u8 = 0xA5;

    pub const OEM_1: u8 = 0xBA;
    pub const OEM_PLUS: u8 = 0xBB;
    pub const OEM_COMMA: u8 = 0xBC;
    pub const OEM_MINUS: u8 = 0xBD;
    pub const OEM_PERIOD: u8 = 0xBE;
    pub const OEM_2: u8 = 0xBF;
    pub const OEM_3: u8 = 0xC0;
    pub const OEM_4: u8 = 0xDB;
    pub const OEM_5: u8 = 0xDC;
    pub const OEM_6: u8 = 0xDD;
    pub const OEM_7: u8 = 0xDE;
}

macro_rules! define_keys {
    ($($name:ident = $code:expr,)*) => {
        /// A tracked keyboard key.
        ///
        /// Keys have a dense ordinal (`index()`) used to address per-key state
        /// and dispatch tables. Left and right modifiers are distinct keys.
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Key {
            $($name,)*
        }

        impl Key {
            /// Every tracked key in ordinal order
            pub const ALL: &'static [Key] = &[$(Key::$name,)*];

            /// Number of tracked keys
            pub const COUNT: usize = Key::ALL.len();

            /// Virtual key code of this key
            pub const fn vk(self) -> u8 {
                match self {
                    $(Key::$name => $code,)*
                }
            }
        }
    };
}

define_keys! {
    Backspace = vk::BACK,
    Tab = vk::TAB,
    Enter = vk::RETURN,
    Pause = vk::PAUSE,
    CapsLock = vk::CAPITAL,
    Escape = vk::ESCAPE,
    Space = vk::SPACE,
    PageUp = vk::PRIOR,
    PageDown = vk::NEXT,
    End = vk::END,
    Home = vk::HOME,
    Left = vk::LEFT,
    Up = vk::UP,
    Right = vk::RIGHT,
    Down = vk::DOWN,
    Insert = vk::INSERT,
    Delete = vk::DELETE,

    Digit0 = vk::KEY_0,
    Digit1 = vk::KEY_1,
    Digit2 = vk::KEY_2,
    Digit3 = vk::KEY_3,
    Digit4 = vk::KEY_4,
    Digit5 = vk::KEY_5,
    Digit6 = vk::KEY_6,
    Digit7 = vk::KEY_7,
    Digit8 = vk::KEY_8,
    Digit9 = vk::KEY_9,

    A = vk::A,
    B = vk::B,
    C = vk::C,
    D = vk::D,
    E = vk::E,
    F = vk::F,
    G = vk::G,
    H = vk::H,
    I = vk::I,
    J = vk::J,
    K = vk::K,
    L = vk::L,
    M = vk::M,
    N = vk::N,
    O = vk::O,
    P = vk::P,
    Q = vk::Q,
    R = vk::R,
    S = vk::S,
    T = vk::T,
    U = vk::U,
    V = vk::V,
    W = vk::W,
    X = vk::X,
    Y = vk::Y,
    Z = vk::Z,

    Numpad0 = vk::NUMPAD0,
    Numpad1 = vk::NUMPAD1,
    Numpad2 = vk::NUMPAD2,
    Numpad3 = vk::NUMPAD3,
    Numpad4 = vk::NUMPAD4,
    Numpad5 = vk::NUMPAD5,
    Numpad6 = vk::NUMPAD6,
    Numpad7 = vk::NUMPAD7,
    Numpad8 = vk::NUMPAD8,
    Numpad9 = vk::NUMPAD9,
    NumpadMultiply = vk::MULTIPLY,
    NumpadAdd = vk::ADD,
    NumpadSubtract = vk::SUBTRACT,
    NumpadDecimal = vk::DECIMAL,
    NumpadDivide = vk::DIVIDE,

    F1 = vk::F1,
    F2 = vk::F2,
    F3 = vk::F3,
    F4 = vk::F4,
    F5 = vk::F5,
    F6 = vk::F6,
    F7 = vk::F7,
    F8 = vk::F8,
    F9 = vk::F9,
    F10 = vk::F10,
    F11 = vk::F11,
    F12 = vk::F12,

    LeftShift = vk::LSHIFT,
    RightShift = vk::RSHIFT,
    LeftControl = vk::LCONTROL,
    RightControl = vk::RCONTROL,
    LeftAlt = vk::LMENU,
    RightAlt = vk::RMENU,

    Semicolon = vk::OEM_1,
    Equal = vk::OEM_PLUS,
    Comma = vk::OEM_COMMA,
    Minus = vk::OEM_MINUS,
    Period = vk::OEM_PERIOD,
    Slash = vk::OEM_2,
    Backquote = vk::OEM_3,
    BracketLeft = vk::OEM_4,
    Backslash = vk::OEM_5,
    BracketRight = vk::OEM_6,
    Quote = vk::OEM_7,
}

/// Virtual key code to key lookup, built once at compile time
const VK_TABLE: [Option<Key>; 256] = {
    let mut table = [None; 256];
    let mut i = 0;
    while i < Key::COUNT {
        let key = Key::ALL[i];
        table[key.vk() as usize] = Some(key);
        i += 1;
    }
    table
};

impl Key {
    /// Dense ordinal of the key
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Key for a physical virtual key code.
    ///
    /// The generic `SHIFT`, `CONTROL` and `MENU` codes have no key of their
    /// own and return `None`.
    pub const fn from_vk(code: u8) -> Option<Key> {
        VK_TABLE[code as usize]
    }

    /// Left and right keys behind a generic modifier code
    pub const fn sides_of(code: u8) -> Option<(Key, Key)> {
        match code {
            vk::SHIFT => Some((Key::LeftShift, Key::RightShift)),
            vk::CONTROL => Some((Key::LeftControl, Key::RightControl)),
            vk::MENU => Some((Key::LeftAlt, Key::RightAlt)),
            _ => None,
        }
    }
}

/// Kind of keyboard message delivered by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMessage {
    KeyDown,
    KeyUp,
}

impl KeyMessage {
    pub const WM_KEYDOWN: u32 = 0x0100;
    pub const WM_KEYUP: u32 = 0x0101;
    pub const WM_SYSKEYDOWN: u32 = 0x0104;
    pub const WM_SYSKEYUP: u32 = 0x0105;

    /// Decode a raw window message id. System variants (sent while Alt is
    /// held) map onto the plain ones.
    pub fn from_raw(message: u32) -> Option<Self> {
        match message {
            Self::WM_KEYDOWN | Self::WM_SYSKEYDOWN => Some(KeyMessage::KeyDown),
            Self::WM_KEYUP | Self::WM_SYSKEYUP => Some(KeyMessage::KeyUp),
            _ => None,
        }
    }
}

/// Live hardware key state, queried when a generic modifier message
/// must be resolved to the physical key that fired it
pub trait KeyStateQuery {
    fn is_key_down(&self, code: u8) -> bool;
}

impl<F: Fn(u8) -> bool> KeyStateQuery for F {
    fn is_key_down(&self, code: u8) -> bool {
        self(code)
    }
}
