//! Four-state edge-triggered input flag

/// State of one key or button between two consecutive device updates.
///
/// The discriminants form a small bitset: bit 0 is `Input` (held), bit 1 is
/// `Down` (pressed this frame) and bit 2 is `Up` (released this frame).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputFlag {
    /// Not pressed on either side of the update
    #[default]
    NoInput = 0,
    /// Held since before the previous update
    Input = 1 << 0,
    /// Pressed since the previous update
    Down = 1 << 1,
    /// Released since the previous update
    Up = 1 << 2,
}

impl InputFlag {
    /// Classify a key from its previous and current raw bit
    pub const fn classify(was_down: bool, is_down: bool) -> Self {
        match (was_down, is_down) {
            (false, false) => InputFlag::NoInput,
            (true, true) => InputFlag::Input,
            (false, true) => InputFlag::Down,
            (true, false) => InputFlag::Up,
        }
    }

    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Held or pressed this frame
    pub const fn is_pressed(self) -> bool {
        matches!(self, InputFlag::Input | InputFlag::Down)
    }

    /// Drop the edge: `Down` becomes `Input`, `Up` becomes `NoInput`
    pub const fn collapse(self) -> Self {
        match self {
            InputFlag::Down | InputFlag::Input => InputFlag::Input,
            InputFlag::Up | InputFlag::NoInput => InputFlag::NoInput,
        }
    }
}
