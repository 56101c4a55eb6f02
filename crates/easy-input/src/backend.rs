//! Gamepad polling backends

use crate::gamepad::RawGamepadState;
use easy_core::Result;

/// Number of gamepad slots a backend can expose
pub const MAX_GAMEPADS: u8 = 4;

/// Pull-model source of raw gamepad snapshots.
///
/// `poll` returns `Ok(None)` when nothing is connected in the slot. An error
/// is treated by callers as "not connected this frame".
pub trait GamepadBackend {
    fn poll(&mut self, slot: u8) -> Result<Option<RawGamepadState>>;

    /// Set rumble motor speeds in `[0, 1]`
    fn set_vibration(&mut self, _slot: u8, _left: f32, _right: f32) -> Result<()> {
        Ok(())
    }
}

/// Backend with nothing plugged in
#[derive(Debug, Default, Clone, Copy)]
pub struct NullGamepadBackend;

impl GamepadBackend for NullGamepadBackend {
    fn poll(&mut self, _slot: u8) -> Result<Option<RawGamepadState>> {
        Ok(None)
    }
}
