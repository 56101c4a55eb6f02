//! Easy Input - edge-triggered input state and controller dispatch
//!
//! Devices keep a `raw` and a `last` snapshot of their buttons. Every
//! `update()` classifies each button into an [`InputFlag`] by comparing the
//! two snapshots, then copies `raw` into `last`:
//! - `Keyboard` - raw state pushed by platform key messages
//! - `GamepadDevice` - raw state pulled from a [`GamepadBackend`] each frame
//! - `InputManager` - owns one instance per device type and refreshes them
//! - `KeyboardController` / `GamepadController` - call mapped handlers on a
//!   target object with the current per-key state

mod backend;
mod controller;
mod flag;
mod gamepad;
#[cfg(feature = "gamepad")]
mod gilrs_backend;
mod key;
mod keyboard;
mod manager;

pub use backend::{GamepadBackend, NullGamepadBackend, MAX_GAMEPADS};
pub use controller::{
    ButtonHandler, Controller, Dispatch, GamepadBindings, GamepadController, GamepadInput,
    KeyboardBindings, KeyboardController, StickHandler, TriggerHandler,
};
pub use flag::InputFlag;
pub use gamepad::{
    normalize_axis, normalize_trigger, GamepadButton, GamepadDevice, RawGamepadState, Stick,
    Trigger, DIRECTION_THRESHOLD, LEFT_THUMB_DEADZONE, RIGHT_THUMB_DEADZONE, TRIGGER_THRESHOLD,
};
#[cfg(feature = "gamepad")]
pub use gilrs_backend::GilrsBackend;
pub use key::{vk, Key, KeyMessage, KeyStateQuery};
pub use keyboard::Keyboard;
pub use manager::{DeviceType, InputManager};
