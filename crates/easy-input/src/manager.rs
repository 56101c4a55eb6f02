//! Input device registry

use crate::backend::{GamepadBackend, MAX_GAMEPADS};
use crate::gamepad::GamepadDevice;
use crate::key::{KeyMessage, KeyStateQuery};
use crate::keyboard::Keyboard;
use easy_core::{EngineError, Result};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Kind of device, with the slot for gamepads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeviceType {
    Keyboard,
    Gamepad(u8),
}

enum Device {
    Keyboard(Rc<RefCell<Keyboard>>),
    Gamepad(Rc<RefCell<GamepadDevice>>),
}

/// Owns at most one device per [`DeviceType`] and refreshes them once per frame.
///
/// Devices are shared as `Rc<RefCell<_>>` so controllers can read their state;
/// controllers keep only weak references, so removing a device here ends its
/// lifetime.
pub struct InputManager {
    devices: BTreeMap<DeviceType, Device>,
    backend: Box<dyn GamepadBackend>,
}

impl InputManager {
    pub fn new(backend: Box<dyn GamepadBackend>) -> Self {
        Self {
            devices: BTreeMap::new(),
            backend,
        }
    }

    /// Create the device for `ty` unless it already exists
    pub fn create_device(&mut self, ty: DeviceType) -> Result<()> {
        if self.devices.contains_key(&ty) {
            return Ok(());
        }

        let device = match ty {
            DeviceType::Keyboard => Device::Keyboard(Rc::new(RefCell::new(Keyboard::new()))),
            DeviceType::Gamepad(slot) if slot < MAX_GAMEPADS => {
                Device::Gamepad(Rc::new(RefCell::new(GamepadDevice::new(slot))))
            }
            DeviceType::Gamepad(slot) => {
                return Err(EngineError::DeviceCreation(format!(
                    "gamepad slot {slot} is out of range (max {MAX_GAMEPADS})"
                )));
            }
        };

        log::info!("Created input device {ty:?}");
        self.devices.insert(ty, device);
        Ok(())
    }

    /// Drop the device for `ty`. Returns false if there was none.
    pub fn remove_device(&mut self, ty: DeviceType) -> bool {
        let removed = self.devices.remove(&ty).is_some();
        if removed {
            log::info!("Removed input device {ty:?}");
        }
        removed
    }

    pub fn has_device(&self, ty: DeviceType) -> bool {
        self.devices.contains_key(&ty)
    }

    pub fn keyboard(&self) -> Option<Rc<RefCell<Keyboard>>> {
        match self.devices.get(&DeviceType::Keyboard) {
            Some(Device::Keyboard(keyboard)) => Some(keyboard.clone()),
            _ => None,
        }
    }

    pub fn gamepad(&self, slot: u8) -> Option<Rc<RefCell<GamepadDevice>>> {
        match self.devices.get(&DeviceType::Gamepad(slot)) {
            Some(Device::Gamepad(gamepad)) => Some(gamepad.clone()),
            _ => None,
        }
    }

    /// Forward a platform key message to the keyboard, if one exists
    pub fn process_key_event(
        &self,
        message: KeyMessage,
        code: u8,
        extra: isize,
        live: &dyn KeyStateQuery,
    ) {
        if let Some(Device::Keyboard(keyboard)) = self.devices.get(&DeviceType::Keyboard) {
            keyboard.borrow_mut().process_event(message, code, extra, live);
        }
    }

    /// The window lost focus: treat every key as released
    pub fn focus_lost(&self) {
        if let Some(Device::Keyboard(keyboard)) = self.devices.get(&DeviceType::Keyboard) {
            keyboard.borrow_mut().release_all();
        }
    }

    /// Refresh every device. Call once per frame, before controllers run.
    pub fn update(&mut self) {
        for device in self.devices.values() {
            match device {
                Device::Keyboard(keyboard) => keyboard.borrow_mut().update(),
                Device::Gamepad(gamepad) => gamepad.borrow_mut().poll(self.backend.as_mut()),
            }
        }
    }

    /// Set rumble speeds for a gamepad slot
    pub fn set_vibration(&mut self, slot: u8, left: f32, right: f32) -> Result<()> {
        if !self.has_device(DeviceType::Gamepad(slot)) {
            return Err(EngineError::InvalidOperation(format!(
                "no gamepad device in slot {slot}"
            )));
        }
        self.backend
            .set_vibration(slot, left.clamp(0.0, 1.0), right.clamp(0.0, 1.0))
    }

    /// Drop every device
    pub fn clear(&mut self) {
        self.devices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flag::InputFlag;
    use crate::gamepad::{GamepadButton, RawGamepadState};
    use crate::key::{vk, Key};
    use std::collections::HashMap;

    #[derive(Default)]
    struct ScriptedBackend {
        states: Rc<RefCell<HashMap<u8, RawGamepadState>>>,
        vibration: Rc<RefCell<Vec<(u8, f32, f32)>>>,
    }

    impl GamepadBackend for ScriptedBackend {
        fn poll(&mut self, slot: u8) -> Result<Option<RawGamepadState>> {
            Ok(self.states.borrow().get(&slot).copied())
        }

        fn set_vibration(&mut self, slot: u8, left: f32, right: f32) -> Result<()> {
            self.vibration.borrow_mut().push((slot, left, right));
            Ok(())
        }
    }

    fn no_keys(_: u8) -> bool {
        false
    }

    #[test]
    fn test_create_is_idempotent() {
        let mut input = InputManager::new(Box::new(ScriptedBackend::default()));
        input.create_device(DeviceType::Keyboard).unwrap();
        let first = input.keyboard().unwrap();
        input.create_device(DeviceType::Keyboard).unwrap();
        let second = input.keyboard().unwrap();

        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_gamepad_slot_out_of_range() {
        let mut input = InputManager::new(Box::new(ScriptedBackend::default()));
        let result = input.create_device(DeviceType::Gamepad(MAX_GAMEPADS));
        assert!(matches!(result, Err(EngineError::DeviceCreation(_))));
        assert!(!input.has_device(DeviceType::Gamepad(MAX_GAMEPADS)));
    }

    #[test]
    fn test_update_refreshes_keyboard() {
        let mut input = InputManager::new(Box::new(ScriptedBackend::default()));
        input.create_device(DeviceType::Keyboard).unwrap();

        input.process_key_event(KeyMessage::KeyDown, vk::J, 0, &no_keys);
        input.update();
        assert_eq!(input.keyboard().unwrap().borrow().state(Key::J), InputFlag::Down);

        input.focus_lost();
        input.update();
        assert_eq!(input.keyboard().unwrap().borrow().state(Key::J), InputFlag::Up);
    }

    #[test]
    fn test_update_polls_gamepads() {
        let backend = ScriptedBackend::default();
        let states = backend.states.clone();
        let mut input = InputManager::new(Box::new(backend));
        input.create_device(DeviceType::Gamepad(0)).unwrap();
        input.create_device(DeviceType::Gamepad(1)).unwrap();

        states.borrow_mut().insert(
            1,
            RawGamepadState {
                packet: 1,
                ..Default::default()
            }
            .with_button(GamepadButton::Start),
        );
        input.update();

        let pad0 = input.gamepad(0).unwrap();
        let pad1 = input.gamepad(1).unwrap();
        assert!(!pad0.borrow().is_connected());
        assert!(pad1.borrow().is_connected());
        assert_eq!(pad1.borrow().button(GamepadButton::Start), InputFlag::Down);
    }

    #[test]
    fn test_removed_device_is_released() {
        let mut input = InputManager::new(Box::new(ScriptedBackend::default()));
        input.create_device(DeviceType::Keyboard).unwrap();
        let weak = Rc::downgrade(&input.keyboard().unwrap());

        assert!(input.remove_device(DeviceType::Keyboard));
        assert!(weak.upgrade().is_none());
        assert!(!input.remove_device(DeviceType::Keyboard));
    }

    #[test]
    fn test_vibration_is_clamped_and_forwarded() {
        let backend = ScriptedBackend::default();
        let vibration = backend.vibration.clone();
        let mut input = InputManager::new(Box::new(backend));

        assert!(input.set_vibration(0, 1.0, 1.0).is_err());

        input.create_device(DeviceType::Gamepad(0)).unwrap();
        input.set_vibration(0, 2.0, -1.0).unwrap();
        assert_eq!(*vibration.borrow(), vec![(0, 1.0, 0.0)]);
    }
}
