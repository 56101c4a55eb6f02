//! Input-to-action dispatch
//!
//! A [`Controller`] pairs a weakly-held target object with a dispatch scheme.
//! The scheme owns a table of handlers keyed by key or button ordinal and
//! a weak reference to the device it reads. Each [`Controller::run`] reads
//! the device's current state and calls every bound handler on the target.
//!
//! Handlers are plain function pointers, so a method such as
//! `fn jump(&mut self, flag: InputFlag)` can be mapped as `Player::jump`.
//! Each input category has its own handler signature, checked at compile time.

use crate::flag::InputFlag;
use crate::gamepad::{GamepadButton, GamepadDevice, Stick, Trigger};
use crate::key::Key;
use crate::keyboard::Keyboard;
use easy_core::{EngineError, Result};
use easy_runtime::priority;
use easy_runtime::{TaskHandle, UpdateManager};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub type ButtonHandler<T> = fn(&mut T, InputFlag);
pub type TriggerHandler<T> = fn(&mut T, f32);
pub type StickHandler<T> = fn(&mut T, f32, f32);

/// Device-specific dispatch strategy
pub trait Dispatch<T> {
    /// Call every bound handler on `target` with the device's current state
    fn dispatch(&self, target: &mut T);
}

/// Dispatches a device's state to a target object once per frame.
///
/// Neither the target nor the device is owned by the controller.
pub struct Controller<T, S> {
    target: Option<Weak<RefCell<T>>>,
    scheme: S,
}

pub type KeyboardController<T> = Controller<T, KeyboardBindings<T>>;
pub type GamepadController<T> = Controller<T, GamepadBindings<T>>;

impl<T, S: Dispatch<T>> Controller<T, S> {
    pub fn with_scheme(scheme: S) -> Self {
        Self {
            target: None,
            scheme,
        }
    }

    /// Change the object that receives calls. The mapping table is kept.
    pub fn reset_target(&mut self, target: Option<&Rc<RefCell<T>>>) {
        self.target = target.map(Rc::downgrade);
    }

    /// The bound target, if it is still alive
    pub fn target(&self) -> Option<Rc<RefCell<T>>> {
        self.target.as_ref().and_then(Weak::upgrade)
    }

    pub fn scheme(&self) -> &S {
        &self.scheme
    }

    /// Call `f` on the target
    pub fn invoke<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let target = self.target().ok_or(EngineError::InvalidTarget)?;
        let mut target = target.try_borrow_mut().map_err(|_| {
            EngineError::InvalidOperation("controller target is already borrowed".into())
        })?;
        Ok(f(&mut target))
    }

    /// Dispatch the device state to the target. Does nothing without a target.
    pub fn run(&self) {
        let Some(target) = self.target() else {
            return;
        };
        let Ok(mut target) = target.try_borrow_mut() else {
            log::warn!(
                "Skipping input dispatch to {}: target is already borrowed",
                std::any::type_name::<T>()
            );
            return;
        };
        self.scheme.dispatch(&mut target);
    }

    /// [`run`](Self::run) with the update-task signature
    pub fn update(&mut self, _dt: f64) {
        self.run();
    }
}

impl<T: 'static, S: Dispatch<T> + 'static> Controller<T, S> {
    /// Schedule this controller on `updates` at the input priority
    pub fn register(controller: &Rc<RefCell<Self>>, updates: &UpdateManager) -> TaskHandle {
        updates.register_task_with_priority(controller, Self::update, priority::INPUT)
    }
}

/// Keyboard dispatch table
pub struct KeyboardBindings<T> {
    keyboard: Option<Weak<RefCell<Keyboard>>>,
    handlers: [Option<ButtonHandler<T>>; Key::COUNT],
}

impl<T> Default for KeyboardBindings<T> {
    fn default() -> Self {
        Self {
            keyboard: None,
            handlers: [None; Key::COUNT],
        }
    }
}

impl<T> Dispatch<T> for KeyboardBindings<T> {
    fn dispatch(&self, target: &mut T) {
        let Some(keyboard) = self.keyboard.as_ref().and_then(Weak::upgrade) else {
            return;
        };
        let states = *keyboard.borrow().states();

        for key in Key::ALL {
            if let Some(handler) = self.handlers[key.index()] {
                handler(target, states[key.index()]);
            }
        }
    }
}

impl<T> KeyboardController<T> {
    pub fn new() -> Self {
        Self::with_scheme(KeyboardBindings::default())
    }

    /// Read state from `keyboard` from now on (or from nothing)
    pub fn reset_keyboard(&mut self, keyboard: Option<&Rc<RefCell<Keyboard>>>) {
        self.scheme.keyboard = keyboard.map(Rc::downgrade);
    }

    /// Bind `handler` to `key`, replacing any previous binding
    pub fn map(&mut self, key: Key, handler: ButtonHandler<T>) -> &mut Self {
        self.scheme.handlers[key.index()] = Some(handler);
        self
    }

    pub fn unmap(&mut self, key: Key) -> &mut Self {
        self.scheme.handlers[key.index()] = None;
        self
    }

    pub fn is_mapped(&self, key: Key) -> bool {
        self.scheme.handlers[key.index()].is_some()
    }
}

impl<T> Default for KeyboardController<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Any gamepad input that can carry a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadInput {
    Button(GamepadButton),
    Trigger(Trigger),
    Stick(Stick),
}

impl From<GamepadButton> for GamepadInput {
    fn from(button: GamepadButton) -> Self {
        GamepadInput::Button(button)
    }
}

impl From<Trigger> for GamepadInput {
    fn from(trigger: Trigger) -> Self {
        GamepadInput::Trigger(trigger)
    }
}

impl From<Stick> for GamepadInput {
    fn from(stick: Stick) -> Self {
        GamepadInput::Stick(stick)
    }
}

/// Gamepad dispatch tables, one per input category
pub struct GamepadBindings<T> {
    gamepad: Option<Weak<RefCell<GamepadDevice>>>,
    buttons: [Option<ButtonHandler<T>>; GamepadButton::COUNT],
    triggers: [Option<TriggerHandler<T>>; 2],
    sticks: [Option<StickHandler<T>>; 2],
}

impl<T> Default for GamepadBindings<T> {
    fn default() -> Self {
        Self {
            gamepad: None,
            buttons: [None; GamepadButton::COUNT],
            triggers: [None; 2],
            sticks: [None; 2],
        }
    }
}

impl<T> Dispatch<T> for GamepadBindings<T> {
    fn dispatch(&self, target: &mut T) {
        let Some(gamepad) = self.gamepad.as_ref().and_then(Weak::upgrade) else {
            return;
        };
        let pad = gamepad.borrow().clone();

        for button in GamepadButton::ALL {
            if let Some(handler) = self.buttons[button.index()] {
                handler(target, pad.button(button));
            }
        }
        for trigger in Trigger::ALL {
            if let Some(handler) = self.triggers[trigger.index()] {
                handler(target, pad.trigger(trigger));
            }
        }
        for stick in Stick::ALL {
            if let Some(handler) = self.sticks[stick.index()] {
                let (x, y) = pad.stick(stick);
                handler(target, x, y);
            }
        }
    }
}

impl<T> GamepadController<T> {
    pub fn new() -> Self {
        Self::with_scheme(GamepadBindings::default())
    }

    /// Read state from `gamepad` from now on (or from nothing)
    pub fn reset_gamepad(&mut self, gamepad: Option<&Rc<RefCell<GamepadDevice>>>) {
        self.scheme.gamepad = gamepad.map(Rc::downgrade);
    }

    pub fn map(&mut self, button: GamepadButton, handler: ButtonHandler<T>) -> &mut Self {
        self.scheme.buttons[button.index()] = Some(handler);
        self
    }

    pub fn map_trigger(&mut self, trigger: Trigger, handler: TriggerHandler<T>) -> &mut Self {
        self.scheme.triggers[trigger.index()] = Some(handler);
        self
    }

    pub fn map_stick(&mut self, stick: Stick, handler: StickHandler<T>) -> &mut Self {
        self.scheme.sticks[stick.index()] = Some(handler);
        self
    }

    /// Clear the binding of any input category
    pub fn unmap(&mut self, input: impl Into<GamepadInput>) -> &mut Self {
        match input.into() {
            GamepadInput::Button(button) => self.scheme.buttons[button.index()] = None,
            GamepadInput::Trigger(trigger) => self.scheme.triggers[trigger.index()] = None,
            GamepadInput::Stick(stick) => self.scheme.sticks[stick.index()] = None,
        }
        self
    }

    pub fn is_mapped(&self, input: impl Into<GamepadInput>) -> bool {
        match input.into() {
            GamepadInput::Button(button) => self.scheme.buttons[button.index()].is_some(),
            GamepadInput::Trigger(trigger) => self.scheme.triggers[trigger.index()].is_some(),
            GamepadInput::Stick(stick) => self.scheme.sticks[stick.index()].is_some(),
        }
    }
}

impl<T> Default for GamepadController<T> {
    fn default() -> Self {
        Self::new()
    }
}
