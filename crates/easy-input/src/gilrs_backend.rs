//! Cross-platform gamepad backend built on gilrs

use crate::backend::{GamepadBackend, MAX_GAMEPADS};
use crate::gamepad::{GamepadButton, RawGamepadState};
use easy_core::{EngineError, Result};
use gilrs::{Axis, Button, EventType, Gamepad, GamepadId, Gilrs};
use std::collections::HashMap;

const BUTTONS: [(Button, GamepadButton); 14] = [
    (Button::DPadUp, GamepadButton::DPadUp),
    (Button::DPadDown, GamepadButton::DPadDown),
    (Button::DPadLeft, GamepadButton::DPadLeft),
    (Button::DPadRight, GamepadButton::DPadRight),
    (Button::Start, GamepadButton::Start),
    (Button::Select, GamepadButton::Back),
    (Button::LeftThumb, GamepadButton::LeftThumb),
    (Button::RightThumb, GamepadButton::RightThumb),
    (Button::LeftTrigger, GamepadButton::LeftShoulder),
    (Button::RightTrigger, GamepadButton::RightShoulder),
    (Button::South, GamepadButton::A),
    (Button::East, GamepadButton::B),
    (Button::West, GamepadButton::X),
    (Button::North, GamepadButton::Y),
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Slot<I> {
    Free,
    Taken(I),
    /// Released but not yet reported empty
    Vacated,
}

/// Stable slot assignment for connected pads.
///
/// A pad keeps its slot until it disconnects. A released slot is reported
/// empty at least once before another pad may claim it, so the device in
/// that slot resets instead of mixing two pads' state.
#[derive(Debug)]
struct SlotTable<I> {
    slots: [Slot<I>; MAX_GAMEPADS as usize],
}

impl<I: Copy + PartialEq> SlotTable<I> {
    fn new() -> Self {
        Self {
            slots: [Slot::Free; MAX_GAMEPADS as usize],
        }
    }

    /// Slot held by `id`, claiming the lowest free one if it has none
    fn claim(&mut self, id: I) -> Option<u8> {
        if let Some(slot) = self.slot_of(id) {
            return Some(slot);
        }
        let index = self.slots.iter().position(|s| *s == Slot::Free)?;
        self.slots[index] = Slot::Taken(id);
        u8::try_from(index).ok()
    }

    fn release(&mut self, id: I) -> Option<u8> {
        let slot = self.slot_of(id)?;
        self.slots[usize::from(slot)] = Slot::Vacated;
        Some(slot)
    }

    fn slot_of(&self, id: I) -> Option<u8> {
        self.slots
            .iter()
            .position(|s| *s == Slot::Taken(id))
            .and_then(|index| u8::try_from(index).ok())
    }

    /// Pad in `slot`; a vacated slot reads empty once and becomes free
    fn occupant(&mut self, slot: u8) -> Option<I> {
        let entry = self.slots.get_mut(usize::from(slot))?;
        match *entry {
            Slot::Taken(id) => Some(id),
            Slot::Vacated => {
                *entry = Slot::Free;
                None
            }
            Slot::Free => None,
        }
    }
}

/// Exposes connected gilrs gamepads as slots.
///
/// A pad takes the lowest free slot when it connects and keeps it until it
/// disconnects. Gilrs is event driven, so every event for a gamepad bumps
/// that gamepad's packet number. Snapshots of an idle pad therefore repeat
/// their packet.
pub struct GilrsBackend {
    gilrs: Gilrs,
    packets: HashMap<GamepadId, u32>,
    slots: SlotTable<GamepadId>,
}

impl GilrsBackend {
    pub fn new() -> Result<Self> {
        let gilrs = Gilrs::new()
            .map_err(|e| EngineError::DeviceCreation(format!("gamepad support: {e}")))?;
        let mut slots = SlotTable::new();
        for (id, gamepad) in gilrs.gamepads() {
            match slots.claim(id) {
                Some(slot) => log::info!("Found gamepad {id} in slot {slot}: {}", gamepad.name()),
                None => log::warn!("Found gamepad {id} but every slot is taken"),
            }
        }
        Ok(Self {
            gilrs,
            packets: HashMap::new(),
            slots,
        })
    }

    /// Give a slot to any connected pad that lacks one
    fn assign_slots(&mut self) {
        for (id, gamepad) in self.gilrs.gamepads() {
            if self.slots.slot_of(id).is_none() {
                if let Some(slot) = self.slots.claim(id) {
                    log::info!("Gamepad {id} ({}) assigned slot {slot}", gamepad.name());
                }
            }
        }
    }

    fn drain_events(&mut self) {
        while let Some(event) = self.gilrs.next_event() {
            match event.event {
                EventType::Connected => log::info!("Gamepad {} connected", event.id),
                EventType::Disconnected => {
                    let slot = self.slots.release(event.id);
                    log::info!("Gamepad {} disconnected from slot {slot:?}", event.id);
                    self.packets.remove(&event.id);
                    continue;
                }
                _ => {}
            }
            let packet = self.packets.entry(event.id).or_insert(0);
            *packet = packet.wrapping_add(1);
        }
    }

    fn snapshot(gamepad: &Gamepad<'_>, packet: u32) -> RawGamepadState {
        let mut state = RawGamepadState {
            packet,
            left_trigger: trigger_to_raw(gamepad, Button::LeftTrigger2),
            right_trigger: trigger_to_raw(gamepad, Button::RightTrigger2),
            thumb_lx: axis_to_raw(gamepad.value(Axis::LeftStickX)),
            thumb_ly: axis_to_raw(gamepad.value(Axis::LeftStickY)),
            thumb_rx: axis_to_raw(gamepad.value(Axis::RightStickX)),
            thumb_ry: axis_to_raw(gamepad.value(Axis::RightStickY)),
            ..Default::default()
        };
        for (button, mapped) in BUTTONS {
            if gamepad.is_pressed(button) {
                state = state.with_button(mapped);
            }
        }
        state
    }
}

impl GamepadBackend for GilrsBackend {
    fn poll(&mut self, slot: u8) -> Result<Option<RawGamepadState>> {
        self.drain_events();
        self.assign_slots();

        let Some(id) = self.slots.occupant(slot) else {
            return Ok(None);
        };
        let Some(gamepad) = self.gilrs.connected_gamepad(id) else {
            return Ok(None);
        };
        let packet = self.packets.get(&id).copied().unwrap_or(0);
        Ok(Some(Self::snapshot(&gamepad, packet)))
    }
}

fn axis_to_raw(value: f32) -> i16 {
    (value.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16
}

fn trigger_to_raw(gamepad: &Gamepad<'_>, button: Button) -> u8 {
    let value = gamepad.button_data(button).map_or(0.0, |data| data.value());
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
