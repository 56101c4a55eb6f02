//! Gamepad device
//!
//! Each poll turns one raw hardware snapshot into per-button [`InputFlag`]s
//! plus deadzone-adjusted trigger and stick values. Both sticks also drive
//! four synthetic direction buttons that go through the same edge detection
//! as the physical buttons.

use crate::backend::GamepadBackend;
use crate::flag::InputFlag;

/// Raw sticks inside this magnitude read as exactly zero (left stick)
pub const LEFT_THUMB_DEADZONE: i16 = 7849;
/// Raw sticks inside this magnitude read as exactly zero (right stick)
pub const RIGHT_THUMB_DEADZONE: i16 = 8689;
/// Raw triggers below this value read as exactly zero
pub const TRIGGER_THRESHOLD: u8 = 30;
/// Normalized axis magnitude at which a stick direction counts as pressed
pub const DIRECTION_THRESHOLD: f32 = 0.8;

/// Hardware snapshot of one gamepad, in XInput layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawGamepadState {
    /// Changes whenever any value in the snapshot changes
    pub packet: u32,
    /// Bitmask of pressed buttons (see [`GamepadButton::mask`])
    pub buttons: u16,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub thumb_lx: i16,
    pub thumb_ly: i16,
    pub thumb_rx: i16,
    pub thumb_ry: i16,
}

impl RawGamepadState {
    pub fn with_button(mut self, button: GamepadButton) -> Self {
        self.buttons |= button.mask();
        self
    }
}

/// Digital gamepad inputs: the physical buttons followed by the synthetic
/// stick directions
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GamepadButton {
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    Start,
    Back,
    LeftThumb,
    RightThumb,
    LeftShoulder,
    RightShoulder,
    A,
    B,
    X,
    Y,
    LeftStickUp,
    LeftStickDown,
    LeftStickLeft,
    LeftStickRight,
    RightStickUp,
    RightStickDown,
    RightStickLeft,
    RightStickRight,
}

impl GamepadButton {
    pub const ALL: [GamepadButton; 22] = [
        GamepadButton::DPadUp,
        GamepadButton::DPadDown,
        GamepadButton::DPadLeft,
        GamepadButton::DPadRight,
        GamepadButton::Start,
        GamepadButton::Back,
        GamepadButton::LeftThumb,
        GamepadButton::RightThumb,
        GamepadButton::LeftShoulder,
        GamepadButton::RightShoulder,
        GamepadButton::A,
        GamepadButton::B,
        GamepadButton::X,
        GamepadButton::Y,
        GamepadButton::LeftStickUp,
        GamepadButton::LeftStickDown,
        GamepadButton::LeftStickLeft,
        GamepadButton::LeftStickRight,
        GamepadButton::RightStickUp,
        GamepadButton::RightStickDown,
        GamepadButton::RightStickLeft,
        GamepadButton::RightStickRight,
    ];

    pub const COUNT: usize = GamepadButton::ALL.len();

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Bit in [`RawGamepadState::buttons`]; zero for synthetic directions
    pub const fn mask(self) -> u16 {
        match self {
            GamepadButton::DPadUp => 0x0001,
            GamepadButton::DPadDown => 0x0002,
            GamepadButton::DPadLeft => 0x0004,
            GamepadButton::DPadRight => 0x0008,
            GamepadButton::Start => 0x0010,
            GamepadButton::Back => 0x0020,
            GamepadButton::LeftThumb => 0x0040,
            GamepadButton::RightThumb => 0x0080,
            GamepadButton::LeftShoulder => 0x0100,
            GamepadButton::RightShoulder => 0x0200,
            GamepadButton::A => 0x1000,
            GamepadButton::B => 0x2000,
            GamepadButton::X => 0x4000,
            GamepadButton::Y => 0x8000,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Left,
    Right,
}

impl Trigger {
    pub const ALL: [Trigger; 2] = [Trigger::Left, Trigger::Right];

    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stick {
    Left,
    Right,
}

impl Stick {
    pub const ALL: [Stick; 2] = [Stick::Left, Stick::Right];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Synthetic (up, down, left, right) buttons driven by this stick
    const fn directions(self) -> [GamepadButton; 4] {
        match self {
            Stick::Left => [
                GamepadButton::LeftStickUp,
                GamepadButton::LeftStickDown,
                GamepadButton::LeftStickLeft,
                GamepadButton::LeftStickRight,
            ],
            Stick::Right => [
                GamepadButton::RightStickUp,
                GamepadButton::RightStickDown,
                GamepadButton::RightStickLeft,
                GamepadButton::RightStickRight,
            ],
        }
    }
}

/// Map a raw axis to `[-1, 1]`, or exactly 0 inside the deadzone
pub fn normalize_axis(value: i16, deadzone: i16) -> f32 {
    if i32::from(value).abs() < i32::from(deadzone) {
        0.0
    } else if value < 0 {
        (f32::from(value) / 32768.0).max(-1.0)
    } else {
        (f32::from(value) / 32767.0).min(1.0)
    }
}

/// Map a raw trigger to `[0, 1]`, or exactly 0 below the threshold
pub fn normalize_trigger(value: u8) -> f32 {
    if value < TRIGGER_THRESHOLD {
        0.0
    } else {
        f32::from(value) / 255.0
    }
}

/// Edge-triggered state of one gamepad slot
#[derive(Debug, Clone)]
pub struct GamepadDevice {
    slot: u8,
    connected: bool,
    /// Packet number of the last applied snapshot
    packet: Option<u32>,
    raw: u32,
    last: u32,
    buttons: [InputFlag; GamepadButton::COUNT],
    triggers: [f32; 2],
    sticks: [(f32, f32); 2],
}

impl GamepadDevice {
    pub fn new(slot: u8) -> Self {
        Self {
            slot,
            connected: false,
            packet: None,
            raw: 0,
            last: 0,
            buttons: [InputFlag::NoInput; GamepadButton::COUNT],
            triggers: [0.0; 2],
            sticks: [(0.0, 0.0); 2],
        }
    }

    /// Poll the backend for this slot and apply the result.
    /// A failed poll counts as disconnected for this frame.
    pub fn poll(&mut self, backend: &mut dyn GamepadBackend) {
        match backend.poll(self.slot) {
            Ok(state) => self.apply(state.as_ref()),
            Err(e) => {
                log::debug!("Gamepad {} poll failed: {e}", self.slot);
                self.apply(None);
            }
        }
    }

    /// Apply one poll result.
    ///
    /// `None` disconnects the pad and discards all state without reporting
    /// releases. A snapshot whose packet number matches the previous one only
    /// drops the edges (`Down` to `Input`, `Up` to `NoInput`).
    pub fn apply(&mut self, state: Option<&RawGamepadState>) {
        let Some(state) = state else {
            if self.connected {
                log::info!("Gamepad {} disconnected", self.slot);
            }
            self.reset();
            return;
        };

        if !self.connected {
            log::info!("Gamepad {} connected", self.slot);
            self.connected = true;
        }

        if self.packet == Some(state.packet) {
            for flag in self.buttons.iter_mut() {
                *flag = flag.collapse();
            }
            return;
        }
        self.packet = Some(state.packet);

        self.triggers = [
            normalize_trigger(state.left_trigger),
            normalize_trigger(state.right_trigger),
        ];
        self.sticks = [
            (
                normalize_axis(state.thumb_lx, LEFT_THUMB_DEADZONE),
                normalize_axis(state.thumb_ly, LEFT_THUMB_DEADZONE),
            ),
            (
                normalize_axis(state.thumb_rx, RIGHT_THUMB_DEADZONE),
                normalize_axis(state.thumb_ry, RIGHT_THUMB_DEADZONE),
            ),
        ];

        self.raw = 0;
        for button in GamepadButton::ALL {
            if state.buttons & button.mask() != 0 {
                self.raw |= 1 << button.index();
            }
        }
        for stick in Stick::ALL {
            let (x, y) = self.sticks[stick.index()];
            let [up, down, left, right] = stick.directions();
            let held = [
                (up, y >= DIRECTION_THRESHOLD),
                (down, y <= -DIRECTION_THRESHOLD),
                (left, x <= -DIRECTION_THRESHOLD),
                (right, x >= DIRECTION_THRESHOLD),
            ];
            for (button, pressed) in held {
                if pressed {
                    self.raw |= 1 << button.index();
                }
            }
        }

        for button in GamepadButton::ALL {
            let bit = 1 << button.index();
            self.buttons[button.index()] =
                InputFlag::classify(self.last & bit != 0, self.raw & bit != 0);
        }
        self.last = self.raw;
    }

    fn reset(&mut self) {
        *self = Self::new(self.slot);
    }

    pub fn slot(&self) -> u8 {
        self.slot
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn button(&self, button: GamepadButton) -> InputFlag {
        self.buttons[button.index()]
    }

    /// Trigger value in `[0, 1]`
    pub fn trigger(&self, trigger: Trigger) -> f32 {
        self.triggers[trigger.index()]
    }

    /// Stick `(x, y)` in `[-1, 1]`, positive y pointing up
    pub fn stick(&self, stick: Stick) -> (f32, f32) {
        self.sticks[stick.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use easy_core::EngineError;

    /// Feeds snapshots with a fresh packet number each time
    struct Feed {
        packet: u32,
    }

    impl Feed {
        fn new() -> Self {
            Self { packet: 0 }
        }

        fn next(&mut self, state: RawGamepadState) -> RawGamepadState {
            self.packet += 1;
            RawGamepadState {
                packet: self.packet,
                ..state
            }
        }
    }

    fn left_y(value: f32) -> RawGamepadState {
        RawGamepadState {
            thumb_ly: (value * 32767.0) as i16,
            ..Default::default()
        }
    }

    #[test]
    fn test_button_edges() {
        let mut pad = GamepadDevice::new(0);
        let mut feed = Feed::new();
        let pressed = RawGamepadState::default().with_button(GamepadButton::A);

        let mut seen = Vec::new();
        for state in [pressed, pressed, RawGamepadState::default(), RawGamepadState::default()] {
            pad.apply(Some(&feed.next(state)));
            seen.push(pad.button(GamepadButton::A));
        }

        assert_eq!(
            seen,
            vec![InputFlag::Down, InputFlag::Input, InputFlag::Up, InputFlag::NoInput]
        );
        assert!(pad.is_connected());
    }

    #[test]
    fn test_stick_direction_edges() {
        let mut pad = GamepadDevice::new(0);
        let mut feed = Feed::new();

        pad.apply(Some(&feed.next(left_y(0.9))));
        assert_eq!(pad.button(GamepadButton::LeftStickUp), InputFlag::Down);

        pad.apply(Some(&feed.next(left_y(0.85))));
        assert_eq!(pad.button(GamepadButton::LeftStickUp), InputFlag::Input);

        pad.apply(Some(&feed.next(left_y(0.5))));
        assert_eq!(pad.button(GamepadButton::LeftStickUp), InputFlag::Up);

        pad.apply(Some(&feed.next(left_y(0.5))));
        assert_eq!(pad.button(GamepadButton::LeftStickUp), InputFlag::NoInput);
        assert_eq!(pad.button(GamepadButton::LeftStickDown), InputFlag::NoInput);
    }

    #[test]
    fn test_half_tilt_never_triggers_direction() {
        let mut pad = GamepadDevice::new(0);
        let mut feed = Feed::new();

        for _ in 0..3 {
            pad.apply(Some(&feed.next(left_y(0.5))));
            assert_eq!(pad.button(GamepadButton::LeftStickUp), InputFlag::NoInput);
        }
    }

    #[test]
    fn test_negative_axes_drive_down_and_left() {
        let mut pad = GamepadDevice::new(0);
        let mut feed = Feed::new();

        pad.apply(Some(&feed.next(RawGamepadState {
            thumb_rx: i16::MIN,
            thumb_ry: i16::MIN,
            ..Default::default()
        })));

        assert_eq!(pad.button(GamepadButton::RightStickLeft), InputFlag::Down);
        assert_eq!(pad.button(GamepadButton::RightStickDown), InputFlag::Down);
        assert_relative_eq!(pad.stick(Stick::Right).0, -1.0);
    }

    #[test]
    fn test_deadzone_clamps_to_zero() {
        assert_eq!(normalize_axis(LEFT_THUMB_DEADZONE - 1, LEFT_THUMB_DEADZONE), 0.0);
        assert_eq!(normalize_axis(-(LEFT_THUMB_DEADZONE - 1), LEFT_THUMB_DEADZONE), 0.0);
        assert!(normalize_axis(LEFT_THUMB_DEADZONE, LEFT_THUMB_DEADZONE) > 0.0);
        assert_relative_eq!(normalize_axis(i16::MAX, LEFT_THUMB_DEADZONE), 1.0);

        assert_eq!(normalize_trigger(TRIGGER_THRESHOLD - 1), 0.0);
        assert_relative_eq!(normalize_trigger(255), 1.0);
    }

    #[test]
    fn test_trigger_values() {
        let mut pad = GamepadDevice::new(0);
        let mut feed = Feed::new();

        pad.apply(Some(&feed.next(RawGamepadState {
            left_trigger: 10,
            right_trigger: 255,
            ..Default::default()
        })));

        assert_eq!(pad.trigger(Trigger::Left), 0.0);
        assert_relative_eq!(pad.trigger(Trigger::Right), 1.0);
    }

    #[test]
    fn test_unchanged_packet_collapses_edges() {
        let mut pad = GamepadDevice::new(0);
        let pressed = RawGamepadState {
            packet: 7,
            ..Default::default()
        }
        .with_button(GamepadButton::B);

        pad.apply(Some(&pressed));
        assert_eq!(pad.button(GamepadButton::B), InputFlag::Down);

        pad.apply(Some(&pressed));
        assert_eq!(pad.button(GamepadButton::B), InputFlag::Input);

        // Same packet but different contents is treated as unchanged
        let released = RawGamepadState {
            packet: 7,
            ..Default::default()
        };
        pad.apply(Some(&released));
        assert_eq!(pad.button(GamepadButton::B), InputFlag::Input);
    }

    #[test]
    fn test_disconnect_discards_state() {
        let mut pad = GamepadDevice::new(1);
        let mut feed = Feed::new();
        let held = RawGamepadState {
            left_trigger: 200,
            ..Default::default()
        }
        .with_button(GamepadButton::X);

        pad.apply(Some(&feed.next(held)));
        pad.apply(Some(&feed.next(held)));
        assert_eq!(pad.button(GamepadButton::X), InputFlag::Input);

        pad.apply(None);
        assert!(!pad.is_connected());
        assert_eq!(pad.button(GamepadButton::X), InputFlag::NoInput);
        assert_eq!(pad.trigger(Trigger::Left), 0.0);

        // Reconnecting with the button held starts a fresh edge
        pad.apply(Some(&feed.next(held)));
        assert!(pad.is_connected());
        assert_eq!(pad.button(GamepadButton::X), InputFlag::Down);
    }

    #[test]
    fn test_failed_poll_counts_as_disconnected() {
        struct Failing;

        impl GamepadBackend for Failing {
            fn poll(&mut self, _slot: u8) -> easy_core::Result<Option<RawGamepadState>> {
                Err(EngineError::DeviceCreation("device lost".into()))
            }
        }

        let mut pad = GamepadDevice::new(0);
        pad.apply(Some(&RawGamepadState {
            packet: 1,
            ..Default::default()
        }));
        assert!(pad.is_connected());

        pad.poll(&mut Failing);
        assert!(!pad.is_connected());
    }
}
