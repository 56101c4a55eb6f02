//! Keyboard device
//!
//! Platform key messages only set or clear bits in the `raw` snapshot. The
//! per-key [`InputFlag`]s are computed lazily by [`Keyboard::update`], so any
//! number of presses and releases between two updates collapse to the bit's
//! value at update time. A key tapped and released within one frame is never
//! seen.

use crate::flag::InputFlag;
use crate::key::{Key, KeyMessage, KeyStateQuery};

const WORDS: usize = (Key::COUNT + 63) / 64;

/// One bit per tracked key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct KeyBits([u64; WORDS]);

impl KeyBits {
    fn get(&self, key: Key) -> bool {
        let i = key.index();
        self.0[i / 64] & (1u64 << (i % 64)) != 0
    }

    fn set(&mut self, key: Key, down: bool) {
        let i = key.index();
        if down {
            self.0[i / 64] |= 1u64 << (i % 64);
        } else {
            self.0[i / 64] &= !(1u64 << (i % 64));
        }
    }
}

/// Edge-triggered keyboard state
pub struct Keyboard {
    /// Accumulated physical state, written by key messages
    raw: KeyBits,
    /// Raw snapshot taken at the previous update
    last: KeyBits,
    states: [InputFlag; Key::COUNT],
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            raw: KeyBits::default(),
            last: KeyBits::default(),
            states: [InputFlag::NoInput; Key::COUNT],
        }
    }

    /// Apply one platform key message to the raw state.
    ///
    /// Generic Shift, Control and Alt codes do not say which side fired, so
    /// both sides are refreshed from `live`. Unknown codes are ignored.
    /// `_extra` carries the platform's message parameter and is unused.
    pub fn process_event(
        &mut self,
        message: KeyMessage,
        code: u8,
        _extra: isize,
        live: &dyn KeyStateQuery,
    ) {
        let down = message == KeyMessage::KeyDown;

        if let Some((left, right)) = Key::sides_of(code) {
            self.raw.set(left, live.is_key_down(left.vk()));
            self.raw.set(right, live.is_key_down(right.vk()));
            log::trace!("Modifier {code:#04x} resolved via live state ({message:?})");
            return;
        }

        match Key::from_vk(code) {
            Some(key) => {
                self.raw.set(key, down);
                log::trace!("{key:?} {message:?}");
            }
            None => log::trace!("Ignoring untracked virtual key {code:#04x}"),
        }
    }

    /// Set a key's raw bit directly
    pub fn set_raw(&mut self, key: Key, down: bool) {
        self.raw.set(key, down);
    }

    /// Clear every raw bit (window focus lost). Held keys report `Up` on the next update.
    pub fn release_all(&mut self) {
        self.raw = KeyBits::default();
    }

    /// Classify every key against the previous update, then make the
    /// current raw state the new baseline
    pub fn update(&mut self) {
        for key in Key::ALL {
            self.states[key.index()] = InputFlag::classify(self.last.get(*key), self.raw.get(*key));
        }
        self.last = self.raw;
    }

    /// State of `key` as of the last update
    pub fn state(&self, key: Key) -> InputFlag {
        self.states[key.index()]
    }

    /// States of every key, indexed by `Key::index`
    pub fn states(&self) -> &[InputFlag; Key::COUNT] {
        &self.states
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.state(key).is_pressed()
    }
}
