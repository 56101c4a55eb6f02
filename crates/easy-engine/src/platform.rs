//! Platform message pump and window callbacks

use easy_input::{KeyMessage, KeyStateQuery};

/// A message delivered by the platform's window
#[derive(Debug, Clone, PartialEq)]
pub enum WindowMessage {
    /// A key went down or up. `vk` is the virtual-key code, `extra` the
    /// platform's unparsed message parameter.
    Key {
        message: KeyMessage,
        vk: u8,
        extra: isize,
    },
    /// The window gained (`true`) or lost focus
    Focus(bool),
    Resized {
        width: u32,
        height: u32,
    },
    CloseRequested,
}

/// Whether the message loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpStatus {
    Continue,
    Exit,
}

/// A native windowing layer.
///
/// `pump` must not block. It hands every pending message to `sink` along with
/// a view of the live keyboard state, used to tell left and right modifier
/// keys apart.
pub trait Platform {
    fn pump(&mut self, sink: &mut dyn FnMut(&WindowMessage, &dyn KeyStateQuery)) -> PumpStatus;
}

pub type MessageCallback = Box<dyn FnMut(&WindowMessage, &dyn KeyStateQuery)>;

/// Identifies a registered message callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

/// A platform window plus the callbacks that observe its messages.
///
/// Callbacks run in registration order, each seeing every message.
pub struct Window<P> {
    platform: P,
    callbacks: Vec<(CallbackId, MessageCallback)>,
    next_id: u64,
    size: (u32, u32),
    focused: bool,
    close_requested: bool,
}

impl<P: Platform> Window<P> {
    pub fn new(platform: P, width: u32, height: u32) -> Self {
        Self {
            platform,
            callbacks: Vec::new(),
            next_id: 0,
            size: (width, height),
            focused: true,
            close_requested: false,
        }
    }

    pub fn add_callback<F>(&mut self, callback: F) -> CallbackId
    where
        F: FnMut(&WindowMessage, &dyn KeyStateQuery) + 'static,
    {
        let id = CallbackId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        log::debug!("Added window callback {id:?}");
        id
    }

    /// Returns false if `id` was not registered
    pub fn remove_callback(&mut self, id: CallbackId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        before != self.callbacks.len()
    }

    /// Drain pending platform messages through every callback
    pub fn pump_messages(&mut self) -> PumpStatus {
        let Self {
            platform,
            callbacks,
            size,
            focused,
            close_requested,
            ..
        } = self;

        let status = platform.pump(&mut |message, live| {
            match message {
                WindowMessage::Resized { width, height } => *size = (*width, *height),
                WindowMessage::Focus(gained) => *focused = *gained,
                WindowMessage::CloseRequested => *close_requested = true,
                WindowMessage::Key { .. } => {}
            }
            for (_, callback) in callbacks.iter_mut() {
                callback(message, live);
            }
        });

        if self.close_requested {
            PumpStatus::Exit
        } else {
            status
        }
    }

    /// Client size as of the last resize message
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Replays one batch of messages per pump, then reports `Continue`
    #[derive(Default)]
    pub(crate) struct ScriptedPlatform {
        pub(crate) frames: Rc<RefCell<VecDeque<Vec<WindowMessage>>>>,
        pub(crate) held: Rc<RefCell<Vec<u8>>>,
    }

    impl Platform for ScriptedPlatform {
        fn pump(
            &mut self,
            sink: &mut dyn FnMut(&WindowMessage, &dyn KeyStateQuery),
        ) -> PumpStatus {
            let batch = self.frames.borrow_mut().pop_front().unwrap_or_default();
            let held = self.held.borrow().clone();
            let live = move |code: u8| held.contains(&code);
            for message in &batch {
                sink(message, &live);
            }
            PumpStatus::Continue
        }
    }

    fn key_down(vk: u8) -> WindowMessage {
        WindowMessage::Key {
            message: KeyMessage::KeyDown,
            vk,
            extra: 0,
        }
    }

    #[test]
    fn test_callbacks_run_in_order() {
        let platform = ScriptedPlatform::default();
        platform.frames.borrow_mut().push_back(vec![key_down(0x41)]);
        let mut window = Window::new(platform, 800, 600);

        let log = Rc::new(RefCell::new(Vec::new()));
        for name in ["first", "second"] {
            let log = log.clone();
            window.add_callback(move |_, _| log.borrow_mut().push(name));
        }

        assert_eq!(window.pump_messages(), PumpStatus::Continue);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_removed_callback_stops_receiving() {
        let platform = ScriptedPlatform::default();
        platform
            .frames
            .borrow_mut()
            .extend([vec![key_down(0x41)], vec![key_down(0x42)]]);
        let mut window = Window::new(platform, 800, 600);

        let count = Rc::new(RefCell::new(0));
        let counter = count.clone();
        let id = window.add_callback(move |_, _| *counter.borrow_mut() += 1);

        window.pump_messages();
        assert!(window.remove_callback(id));
        assert!(!window.remove_callback(id));
        window.pump_messages();

        assert_eq!(*count.borrow(), 1);
        assert_eq!(window.callback_count(), 0);
    }

    #[test]
    fn test_live_state_reaches_callbacks() {
        let platform = ScriptedPlatform::default();
        platform.held.borrow_mut().push(0xA1);
        platform.frames.borrow_mut().push_back(vec![key_down(0x10)]);
        let mut window = Window::new(platform, 800, 600);

        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        window.add_callback(move |_, live| {
            *sink.borrow_mut() = Some((live.is_key_down(0xA0), live.is_key_down(0xA1)));
        });

        window.pump_messages();
        assert_eq!(*seen.borrow(), Some((false, true)));
    }

    #[test]
    fn test_window_tracks_size_focus_and_close() {
        let platform = ScriptedPlatform::default();
        platform.frames.borrow_mut().push_back(vec![
            WindowMessage::Resized {
                width: 1024,
                height: 768,
            },
            WindowMessage::Focus(false),
        ]);
        platform
            .frames
            .borrow_mut()
            .push_back(vec![WindowMessage::CloseRequested]);
        let mut window = Window::new(platform, 800, 600);

        assert_eq!(window.pump_messages(), PumpStatus::Continue);
        assert_eq!(window.size(), (1024, 768));
        assert!(!window.is_focused());

        assert_eq!(window.pump_messages(), PumpStatus::Exit);
    }
}
