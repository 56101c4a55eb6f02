//! winit-backed platform
//!
//! winit owns its event loop, so the engine drives it with
//! `pump_app_events` once per step. Events are converted to
//! [`WindowMessage`]s during the pump and handed to the engine afterwards,
//! each paired with the modifier state at the time it arrived.

use crate::keymap::{modifier_vk, to_vk};
use easy_core::{EngineError, Result};
use easy_engine::{Platform, PumpStatus, WindowMessage, WindowSettings};
use easy_input::{vk, KeyMessage, KeyStateQuery};
use std::time::Duration;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus as LoopStatus};
use winit::window::{Window, WindowAttributes, WindowId};

/// Side-specific modifier keys currently held, as virtual-key bits
#[derive(Debug, Clone, Copy, Default)]
struct Modifiers(u8);

impl Modifiers {
    const SIDES: [u8; 6] = [
        vk::LSHIFT,
        vk::RSHIFT,
        vk::LCONTROL,
        vk::RCONTROL,
        vk::LMENU,
        vk::RMENU,
    ];

    fn bit(code: u8) -> Option<u8> {
        Self::SIDES
            .iter()
            .position(|side| *side == code)
            .map(|i| 1 << i)
    }

    fn set(&mut self, code: u8, down: bool) {
        if let Some(bit) = Self::bit(code) {
            if down {
                self.0 |= bit;
            } else {
                self.0 &= !bit;
            }
        }
    }
}

impl KeyStateQuery for Modifiers {
    fn is_key_down(&self, code: u8) -> bool {
        Self::bit(code).is_some_and(|bit| self.0 & bit != 0)
    }
}

struct App {
    attributes: WindowAttributes,
    window: Option<Window>,
    modifiers: Modifiers,
    pending: Vec<(WindowMessage, Modifiers)>,
    error: Option<String>,
}

impl App {
    fn push(&mut self, message: WindowMessage) {
        self.pending.push((message, self.modifiers));
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match event_loop.create_window(self.attributes.clone()) {
            Ok(window) => {
                log::info!("Created window {:?}", window.id());
                self.window = Some(window);
            }
            Err(e) => {
                self.error = Some(e.to_string());
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.push(WindowMessage::CloseRequested),
            WindowEvent::Focused(focused) => {
                if !focused {
                    self.modifiers = Modifiers::default();
                }
                self.push(WindowMessage::Focus(focused));
            }
            WindowEvent::Resized(size) => self.push(WindowMessage::Resized {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let Some(vk) = to_vk(code) else {
                    log::trace!("No virtual key for {code:?}");
                    return;
                };

                let pressed = event.state == ElementState::Pressed;
                if let Some(side) = modifier_vk(code) {
                    self.modifiers.set(side, pressed);
                }
                let message = if pressed {
                    KeyMessage::KeyDown
                } else {
                    KeyMessage::KeyUp
                };
                self.push(WindowMessage::Key {
                    message,
                    vk,
                    extra: 0,
                });
            }
            _ => {}
        }
    }
}

/// A single winit window driven without blocking
pub struct WinitPlatform {
    event_loop: EventLoop<()>,
    app: App,
}

impl WinitPlatform {
    pub fn new(settings: &WindowSettings) -> Result<Self> {
        let event_loop = EventLoop::new().map_err(|e| EngineError::WindowCreation(e.to_string()))?;
        let attributes = Window::default_attributes()
            .with_title(settings.title.clone())
            .with_inner_size(PhysicalSize::new(settings.width, settings.height));

        Ok(Self {
            event_loop,
            app: App {
                attributes,
                window: None,
                modifiers: Modifiers::default(),
                pending: Vec::new(),
                error: None,
            },
        })
    }
}

impl Platform for WinitPlatform {
    fn pump(&mut self, sink: &mut dyn FnMut(&WindowMessage, &dyn KeyStateQuery)) -> PumpStatus {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.app);

        for (message, modifiers) in self.app.pending.drain(..) {
            sink(&message, &modifiers);
        }

        if let Some(error) = self.app.error.take() {
            log::error!("Window creation failed: {error}");
            return PumpStatus::Exit;
        }
        match status {
            LoopStatus::Continue => PumpStatus::Continue,
            LoopStatus::Exit(code) => {
                log::info!("Event loop exited with code {code}");
                PumpStatus::Exit
            }
        }
    }
}
