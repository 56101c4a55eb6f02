//! Easy Engine - main loop and its collaborators
//!
//! - `EngineConfig` - window, timing, and input settings loaded from TOML
//! - `Platform` / `Window` - message pump with registered message callbacks
//! - `GraphicsDevice` - opaque render and present backend
//! - `Engine` - owns everything and runs one frame per frame-gate tick

mod config;
mod engine;
mod graphics;
mod platform;

pub use config::{EngineConfig, InputSettings, TimingSettings, WindowSettings};
pub use engine::{Engine, ExitHandle};
pub use graphics::{GraphicsDevice, NullGraphics};
pub use platform::{CallbackId, MessageCallback, Platform, PumpStatus, Window, WindowMessage};
