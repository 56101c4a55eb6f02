//! Easy Player - runs EasyEngine on a winit window
//!
//! This crate provides the winit [`Platform`](easy_engine::Platform)
//! implementation and a small controller-driven demo.

pub mod demo;
mod keymap;
mod winit_platform;

pub use demo::{Demo, Ship};
pub use keymap::to_vk;
pub use winit_platform::WinitPlatform;
