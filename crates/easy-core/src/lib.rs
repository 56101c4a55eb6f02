//! Easy Core - Foundational types for EasyEngine
//!
//! This crate provides the types that every other EasyEngine crate depends on:
//! - `EngineError` - the shared error taxonomy
//! - `Result` - alias used across the engine

mod error;

pub use error::{EngineError, Result};
