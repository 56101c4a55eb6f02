//! Named priority breakpoints for the frame update
//!
//! Lower values run first. These are conventions for sequencing subsystems
//! within a frame (input before game logic before rendering before
//! presentation); nothing stops a task from using any other value.

/// First priority of the update phase
pub const UPDATE_BEGIN: u32 = 0;

/// Controllers dispatching input to game objects
pub const INPUT: u32 = 1;

/// Default priority for `UpdateManager::register_task`
pub const UPDATE_DEFAULT: u32 = 5;

/// Last priority of the update phase
pub const UPDATE_END: u32 = 99;

/// First priority of the render phase
pub const RENDER_BEGIN: u32 = 100;

/// Last priority of the render phase
pub const RENDER_END: u32 = 199;

/// Swap-chain presentation, after everything else
pub const PRESENT: u32 = 200;
