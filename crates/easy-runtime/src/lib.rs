//! Easy Runtime - Game loop infrastructure
//!
//! Provides the scheduling building blocks of the main loop:
//! - `Clock` - wall-clock delta and elapsed time
//! - `FrameGate` - fixed microseconds-per-frame budget derived from a target FPS
//! - `TaskManager` / `TaskHandle` - priority-bucketed, cancellable callables
//! - `UpdateManager` - the per-frame task set, called with the frame delta

mod clock;
pub mod priority;
mod task;
mod update;

pub use clock::{Clock, FrameGate};
pub use task::{TaskHandle, TaskManager};
pub use update::UpdateManager;
