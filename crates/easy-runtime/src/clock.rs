//! Wall clock and frame-rate gate

use easy_core::{EngineError, Result};
use std::time::{Duration, Instant};

/// Longest delta reported for a single frame, in seconds
const MAX_DELTA: f64 = 0.25;

/// Tracks wall-clock time between frames
pub struct Clock {
    /// Total elapsed time in seconds
    elapsed: f64,
    /// Time since the previous update in seconds
    delta: f64,
    /// Number of updates since creation
    frame_count: u64,
    last_instant: Instant,
    first_tick: bool,
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            delta: 0.0,
            frame_count: 0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock from the wall clock. Call once per elapsed frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        self.frame_count += 1;

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.delta = 0.0;
            return;
        }

        let elapsed = now.duration_since(self.last_instant);
        self.last_instant = now;
        self.accumulate(elapsed);
    }

    /// Advance the clock by an explicit duration instead of reading the wall clock
    pub fn advance(&mut self, step: Duration) {
        self.first_tick = false;
        self.frame_count += 1;
        self.last_instant = Instant::now();
        self.accumulate(step);
    }

    fn accumulate(&mut self, step: Duration) {
        // Clamp to avoid a spiral after long stalls (debugger, window drag)
        self.delta = step.as_secs_f64().min(MAX_DELTA);
        self.elapsed += self.delta;
    }

    /// Seconds since the previous update
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Seconds accumulated over every update
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Lets the main loop advance only once a full frame budget has passed.
///
/// The budget is a whole number of microseconds derived from the target frame
/// rate, so 60 FPS gives 16 667µs per frame.
pub struct FrameGate {
    budget: Duration,
    last_frame: Option<Instant>,
}

impl FrameGate {
    /// Create a gate for the given target frame rate
    pub fn from_fps(fps: u32) -> Result<Self> {
        if fps == 0 {
            return Err(EngineError::InvalidOperation(
                "target FPS must be greater than zero".into(),
            ));
        }

        let micros = (1_000_000 + u64::from(fps) / 2) / u64::from(fps);
        Ok(Self {
            budget: Duration::from_micros(micros),
            last_frame: None,
        })
    }

    /// Frame budget in microseconds
    pub fn micros_per_frame(&self) -> u64 {
        self.budget.as_micros() as u64
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Returns true and starts a new frame if the budget has elapsed since the last one.
    /// The first call always opens a frame.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last_frame {
            Some(last) if now.saturating_duration_since(last) < self.budget => false,
            _ => {
                self.last_frame = Some(now);
                true
            }
        }
    }

    /// Time left before the next frame opens
    pub fn time_until_next(&self, now: Instant) -> Duration {
        match self.last_frame {
            Some(last) => self
                .budget
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }
}
