#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-rate pacing for the frame loop and the throttled tile automaton.

use std::time::Duration;

use bomb_maze_core::{FPS, TPS};
use thiserror::Error;

/// Frames a [`FrameClock`] may release for a single elapsed-time sample
/// before dropping the remaining backlog.
pub const MAX_CATCH_UP_FRAMES: u32 = 5;

/// Errors raised when frame and tick rates are incompatible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PacingError {
    /// Frames per second must be positive.
    #[error("frame rate must be positive")]
    ZeroFrameRate,
    /// Ticks per second must be positive.
    #[error("tick rate must be positive")]
    ZeroTickRate,
    /// The automaton cannot tick more often than frames are produced.
    #[error("tick rate {tps} exceeds frame rate {fps}")]
    TickRateAboveFrameRate {
        /// Configured frames per second.
        fps: u32,
        /// Configured ticks per second.
        tps: u32,
    },
}

/// Validated frame and tick rates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pacing {
    fps: u32,
    tps: u32,
}

impl Pacing {
    /// Validates a frame rate and tick rate pair.
    pub fn new(fps: u32, tps: u32) -> Result<Self, PacingError> {
        if fps == 0 {
            return Err(PacingError::ZeroFrameRate);
        }
        if tps == 0 {
            return Err(PacingError::ZeroTickRate);
        }
        if tps > fps {
            return Err(PacingError::TickRateAboveFrameRate { fps, tps });
        }
        Ok(Self { fps, tps })
    }

    /// Frames per second.
    #[must_use]
    pub const fn fps(&self) -> u32 {
        self.fps
    }

    /// Automaton ticks per second.
    #[must_use]
    pub const fn tps(&self) -> u32 {
        self.tps
    }

    /// Frames between automaton ticks (`fps / tps`, rounded down).
    #[must_use]
    pub const fn frames_per_tick(&self) -> u32 {
        self.fps / self.tps
    }

    /// Wall-clock length of one frame.
    #[must_use]
    pub fn frame_period(&self) -> Duration {
        Duration::from_secs(1) / self.fps
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self { fps: FPS, tps: TPS }
    }
}

/// Frame countdown deciding which frames run the automaton.
///
/// The countdown starts exhausted, so the very first frame ticks, and then
/// every `frames_per_tick`-th frame after it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickCadence {
    frames_per_tick: u32,
    remaining: u32,
}

impl TickCadence {
    /// Creates a cadence for the provided rates.
    #[must_use]
    pub const fn new(pacing: &Pacing) -> Self {
        Self {
            frames_per_tick: pacing.frames_per_tick(),
            remaining: 0,
        }
    }

    /// Counts one frame and reports whether the automaton should tick on it.
    pub fn frame(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return false;
        }
        self.remaining = self.frames_per_tick;
        true
    }
}

/// Fixed-timestep accumulator converting wall-clock deltas into whole frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameClock {
    period: Duration,
    accumulated: Duration,
}

impl FrameClock {
    /// Creates a clock releasing one frame per `period`.
    #[must_use]
    pub const fn new(period: Duration) -> Self {
        Self {
            period,
            accumulated: Duration::ZERO,
        }
    }

    /// Length of one frame.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Adds `elapsed` wall-clock time and returns how many frames are due.
    ///
    /// At most [`MAX_CATCH_UP_FRAMES`] are released per call; backlog beyond
    /// that is dropped rather than replayed.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulated = self.accumulated.saturating_add(elapsed);

        let mut due = 0;
        while self.accumulated >= self.period && due < MAX_CATCH_UP_FRAMES {
            self.accumulated -= self.period;
            due += 1;
        }
        if self.accumulated >= self.period {
            self.accumulated = Duration::ZERO;
        }
        due
    }
}
