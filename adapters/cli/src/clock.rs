//! Converts variable frame times into whole simulation ticks.

use path_defence_core::TICKS_PER_SECOND;
use std::time::Duration;

/// Accumulates frame time and releases it as fixed-length ticks.
///
/// At most `max_ticks_per_frame` ticks are released per frame. Backlog beyond
/// that budget is dropped so a stalled frame never triggers a catch-up spiral.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FixedClock {
    tick: Duration,
    accumulated: Duration,
    max_ticks_per_frame: u32,
}

impl FixedClock {
    pub(crate) fn new(max_ticks_per_frame: u32) -> Self {
        Self {
            tick: Duration::from_nanos(1_000_000_000 / u64::from(TICKS_PER_SECOND)),
            accumulated: Duration::ZERO,
            max_ticks_per_frame: max_ticks_per_frame.max(1),
        }
    }

    /// Adds a frame delta and returns how many ticks should run this frame.
    pub(crate) fn advance(&mut self, frame: Duration) -> u32 {
        self.accumulated += frame;

        let mut ticks = 0;
        while self.accumulated >= self.tick && ticks < self.max_ticks_per_frame {
            self.accumulated -= self.tick;
            ticks += 1;
        }

        if ticks == self.max_ticks_per_frame && self.accumulated >= self.tick {
            self.accumulated = Duration::ZERO;
        }

        ticks
    }
}
