use serde::{Deserialize, Serialize};

/// Millisecond clock advanced by frame deltas.
///
/// Entity timers store the clock value they started at and compare against
/// `now()`, so a timer's outcome depends on elapsed time, not on how many
/// frames ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameClock {
    now_ms: u64,
    /// Sub-millisecond remainder carried between frames.
    carry: f64,
}

impl FrameClock {
    pub fn starting_at(now_ms: u64) -> Self {
        Self { now_ms, carry: 0.0 }
    }

    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Advance by `dt` seconds. Negative or non-finite deltas are ignored.
    pub fn advance(&mut self, dt: f32) -> u64 {
        if dt.is_finite() && dt > 0.0 {
            let total = f64::from(dt) * 1000.0 + self.carry;
            let whole = total.floor();
            self.carry = total - whole;
            self.now_ms += whole as u64;
        }
        self.now_ms
    }
}

/// Milliseconds between `since` and `now`, zero if `since` is in the future.
pub fn elapsed(now: u64, since: u64) -> u64 {
    now.saturating_sub(since)
}
