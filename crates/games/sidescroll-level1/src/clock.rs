use serde::{Deserialize, Serialize};

use sidescroll_core::time::elapsed;

/// Points banked per second left on the clock at the end of the level.
pub const TIME_BONUS_PER_TICK: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockMode {
    /// One second every interval.
    Normal,
    /// Drain one second per frame into the score.
    FastCountDown,
    /// Drained to zero after the castle.
    EndOfLevel,
}

/// The level's countdown timer as shown on the HUD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelClock {
    pub time: u32,
    pub mode: ClockMode,
    pub count_down_timer: u64,
    pub interval_ms: u64,
}

impl LevelClock {
    pub fn new(starting_time: u32, interval_ms: u64, now: u64) -> Self {
        Self {
            time: starting_time,
            mode: ClockMode::Normal,
            count_down_timer: now,
            interval_ms,
        }
    }

    /// Advance the clock. `running` is false while the level is frozen or
    /// the player is dead or finishing; the normal countdown then holds.
    /// Returns the points earned this frame.
    pub fn update(&mut self, now: u64, running: bool) -> u32 {
        match self.mode {
            ClockMode::Normal => {
                if running && elapsed(now, self.count_down_timer) > self.interval_ms {
                    self.time = self.time.saturating_sub(1);
                    self.count_down_timer = now;
                }
                0
            },
            ClockMode::FastCountDown => {
                if self.time == 0 {
                    self.mode = ClockMode::EndOfLevel;
                    return 0;
                }
                self.time -= 1;
                if self.time == 0 {
                    self.mode = ClockMode::EndOfLevel;
                }
                TIME_BONUS_PER_TICK
            },
            ClockMode::EndOfLevel => 0,
        }
    }

    pub fn start_fast_count_down(&mut self) {
        self.mode = ClockMode::FastCountDown;
    }

    pub fn is_out_of_time(&self) -> bool {
        self.time == 0
    }
}
