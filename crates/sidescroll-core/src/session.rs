use serde::{Deserialize, Serialize};

/// Schema version of [`SessionInfo`]. Bump when a field changes meaning.
pub const SESSION_VERSION: u16 = 1;
/// Lives a fresh game starts with.
pub const STARTING_LIVES: u32 = 3;

/// Top-level state of a running level, mirrored into the session record so
/// other scenes (and the sound layer) can observe it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelState {
    #[default]
    NotFrozen,
    Frozen,
    InCastle,
    FlagAndFireworks,
}

/// Scene the host should switch to once the current one reports done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextScene {
    MainMenu,
    LoadScreen,
    GameOver,
    TimeOut,
}

/// Counters carried from scene to scene. This is the only state that
/// survives a level restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub version: u16,
    pub score: u32,
    pub coin_total: u32,
    pub lives: u32,
    pub top_score: u32,
    /// Milliseconds since the host started, as of the last frame.
    pub current_time: u64,
    /// Level x the camera starts at on the next load.
    pub camera_start_x: i32,
    pub level_state: LevelState,
    pub mario_dead: bool,
}

impl SessionInfo {
    /// Counters for a brand-new game, keeping the best score seen so far.
    pub fn new_game(top_score: u32) -> Self {
        Self {
            version: SESSION_VERSION,
            score: 0,
            coin_total: 0,
            lives: STARTING_LIVES,
            top_score,
            current_time: 0,
            camera_start_x: 0,
            level_state: LevelState::NotFrozen,
            mario_dead: false,
        }
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn add_coin(&mut self) {
        self.coin_total += 1;
    }

    pub fn record_top_score(&mut self) {
        if self.score > self.top_score {
            self.top_score = self.score;
        }
    }
}

impl Default for SessionInfo {
    fn default() -> Self {
        Self::new_game(0)
    }
}
