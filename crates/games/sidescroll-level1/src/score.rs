use serde::{Deserialize, Serialize};

/// What a floating score shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreValue {
    Points(u32),
    OneUp,
}

/// Screen y at which the flag-pole score stops rising.
const FLAG_SCORE_CEILING: i32 = 120;

/// Points that float up from where they were earned. Positions are in
/// screen space, so the score stays put while the camera scrolls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub x: i32,
    pub origin_y: i32,
    pub y: i32,
    pub y_vel: i32,
    pub value: ScoreValue,
    pub flag_pole: bool,
}

impl Score {
    pub fn new(x: i32, y: i32, value: ScoreValue) -> Self {
        Self {
            x,
            origin_y: y,
            y,
            y_vel: -3,
            value,
            flag_pole: false,
        }
    }

    pub fn points(x: i32, y: i32, points: u32) -> Self {
        Self::new(x, y, ScoreValue::Points(points))
    }

    pub fn one_up(x: i32, y: i32) -> Self {
        Self::new(x, y, ScoreValue::OneUp)
    }

    /// Score that rises beside the flag pole and stays near the top.
    pub fn flag_pole(x: i32, y: i32, points: u32) -> Self {
        Self {
            y_vel: -4,
            flag_pole: true,
            ..Self::points(x, y, points)
        }
    }

    pub fn update(&mut self) {
        self.y += self.y_vel;
        if self.flag_pole && self.y <= FLAG_SCORE_CEILING {
            self.y_vel = 0;
        }
    }

    /// Whether the score has floated far enough to disappear.
    pub fn is_finished(&self) -> bool {
        let limit = match self.value {
            ScoreValue::Points(1000) => 130,
            _ => 75,
        };
        self.origin_y - self.y > limit
    }

    pub fn text(&self) -> String {
        match self.value {
            ScoreValue::Points(points) => points.to_string(),
            ScoreValue::OneUp => "1UP".to_string(),
        }
    }
}

/// Update floating scores and drop the ones that have finished.
pub fn update_scores(scores: &mut Vec<Score>) {
    for score in scores.iter_mut() {
        score.update();
    }
    scores.retain(|s| !s.is_finished());
}
