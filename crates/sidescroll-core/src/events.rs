use serde::{Deserialize, Serialize};

use crate::session::{LevelState, NextScene};

/// Sound effects a scene can ask the host to play. Playback is
/// fire-and-forget; nothing in the simulation waits on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    SmallJump,
    BigJump,
    Fireball,
    Stomp,
    Kick,
    Bump,
    Coin,
    PowerupAppears,
    Powerup,
    OneUp,
    /// Shrinking after a hit.
    Pipe,
    BrickSmash,
    Flagpole,
    Death,
    CountDown,
}

impl SoundEffect {
    /// Asset key the host's sound table is expected to use.
    pub fn asset_key(self) -> &'static str {
        match self {
            SoundEffect::SmallJump => "small_jump",
            SoundEffect::BigJump => "big_jump",
            SoundEffect::Fireball => "fireball",
            SoundEffect::Stomp => "stomp",
            SoundEffect::Kick => "kick",
            SoundEffect::Bump => "bump",
            SoundEffect::Coin => "coin",
            SoundEffect::PowerupAppears => "powerup_appears",
            SoundEffect::Powerup => "powerup",
            SoundEffect::OneUp => "one_up",
            SoundEffect::Pipe => "pipe",
            SoundEffect::BrickSmash => "brick_smash",
            SoundEffect::Flagpole => "flagpole",
            SoundEffect::Death => "death",
            SoundEffect::CountDown => "count_down",
        }
    }
}

/// Side effects emitted by a scene during `update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneEvent {
    Sound(SoundEffect),
    /// Points were added to the session score.
    ScoreAwarded { points: u32, total: u32 },
    LifeGained { lives: u32 },
    StateChanged(LevelState),
    /// The scene is done; the host should switch to `next`.
    Finished { next: NextScene },
}

/// Collects events for the current frame.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<SceneEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SceneEvent) {
        self.events.push(event);
    }

    pub fn sound(&mut self, effect: SoundEffect) {
        self.events.push(SceneEvent::Sound(effect));
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneEvent> {
        self.events.iter()
    }

    /// Hand the frame's events to the caller, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn contains_sound(&self, effect: SoundEffect) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, SceneEvent::Sound(s) if *s == effect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_queue() {
        let mut q = EventQueue::new();
        q.sound(SoundEffect::Coin);
        q.push(SceneEvent::ScoreAwarded {
            points: 200,
            total: 200,
        });
        assert_eq!(q.iter().count(), 2);
        let drained = q.drain();
        assert_eq!(drained.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn contains_sound_matches_only_sounds() {
        let mut q = EventQueue::new();
        q.push(SceneEvent::LifeGained { lives: 4 });
        assert!(!q.contains_sound(SoundEffect::OneUp));
        q.sound(SoundEffect::OneUp);
        assert!(q.contains_sound(SoundEffect::OneUp));
    }

    #[test]
    fn asset_keys_are_unique() {
        use std::collections::HashSet;
        let all = [
            SoundEffect::SmallJump,
            SoundEffect::BigJump,
            SoundEffect::Fireball,
            SoundEffect::Stomp,
            SoundEffect::Kick,
            SoundEffect::Bump,
            SoundEffect::Coin,
            SoundEffect::PowerupAppears,
            SoundEffect::Powerup,
            SoundEffect::OneUp,
            SoundEffect::Pipe,
            SoundEffect::BrickSmash,
            SoundEffect::Flagpole,
            SoundEffect::Death,
            SoundEffect::CountDown,
        ];
        let keys: HashSet<_> = all.iter().map(|s| s.asset_key()).collect();
        assert_eq!(keys.len(), all.len());
    }

    #[test]
    fn event_serializes_to_json() {
        let ev = SceneEvent::Finished {
            next: NextScene::GameOver,
        };
        let json = serde_json::to_string(&ev).unwrap();
        assert!(json.contains("GameOver"), "unexpected json: {json}");
    }
}
