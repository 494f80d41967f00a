use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::time::elapsed;

/// Trait for game-specific timed effect kinds.
pub trait EffectKind: Clone + Copy + PartialEq + Serialize + DeserializeOwned {
    /// Total duration in milliseconds.
    fn duration_ms(&self) -> u64;
}

/// A running timed effect, generic over the kind enum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TimedEffect<K: EffectKind> {
    pub kind: K,
    pub started_at: u64,
}

impl<K: EffectKind> TimedEffect<K> {
    pub fn new(kind: K, started_at: u64) -> Self {
        Self { kind, started_at }
    }

    pub fn elapsed(&self, now: u64) -> u64 {
        elapsed(now, self.started_at)
    }

    pub fn is_expired(&self, now: u64) -> bool {
        self.elapsed(now) >= self.kind.duration_ms()
    }

    /// True once the effect has entered its last third.
    pub fn in_final_third(&self, now: u64) -> bool {
        let total = self.kind.duration_ms();
        self.elapsed(now) * 3 >= total * 2
    }
}
