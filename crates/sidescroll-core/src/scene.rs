use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::SceneError;
use crate::events::SceneEvent;
use crate::input::InputState;
use crate::render::Renderer;
use crate::session::{NextScene, SessionInfo};

/// Core trait every playable scene implements.
///
/// The host owns the window, audio and asset tables; the scene only
/// advances its simulation and describes what to draw.
pub trait Scene: Send {
    /// Scene metadata for menus and logs.
    fn metadata(&self) -> SceneMetadata;

    /// Called when the scene becomes active, with the session record handed
    /// forward from the previous scene.
    fn startup(&mut self, current_time: u64, session: SessionInfo);

    /// Called once per frame. `dt` is in seconds. Returns the frame's side
    /// effects.
    fn update(&mut self, dt: f32, input: &InputState) -> Vec<SceneEvent>;

    /// Issue this frame's draw calls back to front.
    fn draw(&self, renderer: &mut dyn Renderer);

    /// Serialize the authoritative simulation state.
    fn serialize_state(&self) -> Vec<u8>;

    /// Replace the simulation state with a previously serialized one.
    /// Undecodable bytes leave the scene untouched.
    fn apply_state(&mut self, state: &[u8]);

    /// Simulation frames per second the scene's per-frame velocities assume.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    /// Freeze the simulation (window lost focus, host menu open).
    fn pause(&mut self);

    fn resume(&mut self);

    /// Whether the scene has finished and `next_scene` is meaningful.
    fn is_done(&self) -> bool;

    fn next_scene(&self) -> Option<NextScene>;

    /// Current session counters.
    fn session(&self) -> &SessionInfo;
}

/// Scene metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneMetadata {
    pub name: String,
    pub description: String,
}

/// Encode a scene's state as a MessagePack snapshot.
pub fn encode_snapshot<T: Serialize>(state: &T) -> Result<Vec<u8>, SceneError> {
    rmp_serde::to_vec(state).map_err(|e| SceneError::SnapshotEncode(e.to_string()))
}

/// Decode a snapshot produced by [`encode_snapshot`].
pub fn decode_snapshot<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SceneError> {
    rmp_serde::from_slice(bytes).map_err(|e| SceneError::SnapshotDecode(e.to_string()))
}

/// Generates the `Scene` methods that are identical across scenes:
/// `serialize_state`, `apply_state`, `pause`, `resume`, `is_done`.
///
/// Requires the implementing struct to have `state: $StateType` and `paused: bool` fields,
/// and `$StateType` to have a `done: bool` field.
#[macro_export]
macro_rules! scene_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Vec<u8> {
            match $crate::scene::encode_snapshot(&self.state) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!("{e}");
                    Vec::new()
                },
            }
        }

        fn apply_state(&mut self, state: &[u8]) {
            match $crate::scene::decode_snapshot::<$StateType>(state) {
                Ok(s) => self.state = s,
                Err(e) => tracing::warn!("ignoring scene state: {e}"),
            }
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn resume(&mut self) {
            self.paused = false;
        }

        fn is_done(&self) -> bool {
            self.state.done
        }
    };
}
