pub mod effect;
pub mod error;
pub mod events;
pub mod geometry;
pub mod input;
pub mod render;
pub mod scene;
pub mod session;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::events::SceneEvent;
    use crate::geometry::Rect;
    use crate::input::InputState;
    use crate::render::{Layer, Renderer};
    use crate::scene::Scene;
    use crate::session::SessionInfo;

    /// Frame delta for a 60 Hz host.
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Fresh session with the given score already banked.
    pub fn make_session(score: u32) -> SessionInfo {
        let mut info = SessionInfo::new_game(0);
        info.score = score;
        info
    }

    /// Run N frames with the same input, returning all accumulated events.
    pub fn run_scene_frames(
        scene: &mut dyn Scene,
        n: usize,
        input: &InputState,
    ) -> Vec<SceneEvent> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(scene.update(FRAME_DT, input));
        }
        all_events
    }

    /// Assert that the scene's serialized state differs from `before`.
    pub fn assert_scene_state_changed(scene: &dyn Scene, before: &[u8]) {
        let after = scene.serialize_state();
        assert_ne!(
            before,
            &after[..],
            "Scene state should have changed after operation"
        );
    }

    /// One recorded draw call.
    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawCall {
        Background(Rect),
        Sprite {
            layer: Layer,
            atlas: String,
            frame: usize,
            dest: Rect,
        },
        Text {
            layer: Layer,
            text: String,
            x: i32,
            y: i32,
        },
    }

    impl DrawCall {
        pub fn layer(&self) -> Layer {
            match self {
                DrawCall::Background(_) => Layer::Background,
                DrawCall::Sprite { layer, .. } | DrawCall::Text { layer, .. } => *layer,
            }
        }
    }

    /// Renderer that records every call instead of drawing.
    #[derive(Debug, Default)]
    pub struct RecordingRenderer {
        pub calls: Vec<DrawCall>,
    }

    impl RecordingRenderer {
        pub fn sprites_in(&self, atlas: &str) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, DrawCall::Sprite { atlas: a, .. } if a == atlas))
                .count()
        }
    }

    impl Renderer for RecordingRenderer {
        fn fill_background(&mut self, viewport: Rect) {
            self.calls.push(DrawCall::Background(viewport));
        }

        fn draw_sprite(&mut self, layer: Layer, atlas: &str, frame: usize, dest: Rect) {
            self.calls.push(DrawCall::Sprite {
                layer,
                atlas: atlas.to_string(),
                frame,
                dest,
            });
        }

        fn draw_text(&mut self, layer: Layer, text: &str, x: i32, y: i32) {
            self.calls.push(DrawCall::Text {
                layer,
                text: text.to_string(),
                x,
                y,
            });
        }
    }

    // ================================================================
    // Scene Trait Contract Tests
    // ================================================================
    // These functions form a generic test suite that every Scene
    // implementation must pass. Scene crates call them from their own
    // #[cfg(test)] modules with a concrete scene instance.

    /// After startup(), serialize_state() must return non-empty bytes.
    pub fn contract_startup_creates_state(scene: &mut dyn Scene) {
        scene.startup(0, make_session(0));
        let state = scene.serialize_state();
        assert!(
            !state.is_empty(),
            "serialize_state() must return non-empty bytes after startup"
        );
        assert!(!scene.is_done(), "a freshly started scene must not be done");
    }

    /// update() with dt>0 must advance the scene state (its clock at least).
    pub fn contract_update_advances_time(scene: &mut dyn Scene) {
        let before = scene.serialize_state();
        scene.update(FRAME_DT, &InputState::idle());
        let after = scene.serialize_state();
        assert_ne!(before, after, "update(dt>0) must advance scene state");
    }

    /// serialize_state → apply_state roundtrip must be stable.
    pub fn contract_state_roundtrip_preserves(scene: &mut dyn Scene) {
        let state_a = scene.serialize_state();
        scene.apply_state(&state_a);
        let state_b = scene.serialize_state();
        assert_eq!(
            state_a, state_b,
            "State must be stable after serialize→apply→serialize roundtrip"
        );
    }

    /// Garbage bytes passed to apply_state() must be ignored without panicking.
    pub fn contract_garbage_state_ignored(scene: &mut dyn Scene) {
        let before = scene.serialize_state();
        scene.apply_state(&[0xde, 0xad, 0xbe, 0xef]);
        scene.apply_state(&[]);
        let after = scene.serialize_state();
        assert_eq!(before, after, "Undecodable state must leave the scene untouched");
    }

    /// pause() must freeze the simulation, resume() must unfreeze it.
    pub fn contract_pause_stops_updates(scene: &mut dyn Scene) {
        scene.pause();
        let before = scene.serialize_state();
        let events = scene.update(FRAME_DT, &InputState::idle());
        let during_pause = scene.serialize_state();
        assert_eq!(before, during_pause, "State must not change while paused");
        assert!(events.is_empty(), "A paused scene must not emit events");

        scene.resume();
        scene.update(FRAME_DT, &InputState::idle());
        let after_resume = scene.serialize_state();
        assert_ne!(during_pause, after_resume, "State must change after resume");
    }

    /// Running update() long enough with `input` must finish the scene.
    pub fn contract_scene_eventually_finishes(
        scene: &mut dyn Scene,
        input: &InputState,
        max_frames: usize,
    ) {
        for _ in 0..max_frames {
            scene.update(FRAME_DT, input);
            if scene.is_done() {
                assert!(
                    scene.next_scene().is_some(),
                    "A finished scene must name the next scene"
                );
                return;
            }
        }
        assert!(
            scene.is_done(),
            "Scene must finish within {max_frames} frames"
        );
    }

    /// draw() must emit its calls in back-to-front layer order.
    pub fn contract_draw_follows_layer_order(scene: &dyn Scene) -> RecordingRenderer {
        let mut renderer = RecordingRenderer::default();
        scene.draw(&mut renderer);
        assert!(
            matches!(renderer.calls.first(), Some(DrawCall::Background(_))),
            "The background must be drawn first"
        );
        let layers: Vec<Layer> = renderer.calls.iter().map(DrawCall::layer).collect();
        assert!(
            layers.windows(2).all(|w| w[0] <= w[1]),
            "Draw calls must follow Layer::ORDER, got {layers:?}"
        );
        renderer
    }
}
