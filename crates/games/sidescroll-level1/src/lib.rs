pub mod bricks;
pub mod checkpoint;
pub mod clock;
pub mod coin;
pub mod coin_box;
pub mod collision;
pub mod config;
pub mod contents;
mod draw;
pub mod enemies;
pub mod entity;
mod entity_collisions;
pub mod flagpole;
pub mod layout;
pub mod level;
pub mod physics;
pub mod player;
mod player_collisions;
pub mod powerups;
pub mod score;
pub mod transition;

use sidescroll_core::error::SceneError;
use sidescroll_core::events::SceneEvent;
use sidescroll_core::input::InputState;
use sidescroll_core::render::Renderer;
use sidescroll_core::scene::{Scene, SceneMetadata};
use sidescroll_core::scene_boilerplate;
use sidescroll_core::session::{NextScene, SessionInfo};

pub use config::Level1Config;
pub use layout::LevelLayout;
pub use level::Level1State;

/// World 1-1.
pub struct Level1 {
    state: Level1State,
    config: Level1Config,
    layout: LevelLayout,
    paused: bool,
}

impl Level1 {
    pub fn new() -> Self {
        Self::with_config(Level1Config::default())
    }

    pub fn with_config(config: Level1Config) -> Self {
        let layout = LevelLayout::world_1_1();
        let state = Level1State::new(&layout, &config, 0, SessionInfo::new_game(0));
        Self {
            state,
            config,
            layout,
            paused: false,
        }
    }

    /// Level built from a custom layout, rejected if the layout is
    /// inconsistent.
    pub fn with_layout(config: Level1Config, layout: LevelLayout) -> Result<Self, SceneError> {
        layout.validate()?;
        let state = Level1State::new(&layout, &config, 0, SessionInfo::new_game(0));
        Ok(Self {
            state,
            config,
            layout,
            paused: false,
        })
    }

    /// Level using the config file named by `SIDESCROLL_LEVEL1_CONFIG`.
    pub fn load() -> Self {
        Self::with_config(Level1Config::load())
    }

    pub fn state(&self) -> &Level1State {
        &self.state
    }
}

impl Default for Level1 {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for Level1 {
    fn metadata(&self) -> SceneMetadata {
        SceneMetadata {
            name: "World 1-1".to_string(),
            description: "Reach the flag pole before the clock runs out.".to_string(),
        }
    }

    fn startup(&mut self, current_time: u64, session: SessionInfo) {
        tracing::info!(
            lives = session.lives,
            camera_start_x = session.camera_start_x,
            "starting level 1-1"
        );
        self.state = Level1State::new(&self.layout, &self.config, current_time, session);
        self.paused = false;
    }

    fn update(&mut self, dt: f32, input: &InputState) -> Vec<SceneEvent> {
        if self.paused || self.state.done {
            return Vec::new();
        }
        self.state.advance(dt, input, &self.config, &self.layout);
        self.state.drain_events()
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        self.state.draw(renderer);
    }

    scene_boilerplate!(state_type: Level1State);

    fn next_scene(&self) -> Option<NextScene> {
        self.state.next
    }

    fn session(&self) -> &SessionInfo {
        &self.state.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sidescroll_core::events::SoundEffect;
    use sidescroll_core::input::Action;
    use sidescroll_core::session::LevelState;
    use sidescroll_core::test_helpers::{FRAME_DT, make_session, run_scene_frames};

    fn started() -> Level1 {
        let mut level = Level1::new();
        level.startup(0, make_session(0));
        level
    }

    // ================================================================
    // Scene contract
    // ================================================================

    #[test]
    fn contract_startup_creates_state() {
        let mut level = Level1::new();
        sidescroll_core::test_helpers::contract_startup_creates_state(&mut level);
    }

    #[test]
    fn contract_update_advances_time() {
        let mut level = started();
        sidescroll_core::test_helpers::contract_update_advances_time(&mut level);
    }

    #[test]
    fn contract_state_roundtrip_preserves() {
        let mut level = started();
        run_scene_frames(&mut level, 30, &InputState::idle().with(Action::Right));
        sidescroll_core::test_helpers::contract_state_roundtrip_preserves(&mut level);
    }

    #[test]
    fn contract_garbage_state_ignored() {
        let mut level = started();
        sidescroll_core::test_helpers::contract_garbage_state_ignored(&mut level);
    }

    #[test]
    fn contract_pause_stops_updates() {
        let mut level = started();
        sidescroll_core::test_helpers::contract_pause_stops_updates(&mut level);
    }

    #[test]
    fn contract_scene_eventually_finishes() {
        let mut level = Level1::with_config(Level1Config {
            starting_time: 1,
            ..Level1Config::default()
        });
        level.startup(0, make_session(0));
        sidescroll_core::test_helpers::contract_scene_eventually_finishes(
            &mut level,
            &InputState::idle(),
            400,
        );
        assert_eq!(level.next_scene(), Some(NextScene::TimeOut));
    }

    #[test]
    fn contract_draw_follows_layer_order() {
        let mut level = started();
        run_scene_frames(&mut level, 60, &InputState::idle().with(Action::Right));
        sidescroll_core::test_helpers::contract_draw_follows_layer_order(&level);
    }

    // ================================================================
    // Scene wiring
    // ================================================================

    #[test]
    fn startup_carries_session_forward() {
        let mut level = Level1::new();
        let mut session = make_session(2500);
        session.lives = 2;
        session.coin_total = 7;
        level.startup(1000, session);
        assert_eq!(level.session().score, 2500);
        assert_eq!(level.session().lives, 2);
        assert_eq!(level.session().coin_total, 7);
        assert_eq!(level.session().current_time, 1000);
        assert_eq!(level.state().level_state, LevelState::NotFrozen);
    }

    #[test]
    fn startup_resets_a_finished_level() {
        let mut level = Level1::with_config(Level1Config {
            starting_time: 1,
            ..Level1Config::default()
        });
        level.startup(0, make_session(0));
        run_scene_frames(&mut level, 400, &InputState::idle());
        assert!(level.is_done());
        level.startup(10_000, make_session(0));
        assert!(!level.is_done());
        assert_eq!(level.next_scene(), None);
    }

    #[test]
    fn finished_level_stops_updating() {
        let mut level = Level1::with_config(Level1Config {
            starting_time: 1,
            ..Level1Config::default()
        });
        level.startup(0, make_session(0));
        run_scene_frames(&mut level, 400, &InputState::idle());
        assert!(level.is_done());
        let before = level.serialize_state();
        assert!(level.update(FRAME_DT, &InputState::idle()).is_empty());
        assert_eq!(before, level.serialize_state());
    }

    #[test]
    fn time_out_emits_death_sound_and_finished() {
        let mut level = Level1::with_config(Level1Config {
            starting_time: 1,
            ..Level1Config::default()
        });
        level.startup(0, make_session(0));
        let events = run_scene_frames(&mut level, 400, &InputState::idle());
        assert!(events.contains(&SceneEvent::Sound(SoundEffect::Death)));
        assert!(matches!(events.last(), Some(SceneEvent::Finished { .. })));
    }

    #[test]
    fn holding_right_moves_player_and_camera() {
        let mut level = started();
        let start = level.state().player.rect.x;
        run_scene_frames(&mut level, 60, &InputState::idle().with(Action::Right));
        assert!(level.state().player.rect.x > start + 150);
        assert!(level.state().viewport.x > 0);
        assert!(!level.state().player.dead);
    }

    #[test]
    fn invalid_layout_is_rejected() {
        let mut layout = LevelLayout::world_1_1();
        layout.width = 0;
        assert!(Level1::with_layout(Level1Config::default(), layout).is_err());
    }

    #[test]
    fn default_layout_is_accepted() {
        assert!(Level1::with_layout(Level1Config::default(), LevelLayout::world_1_1()).is_ok());
    }

    #[test]
    fn metadata_names_the_world() {
        assert_eq!(Level1::new().metadata().name, "World 1-1");
        assert_eq!(Level1::new().tick_rate(), 60.0);
    }
}
