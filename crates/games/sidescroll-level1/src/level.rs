//! The level's frame pipeline.
//!
//! [`Level1State`] holds every live object in the level. One call to
//! [`Level1State::advance`] runs a frame: it dispatches on the top-level
//! [`LevelState`], updates the sprite groups, resolves movement and
//! collisions, scrolls the camera and ticks the level clock. Side effects
//! land in the frame's [`EventQueue`] and are drained by the scene.

use serde::{Deserialize, Serialize};

use sidescroll_core::events::{EventQueue, SceneEvent, SoundEffect};
use sidescroll_core::geometry::{Rect, step};
use sidescroll_core::input::InputState;
use sidescroll_core::session::{LevelState, NextScene, SessionInfo};
use sidescroll_core::time::{FrameClock, elapsed};

use crate::bricks::{Brick, BrickPiece};
use crate::checkpoint::{Checkpoint, CheckpointKind};
use crate::clock::{ClockMode, LevelClock};
use crate::coin::Coin;
use crate::coin_box::CoinBox;
use crate::collision::Solids;
use crate::config::Level1Config;
use crate::contents::{Contents, SizeChange, Spawn, apply_size_change};
use crate::enemies::Enemy;
use crate::entity::{Collider, first_collision};
use crate::flagpole::{CastleFlag, FlagPole, FlagState};
use crate::layout::LevelLayout;
use crate::physics::{GROUND_HEIGHT, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::player::{Player, PlayerState};
use crate::powerups::Powerup;
use crate::score::{Score, update_scores};

/// Player spawn offset from the left edge of the camera.
pub const PLAYER_START_OFFSET: i32 = 110;
/// Closest the player may get to the left edge of the camera.
pub const VIEWPORT_MARGIN: i32 = 5;
/// Camera start used after dying past [`RESTART_THRESHOLD_X`].
pub const RESTART_CAMERA_X: i32 = 3440;
/// Level x past which a death restarts the level halfway through.
pub const RESTART_THRESHOLD_X: i32 = 3670;
/// Velocity after bumping a block or a ceiling from below.
pub const HEAD_BUMP_VEL: f32 = 7.0;
/// Upward velocity after stomping an enemy.
pub const STOMP_REBOUND_VEL: f32 = -7.0;

/// Horizontal offset of the flag-pole score from the pole.
const FLAG_SCORE_OFFSET_X: i32 = 13;
/// Bottom edges that split the pole into scoring bands, highest payout
/// last.
const FLAG_SCORE_BANDS: [(i32, u32); 4] = [(458, 100), (338, 400), (258, 800), (138, 2000)];
const FLAG_SCORE_TOP: u32 = 5000;

/// Points for reaching the pole with the player's bottom edge at `bottom`.
pub fn flag_pole_points(bottom: i32) -> u32 {
    FLAG_SCORE_BANDS
        .iter()
        .find(|(band, _)| bottom > *band)
        .map_or(FLAG_SCORE_TOP, |(_, points)| *points)
}

/// Authoritative level state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level1State {
    pub clock: FrameClock,
    pub session: SessionInfo,
    pub level_state: LevelState,
    /// Camera rectangle in level coordinates.
    pub viewport: Rect,
    pub level_width: i32,
    pub player: Player,
    pub ground: Vec<Collider>,
    pub bricks: Vec<Brick>,
    pub brick_pieces: Vec<BrickPiece>,
    pub coin_boxes: Vec<CoinBox>,
    pub enemies: Vec<Enemy>,
    pub shells: Vec<Enemy>,
    /// Squashed and launched enemies playing out their last frames.
    pub dying: Vec<Enemy>,
    pub powerups: Vec<Powerup>,
    pub coins: Vec<Coin>,
    pub checkpoints: Vec<Checkpoint>,
    pub flag_pole: FlagPole,
    pub castle_flag: Option<CastleFlag>,
    /// Floating scores, in screen coordinates.
    pub moving_scores: Vec<Score>,
    /// The flag-pole score, in level coordinates.
    pub flag_score: Option<Score>,
    /// Flag-pole points not yet banked.
    pub flag_score_total: u32,
    pub level_clock: LevelClock,
    pub death_timer: Option<u64>,
    pub flag_timer: Option<u64>,
    pub done: bool,
    pub next: Option<NextScene>,
    #[serde(skip)]
    pub(crate) events: EventQueue,
}

impl Level1State {
    /// Fresh level at `now`, continuing `session`.
    pub fn new(
        layout: &LevelLayout,
        config: &Level1Config,
        now: u64,
        mut session: SessionInfo,
    ) -> Self {
        session.current_time = now;
        session.level_state = LevelState::NotFrozen;
        session.mario_dead = false;

        let viewport = Rect::new(session.camera_start_x, 0, SCREEN_WIDTH, SCREEN_HEIGHT);
        let player = Player::new(viewport.x + PLAYER_START_OFFSET, GROUND_HEIGHT, now);

        Self {
            clock: FrameClock::starting_at(now),
            session,
            level_state: LevelState::NotFrozen,
            viewport,
            level_width: layout.width,
            player,
            ground: layout.colliders(),
            bricks: layout.bricks(),
            brick_pieces: Vec::new(),
            coin_boxes: layout.coin_boxes(),
            enemies: Vec::new(),
            shells: Vec::new(),
            dying: Vec::new(),
            powerups: Vec::new(),
            coins: Vec::new(),
            checkpoints: layout.checkpoints(),
            flag_pole: layout.flag_pole(),
            castle_flag: None,
            moving_scores: Vec::new(),
            flag_score: None,
            flag_score_total: 0,
            level_clock: LevelClock::new(
                config.starting_time,
                config.count_down_interval_ms,
                now,
            ),
            death_timer: None,
            flag_timer: None,
            done: false,
            next: None,
            events: EventQueue::new(),
        }
    }

    /// Everything the player and entities stand on.
    pub fn solids(&self) -> Solids<'_> {
        Solids {
            ground: &self.ground,
            bricks: &self.bricks,
            coin_boxes: &self.coin_boxes,
        }
    }

    /// Take the events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        self.events.drain()
    }

    /// Run one frame of `dt` seconds.
    pub fn advance(
        &mut self,
        dt: f32,
        input: &InputState,
        config: &Level1Config,
        layout: &LevelLayout,
    ) {
        if self.done {
            return;
        }
        let now = self.clock.advance(dt);
        self.session.current_time = now;

        match self.level_state {
            LevelState::Frozen => self.update_during_transition(now, input, config),
            LevelState::NotFrozen => self.update_all_sprites(now, input, config, layout),
            LevelState::InCastle => self.update_while_in_castle(now, layout),
            LevelState::FlagAndFireworks => self.update_flag_and_fireworks(now, config),
        }

        self.check_if_time_out();
    }

    // ================================================================
    // Per-state frame handlers
    // ================================================================

    /// Only the player, blocks and the flag move while the level is
    /// frozen.
    fn update_during_transition(&mut self, now: u64, input: &InputState, config: &Level1Config) {
        self.player
            .update(now, input, &config.physics, &mut self.powerups, &mut self.events);
        self.update_floating_scores();
        self.update_coin_boxes(now);
        self.flag_pole.update();
        self.check_if_player_in_transition();
        self.check_flag();
        self.check_for_player_death(now, config);
        self.update_clock(now);
    }

    fn update_all_sprites(
        &mut self,
        now: u64,
        input: &InputState,
        config: &Level1Config,
        layout: &LevelLayout,
    ) {
        self.player
            .update(now, input, &config.physics, &mut self.powerups, &mut self.events);
        self.update_floating_scores();
        self.flag_pole.update();
        self.check_checkpoints(now, layout);

        self.enemies.retain_mut(|e| e.update(now));
        self.dying.retain_mut(|e| e.update(now));
        self.shells.retain_mut(|e| e.update(now));

        let mut spawns = Vec::new();
        for brick in &mut self.bricks {
            spawns.extend(brick.update(now));
        }
        for spawn in spawns {
            self.spawn(spawn);
        }
        self.update_coin_boxes(now);

        let viewport = self.viewport;
        self.powerups.retain_mut(|p| p.update(now, &viewport));
        let mut landed = Vec::new();
        self.coins.retain_mut(|coin| match coin.update(now, &viewport) {
            Some(score) => {
                landed.push(score);
                false
            },
            None => true,
        });
        self.moving_scores.extend(landed);
        self.brick_pieces.retain_mut(BrickPiece::update);

        self.adjust_sprite_positions(now);
        self.check_if_player_in_transition();
        self.check_for_player_death(now, config);
        self.update_viewport();
        self.update_clock(now);
    }

    fn update_while_in_castle(&mut self, now: u64, layout: &LevelLayout) {
        update_scores(&mut self.moving_scores);
        self.update_clock(now);
        if self.level_clock.mode == ClockMode::EndOfLevel {
            self.set_level_state(LevelState::FlagAndFireworks);
            self.castle_flag = Some(layout.castle_flag());
        }
    }

    fn update_flag_and_fireworks(&mut self, now: u64, config: &Level1Config) {
        update_scores(&mut self.moving_scores);
        self.update_clock(now);
        if let Some(flag) = self.castle_flag.as_mut() {
            flag.update();
        }
        match self.flag_timer {
            None => self.flag_timer = Some(now),
            Some(start) if elapsed(now, start) > config.fireworks_ms => {
                self.set_game_info_values();
                self.finish(NextScene::GameOver);
            },
            Some(_) => {},
        }
    }

    fn adjust_sprite_positions(&mut self, now: u64) {
        self.adjust_player_position(now);
        self.adjust_enemy_positions();
        self.adjust_shell_positions();
        self.adjust_powerup_positions(now);
    }

    // ================================================================
    // Group updates
    // ================================================================

    fn update_coin_boxes(&mut self, now: u64) {
        let mut spawns = Vec::new();
        for coin_box in &mut self.coin_boxes {
            spawns.extend(coin_box.update(now));
        }
        for spawn in spawns {
            self.spawn(spawn);
        }
    }

    fn update_floating_scores(&mut self) {
        update_scores(&mut self.moving_scores);
        let Some(flag_score) = self.flag_score.as_mut() else {
            return;
        };
        flag_score.update();
        if flag_score.y_vel == 0 && self.flag_score_total > 0 {
            let points = std::mem::take(&mut self.flag_score_total);
            self.award(points);
        }
    }

    pub(crate) fn spawn(&mut self, spawn: Spawn) {
        match spawn {
            Spawn::Coin(coin) => self.coins.push(coin),
            Spawn::Powerup(powerup) => self.powerups.push(powerup),
        }
    }

    // ================================================================
    // Checkpoints and the end of the level
    // ================================================================

    fn check_checkpoints(&mut self, now: u64, layout: &LevelLayout) {
        let Some(i) = first_collision(&self.player.rect, &self.checkpoints) else {
            return;
        };
        let checkpoint = self.checkpoints.remove(i);
        tracing::debug!(id = %checkpoint.kind, x = self.player.rect.x, "checkpoint reached");

        match checkpoint.kind {
            CheckpointKind::EnemyWave(n) => {
                let wave = layout.wave(n, self.viewport.right(), now);
                self.enemies.extend(wave);
            },
            CheckpointKind::FlagPole => self.grab_flag_pole(&checkpoint),
            CheckpointKind::CastleEntry => {
                self.set_level_state(LevelState::InCastle);
                // The player keeps whatever state it walked in with.
                self.player.in_castle = true;
                self.level_clock.start_fast_count_down();
                self.events.sound(SoundEffect::CountDown);
            },
            CheckpointKind::SecretMushroom => {
                if self.player.y_vel < 0.0 {
                    let rect = checkpoint.rect;
                    let mut coin_box = CoinBox::new(rect.x, rect.bottom() - 40, Contents::OneUp);
                    if let Some(spawn) = coin_box.start_bump(now, &mut self.events) {
                        self.spawn(spawn);
                    }
                    self.player.y_vel = HEAD_BUMP_VEL;
                    self.player.rect.y = coin_box.rect.bottom();
                    self.player.state = PlayerState::Fall;
                    self.coin_boxes.push(coin_box);
                }
            },
        }
    }

    fn grab_flag_pole(&mut self, checkpoint: &Checkpoint) {
        self.player.end_invincibility();
        self.player.start_flag_pole(checkpoint.rect.right());
        let flag_top = self.flag_pole.flag.rect.y;
        if self.player.rect.bottom() < flag_top {
            self.player.rect.set_bottom(flag_top);
        }
        self.flag_pole.flag.start_sliding();
        self.events.sound(SoundEffect::Flagpole);

        let points = flag_pole_points(self.player.rect.bottom());
        self.flag_score_total = points;
        self.flag_score = Some(Score::flag_pole(
            self.flag_pole.flag.rect.right() + FLAG_SCORE_OFFSET_X,
            GROUND_HEIGHT - 60,
            points,
        ));
    }

    fn check_flag(&mut self) {
        if self.flag_pole.flag.state == FlagState::BottomOfPole
            && self.player.state == PlayerState::FlagPole
        {
            self.player.set_state_to_bottom_of_pole();
        }
    }

    fn check_if_player_in_transition(&mut self) {
        if self.player.in_transition || self.player.dead {
            self.set_level_state(LevelState::Frozen);
        } else if self.level_state == LevelState::Frozen {
            self.set_level_state(LevelState::NotFrozen);
        }
    }

    // ================================================================
    // Death and hand-off
    // ================================================================

    pub(crate) fn kill_player(&mut self) {
        tracing::debug!(x = self.player.rect.x, "player killed");
        self.player.start_death_jump();
        self.session.mario_dead = true;
        self.set_level_state(LevelState::Frozen);
        self.events.sound(SoundEffect::Death);
    }

    fn check_if_time_out(&mut self) {
        if self.level_clock.is_out_of_time() && !self.player.dead && !self.player.in_castle {
            tracing::debug!("level clock ran out");
            self.kill_player();
        }
    }

    fn check_for_player_death(&mut self, now: u64, config: &Level1Config) {
        if self.player.rect.y > SCREEN_HEIGHT && !self.player.in_castle && !self.player.dead {
            tracing::debug!(x = self.player.rect.x, "player fell out of the level");
            self.player.dead = true;
            self.player.x_vel = 0.0;
            self.session.mario_dead = true;
            self.set_level_state(LevelState::Frozen);
            self.events.sound(SoundEffect::Death);
        }

        if !self.player.dead {
            return;
        }
        match self.death_timer {
            None => self.death_timer = Some(now),
            Some(start) if elapsed(now, start) > config.death_sequence_ms => {
                let next = self.set_game_info_values();
                self.finish(next);
            },
            Some(_) => {},
        }
    }

    /// Write the level's outcome into the session and pick the next scene.
    fn set_game_info_values(&mut self) -> NextScene {
        self.session.record_top_score();
        let dead = self.player.dead;
        if dead {
            self.session.lives = self.session.lives.saturating_sub(1);
        }

        if self.session.lives == 0 {
            self.session.camera_start_x = 0;
            NextScene::GameOver
        } else if !dead {
            self.session.camera_start_x = 0;
            NextScene::MainMenu
        } else if self.level_clock.is_out_of_time() {
            NextScene::TimeOut
        } else {
            if self.player.rect.x > RESTART_THRESHOLD_X && self.session.camera_start_x == 0 {
                self.session.camera_start_x = RESTART_CAMERA_X;
            }
            NextScene::LoadScreen
        }
    }

    fn finish(&mut self, next: NextScene) {
        tracing::info!(?next, score = self.session.score, lives = self.session.lives, "level finished");
        self.next = Some(next);
        self.done = true;
        self.events.push(SceneEvent::Finished { next });
    }

    // ================================================================
    // Camera and clock
    // ================================================================

    fn update_viewport(&mut self) {
        let third = self.viewport.x + self.viewport.w / 3;
        let player = &self.player;
        if player.x_vel <= 0.0 || player.rect.centerx() < third {
            return;
        }
        let mult = if player.rect.right() < self.viewport.centerx() {
            0.5
        } else {
            1.0
        };
        let max_x = self.level_width - self.viewport.w;
        self.viewport.x = step(self.viewport.x, mult * player.x_vel).min(max_x);
    }

    fn update_clock(&mut self, now: u64) {
        let running = self.level_state == LevelState::NotFrozen
            && !self.player.dead
            && !matches!(
                self.player.state,
                PlayerState::WalkingToCastle | PlayerState::EndOfLevelFall
            );
        let bonus = self.level_clock.update(now, running);
        if bonus > 0 {
            self.award(bonus);
        }
    }

    // ================================================================
    // Session bookkeeping
    // ================================================================

    pub(crate) fn set_level_state(&mut self, state: LevelState) {
        if self.level_state == state {
            return;
        }
        tracing::debug!(from = ?self.level_state, to = ?state, "level state changed");
        self.level_state = state;
        self.session.level_state = state;
        self.events.push(SceneEvent::StateChanged(state));
    }

    /// Bank `points` without a floating score.
    pub(crate) fn award(&mut self, points: u32) {
        self.session.add_score(points);
        self.events.push(SceneEvent::ScoreAwarded {
            points,
            total: self.session.score,
        });
    }

    /// Bank `points` and float them up from level position (`x`, `y`).
    pub(crate) fn award_at(&mut self, points: u32, x: i32, y: i32) {
        self.award(points);
        self.moving_scores
            .push(Score::points(x - self.viewport.x, y, points));
    }

    /// Extra life, announced from level position (`x`, `y`).
    pub(crate) fn gain_life(&mut self, x: i32, y: i32) {
        self.session.lives += 1;
        self.events.sound(SoundEffect::OneUp);
        self.events.push(SceneEvent::LifeGained {
            lives: self.session.lives,
        });
        self.moving_scores.push(Score::one_up(x - self.viewport.x, y));
    }

    pub(crate) fn change_size(&mut self, change: SizeChange) {
        apply_size_change(change, &mut self.bricks, &mut self.coin_boxes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sidescroll_core::input::Action;
    use sidescroll_core::test_helpers::FRAME_DT;

    fn fresh() -> (Level1State, Level1Config, LevelLayout) {
        let config = Level1Config::default();
        let layout = LevelLayout::world_1_1();
        let state = Level1State::new(&layout, &config, 0, SessionInfo::new_game(0));
        (state, config, layout)
    }

    fn run(
        state: &mut Level1State,
        config: &Level1Config,
        layout: &LevelLayout,
        frames: usize,
        input: &InputState,
    ) -> Vec<SceneEvent> {
        let mut events = Vec::new();
        for _ in 0..frames {
            state.advance(FRAME_DT, input, config, layout);
            events.extend(state.drain_events());
        }
        events
    }

    #[test]
    fn startup_places_player_on_ground() {
        let (state, _, _) = fresh();
        assert_eq!(state.player.rect.x, PLAYER_START_OFFSET);
        assert_eq!(state.player.rect.bottom(), GROUND_HEIGHT);
        assert_eq!(state.level_state, LevelState::NotFrozen);
        assert_eq!(state.level_clock.time, 401);
        assert_eq!(state.viewport, Rect::new(0, 0, 800, 600));
    }

    #[test]
    fn startup_honours_camera_start() {
        let config = Level1Config::default();
        let layout = LevelLayout::world_1_1();
        let mut session = SessionInfo::new_game(0);
        session.camera_start_x = RESTART_CAMERA_X;
        session.mario_dead = true;
        let state = Level1State::new(&layout, &config, 500, session);
        assert_eq!(state.viewport.x, RESTART_CAMERA_X);
        assert_eq!(state.player.rect.x, RESTART_CAMERA_X + PLAYER_START_OFFSET);
        assert!(!state.session.mario_dead);
        assert_eq!(state.session.current_time, 500);
    }

    #[test]
    fn idle_player_stays_put() {
        let (mut state, config, layout) = fresh();
        run(&mut state, &config, &layout, 30, &InputState::idle());
        assert_eq!(state.player.x_vel, 0.0);
        assert_eq!(state.player.rect.x, PLAYER_START_OFFSET);
        assert_eq!(state.player.rect.bottom(), GROUND_HEIGHT);
        assert!(matches!(
            state.player.state,
            PlayerState::Stand | PlayerState::Walk
        ));
    }

    #[test]
    fn flag_points_by_height() {
        assert_eq!(flag_pole_points(493), 100);
        assert_eq!(flag_pole_points(400), 400);
        assert_eq!(flag_pole_points(300), 800);
        assert_eq!(flag_pole_points(200), 2000);
        assert_eq!(flag_pole_points(138), 5000);
        assert_eq!(flag_pole_points(100), 5000);
    }

    #[test]
    fn first_checkpoint_releases_wave() {
        let (mut state, config, layout) = fresh();
        state.player.rect.x = 505;
        run(&mut state, &config, &layout, 1, &InputState::idle());
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.checkpoints.len(), 12);
        assert_eq!(state.enemies[0].rect.x, state.viewport.right() - 2);
    }

    #[test]
    fn camera_scrolls_once_player_passes_a_third() {
        let (mut state, config, layout) = fresh();
        state.checkpoints.clear();
        state.player.rect.x = 300;
        run(&mut state, &config, &layout, 60, &InputState::idle().with(Action::Right));
        assert!(state.viewport.x > 0);
        assert!(state.player.rect.x > state.viewport.x + VIEWPORT_MARGIN);
    }

    #[test]
    fn camera_never_scrolls_back() {
        let (mut state, config, layout) = fresh();
        state.checkpoints.clear();
        state.viewport.x = 1000;
        state.player.rect.x = 1100;
        run(&mut state, &config, &layout, 60, &InputState::idle().with(Action::Left));
        assert_eq!(state.viewport.x, 1000);
        assert!(state.player.rect.x >= 1000 + VIEWPORT_MARGIN);
    }

    #[test]
    fn camera_stops_at_level_end() {
        let (mut state, _, _) = fresh();
        state.viewport.x = state.level_width - SCREEN_WIDTH - 2;
        state.player.rect.x = state.viewport.x + 500;
        state.player.x_vel = 6.0;
        state.update_viewport();
        assert_eq!(state.viewport.x, state.level_width - SCREEN_WIDTH);
    }

    #[test]
    fn clock_running_out_kills_player() {
        let (mut state, config, layout) = fresh();
        state.level_clock.time = 0;
        let events = run(&mut state, &config, &layout, 1, &InputState::idle());
        assert_eq!(state.player.state, PlayerState::DeathJump);
        assert_eq!(state.level_state, LevelState::Frozen);
        assert!(state.session.mario_dead);
        assert!(events.contains(&SceneEvent::Sound(SoundEffect::Death)));
        assert!(events.contains(&SceneEvent::StateChanged(LevelState::Frozen)));
    }

    #[test]
    fn time_out_hands_off_to_time_out_screen() {
        let (mut state, config, layout) = fresh();
        state.level_clock.time = 0;
        let events = run(&mut state, &config, &layout, 300, &InputState::idle());
        assert!(state.done);
        assert_eq!(state.next, Some(NextScene::TimeOut));
        assert_eq!(state.session.lives, 2);
        assert!(events.contains(&SceneEvent::Finished {
            next: NextScene::TimeOut
        }));
    }

    #[test]
    fn falling_out_of_level_costs_a_life() {
        let (mut state, config, layout) = fresh();
        state.checkpoints.clear();
        state.player.rect.y = SCREEN_HEIGHT + 10;
        state.player.state = PlayerState::Fall;
        run(&mut state, &config, &layout, 1, &InputState::idle());
        assert!(state.player.dead);
        assert_eq!(state.level_state, LevelState::Frozen);

        run(&mut state, &config, &layout, 200, &InputState::idle());
        assert!(state.done);
        assert_eq!(state.next, Some(NextScene::LoadScreen));
        assert_eq!(state.session.lives, 2);
        assert_eq!(state.session.camera_start_x, 0);
    }

    #[test]
    fn dying_past_halfway_restarts_there() {
        let (mut state, _, _) = fresh();
        state.player.dead = true;
        state.player.rect.x = RESTART_THRESHOLD_X + 1;
        assert_eq!(state.set_game_info_values(), NextScene::LoadScreen);
        assert_eq!(state.session.camera_start_x, RESTART_CAMERA_X);
    }

    #[test]
    fn last_life_means_game_over() {
        let (mut state, _, _) = fresh();
        state.session.lives = 1;
        state.session.camera_start_x = RESTART_CAMERA_X;
        state.player.dead = true;
        assert_eq!(state.set_game_info_values(), NextScene::GameOver);
        assert_eq!(state.session.lives, 0);
        assert_eq!(state.session.camera_start_x, 0);
    }

    #[test]
    fn top_score_recorded_on_hand_off() {
        let (mut state, _, _) = fresh();
        state.session.score = 4200;
        assert_eq!(state.set_game_info_values(), NextScene::MainMenu);
        assert_eq!(state.session.top_score, 4200);
        assert_eq!(state.session.lives, 3);
    }

    #[test]
    fn flag_pole_freezes_level_and_scores() {
        let (mut state, config, layout) = fresh();
        state.checkpoints.retain(|c| c.kind == CheckpointKind::FlagPole);
        let pole = state.checkpoints[0].rect;
        state.viewport.x = pole.x - 400;
        state.player.rect.set_bottom(300);
        state.player.rect.x = pole.x - 5;
        state.player.state = PlayerState::Fall;
        let events = run(&mut state, &config, &layout, 1, &InputState::idle());
        assert_eq!(state.player.state, PlayerState::FlagPole);
        assert_eq!(state.flag_score_total, 800);
        assert_eq!(state.level_state, LevelState::Frozen);
        assert!(events.contains(&SceneEvent::Sound(SoundEffect::Flagpole)));
        assert_eq!(state.flag_pole.flag.state, FlagState::SlideDown);
    }

    #[test]
    fn flag_score_banks_once_it_stops() {
        let (mut state, config, layout) = fresh();
        state.flag_score = Some(Score::flag_pole(8518, 478, 2000));
        state.flag_score_total = 2000;
        run(&mut state, &config, &layout, 120, &InputState::idle());
        assert_eq!(state.session.score, 2000);
        assert_eq!(state.flag_score_total, 0);
    }

    #[test]
    fn castle_entry_drains_clock_into_score() {
        let (mut state, config, layout) = fresh();
        state.checkpoints.retain(|c| c.kind == CheckpointKind::CastleEntry);
        let door = state.checkpoints[0].rect;
        state.viewport.x = door.x - 400;
        state.player.rect.x = door.x - 5;
        state.level_clock.time = 10;
        let events = run(&mut state, &config, &layout, 1, &InputState::idle());
        assert!(state.player.in_castle);
        assert_eq!(state.level_state, LevelState::InCastle);
        assert!(events.contains(&SceneEvent::Sound(SoundEffect::CountDown)));

        run(&mut state, &config, &layout, 12, &InputState::idle());
        assert_eq!(state.session.score, 500);
        assert_eq!(state.level_state, LevelState::FlagAndFireworks);
        assert!(state.castle_flag.is_some());

        let events = run(&mut state, &config, &layout, 200, &InputState::idle());
        assert!(state.done);
        assert_eq!(state.next, Some(NextScene::GameOver));
        assert_eq!(state.session.lives, 3);
        assert!(events.contains(&SceneEvent::Finished {
            next: NextScene::GameOver
        }));
    }

    #[test]
    fn secret_mushroom_needs_upward_motion() {
        let (mut state, _, layout) = fresh();
        state.checkpoints.retain(|c| c.kind == CheckpointKind::SecretMushroom);
        let zone = state.checkpoints[0].rect;
        state.viewport.x = zone.x - 400;
        state.player.rect.x = zone.x;
        state.player.rect.set_bottom(zone.bottom() + 20);
        let boxes = state.coin_boxes.len();

        state.player.state = PlayerState::Fall;
        state.player.y_vel = 2.0;
        state.check_checkpoints(0, &layout);
        assert_eq!(state.coin_boxes.len(), boxes);
        assert!(state.checkpoints.is_empty());

        let (mut state, _, _) = fresh();
        state.checkpoints.retain(|c| c.kind == CheckpointKind::SecretMushroom);
        state.viewport.x = zone.x - 400;
        state.player.rect.x = zone.x;
        state.player.rect.set_bottom(zone.bottom() + 20);
        state.player.state = PlayerState::Jump;
        state.player.y_vel = -5.0;
        state.check_checkpoints(0, &layout);
        assert_eq!(state.coin_boxes.len(), boxes + 1);
        let revealed = &state.coin_boxes[boxes];
        assert_eq!(revealed.contents, Contents::OneUp);
        assert_eq!(state.player.y_vel, HEAD_BUMP_VEL);
        assert_eq!(state.player.state, PlayerState::Fall);
        assert_eq!(state.player.rect.y, revealed.rect.bottom());
    }

    #[test]
    fn level_state_changes_are_mirrored_into_session() {
        let (mut state, _, _) = fresh();
        state.set_level_state(LevelState::Frozen);
        assert_eq!(state.session.level_state, LevelState::Frozen);
        state.set_level_state(LevelState::Frozen);
        let changes = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, SceneEvent::StateChanged(_)))
            .count();
        assert_eq!(changes, 1);
    }

    #[test]
    fn award_reports_running_total() {
        let (mut state, _, _) = fresh();
        state.session.score = 100;
        state.award_at(200, 500, 300);
        assert_eq!(
            state.drain_events(),
            vec![SceneEvent::ScoreAwarded {
                points: 200,
                total: 300
            }]
        );
        assert_eq!(state.moving_scores.len(), 1);
    }
}
