//! The player's state machine.
//!
//! `Player::update` dispatches on [`PlayerState`], then refreshes status
//! effects (star, fire palette, hurt flicker, crouch) and finally picks the
//! pose to draw. Movement against the level happens afterwards in the
//! level's collision pass; the player only sets velocities here, except in
//! the scripted states (death jump, flag pole) that move the rect directly.

use serde::{Deserialize, Serialize};

use sidescroll_core::effect::{EffectKind, TimedEffect};
use sidescroll_core::events::{EventQueue, SoundEffect};
use sidescroll_core::geometry::{Direction, Rect};
use sidescroll_core::input::InputState;
use sidescroll_core::time::elapsed;

use crate::entity::Sprite;
use crate::physics::{MIN_WALK_SPEED, PlayerPhysicsConfig};
use crate::powerups::Powerup;
use crate::transition::{
    Anchor, BIG_TO_FIRE, BIG_TO_SMALL, BodySize, Palette, Pose, SMALL_TO_BIG, TransitionTable,
    frames,
};

/// Cooldown between two fireballs.
pub const FIREBALL_COOLDOWN_MS: u64 = 200;
/// Fireballs allowed on screen at once.
pub const MAX_FIREBALLS: usize = 2;
/// Delay before the death jump starts moving.
pub const DEATH_JUMP_DELAY_MS: u64 = 500;
/// Bottom edge at which the flag-pole slide stops.
pub const POLE_SLIDE_STOP: i32 = 493;
/// Pause at the foot of the pole before walking to the castle.
pub const POLE_BOTTOM_WAIT_MS: u64 = 210;
const POLE_SLIDE_SPEED: i32 = 5;
const CASTLE_WALK_SPEED: f32 = 5.0;

/// Hurt flicker: hidden for the first band, shown (and restarted) in the
/// second. Past the second band the current visibility holds.
const HURT_HIDDEN_MS: u64 = 35;
const HURT_SHOWN_MS: u64 = 70;
const STAR_FRAME_MS: u64 = 30;
const STAR_FADING_FRAME_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Stand,
    Walk,
    Jump,
    Fall,
    DeathJump,
    SmallToBig,
    BigToFire,
    BigToSmall,
    FlagPole,
    BottomOfPole,
    WalkingToCastle,
    EndOfLevelFall,
}

impl PlayerState {
    /// States that play a size transition.
    pub fn is_transition(self) -> bool {
        matches!(
            self,
            PlayerState::SmallToBig | PlayerState::BigToFire | PlayerState::BigToSmall
        )
    }
}

/// Timed status effects on the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusEffect {
    /// Star power.
    Invincible,
    /// Grace period after shrinking.
    Hurt,
}

impl EffectKind for StatusEffect {
    fn duration_ms(&self) -> u64 {
        match self {
            StatusEffect::Invincible => 12_000,
            StatusEffect::Hurt => 2_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    pub x_vel: f32,
    pub y_vel: f32,
    pub gravity: f32,
    pub max_x_vel: f32,
    pub x_accel: f32,
    pub facing_right: bool,
    pub state: PlayerState,
    pub pose: Pose,
    pub frame_index: usize,
    pub visible: bool,

    pub big: bool,
    pub fire: bool,
    pub invincible: bool,
    pub losing_invincibility: bool,
    pub hurt_invincible: bool,
    pub crouching: bool,
    pub allow_jump: bool,
    pub allow_fireball: bool,
    pub in_transition: bool,
    pub dead: bool,
    pub in_castle: bool,

    pub star: Option<TimedEffect<StatusEffect>>,
    pub hurt: Option<TimedEffect<StatusEffect>>,
    pub invincible_index: usize,
    pub invincible_animation_timer: u64,
    pub hurt_flicker_timer: u64,
    pub walking_timer: Option<u64>,
    pub transition_timer: Option<u64>,
    pub death_timer: Option<u64>,
    pub flag_pole_timer: Option<u64>,
    pub last_fireball_time: u64,
    pub flag_pole_right: i32,
    pub current_time: u64,
}

impl Player {
    /// Small player standing with its bottom-left corner at (`x`, `bottom`).
    pub fn new(x: i32, bottom: i32, now: u64) -> Self {
        let (w, h) = BodySize::Small.dimensions();
        Self {
            rect: Rect::with_bottom(x, bottom, w, h),
            x_vel: 0.0,
            y_vel: 0.0,
            gravity: crate::physics::GRAVITY,
            max_x_vel: crate::physics::MAX_WALK_SPEED,
            x_accel: crate::physics::WALK_ACCEL,
            facing_right: true,
            state: PlayerState::Walk,
            pose: Pose::new(BodySize::Small, Palette::Normal, frames::STAND),
            frame_index: frames::STAND,
            visible: true,
            big: false,
            fire: false,
            invincible: false,
            losing_invincibility: false,
            hurt_invincible: false,
            crouching: false,
            allow_jump: true,
            allow_fireball: true,
            in_transition: false,
            dead: false,
            in_castle: false,
            star: None,
            hurt: None,
            invincible_index: 0,
            invincible_animation_timer: now,
            hurt_flicker_timer: now,
            walking_timer: None,
            transition_timer: None,
            death_timer: None,
            flag_pole_timer: None,
            last_fireball_time: 0,
            flag_pole_right: 0,
            current_time: now,
        }
    }

    pub fn facing(&self) -> Direction {
        if self.facing_right {
            Direction::Right
        } else {
            Direction::Left
        }
    }

    /// Advance one frame.
    pub fn update(
        &mut self,
        now: u64,
        input: &InputState,
        physics: &PlayerPhysicsConfig,
        powerups: &mut Vec<Powerup>,
        events: &mut EventQueue,
    ) {
        self.current_time = now;
        self.handle_state(input, physics, powerups, events);
        self.check_for_special_state();
        self.animation();
    }

    fn handle_state(
        &mut self,
        input: &InputState,
        physics: &PlayerPhysicsConfig,
        powerups: &mut Vec<Powerup>,
        events: &mut EventQueue,
    ) {
        match self.state {
            PlayerState::Stand => self.standing(input, physics, powerups, events),
            PlayerState::Walk => self.walking(input, physics, powerups, events),
            PlayerState::Jump => self.jumping(input, physics, powerups, events),
            PlayerState::Fall => self.falling(input, physics, powerups, events),
            PlayerState::DeathJump => self.jumping_to_death(),
            PlayerState::SmallToBig => self.changing_to_big(),
            PlayerState::BigToFire => self.changing_to_fire(),
            PlayerState::BigToSmall => self.changing_to_small(),
            PlayerState::FlagPole => self.flag_pole_sliding(),
            PlayerState::BottomOfPole => self.sitting_at_bottom_of_pole(),
            PlayerState::WalkingToCastle => self.walking_to_castle(physics),
            PlayerState::EndOfLevelFall => self.y_vel += physics.gravity,
        }
    }

    // ================================================================
    // Ground states
    // ================================================================

    fn check_to_allow_jump(&mut self, input: &InputState) {
        if !input.jump {
            self.allow_jump = true;
        }
    }

    fn check_to_allow_fireball(&mut self, input: &InputState) {
        if !input.action {
            self.allow_fireball = true;
        }
    }

    fn try_shoot(&mut self, input: &InputState, powerups: &mut Vec<Powerup>, events: &mut EventQueue) {
        if input.action && self.fire && self.allow_fireball {
            self.shoot_fireball(powerups, events);
        }
    }

    fn jump_sound(&self) -> SoundEffect {
        if self.big {
            SoundEffect::BigJump
        } else {
            SoundEffect::SmallJump
        }
    }

    fn standing(
        &mut self,
        input: &InputState,
        physics: &PlayerPhysicsConfig,
        powerups: &mut Vec<Powerup>,
        events: &mut EventQueue,
    ) {
        self.check_to_allow_jump(input);
        self.check_to_allow_fireball(input);

        self.frame_index = frames::STAND;
        self.x_vel = 0.0;
        self.y_vel = 0.0;

        self.try_shoot(input, powerups, events);
        if input.down {
            self.crouching = true;
        }

        if input.left {
            self.facing_right = false;
            self.get_out_of_crouch();
            self.state = PlayerState::Walk;
        } else if input.right {
            self.facing_right = true;
            self.get_out_of_crouch();
            self.state = PlayerState::Walk;
        } else if input.jump && self.allow_jump {
            events.sound(self.jump_sound());
            self.state = PlayerState::Jump;
            self.y_vel = physics.jump_vel;
        } else {
            self.state = PlayerState::Stand;
        }

        if !input.down {
            self.get_out_of_crouch();
        }
    }

    fn get_out_of_crouch(&mut self) {
        if !self.crouching {
            return;
        }
        self.crouching = false;
        let size = self.body_size();
        self.resize(size, Anchor::Left);
    }

    fn animation_speed(&self) -> f32 {
        if self.x_vel == 0.0 {
            130.0
        } else {
            130.0 - self.x_vel.abs() * 13.0
        }
    }

    fn advance_walk_frame(&mut self) {
        if self.frame_index < frames::WALK_LAST {
            self.frame_index += 1;
        } else {
            self.frame_index = frames::WALK_FIRST;
        }
        self.walking_timer = Some(self.current_time);
    }

    fn walking(
        &mut self,
        input: &InputState,
        physics: &PlayerPhysicsConfig,
        powerups: &mut Vec<Powerup>,
        events: &mut EventQueue,
    ) {
        self.check_to_allow_jump(input);
        self.check_to_allow_fireball(input);

        if self.frame_index == frames::STAND {
            self.frame_index = frames::WALK_FIRST;
            self.walking_timer = Some(self.current_time);
        } else {
            let since = elapsed(self.current_time, self.walking_timer.unwrap_or(0));
            if since as f32 > self.animation_speed() {
                self.advance_walk_frame();
            }
        }

        if input.action {
            self.max_x_vel = physics.max_run_speed;
            self.x_accel = physics.run_accel;
            self.try_shoot(input, powerups, events);
        } else {
            self.max_x_vel = physics.max_walk_speed;
            self.x_accel = physics.walk_accel;
        }

        if input.jump && self.allow_jump {
            events.sound(self.jump_sound());
            self.state = PlayerState::Jump;
            self.y_vel = if self.x_vel > physics.fast_jump_threshold {
                physics.jump_vel - physics.fast_jump_bonus
            } else {
                physics.jump_vel
            };
        }

        if input.left {
            self.get_out_of_crouch();
            self.facing_right = false;
            if self.x_vel > 0.0 {
                self.frame_index = frames::SKID;
                self.x_accel = physics.small_turnaround;
            } else {
                self.x_accel = physics.walk_accel;
            }
            if self.x_vel > -self.max_x_vel {
                self.x_vel -= self.x_accel;
                if self.x_vel > -MIN_WALK_SPEED {
                    self.x_vel = -MIN_WALK_SPEED;
                }
            } else if self.x_vel < -self.max_x_vel {
                self.x_vel += self.x_accel;
            }
        } else if input.right {
            self.get_out_of_crouch();
            self.facing_right = true;
            if self.x_vel < 0.0 {
                self.frame_index = frames::SKID;
                self.x_accel = physics.small_turnaround;
            } else {
                self.x_accel = physics.walk_accel;
            }
            if self.x_vel < self.max_x_vel {
                self.x_vel += self.x_accel;
                if self.x_vel < MIN_WALK_SPEED {
                    self.x_vel = MIN_WALK_SPEED;
                }
            } else if self.x_vel > self.max_x_vel {
                self.x_vel -= self.x_accel;
            }
        } else if self.facing_right {
            if self.x_vel > 0.0 {
                self.x_vel -= self.x_accel;
            } else {
                self.x_vel = 0.0;
                self.state = PlayerState::Stand;
            }
        } else if self.x_vel < 0.0 {
            self.x_vel += self.x_accel;
        } else {
            self.x_vel = 0.0;
            self.state = PlayerState::Stand;
        }
    }

    // ================================================================
    // Air states
    // ================================================================

    fn air_control(&mut self, input: &InputState) {
        if input.left {
            if self.x_vel > -self.max_x_vel {
                self.x_vel -= self.x_accel;
            }
        } else if input.right && self.x_vel < self.max_x_vel {
            self.x_vel += self.x_accel;
        }
    }

    fn jumping(
        &mut self,
        input: &InputState,
        physics: &PlayerPhysicsConfig,
        powerups: &mut Vec<Powerup>,
        events: &mut EventQueue,
    ) {
        self.allow_jump = false;
        self.frame_index = frames::JUMP;
        self.gravity = physics.jump_gravity;
        self.y_vel += self.gravity;
        self.check_to_allow_fireball(input);

        if self.y_vel >= 0.0 && self.y_vel < physics.max_y_vel {
            self.gravity = physics.gravity;
            self.state = PlayerState::Fall;
        }

        self.air_control(input);

        if !input.jump {
            self.gravity = physics.gravity;
            self.state = PlayerState::Fall;
        }

        self.try_shoot(input, powerups, events);
    }

    fn falling(
        &mut self,
        input: &InputState,
        physics: &PlayerPhysicsConfig,
        powerups: &mut Vec<Powerup>,
        events: &mut EventQueue,
    ) {
        self.check_to_allow_fireball(input);
        if self.y_vel < physics.max_y_vel {
            self.y_vel += self.gravity;
        }
        self.air_control(input);
        self.try_shoot(input, powerups, events);
    }

    /// Throw a fireball if the cooldown has passed and fewer than
    /// [`MAX_FIREBALLS`] are on screen. The throw sound plays either way.
    pub fn shoot_fireball(&mut self, powerups: &mut Vec<Powerup>, events: &mut EventQueue) {
        events.sound(SoundEffect::Fireball);
        let live = powerups.iter().filter(|p| p.is_fireball()).count();
        if elapsed(self.current_time, self.last_fireball_time) > FIREBALL_COOLDOWN_MS
            && live < MAX_FIREBALLS
        {
            self.allow_fireball = false;
            powerups.push(Powerup::fireball(
                self.rect.right(),
                self.rect.y,
                self.facing(),
                self.current_time,
            ));
            self.last_fireball_time = self.current_time;
            self.frame_index = frames::DEATH;
        }
    }

    // ================================================================
    // Death
    // ================================================================

    /// Start the death animation. The caller records the death in the session.
    pub fn start_death_jump(&mut self) {
        self.dead = true;
        self.y_vel = -11.0;
        self.gravity = 0.5;
        self.frame_index = frames::DEATH;
        self.pose = Pose::new(self.body_size(), self.palette(), frames::DEATH);
        self.state = PlayerState::DeathJump;
        self.in_transition = true;
        tracing::debug!(x = self.rect.x, "player death jump");
    }

    fn jumping_to_death(&mut self) {
        match self.death_timer {
            None => self.death_timer = Some(self.current_time),
            Some(start) if elapsed(self.current_time, start) > DEATH_JUMP_DELAY_MS => {
                self.rect.y += self.y_vel as i32;
                self.y_vel += self.gravity;
            },
            Some(_) => {},
        }
    }

    // ================================================================
    // Size transitions
    // ================================================================

    pub fn start_growing(&mut self) {
        self.y_vel = -1.0;
        self.state = PlayerState::SmallToBig;
        self.in_transition = true;
        self.transition_timer = None;
    }

    pub fn start_fire_transition(&mut self) {
        self.y_vel = -1.0;
        self.state = PlayerState::BigToFire;
        self.in_transition = true;
        self.transition_timer = None;
    }

    /// Lose the big form after a hit.
    pub fn start_shrinking(&mut self) {
        self.fire = false;
        self.y_vel = -1.0;
        self.state = PlayerState::BigToSmall;
        self.in_transition = true;
        self.transition_timer = None;
    }

    /// Step `table`; returns true once it has committed.
    fn run_transition(&mut self, table: &TransitionTable) -> bool {
        self.in_transition = true;
        let Some(start) = self.transition_timer else {
            self.transition_timer = Some(self.current_time);
            return false;
        };
        let since = elapsed(self.current_time, start);
        if let Some(pose) = table.pose_at(since) {
            self.pose = pose;
            self.resize(pose.size, table.anchor);
        }
        if table.is_complete(since) {
            self.state = PlayerState::Walk;
            self.in_transition = false;
            self.transition_timer = None;
            true
        } else {
            false
        }
    }

    fn changing_to_big(&mut self) {
        if self.run_transition(&SMALL_TO_BIG) {
            self.become_big();
            tracing::debug!("player grew");
        }
    }

    fn changing_to_fire(&mut self) {
        if self.run_transition(&BIG_TO_FIRE) {
            self.fire = true;
            tracing::debug!("player gained fire");
        }
    }

    fn changing_to_small(&mut self) {
        self.hurt_invincible = true;
        if self.run_transition(&BIG_TO_SMALL) {
            self.become_small();
            tracing::debug!("player shrank");
        }
    }

    pub fn become_big(&mut self) {
        self.big = true;
        self.resize(BodySize::Big, Anchor::Left);
    }

    pub fn become_small(&mut self) {
        self.big = false;
        self.resize(BodySize::Small, Anchor::Left);
    }

    fn resize(&mut self, size: BodySize, anchor: Anchor) {
        let (w, h) = size.dimensions();
        match anchor {
            Anchor::Left => self.rect.resize_anchored(w, h),
            Anchor::CenterX => {
                let centerx = self.rect.centerx();
                self.rect.resize_anchored(w, h);
                self.rect.set_centerx(centerx);
            },
        }
    }

    // ================================================================
    // End of level
    // ================================================================

    /// Grab the pole whose right edge is `pole_right`.
    pub fn start_flag_pole(&mut self, pole_right: i32) {
        self.state = PlayerState::FlagPole;
        self.flag_pole_right = pole_right;
        self.flag_pole_timer = None;
        self.in_transition = true;
    }

    fn flag_pole_sliding(&mut self) {
        self.state = PlayerState::FlagPole;
        self.in_transition = true;
        self.x_vel = 0.0;
        self.y_vel = 0.0;

        let Some(start) = self.flag_pole_timer else {
            self.flag_pole_timer = Some(self.current_time);
            return;
        };
        if self.rect.bottom() < POLE_SLIDE_STOP {
            let since = elapsed(self.current_time, start);
            if since < 65 {
                self.set_pole_frame(frames::POLE_HIGH, true);
            } else if since < 130 {
                self.set_pole_frame(frames::POLE_LOW, true);
            } else {
                self.flag_pole_timer = Some(self.current_time);
            }
            self.rect.set_right(self.flag_pole_right);
            self.y_vel = POLE_SLIDE_SPEED as f32;
            self.rect.y += POLE_SLIDE_SPEED;
            if self.rect.bottom() >= 488 {
                self.flag_pole_timer = Some(self.current_time);
            }
        } else {
            self.set_pole_frame(frames::POLE_LOW, true);
        }
    }

    fn set_pole_frame(&mut self, frame: usize, facing_right: bool) {
        self.frame_index = frame;
        self.facing_right = facing_right;
        self.pose = Pose::new(self.body_size(), self.palette(), frame);
    }

    /// Swing around to the far side of the pole once the flag is down.
    pub fn set_state_to_bottom_of_pole(&mut self) {
        self.set_pole_frame(frames::POLE_HIGH, false);
        let right = self.rect.right();
        self.rect.x = if self.big { right - 10 } else { right };
        self.flag_pole_timer = None;
        self.state = PlayerState::BottomOfPole;
    }

    fn sitting_at_bottom_of_pole(&mut self) {
        match self.flag_pole_timer {
            None => {
                self.flag_pole_timer = Some(self.current_time);
                self.set_pole_frame(frames::POLE_LOW, false);
            },
            Some(start) if elapsed(self.current_time, start) < POLE_BOTTOM_WAIT_MS => {
                self.set_pole_frame(frames::POLE_LOW, false);
            },
            Some(_) => {
                self.in_transition = false;
                self.facing_right = true;
                self.state = if self.rect.bottom() < 485 {
                    PlayerState::EndOfLevelFall
                } else {
                    PlayerState::WalkingToCastle
                };
            },
        }
    }

    fn walking_to_castle(&mut self, physics: &PlayerPhysicsConfig) {
        self.max_x_vel = CASTLE_WALK_SPEED;
        self.x_accel = physics.walk_accel;
        if self.x_vel < self.max_x_vel {
            self.x_vel += self.x_accel;
        }
        match self.walking_timer {
            Some(start) if elapsed(self.current_time, start) <= 200 => {
                if elapsed(self.current_time, start) as f32 > self.animation_speed() {
                    self.advance_walk_frame();
                }
            },
            _ => self.walking_timer = Some(self.current_time),
        }
    }

    // ================================================================
    // Status effects
    // ================================================================

    /// Begin star power at the current time.
    pub fn start_invincibility(&mut self) {
        self.invincible = true;
        self.losing_invincibility = false;
        self.star = Some(TimedEffect::new(StatusEffect::Invincible, self.current_time));
    }

    /// Drop star power immediately.
    pub fn end_invincibility(&mut self) {
        self.invincible = false;
        self.losing_invincibility = false;
        self.star = None;
        self.invincible_index = 0;
    }

    fn check_for_special_state(&mut self) {
        self.check_if_invincible();
        self.check_if_hurt_invincible();
        self.check_if_crouching();
    }

    fn check_if_invincible(&mut self) {
        if !self.invincible {
            return;
        }
        let now = self.current_time;
        let star = *self
            .star
            .get_or_insert_with(|| TimedEffect::new(StatusEffect::Invincible, now));
        if star.is_expired(now) {
            self.end_invincibility();
            return;
        }
        self.losing_invincibility = star.in_final_third(now);
        let switch_ms = if self.losing_invincibility {
            STAR_FADING_FRAME_MS
        } else {
            STAR_FRAME_MS
        };
        if elapsed(now, self.invincible_animation_timer) > switch_ms {
            self.invincible_index = (self.invincible_index + 1) % 4;
            self.invincible_animation_timer = now;
        }
    }

    fn check_if_hurt_invincible(&mut self) {
        if !self.hurt_invincible || self.state == PlayerState::BigToSmall {
            return;
        }
        let now = self.current_time;
        match self.hurt {
            None => {
                self.hurt = Some(TimedEffect::new(StatusEffect::Hurt, now));
                self.hurt_flicker_timer = now;
            },
            Some(fx) if !fx.is_expired(now) => {
                let since = elapsed(now, self.hurt_flicker_timer);
                if since < HURT_HIDDEN_MS {
                    self.visible = false;
                } else if since < HURT_SHOWN_MS {
                    self.visible = true;
                    self.hurt_flicker_timer = now;
                }
            },
            Some(_) => {
                self.hurt_invincible = false;
                self.hurt = None;
                self.visible = true;
            },
        }
    }

    fn check_if_crouching(&mut self) {
        if self.crouching && self.big {
            self.resize(BodySize::Crouch, Anchor::Left);
            self.pose = Pose::new(BodySize::Crouch, self.palette(), frames::CROUCH);
        }
    }

    // ================================================================
    // Appearance
    // ================================================================

    /// Hitbox tier for the current form, ignoring transitions.
    pub fn body_size(&self) -> BodySize {
        if self.big {
            BodySize::Big
        } else {
            BodySize::Small
        }
    }

    /// Palette for the current form, including the star cycle.
    pub fn palette(&self) -> Palette {
        let base = if self.fire {
            Palette::Fire
        } else {
            Palette::Normal
        };
        if self.invincible {
            [base, Palette::Green, Palette::Red, Palette::Black][self.invincible_index % 4]
        } else {
            base
        }
    }

    fn animation(&mut self) {
        let scripted = matches!(
            self.state,
            PlayerState::DeathJump | PlayerState::FlagPole | PlayerState::BottomOfPole
        ) || self.state.is_transition();
        if scripted || self.crouching {
            return;
        }
        self.pose = Pose::new(self.body_size(), self.palette(), self.frame_index);
    }
}

impl Sprite for Player {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn atlas(&self) -> &'static str {
        self.pose.atlas()
    }

    fn frame(&self) -> usize {
        self.pose.frame
    }
}
