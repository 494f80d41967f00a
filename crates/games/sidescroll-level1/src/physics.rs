use serde::{Deserialize, Serialize};

/// Screen width in pixels; also the viewport width.
pub const SCREEN_WIDTH: i32 = 800;
/// Screen height in pixels.
pub const SCREEN_HEIGHT: i32 = 600;
/// Top of the ground colliders.
pub const GROUND_HEIGHT: i32 = SCREEN_HEIGHT - 62;
/// Width of the scaled World 1-1 backdrop.
pub const LEVEL_WIDTH: i32 = 9087;

/// Horizontal acceleration while walking.
pub const WALK_ACCEL: f32 = 0.15;
/// Acceleration value selected while the run button is held.
pub const RUN_ACCEL: f32 = 20.0;
/// Acceleration while turning against the current velocity.
pub const SMALL_TURNAROUND: f32 = 0.35;
/// Gravity while falling or walking.
pub const GRAVITY: f32 = 1.01;
/// Reduced gravity while the jump button is held on the way up.
pub const JUMP_GRAVITY: f32 = 0.31;
/// Initial jump velocity (negative is up).
pub const JUMP_VEL: f32 = -10.0;
/// Extra jump impulse when jumping out of a fast walk.
pub const FAST_JUMP_BONUS: f32 = 0.5;
/// `x_vel` above which a jump gets [`FAST_JUMP_BONUS`].
pub const FAST_JUMP_THRESHOLD: f32 = 4.5;
/// Terminal falling speed.
pub const MAX_Y_VEL: f32 = 11.0;
/// Horizontal speed ceiling while running.
pub const MAX_RUN_SPEED: f32 = 800.0;
/// Horizontal speed ceiling while walking.
pub const MAX_WALK_SPEED: f32 = 6.0;
/// Minimum speed right after starting a walk or a turnaround.
pub const MIN_WALK_SPEED: f32 = 0.5;

/// Tunable player physics, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerPhysicsConfig {
    pub walk_accel: f32,
    pub run_accel: f32,
    pub small_turnaround: f32,
    pub gravity: f32,
    pub jump_gravity: f32,
    pub jump_vel: f32,
    pub fast_jump_bonus: f32,
    pub fast_jump_threshold: f32,
    pub max_y_vel: f32,
    pub max_run_speed: f32,
    pub max_walk_speed: f32,
}

impl Default for PlayerPhysicsConfig {
    fn default() -> Self {
        Self {
            walk_accel: WALK_ACCEL,
            run_accel: RUN_ACCEL,
            small_turnaround: SMALL_TURNAROUND,
            gravity: GRAVITY,
            jump_gravity: JUMP_GRAVITY,
            jump_vel: JUMP_VEL,
            fast_jump_bonus: FAST_JUMP_BONUS,
            fast_jump_threshold: FAST_JUMP_THRESHOLD,
            max_y_vel: MAX_Y_VEL,
            max_run_speed: MAX_RUN_SPEED,
            max_walk_speed: MAX_WALK_SPEED,
        }
    }
}

/// Round a per-frame velocity to whole pixels, halves to even.
pub fn round_velocity(vel: f32) -> i32 {
    vel.round_ties_even() as i32
}
