//! Moving the player through the level.
//!
//! The player moves one axis at a time. After each axis step the groups it
//! can touch are tested in [`Target::X_ORDER`] / [`Target::Y_ORDER`] and only
//! the first group with a hit is resolved.

use sidescroll_core::events::SoundEffect;
use sidescroll_core::geometry::{Direction, Rect};

use crate::bricks::BlockState;
use crate::coin::COIN_POINTS;
use crate::collision::{Hits, Target, prevent_collision_conflict};
use crate::contents::{Contents, SizeChange};
use crate::enemies::{EnemyKind, EnemyState};
use crate::entity::first_collision;
use crate::level::{HEAD_BUMP_VEL, Level1State, STOMP_REBOUND_VEL, VIEWPORT_MARGIN};
use crate::physics::round_velocity;
use crate::player::PlayerState;
use crate::powerups::PowerupKind;

/// Points for an enemy killed by a stomp, a star, a fireball or a block.
pub const ENEMY_POINTS: u32 = 100;
/// Points for kicking or stomping a shell.
pub const SHELL_POINTS: u32 = 400;
/// Points for running through a sliding shell with a star.
pub const SHELL_STAR_POINTS: u32 = 200;
/// Points for a mushroom, fire flower or star.
pub const POWERUP_POINTS: u32 = 1000;
/// Gap left between the player and a shell it just kicked.
const KICK_GAP: i32 = 5;
/// How far above a bumped brick an enemy counts as standing on it.
const BRICK_TOP_REACH: i32 = 5;

impl Level1State {
    pub(crate) fn adjust_player_position(&mut self, now: u64) {
        self.player.rect.x += round_velocity(self.player.x_vel);
        self.check_player_x_collisions();

        if !self.player.in_transition {
            self.player.rect.y += round_velocity(self.player.y_vel);
            self.check_player_y_collisions(now);
        }

        let min_x = self.viewport.x + VIEWPORT_MARGIN;
        if self.player.rect.x < min_x {
            self.player.rect.x = min_x;
        }
    }

    fn player_hits(&self) -> Hits {
        let rect = self.player.rect;
        Hits {
            coin_box: first_collision(&rect, &self.coin_boxes),
            brick: first_collision(&rect, &self.bricks),
            collider: first_collision(&rect, &self.ground),
            enemy: first_collision(&rect, &self.enemies),
            shell: first_collision(&rect, &self.shells),
            // The player's own fireballs never touch it.
            powerup: self
                .powerups
                .iter()
                .position(|p| !p.is_fireball() && p.rect.overlaps(&rect)),
        }
    }

    // ================================================================
    // X axis
    // ================================================================

    fn check_player_x_collisions(&mut self) {
        let Some((target, i)) = self.player_hits().first_x() else {
            return;
        };
        match target {
            Target::CoinBox => {
                let wall = self.coin_boxes[i].rect;
                self.push_player_out_x(&wall);
            },
            Target::Brick => {
                let wall = self.bricks[i].rect;
                self.push_player_out_x(&wall);
            },
            Target::Collider => {
                let wall = self.ground[i].rect;
                self.push_player_out_x(&wall);
            },
            Target::Enemy => self.player_runs_into_enemy(i),
            Target::Shell => self.player_runs_into_shell(i),
            Target::Powerup => self.collect_powerup(i),
        }
    }

    fn push_player_out_x(&mut self, wall: &Rect) {
        if self.player.rect.x < wall.x {
            self.player.rect.set_right(wall.left());
        } else {
            self.player.rect.set_left(wall.right());
        }
        self.player.x_vel = 0.0;
    }

    /// Shrink the player after a hit.
    fn hurt_player(&mut self) {
        self.events.sound(SoundEffect::Pipe);
        self.player.start_shrinking();
        self.change_size(SizeChange::BecameSmall);
    }

    fn player_runs_into_enemy(&mut self, i: usize) {
        if self.player.invincible {
            self.events.sound(SoundEffect::Kick);
            let (x, y) = (self.player.rect.right(), self.player.rect.y);
            self.award_at(ENEMY_POINTS, x, y);
            let mut enemy = self.enemies.remove(i);
            enemy.start_death_jump(Direction::Right);
            self.dying.push(enemy);
        } else if self.player.big {
            self.hurt_player();
        } else if !self.player.hurt_invincible {
            self.kill_player();
        }
    }

    fn player_runs_into_shell(&mut self, i: usize) {
        let shell_rect = self.shells[i].rect;
        match self.shells[i].state {
            EnemyState::JumpedOn => {
                self.events.sound(SoundEffect::Kick);
                self.award_at(SHELL_POINTS, shell_rect.centerx(), shell_rect.y);
                let direction = if self.player.rect.x < shell_rect.x {
                    self.player.rect.set_right(shell_rect.left());
                    Direction::Right
                } else {
                    self.player.rect.set_left(shell_rect.right());
                    Direction::Left
                };
                let shell = &mut self.shells[i];
                shell.kick(direction);
                shell.rect.x += KICK_GAP * direction.sign() as i32;
            },
            EnemyState::ShellSlide => {
                if self.player.big && !self.player.invincible {
                    self.hurt_player();
                } else if self.player.invincible {
                    self.events.sound(SoundEffect::Kick);
                    self.award_at(SHELL_STAR_POINTS, shell_rect.centerx(), shell_rect.y);
                    let mut shell = self.shells.remove(i);
                    shell.start_death_jump(Direction::Right);
                    self.dying.push(shell);
                } else if !self.player.hurt_invincible {
                    self.kill_player();
                }
            },
            _ => {},
        }
    }

    // ================================================================
    // Power-ups
    // ================================================================

    fn collect_powerup(&mut self, i: usize) {
        if self.powerups[i].is_fireball() {
            return;
        }
        let powerup = self.powerups.remove(i);
        let (x, y) = (self.player.rect.centerx(), self.player.rect.y);
        tracing::debug!(kind = ?powerup.kind, x, "power-up collected");

        match powerup.kind {
            PowerupKind::Star => {
                self.award_at(POWERUP_POINTS, x, y);
                self.player.start_invincibility();
                self.events.sound(SoundEffect::Powerup);
            },
            PowerupKind::Mushroom => {
                self.events.sound(SoundEffect::Powerup);
                self.award_at(POWERUP_POINTS, x, y);
                if !self.player.big {
                    self.player.start_growing();
                    self.change_size(SizeChange::BecameBig);
                }
            },
            PowerupKind::LifeMushroom => {
                self.gain_life(powerup.rect.right(), powerup.rect.y);
            },
            PowerupKind::FireFlower => {
                self.events.sound(SoundEffect::Powerup);
                self.award_at(POWERUP_POINTS, x, y);
                if self.player.big && !self.player.fire {
                    self.player.start_fire_transition();
                } else if !self.player.big {
                    self.player.start_growing();
                    self.change_size(SizeChange::BecameBig);
                }
            },
            PowerupKind::FireBall => {},
        }
    }

    // ================================================================
    // Y axis
    // ================================================================

    fn check_player_y_collisions(&mut self, now: u64) {
        let mut hits = self.player_hits();
        let (keep_brick, keep_coin_box) = prevent_collision_conflict(
            &self.player.rect,
            hits.brick.map(|i| self.bricks[i].rect),
            hits.coin_box.map(|i| self.coin_boxes[i].rect),
        );
        if !keep_brick {
            hits.brick = None;
        }
        if !keep_coin_box {
            hits.coin_box = None;
        }

        match hits.first_y() {
            Some((Target::CoinBox, i)) => self.player_hits_coin_box_y(i, now),
            Some((Target::Brick, i)) => self.player_hits_brick_y(i, now),
            Some((Target::Collider, i)) => self.player_hits_collider_y(i),
            Some((Target::Enemy, i)) => self.player_lands_on_enemy(i, now),
            Some((Target::Shell, i)) => self.player_lands_on_shell(i, now),
            Some((Target::Powerup, i)) => self.collect_powerup(i),
            None => {},
        }

        self.test_if_player_is_falling();
    }

    /// Stand on top of `block`.
    fn land_player_on(&mut self, block: &Rect) {
        self.player.y_vel = 0.0;
        self.player.rect.set_bottom(block.top());
        self.player.state = if self.player.state == PlayerState::EndOfLevelFall {
            PlayerState::WalkingToCastle
        } else {
            PlayerState::Walk
        };
    }

    /// Knock the player back down after hitting `block` from below.
    fn bump_player_head(&mut self, block: &Rect) {
        self.player.y_vel = HEAD_BUMP_VEL;
        self.player.rect.y = block.bottom();
        self.player.state = PlayerState::Fall;
    }

    fn player_hits_coin_box_y(&mut self, i: usize, now: u64) {
        let box_rect = self.coin_boxes[i].rect;
        if self.player.rect.y <= box_rect.y {
            self.land_player_on(&box_rect);
            return;
        }

        if self.coin_boxes[i].state == BlockState::Resting {
            let spawn = if self.coin_boxes[i].contents == Contents::Coin {
                self.award(COIN_POINTS);
                let spawn = self.coin_boxes[i].start_bump(now, &mut self.events);
                // Re-checked after the bump; start_bump leaves contents alone.
                if self.coin_boxes[i].contents == Contents::Coin {
                    self.session.add_coin();
                }
                spawn
            } else {
                self.coin_boxes[i].start_bump(now, &mut self.events)
            };
            if let Some(spawn) = spawn {
                self.spawn(spawn);
            }
        }
        self.events.sound(SoundEffect::Bump);
        self.bump_player_head(&box_rect);
    }

    fn player_hits_brick_y(&mut self, i: usize, now: u64) {
        let brick_rect = self.bricks[i].rect;
        if self.player.rect.y <= brick_rect.y {
            self.land_player_on(&brick_rect);
            return;
        }

        match self.bricks[i].state {
            BlockState::Resting if self.player.big && self.bricks[i].is_plain() => {
                self.events.sound(SoundEffect::BrickSmash);
                self.check_if_enemy_on_brick(&brick_rect);
                let brick = self.bricks.remove(i);
                tracing::debug!(x = brick_rect.x, "brick smashed");
                self.brick_pieces.extend(brick.smash());
            },
            BlockState::Resting => {
                self.events.sound(SoundEffect::Bump);
                if self.bricks[i].coin_total > 0 {
                    self.session.add_coin();
                    self.award(COIN_POINTS);
                }
                self.check_if_enemy_on_brick(&brick_rect);
                if let Some(spawn) = self.bricks[i].start_bump(now, &mut self.events) {
                    self.spawn(spawn);
                }
            },
            BlockState::Opened => self.events.sound(SoundEffect::Bump),
            BlockState::Bumped => {},
        }
        self.bump_player_head(&brick_rect);
    }

    /// Launch whatever stands on a brick the player just hit, away from the
    /// player.
    fn check_if_enemy_on_brick(&mut self, brick: &Rect) {
        let above = brick.offset(0, -BRICK_TOP_REACH);
        let Some(j) = first_collision(&above, &self.enemies) else {
            return;
        };
        self.events.sound(SoundEffect::Kick);
        let enemy_rect = self.enemies[j].rect;
        self.award_at(ENEMY_POINTS, enemy_rect.centerx(), enemy_rect.y);
        let direction = Direction::towards(self.player.rect.centerx(), brick.centerx());
        let mut enemy = self.enemies.remove(j);
        enemy.start_death_jump(direction);
        self.dying.push(enemy);
    }

    fn player_hits_collider_y(&mut self, i: usize) {
        let solid = self.ground[i].rect;
        if solid.bottom() > self.player.rect.bottom() {
            self.land_player_on(&solid);
        } else if solid.top() < self.player.rect.top() {
            self.player.y_vel = HEAD_BUMP_VEL;
            self.player.rect.set_top(solid.bottom());
            self.player.state = PlayerState::Fall;
        }
    }

    fn player_lands_on_enemy(&mut self, i: usize, now: u64) {
        if self.player.invincible {
            self.events.sound(SoundEffect::Kick);
            let enemy_rect = self.enemies[i].rect;
            self.award_at(ENEMY_POINTS, enemy_rect.centerx(), enemy_rect.y);
            let mut enemy = self.enemies.remove(i);
            enemy.start_death_jump(Direction::Right);
            self.dying.push(enemy);
            return;
        }
        if self.player.y_vel <= 0.0 {
            return;
        }

        self.events.sound(SoundEffect::Stomp);
        let enemy_rect = self.enemies[i].rect;
        self.award_at(ENEMY_POINTS, enemy_rect.centerx(), enemy_rect.y);
        let mut enemy = self.enemies.remove(i);
        enemy.stomp(now);
        match enemy.kind {
            EnemyKind::Goomba => self.dying.push(enemy),
            EnemyKind::Koopa => self.shells.push(enemy),
        }
        self.rebound_off(&enemy_rect);
    }

    fn player_lands_on_shell(&mut self, i: usize, now: u64) {
        if self.player.y_vel <= 0.0 {
            return;
        }
        let shell_rect = self.shells[i].rect;
        self.award_at(SHELL_POINTS, shell_rect.centerx(), shell_rect.y);

        if self.shells[i].state == EnemyState::JumpedOn {
            self.events.sound(SoundEffect::Kick);
            let player = self.player.rect;
            let shell = &mut self.shells[i];
            if player.centerx() < shell_rect.centerx() {
                shell.kick(Direction::Right);
                shell.rect.set_left(player.right() + KICK_GAP);
            } else {
                shell.kick(Direction::Left);
                shell.rect.set_right(player.left() - KICK_GAP);
            }
        } else {
            self.events.sound(SoundEffect::Stomp);
            self.shells[i].stomp(now);
            self.rebound_off(&shell_rect);
        }
    }

    /// Bounce up off the top of something just stomped.
    fn rebound_off(&mut self, target: &Rect) {
        self.player.rect.set_bottom(target.top());
        self.player.state = PlayerState::Jump;
        self.player.y_vel = STOMP_REBOUND_VEL;
    }

    fn test_if_player_is_falling(&mut self) {
        if self.solids().supports(&self.player.rect) {
            return;
        }
        match self.player.state {
            PlayerState::WalkingToCastle | PlayerState::EndOfLevelFall => {
                self.player.state = PlayerState::EndOfLevelFall;
            },
            PlayerState::Jump | PlayerState::DeathJump | PlayerState::FlagPole => {},
            state if state.is_transition() => {},
            _ => self.player.state = PlayerState::Fall,
        }
    }
}
