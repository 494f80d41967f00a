//! Moving enemies, shells and power-ups through the level.

use sidescroll_core::events::SoundEffect;
use sidescroll_core::geometry::{Direction, Rect, step};

use crate::bricks::BlockState;
use crate::collision::Solids;
use crate::enemies::{Enemy, EnemyState};
use crate::entity::{collides_any, first_collision, first_collision_except};
use crate::level::{HEAD_BUMP_VEL, Level1State};
use crate::player_collisions::ENEMY_POINTS;
use crate::powerups::PowerupKind;

/// How far behind the camera an enemy may fall before it is dropped.
const BEHIND_CAMERA_LIMIT: i32 = 300;
/// How far ahead of the camera a sliding shell may travel.
const AHEAD_OF_CAMERA_LIMIT: i32 = 500;

/// Whether `enemy` has left the playable area around `viewport`.
fn is_off_screen(enemy: &Enemy, viewport: &Rect) -> bool {
    enemy.rect.x < viewport.x - BEHIND_CAMERA_LIMIT
        || enemy.rect.y > viewport.bottom()
        || (enemy.state == EnemyState::ShellSlide
            && enemy.rect.x > viewport.right() + AHEAD_OF_CAMERA_LIMIT)
}

impl Level1State {
    // ================================================================
    // Walking enemies
    // ================================================================

    pub(crate) fn adjust_enemy_positions(&mut self) {
        let mut i = 0;
        while i < self.enemies.len() {
            let enemy = &mut self.enemies[i];
            enemy.rect.x = step(enemy.rect.x, enemy.x_vel);
            self.check_enemy_x_collisions(i);

            let enemy = &mut self.enemies[i];
            enemy.rect.y = step(enemy.rect.y, enemy.y_vel);
            if self.check_enemy_y_collisions(i) {
                continue;
            }

            if is_off_screen(&self.enemies[i], &self.viewport) {
                self.enemies.remove(i);
                continue;
            }
            i += 1;
        }
    }

    fn check_enemy_x_collisions(&mut self, i: usize) {
        let rect = self.enemies[i].rect;
        if let Some(c) = first_collision(&rect, &self.ground) {
            let wall = self.ground[c].rect;
            let enemy = &mut self.enemies[i];
            match enemy.direction {
                Direction::Right => enemy.rect.set_right(wall.left()),
                Direction::Left => enemy.rect.set_left(wall.right()),
            }
            enemy.turn_around();
        } else if let Some(j) = first_collision_except(&rect, &self.enemies, i) {
            let other = self.enemies[j].rect;
            let direction = self.enemies[i].direction;
            let enemy = &mut self.enemies[i];
            match direction {
                Direction::Right => enemy.rect.set_right(other.left()),
                Direction::Left => enemy.rect.set_left(other.right()),
            }
            enemy.turn_around();

            let other = &mut self.enemies[j];
            other.direction = direction;
            other.set_velocity();
        }
    }

    /// Resolve vertical contact for enemy `i`. Returns true if the enemy
    /// was knocked out of the group.
    fn check_enemy_y_collisions(&mut self, i: usize) -> bool {
        let rect = self.enemies[i].rect;

        if let Some(c) = first_collision(&rect, &self.ground) {
            let solid = self.ground[c].rect;
            let enemy = &mut self.enemies[i];
            if enemy.rect.bottom() > solid.bottom() {
                enemy.y_vel = HEAD_BUMP_VEL;
                enemy.rect.set_top(solid.bottom());
                enemy.state = EnemyState::Fall;
            } else if enemy.rect.bottom() < solid.bottom() {
                enemy.y_vel = 0.0;
                enemy.rect.set_bottom(solid.top());
                enemy.state = EnemyState::Walk;
            }
            return false;
        }

        if let Some(b) = first_collision(&rect, &self.bricks) {
            let brick = self.bricks[b].rect;
            if self.bricks[b].state == BlockState::Bumped {
                self.launch_enemy_off_block(i, &brick, false);
                return true;
            }
            self.rest_enemy_on_block(i, &brick);
            return false;
        }

        if let Some(b) = first_collision(&rect, &self.coin_boxes) {
            let coin_box = self.coin_boxes[b].rect;
            if self.coin_boxes[b].state == BlockState::Bumped {
                self.launch_enemy_off_block(i, &coin_box, true);
                return true;
            }
            self.rest_enemy_on_block(i, &coin_box);
            return false;
        }

        if !self.solids().supports(&rect) {
            self.enemies[i].state = EnemyState::Fall;
        }
        false
    }

    fn rest_enemy_on_block(&mut self, i: usize, block: &Rect) {
        let enemy = &mut self.enemies[i];
        if enemy.rect.x > block.x {
            enemy.y_vel = HEAD_BUMP_VEL;
            enemy.rect.set_top(block.bottom());
            enemy.state = EnemyState::Fall;
        } else {
            enemy.y_vel = 0.0;
            enemy.rect.set_bottom(block.top());
            enemy.state = EnemyState::Walk;
        }
    }

    /// A block bumped from below throws the enemy on it away from the
    /// player.
    fn launch_enemy_off_block(&mut self, i: usize, block: &Rect, scores: bool) {
        let enemy_rect = self.enemies[i].rect;
        if scores {
            self.events.sound(SoundEffect::Kick);
            self.award_at(ENEMY_POINTS, enemy_rect.centerx(), enemy_rect.y);
        }
        let direction = Direction::towards(self.player.rect.centerx(), block.centerx());
        let mut enemy = self.enemies.remove(i);
        enemy.start_death_jump(direction);
        self.dying.push(enemy);
    }

    // ================================================================
    // Shells
    // ================================================================

    pub(crate) fn adjust_shell_positions(&mut self) {
        let mut i = 0;
        while i < self.shells.len() {
            let shell = &mut self.shells[i];
            shell.rect.x = step(shell.rect.x, shell.x_vel);
            self.check_shell_x_collisions(i);

            let shell = &mut self.shells[i];
            shell.rect.y = step(shell.rect.y, shell.y_vel);
            self.check_shell_y_collisions(i);

            if is_off_screen(&self.shells[i], &self.viewport) {
                self.shells.remove(i);
                continue;
            }
            i += 1;
        }
    }

    fn check_shell_x_collisions(&mut self, i: usize) {
        let rect = self.shells[i].rect;
        if let Some(c) = first_collision(&rect, &self.ground) {
            self.events.sound(SoundEffect::Bump);
            let wall = self.ground[c].rect;
            let shell = &mut self.shells[i];
            if shell.x_vel > 0.0 {
                shell.direction = Direction::Left;
                shell.rect.set_right(wall.left());
            } else {
                shell.direction = Direction::Right;
                shell.rect.set_left(wall.right());
            }
        }

        // Only a moving shell is dangerous.
        if self.shells[i].state != EnemyState::ShellSlide {
            return;
        }
        let rect = self.shells[i].rect;
        let Some(j) = first_collision(&rect, &self.enemies) else {
            return;
        };
        self.events.sound(SoundEffect::Kick);
        let enemy_rect = self.enemies[j].rect;
        self.award_at(ENEMY_POINTS, enemy_rect.right(), enemy_rect.y);
        let direction = self.shells[i].direction;
        let mut enemy = self.enemies.remove(j);
        enemy.start_death_jump(direction);
        self.dying.push(enemy);
    }

    fn check_shell_y_collisions(&mut self, i: usize) {
        let rect = self.shells[i].rect;
        if let Some(c) = first_collision(&rect, &self.ground) {
            let floor = self.ground[c].rect;
            let shell = &mut self.shells[i];
            shell.y_vel = 0.0;
            shell.rect.set_bottom(floor.top());
            shell.state = EnemyState::ShellSlide;
        } else if !collides_any(&rect.offset(0, 1), &self.ground) {
            self.shells[i].state = EnemyState::Fall;
        }
    }

    // ================================================================
    // Power-ups and fireballs
    // ================================================================

    pub(crate) fn adjust_powerup_positions(&mut self, now: u64) {
        let mut i = 0;
        while i < self.powerups.len() {
            let solids = Solids {
                ground: &self.ground,
                bricks: &self.bricks,
                coin_boxes: &self.coin_boxes,
            };
            let powerup = &mut self.powerups[i];
            match powerup.kind {
                PowerupKind::Mushroom | PowerupKind::LifeMushroom => {
                    powerup.adjust_mushroom(&solids);
                },
                PowerupKind::Star => powerup.adjust_star(&solids),
                PowerupKind::FireBall => powerup.adjust_fireball(&solids, now),
                PowerupKind::FireFlower => {},
            }

            if self.powerups[i].is_live_fireball() {
                self.check_fireball_hits(i, now);
            }
            if self.powerups[i].is_off_screen(&self.viewport) {
                self.powerups.remove(i);
                continue;
            }
            i += 1;
        }
    }

    fn check_fireball_hits(&mut self, i: usize, now: u64) {
        let rect = self.powerups[i].rect;
        let mut victim = if let Some(j) = first_collision(&rect, &self.enemies) {
            self.enemies.remove(j)
        } else if let Some(j) = first_collision(&rect, &self.shells) {
            self.shells.remove(j)
        } else {
            return;
        };

        self.events.sound(SoundEffect::Kick);
        self.award_at(ENEMY_POINTS, victim.rect.centerx(), victim.rect.y);
        let direction = self.powerups[i].direction;
        self.powerups[i].explode(now);
        victim.start_death_jump(direction);
        self.dying.push(victim);
    }
}
