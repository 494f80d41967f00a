//! Draw calls for one frame, back to front.

use sidescroll_core::render::{Layer, Renderer};

use crate::entity::Sprite;
use crate::level::Level1State;

const HUD_LABEL_Y: i32 = 30;
const HUD_VALUE_Y: i32 = 55;
const HUD_SCORE_X: i32 = 75;
const HUD_COINS_X: i32 = 300;
const HUD_WORLD_X: i32 = 450;
const HUD_TIME_X: i32 = 625;

impl Level1State {
    pub fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.fill_background(self.viewport);

        if let Some(score) = &self.flag_score {
            renderer.draw_text(
                Layer::FlagScore,
                &score.text(),
                score.x - self.viewport.x,
                score.y,
            );
        }
        self.draw_group(renderer, Layer::Powerups, &self.powerups);
        self.draw_group(renderer, Layer::Coins, &self.coins);
        self.draw_group(renderer, Layer::Bricks, &self.bricks);
        self.draw_group(renderer, Layer::CoinBoxes, &self.coin_boxes);
        self.draw_group(renderer, Layer::Dying, &self.dying);
        self.draw_group(renderer, Layer::Shells, &self.shells);
        self.draw_group(renderer, Layer::BrickPieces, &self.brick_pieces);

        self.draw_sprite(renderer, Layer::FlagPole, &self.flag_pole.flag);
        self.draw_group(renderer, Layer::FlagPole, &self.flag_pole.poles);
        self.draw_sprite(renderer, Layer::FlagPole, &self.flag_pole.finial);
        if let Some(flag) = &self.castle_flag {
            self.draw_sprite(renderer, Layer::FlagPole, flag);
        }

        if self.player.visible && !self.player.in_castle {
            self.draw_sprite(renderer, Layer::Actors, &self.player);
        }
        self.draw_group(renderer, Layer::Actors, &self.enemies);

        self.draw_hud(renderer);

        for score in &self.moving_scores {
            renderer.draw_text(Layer::FloatingScores, &score.text(), score.x, score.y);
        }
    }

    fn draw_sprite<S: Sprite>(&self, renderer: &mut dyn Renderer, layer: Layer, sprite: &S) {
        let dest = sprite.rect().offset(-self.viewport.x, 0);
        renderer.draw_sprite(layer, sprite.atlas(), sprite.frame(), dest);
    }

    fn draw_group<S: Sprite>(&self, renderer: &mut dyn Renderer, layer: Layer, group: &[S]) {
        for sprite in group {
            self.draw_sprite(renderer, layer, sprite);
        }
    }

    fn draw_hud(&self, renderer: &mut dyn Renderer) {
        let hud = [
            (HUD_SCORE_X, HUD_LABEL_Y, "MARIO".to_string()),
            (HUD_SCORE_X, HUD_VALUE_Y, format!("{:06}", self.session.score)),
            (HUD_COINS_X, HUD_VALUE_Y, format!("x{:02}", self.session.coin_total)),
            (HUD_WORLD_X, HUD_LABEL_Y, "WORLD".to_string()),
            (HUD_WORLD_X, HUD_VALUE_Y, "1-1".to_string()),
            (HUD_TIME_X, HUD_LABEL_Y, "TIME".to_string()),
            (HUD_TIME_X, HUD_VALUE_Y, format!("{:03}", self.level_clock.time)),
        ];
        for (x, y, text) in &hud {
            renderer.draw_text(Layer::Hud, text, *x, *y);
        }
    }
}
