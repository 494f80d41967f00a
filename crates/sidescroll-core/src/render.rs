use crate::geometry::Rect;

/// Draw layers, listed back to front. A scene issues its draw calls in this
/// order every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Background,
    FlagScore,
    Powerups,
    Coins,
    Bricks,
    CoinBoxes,
    Dying,
    Shells,
    BrickPieces,
    FlagPole,
    Actors,
    Hud,
    FloatingScores,
}

impl Layer {
    pub const ORDER: [Layer; 13] = [
        Layer::Background,
        Layer::FlagScore,
        Layer::Powerups,
        Layer::Coins,
        Layer::Bricks,
        Layer::CoinBoxes,
        Layer::Dying,
        Layer::Shells,
        Layer::BrickPieces,
        Layer::FlagPole,
        Layer::Actors,
        Layer::Hud,
        Layer::FloatingScores,
    ];
}

/// Output surface. All coordinates are screen pixels; the scene has already
/// subtracted the camera offset.
pub trait Renderer {
    /// Fill the part of the level backdrop visible through `viewport`.
    fn fill_background(&mut self, viewport: Rect);

    /// Draw frame `frame` of the pre-loaded atlas `atlas` into `dest`.
    fn draw_sprite(&mut self, layer: Layer, atlas: &str, frame: usize, dest: Rect);

    /// Draw a short label such as a floating score.
    fn draw_text(&mut self, layer: Layer, text: &str, x: i32, y: i32);
}
