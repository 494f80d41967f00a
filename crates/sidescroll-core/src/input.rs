use serde::{Deserialize, Serialize};

/// Logical actions the simulation understands, independent of key bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Left,
    Right,
    Jump,
    /// Run / shoot.
    Action,
    Down,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Left,
        Action::Right,
        Action::Jump,
        Action::Action,
        Action::Down,
    ];
}

/// Pressed state of every logical action, sampled once before each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub action: bool,
    pub down: bool,
}

impl InputState {
    /// Nothing pressed.
    pub const fn idle() -> Self {
        Self {
            left: false,
            right: false,
            jump: false,
            action: false,
            down: false,
        }
    }

    pub fn pressed(&self, action: Action) -> bool {
        match action {
            Action::Left => self.left,
            Action::Right => self.right,
            Action::Jump => self.jump,
            Action::Action => self.action,
            Action::Down => self.down,
        }
    }

    pub fn set(&mut self, action: Action, pressed: bool) {
        match action {
            Action::Left => self.left = pressed,
            Action::Right => self.right = pressed,
            Action::Jump => self.jump = pressed,
            Action::Action => self.action = pressed,
            Action::Down => self.down = pressed,
        }
    }

    /// Builder-style copy with `action` held down.
    pub fn with(mut self, action: Action) -> Self {
        self.set(action, true);
        self
    }

    pub fn any_pressed(&self) -> bool {
        Action::ALL.iter().any(|a| self.pressed(*a))
    }
}
