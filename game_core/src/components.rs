use glam::Vec2;
use std::ops::{Index, IndexMut};

/// One of the two fixed player slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn opponent(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Horizontal direction pointing away from this side's wall
    pub fn outward(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }
}

/// Player paddle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    side: Side,
    pub y: f32,  // Top edge of the paddle
    pub dy: f32, // Vertical velocity per tick
    pub is_local: bool,
}

impl Player {
    pub fn new(side: Side, y: f32) -> Self {
        Self {
            side,
            y,
            dy: 0.0,
            is_local: false,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }
}

/// Both paddles, indexed by side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Players {
    left: Player,
    right: Player,
}

impl Players {
    pub fn new(left_y: f32, right_y: f32) -> Self {
        Self {
            left: Player::new(Side::Left, left_y),
            right: Player::new(Side::Right, right_y),
        }
    }

    /// Replace the player in its own slot. Side is taken from the player.
    pub fn replace(&mut self, player: Player) {
        self[player.side()] = player;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        [&self.left, &self.right].into_iter()
    }

    pub fn local(&self) -> Option<&Player> {
        self.iter().find(|p| p.is_local)
    }
}

impl Default for Players {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Index<Side> for Players {
    type Output = Player;

    fn index(&self, side: Side) -> &Player {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

impl IndexMut<Side> for Players {
    fn index_mut(&mut self, side: Side) -> &mut Player {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Ball, always server-authoritative
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self { pos, vel }
    }
}

/// Full client-side game snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GameState {
    pub tick_count: u64,
    pub players: Players,
    pub ball: Ball,
    pub started: bool,
}
