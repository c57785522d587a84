//! All game entity types.  Pure data, no game rules.

use rand::Rng;

use crate::collision::Rect;
use crate::config::{BULLET_SIZE, MUZZLE_OFFSET, TANK_SIZE};

// ── Facing ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Up,
    Right,
    Down,
    Left,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::Up, Facing::Right, Facing::Down, Facing::Left];

    /// The opposite direction (a 180° turn).
    pub fn reversed(self) -> Facing {
        match self {
            Facing::Up => Facing::Down,
            Facing::Right => Facing::Left,
            Facing::Down => Facing::Up,
            Facing::Left => Facing::Right,
        }
    }

    pub fn random(rng: &mut impl Rng) -> Facing {
        Facing::ALL[rng.gen_range(0..Facing::ALL.len())]
    }

    /// Displacement of one step of `speed` along this facing.
    /// Screen coordinates: y grows downward.
    pub fn delta(self, speed: f32) -> (f32, f32) {
        match self {
            Facing::Up => (0.0, -speed),
            Facing::Right => (speed, 0.0),
            Facing::Down => (0.0, speed),
            Facing::Left => (-speed, 0.0),
        }
    }
}

// ── Status & spawn requests ───────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// The player tank was destroyed.
    GameOver,
    /// The boss tank was destroyed.
    Victory,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        self != GameStatus::Playing
    }
}

/// What a background spawn timer asks the frame loop to create.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnKind {
    EnemyTank,
    Wall,
}

// ── Tanks ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Tank {
    pub x: f32,
    pub y: f32,
    pub facing: Facing,
    pub health: i32,
    /// Set once the tank has repathed inside the current direction window.
    pub direction_changed: bool,
    /// Set once the tank has fired inside the current shoot window.
    pub has_shot: bool,
}

impl Tank {
    pub fn new(x: f32, y: f32, facing: Facing, health: i32) -> Self {
        Tank {
            x,
            y,
            facing,
            health,
            direction_changed: false,
            has_shot: false,
        }
    }

    pub fn rect(&self) -> Rect {
        tank_rect_at(self.x, self.y)
    }

    /// A fresh bullet leaving this tank along its current facing.
    pub fn fire(&self) -> Bullet {
        Bullet {
            x: self.x + MUZZLE_OFFSET,
            y: self.y + MUZZLE_OFFSET,
            facing: self.facing,
        }
    }
}

/// Hit box of a tank standing at a tentative position.
pub fn tank_rect_at(x: f32, y: f32) -> Rect {
    Rect::new(x, y, TANK_SIZE, TANK_SIZE)
}

// ── Projectiles & walls ───────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub facing: Facing,
}

impl Bullet {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, BULLET_SIZE, BULLET_SIZE)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Wall {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub health: i32,
}

impl Wall {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ── Per-frame input ───────────────────────────────────────────────────────────

/// Everything the host hands the core for one frame.
#[derive(Clone, Debug, Default)]
pub struct TickInput {
    pub up: bool,
    pub right: bool,
    pub down: bool,
    pub left: bool,
    /// Edge-triggered: true only on the frame the fire key went down.
    pub fire: bool,
    /// AI pseudo-clock; repath and fire windows are keyed off its value.
    pub clock: u64,
    /// Spawn requests drained from the background timers since last frame.
    pub spawns: Vec<SpawnKind>,
}

impl TickInput {
    /// The one direction processed this frame: Up > Right > Down > Left.
    pub fn direction(&self) -> Option<Facing> {
        if self.up {
            Some(Facing::Up)
        } else if self.right {
            Some(Facing::Right)
        } else if self.down {
            Some(Facing::Down)
        } else if self.left {
            Some(Facing::Left)
        } else {
            None
        }
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    /// `None` once destroyed.
    pub player: Option<Tank>,
    /// `None` once destroyed.
    pub boss: Option<Tank>,
    pub enemies: Vec<Tank>,
    pub player_bullets: Vec<Bullet>,
    pub boss_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub walls: Vec<Wall>,
    /// Consecutive ticks the player has been trailing the boss.
    pub follow_ticks: u32,
    pub status: GameStatus,
    pub frame: u64,
}
