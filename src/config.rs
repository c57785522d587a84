//! Compile-time game constants.  Distances are pixels, speeds are pixels
//! per tick.

// ── Arena ─────────────────────────────────────────────────────────────────────

pub const SCREEN_WIDTH: f32 = 640.0;
pub const SCREEN_HEIGHT: f32 = 480.0;
/// Band at the top reserved for the status bar; tanks never enter it.
pub const STATUS_BAR_HEIGHT: f32 = 20.0;

// ── Sizes & speeds ────────────────────────────────────────────────────────────

pub const TANK_SIZE: f32 = 20.0;
pub const BULLET_SIZE: f32 = 5.0;
/// Bullets leave from the tank's top-left corner plus this offset on both axes.
pub const MUZZLE_OFFSET: f32 = 8.0;
pub const TANK_SPEED: f32 = 2.0;
pub const BULLET_SPEED: f32 = 5.0;

// ── AI windows (in clock ticks) ───────────────────────────────────────────────

pub const CHANGE_DIR_INTERVAL: u64 = 30;
pub const SHOOT_INTERVAL: u64 = 5;

pub const TICKS_PER_SECOND: u32 = 60;
pub const BOSS_TOLERANCE_SECS: u32 = 3;
/// How long the player may trail the boss before it turns around.
pub const FOLLOW_TOLERANCE_TICKS: u32 = BOSS_TOLERANCE_SECS * TICKS_PER_SECOND;

// ── Health ────────────────────────────────────────────────────────────────────

pub const PLAYER_TANK_HP: i32 = 3;
pub const BOSS_TANK_HP: i32 = 100;
pub const ENEMY_TANK_HP: i32 = 1;
pub const WALL_HP: i32 = 5;

// ── Spawning ──────────────────────────────────────────────────────────────────

pub const MAX_ENEMY_TANKS: usize = 10;
pub const MAX_WALLS: usize = 5;

pub const ENEMY_SPAWN_MIN_SECS: u64 = 5;
pub const ENEMY_SPAWN_JITTER_SECS: u64 = 60;
pub const WALL_SPAWN_MIN_SECS: u64 = 10;
pub const WALL_SPAWN_JITTER_SECS: u64 = 60;

pub const WALL_THICKNESS: f32 = 10.0;
/// Spawned wall length is drawn from `WALL_MIN_LEN..WALL_MAX_LEN`.
pub const WALL_MIN_LEN: u32 = 50;
pub const WALL_MAX_LEN: u32 = 100;

/// Random positions tried before a spawn request is dropped.
pub const SPAWN_ATTEMPTS: u32 = 16;
