//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (and, where needed, the frame input or an RNG handle) and
//! returns a brand-new `GameState`.  Side effects are limited to the injected
//! RNG and log output.

use log::{debug, info, trace};
use rand::Rng;

use crate::collision::Rect;
use crate::config::*;
use crate::entities::{
    tank_rect_at, Bullet, Facing, GameState, GameStatus, SpawnKind, Tank, TickInput, Wall,
};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the opening position: player mid-screen, boss top-left heading
/// down, four walls, no enemies yet.
pub fn init_state() -> GameState {
    GameState {
        player: Some(Tank::new(
            SCREEN_WIDTH / 2.0,
            SCREEN_HEIGHT / 2.0 + STATUS_BAR_HEIGHT,
            Facing::Up,
            PLAYER_TANK_HP,
        )),
        boss: Some(Tank::new(100.0, 100.0, Facing::Down, BOSS_TANK_HP)),
        enemies: Vec::new(),
        player_bullets: Vec::new(),
        boss_bullets: Vec::new(),
        enemy_bullets: Vec::new(),
        walls: vec![
            wall(150.0, 150.0, 100.0, 10.0),
            wall(250.0, 280.0, 150.0, 10.0),
            wall(400.0, 50.0, 10.0, 100.0),
            wall(350.0, 350.0, 10.0, 50.0),
        ],
        follow_ticks: 0,
        status: GameStatus::Playing,
        frame: 0,
    }
}

fn wall(x: f32, y: f32, width: f32, height: f32) -> Wall {
    Wall {
        x,
        y,
        width,
        height,
        health: WALL_HP,
    }
}

// ── Spawning ─────────────────────────────────────────────────────────────────

/// Apply one spawn request.  Requests over the cap, or with no free spot
/// after `SPAWN_ATTEMPTS` tries, leave the state untouched.
pub fn apply_spawn(state: &GameState, kind: SpawnKind, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    match kind {
        SpawnKind::EnemyTank => {
            if next.enemies.len() >= MAX_ENEMY_TANKS {
                debug!("enemy spawn skipped: {} tanks on the field", next.enemies.len());
                return next;
            }
            for _ in 0..SPAWN_ATTEMPTS {
                let tank = random_enemy(rng);
                if is_clear(&next, &tank.rect()) {
                    debug!("enemy tank spawned at ({}, {})", tank.x, tank.y);
                    next.enemies.push(tank);
                    return next;
                }
            }
            debug!("enemy spawn dropped: no free spot");
        }
        SpawnKind::Wall => {
            if next.walls.len() >= MAX_WALLS {
                debug!("wall spawn skipped: {} walls on the field", next.walls.len());
                return next;
            }
            for _ in 0..SPAWN_ATTEMPTS {
                let candidate = random_wall(rng);
                if is_clear(&next, &candidate.rect()) {
                    debug!(
                        "wall spawned at ({}, {}) size {}x{}",
                        candidate.x, candidate.y, candidate.width, candidate.height
                    );
                    next.walls.push(candidate);
                    return next;
                }
            }
            debug!("wall spawn dropped: no free spot");
        }
    }
    next
}

fn random_enemy(rng: &mut impl Rng) -> Tank {
    let x = rng.gen_range(0..(SCREEN_WIDTH - TANK_SIZE) as u32) as f32;
    let y = STATUS_BAR_HEIGHT
        + rng.gen_range(0..(SCREEN_HEIGHT - STATUS_BAR_HEIGHT - TANK_SIZE) as u32) as f32;
    Tank::new(x, y, Facing::random(rng), ENEMY_TANK_HP)
}

/// A horizontal or vertical wall lying fully inside the playfield.
fn random_wall(rng: &mut impl Rng) -> Wall {
    let length = rng.gen_range(WALL_MIN_LEN..WALL_MAX_LEN) as f32;
    let (width, height) = if rng.gen_bool(0.5) {
        (length, WALL_THICKNESS)
    } else {
        (WALL_THICKNESS, length)
    };
    let x = rng.gen_range(0..(SCREEN_WIDTH - width) as u32) as f32;
    let y = STATUS_BAR_HEIGHT
        + rng.gen_range(0..(SCREEN_HEIGHT - STATUS_BAR_HEIGHT - height) as u32) as f32;
    wall(x, y, width, height)
}

fn is_clear(state: &GameState, rect: &Rect) -> bool {
    let tank_hit = state
        .player
        .iter()
        .chain(state.boss.iter())
        .chain(state.enemies.iter())
        .any(|t| rect.overlaps(&t.rect()));
    !tank_hit && !state.walls.iter().any(|w| rect.overlaps(&w.rect()))
}

// ── Movement helpers ─────────────────────────────────────────────────────────

/// One step along `facing`, clamped to the playfield.  `None` when the tank
/// already sits against that edge.
fn step_in_arena(x: f32, y: f32, facing: Facing) -> Option<(f32, f32)> {
    let max_x = SCREEN_WIDTH - TANK_SIZE;
    let max_y = SCREEN_HEIGHT - TANK_SIZE;
    match facing {
        Facing::Up if y > STATUS_BAR_HEIGHT => {
            Some((x, (y - TANK_SPEED).max(STATUS_BAR_HEIGHT)))
        }
        Facing::Right if x < max_x => Some(((x + TANK_SPEED).min(max_x), y)),
        Facing::Down if y < max_y => Some((x, (y + TANK_SPEED).min(max_y))),
        Facing::Left if x > 0.0 => Some(((x - TANK_SPEED).max(0.0), y)),
        _ => None,
    }
}

/// What a roaming tank can bump into.  Bumping `yield_to` only cancels the
/// step; bumping a wall or one of `tanks` also makes the tank repath and fire.
struct Obstacles<'a> {
    yield_to: Option<&'a Tank>,
    tanks: Vec<&'a Tank>,
    walls: &'a [Wall],
}

fn repath(tank: &mut Tank, rng: &mut impl Rng, shots: &mut Vec<Bullet>) {
    tank.facing = Facing::random(rng);
    trace!("tank at ({}, {}) now heading {:?}", tank.x, tank.y, tank.facing);
    shots.push(tank.fire());
}

/// Shared AI for the boss and enemy tanks: windowed repath, move or bounce,
/// collision, windowed fire.
fn roam(
    tank: &mut Tank,
    clock: u64,
    obstacles: &Obstacles,
    rng: &mut impl Rng,
    shots: &mut Vec<Bullet>,
) {
    if clock % CHANGE_DIR_INTERVAL == 0 {
        if !tank.direction_changed {
            repath(tank, rng, shots);
            tank.direction_changed = true;
        }
    } else {
        tank.direction_changed = false;
    }

    let (x, y) = match step_in_arena(tank.x, tank.y, tank.facing) {
        Some(pos) => pos,
        None => {
            repath(tank, rng, shots);
            (tank.x, tank.y)
        }
    };

    let rect = tank_rect_at(x, y);
    let mut blocked = obstacles
        .yield_to
        .is_some_and(|other| rect.overlaps(&other.rect()));
    if obstacles.walls.iter().any(|w| rect.overlaps(&w.rect())) {
        blocked = true;
        repath(tank, rng, shots);
    }
    if obstacles.tanks.iter().any(|t| rect.overlaps(&t.rect())) {
        blocked = true;
        repath(tank, rng, shots);
    }
    if !blocked {
        tank.x = x;
        tank.y = y;
    }

    if clock % SHOOT_INTERVAL == 0 {
        if !tank.has_shot {
            shots.push(tank.fire());
            tank.has_shot = true;
        }
    } else {
        tank.has_shot = false;
    }
}

// ── Tanks ────────────────────────────────────────────────────────────────────

/// Move the player one step in the highest-priority held direction and fire
/// on a fresh fire press.  A blocked step still turns the tank.
pub fn update_player(state: &GameState, input: &TickInput) -> GameState {
    let mut next = state.clone();
    if let Some(player) = next.player.as_mut() {
        if let Some(facing) = input.direction() {
            player.facing = facing;
            if let Some((x, y)) = step_in_arena(player.x, player.y, facing) {
                let rect = tank_rect_at(x, y);
                let blocked = next.boss.as_ref().is_some_and(|b| rect.overlaps(&b.rect()))
                    || next.enemies.iter().any(|e| rect.overlaps(&e.rect()))
                    || next.walls.iter().any(|w| rect.overlaps(&w.rect()));
                if !blocked {
                    player.x = x;
                    player.y = y;
                }
            }
        }
        if input.fire {
            next.player_bullets.push(player.fire());
        }
    }
    next
}

/// True when the player sits straight behind the boss, lined up on one axis
/// and heading toward it.
pub fn is_player_following(player: &Tank, boss: &Tank) -> bool {
    match player.facing {
        Facing::Up => player.x == boss.x && player.y > boss.y,
        Facing::Right => player.x < boss.x && player.y == boss.y,
        Facing::Down => player.x == boss.x && player.y < boss.y,
        Facing::Left => player.x > boss.x && player.y == boss.y,
    }
}

pub fn update_boss(state: &GameState, clock: u64, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    if let Some(boss) = next.boss.as_mut() {
        let followed = next
            .player
            .as_ref()
            .is_some_and(|p| is_player_following(p, boss));
        if followed {
            next.follow_ticks += 1;
            if next.follow_ticks > FOLLOW_TOLERANCE_TICKS {
                boss.facing = boss.facing.reversed();
                debug!("boss turns on its follower, now heading {:?}", boss.facing);
                next.boss_bullets.push(boss.fire());
                next.follow_ticks = 0;
            }
        } else {
            next.follow_ticks = 0;
        }

        let obstacles = Obstacles {
            yield_to: next.player.as_ref(),
            tanks: next.enemies.iter().collect(),
            walls: &next.walls,
        };
        roam(boss, clock, &obstacles, rng, &mut next.boss_bullets);
    }
    next
}

/// Enemy tanks roam like the boss but never chase, and ignore each other.
pub fn update_enemy_tanks(state: &GameState, clock: u64, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    let obstacles = Obstacles {
        yield_to: next.player.as_ref(),
        tanks: next.boss.iter().collect(),
        walls: &next.walls,
    };
    for enemy in next.enemies.iter_mut() {
        roam(enemy, clock, &obstacles, rng, &mut next.enemy_bullets);
    }
    next
}

// ── Bullets ──────────────────────────────────────────────────────────────────

fn advance(bullet: &mut Bullet) {
    let (dx, dy) = bullet.facing.delta(BULLET_SPEED);
    bullet.x += dx;
    bullet.y += dy;
}

fn out_of_arena(bullet: &Bullet) -> bool {
    bullet.x < 0.0
        || bullet.x > SCREEN_WIDTH
        || bullet.y < STATUS_BAR_HEIGHT
        || bullet.y > SCREEN_HEIGHT
}

/// Damage a singular tank; it becomes absent when its health runs out.
/// Returns whether the bullet connected.
fn strike_tank(target: &mut Option<Tank>, bullet: &Bullet) -> bool {
    let Some(tank) = target.as_mut() else {
        return false;
    };
    if !bullet.rect().overlaps(&tank.rect()) {
        return false;
    }
    tank.health -= 1;
    if tank.health <= 0 {
        *target = None;
    }
    true
}

/// Damage the first standing wall under the bullet.  Dead walls stay in the
/// list until the caller compacts it.
fn strike_walls(walls: &mut [Wall], bullet: &Bullet) -> bool {
    let rect = bullet.rect();
    match walls
        .iter_mut()
        .find(|w| w.health > 0 && rect.overlaps(&w.rect()))
    {
        Some(wall) => {
            wall.health -= 1;
            true
        }
        None => false,
    }
}

/// Player bullets hit the boss first, then enemy tanks, then walls.  Killing
/// an enemy tank earns the player one health.
pub fn update_player_bullets(state: &GameState) -> GameState {
    let mut next = state.clone();
    let mut kept = Vec::with_capacity(next.player_bullets.len());

    for mut bullet in std::mem::take(&mut next.player_bullets) {
        advance(&mut bullet);

        if strike_tank(&mut next.boss, &bullet) {
            continue;
        }

        let rect = bullet.rect();
        if let Some(enemy) = next
            .enemies
            .iter_mut()
            .find(|e| e.health > 0 && rect.overlaps(&e.rect()))
        {
            enemy.health -= 1;
            if enemy.health <= 0 {
                debug!("enemy tank destroyed at ({}, {})", enemy.x, enemy.y);
                if let Some(player) = next.player.as_mut() {
                    player.health += 1;
                }
            }
            continue;
        }

        if strike_walls(&mut next.walls, &bullet) || out_of_arena(&bullet) {
            continue;
        }
        kept.push(bullet);
    }

    next.player_bullets = kept;
    next.enemies.retain(|e| e.health > 0);
    next.walls.retain(|w| w.health > 0);
    next
}

/// Boss and enemy bullets: the player first, then walls.
fn sweep_hostile_bullets(
    bullets: Vec<Bullet>,
    player: &mut Option<Tank>,
    walls: &mut Vec<Wall>,
) -> Vec<Bullet> {
    let mut kept = Vec::with_capacity(bullets.len());
    for mut bullet in bullets {
        advance(&mut bullet);
        if strike_tank(player, &bullet)
            || strike_walls(walls, &bullet)
            || out_of_arena(&bullet)
        {
            continue;
        }
        kept.push(bullet);
    }
    walls.retain(|w| w.health > 0);
    kept
}

pub fn update_boss_bullets(state: &GameState) -> GameState {
    let mut next = state.clone();
    let bullets = std::mem::take(&mut next.boss_bullets);
    next.boss_bullets = sweep_hostile_bullets(bullets, &mut next.player, &mut next.walls);
    next
}

pub fn update_enemy_bullets(state: &GameState) -> GameState {
    let mut next = state.clone();
    let bullets = std::mem::take(&mut next.enemy_bullets);
    next.enemy_bullets = sweep_hostile_bullets(bullets, &mut next.player, &mut next.walls);
    next
}

// ── Per-frame tick (RNG is injected) ──────────────────────────────────────────

/// Advance the game by one frame.  Pending spawns are applied first, then
/// player → player bullets → boss → boss bullets → enemies → enemy bullets.
/// Once the game has ended the state is returned unchanged.
pub fn tick(state: &GameState, input: &TickInput, rng: &mut impl Rng) -> GameState {
    if state.status.is_terminal() {
        return state.clone();
    }

    let mut next = state.clone();
    for &kind in &input.spawns {
        next = apply_spawn(&next, kind, rng);
    }

    next = update_player(&next, input);
    next = update_player_bullets(&next);
    next = update_boss(&next, input.clock, rng);
    next = update_boss_bullets(&next);
    next = update_enemy_tanks(&next, input.clock, rng);
    next = update_enemy_bullets(&next);
    next.frame += 1;

    if next.player.is_none() {
        info!("player tank destroyed on frame {}: game over", next.frame);
        next.status = GameStatus::GameOver;
    } else if next.boss.is_none() {
        info!("boss tank destroyed on frame {}: victory", next.frame);
        next.status = GameStatus::Victory;
    }
    next
}
