//! Presentation snapshot.  Turns a `GameState` into the flat list of
//! primitives a frontend draws.  No game logic; coordinates are arena pixels.

use crate::config::{SCREEN_WIDTH, STATUS_BAR_HEIGHT, TANK_SIZE};
use crate::entities::{Bullet, Facing, GameState, GameStatus, Tank};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 255 }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgba,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Rgba,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        color: Rgba,
    },
}

// ── Colour palette ────────────────────────────────────────────────────────────

pub const C_PLAYER: Rgba = Rgba::opaque(0, 255, 0);
pub const C_BOSS: Rgba = Rgba::opaque(255, 0, 0);
pub const C_ENEMY: Rgba = Rgba::opaque(255, 182, 193);
pub const C_WALL: Rgba = Rgba::opaque(128, 128, 128);
pub const C_STATUS_BAR: Rgba = Rgba::opaque(192, 192, 192);
pub const C_STATUS_TEXT: Rgba = Rgba::opaque(0, 0, 255);
pub const C_MESSAGE: Rgba = Rgba::opaque(255, 255, 255);

pub const PLAYER_HP_LABEL: &str = "Player HP";
pub const BOSS_HP_LABEL: &str = "Boss HP";
pub const GAME_OVER_MESSAGE: &str = "GAME OVER!";
pub const VICTORY_MESSAGE: &str = "YOU WIN!";

/// Length of the barrel line drawn out of a tank's leading edge.
const BARREL: f32 = 10.0;

// ── Public entry point ────────────────────────────────────────────────────────

/// Everything to draw for one frame, in back-to-front order.
pub fn draw_frame(state: &GameState) -> Vec<Primitive> {
    match state.status {
        GameStatus::GameOver => return vec![message(GAME_OVER_MESSAGE)],
        GameStatus::Victory => return vec![message(VICTORY_MESSAGE)],
        GameStatus::Playing => {}
    }

    let mut out = Vec::new();
    draw_status_bar(&mut out, state);

    if let Some(player) = &state.player {
        draw_tank(&mut out, player, C_PLAYER);
    }
    draw_bullets(&mut out, &state.player_bullets, C_PLAYER);
    if let Some(boss) = &state.boss {
        draw_tank(&mut out, boss, C_BOSS);
    }
    draw_bullets(&mut out, &state.boss_bullets, C_BOSS);
    for enemy in &state.enemies {
        draw_tank(&mut out, enemy, C_ENEMY);
    }
    draw_bullets(&mut out, &state.enemy_bullets, C_ENEMY);
    for wall in &state.walls {
        out.push(Primitive::FillRect {
            x: wall.x,
            y: wall.y,
            w: wall.width,
            h: wall.height,
            color: C_WALL,
        });
    }
    out
}

fn message(text: &str) -> Primitive {
    Primitive::Text {
        x: 0.0,
        y: 0.0,
        text: text.to_string(),
        color: C_MESSAGE,
    }
}

// ── Status bar ────────────────────────────────────────────────────────────────

fn draw_status_bar(out: &mut Vec<Primitive>, state: &GameState) {
    out.push(Primitive::FillRect {
        x: 0.0,
        y: 0.0,
        w: SCREEN_WIDTH,
        h: STATUS_BAR_HEIGHT,
        color: C_STATUS_BAR,
    });
    if let Some(player) = &state.player {
        out.push(Primitive::Text {
            x: 2.0,
            y: 1.0,
            text: format!("{}: {}", PLAYER_HP_LABEL, player.health),
            color: C_STATUS_TEXT,
        });
    }
    if let Some(boss) = &state.boss {
        out.push(Primitive::Text {
            x: 122.0,
            y: 1.0,
            text: format!("{}: {}", BOSS_HP_LABEL, boss.health),
            color: C_STATUS_TEXT,
        });
    }
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_tank(out: &mut Vec<Primitive>, tank: &Tank, color: Rgba) {
    out.push(Primitive::FillRect {
        x: tank.x,
        y: tank.y,
        w: TANK_SIZE,
        h: TANK_SIZE,
        color,
    });

    let half = TANK_SIZE / 2.0;
    let (x1, y1, x2, y2) = match tank.facing {
        Facing::Up => (tank.x + half, tank.y, tank.x + half, tank.y - BARREL),
        Facing::Right => (
            tank.x + TANK_SIZE,
            tank.y + half,
            tank.x + TANK_SIZE + BARREL,
            tank.y + half,
        ),
        Facing::Down => (
            tank.x + half,
            tank.y + TANK_SIZE,
            tank.x + half,
            tank.y + TANK_SIZE + BARREL,
        ),
        Facing::Left => (tank.x, tank.y + half, tank.x - BARREL, tank.y + half),
    };
    out.push(Primitive::Line {
        x1,
        y1,
        x2,
        y2,
        color,
    });
}

fn draw_bullets(out: &mut Vec<Primitive>, bullets: &[Bullet], color: Rgba) {
    out.extend(bullets.iter().map(|b| {
        let r = b.rect();
        Primitive::FillRect {
            x: r.x,
            y: r.y,
            w: r.w,
            h: r.h,
            color,
        }
    }));
}
