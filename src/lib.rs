//! Tank battle: a player tank against a boss tank, roaming enemy tanks and
//! destructible walls on a fixed 640×480 arena.
//!
//! - `entities`: pure data
//! - `compute`: per-frame state transitions
//! - `spawner`: background timers that request new enemies and walls
//! - `render`: state → drawable primitives

pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod render;
pub mod spawner;
