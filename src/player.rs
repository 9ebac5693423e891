use std::f64::consts::FRAC_PI_2;

use crate::world::Map;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerState {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

impl PlayerState {
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self { x, y, heading }
    }

    /// Unit vector the player is facing. Heading 0 looks down +y.
    pub fn facing(&self) -> (f64, f64) {
        (self.heading.sin(), self.heading.cos())
    }

    pub fn cell(&self) -> (i64, i64) {
        (self.x as i64, self.y as i64)
    }
}

pub fn rotate(player: &mut PlayerState, delta: f64) {
    player.heading += delta;
}

/// Applies the full step, then rolls it back if the new position is inside a
/// wall. Returns whether the move stuck.
pub fn try_step(player: &mut PlayerState, map: &Map, dx: f64, dy: f64) -> bool {
    let before = *player;
    player.x += dx;
    player.y += dy;
    if map.is_solid(player.x, player.y) {
        player.x = before.x;
        player.y = before.y;
        return false;
    }
    true
}

pub fn move_forward(player: &mut PlayerState, map: &Map, distance: f64) -> bool {
    let (fx, fy) = player.facing();
    try_step(player, map, fx * distance, fy * distance)
}

/// Sidestep along the perpendicular of the heading. Positive distance goes
/// right, negative goes left.
pub fn strafe(player: &mut PlayerState, map: &Map, distance: f64) -> bool {
    let (perp, sign) = if distance >= 0.0 {
        (player.heading + FRAC_PI_2, distance)
    } else {
        (player.heading - FRAC_PI_2, -distance)
    };
    try_step(player, map, -perp.sin() * sign, -perp.cos() * sign)
}
