use rayon::prelude::*;

use crate::player::PlayerState;
use crate::world::{Cell, Map};

// --- Ray marching ---

pub const STEP: f64 = 0.1;
pub const BOUNDARY_ANGLE: f64 = 0.01;
const CORNER_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f64,
    pub hit_wall: bool,
    pub is_boundary: bool,
}

/// Angle of the ray for `column`, sweeping `fov` across the screen starting
/// at `heading - fov / 2`.
pub fn column_angle(heading: f64, fov: f64, column: usize, screen_width: usize) -> f64 {
    (heading - fov / 2.0) + (column as f64 / screen_width.max(1) as f64) * fov
}

pub fn cast_ray(map: &Map, player: &PlayerState, angle: f64, depth: f64) -> RayHit {
    let eye_x = angle.sin();
    let eye_y = angle.cos();
    let mut distance = 0.0;

    while distance < depth {
        distance += STEP;

        let test_x = (player.x + eye_x * distance).floor() as i64;
        let test_y = (player.y + eye_y * distance).floor() as i64;

        match map.cell(test_x, test_y) {
            None => {
                return RayHit {
                    distance: depth,
                    hit_wall: true,
                    is_boundary: false,
                }
            }
            Some(Cell::Solid) => {
                return RayHit {
                    distance,
                    hit_wall: true,
                    is_boundary: grazes_corner(player, eye_x, eye_y, test_x, test_y),
                }
            }
            Some(Cell::Empty) => {}
        }
    }

    RayHit {
        distance: depth,
        hit_wall: false,
        is_boundary: false,
    }
}

/// True when the ray passes within `BOUNDARY_ANGLE` of one of the two cell
/// corners nearest the player.
fn grazes_corner(player: &PlayerState, eye_x: f64, eye_y: f64, cell_x: i64, cell_y: i64) -> bool {
    let mut corners = [(f64::INFINITY, -1.0_f64); 4];
    let mut count = 0;
    for tx in 0..2 {
        for ty in 0..2 {
            let vx = (cell_x + tx) as f64 - player.x;
            let vy = (cell_y + ty) as f64 - player.y;
            let d = (vx * vx + vy * vy).sqrt();
            if d < CORNER_EPSILON {
                continue;
            }
            corners[count] = (d, (eye_x * vx + eye_y * vy) / d);
            count += 1;
        }
    }

    let corners = &mut corners[..count];
    corners.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));
    corners
        .iter()
        .take(2)
        .any(|(_, dot)| dot.clamp(-1.0, 1.0).acos() < BOUNDARY_ANGLE)
}

/// Casts every column of the frame in parallel, in column order.
pub fn cast_columns(
    map: &Map,
    player: &PlayerState,
    fov: f64,
    depth: f64,
    screen_width: usize,
    hits: &mut Vec<RayHit>,
) {
    (0..screen_width)
        .into_par_iter()
        .map(|column| {
            let angle = column_angle(player.heading, fov, column, screen_width);
            cast_ray(map, player, angle, depth)
        })
        .collect_into_vec(hits);
}
