use super::raycast::RayHit;
use super::FrameBuffer;

// --- Column shading ---

/// Wall glyphs from nearest to farthest.
pub const WALL_RAMP: [char; 5] = ['\u{2588}', '\u{2593}', '\u{2592}', '\u{2591}', ' '];
/// Floor glyphs from the horizon down to the bottom of the screen.
pub const FLOOR_RAMP: [char; 5] = [' ', '-', '.', 'x', '#'];

const MIN_DISTANCE: f64 = 1e-6;

/// Rows strictly between `ceiling` and `floor` are wall. `ceiling` goes
/// negative when the wall fills the whole column. The horizon is the
/// integer half of the screen, so odd heights put the extra row below it.
pub fn slice_bounds(distance: f64, screen_height: usize) -> (i64, i64) {
    let horizon = (screen_height / 2) as f64;
    let ceiling = (horizon - screen_height as f64 / distance.max(MIN_DISTANCE)) as i64;
    (ceiling, screen_height as i64 - ceiling)
}

/// Index into `WALL_RAMP`; larger is lighter.
pub fn wall_tier(distance: f64, depth: f64, is_boundary: bool) -> usize {
    if is_boundary {
        return WALL_RAMP.len() - 1;
    }
    if distance <= depth / 4.0 {
        0
    } else if distance <= depth / 3.0 {
        1
    } else if distance <= depth / 2.0 {
        2
    } else if distance <= depth {
        3
    } else {
        4
    }
}

pub fn wall_glyph(distance: f64, depth: f64, is_boundary: bool) -> char {
    WALL_RAMP[wall_tier(distance, depth, is_boundary)]
}

pub fn floor_glyph(row: usize, screen_height: usize) -> char {
    let half = screen_height as f64 / 2.0;
    let b = 1.0 - (row as f64 - half) / half;
    if b < 0.25 {
        FLOOR_RAMP[4]
    } else if b < 0.5 {
        FLOOR_RAMP[3]
    } else if b < 0.75 {
        FLOOR_RAMP[2]
    } else if b < 0.9 {
        FLOOR_RAMP[1]
    } else {
        FLOOR_RAMP[0]
    }
}

/// Writes every row of `column` from one ray hit.
pub fn shade_column(buffer: &mut FrameBuffer, column: usize, hit: &RayHit, depth: f64) {
    let height = buffer.height();
    let (ceiling, floor) = slice_bounds(hit.distance, height);
    let wall = wall_glyph(hit.distance, depth, hit.is_boundary);

    for row in 0..height {
        let r = row as i64;
        let glyph = if r < ceiling {
            ' '
        } else if r > ceiling && r < floor {
            wall
        } else {
            floor_glyph(row, height)
        };
        buffer.set(column, row, glyph);
    }
}
