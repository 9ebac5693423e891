pub mod frame;
pub mod hud;
pub mod raycast;
pub mod shade;

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::input::state::SharedState;
use crate::world::Map;
use raycast::RayHit;

pub type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Flat character grid, row-major, redrawn in full every frame.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    cells: Vec<char>,
    width: usize,
    height: usize,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: vec![' '; width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[cfg(test)]
    pub fn get(&self, x: usize, y: usize) -> Option<char> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[y * self.width + x])
    }

    /// Out-of-range writes are dropped.
    pub fn set(&mut self, x: usize, y: usize, glyph: char) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = glyph;
        }
    }

    pub fn row(&self, y: usize) -> &[char] {
        let start = y * self.width;
        &self.cells[start..start + self.width]
    }
}

/// Read-only view parameters, fixed for the whole session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Signed sweep across the screen in radians. Negative sweeps from the
    /// player's left to right with heading 0 facing +y.
    pub fov: f64,
    pub depth: f64,
}

#[derive(Debug)]
pub struct AppState {
    pub map: Arc<Map>,
    pub shared: Arc<SharedState>,
    pub projection: Projection,
    pub frame: FrameBuffer,
    pub hits: Vec<RayHit>,
    pub hud_string_buf: String,
    pub frame_target: Duration,
    pub frame_count: u64,
    pub last_frame_time: Instant,
    pub elapsed: f64,
}

impl AppState {
    pub fn new(
        map: Arc<Map>,
        shared: Arc<SharedState>,
        projection: Projection,
        screen: (usize, usize),
        frame_target: Duration,
    ) -> Self {
        let (width, height) = screen;
        Self {
            map,
            shared,
            projection,
            frame: FrameBuffer::new(width, height),
            hits: Vec::with_capacity(width),
            hud_string_buf: String::with_capacity(128),
            frame_target,
            frame_count: 0,
            last_frame_time: Instant::now(),
            elapsed: 0.0,
        }
    }
}
