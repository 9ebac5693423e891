// --- Tile map ---

pub const WALL_GLYPH: char = '#';

pub const DEFAULT_LEVEL: &str = "\
################
#..............#
#..............#
#..............#
#..............#
#..........#...#
#..............#
#..........#...#
#..............#
#..............#
#......#.......#
#......#.......#
#......#########
#..............#
#..............#
################";

pub const DEFAULT_LEVEL_WIDTH: usize = 16;
pub const DEFAULT_LEVEL_HEIGHT: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Solid,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    ZeroSize,
    CellCount { expected: usize, found: usize },
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroSize => f.write_str("map dimensions must be non-zero"),
            Self::CellCount { expected, found } => {
                write!(f, "map layout has {found} cells, expected {expected}")
            }
        }
    }
}

impl std::error::Error for MapError {}

/// Immutable grid of solid/empty cells, row-major.
#[derive(Debug, Clone)]
pub struct Map {
    width: usize,
    height: usize,
    glyphs: Vec<char>,
}

impl Map {
    /// Builds a map from a literal layout. Line breaks are ignored, `#` is a
    /// wall and every other character is open floor.
    pub fn parse(layout: &str, width: usize, height: usize) -> Result<Self, MapError> {
        if width == 0 || height == 0 {
            return Err(MapError::ZeroSize);
        }
        let glyphs: Vec<char> = layout.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        let expected = width * height;
        if glyphs.len() != expected {
            return Err(MapError::CellCount {
                expected,
                found: glyphs.len(),
            });
        }
        Ok(Self {
            width,
            height,
            glyphs,
        })
    }

    pub fn default_level() -> Result<Self, MapError> {
        Self::parse(DEFAULT_LEVEL, DEFAULT_LEVEL_WIDTH, DEFAULT_LEVEL_HEIGHT)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn glyph(&self, x: i64, y: i64) -> Option<char> {
        self.index(x, y).map(|idx| self.glyphs[idx])
    }

    pub fn cell(&self, x: i64, y: i64) -> Option<Cell> {
        self.glyph(x, y).map(|g| {
            if g == WALL_GLYPH {
                Cell::Solid
            } else {
                Cell::Empty
            }
        })
    }

    /// Collision query on continuous coordinates. Anything outside the grid
    /// blocks, including NaN.
    pub fn is_solid(&self, x: f64, y: f64) -> bool {
        if !(x >= 0.0 && y >= 0.0) {
            return true;
        }
        !matches!(self.cell(x as i64, y as i64), Some(Cell::Empty))
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.glyphs
            .iter()
            .enumerate()
            .filter(|(_, g)| **g != WALL_GLYPH)
            .map(|(idx, _)| (idx % self.width, idx / self.width))
    }

    pub fn row(&self, y: usize) -> &[char] {
        let start = y * self.width;
        &self.glyphs[start..start + self.width]
    }
}
