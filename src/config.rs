use clap::Parser;
use rand::seq::IndexedRandom;
use std::path::PathBuf;
use std::time::Duration;

use crate::input::Speeds;
use crate::player::PlayerState;
use crate::render::Projection;
use crate::world::Map;

#[derive(Debug, Parser)]
#[command(
    name = "tunnelvision",
    version,
    about = "Text-mode first-person raycaster"
)]
pub struct Cli {
    #[arg(long, default_value_t = 120, help = "Screen width in characters")]
    pub width: usize,
    #[arg(long, default_value_t = 40, help = "Screen height in characters")]
    pub height: usize,
    #[arg(long, help = "Size the screen to the current terminal", conflicts_with_all = ["width", "height"])]
    pub fit_terminal: bool,
    #[arg(long, default_value_t = 45.0, help = "Field of view in degrees")]
    pub fov: f64,
    #[arg(long, default_value_t = 16.0, help = "Maximum ray depth in map units")]
    pub depth: f64,
    #[arg(long, default_value_t = 5.0, help = "Movement speed in units per second")]
    pub move_speed: f64,
    #[arg(long, default_value_t = 1.0, help = "Rotation speed in radians per second")]
    pub rotation_speed: f64,
    #[arg(long, value_name = "MS", default_value_t = 16, help = "Sleep between frames")]
    pub frame_ms: u64,
    #[arg(
        long,
        value_name = "X,Y",
        value_parser = parse_spawn,
        default_value = "8.0,8.0",
        help = "Starting position"
    )]
    pub spawn: (f64, f64),
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true, help = "Starting heading in radians")]
    pub heading: f64,
    #[arg(long, help = "Start in a random open cell", conflicts_with = "spawn")]
    pub random_spawn: bool,
    #[arg(long, help = "Start with the debug HUD visible")]
    pub hud: bool,
    #[arg(long, value_name = "PATH", help = "Write a log to PATH")]
    pub log_file: Option<PathBuf>,
}

fn parse_spawn(raw: &str) -> Result<(f64, f64), String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{raw}'"))?;
    let x = x
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("bad X in '{raw}': {err}"))?;
    let y = y
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("bad Y in '{raw}': {err}"))?;
    Ok((x, y))
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ScreenTooSmall { width: usize, height: usize },
    NonPositive { name: &'static str, value: f64 },
    SpawnBlocked { x: f64, y: f64 },
    NoOpenCell,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScreenTooSmall { width, height } => {
                write!(f, "screen {width}x{height} is too small")
            }
            Self::NonPositive { name, value } => {
                write!(f, "{name} must be a positive number, got {value}")
            }
            Self::SpawnBlocked { x, y } => {
                write!(f, "spawn point ({x}, {y}) is inside a wall or off the map")
            }
            Self::NoOpenCell => f.write_str("map has no open cell to spawn in"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Validated, read-only session settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub screen: (usize, usize),
    pub projection: Projection,
    pub speeds: Speeds,
    pub frame_target: Duration,
    pub spawn: PlayerState,
    pub show_hud: bool,
}

fn positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

impl Settings {
    /// `terminal_size` is consulted only with `--fit-terminal`.
    pub fn from_cli(cli: &Cli, map: &Map, terminal_size: Option<(u16, u16)>) -> Result<Self, ConfigError> {
        let screen = match (cli.fit_terminal, terminal_size) {
            (true, Some((cols, rows))) => (cols as usize, rows as usize),
            _ => (cli.width, cli.height),
        };
        if screen.0 == 0 || screen.1 < 2 || screen.0 > u16::MAX as usize || screen.1 > u16::MAX as usize {
            return Err(ConfigError::ScreenTooSmall {
                width: screen.0,
                height: screen.1,
            });
        }

        let fov = positive("fov", cli.fov)?.to_radians();
        let depth = positive("depth", cli.depth)?;
        let speeds = Speeds {
            move_speed: positive("move-speed", cli.move_speed)?,
            rotation_speed: positive("rotation-speed", cli.rotation_speed)?,
        };

        let (x, y) = if cli.random_spawn {
            random_open_cell(map)?
        } else {
            cli.spawn
        };
        if map.is_solid(x, y) {
            return Err(ConfigError::SpawnBlocked { x, y });
        }

        Ok(Self {
            screen,
            // Negative sweep so column 0 looks to the player's left.
            projection: Projection { fov: -fov, depth },
            speeds,
            frame_target: Duration::from_millis(cli.frame_ms),
            spawn: PlayerState::new(x, y, cli.heading),
            show_hud: cli.hud,
        })
    }
}

fn random_open_cell(map: &Map) -> Result<(f64, f64), ConfigError> {
    let open: Vec<(usize, usize)> = map.empty_cells().collect();
    let (cx, cy) = open.choose(&mut rand::rng()).ok_or(ConfigError::NoOpenCell)?;
    Ok((*cx as f64 + 0.5, *cy as f64 + 0.5))
}
