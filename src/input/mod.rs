pub mod state;
pub mod thread;

use crate::player;
use crate::world::Map;
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use state::SharedState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    RotateLeft,
    RotateRight,
    StrafeLeft,
    StrafeRight,
    Forward,
    Backward,
    ToggleHud,
    Quit,
}

/// Per-second rates, scaled by the last frame's elapsed time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Speeds {
    pub move_speed: f64,
    pub rotation_speed: f64,
}

impl Default for Speeds {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            rotation_speed: 1.0,
        }
    }
}

pub fn command_for_event(event: &Event) -> Option<Command> {
    let Event::Key(key_event) = event else {
        return None;
    };
    if !matches!(key_event.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return None;
    }

    match key_event.code {
        KeyCode::Esc => Some(Command::Quit),
        KeyCode::Tab => Some(Command::ToggleHud),
        KeyCode::Up => Some(Command::Forward),
        KeyCode::Down => Some(Command::Backward),
        KeyCode::Left => Some(Command::RotateLeft),
        KeyCode::Right => Some(Command::RotateRight),
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Command::Quit)
        }
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => Some(Command::RotateLeft),
            'e' => Some(Command::RotateRight),
            'a' => Some(Command::StrafeLeft),
            'd' => Some(Command::StrafeRight),
            'w' => Some(Command::Forward),
            's' => Some(Command::Backward),
            'm' => Some(Command::ToggleHud),
            'c' => Some(Command::Quit),
            _ => None,
        },
        _ => None,
    }
}

/// Applies one command to the shared state. `Quit` is handled by the input
/// thread itself and is a no-op here.
pub fn apply_command(
    shared: &SharedState,
    map: &Map,
    command: Command,
    speeds: Speeds,
    elapsed: f64,
) {
    let step = speeds.move_speed * elapsed;
    let turn = speeds.rotation_speed * elapsed;
    match command {
        Command::RotateLeft => player::rotate(&mut shared.player(), turn),
        Command::RotateRight => player::rotate(&mut shared.player(), -turn),
        Command::StrafeLeft => {
            player::strafe(&mut shared.player(), map, -step);
        }
        Command::StrafeRight => {
            player::strafe(&mut shared.player(), map, step);
        }
        Command::Forward => {
            player::move_forward(&mut shared.player(), map, step);
        }
        Command::Backward => {
            player::move_forward(&mut shared.player(), map, -step);
        }
        Command::ToggleHud => {
            shared.toggle_hud();
        }
        Command::Quit => {}
    }
}
