use crossterm::{
    cursor, execute,
    terminal::{self, ClearType},
};
use std::io::{self, Write};
use std::panic;

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

const SHOW_CURSOR: &[u8] = b"\x1b[?25h";

/// Undoes what `prepare_terminal` drew: blank screen, cursor home and visible.
fn restore_screen(out: &mut impl Write) -> io::Result<()> {
    execute!(
        out,
        terminal::Clear(ClearType::All),
        cursor::MoveTo(0, 0),
        cursor::Show
    )
}

pub fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = terminal::disable_raw_mode();
        if restore_screen(&mut io::stdout()).is_err() {
            let _ = io::stderr().write_all(SHOW_CURSOR);
        }
        default_hook(panic_info);
    }));
}

/// Raw mode on, screen cleared, cursor hidden. Raw mode is switched back off
/// if the rest of the setup fails.
pub fn prepare_terminal(stdout: &mut impl Write) -> AppResult<()> {
    terminal::enable_raw_mode()?;
    let setup = execute!(stdout, terminal::Clear(ClearType::All), cursor::Hide)
        .and_then(|()| stdout.flush());
    restore_on_err(setup, stdout)
}

fn restore_on_err<T>(result: io::Result<T>, stdout: &mut impl Write) -> AppResult<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) => {
            let _ = cleanup_terminal(stdout);
            Err(err.into())
        }
    }
}

pub fn cleanup_terminal(stdout: &mut impl Write) -> AppResult<()> {
    restore_screen(stdout)?;
    stdout.flush()?;
    terminal::disable_raw_mode()?;
    Ok(())
}
