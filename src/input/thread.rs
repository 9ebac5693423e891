use crossterm::event::{self, Event};
use std::io;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::Arc;
use std::thread::JoinHandle;

use super::state::SharedState;
use super::{apply_command, command_for_event, Command, Speeds};
use crate::world::Map;

/// One-shot message from the input thread to the render loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopSignal {
    Quit,
    InputFailed(String),
}

pub type SignalReceiver = Receiver<LoopSignal>;

/// Blocking source of terminal events.
pub trait KeySource {
    fn read_event(&mut self) -> io::Result<Event>;
}

#[derive(Debug, Default)]
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn read_event(&mut self) -> io::Result<Event> {
        event::read()
    }
}

pub fn spawn_input_thread<S>(
    mut source: S,
    shared: Arc<SharedState>,
    map: Arc<Map>,
    speeds: Speeds,
) -> io::Result<(SignalReceiver, JoinHandle<()>)>
where
    S: KeySource + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel(1);
    let handle = std::thread::Builder::new()
        .name("input".into())
        .spawn(move || {
            tracing::debug!("input thread started");
            run_input_loop(&mut source, &shared, &map, speeds, &tx);
            tracing::debug!("input thread stopped");
        })?;
    Ok((rx, handle))
}

fn run_input_loop(
    source: &mut impl KeySource,
    shared: &SharedState,
    map: &Map,
    speeds: Speeds,
    tx: &SyncSender<LoopSignal>,
) {
    loop {
        let event = match source.read_event() {
            Ok(event) => event,
            Err(err) => {
                tracing::error!(%err, "reading key event failed");
                let _ = tx.try_send(LoopSignal::InputFailed(err.to_string()));
                return;
            }
        };
        let Some(command) = command_for_event(&event) else {
            continue;
        };
        if command == Command::Quit {
            tracing::info!("quit requested");
            let _ = tx.try_send(LoopSignal::Quit);
            return;
        }
        apply_command(shared, map, command, speeds, shared.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerState;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::collections::VecDeque;
    use std::time::Duration;

    struct Scripted(VecDeque<io::Result<Event>>);

    impl KeySource for Scripted {
        fn read_event(&mut self) -> io::Result<Event> {
            self.0
                .pop_front()
                .unwrap_or_else(|| Err(io::Error::new(io::ErrorKind::UnexpectedEof, "script done")))
        }
    }

    fn key(c: char) -> io::Result<Event> {
        Ok(Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)))
    }

    fn setup(player: PlayerState) -> (Arc<SharedState>, Arc<Map>) {
        let shared = Arc::new(SharedState::new(player, false));
        shared.publish_elapsed(0.1);
        (shared, Arc::new(Map::default_level().expect("built-in level")))
    }

    #[test]
    fn quit_signals_once_and_ends_thread() {
        let (shared, map) = setup(PlayerState::new(8.0, 8.0, 0.0));
        let script = Scripted(VecDeque::from([key('w'), key('m'), key('c'), key('w')]));
        let (rx, handle) = spawn_input_thread(script, Arc::clone(&shared), map, Speeds::default())
            .expect("spawn input thread");

        let signal = rx
            .recv_timeout(Duration::from_secs(2))
            .expect("quit signal should arrive");
        assert_eq!(signal, LoopSignal::Quit);
        handle.join().expect("input thread should not panic");

        // The trailing 'w' after quit is never applied.
        let snap = shared.snapshot();
        assert!((snap.player.y - 8.5).abs() < 1e-9);
        assert!(snap.show_hud);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn read_error_is_reported_as_fatal() {
        let (shared, map) = setup(PlayerState::new(8.0, 8.0, 0.0));
        let script = Scripted(VecDeque::from([
            key('q'),
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "tty gone")),
        ]));
        let (rx, handle) = spawn_input_thread(script, Arc::clone(&shared), map, Speeds::default())
            .expect("spawn input thread");

        match rx.recv_timeout(Duration::from_secs(2)) {
            Ok(LoopSignal::InputFailed(msg)) => assert!(msg.contains("tty gone")),
            other => panic!("expected InputFailed, got {other:?}"),
        }
        handle.join().expect("input thread should not panic");
        assert!((shared.snapshot().player.heading - 0.1).abs() < 1e-9);
    }
}
