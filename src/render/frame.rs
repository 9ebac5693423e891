use crossterm::{cursor, queue, style::Print};
use std::io::{self, Write};
use std::sync::mpsc::TryRecvError;
use std::time::Instant;

use super::{hud, raycast, shade, AppResult, AppState, FrameBuffer};
use crate::input::state::Snapshot;
use crate::input::thread::{LoopSignal, SignalReceiver};

/// Casts and shades every column, then overlays the HUD when enabled.
pub fn render_frame(app_state: &mut AppState, snapshot: &Snapshot) -> io::Result<()> {
    let projection = app_state.projection;
    let width = app_state.frame.width();

    raycast::cast_columns(
        &app_state.map,
        &snapshot.player,
        projection.fov,
        projection.depth,
        width,
        &mut app_state.hits,
    );
    for (column, hit) in app_state.hits.iter().enumerate() {
        shade::shade_column(&mut app_state.frame, column, hit, projection.depth);
    }

    if snapshot.show_hud {
        hud::draw_hud(
            &mut app_state.frame,
            &app_state.map,
            &snapshot.player,
            app_state.elapsed,
            &mut app_state.hud_string_buf,
        )?;
    }
    Ok(())
}

/// Repaints in place from the top-left corner, one row per line.
pub fn flush_frame(frame: &FrameBuffer, line: &mut String, out: &mut impl Write) -> io::Result<()> {
    for y in 0..frame.height() {
        line.clear();
        line.extend(frame.row(y));
        queue!(out, cursor::MoveTo(0, y as u16), Print(line.as_str()))?;
    }
    out.flush()
}

pub fn run_app_loop(
    app_state: &mut AppState,
    signals: &SignalReceiver,
    out: &mut impl Write,
) -> AppResult<()> {
    let mut line = String::with_capacity(app_state.frame.width() * 3);
    loop {
        let now = Instant::now();
        let elapsed = now.duration_since(app_state.last_frame_time).as_secs_f64();
        app_state.last_frame_time = now;
        app_state.elapsed = elapsed;
        app_state.shared.publish_elapsed(elapsed);

        match signals.try_recv() {
            Ok(LoopSignal::Quit) => break,
            Ok(LoopSignal::InputFailed(err)) => {
                return Err(format!("Input thread read failed: {err}").into());
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                return Err("Input channel disconnected".into());
            }
        }

        let snapshot = app_state.shared.snapshot();
        render_frame(app_state, &snapshot)?;
        flush_frame(&app_state.frame, &mut line, out)?;
        app_state.frame_count += 1;

        std::thread::sleep(app_state.frame_target);
    }

    tracing::info!(frames = app_state.frame_count, "render loop finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::state::SharedState;
    use crate::player::PlayerState;
    use crate::render::Projection;
    use crate::world::Map;
    use std::f64::consts::FRAC_PI_4;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::time::Duration;

    const SENTINEL: char = '\u{0}';

    fn make_state(player: PlayerState, show_hud: bool) -> AppState {
        AppState::new(
            Arc::new(Map::default_level().expect("built-in level")),
            Arc::new(SharedState::new(player, show_hud)),
            Projection {
                fov: -FRAC_PI_4,
                depth: 16.0,
            },
            (120, 40),
            Duration::from_millis(1),
        )
    }

    #[test]
    fn every_cell_is_written_with_hud_off() {
        let mut app = make_state(PlayerState::new(8.0, 8.0, 0.0), false);
        for y in 0..40 {
            for x in 0..120 {
                app.frame.set(x, y, SENTINEL);
            }
        }
        let snapshot = app.shared.snapshot();
        render_frame(&mut app, &snapshot).expect("frame should render");
        for y in 0..40 {
            assert!(!app.frame.row(y).contains(&SENTINEL), "row {y} kept stale cells");
        }
    }

    #[test]
    fn hud_overlays_stats_minimap_and_marker() {
        let mut app = make_state(PlayerState::new(8.5, 8.5, 0.0), true);
        app.elapsed = 0.016;
        let snapshot = app.shared.snapshot();
        render_frame(&mut app, &snapshot).expect("frame should render");
        let stats: String = app.frame.row(0).iter().collect();
        assert!(stats.starts_with("X=8.50, Y=8.50, A=0.00 FPS=62.50"));
        assert_eq!(app.frame.get(8, 9), Some('P'));
        assert_eq!(app.frame.get(0, 16), Some('#'));
    }

    #[test]
    fn flush_writes_each_row() {
        let mut frame = FrameBuffer::new(3, 2);
        frame.set(0, 0, 'a');
        frame.set(2, 1, '\u{2588}');
        let mut out = Vec::new();
        let mut line = String::new();
        flush_frame(&frame, &mut line, &mut out).expect("flush to memory");
        let text = String::from_utf8(out).expect("utf8 output");
        assert!(text.contains("\x1b[1;1Ha  "));
        assert!(text.contains("\x1b[2;1H  \u{2588}"));
    }

    #[test]
    fn quit_before_first_frame_flushes_nothing() {
        let mut app = make_state(PlayerState::new(8.0, 8.0, 0.0), false);
        let (tx, rx) = mpsc::sync_channel(1);
        tx.send(LoopSignal::Quit).expect("queue quit");
        let mut out = Vec::new();
        run_app_loop(&mut app, &rx, &mut out).expect("loop should stop cleanly");
        assert!(out.is_empty());
        assert_eq!(app.frame_count, 0);
    }

    #[test]
    fn quit_stops_running_loop_within_a_frame() {
        let mut app = make_state(PlayerState::new(8.0, 8.0, 0.0), false);
        let (tx, rx) = mpsc::sync_channel(1);
        let sender = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(30));
            tx.send(LoopSignal::Quit).expect("queue quit");
            // Keep the channel open so the loop sees Quit, not a disconnect.
            std::thread::sleep(Duration::from_millis(200));
        });
        let mut out = Vec::new();
        let started = Instant::now();
        run_app_loop(&mut app, &rx, &mut out).expect("loop should stop cleanly");
        assert!(started.elapsed() < Duration::from_millis(200));
        assert!(app.frame_count > 0);
        assert!(!out.is_empty());
        assert!(app.shared.elapsed() > 0.0);
        sender.join().expect("sender thread");
    }

    #[test]
    fn input_failure_ends_loop_with_error() {
        let mut app = make_state(PlayerState::new(8.0, 8.0, 0.0), false);
        let (tx, rx) = mpsc::sync_channel(1);
        tx.send(LoopSignal::InputFailed("tty gone".into()))
            .expect("queue failure");
        let mut out = Vec::new();
        let err = run_app_loop(&mut app, &rx, &mut out).expect_err("loop must fail");
        assert!(err.to_string().contains("tty gone"));

        let (tx, rx) = mpsc::sync_channel::<LoopSignal>(1);
        drop(tx);
        assert!(run_app_loop(&mut app, &rx, &mut out).is_err());
    }
}
