use std::fmt::Write as _;
use std::io;

use super::FrameBuffer;
use crate::player::PlayerState;
use crate::world::Map;

pub const PLAYER_MARKER: char = 'P';

/// Overlays the debug HUD: stats line on row 0, the minimap below it, then
/// the player marker on top of the minimap.
pub fn draw_hud(
    frame: &mut FrameBuffer,
    map: &Map,
    player: &PlayerState,
    elapsed: f64,
    text: &mut String,
) -> io::Result<()> {
    draw_stats(frame, player, elapsed, text)?;
    draw_minimap(frame, map);
    draw_player_marker(frame, player);
    Ok(())
}

pub fn draw_stats(
    frame: &mut FrameBuffer,
    player: &PlayerState,
    elapsed: f64,
    text: &mut String,
) -> io::Result<()> {
    let fps = if elapsed > 0.0 { 1.0 / elapsed } else { 0.0 };
    text.clear();
    write!(
        text,
        "X={:3.2}, Y={:3.2}, A={:3.2} FPS={:3.2}",
        player.x, player.y, player.heading, fps
    )
    .map_err(|_| io::Error::other("failed to format HUD"))?;
    for (col, ch) in text.chars().take(frame.width()).enumerate() {
        frame.set(col, 0, ch);
    }
    Ok(())
}

/// Copies the map into the top-left corner, one row below the stats line,
/// clipped to the frame.
pub fn draw_minimap(frame: &mut FrameBuffer, map: &Map) {
    let cols = map.width().min(frame.width());
    let rows = map.height().min(frame.height().saturating_sub(1));
    for my in 0..rows {
        for (mx, glyph) in map.row(my)[..cols].iter().enumerate() {
            frame.set(mx, my + 1, *glyph);
        }
    }
}

pub fn draw_player_marker(frame: &mut FrameBuffer, player: &PlayerState) {
    if !(player.x >= 0.0 && player.y >= 0.0) {
        return;
    }
    let (cx, cy) = player.cell();
    frame.set(cx as usize, cy as usize + 1, PLAYER_MARKER);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_string(frame: &FrameBuffer, y: usize) -> String {
        frame.row(y).iter().collect()
    }

    #[test]
    fn stats_line_is_written_on_first_row() {
        let mut frame = FrameBuffer::new(60, 3);
        let mut text = String::new();
        draw_stats(&mut frame, &PlayerState::new(8.0, 7.5, 0.25), 0.02, &mut text)
            .expect("stats should format");
        assert_eq!(
            row_string(&frame, 0).trim_end(),
            "X=8.00, Y=7.50, A=0.25 FPS=50.00"
        );
        assert!(row_string(&frame, 1).trim().is_empty());
    }

    #[test]
    fn stats_line_is_clipped_to_width() {
        let mut frame = FrameBuffer::new(8, 1);
        let mut text = String::new();
        draw_stats(&mut frame, &PlayerState::new(1.0, 2.0, 3.0), 0.0, &mut text)
            .expect("stats should format");
        assert_eq!(row_string(&frame, 0), "X=1.00, ");
    }

    #[test]
    fn overlay_order_puts_marker_over_minimap() {
        let map = Map::default_level().expect("built-in level");
        let mut frame = FrameBuffer::new(120, 40);
        let mut text = String::new();
        let player = PlayerState::new(3.7, 5.2, 0.0);
        draw_hud(&mut frame, &map, &player, 0.016, &mut text).expect("hud should draw");

        assert!(row_string(&frame, 0).starts_with("X=3.70"));
        assert_eq!(row_string(&frame, 1)[..16].to_string(), "################");
        assert_eq!(frame.get(3, 6), Some(PLAYER_MARKER));
        assert_eq!(frame.get(11, 6), Some('#'));
        assert_eq!(frame.get(16, 1), Some(' '));
    }

    #[test]
    fn minimap_is_clipped_to_small_frames() {
        let map = Map::default_level().expect("built-in level");
        let mut frame = FrameBuffer::new(10, 5);
        draw_minimap(&mut frame, &map);
        draw_player_marker(&mut frame, &PlayerState::new(12.0, 12.0, 0.0));
        assert_eq!(row_string(&frame, 1), "##########");
        assert_eq!(row_string(&frame, 4), "#.........");
    }

    #[test]
    fn narrow_map_leaves_rest_of_row_alone() {
        let map = Map::parse("####\n#.##\n.###", 4, 3).expect("small map");
        let mut frame = FrameBuffer::new(6, 5);
        for x in 0..6 {
            frame.set(x, 2, '~');
        }
        draw_minimap(&mut frame, &map);
        assert_eq!(row_string(&frame, 1), "####  ");
        assert_eq!(row_string(&frame, 2), "#.##~~");
        assert_eq!(row_string(&frame, 3), ".###  ");
        assert!(row_string(&frame, 4).trim().is_empty());
    }
}
