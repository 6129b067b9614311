//! Sprite-sheet generation: lays every frame of an animation out on a
//! single row-wrapped canvas by seeking the compositor to each frame in
//! turn and blitting the composed result.

use super::canvas::Canvas;
use super::player::Player;

/// Default maximum sprite-sheet width in pixels before row-wrapping kicks
/// in.
pub const DEFAULT_MAX_WIDTH: u32 = 6000;

/// Computed sprite-sheet layout for `frame_count` cells of `width x height`
/// each, given `max_width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    /// Total sheet width in pixels.
    pub width: u32,
    /// Total sheet height in pixels.
    pub height: u32,
    /// Number of cells per row.
    pub columns: u32,
}

/// Computes the single-row-or-wrapped layout for `frame_count` cells.
#[must_use]
pub fn compute_layout(frame_width: u32, frame_height: u32, frame_count: u32, max_width: u32) -> SheetLayout {
    if frame_count == 0 {
        return SheetLayout { width: 0, height: 0, columns: 0 };
    }

    if frame_width.saturating_mul(frame_count) <= max_width {
        return SheetLayout {
            width: frame_width * frame_count,
            height: frame_height,
            columns: frame_count,
        };
    }

    let columns = (max_width / frame_width).max(1);
    let rows = frame_count.div_ceil(columns);
    SheetLayout {
        width: columns * frame_width,
        height: rows * frame_height,
        columns,
    }
}

/// Renders a sprite sheet of `player`'s full animation by seeking to each
/// frame and blitting the resulting canvas into a fresh `C`.
///
/// Row-wraps when the running `x` offset reaches `max_width` (`x >=
/// max_width`, so a cell exactly `max_width` wide never shares a row with
/// another).
pub fn generate<C: Canvas>(player: &mut Player<C>, frame_width: u32, frame_height: u32, max_width: u32) -> C {
    let frame_count = player.sequence_len() as u32;
    let layout = compute_layout(frame_width, frame_height, frame_count, max_width);
    let mut sheet = C::blank(layout.width, layout.height);

    let mut x = 0u32;
    let mut y = 0u32;
    for i in 0..frame_count {
        player.seek_to_index(i as i64);
        player.canvas().copy_region(0, 0, frame_width, frame_height, &mut sheet, x, y);

        x += frame_width;
        if x >= layout.width {
            x = 0;
            y += frame_height;
        }
    }

    sheet
}
