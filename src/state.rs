//! # Editor state & viewport math
//!
//! The single editor-state record (spec.md §3) and the cursor/viewport
//! motions over it (spec.md §4.4). Grounded on the original
//! implementation's `struct state` and `cursor_*` functions. Mode
//! dispatch (`key_normal`/`key_insert`/`key_command_line` equivalents)
//! lives in `mode.rs`, as a second `impl Editor` block, to keep this file
//! to the data model and the pure cursor math.

use std::path::PathBuf;

use crate::buffer::Buffer;
use crate::config::Config;
use crate::row::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Insert,
    CommandLine,
}

/// The editor's single state record (spec.md §3).
pub struct Editor {
    pub(crate) buf: Buffer,
    /// The command-line row, reused across `:` command entries.
    pub(crate) cmd: Row,

    /// Cursor position in buffer coordinates.
    pub(crate) x: usize,
    pub(crate) y: usize,
    /// Cursor position in screen coordinates.
    pub(crate) tx: usize,
    pub(crate) ty: usize,

    /// Terminal size in cells.
    pub(crate) w: usize,
    pub(crate) h: usize,

    pub(crate) mode: Mode,
    /// Saved `tx` across a `:` command.
    pub(crate) stored_tx: usize,

    pub(crate) filename: Option<PathBuf>,
    pub(crate) modified: bool,
    pub(crate) written_once: bool,
    pub(crate) done: bool,

    pub(crate) config: Config,
}

impl Editor {
    pub fn new(buf: Buffer, filename: Option<PathBuf>, w: usize, h: usize, config: Config) -> Self {
        Self {
            buf,
            cmd: Row::with_capacity(config.initial_cmd_size),
            x: 0,
            y: 0,
            tx: 0,
            ty: 0,
            w,
            h,
            mode: Mode::Normal,
            stored_tx: 0,
            filename,
            modified: false,
            written_once: false,
            done: false,
            config,
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn cursor_screen_pos(&self) -> (usize, usize) {
        if self.mode == Mode::CommandLine {
            (self.tx, self.h - 1)
        } else {
            (self.tx, self.ty)
        }
    }

    pub fn buf(&self) -> &Buffer {
        &self.buf
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn h(&self) -> usize {
        self.h
    }

    /// Recompute `x`'s visual column (spec.md §3 invariant 4).
    fn visual_col(&self) -> usize {
        self.buf.row(self.y).map_or(0, |r| r.visual_col(self.x, self.config.tab_width))
    }

    fn row_len(&self, y: usize) -> usize {
        self.buf.row_len(y)
    }

    fn visual_row_len(&self, y: usize) -> usize {
        self.buf.visual_row_len(y, self.config.tab_width)
    }

    /// After a vertical motion, `tx` holds the pre-motion "intent" column;
    /// recompute `x` as the smallest byte offset whose visual column is >=
    /// that intent, clamped to the new row (spec.md §4.4 `fix_x`).
    fn fix_x(&mut self) {
        let Some(row) = self.buf.row(self.y) else {
            self.x = 0;
            self.tx = 0;
            return;
        };
        if row.is_empty() {
            self.x = 0;
            self.tx = 0;
            return;
        }
        let intent = self.tx;
        let mut acc = 0usize;
        for i in 0..row.len() {
            if acc >= intent {
                self.x = i;
                self.tx = acc;
                return;
            }
            acc += row.char_visual_width(i, self.config.tab_width);
        }
        // Ran off the end of the row without reaching the intent column:
        // clamp to the last valid byte offset.
        self.x = row.len();
        self.tx = acc;
    }

    // -- motions (spec.md §4.4) ------------------------------------------

    pub fn fn_up(&mut self) -> Redraw {
        if self.y == 0 {
            return Redraw::None;
        }
        self.y -= 1;
        self.x = self.x.min(self.row_len(self.y));
        self.fix_x();
        if self.ty > 0 {
            self.ty -= 1;
            Redraw::None
        } else {
            Redraw::Scroll { start_y: self.y }
        }
    }

    pub fn fn_down(&mut self) -> Redraw {
        if self.buf.len() == 0 || self.y >= self.buf.len() - 1 {
            return Redraw::None;
        }
        self.y += 1;
        self.x = self.x.min(self.row_len(self.y));
        self.fix_x();
        if self.ty < self.h - 2 {
            self.ty += 1;
            Redraw::None
        } else {
            // Unlike `fn_start_next_row`, plain downward motion never
            // strips a newline, so it always drives two CR-LFs (matching
            // the original's unconditional `write(fd, "\r\n\r\n", 4)` in
            // `cursor_down`).
            Redraw::ScrollDownTwoRows
        }
    }

    pub fn fn_right(&mut self, stop_before_last: bool) {
        let limit = self.row_len(self.y).saturating_sub(usize::from(stop_before_last));
        if self.tx < self.w - 1 && self.x < limit {
            let w = self.buf.row(self.y).map_or(1, |r| r.char_visual_width(self.x, self.config.tab_width));
            self.x += 1;
            self.tx += w;
        }
    }

    pub fn fn_left(&mut self) {
        if self.x > 0 {
            self.x -= 1;
            let w = self.buf.row(self.y).map_or(1, |r| r.char_visual_width(self.x, self.config.tab_width));
            self.tx -= w;
        }
    }

    pub fn fn_line_start(&mut self) {
        self.x = 0;
        self.tx = 0;
    }

    pub fn fn_line_end(&mut self, stop_before_last: bool) {
        self.x = self.row_len(self.y);
        self.tx = self.visual_row_len(self.y);
        if stop_before_last && self.x > 0 {
            let w = self.buf.row(self.y).map_or(1, |r| r.char_visual_width(self.x - 1, self.config.tab_width));
            self.x -= 1;
            self.tx -= w;
        }
    }

    pub fn fn_start_next_row(&mut self, strip_extra_nl: bool) -> Redraw {
        if self.buf.len() == 0 || self.y >= self.buf.len() - 1 {
            return Redraw::None;
        }
        self.y += 1;
        self.x = 0;
        self.tx = 0;
        if self.ty < self.h - 2 {
            self.ty += 1;
            Redraw::None
        } else if strip_extra_nl {
            Redraw::ScrollDownOneRow
        } else {
            Redraw::ScrollDownTwoRows
        }
    }

    pub fn fn_end_previous_row(&mut self) -> Redraw {
        if self.y == 0 {
            return Redraw::None;
        }
        self.y -= 1;
        self.x = self.row_len(self.y);
        self.tx = self.visual_row_len(self.y);
        if self.ty > 0 {
            self.ty -= 1;
            Redraw::None
        } else {
            Redraw::Scroll { start_y: self.y }
        }
    }

    pub fn fn_first_nonblank(&mut self) {
        let idx = self.buf.row(self.y).map_or(0, Row::first_nonblank);
        self.x = idx;
        self.tx = self.visual_col_at(idx);
    }

    fn visual_col_at(&self, idx: usize) -> usize {
        self.buf.row(self.y).map_or(0, |r| r.visual_col(idx, self.config.tab_width))
    }

    pub fn fn_page_up(&mut self) {
        let delta = self.h.saturating_sub(3);
        self.y = self.y.saturating_sub(delta);
        self.x = self.x.min(self.row_len(self.y));
        self.fix_x();
        self.ty = self.h - 2;
    }

    pub fn fn_page_down(&mut self) {
        let delta = self.h.saturating_sub(3);
        let max_y = self.buf.len().saturating_sub(1);
        self.y = (self.y + delta).min(max_y);
        self.x = self.x.min(self.row_len(self.y));
        self.fix_x();
        self.ty = 0;
    }

    /// Recompute terminal size bounds after a resize (spec.md §4.8
    /// `resized`).
    pub fn apply_resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        if self.x > self.w.saturating_sub(2) {
            self.x = self.w.saturating_sub(2);
        }
        if self.ty < self.y && self.y <= self.h.saturating_sub(2) {
            self.ty = self.y;
        } else if self.y > self.h.saturating_sub(2) {
            self.ty = self.h.saturating_sub(2);
        }
        self.tx = self.visual_col();
    }

    /// The buffer line that should appear at the top of the screen after
    /// a resize (used to drive the full redraw).
    pub fn resize_redraw_start_y(&self) -> usize {
        if self.y > self.h.saturating_sub(2) {
            self.y - (self.h - 2)
        } else {
            0
        }
    }
}

/// What a motion requires the caller to redraw, since scrolling
/// optimizations (spec.md §4.4, §9) avoid a full redraw where possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    /// Nothing beyond moving the cursor.
    None,
    /// Scrolled past the top: full redraw of the text area starting at
    /// buffer line `start_y`.
    Scroll { start_y: usize },
    /// Scrolled past the bottom: emit one CR-LF (newline already
    /// "stripped", i.e. the terminal's natural scroll did the work) and
    /// redraw just the new bottom row.
    ScrollDownOneRow,
    /// Scrolled past the bottom without stripping: emit two CR-LFs and
    /// redraw just the new bottom row.
    ScrollDownTwoRows,
    /// Redraw rows `[start_ty, h - 2]` starting from buffer line `y`.
    Region { start_ty: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor_with_rows(rows: &[&[u8]], h: usize) -> Editor {
        let mut buf = Buffer::with_capacity(16);
        for (i, r) in rows.iter().enumerate() {
            buf.set_row(i, Some(Row::from_bytes(r.to_vec())), 16);
        }
        Editor::new(buf, None, 80, h, Config::default())
    }

    #[test]
    fn right_stops_before_last_char_when_requested() {
        let mut ed = editor_with_rows(&[b"abc"], 24);
        ed.fn_right(true);
        ed.fn_right(true);
        assert_eq!(ed.x, 2); // stuck before the last byte ('c')
        ed.fn_right(true);
        assert_eq!(ed.x, 2); // a further stop_before_last move stays put
        ed.fn_right(false);
        assert_eq!(ed.x, 3); // without stop_before_last, can reach row end
    }

    #[test]
    fn right_advances_tab_by_tab_width() {
        let mut ed = editor_with_rows(&[b"\tA"], 24);
        ed.fn_right(false);
        assert_eq!(ed.x, 1);
        assert_eq!(ed.tx, 8);
    }

    #[test]
    fn left_after_tab_goes_back_to_zero() {
        let mut ed = editor_with_rows(&[b"\tA"], 24);
        ed.fn_right(false);
        ed.fn_left();
        assert_eq!(ed.x, 0);
        assert_eq!(ed.tx, 0);
    }

    #[test]
    fn vertical_motion_into_shorter_row_clamps_and_updates_tx() {
        let mut ed = editor_with_rows(&[b"abcdef", b"ab"], 24);
        ed.x = 5;
        ed.tx = 5;
        ed.fn_down();
        assert_eq!(ed.x, 2);
        assert_eq!(ed.tx, 2);
    }

    #[test]
    fn line_end_stop_before_last_on_tab_row() {
        let mut ed = editor_with_rows(&[b"\tB"], 24);
        ed.fn_line_end(true);
        assert_eq!(ed.x, 1); // index of 'B'
        assert_eq!(ed.tx, 8);
        ed.fn_left();
        assert_eq!(ed.x, 0);
        assert_eq!(ed.tx, 0);
    }

    #[test]
    fn first_nonblank_all_blank_row_positions_at_last_byte() {
        let mut ed = editor_with_rows(&[b"   "], 24);
        ed.fn_first_nonblank();
        assert_eq!(ed.x, 2);
    }
}
