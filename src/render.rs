//! # Renderer
//!
//! Draws rows and status messages to the terminal. Grounded on the
//! original implementation's `redraw`/`redraw_row`/`term_print`/
//! `term_printf`.

use std::io;

use crate::ansi::Color;
use crate::buffer::Buffer;
use crate::config::Config;
use crate::terminal::Terminal;

pub struct Renderer<'a> {
    term: &'a mut Terminal,
}

impl<'a> Renderer<'a> {
    pub fn new(term: &'a mut Terminal) -> Self {
        Self { term }
    }

    /// Draw the row at buffer line `y` to screen row `ty`, expanding each
    /// tab to `config.tab_width` spaces, stopping once the emitted visual
    /// column reaches the row's total visual length.
    fn draw_row(&mut self, ty: usize, text: &str) -> io::Result<()> {
        self.term.print(0, ty, None, text)
    }

    /// Draw either the row at buffer line `y`, or the empty-row marker
    /// `"~"` if `y >= buf.len()`.
    pub fn redraw_row(&mut self, buf: &Buffer, y: usize, ty: usize, config: &Config) -> io::Result<()> {
        if y < buf.len() {
            match buf.row(y) {
                Some(row) => {
                    let rendered = expand_tabs(row.bytes(), config.tab_width);
                    self.draw_row(ty, &rendered)
                }
                None => self.term.clear_row(ty),
            }
        } else {
            self.draw_row(ty, "~")
        }
    }

    /// Redraw buffer lines `[start_y, ..)` onto screen rows
    /// `[start_ty, end_ty]` (both inclusive), advancing `y` in step.
    pub fn redraw(
        &mut self,
        buf: &Buffer,
        mut start_y: usize,
        start_ty: usize,
        end_ty: usize,
        config: &Config,
    ) -> io::Result<()> {
        for ty in start_ty..=end_ty {
            self.redraw_row(buf, start_y, ty, config)?;
            start_y += 1;
        }
        Ok(())
    }

    /// Emit `crlfs` CR-LF pairs so the terminal scrolls its own view down
    /// by that many rows before the new bottom row is redrawn, instead of
    /// repainting the whole text area (spec.md §4.4, §9; grounded on the
    /// original's `write(STDOUT_FILENO, "\r\n" or "\r\n\r\n", ...)` calls
    /// in `cursor_down`/`cursor_startnextrow`).
    pub fn scroll_down(&mut self, crlfs: usize) -> io::Result<()> {
        self.term.write_raw("\r\n".repeat(crlfs).as_bytes())
    }

    /// Print a status message at screen row `h - 1`, with an optional
    /// color reset back to default afterwards.
    pub fn status_message(&mut self, h: usize, color: Option<Color>, text: &str) -> io::Result<()> {
        self.term.print(0, h - 1, color, text)
    }
}

/// Render `bytes` to a display string, expanding each tab to `tab_width`
/// spaces (spec.md §4.5).
fn expand_tabs(bytes: &[u8], tab_width: usize) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if b == 0x09 {
            for _ in 0..tab_width {
                out.push(' ');
            }
        } else {
            out.push(b as char);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_tabs_replaces_each_tab_with_tab_width_spaces() {
        assert_eq!(expand_tabs(b"\tA", 8), "        A");
    }

    #[test]
    fn expand_tabs_noop_without_tabs() {
        assert_eq!(expand_tabs(b"hello", 8), "hello");
    }
}
