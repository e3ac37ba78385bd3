//! # Mode interpreter
//!
//! Dispatches decoded key events to motions and edits for each of the
//! three modes (spec.md §4.6). Grounded on the original implementation's
//! `key_normal`/`key_insert`/`key_command_line`/`insert_newline`/
//! `remove_newline`.

use crate::command;
use crate::render::Renderer;
use crate::row::Row;
use crate::state::{Editor, Mode, Redraw};
use crate::terminal::Key;

/// What the caller (the event loop) must do to the screen after a key was
/// handled.
pub enum Effect {
    /// Nothing beyond moving the cursor (already reflected in `tx`/`ty`).
    None,
    /// Redraw the full text area, buffer line `start_y` at screen row 0.
    FullRedraw { start_y: usize },
    /// Redraw just the current row at its current screen position.
    CurrentRow,
    /// Scroll past the top: full redraw of rows `[0, h-2]` starting at
    /// buffer line `start_y`.
    ScrollUp { start_y: usize },
    /// Scroll past the bottom by one row (terminal's natural scroll did
    /// the rest): emit CR-LF once, then redraw the new bottom row.
    ScrollDownOnce,
    /// Same, but two CR-LFs (used when splitting a row without stripping
    /// the extra blank line the terminal scroll would otherwise leave).
    ScrollDownTwice,
    /// Redraw buffer lines starting at `start_y` onto screen rows
    /// `[start_ty, h-2]`.
    Region { start_y: usize, start_ty: usize },
    /// A `:` command failed; show `message` in red on the status row
    /// (spec.md §7, user-visible errors never terminate the process).
    CommandError(String),
    /// Left command-line mode without an error; clear the status row.
    ClearStatus,
    /// Entered command-line mode; draw the `:` prompt.
    EnterCommandLine,
}

impl From<Redraw> for Effect {
    fn from(r: Redraw) -> Self {
        match r {
            Redraw::None => Effect::None,
            Redraw::Scroll { start_y } => Effect::ScrollUp { start_y },
            Redraw::ScrollDownOneRow => Effect::ScrollDownOnce,
            Redraw::ScrollDownTwoRows => Effect::ScrollDownTwice,
            Redraw::Region { start_ty } => Effect::Region { start_y: 0, start_ty },
        }
    }
}

impl Editor {
    /// Handle one key event according to the current mode.
    pub fn handle_key(&mut self, key: Key) -> Effect {
        match self.mode {
            Mode::Normal => self.key_normal(key),
            Mode::Insert => self.key_insert(key),
            Mode::CommandLine => self.key_command_line(key),
        }
    }

    // -- Normal mode (spec.md §4.6) ---------------------------------------

    fn key_normal(&mut self, key: Key) -> Effect {
        match key {
            Key::ArrowUp => self.fn_up().into(),
            Key::ArrowDown => self.fn_down().into(),
            Key::ArrowRight => {
                self.fn_right(true);
                Effect::None
            }
            Key::ArrowLeft => {
                self.fn_left();
                Effect::None
            }
            Key::Home => {
                self.fn_line_start();
                Effect::None
            }
            Key::End => {
                self.fn_line_end(true);
                Effect::None
            }
            Key::Insert => {
                self.mode = Mode::Insert;
                Effect::None
            }
            Key::PageUp => {
                self.fn_page_up();
                Effect::FullRedraw { start_y: self.y.saturating_sub(self.ty) }
            }
            Key::PageDown => {
                self.fn_page_down();
                Effect::FullRedraw { start_y: self.y.saturating_sub(self.ty) }
            }
            Key::Delete => {
                if self.buf.row_len(self.y) > 0 {
                    self.buf.char_remove(self.y, self.x);
                    self.modified = true;
                    Effect::CurrentRow
                } else {
                    Effect::None
                }
            }
            Key::Backspace => {
                if self.x == 0 && self.y > 0 {
                    self.fn_end_previous_row().into()
                } else {
                    self.fn_left();
                    Effect::None
                }
            }
            Key::Enter => self.fn_start_next_row(false).into(),
            Key::Ctrl(b'L') => Effect::FullRedraw { start_y: self.resize_redraw_start_y() },
            Key::Char(b'h') => {
                self.fn_left();
                Effect::None
            }
            Key::Char(b'j') => self.fn_down().into(),
            Key::Char(b'k') => self.fn_up().into(),
            Key::Char(b'l') => {
                self.fn_right(true);
                Effect::None
            }
            Key::Char(b'0') => {
                self.fn_line_start();
                Effect::None
            }
            Key::Char(b'$') => {
                self.fn_line_end(true);
                Effect::None
            }
            Key::Char(b'^') => {
                self.fn_first_nonblank();
                Effect::None
            }
            Key::Char(b'x') => {
                if self.buf.row_len(self.y) > 0 {
                    self.buf.char_remove(self.y, self.x);
                    self.modified = true;
                    Effect::CurrentRow
                } else {
                    Effect::None
                }
            }
            Key::Char(b'i') => {
                self.mode = Mode::Insert;
                Effect::None
            }
            Key::Char(b'I') => {
                self.fn_line_start();
                self.mode = Mode::Insert;
                Effect::None
            }
            Key::Char(b'a') => {
                self.fn_right(false);
                self.mode = Mode::Insert;
                Effect::None
            }
            Key::Char(b'A') => {
                self.fn_line_end(false);
                self.mode = Mode::Insert;
                Effect::None
            }
            Key::Char(b'o') => {
                self.fn_line_end(false);
                let eff = self.split_at_cursor();
                self.mode = Mode::Insert;
                eff
            }
            Key::Char(b'O') => {
                self.fn_end_previous_row();
                self.fn_line_end(false);
                let eff = self.split_at_cursor();
                self.mode = Mode::Insert;
                eff
            }
            Key::Char(b':') => {
                self.mode = Mode::CommandLine;
                self.stored_tx = self.tx;
                self.x = 1;
                self.tx = 1;
                Effect::EnterCommandLine
            }
            _ => Effect::None,
        }
    }

    // -- Insert mode (spec.md §4.6) ---------------------------------------

    fn key_insert(&mut self, key: Key) -> Effect {
        match key {
            Key::Esc => {
                self.mode = Mode::Normal;
                Effect::None
            }
            Key::ArrowUp => self.fn_up().into(),
            Key::ArrowDown => self.fn_down().into(),
            Key::ArrowRight => {
                self.fn_right(true);
                Effect::None
            }
            Key::ArrowLeft => {
                self.fn_left();
                Effect::None
            }
            Key::Home => {
                self.fn_line_start();
                Effect::None
            }
            Key::End => {
                self.fn_line_end(true);
                Effect::None
            }
            Key::PageUp => {
                self.fn_page_up();
                Effect::FullRedraw { start_y: self.y.saturating_sub(self.ty) }
            }
            Key::PageDown => {
                self.fn_page_down();
                Effect::FullRedraw { start_y: self.y.saturating_sub(self.ty) }
            }
            Key::Delete => {
                if self.buf.row_len(self.y) > 0 {
                    self.buf.char_remove(self.y, self.x);
                    self.modified = true;
                    Effect::CurrentRow
                } else {
                    Effect::None
                }
            }
            Key::Enter => {
                self.modified = true;
                self.split_at_cursor()
            }
            Key::Backspace => self.insert_backspace(),
            Key::Tab => {
                if self.tx < self.w.saturating_sub(self.config.tab_width) {
                    self.buf.char_insert(
                        self.y,
                        0x09,
                        self.x,
                        self.config.buf_size_increment,
                        self.config.initial_row_size,
                        self.config.row_size_increment,
                    );
                    self.x += 1;
                    self.tx += self.config.tab_width;
                    self.modified = true;
                    Effect::CurrentRow
                } else {
                    Effect::None
                }
            }
            Key::Char(c) => {
                if self.tx < self.w - 1 {
                    self.buf.char_insert(
                        self.y,
                        c,
                        self.x,
                        self.config.buf_size_increment,
                        self.config.initial_row_size,
                        self.config.row_size_increment,
                    );
                    self.x += 1;
                    self.tx += 1;
                    self.modified = true;
                    Effect::CurrentRow
                } else {
                    Effect::None
                }
            }
            _ => Effect::None,
        }
    }

    /// Backspace in Insert mode: remove the previous character, or join
    /// with the previous row if at column 0 (spec.md §4.6).
    fn insert_backspace(&mut self) -> Effect {
        if self.x > 0 && self.buf.row_len(self.y) > 0 {
            self.modified = true;
            let prev = self.x - 1;
            self.buf.char_remove(self.y, prev);
            let w = self.buf.row(self.y).map_or(1, |r| r.char_visual_width(prev, self.config.tab_width));
            self.x = prev;
            self.tx = self.tx.saturating_sub(w);
            Effect::CurrentRow
        } else if self.x == 0 && self.y > 0 {
            self.modified = true;
            self.join_with_previous()
        } else {
            Effect::None
        }
    }

    /// Split the current row at the cursor (spec.md §4.6 "split-at-cursor"),
    /// then position the cursor at the start of the newly created row via
    /// `start_next_row(strip_extra_nl = true)`.
    fn split_at_cursor(&mut self) -> Effect {
        let buf_grow = self.config.buf_size_increment;
        let row_grow = self.config.row_size_increment;

        let effect = if self.buf.row(self.y).is_some_and(|r| !r.is_empty()) && self.x < self.buf.row_len(self.y)
        {
            // Case 1: split the current row's tail into a new row.
            let tail = {
                let row = self.buf.row_mut(self.y).expect("checked above");
                row.split_off(self.x, row_grow)
            };
            self.buf.shift_down(self.y + 1, buf_grow);
            self.buf.set_row(self.y + 1, Some(tail), buf_grow);
            Effect::Region { start_y: self.y, start_ty: self.ty }
        } else if self.y < self.buf.len() - 1 {
            // Case 2: cursor past row end (or row empty), but there's a
            // following row: make room for a new empty line.
            self.buf.shift_down(self.y + 1, buf_grow);
            self.buf.set_row(self.y + 1, None, buf_grow);
            Effect::Region { start_y: self.y + 1, start_ty: self.ty + 1 }
        } else {
            // Case 3: no text after this row.
            self.buf.set_row(self.y + 1, None, buf_grow);
            Effect::Region { start_y: self.y + 1, start_ty: self.ty + 1 }
        };

        // `start_next_row`'s own redraw request is subsumed by the region
        // redraw above; only its cursor-position bookkeeping matters here.
        self.fn_start_next_row(true);
        effect
    }

    /// Join the current (empty-at-column-0) row with the previous one
    /// (spec.md §4.6 "join-with-previous").
    fn join_with_previous(&mut self) -> Effect {
        let row_grow = self.config.row_size_increment;
        let cur_empty = self.buf.row(self.y).is_none_or_empty();
        let prev_empty = self.buf.row(self.y - 1).is_none_or_empty();

        if !cur_empty && !prev_empty {
            let cur = self.buf.row(self.y).cloned().expect("checked non-empty");
            let prev_len = self.buf.row(self.y - 1).map_or(0, Row::len);
            self.buf.row_mut(self.y - 1).expect("checked non-empty").append(&cur, row_grow);
            self.x = prev_len;
            self.buf.shift_up(self.y + 1);
        } else if !prev_empty {
            self.x = self.buf.row_len(self.y - 1);
            self.buf.shift_up(self.y + 1);
        } else {
            self.x = 0;
            self.buf.shift_up(self.y);
        }

        self.y -= 1;
        if self.ty > 0 {
            self.ty -= 1;
            Effect::Region { start_y: self.y, start_ty: self.ty }
        } else {
            Effect::ScrollUp { start_y: self.y }
        }
    }

    // -- Command-line mode (spec.md §4.6) ---------------------------------

    fn key_command_line(&mut self, key: Key) -> Effect {
        match key {
            Key::Esc => {
                self.mode = Mode::Normal;
                self.cmd = Row::with_capacity(self.config.initial_cmd_size);
                self.x = self.stored_tx;
                self.tx = self.stored_tx;
                Effect::ClearStatus
            }
            Key::ArrowRight => {
                if self.tx < self.w - 1 && self.tx - 1 < self.cmd.len() {
                    self.tx += 1;
                    self.x = self.tx;
                }
                Effect::None
            }
            Key::ArrowLeft => {
                if self.tx > 1 {
                    self.tx -= 1;
                    self.x = self.tx;
                }
                Effect::None
            }
            Key::Home => {
                self.tx = 1;
                self.x = 1;
                Effect::None
            }
            Key::End => {
                self.tx = self.cmd.len() + 1;
                self.x = self.tx;
                Effect::None
            }
            Key::Enter => {
                let outcome = command::execute(self);
                self.mode = Mode::Normal;
                self.cmd = Row::with_capacity(self.config.initial_cmd_size);
                self.x = self.stored_tx;
                self.tx = self.stored_tx;
                match outcome {
                    Ok(()) => Effect::ClearStatus,
                    Err(msg) => Effect::CommandError(msg),
                }
            }
            Key::Backspace => {
                if self.tx > 1 && self.cmd.len() > 0 {
                    self.cmd.remove_char(self.tx - 2);
                    self.tx -= 1;
                    self.x = self.tx;
                }
                Effect::CurrentRow
            }
            Key::Delete => {
                if self.cmd.len() > 0 {
                    self.cmd.remove_char(self.tx - 1);
                }
                Effect::CurrentRow
            }
            Key::Char(c) => {
                if self.tx > 0 && self.tx < self.w - 1 {
                    self.cmd.insert_char(c, self.tx - 1, self.config.cmd_size_increment);
                    self.tx += 1;
                    self.x = self.tx;
                }
                Effect::CurrentRow
            }
            _ => Effect::None,
        }
    }
}

trait OptionRowExt {
    fn is_none_or_empty(&self) -> bool;
}

impl OptionRowExt for Option<&Row> {
    fn is_none_or_empty(&self) -> bool {
        self.map_or(true, Row::is_empty)
    }
}

/// Draw the effect of a handled key event to the terminal.
pub fn apply_effect(
    editor: &Editor,
    renderer: &mut Renderer<'_>,
    effect: Effect,
) -> std::io::Result<()> {
    let h = editor.h;
    let config = &editor.config;
    match effect {
        Effect::None => Ok(()),
        Effect::CurrentRow => renderer.redraw_row(editor.buf(), editor.y, editor.ty, config),
        Effect::FullRedraw { start_y } => renderer.redraw(editor.buf(), start_y, 0, h - 2, config),
        Effect::ScrollUp { start_y } => renderer.redraw(editor.buf(), start_y, 0, h - 2, config),
        Effect::ScrollDownOnce => {
            renderer.scroll_down(1)?;
            renderer.redraw_row(editor.buf(), editor.y, h - 2, config)
        }
        Effect::ScrollDownTwice => {
            renderer.scroll_down(2)?;
            renderer.redraw_row(editor.buf(), editor.y, h - 2, config)
        }
        Effect::Region { start_y, start_ty } => renderer.redraw(editor.buf(), start_y, start_ty, h - 2, config),
        Effect::ClearStatus => renderer.status_message(h, None, ""),
        Effect::EnterCommandLine => renderer.status_message(h, None, ":"),
        Effect::CommandError(msg) => {
            renderer.status_message(h, Some(crate::ansi::Color::Red), &msg)
        }
    }
}
