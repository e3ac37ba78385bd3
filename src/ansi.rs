//! # ANSI escape sequences
//!
//! Color and cursor/clear escape constants, grounded on the original
//! implementation's `COLOR_*` macros and on the teacher's use of an
//! `ansi_escape` module (`CLEAR_LINE_RIGHT_OF_CURSOR`, `RESET_FMT`) from
//! `editor.rs`.

pub const RESET_FMT: &str = "\x1b[0m";
pub const COLOR_RED: &str = "\x1b[31m";
pub const COLOR_GREEN: &str = "\x1b[32m";
pub const COLOR_YELLOW: &str = "\x1b[33m";

pub const CLEAR_SCREEN: &str = "\x1b[2J";
pub const CLEAR_LINE_RIGHT_OF_CURSOR: &str = "\x1b[K";
pub const CURSOR_TO_HOME: &str = "\x1b[H";
pub const HIDE_CURSOR: &str = "\x1b[?25l";
pub const SHOW_CURSOR: &str = "\x1b[?25h";

/// Escape sequence that moves the cursor to `(9999, 9999)`, used by the
/// fallback terminal-size probe (request the cursor-position report after
/// trying to move past the bottom-right corner).
pub const CURSOR_TO_BOTTOM_RIGHT: &str = "\x1b[999C\x1b[999B";
/// Request a cursor-position report (`ESC [ 6 n`); the terminal replies
/// with `ESC [ row ; col R` on stdin.
pub const REQUEST_CURSOR_POSITION: &str = "\x1b[6n";

/// Build the escape sequence that moves the cursor to 1-based terminal
/// row/column `(y + 1, x + 1)` for 0-based `(x, y)`.
pub fn move_cursor(x: usize, y: usize) -> String {
    format!("\x1b[{};{}H", y + 1, x + 1)
}

/// A known color for `Renderer::status_message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Default,
    Red,
}

impl Color {
    pub fn escape(self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::Red => Some(COLOR_RED),
        }
    }
}
