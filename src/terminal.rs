//! # Terminal driver contract
//!
//! Specified at the interface only (spec.md §1, §6): raw-mode setup,
//! keystroke decoding, window-size detection and resize notification are
//! external collaborators to the editor engine. This module defines the
//! platform-independent event/key vocabulary and the `Terminal` facade
//! that `cfg`-selects the platform backend, mirroring the teacher's
//! `pub use crate::unix as sys;` re-export pattern.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crate::ansi;
use crate::config::Config;
use crate::error::Error;

#[cfg(unix)]
use crate::unix as sys;
#[cfg(windows)]
use crate::windows as sys;

/// A decoded terminal event (spec.md §4.8, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermEvent {
    Resize,
    Key(Key),
}

/// The outcome of a single-byte blocking read, distinguishing a signal
/// interruption (the caller should re-check for a resize and retry) from a
/// genuine end-of-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    Byte,
    Eof,
    Interrupted,
}

/// A decoded key event (spec.md §4.6, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Esc,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Insert,
    Delete,
    PageUp,
    PageDown,
    Backspace,
    Enter,
    Tab,
    /// The uppercased letter for `0x01..=0x1F`.
    Ctrl(u8),
    /// `0x20..=0x7E`.
    Char(u8),
}

const fn ctrl_key(key: u8) -> u8 {
    key & 0x1f
}

/// Owns the raw terminal connection: raw-mode lifetime, size queries and
/// event decoding, plus the low-level print/cursor primitives spec.md §6
/// lists. Restoration of prior terminal settings happens in `Drop`, so it
/// runs on every exit path including fatal errors (spec.md §5).
pub struct Terminal {
    inner: sys::Backend,
}

impl Terminal {
    /// Put the terminal in raw, single-byte-read mode and block the
    /// window-resize signal for the duration of `wait_event`'s read.
    pub fn init() -> Result<Self, Error> {
        let inner = sys::Backend::init()?;
        Ok(Self { inner })
    }

    /// Probe the terminal size via an OS-specific ioctl; falls back to
    /// the cursor-position probe (`CURSOR_TO_BOTTOM_RIGHT` +
    /// `REQUEST_CURSOR_POSITION`, parsed within a bounded wait) if that
    /// fails.
    pub fn size(&mut self, config: &Config) -> Result<(usize, usize), Error> {
        match self.inner.ioctl_size() {
            Some((w, h)) => Ok((w, h)),
            None => self.size_via_cursor_report(config),
        }
    }

    fn size_via_cursor_report(&mut self, config: &Config) -> Result<(usize, usize), Error> {
        self.inner.write_raw(ansi::CURSOR_TO_BOTTOM_RIGHT.as_bytes())?;
        self.inner.write_raw(ansi::REQUEST_CURSOR_POSITION.as_bytes())?;

        let deadline = Instant::now() + Duration::from_millis(config.resize_fallback_ms);
        let mut response = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            if Instant::now() >= deadline {
                return Ok((config.fallback_width, config.fallback_height));
            }
            match self.inner.try_read(&mut byte) {
                Some(1) => {
                    response.push(byte[0]);
                    if byte[0] == b'R' {
                        break;
                    }
                }
                _ => continue,
            }
        }
        parse_cursor_report(&response).ok_or(Error::CursorPosition)
    }

    /// Block until either a resize signal arrives or a byte is available,
    /// decoding keys per the escape-sequence grammar in spec.md §6.
    pub fn wait_event(&mut self) -> Result<TermEvent, Error> {
        loop {
            if self.inner.take_resize_flag() {
                return Ok(TermEvent::Resize);
            }
            let mut byte = [0u8; 1];
            match self.inner.blocking_read(&mut byte)? {
                // A signal (SIGWINCH) interrupted the read before a byte
                // arrived; loop back to the resize check above instead of
                // treating this as a key event.
                ReadOutcome::Interrupted => continue,
                ReadOutcome::Eof => return Ok(TermEvent::Key(Key::Esc)),
                ReadOutcome::Byte => {}
            }
            if let Some(key) = self.decode(byte[0])? {
                return Ok(TermEvent::Key(key));
            }
        }
    }

    fn decode(&mut self, b: u8) -> Result<Option<Key>, Error> {
        match b {
            0x1b => Ok(Some(self.decode_escape()?)),
            0x7f => Ok(Some(Key::Backspace)),
            0x0d => Ok(Some(Key::Enter)),
            0x09 => Ok(Some(Key::Tab)),
            0..=0x1f => Ok(Some(Key::Ctrl(b + 0x40))),
            0x20..=0x7e => Ok(Some(Key::Char(b))),
            _ => Ok(None),
        }
    }

    fn decode_escape(&mut self) -> Result<Key, Error> {
        let mut b1 = [0u8; 1];
        if self.inner.try_read(&mut b1) != Some(1) {
            return Ok(Key::Esc);
        }
        if b1[0] != b'[' {
            return Ok(Key::Esc);
        }
        let mut b2 = [0u8; 1];
        if self.inner.try_read(&mut b2) != Some(1) {
            return Ok(Key::Esc);
        }
        match b2[0] {
            b'A' => Ok(Key::ArrowUp),
            b'B' => Ok(Key::ArrowDown),
            b'C' => Ok(Key::ArrowRight),
            b'D' => Ok(Key::ArrowLeft),
            b'H' => Ok(Key::Home),
            b'F' => Ok(Key::End),
            b'0'..=b'9' => {
                let mut b3 = [0u8; 1];
                if self.inner.try_read(&mut b3) != Some(1) || b3[0] != b'~' {
                    return Ok(Key::Esc);
                }
                match b2[0] {
                    b'2' => Ok(Key::Insert),
                    b'3' => Ok(Key::Delete),
                    b'5' => Ok(Key::PageUp),
                    b'6' => Ok(Key::PageDown),
                    _ => Ok(Key::Esc),
                }
            }
            _ => Ok(Key::Esc),
        }
    }

    /// Clear the screen row at `y`, move to `(x, y)` and emit `text`,
    /// optionally wrapped in a color escape and reset.
    pub fn print(&mut self, x: usize, y: usize, color: Option<ansi::Color>, text: &str) -> io::Result<()> {
        self.clear_row(y)?;
        self.set_cursor(x, y)?;
        let mut out = self.inner.writer();
        if let Some(escape) = color.and_then(ansi::Color::escape) {
            write!(out, "{escape}{text}{}", ansi::RESET_FMT)?;
        } else {
            write!(out, "{text}")?;
        }
        out.flush()
    }

    pub fn set_cursor(&mut self, x: usize, y: usize) -> io::Result<()> {
        write!(self.inner.writer(), "{}", ansi::move_cursor(x, y))
    }

    pub fn clear_row(&mut self, y: usize) -> io::Result<()> {
        write!(self.inner.writer(), "{}{}", ansi::move_cursor(0, y), ansi::CLEAR_LINE_RIGHT_OF_CURSOR)
    }

    pub fn clear_screen(&mut self) -> io::Result<()> {
        write!(self.inner.writer(), "{}{}", ansi::CLEAR_SCREEN, ansi::CURSOR_TO_HOME)
    }

    /// Write raw bytes straight to the terminal, bypassing cursor
    /// positioning. Used to emit the CR-LF(s) that drive the terminal's
    /// own scroll before the new bottom row is redrawn (spec.md §4.4,
    /// §9), mirroring the original's direct `write(STDOUT_FILENO, ...)`.
    pub fn write_raw(&mut self, data: &[u8]) -> io::Result<()> {
        self.inner.write_raw(data)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.writer().flush()
    }
}

/// Parse a cursor-position report of the form `ESC [ row ; col R`.
fn parse_cursor_report(response: &[u8]) -> Option<(usize, usize)> {
    let s = std::str::from_utf8(response).ok()?;
    let s = s.strip_prefix("\x1b[")?;
    let s = s.strip_suffix('R')?;
    let (row, col) = s.split_once(';')?;
    let row: usize = row.parse().ok()?;
    let col: usize = col.parse().ok()?;
    Some((col, row))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cursor_report() {
        assert_eq!(parse_cursor_report(b"\x1b[24;80R"), Some((80, 24)));
    }

    #[test]
    fn rejects_malformed_cursor_report() {
        assert_eq!(parse_cursor_report(b"garbage"), None);
    }

    #[test]
    fn ctrl_key_masks_high_bits() {
        assert_eq!(ctrl_key(b'Q'), 0x11);
        assert_eq!(ctrl_key(b'L'), 0x0c);
    }
}
