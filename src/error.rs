//! # Errors
//!
//! A single crate-wide fatal-error type (spec.md §7, category 1). Errors
//! that are user-visible but recoverable (category 2: modified buffer on
//! `:q`, file-exists on `:w`, write failure, missing file name) are not
//! represented here — they are plain `String` messages shown on the
//! status row by the command executor, and never stop the process.

use std::fmt;

/// Error type for conditions that should abort the process (after
/// restoring the terminal).
#[derive(Debug)]
pub enum Error {
    /// Wrapper around `std::io::Error`.
    Io(std::io::Error),
    /// Error setting or retrieving the cursor position while probing for
    /// the terminal size.
    CursorPosition,
    /// The terminal is shorter than the two rows the status/command line
    /// needs (spec.md §3: `h >= 2` is required).
    TerminalTooShort,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::CursorPosition => write!(f, "could not read cursor position"),
            Self::TerminalTooShort => write!(f, "terminal height too low"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
