//! # sys (UNIX)
//!
//! UNIX terminal backend: raw mode via `termios`, window-size via
//! `TIOCGWINSZ`, resize notification via a `SIGWINCH` handler that flips
//! an `AtomicBool`. Grounded on the teacher's `unix.rs` (`termios` type
//! alias, `cerr` helper) and on the original implementation's
//! `term_init`/`term_shutdown`/`term_size`/`winch`.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering::Relaxed};

use libc::{c_int, termios, winsize};
use libc::{STDIN_FILENO, STDOUT_FILENO, TCSAFLUSH, TIOCGWINSZ};

use crate::error::Error;
use crate::terminal::ReadOutcome;

static RESIZED: AtomicBool = AtomicBool::new(false);

extern "C" fn handle_sigwinch(_: c_int) {
    RESIZED.store(true, Relaxed);
}

fn cerr(err: c_int) -> Result<(), Error> {
    if err == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error().into())
    }
}

/// Owns the raw-mode lifetime: the original `termios` is restored when
/// this value is dropped, which runs on every exit path (including fatal
/// errors) as long as the `Terminal` that owns it is dropped before the
/// process exits (spec.md §5).
pub struct Backend {
    orig: termios,
}

impl Backend {
    pub fn init() -> Result<Self, Error> {
        unsafe {
            install_sigwinch_handler()?;

            let mut orig: termios = std::mem::zeroed();
            cerr(libc::tcgetattr(STDIN_FILENO, &mut orig))?;

            let mut raw = orig;
            libc::cfmakeraw(&mut raw);
            cerr(libc::tcsetattr(STDIN_FILENO, TCSAFLUSH, &raw))?;

            Ok(Self { orig })
        }
    }

    /// Query the window size via `TIOCGWINSZ`. Returns `None` on failure
    /// so the caller can fall back to the cursor-position probe.
    pub fn ioctl_size(&self) -> Option<(usize, usize)> {
        unsafe {
            let mut ws: winsize = std::mem::zeroed();
            if libc::ioctl(STDOUT_FILENO, TIOCGWINSZ, &mut ws) < 0 || ws.ws_col == 0 {
                None
            } else {
                Some((ws.ws_col as usize, ws.ws_row as usize))
            }
        }
    }

    /// Returns and clears the "a resize signal arrived" flag.
    pub fn take_resize_flag(&self) -> bool {
        RESIZED.swap(false, Relaxed)
    }

    pub fn write_raw(&mut self, data: &[u8]) -> io::Result<()> {
        io::stdout().write_all(data)
    }

    pub fn writer(&self) -> io::Stdout {
        io::stdout()
    }

    /// Block until exactly one byte is read, the read is interrupted by a
    /// signal, or EOF is reached.
    pub fn blocking_read(&mut self, buf: &mut [u8; 1]) -> Result<ReadOutcome, Error> {
        match unsafe { libc::read(STDIN_FILENO, buf.as_mut_ptr().cast(), 1) } {
            n if n < 0 => {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    // Woken by a signal (SIGWINCH) before any byte arrived;
                    // let the caller check the resize flag on its next loop
                    // iteration instead of treating this as EOF.
                    Ok(ReadOutcome::Interrupted)
                } else {
                    Err(err.into())
                }
            }
            0 => Ok(ReadOutcome::Eof),
            _ => Ok(ReadOutcome::Byte),
        }
    }

    /// Attempt to read one byte without blocking for long: used to decode
    /// the continuation bytes of an escape sequence. Returns `Some(n)`
    /// with the number of bytes actually read (0 or 1), or `None` if the
    /// poll itself failed.
    pub fn try_read(&mut self, buf: &mut [u8; 1]) -> Option<usize> {
        let mut pfd = libc::pollfd { fd: STDIN_FILENO, events: libc::POLLIN, revents: 0 };
        let ready = unsafe { libc::poll(&mut pfd, 1, 0) };
        if ready <= 0 {
            return Some(0);
        }
        let n = unsafe { libc::read(STDIN_FILENO, buf.as_mut_ptr().cast(), 1) };
        if n < 0 {
            None
        } else {
            Some(n as usize)
        }
    }
}

impl Drop for Backend {
    fn drop(&mut self) {
        unsafe {
            let _ = libc::tcsetattr(STDIN_FILENO, TCSAFLUSH, &self.orig);
        }
        let _ = io::stdout().write_all(crate::ansi::CLEAR_SCREEN.as_bytes());
        let _ = io::stdout().write_all(crate::ansi::CURSOR_TO_HOME.as_bytes());
        let _ = io::stdout().flush();
    }
}

unsafe fn install_sigwinch_handler() -> Result<(), Error> {
    let mut sa: libc::sigaction = std::mem::zeroed();
    sa.sa_sigaction = handle_sigwinch as usize;
    libc::sigemptyset(&mut sa.sa_mask);
    sa.sa_flags = 0;
    cerr(libc::sigaction(libc::SIGWINCH, &sa, std::ptr::null_mut()))
}
