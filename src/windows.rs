//! # sys (Windows)
//!
//! Windows console backend. Unlike Unix ptys, the Windows console has no
//! `SIGWINCH` equivalent reachable from a blocking byte-stream read, so
//! resize notification is polled: `take_resize_flag` re-queries
//! `GetConsoleScreenBufferInfo` and compares against the last known size.
//! Both the input and output handles are put into "virtual terminal"
//! mode (`ENABLE_VIRTUAL_TERMINAL_INPUT` / `_PROCESSING`), which makes the
//! console emit/accept the same ANSI escape sequences as a Unix tty, so
//! `terminal.rs`'s decoder and the `ansi` escape constants are shared
//! verbatim across platforms rather than duplicated per backend.

use std::cell::Cell;
use std::io::{self, Write};
use std::ptr;

use winapi::shared::minwindef::DWORD;
use winapi::um::consoleapi::{GetConsoleMode, SetConsoleMode};
use winapi::um::fileapi::ReadFile;
use winapi::um::handleapi::INVALID_HANDLE_VALUE;
use winapi::um::processenv::GetStdHandle;
use winapi::um::winbase::{STD_INPUT_HANDLE, STD_OUTPUT_HANDLE};
use winapi::um::wincon::{
    GetConsoleScreenBufferInfo, ENABLE_VIRTUAL_TERMINAL_INPUT, ENABLE_VIRTUAL_TERMINAL_PROCESSING,
    CONSOLE_SCREEN_BUFFER_INFO,
};
use winapi::um::winnt::HANDLE;

use crate::error::Error;
use crate::terminal::ReadOutcome;

pub struct Backend {
    stdin: HANDLE,
    orig_input_mode: DWORD,
    orig_output_mode: DWORD,
    last_size: Cell<(usize, usize)>,
}

impl Backend {
    pub fn init() -> Result<Self, Error> {
        unsafe {
            let stdin = GetStdHandle(STD_INPUT_HANDLE);
            let stdout = GetStdHandle(STD_OUTPUT_HANDLE);
            if stdin == INVALID_HANDLE_VALUE || stdout == INVALID_HANDLE_VALUE {
                return Err(io::Error::last_os_error().into());
            }

            let mut orig_input_mode: DWORD = 0;
            if GetConsoleMode(stdin, &mut orig_input_mode) == 0 {
                return Err(io::Error::last_os_error().into());
            }
            let mut orig_output_mode: DWORD = 0;
            if GetConsoleMode(stdout, &mut orig_output_mode) == 0 {
                return Err(io::Error::last_os_error().into());
            }

            if SetConsoleMode(stdin, ENABLE_VIRTUAL_TERMINAL_INPUT) == 0 {
                return Err(io::Error::last_os_error().into());
            }
            if SetConsoleMode(stdout, orig_output_mode | ENABLE_VIRTUAL_TERMINAL_PROCESSING) == 0 {
                return Err(io::Error::last_os_error().into());
            }

            let mut backend = Self { stdin, orig_input_mode, orig_output_mode, last_size: Cell::new((0, 0)) };
            if let Some(size) = backend.ioctl_size() {
                backend.last_size.set(size);
            }
            Ok(backend)
        }
    }

    pub fn ioctl_size(&self) -> Option<(usize, usize)> {
        unsafe {
            let stdout = GetStdHandle(STD_OUTPUT_HANDLE);
            let mut info: CONSOLE_SCREEN_BUFFER_INFO = std::mem::zeroed();
            if GetConsoleScreenBufferInfo(stdout, &mut info) == 0 {
                return None;
            }
            let w = (info.srWindow.Right - info.srWindow.Left + 1).max(0) as usize;
            let h = (info.srWindow.Bottom - info.srWindow.Top + 1).max(0) as usize;
            if w == 0 || h == 0 {
                None
            } else {
                Some((w, h))
            }
        }
    }

    /// Polls the current console size against the last observed one.
    pub fn take_resize_flag(&self) -> bool {
        match self.ioctl_size() {
            Some(size) if size != self.last_size.get() => {
                self.last_size.set(size);
                true
            }
            _ => false,
        }
    }

    pub fn write_raw(&mut self, data: &[u8]) -> io::Result<()> {
        io::stdout().write_all(data)
    }

    pub fn writer(&self) -> io::Stdout {
        io::stdout()
    }

    /// The Windows console has no `SIGWINCH` analog reachable from a
    /// blocking `ReadFile`, so this never reports `Interrupted`.
    pub fn blocking_read(&mut self, buf: &mut [u8; 1]) -> Result<ReadOutcome, Error> {
        let mut read: DWORD = 0;
        let ok = unsafe { ReadFile(self.stdin, buf.as_mut_ptr().cast(), 1, &mut read, ptr::null_mut()) };
        if ok == 0 {
            return Err(io::Error::last_os_error().into());
        }
        Ok(if read == 0 { ReadOutcome::Eof } else { ReadOutcome::Byte })
    }

    /// Windows has no portable non-blocking single-byte console read, so
    /// continuation bytes of an already-received escape sequence are read
    /// with the same blocking call; in virtual-terminal-input mode the
    /// console buffers the whole escape sequence atomically, so by the
    /// time the leading `ESC` has been read the rest is already available
    /// and this does not actually block waiting on the user.
    pub fn try_read(&mut self, buf: &mut [u8; 1]) -> Option<usize> {
        match self.blocking_read(buf).ok()? {
            ReadOutcome::Byte => Some(1),
            ReadOutcome::Eof | ReadOutcome::Interrupted => Some(0),
        }
    }
}

impl Drop for Backend {
    fn drop(&mut self) {
        unsafe {
            let stdout = GetStdHandle(STD_OUTPUT_HANDLE);
            SetConsoleMode(self.stdin, self.orig_input_mode);
            SetConsoleMode(stdout, self.orig_output_mode);
        }
        let _ = io::stdout().write_all(crate::ansi::CLEAR_SCREEN.as_bytes());
        let _ = io::stdout().write_all(crate::ansi::CURSOR_TO_HOME.as_bytes());
        let _ = io::stdout().flush();
    }
}
