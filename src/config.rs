//! # Configuration
//!
//! Tunable constants threaded through the editor engine. Every field here
//! corresponds to a `#define` in the original C implementation's
//! "configurable macros" section.

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Width, in terminal cells, of a tab character. Must be > 0.
    pub tab_width: usize,
    /// How many rows to initially allocate for a freshly created (empty)
    /// buffer.
    pub initial_buffer_rows: usize,
    /// How many rows to add to a buffer's slot count when it's too small.
    pub buf_size_increment: usize,
    /// Same as `initial_buffer_rows`, but used for buffers created from a
    /// file.
    pub file_buffer_rows: usize,
    /// How many rows to add when a buffer being loaded from a file is too
    /// small to fit more lines.
    pub file_buf_size_increment: usize,
    /// How many bytes to initially allocate for each row in a freshly
    /// created line.
    pub initial_row_size: usize,
    /// How many bytes to add to a row's capacity when it's too small.
    pub row_size_increment: usize,
    /// How many `IoSlice`s to batch before flushing a vectored write.
    pub iov_size: usize,
    /// How many bytes to initially allocate for the command-line row.
    pub initial_cmd_size: usize,
    /// How many bytes to add to the command-line row's capacity when it's
    /// too small.
    pub cmd_size_increment: usize,
    /// Terminal width used if the real size can't be determined.
    pub fallback_width: usize,
    /// Terminal height used if the real size can't be determined.
    pub fallback_height: usize,
    /// How long, in milliseconds, to wait for the cursor-position reply
    /// when probing terminal size via the fallback method.
    pub resize_fallback_ms: u64,
}

impl Default for Config {
    /// Defaults carried over unchanged from the original implementation.
    fn default() -> Self {
        Self {
            tab_width: 8,
            initial_buffer_rows: 32,
            buf_size_increment: 16,
            file_buffer_rows: 128,
            file_buf_size_increment: 256,
            initial_row_size: 128,
            row_size_increment: 64,
            iov_size: 64,
            initial_cmd_size: 16,
            cmd_size_increment: 16,
            fallback_width: 80,
            fallback_height: 24,
            resize_fallback_ms: 500,
        }
    }
}

/// Round `x` up to the nearest multiple of `multiple`. `multiple` must be
/// nonzero.
pub const fn round_up_to(x: usize, multiple: usize) -> usize {
    (x + multiple - 1) / multiple * multiple
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_up_exact_multiple() {
        assert_eq!(round_up_to(32, 16), 32);
    }

    #[test]
    fn round_up_rounds() {
        assert_eq!(round_up_to(33, 16), 48);
        assert_eq!(round_up_to(1, 16), 16);
        assert_eq!(round_up_to(0, 16), 0);
    }

    #[test]
    fn default_config_matches_original_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.tab_width, 8);
        assert_eq!(cfg.initial_buffer_rows, 32);
        assert_eq!(cfg.buf_size_increment, 16);
        assert_eq!(cfg.file_buffer_rows, 128);
        assert_eq!(cfg.file_buf_size_increment, 256);
        assert_eq!(cfg.initial_row_size, 128);
        assert_eq!(cfg.row_size_increment, 64);
        assert_eq!(cfg.fallback_width, 80);
        assert_eq!(cfg.fallback_height, 24);
    }
}
