//! # File codec
//!
//! Reads a file into a `Buffer` and writes a `Buffer` back out using
//! batched vectored writes. Grounded on the original implementation's
//! `buf_from_file` (line-read loop) and `buf_write`/`iov_write` (batched
//! `writev`), adapted to `std`'s portable `BufRead`/`write_vectored`
//! rather than raw syscalls, matching the teacher's `editor.rs::load`
//! idiom of reading with `BufReader` and stripping the trailing newline.

use std::fs::OpenOptions;
use std::io::{self, BufRead, BufReader, IoSlice, Write};
use std::path::Path;

use crate::buffer::Buffer;
use crate::config::Config;
use crate::row::Row;

/// Load `path` into a freshly created buffer. Each line's trailing `\n`
/// is stripped before becoming the owning storage of a `Row`.
///
/// Read errors (other than the file simply not existing, which is the
/// caller's responsibility to handle by falling back to an empty buffer)
/// surface as `io::Error` — a fatal condition at the call site (spec.md
/// §7, category 1).
pub fn load(path: &Path, config: &Config) -> io::Result<Buffer> {
    let file = std::fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut buf = Buffer::with_capacity(config.file_buffer_rows);
    let mut line_no = 0usize;
    loop {
        let mut raw = Vec::new();
        let n = reader.read_until(b'\n', &mut raw)?;
        if n == 0 {
            break;
        }
        if raw.last() == Some(&b'\n') {
            raw.pop();
        }
        buf.set_row(line_no, Some(Row::from_bytes(raw)), config.file_buf_size_increment);
        line_no += 1;
    }
    if line_no == 0 {
        // An empty file still needs one (empty) line for the cursor to
        // sit on; `Buffer::with_capacity` already provides that via its
        // `len == 1` invariant with slot 0 left `None`.
    }
    Ok(buf)
}

/// Write `buf` to `path`. `overwrite == true` truncates an existing file;
/// `overwrite == false` requires the file not to already exist (exclusive
/// create), returning `ErrorKind::AlreadyExists` if it does.
///
/// Emits content through batched vectored writes: bytes accumulate into a
/// fixed-size array of `IoSlice`s, flushed via one `write_vectored` call
/// whenever the array fills (`config.iov_size` entries), with a final
/// partial batch flushed before the file is closed.
pub fn write(buf: &Buffer, path: &Path, overwrite: bool, config: &Config) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true);
    if overwrite {
        options.truncate(true);
    } else {
        options.create_new(true);
    }
    let mut file = options.open(path)?;

    const NEWLINE: &[u8] = b"\n";
    let mut slices: Vec<IoSlice> = Vec::with_capacity(config.iov_size);
    for line in 0..buf.len() {
        if let Some(row) = buf.row(line) {
            slices.push(IoSlice::new(row.bytes()));
            if slices.len() >= config.iov_size {
                write_all_vectored(&mut file, &slices)?;
                slices.clear();
            }
        }
        slices.push(IoSlice::new(NEWLINE));
        if slices.len() >= config.iov_size {
            write_all_vectored(&mut file, &slices)?;
            slices.clear();
        }
    }
    if !slices.is_empty() {
        write_all_vectored(&mut file, &slices)?;
    }
    file.sync_all()
}

/// `write_vectored` may perform a short write; keep calling it (dropping
/// already-written slices) until everything queued has been written.
fn write_all_vectored(file: &mut std::fs::File, slices: &[IoSlice]) -> io::Result<()> {
    let mut total: usize = slices.iter().map(|s| s.len()).sum();
    let mut owned: Vec<Vec<u8>> = slices.iter().map(|s| s.to_vec()).collect();
    while total > 0 {
        let refs: Vec<IoSlice> = owned.iter().map(|b| IoSlice::new(b)).collect();
        let written = file.write_vectored(&refs)?;
        if written == 0 {
            return Err(io::Error::new(io::ErrorKind::WriteZero, "failed to write whole buffer"));
        }
        total -= written;
        let mut remaining = written;
        while remaining > 0 {
            if remaining >= owned[0].len() {
                remaining -= owned[0].len();
                owned.remove(0);
            } else {
                owned[0].drain(..remaining);
                remaining = 0;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn round_trip_preserves_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let config = Config::default();

        let mut buf = Buffer::with_capacity(8);
        buf.set_row(0, Some(Row::from_bytes(b"hello".to_vec())), 16);
        buf.set_row(1, Some(Row::from_bytes(b"world".to_vec())), 16);

        write(&buf, &path, true, &config).unwrap();

        let mut contents = String::new();
        std::fs::File::open(&path).unwrap().read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "hello\nworld\n");

        let loaded = load(&path, &config).unwrap();
        assert_eq!(loaded.len(), buf.len());
        assert_eq!(loaded.row(0).unwrap().bytes(), buf.row(0).unwrap().bytes());
        assert_eq!(loaded.row(1).unwrap().bytes(), buf.row(1).unwrap().bytes());
    }

    #[test]
    fn write_without_overwrite_fails_if_file_exists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let config = Config::default();
        let buf = Buffer::with_capacity(4);

        write(&buf, &path, true, &config).unwrap();
        let err = write(&buf, &path, false, &config).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    }

    #[test]
    fn empty_lines_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let config = Config::default();

        let mut buf = Buffer::with_capacity(8);
        buf.set_row(0, Some(Row::from_bytes(b"a".to_vec())), 16);
        buf.set_row(1, None, 16);
        buf.set_row(2, Some(Row::from_bytes(b"b".to_vec())), 16);

        write(&buf, &path, true, &config).unwrap();

        let mut contents = String::new();
        std::fs::File::open(&path).unwrap().read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "a\n\nb\n");
    }
}
