//! # Command-line mode parser/executor
//!
//! Parses and runs the handful of `:` commands (spec.md §4.7), grounded on
//! the original implementation's `cmdarg`/`cmdchrcmp`/`cmdstrcmp`/
//! `exec_cmd`. Every failure here is user-visible, not fatal (spec.md §7,
//! category 2): it is returned as a `String` for the caller to show on
//! the status row, and never terminates the process.

use std::path::PathBuf;

use crate::codec;
use crate::state::Editor;

/// Run the command currently held in `editor.cmd`. On success the editor
/// may have `done` set (for `:q`/`:wq`) or its filename/modified flag
/// updated (for `:w`). On failure, returns the message to display.
pub fn execute(editor: &mut Editor) -> Result<(), String> {
    let text = String::from_utf8_lossy(editor.cmd.bytes()).into_owned();
    let (name, bang, arg) = split_command(&text);

    match name {
        "q" => quit(editor, bang),
        "w" => write(editor, bang, arg),
        "wq" => write(editor, bang, arg).and_then(|()| quit(editor, true)),
        // Unrecognized commands are silently ignored, matching the
        // original implementation's `exec_cmd`, which has no catch-all
        // "unknown command" branch.
        _ => Ok(()),
    }
}

/// Split `":q!"`-style text into `("q", true, "")`, or `"w file.txt"` into
/// `("w", false, "file.txt")` (original's `cmdchrcmp`/`cmdstrcmp` matched a
/// literal prefix then an optional `!`; here the name is the leading
/// non-whitespace run, with a trailing `!` stripped from it as the bang).
fn split_command(text: &str) -> (&str, bool, &str) {
    let text = text.trim();
    let (head, rest) = match text.split_once(char::is_whitespace) {
        Some((h, r)) => (h, r.trim_start()),
        None => (text, ""),
    };
    match head.strip_suffix('!') {
        Some(name) => (name, true, rest),
        None => (head, false, rest),
    }
}

fn quit(editor: &mut Editor, force: bool) -> Result<(), String> {
    if editor.modified && !force {
        return Err("buffer modified".to_owned());
    }
    editor.done = true;
    Ok(())
}

fn write(editor: &mut Editor, force: bool, arg: &str) -> Result<(), String> {
    let path = if arg.is_empty() {
        editor.filename.clone().ok_or_else(|| "no file name specified".to_owned())?
    } else {
        PathBuf::from(arg)
    };
    if !arg.is_empty() && editor.filename.is_none() {
        editor.filename = Some(path.clone());
    }

    let overwrite = force || editor.written_once;
    codec::write(&editor.buf, &path, overwrite, &editor.config).map_err(|err| {
        if err.kind() == std::io::ErrorKind::AlreadyExists {
            "file exists (add ! to override)".to_owned()
        } else {
            format!("writing to file failed: {err}")
        }
    })?;

    editor.modified = false;
    editor.written_once = true;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_command_separates_name_bang_and_arg() {
        assert_eq!(split_command("q"), ("q", false, ""));
        assert_eq!(split_command("q!"), ("q", true, ""));
        assert_eq!(split_command("w file.txt"), ("w", false, "file.txt"));
        assert_eq!(split_command("w!  file.txt"), ("w", true, "file.txt"));
        assert_eq!(split_command("  wq  "), ("wq", false, ""));
    }

    #[test]
    fn quit_without_force_rejects_modified_buffer() {
        let mut ed = test_editor();
        ed.modified = true;
        let err = quit(&mut ed, false).unwrap_err();
        assert_eq!(err, "buffer modified");
        assert!(!ed.done);
    }

    #[test]
    fn quit_with_force_ignores_modified_buffer() {
        let mut ed = test_editor();
        ed.modified = true;
        quit(&mut ed, true).unwrap();
        assert!(ed.done);
    }

    #[test]
    fn write_without_filename_or_argument_errors() {
        let mut ed = test_editor();
        let err = write(&mut ed, false, "").unwrap_err();
        assert_eq!(err, "no file name specified");
    }

    #[test]
    fn write_to_new_path_succeeds_and_records_filename() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut ed = test_editor();
        write(&mut ed, false, path.to_str().unwrap()).unwrap();
        assert_eq!(ed.filename.as_deref(), Some(path.as_path()));
        assert!(!ed.modified);
        assert!(path.exists());
    }

    #[test]
    fn write_existing_path_without_bang_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, b"existing").unwrap();
        let mut ed = test_editor();
        let err = write(&mut ed, false, path.to_str().unwrap()).unwrap_err();
        assert!(err.contains("file exists"));
    }

    fn test_editor() -> Editor {
        use crate::buffer::Buffer;
        use crate::config::Config;
        Editor::new(Buffer::with_capacity(8), None, 80, 24, Config::default())
    }
}
