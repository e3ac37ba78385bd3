//! End-to-end scenarios (spec.md §8): drive the editor through key events
//! the way a terminal driver would, then check the resulting buffer and
//! on-disk file. Grounded on the teacher's use of `tempfile` for
//! file-based integration tests.

use std::fs;

use svi::buffer::Buffer;
use svi::codec;
use svi::config::Config;
use svi::state::Editor;
use svi::terminal::Key;

fn type_str(editor: &mut Editor, s: &str) {
    for &b in s.as_bytes() {
        editor.handle_key(Key::Char(b));
    }
}

fn run_command(editor: &mut Editor, cmd: &str) {
    editor.handle_key(Key::Char(b':'));
    type_str(editor, cmd);
    editor.handle_key(Key::Enter);
}

/// S1: open a file, insert text, save it back, and confirm the on-disk
/// contents reflect the edit.
#[test]
fn open_edit_write_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("s1.txt");
    fs::write(&path, "hello\nworld\n").unwrap();

    let config = Config::default();
    let buf = codec::load(&path, &config).unwrap();
    let mut editor = Editor::new(buf, Some(path.clone()), 80, 24, config);

    editor.handle_key(Key::Char(b'i'));
    type_str(&mut editor, "X");
    editor.handle_key(Key::Esc);

    run_command(&mut editor, "w!");

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "Xhello\nworld\n");
}

/// S6: writing to a brand new path with `:w <name>` creates the file and
/// subsequent `:w` (no argument) reuses that name.
#[test]
fn write_new_file_then_rewrite_without_argument() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("s6.txt");

    let config = Config::default();
    let mut editor = Editor::new(Buffer::with_capacity(8), None, 80, 24, config);

    editor.handle_key(Key::Char(b'i'));
    type_str(&mut editor, "first line");
    editor.handle_key(Key::Esc);

    run_command(&mut editor, &format!("w {}", path.display()));
    assert_eq!(fs::read_to_string(&path).unwrap(), "first line\n");

    editor.handle_key(Key::Char(b'A'));
    type_str(&mut editor, "!");
    editor.handle_key(Key::Esc);

    run_command(&mut editor, "w");
    assert_eq!(fs::read_to_string(&path).unwrap(), "first line!\n");
}

/// Quitting with unsaved changes is a user-visible error, not fatal: the
/// editor stays open and `done` stays false until `:q!` forces it.
#[test]
fn quit_with_modified_buffer_requires_bang() {
    let config = Config::default();
    let mut editor = Editor::new(Buffer::with_capacity(8), None, 80, 24, config);

    editor.handle_key(Key::Char(b'i'));
    type_str(&mut editor, "x");
    editor.handle_key(Key::Esc);

    run_command(&mut editor, "q");
    assert!(!editor.is_done());

    run_command(&mut editor, "q!");
    assert!(editor.is_done());
}

/// Splitting a row with Enter in Insert mode, then joining it back with
/// Backspace at column 0, restores the original single row.
#[test]
fn split_then_join_row_restores_original_line() {
    let config = Config::default();
    let buf = Buffer::with_capacity(8);
    let mut editor = Editor::new(buf, None, 80, 24, config.clone());

    editor.handle_key(Key::Char(b'i'));
    type_str(&mut editor, "helloworld");
    editor.handle_key(Key::Esc);

    // Move to just after "hello" and split.
    for _ in 0..5 {
        editor.handle_key(Key::ArrowLeft);
    }
    editor.handle_key(Key::Char(b'i'));
    editor.handle_key(Key::Enter);
    editor.handle_key(Key::Backspace);
    editor.handle_key(Key::Esc);

    assert_eq!(editor.buf().len(), 1);
    assert_eq!(editor.buf().row(0).unwrap().bytes(), b"helloworld");
}
