//! # CLI entry point
//!
//! Parses the optional file argument, brings up the terminal and buffer,
//! runs the event loop, and tears everything down on exit. Grounded on
//! the original implementation's `main`/`run`.

use std::path::PathBuf;
use std::process::ExitCode;

use svi::buffer::Buffer;
use svi::codec;
use svi::config::Config;
use svi::error::Error;
use svi::mode::apply_effect;
use svi::render::Renderer;
use svi::state::Editor;
use svi::terminal::{Terminal, TermEvent};

fn main() -> ExitCode {
    let argv0 = std::env::args().next().unwrap_or_else(|| "svi".to_owned());
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{argv0}: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Error> {
    let config = Config::default();
    let filename = std::env::args_os().nth(1).map(PathBuf::from);

    let buf = match &filename {
        Some(path) if path.exists() => codec::load(path, &config)?,
        _ => Buffer::with_capacity(config.initial_buffer_rows),
    };

    let mut term = Terminal::init()?;
    let (w, h) = term.size(&config)?;
    if h < 2 {
        return Err(Error::TerminalTooShort);
    }

    let mut editor = Editor::new(buf, filename, w, h, config);

    {
        let mut renderer = Renderer::new(&mut term);
        renderer.redraw(editor.buf(), 0, 0, h - 2, editor.config())?;
    }
    reposition_cursor(&editor, &mut term)?;

    while !editor.is_done() {
        match term.wait_event()? {
            TermEvent::Resize => {
                let (w, h) = term.size(editor.config())?;
                editor.apply_resize(w, h);
                let start_y = editor.resize_redraw_start_y();
                let mut renderer = Renderer::new(&mut term);
                renderer.redraw(editor.buf(), start_y, 0, editor.h() - 2, editor.config())?;
            }
            TermEvent::Key(key) => {
                let effect = editor.handle_key(key);
                let mut renderer = Renderer::new(&mut term);
                apply_effect(&editor, &mut renderer, effect)?;
            }
        }
        reposition_cursor(&editor, &mut term)?;
    }

    Ok(())
}

fn reposition_cursor(editor: &Editor, term: &mut Terminal) -> Result<(), Error> {
    let (x, y) = editor.cursor_screen_pos();
    term.set_cursor(x, y)?;
    term.flush()?;
    Ok(())
}
