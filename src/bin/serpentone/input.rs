//! Terminal key reader thread.
//!
//! Owns crossterm's event stream for the whole app: QWERTY notes go through
//! a [`QwertyKeyboard`], `Esc` and `Ctrl+C` request shutdown. Everything is
//! sent through the dispatcher; this thread never touches voices.

use std::{
    sync::{
        atomic::{AtomicBool, AtomicU8, Ordering},
        Arc,
    },
    thread::JoinHandle,
    time::Duration,
};

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::supports_keyboard_enhancement,
};
use tracing::{debug, info, warn};

use serpentone::{engine::Dispatcher, io::QwertyKeyboard, Error};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn spawn(
    dispatcher: Dispatcher,
    keyboard: Option<QwertyKeyboard>,
    octave: Arc<AtomicU8>,
    quit: Arc<AtomicBool>,
) -> EyreResult<JoinHandle<()>> {
    // Release events need the kitty keyboard protocol. Without it every
    // key is a press, so notes latch instead.
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    let keyboard = keyboard.map(|kb| kb.with_latch(!enhanced));
    info!(enhanced, "keyboard input ready");

    std::thread::Builder::new()
        .name("serpentone-input".into())
        .spawn(move || {
            if enhanced {
                push_enhancement();
            }
            let mut reader = KeyReader {
                dispatcher,
                keyboard,
                octave,
            };
            if let Err(err) = reader.run(&quit) {
                warn!("input thread stopped: {err}");
                // Nobody is reading Esc any more, so end the session.
                if reader.dispatcher.shutdown().is_err() {
                    debug!("performer already gone");
                }
            }
            if enhanced {
                let _ = execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
            }
        })
        .wrap_err("failed to start input thread")
}

fn push_enhancement() {
    let flags = KeyboardEnhancementFlags::REPORT_EVENT_TYPES
        | KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES;
    if let Err(err) = execute!(std::io::stdout(), PushKeyboardEnhancementFlags(flags)) {
        warn!("could not enable key release reporting: {err}");
    }
}

struct KeyReader {
    dispatcher: Dispatcher,
    keyboard: Option<QwertyKeyboard>,
    octave: Arc<AtomicU8>,
}

impl KeyReader {
    fn run(&mut self, quit: &AtomicBool) -> EyreResult<()> {
        while !quit.load(Ordering::Relaxed) {
            if !event::poll(POLL_INTERVAL)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => {
                    if !self.handle_key(key)? {
                        break;
                    }
                }
                Event::FocusLost => self.release_all()?,
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `false` once shutdown has been requested.
    fn handle_key(&mut self, key: KeyEvent) -> EyreResult<bool> {
        let ctrl_c = key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
        if key.code == KeyCode::Esc || ctrl_c {
            debug!("quit requested");
            self.release_all()?;
            self.dispatcher.shutdown().or_else(ignore_closed)?;
            return Ok(false);
        }

        let (Some(keyboard), KeyCode::Char(c)) = (self.keyboard.as_mut(), key.code) else {
            return Ok(true);
        };
        let command = match key.kind {
            KeyEventKind::Press => keyboard.press(c),
            KeyEventKind::Release => keyboard.release(c),
            KeyEventKind::Repeat => None,
        };
        self.octave.store(keyboard.octave(), Ordering::Relaxed);

        if let Some(command) = command {
            self.dispatcher.send(command).or_else(ignore_closed)?;
        }
        Ok(true)
    }

    fn release_all(&mut self) -> EyreResult<()> {
        let Some(keyboard) = self.keyboard.as_mut() else {
            return Ok(());
        };
        for command in keyboard.release_all() {
            self.dispatcher.send(command).or_else(ignore_closed)?;
        }
        Ok(())
    }
}

/// The performer already exited; nothing left to tell it.
fn ignore_closed(err: Error) -> serpentone::Result<()> {
    match err {
        Error::DispatchClosed => Ok(()),
        other => Err(other),
    }
}
