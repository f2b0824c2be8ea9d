use crate::input::key;
use crate::state::State;
use crate::ui::renderer::BufferRenderer;
use anyhow::Result;
use crossterm::{
    event,
    event::{Event as CrosstermEvent, KeyEvent, KeyEventKind},
};
use log::*;
use std::{
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

/// Specify terminal event poll rate in milliseconds.
///
const TICK_RATE_IN_MS: u64 = 60;

/// Specify different terminal event types.
///
#[derive(Debug)]
pub enum Event<I> {
    Input(I),
    Resize(u16, u16),
    Tick,
}

/// Specify struct for managing terminal events channel.
///
pub struct Handler {
    rx: mpsc::Receiver<Event<KeyEvent>>,
    _tx: mpsc::Sender<Event<KeyEvent>>,
}

impl Default for Handler {
    fn default() -> Self {
        Handler::new()
    }
}

impl Handler {
    /// Return new instance after spawning new input polling thread.
    ///
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let tx_clone = tx.clone();
        thread::spawn(move || loop {
            let tick_rate = Duration::from_millis(TICK_RATE_IN_MS);
            match poll_event(tick_rate) {
                Ok(Some(event)) => {
                    if tx_clone.send(event).is_err() {
                        break;
                    }
                }
                Ok(None) => (),
                Err(e) => {
                    error!("Failed to read terminal event: {}", e);
                    break;
                }
            }
            if tx_clone.send(Event::Tick).is_err() {
                break;
            }
        });
        Handler { rx, _tx: tx }
    }

    /// Receive next terminal event and handle it accordingly. Returns result
    /// with value true if should continue or false if exit was requested.
    ///
    pub fn handle_next(&self, state: &mut State, renderer: &mut BufferRenderer) -> Result<bool> {
        match self.rx.recv()? {
            Event::Input(event) => handle_key_event(state, &event),
            Event::Resize(width, height) => {
                renderer.resize(width, height);
                state.on_resize(width, height);
            }
            Event::Tick => state.tick(Instant::now()),
        }
        Ok(!state.should_quit())
    }
}

/// Wait up to `timeout` for a terminal event the application cares about.
///
fn poll_event(timeout: Duration) -> std::io::Result<Option<Event<KeyEvent>>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    Ok(match event::read()? {
        CrosstermEvent::Key(key) => Some(Event::Input(key)),
        CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
        _ => None,
    })
}

/// Forward a key press to the state. Releases and repeats reported by some
/// terminals are ignored.
///
pub fn handle_key_event(state: &mut State, event: &KeyEvent) {
    if event.kind != KeyEventKind::Press {
        return;
    }
    match key::from_key_event(event) {
        Some((key, modifiers)) => state.handle_key(&key, modifiers, Instant::now()),
        None => trace!("Ignoring key {:?}", event.code),
    }
}
