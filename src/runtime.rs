//! Terminal events translated into game inputs, and the loop that paces them.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A key press as the game understands it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// A typed character: a guess, or text for a prompt
    Char(char),
    Skip,
    Stats,
    Saves,
    AddWords,
    Back,
    Confirm,
    Erase,
    Up,
    Down,
    Quit,
}

impl Input {
    /// `None` for keys the game has no use for
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(Input::Quit),
                _ => None,
            };
        }

        let input = match key.code {
            KeyCode::Char(c) => Input::Char(c),
            KeyCode::Tab => Input::Skip,
            KeyCode::F(2) => Input::Stats,
            KeyCode::F(3) => Input::Saves,
            KeyCode::F(4) => Input::AddWords,
            KeyCode::Esc => Input::Back,
            KeyCode::Enter => Input::Confirm,
            KeyCode::Backspace => Input::Erase,
            KeyCode::Up => Input::Up,
            KeyCode::Down => Input::Down,
            _ => return None,
        };
        Some(input)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Input(Input),
    Resize,
    Tick,
}

/// Where the app loop pulls its events from
pub trait EventSource {
    /// Wait up to `timeout`; `None` when nothing arrived
    fn next_event(&self, timeout: Duration) -> Option<GameEvent>;
}

/// Reads the terminal on a background thread
pub struct CrosstermEventSource {
    rx: Receiver<GameEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let game_event = match event::read() {
                // releases and repeats are reported on some platforms
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    match Input::from_key(key) {
                        Some(input) => GameEvent::Input(input),
                        None => continue,
                    }
                }
                Ok(Event::Resize(_, _)) => GameEvent::Resize,
                Ok(_) => continue,
                Err(_) => break,
            };
            if tx.send(game_event).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn next_event(&self, timeout: Duration) -> Option<GameEvent> {
        self.rx.recv_timeout(timeout).ok()
    }
}

/// Events fed through a channel, for driving the app without a terminal
pub struct ChannelEventSource {
    rx: Receiver<GameEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for ChannelEventSource {
    fn next_event(&self, timeout: Duration) -> Option<GameEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

pub struct Runner<E: EventSource> {
    source: E,
    tick: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(source: E, tick: Duration) -> Self {
        Self { source, tick }
    }

    /// Next event, or `Tick` once the tick interval passes quietly
    pub fn step(&self) -> GameEvent {
        self.source.next_event(self.tick).unwrap_or(GameEvent::Tick)
    }
}
