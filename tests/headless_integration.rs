use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use hangman::app::{App, NewGameSettings, Screen};
use hangman::runtime::{ChannelEventSource, GameEvent, Input, Runner};
use hangman::service::GameService;
use ratatui::{backend::TestBackend, Terminal};

fn key(code: KeyCode) -> GameEvent {
    let input = Input::from_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    GameEvent::Input(input)
}

fn test_app(words: &[&str]) -> App {
    let settings = NewGameSettings {
        words: words.iter().map(|w| w.to_string()).collect(),
        seed: Some(5),
    };
    let mut app = App::new(GameService::in_memory().unwrap(), settings);
    app.start_new_game();
    app
}

// Drives the real event loop on a test backend until the player quits.
#[test]
fn headless_game_is_won_and_quit() {
    let mut app = test_app(&["cat"]);

    let (tx, rx) = mpsc::channel();
    for c in "cat".chars() {
        tx.send(key(KeyCode::Char(c))).unwrap();
    }
    tx.send(key(KeyCode::Esc)).unwrap();

    let runner = Runner::new(ChannelEventSource::new(rx), Duration::from_millis(5));
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

    app.run(&mut terminal, &runner).unwrap();

    assert!(app.should_quit);
    assert_eq!(app.screen, Screen::Won);
    assert_eq!(app.service.stats().unwrap().wins, 1);

    let rendered = terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect::<String>();
    assert!(rendered.contains("you won!"));
}

#[test]
fn headless_loss_then_new_game() {
    let mut app = test_app(&["dog"]);
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(ChannelEventSource::new(rx), Duration::from_millis(5));

    for c in "xyzqwv".chars() {
        tx.send(key(KeyCode::Char(c))).unwrap();
    }

    for _ in 0..6 {
        match runner.step() {
            GameEvent::Input(input) => app.on_input(input),
            GameEvent::Tick => app.on_tick(),
            GameEvent::Resize => {}
        }
    }
    assert_eq!(app.screen, Screen::Lost);
    assert_eq!(app.revealed_word.as_deref(), Some("dog"));

    tx.send(key(KeyCode::Char('n'))).unwrap();
    if let GameEvent::Input(input) = runner.step() {
        app.on_input(input);
    }
    assert_eq!(app.screen, Screen::Playing);
    assert_eq!(app.service.game().masked_word(), "_ _ _");
}

#[test]
fn headless_unmapped_keys_leave_state_alone() {
    assert_eq!(
        Input::from_key(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE)),
        None
    );

    let mut app = test_app(&["kot"]);
    app.on_input(Input::Char(' '));

    assert_eq!(app.screen, Screen::Playing);
    assert_eq!(app.service.game().misses(), 0);
    assert_eq!(app.service.game().guessed_letters(), "");
}
