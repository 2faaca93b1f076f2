use std::io;
use std::path::Path;

use ratatui::{backend::Backend, Terminal};
use tracing::{error, info};

use crate::error::{GuessError, ServiceError};
use crate::game::GamePhase;
use crate::runtime::{EventSource, GameEvent, Input, Runner};
use crate::saves::SaveSummary;
use crate::service::{GameService, GuessOutcome};
use crate::stats::{GameResult, StatsSummary};
use crate::word_pool::WordPool;
use crate::words::read_word_file;

/// Ticks a status message stays visible
const STATUS_TICKS: u32 = 30;

const RECENT_RESULTS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Playing,
    /// A word was completed and the next one is ready
    RoundOver,
    Won,
    Lost,
    Stats,
    Saves,
    /// Prompt for a word file to add to the running game
    AddWords,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusKind {
    Info,
    Good,
    Bad,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub text: String,
    pub kind: StatusKind,
    ticks_left: u32,
}

#[derive(Debug, Default)]
pub struct SavesState {
    pub entries: Vec<SaveSummary>,
    pub selected: usize,
}

#[derive(Debug, Default)]
pub struct StatsState {
    pub summary: StatsSummary,
    pub recent: Vec<GameResult>,
}

/// Words and seed used whenever a new game starts
#[derive(Debug, Clone, Default)]
pub struct NewGameSettings {
    pub words: Vec<String>,
    pub seed: Option<u64>,
}

impl NewGameSettings {
    fn pool(&self) -> WordPool {
        self.seed.map(WordPool::with_seed).unwrap_or_default()
    }
}

pub struct App {
    pub service: GameService,
    pub screen: Screen,
    previous: Screen,
    pub status: Option<Status>,
    /// Word revealed by the last finished round
    pub revealed_word: Option<String>,
    pub saves: SavesState,
    pub stats: StatsState,
    /// Text typed into the add-words prompt
    pub prompt: String,
    pub settings: NewGameSettings,
    pub should_quit: bool,
}

impl App {
    pub fn new(service: GameService, settings: NewGameSettings) -> Self {
        Self {
            service,
            screen: Screen::Playing,
            previous: Screen::Playing,
            status: None,
            revealed_word: None,
            saves: SavesState::default(),
            stats: StatsState::default(),
            prompt: String::new(),
            settings,
            should_quit: false,
        }
    }

    pub fn start_new_game(&mut self) {
        let pool = self.settings.pool();
        let words = self.settings.words.clone();
        match self.service.new_game(pool, words) {
            Ok(()) => {
                self.revealed_word = None;
                self.screen = Screen::Playing;
                self.set_status("new game", StatusKind::Info);
            }
            Err(e) => self.report(e),
        }
    }

    /// Returns whether the save was loaded
    pub fn load_save(&mut self, id: i64) -> bool {
        match self.service.load(id) {
            Ok(()) => {
                self.revealed_word = None;
                self.screen = match self.service.game().phase() {
                    GamePhase::GameOver { won: true } => Screen::Won,
                    GamePhase::GameOver { won: false } => Screen::Lost,
                    _ => Screen::Playing,
                };
                self.set_status(format!("loaded save #{id}"), StatusKind::Info);
                true
            }
            Err(e) => {
                self.report(e);
                false
            }
        }
    }

    /// Draw and dispatch events until the player quits
    pub fn run<B, E>(&mut self, terminal: &mut Terminal<B>, runner: &Runner<E>) -> io::Result<()>
    where
        B: Backend,
        E: EventSource,
    {
        terminal.draw(|f| f.render_widget(&*self, f.area()))?;
        while !self.should_quit {
            match runner.step() {
                GameEvent::Input(input) => self.on_input(input),
                GameEvent::Tick => self.on_tick(),
                GameEvent::Resize => {}
            }
            terminal.draw(|f| f.render_widget(&*self, f.area()))?;
        }
        info!("quit");
        Ok(())
    }

    pub fn on_tick(&mut self) {
        if let Some(status) = &mut self.status {
            status.ticks_left = status.ticks_left.saturating_sub(1);
            if status.ticks_left == 0 {
                self.status = None;
            }
        }
    }

    pub fn on_input(&mut self, input: Input) {
        if input == Input::Quit {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Playing => match input {
                Input::Back => self.should_quit = true,
                Input::Skip => self.skip_word(),
                Input::Stats => self.open_stats(),
                Input::Saves => self.open_saves(),
                Input::AddWords => self.open_add_words(),
                Input::Char(c) if !c.is_whitespace() => self.guess(&c.to_string()),
                _ => {}
            },
            Screen::RoundOver => match input {
                Input::Back => self.should_quit = true,
                _ => self.screen = Screen::Playing,
            },
            Screen::Won | Screen::Lost => match input {
                Input::Back | Input::Char('q') => self.should_quit = true,
                Input::Char('n') => self.start_new_game(),
                Input::Stats | Input::Char('s') => self.open_stats(),
                Input::Saves => self.open_saves(),
                _ => {}
            },
            Screen::Stats => match input {
                Input::Back | Input::Erase | Input::Char('b') => self.go_back(),
                _ => {}
            },
            Screen::Saves => match input {
                Input::Back | Input::Erase => self.go_back(),
                Input::Up => self.saves.selected = self.saves.selected.saturating_sub(1),
                Input::Down => {
                    if self.saves.selected + 1 < self.saves.entries.len() {
                        self.saves.selected += 1;
                    }
                }
                Input::Confirm => {
                    if let Some(entry) = self.saves.entries.get(self.saves.selected) {
                        let id = entry.id;
                        self.load_save(id);
                    }
                }
                _ => {}
            },
            Screen::AddWords => match input {
                Input::Back => self.go_back(),
                Input::Char(c) => self.prompt.push(c),
                Input::Erase => {
                    self.prompt.pop();
                }
                Input::Confirm => self.add_words_from_prompt(),
                _ => {}
            },
        }
    }

    fn guess(&mut self, guess: &str) {
        let word_before = self.service.game().current_word().map(str::to_string);
        match self.service.submit_guess(guess) {
            Ok(outcome) => self.apply_outcome(outcome, word_before, guess),
            Err(ServiceError::Guess(e)) => self.reject(e),
            Err(e) => self.report(e),
        }
    }

    fn skip_word(&mut self) {
        let word_before = self.service.game().current_word().map(str::to_string);
        match self.service.skip_word() {
            Ok(outcome) => self.apply_outcome(outcome, word_before, ""),
            Err(e) => self.report(e),
        }
    }

    fn apply_outcome(&mut self, outcome: GuessOutcome, word_before: Option<String>, guess: &str) {
        match outcome {
            GuessOutcome::Correct => {
                self.set_status(format!("'{guess}' is in the word"), StatusKind::Good)
            }
            GuessOutcome::Wrong => self.set_status(format!("no '{guess}' here"), StatusKind::Bad),
            GuessOutcome::Skipped => self.set_status(
                format!("skipped \"{}\"", word_before.unwrap_or_default()),
                StatusKind::Info,
            ),
            GuessOutcome::RoundWon => {
                self.revealed_word = word_before;
                self.screen = Screen::RoundOver;
            }
            GuessOutcome::GameWon => {
                self.revealed_word = word_before;
                self.screen = Screen::Won;
            }
            GuessOutcome::GameLost => {
                self.revealed_word = word_before;
                self.screen = Screen::Lost;
            }
        }
    }

    fn reject(&mut self, e: GuessError) {
        let text = match e {
            GuessError::InvalidGuess(_) => "guess a single letter".to_string(),
            other => other.to_string(),
        };
        self.set_status(text, StatusKind::Bad);
    }

    fn open_stats(&mut self) {
        let loaded = self
            .service
            .stats()
            .and_then(|summary| Ok((summary, self.service.recent_results(RECENT_RESULTS)?)));
        match loaded {
            Ok((summary, recent)) => {
                self.stats = StatsState { summary, recent };
                self.enter_overlay(Screen::Stats);
            }
            Err(e) => self.report(e),
        }
    }

    fn open_saves(&mut self) {
        match self.service.list_saves() {
            Ok(entries) => {
                self.saves = SavesState {
                    entries,
                    selected: 0,
                };
                self.enter_overlay(Screen::Saves);
            }
            Err(e) => self.report(e),
        }
    }

    fn open_add_words(&mut self) {
        self.prompt.clear();
        self.enter_overlay(Screen::AddWords);
    }

    /// Read the word file named in the prompt into the running game
    fn add_words_from_prompt(&mut self) {
        let path = self.prompt.trim().to_string();
        if path.is_empty() {
            return;
        }

        let words = match read_word_file(Path::new(&path)) {
            Ok(words) => words,
            Err(e) => {
                error!(path = %path, error = %e, "unable to add words");
                self.set_status(e.to_string(), StatusKind::Bad);
                return;
            }
        };
        if words.is_empty() {
            self.set_status(format!("no words in {path}"), StatusKind::Bad);
            return;
        }

        let count = words.len();
        match self.service.add_words(words) {
            Ok(()) => {
                self.go_back();
                self.set_status(format!("added {count} words"), StatusKind::Good);
            }
            Err(e) => self.report(e),
        }
    }

    fn enter_overlay(&mut self, screen: Screen) {
        if !matches!(self.screen, Screen::Stats | Screen::Saves | Screen::AddWords) {
            self.previous = self.screen.clone();
        }
        self.screen = screen;
    }

    fn go_back(&mut self) {
        self.screen = self.previous.clone();
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(Status {
            text: text.into(),
            kind,
            ticks_left: STATUS_TICKS,
        });
    }

    fn report(&mut self, e: ServiceError) {
        error!(error = %e, "service call failed");
        self.set_status(e.to_string(), StatusKind::Bad);
    }
}
