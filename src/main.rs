use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use hangman::{
    app::{App, NewGameSettings},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{CrosstermEventSource, Runner},
    saves::SaveStore,
    service::GameService,
    stats::StatsDb,
    words::{collect_words, WordList},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use tracing::info;

const TICK_RATE_MS: u64 = 100;

/// guess the word before the gallows is finished
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// word file to play with, whitespace-separated words (repeatable)
    #[clap(short = 'f', long = "words-file")]
    words_files: Vec<PathBuf>,

    /// bundled word list used when no word file is given
    #[clap(short = 'l', long, value_enum)]
    word_list: Option<WordList>,

    /// also add the built-in default words
    #[clap(long)]
    with_defaults: bool,

    /// seed for reproducible word order
    #[clap(long)]
    seed: Option<u64>,

    /// resume a saved game by id
    #[clap(long)]
    load: Option<i64>,

    /// do not store game progress
    #[clap(long)]
    no_save: bool,

    /// sqlite database for saves and statistics
    #[clap(long)]
    db: Option<PathBuf>,
}

impl Cli {
    /// Flags win over values from the config file
    fn apply(&self, mut config: Config) -> Config {
        if let Some(list) = self.word_list {
            config.word_list = list;
        }
        if !self.words_files.is_empty() {
            config.word_files = self.words_files.clone();
        }
        if self.with_defaults {
            config.include_default_words = true;
        }
        config
    }

    fn db_path(&self) -> PathBuf {
        self.db
            .clone()
            .or_else(AppDirs::db_path)
            .unwrap_or_else(|| PathBuf::from("hangman.db"))
    }
}

fn build_service(cli: &Cli) -> Result<GameService, Box<dyn Error>> {
    let db_path = cli.db_path();
    let stats = StatsDb::open(&db_path)?;
    let saves = if cli.no_save {
        None
    } else {
        Some(SaveStore::open(&db_path)?)
    };
    Ok(GameService::new(saves, stats))
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config = cli.apply(FileConfigStore::new().load());
    let log_path = AppDirs::log_path().unwrap_or_else(|| PathBuf::from("hangman.log"));
    logging::init(&log_path, &config.log_level)?;

    let words = collect_words(
        config.word_list,
        &config.word_files,
        config.include_default_words,
    )?;
    if words.is_empty() && cli.load.is_none() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::InvalidValue, "no words to play with")
            .exit();
    }
    info!(words = words.len(), list = %config.word_list, "starting");

    let settings = NewGameSettings {
        words,
        seed: cli.seed,
    };
    let mut app = App::new(build_service(&cli)?, settings);
    if !cli.load.is_some_and(|id| app.load_save(id)) {
        app.start_new_game();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );
    let result = app.run(&mut terminal, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(result?)
}
