// Library surface for the binary, headless tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod db;
pub mod error;
pub mod game;
pub mod grapheme;
pub mod logging;
pub mod runtime;
pub mod saves;
pub mod service;
pub mod stats;
pub mod ui;
pub mod word_pool;
pub mod words;

pub use error::{GuessError, ServiceError, WordsError};
pub use game::{Game, GamePhase, MAX_MISSES};
pub use word_pool::WordPool;
