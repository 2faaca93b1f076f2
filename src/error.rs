use derive_more::{Display, From};

/// Reasons a guess is rejected. A rejected guess never changes game state.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GuessError {
    /// Empty input, or more than one user-perceived character
    #[display("invalid guess: {_0:?}")]
    InvalidGuess(String),

    #[display("no word is being guessed")]
    NoActiveRound,

    #[display("the game is already over")]
    GameOver,

    /// The word is already revealed; start the next round first
    #[display("the round is already over")]
    RoundOver,
}

impl std::error::Error for GuessError {}

/// Failures while reading word lists
#[derive(Debug, Display, From)]
pub enum WordsError {
    #[display("unable to read word file: {_0}")]
    Io(std::io::Error),

    #[display("word file is {size} bytes, the limit is {limit}")]
    #[from(ignore)]
    TooLarge { size: u64, limit: u64 },

    #[display("bundled word list {_0} not found")]
    #[from(ignore)]
    UnknownList(String),

    #[display("malformed word list: {_0}")]
    Json(serde_json::Error),
}

impl std::error::Error for WordsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WordsError::Io(e) => Some(e),
            WordsError::Json(e) => Some(e),
            WordsError::TooLarge { .. } | WordsError::UnknownList(_) => None,
        }
    }
}

/// Errors surfaced by [`crate::service::GameService`]
#[derive(Debug, Display, From)]
pub enum ServiceError {
    #[display("{_0}")]
    Guess(GuessError),

    #[display("database error: {_0}")]
    Db(rusqlite::Error),

    #[display("unable to encode game state: {_0}")]
    Snapshot(serde_json::Error),

    #[display("game save {_0} does not exist")]
    #[from(ignore)]
    SaveNotFound(i64),
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Guess(e) => Some(e),
            ServiceError::Db(e) => Some(e),
            ServiceError::Snapshot(e) => Some(e),
            ServiceError::SaveNotFound(_) => None,
        }
    }
}
