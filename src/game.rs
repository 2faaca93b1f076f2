use std::collections::BTreeSet;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GuessError;
use crate::grapheme::{graphemes, single_grapheme_or_none};
use crate::word_pool::WordPool;

/// Incorrect guesses allowed before the game is lost
pub const MAX_MISSES: u32 = 6;

/// Shown in place of letters that haven't been guessed yet
pub const FILLER: &str = "_";

/// Where a game is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    NotStarted,
    InRound,
    RoundOver,
    GameOver { won: bool },
}

/// One player's hangman session: a word pool plus the round in progress.
///
/// The whole struct is the save format. Every field is stored as-is and
/// nothing derived is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pool: WordPool,
    current_word: Option<String>,
    guessed: BTreeSet<String>,
    misses: u32,
    words_guessed: usize,
    #[serde(default)]
    rounds_started: usize,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(WordPool::new())
    }
}

impl Game {
    pub fn new(pool: WordPool) -> Self {
        Self {
            pool,
            current_word: None,
            guessed: BTreeSet::new(),
            misses: 0,
            words_guessed: 0,
            rounds_started: 0,
        }
    }

    pub fn add_words<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pool.add_words(words);
    }

    /// Draw the next word and reset the per-round state.
    ///
    /// Leaves no current word when the pool is drained, which ends the game.
    pub fn next_round(&mut self) {
        self.current_word = self.pool.take_word();
        self.guessed.clear();
        self.misses = 0;
        self.rounds_started += 1;
        debug!(
            round = self.rounds_started,
            has_word = self.current_word.is_some(),
            left_in_pool = self.pool.remaining(),
            "next round"
        );
    }

    /// Guess one character. Returns whether the current word contains it.
    ///
    /// Accepts `&str` or `Option<&str>`; an absent guess is rejected the
    /// same way as an empty one.
    pub fn try_letter<'a>(
        &mut self,
        guess: impl Into<Option<&'a str>>,
    ) -> Result<bool, GuessError> {
        let raw = guess.into().unwrap_or_default();
        let letter =
            single_grapheme_or_none(raw).ok_or_else(|| GuessError::InvalidGuess(raw.to_string()))?;

        let Some(word) = self.current_word.as_deref() else {
            return Err(GuessError::NoActiveRound);
        };
        if self.is_game_over() {
            return Err(GuessError::GameOver);
        }
        if self.is_round_over() {
            return Err(GuessError::RoundOver);
        }

        let is_correct = word.contains(letter.as_str());
        self.guessed.insert(letter);
        if !is_correct {
            self.misses += 1;
        }

        if self.is_round_over() {
            self.words_guessed += 1;
        }

        Ok(is_correct)
    }

    /// Current word with unguessed characters replaced by `_`, space separated
    pub fn masked_word(&self) -> String {
        let Some(word) = self.current_word.as_deref() else {
            return String::new();
        };

        graphemes(word)
            .map(|g| if self.guessed.contains(g) { g } else { FILLER })
            .join(" ")
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    pub fn misses_left(&self) -> u32 {
        MAX_MISSES.saturating_sub(self.misses)
    }

    pub fn is_round_over(&self) -> bool {
        match self.current_word.as_deref() {
            None => true,
            Some(word) => graphemes(word).all(|g| self.guessed.contains(g)),
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.misses >= MAX_MISSES
            || (self.is_round_over() && self.pool.is_empty())
            || self.current_word.is_none()
    }

    pub fn current_word(&self) -> Option<&str> {
        self.current_word.as_deref()
    }

    /// Guessed characters in ascending code point order, space separated
    pub fn guessed_letters(&self) -> String {
        self.guessed.iter().join(" ")
    }

    /// Won only if the pool is drained and every word ever added was guessed
    pub fn did_win(&self) -> bool {
        self.pool.is_empty() && self.pool.word_count_total() == self.words_guessed
    }

    pub fn words_guessed(&self) -> usize {
        self.words_guessed
    }

    /// Words ever added minus words completed.
    ///
    /// Differs from the live pool size once a word has been skipped: the
    /// skipped word still counts here.
    pub fn words_remaining(&self) -> usize {
        self.pool.word_count_total().saturating_sub(self.words_guessed)
    }

    pub fn pool(&self) -> &WordPool {
        &self.pool
    }

    pub fn rounds_started(&self) -> usize {
        self.rounds_started
    }

    pub fn phase(&self) -> GamePhase {
        if self.rounds_started == 0 && self.current_word.is_none() {
            GamePhase::NotStarted
        } else if self.is_game_over() {
            GamePhase::GameOver {
                won: self.did_win(),
            }
        } else if self.is_round_over() {
            GamePhase::RoundOver
        } else {
            GamePhase::InRound
        }
    }
}
