//! Drives one active game against the save and statistics stores.
//!
//! After every move the game is either written back to its save or, once
//! finished, removed from the saves and folded into the statistics.

use chrono::Local;
use tracing::{info, instrument, warn};

use crate::error::ServiceError;
use crate::game::Game;
use crate::saves::{SaveStore, SaveSummary};
use crate::stats::{Counter, GameResult, StatsDb, StatsSummary};
use crate::word_pool::WordPool;

/// What a move did to the game, for the front-end to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct,
    Wrong,
    /// The word was completed and the next one drawn
    RoundWon,
    Skipped,
    GameWon,
    GameLost,
}

impl GuessOutcome {
    pub fn is_game_over(&self) -> bool {
        matches!(self, GuessOutcome::GameWon | GuessOutcome::GameLost)
    }
}

pub struct GameService {
    game: Game,
    save_id: Option<i64>,
    saves: Option<SaveStore>,
    stats: StatsDb,
}

impl GameService {
    /// `saves` may be `None` to play without persisting progress
    pub fn new(saves: Option<SaveStore>, stats: StatsDb) -> Self {
        Self {
            game: Game::default(),
            save_id: None,
            saves,
            stats,
        }
    }

    pub fn in_memory() -> Result<Self, ServiceError> {
        Ok(Self::new(
            Some(SaveStore::open_in_memory()?),
            StatsDb::open_in_memory()?,
        ))
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn save_id(&self) -> Option<i64> {
        self.save_id
    }

    /// Start a fresh game seeded with `words` and store it
    #[instrument(skip_all)]
    pub fn new_game<I, S>(&mut self, pool: WordPool, words: I) -> Result<(), ServiceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut game = Game::new(pool);
        game.add_words(words);
        game.next_round();
        info!(words = game.pool().word_count_total(), "new game");

        self.game = game;
        self.save_id = match &self.saves {
            Some(saves) => Some(saves.save(&self.game)?),
            None => None,
        };
        Ok(())
    }

    /// The guess counter is bumped only once the move is stored, so the
    /// statistics never run ahead of the save.
    #[instrument(skip(self), fields(save_id = ?self.save_id))]
    pub fn submit_guess(&mut self, guess: &str) -> Result<GuessOutcome, ServiceError> {
        let is_correct = self.game.try_letter(guess)?;
        let counter = if is_correct {
            Counter::CorrectGuesses
        } else {
            Counter::WrongGuesses
        };

        if self.game.is_game_over() {
            let outcome = self.finish()?;
            self.stats.increment(counter)?;
            return Ok(outcome);
        }

        let outcome = if self.game.is_round_over() {
            self.game.next_round();
            info!(words_guessed = self.game.words_guessed(), "round won");
            GuessOutcome::RoundWon
        } else if is_correct {
            GuessOutcome::Correct
        } else {
            GuessOutcome::Wrong
        };

        self.persist()?;
        self.stats.increment(counter)?;
        Ok(outcome)
    }

    /// Abandon the current word. Skipping the last word loses the game.
    #[instrument(skip(self), fields(save_id = ?self.save_id))]
    pub fn skip_word(&mut self) -> Result<GuessOutcome, ServiceError> {
        self.game.next_round();

        if self.game.is_game_over() {
            return self.finish();
        }

        self.persist()?;
        Ok(GuessOutcome::Skipped)
    }

    #[instrument(skip_all)]
    pub fn add_words<I, S>(&mut self, words: I) -> Result<(), ServiceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.game.add_words(words);
        self.persist()
    }

    /// Switch to a stored game, writing the current one back first
    #[instrument(skip(self))]
    pub fn load(&mut self, id: i64) -> Result<(), ServiceError> {
        let saves = self.saves.as_ref().ok_or(ServiceError::SaveNotFound(id))?;
        let game = saves.get(id)?.ok_or(ServiceError::SaveNotFound(id))?;

        self.persist()?;
        self.game = game;
        self.save_id = Some(id);
        info!("loaded save");
        Ok(())
    }

    pub fn list_saves(&self) -> Result<Vec<SaveSummary>, ServiceError> {
        match &self.saves {
            Some(saves) => saves.get_all(),
            None => Ok(Vec::new()),
        }
    }

    pub fn stats(&self) -> Result<StatsSummary, ServiceError> {
        Ok(self.stats.summary()?)
    }

    pub fn recent_results(&self, limit: usize) -> Result<Vec<GameResult>, ServiceError> {
        Ok(self.stats.recent_results(limit)?)
    }

    fn persist(&self) -> Result<(), ServiceError> {
        if let (Some(saves), Some(id)) = (&self.saves, self.save_id) {
            saves.update(id, &self.game)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<GuessOutcome, ServiceError> {
        if let (Some(saves), Some(id)) = (&self.saves, self.save_id.take()) {
            if !saves.delete(id)? {
                warn!(id, "finished game had no stored save");
            }
        }

        let won = self.game.did_win();
        self.stats.increment(if won {
            Counter::WinCount
        } else {
            Counter::LoseCount
        })?;
        self.stats.record_result(&GameResult {
            won,
            words_guessed: self.game.words_guessed(),
            total_words: self.game.pool().word_count_total(),
            finished_at: Local::now(),
        })?;
        info!(won, words_guessed = self.game.words_guessed(), "game over");

        Ok(if won {
            GuessOutcome::GameWon
        } else {
            GuessOutcome::GameLost
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GuessError;
    use assert_matches::assert_matches;

    fn service_with(words: &[&str]) -> GameService {
        let mut service = GameService::in_memory().unwrap();
        service
            .new_game(WordPool::with_seed(3), words.iter().copied())
            .unwrap();
        service
    }

    #[test]
    fn test_new_game_is_saved() {
        let service = service_with(&["cat"]);
        let id = service.save_id().unwrap();
        let saves = service.list_saves().unwrap();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].id, id);
        assert_eq!(service.game().current_word(), Some("cat"));
    }

    #[test]
    fn test_correct_and_wrong_guesses_are_counted() {
        let mut service = service_with(&["cat"]);
        assert_eq!(service.submit_guess("c").unwrap(), GuessOutcome::Correct);
        assert_eq!(service.submit_guess("x").unwrap(), GuessOutcome::Wrong);

        let stats = service.stats().unwrap();
        assert_eq!(stats.correct_guesses, 1);
        assert_eq!(stats.wrong_guesses, 1);
    }

    #[test]
    fn test_progress_is_written_to_save() {
        let mut service = service_with(&["cat"]);
        service.submit_guess("a").unwrap();
        let id = service.save_id().unwrap();

        let saves = service.saves.as_ref().unwrap();
        let stored = saves.get(id).unwrap().unwrap();
        assert_eq!(stored.masked_word(), "_ a _");
    }

    #[test]
    fn test_winning_removes_save_and_records_win() {
        let mut service = service_with(&["cat"]);
        service.submit_guess("c").unwrap();
        service.submit_guess("a").unwrap();
        assert_eq!(service.submit_guess("t").unwrap(), GuessOutcome::GameWon);

        assert!(service.save_id().is_none());
        assert!(service.list_saves().unwrap().is_empty());
        let stats = service.stats().unwrap();
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.losses, 0);
        assert_eq!(stats.correct_guesses, 3);

        let results = service.recent_results(5).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].won);
        assert_eq!(results[0].total_words, 1);
    }

    #[test]
    fn test_round_won_draws_next_word() {
        let mut service = service_with(&["ab", "ab"]);
        service.submit_guess("a").unwrap();
        assert_eq!(service.submit_guess("b").unwrap(), GuessOutcome::RoundWon);
        assert_eq!(service.game().words_guessed(), 1);
        assert_eq!(service.game().masked_word(), "_ _");
        assert!(service.game().pool().is_empty());
    }

    #[test]
    fn test_losing_records_loss() {
        let mut service = service_with(&["dog"]);
        for letter in ["x", "y", "z", "q", "w"] {
            assert_eq!(service.submit_guess(letter).unwrap(), GuessOutcome::Wrong);
        }
        assert_eq!(service.submit_guess("v").unwrap(), GuessOutcome::GameLost);
        assert_eq!(service.stats().unwrap().losses, 1);
        assert!(service.list_saves().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_guess_is_surfaced() {
        let mut service = service_with(&["dog"]);
        assert_matches!(
            service.submit_guess("do"),
            Err(ServiceError::Guess(GuessError::InvalidGuess(_)))
        );
        assert_eq!(service.game().misses(), 0);
        assert_eq!(service.stats().unwrap(), StatsSummary::default());
    }

    #[test]
    fn test_failed_save_leaves_stats_untouched() {
        let mut service = service_with(&["cat"]);
        let id = service.save_id().unwrap();
        assert!(service.saves.as_ref().unwrap().delete(id).unwrap());

        assert_matches!(
            service.submit_guess("c"),
            Err(ServiceError::SaveNotFound(missing)) if missing == id
        );
        assert_matches!(
            service.submit_guess("x"),
            Err(ServiceError::SaveNotFound(_))
        );
        assert_eq!(service.stats().unwrap(), StatsSummary::default());
    }

    #[test]
    fn test_skip_word() {
        let mut service = service_with(&["dog", "cat"]);
        assert_eq!(service.skip_word().unwrap(), GuessOutcome::Skipped);
        assert_eq!(service.game().words_remaining(), 2);
        assert_eq!(service.skip_word().unwrap(), GuessOutcome::GameLost);
        assert_eq!(service.stats().unwrap().losses, 1);
    }

    #[test]
    fn test_add_words_extends_game() {
        let mut service = service_with(&["dog"]);
        service.add_words(["cat", "owl"]).unwrap();
        assert_eq!(service.game().words_remaining(), 3);

        let saves = service.list_saves().unwrap();
        assert_eq!(saves[0].words_remaining, 3);
    }

    #[test]
    fn test_load_switches_games_and_keeps_current() {
        let mut service = service_with(&["dog"]);
        let first = service.save_id().unwrap();
        service.submit_guess("o").unwrap();

        service
            .new_game(WordPool::with_seed(3), ["cat"])
            .unwrap();
        let second = service.save_id().unwrap();
        assert_ne!(first, second);

        service.load(first).unwrap();
        assert_eq!(service.game().masked_word(), "_ o _");
        assert_eq!(service.save_id(), Some(first));
        assert_eq!(service.list_saves().unwrap().len(), 2);
    }

    #[test]
    fn test_load_missing_save() {
        let mut service = service_with(&["dog"]);
        assert_matches!(service.load(42), Err(ServiceError::SaveNotFound(42)));
    }

    #[test]
    fn test_without_saves() {
        let mut service = GameService::new(None, StatsDb::open_in_memory().unwrap());
        service.new_game(WordPool::with_seed(1), ["cat"]).unwrap();
        assert!(service.save_id().is_none());
        assert_eq!(service.submit_guess("c").unwrap(), GuessOutcome::Correct);
        assert!(service.list_saves().unwrap().is_empty());
        assert_matches!(service.load(1), Err(ServiceError::SaveNotFound(1)));
    }
}
