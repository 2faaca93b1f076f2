use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

fn fresh_rng() -> StdRng {
    StdRng::from_entropy()
}

/// Words waiting to be drawn. Drawing removes a word for good.
///
/// `total_added` is a lifetime count of every word ever handed to
/// [`WordPool::add_words`] and is never decremented by a draw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordPool {
    words: Vec<String>,
    total_added: usize,
    #[serde(skip, default = "fresh_rng")]
    rng: StdRng,
}

impl Default for WordPool {
    fn default() -> Self {
        Self::new()
    }
}

impl WordPool {
    pub fn new() -> Self {
        Self {
            words: Vec::new(),
            total_added: 0,
            rng: fresh_rng(),
        }
    }

    /// Pool with a deterministic draw order, for replays and tests
    pub fn with_seed(seed: u64) -> Self {
        Self {
            words: Vec::new(),
            total_added: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Append words verbatim. Duplicates are kept and counted.
    pub fn add_words<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.words.len();
        self.words.extend(words.into_iter().map(Into::into));
        self.total_added += self.words.len() - before;
    }

    /// Remove and return a uniformly chosen word, or `None` once drained
    pub fn take_word(&mut self) -> Option<String> {
        if self.words.is_empty() {
            return None;
        }

        let idx = self.rng.gen_range(0..self.words.len());
        Some(self.words.swap_remove(idx))
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Lifetime count of added words, not the number still in the pool
    pub fn word_count_total(&self) -> usize {
        self.total_added
    }

    /// Words still waiting to be drawn
    pub fn remaining(&self) -> usize {
        self.words.len()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}
