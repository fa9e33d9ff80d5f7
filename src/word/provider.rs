use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::word::record::WordEntry;

const WORDS: &str = include_str!("../../assets/words.json");

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("word pool is empty")]
    EmptyPool,
    #[error("word provider unavailable: {0}")]
    Unavailable(String),
}

/// Source of words. Called from worker threads, so implementations must be
/// shareable.
pub trait WordProvider: Send + Sync {
    fn next_word(&self) -> Result<WordEntry, ProviderError>;
}

/// Uniform random pick, with replacement, from a fixed pool.
pub struct StaticWordProvider {
    entries: Vec<WordEntry>,
    rng: Mutex<SmallRng>,
    delay: Duration,
}

impl StaticWordProvider {
    /// The bundled pool of words.
    pub fn bundled() -> Self {
        let entries: Vec<WordEntry> = serde_json::from_str(WORDS).unwrap_or_default();
        Self::new(entries)
    }

    pub fn new(entries: Vec<WordEntry>) -> Self {
        Self::with_rng(entries, SmallRng::from_entropy())
    }

    pub fn with_rng(entries: Vec<WordEntry>, rng: SmallRng) -> Self {
        Self {
            entries,
            rng: Mutex::new(rng),
            delay: Duration::ZERO,
        }
    }

    /// Simulated lookup latency, applied before every pick.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }
}

impl WordProvider for StaticWordProvider {
    fn next_word(&self) -> Result<WordEntry, ProviderError> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        if self.entries.is_empty() {
            return Err(ProviderError::EmptyPool);
        }
        let index = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            rng.gen_range(0..self.entries.len())
        };
        Ok(self.entries[index].clone())
    }
}
