use std::sync::Mutex;

use log::{debug, error, info, warn};

use crate::store::kv::{KeyValueStore, StoreError};
use crate::word::record::WordRecord;

pub const HISTORY_KEY: &str = "WORD_HISTORY";

/// Durable, newest-first, word-deduplicated log of every word shown.
///
/// The whole log lives under [`HISTORY_KEY`] and is rewritten on every
/// mutation. Mutations hold `write_lock` for the full load/modify/store
/// cycle, so concurrent writers through the same store never drop each
/// other's updates.
pub struct HistoryStore {
    medium: Box<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(medium: impl KeyValueStore + 'static) -> Self {
        Self {
            medium: Box::new(medium),
            write_lock: Mutex::new(()),
        }
    }

    /// Prepend `record` unless it has a blank word or its word is already
    /// stored. Returns whether the record was added.
    pub fn append(&self, record: &WordRecord) -> Result<bool, StoreError> {
        if !record.has_key() {
            warn!("refusing to store word record without a word (id {:?})", record.id);
            return Ok(false);
        }

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut history = self.load()?;
        if history.iter().any(|item| item.word == record.word) {
            debug!("{:?} already in history", record.word);
            return Ok(false);
        }

        history.insert(0, record.clone());
        let json = serde_json::to_string(&history)?;
        self.medium.set(HISTORY_KEY, &json)?;
        info!("word saved to history: {}", record.word);
        Ok(true)
    }

    pub fn read_all(&self) -> Result<Vec<WordRecord>, StoreError> {
        let history = self.load()?;
        debug!("found {} words in history", history.len());
        Ok(history)
    }

    /// Remove every entry. Returns `false` only if the medium still reports
    /// content after the removal.
    pub fn clear(&self) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        if self.medium.get(HISTORY_KEY)?.is_none() {
            debug!("no history to clear");
            return Ok(true);
        }

        self.medium.remove(HISTORY_KEY)?;
        if self.medium.get(HISTORY_KEY)?.is_some() {
            error!("history still present after clear");
            return Ok(false);
        }
        info!("word history cleared");
        Ok(true)
    }

    fn load(&self) -> Result<Vec<WordRecord>, StoreError> {
        let Some(content) = self.medium.get(HISTORY_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&content) {
            Ok(history) => Ok(history),
            Err(e) => {
                error!("stored history is unreadable, treating it as empty: {e}");
                Ok(Vec::new())
            }
        }
    }
}

/// Records whose word or definition contains `query`, ignoring case.
/// A blank query keeps everything.
pub fn filter_history<'a>(records: &'a [WordRecord], query: &str) -> Vec<&'a WordRecord> {
    if query.trim().is_empty() {
        return records.iter().collect();
    }
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|record| record.matches_lowercase(&needle))
        .collect()
}
