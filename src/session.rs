use chrono::{DateTime, Utc};
use log::{debug, error, warn};

use crate::store::history::HistoryStore;
use crate::store::kv::StoreError;
use crate::word::provider::{ProviderError, WordProvider};
use crate::word::record::WordRecord;

/// Result of one fetch, produced off the UI thread.
#[derive(Debug)]
pub enum FetchReport {
    Fetched {
        record: WordRecord,
        /// Whether the history accepted the record, or why it could not be
        /// written.
        persisted: Result<bool, StoreError>,
    },
    ProviderFailed(ProviderError),
}

/// What the session did with a [`FetchReport`].
#[derive(Debug)]
pub enum FetchOutcome {
    Shown { added: bool },
    ShownUnsaved(StoreError),
    Failed(ProviderError),
}

/// Pull a word from `provider`, stamp it with `now` and record it in
/// `history`. A failed write does not stop the word from being returned.
pub fn fetch_word(
    provider: &dyn WordProvider,
    history: &HistoryStore,
    now: DateTime<Utc>,
) -> FetchReport {
    let entry = match provider.next_word() {
        Ok(entry) => entry,
        Err(e) => {
            error!("error fetching word: {e}");
            return FetchReport::ProviderFailed(e);
        }
    };
    let record = entry.stamp(now);
    let persisted = history.append(&record);
    if let Err(e) = &persisted {
        error!("error saving {:?} to history: {e}", record.word);
    }
    FetchReport::Fetched { record, persisted }
}

/// The words shown in this run, and where "previous" currently points.
#[derive(Debug, Default)]
pub struct Session {
    current: Option<WordRecord>,
    shown: Vec<WordRecord>,
    /// Count of words shown so far; 1-based index of the current word.
    cursor: usize,
    fetching: bool,
    started: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&WordRecord> {
        self.current.as_ref()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn shown(&self) -> &[WordRecord] {
        &self.shown
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 1
    }

    /// Request the initial word. Only the first call does anything.
    pub fn start(&mut self) -> bool {
        if self.started {
            return false;
        }
        self.started = true;
        self.request_fetch()
    }

    /// Claim the single fetch slot. Returns true when the caller should run
    /// a fetch and hand the report to [`Session::complete_fetch`].
    pub fn request_fetch(&mut self) -> bool {
        if self.fetching {
            debug!("fetch already in flight");
            return false;
        }
        self.fetching = true;
        true
    }

    pub fn complete_fetch(&mut self, report: FetchReport) -> FetchOutcome {
        self.fetching = false;
        match report {
            FetchReport::Fetched { record, persisted } => {
                self.shown.push(record.clone());
                self.current = Some(record);
                self.cursor += 1;
                match persisted {
                    Ok(added) => FetchOutcome::Shown { added },
                    Err(e) => FetchOutcome::ShownUnsaved(e),
                }
            }
            FetchReport::ProviderFailed(e) => FetchOutcome::Failed(e),
        }
    }

    /// Step back to the word shown before the current one. No-op at the
    /// first word of the run.
    pub fn go_to_previous(&mut self) -> bool {
        if self.cursor <= 1 {
            return false;
        }
        let Some(previous) = self.shown.get(self.cursor - 2) else {
            warn!(
                "cursor {} past {} shown words",
                self.cursor,
                self.shown.len()
            );
            return false;
        };
        self.current = Some(previous.clone());
        self.cursor -= 1;
        true
    }

    /// The view became active again. Fetches if nothing is showing.
    pub fn on_activate(&mut self) -> bool {
        if self.current.is_some() || self.fetching {
            return false;
        }
        self.request_fetch()
    }
}
