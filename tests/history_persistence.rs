use std::collections::HashSet;
use std::fs;

use chrono::{TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tempfile::TempDir;

use wordcard::session::{FetchOutcome, Session, fetch_word};
use wordcard::store::history::{HISTORY_KEY, HistoryStore, filter_history};
use wordcard::store::kv::FileKvStore;
use wordcard::word::provider::StaticWordProvider;
use wordcard::word::record::WordEntry;

fn file_history(dir: &TempDir) -> HistoryStore {
    HistoryStore::new(FileKvStore::new(dir.path().to_path_buf()).unwrap())
}

fn entry(id: &str, word: &str) -> WordEntry {
    WordEntry {
        id: id.to_string(),
        word: word.to_string(),
        definition: format!("Definition of {word}."),
        example: None,
    }
}

#[test]
fn history_survives_reopening_the_store() {
    let dir = TempDir::new().unwrap();
    let first = Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap();
    let second = Utc.with_ymd_and_hms(2026, 10, 16, 8, 5, 0).unwrap();

    {
        let history = file_history(&dir);
        assert!(history.append(&entry("1", "Ephemeral").stamp(first)).unwrap());
        assert!(history.append(&entry("2", "Serendipity").stamp(second)).unwrap());
    }

    let reopened = file_history(&dir);
    let records = reopened.read_all().unwrap();
    let words: Vec<&str> = records.iter().map(|r| r.word.as_str()).collect();
    assert_eq!(words, vec!["Serendipity", "Ephemeral"]);
    assert_eq!(records[1].date, first);

    // Still deduplicated against what was written by the earlier instance.
    assert!(!reopened.append(&entry("9", "Ephemeral").stamp(second)).unwrap());
    assert_eq!(reopened.read_all().unwrap().len(), 2);
}

#[test]
fn corrupt_history_file_reads_as_empty_and_recovers() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(format!("{HISTORY_KEY}.json")), "{not json").unwrap();

    let history = file_history(&dir);
    assert!(history.read_all().unwrap().is_empty());

    let now = Utc::now();
    assert!(history.append(&entry("3", "Ubiquitous").stamp(now)).unwrap());
    let records = history.read_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].word, "Ubiquitous");
}

#[test]
fn clear_removes_the_persisted_log() {
    let dir = TempDir::new().unwrap();
    let history = file_history(&dir);
    history
        .append(&entry("4", "Resilient").stamp(Utc::now()))
        .unwrap();

    assert!(history.clear().unwrap());
    assert!(file_history(&dir).read_all().unwrap().is_empty());
}

#[test]
fn session_fetches_fill_history_and_walk_back() {
    let dir = TempDir::new().unwrap();
    let history = file_history(&dir);
    let provider = StaticWordProvider::with_rng(
        vec![
            entry("1", "Ephemeral"),
            entry("2", "Serendipity"),
            entry("3", "Ubiquitous"),
        ],
        SmallRng::seed_from_u64(7),
    );

    let mut session = Session::new();
    let mut shown = Vec::new();
    assert!(session.start());
    for minute in 0..3 {
        if minute > 0 {
            assert!(session.request_fetch());
        }
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 9, minute, 0).unwrap();
        let report = fetch_word(&provider, &history, now);
        let outcome = session.complete_fetch(report);
        assert!(matches!(outcome, FetchOutcome::Shown { .. }));
        shown.push(session.current().unwrap().word.clone());
    }

    assert_eq!(session.cursor(), 3);
    assert!(session.go_to_previous());
    assert_eq!(session.current().unwrap().word, shown[1]);
    assert!(session.go_to_previous());
    assert_eq!(session.current().unwrap().word, shown[0]);
    assert!(!session.go_to_previous());

    // Duplicates across fetches collapse to one history entry per word.
    let records = history.read_all().unwrap();
    let distinct: HashSet<&String> = shown.iter().collect();
    assert_eq!(records.len(), distinct.len());
    assert_eq!(records.last().unwrap().word, shown[0]);

    let hits = filter_history(&records, "definition of");
    assert_eq!(hits.len(), records.len());
}
