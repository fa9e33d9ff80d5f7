use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A dictionary entry as supplied by a word provider, before it is shown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub id: String,
    pub word: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl WordEntry {
    /// Surface this entry to the user at `date`.
    pub fn stamp(self, date: DateTime<Utc>) -> WordRecord {
        WordRecord {
            id: self.id,
            word: self.word,
            definition: self.definition,
            example: self.example,
            date,
        }
    }
}

/// A word as it was shown: the entry plus the moment it was surfaced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub id: String,
    pub word: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    pub date: DateTime<Utc>,
}

impl WordRecord {
    /// True when the record carries a usable identifying key.
    pub fn has_key(&self) -> bool {
        !self.word.trim().is_empty()
    }

    /// Case-insensitive match of `needle` against the word or its definition.
    /// `needle` must already be lowercase.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.word.to_lowercase().contains(needle)
            || self.definition.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(word: &str) -> WordEntry {
        WordEntry {
            id: "9".to_string(),
            word: word.to_string(),
            definition: "The delay of the data before data transfer starts.".to_string(),
            example: None,
        }
    }

    #[test]
    fn stamp_keeps_fields_and_sets_date() {
        let date = Utc.with_ymd_and_hms(2026, 10, 16, 8, 30, 0).unwrap();
        let record = entry("Latency").stamp(date);
        assert_eq!(record.id, "9");
        assert_eq!(record.word, "Latency");
        assert_eq!(record.date, date);
    }

    #[test]
    fn serializes_date_as_iso8601() {
        let date = Utc.with_ymd_and_hms(2026, 10, 16, 8, 30, 0).unwrap();
        let json = serde_json::to_value(entry("Latency").stamp(date)).unwrap();
        assert_eq!(json["date"], "2026-10-16T08:30:00Z");
        assert!(json.get("example").is_none());
    }

    #[test]
    fn blank_word_has_no_key() {
        let date = Utc::now();
        assert!(!entry("   ").stamp(date).has_key());
        assert!(entry("Yeet").stamp(date).has_key());
    }

    #[test]
    fn matches_word_or_definition() {
        let record = entry("Latency").stamp(Utc::now());
        assert!(record.matches_lowercase("late"));
        assert!(record.matches_lowercase("transfer"));
        assert!(!record.matches_lowercase("eloquent"));
    }
}
