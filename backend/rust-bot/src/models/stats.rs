use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::telegram::UserId;

/// Cached view of the stats document, keyed by the decimal user id.
pub type StatsMap = BTreeMap<String, UserRecord>;

/// On-disk shape of `stats.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsDocument {
    #[serde(default)]
    pub users: StatsMap,
}

/// Per-user result. `score` is the permanent first-attempt score; `None`
/// until the user has a scored submission on record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "UserRecordDocument", into = "UserRecordDocument")]
pub struct UserRecord {
    pub first_name: String,
    pub last_name: Option<String>,
    pub score: Option<u32>,
}

impl UserRecord {
    pub fn first_attempt(first_name: &str, last_name: Option<&str>, correct: u32) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.map(str::to_string),
            score: Some(correct),
        }
    }

    pub fn has_attempt(&self) -> bool {
        self.score.is_some()
    }

    pub fn total_correct(&self) -> u32 {
        self.score.unwrap_or(0)
    }

    /// "First Last", or just the first name when no last name is known.
    pub fn display_name(&self) -> String {
        match self.last_name.as_deref() {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }
}

/// Wire form kept compatible with existing files: scores is a list that
/// holds at most the first attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserRecordDocument {
    first_name: String,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    scores: Vec<u32>,
}

impl From<UserRecordDocument> for UserRecord {
    fn from(doc: UserRecordDocument) -> Self {
        Self {
            first_name: doc.first_name,
            last_name: doc.last_name,
            score: doc.scores.first().copied(),
        }
    }
}

impl From<UserRecord> for UserRecordDocument {
    fn from(record: UserRecord) -> Self {
        Self {
            first_name: record.first_name,
            last_name: record.last_name,
            scores: record.score.into_iter().collect(),
        }
    }
}

/// Read-side view of `stats.json` that still sees every stored score.
#[derive(Deserialize)]
struct StoredStatsDocument {
    #[serde(default)]
    users: BTreeMap<String, UserRecordDocument>,
}

impl StatsDocument {
    /// Parses `stats.json`, also returning the ids of records that held more
    /// than one score. Only the first score of those records is kept.
    pub fn parse(raw: &[u8]) -> serde_json::Result<(StatsMap, Vec<String>)> {
        let stored: StoredStatsDocument = serde_json::from_slice(raw)?;
        let truncated = stored
            .users
            .iter()
            .filter(|(_, record)| record.scores.len() > 1)
            .map(|(id, _)| id.clone())
            .collect();
        let users = stored
            .users
            .into_iter()
            .map(|(id, record)| (id, UserRecord::from(record)))
            .collect();
        Ok((users, truncated))
    }
}

pub fn stats_key(user_id: UserId) -> String {
    user_id.to_string()
}
