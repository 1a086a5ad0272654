use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::error::DocumentError;
use crate::metrics::STATS_WRITES_TOTAL;
use crate::models::stats::stats_key;
use crate::models::{StatsDocument, StatsMap, UserId, UserRecord};

/// Result of [`UserStatsStore::record_first_attempt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptRecording {
    Recorded,
    AlreadyRecorded,
}

/// File-backed user results with a lazily populated in-memory cache.
pub struct UserStatsStore {
    path: PathBuf,
    cache: Mutex<Option<StatsMap>>,
}

impl UserStatsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cached stats, reading the document on first use.
    pub async fn load(&self) -> StatsMap {
        let mut cache = self.cache.lock().await;
        self.cached(&mut cache).await.clone()
    }

    /// Replaces the cache and rewrites the document. Write errors are logged
    /// only; the cache keeps the new value either way.
    pub async fn save(&self, stats: StatsMap) {
        let mut cache = self.cache.lock().await;
        let stats = cache.insert(stats);
        self.write(stats).await;
    }

    /// Stores `correct` as the user's permanent score unless one is already on record.
    pub async fn record_first_attempt(
        &self,
        user_id: UserId,
        first_name: &str,
        last_name: Option<&str>,
        correct: u32,
    ) -> AttemptRecording {
        let mut cache = self.cache.lock().await;
        let stats = self.cached(&mut cache).await;
        let key = stats_key(user_id);

        if stats.get(&key).is_some_and(UserRecord::has_attempt) {
            tracing::info!(
                "User {} already submitted answers, repeat attempt is not recorded",
                user_id
            );
            return AttemptRecording::AlreadyRecorded;
        }

        stats.insert(key, UserRecord::first_attempt(first_name, last_name, correct));
        self.write(stats).await;

        tracing::info!("Recorded first attempt for user {}: {} correct", user_id, correct);
        AttemptRecording::Recorded
    }

    async fn cached<'a>(&self, cache: &'a mut Option<StatsMap>) -> &'a mut StatsMap {
        if cache.is_none() {
            let stats = match read_document(&self.path).await {
                Ok(stats) => stats,
                Err(DocumentError::NotFound(_)) => {
                    tracing::info!("No stats file at {}, starting empty", self.path.display());
                    StatsMap::new()
                }
                Err(e) => {
                    tracing::error!("Failed to load stats, starting empty: {}", e);
                    StatsMap::new()
                }
            };
            *cache = Some(stats);
        }
        cache.get_or_insert_with(StatsMap::new)
    }

    async fn write(&self, stats: &StatsMap) {
        let result = write_document(&self.path, stats).await;
        STATS_WRITES_TOTAL
            .with_label_values(&[crate::metrics::status_label(&result)])
            .inc();

        if let Err(e) = result {
            tracing::error!("Failed to write stats file {}: {}", self.path.display(), e);
        }
    }
}

/// Reads and validates the stats document.
pub async fn read_document(path: &Path) -> Result<StatsMap, DocumentError> {
    let raw = tokio::fs::read(path)
        .await
        .map_err(|e| DocumentError::from_io(path, e))?;
    let (users, truncated) =
        StatsDocument::parse(&raw).map_err(|source| DocumentError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
    for user_id in truncated {
        tracing::warn!(
            "User {} has several scores in {}, keeping only the first",
            user_id,
            path.display()
        );
    }
    Ok(users)
}

async fn write_document(path: &Path, stats: &StatsMap) -> anyhow::Result<()> {
    #[derive(serde::Serialize)]
    struct Document<'a> {
        users: &'a StatsMap,
    }

    let json = serde_json::to_vec(&Document { users: stats })?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
