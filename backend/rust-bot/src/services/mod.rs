use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::models::Update;

use self::answer_key_service::AnswerKey;
use self::bot_service::BotService;
use self::export_service::StatsExporter;
use self::session_service::SessionStateTracker;
use self::stats_service::UserStatsStore;

/// Capacity of the webhook -> dispatcher queue.
pub const UPDATE_QUEUE_CAPACITY: usize = 256;

pub struct AppState {
    pub config: Config,
    pub answer_key: Arc<AnswerKey>,
    pub stats: Arc<UserStatsStore>,
    pub sessions: Arc<SessionStateTracker>,
    pub updates: mpsc::Sender<Update>,
}

impl AppState {
    pub fn new(config: Config, updates: mpsc::Sender<Update>) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.storage.data_dir).with_context(|| {
            format!(
                "Failed to create data directory {}",
                config.storage.data_dir.display()
            )
        })?;

        let answer_key = Arc::new(AnswerKey::load(&config.storage.answers_file));
        let stats = Arc::new(UserStatsStore::new(config.storage.stats_file.clone()));

        tracing::info!(
            "Application state ready (data dir: {})",
            config.storage.data_dir.display()
        );

        Ok(Self {
            config,
            answer_key,
            stats,
            sessions: Arc::new(SessionStateTracker::new()),
            updates,
        })
    }

    /// Handlers sharing this state's stores.
    pub fn bot_service(&self) -> BotService {
        BotService::new(
            self.answer_key.clone(),
            self.stats.clone(),
            self.sessions.clone(),
            StatsExporter::new(self.config.storage.export_file.clone()),
            self.config.test_images.clone(),
        )
    }
}

pub mod answer_key_service;
pub mod bot_service;
pub mod dispatcher;
pub mod export_service;
pub mod leaderboard_service;
pub mod scoring_service;
pub mod session_service;
pub mod stats_service;
pub mod telegram_client;
pub mod tunnel_service;
