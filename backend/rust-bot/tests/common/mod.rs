#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use serde_json::{json, Value};
use testcheck_bot::{
    config::{Config, StorageSettings, TunnelSettings},
    create_router,
    error::TransportError,
    models::{ChatId, ReplyKeyboardMarkup, Update},
    services::{telegram_client::BotTransport, AppState},
};
use tokio::sync::mpsc;

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub updates: mpsc::Receiver<Update>,
    pub dir: tempfile::TempDir,
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn test_config(data_dir: &Path, test_images: Vec<PathBuf>) -> Config {
    Config {
        bot_token: "test-token".to_string(),
        telegram_api_url: "http://127.0.0.1:9".to_string(),
        listen_addr: "127.0.0.1:0".to_string(),
        webhook_path: "/webhook".to_string(),
        public_url: None,
        tunnel: TunnelSettings {
            enabled: false,
            command: "ngrok".to_string(),
            port: 5000,
        },
        storage: StorageSettings::in_dir(data_dir),
        test_images,
    }
}

/// Writes `answers.json` with the given key.
pub fn write_answer_key(data_dir: &Path, answers: &[&str]) {
    std::fs::write(
        data_dir.join("answers.json"),
        json!({ "answers": answers }).to_string(),
    )
    .unwrap();
}

pub fn create_state(answers: &[&str], queue: usize) -> (Arc<AppState>, mpsc::Receiver<Update>, tempfile::TempDir) {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    write_answer_key(dir.path(), answers);

    let (tx, rx) = mpsc::channel(queue);
    let state = Arc::new(AppState::new(test_config(dir.path(), Vec::new()), tx).unwrap());
    (state, rx, dir)
}

pub fn create_test_app(answers: &[&str]) -> TestApp {
    let (state, updates, dir) = create_state(answers, 8);
    TestApp {
        router: create_router(state.clone()),
        state,
        updates,
        dir,
    }
}

pub fn text_update(update_id: i64, user_id: i64, first_name: &str, text: &str) -> Value {
    json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id,
            "date": 1726040000,
            "from": { "id": user_id, "is_bot": false, "first_name": first_name, "last_name": "Tester" },
            "chat": { "id": user_id, "type": "private" },
            "text": text
        }
    })
}

pub fn parse_update(value: Value) -> Update {
    serde_json::from_value(value).unwrap()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text {
        chat_id: ChatId,
        text: String,
        keyboard: bool,
    },
    Photo {
        chat_id: ChatId,
        path: PathBuf,
    },
}

/// Transport that records every outbound call instead of talking to Telegram.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<Sent>>,
}

impl RecordingTransport {
    pub fn texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter_map(|sent| match sent {
                Sent::Text { text, .. } => Some(text.clone()),
                Sent::Photo { .. } => None,
            })
            .collect()
    }

    pub fn all(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl BotTransport for RecordingTransport {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&ReplyKeyboardMarkup>,
    ) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(Sent::Text {
            chat_id,
            text: text.to_string(),
            keyboard: keyboard.is_some(),
        });
        Ok(())
    }

    async fn send_photo(&self, chat_id: ChatId, path: &Path) -> Result<(), TransportError> {
        if !path.exists() {
            return Err(TransportError::FileNotFound(path.to_path_buf()));
        }
        self.sent.lock().unwrap().push(Sent::Photo {
            chat_id,
            path: path.to_path_buf(),
        });
        Ok(())
    }
}
