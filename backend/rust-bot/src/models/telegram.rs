//! The subset of the Telegram Bot API objects the bot reads and writes.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: ChatId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyboardButton {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyKeyboardMarkup {
    pub keyboard: Vec<Vec<KeyboardButton>>,
    pub resize_keyboard: bool,
}

impl ReplyKeyboardMarkup {
    /// One button per row.
    pub fn single_column(labels: &[&str]) -> Self {
        Self {
            keyboard: labels
                .iter()
                .map(|label| {
                    vec![KeyboardButton {
                        text: label.to_string(),
                    }]
                })
                .collect(),
            resize_keyboard: true,
        }
    }
}

/// Transport-neutral response produced by the bot handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text {
        text: String,
        keyboard: Option<ReplyKeyboardMarkup>,
    },
    Photo(PathBuf),
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: ReplyKeyboardMarkup) -> Self {
        Reply::Text {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

/// Envelope returned by every Bot API method.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: ChatId,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<&'a ReplyKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
pub struct SetWebhookRequest<'a> {
    pub url: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_text_message_update() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 10,
            "message": {
                "message_id": 5,
                "date": 1726040000,
                "from": { "id": 77, "is_bot": false, "first_name": "Ann", "language_code": "ru" },
                "chat": { "id": 77, "type": "private" },
                "text": "abcde"
            }
        }))
        .unwrap();

        let message = update.message.unwrap();
        let from = message.from.unwrap();
        assert_eq!(from.id, UserId(77));
        assert_eq!(from.last_name, None);
        assert_eq!(message.chat.id, ChatId(77));
        assert_eq!(message.text.as_deref(), Some("abcde"));
    }

    #[test]
    fn update_without_message_is_accepted() {
        let update: Update =
            serde_json::from_value(json!({ "update_id": 11, "edited_message": {} })).unwrap();
        assert!(update.message.is_none());
    }

    #[test]
    fn keyboard_serializes_as_button_rows() {
        let markup = ReplyKeyboardMarkup::single_column(&["/get_test", "/show_stats"]);
        let request = SendMessageRequest {
            chat_id: ChatId(1),
            text: "hi",
            reply_markup: Some(&markup),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "chat_id": 1,
                "text": "hi",
                "reply_markup": {
                    "keyboard": [[{ "text": "/get_test" }], [{ "text": "/show_stats" }]],
                    "resize_keyboard": true
                }
            })
        );
    }
}
