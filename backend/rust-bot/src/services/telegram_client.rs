use std::path::Path;

use async_trait::async_trait;
use reqwest::{multipart, Client};

use crate::error::TransportError;
use crate::metrics::TELEGRAM_REQUESTS_TOTAL;
use crate::models::telegram::{ApiResponse, SendMessageRequest, SetWebhookRequest};
use crate::models::{ChatId, ReplyKeyboardMarkup};

/// Outbound side of the chat platform.
#[async_trait]
pub trait BotTransport: Send + Sync {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&ReplyKeyboardMarkup>,
    ) -> Result<(), TransportError>;

    async fn send_photo(&self, chat_id: ChatId, path: &Path) -> Result<(), TransportError>;
}

/// Minimal Telegram Bot API client.
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    api_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    pub async fn set_webhook(&self, url: &str) -> Result<(), TransportError> {
        let response = self
            .http
            .post(self.method_url("setWebhook"))
            .json(&SetWebhookRequest { url })
            .send()
            .await;
        self.finish("setWebhook", response).await
    }

    async fn finish(
        &self,
        method: &str,
        response: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<(), TransportError> {
        let result = match response {
            Ok(response) => check_response(method, response).await,
            Err(e) => Err(TransportError::Http(e)),
        };

        TELEGRAM_REQUESTS_TOTAL
            .with_label_values(&[method, crate::metrics::status_label(&result)])
            .inc();
        result
    }
}

#[async_trait]
impl BotTransport for TelegramClient {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&ReplyKeyboardMarkup>,
    ) -> Result<(), TransportError> {
        let response = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&SendMessageRequest {
                chat_id,
                text,
                reply_markup: keyboard,
            })
            .send()
            .await;
        self.finish("sendMessage", response).await
    }

    async fn send_photo(&self, chat_id: ChatId, path: &Path) -> Result<(), TransportError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                TransportError::FileNotFound(path.to_path_buf())
            } else {
                TransportError::File {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        let form = multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .part("photo", multipart::Part::bytes(bytes).file_name(file_name));

        let response = self
            .http
            .post(self.method_url("sendPhoto"))
            .multipart(form)
            .send()
            .await;
        self.finish("sendPhoto", response).await
    }
}

async fn check_response(
    method: &str,
    response: reqwest::Response,
) -> Result<(), TransportError> {
    let status = response.status();
    let body: Option<ApiResponse> = response.json().await.ok();

    match body {
        Some(body) if body.ok => Ok(()),
        Some(body) => Err(TransportError::Api {
            method: method.to_string(),
            description: body
                .description
                .unwrap_or_else(|| format!("HTTP {}", status)),
        }),
        None => Err(TransportError::Api {
            method: method.to_string(),
            description: format!("unexpected response (HTTP {})", status),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_url_includes_token() {
        let client = TelegramClient::new("https://api.telegram.org/", "123:abc");
        assert_eq!(
            client.method_url("sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[tokio::test]
    async fn missing_photo_is_reported_before_any_request() {
        let client = TelegramClient::new("http://127.0.0.1:9", "token");
        let dir = tempfile::tempdir().unwrap();

        let err = client
            .send_photo(ChatId(1), &dir.path().join("missing.png"))
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::FileNotFound(_)));
    }
}
