use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::TransportError;
use crate::models::{ChatId, Reply, Update};

use super::bot_service::{BotService, GENERIC_FAILURE};
use super::telegram_client::BotTransport;

/// Single consumer of the inbound update queue. Processing one update at a
/// time makes this the only writer of session and stats state.
pub struct UpdateDispatcher {
    bot: BotService,
    transport: Arc<dyn BotTransport>,
}

impl UpdateDispatcher {
    pub fn new(bot: BotService, transport: Arc<dyn BotTransport>) -> Self {
        Self { bot, transport }
    }

    pub fn bot(&self) -> &BotService {
        &self.bot
    }

    pub async fn run(self, mut updates: mpsc::Receiver<Update>) {
        tracing::info!("Update dispatcher started");
        while let Some(update) = updates.recv().await {
            self.process(update).await;
        }
        tracing::info!("Update queue closed, dispatcher stopped");
    }

    pub async fn process(&self, update: Update) {
        let Some(message) = update.message else {
            tracing::debug!("Skipping update {} without a message", update.update_id);
            return;
        };
        let chat_id = message.chat.id;

        let replies = match self.bot.dispatch(&message).await {
            Ok(replies) => replies,
            Err(e) => {
                tracing::error!("Error while handling message: {}", e);
                vec![Reply::text(GENERIC_FAILURE)]
            }
        };

        for reply in replies {
            self.deliver(chat_id, reply).await;
        }
    }

    async fn deliver(&self, chat_id: ChatId, reply: Reply) {
        let result = match &reply {
            Reply::Text { text, keyboard } => {
                self.transport
                    .send_text(chat_id, text, keyboard.as_ref())
                    .await
            }
            Reply::Photo(path) => self.transport.send_photo(chat_id, path).await,
        };

        match result {
            Ok(()) => {}
            Err(TransportError::FileNotFound(path)) => {
                tracing::error!("Test image {} not found", path.display());
                let notice = format!(
                    "File {} not found. Please check the file path.",
                    path.display()
                );
                if let Err(e) = self.transport.send_text(chat_id, &notice, None).await {
                    tracing::error!("Failed to send notice to chat {}: {}", chat_id, e);
                }
            }
            Err(e) => tracing::error!("Failed to deliver reply to chat {}: {}", chat_id, e),
        }
    }
}
