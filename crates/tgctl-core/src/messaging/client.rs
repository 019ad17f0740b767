use std::{path::Path, sync::Arc};

use tracing::{error, info};

use crate::{
    domain::ChatId,
    errors::Error,
    messaging::{
        port::BotApi,
        types::{BotIdentity, ChatInfo, FormatMode, InlineKeyboard, SentMessage, Update},
    },
    Result,
};

/// High-level bot client.
///
/// Wraps a [`BotApi`] with the configured default chat id: any send without an
/// explicit destination goes to the default, or fails with a config error.
#[derive(Clone)]
pub struct BotClient {
    api: Arc<dyn BotApi>,
    default_chat_id: Option<ChatId>,
}

impl BotClient {
    pub fn new(api: Arc<dyn BotApi>, default_chat_id: Option<ChatId>) -> Self {
        Self {
            api,
            default_chat_id,
        }
    }

    pub fn default_chat_id(&self) -> Option<&ChatId> {
        self.default_chat_id.as_ref()
    }

    fn resolve(&self, chat_id: Option<&ChatId>) -> Result<ChatId> {
        chat_id
            .or(self.default_chat_id.as_ref())
            .cloned()
            .ok_or_else(|| {
                Error::Config("No chat_id provided and no default chat_id set".to_string())
            })
    }

    pub async fn get_identity(&self) -> Result<BotIdentity> {
        self.api
            .get_identity()
            .await
            .inspect_err(|e| error!("failed to get bot info: {e}"))
    }

    pub async fn get_chat(&self, chat_id: &ChatId) -> Result<ChatInfo> {
        self.api
            .get_chat(chat_id)
            .await
            .inspect_err(|e| error!("failed to get chat info: {e}"))
    }

    pub async fn send_text(
        &self,
        text: &str,
        chat_id: Option<&ChatId>,
        format: FormatMode,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<SentMessage> {
        let chat_id = self.resolve(chat_id)?;
        let sent = self
            .api
            .send_text(&chat_id, text, format, keyboard)
            .await
            .inspect_err(|e| error!("failed to send message: {e}"))?;
        info!("message sent to {chat_id}: {}", sent.message_id.0);
        Ok(sent)
    }

    pub async fn send_photo(
        &self,
        path: &Path,
        chat_id: Option<&ChatId>,
        caption: Option<&str>,
    ) -> Result<SentMessage> {
        let chat_id = self.resolve(chat_id)?;
        ensure_exists(path)?;
        let sent = self
            .api
            .send_photo(&chat_id, path, caption)
            .await
            .inspect_err(|e| error!("failed to send photo: {e}"))?;
        info!("photo sent to {chat_id}: {}", sent.message_id.0);
        Ok(sent)
    }

    pub async fn send_document(
        &self,
        path: &Path,
        chat_id: Option<&ChatId>,
        caption: Option<&str>,
    ) -> Result<SentMessage> {
        let chat_id = self.resolve(chat_id)?;
        ensure_exists(path)?;
        let sent = self
            .api
            .send_document(&chat_id, path, caption)
            .await
            .inspect_err(|e| error!("failed to send document: {e}"))?;
        info!("document sent to {chat_id}: {}", sent.message_id.0);
        Ok(sent)
    }

    pub async fn get_updates(&self, offset: Option<i32>) -> Result<Vec<Update>> {
        self.api
            .get_updates(offset)
            .await
            .inspect_err(|e| error!("failed to get updates: {e}"))
    }
}

fn ensure_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        error!("attachment not found: {}", path.display());
        Err(Error::FileNotFound(path.to_path_buf()))
    }
}
