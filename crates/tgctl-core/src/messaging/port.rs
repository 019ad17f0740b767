use std::path::Path;

use async_trait::async_trait;

use crate::{
    domain::ChatId,
    messaging::types::{BotIdentity, ChatInfo, FormatMode, InlineKeyboard, SentMessage, Update},
    Result,
};

/// Remote bot platform port.
///
/// Every call is a single request/response; implementations map transport and
/// API failures into [`crate::Error::Remote`].
#[async_trait]
pub trait BotApi: Send + Sync {
    async fn get_identity(&self) -> Result<BotIdentity>;

    async fn get_chat(&self, chat_id: &ChatId) -> Result<ChatInfo>;

    async fn send_text(
        &self,
        chat_id: &ChatId,
        text: &str,
        format: FormatMode,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<SentMessage>;

    async fn send_photo(
        &self,
        chat_id: &ChatId,
        path: &Path,
        caption: Option<&str>,
    ) -> Result<SentMessage>;

    async fn send_document(
        &self,
        chat_id: &ChatId,
        path: &Path,
        caption: Option<&str>,
    ) -> Result<SentMessage>;

    /// Pending updates, starting at `offset` when given.
    async fn get_updates(&self, offset: Option<i32>) -> Result<Vec<Update>>;
}
