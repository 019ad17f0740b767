//! Telegram adapter (teloxide).
//!
//! This crate implements the `tgctl-core` [`BotApi`] port over the Telegram Bot API.

use std::path::Path;

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{
        Chat, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, ParseMode, Recipient,
        UpdateKind, User,
    },
};

use tokio::time::sleep;
use tracing::warn;

use tgctl_core::{
    config::Config,
    domain::{ChatId, MessageId, UserId},
    errors::Error,
    messaging::{
        port::BotApi,
        types::{
            BotIdentity, ChatInfo, ChatKind, ChatSummary, FormatMode, InlineKeyboard, SentMessage,
            Update, UpdateMessage, UserSummary,
        },
    },
    Result,
};

/// Long-poll timeout for `getUpdates`, in seconds.
const UPDATES_TIMEOUT_SECS: u32 = 10;

#[derive(Clone)]
pub struct TelegramBotApi {
    bot: Bot,
}

impl TelegramBotApi {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(Bot::new(cfg.telegram_bot_token.clone()))
    }

    /// Numeric ids go out as chat ids; anything else is a public `@username`.
    fn recipient(chat_id: &ChatId) -> Recipient {
        let raw = chat_id.as_str().trim();
        match raw.parse::<i64>() {
            Ok(id) => Recipient::Id(teloxide::types::ChatId(id)),
            Err(_) if raw.starts_with('@') => Recipient::ChannelUsername(raw.to_string()),
            Err(_) => Recipient::ChannelUsername(format!("@{raw}")),
        }
    }

    fn parse_mode(format: FormatMode) -> Option<ParseMode> {
        match format {
            FormatMode::Plain => None,
            FormatMode::Markdown => Some(ParseMode::MarkdownV2),
            FormatMode::Html => Some(ParseMode::Html),
        }
    }

    fn markup(keyboard: InlineKeyboard) -> InlineKeyboardMarkup {
        let rows: Vec<Vec<InlineKeyboardButton>> = keyboard
            .rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|b| InlineKeyboardButton::callback(b.label, b.callback_data))
                    .collect()
            })
            .collect();
        InlineKeyboardMarkup::new(rows)
    }

    fn chat_kind(chat: &Chat) -> ChatKind {
        if chat.is_private() {
            ChatKind::Private
        } else if chat.is_channel() {
            ChatKind::Channel
        } else if chat.is_supergroup() {
            ChatKind::Supergroup
        } else {
            ChatKind::Group
        }
    }

    fn chat_summary(chat: &Chat) -> ChatSummary {
        ChatSummary {
            id: ChatId::from(chat.id.0),
            kind: Self::chat_kind(chat),
            title: chat.title().map(str::to_string),
            username: chat.username().map(str::to_string),
            first_name: chat.first_name().map(str::to_string),
            last_name: chat.last_name().map(str::to_string),
        }
    }

    fn user_summary(user: &User) -> UserSummary {
        UserSummary {
            id: UserId(user.id.0),
            is_bot: user.is_bot,
            first_name: user.first_name.clone(),
            username: user.username.clone(),
        }
    }

    fn sent(msg: &Message) -> SentMessage {
        SentMessage {
            message_id: MessageId(msg.id.0),
            chat_id: ChatId::from(msg.chat.id.0),
            date: msg.date,
            text: msg.text().map(str::to_string),
        }
    }

    fn update(update: &teloxide::types::Update) -> Update {
        let message = match &update.kind {
            UpdateKind::Message(msg) => Some(UpdateMessage {
                message_id: MessageId(msg.id.0),
                date: msg.date,
                chat: Self::chat_summary(&msg.chat),
                from: msg.from().map(Self::user_summary),
                text: msg.text().map(str::to_string),
            }),
            _ => None,
        };
        Update {
            update_id: update.id,
            message,
        }
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::Remote(format!("telegram error: {e}"))
    }

    /// Run a request, honouring one flood-control `RetryAfter` before giving up.
    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
        Fut::IntoFuture: Send,
    {
        match op().await {
            Err(teloxide::RequestError::RetryAfter(delay)) => {
                warn!("flood control: retrying after {delay:?}");
                sleep(delay).await;
                op().await.map_err(Self::map_err)
            }
            first => first.map_err(Self::map_err),
        }
    }
}

#[async_trait]
impl BotApi for TelegramBotApi {
    async fn get_identity(&self) -> Result<BotIdentity> {
        let me = self.with_retry(|| self.bot.get_me()).await?;
        Ok(BotIdentity {
            id: UserId(me.user.id.0),
            username: me.username().to_string(),
            first_name: me.user.first_name.clone(),
            is_bot: me.user.is_bot,
            can_join_groups: me.can_join_groups,
            can_read_all_group_messages: me.can_read_all_group_messages,
            supports_inline_queries: me.supports_inline_queries,
        })
    }

    async fn get_chat(&self, chat_id: &ChatId) -> Result<ChatInfo> {
        let chat = self
            .with_retry(|| self.bot.get_chat(Self::recipient(chat_id)))
            .await?;
        let summary = Self::chat_summary(&chat);
        Ok(ChatInfo {
            id: summary.id,
            kind: summary.kind,
            title: summary.title,
            username: summary.username,
            first_name: summary.first_name,
            last_name: summary.last_name,
            description: chat.description().map(str::to_string),
        })
    }

    async fn send_text(
        &self,
        chat_id: &ChatId,
        text: &str,
        format: FormatMode,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<SentMessage> {
        let markup = keyboard.map(Self::markup);
        let parse_mode = Self::parse_mode(format);

        let msg = self
            .with_retry(|| {
                let mut req = self
                    .bot
                    .send_message(Self::recipient(chat_id), text.to_string());
                if let Some(mode) = parse_mode {
                    req = req.parse_mode(mode);
                }
                if let Some(m) = &markup {
                    req = req.reply_markup(m.clone());
                }
                req
            })
            .await?;

        Ok(Self::sent(&msg))
    }

    async fn send_photo(
        &self,
        chat_id: &ChatId,
        path: &Path,
        caption: Option<&str>,
    ) -> Result<SentMessage> {
        let msg = self
            .with_retry(|| {
                let mut req = self.bot.send_photo(
                    Self::recipient(chat_id),
                    InputFile::file(path.to_path_buf()),
                );
                if let Some(c) = caption {
                    req = req.caption(c.to_string());
                }
                req
            })
            .await?;

        Ok(Self::sent(&msg))
    }

    async fn send_document(
        &self,
        chat_id: &ChatId,
        path: &Path,
        caption: Option<&str>,
    ) -> Result<SentMessage> {
        let msg = self
            .with_retry(|| {
                let mut req = self.bot.send_document(
                    Self::recipient(chat_id),
                    InputFile::file(path.to_path_buf()),
                );
                if let Some(c) = caption {
                    req = req.caption(c.to_string());
                }
                req
            })
            .await?;

        Ok(Self::sent(&msg))
    }

    async fn get_updates(&self, offset: Option<i32>) -> Result<Vec<Update>> {
        let updates = self
            .with_retry(|| {
                let mut req = self.bot.get_updates().timeout(UPDATES_TIMEOUT_SECS);
                if let Some(o) = offset {
                    req = req.offset(o);
                }
                req
            })
            .await?;

        Ok(updates.iter().map(Self::update).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_become_chat_ids() {
        match TelegramBotApi::recipient(&ChatId::new("-100123")) {
            Recipient::Id(id) => assert_eq!(id.0, -100123),
            other => panic!("unexpected recipient: {other:?}"),
        }
    }

    #[test]
    fn names_become_channel_usernames() {
        match TelegramBotApi::recipient(&ChatId::new("mychannel")) {
            Recipient::ChannelUsername(u) => assert_eq!(u, "@mychannel"),
            other => panic!("unexpected recipient: {other:?}"),
        }
        match TelegramBotApi::recipient(&ChatId::new("@news")) {
            Recipient::ChannelUsername(u) => assert_eq!(u, "@news"),
            other => panic!("unexpected recipient: {other:?}"),
        }
    }

    #[test]
    fn parse_modes() {
        assert_eq!(TelegramBotApi::parse_mode(FormatMode::Plain), None);
        assert_eq!(
            TelegramBotApi::parse_mode(FormatMode::Markdown),
            Some(ParseMode::MarkdownV2)
        );
        assert_eq!(
            TelegramBotApi::parse_mode(FormatMode::Html),
            Some(ParseMode::Html)
        );
    }

    #[test]
    fn keyboard_rows_are_preserved() {
        let kb = InlineKeyboard::from_rows(&[vec!["A", "B"], vec!["C"]]);
        let markup = TelegramBotApi::markup(kb);
        assert_eq!(markup.inline_keyboard.len(), 2);
        assert_eq!(markup.inline_keyboard[0].len(), 2);
        assert_eq!(markup.inline_keyboard[1][0].text, "C");
    }
}
