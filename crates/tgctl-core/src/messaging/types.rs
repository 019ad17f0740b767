use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::{ChatId, MessageId, UserId};

/// Identity and capability flags of the bot itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotIdentity {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub is_bot: bool,
    pub can_join_groups: bool,
    pub can_read_all_group_messages: bool,
    pub supports_inline_queries: bool,
}

/// Chat type as reported by the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatKind::Private => "private",
            ChatKind::Group => "group",
            ChatKind::Supergroup => "supergroup",
            ChatKind::Channel => "channel",
        }
    }

    pub fn is_private(self) -> bool {
        self == ChatKind::Private
    }
}

impl fmt::Display for ChatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full chat metadata (`getChat`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatInfo {
    pub id: ChatId,
    pub kind: ChatKind,
    pub title: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub description: Option<String>,
}

/// Chat fields carried on an incoming message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatSummary {
    pub id: ChatId,
    pub kind: ChatKind,
    pub title: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Sender of an incoming message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserSummary {
    pub id: UserId,
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateMessage {
    pub message_id: MessageId,
    pub date: DateTime<Utc>,
    pub chat: ChatSummary,
    pub from: Option<UserSummary>,
    pub text: Option<String>,
}

/// A unit of inbound activity retrieved by polling.
///
/// Only message updates carry a payload; other update kinds keep just their id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Update {
    pub update_id: i32,
    pub message: Option<UpdateMessage>,
}

/// Outcome of any send operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentMessage {
    pub message_id: MessageId,
    pub chat_id: ChatId,
    pub date: DateTime<Utc>,
    pub text: Option<String>,
}

/// Text formatting mode for outgoing messages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatMode {
    #[default]
    Plain,
    /// Telegram MarkdownV2.
    Markdown,
    Html,
}

/// Inline keyboard (rows of callback buttons).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub callback_data: String,
}

impl InlineKeyboard {
    /// Build from label rows; each label doubles as its callback payload.
    pub fn from_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Self {
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|label| InlineButton {
                        label: label.as_ref().to_string(),
                        callback_data: label.as_ref().to_string(),
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub fn button_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_labels_double_as_callback_data() {
        let kb = InlineKeyboard::from_rows(&[vec!["Yes", "No"], vec!["Maybe"]]);
        assert_eq!(kb.rows.len(), 2);
        assert_eq!(kb.button_count(), 3);
        assert_eq!(kb.rows[1][0].label, "Maybe");
        assert_eq!(kb.rows[1][0].callback_data, "Maybe");
    }

    #[test]
    fn chat_kind_strings() {
        assert_eq!(ChatKind::Supergroup.to_string(), "supergroup");
        assert!(ChatKind::Private.is_private());
        assert!(!ChatKind::Channel.is_private());
    }
}
