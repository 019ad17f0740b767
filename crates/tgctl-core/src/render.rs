//! Terminal rendering for command output.
//!
//! Everything here returns a `String` so the CLI stays a thin print layer.

use std::fmt::Write;

use crate::{
    attachments::{Attachment, AttachmentWarning, PHOTO_EXTENSIONS},
    contacts::Contact,
    discovery::DiscoveredChat,
    domain::ChatId,
    messaging::types::{BotIdentity, ChatInfo, ChatKind, SentMessage},
};

const LATEST_TEXT_PREVIEW: usize = 50;

fn or_na(v: Option<&str>) -> &str {
    v.filter(|s| !s.is_empty()).unwrap_or("N/A")
}

fn yes_no(v: bool) -> &'static str {
    if v {
        "✅ Yes"
    } else {
        "❌ No"
    }
}

fn contact_icon(c: &Contact) -> &'static str {
    if c.is_private() {
        "👤"
    } else {
        "👥"
    }
}

/// Char-boundary-safe preview.
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}

pub fn connection_ok(me: &BotIdentity, default_chat: Option<&ChatId>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "✅ Bot connection successful!\n");
    let _ = writeln!(out, "📋 Bot Information:");
    let _ = writeln!(out, "   ID: {}", me.id.0);
    let _ = writeln!(out, "   Username: @{}", me.username);
    let _ = writeln!(out, "   Name: {}", me.first_name);
    let _ = writeln!(out, "   Can Join Groups: {}", me.can_join_groups);
    let _ = writeln!(
        out,
        "   Can Read All Group Messages: {}",
        me.can_read_all_group_messages
    );
    let _ = writeln!(
        out,
        "   Supports Inline Queries: {}",
        me.supports_inline_queries
    );
    let _ = writeln!(out, "\n✅ Your bot is ready to use!");
    match default_chat {
        Some(id) => {
            let _ = writeln!(out, "\n💬 Default chat ID is set: {id}");
        }
        None => {
            let _ = writeln!(
                out,
                "\n💡 Tip: Set DEFAULT_CHAT_ID in your credentials file for easier messaging"
            );
        }
    }
    out
}

pub fn bot_info(me: &BotIdentity, default_chat: Option<&ChatId>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📋 Bot Details:\n");
    let _ = writeln!(out, "   Bot ID: {}", me.id.0);
    let _ = writeln!(out, "   Username: @{}", me.username);
    let _ = writeln!(out, "   First Name: {}", me.first_name);
    let _ = writeln!(out, "   Is Bot: {}", me.is_bot);
    let _ = writeln!(out);
    let _ = writeln!(out, "⚙️  Capabilities:\n");
    let _ = writeln!(out, "   Can Join Groups: {}", yes_no(me.can_join_groups));
    let _ = writeln!(
        out,
        "   Can Read All Group Messages: {}",
        yes_no(me.can_read_all_group_messages)
    );
    let _ = writeln!(
        out,
        "   Supports Inline Queries: {}",
        yes_no(me.supports_inline_queries)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "🔗 Bot Link:");
    let _ = writeln!(out, "   https://t.me/{}", me.username);
    let _ = writeln!(out);
    match default_chat {
        Some(id) => {
            let _ = writeln!(out, "💬 Default Chat ID: {id}");
        }
        None => {
            let _ = writeln!(out, "💡 No default chat ID set");
            let _ = writeln!(out, "   To set one, add DEFAULT_CHAT_ID to your credentials file");
        }
    }
    out
}

pub fn chat_info(info: &ChatInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "✅ Chat Information:\n");
    let _ = writeln!(out, "   Chat ID: {}", info.id);
    let _ = writeln!(out, "   Type: {}", info.kind);

    if info.kind.is_private() {
        let _ = writeln!(out, "   First Name: {}", or_na(info.first_name.as_deref()));
        let _ = writeln!(out, "   Last Name: {}", or_na(info.last_name.as_deref()));
        if let Some(u) = &info.username {
            let _ = writeln!(out, "   Username: @{u}");
        }
    } else {
        let _ = writeln!(out, "   Title: {}", or_na(info.title.as_deref()));
        if let Some(u) = &info.username {
            let _ = writeln!(out, "   Username: @{u}");
        }
        if let Some(d) = info.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "   Description: {d}");
        }
    }

    let _ = writeln!(out, "\n💡 To send a message to this chat:");
    let _ = writeln!(
        out,
        "   tgctl send-message --to {} --message \"Your message\"",
        info.id
    );
    out
}

pub fn chat_list(update_count: usize, chats: &[DiscoveredChat]) -> String {
    let mut out = String::new();
    if update_count == 0 {
        let _ = writeln!(out, "📭 No recent messages found.");
        let _ = writeln!(out, "\n💡 Tips:");
        let _ = writeln!(out, "   1. Send a message to your bot on Telegram");
        let _ = writeln!(out, "   2. Run this command again to see the chat ID");
        let _ = writeln!(
            out,
            "   3. For groups, add the bot and send a message in the group"
        );
        return out;
    }

    let _ = writeln!(out, "✅ Found {update_count} recent update(s)\n");
    let _ = writeln!(out, "📬 Unique Chats ({}):\n", chats.len());

    for (i, found) in chats.iter().enumerate() {
        let chat = &found.chat;
        let _ = writeln!(out, "{}. Chat ID: {}", i + 1, chat.id);
        let _ = writeln!(out, "   Type: {}", chat.kind);
        match chat.kind {
            ChatKind::Private => {
                let _ = writeln!(
                    out,
                    "   User: {} (@{})",
                    or_na(chat.first_name.as_deref()),
                    or_na(chat.username.as_deref())
                );
            }
            ChatKind::Group | ChatKind::Supergroup => {
                let _ = writeln!(out, "   Group: {}", or_na(chat.title.as_deref()));
                if let Some(u) = &chat.username {
                    let _ = writeln!(out, "   Username: @{u}");
                }
            }
            ChatKind::Channel => {
                let _ = writeln!(out, "   Channel: {}", or_na(chat.title.as_deref()));
            }
        }
        if let Some(from) = &found.from {
            let _ = writeln!(
                out,
                "   Last From: {} (@{})",
                or_na(Some(from.first_name.as_str())),
                or_na(from.username.as_deref())
            );
        }
        let text = found.latest_text.as_deref().unwrap_or("(no text)");
        let _ = writeln!(out, "   Latest: {}", preview(text, LATEST_TEXT_PREVIEW));
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "💡 To send a message, use:");
    let _ = writeln!(
        out,
        "   tgctl send-message --to <CHAT_ID> --message \"Your message\""
    );
    let _ = writeln!(out, "\n💡 To set a default chat, add to your credentials file:");
    let _ = writeln!(out, "   DEFAULT_CHAT_ID=<CHAT_ID>");
    out
}

/// Confirmation for any send; `what` is e.g. "Message" or "Photo".
pub fn sent(what: &str, msg: &SentMessage, contact: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "✅ {what} sent successfully!");
    if let Some(name) = contact {
        let _ = writeln!(out, "   To: {name}");
    }
    let _ = writeln!(out, "   Message ID: {}", msg.message_id.0);
    let _ = writeln!(out, "   Chat ID: {}", msg.chat_id);
    let _ = writeln!(out, "   Time: {}", msg.date.to_rfc3339());
    out
}

pub fn attachment_warnings(att: &Attachment) -> String {
    let mut out = String::new();
    for w in &att.warnings {
        match w {
            AttachmentWarning::UnusualPhotoFormat { extension } => {
                let shown = if extension.is_empty() {
                    "(no extension)".to_string()
                } else {
                    format!(".{extension}")
                };
                let _ = writeln!(out, "⚠️  Warning: {shown} might not be a valid image format");
                let valid = PHOTO_EXTENSIONS
                    .iter()
                    .map(|e| format!(".{e}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                let _ = writeln!(out, "   Valid formats: {valid}");
            }
            AttachmentWarning::LargePhoto { size_mb } => {
                let _ = writeln!(out, "⚠️  Warning: Photo is {size_mb:.2} MB");
                let _ = writeln!(
                    out,
                    "   Telegram recommends photos under 10 MB for best quality"
                );
            }
            AttachmentWarning::DocumentTooLarge { size_mb } => {
                let _ = writeln!(out, "⚠️  Warning: File is {size_mb:.2} MB");
                let _ = writeln!(out, "   Telegram bot API has a 50 MB file size limit");
                let _ = writeln!(
                    out,
                    "   Consider using a file hosting service for larger files"
                );
            }
        }
    }
    out
}

pub fn contact_list(contacts: &[&Contact]) -> String {
    let mut out = String::new();
    if contacts.is_empty() {
        let _ = writeln!(out, "📭 No contacts saved yet.");
        let _ = writeln!(out, "\n💡 Tips:");
        let _ = writeln!(out, "   1. Run: tgctl contacts import");
        let _ = writeln!(out, "   2. Or add manually: tgctl contacts add <name> <chat_id>");
        return out;
    }

    let _ = writeln!(out, "\n📇 Contacts ({}):\n", contacts.len());
    for c in contacts {
        let _ = writeln!(out, "{} {}", contact_icon(c), c.name);
        let _ = writeln!(out, "   Chat ID: {}", c.chat_id);
        let _ = writeln!(out, "   Type: {}", c.kind);
        if let Some(t) = c.title.as_deref().filter(|t| !t.is_empty()) {
            let _ = writeln!(out, "   Title: {t}");
        }
        let _ = writeln!(out);
    }
    out
}

pub fn search_results(query: &str, results: &[&Contact]) -> String {
    if results.is_empty() {
        return format!("❌ No contacts found matching: {query}\n");
    }
    let mut out = String::new();
    let _ = writeln!(out, "\n🔍 Found {} contact(s):\n", results.len());
    for c in results {
        let _ = writeln!(out, "{} {} → {}", contact_icon(c), c.name, c.chat_id);
    }
    out
}

/// Shown when `--to <name>` does not resolve.
pub fn contact_suggestions(contacts: &[&Contact]) -> String {
    const SHOWN: usize = 5;
    let mut out = String::new();
    let _ = writeln!(out, "\n💡 Available contacts:");
    if contacts.is_empty() {
        let _ = writeln!(out, "   (none)");
    } else {
        for c in contacts.iter().take(SHOWN) {
            let _ = writeln!(out, "   - {}", c.name);
        }
        if contacts.len() > SHOWN {
            let _ = writeln!(out, "   ... and {} more", contacts.len() - SHOWN);
        }
    }
    let _ = writeln!(out, "\n💡 Import contacts: tgctl contacts import");
    let _ = writeln!(out, "💡 Add contact: tgctl contacts add <name> <chat_id>");
    out
}
