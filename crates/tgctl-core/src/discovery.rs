use std::collections::HashSet;

use crate::messaging::types::{ChatSummary, Update, UserSummary};

/// A chat seen in recent updates, with the first message that revealed it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveredChat {
    pub chat: ChatSummary,
    pub from: Option<UserSummary>,
    pub latest_text: Option<String>,
    pub update_id: i32,
}

/// Unique chats in update order; the first update per chat id wins.
pub fn unique_chats(updates: &[Update]) -> Vec<DiscoveredChat> {
    let mut seen = HashSet::new();
    updates
        .iter()
        .filter_map(|u| u.message.as_ref().map(|m| (u.update_id, m)))
        .filter(|(_, m)| seen.insert(m.chat.id.clone()))
        .map(|(update_id, m)| DiscoveredChat {
            chat: m.chat.clone(),
            from: m.from.clone(),
            latest_text: m.text.clone(),
            update_id,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChatId;
    use crate::messaging::client::tests::private_update;

    #[test]
    fn keeps_first_update_per_chat() {
        let updates = vec![
            private_update(1, 10, "Ann"),
            private_update(2, 20, "Ben"),
            Update {
                update_id: 3,
                message: None,
            },
            private_update(4, 10, "Ann again"),
        ];

        let chats = unique_chats(&updates);
        assert_eq!(chats.len(), 2);
        assert_eq!(chats[0].chat.id, ChatId::new("10"));
        assert_eq!(chats[0].update_id, 1);
        assert_eq!(chats[0].latest_text.as_deref(), Some("hi from Ann"));
        assert_eq!(chats[1].chat.id, ChatId::new("20"));
    }

    #[test]
    fn no_updates_no_chats() {
        assert!(unique_chats(&[]).is_empty());
    }
}
