use std::sync::OnceLock;

use regex::Regex;

use crate::{contacts::ContactStore, domain::ChatId, errors::Error, Result};

/// Where a command should deliver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// Configured default chat id (resolved by the bot client).
    Default,
    Explicit(ChatId),
    Contact { name: String, chat_id: ChatId },
}

impl Target {
    /// Resolve CLI flags in priority order: `--use-default`, `--to`, legacy `--chat-id`.
    ///
    /// `--to` accepts a chat id (optional leading `-`, digits) or a contact name.
    pub fn resolve(
        to: Option<&str>,
        chat_id: Option<&str>,
        use_default: bool,
        contacts: &ContactStore,
    ) -> Result<Self> {
        if use_default {
            return Ok(Target::Default);
        }

        if let Some(to) = to.map(str::trim).filter(|s| !s.is_empty()) {
            if looks_like_chat_id(to) {
                return Ok(Target::Explicit(ChatId::new(to)));
            }
            return match contacts.get_chat_id(to) {
                Some(id) => Ok(Target::Contact {
                    name: to.to_string(),
                    chat_id: ChatId::new(id),
                }),
                None => Err(Error::ContactNotFound(to.to_string())),
            };
        }

        if let Some(id) = chat_id.map(str::trim).filter(|s| !s.is_empty()) {
            return Ok(Target::Explicit(ChatId::new(id)));
        }

        Err(Error::MissingTarget(
            "Please specify --to <name|chat_id> or --use-default".to_string(),
        ))
    }

    pub fn chat_id(&self) -> Option<&ChatId> {
        match self {
            Target::Default => None,
            Target::Explicit(id) => Some(id),
            Target::Contact { chat_id, .. } => Some(chat_id),
        }
    }

    pub fn contact_name(&self) -> Option<&str> {
        match self {
            Target::Contact { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Numeric chat id; leading `-` marks groups and channels.
pub fn looks_like_chat_id(s: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-*\d+$").expect("valid regex"))
        .is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contacts() -> (tempfile::TempDir, ContactStore) {
        let dir = tempfile::tempdir().unwrap();
        let mut s = ContactStore::open(dir.path().join("contacts.json"));
        s.add("John", "111", "private", None).unwrap();
        (dir, s)
    }

    #[test]
    fn numeric_to_is_explicit() {
        let (_d, c) = contacts();
        assert_eq!(
            Target::resolve(Some("-1001234"), None, false, &c).unwrap(),
            Target::Explicit(ChatId::new("-1001234"))
        );
    }

    #[test]
    fn name_to_resolves_through_contacts() {
        let (_d, c) = contacts();
        let t = Target::resolve(Some("john"), None, false, &c).unwrap();
        assert_eq!(t.chat_id(), Some(&ChatId::new("111")));
        assert_eq!(t.contact_name(), Some("john"));
    }

    #[test]
    fn unknown_name_is_config_error() {
        let (_d, c) = contacts();
        let err = Target::resolve(Some("Missing"), None, false, &c).unwrap_err();
        assert!(matches!(err, Error::ContactNotFound(ref n) if n == "Missing"));
        assert!(err.is_config());
        assert_eq!(err.to_string(), "Contact not found: Missing");
    }

    #[test]
    fn use_default_wins_and_nothing_is_an_error() {
        let (_d, c) = contacts();
        assert_eq!(
            Target::resolve(Some("john"), Some("5"), true, &c).unwrap(),
            Target::Default
        );
        assert_eq!(
            Target::resolve(None, Some("5"), false, &c).unwrap(),
            Target::Explicit(ChatId::new("5"))
        );
        let err = Target::resolve(None, None, false, &c).unwrap_err();
        assert!(matches!(err, Error::MissingTarget(_)));
        assert!(err.is_config());
        assert_eq!(Target::Default.chat_id(), None);
    }

    #[test]
    fn chat_id_shape() {
        assert!(looks_like_chat_id("123"));
        assert!(looks_like_chat_id("-100123"));
        assert!(!looks_like_chat_id("@channel"));
        assert!(!looks_like_chat_id("John"));
        assert!(!looks_like_chat_id(""));
    }
}
