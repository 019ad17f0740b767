//! Local contact store: friendly name → chat id, persisted as one JSON document.
//!
//! Keys are the lower-cased display name. The whole file is rewritten after
//! every mutation; there is no locking, so concurrent writers race (last wins).

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::{discovery::DiscoveredChat, Result};

pub const DEFAULT_KIND: &str = "private";

/// A saved destination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Display name, original casing preserved.
    pub name: String,
    /// Hand-edited files may carry a bare number here.
    #[serde(deserialize_with = "chat_id_text")]
    pub chat_id: String,
    /// `private | group | supergroup | channel`; free-form at this layer.
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl Contact {
    pub fn is_private(&self) -> bool {
        self.kind == DEFAULT_KIND
    }
}

fn chat_id_text<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(d)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
    })
}

fn default_kind() -> String {
    DEFAULT_KIND.to_string()
}

fn key_for(name: &str) -> String {
    name.to_lowercase()
}

#[derive(Clone, Debug)]
struct Entry {
    key: String,
    contact: Contact,
}

/// File-backed contact registry.
#[derive(Debug)]
pub struct ContactStore {
    path: PathBuf,
    // Insertion order is observable through `search`.
    entries: Vec<Entry>,
    load_warning: Option<String>,
}

impl ContactStore {
    /// Load the store; an absent file is an empty store, a malformed one is an
    /// empty store plus a warning.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (entries, load_warning) = match load_entries(&path) {
            Ok(entries) => (entries, None),
            Err(reason) => {
                let msg = format!("Could not parse {}, starting fresh", path.display());
                warn!("{msg}: {reason}");
                (Vec::new(), Some(msg))
            }
        };
        Self {
            path,
            entries,
            load_warning,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_warning(&self) -> Option<&str> {
        self.load_warning.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        let key = key_for(name);
        self.entries.iter().position(|e| e.key == key)
    }

    /// Add or overwrite a contact. Returns `true` when the key was new.
    pub fn add(
        &mut self,
        name: &str,
        chat_id: &str,
        kind: &str,
        title: Option<&str>,
    ) -> Result<bool> {
        let contact = Contact {
            name: name.to_string(),
            chat_id: chat_id.to_string(),
            kind: kind.to_string(),
            title: title.map(str::to_string),
        };

        let is_new = match self.position(name) {
            Some(idx) => {
                self.entries[idx].contact = contact;
                false
            }
            None => {
                self.entries.push(Entry {
                    key: key_for(name),
                    contact,
                });
                true
            }
        };

        self.save()?;
        Ok(is_new)
    }

    /// Delete a contact. Persists only when something was removed.
    pub fn remove(&mut self, name: &str) -> Result<bool> {
        let Some(idx) = self.position(name) else {
            return Ok(false);
        };
        self.entries.remove(idx);
        self.save()?;
        Ok(true)
    }

    pub fn get_chat_id(&self, name: &str) -> Option<&str> {
        self.get_contact(name).map(|c| c.chat_id.as_str())
    }

    pub fn get_contact(&self, name: &str) -> Option<&Contact> {
        self.position(name).map(|idx| &self.entries[idx].contact)
    }

    /// Case-insensitive substring match on key or display name, in insertion order.
    pub fn search(&self, query: &str) -> Vec<&Contact> {
        let q = query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.key.contains(&q) || e.contact.name.to_lowercase().contains(&q))
            .map(|e| &e.contact)
            .collect()
    }

    /// All contacts sorted by display name, case-insensitively.
    pub fn list_all(&self) -> Vec<&Contact> {
        let mut out: Vec<&Contact> = self.entries.iter().map(|e| &e.contact).collect();
        out.sort_by_cached_key(|c| c.name.to_lowercase());
        out
    }

    /// Merge chats discovered from recent updates.
    ///
    /// A candidate is skipped when its derived name already resolves, so two
    /// chats deriving the same name keep only the first. Returns the number of
    /// contacts actually added.
    pub fn import_from_chats(&mut self, chats: &[DiscoveredChat]) -> Result<usize> {
        let mut imported = 0usize;

        for found in chats {
            let chat = &found.chat;
            let chat_id = chat.id.as_str();
            let kind = chat.kind.as_str();

            let (name, title) = if chat.kind.is_private() {
                let name = chat
                    .first_name
                    .clone()
                    .filter(|s| !s.is_empty())
                    .or_else(|| chat.username.clone().filter(|s| !s.is_empty()))
                    .unwrap_or_else(|| format!("User_{chat_id}"));
                let title = format!(
                    "{} {}",
                    chat.first_name.as_deref().unwrap_or_default(),
                    chat.last_name.as_deref().unwrap_or_default()
                )
                .trim()
                .to_string();
                (name, Some(title))
            } else {
                let name = chat
                    .title
                    .clone()
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| format!("{kind}_{chat_id}"));
                (name, chat.title.clone())
            };

            if self.get_chat_id(&name).is_none() {
                self.add(&name, chat_id, kind, title.as_deref())?;
                imported += 1;
            }
        }

        Ok(imported)
    }

    fn save(&self) -> Result<()> {
        let mut doc = serde_json::Map::new();
        for e in &self.entries {
            doc.insert(e.key.clone(), serde_json::to_value(&e.contact)?);
        }
        let txt = serde_json::to_string_pretty(&serde_json::Value::Object(doc))?;
        fs::write(&self.path, txt)?;
        Ok(())
    }
}

fn load_entries(path: &Path) -> std::result::Result<Vec<Entry>, String> {
    let txt = match fs::read_to_string(path) {
        Ok(txt) => txt,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.to_string()),
    };
    if txt.trim().is_empty() {
        return Ok(Vec::new());
    }

    let doc: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&txt).map_err(|e| e.to_string())?;

    doc.into_iter()
        .map(|(key, value)| {
            let contact: Contact = serde_json::from_value(value).map_err(|e| e.to_string())?;
            Ok(Entry { key, contact })
        })
        .collect()
}
