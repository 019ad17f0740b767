use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
};

use crate::{domain::ChatId, errors::Error, Result};

pub const DEFAULT_ENV_FILE: &str = ".env";
pub const ENV_FILE_VAR: &str = "TGCTL_ENV_FILE";
pub const CONTACTS_FILE_NAME: &str = "contacts.json";

/// Dotenv-style credentials file (`KEY=VALUE` per line).
///
/// The file may be absent; lookups then fall through to the process environment.
#[derive(Clone, Debug)]
pub struct CredentialsFile {
    path: PathBuf,
    vars: Option<HashMap<String, String>>,
}

impl CredentialsFile {
    /// Resolve the credentials file: explicit path, then `$TGCTL_ENV_FILE`, then `./.env`.
    pub fn locate(explicit: Option<&Path>) -> Self {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env_path(ENV_FILE_VAR))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE));
        Self::read(path)
    }

    pub fn read(path: PathBuf) -> Self {
        let vars = fs::read_to_string(&path).ok().map(|txt| parse_dotenv(&txt));
        Self { path, vars }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.vars.is_some()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.as_ref()?.get(key).map(String::as_str)
    }

    /// Contact store location; `CONTACTS_FILE` wins, else `contacts.json` beside this file.
    pub fn contacts_file(&self) -> PathBuf {
        self.contacts_file_with(|k| env::var(k).ok())
    }

    fn contacts_file_with(&self, env_lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
        if let Some(p) = env_lookup("CONTACTS_FILE")
            .and_then(non_empty)
            .or_else(|| self.get("CONTACTS_FILE").map(str::to_string).and_then(non_empty))
        {
            return PathBuf::from(p);
        }
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join(CONTACTS_FILE_NAME),
            _ => PathBuf::from(CONTACTS_FILE_NAME),
        }
    }
}

/// Typed configuration for the remote commands.
#[derive(Clone, Debug)]
pub struct Config {
    pub telegram_bot_token: String,
    pub default_chat_id: Option<ChatId>,
    pub env_file: PathBuf,
}

impl Config {
    /// Load from the credentials file; process environment variables take precedence.
    pub fn load(file: &CredentialsFile) -> Result<Self> {
        Self::from_sources(file, |k| env::var(k).ok())
    }

    pub fn from_sources(
        file: &CredentialsFile,
        env_lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let lookup = |key: &str| {
            env_lookup(key)
                .and_then(non_empty)
                .or_else(|| file.get(key).map(str::to_string).and_then(non_empty))
        };

        let Some(telegram_bot_token) = lookup("TELEGRAM_BOT_TOKEN") else {
            if !file.exists() {
                return Err(Error::Config(format!(
                    "No bot token provided and {} not found. Run 'tgctl init' first.",
                    file.path().display()
                )));
            }
            return Err(Error::Config(format!(
                "TELEGRAM_BOT_TOKEN not found in {}",
                file.path().display()
            )));
        };

        let default_chat_id = lookup("DEFAULT_CHAT_ID").map(ChatId);

        Ok(Self {
            telegram_bot_token: telegram_bot_token.trim().to_string(),
            default_chat_id,
            env_file: file.path().to_path_buf(),
        })
    }
}

/// Result of writing a fresh credentials file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitOutcome {
    pub env_file: PathBuf,
    pub created_gitignore: bool,
}

/// Write the credentials file, plus a `.gitignore` next to it when none exists.
pub fn write_credentials(
    path: &Path,
    token: &str,
    default_chat_id: Option<&str>,
    force: bool,
) -> Result<InitOutcome> {
    let token = token.trim();
    if token.is_empty() {
        return Err(Error::Config("Bot token is required".to_string()));
    }
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    let mut body = format!(
        "# Telegram Bot Configuration\n\
         # DO NOT commit this file to version control!\n\
         \n\
         TELEGRAM_BOT_TOKEN={token}\n"
    );
    if let Some(id) = default_chat_id.map(str::trim).filter(|s| !s.is_empty()) {
        body.push_str(&format!("DEFAULT_CHAT_ID={id}\n"));
    }
    fs::write(path, body)?;

    let dir = path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let gitignore = dir.join(".gitignore");
    let created_gitignore = if gitignore.exists() {
        false
    } else {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_ENV_FILE.to_string());
        fs::write(&gitignore, format!("{name}\n{CONTACTS_FILE_NAME}\n"))?;
        true
    };

    Ok(InitOutcome {
        env_file: path.to_path_buf(),
        created_gitignore,
    })
}

fn parse_dotenv(contents: &str) -> HashMap<String, String> {
    contents.lines().filter_map(dotenv_pair).collect()
}

/// One `KEY=VALUE` line; comments, blanks and `export ` prefixes are tolerated.
fn dotenv_pair(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.starts_with('#') {
        return None;
    }
    let (key, value) = line
        .strip_prefix("export ")
        .unwrap_or(line)
        .split_once('=')?;
    let key = key.trim();
    (!key.is_empty()).then(|| (key.to_string(), unquote(value.trim()).to_string()))
}

fn unquote(value: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|q| value.strip_prefix(*q)?.strip_suffix(*q))
        .unwrap_or(value)
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn parses_dotenv_lines() {
        let vars = parse_dotenv(
            "# comment\n\nTELEGRAM_BOT_TOKEN=\"123:abc\"\nexport DEFAULT_CHAT_ID='42'\nbroken line\n",
        );
        assert_eq!(vars.get("TELEGRAM_BOT_TOKEN").map(String::as_str), Some("123:abc"));
        assert_eq!(vars.get("DEFAULT_CHAT_ID").map(String::as_str), Some("42"));
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn dotenv_values_keep_inner_equals_and_unbalanced_quotes() {
        let vars = parse_dotenv("  URL = https://x/?a=b \nQ=\"\nMIXED='abc\"\n=orphan\n");
        assert_eq!(vars.get("URL").map(String::as_str), Some("https://x/?a=b"));
        assert_eq!(vars.get("Q").map(String::as_str), Some("\""));
        assert_eq!(vars.get("MIXED").map(String::as_str), Some("'abc\""));
        assert_eq!(vars.len(), 3);
    }

    #[test]
    fn missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = CredentialsFile::read(dir.path().join(".env"));
        let err = Config::from_sources(&file, no_env).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("tgctl init"));
    }

    #[test]
    fn file_without_token_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "DEFAULT_CHAT_ID=5\n").unwrap();
        let err = Config::from_sources(&CredentialsFile::read(path), no_env).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("TELEGRAM_BOT_TOKEN not found"));
    }

    #[test]
    fn env_overrides_file_and_contacts_default_beside_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "TELEGRAM_BOT_TOKEN=file-token\nDEFAULT_CHAT_ID=7\n").unwrap();
        let file = CredentialsFile::read(path);

        let cfg = Config::from_sources(&file, |k| {
            (k == "TELEGRAM_BOT_TOKEN").then(|| "env-token".to_string())
        })
        .unwrap();

        assert_eq!(cfg.telegram_bot_token, "env-token");
        assert_eq!(cfg.default_chat_id, Some(ChatId::new("7")));
        assert_eq!(
            file.contacts_file_with(|_| None),
            dir.path().join(CONTACTS_FILE_NAME)
        );
    }

    #[test]
    fn contacts_file_from_env_then_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "CONTACTS_FILE=/srv/bot/people.json\n").unwrap();
        let file = CredentialsFile::read(path);

        assert_eq!(
            file.contacts_file_with(|_| None),
            PathBuf::from("/srv/bot/people.json")
        );
        assert_eq!(
            file.contacts_file_with(|k| (k == "CONTACTS_FILE").then(|| "mine.json".to_string())),
            PathBuf::from("mine.json")
        );
    }

    #[test]
    fn token_from_env_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = CredentialsFile::read(dir.path().join("absent.env"));
        let cfg = Config::from_sources(&file, |k| {
            (k == "TELEGRAM_BOT_TOKEN").then(|| "t".to_string())
        })
        .unwrap();
        assert_eq!(cfg.default_chat_id, None);
    }

    #[test]
    fn init_writes_credentials_and_gitignore() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");

        let out = write_credentials(&path, " 123:abc ", Some("99"), false).unwrap();
        assert!(out.created_gitignore);

        let file = CredentialsFile::read(path.clone());
        assert_eq!(file.get("TELEGRAM_BOT_TOKEN"), Some("123:abc"));
        assert_eq!(file.get("DEFAULT_CHAT_ID"), Some("99"));

        let err = write_credentials(&path, "x", None, false).unwrap_err();
        assert!(err.is_config());

        let again = write_credentials(&path, "456:def", None, true).unwrap();
        assert!(!again.created_gitignore);
        let file = CredentialsFile::read(path);
        assert_eq!(file.get("DEFAULT_CHAT_ID"), None);
    }

    #[test]
    fn init_requires_token() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_credentials(&dir.path().join(".env"), "  ", None, false).unwrap_err();
        assert!(err.is_config());
    }
}
