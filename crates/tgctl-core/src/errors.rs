use std::path::PathBuf;

/// Core error type.
///
/// Adapter crates map their specific errors into this type so the CLI can tell
/// "not configured" apart from "the remote call failed" without string inspection.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Config(String),

    /// `--to <name>` did not match a saved contact.
    #[error("Contact not found: {0}")]
    ContactNotFound(String),

    /// No destination flag given.
    #[error("{0}")]
    MissingTarget(String),

    #[error("{0}")]
    Remote(String),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Configuration errors get a remediation hint; everything else is operational.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::Config(_) | Error::ContactNotFound(_) | Error::MissingTarget(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_config_errors() {
        assert!(Error::Config("no token".to_string()).is_config());
        assert!(Error::ContactNotFound("Bob".to_string()).is_config());
        assert!(Error::MissingTarget("--to".to_string()).is_config());
        assert!(!Error::Remote("chat not found".to_string()).is_config());
        assert!(!Error::FileNotFound(PathBuf::from("/x.png")).is_config());
    }

    #[test]
    fn file_not_found_mentions_path() {
        let e = Error::FileNotFound(PathBuf::from("/tmp/missing.pdf"));
        assert_eq!(e.to_string(), "file not found: /tmp/missing.pdf");
    }
}
