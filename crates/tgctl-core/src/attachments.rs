//! Pre-flight checks for files sent as photos or documents.
//!
//! Only existence is fatal; format and size problems are surfaced as warnings
//! and the upload is still attempted.

use std::path::{Path, PathBuf};

use crate::{errors::Error, Result};

pub const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];
pub const PHOTO_RECOMMENDED_MAX_BYTES: u64 = 10 * 1024 * 1024;
/// Bot API upload limit for documents.
pub const DOCUMENT_MAX_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq)]
pub enum AttachmentWarning {
    UnusualPhotoFormat { extension: String },
    LargePhoto { size_mb: f64 },
    DocumentTooLarge { size_mb: f64 },
}

#[derive(Clone, Debug)]
pub struct Attachment {
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
    pub warnings: Vec<AttachmentWarning>,
}

impl Attachment {
    pub fn size_mb(&self) -> f64 {
        bytes_to_mb(self.size_bytes)
    }
}

pub fn check_photo(path: &Path) -> Result<Attachment> {
    let mut att = inspect(path)?;

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if !PHOTO_EXTENSIONS.contains(&ext.as_str()) {
        att.warnings
            .push(AttachmentWarning::UnusualPhotoFormat { extension: ext });
    }
    if att.size_bytes > PHOTO_RECOMMENDED_MAX_BYTES {
        att.warnings.push(AttachmentWarning::LargePhoto {
            size_mb: att.size_mb(),
        });
    }
    Ok(att)
}

pub fn check_document(path: &Path) -> Result<Attachment> {
    let mut att = inspect(path)?;
    if att.size_bytes > DOCUMENT_MAX_BYTES {
        att.warnings.push(AttachmentWarning::DocumentTooLarge {
            size_mb: att.size_mb(),
        });
    }
    Ok(att)
}

fn inspect(path: &Path) -> Result<Attachment> {
    let meta = match std::fs::metadata(path) {
        Ok(m) if m.is_file() => m,
        _ => return Err(Error::FileNotFound(path.to_path_buf())),
    };
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Attachment {
        path: path.to_path_buf(),
        file_name,
        size_bytes: meta.len(),
        warnings: Vec::new(),
    })
}

fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_file_not_found() {
        let err = check_photo(Path::new("/nope/cat.png")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
        assert!(check_document(Path::new("/nope/a.pdf")).is_err());
    }

    #[test]
    fn photo_with_odd_extension_warns_but_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.TIFF");
        std::fs::write(&path, [0u8; 16]).unwrap();

        let att = check_photo(&path).unwrap();
        assert_eq!(att.file_name, "scan.TIFF");
        assert_eq!(att.size_bytes, 16);
        assert_eq!(
            att.warnings,
            vec![AttachmentWarning::UnusualPhotoFormat {
                extension: "tiff".to_string()
            }]
        );
    }

    #[test]
    fn uppercase_known_extension_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cat.JPG");
        std::fs::write(&path, b"jpeg").unwrap();
        assert!(check_photo(&path).unwrap().warnings.is_empty());
    }

    #[test]
    fn small_document_has_no_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();
        let att = check_document(&path).unwrap();
        assert!(att.warnings.is_empty());
        assert!(att.size_mb() < 0.01);
    }
}
