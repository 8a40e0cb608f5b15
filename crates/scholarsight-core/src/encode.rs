//! File handles and base64 encoding for inline request attachments.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

/// MIME type accepted for paper uploads.
pub const PDF_MIME: &str = "application/pdf";

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
enum Content {
    Path(PathBuf),
    Memory(Arc<[u8]>),
}

/// A file the user has picked, dropped or uploaded.
///
/// Only metadata is captured on selection. The bytes of a path-backed file
/// are read when the file is encoded for a request.
#[derive(Debug, Clone)]
pub struct PaperFile {
    name: String,
    mime_type: String,
    size: u64,
    content: Content,
}

impl PaperFile {
    /// Select a file on disk. The MIME type is guessed from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            mime_type: guess_mime(path),
            name,
            size: metadata.len(),
            content: Content::Path(path.to_path_buf()),
        })
    }

    /// Wrap bytes that are already in memory, e.g. a multipart upload.
    ///
    /// A declared MIME type wins over the one guessed from `name`.
    pub fn from_bytes(name: impl Into<String>, mime_type: Option<&str>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = match mime_type.map(str::trim) {
            Some(m) if !m.is_empty() => m.to_ascii_lowercase(),
            _ => guess_mime(Path::new(&name)),
        };
        Self {
            name,
            mime_type,
            size: bytes.len() as u64,
            content: Content::Memory(bytes.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// True for `application/pdf`, ignoring any parameters.
    pub fn is_pdf(&self) -> bool {
        self.mime_type
            .split(';')
            .next()
            .is_some_and(|essence| essence.trim() == PDF_MIME)
    }
}

fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_string()
}

/// A binary attachment in transport form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineData {
    pub mime_type: String,
    /// Standard base64, without any `data:` URI prefix.
    pub data: String,
}

/// Read a file and encode its content as base64.
pub async fn encode_file(file: &PaperFile) -> Result<InlineData, EncodeError> {
    let data = match &file.content {
        Content::Path(path) => {
            let bytes = tokio::fs::read(path).await.map_err(|source| EncodeError::Read {
                path: path.clone(),
                source,
            })?;
            STANDARD.encode(bytes)
        }
        Content::Memory(bytes) => STANDARD.encode(bytes),
    };

    Ok(InlineData {
        mime_type: file.mime_type.clone(),
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn pdf_detection_follows_extension() {
        let pdf = PaperFile::from_bytes("paper.pdf", None, b"%PDF-1.7".to_vec());
        assert!(pdf.is_pdf());
        assert_eq!(pdf.size(), 8);

        let txt = PaperFile::from_bytes("notes.txt", None, b"hello".to_vec());
        assert!(!txt.is_pdf());
        assert_eq!(txt.mime_type(), "text/plain");
    }

    #[test]
    fn declared_mime_type_wins() {
        let file = PaperFile::from_bytes("upload", Some("Application/PDF"), vec![1, 2, 3]);
        assert!(file.is_pdf());

        let file = PaperFile::from_bytes("paper.pdf", Some("image/png"), vec![1, 2, 3]);
        assert!(!file.is_pdf());
    }

    #[test]
    fn unknown_extension_is_octet_stream() {
        let file = PaperFile::from_bytes("blob", None, vec![]);
        assert_eq!(file.mime_type(), "application/octet-stream");
    }

    #[tokio::test]
    async fn encodes_memory_content() {
        let file = PaperFile::from_bytes("paper.pdf", None, b"hello".to_vec());
        let encoded = encode_file(&file).await.unwrap();
        assert_eq!(encoded.data, "aGVsbG8=");
        assert_eq!(encoded.mime_type, PDF_MIME);
        assert!(!encoded.data.starts_with("data:"));
    }

    #[tokio::test]
    async fn encodes_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper.pdf");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"%PDF-1.4 test").unwrap();
        drop(f);

        let file = PaperFile::from_path(&path).unwrap();
        assert_eq!(file.name(), "paper.pdf");
        assert_eq!(file.size(), 13);
        assert!(file.is_pdf());

        let encoded = encode_file(&file).await.unwrap();
        assert_eq!(encoded.data, STANDARD.encode(b"%PDF-1.4 test"));
    }

    #[tokio::test]
    async fn read_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper.pdf");
        std::fs::write(&path, b"%PDF").unwrap();
        let file = PaperFile::from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let err = encode_file(&file).await.unwrap_err();
        assert!(matches!(err, EncodeError::Read { .. }));
    }

    #[test]
    fn directories_are_not_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PaperFile::from_path(dir.path()).is_err());
    }

    #[test]
    fn mime_parameters_do_not_hide_a_pdf() {
        let file = PaperFile::from_bytes(
            "upload",
            Some("Application/PDF; charset=binary"),
            b"%PDF".to_vec(),
        );
        assert!(file.is_pdf());
        let file = PaperFile::from_bytes("upload", Some("application/pdfx"), b"%PDF".to_vec());
        assert!(!file.is_pdf());
    }
}
