use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

const MIB: usize = 1024 * 1024;

/// Attempts at finding a free timestamp-based name before giving up.
const MAX_NAME_ATTEMPTS: i64 = 64;

/// Reasons an identity document is refused before it reaches disk.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("File type not supported. Use PDF, JPG, or PNG.")]
    UnsupportedType,
    #[error("File too large. Maximum size is {}", format_limit(.limit))]
    TooLarge { limit: usize },
}

fn format_limit(limit: &usize) -> String {
    if limit % MIB == 0 {
        format!("{} MB", limit / MIB)
    } else {
        format!("{limit} bytes")
    }
}

/// An accepted document held in memory until the signup is validated.
#[derive(Debug)]
pub struct PendingDocument {
    /// Lowercased extension without the dot.
    pub extension: String,
    pub bytes: Vec<u8>,
}

/// Accept a document only when both its extension and its declared MIME
/// subtype are in `allowed`. Returns the lowercased extension.
pub fn check_document_type(
    file_name: Option<&str>,
    content_type: Option<&str>,
    allowed: &[String],
) -> Result<String, UploadError> {
    let extension = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .ok_or(UploadError::UnsupportedType)?;

    let subtype = content_type
        .and_then(|ct| ct.parse::<mime_guess::mime::Mime>().ok())
        .map(|mime| mime.subtype().as_str().to_lowercase())
        .ok_or(UploadError::UnsupportedType)?;

    let is_allowed = |candidate: &str| allowed.iter().any(|a| a.eq_ignore_ascii_case(candidate));

    if is_allowed(&extension) && is_allowed(&subtype) {
        Ok(extension)
    } else {
        Err(UploadError::UnsupportedType)
    }
}

/// Local-disk store for organizer identity documents.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    dir: PathBuf,
    max_size: usize,
}

impl DocumentStore {
    /// Create the store, making sure its directory exists.
    pub async fn new(dir: PathBuf, max_size: usize) -> std::io::Result<Self> {
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir, max_size })
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Append a chunk to `buf`, failing once the running total passes the limit.
    pub fn append_chunk(&self, buf: &mut Vec<u8>, chunk: &[u8]) -> Result<(), UploadError> {
        if buf.len() + chunk.len() > self.max_size {
            return Err(UploadError::TooLarge {
                limit: self.max_size,
            });
        }
        buf.extend_from_slice(chunk);
        Ok(())
    }

    /// Write the document as `<unix-millis>.<ext>` and return its path.
    ///
    /// Names are claimed with `create_new`; on a collision the next
    /// millisecond is tried.
    pub async fn save(&self, doc: &PendingDocument) -> std::io::Result<PathBuf> {
        let base = Utc::now().timestamp_millis();

        for offset in 0..MAX_NAME_ATTEMPTS {
            let path = self
                .dir
                .join(format!("{}.{}", base + offset, doc.extension));

            let file = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;

            let mut file = match file {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            };

            if let Err(e) = write_all(&mut file, &doc.bytes).await {
                drop(file);
                let _ = fs::remove_file(&path).await;
                return Err(e);
            }

            return Ok(path);
        }

        Err(std::io::Error::new(
            ErrorKind::AlreadyExists,
            "no free document name available",
        ))
    }

    /// Best-effort removal of a document whose signup did not complete.
    pub async fn remove(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), "Failed to remove orphaned document: {e}");
        }
    }
}

async fn write_all(file: &mut fs::File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await
}
