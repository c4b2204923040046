/// Upload storage for property images
///
/// Accepted files (an extension allow-list: image formats plus PDF) are
/// stored under the configured directory with a generated unique name, and
/// the stored name is recorded on the property row. File writes and database
/// commits are not coordinated: a failure between the two can leave an
/// orphaned file, never a row pointing at a missing file.

use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

/// Error type for upload storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// File extension is not on the allow-list
    #[error("File type not allowed: {0}")]
    ExtensionNotAllowed(String),

    /// Filesystem operation failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Filesystem store for uploaded property images
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    allowed_extensions: Vec<String>,
}

impl UploadStore {
    /// Creates a store rooted at `root`, accepting the given extensions
    /// (compared case-insensitively, without the leading dot)
    pub fn new(root: impl Into<PathBuf>, allowed_extensions: Vec<String>) -> Self {
        Self {
            root: root.into(),
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|ext| ext.to_ascii_lowercase())
                .collect(),
        }
    }

    /// Creates the upload directory if it does not exist
    pub async fn ensure_root(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Whether a submitted filename passes the extension allow-list
    pub fn is_allowed(&self, filename: &str) -> bool {
        match filename.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => self
                .allowed_extensions
                .iter()
                .any(|allowed| allowed == &ext.to_ascii_lowercase()),
            _ => false,
        }
    }

    /// Saves an upload under a generated unique name
    ///
    /// Returns the stored filename to record on the property row. The
    /// original name is sanitized down to a safe character set before being
    /// embedded in the stored name.
    pub async fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, StorageError> {
        if !self.is_allowed(filename) {
            return Err(StorageError::ExtensionNotAllowed(filename.to_string()));
        }

        let stored_name = format!("{}_{}", Uuid::new_v4(), sanitize_filename(filename));
        let path = self.root.join(&stored_name);

        tokio::fs::write(&path, bytes).await?;
        debug!(stored = %stored_name, size = bytes.len(), "Stored uploaded file");

        Ok(stored_name)
    }

    /// Deletes a previously stored file
    ///
    /// A file that is already gone is not an error: delete is used for
    /// cleanup paths where the record may outlive the file.
    pub async fn delete(&self, stored_name: &str) -> Result<(), StorageError> {
        let path = self.root.join(sanitize_filename(stored_name));

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(stored = %stored_name, "Deleted stored file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Absolute path of a stored file
    pub fn path_of(&self, stored_name: &str) -> PathBuf {
        self.root.join(sanitize_filename(stored_name))
    }

    /// The storage root directory
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Strips path separators and anything outside a conservative character set
///
/// Keeps the stored name usable while making `../`-style names harmless.
fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    base.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect()
}
