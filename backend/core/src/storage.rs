//! Writes completed uploads into the upload directory.

use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};

use crate::error::SinkError;
use crate::upload::IncomingUpload;

/// The directory uploads land in.
///
/// Filenames are joined onto the root without sanitization, so an absolute
/// name or one containing `..` is written outside of it.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path an upload named `filename` is written to.
    pub fn resolve(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Persist a complete upload, replacing any existing file of that name.
    ///
    /// Nothing is written if the body is shorter than its declared length.
    pub async fn store(&self, upload: &IncomingUpload) -> Result<PathBuf, SinkError> {
        upload.ensure_complete()?;

        if !is_plain_file_name(upload.filename()) {
            warn!(
                filename = %upload.filename(),
                root = %self.root.display(),
                "Upload filename escapes the upload directory"
            );
        }

        let path = self.resolve(upload.filename());
        fs::write(&path, upload.body())
            .await
            .map_err(|source| SinkError::Storage {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), bytes = upload.body().len(), "Upload written");
        Ok(path)
    }
}

/// True when `name` is a single normal path component.
pub fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
