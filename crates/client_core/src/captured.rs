//! In-memory source photo and its display handle.

use std::{
    fmt,
    path::Path,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use shared::domain::ImageMimeType;

use crate::error::StagingError;

/// Identifies a locally created preview of a captured image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PreviewHandle(pub u64);

impl PreviewHandle {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "preview:{}", self.0)
    }
}

/// Creates and releases display handles for captured images.
///
/// The coordinator calls `release` exactly once for every handle it obtained
/// from `create`.
pub trait PreviewStore {
    fn create(&mut self, image: &CapturedImage) -> PreviewHandle;
    fn release(&mut self, handle: PreviewHandle);
}

#[derive(Clone, PartialEq, Eq)]
pub struct CapturedImage {
    bytes: Arc<[u8]>,
    mime_type: ImageMimeType,
    file_name: String,
}

impl fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedImage")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl CapturedImage {
    pub fn new(
        bytes: impl Into<Arc<[u8]>>,
        mime_type: ImageMimeType,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type,
            file_name: file_name.into(),
        }
    }

    /// Reads a user-chosen file, accepting only PNG, JPEG and WebP.
    pub async fn from_file(path: &Path) -> Result<Self, StagingError> {
        let mime_type = mime_type_for_path(path)?;
        let bytes = tokio::fs::read(path).await.map_err(|err| {
            StagingError::Encoding(format!("failed to read '{}': {err}", path.display()))
        })?;
        if bytes.is_empty() {
            return Err(StagingError::Encoding(format!(
                "'{}' is empty",
                path.display()
            )));
        }
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image")
            .to_string();
        tracing::debug!(
            file = %path.display(),
            mime = mime_type.as_str(),
            len = bytes.len(),
            "loaded image file"
        );
        Ok(Self::new(bytes, mime_type, file_name))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> ImageMimeType {
        self.mime_type
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

pub fn mime_type_for_path(path: &Path) -> Result<ImageMimeType, StagingError> {
    let guessed = mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream");
    Ok(ImageMimeType::parse(guessed)?)
}
