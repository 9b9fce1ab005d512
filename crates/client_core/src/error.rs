use shared::error::DomainError;
use thiserror::Error;

pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";
pub const MISSING_IMAGE_MESSAGE: &str = "Please upload an image first.";
pub const CAMERA_DENIED_MESSAGE: &str =
    "Could not access the camera. Please check camera permissions and try again.";

/// Coarse taxonomy used when rendering failures to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    DeviceAccess,
    Encoding,
    Service,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StagingError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    DeviceAccess(String),
    #[error("Failed to encode image: {0}")]
    Encoding(String),
    #[error("Failed to stage the room: API Error: {status} {reason} - {detail}")]
    Service {
        status: u16,
        reason: String,
        detail: String,
    },
    #[error("Failed to stage the room: invalid response payload: {0}")]
    MalformedResponse(String),
    #[error("Failed to stage the room: API did not return a valid image URL.")]
    MissingImageUrl,
    #[error("Failed to load the staged image: {status} {reason}")]
    Download { status: u16, reason: String },
    #[error("Failed to stage the room: network error: {0}")]
    Transport(String),
    #[error("An unknown error occurred.")]
    Unknown,
}

impl StagingError {
    pub fn missing_image() -> Self {
        Self::Validation(MISSING_IMAGE_MESSAGE.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StagingError::Validation(_) => ErrorKind::Validation,
            StagingError::DeviceAccess(_) => ErrorKind::DeviceAccess,
            StagingError::Encoding(_) => ErrorKind::Encoding,
            StagingError::Service { .. }
            | StagingError::MalformedResponse(_)
            | StagingError::MissingImageUrl
            | StagingError::Download { .. }
            | StagingError::Transport(_) => ErrorKind::Service,
            StagingError::Unknown => ErrorKind::Unknown,
        }
    }

    /// Single line shown under the submit button.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            UNKNOWN_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

impl From<DomainError> for StagingError {
    fn from(value: DomainError) -> Self {
        StagingError::Validation(value.to_string())
    }
}

impl From<reqwest::Error> for StagingError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            StagingError::MalformedResponse(value.to_string())
        } else {
            StagingError::Transport(value.to_string())
        }
    }
}

impl From<image::ImageError> for StagingError {
    fn from(value: image::ImageError) -> Self {
        StagingError::Encoding(value.to_string())
    }
}
