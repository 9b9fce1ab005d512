//! UI/backend events and error modeling for desktop GUI controller.

use client_core::{CapturedImage, ErrorKind, StagingError, SubmissionId};

use crate::ui::app::PreviewImage;

pub enum UiEvent {
    Info(String),
    Error(UiError),
    ImageLoaded(CapturedImage),
    StageFinished {
        id: SubmissionId,
        result: Result<String, StagingError>,
    },
    StagedImageLoaded {
        url: String,
        image: PreviewImage,
        original_bytes: Vec<u8>,
    },
    StagedImageFailed {
        url: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Validation,
    Device,
    Encoding,
    Service,
    Transport,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    SelectImage,
    LoadResult,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("camera")
            || message_lower.contains("device")
            || message_lower.contains("permission")
        {
            UiErrorCategory::Device
        } else if message_lower.contains("encode")
            || message_lower.contains("decode")
            || message_lower.contains("base64")
            || message_lower.contains("failed to read")
        {
            UiErrorCategory::Encoding
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("unsupported")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("transport")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("api error")
            || message_lower.contains("server")
            || message_lower.contains("staged image")
        {
            UiErrorCategory::Service
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_staging_error(context: UiErrorContext, err: &StagingError) -> Self {
        let category = match (err.kind(), err) {
            (_, StagingError::Transport(_)) => UiErrorCategory::Transport,
            (ErrorKind::Validation, _) => UiErrorCategory::Validation,
            (ErrorKind::DeviceAccess, _) => UiErrorCategory::Device,
            (ErrorKind::Encoding, _) => UiErrorCategory::Encoding,
            (ErrorKind::Service, _) => UiErrorCategory::Service,
            (ErrorKind::Unknown, _) => UiErrorCategory::Unknown,
        };
        Self {
            category,
            context,
            message: err.user_message(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Device => "Camera",
        UiErrorCategory::Encoding => "Image",
        UiErrorCategory::Service => "Service",
        UiErrorCategory::Transport => "Network",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_backend_command_processor_disconnect_as_transport_error() {
        let err = UiError::from_message(
            UiErrorContext::BackendStartup,
            "Backend command processor disconnected (possible startup/runtime failure)",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert_eq!(err.context(), UiErrorContext::BackendStartup);
    }

    #[test]
    fn classifies_unsupported_file_as_validation() {
        let err = UiError::from_message(
            UiErrorContext::SelectImage,
            "unsupported image type 'image/gif'; use PNG, JPEG or WebP",
        );
        assert_eq!(err.category(), UiErrorCategory::Validation);
    }

    #[test]
    fn classifies_staged_image_download_failure_as_service() {
        let err = UiError::from_message(
            UiErrorContext::LoadResult,
            "Failed to load the staged image: 404 Not Found",
        );
        assert_eq!(err.category(), UiErrorCategory::Service);
    }

    #[test]
    fn staging_errors_map_by_kind() {
        let service = StagingError::Service {
            status: 500,
            reason: "Internal Server Error".to_string(),
            detail: "boom".to_string(),
        };
        let err = UiError::from_staging_error(UiErrorContext::LoadResult, &service);
        assert_eq!(err.category(), UiErrorCategory::Service);
        assert_eq!(err.message(), service.to_string());

        let transport = StagingError::Transport("connection refused".to_string());
        assert_eq!(
            UiError::from_staging_error(UiErrorContext::LoadResult, &transport).category(),
            UiErrorCategory::Transport
        );

        let device = StagingError::DeviceAccess("denied".to_string());
        assert_eq!(
            UiError::from_staging_error(UiErrorContext::SelectImage, &device).category(),
            UiErrorCategory::Device
        );
    }

    #[test]
    fn labels_every_category() {
        assert_eq!(err_label(UiErrorCategory::Device), "Camera");
        assert_eq!(err_label(UiErrorCategory::Unknown), "Unexpected");
    }
}
