//! Camera capture: scoped device sessions and the capture widget state.

use std::mem;

use image::{codecs::jpeg::JpegEncoder, ExtendedColorType};
use serde::{Deserialize, Serialize};
use shared::domain::ImageMimeType;

use crate::{
    captured::CapturedImage,
    error::{StagingError, CAMERA_DENIED_MESSAGE},
};

pub const JPEG_QUALITY: u8 = 95;

/// Which physical camera to prefer when several are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacingPreference {
    /// Rear-facing, pointed away from the user.
    #[default]
    Environment,
    User,
    Any,
}

impl FacingPreference {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "environment" | "rear" | "back" => Some(Self::Environment),
            "user" | "front" => Some(Self::User),
            "any" => Some(Self::Any),
            _ => None,
        }
    }
}

/// One decoded video frame, tightly packed RGB8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbFrame {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl RgbFrame {
    /// Checks that `rgb` holds exactly `width * height` packed pixels.
    pub fn validate(&self) -> Result<(), StagingError> {
        let expected = self.width as usize * self.height as usize * 3;
        if self.width == 0 || self.height == 0 || self.rgb.len() != expected {
            return Err(StagingError::Encoding(format!(
                "camera frame is {}x{} with {} bytes, expected {expected}",
                self.width,
                self.height,
                self.rgb.len()
            )));
        }
        Ok(())
    }

    pub fn to_rgba(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.rgb.len() / 3 * 4);
        for px in self.rgb.chunks_exact(3) {
            rgba.extend_from_slice(&[px[0], px[1], px[2], u8::MAX]);
        }
        rgba
    }
}

pub trait CameraStream {
    fn next_frame(&mut self) -> Result<RgbFrame, StagingError>;
    /// Stops every track of the stream. Called once per stream.
    fn stop(&mut self);
}

pub trait CameraBackend {
    fn open(&mut self, facing: FacingPreference) -> Result<Box<dyn CameraStream>, StagingError>;
}

/// Backend used when no camera support is compiled in.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableCamera;

impl CameraBackend for UnavailableCamera {
    fn open(&mut self, _facing: FacingPreference) -> Result<Box<dyn CameraStream>, StagingError> {
        Err(StagingError::DeviceAccess(
            "no camera backend is available in this build".to_string(),
        ))
    }
}

/// Exclusive hold on an open camera stream.
///
/// Whichever way the session ends (capture, close, or drop) the stream is
/// stopped exactly once by `release`.
pub struct CameraSession {
    stream: Option<Box<dyn CameraStream>>,
}

impl CameraSession {
    pub fn open(
        backend: &mut dyn CameraBackend,
        facing: FacingPreference,
    ) -> Result<Self, StagingError> {
        let stream = backend.open(facing)?;
        tracing::debug!(?facing, "camera stream acquired");
        Ok(Self {
            stream: Some(stream),
        })
    }

    pub fn frame(&mut self) -> Result<RgbFrame, StagingError> {
        match self.stream.as_mut() {
            Some(stream) => stream.next_frame(),
            None => Err(StagingError::DeviceAccess(
                "camera stream already released".to_string(),
            )),
        }
    }

    /// Snapshots the current frame as a high-quality JPEG and ends the session.
    pub fn capture(mut self) -> Result<CapturedImage, StagingError> {
        let frame = self.frame();
        self.release();
        let frame = frame?;
        let jpeg = encode_jpeg(&frame, JPEG_QUALITY)?;
        let file_name = format!("photo-{}.jpg", chrono::Utc::now().timestamp_millis());
        tracing::info!(
            width = frame.width,
            height = frame.height,
            len = jpeg.len(),
            "captured photo from camera"
        );
        Ok(CapturedImage::new(jpeg, ImageMimeType::Jpeg, file_name))
    }

    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            tracing::debug!("camera stream released");
        }
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.release();
    }
}

pub fn encode_jpeg(frame: &RgbFrame, quality: u8) -> Result<Vec<u8>, StagingError> {
    frame.validate()?;
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality).encode(
        &frame.rgb,
        frame.width,
        frame.height,
        ExtendedColorType::Rgb8,
    )?;
    Ok(out)
}

pub enum CameraView {
    Closed,
    Live(CameraSession),
    Failed(String),
}

/// State of the camera overlay of the capture widget.
pub struct CaptureWidget {
    view: CameraView,
    facing: FacingPreference,
}

impl CaptureWidget {
    pub fn new(facing: FacingPreference) -> Self {
        Self {
            view: CameraView::Closed,
            facing,
        }
    }

    /// True while the camera overlay is visible, including its error state.
    pub fn is_open(&self) -> bool {
        !matches!(self.view, CameraView::Closed)
    }

    pub fn is_live(&self) -> bool {
        matches!(self.view, CameraView::Live(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.view {
            CameraView::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn open_camera(&mut self, backend: &mut dyn CameraBackend) {
        // Any previous session is dropped, and so released, before reopening.
        self.view = CameraView::Closed;
        self.view = match CameraSession::open(backend, self.facing) {
            Ok(session) => CameraView::Live(session),
            Err(err) => {
                tracing::warn!(error = %err, "camera access failed");
                CameraView::Failed(CAMERA_DENIED_MESSAGE.to_string())
            }
        };
    }

    /// Latest frame for the live preview. A frame error closes the session.
    pub fn preview_frame(&mut self) -> Option<RgbFrame> {
        let CameraView::Live(session) = &mut self.view else {
            return None;
        };
        match session.frame() {
            Ok(frame) => Some(frame),
            Err(err) => {
                tracing::warn!(error = %err, "camera stream failed mid-session");
                self.view = CameraView::Failed(format!("Camera disconnected: {err}"));
                None
            }
        }
    }

    pub fn take_photo(&mut self) -> Result<CapturedImage, StagingError> {
        match mem::replace(&mut self.view, CameraView::Closed) {
            CameraView::Live(session) => session.capture().inspect_err(|err| {
                self.view = CameraView::Failed(err.to_string());
            }),
            other => {
                self.view = other;
                Err(StagingError::DeviceAccess("camera is not open".to_string()))
            }
        }
    }

    pub fn cancel(&mut self) {
        if let CameraView::Live(session) = mem::replace(&mut self.view, CameraView::Closed) {
            session.close();
        }
    }
}

impl Default for CaptureWidget {
    fn default() -> Self {
        Self::new(FacingPreference::default())
    }
}

#[cfg(test)]
#[path = "tests/capture_tests.rs"]
mod tests;
