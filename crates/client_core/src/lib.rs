//! Client core for room staging: image capture, the staging HTTP client and
//! the submission coordinator that ties them to a UI.

pub mod capture;
mod captured;
pub mod config;
pub mod display;
pub mod encoding;
pub mod error;
#[cfg(feature = "native-camera")]
pub mod native_camera;
pub mod staging;
pub mod workflow;

pub use capture::{
    CameraBackend, CameraSession, CameraStream, CaptureWidget, FacingPreference, RgbFrame,
    UnavailableCamera,
};
pub use captured::{mime_type_for_path, CapturedImage, PreviewHandle, PreviewStore};
pub use config::ClientSettings;
pub use display::{ImageCard, ImageSource, ResultDisplay};
pub use error::{ErrorKind, StagingError};
#[cfg(feature = "native-camera")]
pub use native_camera::NativeCamera;
pub use staging::{HttpStagingClient, StagingService};
pub use workflow::{ImageChange, StagingWorkflow, Submission, SubmissionId, WorkflowStatus};
