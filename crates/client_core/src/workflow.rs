//! Submission coordinator: owns the session's UI state and its transitions.
//!
//! Every external event maps to one method here. The coordinator allows at
//! most one in-flight submission and is the only place a display handle is
//! created or released.

use shared::domain::StagingStyle;
use tracing::{debug, info, warn};

use crate::{
    captured::{CapturedImage, PreviewHandle, PreviewStore},
    display::ResultDisplay,
    error::StagingError,
    staging::StagingService,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStatus {
    Idle,
    AwaitingInput,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionId(pub u64);

/// Snapshot of the inputs for one staging request.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: SubmissionId,
    pub image: CapturedImage,
    pub style: StagingStyle,
    pub description: String,
}

#[derive(Debug)]
pub enum ImageChange {
    Accepted(PreviewHandle),
    /// A submission is in flight; the image is handed back untouched.
    Rejected(CapturedImage),
}

struct CurrentImage {
    image: CapturedImage,
    preview: PreviewHandle,
}

pub struct StagingWorkflow<P: PreviewStore> {
    previews: P,
    status: WorkflowStatus,
    current: Option<CurrentImage>,
    style: StagingStyle,
    description: String,
    staged_image_url: Option<String>,
    error: Option<String>,
    in_flight: Option<SubmissionId>,
    next_submission: u64,
}

impl<P: PreviewStore> StagingWorkflow<P> {
    pub fn new(previews: P) -> Self {
        Self {
            previews,
            status: WorkflowStatus::Idle,
            current: None,
            style: StagingStyle::default(),
            description: String::new(),
            staged_image_url: None,
            error: None,
            in_flight: None,
            next_submission: 1,
        }
    }

    pub fn status(&self) -> WorkflowStatus {
        self.status
    }

    pub fn can_submit(&self) -> bool {
        self.current.is_some() && self.status != WorkflowStatus::Submitting
    }

    pub fn is_submitting(&self) -> bool {
        self.status == WorkflowStatus::Submitting
    }

    pub fn image(&self) -> Option<&CapturedImage> {
        self.current.as_ref().map(|current| &current.image)
    }

    pub fn preview(&self) -> Option<PreviewHandle> {
        self.current.as_ref().map(|current| current.preview)
    }

    pub fn style(&self) -> StagingStyle {
        self.style
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn staged_image_url(&self) -> Option<&str> {
        self.staged_image_url.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn previews(&self) -> &P {
        &self.previews
    }

    pub fn previews_mut(&mut self) -> &mut P {
        &mut self.previews
    }

    pub fn display(&self) -> ResultDisplay {
        ResultDisplay::new(self.preview(), self.staged_image_url())
    }

    pub fn set_style(&mut self, style: StagingStyle) {
        self.style = style;
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn description_mut(&mut self) -> &mut String {
        &mut self.description
    }

    /// Supersedes the current image, clearing any prior result and error.
    pub fn replace_image(&mut self, image: CapturedImage) -> ImageChange {
        if self.is_submitting() {
            warn!(file = image.file_name(), "image change rejected while submitting");
            return ImageChange::Rejected(image);
        }

        self.release_current();
        let preview = self.previews.create(&image);
        debug!(file = image.file_name(), %preview, "image selected");
        self.current = Some(CurrentImage { image, preview });
        self.staged_image_url = None;
        self.error = None;
        self.status = WorkflowStatus::AwaitingInput;
        ImageChange::Accepted(preview)
    }

    /// Starts a submission, or returns `None` when nothing may be sent.
    pub fn begin_submission(&mut self) -> Option<Submission> {
        if self.is_submitting() {
            debug!("submission already in flight");
            return None;
        }
        let Some(current) = self.current.as_ref() else {
            self.error = Some(StagingError::missing_image().user_message());
            self.staged_image_url = None;
            self.status = WorkflowStatus::Failed;
            return None;
        };

        let id = SubmissionId(self.next_submission);
        self.next_submission += 1;
        let submission = Submission {
            id,
            image: current.image.clone(),
            style: self.style,
            description: self.description.clone(),
        };
        self.in_flight = Some(id);
        self.staged_image_url = None;
        self.error = None;
        self.status = WorkflowStatus::Submitting;
        info!(submission = id.0, style = self.style.label(), "staging submission started");
        Some(submission)
    }

    /// Applies the outcome of a submission. Stale outcomes are ignored.
    pub fn finish_submission(
        &mut self,
        id: SubmissionId,
        result: Result<String, StagingError>,
    ) -> bool {
        if self.in_flight != Some(id) {
            warn!(submission = id.0, "ignoring stale staging result");
            return false;
        }
        self.in_flight = None;
        match result {
            Ok(url) => {
                info!(submission = id.0, "staging succeeded");
                self.staged_image_url = Some(url);
                self.error = None;
                self.status = WorkflowStatus::Succeeded;
            }
            Err(err) => {
                warn!(submission = id.0, error = %err, "staging failed");
                self.staged_image_url = None;
                self.error = Some(err.user_message());
                self.status = WorkflowStatus::Failed;
            }
        }
        true
    }

    pub async fn submit<S>(&mut self, service: &S) -> WorkflowStatus
    where
        S: StagingService + ?Sized,
    {
        let Some(submission) = self.begin_submission() else {
            return self.status;
        };
        let result = service
            .stage(&submission.image, submission.style, &submission.description)
            .await;
        self.finish_submission(submission.id, result);
        self.status
    }

    /// Clears image, result and error. Refused while a submission is in flight.
    pub fn reset(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.release_current();
        self.staged_image_url = None;
        self.error = None;
        self.status = WorkflowStatus::Idle;
        true
    }

    fn release_current(&mut self) {
        if let Some(previous) = self.current.take() {
            self.previews.release(previous.preview);
            debug!(preview = %previous.preview, "released image preview");
        }
    }
}

impl<P: PreviewStore> Drop for StagingWorkflow<P> {
    fn drop(&mut self) {
        self.release_current();
    }
}

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod tests;
