//! Backend commands queued from UI to backend worker.

use client_core::Submission;
use std::path::PathBuf;

pub enum BackendCommand {
    LoadImageFile { path: PathBuf },
    Stage(Submission),
    FetchStagedImage { url: String },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadImageFile { .. } => "load_image_file",
            BackendCommand::Stage(_) => "stage",
            BackendCommand::FetchStagedImage { .. } => "fetch_staged_image",
        }
    }
}
