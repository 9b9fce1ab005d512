use std::{fs, path::PathBuf};

use client_core::{
    CameraBackend, CaptureWidget, FacingPreference, ImageChange, RgbFrame, StagingError,
    StagingWorkflow, WorkflowStatus,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::TextureHandle;
use serde::{Deserialize, Serialize};
use shared::domain::StagingStyle;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::previews::TexturePreviews;

pub const SETTINGS_STORAGE_KEY: &str = "room_stager.settings";
const PREVIEW_MAX_SIDE: u32 = 1024;

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub server_url: String,
    pub camera_facing: FacingPreference,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedSettings {
    #[serde(default)]
    pub style: StagingStyle,
    #[serde(default)]
    pub last_directory: Option<PathBuf>,
}

/// Decoded RGBA pixels ready to upload as a texture.
#[derive(Debug, Clone)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

impl PreviewImage {
    pub fn color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied([self.width, self.height], &self.rgba)
    }
}

pub fn decode_preview_image(bytes: &[u8]) -> Result<PreviewImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    // thumbnail() also upscales, so only call it for oversized sources.
    let dynamic = if dynamic.width() > PREVIEW_MAX_SIDE || dynamic.height() > PREVIEW_MAX_SIDE {
        dynamic.thumbnail(PREVIEW_MAX_SIDE, PREVIEW_MAX_SIDE)
    } else {
        dynamic
    };
    let resized = dynamic.to_rgba8();
    let width = resized.width() as usize;
    let height = resized.height() as usize;
    Ok(PreviewImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
}

/// Converts a live camera frame into texture pixels, skipping malformed frames.
pub fn camera_color_image(frame: &RgbFrame) -> Option<egui::ColorImage> {
    if let Err(err) = frame.validate() {
        tracing::debug!(error = %err, "dropping malformed camera frame");
        return None;
    }
    Some(egui::ColorImage::from_rgba_unmultiplied(
        [frame.width as usize, frame.height as usize],
        &frame.to_rgba(),
    ))
}

pub(crate) struct StagedPreview {
    pub url: String,
    pub texture: Option<TextureHandle>,
    pub bytes: Vec<u8>,
    pub failure: Option<String>,
}

pub struct StagingApp {
    pub(crate) workflow: StagingWorkflow<TexturePreviews>,
    pub(crate) capture: CaptureWidget,
    pub(crate) camera_backend: Box<dyn CameraBackend>,
    pub(crate) camera_texture: Option<TextureHandle>,
    pub(crate) staged: Option<StagedPreview>,
    pub(crate) status: String,
    pub(crate) banner: Option<UiError>,
    pub(crate) last_directory: Option<PathBuf>,
    pub(crate) server_url: String,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
}

impl StagingApp {
    pub fn new(
        ctx: egui::Context,
        startup: StartupConfig,
        camera_backend: Box<dyn CameraBackend>,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        persisted: Option<PersistedSettings>,
    ) -> Self {
        let persisted = persisted.unwrap_or_default();
        let mut workflow = StagingWorkflow::new(TexturePreviews::new(ctx));
        workflow.set_style(persisted.style);

        Self {
            workflow,
            capture: CaptureWidget::new(startup.camera_facing),
            camera_backend,
            camera_texture: None,
            staged: None,
            status: String::new(),
            banner: None,
            last_directory: persisted.last_directory,
            server_url: startup.server_url,
            cmd_tx,
            ui_rx,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    tracing::info!("{message}");
                    self.status = message;
                }
                UiEvent::Error(err) => {
                    tracing::warn!(context = ?err.context(), "{}", err.message());
                    self.banner = Some(err);
                }
                UiEvent::ImageLoaded(image) => self.accept_image(image),
                UiEvent::StageFinished { id, result } => {
                    if self.workflow.finish_submission(id, result) {
                        self.request_staged_image();
                    }
                }
                UiEvent::StagedImageLoaded {
                    url,
                    image,
                    original_bytes,
                } => {
                    let Some(staged) = self.staged.as_mut().filter(|staged| staged.url == url)
                    else {
                        continue;
                    };
                    staged.texture = Some(self.workflow.previews().context().load_texture(
                        "staged-result",
                        image.color_image(),
                        egui::TextureOptions::LINEAR,
                    ));
                    staged.bytes = original_bytes;
                }
                UiEvent::StagedImageFailed { url, reason } => {
                    if let Some(staged) = self.staged.as_mut().filter(|staged| staged.url == url) {
                        staged.failure = Some(reason.clone());
                    }
                    self.banner = Some(UiError::from_message(UiErrorContext::LoadResult, reason));
                }
            }
        }
    }

    pub(crate) fn accept_image(&mut self, image: client_core::CapturedImage) {
        match self.workflow.replace_image(image) {
            ImageChange::Accepted(_) => {
                self.staged = None;
                self.banner = None;
            }
            ImageChange::Rejected(image) => {
                self.status = format!(
                    "Staging in progress; '{}' was not applied",
                    image.file_name()
                );
            }
        }
    }

    pub(crate) fn pick_image_file(&mut self) {
        let mut dialog = rfd::FileDialog::new().add_filter(
            "Images",
            shared::domain::ImageMimeType::picker_extensions(),
        );
        if let Some(dir) = &self.last_directory {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.pick_file() else {
            return;
        };
        self.last_directory = path.parent().map(|dir| dir.to_path_buf());
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::LoadImageFile { path },
            &mut self.status,
        );
    }

    pub(crate) fn open_camera(&mut self) {
        self.capture.open_camera(self.camera_backend.as_mut());
    }

    pub(crate) fn take_photo(&mut self) {
        match self.capture.take_photo() {
            Ok(photo) => self.accept_image(photo),
            Err(err) => tracing::warn!(error = %err, "camera capture failed"),
        }
        self.camera_texture = None;
    }

    pub(crate) fn cancel_camera(&mut self) {
        self.capture.cancel();
        self.camera_texture = None;
    }

    pub(crate) fn submit(&mut self) {
        let Some(submission) = self.workflow.begin_submission() else {
            return;
        };
        let id = submission.id;
        self.staged = None;
        if !dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Stage(submission),
            &mut self.status,
        ) {
            let reason = self.status.clone();
            self.workflow
                .finish_submission(id, Err(StagingError::Transport(reason)));
        }
    }

    fn request_staged_image(&mut self) {
        if self.workflow.status() != WorkflowStatus::Succeeded {
            return;
        }
        let Some(url) = self.workflow.staged_image_url().map(str::to_string) else {
            return;
        };
        self.staged = Some(StagedPreview {
            url: url.clone(),
            texture: None,
            bytes: Vec::new(),
            failure: None,
        });
        if !dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::FetchStagedImage { url },
            &mut self.status,
        ) {
            if let Some(staged) = self.staged.as_mut() {
                staged.failure = Some(self.status.clone());
            }
        }
    }

    pub(crate) fn save_staged_image(&mut self) {
        let Some(staged) = self.staged.as_ref().filter(|staged| !staged.bytes.is_empty()) else {
            return;
        };
        let extension = image::guess_format(&staged.bytes)
            .ok()
            .and_then(|format| format.extensions_str().first().copied())
            .unwrap_or("png");
        let suggested_name = format!("staged-room.{extension}");
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(&suggested_name)
            .save_file()
        {
            match fs::write(&path, &staged.bytes) {
                Ok(()) => self.status = format!("Saved staged image to {}", path.display()),
                Err(err) => self.status = format!("Failed to save image: {err}"),
            }
        }
    }

    pub(crate) fn refresh_camera_preview(&mut self, ctx: &egui::Context) {
        if !self.capture.is_live() {
            self.camera_texture = None;
            return;
        }
        let Some(frame) = self.capture.preview_frame() else {
            self.camera_texture = None;
            return;
        };
        let Some(image) = camera_color_image(&frame) else {
            return;
        };
        match self.camera_texture.as_mut() {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.camera_texture =
                    Some(ctx.load_texture("camera-live", image, egui::TextureOptions::LINEAR));
            }
        }
        ctx.request_repaint();
    }
}

impl eframe::App for StagingApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.refresh_camera_preview(ctx);

        self.show_camera_window(ctx);
        self.show_status_bar(ctx);
        self.show_controls_panel(ctx);
        self.show_results_panel(ctx);

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedSettings {
            style: self.workflow.style(),
            last_directory: self.last_directory.clone(),
        };
        if let Ok(serialized) = serde_json::to_string(&settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}
