//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::{CapturedImage, HttpStagingClient, StagingService};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::ui::app::decode_preview_image;

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, server_url: String) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let client = match HttpStagingClient::new(&server_url) {
            Ok(client) => client,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_staging_error(
                    UiErrorContext::BackendStartup,
                    &err,
                )));
                tracing::error!(%server_url, "failed to build staging client: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Backend worker ready ({})",
                client.server_url()
            )));

            while let Ok(cmd) = cmd_rx.recv() {
                let event = match cmd {
                    BackendCommand::LoadImageFile { path } => {
                        match CapturedImage::from_file(&path).await {
                            Ok(image) => UiEvent::ImageLoaded(image),
                            Err(err) => UiEvent::Error(UiError::from_staging_error(
                                UiErrorContext::SelectImage,
                                &err,
                            )),
                        }
                    }
                    BackendCommand::Stage(submission) => {
                        tracing::info!(submission = submission.id.0, "backend: stage");
                        let result = client
                            .stage(
                                &submission.image,
                                submission.style,
                                &submission.description,
                            )
                            .await;
                        UiEvent::StageFinished {
                            id: submission.id,
                            result,
                        }
                    }
                    BackendCommand::FetchStagedImage { url } => {
                        match client.fetch_image(&url).await {
                            Ok(bytes) => match decode_preview_image(&bytes) {
                                Ok(image) => UiEvent::StagedImageLoaded {
                                    url,
                                    image,
                                    original_bytes: bytes,
                                },
                                Err(reason) => UiEvent::StagedImageFailed { url, reason },
                            },
                            Err(err) => UiEvent::StagedImageFailed {
                                url,
                                reason: err.user_message(),
                            },
                        }
                    }
                };
                if ui_tx.send(event).is_err() {
                    tracing::debug!("ui event receiver dropped; stopping backend worker");
                    break;
                }
            }
        });
    });
}
