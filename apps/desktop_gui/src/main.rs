mod backend_bridge;
mod controller;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use client_core::{CameraBackend, ClientSettings};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::app::{PersistedSettings, SETTINGS_STORAGE_KEY};
use crate::ui::{StagingApp, StartupConfig};

#[derive(Parser, Debug)]
#[command(name = "room-stager", about = "Stage empty-room photos with an AI backend")]
struct Args {
    /// Base URL of the staging service; `/api/stage` is appended.
    #[arg(long)]
    server_url: Option<String>,
    /// Settings file to load instead of the default `staging.toml` lookup.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn camera_backend() -> Box<dyn CameraBackend> {
    #[cfg(feature = "native-camera")]
    {
        Box::new(client_core::NativeCamera)
    }
    #[cfg(not(feature = "native-camera"))]
    {
        Box::new(client_core::UnavailableCamera)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut settings =
        ClientSettings::load(args.config.as_deref()).context("failed to load client settings")?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    tracing::info!(server_url = %settings.server_url, "starting room stager");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings.server_url.clone());

    let startup = StartupConfig {
        server_url: settings.server_url,
        camera_facing: settings.camera_facing,
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Room Stager")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Room Stager",
        options,
        Box::new(|cc| {
            let persisted = cc.storage.and_then(|storage| {
                storage
                    .get_string(SETTINGS_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<PersistedSettings>(&text).ok())
            });
            Ok(Box::new(StagingApp::new(
                cc.egui_ctx.clone(),
                startup,
                camera_backend(),
                cmd_tx,
                ui_rx,
                persisted,
            )))
        }),
    )
    .map_err(|err| anyhow::anyhow!("failed to run desktop GUI: {err}"))
}
