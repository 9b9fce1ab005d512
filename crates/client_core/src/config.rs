use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;

use crate::capture::FacingPreference;

pub const SETTINGS_FILE_NAME: &str = "staging.toml";
const APP_DIR_NAME: &str = "room_stager";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub server_url: String,
    pub camera_facing: FacingPreference,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".into(),
            camera_facing: FacingPreference::Environment,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    camera_facing: Option<FacingPreference>,
}

impl ClientSettings {
    /// Defaults, then the settings file, then environment overrides.
    pub fn load(explicit_path: Option<&Path>) -> anyhow::Result<Self> {
        let mut settings = Self::default();

        let path = match explicit_path {
            Some(path) => Some(path.to_path_buf()),
            None => default_settings_path(),
        };
        if let Some(path) = path {
            settings.apply_file(&path, explicit_path.is_some())?;
        }

        settings.apply_env(|name| env::var(name).ok());
        Ok(settings)
    }

    fn apply_file(&mut self, path: &Path, required: bool) -> anyhow::Result<()> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read settings file '{}'", path.display()))
            }
        };
        self.apply_toml(&raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded client settings file");
        Ok(())
    }

    pub fn apply_toml(&mut self, raw: &str) -> anyhow::Result<()> {
        let file_cfg: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file_cfg.server_url {
            self.server_url = v;
        }
        if let Some(v) = file_cfg.camera_facing {
            self.camera_facing = v;
        }
        Ok(())
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty("STAGING_SERVER_URL") {
            self.server_url = v;
        }
        if let Some(v) = non_empty("APP__SERVER_URL") {
            self.server_url = v;
        }
        if let Some(v) = non_empty("APP__CAMERA_FACING") {
            match FacingPreference::parse(&v) {
                Some(facing) => self.camera_facing = facing,
                None => tracing::warn!(value = %v, "ignoring unknown APP__CAMERA_FACING"),
            }
        }
    }
}

/// `./staging.toml` if present, else the per-user config directory.
pub fn default_settings_path() -> Option<PathBuf> {
    let local = PathBuf::from(SETTINGS_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME))
}
