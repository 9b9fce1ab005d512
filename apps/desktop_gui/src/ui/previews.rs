//! Texture-backed display handles for captured images.

use std::collections::HashMap;

use client_core::{CapturedImage, PreviewHandle, PreviewStore};
use eframe::egui;
use egui::TextureHandle;

use crate::ui::app::decode_preview_image;

/// Uploads each captured image as a texture; releasing a handle frees it.
pub struct TexturePreviews {
    ctx: egui::Context,
    textures: HashMap<PreviewHandle, TextureHandle>,
}

impl TexturePreviews {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            textures: HashMap::new(),
        }
    }

    pub fn context(&self) -> &egui::Context {
        &self.ctx
    }

    pub fn texture(&self, handle: PreviewHandle) -> Option<&TextureHandle> {
        self.textures.get(&handle)
    }
}

impl PreviewStore for TexturePreviews {
    fn create(&mut self, image: &CapturedImage) -> PreviewHandle {
        let handle = PreviewHandle::next();
        match decode_preview_image(image.bytes()) {
            Ok(preview) => {
                let texture = self.ctx.load_texture(
                    handle.to_string(),
                    preview.color_image(),
                    egui::TextureOptions::LINEAR,
                );
                self.textures.insert(handle, texture);
            }
            Err(err) => {
                tracing::warn!(file = image.file_name(), "image preview decode failed: {err}");
            }
        }
        handle
    }

    fn release(&mut self, handle: PreviewHandle) {
        self.textures.remove(&handle);
    }
}
