//! Panels of the main window: capture, inputs, results, camera overlay.

use client_core::{ImageCard, ImageSource, WorkflowStatus};
use eframe::egui;
use egui::TextureHandle;
use shared::domain::StagingStyle;

use crate::controller::events::err_label;
use crate::ui::app::StagingApp;

const PREVIEW_HEIGHT: f32 = 380.0;
const DESCRIPTION_HINT: &str = "e.g., add a large sectional sofa, a ficus tree in the corner, and make the color palette neutral with pops of blue.";

fn show_texture(ui: &mut egui::Ui, texture: &TextureHandle, max: egui::Vec2) {
    ui.add(
        egui::Image::from_texture(texture)
            .max_size(max)
            .maintain_aspect_ratio(true),
    );
}

fn show_placeholder(ui: &mut egui::Ui, text: &str, height: f32) {
    ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui| {
        ui.centered_and_justified(|ui| {
            ui.weak(text);
        });
    });
}

impl StagingApp {
    pub(crate) fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.weak(format!("Server: {}", self.server_url));
                ui.separator();
                ui.label(&self.status);
            });
        });
    }

    pub(crate) fn show_controls_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(420.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.show_banner(ui);
                    self.show_capture_section(ui);
                    ui.add_space(12.0);
                    self.show_style_selector(ui);
                    ui.add_space(12.0);
                    self.show_description_input(ui);
                    ui.add_space(12.0);
                    self.show_submit(ui);
                });
            });
    }

    fn show_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = &self.banner else {
            return;
        };
        let mut dismissed = false;
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.colored_label(
                        ui.visuals().error_fg_color,
                        format!("{}: {}", err_label(banner.category()), banner.message()),
                    );
                    dismissed = ui.small_button("Dismiss").clicked();
                });
            });
        if dismissed {
            self.banner = None;
        }
        ui.add_space(8.0);
    }

    fn show_capture_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("1. Add an Empty Room Photo");
        let has_image = self.workflow.image().is_some();
        let busy = self.workflow.is_submitting();

        match self.workflow.preview() {
            Some(handle) => match self.workflow.previews().texture(handle) {
                Some(texture) => {
                    show_texture(ui, texture, egui::vec2(ui.available_width(), 240.0))
                }
                None => show_placeholder(ui, "Preview unavailable for this file.", 240.0),
            },
            None => show_placeholder(ui, "No photo selected yet.", 120.0),
        }
        if let Some(image) = self.workflow.image() {
            ui.weak(format!("{} ({})", image.file_name(), image.mime_type()));
        }

        ui.horizontal(|ui| {
            let upload_label = if has_image { "Change File" } else { "Upload File" };
            if ui.add_enabled(!busy, egui::Button::new(upload_label)).clicked() {
                self.pick_image_file();
            }
            let camera_label = if has_image { "Retake" } else { "Use Camera" };
            if ui.add_enabled(!busy, egui::Button::new(camera_label)).clicked() {
                self.open_camera();
            }
        });
    }

    fn show_style_selector(&mut self, ui: &mut egui::Ui) {
        ui.heading("2. Choose a Style");
        let mut selected = self.workflow.style();
        egui::ComboBox::from_id_salt("staging_style")
            .selected_text(selected.label())
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                for style in StagingStyle::ALL {
                    ui.selectable_value(&mut selected, *style, style.label());
                }
            });
        if selected != self.workflow.style() {
            self.workflow.set_style(selected);
        }
    }

    fn show_description_input(&mut self, ui: &mut egui::Ui) {
        ui.heading("3. Add Details (Optional)");
        ui.add(
            egui::TextEdit::multiline(self.workflow.description_mut())
                .hint_text(DESCRIPTION_HINT)
                .desired_rows(4)
                .desired_width(f32::INFINITY),
        );
    }

    fn show_submit(&mut self, ui: &mut egui::Ui) {
        let submitting = self.workflow.is_submitting();
        let label = if submitting { "Staging..." } else { "Stage My Room" };
        ui.horizontal(|ui| {
            let button = egui::Button::new(egui::RichText::new(label).strong())
                .min_size(egui::vec2(ui.available_width() - 32.0, 36.0));
            if ui.add_enabled(self.workflow.can_submit(), button).clicked() {
                self.submit();
            }
            if submitting {
                ui.spinner();
            }
        });
        if let Some(error) = self.workflow.error() {
            ui.colored_label(ui.visuals().error_fg_color, error);
        }
    }

    pub(crate) fn show_results_panel(&mut self, ctx: &egui::Context) {
        let display = self.workflow.display();
        let mut save_requested = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                self.show_image_card(&mut columns[0], &display.original);
                self.show_image_card(&mut columns[1], &display.staged);
            });
            let can_save = self
                .staged
                .as_ref()
                .is_some_and(|staged| !staged.bytes.is_empty());
            if can_save && ui.button("Save staged image...").clicked() {
                save_requested = true;
            }
        });
        if save_requested {
            self.save_staged_image();
        }
    }

    fn show_image_card(&self, ui: &mut egui::Ui, card: &ImageCard) {
        ui.vertical_centered(|ui| {
            ui.heading(card.title);
        });
        let max = egui::vec2(ui.available_width(), PREVIEW_HEIGHT);
        match &card.source {
            None => show_placeholder(ui, card.placeholder, PREVIEW_HEIGHT),
            Some(ImageSource::Preview(handle)) => {
                match self.workflow.previews().texture(*handle) {
                    Some(texture) => show_texture(ui, texture, max),
                    None => show_placeholder(ui, "Preview unavailable.", PREVIEW_HEIGHT),
                }
            }
            Some(ImageSource::Url(url)) => {
                let staged = self.staged.as_ref().filter(|staged| &staged.url == url);
                if let Some(texture) = staged.and_then(|staged| staged.texture.as_ref()) {
                    show_texture(ui, texture, max);
                } else if staged.is_some_and(|staged| staged.failure.is_some()) {
                    show_placeholder(ui, "Could not load the staged image.", PREVIEW_HEIGHT);
                } else {
                    ui.allocate_ui(egui::vec2(max.x, PREVIEW_HEIGHT), |ui| {
                        ui.centered_and_justified(|ui| {
                            ui.spinner();
                        });
                    });
                }
            }
        }
        if card.source.is_none() && self.workflow.status() == WorkflowStatus::Submitting {
            ui.vertical_centered(|ui| {
                ui.spinner();
            });
        }
    }

    pub(crate) fn show_camera_window(&mut self, ctx: &egui::Context) {
        if !self.capture.is_open() {
            return;
        }

        let mut take_photo = false;
        let mut cancel = false;
        egui::Window::new("Camera")
            .collapsible(false)
            .resizable(true)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                if let Some(message) = self.capture.error_message() {
                    ui.colored_label(ui.visuals().error_fg_color, message);
                    cancel = ui.button("Close").clicked();
                    return;
                }
                match &self.camera_texture {
                    Some(texture) => show_texture(ui, texture, egui::vec2(720.0, 480.0)),
                    None => show_placeholder(ui, "Starting camera...", 240.0),
                }
                ui.horizontal(|ui| {
                    cancel = ui.button("Cancel").clicked();
                    take_photo = ui
                        .add_enabled(
                            self.camera_texture.is_some(),
                            egui::Button::new("Take Photo"),
                        )
                        .clicked();
                });
            });

        if take_photo {
            self.take_photo();
        } else if cancel {
            self.cancel_camera();
        }
    }
}
