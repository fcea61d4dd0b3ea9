use super::ActionProgress;
use super::LogoUploader;
use crate::config::ZoneConfig;
use crate::controller::WidgetEvents;
use crate::upload::sanitize_suffix;
use crate::utils::file_size::FileSizeUtils;
use eframe::egui::{self, Align2, Color32, FontId, Rect, RichText, Sense, Stroke, Vec2};

const ACCENT: Color32 = Color32::from_rgb(161, 89, 225);
const ZONE_HEIGHT: f32 = 140.0;

/// Largest size with the aspect ratio of `image` that fits in `bounds`.
fn fit_within(image: Vec2, bounds: Vec2) -> Vec2 {
    if image.x <= 0.0 || image.y <= 0.0 {
        return Vec2::ZERO;
    }
    let scale = (bounds.x / image.x).min(bounds.y / image.y).min(1.0);
    image * scale
}

impl LogoUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        self.render_prompt(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(20.0);
                ui.vertical_centered(|ui| {
                    ui.heading("Logo Uploader");
                    ui.add_space(5.0);
                    ui.label(
                        RichText::new("Drop PNG images on a zone, pick a suffix, upload")
                            .color(ui.visuals().text_color().gamma_multiply(0.7)),
                    );
                });

                ui.add_space(20.0);

                for zone in self.config.zones.clone() {
                    self.render_zone(ui, &zone);
                    ui.add_space(10.0);
                }

                ui.add_space(10.0);
                self.render_suffix(ui);

                ui.add_space(20.0);
                ui.vertical_centered(|ui| {
                    let gate = self.controller.gate().clone();
                    let label = if self.state.is_uploading {
                        "⏳ Uploading..."
                    } else {
                        "📤 Upload"
                    };
                    let button = egui::Button::new(label).min_size(egui::vec2(200.0, 40.0));
                    let mut response = ui.add_enabled(gate.enabled && !self.state.is_uploading, button);
                    if let Some(tooltip) = &gate.tooltip {
                        response = response.on_disabled_hover_text(tooltip.as_str());
                    }
                    if response.clicked() {
                        self.start_upload(ui.ctx());
                    }
                });

                ui.add_space(20.0);
                self.render_progress(ui);
                self.render_status(ui);
                ui.add_space(20.0);
            });
        });
    }

    fn render_zone(&mut self, ui: &mut egui::Ui, zone: &ZoneConfig) {
        ui.group(|ui| {
            ui.label(RichText::new(zone.label()).strong());
            ui.add_space(4.0);

            let desired = egui::vec2(ui.available_width(), ZONE_HEIGHT);
            let sense = if self.state.is_uploading {
                Sense::hover()
            } else {
                Sense::click()
            };
            let (rect, response) = ui.allocate_exact_size(desired, sense);
            self.state.zone_rects.insert(zone.key.clone(), rect);

            let visuals = ui.visuals().clone();
            let active = self.controller.is_drag_active(&zone.key);
            let (fill, stroke) = if active {
                (ACCENT.gamma_multiply(0.15), Stroke::new(2.0, ACCENT))
            } else if response.hovered() {
                (
                    visuals.extreme_bg_color,
                    Stroke::new(1.0, visuals.widgets.hovered.bg_stroke.color),
                )
            } else {
                (
                    visuals.extreme_bg_color,
                    Stroke::new(1.0, visuals.widgets.noninteractive.bg_stroke.color),
                )
            };
            ui.painter().rect(rect, 8.0, fill, stroke);

            match self.controller.previews().texture(&zone.key) {
                Some(texture) => {
                    let size = fit_within(texture.size_vec2(), rect.shrink(8.0).size());
                    let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                    ui.painter().image(
                        texture.id(),
                        Rect::from_center_size(rect.center(), size),
                        uv,
                        Color32::WHITE,
                    );
                }
                None => {
                    let hint = if active {
                        "Release to select"
                    } else {
                        "Drop a PNG here or click to browse"
                    };
                    ui.painter().text(
                        rect.center(),
                        Align2::CENTER_CENTER,
                        hint,
                        FontId::proportional(14.0),
                        visuals.weak_text_color(),
                    );
                }
            }

            if let Some(file) = self.controller.selection(&zone.key) {
                ui.add_space(4.0);
                ui.label(format!(
                    "{} ({})",
                    file.name,
                    FileSizeUtils::format_size(file.size())
                ));
            }

            if response.clicked() {
                self.choose_file(&zone.key);
            }
        });
    }

    fn render_suffix(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label("Filename suffix");
                ui.add_space(4.0);
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.suffix_input).hint_text("e.g. 2026champs"),
                );
                if response.changed() {
                    self.controller.on_suffix_changed(&self.suffix_input);
                }
                if self.controller.take_focus_request() {
                    response.request_focus();
                }
            });

            let suffix = self.suffix_input.trim();
            if !suffix.is_empty() {
                ui.label(
                    RichText::new(format!("Saved as <zone>{}.png", sanitize_suffix(suffix)))
                        .color(ui.visuals().weak_text_color()),
                );
            }
        });
    }

    fn render_progress(&self, ui: &mut egui::Ui) {
        if matches!(self.state.progress, ActionProgress::NotStarted) {
            return;
        }

        ui.group(|ui| {
            if let Some(current_file) = &self.state.current_file {
                let status_text = match &self.state.progress {
                    ActionProgress::Completed { failed, .. } if *failed > 0 => "Upload Failed",
                    ActionProgress::Completed { .. } => "Upload Complete",
                    _ => "📤 Uploading",
                };
                ui.label(format!("{}: {}", status_text, current_file));
            }

            let progress_bar = egui::ProgressBar::new(self.state.get_progress_percentage())
                .show_percentage()
                .animate(self.state.is_uploading)
                .fill(ACCENT);
            ui.add(progress_bar);

            ui.label(self.state.get_status_text());
        });
    }

    fn render_status(&self, ui: &mut egui::Ui) {
        if let Some(status) = self.controller.status() {
            ui.add_space(10.0);
            ui.vertical_centered(|ui| {
                let color = if status.is_error() {
                    self.error_color
                } else {
                    self.status_color
                };
                ui.colored_label(color, status.text.as_str());

                if let Some(url) = &self.state.last_uploaded {
                    if ui.link("🔗 View last upload").on_hover_text(url.as_str()).clicked() {
                        if let Err(e) = open::that(url) {
                            log::warn!("Failed to open {url}: {e}");
                        }
                    }
                }
            });
        }
    }

    /// Overwrite confirmation for the running batch.
    fn render_prompt(&mut self, ctx: &egui::Context) {
        let Some(request) = &self.state.pending_prompt else {
            return;
        };

        let mut answer = None;
        egui::Window::new("File already exists")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(request.message.as_str());
                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    if ui.button("Overwrite").clicked() {
                        answer = Some(true);
                    }
                    if ui.button("Skip").clicked() {
                        answer = Some(false);
                    }
                });
            });

        if let Some(overwrite) = answer {
            self.answer_prompt(overwrite);
        }
    }
}
