use super::{HostelMediaApp, UiAction};
use crate::upload::{parse_url_list, ResourceKind, StatusClass, UploadStatus};
use crate::utils::file_size::format_size;
use eframe::egui::{self, Color32, RichText};

const ACCENT: Color32 = Color32::from_rgb(161, 89, 225);
const SUCCESS: Color32 = Color32::from_rgb(0, 180, 0);
const ERROR: Color32 = Color32::from_rgb(220, 50, 50);
const MUTED: Color32 = Color32::from_rgb(150, 150, 150);

fn status_color(class: StatusClass) -> Color32 {
    match class {
        StatusClass::Pending => MUTED,
        StatusClass::Success => SUCCESS,
        StatusClass::Error => ERROR,
    }
}

impl HostelMediaApp {
    pub fn render(&mut self, ctx: &egui::Context) -> Option<UiAction> {
        let mut action = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(20.0);
            ui.vertical_centered(|ui| {
                ui.heading("Hostel Media Uploader");
                ui.add_space(5.0);
                ui.label(
                    RichText::new("Upload room and hostel media before saving a form")
                        .color(ui.visuals().text_color().gamma_multiply(0.7)),
                );
            });

            ui.add_space(20.0);

            let titles: Vec<String> = self.pages.iter().map(|p| p.layout.title.clone()).collect();
            ui.horizontal(|ui| {
                for (index, title) in titles.into_iter().enumerate() {
                    ui.selectable_value(&mut self.active, index, title);
                }
            });

            ui.add_space(10.0);

            egui::ScrollArea::vertical().show(ui, |ui| {
                action = self.render_page(ui);
            });
        });

        action
    }

    fn render_page(&mut self, ui: &mut egui::Ui) -> Option<UiAction> {
        let page = self.pages.get_mut(self.active)?;
        let mut action = None;

        for target in page.coordinator.targets() {
            ui.group(|ui| {
                ui.set_width(ui.available_width());
                let label = match (target.resource_kind, target.multiple) {
                    (ResourceKind::Image, true) => "Images",
                    (ResourceKind::Image, false) => "Image",
                    (ResourceKind::Video, _) => "Video",
                };
                ui.horizontal(|ui| {
                    ui.label(RichText::new(label).strong());
                    if ui.button(format!("📁 Select {}", label)).clicked() {
                        action = Some(UiAction::Pick(target.input_id.clone()));
                    }
                });

                let status = page.coordinator.status(&target.status_element_id);
                if !status.text.is_empty() {
                    ui.colored_label(status_color(status.class), status.text.as_str());
                }

                for url in parse_url_list(&page.coordinator.hidden_value(&target.hidden_field_id)) {
                    if ui.link(url.as_str()).clicked() {
                        if let Err(e) = open::that(&url) {
                            tracing::warn!(%url, error = %e, "Failed to open link");
                        }
                    }
                }
            });
            ui.add_space(10.0);
        }

        ui.add_space(10.0);

        let form_id = page.layout.form_id.clone();
        ui.vertical_centered(|ui| {
            let enabled = page.coordinator.submit_enabled(&form_id);
            let button = egui::Button::new("💾 Save Form").min_size(egui::vec2(200.0, 40.0));
            if ui.add_enabled(enabled, button).clicked() {
                action = Some(UiAction::Submit);
            }
            if !enabled {
                ui.label(
                    RichText::new(format!(
                        "{} upload(s) in progress",
                        page.coordinator.in_flight(&form_id)
                    ))
                    .color(MUTED),
                );
            }
        });

        ui.add_space(10.0);

        let summary = page.state.get_status_text();
        if !summary.is_empty() {
            ui.label(summary);
        }
        if let Some(warning) = &page.state.warning {
            ui.colored_label(ERROR, warning.as_str());
        }
        if let Some(notice) = &page.state.notice {
            ui.colored_label(SUCCESS, notice.as_str());
        }

        if !page.state.file_statuses.is_empty() {
            ui.add_space(10.0);
            self.render_details(ui);
        }

        action
    }

    fn render_details(&mut self, ui: &mut egui::Ui) {
        let Some(page) = self.pages.get_mut(self.active) else {
            return;
        };
        let state = &mut page.state;

        ui.horizontal(|ui| {
            if ui
                .button(if state.show_details {
                    "Hide Details"
                } else {
                    "Show Details"
                })
                .clicked()
            {
                state.show_details = !state.show_details;
            }
            if ui.button("🗑 Clear").clicked() {
                state.clear_history();
            }
        });

        if !state.show_details {
            return;
        }

        egui::ScrollArea::vertical()
            .id_source("upload_details")
            .max_height(200.0)
            .show(ui, |ui| {
                egui::Frame::none()
                    .fill(ui.style().visuals.extreme_bg_color)
                    .show(ui, |ui| {
                        ui.add_space(8.0);
                        for status in &state.file_statuses {
                            let name = match status.size {
                                Some(size) => format!("{} ({})", status.name, format_size(size)),
                                None => status.name.clone(),
                            };
                            ui.horizontal(|ui| match &status.status {
                                UploadStatus::Processing => {
                                    ui.label("⏳");
                                    ui.colored_label(MUTED, format!("{} - Uploading...", name));
                                }
                                UploadStatus::Success(url) => {
                                    ui.label("✅");
                                    ui.colored_label(SUCCESS, name.as_str());
                                    ui.label(RichText::new(url).color(ACCENT));
                                }
                                UploadStatus::Error(err) => {
                                    ui.label("❌");
                                    ui.colored_label(ERROR, format!("{} - {}", name, err));
                                }
                            });
                            ui.add_space(4.0);
                        }
                        ui.add_space(8.0);
                    });
            });
    }
}
