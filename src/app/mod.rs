mod state;
mod ui;

use crate::upload::{
    ConfigError, FormLayout, MediaHost, SelectedFile, SubmitDecision, UploadCoordinator,
};
use eframe::{egui, App};
pub use state::UploadState;
use std::path::PathBuf;
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// One admin form with its own coordinator and view state.
pub struct FormPage {
    pub layout: FormLayout,
    pub coordinator: UploadCoordinator,
    pub state: UploadState,
}

impl FormPage {
    fn new(host: Arc<dyn MediaHost>, layout: FormLayout) -> Result<Self, ConfigError> {
        let (sender, receiver) = std_mpsc::channel();
        let coordinator =
            UploadCoordinator::new(host, vec![layout.clone()])?.with_status_sender(sender);
        Ok(Self {
            layout,
            coordinator,
            state: UploadState::new(receiver),
        })
    }
}

pub enum UiAction {
    Pick(String),
    Submit,
}

pub struct HostelMediaApp {
    pages: Vec<FormPage>,
    active: usize,
    runtime: Runtime,
}

impl HostelMediaApp {
    pub fn new(
        host: Arc<dyn MediaHost>,
        layouts: Vec<FormLayout>,
        runtime: Runtime,
    ) -> Result<Self, ConfigError> {
        let pages = layouts
            .into_iter()
            .map(|layout| FormPage::new(host.clone(), layout))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(forms = pages.len(), "Initialized hostel media uploader");
        Ok(Self {
            pages,
            active: 0,
            runtime,
        })
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::Pick(input_id) => self.pick_files(&input_id),
            UiAction::Submit => self.submit(),
        }
    }

    fn pick_files(&mut self, input_id: &str) {
        let Some(page) = self.pages.get_mut(self.active) else {
            return;
        };
        let Some(target) = page.coordinator.target(input_id).cloned() else {
            return;
        };

        let kind = target.resource_kind;
        let dialog = rfd::FileDialog::new().add_filter(kind.as_str(), kind.extensions());
        // A cancelled dialog is an empty selection.
        let paths: Vec<PathBuf> = if target.multiple {
            dialog.pick_files().unwrap_or_default()
        } else {
            dialog.pick_file().into_iter().collect()
        };

        let mut files = Vec::new();
        for path in paths {
            match SelectedFile::from_path(&path) {
                Ok(file) => files.push(file),
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Skipping unreadable file");
                    page.state.warning = Some(format!("Could not read {}: {}", path.display(), e));
                }
            }
        }

        page.state.notice = None;
        let coordinator = page.coordinator.clone();
        let input_id = input_id.to_string();
        self.runtime.spawn(async move {
            let results = coordinator.handle_selection(&input_id, files).await;
            tracing::debug!(input = %input_id, uploaded = results.len(), "Selection finished");
        });
    }

    fn submit(&mut self) {
        let Some(page) = self.pages.get_mut(self.active) else {
            return;
        };

        match page.coordinator.guard_submit(&page.layout.form_id) {
            SubmitDecision::Blocked { warning } => {
                page.state.warning = Some(warning);
            }
            SubmitDecision::Proceed(submission) => {
                page.state.warning = None;
                let Some(path) = rfd::FileDialog::new()
                    .set_file_name(format!("{}.json", submission.form_id))
                    .add_filter("json", &["json"])
                    .save_file()
                else {
                    return;
                };

                let written = serde_json::to_string_pretty(&submission)
                    .map_err(|e| e.to_string())
                    .and_then(|json| std::fs::write(&path, json).map_err(|e| e.to_string()));
                match written {
                    Ok(()) => {
                        tracing::info!(form = %submission.form_id, path = %path.display(), "Saved form submission");
                        page.state.notice = Some(format!("Saved to {}", path.display()));
                    }
                    Err(e) => {
                        tracing::error!(form = %submission.form_id, error = %e, "Failed to save form submission");
                        page.state.warning = Some(format!("Failed to save form: {}", e));
                    }
                }
            }
        }
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        for page in &mut self.pages {
            page.state.drain();
        }
        // Uploads finish off the UI thread, so keep polling.
        ctx.request_repaint();
    }
}

impl App for HostelMediaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        if let Some(action) = self.render(ctx) {
            self.apply(action);
        }
    }
}
