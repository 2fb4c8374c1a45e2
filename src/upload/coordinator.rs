use crate::upload::client::MediaHost;
use crate::upload::error::{ConfigError, UploadError};
use crate::upload::layout::{FormLayout, GUARDED_FORMS};
use crate::upload::types::{
    FileStatus, FormSubmission, ResourceKind, SelectedFile, StatusClass, StatusDisplay,
    SubmitDecision, UploadResult, UploadStatus, UploadTarget,
};
use derivative::Derivative;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const SUBMIT_WARNING: &str = "Please wait for all uploads to complete before submitting.";

#[derive(Debug, Default)]
struct PageState {
    statuses: HashMap<String, StatusDisplay>,
    hidden_fields: HashMap<String, String>,
    in_flight: HashMap<String, usize>,
}

fn lock(page: &Mutex<PageState>) -> MutexGuard<'_, PageState> {
    page.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds one slot of a form's in-flight counter; the slot is released on
/// drop, so an aborted upload re-enables the form too.
struct InFlight {
    page: Arc<Mutex<PageState>>,
    form_id: String,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        let mut page = lock(&self.page);
        if let Some(count) = page.in_flight.get_mut(&self.form_id) {
            *count = count.saturating_sub(1);
        }
    }
}

/// Uploads selected files to the media host, records the resulting URLs in
/// hidden fields and keeps each form's submit control disabled while any of
/// its uploads is running.
///
/// Cloning is cheap and every clone shares the same page state, so each
/// selection can run as its own task.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct UploadCoordinator {
    #[derivative(Debug = "ignore")]
    host: Arc<dyn MediaHost>,
    targets: Arc<Vec<UploadTarget>>,
    guarded_forms: Arc<HashSet<String>>,
    page: Arc<Mutex<PageState>>,
    #[derivative(Debug = "ignore")]
    status_sender: Option<Sender<FileStatus>>,
}

impl UploadCoordinator {
    pub fn new(host: Arc<dyn MediaHost>, forms: Vec<FormLayout>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        let mut targets = Vec::new();
        for form in forms {
            for target in form.targets {
                if !seen.insert(target.input_id.clone()) {
                    return Err(ConfigError::DuplicateInput(target.input_id));
                }
                targets.push(target);
            }
        }

        Ok(Self {
            host,
            targets: Arc::new(targets),
            guarded_forms: Arc::new(GUARDED_FORMS.iter().map(|f| f.to_string()).collect()),
            page: Arc::new(Mutex::new(PageState::default())),
            status_sender: None,
        })
    }

    #[cfg(test)]
    pub fn with_guarded_forms<I, S>(mut self, forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.guarded_forms = Arc::new(forms.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_status_sender(mut self, sender: Sender<FileStatus>) -> Self {
        self.status_sender = Some(sender);
        self
    }

    pub fn targets(&self) -> &[UploadTarget] {
        &self.targets
    }

    pub fn target(&self, input_id: &str) -> Option<&UploadTarget> {
        self.targets.iter().find(|t| t.input_id == input_id)
    }

    pub fn status(&self, status_element_id: &str) -> StatusDisplay {
        lock(&self.page)
            .statuses
            .get(status_element_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn hidden_value(&self, hidden_field_id: &str) -> String {
        lock(&self.page)
            .hidden_fields
            .get(hidden_field_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn in_flight(&self, form_id: &str) -> usize {
        lock(&self.page).in_flight.get(form_id).copied().unwrap_or(0)
    }

    pub fn submit_enabled(&self, form_id: &str) -> bool {
        self.in_flight(form_id) == 0
    }

    /// Uploads a single file for `target`. Every failure ends up in the
    /// status display; the URL is returned only on success.
    pub async fn upload_one(
        &self,
        file: Option<&SelectedFile>,
        target: &UploadTarget,
    ) -> Option<String> {
        let Some(file) = file else {
            tracing::warn!(input = %target.input_id, "Upload requested without a file");
            self.set_status(target, UploadError::NoFileSelected.to_string(), StatusClass::Error);
            return None;
        };

        self.set_status(
            target,
            format!("Uploading {}...", file.name),
            StatusClass::Pending,
        );
        let _in_flight = self.begin_upload(&target.form_id);
        self.notify(file, target, UploadStatus::Processing);
        tracing::info!(
            file = %file.name,
            input = %target.input_id,
            kind = %target.resource_kind,
            "Uploading file",
        );

        let outcome = match self.host.upload(file, target.resource_kind).await {
            Ok(response) => response.into_outcome(),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(url) => {
                tracing::info!(file = %file.name, %url, "Upload succeeded");
                self.set_status(
                    target,
                    format!("Uploaded {} successfully!", file.name),
                    StatusClass::Success,
                );
                self.record_url(target, &url);
                self.notify(file, target, UploadStatus::Success(url.clone()));
                Some(url)
            }
            Err(UploadError::Rejected(reason)) => {
                tracing::warn!(file = %file.name, %reason, "Upload rejected by media host");
                let message = format!("Upload failed for {}: {}", file.name, reason);
                self.set_status(target, message.clone(), StatusClass::Error);
                self.notify(file, target, UploadStatus::Error(message));
                None
            }
            Err(e) => {
                tracing::error!(file = %file.name, error = %e, "Upload error");
                let message = format!("An error occurred during upload for {}.", file.name);
                self.set_status(target, message.clone(), StatusClass::Error);
                self.notify(file, target, UploadStatus::Error(message));
                None
            }
        }
    }

    /// Replaces the target's URL list with the uploads of `files`, one file
    /// at a time in selection order.
    pub async fn handle_multi_image_selection(
        &self,
        target: &UploadTarget,
        files: &[SelectedFile],
    ) -> Vec<UploadResult> {
        if files.is_empty() {
            return Vec::new();
        }

        lock(&self.page)
            .hidden_fields
            .insert(target.hidden_field_id.clone(), String::new());

        let mut results = Vec::new();
        for file in files {
            if let Some(remote_url) = self.upload_one(Some(file), target).await {
                results.push(UploadResult {
                    source_file_name: file.name.clone(),
                    remote_url,
                });
            }
        }
        results
    }

    /// Uploads the first selected file; any others are ignored.
    pub async fn handle_single_file_selection(
        &self,
        target: &UploadTarget,
        files: &[SelectedFile],
    ) -> Option<UploadResult> {
        let file = files.first();
        let remote_url = self.upload_one(file, target).await?;
        file.map(|f| UploadResult {
            source_file_name: f.name.clone(),
            remote_url,
        })
    }

    pub async fn handle_selection(
        &self,
        input_id: &str,
        files: Vec<SelectedFile>,
    ) -> Vec<UploadResult> {
        let Some(target) = self.target(input_id).cloned() else {
            tracing::warn!(input = %input_id, "Selection for an unconfigured input");
            return Vec::new();
        };

        if target.multiple {
            self.handle_multi_image_selection(&target, &files).await
        } else {
            self.handle_single_file_selection(&target, &files)
                .await
                .into_iter()
                .collect()
        }
    }

    /// Decides whether `form_id` may be submitted now. Guarded forms are held
    /// back while any of their uploads is still running.
    pub fn guard_submit(&self, form_id: &str) -> SubmitDecision {
        if self.guarded_forms.contains(form_id) && !self.submit_enabled(form_id) {
            tracing::warn!(form = %form_id, in_flight = self.in_flight(form_id), "{}", SUBMIT_WARNING);
            return SubmitDecision::Blocked {
                warning: SUBMIT_WARNING.to_string(),
            };
        }
        SubmitDecision::Proceed(self.form_submission(form_id))
    }

    pub fn form_submission(&self, form_id: &str) -> FormSubmission {
        let page = lock(&self.page);
        let fields: BTreeMap<String, String> = self
            .targets
            .iter()
            .filter(|t| t.form_id == form_id)
            .map(|t| {
                let value = page
                    .hidden_fields
                    .get(&t.hidden_field_id)
                    .cloned()
                    .unwrap_or_default();
                (t.hidden_field_id.clone(), value)
            })
            .collect();

        FormSubmission {
            form_id: form_id.to_string(),
            fields,
        }
    }

    fn begin_upload(&self, form_id: &str) -> InFlight {
        *lock(&self.page)
            .in_flight
            .entry(form_id.to_string())
            .or_insert(0) += 1;
        InFlight {
            page: self.page.clone(),
            form_id: form_id.to_string(),
        }
    }

    fn set_status(&self, target: &UploadTarget, text: String, class: StatusClass) {
        lock(&self.page)
            .statuses
            .insert(target.status_element_id.clone(), StatusDisplay { text, class });
    }

    fn record_url(&self, target: &UploadTarget, url: &str) {
        let mut page = lock(&self.page);
        let field = page
            .hidden_fields
            .entry(target.hidden_field_id.clone())
            .or_default();
        match target.resource_kind {
            ResourceKind::Image => {
                // Blank lines are dropped; other entries are kept as written.
                let mut urls: Vec<&str> = field
                    .split('\n')
                    .filter(|entry| !entry.trim().is_empty())
                    .collect();
                urls.push(url);
                *field = urls.join("\n");
            }
            ResourceKind::Video => *field = url.to_string(),
        }
    }

    fn notify(&self, file: &SelectedFile, target: &UploadTarget, status: UploadStatus) {
        if let Some(sender) = &self.status_sender {
            sender
                .send(FileStatus {
                    name: file.name.clone(),
                    input_id: target.input_id.clone(),
                    size: Some(file.size),
                    status,
                })
                .unwrap_or_default();
        }
    }
}
