use crate::upload::{FileStatus, UploadStatus};
use derivative::Derivative;
use std::sync::mpsc::Receiver;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UploadTally {
    pub started: usize,
    pub successful: usize,
    pub failed: usize,
}

impl UploadTally {
    pub fn running(&self) -> usize {
        self.started.saturating_sub(self.successful + self.failed)
    }

    fn record(&mut self, status: &UploadStatus) {
        match status {
            UploadStatus::Processing => self.started += 1,
            UploadStatus::Success(_) => self.successful += 1,
            UploadStatus::Error(_) => self.failed += 1,
        }
    }
}

/// Per-page view state fed by the coordinator's status channel.
#[derive(Derivative, Default)]
#[derivative(Debug)]
pub struct UploadState {
    pub tally: UploadTally,
    pub file_statuses: Vec<FileStatus>,
    pub notice: Option<String>,
    pub warning: Option<String>,
    pub show_details: bool,
    #[derivative(Debug = "ignore")]
    pub status_receiver: Option<Receiver<FileStatus>>,
}

impl UploadState {
    pub fn new(status_receiver: Receiver<FileStatus>) -> Self {
        Self {
            status_receiver: Some(status_receiver),
            ..Default::default()
        }
    }

    /// Pulls pending statuses off the channel; returns whether any arrived.
    pub fn drain(&mut self) -> bool {
        let Some(receiver) = &self.status_receiver else {
            return false;
        };

        let mut had_updates = false;
        while let Ok(status) = receiver.try_recv() {
            had_updates = true;
            self.tally.record(&status.status);
            if !matches!(status.status, UploadStatus::Processing) {
                self.file_statuses.push(status);
            }
        }
        had_updates
    }

    pub fn clear_history(&mut self) {
        self.tally = UploadTally::default();
        self.file_statuses.clear();
        self.notice = None;
        self.warning = None;
    }

    pub fn get_status_text(&self) -> String {
        if self.tally.started == 0 {
            return String::new();
        }
        format!(
            "Uploads: {} running | ✅ Success: {} | ❌ Failed: {}",
            self.tally.running(),
            self.tally.successful,
            self.tally.failed
        )
    }
}
