//! Scripted in-process media host for coordinator tests.

use crate::upload::client::{HostResponse, MediaHost};
use crate::upload::error::UploadError;
use crate::upload::types::{ResourceKind, SelectedFile};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Notify;

#[derive(Debug, Clone)]
pub enum Reply {
    Url(String),
    Reject(HostResponse),
    Transport(String),
}

/// Answers uploads from a per-file script. Unscripted files succeed with
/// `https://res.test/<kind>/<name>`.
#[derive(Default)]
pub struct ScriptedHost {
    replies: HashMap<String, Reply>,
    holds: HashMap<String, Arc<Notify>>,
    started: Option<UnboundedSender<String>>,
    events: Mutex<Vec<String>>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(mut self, file_name: &str, reply: Reply) -> Self {
        self.replies.insert(file_name.to_string(), reply);
        self
    }

    /// The upload of `file_name` waits until the returned handle is notified.
    pub fn with_hold(mut self, file_name: &str) -> (Self, Arc<Notify>) {
        let notify = Arc::new(Notify::new());
        self.holds.insert(file_name.to_string(), notify.clone());
        (self, notify)
    }

    pub fn with_started(mut self, sender: UnboundedSender<String>) -> Self {
        self.started = Some(sender);
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| event.starts_with("start:"))
            .count()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn default_url(kind: ResourceKind, file_name: &str) -> String {
    format!("https://res.test/{}/{}", kind, file_name)
}

#[async_trait]
impl MediaHost for ScriptedHost {
    async fn upload(
        &self,
        file: &SelectedFile,
        kind: ResourceKind,
    ) -> Result<HostResponse, UploadError> {
        self.record(format!("start:{}", file.name));
        if let Some(sender) = &self.started {
            let _ = sender.send(file.name.clone());
        }

        if let Some(hold) = self.holds.get(&file.name) {
            hold.notified().await;
        }
        tokio::task::yield_now().await;

        self.record(format!("end:{}", file.name));

        match self.replies.get(&file.name) {
            Some(Reply::Url(url)) => Ok(HostResponse::with_url(url.clone())),
            Some(Reply::Reject(body)) => Ok(body.clone()),
            Some(Reply::Transport(detail)) => Err(UploadError::Transport(detail.clone())),
            None => Ok(HostResponse::with_url(default_url(kind, &file.name))),
        }
    }
}
