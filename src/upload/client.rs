use crate::config::MediaHostConfig;
use crate::upload::error::UploadError;
use crate::upload::types::{ResourceKind, SelectedFile};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostErrorBody {
    pub message: Option<String>,
}

/// JSON body returned by the upload endpoint, for both accepted and
/// rejected uploads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostResponse {
    pub secure_url: Option<String>,
    pub error: Option<HostErrorBody>,
}

impl HostResponse {
    #[cfg(test)]
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            secure_url: Some(url.into()),
            error: None,
        }
    }

    #[cfg(test)]
    pub fn with_error(message: impl Into<String>) -> Self {
        Self {
            secure_url: None,
            error: Some(HostErrorBody {
                message: Some(message.into()),
            }),
        }
    }

    pub fn into_outcome(self) -> Result<String, UploadError> {
        match self.secure_url {
            Some(url) if !url.is_empty() => Ok(url),
            _ => {
                let reason = self
                    .error
                    .and_then(|e| e.message)
                    .unwrap_or_else(|| "Unknown error".to_string());
                Err(UploadError::Rejected(reason))
            }
        }
    }
}

/// A hosted-media service that accepts one file per request.
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Transport-level faults are `Err`; any parsed body, including a
    /// rejection, is `Ok`.
    async fn upload(
        &self,
        file: &SelectedFile,
        kind: ResourceKind,
    ) -> Result<HostResponse, UploadError>;
}

#[derive(Clone)]
pub struct CloudinaryClient {
    config: MediaHostConfig,
    client: reqwest::Client,
}

impl CloudinaryClient {
    pub fn new(config: MediaHostConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl MediaHost for CloudinaryClient {
    async fn upload(
        &self,
        file: &SelectedFile,
        kind: ResourceKind,
    ) -> Result<HostResponse, UploadError> {
        let bytes = file
            .read()
            .await
            .map_err(|e| UploadError::Transport(format!("Failed to read file: {}", e)))?;

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file.name.clone()))
            .text("upload_preset", self.config.upload_preset.clone());

        let url = self.config.upload_url(kind);
        tracing::debug!(file = %file.name, %kind, %url, "Sending upload request");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Transport(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        // Rejections come back as 4xx with an `error` object, so the body
        // is parsed whatever the status.
        response.json::<HostResponse>().await.map_err(|e| {
            UploadError::Transport(format!(
                "Failed to parse upload response (status {}): {}",
                status.as_u16(),
                e
            ))
        })
    }
}
