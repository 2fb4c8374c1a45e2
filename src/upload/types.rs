use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Image,
    Video,
}

impl ResourceKind {
    /// Path segment used by the media host's upload endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Video => "video",
        }
    }

    /// File extensions offered by the picker for this kind.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ResourceKind::Image => &["jpg", "jpeg", "png", "gif", "webp", "avif", "bmp"],
            ResourceKind::Video => &["mp4", "mov", "webm", "mkv", "avi", "m4v"],
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One media field of a form: the file input, where its status is shown
/// and the hidden field that carries the uploaded URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub input_id: String,
    pub form_id: String,
    pub resource_kind: ResourceKind,
    pub status_element_id: String,
    pub hidden_field_id: String,
    pub multiple: bool,
}

#[derive(Debug, Clone)]
enum FileSource {
    Path(PathBuf),
    #[cfg(test)]
    Memory(Vec<u8>),
}

/// A file picked by the user. Files on disk are only read once their
/// upload starts.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    source: FileSource,
}

impl SelectedFile {
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let name = path
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Invalid filename"))?
            .to_string_lossy()
            .to_string();
        let size = std::fs::metadata(path)?.len();
        Ok(Self {
            name,
            size,
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    #[cfg(test)]
    pub fn in_memory(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            source: FileSource::Memory(bytes),
        }
    }

    pub async fn read(&self) -> io::Result<Vec<u8>> {
        match &self.source {
            FileSource::Path(path) => tokio::fs::read(path).await,
            #[cfg(test)]
            FileSource::Memory(bytes) => Ok(bytes.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub source_file_name: String,
    pub remote_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusClass {
    #[default]
    Pending,
    Success,
    Error,
}

/// What a status element currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusDisplay {
    pub text: String,
    pub class: StatusClass,
}

#[derive(Debug, Clone)]
pub enum UploadStatus {
    Processing,
    Success(String),
    Error(String),
}

#[derive(Debug, Clone)]
pub struct FileStatus {
    pub name: String,
    pub input_id: String,
    pub size: Option<u64>,
    pub status: UploadStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSubmission {
    pub form_id: String,
    pub fields: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitDecision {
    Proceed(FormSubmission),
    Blocked { warning: String },
}

impl SubmitDecision {
    #[cfg(test)]
    pub fn is_blocked(&self) -> bool {
        matches!(self, SubmitDecision::Blocked { .. })
    }
}
