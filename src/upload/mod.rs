mod client;
mod coordinator;
mod error;
mod layout;
#[cfg(test)]
mod testing;
mod types;

pub use client::{CloudinaryClient, HostResponse, MediaHost};
pub use coordinator::{UploadCoordinator, SUBMIT_WARNING};
pub use error::{ConfigError, UploadError};
pub use layout::{parse_url_list, FormLayout, GUARDED_FORMS};
pub use types::{
    FileStatus, FormSubmission, ResourceKind, SelectedFile, StatusClass, StatusDisplay,
    SubmitDecision, UploadResult, UploadStatus, UploadTarget,
};
