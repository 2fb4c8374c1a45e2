#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No file selected.")]
    NoFileSelected,

    #[error("Upload rejected: {0}")]
    Rejected(String),

    #[error("Transport failure: {0}")]
    Transport(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("Input id {0} is configured more than once")]
    DuplicateInput(String),
}
