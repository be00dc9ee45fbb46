use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Invalid disk geometry: {0}")]
    InvalidGeometry(String),

    #[error("Candidate file #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("Duplicate candidate file name: {0}")]
    DuplicateName(String),

    #[error("Invalid disk label: {0}")]
    InvalidLabel(String),

    #[error("Invalid disk image name: {0}")]
    InvalidDiskName(String),

    #[error("Output name '{name}' appears more than once on disk {disk}")]
    OutputNameConflict { disk: usize, name: String },

    #[error("Disk {disk}: cannot move from {from} to {to}")]
    InvalidTransition {
        disk: usize,
        from: &'static str,
        to: &'static str,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlanError>;
