use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Decompression error")]
    Decompression,

    #[error("Corrupted data: {0}")]
    Corrupted(String),

    #[error("Version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Checksum mismatch")]
    ChecksumMismatch,

    #[error("Snapshot not found: {key}")]
    NotFound { key: String },

    #[error("Invalid snapshot key: '{key}'")]
    InvalidKey { key: String },

    #[error("Snapshot too large: {size} deliveries")]
    DataTooLarge { size: usize },
}

impl SnapshotError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            SnapshotError::Io(_) => true,
            SnapshotError::NotFound { .. } => true,
            SnapshotError::InvalidKey { .. } => false,
            SnapshotError::Corrupted(_) => false,
            SnapshotError::ChecksumMismatch => false,
            SnapshotError::VersionMismatch { .. } => true, // may migrate
            _ => false,
        }
    }
}
