use std::path::PathBuf;

use thiserror::Error;

use crate::common::ResourceKind;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

/// Broad classification of an `ApiError`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorKind {
    /// Lookup by ID returned no items
    NotFound,
    /// Network failure, or the API answered with an error status
    Transport,
    /// Response did not have the expected shape
    Malformed,
    /// Encoding or writing the output document failed
    Output,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No {kind} found with ID {id:?}")]
    NotFound { kind: ResourceKind, id: String },

    #[error("Request to {endpoint} failed")]
    Transport {
        endpoint: String,
        #[source]
        source: attohttpc::Error,
    },

    #[error("Error from {endpoint} - status {status}: {message}")]
    Api {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("Failed to parse response from {endpoint}")]
    Malformed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value {value:?} for {field}")]
    InvalidCount { field: &'static str, value: String },

    #[error("Failed to encode document")]
    Encode {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotFound { .. } => ErrorKind::NotFound,
            ApiError::Transport { .. } | ApiError::Api { .. } => ErrorKind::Transport,
            ApiError::Malformed { .. } | ApiError::InvalidCount { .. } => ErrorKind::Malformed,
            ApiError::Encode { .. } | ApiError::Write { .. } => ErrorKind::Output,
        }
    }
}
