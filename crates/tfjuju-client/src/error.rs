use thiserror::Error;

use tfjuju_core::error::CoreError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} already exists: {id}")]
    AlreadyExists { kind: &'static str, id: String },

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid controller configuration: {0}")]
    InvalidConfig(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("API error: {0}")]
    Api(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClientError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn already_exists(kind: &'static str, id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
