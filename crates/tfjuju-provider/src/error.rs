use thiserror::Error;

use tfjuju_client::ClientError;
use tfjuju_core::error::CoreError;

use crate::reconcile::ConvergeError;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider is not configured")]
    NotConfigured,

    #[error("invalid configuration: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("invalid import id {id:?}: {reason}")]
    ImportId { id: String, reason: String },

    #[error("unknown {kind} type: {name}")]
    UnknownType { kind: &'static str, name: String },

    #[error("{0} requires a JAAS controller")]
    JaasRequired(String),

    #[error("resource creation failed: {0}")]
    CreateFailed(String),

    #[error("resource read failed: {0}")]
    ReadFailed(String),

    #[error("resource update failed: {0}")]
    UpdateFailed(String),

    #[error("resource deletion failed: {0}")]
    DeleteFailed(String),

    #[error(transparent)]
    Converge(#[from] ConvergeError),

    #[error("controller error: {0}")]
    Client(#[from] ClientError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl ProviderError {
    /// Prepend resource identity to the error message.
    pub fn with_resource(self, label: &str, name: &str) -> Self {
        match self {
            Self::CreateFailed(msg) => Self::CreateFailed(format!("{label} ({name}): {msg}")),
            Self::ReadFailed(msg) => Self::ReadFailed(format!("{label} ({name}): {msg}")),
            Self::UpdateFailed(msg) => Self::UpdateFailed(format!("{label} ({name}): {msg}")),
            Self::DeleteFailed(msg) => Self::DeleteFailed(format!("{label} ({name}): {msg}")),
            Self::Converge(mut err) => {
                err.resource = Some(format!("{label} ({name})"));
                Self::Converge(err)
            }
            other => other,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(vec![msg.into()])
    }

    pub(crate) fn import_id(id: &str, reason: impl Into<String>) -> Self {
        Self::ImportId {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

/// Walk the full error chain and join all causes into one string.
pub fn format_err_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}

/// Wrap a client error from a lifecycle step, keeping its cause chain.
pub(crate) fn create_failed(err: ClientError) -> ProviderError {
    ProviderError::CreateFailed(format_err_chain(&err))
}

pub(crate) fn read_failed(err: ClientError) -> ProviderError {
    ProviderError::ReadFailed(format_err_chain(&err))
}

pub(crate) fn update_failed(err: ClientError) -> ProviderError {
    ProviderError::UpdateFailed(format_err_chain(&err))
}

pub(crate) fn delete_failed(err: ClientError) -> ProviderError {
    ProviderError::DeleteFailed(format_err_chain(&err))
}
