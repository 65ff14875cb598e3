use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid id {id:?}: {reason}")]
    InvalidId { id: String, reason: String },

    #[error("invalid {scope} access level: {level:?}")]
    InvalidAccess { scope: &'static str, level: String },

    #[error("invalid offer url {url:?}: {reason}")]
    InvalidOfferUrl { url: String, reason: String },

    #[error("invalid entity tag: {0}")]
    InvalidTag(String),

    #[error("invalid ssh public key: {0}")]
    InvalidSshKey(String),

    #[error("invalid uuid: {0}")]
    InvalidUuid(#[from] uuid::Error),
}

impl CoreError {
    pub(crate) fn invalid_id(id: &str, reason: impl Into<String>) -> Self {
        Self::InvalidId {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}
