use std::str::FromStr;

use crate::error::CoreError;

/// An authorized-keys line: `<type> <base64> [comment]`.
///
/// Juju identifies keys by their comment (the "user id"), so a key without
/// one cannot be managed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshPublicKey {
    pub key_type: String,
    pub body: String,
    pub comment: String,
}

impl SshPublicKey {
    pub fn user_id(&self) -> &str {
        &self.comment
    }
}

impl FromStr for SshPublicKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split_whitespace();
        let key_type = fields
            .next()
            .ok_or_else(|| CoreError::InvalidSshKey("empty payload".into()))?;
        if !key_type.starts_with("ssh-") && !key_type.starts_with("ecdsa-") {
            return Err(CoreError::InvalidSshKey(format!(
                "unsupported key type {key_type:?}"
            )));
        }
        let body = fields
            .next()
            .ok_or_else(|| CoreError::InvalidSshKey("missing key body".into()))?;
        let comment = fields.collect::<Vec<_>>().join(" ");
        if comment.is_empty() {
            return Err(CoreError::InvalidSshKey(
                "key must carry a comment identifying the user".into(),
            ));
        }
        Ok(Self {
            key_type: key_type.to_string(),
            body: body.to_string(),
            comment,
        })
    }
}
