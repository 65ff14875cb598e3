use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a credential is stored: the local client store or the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialScope {
    Client,
    Controller,
}

impl fmt::Display for CredentialScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client => f.write_str("client"),
            Self::Controller => f.write_str("controller"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudCredential {
    pub name: String,
    pub cloud: String,
    pub auth_type: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}
