use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::access::OfferUserAccess;
use crate::error::CoreError;

/// A parsed offer URL: `[source:][owner/]model.offer`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OfferUrl {
    pub source: Option<String>,
    pub owner: Option<String>,
    pub model: String,
    pub name: String,
}

impl OfferUrl {
    pub fn new(owner: &str, model: &str, name: &str) -> Self {
        Self {
            source: None,
            owner: Some(owner.to_string()),
            model: model.to_string(),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for OfferUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "{source}:")?;
        }
        if let Some(owner) = &self.owner {
            write!(f, "{owner}/")?;
        }
        write!(f, "{}.{}", self.model, self.name)
    }
}

impl FromStr for OfferUrl {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CoreError::InvalidOfferUrl {
            url: s.to_string(),
            reason: reason.to_string(),
        };

        let (source, rest) = match s.split_once(':') {
            Some((source, rest)) if !source.is_empty() => (Some(source.to_string()), rest),
            Some(_) => return Err(invalid("empty source")),
            None => (None, s),
        };
        let (owner, path) = match rest.split_once('/') {
            Some((owner, path)) if !owner.is_empty() => (Some(owner.to_string()), path),
            Some(_) => return Err(invalid("empty owner")),
            None => (None, rest),
        };
        let (model, name) = path
            .split_once('.')
            .ok_or_else(|| invalid("expected <model>.<offer>"))?;
        if model.is_empty() || name.is_empty() {
            return Err(invalid("model and offer name must be non-empty"));
        }
        if name.contains(['.', '/', ':']) {
            return Err(invalid("offer name contains a separator"));
        }

        Ok(Self {
            source,
            owner,
            model: model.to_string(),
            name: name.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferInfo {
    pub url: String,
    pub name: String,
    pub model: String,
    pub application_name: String,
    pub endpoints: Vec<String>,
    #[serde(default)]
    pub users: Vec<OfferUserAccess>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOfferInput {
    pub model: String,
    pub application_name: String,
    pub endpoints: Vec<String>,
    /// Defaults to the application name.
    pub name: Option<String>,
}
