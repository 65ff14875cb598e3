//! JAAS (JIMM) authorisation vocabulary.
//!
//! JAAS stores permissions as OpenFGA relation tuples of the form
//! `(object, relation, target)`, e.g.
//! `("user-alice@canonical.com", "administrator", "controller-jimm")`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The controller name JAAS uses for itself in tuple targets.
pub const JIMM_CONTROLLER: &str = "jimm";

const SERVICE_ACCOUNT_DOMAIN: &str = "@serviceaccount";

/// Something that can be granted a relation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Principal {
    User(String),
    Group(String),
    ServiceAccount(String),
    Role(String),
}

impl Principal {
    /// The tuple object for this principal. Groups and roles refer to their
    /// member sets rather than the entity itself.
    pub fn tag(&self) -> String {
        match self {
            Self::User(name) => format!("user-{name}"),
            Self::Group(uuid) => format!("group-{uuid}#member"),
            Self::ServiceAccount(id) => format!("user-{id}{SERVICE_ACCOUNT_DOMAIN}"),
            Self::Role(uuid) => format!("role-{uuid}#assignee"),
        }
    }

    pub fn from_tag(tag: &str) -> Result<Self, CoreError> {
        if let Some(user) = tag.strip_prefix("user-") {
            if user.is_empty() {
                return Err(CoreError::InvalidTag(tag.to_string()));
            }
            return Ok(match user.strip_suffix(SERVICE_ACCOUNT_DOMAIN) {
                Some(id) => Self::ServiceAccount(id.to_string()),
                None => Self::User(user.to_string()),
            });
        }
        if let Some(group) = tag.strip_prefix("group-") {
            let uuid = group.strip_suffix("#member").unwrap_or(group);
            return Ok(Self::Group(uuid.to_string()));
        }
        if let Some(role) = tag.strip_prefix("role-") {
            let uuid = role.strip_suffix("#assignee").unwrap_or(role);
            return Ok(Self::Role(uuid.to_string()));
        }
        Err(CoreError::InvalidTag(tag.to_string()))
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

/// The object a JAAS access resource grants access to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JaasTarget {
    Controller,
    Cloud(String),
    Model(String),
    Offer(String),
    Group(String),
}

impl JaasTarget {
    pub fn tag(&self) -> String {
        match self {
            Self::Controller => format!("controller-{JIMM_CONTROLLER}"),
            Self::Cloud(name) => format!("cloud-{name}"),
            Self::Model(uuid) => format!("model-{uuid}"),
            Self::Offer(url) => format!("applicationoffer-{url}"),
            Self::Group(uuid) => format!("group-{uuid}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RelationTuple {
    pub object: String,
    pub relation: String,
    pub target: String,
}

impl RelationTuple {
    pub fn new(principal: &Principal, relation: &str, target: &JaasTarget) -> Self {
        Self {
            object: principal.tag(),
            relation: relation.to_string(),
            target: target.tag(),
        }
    }
}

impl fmt::Display for RelationTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", self.object, self.relation, self.target)
    }
}

/// Matches tuples on whichever fields are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationFilter {
    pub object: Option<String>,
    pub relation: Option<String>,
    pub target: Option<String>,
}

impl RelationFilter {
    pub fn matches(&self, tuple: &RelationTuple) -> bool {
        self.object.as_ref().is_none_or(|o| *o == tuple.object)
            && self.relation.as_ref().is_none_or(|r| *r == tuple.relation)
            && self.target.as_ref().is_none_or(|t| *t == tuple.target)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JaasGroup {
    pub uuid: String,
    pub name: String,
}
