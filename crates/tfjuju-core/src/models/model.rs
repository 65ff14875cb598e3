use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::access::ModelUserAccess;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Iaas,
    Caas,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Iaas => "iaas",
            Self::Caas => "caas",
        }
    }
}

/// A model as reported by the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub uuid: String,
    pub name: String,
    pub owner: String,
    pub model_type: ModelType,
    pub cloud: String,
    pub region: Option<String>,
    pub credential: Option<String>,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
    #[serde(default)]
    pub constraints: String,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    #[serde(default)]
    pub users: Vec<ModelUserAccess>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateModelInput {
    pub name: String,
    pub cloud: Option<String>,
    pub region: Option<String>,
    pub credential: Option<String>,
    pub config: BTreeMap<String, String>,
    pub constraints: Option<String>,
    pub annotations: BTreeMap<String, String>,
}

/// Changes to apply to an existing model.
///
/// An annotation with an empty value is removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateModelInput {
    pub uuid: String,
    pub config: BTreeMap<String, String>,
    pub unset: Vec<String>,
    pub constraints: Option<String>,
    pub credential: Option<String>,
    pub annotations: BTreeMap<String, String>,
}

impl UpdateModelInput {
    pub fn is_empty(&self) -> bool {
        self.config.is_empty()
            && self.unset.is_empty()
            && self.constraints.is_none()
            && self.credential.is_none()
            && self.annotations.is_empty()
    }
}
