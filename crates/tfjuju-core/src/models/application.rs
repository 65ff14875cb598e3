use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharmSpec {
    pub name: String,
    pub channel: String,
    pub revision: Option<u32>,
    pub base: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposeSpec {
    #[serde(default)]
    pub endpoints: Vec<String>,
    #[serde(default)]
    pub spaces: Vec<String>,
    #[serde(default)]
    pub cidrs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationInfo {
    pub model: String,
    pub name: String,
    pub charm: CharmSpec,
    pub units: u32,
    /// Subordinate applications have no units of their own.
    pub principal: bool,
    pub trust: bool,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
    #[serde(default)]
    pub constraints: String,
    pub expose: Option<ExposeSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployInput {
    pub model: String,
    pub name: String,
    pub charm: CharmSpec,
    pub units: u32,
    pub config: BTreeMap<String, String>,
    pub constraints: Option<String>,
    pub trust: bool,
    pub expose: Option<ExposeSpec>,
}

/// Changes to apply to a deployed application. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateApplicationInput {
    pub model: String,
    pub name: String,
    pub charm_channel: Option<String>,
    pub charm_revision: Option<u32>,
    pub units: Option<u32>,
    pub config: BTreeMap<String, String>,
    pub unset: Vec<String>,
    pub constraints: Option<String>,
    pub trust: Option<bool>,
    pub expose: Option<ExposeSpec>,
    pub unexpose: bool,
}

impl UpdateApplicationInput {
    pub fn is_empty(&self) -> bool {
        self.charm_channel.is_none()
            && self.charm_revision.is_none()
            && self.units.is_none()
            && self.config.is_empty()
            && self.unset.is_empty()
            && self.constraints.is_none()
            && self.trust.is_none()
            && self.expose.is_none()
            && !self.unexpose
    }
}
