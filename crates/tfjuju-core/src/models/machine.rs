use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineInfo {
    pub model: String,
    pub machine_id: String,
    pub base: String,
    #[serde(default)]
    pub constraints: String,
    pub placement: Option<String>,
    pub hostname: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddMachineInput {
    pub model: String,
    pub base: Option<String>,
    pub constraints: Option<String>,
    pub placement: Option<String>,
}
