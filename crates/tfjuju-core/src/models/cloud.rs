use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubernetesCloudInput {
    pub name: String,
    /// Raw kubeconfig contents.
    pub kubernetes_config: String,
    pub parent_cloud_name: Option<String>,
    pub parent_cloud_region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubernetesCloudInfo {
    pub name: String,
    pub parent_cloud_name: Option<String>,
    pub parent_cloud_region: Option<String>,
    /// Credential the controller created alongside the cloud.
    pub credential: String,
}
