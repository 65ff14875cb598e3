use serde::{Deserialize, Serialize};

/// One side of an integration as configured: either a local application or
/// a cross-model offer, optionally pinned to an endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EndpointSpec {
    pub application: Option<String>,
    pub endpoint: Option<String>,
    pub offer_url: Option<String>,
}

/// A resolved integration endpoint as reported by the controller.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IntegrationEndpoint {
    pub application: String,
    pub endpoint: String,
    /// Set when the application is a consumed offer.
    pub offer_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationInfo {
    pub model: String,
    pub endpoints: Vec<IntegrationEndpoint>,
    pub via: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateIntegrationInput {
    pub model: String,
    pub endpoints: Vec<EndpointSpec>,
    pub via: Option<String>,
}
