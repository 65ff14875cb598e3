use serde::{Deserialize, Serialize};
use serde_json::Value;

use tfjuju_client::JujuClient;
use tfjuju_core::models::cloud::{KubernetesCloudInfo, KubernetesCloudInput};

use super::{deleted_or_gone, read_or_gone};
use crate::error::{ProviderError, create_failed, read_failed, update_failed};
use crate::resource::{BoxFuture, Resource, UpdateRequest, decode, encode};
use crate::schema::{Attribute, Schema, Validator};

const TYPE_NAME: &str = "juju_kubernetes_cloud";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct KubernetesCloudState {
    id: Option<String>,
    name: String,
    /// Kept from configuration; the controller does not return it.
    kubernetes_config: Option<String>,
    parent_cloud_name: Option<String>,
    parent_cloud_region: Option<String>,
    credential: Option<String>,
}

impl KubernetesCloudState {
    fn from_info(info: &KubernetesCloudInfo, kubernetes_config: Option<String>) -> Self {
        Self {
            id: Some(info.name.clone()),
            name: info.name.clone(),
            kubernetes_config,
            parent_cloud_name: info.parent_cloud_name.clone(),
            parent_cloud_region: info.parent_cloud_region.clone(),
            credential: Some(info.credential.clone()),
        }
    }

    fn input(&self) -> KubernetesCloudInput {
        KubernetesCloudInput {
            name: self.name.clone(),
            kubernetes_config: self.kubernetes_config.clone().unwrap_or_default(),
            parent_cloud_name: self.parent_cloud_name.clone(),
            parent_cloud_region: self.parent_cloud_region.clone(),
        }
    }
}

pub struct KubernetesCloudResource {
    client: JujuClient,
}

impl KubernetesCloudResource {
    pub fn new(client: JujuClient) -> Self {
        Self { client }
    }
}

impl Resource for KubernetesCloudResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("A Kubernetes cluster registered as a cloud.")
            .with_id()
            .attribute(
                Attribute::string("name")
                    .required()
                    .requires_replace()
                    .validator(Validator::NotEmpty),
            )
            .attribute(
                Attribute::string("kubernetes_config")
                    .required()
                    .sensitive()
                    .validator(Validator::NotEmpty)
                    .description("Kubeconfig contents used to reach the cluster."),
            )
            .attribute(Attribute::string("parent_cloud_name"))
            .attribute(Attribute::string("parent_cloud_region"))
            .attribute(
                Attribute::string("credential")
                    .computed()
                    .description("Credential created together with the cloud."),
            )
    }

    fn create(&self, plan: Value) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let plan: KubernetesCloudState = decode(plan)?;
            tracing::info!(cloud = %plan.name, "adding kubernetes cloud");
            let info = self
                .client
                .clouds
                .add_kubernetes_cloud(plan.input())
                .await
                .map_err(|e| create_failed(e).with_resource(TYPE_NAME, &plan.name))?;
            encode(&KubernetesCloudState::from_info(&info, plan.kubernetes_config))
        })
    }

    fn read(&self, state: Value) -> BoxFuture<'_, Result<Option<Value>, ProviderError>> {
        Box::pin(async move {
            let state: KubernetesCloudState = decode(state)?;
            tracing::debug!(cloud = %state.name, "reading kubernetes cloud");
            let info = read_or_gone(
                self.client.clouds.read_kubernetes_cloud(&state.name).await,
                TYPE_NAME,
                &state.name,
            )?;
            info.map(|info| encode(&KubernetesCloudState::from_info(&info, state.kubernetes_config.clone())))
                .transpose()
        })
    }

    fn update(&self, request: UpdateRequest) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let plan: KubernetesCloudState = decode(request.plan)?;
            tracing::info!(cloud = %plan.name, "updating kubernetes cloud");
            self.client
                .clouds
                .update_kubernetes_cloud(plan.input())
                .await
                .map_err(|e| update_failed(e).with_resource(TYPE_NAME, &plan.name))?;
            let info = self
                .client
                .clouds
                .read_kubernetes_cloud(&plan.name)
                .await
                .map_err(|e| read_failed(e).with_resource(TYPE_NAME, &plan.name))?;
            encode(&KubernetesCloudState::from_info(&info, plan.kubernetes_config))
        })
    }

    fn delete(&self, state: Value) -> BoxFuture<'_, Result<(), ProviderError>> {
        Box::pin(async move {
            let state: KubernetesCloudState = decode(state)?;
            tracing::info!(cloud = %state.name, "removing kubernetes cloud");
            deleted_or_gone(
                self.client.clouds.remove_cloud(&state.name).await,
                TYPE_NAME,
                &state.name,
            )
        })
    }

    fn import<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Value, ProviderError>> {
        Box::pin(async move {
            if id.trim().is_empty() || id.contains(':') {
                return Err(ProviderError::import_id(id, "expected a cloud name"));
            }
            tracing::info!(cloud = %id, "importing kubernetes cloud");
            let info = self
                .client
                .clouds
                .read_kubernetes_cloud(id)
                .await
                .map_err(|e| read_failed(e).with_resource(TYPE_NAME, id))?;
            encode(&KubernetesCloudState::from_info(&info, None))
        })
    }
}
