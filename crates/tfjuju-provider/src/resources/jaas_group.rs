use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tfjuju_client::JujuClient;
use tfjuju_client::jaas::JaasApi;
use tfjuju_core::ids;
use tfjuju_core::models::jaas::JaasGroup;

use super::{deleted_or_gone, read_or_gone};
use crate::error::{ProviderError, create_failed, read_failed, update_failed};
use crate::resource::{BoxFuture, Resource, UpdateRequest, decode, encode};
use crate::schema::{Attribute, Schema, Validator};

const TYPE_NAME: &str = "juju_jaas_group";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct JaasGroupState {
    id: Option<String>,
    name: String,
    uuid: Option<String>,
}

impl From<JaasGroup> for JaasGroupState {
    fn from(group: JaasGroup) -> Self {
        Self {
            id: Some(group.uuid.clone()),
            name: group.name,
            uuid: Some(group.uuid),
        }
    }
}

impl JaasGroupState {
    fn uuid(&self) -> Result<&str, ProviderError> {
        self.uuid
            .as_deref()
            .or(self.id.as_deref())
            .ok_or_else(|| ProviderError::validation(format!("{TYPE_NAME} ({}): state has no uuid", self.name)))
    }
}

pub struct JaasGroupResource {
    jaas: Option<Arc<dyn JaasApi>>,
}

impl JaasGroupResource {
    pub fn new(client: &JujuClient) -> Self {
        Self {
            jaas: client.jaas.clone(),
        }
    }

    fn jaas(&self) -> Result<&Arc<dyn JaasApi>, ProviderError> {
        self.jaas
            .as_ref()
            .ok_or_else(|| ProviderError::JaasRequired(TYPE_NAME.to_string()))
    }
}

impl Resource for JaasGroupResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("A JAAS group.")
            .with_id()
            .attribute(
                Attribute::string("name")
                    .required()
                    .validator(Validator::NotEmpty),
            )
            .attribute(Attribute::string("uuid").computed())
    }

    fn create(&self, plan: Value) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let plan: JaasGroupState = decode(plan)?;
            let jaas = self.jaas()?;
            tracing::info!(group = %plan.name, "adding jaas group");
            let group = jaas
                .add_group(&plan.name)
                .await
                .map_err(|e| create_failed(e).with_resource(TYPE_NAME, &plan.name))?;
            encode(&JaasGroupState::from(group))
        })
    }

    fn read(&self, state: Value) -> BoxFuture<'_, Result<Option<Value>, ProviderError>> {
        Box::pin(async move {
            let state: JaasGroupState = decode(state)?;
            let jaas = self.jaas()?;
            let uuid = state.uuid()?;
            tracing::debug!(group = %uuid, "reading jaas group");
            read_or_gone(jaas.read_group(uuid).await, TYPE_NAME, uuid)?
                .map(|group| encode(&JaasGroupState::from(group)))
                .transpose()
        })
    }

    fn update(&self, request: UpdateRequest) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let plan: JaasGroupState = decode(request.plan)?;
            let state: JaasGroupState = decode(request.state)?;
            let jaas = self.jaas()?;
            let uuid = state.uuid()?;
            if plan.name != state.name {
                tracing::info!(group = %uuid, from = %state.name, to = %plan.name, "renaming jaas group");
                jaas.rename_group(uuid, &plan.name)
                    .await
                    .map_err(|e| update_failed(e).with_resource(TYPE_NAME, uuid))?;
            }
            encode(&JaasGroupState {
                id: Some(uuid.to_string()),
                name: plan.name,
                uuid: Some(uuid.to_string()),
            })
        })
    }

    fn delete(&self, state: Value) -> BoxFuture<'_, Result<(), ProviderError>> {
        Box::pin(async move {
            let state: JaasGroupState = decode(state)?;
            let jaas = self.jaas()?;
            let uuid = state.uuid()?;
            tracing::info!(group = %uuid, "removing jaas group");
            deleted_or_gone(jaas.remove_group(uuid).await, TYPE_NAME, uuid)
        })
    }

    fn import<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Value, ProviderError>> {
        Box::pin(async move {
            let jaas = self.jaas()?;
            ids::require_uuid(id).map_err(|e| ProviderError::import_id(id, e.to_string()))?;
            tracing::info!(group = %id, "importing jaas group");
            let group = jaas
                .read_group(id)
                .await
                .map_err(|e| read_failed(e).with_resource(TYPE_NAME, id))?;
            encode(&JaasGroupState::from(group))
        })
    }
}
