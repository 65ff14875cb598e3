use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tfjuju_client::JujuClient;
use tfjuju_core::models::model::{CreateModelInput, ModelInfo, UpdateModelInput};

use super::{deleted_or_gone, managed_entries, map_changes, read_or_gone, refreshed_text};
use crate::error::{ProviderError, create_failed, read_failed, update_failed};
use crate::resource::{BoxFuture, Resource, UpdateRequest, decode, encode};
use crate::schema::{AttrKind, Attribute, Schema, Validator};

const TYPE_NAME: &str = "juju_model";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CloudBlock {
    name: String,
    region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ModelState {
    id: Option<String>,
    name: String,
    cloud: Option<CloudBlock>,
    credential: Option<String>,
    config: Option<BTreeMap<String, String>>,
    constraints: Option<String>,
    annotations: Option<BTreeMap<String, String>>,
    uuid: Option<String>,
    #[serde(rename = "type")]
    model_type: Option<String>,
}

impl ModelState {
    /// State as reported by the controller. `prior` decides which optional
    /// attributes configuration manages.
    fn from_info(info: &ModelInfo, prior: Option<&ModelState>) -> Self {
        let annotations = match prior {
            Some(p) => managed_entries(&info.annotations, p.annotations.as_ref()),
            None => (!info.annotations.is_empty()).then(|| info.annotations.clone()),
        };
        Self {
            id: Some(info.name.clone()),
            name: info.name.clone(),
            cloud: Some(CloudBlock {
                name: info.cloud.clone(),
                region: info.region.clone(),
            }),
            credential: prior
                .and_then(|p| p.credential.as_ref())
                .and(info.credential.clone()),
            config: managed_entries(&info.config, prior.and_then(|p| p.config.as_ref())),
            constraints: refreshed_text(
                prior.and_then(|p| p.constraints.as_ref()),
                &info.constraints,
            ),
            annotations,
            uuid: Some(info.uuid.clone()),
            model_type: Some(info.model_type.as_str().to_string()),
        }
    }
}

pub struct ModelResource {
    client: JujuClient,
}

impl ModelResource {
    pub fn new(client: JujuClient) -> Self {
        Self { client }
    }

    async fn uuid_of(&self, state: &ModelState) -> Result<Option<String>, ProviderError> {
        if let Some(uuid) = &state.uuid {
            return Ok(Some(uuid.clone()));
        }
        let info = read_or_gone(
            self.client.models.read_model(&state.name).await,
            TYPE_NAME,
            &state.name,
        )?;
        Ok(info.map(|i| i.uuid))
    }
}

impl Resource for ModelResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("A model on the controller.")
            .with_id()
            .attribute(
                Attribute::string("name")
                    .required()
                    .requires_replace()
                    .validator(Validator::NotEmpty)
                    .description("Name of the model."),
            )
            .attribute(
                Attribute::new(
                    "cloud",
                    AttrKind::Object(vec![
                        Attribute::string("name").required(),
                        Attribute::string("region").optional_computed(),
                    ]),
                )
                .optional_computed()
                .requires_replace()
                .description("Cloud and region the model is deployed to."),
            )
            .attribute(Attribute::string("credential").description("Cloud credential of the model."))
            .attribute(Attribute::string_map("config").description("Model configuration."))
            .attribute(Attribute::string("constraints").description("Default constraints."))
            .attribute(Attribute::string_map("annotations"))
            .attribute(Attribute::string("uuid").computed())
            .attribute(Attribute::string("type").computed().description("iaas or caas."))
    }

    fn create(&self, plan: Value) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let plan: ModelState = decode(plan)?;
            tracing::info!(model = %plan.name, "creating model");

            let input = CreateModelInput {
                name: plan.name.clone(),
                cloud: plan.cloud.as_ref().map(|c| c.name.clone()),
                region: plan.cloud.as_ref().and_then(|c| c.region.clone()),
                credential: plan.credential.clone(),
                config: plan.config.clone().unwrap_or_default(),
                constraints: plan.constraints.clone(),
                annotations: plan.annotations.clone().unwrap_or_default(),
            };
            let info = self
                .client
                .models
                .create_model(input)
                .await
                .map_err(|e| create_failed(e).with_resource(TYPE_NAME, &plan.name))?;
            encode(&ModelState::from_info(&info, Some(&plan)))
        })
    }

    fn read(&self, state: Value) -> BoxFuture<'_, Result<Option<Value>, ProviderError>> {
        Box::pin(async move {
            let state: ModelState = decode(state)?;
            tracing::debug!(model = %state.name, "reading model");
            let info = read_or_gone(
                self.client.models.read_model(&state.name).await,
                TYPE_NAME,
                &state.name,
            )?;
            info.map(|info| encode(&ModelState::from_info(&info, Some(&state))))
                .transpose()
        })
    }

    fn update(&self, request: UpdateRequest) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let plan: ModelState = decode(request.plan)?;
            let state: ModelState = decode(request.state)?;
            let uuid = state.uuid.clone().ok_or_else(|| {
                ProviderError::UpdateFailed(format!("{TYPE_NAME} ({}): state has no uuid", state.name))
            })?;

            let (config, unset) = map_changes(state.config.as_ref(), plan.config.as_ref());
            let (mut annotations, removed) =
                map_changes(state.annotations.as_ref(), plan.annotations.as_ref());
            annotations.extend(removed.into_iter().map(|k| (k, String::new())));

            let input = UpdateModelInput {
                uuid,
                config,
                unset,
                constraints: (plan.constraints != state.constraints)
                    .then(|| plan.constraints.clone().unwrap_or_default()),
                credential: plan
                    .credential
                    .clone()
                    .filter(|c| state.credential.as_ref() != Some(c)),
                annotations,
            };
            if !input.is_empty() {
                tracing::info!(model = %plan.name, "updating model");
                self.client
                    .models
                    .update_model(input)
                    .await
                    .map_err(|e| update_failed(e).with_resource(TYPE_NAME, &plan.name))?;
            }

            let info = self
                .client
                .models
                .read_model(&plan.name)
                .await
                .map_err(|e| read_failed(e).with_resource(TYPE_NAME, &plan.name))?;
            encode(&ModelState::from_info(&info, Some(&plan)))
        })
    }

    fn delete(&self, state: Value) -> BoxFuture<'_, Result<(), ProviderError>> {
        Box::pin(async move {
            let state: ModelState = decode(state)?;
            let Some(uuid) = self.uuid_of(&state).await? else {
                return Ok(());
            };
            tracing::info!(model = %state.name, uuid = %uuid, "destroying model");
            deleted_or_gone(
                self.client.models.destroy_model(&uuid).await,
                TYPE_NAME,
                &state.name,
            )
        })
    }

    fn import<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Value, ProviderError>> {
        Box::pin(async move {
            if id.trim().is_empty() || id.contains(':') {
                return Err(ProviderError::import_id(id, "expected a model name"));
            }
            tracing::info!(model = %id, "importing model");
            let info = self
                .client
                .models
                .read_model(id)
                .await
                .map_err(|e| read_failed(e).with_resource(TYPE_NAME, id))?;
            encode(&ModelState::from_info(&info, None))
        })
    }
}
