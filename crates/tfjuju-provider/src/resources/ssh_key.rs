use serde::{Deserialize, Serialize};
use serde_json::Value;

use tfjuju_client::JujuClient;
use tfjuju_core::ids;
use tfjuju_core::models::ssh_key::SshPublicKey;

use super::{deleted_or_gone, read_or_gone};
use crate::error::{ProviderError, create_failed, read_failed};
use crate::resource::{BoxFuture, Resource, UpdateRequest, decode, encode, validate_with};
use crate::schema::{Attribute, Pattern, Schema, Validator};

const TYPE_NAME: &str = "juju_ssh_key";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SshKeyState {
    id: Option<String>,
    model: String,
    payload: String,
}

impl SshKeyState {
    fn key(&self) -> Result<SshPublicKey, ProviderError> {
        Ok(self.payload.parse()?)
    }
}

fn check_payload(state: &SshKeyState) -> Vec<String> {
    match state.key() {
        Ok(_) => Vec::new(),
        Err(e) => vec![format!("payload: {e}")],
    }
}

pub struct SshKeyResource {
    client: JujuClient,
}

impl SshKeyResource {
    pub fn new(client: JujuClient) -> Self {
        Self { client }
    }

    /// The authorized-keys line on the model whose comment is `user_id`.
    async fn find(&self, model: &str, user_id: &str) -> Result<Option<String>, ProviderError> {
        let id = ids::ssh_key(model, user_id);
        let keys = read_or_gone(self.client.ssh_keys.list_keys(model).await, TYPE_NAME, &id)?;
        Ok(keys.into_iter().flatten().find(|line| {
            line.parse::<SshPublicKey>()
                .is_ok_and(|k| k.user_id() == user_id)
        }))
    }

    async fn add(&self, model: &str, payload: &str) -> Result<String, ProviderError> {
        let key: SshPublicKey = payload.parse()?;
        let id = ids::ssh_key(model, key.user_id());
        tracing::info!(model = %model, user_id = %key.user_id(), "adding ssh key");
        self.client
            .ssh_keys
            .add_key(model, payload)
            .await
            .map_err(|e| create_failed(e).with_resource(TYPE_NAME, &id))?;
        Ok(id)
    }
}

impl Resource for SshKeyResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("A public SSH key added to a model.")
            .with_id()
            .attribute(Attribute::string("model").required().requires_replace())
            .attribute(
                Attribute::string("payload")
                    .required()
                    .validator(Validator::Pattern(Pattern::Contains(" ")))
                    .description("Full public key line. The comment identifies the key."),
            )
    }

    fn validate(&self, config: &Value) -> Result<(), ProviderError> {
        validate_with(&self.schema(), config, check_payload)
    }

    fn create(&self, plan: Value) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let mut plan: SshKeyState = decode(plan)?;
            plan.id = Some(self.add(&plan.model, &plan.payload).await?);
            encode(&plan)
        })
    }

    fn read(&self, state: Value) -> BoxFuture<'_, Result<Option<Value>, ProviderError>> {
        Box::pin(async move {
            let state: SshKeyState = decode(state)?;
            let key = state.key()?;
            tracing::debug!(model = %state.model, user_id = %key.user_id(), "reading ssh key");
            let Some(line) = self.find(&state.model, key.user_id()).await? else {
                tracing::warn!(model = %state.model, user_id = %key.user_id(), "ssh key no longer exists, removing from state");
                return Ok(None);
            };
            // Keep the configured spelling when the key is unchanged.
            let payload = if line.parse::<SshPublicKey>().ok() == Some(key) {
                state.payload.clone()
            } else {
                line
            };
            encode(&SshKeyState { payload, ..state }).map(Some)
        })
    }

    fn update(&self, request: UpdateRequest) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let mut plan: SshKeyState = decode(request.plan)?;
            let state: SshKeyState = decode(request.state)?;
            if plan.payload == state.payload {
                return encode(&state);
            }

            let old = state.key()?;
            let id = ids::ssh_key(&state.model, old.user_id());
            tracing::info!(model = %state.model, user_id = %old.user_id(), "replacing ssh key");
            deleted_or_gone(
                self.client.ssh_keys.remove_key(&state.model, old.user_id()).await,
                TYPE_NAME,
                &id,
            )
            .map_err(|e| match e {
                ProviderError::DeleteFailed(msg) => ProviderError::UpdateFailed(msg),
                other => other,
            })?;
            plan.id = Some(self.add(&plan.model, &plan.payload).await.map_err(|e| match e {
                ProviderError::CreateFailed(msg) => ProviderError::UpdateFailed(msg),
                other => other,
            })?);
            encode(&plan)
        })
    }

    fn delete(&self, state: Value) -> BoxFuture<'_, Result<(), ProviderError>> {
        Box::pin(async move {
            let state: SshKeyState = decode(state)?;
            let key = state.key()?;
            let id = ids::ssh_key(&state.model, key.user_id());
            tracing::info!(model = %state.model, user_id = %key.user_id(), "removing ssh key");
            deleted_or_gone(
                self.client.ssh_keys.remove_key(&state.model, key.user_id()).await,
                TYPE_NAME,
                &id,
            )
        })
    }

    fn import<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Value, ProviderError>> {
        Box::pin(async move {
            let (model, user_id) =
                ids::parse_ssh_key(id).map_err(|e| ProviderError::import_id(id, e.to_string()))?;
            tracing::info!(model = %model, user_id = %user_id, "importing ssh key");
            let payload = self.find(&model, &user_id).await?.ok_or_else(|| {
                read_failed(tfjuju_client::ClientError::not_found("ssh key", id))
                    .with_resource(TYPE_NAME, id)
            })?;
            encode(&SshKeyState {
                id: Some(id.to_string()),
                model,
                payload,
            })
        })
    }
}
