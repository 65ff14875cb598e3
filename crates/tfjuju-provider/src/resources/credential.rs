use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tfjuju_client::JujuClient;
use tfjuju_core::ids;
use tfjuju_core::models::credential::{CloudCredential, CredentialScope};

use super::{deleted_or_gone, read_or_gone};
use crate::error::{ProviderError, create_failed, read_failed, update_failed};
use crate::resource::{BoxFuture, Resource, UpdateRequest, decode, encode, validate_with};
use crate::schema::{AttrKind, Attribute, Schema, Validator};

const TYPE_NAME: &str = "juju_credential";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CloudRef {
    name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CredentialState {
    id: Option<String>,
    name: String,
    cloud: CloudRef,
    auth_type: String,
    attributes: Option<BTreeMap<String, String>>,
    client_credential: Option<bool>,
    controller_credential: Option<bool>,
}

impl CredentialState {
    fn client(&self) -> bool {
        self.client_credential.unwrap_or(false)
    }

    fn controller(&self) -> bool {
        self.controller_credential.unwrap_or(true)
    }

    fn scopes(&self) -> Vec<CredentialScope> {
        let mut scopes = Vec::new();
        if self.client() {
            scopes.push(CredentialScope::Client);
        }
        if self.controller() {
            scopes.push(CredentialScope::Controller);
        }
        scopes
    }

    fn credential(&self) -> CloudCredential {
        CloudCredential {
            name: self.name.clone(),
            cloud: self.cloud.name.clone(),
            auth_type: self.auth_type.clone(),
            attributes: self.attributes.clone().unwrap_or_default(),
        }
    }

    fn id(&self) -> String {
        ids::credential(&self.name, &self.cloud.name, self.client(), self.controller())
    }

    fn with_id(mut self) -> Self {
        self.client_credential = Some(self.client());
        self.controller_credential = Some(self.controller());
        self.id = Some(self.id());
        self
    }
}

fn check_targets(state: &CredentialState) -> Vec<String> {
    if state.scopes().is_empty() {
        vec!["at least one of client_credential or controller_credential must be true".into()]
    } else {
        Vec::new()
    }
}

pub struct CredentialResource {
    client: JujuClient,
}

impl CredentialResource {
    pub fn new(client: JujuClient) -> Self {
        Self { client }
    }

    /// Read every copy the flags ask for. Returns the refreshed state, or
    /// None when no copy exists any more.
    async fn refresh(&self, wanted: &CredentialState) -> Result<Option<CredentialState>, ProviderError> {
        let id = wanted.id();
        let mut found: Option<CloudCredential> = None;
        let mut client = false;
        let mut controller = false;
        for scope in wanted.scopes() {
            let result = self
                .client
                .credentials
                .read_credential(&wanted.cloud.name, &wanted.name, scope)
                .await;
            if let Some(credential) = read_or_gone(result, TYPE_NAME, &id)? {
                match scope {
                    CredentialScope::Client => client = true,
                    CredentialScope::Controller => controller = true,
                }
                found.get_or_insert(credential);
            }
        }

        Ok(found.map(|credential| {
            let attributes = (wanted.attributes.is_some() || !credential.attributes.is_empty())
                .then_some(credential.attributes);
            CredentialState {
                id: None,
                name: credential.name,
                cloud: CloudRef {
                    name: credential.cloud,
                },
                auth_type: credential.auth_type,
                attributes,
                client_credential: Some(client),
                controller_credential: Some(controller),
            }
            .with_id()
        }))
    }
}

impl Resource for CredentialResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("A cloud credential, stored on the client, the controller or both.")
            .with_id()
            .attribute(Attribute::string("name").required().requires_replace())
            .attribute(
                Attribute::new("cloud", AttrKind::Object(vec![Attribute::string("name").required()]))
                    .required()
                    .requires_replace(),
            )
            .attribute(
                Attribute::string("auth_type")
                    .required()
                    .validator(Validator::NotEmpty)
                    .description("Authentication type, e.g. userpass or certificate."),
            )
            .attribute(Attribute::string_map("attributes").sensitive())
            .attribute(
                Attribute::bool("client_credential")
                    .optional_computed()
                    .description("Store the credential on the client. Defaults to false."),
            )
            .attribute(
                Attribute::bool("controller_credential")
                    .optional_computed()
                    .description("Upload the credential to the controller. Defaults to true."),
            )
    }

    fn validate(&self, config: &Value) -> Result<(), ProviderError> {
        validate_with(&self.schema(), config, check_targets)
    }

    fn create(&self, plan: Value) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let plan: CredentialState = decode(plan)?;
            let errors = check_targets(&plan);
            if !errors.is_empty() {
                return Err(ProviderError::Validation(errors));
            }
            let plan = plan.with_id();
            let id = plan.id();
            for scope in plan.scopes() {
                tracing::info!(credential = %id, scope = %scope, "adding credential");
                self.client
                    .credentials
                    .add_credential(plan.credential(), scope)
                    .await
                    .map_err(|e| create_failed(e).with_resource(TYPE_NAME, &id))?;
            }
            encode(&plan)
        })
    }

    fn read(&self, state: Value) -> BoxFuture<'_, Result<Option<Value>, ProviderError>> {
        Box::pin(async move {
            let state: CredentialState = decode(state)?;
            tracing::debug!(credential = %state.id(), "reading credential");
            self.refresh(&state)
                .await?
                .map(|refreshed| encode(&refreshed))
                .transpose()
        })
    }

    fn update(&self, request: UpdateRequest) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let plan: CredentialState = decode(request.plan)?;
            let state: CredentialState = decode(request.state)?;
            let errors = check_targets(&plan);
            if !errors.is_empty() {
                return Err(ProviderError::Validation(errors));
            }
            let plan = plan.with_id();
            let id = plan.id();
            let content_changed =
                plan.auth_type != state.auth_type || plan.attributes != state.attributes;
            let before = state.scopes();
            let after = plan.scopes();

            for scope in before.iter().filter(|s| !after.contains(s)) {
                tracing::info!(credential = %id, scope = %scope, "removing credential copy");
                deleted_or_gone(
                    self.client
                        .credentials
                        .remove_credential(&state.cloud.name, &state.name, *scope)
                        .await,
                    TYPE_NAME,
                    &id,
                )?;
            }
            for scope in &after {
                if !before.contains(scope) {
                    tracing::info!(credential = %id, scope = %scope, "adding credential copy");
                    self.client
                        .credentials
                        .add_credential(plan.credential(), *scope)
                        .await
                        .map_err(|e| create_failed(e).with_resource(TYPE_NAME, &id))?;
                } else if content_changed {
                    tracing::info!(credential = %id, scope = %scope, "updating credential");
                    self.client
                        .credentials
                        .update_credential(plan.credential(), *scope)
                        .await
                        .map_err(|e| update_failed(e).with_resource(TYPE_NAME, &id))?;
                }
            }
            encode(&plan)
        })
    }

    fn delete(&self, state: Value) -> BoxFuture<'_, Result<(), ProviderError>> {
        Box::pin(async move {
            let state: CredentialState = decode(state)?;
            let id = state.id();
            for scope in state.scopes() {
                tracing::info!(credential = %id, scope = %scope, "removing credential");
                deleted_or_gone(
                    self.client
                        .credentials
                        .remove_credential(&state.cloud.name, &state.name, scope)
                        .await,
                    TYPE_NAME,
                    &id,
                )?;
            }
            Ok(())
        })
    }

    fn import<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Value, ProviderError>> {
        Box::pin(async move {
            let (name, cloud, client, controller) =
                ids::parse_credential(id).map_err(|e| ProviderError::import_id(id, e.to_string()))?;
            tracing::info!(credential = %id, "importing credential");
            let wanted = CredentialState {
                id: None,
                name,
                cloud: CloudRef { name: cloud },
                auth_type: String::new(),
                attributes: None,
                client_credential: Some(client),
                controller_credential: Some(controller),
            };
            let refreshed = self.refresh(&wanted).await?.ok_or_else(|| {
                read_failed(tfjuju_client::ClientError::not_found("credential", id))
                    .with_resource(TYPE_NAME, id)
            })?;
            encode(&refreshed)
        })
    }
}
