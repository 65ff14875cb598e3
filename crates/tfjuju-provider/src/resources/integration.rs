use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tfjuju_client::JujuClient;
use tfjuju_core::ids;
use tfjuju_core::models::integration::{
    CreateIntegrationInput, EndpointSpec, IntegrationEndpoint, IntegrationInfo,
};

use super::{deleted_or_gone, read_or_gone};
use crate::error::{ProviderError, create_failed, delete_failed, read_failed};
use crate::resource::{BoxFuture, Resource, UpdateRequest, decode, encode, validate_with};
use crate::schema::{AttrKind, Attribute, Schema, Validator};

const TYPE_NAME: &str = "juju_integration";

/// One side of the integration. `name` is a local application, `offer_url`
/// a consumed offer; exactly one of them is set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
struct EndpointBlock {
    name: Option<String>,
    endpoint: Option<String>,
    offer_url: Option<String>,
}

impl EndpointBlock {
    fn to_spec(&self) -> EndpointSpec {
        EndpointSpec {
            application: self.name.clone(),
            endpoint: self.endpoint.clone(),
            offer_url: self.offer_url.clone(),
        }
    }

    fn from_endpoint(endpoint: &IntegrationEndpoint) -> Self {
        match &endpoint.offer_url {
            Some(url) => Self {
                name: None,
                endpoint: Some(endpoint.endpoint.clone()),
                offer_url: Some(url.clone()),
            },
            None => Self {
                name: Some(endpoint.application.clone()),
                endpoint: Some(endpoint.endpoint.clone()),
                offer_url: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct IntegrationState {
    id: Option<String>,
    model: String,
    via: Option<String>,
    application: BTreeSet<EndpointBlock>,
}

impl IntegrationState {
    fn from_info(info: &IntegrationInfo) -> Result<Self, ProviderError> {
        let [a, b] = info.endpoints.as_slice() else {
            return Err(ProviderError::ReadFailed(format!(
                "{TYPE_NAME}: expected two endpoints, controller reported {}",
                info.endpoints.len()
            )));
        };
        Ok(Self {
            id: Some(ids::integration(
                &info.model,
                (&a.application, &a.endpoint),
                (&b.application, &b.endpoint),
            )),
            model: info.model.clone(),
            via: info.via.clone(),
            application: info.endpoints.iter().map(EndpointBlock::from_endpoint).collect(),
        })
    }

    fn specs(&self) -> Vec<EndpointSpec> {
        self.application.iter().map(EndpointBlock::to_spec).collect()
    }

    fn label(&self) -> String {
        self.id.clone().unwrap_or_else(|| self.model.clone())
    }
}

fn check_endpoints(state: &IntegrationState) -> Vec<String> {
    let mut errors = Vec::new();
    if state.application.len() != 2 {
        errors.push(format!(
            "application: an integration needs exactly two endpoints, got {}",
            state.application.len()
        ));
    }
    for block in &state.application {
        match (&block.name, &block.offer_url) {
            (Some(_), Some(_)) => errors.push("application: set either name or offer_url, not both".into()),
            (None, None) => errors.push("application: one of name or offer_url is required".into()),
            _ => {}
        }
    }
    errors
}

/// A planned endpoint left unset matches whatever the controller picked.
fn same_endpoints(plan: &BTreeSet<EndpointBlock>, state: &BTreeSet<EndpointBlock>) -> bool {
    plan.len() == state.len()
        && plan.iter().all(|p| {
            state.iter().any(|s| {
                p.name == s.name
                    && p.offer_url == s.offer_url
                    && p.endpoint.as_ref().is_none_or(|e| s.endpoint.as_ref() == Some(e))
            })
        })
}

pub struct IntegrationResource {
    client: JujuClient,
}

impl IntegrationResource {
    pub fn new(client: JujuClient) -> Self {
        Self { client }
    }

    async fn integrate(&self, plan: &IntegrationState) -> Result<IntegrationState, ProviderError> {
        let errors = check_endpoints(plan);
        if !errors.is_empty() {
            return Err(ProviderError::Validation(errors));
        }
        tracing::info!(model = %plan.model, "creating integration");
        let info = self
            .client
            .integrations
            .create_integration(CreateIntegrationInput {
                model: plan.model.clone(),
                endpoints: plan.specs(),
                via: plan.via.clone(),
            })
            .await
            .map_err(|e| create_failed(e).with_resource(TYPE_NAME, &plan.model))?;
        IntegrationState::from_info(&info)
    }
}

impl Resource for IntegrationResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("An integration (relation) between two application endpoints.")
            .with_id()
            .attribute(Attribute::string("model").required().requires_replace())
            .attribute(
                Attribute::string("via")
                    .requires_replace()
                    .description("Comma-separated egress CIDRs for cross-model integrations."),
            )
            .attribute(
                Attribute::new(
                    "application",
                    AttrKind::ObjectSet(vec![
                        Attribute::string("name").validator(Validator::ConflictsWith(&["offer_url"])),
                        Attribute::string("endpoint").optional_computed(),
                        Attribute::string("offer_url"),
                    ]),
                )
                .required()
                .validator(Validator::SetSize { min: 2, max: Some(2) }),
            )
    }

    fn validate(&self, config: &Value) -> Result<(), ProviderError> {
        validate_with(&self.schema(), config, check_endpoints)
    }

    fn create(&self, plan: Value) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let plan: IntegrationState = decode(plan)?;
            encode(&self.integrate(&plan).await?)
        })
    }

    fn read(&self, state: Value) -> BoxFuture<'_, Result<Option<Value>, ProviderError>> {
        Box::pin(async move {
            let state: IntegrationState = decode(state)?;
            let label = state.label();
            tracing::debug!(integration = %label, "reading integration");
            let specs = state.specs();
            let info = read_or_gone(
                self.client.integrations.read_integration(&state.model, &specs).await,
                TYPE_NAME,
                &label,
            )?;
            info.map(|info| IntegrationState::from_info(&info).and_then(|s| encode(&s)))
                .transpose()
        })
    }

    /// Integrations cannot be edited. A changed endpoint set removes the old
    /// integration and creates the new one.
    fn update(&self, request: UpdateRequest) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let plan: IntegrationState = decode(request.plan)?;
            let state: IntegrationState = decode(request.state)?;
            if same_endpoints(&plan.application, &state.application) {
                return encode(&state);
            }

            let label = state.label();
            tracing::info!(integration = %label, "replacing integration endpoints");
            self.client
                .integrations
                .destroy_integration(&state.model, &state.specs())
                .await
                .map_err(|e| delete_failed(e).with_resource(TYPE_NAME, &label))?;
            encode(&self.integrate(&plan).await?)
        })
    }

    fn delete(&self, state: Value) -> BoxFuture<'_, Result<(), ProviderError>> {
        Box::pin(async move {
            let state: IntegrationState = decode(state)?;
            let label = state.label();
            tracing::info!(integration = %label, "removing integration");
            deleted_or_gone(
                self.client
                    .integrations
                    .destroy_integration(&state.model, &state.specs())
                    .await,
                TYPE_NAME,
                &label,
            )
        })
    }

    fn import<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Value, ProviderError>> {
        Box::pin(async move {
            let (model, sides) =
                ids::parse_integration(id).map_err(|e| ProviderError::import_id(id, e.to_string()))?;
            let specs: Vec<EndpointSpec> = sides
                .iter()
                .map(|(app, endpoint)| EndpointSpec {
                    application: Some(app.clone()),
                    endpoint: Some(endpoint.clone()),
                    offer_url: None,
                })
                .collect();
            tracing::info!(integration = %id, "importing integration");
            let info = self
                .client
                .integrations
                .read_integration(&model, &specs)
                .await
                .map_err(|e| read_failed(e).with_resource(TYPE_NAME, id))?;
            encode(&IntegrationState::from_info(&info)?)
        })
    }
}
