use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tfjuju_client::JujuClient;
use tfjuju_core::ids;
use tfjuju_core::models::application::{
    ApplicationInfo, CharmSpec, DeployInput, ExposeSpec, UpdateApplicationInput,
};

use super::{deleted_or_gone, managed_entries, map_changes, read_or_gone, refreshed_text};
use crate::error::{ProviderError, create_failed, read_failed, update_failed};
use crate::resource::{BoxFuture, Resource, UpdateRequest, decode, encode};
use crate::schema::{AttrKind, Attribute, Pattern, Schema, Validator};

const TYPE_NAME: &str = "juju_application";
const DEFAULT_CHANNEL: &str = "latest/stable";
const DEFAULT_UNITS: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CharmBlock {
    name: String,
    channel: Option<String>,
    revision: Option<u32>,
    base: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct ExposeBlock {
    endpoints: Option<BTreeSet<String>>,
    spaces: Option<BTreeSet<String>>,
    cidrs: Option<BTreeSet<String>>,
}

impl ExposeBlock {
    fn to_spec(&self) -> ExposeSpec {
        let list = |set: &Option<BTreeSet<String>>| {
            set.iter().flatten().cloned().collect::<Vec<_>>()
        };
        ExposeSpec {
            endpoints: list(&self.endpoints),
            spaces: list(&self.spaces),
            cidrs: list(&self.cidrs),
        }
    }

    fn from_spec(spec: &ExposeSpec) -> Self {
        let set = |items: &[String]| {
            (!items.is_empty()).then(|| items.iter().cloned().collect::<BTreeSet<_>>())
        };
        Self {
            endpoints: set(&spec.endpoints),
            spaces: set(&spec.spaces),
            cidrs: set(&spec.cidrs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ApplicationState {
    id: Option<String>,
    model: String,
    name: Option<String>,
    charm: CharmBlock,
    units: Option<u32>,
    config: Option<BTreeMap<String, String>>,
    constraints: Option<String>,
    trust: Option<bool>,
    expose: Option<ExposeBlock>,
    principal: Option<bool>,
}

impl ApplicationState {
    /// Defaults to the charm name.
    fn app_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.charm.name)
    }

    fn from_info(info: &ApplicationInfo, prior: Option<&ApplicationState>) -> Self {
        let prior_trust = prior.and_then(|p| p.trust);
        Self {
            id: Some(ids::application(&info.model, &info.name)),
            model: info.model.clone(),
            name: Some(info.name.clone()),
            charm: CharmBlock {
                name: info.charm.name.clone(),
                channel: Some(info.charm.channel.clone()),
                revision: info.charm.revision,
                base: info.charm.base.clone(),
            },
            units: Some(info.units),
            config: managed_entries(&info.config, prior.and_then(|p| p.config.as_ref())),
            constraints: refreshed_text(
                prior.and_then(|p| p.constraints.as_ref()),
                &info.constraints,
            ),
            trust: (prior_trust.is_some() || info.trust).then_some(info.trust),
            expose: info.expose.as_ref().map(ExposeBlock::from_spec),
            principal: Some(info.principal),
        }
    }
}

pub struct ApplicationResource {
    client: JujuClient,
}

impl ApplicationResource {
    pub fn new(client: JujuClient) -> Self {
        Self { client }
    }

    async fn fetch(&self, model: &str, name: &str) -> Result<ApplicationInfo, ProviderError> {
        self.client
            .applications
            .read_application(model, name)
            .await
            .map_err(|e| read_failed(e).with_resource(TYPE_NAME, &ids::application(model, name)))
    }
}

fn update_input(plan: &ApplicationState, state: &ApplicationState) -> UpdateApplicationInput {
    let (config, unset) = map_changes(state.config.as_ref(), plan.config.as_ref());

    let channel = plan.charm.channel.clone().filter(|c| state.charm.channel.as_ref() != Some(c));
    let revision = plan.charm.revision.filter(|r| state.charm.revision != Some(*r));

    // Subordinates follow their principal and cannot be scaled.
    let desired_units = plan.units.unwrap_or(DEFAULT_UNITS);
    let units = (state.principal != Some(false) && state.units != Some(desired_units))
        .then_some(desired_units);

    let trust = plan.trust.unwrap_or(false);
    let trust = (state.trust.unwrap_or(false) != trust).then_some(trust);

    let (expose, unexpose) = match (&plan.expose, &state.expose) {
        (Some(wanted), current) if current.as_ref() != Some(wanted) => (Some(wanted.to_spec()), false),
        (None, Some(_)) => (None, true),
        _ => (None, false),
    };

    UpdateApplicationInput {
        model: state.model.clone(),
        name: state.app_name().to_string(),
        charm_channel: channel,
        charm_revision: revision,
        units,
        config,
        unset,
        constraints: (plan.constraints != state.constraints)
            .then(|| plan.constraints.clone().unwrap_or_default()),
        trust,
        expose,
        unexpose,
    }
}

impl Resource for ApplicationResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        let string_set = |name: &str| Attribute::string_set(name).optional();
        Schema::new("An application deployed from a charm.")
            .with_id()
            .attribute(Attribute::string("model").required().requires_replace())
            .attribute(
                Attribute::string("name")
                    .optional_computed()
                    .requires_replace()
                    .description("Application name. Defaults to the charm name."),
            )
            .attribute(
                Attribute::new(
                    "charm",
                    AttrKind::Object(vec![
                        Attribute::string("name").required().requires_replace(),
                        Attribute::string("channel")
                            .optional_computed()
                            .description("Defaults to latest/stable."),
                        Attribute::int("revision").optional_computed(),
                        Attribute::string("base").optional_computed(),
                    ]),
                )
                .required(),
            )
            .attribute(
                Attribute::int("units")
                    .optional_computed()
                    .description("Number of units. Defaults to 1."),
            )
            .attribute(Attribute::string_map("config"))
            .attribute(Attribute::string("constraints"))
            .attribute(Attribute::bool("trust"))
            .attribute(
                Attribute::new(
                    "expose",
                    AttrKind::Object(vec![
                        string_set("endpoints"),
                        string_set("spaces"),
                        string_set("cidrs").validator(Validator::Pattern(Pattern::Contains("/"))),
                    ]),
                )
                .description("Expose the application. Removing the block unexposes it."),
            )
            .attribute(Attribute::bool("principal").computed())
    }

    fn create(&self, plan: Value) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let plan: ApplicationState = decode(plan)?;
            let name = plan.app_name().to_string();
            tracing::info!(model = %plan.model, application = %name, charm = %plan.charm.name, "deploying application");

            let input = DeployInput {
                model: plan.model.clone(),
                name: name.clone(),
                charm: CharmSpec {
                    name: plan.charm.name.clone(),
                    channel: plan
                        .charm
                        .channel
                        .clone()
                        .unwrap_or_else(|| DEFAULT_CHANNEL.to_string()),
                    revision: plan.charm.revision,
                    base: plan.charm.base.clone(),
                },
                units: plan.units.unwrap_or(DEFAULT_UNITS),
                config: plan.config.clone().unwrap_or_default(),
                constraints: plan.constraints.clone(),
                trust: plan.trust.unwrap_or(false),
                expose: plan.expose.as_ref().map(ExposeBlock::to_spec),
            };
            let info = self
                .client
                .applications
                .deploy(input)
                .await
                .map_err(|e| create_failed(e).with_resource(TYPE_NAME, &name))?;
            encode(&ApplicationState::from_info(&info, Some(&plan)))
        })
    }

    fn read(&self, state: Value) -> BoxFuture<'_, Result<Option<Value>, ProviderError>> {
        Box::pin(async move {
            let state: ApplicationState = decode(state)?;
            let id = ids::application(&state.model, state.app_name());
            tracing::debug!(application = %id, "reading application");
            let info = read_or_gone(
                self.client
                    .applications
                    .read_application(&state.model, state.app_name())
                    .await,
                TYPE_NAME,
                &id,
            )?;
            info.map(|info| encode(&ApplicationState::from_info(&info, Some(&state))))
                .transpose()
        })
    }

    fn update(&self, request: UpdateRequest) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let plan: ApplicationState = decode(request.plan)?;
            let state: ApplicationState = decode(request.state)?;
            let input = update_input(&plan, &state);
            let id = ids::application(&input.model, &input.name);

            if !input.is_empty() {
                tracing::info!(
                    application = %id,
                    units = ?input.units,
                    channel = ?input.charm_channel,
                    revision = ?input.charm_revision,
                    unexpose = input.unexpose,
                    "updating application"
                );
                self.client
                    .applications
                    .update_application(input)
                    .await
                    .map_err(|e| update_failed(e).with_resource(TYPE_NAME, &id))?;
            }

            let info = self.fetch(&state.model, state.app_name()).await?;
            encode(&ApplicationState::from_info(&info, Some(&plan)))
        })
    }

    fn delete(&self, state: Value) -> BoxFuture<'_, Result<(), ProviderError>> {
        Box::pin(async move {
            let state: ApplicationState = decode(state)?;
            let id = ids::application(&state.model, state.app_name());
            tracing::info!(application = %id, "destroying application");
            deleted_or_gone(
                self.client
                    .applications
                    .destroy_application(&state.model, state.app_name())
                    .await,
                TYPE_NAME,
                &id,
            )
        })
    }

    fn import<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Value, ProviderError>> {
        Box::pin(async move {
            let (model, name) =
                ids::parse_application(id).map_err(|e| ProviderError::import_id(id, e.to_string()))?;
            tracing::info!(application = %id, "importing application");
            let info = self.fetch(&model, &name).await?;
            encode(&ApplicationState::from_info(&info, None))
        })
    }
}
