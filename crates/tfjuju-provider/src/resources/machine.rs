use serde::{Deserialize, Serialize};
use serde_json::Value;

use tfjuju_client::JujuClient;
use tfjuju_core::ids;
use tfjuju_core::models::machine::{AddMachineInput, MachineInfo};

use super::{deleted_or_gone, read_or_gone, refreshed_text};
use crate::error::{ProviderError, create_failed, read_failed};
use crate::resource::{BoxFuture, Resource, UpdateRequest, decode, encode};
use crate::schema::{Attribute, Schema};

const TYPE_NAME: &str = "juju_machine";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct MachineState {
    id: Option<String>,
    model: String,
    /// Local label only. The controller never sees it.
    name: Option<String>,
    base: Option<String>,
    constraints: Option<String>,
    placement: Option<String>,
    machine_id: Option<String>,
}

impl MachineState {
    fn from_info(info: &MachineInfo, name: Option<String>, prior: Option<&MachineState>) -> Self {
        Self {
            id: Some(ids::machine(
                &info.model,
                &info.machine_id,
                name.as_deref().unwrap_or_default(),
            )),
            model: info.model.clone(),
            name,
            base: Some(info.base.clone()),
            constraints: refreshed_text(
                prior.and_then(|p| p.constraints.as_ref()),
                &info.constraints,
            ),
            placement: info.placement.clone(),
            machine_id: Some(info.machine_id.clone()),
        }
    }

    fn machine_id(&self) -> Result<String, ProviderError> {
        if let Some(machine_id) = &self.machine_id {
            return Ok(machine_id.clone());
        }
        let id = self.id.as_deref().unwrap_or_default();
        let (_, machine_id, _) = ids::parse_machine(id)?;
        Ok(machine_id)
    }
}

pub struct MachineResource {
    client: JujuClient,
}

impl MachineResource {
    pub fn new(client: JujuClient) -> Self {
        Self { client }
    }
}

impl Resource for MachineResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("A machine in a model.")
            .with_id()
            .attribute(Attribute::string("model").required().requires_replace())
            .attribute(Attribute::string("name").description("Label kept in state only."))
            .attribute(
                Attribute::string("base")
                    .optional_computed()
                    .requires_replace()
                    .description("Operating system base, e.g. ubuntu@22.04."),
            )
            .attribute(Attribute::string("constraints").requires_replace())
            .attribute(
                Attribute::string("placement")
                    .requires_replace()
                    .description("Placement directive such as a zone or an LXD container host."),
            )
            .attribute(Attribute::string("machine_id").computed())
    }

    fn create(&self, plan: Value) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let plan: MachineState = decode(plan)?;
            tracing::info!(model = %plan.model, "adding machine");
            let info = self
                .client
                .machines
                .add_machine(AddMachineInput {
                    model: plan.model.clone(),
                    base: plan.base.clone(),
                    constraints: plan.constraints.clone(),
                    placement: plan.placement.clone(),
                })
                .await
                .map_err(|e| create_failed(e).with_resource(TYPE_NAME, &plan.model))?;
            tracing::info!(model = %info.model, machine_id = %info.machine_id, "machine added");
            encode(&MachineState::from_info(&info, plan.name.clone(), Some(&plan)))
        })
    }

    fn read(&self, state: Value) -> BoxFuture<'_, Result<Option<Value>, ProviderError>> {
        Box::pin(async move {
            let state: MachineState = decode(state)?;
            let machine_id = state.machine_id()?;
            tracing::debug!(model = %state.model, machine_id = %machine_id, "reading machine");
            let info = read_or_gone(
                self.client.machines.read_machine(&state.model, &machine_id).await,
                TYPE_NAME,
                &machine_id,
            )?;
            info.map(|info| encode(&MachineState::from_info(&info, state.name.clone(), Some(&state))))
                .transpose()
        })
    }

    fn update(&self, request: UpdateRequest) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let plan: MachineState = decode(request.plan)?;
            let mut state: MachineState = decode(request.state)?;
            let machine_id = state.machine_id()?;
            state.id = Some(ids::machine(
                &state.model,
                &machine_id,
                plan.name.as_deref().unwrap_or_default(),
            ));
            state.name = plan.name;
            encode(&state)
        })
    }

    fn delete(&self, state: Value) -> BoxFuture<'_, Result<(), ProviderError>> {
        Box::pin(async move {
            let state: MachineState = decode(state)?;
            let machine_id = state.machine_id()?;
            tracing::info!(model = %state.model, machine_id = %machine_id, "destroying machine");
            deleted_or_gone(
                self.client.machines.destroy_machine(&state.model, &machine_id).await,
                TYPE_NAME,
                &machine_id,
            )
        })
    }

    fn import<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Value, ProviderError>> {
        Box::pin(async move {
            let (model, machine_id, name) =
                ids::parse_machine(id).map_err(|e| ProviderError::import_id(id, e.to_string()))?;
            tracing::info!(model = %model, machine_id = %machine_id, "importing machine");
            let info = self
                .client
                .machines
                .read_machine(&model, &machine_id)
                .await
                .map_err(|e| read_failed(e).with_resource(TYPE_NAME, id))?;
            let name = (!name.is_empty()).then_some(name);
            encode(&MachineState::from_info(&info, name, None))
        })
    }
}
