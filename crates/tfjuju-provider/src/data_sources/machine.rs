use serde::{Deserialize, Serialize};
use serde_json::Value;

use tfjuju_client::JujuClient;

use crate::data_source::DataSource;
use crate::error::{ProviderError, read_failed};
use crate::resource::{BoxFuture, decode, encode};
use crate::schema::{Attribute, Schema};

const TYPE_NAME: &str = "juju_machine";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct MachineLookup {
    model: String,
    machine_id: String,
    base: Option<String>,
    constraints: Option<String>,
}

pub struct MachineDataSource {
    client: JujuClient,
}

impl MachineDataSource {
    pub fn new(client: JujuClient) -> Self {
        Self { client }
    }
}

impl DataSource for MachineDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("Look up a machine in a model.")
            .attribute(Attribute::string("model").required())
            .attribute(Attribute::string("machine_id").required())
            .attribute(Attribute::string("base").computed())
            .attribute(Attribute::string("constraints").computed())
    }

    fn read(&self, config: Value) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let lookup: MachineLookup = decode(config)?;
            let id = format!("{}:{}", lookup.model, lookup.machine_id);
            tracing::debug!(machine = %id, "looking up machine");
            let info = self
                .client
                .machines
                .read_machine(&lookup.model, &lookup.machine_id)
                .await
                .map_err(|e| read_failed(e).with_resource(TYPE_NAME, &id))?;
            encode(&MachineLookup {
                model: info.model,
                machine_id: info.machine_id,
                base: Some(info.base),
                constraints: Some(info.constraints),
            })
        })
    }
}
