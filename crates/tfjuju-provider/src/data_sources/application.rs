use serde::{Deserialize, Serialize};
use serde_json::Value;

use tfjuju_client::JujuClient;
use tfjuju_core::ids;

use crate::data_source::DataSource;
use crate::error::{ProviderError, read_failed};
use crate::resource::{BoxFuture, decode, encode};
use crate::schema::{AttrKind, Attribute, Schema};

const TYPE_NAME: &str = "juju_application";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CharmOut {
    name: String,
    channel: String,
    revision: Option<u32>,
    base: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ApplicationLookup {
    model: String,
    name: String,
    charm: Option<CharmOut>,
    units: Option<u32>,
    principal: Option<bool>,
}

pub struct ApplicationDataSource {
    client: JujuClient,
}

impl ApplicationDataSource {
    pub fn new(client: JujuClient) -> Self {
        Self { client }
    }
}

impl DataSource for ApplicationDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("Look up a deployed application.")
            .attribute(Attribute::string("model").required())
            .attribute(Attribute::string("name").required())
            .attribute(
                Attribute::new(
                    "charm",
                    AttrKind::Object(vec![
                        Attribute::string("name").computed(),
                        Attribute::string("channel").computed(),
                        Attribute::int("revision").computed(),
                        Attribute::string("base").computed(),
                    ]),
                )
                .computed(),
            )
            .attribute(Attribute::int("units").computed())
            .attribute(Attribute::bool("principal").computed())
    }

    fn read(&self, config: Value) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let lookup: ApplicationLookup = decode(config)?;
            let id = ids::application(&lookup.model, &lookup.name);
            tracing::debug!(application = %id, "looking up application");
            let info = self
                .client
                .applications
                .read_application(&lookup.model, &lookup.name)
                .await
                .map_err(|e| read_failed(e).with_resource(TYPE_NAME, &id))?;
            encode(&ApplicationLookup {
                model: info.model,
                name: info.name,
                charm: Some(CharmOut {
                    name: info.charm.name,
                    channel: info.charm.channel,
                    revision: info.charm.revision,
                    base: info.charm.base,
                }),
                units: Some(info.units),
                principal: Some(info.principal),
            })
        })
    }
}
