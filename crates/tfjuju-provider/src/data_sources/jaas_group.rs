use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tfjuju_client::JujuClient;
use tfjuju_client::jaas::JaasApi;

use super::{exactly_one, non_blank};
use crate::data_source::DataSource;
use crate::error::{ProviderError, read_failed};
use crate::resource::{BoxFuture, decode, encode, validate_with};
use crate::schema::{Attribute, Schema};

const TYPE_NAME: &str = "juju_jaas_group";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct GroupLookup {
    name: Option<String>,
    uuid: Option<String>,
}

fn check(lookup: &GroupLookup) -> Vec<String> {
    exactly_one(("name", lookup.name.as_ref()), ("uuid", lookup.uuid.as_ref()))
}

pub struct JaasGroupDataSource {
    jaas: Option<Arc<dyn JaasApi>>,
}

impl JaasGroupDataSource {
    pub fn new(client: &JujuClient) -> Self {
        Self {
            jaas: client.jaas.clone(),
        }
    }
}

impl DataSource for JaasGroupDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("Look a JAAS group up by name or UUID.")
            .attribute(Attribute::string("name").optional_computed())
            .attribute(Attribute::string("uuid").optional_computed())
    }

    fn validate(&self, config: &Value) -> Result<(), ProviderError> {
        validate_with(&self.schema(), config, check)
    }

    fn read(&self, config: Value) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let jaas = self
                .jaas
                .as_ref()
                .ok_or_else(|| ProviderError::JaasRequired(TYPE_NAME.to_string()))?;
            let mut lookup: GroupLookup = decode(config)?;
            lookup.name = non_blank(lookup.name);
            lookup.uuid = non_blank(lookup.uuid);
            let errors = check(&lookup);
            if !errors.is_empty() {
                return Err(ProviderError::Validation(errors));
            }
            let group = match (&lookup.name, &lookup.uuid) {
                (Some(name), _) => jaas
                    .read_group_by_name(name)
                    .await
                    .map_err(|e| read_failed(e).with_resource(TYPE_NAME, name))?,
                (None, Some(uuid)) => jaas
                    .read_group(uuid)
                    .await
                    .map_err(|e| read_failed(e).with_resource(TYPE_NAME, uuid))?,
                (None, None) => return Err(ProviderError::validation("name or uuid must be set")),
            };
            tracing::debug!(group = %group.uuid, name = %group.name, "found jaas group");
            encode(&GroupLookup {
                name: Some(group.name),
                uuid: Some(group.uuid),
            })
        })
    }
}
