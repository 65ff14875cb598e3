use serde::{Deserialize, Serialize};
use serde_json::Value;

use tfjuju_client::JujuClient;
use tfjuju_core::models::model::ModelInfo;

use super::{exactly_one, non_blank};
use crate::data_source::DataSource;
use crate::error::{ProviderError, read_failed};
use crate::resource::{BoxFuture, decode, encode, validate_with};
use crate::schema::{Attribute, Schema};

const TYPE_NAME: &str = "juju_model";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ModelLookup {
    name: Option<String>,
    uuid: Option<String>,
    #[serde(rename = "type")]
    model_type: Option<String>,
}

impl From<ModelInfo> for ModelLookup {
    fn from(info: ModelInfo) -> Self {
        Self {
            name: Some(info.name),
            uuid: Some(info.uuid),
            model_type: Some(info.model_type.as_str().to_string()),
        }
    }
}

fn check(lookup: &ModelLookup) -> Vec<String> {
    exactly_one(("name", lookup.name.as_ref()), ("uuid", lookup.uuid.as_ref()))
}

pub struct ModelDataSource {
    client: JujuClient,
}

impl ModelDataSource {
    pub fn new(client: JujuClient) -> Self {
        Self { client }
    }
}

impl DataSource for ModelDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("Look a model up by name or UUID.")
            .attribute(Attribute::string("name").optional_computed())
            .attribute(Attribute::string("uuid").optional_computed())
            .attribute(Attribute::string("type").computed())
    }

    fn validate(&self, config: &Value) -> Result<(), ProviderError> {
        validate_with(&self.schema(), config, check)
    }

    fn read(&self, config: Value) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let mut lookup: ModelLookup = decode(config)?;
            lookup.name = non_blank(lookup.name);
            lookup.uuid = non_blank(lookup.uuid);
            let errors = check(&lookup);
            if !errors.is_empty() {
                return Err(ProviderError::Validation(errors));
            }
            let info = match (&lookup.name, &lookup.uuid) {
                (Some(name), _) => {
                    tracing::debug!(model = %name, "looking up model");
                    self.client
                        .models
                        .read_model(name)
                        .await
                        .map_err(|e| read_failed(e).with_resource(TYPE_NAME, name))?
                }
                (None, Some(uuid)) => {
                    tracing::debug!(uuid = %uuid, "looking up model");
                    self.client
                        .models
                        .read_model_by_uuid(uuid)
                        .await
                        .map_err(|e| read_failed(e).with_resource(TYPE_NAME, uuid))?
                }
                (None, None) => return Err(ProviderError::validation("name or uuid must be set")),
            };
            encode(&ModelLookup::from(info))
        })
    }
}
