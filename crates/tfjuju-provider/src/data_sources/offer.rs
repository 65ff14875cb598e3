use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tfjuju_client::JujuClient;

use crate::data_source::DataSource;
use crate::error::{ProviderError, read_failed};
use crate::resource::{BoxFuture, decode, encode};
use crate::schema::{Attribute, Schema, Validator};

const TYPE_NAME: &str = "juju_offer";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct OfferLookup {
    url: String,
    model: Option<String>,
    name: Option<String>,
    application_name: Option<String>,
    endpoints: Option<BTreeSet<String>>,
}

pub struct OfferDataSource {
    client: JujuClient,
}

impl OfferDataSource {
    pub fn new(client: JujuClient) -> Self {
        Self { client }
    }
}

impl DataSource for OfferDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("Look an application offer up by URL.")
            .attribute(Attribute::string("url").required().validator(Validator::NotEmpty))
            .attribute(Attribute::string("model").computed())
            .attribute(Attribute::string("name").computed())
            .attribute(Attribute::string("application_name").computed())
            .attribute(Attribute::string_set("endpoints").computed())
    }

    fn read(&self, config: Value) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let lookup: OfferLookup = decode(config)?;
            tracing::debug!(offer = %lookup.url, "looking up offer");
            let info = self
                .client
                .offers
                .read_offer(&lookup.url)
                .await
                .map_err(|e| read_failed(e).with_resource(TYPE_NAME, &lookup.url))?;
            encode(&OfferLookup {
                url: lookup.url,
                model: Some(info.model),
                name: Some(info.name),
                application_name: Some(info.application_name),
                endpoints: Some(info.endpoints.into_iter().collect()),
            })
        })
    }
}
