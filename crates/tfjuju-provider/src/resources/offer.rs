use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tfjuju_client::JujuClient;
use tfjuju_core::models::offer::{CreateOfferInput, OfferInfo, OfferUrl};

use super::{deleted_or_gone, read_or_gone};
use crate::error::{ProviderError, create_failed, read_failed};
use crate::resource::{BoxFuture, Resource, UpdateRequest, decode, encode};
use crate::schema::{Attribute, Schema, Validator};

const TYPE_NAME: &str = "juju_offer";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct OfferState {
    id: Option<String>,
    model: String,
    application_name: String,
    endpoints: BTreeSet<String>,
    name: Option<String>,
    url: Option<String>,
}

impl OfferState {
    fn from_info(info: &OfferInfo) -> Self {
        Self {
            id: Some(info.url.clone()),
            model: info.model.clone(),
            application_name: info.application_name.clone(),
            endpoints: info.endpoints.iter().cloned().collect(),
            name: Some(info.name.clone()),
            url: Some(info.url.clone()),
        }
    }

    fn url(&self) -> Result<&str, ProviderError> {
        self.url
            .as_deref()
            .or(self.id.as_deref())
            .ok_or_else(|| ProviderError::ReadFailed(format!("{TYPE_NAME}: state has no url")))
    }
}

pub struct OfferResource {
    client: JujuClient,
}

impl OfferResource {
    pub fn new(client: JujuClient) -> Self {
        Self { client }
    }
}

impl Resource for OfferResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("An application offer for cross-model integration.")
            .with_id()
            .attribute(Attribute::string("model").required().requires_replace())
            .attribute(Attribute::string("application_name").required().requires_replace())
            .attribute(
                Attribute::string_set("endpoints")
                    .required()
                    .requires_replace()
                    .validator(Validator::SetSize { min: 1, max: None }),
            )
            .attribute(
                Attribute::string("name")
                    .optional_computed()
                    .requires_replace()
                    .description("Offer name. Defaults to the application name."),
            )
            .attribute(Attribute::string("url").computed())
    }

    fn create(&self, plan: Value) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let plan: OfferState = decode(plan)?;
            tracing::info!(model = %plan.model, application = %plan.application_name, "creating offer");
            let info = self
                .client
                .offers
                .create_offer(CreateOfferInput {
                    model: plan.model.clone(),
                    application_name: plan.application_name.clone(),
                    endpoints: plan.endpoints.iter().cloned().collect(),
                    name: plan.name.clone(),
                })
                .await
                .map_err(|e| create_failed(e).with_resource(TYPE_NAME, &plan.application_name))?;
            encode(&OfferState::from_info(&info))
        })
    }

    fn read(&self, state: Value) -> BoxFuture<'_, Result<Option<Value>, ProviderError>> {
        Box::pin(async move {
            let state: OfferState = decode(state)?;
            let url = state.url()?;
            tracing::debug!(url = %url, "reading offer");
            let info = read_or_gone(self.client.offers.read_offer(url).await, TYPE_NAME, url)?;
            info.map(|info| encode(&OfferState::from_info(&info))).transpose()
        })
    }

    /// Every attribute forces replacement, so there is nothing to change in
    /// place. The computed attributes carry over from state.
    fn update(&self, request: UpdateRequest) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let state: OfferState = decode(request.state)?;
            encode(&state)
        })
    }

    fn delete(&self, state: Value) -> BoxFuture<'_, Result<(), ProviderError>> {
        Box::pin(async move {
            let state: OfferState = decode(state)?;
            let url = state.url()?;
            tracing::info!(url = %url, "removing offer");
            deleted_or_gone(self.client.offers.destroy_offer(url, true).await, TYPE_NAME, url)
        })
    }

    fn import<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Value, ProviderError>> {
        Box::pin(async move {
            id.parse::<OfferUrl>()
                .map_err(|e| ProviderError::import_id(id, e.to_string()))?;
            tracing::info!(url = %id, "importing offer");
            let info = self
                .client
                .offers
                .read_offer(id)
                .await
                .map_err(|e| read_failed(e).with_resource(TYPE_NAME, id))?;
            encode(&OfferState::from_info(&info))
        })
    }
}
