use tfjuju_core::models::integration::{
    CreateIntegrationInput, EndpointSpec, IntegrationEndpoint, IntegrationInfo,
};

use super::{Inner, MemoryController};
use crate::client::BoxFuture;
use crate::error::ClientError;
use crate::integrations::IntegrationsApi;

/// Endpoint assumed when a local application side does not name one.
const DEFAULT_ENDPOINT: &str = "juju-info";

impl MemoryController {
    fn resolve_endpoint(
        &self,
        inner: &Inner,
        model: &str,
        spec: &EndpointSpec,
    ) -> Result<IntegrationEndpoint, ClientError> {
        if let Some(url) = &spec.offer_url {
            let key = self.offer_key(url)?;
            let offer = inner
                .offers
                .get(&key)
                .ok_or_else(|| ClientError::not_found("offer", url))?;
            let endpoint = match &spec.endpoint {
                Some(endpoint) => endpoint.clone(),
                None => offer.endpoints.first().cloned().ok_or_else(|| {
                    ClientError::InvalidRequest(format!("offer {url} has no endpoints"))
                })?,
            };
            return Ok(IntegrationEndpoint {
                application: offer.name.clone(),
                endpoint,
                offer_url: Some(url.clone()),
            });
        }

        let application = spec.application.clone().ok_or_else(|| {
            ClientError::InvalidRequest("endpoint needs an application or an offer url".into())
        })?;
        if !inner
            .applications
            .contains_key(&(model.to_string(), application.clone()))
        {
            return Err(ClientError::not_found(
                "application",
                format!("{model}/{application}"),
            ));
        }
        Ok(IntegrationEndpoint {
            application,
            endpoint: spec
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            offer_url: None,
        })
    }
}

fn matches_spec(endpoint: &IntegrationEndpoint, spec: &EndpointSpec) -> bool {
    let side = match (&spec.offer_url, &spec.application) {
        (Some(url), _) => endpoint.offer_url.as_deref() == Some(url.as_str()),
        (None, Some(app)) => endpoint.application == *app,
        (None, None) => false,
    };
    side && spec.endpoint.as_ref().is_none_or(|e| *e == endpoint.endpoint)
}

fn find_integration(
    inner: &Inner,
    model: &str,
    specs: &[EndpointSpec],
) -> Option<usize> {
    inner.integrations.iter().position(|i| {
        i.model == model
            && i.endpoints.len() == specs.len()
            && specs
                .iter()
                .all(|spec| i.endpoints.iter().any(|e| matches_spec(e, spec)))
    })
}

impl IntegrationsApi for MemoryController {
    fn create_integration(
        &self,
        input: CreateIntegrationInput,
    ) -> BoxFuture<'_, Result<IntegrationInfo, ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            if input.endpoints.len() != 2 {
                return Err(ClientError::InvalidRequest(format!(
                    "an integration joins exactly two endpoints, got {}",
                    input.endpoints.len()
                )));
            }
            inner.require_model(&input.model)?;

            let mut endpoints = input
                .endpoints
                .iter()
                .map(|spec| self.resolve_endpoint(&inner, &input.model, spec))
                .collect::<Result<Vec<_>, _>>()?;
            endpoints.sort();

            let duplicate = inner
                .integrations
                .iter()
                .any(|i| i.model == input.model && i.endpoints == endpoints);
            let label = endpoints
                .iter()
                .map(|e| format!("{}:{}", e.application, e.endpoint))
                .collect::<Vec<_>>()
                .join(":");
            if duplicate {
                return Err(ClientError::already_exists("integration", label));
            }
            inner.call(format!("create_integration:{}:{label}", input.model))?;

            let integration = IntegrationInfo {
                model: input.model,
                endpoints,
                via: input.via,
            };
            inner.integrations.push(integration.clone());
            Ok(integration)
        })
    }

    fn read_integration<'a>(
        &'a self,
        model: &'a str,
        endpoints: &'a [EndpointSpec],
    ) -> BoxFuture<'a, Result<IntegrationInfo, ClientError>> {
        Box::pin(async move {
            let inner = self.lock().await;
            find_integration(&inner, model, endpoints)
                .map(|idx| inner.integrations[idx].clone())
                .ok_or_else(|| ClientError::not_found("integration", model))
        })
    }

    fn destroy_integration<'a>(
        &'a self,
        model: &'a str,
        endpoints: &'a [EndpointSpec],
    ) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            let idx = find_integration(&inner, model, endpoints)
                .ok_or_else(|| ClientError::not_found("integration", model))?;
            let label = inner.integrations[idx]
                .endpoints
                .iter()
                .map(|e| format!("{}:{}", e.application, e.endpoint))
                .collect::<Vec<_>>()
                .join(":");
            inner.call(format!("destroy_integration:{model}:{label}"))?;
            inner.integrations.remove(idx);
            Ok(())
        })
    }
}
