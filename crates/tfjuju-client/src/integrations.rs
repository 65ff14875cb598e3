use tfjuju_core::models::integration::{CreateIntegrationInput, EndpointSpec, IntegrationInfo};

use crate::client::BoxFuture;
use crate::error::ClientError;

pub trait IntegrationsApi: Send + Sync {
    /// Relate two endpoints. An endpoint with an `offer_url` is consumed
    /// into the model first.
    fn create_integration(
        &self,
        input: CreateIntegrationInput,
    ) -> BoxFuture<'_, Result<IntegrationInfo, ClientError>>;

    fn read_integration<'a>(
        &'a self,
        model: &'a str,
        endpoints: &'a [EndpointSpec],
    ) -> BoxFuture<'a, Result<IntegrationInfo, ClientError>>;

    fn destroy_integration<'a>(
        &'a self,
        model: &'a str,
        endpoints: &'a [EndpointSpec],
    ) -> BoxFuture<'a, Result<(), ClientError>>;
}
