use serde_json::Value;

use tfjuju_client::{Connector, JujuClient};

use crate::config::{ProviderConfig, provider_schema};
use crate::data_source::DataSource;
use crate::data_sources;
use crate::error::ProviderError;
use crate::resource::Resource;
use crate::resources;
use crate::schema::Schema;

/// Shared by every resource and data source once the provider is configured.
#[derive(Clone)]
pub struct ProviderData {
    pub client: JujuClient,
}

/// Provider root: configuration plus the resource and data source registry.
#[derive(Default)]
pub struct JujuProvider {
    data: Option<ProviderData>,
}

impl JujuProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema(&self) -> Schema {
        provider_schema()
    }

    /// Resolve the provider block against the process environment and connect.
    pub async fn configure(&mut self, config: &Value, connector: &dyn Connector) -> Result<(), ProviderError> {
        self.configure_with_env(config, connector, |var| std::env::var(var).ok())
            .await
    }

    pub async fn configure_with_env(
        &mut self,
        config: &Value,
        connector: &dyn Connector,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ProviderError> {
        if !config.is_null() {
            let errors = provider_schema().validate(config);
            if !errors.is_empty() {
                return Err(ProviderError::Validation(errors));
            }
        }
        let resolved = ProviderConfig::from_value(config)?.resolve(env)?;
        tracing::info!(
            addresses = ?resolved.addresses,
            principal = %resolved.login.principal(),
            "connecting to controller"
        );
        let client = connector.connect(resolved).await?;
        tracing::info!(jaas = client.is_jaas(), "provider configured");
        self.data = Some(ProviderData { client });
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.data.is_some()
    }

    fn data(&self) -> Result<&ProviderData, ProviderError> {
        self.data.as_ref().ok_or(ProviderError::NotConfigured)
    }

    pub fn jaas_enabled(&self) -> Result<bool, ProviderError> {
        Ok(self.data()?.client.is_jaas())
    }

    pub fn resources(&self) -> Result<Vec<Box<dyn Resource>>, ProviderError> {
        Ok(resources::all(&self.data()?.client))
    }

    pub fn data_sources(&self) -> Result<Vec<Box<dyn DataSource>>, ProviderError> {
        Ok(data_sources::all(&self.data()?.client))
    }

    pub fn resource(&self, type_name: &str) -> Result<Box<dyn Resource>, ProviderError> {
        self.resources()?
            .into_iter()
            .find(|r| r.type_name() == type_name)
            .ok_or_else(|| ProviderError::UnknownType {
                kind: "resource",
                name: type_name.to_string(),
            })
    }

    pub fn data_source(&self, type_name: &str) -> Result<Box<dyn DataSource>, ProviderError> {
        self.data_sources()?
            .into_iter()
            .find(|d| d.type_name() == type_name)
            .ok_or_else(|| ProviderError::UnknownType {
                kind: "data source",
                name: type_name.to_string(),
            })
    }
}
