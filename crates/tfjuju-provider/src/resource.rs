use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use tfjuju_client::BoxFuture;

use crate::error::ProviderError;
use crate::schema::Schema;

/// Planned and prior state handed to [`Resource::update`].
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    pub plan: Value,
    pub state: Value,
}

/// Trait implemented by each managed resource type.
///
/// Plan and state documents are JSON objects shaped by [`Resource::schema`];
/// unknown computed values are null. Methods return boxed futures for dyn
/// compatibility.
pub trait Resource: Send + Sync {
    /// The type name used in configuration, e.g. "juju_model".
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// Validate a configuration document. Resources with cross-attribute
    /// rules extend the schema check.
    fn validate(&self, config: &Value) -> Result<(), ProviderError> {
        finish(self.schema().validate(config))
    }

    /// Create the remote entity and return the resulting state.
    fn create(&self, plan: Value) -> BoxFuture<'_, Result<Value, ProviderError>>;

    /// Refresh state from the controller. `Ok(None)` means the entity is
    /// gone and should be dropped from state.
    fn read(&self, state: Value) -> BoxFuture<'_, Result<Option<Value>, ProviderError>>;

    fn update(&self, request: UpdateRequest) -> BoxFuture<'_, Result<Value, ProviderError>>;

    /// Delete the remote entity. An entity that is already gone is not an error.
    fn delete(&self, state: Value) -> BoxFuture<'_, Result<(), ProviderError>>;

    /// Build full state for an existing entity from its import id.
    fn import<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Value, ProviderError>>;
}

pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ProviderError> {
    Ok(serde_json::from_value(value)?)
}

pub fn encode<T: Serialize>(value: &T) -> Result<Value, ProviderError> {
    Ok(serde_json::to_value(value)?)
}

pub(crate) fn finish(errors: Vec<String>) -> Result<(), ProviderError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ProviderError::Validation(errors))
    }
}

/// Schema check followed by typed cross-attribute checks. The typed checks
/// only run on documents that passed the schema.
pub(crate) fn validate_with<T: DeserializeOwned>(
    schema: &Schema,
    config: &Value,
    check: impl Fn(&T) -> Vec<String>,
) -> Result<(), ProviderError> {
    let mut errors = schema.validate(config);
    if errors.is_empty() {
        let typed: T = decode(config.clone())?;
        errors.extend(check(&typed));
    }
    finish(errors)
}
