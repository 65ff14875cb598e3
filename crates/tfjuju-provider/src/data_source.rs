use serde_json::Value;

use crate::error::ProviderError;
use crate::resource::{BoxFuture, finish};
use crate::schema::Schema;

/// Read-only lookup of a remote entity.
pub trait DataSource: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    fn validate(&self, config: &Value) -> Result<(), ProviderError> {
        finish(self.schema().validate(config))
    }

    /// Look the entity up and return the configuration with computed
    /// attributes filled in.
    fn read(&self, config: Value) -> BoxFuture<'_, Result<Value, ProviderError>>;
}
