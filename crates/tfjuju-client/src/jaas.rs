use tfjuju_core::models::jaas::{JaasGroup, RelationFilter, RelationTuple};

use crate::client::BoxFuture;
use crate::error::ClientError;

/// JIMM's authorisation and group API. Only JAAS controllers expose it.
pub trait JaasApi: Send + Sync {
    /// Write tuples. Tuples that already exist are ignored.
    fn add_relations(&self, tuples: Vec<RelationTuple>) -> BoxFuture<'_, Result<(), ClientError>>;

    /// Delete tuples. Tuples that do not exist are ignored.
    fn delete_relations(&self, tuples: Vec<RelationTuple>) -> BoxFuture<'_, Result<(), ClientError>>;

    fn read_relations(
        &self,
        filter: RelationFilter,
    ) -> BoxFuture<'_, Result<Vec<RelationTuple>, ClientError>>;

    fn add_group<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<JaasGroup, ClientError>>;

    fn read_group<'a>(&'a self, uuid: &'a str) -> BoxFuture<'a, Result<JaasGroup, ClientError>>;

    fn read_group_by_name<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<JaasGroup, ClientError>>;

    fn rename_group<'a>(
        &'a self,
        uuid: &'a str,
        new_name: &'a str,
    ) -> BoxFuture<'a, Result<(), ClientError>>;

    fn remove_group<'a>(&'a self, uuid: &'a str) -> BoxFuture<'a, Result<(), ClientError>>;
}
