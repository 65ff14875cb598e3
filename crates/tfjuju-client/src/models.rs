use tfjuju_core::models::access::ModelAccess;
use tfjuju_core::models::model::{CreateModelInput, ModelInfo, UpdateModelInput};

use crate::client::BoxFuture;
use crate::error::ClientError;

pub trait ModelsApi: Send + Sync {
    fn create_model(&self, input: CreateModelInput) -> BoxFuture<'_, Result<ModelInfo, ClientError>>;

    /// Look a model up by name within the logged-in user's namespace.
    fn read_model<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<ModelInfo, ClientError>>;

    fn read_model_by_uuid<'a>(
        &'a self,
        uuid: &'a str,
    ) -> BoxFuture<'a, Result<ModelInfo, ClientError>>;

    fn update_model(&self, input: UpdateModelInput) -> BoxFuture<'_, Result<(), ClientError>>;

    fn destroy_model<'a>(&'a self, uuid: &'a str) -> BoxFuture<'a, Result<(), ClientError>>;

    /// Raise `user` to at least `access` on the model. Idempotent.
    fn grant_model<'a>(
        &'a self,
        model: &'a str,
        user: &'a str,
        access: ModelAccess,
    ) -> BoxFuture<'a, Result<(), ClientError>>;

    /// Take `access` away from `user`, leaving the next lower level.
    /// Revoking `read` removes the user from the model. Idempotent.
    fn revoke_model<'a>(
        &'a self,
        model: &'a str,
        user: &'a str,
        access: ModelAccess,
    ) -> BoxFuture<'a, Result<(), ClientError>>;
}
