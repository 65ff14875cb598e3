use tfjuju_core::models::application::{ApplicationInfo, DeployInput, UpdateApplicationInput};

use crate::client::BoxFuture;
use crate::error::ClientError;

pub trait ApplicationsApi: Send + Sync {
    fn deploy(&self, input: DeployInput) -> BoxFuture<'_, Result<ApplicationInfo, ClientError>>;

    fn read_application<'a>(
        &'a self,
        model: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, Result<ApplicationInfo, ClientError>>;

    fn update_application(
        &self,
        input: UpdateApplicationInput,
    ) -> BoxFuture<'_, Result<(), ClientError>>;

    fn destroy_application<'a>(
        &'a self,
        model: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, Result<(), ClientError>>;
}
