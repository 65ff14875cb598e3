use tfjuju_core::models::cloud::{KubernetesCloudInfo, KubernetesCloudInput};

use crate::client::BoxFuture;
use crate::error::ClientError;

pub trait CloudsApi: Send + Sync {
    fn add_kubernetes_cloud(
        &self,
        input: KubernetesCloudInput,
    ) -> BoxFuture<'_, Result<KubernetesCloudInfo, ClientError>>;

    fn read_kubernetes_cloud<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, Result<KubernetesCloudInfo, ClientError>>;

    fn update_kubernetes_cloud(
        &self,
        input: KubernetesCloudInput,
    ) -> BoxFuture<'_, Result<(), ClientError>>;

    fn remove_cloud<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<(), ClientError>>;
}
