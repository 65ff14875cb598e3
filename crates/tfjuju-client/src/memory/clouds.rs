use tfjuju_core::models::cloud::{KubernetesCloudInfo, KubernetesCloudInput};

use super::MemoryController;
use crate::client::BoxFuture;
use crate::clouds::CloudsApi;
use crate::error::ClientError;

impl CloudsApi for MemoryController {
    fn add_kubernetes_cloud(
        &self,
        input: KubernetesCloudInput,
    ) -> BoxFuture<'_, Result<KubernetesCloudInfo, ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            if inner.clouds.contains_key(&input.name) {
                return Err(ClientError::already_exists("cloud", &input.name));
            }
            if input.kubernetes_config.trim().is_empty() {
                return Err(ClientError::InvalidRequest(
                    "kubernetes_config must not be empty".into(),
                ));
            }
            inner.call(format!("add_cloud:{}", input.name))?;

            let cloud = KubernetesCloudInfo {
                credential: input.name.clone(),
                name: input.name,
                parent_cloud_name: input.parent_cloud_name,
                parent_cloud_region: input.parent_cloud_region,
            };
            inner.clouds.insert(cloud.name.clone(), cloud.clone());
            Ok(cloud)
        })
    }

    fn read_kubernetes_cloud<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, Result<KubernetesCloudInfo, ClientError>> {
        Box::pin(async move {
            self.lock()
                .await
                .clouds
                .get(name)
                .cloned()
                .ok_or_else(|| ClientError::not_found("cloud", name))
        })
    }

    fn update_kubernetes_cloud(
        &self,
        input: KubernetesCloudInput,
    ) -> BoxFuture<'_, Result<(), ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            if !inner.clouds.contains_key(&input.name) {
                return Err(ClientError::not_found("cloud", &input.name));
            }
            inner.call(format!("update_cloud:{}", input.name))?;
            if let Some(cloud) = inner.clouds.get_mut(&input.name) {
                cloud.parent_cloud_name = input.parent_cloud_name;
                cloud.parent_cloud_region = input.parent_cloud_region;
            }
            Ok(())
        })
    }

    fn remove_cloud<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            if !inner.clouds.contains_key(name) {
                return Err(ClientError::not_found("cloud", name));
            }
            if inner.models.values().any(|m| m.cloud == name) {
                return Err(ClientError::InvalidRequest(format!(
                    "cloud {name} is still used by a model"
                )));
            }
            inner.call(format!("remove_cloud:{name}"))?;
            inner.clouds.remove(name);
            Ok(())
        })
    }
}
