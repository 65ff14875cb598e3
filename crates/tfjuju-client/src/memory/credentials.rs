use tfjuju_core::models::credential::{CloudCredential, CredentialScope};

use super::MemoryController;
use crate::client::BoxFuture;
use crate::credentials::CredentialsApi;
use crate::error::ClientError;

fn label(scope: CredentialScope, cloud: &str, name: &str) -> String {
    format!("{scope}:{cloud}:{name}")
}

impl CredentialsApi for MemoryController {
    fn add_credential(
        &self,
        credential: CloudCredential,
        scope: CredentialScope,
    ) -> BoxFuture<'_, Result<(), ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            let key = (scope, credential.cloud.clone(), credential.name.clone());
            let label = label(scope, &credential.cloud, &credential.name);
            if inner.credentials.contains_key(&key) {
                return Err(ClientError::already_exists("credential", label));
            }
            inner.call(format!("add_credential:{label}"))?;
            inner.credentials.insert(key, credential);
            Ok(())
        })
    }

    fn read_credential<'a>(
        &'a self,
        cloud: &'a str,
        name: &'a str,
        scope: CredentialScope,
    ) -> BoxFuture<'a, Result<CloudCredential, ClientError>> {
        Box::pin(async move {
            self.lock()
                .await
                .credentials
                .get(&(scope, cloud.to_string(), name.to_string()))
                .cloned()
                .ok_or_else(|| ClientError::not_found("credential", label(scope, cloud, name)))
        })
    }

    fn update_credential(
        &self,
        credential: CloudCredential,
        scope: CredentialScope,
    ) -> BoxFuture<'_, Result<(), ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            let key = (scope, credential.cloud.clone(), credential.name.clone());
            let label = label(scope, &credential.cloud, &credential.name);
            if !inner.credentials.contains_key(&key) {
                return Err(ClientError::not_found("credential", label));
            }
            inner.call(format!("update_credential:{label}"))?;
            inner.credentials.insert(key, credential);
            Ok(())
        })
    }

    fn remove_credential<'a>(
        &'a self,
        cloud: &'a str,
        name: &'a str,
        scope: CredentialScope,
    ) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            let key = (scope, cloud.to_string(), name.to_string());
            let label = label(scope, cloud, name);
            if !inner.credentials.contains_key(&key) {
                return Err(ClientError::not_found("credential", label));
            }
            inner.call(format!("remove_credential:{label}"))?;
            inner.credentials.remove(&key);
            Ok(())
        })
    }
}
