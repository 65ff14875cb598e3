use tfjuju_core::models::credential::{CloudCredential, CredentialScope};

use crate::client::BoxFuture;
use crate::error::ClientError;

pub trait CredentialsApi: Send + Sync {
    fn add_credential(
        &self,
        credential: CloudCredential,
        scope: CredentialScope,
    ) -> BoxFuture<'_, Result<(), ClientError>>;

    fn read_credential<'a>(
        &'a self,
        cloud: &'a str,
        name: &'a str,
        scope: CredentialScope,
    ) -> BoxFuture<'a, Result<CloudCredential, ClientError>>;

    fn update_credential(
        &self,
        credential: CloudCredential,
        scope: CredentialScope,
    ) -> BoxFuture<'_, Result<(), ClientError>>;

    fn remove_credential<'a>(
        &'a self,
        cloud: &'a str,
        name: &'a str,
        scope: CredentialScope,
    ) -> BoxFuture<'a, Result<(), ClientError>>;
}
