use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::applications::ApplicationsApi;
use crate::clouds::CloudsApi;
use crate::config::ControllerConfig;
use crate::credentials::CredentialsApi;
use crate::error::ClientError;
use crate::integrations::IntegrationsApi;
use crate::jaas::JaasApi;
use crate::machines::MachinesApi;
use crate::models::ModelsApi;
use crate::offers::OffersApi;
use crate::ssh_keys::SshKeysApi;
use crate::users::UsersApi;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Handle to a connected controller, split into sub-clients.
///
/// `jaas` is only present when the controller is a JAAS (JIMM) controller.
#[derive(Clone)]
pub struct JujuClient {
    pub models: Arc<dyn ModelsApi>,
    pub applications: Arc<dyn ApplicationsApi>,
    pub machines: Arc<dyn MachinesApi>,
    pub offers: Arc<dyn OffersApi>,
    pub integrations: Arc<dyn IntegrationsApi>,
    pub credentials: Arc<dyn CredentialsApi>,
    pub users: Arc<dyn UsersApi>,
    pub ssh_keys: Arc<dyn SshKeysApi>,
    pub clouds: Arc<dyn CloudsApi>,
    pub jaas: Option<Arc<dyn JaasApi>>,
}

impl JujuClient {
    pub fn is_jaas(&self) -> bool {
        self.jaas.is_some()
    }
}

/// Opens a [`JujuClient`] for a controller configuration.
pub trait Connector: Send + Sync {
    fn connect(&self, config: ControllerConfig) -> BoxFuture<'_, Result<JujuClient, ClientError>>;
}
