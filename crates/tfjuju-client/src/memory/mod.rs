//! In-memory controller.
//!
//! Implements every sub-client trait against plain maps so the provider's
//! lifecycle can be exercised without a live controller. Mutating calls are
//! recorded in order and can be made to fail on demand.

mod applications;
mod clouds;
mod credentials;
mod integrations;
mod jaas;
mod machines;
mod models;
mod offers;
mod ssh_keys;
mod users;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use tfjuju_core::models::application::ApplicationInfo;
use tfjuju_core::models::cloud::KubernetesCloudInfo;
use tfjuju_core::models::credential::{CloudCredential, CredentialScope};
use tfjuju_core::models::integration::IntegrationInfo;
use tfjuju_core::models::jaas::{JaasGroup, RelationTuple};
use tfjuju_core::models::machine::MachineInfo;
use tfjuju_core::models::model::ModelInfo;
use tfjuju_core::models::offer::{OfferInfo, OfferUrl};
use tfjuju_core::models::user::UserInfo;

use crate::client::{BoxFuture, Connector, JujuClient};
use crate::config::{ControllerConfig, Login};
use crate::error::ClientError;
use crate::jaas::JaasApi;

const DEFAULT_OWNER: &str = "admin";

#[derive(Default)]
pub(crate) struct Inner {
    /// Keyed by model name.
    pub(crate) models: BTreeMap<String, ModelInfo>,
    /// Keyed by (model, application).
    pub(crate) applications: BTreeMap<(String, String), ApplicationInfo>,
    /// Keyed by (model, machine id).
    pub(crate) machines: BTreeMap<(String, String), MachineInfo>,
    pub(crate) machine_seq: BTreeMap<String, u32>,
    /// Keyed by canonical `owner/model.name` URL.
    pub(crate) offers: BTreeMap<String, OfferInfo>,
    pub(crate) integrations: Vec<IntegrationInfo>,
    pub(crate) credentials: BTreeMap<(CredentialScope, String, String), CloudCredential>,
    /// User info plus password.
    pub(crate) users: BTreeMap<String, (UserInfo, String)>,
    pub(crate) ssh_keys: BTreeMap<String, Vec<String>>,
    pub(crate) clouds: BTreeMap<String, KubernetesCloudInfo>,
    pub(crate) tuples: BTreeSet<RelationTuple>,
    /// Keyed by group uuid.
    pub(crate) groups: BTreeMap<String, JaasGroup>,
    failures: BTreeSet<String>,
    calls: Vec<String>,
}

impl Inner {
    /// Record a mutating call, or fail it when a failure was injected for
    /// `op` or any colon-delimited prefix of it.
    pub(crate) fn call(&mut self, op: String) -> Result<(), ClientError> {
        let injected = self
            .failures
            .iter()
            .any(|f| op == *f || op.starts_with(&format!("{f}:")));
        if injected {
            tracing::debug!(op = %op, "injected failure");
            return Err(ClientError::Api(format!("injected failure: {op}")));
        }
        self.calls.push(op);
        Ok(())
    }

    pub(crate) fn require_model(&self, name: &str) -> Result<&ModelInfo, ClientError> {
        self.models
            .get(name)
            .ok_or_else(|| ClientError::not_found("model", name))
    }
}

/// Shared, cheaply cloneable in-memory controller.
#[derive(Clone)]
pub struct MemoryController {
    inner: Arc<Mutex<Inner>>,
    owner: String,
    jaas: bool,
}

impl Default for MemoryController {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryController {
    /// A plain Juju controller without the JAAS API.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            owner: DEFAULT_OWNER.to_string(),
            jaas: false,
        }
    }

    /// A JAAS controller: same API plus relation tuples and groups.
    pub fn jaas() -> Self {
        Self {
            jaas: true,
            ..Self::new()
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Build a client whose sub-clients all share this controller's state.
    pub fn client(&self) -> JujuClient {
        let this = Arc::new(self.clone());
        JujuClient {
            models: this.clone(),
            applications: this.clone(),
            machines: this.clone(),
            offers: this.clone(),
            integrations: this.clone(),
            credentials: this.clone(),
            users: this.clone(),
            ssh_keys: this.clone(),
            clouds: this.clone(),
            jaas: self.jaas.then(|| this as Arc<dyn JaasApi>),
        }
    }

    /// Make every future call matching `op` fail, e.g. `"grant_model:dev:bob"`.
    pub async fn fail_on(&self, op: impl Into<String>) {
        self.inner.lock().await.failures.insert(op.into());
    }

    pub async fn clear_failures(&self) {
        self.inner.lock().await.failures.clear();
    }

    /// Mutating calls made so far, in order.
    pub async fn calls(&self) -> Vec<String> {
        self.inner.lock().await.calls.clone()
    }

    pub async fn clear_calls(&self) {
        self.inner.lock().await.calls.clear();
    }

    /// All relation tuples currently stored.
    pub async fn tuples(&self) -> Vec<RelationTuple> {
        self.inner.lock().await.tuples.iter().cloned().collect()
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().await
    }

    /// Canonical key for an offer URL: source dropped, owner defaulted.
    pub(crate) fn offer_key(&self, url: &str) -> Result<String, ClientError> {
        let mut parsed: OfferUrl = url.parse()?;
        parsed.source = None;
        if parsed.owner.is_none() {
            parsed.owner = Some(self.owner.clone());
        }
        Ok(parsed.to_string())
    }
}

impl Connector for MemoryController {
    fn connect(&self, config: ControllerConfig) -> BoxFuture<'_, Result<JujuClient, ClientError>> {
        Box::pin(async move {
            config.validate()?;
            if matches!(config.login, Login::ClientCredentials { .. }) && !self.jaas {
                return Err(ClientError::PermissionDenied(
                    "client credentials are only accepted by JAAS controllers".into(),
                ));
            }
            tracing::debug!(
                addresses = ?config.addresses,
                principal = %config.login.principal(),
                "connected to in-memory controller"
            );
            Ok(self.client())
        })
    }
}
