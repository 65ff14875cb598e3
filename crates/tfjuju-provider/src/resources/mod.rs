//! One handler per managed resource type.
//!
//! Every handler holds the configured [`JujuClient`] and maps between its
//! plan/state document and controller calls.

mod access_model;
mod access_offer;
mod application;
mod credential;
mod integration;
mod jaas_access;
mod jaas_group;
mod kubernetes_cloud;
mod machine;
mod model;
mod offer;
mod ssh_key;
mod user;

use std::collections::BTreeMap;

use tfjuju_client::{ClientError, JujuClient};

pub use self::access_model::AccessModelResource;
pub use self::access_offer::AccessOfferResource;
pub use self::application::ApplicationResource;
pub use self::credential::CredentialResource;
pub use self::integration::IntegrationResource;
pub use self::jaas_access::{JaasAccessResource, JaasTargetKind};
pub use self::jaas_group::JaasGroupResource;
pub use self::kubernetes_cloud::KubernetesCloudResource;
pub use self::machine::MachineResource;
pub use self::model::ModelResource;
pub use self::offer::OfferResource;
pub use self::ssh_key::SshKeyResource;
pub use self::user::UserResource;

use crate::error::{ProviderError, delete_failed, read_failed};
use crate::resource::Resource;

/// Every resource type, in registration order.
pub fn all(client: &JujuClient) -> Vec<Box<dyn Resource>> {
    let mut resources: Vec<Box<dyn Resource>> = vec![
        Box::new(ModelResource::new(client.clone())),
        Box::new(ApplicationResource::new(client.clone())),
        Box::new(MachineResource::new(client.clone())),
        Box::new(OfferResource::new(client.clone())),
        Box::new(IntegrationResource::new(client.clone())),
        Box::new(CredentialResource::new(client.clone())),
        Box::new(SshKeyResource::new(client.clone())),
        Box::new(UserResource::new(client.clone())),
        Box::new(KubernetesCloudResource::new(client.clone())),
        Box::new(AccessModelResource::new(client.clone())),
        Box::new(AccessOfferResource::new(client.clone())),
    ];
    for kind in JaasTargetKind::ALL {
        resources.push(Box::new(JaasAccessResource::new(*kind, client)));
    }
    resources.push(Box::new(JaasGroupResource::new(client)));
    resources
}

/// Map a read result onto "still there" or "gone".
pub(crate) fn read_or_gone<T>(
    result: Result<T, ClientError>,
    type_name: &str,
    id: &str,
) -> Result<Option<T>, ProviderError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => {
            tracing::warn!(resource = type_name, id = %id, "resource no longer exists, removing from state");
            Ok(None)
        }
        Err(e) => Err(read_failed(e).with_resource(type_name, id)),
    }
}

/// A delete that finds nothing to remove still succeeds.
pub(crate) fn deleted_or_gone(
    result: Result<(), ClientError>,
    type_name: &str,
    id: &str,
) -> Result<(), ProviderError> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.is_not_found() => {
            tracing::warn!(resource = type_name, id = %id, "resource already deleted");
            Ok(())
        }
        Err(e) => Err(delete_failed(e).with_resource(type_name, id)),
    }
}

/// Keys to set and keys to unset when a map attribute goes from `old` to `new`.
pub(crate) fn map_changes(
    old: Option<&BTreeMap<String, String>>,
    new: Option<&BTreeMap<String, String>>,
) -> (BTreeMap<String, String>, Vec<String>) {
    let empty = BTreeMap::new();
    let old = old.unwrap_or(&empty);
    let new = new.unwrap_or(&empty);
    let set = new
        .iter()
        .filter(|(k, v)| old.get(*k) != Some(*v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let unset = old
        .keys()
        .filter(|k| !new.contains_key(*k))
        .cloned()
        .collect();
    (set, unset)
}

/// Remote entries limited to the keys configuration manages. The controller
/// reports defaults for keys nobody set; those stay out of state.
pub(crate) fn managed_entries(
    remote: &BTreeMap<String, String>,
    managed: Option<&BTreeMap<String, String>>,
) -> Option<BTreeMap<String, String>> {
    let managed = managed?;
    Some(
        remote
            .iter()
            .filter(|(k, _)| managed.contains_key(*k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    )
}

/// An optional string attribute refreshed from a remote value where the
/// remote reports "" for unset.
pub(crate) fn refreshed_text(prior: Option<&String>, remote: &str) -> Option<String> {
    (prior.is_some() || !remote.is_empty()).then(|| remote.to_string())
}
