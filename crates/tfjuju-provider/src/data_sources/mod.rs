//! Read-only lookups. Each returns its configuration with the computed
//! attributes filled in from the controller.

mod application;
mod jaas_group;
mod machine;
mod model;
mod offer;

use tfjuju_client::JujuClient;

pub use self::application::ApplicationDataSource;
pub use self::jaas_group::JaasGroupDataSource;
pub use self::machine::MachineDataSource;
pub use self::model::ModelDataSource;
pub use self::offer::OfferDataSource;

use crate::data_source::DataSource;

pub fn all(client: &JujuClient) -> Vec<Box<dyn DataSource>> {
    vec![
        Box::new(ModelDataSource::new(client.clone())),
        Box::new(ApplicationDataSource::new(client.clone())),
        Box::new(OfferDataSource::new(client.clone())),
        Box::new(MachineDataSource::new(client.clone())),
        Box::new(JaasGroupDataSource::new(client)),
    ]
}

/// Blank lookup keys count as unset.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Exactly one of two lookup keys must be set.
pub(crate) fn exactly_one(a: (&str, Option<&String>), b: (&str, Option<&String>)) -> Vec<String> {
    let set = |v: Option<&String>| non_blank(v.cloned()).is_some();
    match (set(a.1), set(b.1)) {
        (true, false) | (false, true) => Vec::new(),
        _ => vec![format!("exactly one of {} or {} must be set", a.0, b.0)],
    }
}
