//! tfjuju-provider
//!
//! Declarative resource lifecycle for a Juju controller. Each resource type
//! maps its plan/state document onto controller calls through the
//! [`Resource`] trait; a transport host drives the lifecycle.
//!
//! Public API:
//! - `JujuProvider::configure()` resolves the provider block and connects
//! - `JujuProvider::resource()` / `data_source()` look handlers up by type name
//! - `reconcile` computes and applies grant/revoke diffs for the access resources
//! - `logging::init_logging()` installs a stderr subscriber for the host binary

pub mod config;
pub mod data_source;
pub mod data_sources;
pub mod error;
pub mod logging;
pub mod provider;
pub mod reconcile;
pub mod resource;
pub mod resources;
pub mod schema;

pub use crate::config::ProviderConfig;
pub use crate::data_source::DataSource;
pub use crate::error::ProviderError;
pub use crate::provider::{JujuProvider, ProviderData};
pub use crate::reconcile::{ConvergeError, Reconciliation, Side};
pub use crate::resource::{Resource, UpdateRequest};
pub use crate::schema::Schema;
