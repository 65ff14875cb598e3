//! tfjuju-core
//!
//! Pure domain types for the Juju provider: models, applications, offers,
//! access levels, JAAS relation tuples and import-ID conventions.
//! No client dependency. This is the shared vocabulary of the workspace.

pub mod error;
pub mod ids;
pub mod models;
