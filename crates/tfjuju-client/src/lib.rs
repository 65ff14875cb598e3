//! tfjuju-client
//!
//! The controller API boundary. One trait per sub-client (models,
//! applications, offers, ...) collected into a [`JujuClient`] handle, plus an
//! in-memory controller for tests and dry runs.

pub mod applications;
pub mod client;
pub mod clouds;
pub mod config;
pub mod credentials;
pub mod error;
pub mod integrations;
pub mod jaas;
pub mod machines;
pub mod memory;
pub mod models;
pub mod offers;
pub mod ssh_keys;
pub mod users;

pub use crate::client::{BoxFuture, Connector, JujuClient};
pub use crate::config::{ControllerConfig, Login};
pub use crate::error::ClientError;
pub use crate::memory::MemoryController;
