//! Log subscriber setup for the host binary.
//!
//! The provider itself only emits `tracing` events. A host that wants them on
//! stderr calls [`init_logging`] once at startup.

use tracing_subscriber::EnvFilter;

use crate::error::ProviderError;

/// Checked before `RUST_LOG`.
pub const LOG_ENV: &str = "TF_LOG_PROVIDER_JUJU";

const DEFAULT_FILTER: &str = "info";

/// Filter from `TF_LOG_PROVIDER_JUJU`, then `RUST_LOG`, then `info`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a stderr subscriber. Fails if one is already installed.
pub fn try_init_logging(json: bool) -> Result<(), ProviderError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| ProviderError::Logging(e.to_string()))
}

/// Like [`try_init_logging`] but ignores an already-installed subscriber.
pub fn init_logging(json: bool) {
    if let Err(e) = try_init_logging(json) {
        tracing::debug!(error = %e, "log subscriber already installed");
    }
}
