use std::fmt;

use crate::error::ClientError;

/// How the provider authenticates against the controller.
#[derive(Clone, PartialEq, Eq)]
pub enum Login {
    /// Local or external user with a password.
    UserPass { username: String, password: String },
    /// JAAS service account (OAuth client credentials).
    ClientCredentials {
        client_id: String,
        client_secret: String,
    },
}

impl Login {
    pub fn principal(&self) -> &str {
        match self {
            Self::UserPass { username, .. } => username,
            Self::ClientCredentials { client_id, .. } => client_id,
        }
    }
}

impl fmt::Debug for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserPass { username, .. } => f
                .debug_struct("UserPass")
                .field("username", username)
                .field("password", &"****")
                .finish(),
            Self::ClientCredentials { client_id, .. } => f
                .debug_struct("ClientCredentials")
                .field("client_id", client_id)
                .field("client_secret", &"****")
                .finish(),
        }
    }
}

/// Everything needed to open a controller connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    pub addresses: Vec<String>,
    pub login: Login,
    pub ca_certificate: Option<String>,
}

impl ControllerConfig {
    /// Check that every address is `host:port` with a numeric port.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.addresses.is_empty() {
            return Err(ClientError::InvalidConfig(
                "at least one controller address is required".into(),
            ));
        }
        for addr in &self.addresses {
            let Some((host, port)) = addr.rsplit_once(':') else {
                return Err(ClientError::InvalidConfig(format!(
                    "controller address {addr:?} must be host:port"
                )));
            };
            if host.is_empty() || port.parse::<u16>().is_err() {
                return Err(ClientError::InvalidConfig(format!(
                    "controller address {addr:?} must be host:port"
                )));
            }
        }
        if let Some(ca) = &self.ca_certificate {
            if !ca.contains("BEGIN CERTIFICATE") {
                return Err(ClientError::InvalidConfig(
                    "ca_certificate is not a PEM certificate".into(),
                ));
            }
        }
        Ok(())
    }
}
