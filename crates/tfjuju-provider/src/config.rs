use serde::{Deserialize, Serialize};
use serde_json::Value;

use tfjuju_client::{ControllerConfig, Login};

use crate::error::ProviderError;
use crate::schema::{Attribute, Schema, Validator};

pub const ENV_CONTROLLER_ADDRESSES: &str = "JUJU_CONTROLLER_ADDRESSES";
pub const ENV_USERNAME: &str = "JUJU_USERNAME";
pub const ENV_PASSWORD: &str = "JUJU_PASSWORD";
pub const ENV_CA_CERT: &str = "JUJU_CA_CERT";
pub const ENV_CLIENT_ID: &str = "JUJU_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "JUJU_CLIENT_SECRET";

/// The provider block as written in configuration. Every field falls back
/// to its environment variable when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub controller_addresses: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub ca_certificate: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
}

pub fn provider_schema() -> Schema {
    let no_user_pass: &'static [&'static str] = &["username", "password"];
    let no_client_creds: &'static [&'static str] = &["client_id", "client_secret"];
    Schema::new("Manages models, applications and access on a Juju controller.")
        .attribute(
            Attribute::string("controller_addresses")
                .description(format!(
                    "Comma-separated host:port controller API addresses. Falls back to {ENV_CONTROLLER_ADDRESSES}."
                )),
        )
        .attribute(
            Attribute::string("username")
                .validator(Validator::ConflictsWith(no_client_creds))
                .description(format!("Controller user. Falls back to {ENV_USERNAME}.")),
        )
        .attribute(
            Attribute::string("password")
                .sensitive()
                .validator(Validator::ConflictsWith(no_client_creds))
                .description(format!("Password of the controller user. Falls back to {ENV_PASSWORD}.")),
        )
        .attribute(
            Attribute::string("ca_certificate")
                .description(format!("PEM CA certificate of the controller. Falls back to {ENV_CA_CERT}.")),
        )
        .attribute(
            Attribute::string("client_id")
                .validator(Validator::ConflictsWith(no_user_pass))
                .description(format!("JAAS service account client id. Falls back to {ENV_CLIENT_ID}.")),
        )
        .attribute(
            Attribute::string("client_secret")
                .sensitive()
                .validator(Validator::ConflictsWith(no_user_pass))
                .description(format!("JAAS service account secret. Falls back to {ENV_CLIENT_SECRET}.")),
        )
}

fn pick(value: Option<String>, env: &impl Fn(&str) -> Option<String>, var: &str) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .or_else(|| env(var).filter(|v| !v.trim().is_empty()))
}

fn is_set(value: &Option<String>) -> bool {
    value.as_ref().is_some_and(|v| !v.trim().is_empty())
}

impl ProviderConfig {
    pub fn from_value(config: &Value) -> Result<Self, ProviderError> {
        if config.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(config.clone())?)
    }

    /// Merge in environment fallbacks and validate. `env` looks a variable up.
    pub fn resolve(
        self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<ControllerConfig, ProviderError> {
        let addresses = pick(self.controller_addresses, &env, ENV_CONTROLLER_ADDRESSES);
        let ca_certificate = pick(self.ca_certificate, &env, ENV_CA_CERT);

        // The block picks the login method. The environment only completes
        // that method, unless the block names neither.
        let block_user_pass = is_set(&self.username) || is_set(&self.password);
        let block_client_creds = is_set(&self.client_id) || is_set(&self.client_secret);
        let (user_pass_env, client_creds_env) = match (block_user_pass, block_client_creds) {
            (false, false) => (true, true),
            (user_pass, client_creds) => (user_pass && !client_creds, client_creds && !user_pass),
        };
        let fill = |value: Option<String>, from_env: bool, var: &str| {
            if from_env {
                pick(value, &env, var)
            } else {
                value.filter(|v| !v.trim().is_empty())
            }
        };
        let username = fill(self.username, user_pass_env, ENV_USERNAME);
        let password = fill(self.password, user_pass_env, ENV_PASSWORD);
        let client_id = fill(self.client_id, client_creds_env, ENV_CLIENT_ID);
        let client_secret = fill(self.client_secret, client_creds_env, ENV_CLIENT_SECRET);

        let mut errors = Vec::new();

        let addresses: Vec<String> = addresses
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(String::from)
            .collect();
        if addresses.is_empty() {
            errors.push(format!(
                "controller_addresses: at least one address is required (or set {ENV_CONTROLLER_ADDRESSES})"
            ));
        }

        let login = match (username, password, client_id, client_secret) {
            (Some(username), Some(password), None, None) => Some(Login::UserPass { username, password }),
            (None, None, Some(client_id), Some(client_secret)) => Some(Login::ClientCredentials {
                client_id,
                client_secret,
            }),
            (None, None, None, None) => {
                errors.push(
                    "either username and password or client_id and client_secret must be set".into(),
                );
                None
            }
            (u, p, id, secret) => {
                let user_pass = u.is_some() || p.is_some();
                let client_creds = id.is_some() || secret.is_some();
                if user_pass && client_creds {
                    errors.push(
                        "username/password and client_id/client_secret cannot be used together".into(),
                    );
                } else if user_pass {
                    errors.push("username and password must be set together".into());
                } else {
                    errors.push("client_id and client_secret must be set together".into());
                }
                None
            }
        };

        let config = match login {
            Some(login) if errors.is_empty() => ControllerConfig {
                addresses,
                login,
                ca_certificate,
            },
            _ => return Err(ProviderError::Validation(errors)),
        };
        config
            .validate()
            .map_err(|e| ProviderError::validation(e.to_string()))?;
        Ok(config)
    }
}
