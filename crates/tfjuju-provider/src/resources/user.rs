use serde::{Deserialize, Serialize};
use serde_json::Value;

use tfjuju_client::JujuClient;
use tfjuju_core::models::user::{CreateUserInput, UserInfo};

use super::{deleted_or_gone, read_or_gone};
use crate::error::{ProviderError, create_failed, read_failed, update_failed};
use crate::resource::{BoxFuture, Resource, UpdateRequest, decode, encode};
use crate::schema::{Attribute, Schema, Validator};

const TYPE_NAME: &str = "juju_user";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct UserState {
    id: Option<String>,
    name: String,
    display_name: Option<String>,
    /// Never read back from the controller.
    password: Option<String>,
}

impl UserState {
    fn from_info(info: &UserInfo, password: Option<String>) -> Self {
        Self {
            id: Some(info.name.clone()),
            name: info.name.clone(),
            display_name: info.display_name.clone(),
            password,
        }
    }
}

pub struct UserResource {
    client: JujuClient,
}

impl UserResource {
    pub fn new(client: JujuClient) -> Self {
        Self { client }
    }
}

impl Resource for UserResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("A local controller user.")
            .with_id()
            .attribute(
                Attribute::string("name")
                    .required()
                    .requires_replace()
                    .validator(Validator::NotEmpty),
            )
            .attribute(Attribute::string("display_name").requires_replace())
            .attribute(
                Attribute::string("password")
                    .required()
                    .sensitive()
                    .validator(Validator::NotEmpty),
            )
    }

    fn create(&self, plan: Value) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let plan: UserState = decode(plan)?;
            tracing::info!(user = %plan.name, "creating user");
            let info = self
                .client
                .users
                .create_user(CreateUserInput {
                    name: plan.name.clone(),
                    display_name: plan.display_name.clone(),
                    password: plan.password.clone().unwrap_or_default(),
                })
                .await
                .map_err(|e| create_failed(e).with_resource(TYPE_NAME, &plan.name))?;
            encode(&UserState::from_info(&info, plan.password))
        })
    }

    fn read(&self, state: Value) -> BoxFuture<'_, Result<Option<Value>, ProviderError>> {
        Box::pin(async move {
            let state: UserState = decode(state)?;
            tracing::debug!(user = %state.name, "reading user");
            let info = read_or_gone(self.client.users.read_user(&state.name).await, TYPE_NAME, &state.name)?;
            info.map(|info| encode(&UserState::from_info(&info, state.password.clone())))
                .transpose()
        })
    }

    fn update(&self, request: UpdateRequest) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let plan: UserState = decode(request.plan)?;
            let state: UserState = decode(request.state)?;
            if let Some(password) = plan.password.as_deref().filter(|p| state.password.as_deref() != Some(*p)) {
                tracing::info!(user = %state.name, "setting user password");
                self.client
                    .users
                    .set_password(&state.name, password)
                    .await
                    .map_err(|e| update_failed(e).with_resource(TYPE_NAME, &state.name))?;
            }
            encode(&UserState {
                password: plan.password,
                ..state
            })
        })
    }

    fn delete(&self, state: Value) -> BoxFuture<'_, Result<(), ProviderError>> {
        Box::pin(async move {
            let state: UserState = decode(state)?;
            tracing::info!(user = %state.name, "removing user");
            deleted_or_gone(self.client.users.remove_user(&state.name).await, TYPE_NAME, &state.name)
        })
    }

    fn import<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Value, ProviderError>> {
        Box::pin(async move {
            if id.trim().is_empty() || id.contains(':') {
                return Err(ProviderError::import_id(id, "expected a user name"));
            }
            tracing::info!(user = %id, "importing user");
            let info = self
                .client
                .users
                .read_user(id)
                .await
                .map_err(|e| read_failed(e).with_resource(TYPE_NAME, id))?;
            encode(&UserState::from_info(&info, None))
        })
    }
}
