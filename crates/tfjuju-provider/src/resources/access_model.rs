use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tfjuju_client::JujuClient;
use tfjuju_core::ids;
use tfjuju_core::models::access::ModelAccess;

use super::read_or_gone;
use crate::error::{ProviderError, read_failed};
use crate::reconcile::{Reconciliation, converge};
use crate::resource::{BoxFuture, Resource, UpdateRequest, decode, encode};
use crate::schema::{Attribute, Schema, Validator};

const TYPE_NAME: &str = "juju_access_model";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct AccessModelState {
    id: Option<String>,
    model: String,
    access: String,
    users: BTreeSet<String>,
}

impl AccessModelState {
    fn level(&self) -> Result<ModelAccess, ProviderError> {
        Ok(self.access.parse()?)
    }

    fn with_id(mut self) -> Self {
        self.id = Some(ids::access_model(
            &self.model,
            &self.access,
            self.users.iter().map(String::as_str),
        ));
        self
    }
}

pub struct AccessModelResource {
    client: JujuClient,
}

impl AccessModelResource {
    pub fn new(client: JujuClient) -> Self {
        Self { client }
    }

    /// Revoking `read` removes the user from the model entirely.
    async fn apply(
        &self,
        model: &str,
        level: ModelAccess,
        changes: &Reconciliation<String>,
    ) -> Result<(), ProviderError> {
        let models = &self.client.models;
        converge(
            changes,
            move |user: String| async move { models.revoke_model(model, &user, ModelAccess::Read).await },
            move |user: String| async move { models.grant_model(model, &user, level).await },
        )
        .await
        .map_err(|e| ProviderError::from(e).with_resource(TYPE_NAME, model))?;
        Ok(())
    }

    /// Managed users still holding exactly `level`, or None when the model is gone.
    async fn current(
        &self,
        model: &str,
        level: ModelAccess,
        managed: &BTreeSet<String>,
        id: &str,
    ) -> Result<Option<BTreeSet<String>>, ProviderError> {
        let info = read_or_gone(self.client.models.read_model(model).await, TYPE_NAME, id)?;
        Ok(info.map(|info| {
            info.users
                .into_iter()
                .filter(|u| u.access == level && managed.contains(&u.user))
                .map(|u| u.user)
                .collect()
        }))
    }
}

impl Resource for AccessModelResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("Grants a level of model access to a set of users.")
            .with_id()
            .attribute(Attribute::string("model").required().requires_replace())
            .attribute(
                Attribute::string("access")
                    .required()
                    .requires_replace()
                    .validator(Validator::OneOf(ModelAccess::NAMES)),
            )
            .attribute(
                Attribute::string_set("users")
                    .required()
                    .validator(Validator::SetSize {
                        min: 1,
                        max: None,
                    }),
            )
    }

    fn create(&self, plan: Value) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let plan: AccessModelState = decode(plan)?;
            let level = plan.level()?;
            tracing::info!(model = %plan.model, access = %level, users = plan.users.len(), "granting model access");
            let changes = Reconciliation::between(&BTreeSet::new(), &plan.users);
            self.apply(&plan.model, level, &changes).await?;
            encode(&plan.with_id())
        })
    }

    fn read(&self, state: Value) -> BoxFuture<'_, Result<Option<Value>, ProviderError>> {
        Box::pin(async move {
            let state: AccessModelState = decode(state)?;
            let level = state.level()?;
            let id = state.clone().with_id().id.unwrap_or_default();
            tracing::debug!(access = %id, "reading model access");
            let Some(users) = self.current(&state.model, level, &state.users, &id).await? else {
                return Ok(None);
            };
            if users.is_empty() {
                tracing::warn!(access = %id, "no managed users hold this access any more");
                return Ok(None);
            }
            encode(&AccessModelState { users, ..state }.with_id()).map(Some)
        })
    }

    fn update(&self, request: UpdateRequest) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let plan: AccessModelState = decode(request.plan)?;
            let state: AccessModelState = decode(request.state)?;
            let level = plan.level()?;
            let changes = Reconciliation::between(&state.users, &plan.users);
            if !changes.is_empty() {
                tracing::info!(
                    model = %plan.model,
                    access = %level,
                    grant = changes.to_grant.len(),
                    revoke = changes.to_revoke.len(),
                    "reconciling model access"
                );
                self.apply(&plan.model, level, &changes).await?;
            }
            encode(&plan.with_id())
        })
    }

    fn delete(&self, state: Value) -> BoxFuture<'_, Result<(), ProviderError>> {
        Box::pin(async move {
            let state: AccessModelState = decode(state)?;
            let level = state.level()?;
            tracing::info!(model = %state.model, users = state.users.len(), "revoking model access");
            if read_or_gone(self.client.models.read_model(&state.model).await, TYPE_NAME, &state.model)?
                .is_none()
            {
                return Ok(());
            }
            let changes = Reconciliation::between(&state.users, &BTreeSet::new());
            self.apply(&state.model, level, &changes).await
        })
    }

    fn import<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Value, ProviderError>> {
        Box::pin(async move {
            let (model, access, users) =
                ids::parse_access_model(id).map_err(|e| ProviderError::import_id(id, e.to_string()))?;
            let level: ModelAccess = access
                .parse()
                .map_err(|e: tfjuju_core::error::CoreError| ProviderError::import_id(id, e.to_string()))?;
            tracing::info!(access = %id, "importing model access");
            let managed: BTreeSet<String> = users.into_iter().collect();
            let users = self
                .current(&model, level, &managed, id)
                .await?
                .ok_or_else(|| {
                    read_failed(tfjuju_client::ClientError::not_found("model", &model))
                        .with_resource(TYPE_NAME, id)
                })?;
            encode(
                &AccessModelState {
                    id: None,
                    model,
                    access: level.to_string(),
                    users,
                }
                .with_id(),
            )
        })
    }
}
