//! Generic JAAS access: one handler parameterised by the kind of target it
//! grants a relation on. Permissions are relation tuples
//! `(principal, access, target)` reconciled in one batch per side.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tfjuju_client::JujuClient;
use tfjuju_client::jaas::JaasApi;
use tfjuju_core::ids;
use tfjuju_core::models::jaas::{JaasTarget, Principal, RelationFilter, RelationTuple};
use tfjuju_core::models::offer::OfferUrl;

use crate::error::{ProviderError, read_failed};
use crate::reconcile::{Reconciliation, converge_batch};
use crate::resource::{BoxFuture, Resource, UpdateRequest, decode, encode, validate_with};
use crate::schema::{Attribute, Schema, Validator};

const SERVICE_ACCOUNT_DOMAIN: &str = "@serviceaccount";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JaasTargetKind {
    Controller,
    Cloud,
    Model,
    Offer,
    Group,
}

impl JaasTargetKind {
    pub const ALL: &'static [Self] = &[
        Self::Controller,
        Self::Cloud,
        Self::Model,
        Self::Offer,
        Self::Group,
    ];

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Controller => "juju_jaas_access_controller",
            Self::Cloud => "juju_jaas_access_cloud",
            Self::Model => "juju_jaas_access_model",
            Self::Offer => "juju_jaas_access_offer",
            Self::Group => "juju_jaas_access_group",
        }
    }

    /// Attribute naming the target. The controller has none.
    pub fn target_attribute(&self) -> Option<&'static str> {
        match self {
            Self::Controller => None,
            Self::Cloud => Some("cloud_name"),
            Self::Model => Some("model_uuid"),
            Self::Offer => Some("offer_url"),
            Self::Group => Some("group_id"),
        }
    }

    /// Relations that may be granted on this kind of target.
    pub fn relations(&self) -> &'static [&'static str] {
        match self {
            Self::Controller => &["administrator"],
            Self::Cloud => &["administrator", "can_addmodel"],
            Self::Model => &["administrator", "writer", "reader"],
            Self::Offer => &["administrator", "consumer", "reader"],
            Self::Group => &["member"],
        }
    }

    fn target(&self, value: &str) -> JaasTarget {
        match self {
            Self::Controller => JaasTarget::Controller,
            Self::Cloud => JaasTarget::Cloud(value.to_string()),
            Self::Model => JaasTarget::Model(value.to_string()),
            Self::Offer => JaasTarget::Offer(value.to_string()),
            Self::Group => JaasTarget::Group(value.to_string()),
        }
    }

    fn check_target(&self, value: &str) -> Result<(), String> {
        let name = self.target_attribute().unwrap_or("target");
        match self {
            Self::Controller => Ok(()),
            Self::Cloud if value.trim().is_empty() => Err(format!("{name}: must not be empty")),
            Self::Cloud => Ok(()),
            Self::Model | Self::Group => ids::require_uuid(value)
                .map(|_| ())
                .map_err(|e| format!("{name}: {e}")),
            Self::Offer => value
                .parse::<OfferUrl>()
                .map(|_| ())
                .map_err(|e| format!("{name}: {e}")),
        }
    }
}

fn valid_user(name: &str) -> bool {
    !name.is_empty()
        && !name.ends_with(SERVICE_ACCOUNT_DOMAIN)
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+' | '@' | '_'))
}

fn valid_service_account(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct JaasAccessState {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cloud_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    model_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    offer_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group_id: Option<String>,
    access: String,
    #[serde(default)]
    users: Option<BTreeSet<String>>,
    #[serde(default)]
    groups: Option<BTreeSet<String>>,
    #[serde(default)]
    service_accounts: Option<BTreeSet<String>>,
    #[serde(default)]
    roles: Option<BTreeSet<String>>,
}

impl JaasAccessState {
    fn target_value(&self, kind: JaasTargetKind) -> &str {
        let value = match kind {
            JaasTargetKind::Controller => None,
            JaasTargetKind::Cloud => self.cloud_name.as_deref(),
            JaasTargetKind::Model => self.model_uuid.as_deref(),
            JaasTargetKind::Offer => self.offer_url.as_deref(),
            JaasTargetKind::Group => self.group_id.as_deref(),
        };
        value.unwrap_or_default()
    }

    fn set_target_value(&mut self, kind: JaasTargetKind, value: String) {
        match kind {
            JaasTargetKind::Controller => {}
            JaasTargetKind::Cloud => self.cloud_name = Some(value),
            JaasTargetKind::Model => self.model_uuid = Some(value),
            JaasTargetKind::Offer => self.offer_url = Some(value),
            JaasTargetKind::Group => self.group_id = Some(value),
        }
    }

    fn target(&self, kind: JaasTargetKind) -> JaasTarget {
        kind.target(self.target_value(kind))
    }

    /// ID target: the controller tag, or the raw attribute value.
    fn id(&self, kind: JaasTargetKind) -> String {
        let target = match kind {
            JaasTargetKind::Controller => JaasTarget::Controller.tag(),
            _ => self.target_value(kind).to_string(),
        };
        ids::jaas_access(&target, &self.access)
    }

    fn principals(&self) -> BTreeSet<Principal> {
        let each = |set: &Option<BTreeSet<String>>, make: fn(String) -> Principal| {
            set.iter().flatten().cloned().map(make).collect::<Vec<_>>()
        };
        each(&self.users, Principal::User)
            .into_iter()
            .chain(each(&self.groups, Principal::Group))
            .chain(each(&self.service_accounts, Principal::ServiceAccount))
            .chain(each(&self.roles, Principal::Role))
            .collect()
    }

    /// Replace the principal sets with `remote`. Unset sets that stay empty
    /// remain unset.
    fn refreshed(mut self, kind: JaasTargetKind, remote: &BTreeSet<Principal>) -> Self {
        let mut users = BTreeSet::new();
        let mut groups = BTreeSet::new();
        let mut service_accounts = BTreeSet::new();
        let mut roles = BTreeSet::new();
        for principal in remote {
            match principal {
                Principal::User(name) => users.insert(name.clone()),
                Principal::Group(uuid) => groups.insert(uuid.clone()),
                Principal::ServiceAccount(id) => service_accounts.insert(id.clone()),
                Principal::Role(uuid) => roles.insert(uuid.clone()),
            };
        }
        let keep = |prior: &Option<BTreeSet<String>>, found: BTreeSet<String>| {
            (prior.is_some() || !found.is_empty()).then_some(found)
        };
        self.users = keep(&self.users, users);
        self.groups = keep(&self.groups, groups);
        self.service_accounts = keep(&self.service_accounts, service_accounts);
        self.roles = keep(&self.roles, roles);
        self.id = Some(self.id(kind));
        self
    }
}

fn check_principals(kind: JaasTargetKind, state: &JaasAccessState) -> Vec<String> {
    let mut errors = Vec::new();
    if let Err(e) = kind.check_target(state.target_value(kind)) {
        errors.push(e);
    }
    if !kind.relations().contains(&state.access.as_str()) {
        errors.push(format!(
            "access: {:?} is not one of {}",
            state.access,
            kind.relations().join(", ")
        ));
    }
    for user in state.users.iter().flatten() {
        if !valid_user(user) {
            errors.push(format!("users: {user:?} is not a valid user name"));
        }
    }
    for id in state.service_accounts.iter().flatten() {
        if !valid_service_account(id) {
            errors.push(format!("service_accounts: {id:?} is not a valid service account id"));
        }
    }
    for (attr, set) in [("groups", &state.groups), ("roles", &state.roles)] {
        for id in set.iter().flatten() {
            if let Err(e) = ids::require_uuid(id) {
                errors.push(format!("{attr}: {id:?} must be a UUID: {e}"));
            }
        }
    }
    errors
}

pub struct JaasAccessResource {
    kind: JaasTargetKind,
    jaas: Option<Arc<dyn JaasApi>>,
}

impl JaasAccessResource {
    pub fn new(kind: JaasTargetKind, client: &JujuClient) -> Self {
        Self {
            kind,
            jaas: client.jaas.clone(),
        }
    }

    fn jaas(&self) -> Result<&Arc<dyn JaasApi>, ProviderError> {
        self.jaas
            .as_ref()
            .ok_or_else(|| ProviderError::JaasRequired(self.kind.type_name().to_string()))
    }

    fn check(&self, state: &JaasAccessState) -> Result<(), ProviderError> {
        let errors = check_principals(self.kind, state);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProviderError::Validation(errors))
        }
    }

    async fn apply(
        &self,
        state: &JaasAccessState,
        changes: &Reconciliation<Principal>,
    ) -> Result<(), ProviderError> {
        let jaas = self.jaas()?;
        let target = state.target(self.kind);
        let access = state.access.as_str();
        let tuple = |p: &Principal| RelationTuple::new(p, access, &target);
        converge_batch(
            changes,
            |members: Vec<Principal>| jaas.delete_relations(members.iter().map(&tuple).collect()),
            |members: Vec<Principal>| jaas.add_relations(members.iter().map(&tuple).collect()),
        )
        .await
        .map_err(|e| ProviderError::from(e).with_resource(self.kind.type_name(), &target.tag()))?;
        Ok(())
    }

    async fn remote(&self, state: &JaasAccessState) -> Result<BTreeSet<Principal>, ProviderError> {
        let jaas = self.jaas()?;
        let filter = RelationFilter {
            object: None,
            relation: Some(state.access.clone()),
            target: Some(state.target(self.kind).tag()),
        };
        let id = state.id(self.kind);
        let tuples = jaas
            .read_relations(filter)
            .await
            .map_err(|e| read_failed(e).with_resource(self.kind.type_name(), &id))?;
        let mut principals = BTreeSet::new();
        for tuple in tuples {
            match Principal::from_tag(&tuple.object) {
                Ok(principal) => {
                    principals.insert(principal);
                }
                Err(e) => {
                    tracing::warn!(access = %id, object = %tuple.object, error = %e, "skipping unrecognised relation object");
                }
            }
        }
        Ok(principals)
    }
}

impl Resource for JaasAccessResource {
    fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    fn schema(&self) -> Schema {
        let mut schema = Schema::new("Grants a JAAS relation on a target to users, groups, service accounts and roles.")
            .with_id();
        if let Some(target) = self.kind.target_attribute() {
            schema = schema.attribute(
                Attribute::string(target)
                    .required()
                    .requires_replace()
                    .validator(Validator::NotEmpty),
            );
        }
        schema
            .attribute(
                Attribute::string("access")
                    .required()
                    .requires_replace()
                    .validator(Validator::OneOf(self.kind.relations())),
            )
            .attribute(Attribute::string_set("users"))
            .attribute(Attribute::string_set("groups").description("Group UUIDs."))
            .attribute(Attribute::string_set("service_accounts").description("Service account client ids."))
            .attribute(Attribute::string_set("roles").description("Role UUIDs."))
    }

    fn validate(&self, config: &Value) -> Result<(), ProviderError> {
        let kind = self.kind;
        validate_with(&self.schema(), config, |state: &JaasAccessState| {
            check_principals(kind, state)
        })
    }

    fn create(&self, plan: Value) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let mut plan: JaasAccessState = decode(plan)?;
            self.check(&plan)?;
            let wanted = plan.principals();
            tracing::info!(
                resource = self.kind.type_name(),
                access = %plan.id(self.kind),
                principals = wanted.len(),
                "adding relations"
            );
            self.apply(&plan, &Reconciliation::between(&BTreeSet::new(), &wanted))
                .await?;
            plan.id = Some(plan.id(self.kind));
            encode(&plan)
        })
    }

    fn read(&self, state: Value) -> BoxFuture<'_, Result<Option<Value>, ProviderError>> {
        Box::pin(async move {
            let state: JaasAccessState = decode(state)?;
            tracing::debug!(access = %state.id(self.kind), "reading relations");
            let remote = self.remote(&state).await?;
            encode(&state.refreshed(self.kind, &remote)).map(Some)
        })
    }

    fn update(&self, request: UpdateRequest) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let mut plan: JaasAccessState = decode(request.plan)?;
            let state: JaasAccessState = decode(request.state)?;
            self.check(&plan)?;
            let changes = Reconciliation::between(&state.principals(), &plan.principals());
            if !changes.is_empty() {
                tracing::info!(
                    access = %plan.id(self.kind),
                    grant = changes.to_grant.len(),
                    revoke = changes.to_revoke.len(),
                    "reconciling relations"
                );
                self.apply(&plan, &changes).await?;
            }
            plan.id = Some(plan.id(self.kind));
            encode(&plan)
        })
    }

    fn delete(&self, state: Value) -> BoxFuture<'_, Result<(), ProviderError>> {
        Box::pin(async move {
            let state: JaasAccessState = decode(state)?;
            tracing::info!(access = %state.id(self.kind), "removing relations");
            self.apply(&state, &Reconciliation::between(&state.principals(), &BTreeSet::new()))
                .await
        })
    }

    fn import<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Value, ProviderError>> {
        Box::pin(async move {
            self.jaas()?;
            let (target, access) =
                ids::parse_jaas_access(id).map_err(|e| ProviderError::import_id(id, e.to_string()))?;
            if self.kind == JaasTargetKind::Controller && target != JaasTarget::Controller.tag() {
                return Err(ProviderError::import_id(
                    id,
                    format!("expected {}:<access>", JaasTarget::Controller.tag()),
                ));
            }
            self.kind
                .check_target(&target)
                .map_err(|reason| ProviderError::import_id(id, reason))?;
            if !self.kind.relations().contains(&access.as_str()) {
                return Err(ProviderError::import_id(
                    id,
                    format!("access must be one of {}", self.kind.relations().join(", ")),
                ));
            }
            tracing::info!(access = %id, "importing relations");

            let mut state = JaasAccessState {
                access,
                ..Default::default()
            };
            state.set_target_value(self.kind, target);
            let remote = self.remote(&state).await?;
            encode(&state.refreshed(self.kind, &remote))
        })
    }
}
