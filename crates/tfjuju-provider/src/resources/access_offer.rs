use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tfjuju_client::JujuClient;
use tfjuju_core::models::access::OfferAccess;
use tfjuju_core::models::offer::{OfferInfo, OfferUrl};

use super::read_or_gone;
use crate::error::{ProviderError, read_failed};
use crate::reconcile::{Reconciliation, converge};
use crate::resource::{BoxFuture, Resource, UpdateRequest, decode, encode, validate_with};
use crate::schema::{Attribute, Schema};

const TYPE_NAME: &str = "juju_access_offer";

/// One user at one level. A user changing level is a revoke plus a grant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct OfferGrant {
    user: String,
    access: OfferAccess,
}

impl fmt::Display for OfferGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.user, self.access)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct AccessOfferState {
    id: Option<String>,
    offer_url: String,
    admin_users: Option<BTreeSet<String>>,
    consume_users: Option<BTreeSet<String>>,
    read_users: Option<BTreeSet<String>>,
}

impl AccessOfferState {
    fn levels(&self) -> [(OfferAccess, Option<&BTreeSet<String>>); 3] {
        [
            (OfferAccess::Admin, self.admin_users.as_ref()),
            (OfferAccess::Consume, self.consume_users.as_ref()),
            (OfferAccess::Read, self.read_users.as_ref()),
        ]
    }

    fn grants(&self) -> BTreeSet<OfferGrant> {
        self.levels()
            .into_iter()
            .flat_map(|(access, users)| {
                users.into_iter().flatten().map(move |user| OfferGrant {
                    user: user.clone(),
                    access,
                })
            })
            .collect()
    }

    fn managed(&self) -> BTreeSet<String> {
        self.grants().into_iter().map(|g| g.user).collect()
    }

    /// Rebuild the user sets from remote grants. A set that was unset and
    /// stays empty remains unset.
    fn refreshed(&self, remote: &[OfferGrant]) -> Self {
        let pick = |access: OfferAccess, prior: &Option<BTreeSet<String>>| {
            let users: BTreeSet<String> = remote
                .iter()
                .filter(|g| g.access == access)
                .map(|g| g.user.clone())
                .collect();
            (prior.is_some() || !users.is_empty()).then_some(users)
        };
        Self {
            id: Some(self.offer_url.clone()),
            offer_url: self.offer_url.clone(),
            admin_users: pick(OfferAccess::Admin, &self.admin_users),
            consume_users: pick(OfferAccess::Consume, &self.consume_users),
            read_users: pick(OfferAccess::Read, &self.read_users),
        }
    }
}

fn remote_grants(info: &OfferInfo) -> Vec<OfferGrant> {
    info.users
        .iter()
        .map(|u| OfferGrant {
            user: u.user.clone(),
            access: u.access,
        })
        .collect()
}

fn check_exclusive(state: &AccessOfferState) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut errors = Vec::new();
    for grant in state.grants() {
        if !seen.insert(grant.user.clone()) {
            errors.push(format!(
                "user {:?} appears in more than one of admin_users, consume_users and read_users",
                grant.user
            ));
        }
    }
    errors
}

pub struct AccessOfferResource {
    client: JujuClient,
}

impl AccessOfferResource {
    pub fn new(client: JujuClient) -> Self {
        Self { client }
    }

    /// Revoking `read` removes the user from the offer whatever level they held.
    async fn apply(&self, url: &str, changes: &Reconciliation<OfferGrant>) -> Result<(), ProviderError> {
        let offers = &self.client.offers;
        converge(
            changes,
            move |grant: OfferGrant| async move {
                offers.revoke_offer(url, &grant.user, OfferAccess::Read).await
            },
            move |grant: OfferGrant| async move { offers.grant_offer(url, &grant.user, grant.access).await },
        )
        .await
        .map_err(|e| ProviderError::from(e).with_resource(TYPE_NAME, url))?;
        Ok(())
    }
}

impl Resource for AccessOfferResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("Grants offer access to users. Each user appears in at most one set.")
            .with_id()
            .attribute(Attribute::string("offer_url").required().requires_replace())
            .attribute(Attribute::string_set("admin_users"))
            .attribute(Attribute::string_set("consume_users"))
            .attribute(Attribute::string_set("read_users"))
    }

    fn validate(&self, config: &Value) -> Result<(), ProviderError> {
        validate_with(&self.schema(), config, check_exclusive)
    }

    fn create(&self, plan: Value) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let plan: AccessOfferState = decode(plan)?;
            let errors = check_exclusive(&plan);
            if !errors.is_empty() {
                return Err(ProviderError::Validation(errors));
            }
            let wanted = plan.grants();
            tracing::info!(offer = %plan.offer_url, users = wanted.len(), "granting offer access");
            self.apply(&plan.offer_url, &Reconciliation::between(&BTreeSet::new(), &wanted))
                .await?;
            encode(&AccessOfferState {
                id: Some(plan.offer_url.clone()),
                ..plan
            })
        })
    }

    fn read(&self, state: Value) -> BoxFuture<'_, Result<Option<Value>, ProviderError>> {
        Box::pin(async move {
            let state: AccessOfferState = decode(state)?;
            tracing::debug!(offer = %state.offer_url, "reading offer access");
            let Some(info) = read_or_gone(
                self.client.offers.read_offer(&state.offer_url).await,
                TYPE_NAME,
                &state.offer_url,
            )?
            else {
                return Ok(None);
            };
            let managed = state.managed();
            let remote: Vec<OfferGrant> = remote_grants(&info)
                .into_iter()
                .filter(|g| managed.contains(&g.user))
                .collect();
            encode(&state.refreshed(&remote)).map(Some)
        })
    }

    fn update(&self, request: UpdateRequest) -> BoxFuture<'_, Result<Value, ProviderError>> {
        Box::pin(async move {
            let plan: AccessOfferState = decode(request.plan)?;
            let state: AccessOfferState = decode(request.state)?;
            let errors = check_exclusive(&plan);
            if !errors.is_empty() {
                return Err(ProviderError::Validation(errors));
            }
            let changes = Reconciliation::between(&state.grants(), &plan.grants());
            if !changes.is_empty() {
                tracing::info!(
                    offer = %plan.offer_url,
                    grant = changes.to_grant.len(),
                    revoke = changes.to_revoke.len(),
                    "reconciling offer access"
                );
                self.apply(&plan.offer_url, &changes).await?;
            }
            encode(&AccessOfferState {
                id: Some(plan.offer_url.clone()),
                ..plan
            })
        })
    }

    fn delete(&self, state: Value) -> BoxFuture<'_, Result<(), ProviderError>> {
        Box::pin(async move {
            let state: AccessOfferState = decode(state)?;
            tracing::info!(offer = %state.offer_url, "revoking offer access");
            if read_or_gone(
                self.client.offers.read_offer(&state.offer_url).await,
                TYPE_NAME,
                &state.offer_url,
            )?
            .is_none()
            {
                return Ok(());
            }
            self.apply(&state.offer_url, &Reconciliation::between(&state.grants(), &BTreeSet::new()))
                .await
        })
    }

    fn import<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Value, ProviderError>> {
        Box::pin(async move {
            id.parse::<OfferUrl>()
                .map_err(|e| ProviderError::import_id(id, e.to_string()))?;
            tracing::info!(offer = %id, "importing offer access");
            let info = self
                .client
                .offers
                .read_offer(id)
                .await
                .map_err(|e| read_failed(e).with_resource(TYPE_NAME, id))?;
            let owner = info.url.parse::<OfferUrl>()?.owner;
            let remote: Vec<OfferGrant> = remote_grants(&info)
                .into_iter()
                .filter(|g| owner.as_deref() != Some(g.user.as_str()))
                .collect();
            let empty = AccessOfferState {
                id: None,
                offer_url: id.to_string(),
                admin_users: None,
                consume_users: None,
                read_users: None,
            };
            encode(&empty.refreshed(&remote))
        })
    }
}
