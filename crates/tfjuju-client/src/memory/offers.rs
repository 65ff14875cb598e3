use tfjuju_core::models::access::{OfferAccess, OfferUserAccess};
use tfjuju_core::models::offer::{CreateOfferInput, OfferInfo, OfferUrl};

use super::MemoryController;
use crate::client::BoxFuture;
use crate::error::ClientError;
use crate::offers::OffersApi;

fn level_below(access: OfferAccess) -> Option<OfferAccess> {
    match access {
        OfferAccess::Admin => Some(OfferAccess::Consume),
        OfferAccess::Consume => Some(OfferAccess::Read),
        OfferAccess::Read => None,
    }
}

impl OffersApi for MemoryController {
    fn create_offer(&self, input: CreateOfferInput) -> BoxFuture<'_, Result<OfferInfo, ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            let owner = inner.require_model(&input.model)?.owner.clone();
            let app_key = (input.model.clone(), input.application_name.clone());
            if !inner.applications.contains_key(&app_key) {
                return Err(ClientError::not_found(
                    "application",
                    format!("{}/{}", input.model, input.application_name),
                ));
            }
            if input.endpoints.is_empty() {
                return Err(ClientError::InvalidRequest(
                    "an offer needs at least one endpoint".into(),
                ));
            }
            let name = input
                .name
                .unwrap_or_else(|| input.application_name.clone());
            let url = OfferUrl::new(&owner, &input.model, &name).to_string();
            if inner.offers.contains_key(&url) {
                return Err(ClientError::already_exists("offer", url));
            }
            inner.call(format!("create_offer:{url}"))?;

            let offer = OfferInfo {
                url: url.clone(),
                name,
                model: input.model,
                application_name: input.application_name,
                endpoints: input.endpoints,
                users: vec![OfferUserAccess {
                    user: owner,
                    access: OfferAccess::Admin,
                }],
            };
            inner.offers.insert(url, offer.clone());
            Ok(offer)
        })
    }

    fn read_offer<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<OfferInfo, ClientError>> {
        Box::pin(async move {
            let key = self.offer_key(url)?;
            self.lock()
                .await
                .offers
                .get(&key)
                .cloned()
                .ok_or_else(|| ClientError::not_found("offer", url))
        })
    }

    fn destroy_offer<'a>(&'a self, url: &'a str, force: bool) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(async move {
            let key = self.offer_key(url)?;
            let mut inner = self.lock().await;
            if !inner.offers.contains_key(&key) {
                return Err(ClientError::not_found("offer", url));
            }
            let is_consumer = |u: &Option<String>| {
                u.as_deref()
                    .and_then(|u| self.offer_key(u).ok())
                    .is_some_and(|k| k == key)
            };
            let consumed = inner
                .integrations
                .iter()
                .any(|i| i.endpoints.iter().any(|e| is_consumer(&e.offer_url)));
            if consumed && !force {
                return Err(ClientError::InvalidRequest(format!(
                    "offer {url} has active connections"
                )));
            }
            inner.call(format!("destroy_offer:{key}"))?;

            inner.offers.remove(&key);
            inner
                .integrations
                .retain(|i| !i.endpoints.iter().any(|e| is_consumer(&e.offer_url)));
            Ok(())
        })
    }

    fn grant_offer<'a>(
        &'a self,
        url: &'a str,
        user: &'a str,
        access: OfferAccess,
    ) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(async move {
            let key = self.offer_key(url)?;
            let mut inner = self.lock().await;
            if !inner.offers.contains_key(&key) {
                return Err(ClientError::not_found("offer", url));
            }
            inner.call(format!("grant_offer:{key}:{user}:{access}"))?;

            let Some(offer) = inner.offers.get_mut(&key) else {
                return Err(ClientError::not_found("offer", url));
            };
            match offer.users.iter_mut().find(|u| u.user == user) {
                Some(existing) => existing.access = existing.access.max(access),
                None => offer.users.push(OfferUserAccess {
                    user: user.to_string(),
                    access,
                }),
            }
            Ok(())
        })
    }

    fn revoke_offer<'a>(
        &'a self,
        url: &'a str,
        user: &'a str,
        access: OfferAccess,
    ) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(async move {
            let key = self.offer_key(url)?;
            let mut inner = self.lock().await;
            if !inner.offers.contains_key(&key) {
                return Err(ClientError::not_found("offer", url));
            }
            inner.call(format!("revoke_offer:{key}:{user}:{access}"))?;

            let Some(offer) = inner.offers.get_mut(&key) else {
                return Err(ClientError::not_found("offer", url));
            };
            let Some(idx) = offer.users.iter().position(|u| u.user == user) else {
                return Ok(());
            };
            match level_below(access) {
                Some(below) => {
                    let entry = &mut offer.users[idx];
                    entry.access = entry.access.min(below);
                }
                None => {
                    offer.users.remove(idx);
                }
            }
            Ok(())
        })
    }
}
