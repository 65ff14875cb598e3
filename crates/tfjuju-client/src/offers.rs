use tfjuju_core::models::access::OfferAccess;
use tfjuju_core::models::offer::{CreateOfferInput, OfferInfo};

use crate::client::BoxFuture;
use crate::error::ClientError;

pub trait OffersApi: Send + Sync {
    fn create_offer(&self, input: CreateOfferInput) -> BoxFuture<'_, Result<OfferInfo, ClientError>>;

    fn read_offer<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<OfferInfo, ClientError>>;

    /// Remove an offer. Without `force` an offer that is still consumed
    /// cannot be removed.
    fn destroy_offer<'a>(&'a self, url: &'a str, force: bool) -> BoxFuture<'a, Result<(), ClientError>>;

    fn grant_offer<'a>(
        &'a self,
        url: &'a str,
        user: &'a str,
        access: OfferAccess,
    ) -> BoxFuture<'a, Result<(), ClientError>>;

    /// Same downgrade semantics as model access: revoking `read` removes
    /// the user from the offer.
    fn revoke_offer<'a>(
        &'a self,
        url: &'a str,
        user: &'a str,
        access: OfferAccess,
    ) -> BoxFuture<'a, Result<(), ClientError>>;
}
