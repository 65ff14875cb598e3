use crate::client::BoxFuture;
use crate::error::ClientError;

pub trait SshKeysApi: Send + Sync {
    fn add_key<'a>(&'a self, model: &'a str, payload: &'a str) -> BoxFuture<'a, Result<(), ClientError>>;

    /// Full authorized-keys lines for every key on the model.
    fn list_keys<'a>(&'a self, model: &'a str) -> BoxFuture<'a, Result<Vec<String>, ClientError>>;

    /// Remove a key by its comment.
    fn remove_key<'a>(&'a self, model: &'a str, user_id: &'a str) -> BoxFuture<'a, Result<(), ClientError>>;
}
