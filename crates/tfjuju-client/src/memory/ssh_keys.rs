use tfjuju_core::models::ssh_key::SshPublicKey;

use super::MemoryController;
use crate::client::BoxFuture;
use crate::error::ClientError;
use crate::ssh_keys::SshKeysApi;

fn comment_of(line: &str) -> Option<String> {
    line.parse::<SshPublicKey>().ok().map(|k| k.comment)
}

impl SshKeysApi for MemoryController {
    fn add_key<'a>(&'a self, model: &'a str, payload: &'a str) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(async move {
            let key: SshPublicKey = payload.parse()?;
            let mut inner = self.lock().await;
            inner.require_model(model)?;
            let duplicate = inner
                .ssh_keys
                .get(model)
                .is_some_and(|keys| keys.iter().any(|k| comment_of(k).as_deref() == Some(key.user_id())));
            if duplicate {
                return Err(ClientError::already_exists(
                    "ssh key",
                    format!("{model}/{}", key.user_id()),
                ));
            }
            inner.call(format!("add_key:{model}:{}", key.user_id()))?;
            inner
                .ssh_keys
                .entry(model.to_string())
                .or_default()
                .push(payload.trim().to_string());
            Ok(())
        })
    }

    fn list_keys<'a>(&'a self, model: &'a str) -> BoxFuture<'a, Result<Vec<String>, ClientError>> {
        Box::pin(async move {
            let inner = self.lock().await;
            inner.require_model(model)?;
            Ok(inner.ssh_keys.get(model).cloned().unwrap_or_default())
        })
    }

    fn remove_key<'a>(&'a self, model: &'a str, user_id: &'a str) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            inner.require_model(model)?;
            let position = inner.ssh_keys.get(model).and_then(|keys| {
                keys.iter()
                    .position(|k| comment_of(k).as_deref() == Some(user_id))
            });
            let Some(idx) = position else {
                return Err(ClientError::not_found("ssh key", format!("{model}/{user_id}")));
            };
            inner.call(format!("remove_key:{model}:{user_id}"))?;
            if let Some(keys) = inner.ssh_keys.get_mut(model) {
                keys.remove(idx);
            }
            Ok(())
        })
    }
}
