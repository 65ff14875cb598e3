use tfjuju_core::models::user::{CreateUserInput, UserInfo};

use super::MemoryController;
use crate::client::BoxFuture;
use crate::error::ClientError;
use crate::users::UsersApi;

impl UsersApi for MemoryController {
    fn create_user(&self, input: CreateUserInput) -> BoxFuture<'_, Result<UserInfo, ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            if inner.users.contains_key(&input.name) {
                return Err(ClientError::already_exists("user", &input.name));
            }
            if input.password.is_empty() {
                return Err(ClientError::InvalidRequest("password must not be empty".into()));
            }
            inner.call(format!("create_user:{}", input.name))?;

            let user = UserInfo {
                name: input.name,
                display_name: input.display_name,
            };
            inner
                .users
                .insert(user.name.clone(), (user.clone(), input.password));
            Ok(user)
        })
    }

    fn read_user<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<UserInfo, ClientError>> {
        Box::pin(async move {
            self.lock()
                .await
                .users
                .get(name)
                .map(|(user, _)| user.clone())
                .ok_or_else(|| ClientError::not_found("user", name))
        })
    }

    fn set_password<'a>(
        &'a self,
        name: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            if !inner.users.contains_key(name) {
                return Err(ClientError::not_found("user", name));
            }
            inner.call(format!("set_password:{name}"))?;
            if let Some((_, stored)) = inner.users.get_mut(name) {
                *stored = password.to_string();
            }
            Ok(())
        })
    }

    fn remove_user<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            if !inner.users.contains_key(name) {
                return Err(ClientError::not_found("user", name));
            }
            inner.call(format!("remove_user:{name}"))?;
            inner.users.remove(name);
            Ok(())
        })
    }
}
