use tfjuju_core::models::user::{CreateUserInput, UserInfo};

use crate::client::BoxFuture;
use crate::error::ClientError;

pub trait UsersApi: Send + Sync {
    fn create_user(&self, input: CreateUserInput) -> BoxFuture<'_, Result<UserInfo, ClientError>>;

    fn read_user<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<UserInfo, ClientError>>;

    fn set_password<'a>(
        &'a self,
        name: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<(), ClientError>>;

    fn remove_user<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<(), ClientError>>;
}
