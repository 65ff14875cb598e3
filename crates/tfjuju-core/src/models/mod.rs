pub mod access;
pub mod application;
pub mod cloud;
pub mod credential;
pub mod integration;
pub mod jaas;
pub mod machine;
pub mod model;
pub mod offer;
pub mod ssh_key;
pub mod user;
