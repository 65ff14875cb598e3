//! Resource ID conventions.
//!
//! Pure string functions with no client dependency. These define the canonical
//! shape of the IDs stored in state and accepted by import.

use crate::error::CoreError;

const SEP: char = ':';

/// Split `id` into exactly `n` colon-separated, non-empty parts.
fn split_exact<'a>(id: &'a str, n: usize, shape: &str) -> Result<Vec<&'a str>, CoreError> {
    let parts: Vec<&str> = id.split(SEP).collect();
    if parts.len() != n {
        return Err(CoreError::invalid_id(id, format!("expected {shape}")));
    }
    if parts.iter().any(|p| p.is_empty()) {
        return Err(CoreError::invalid_id(id, format!("empty field, expected {shape}")));
    }
    Ok(parts)
}

fn parse_flag(id: &str, value: &str) -> Result<bool, CoreError> {
    value
        .parse::<bool>()
        .map_err(|_| CoreError::invalid_id(id, format!("{value:?} is not true or false")))
}

pub fn application(model: &str, name: &str) -> String {
    format!("{model}:{name}")
}

pub fn parse_application(id: &str) -> Result<(String, String), CoreError> {
    let parts = split_exact(id, 2, "<model>:<application>")?;
    Ok((parts[0].to_string(), parts[1].to_string()))
}

/// The machine name is local to configuration and may be empty.
pub fn machine(model: &str, machine_id: &str, name: &str) -> String {
    format!("{model}:{machine_id}:{name}")
}

pub fn parse_machine(id: &str) -> Result<(String, String, String), CoreError> {
    let parts: Vec<&str> = id.splitn(3, SEP).collect();
    match parts.as_slice() {
        [model, machine_id, name] if !model.is_empty() && !machine_id.is_empty() => {
            Ok((model.to_string(), machine_id.to_string(), name.to_string()))
        }
        [model, machine_id] if !model.is_empty() && !machine_id.is_empty() => {
            Ok((model.to_string(), machine_id.to_string(), String::new()))
        }
        _ => Err(CoreError::invalid_id(
            id,
            "expected <model>:<machine_id>[:<name>]",
        )),
    }
}

pub fn integration(model: &str, a: (&str, &str), b: (&str, &str)) -> String {
    format!("{model}:{}:{}:{}:{}", a.0, a.1, b.0, b.1)
}

pub type IntegrationParts = (String, [(String, String); 2]);

pub fn parse_integration(id: &str) -> Result<IntegrationParts, CoreError> {
    let parts = split_exact(
        id,
        5,
        "<model>:<app1>:<endpoint1>:<app2>:<endpoint2>",
    )?;
    Ok((
        parts[0].to_string(),
        [
            (parts[1].to_string(), parts[2].to_string()),
            (parts[3].to_string(), parts[4].to_string()),
        ],
    ))
}

pub fn credential(name: &str, cloud: &str, client: bool, controller: bool) -> String {
    format!("{name}:{cloud}:{client}:{controller}")
}

pub fn parse_credential(id: &str) -> Result<(String, String, bool, bool), CoreError> {
    let parts = split_exact(
        id,
        4,
        "<name>:<cloud>:<client_credential>:<controller_credential>",
    )?;
    let client = parse_flag(id, parts[2])?;
    let controller = parse_flag(id, parts[3])?;
    if !client && !controller {
        return Err(CoreError::invalid_id(
            id,
            "at least one of client or controller must be true",
        ));
    }
    Ok((parts[0].to_string(), parts[1].to_string(), client, controller))
}

pub fn ssh_key(model: &str, user_id: &str) -> String {
    format!("{model}:{user_id}")
}

/// The user id is everything after the first separator.
pub fn parse_ssh_key(id: &str) -> Result<(String, String), CoreError> {
    match id.split_once(SEP) {
        Some((model, user_id)) if !model.is_empty() && !user_id.is_empty() => {
            Ok((model.to_string(), user_id.to_string()))
        }
        _ => Err(CoreError::invalid_id(id, "expected <model>:<user_id>")),
    }
}

pub fn access_model<'a>(model: &str, access: &str, users: impl IntoIterator<Item = &'a str>) -> String {
    let users: Vec<&str> = users.into_iter().collect();
    format!("{model}:{access}:{}", users.join(","))
}

pub fn parse_access_model(id: &str) -> Result<(String, String, Vec<String>), CoreError> {
    let parts = split_exact(id, 3, "<model>:<access>:<user1>[,<user2>...]")?;
    let users: Vec<String> = parts[2]
        .split(',')
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(String::from)
        .collect();
    if users.is_empty() {
        return Err(CoreError::invalid_id(id, "at least one user is required"));
    }
    Ok((parts[0].to_string(), parts[1].to_string(), users))
}

/// JAAS access IDs split on the last separator because targets such as
/// offer URLs may themselves contain one.
pub fn jaas_access(target: &str, access: &str) -> String {
    format!("{target}:{access}")
}

pub fn parse_jaas_access(id: &str) -> Result<(String, String), CoreError> {
    match id.rsplit_once(SEP) {
        Some((target, access)) if !target.is_empty() && !access.is_empty() => {
            Ok((target.to_string(), access.to_string()))
        }
        _ => Err(CoreError::invalid_id(id, "expected <target>:<access>")),
    }
}

/// Validate that `id` is a UUID, as JAAS requires for groups and roles.
pub fn require_uuid(id: &str) -> Result<uuid::Uuid, CoreError> {
    Ok(uuid::Uuid::parse_str(id)?)
}
