//! Set reconciliation for the access resources.
//!
//! Given the last-applied set and the planned set, work out which members to
//! grant and which to revoke, then apply revokes before grants. Calls on one
//! side are independent of each other. Every call is attempted and failures
//! are reported together; nothing is retried.

use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;

use futures::future::join_all;
use thiserror::Error;

use tfjuju_client::ClientError;

use crate::error::format_err_chain;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation<T: Ord> {
    pub to_grant: BTreeSet<T>,
    pub to_revoke: BTreeSet<T>,
}

impl<T: Ord + Clone> Reconciliation<T> {
    /// `to_grant = desired \ current`, `to_revoke = current \ desired`.
    pub fn between(current: &BTreeSet<T>, desired: &BTreeSet<T>) -> Self {
        Self {
            to_grant: desired.difference(current).cloned().collect(),
            to_revoke: current.difference(desired).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_grant.is_empty() && self.to_revoke.is_empty()
    }

    /// The set that results from applying this reconciliation to `current`.
    pub fn apply_to(&self, current: &BTreeSet<T>) -> BTreeSet<T> {
        current
            .difference(&self.to_revoke)
            .chain(self.to_grant.iter())
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Side {
    Revoke,
    Grant,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Revoke => "revoke",
            Self::Grant => "grant",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub side: Side,
    pub principal: String,
    pub message: String,
}

/// Some grant or revoke calls failed. Principals not listed here converged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}access partially converged: {}", owner(.resource), describe(.failures))]
pub struct ConvergeError {
    /// Resource label and target, filled in by the handler that converged.
    pub resource: Option<String>,
    pub failures: Vec<Failure>,
}

fn owner(resource: &Option<String>) -> String {
    resource.as_ref().map(|r| format!("{r}: ")).unwrap_or_default()
}

fn describe(failures: &[Failure]) -> String {
    failures
        .iter()
        .map(|f| format!("{} {} failed: {}", f.side, f.principal, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ConvergeError {
    /// Sides with at least one failure.
    pub fn sides(&self) -> BTreeSet<Side> {
        self.failures.iter().map(|f| f.side).collect()
    }

    pub fn principals(&self, side: Side) -> Vec<&str> {
        self.failures
            .iter()
            .filter(|f| f.side == side)
            .map(|f| f.principal.as_str())
            .collect()
    }
}

/// Apply a reconciliation with one call per member. Revokes run
/// concurrently, then grants run concurrently.
pub async fn converge<T, R, G, RF, GF>(
    plan: &Reconciliation<T>,
    revoke: R,
    grant: G,
) -> Result<(), ConvergeError>
where
    T: Ord + Clone + fmt::Display,
    R: Fn(T) -> RF,
    G: Fn(T) -> GF,
    RF: Future<Output = Result<(), ClientError>>,
    GF: Future<Output = Result<(), ClientError>>,
{
    let mut failures = Vec::new();

    let revokes = plan.to_revoke.iter().map(|member| {
        let principal = member.to_string();
        let call = revoke(member.clone());
        async move { (principal, call.await) }
    });
    record(Side::Revoke, join_all(revokes).await, &mut failures);

    let grants = plan.to_grant.iter().map(|member| {
        let principal = member.to_string();
        let call = grant(member.clone());
        async move { (principal, call.await) }
    });
    record(Side::Grant, join_all(grants).await, &mut failures);

    finish(failures)
}

/// Apply a reconciliation with one batched call per side. A failed batch
/// marks every member of that side as failed.
pub async fn converge_batch<T, R, G, RF, GF>(
    plan: &Reconciliation<T>,
    revoke: R,
    grant: G,
) -> Result<(), ConvergeError>
where
    T: Ord + Clone + fmt::Display,
    R: FnOnce(Vec<T>) -> RF,
    G: FnOnce(Vec<T>) -> GF,
    RF: Future<Output = Result<(), ClientError>>,
    GF: Future<Output = Result<(), ClientError>>,
{
    let mut failures = Vec::new();

    if !plan.to_revoke.is_empty() {
        let members: Vec<T> = plan.to_revoke.iter().cloned().collect();
        if let Err(e) = revoke(members).await {
            batch_failed(Side::Revoke, &plan.to_revoke, &e, &mut failures);
        }
    }
    if !plan.to_grant.is_empty() {
        let members: Vec<T> = plan.to_grant.iter().cloned().collect();
        if let Err(e) = grant(members).await {
            batch_failed(Side::Grant, &plan.to_grant, &e, &mut failures);
        }
    }

    finish(failures)
}

fn record(side: Side, results: Vec<(String, Result<(), ClientError>)>, failures: &mut Vec<Failure>) {
    for (principal, result) in results {
        if let Err(e) = result {
            tracing::warn!(side = %side, principal = %principal, error = %e, "access change failed");
            failures.push(Failure {
                side,
                principal,
                message: format_err_chain(&e),
            });
        }
    }
}

fn batch_failed<T: fmt::Display>(
    side: Side,
    members: &BTreeSet<T>,
    err: &ClientError,
    failures: &mut Vec<Failure>,
) {
    tracing::warn!(side = %side, count = members.len(), error = %err, "batched access change failed");
    let message = format_err_chain(err);
    failures.extend(members.iter().map(|m| Failure {
        side,
        principal: m.to_string(),
        message: message.clone(),
    }));
}

fn finish(failures: Vec<Failure>) -> Result<(), ConvergeError> {
    if failures.is_empty() {
        Ok(())
    } else {
        Err(ConvergeError {
            resource: None,
            failures,
        })
    }
}
