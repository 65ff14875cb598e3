use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Access a user holds on a model.
///
/// Levels are cumulative: `admin` implies `write`, which implies `read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelAccess {
    Read,
    Write,
    Admin,
}

impl ModelAccess {
    pub const NAMES: &'static [&'static str] = &["read", "write", "admin"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for ModelAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelAccess {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "admin" => Ok(Self::Admin),
            other => Err(CoreError::InvalidAccess {
                scope: "model",
                level: other.to_string(),
            }),
        }
    }
}

/// Access a user holds on an application offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferAccess {
    Read,
    Consume,
    Admin,
}

impl OfferAccess {
    pub const NAMES: &'static [&'static str] = &["read", "consume", "admin"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Consume => "consume",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for OfferAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OfferAccess {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Self::Read),
            "consume" => Ok(Self::Consume),
            "admin" => Ok(Self::Admin),
            other => Err(CoreError::InvalidAccess {
                scope: "offer",
                level: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelUserAccess {
    pub user: String,
    pub access: ModelAccess,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferUserAccess {
    pub user: String,
    pub access: OfferAccess,
}
