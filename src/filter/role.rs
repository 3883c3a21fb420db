//! Caller roles and the filter capabilities they grant.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Role of the signed-in caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Sees every owner's records and may filter by any owner
    Admin,
    /// Support agent: restricted to the tickets and messages they own
    Agent,
    /// Regular member: restricted to their own expenses and todos
    #[serde(alias = "user")]
    Member,
}

/// Filter capability granted by a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    /// May leave the owner unset or choose any owner
    ViewAllOwners,
}

impl Role {
    pub fn capabilities(self) -> Vec<Capability> {
        match self {
            Role::Admin => vec![Capability::ViewAllOwners],
            Role::Agent | Role::Member => Vec::new(),
        }
    }

    /// Privileged roles see all owners; everyone else is pinned to their own identity.
    pub fn is_privileged(self) -> bool {
        self.capabilities().contains(&Capability::ViewAllOwners)
    }

    pub fn slug(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Agent => "agent",
            Role::Member => "member",
        }
    }
}

impl FromStr for Role {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "agent" => Ok(Role::Agent),
            "member" | "user" => Ok(Role::Member),
            other => Err(ApiError::ConfigError(format!(
                "Invalid role: {}. Must be admin, agent, or member",
                other
            ))),
        }
    }
}
