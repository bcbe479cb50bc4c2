use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::remote::{AccountsService, search_literal};

/// Role based account filter. An empty filter accepts every account.
#[derive(Clone, Debug, Default)]
pub struct RoleFilter {
    wanted: HashSet<String>,
}

impl RoleFilter {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            wanted: roles
                .into_iter()
                .map(Into::into)
                .filter(|r: &String| !r.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.wanted.is_empty()
    }

    pub fn accepts(&self, account_roles: &[String]) -> bool {
        matches(account_roles, &self.wanted)
    }
}

/// True when `wanted` is empty or shares at least one role with `account_roles`.
pub fn matches(account_roles: &[String], wanted: &HashSet<String>) -> bool {
    wanted.is_empty() || account_roles.iter().any(|r| wanted.contains(r))
}

/// How accounts are enumerated for a run. Chosen once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchScope {
    ExplicitOrg(String),
    /// Cross-organization search; the roles are applied client side.
    RoleQuery(Vec<String>),
    /// Organization of the authenticated user.
    CurrentUserOrg,
}

impl SearchScope {
    /// An explicit organization wins over a role query; with neither, fall back to
    /// the current user's organization.
    pub fn select(org: Option<&str>, roles: &[String]) -> Self {
        match org.map(str::trim).filter(|o| !o.is_empty()) {
            Some(org) => Self::ExplicitOrg(org.to_string()),
            None if roles.iter().any(|r| !r.is_empty()) => Self::RoleQuery(roles.to_vec()),
            None => Self::CurrentUserOrg,
        }
    }

    /// Server side search predicate for this scope. `CurrentUserOrg` performs exactly
    /// one current-account lookup; the other scopes never touch the service.
    pub async fn predicate(&self, service: &dyn AccountsService) -> Result<Option<String>> {
        match self {
            Self::ExplicitOrg(org) => Ok(Some(org_predicate(org))),
            Self::RoleQuery(_) => Ok(None),
            Self::CurrentUserOrg => {
                let me = service.current_account().await?;
                let org = me
                    .organization_id()
                    .ok_or_else(|| Error::scope("Failed to get current user organization"))?;
                tracing::debug!(user = %me.username, org, "resolved home organization");
                Ok(Some(org_predicate(org)))
            }
        }
    }
}

fn org_predicate(org: &str) -> String {
    format!("organization_id={}", search_literal(org))
}
