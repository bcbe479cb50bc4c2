//! Remote accounts management layer.
//!
//! Defines the account model and the two contracts the listing pipeline consumes:
//! [`AccountsService`] for enumerating accounts and [`RoleResolver`] for per-account
//! role lookups. [`http::HttpConnection`] implements both against the REST API and
//! [`session`] turns the local session file into such a connection.
pub mod http;
pub mod session;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;

/// Organization an account belongs to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct OrganizationRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A user identity record returned by the listing service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub organization: Option<OrganizationRef>,
}

impl Account {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            organization: None,
        }
    }

    pub fn with_organization(mut self, org_id: impl Into<String>) -> Self {
        self.organization = Some(OrganizationRef {
            id: org_id.into(),
            name: None,
        });
        self
    }

    /// Identifier of the home organization, if the record carries a usable one.
    pub fn organization_id(&self) -> Option<&str> {
        self.organization
            .as_ref()
            .map(|o| o.id.as_str())
            .filter(|id| !id.is_empty())
    }
}

/// Parameters of a single list request. Pages are 1-based.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
    pub search: Option<String>,
}

/// One bounded batch of accounts.
#[derive(Clone, Debug, Default)]
pub struct Page {
    pub items: Vec<Account>,
    /// Number of items the server reports for this page.
    pub size: usize,
}

impl Page {
    pub fn new(items: Vec<Account>) -> Self {
        let size = items.len();
        Self { items, size }
    }

    /// A page holding fewer items than requested is the last one.
    pub fn is_last(&self, requested: usize) -> bool {
        self.size < requested
    }
}

/// Quote `value` as a string literal for a server side search predicate.
pub fn search_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Account enumeration endpoints.
#[async_trait]
pub trait AccountsService: Send + Sync {
    /// The account the session is authenticated as.
    async fn current_account(&self) -> Result<Account>;

    async fn list_accounts(&self, request: &PageRequest) -> Result<Page>;
}

/// Looks up the role identifiers bound to an account.
#[async_trait]
pub trait RoleResolver: Send + Sync {
    async fn roles_of(&self, account: &Account) -> Result<Vec<String>>;
}
