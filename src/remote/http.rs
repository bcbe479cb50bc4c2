//! REST implementation of the accounts management contracts.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{Context, Error, Result};
use crate::remote::{Account, AccountsService, Page, PageRequest, RoleResolver, search_literal};

const ACCOUNTS_PATH: &str = "/api/accounts_mgmt/v1/accounts";
const CURRENT_ACCOUNT_PATH: &str = "/api/accounts_mgmt/v1/current_account";
const ROLE_BINDINGS_PATH: &str = "/api/accounts_mgmt/v1/role_bindings";
const ROLE_BINDINGS_PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default)]
    size: Option<usize>,
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

impl<T> ListResponse<T> {
    /// Item count reported by the server, falling back to the decoded items.
    fn count(&self) -> usize {
        self.size.unwrap_or(self.items.len())
    }
}

#[derive(Debug, Deserialize)]
struct RoleBinding {
    #[serde(default)]
    role: Option<RoleLink>,
}

#[derive(Debug, Deserialize)]
struct RoleLink {
    id: String,
}

/// Authenticated connection shared by the paginator and every worker.
///
/// `reqwest::Client` pools connections internally and is cheap to clone, so no
/// extra locking is needed for concurrent callers.
#[derive(Clone, Debug)]
pub struct HttpConnection {
    client: Client,
    base: Url,
    token: String,
}

impl HttpConnection {
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self> {
        let base = Url::parse(base_url)
            .with_transport(|| format!("Can't create connection: invalid URL '{base_url}'"))?;
        let client = Client::builder()
            .user_agent(concat!("ocm-users/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_transport(|| "Can't create connection".to_string())?;
        Ok(Self {
            client,
            base,
            token: token.into(),
        })
    }

    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let mut url = self
            .base
            .join(path)
            .with_transport(|| format!("Can't build request URL for '{path}'"))?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// GET `url` and decode the JSON body. `context` prefixes every failure.
    async fn get_json<T: DeserializeOwned>(&self, url: Url, context: &str) -> Result<T> {
        tracing::debug!(%url, "GET");
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .with_transport(|| context.to_string())?;
        let status = resp.status();
        let body = resp.text().await.with_transport(|| context.to_string())?;
        if !status.is_success() {
            return Err(Error::transport(context, Error::status(status.as_u16(), &body)));
        }
        serde_json::from_str(&body).with_transport(|| context.to_string())
    }
}

fn into_page(resp: ListResponse<Account>) -> Page {
    let size = resp.count();
    Page {
        items: resp.items,
        size,
    }
}

fn into_roles(resp: ListResponse<RoleBinding>) -> Vec<String> {
    resp.items
        .into_iter()
        .filter_map(|b| b.role.map(|r| r.id))
        .collect()
}

#[async_trait]
impl AccountsService for HttpConnection {
    async fn current_account(&self) -> Result<Account> {
        let url = self.endpoint(CURRENT_ACCOUNT_PATH, &[])?;
        self.get_json(url, "Can't retrieve current user information")
            .await
    }

    async fn list_accounts(&self, request: &PageRequest) -> Result<Page> {
        let mut params = vec![
            ("page", request.page.to_string()),
            ("size", request.size.to_string()),
        ];
        if let Some(search) = &request.search {
            params.push(("search", search.clone()));
        }
        let url = self.endpoint(ACCOUNTS_PATH, &params)?;
        let resp: ListResponse<Account> = self.get_json(url, "Can't retrieve accounts").await?;
        Ok(into_page(resp))
    }
}

#[async_trait]
impl RoleResolver for HttpConnection {
    async fn roles_of(&self, account: &Account) -> Result<Vec<String>> {
        self.role_bindings(account)
            .await
            .map_err(|e| Error::Resolution {
                username: account.username.clone(),
                source: Box::new(e),
            })
    }
}

impl HttpConnection {
    /// Role ids of every binding of `account`, following pages until a short one.
    async fn role_bindings(&self, account: &Account) -> Result<Vec<String>> {
        let search = format!("account_id={}", search_literal(&account.id));
        let mut roles = Vec::new();
        for page in 1usize.. {
            let params = [
                ("page", page.to_string()),
                ("size", ROLE_BINDINGS_PAGE_SIZE.to_string()),
                ("search", search.clone()),
            ];
            let url = self.endpoint(ROLE_BINDINGS_PATH, &params)?;
            let resp: ListResponse<RoleBinding> =
                self.get_json(url, "Can't retrieve role bindings").await?;
            let last = resp.count() < ROLE_BINDINGS_PAGE_SIZE;
            roles.extend(into_roles(resp));
            if last {
                break;
            }
        }
        Ok(roles)
    }
}
