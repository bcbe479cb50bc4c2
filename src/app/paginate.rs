use std::sync::Arc;

use crate::error::Result;
use crate::remote::{Account, AccountsService, PageRequest};

/// Counters for one pagination pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaginationStats {
    pub pages: usize,
    pub accounts: usize,
}

/// Walks the account listing page by page, starting at page 1.
pub struct Paginator {
    service: Arc<dyn AccountsService>,
    page_size: usize,
    search: Option<String>,
}

impl Paginator {
    /// `page_size` must be at least 1; smaller values are raised to 1.
    pub fn new(
        service: Arc<dyn AccountsService>,
        page_size: usize,
        search: Option<String>,
    ) -> Self {
        Self {
            service,
            page_size: page_size.max(1),
            search,
        }
    }

    /// Fetch pages until one comes back short, handing every account to `submit`.
    ///
    /// Any fetch error ends the pass immediately. When `submit` refuses an account the
    /// consumer is gone and pagination stops early without an error; the consumer
    /// reports its own failure.
    pub async fn run<F>(&self, mut submit: F) -> Result<PaginationStats>
    where
        F: FnMut(Account) -> bool,
    {
        let mut stats = PaginationStats::default();
        for page in 1.. {
            let request = PageRequest {
                page,
                size: self.page_size,
                search: self.search.clone(),
            };
            let fetched = self.service.list_accounts(&request).await?;
            stats.pages += 1;
            tracing::debug!(page, items = fetched.size, "fetched account page");

            let last = fetched.is_last(self.page_size);
            for account in fetched.items {
                if !submit(account) {
                    tracing::debug!(page, "consumer stopped, ending pagination");
                    return Ok(stats);
                }
                stats.accounts += 1;
            }
            if last {
                break;
            }
        }
        Ok(stats)
    }
}
