//! Listing run: scope resolution, pagination and the worker pool wired together.
//!
//! A run moves through a fixed sequence: the search scope is resolved (possibly with
//! one current-account lookup), the table header is written, the worker pool is
//! started and the paginator feeds it until a short page arrives. The run returns
//! only after the queue is closed and every worker has drained it.
//!
pub mod paginate;
pub mod pool;

use std::sync::Arc;

use crate::error::Result;
use crate::output::{DEFAULT_COLUMN_WIDTH, LineSink, RolePrinter};
use crate::remote::{AccountsService, RoleResolver};
use crate::search::{RoleFilter, SearchScope};

pub use paginate::{PaginationStats, Paginator};
pub use pool::{ResolverFailure, WorkerContext, WorkerPool};

pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const DEFAULT_WORKERS: usize = 1;

/// Parameters of one listing run.
#[derive(Clone, Debug)]
pub struct RunOptions {
    /// Explicit organization; `None` falls back to roles or the current user.
    pub org: Option<String>,
    /// Print only accounts holding at least one of these roles.
    pub roles: Vec<String>,
    pub workers: usize,
    pub page_size: usize,
    pub column_width: usize,
    pub on_resolver_failure: ResolverFailure,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            org: None,
            roles: Vec::new(),
            workers: DEFAULT_WORKERS,
            page_size: DEFAULT_PAGE_SIZE,
            column_width: DEFAULT_COLUMN_WIDTH,
            on_resolver_failure: ResolverFailure::default(),
        }
    }
}

/// Counters reported by a completed run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pages: usize,
    pub accounts: usize,
    pub printed: usize,
}

/// Run the listing to completion, writing the table to `sink`.
pub async fn run(
    opts: &RunOptions,
    accounts: Arc<dyn AccountsService>,
    resolver: Arc<dyn RoleResolver>,
    sink: Arc<dyn LineSink>,
) -> Result<RunSummary> {
    let scope = SearchScope::select(opts.org.as_deref(), &opts.roles);
    let search = scope.predicate(accounts.as_ref()).await?;
    tracing::debug!(?scope, ?search, "search scope resolved");

    let printer = RolePrinter::new(opts.column_width);
    sink.write_line(&printer.header())?;
    sink.write_line("")?;

    let pool = WorkerPool::start(
        opts.workers,
        WorkerContext {
            resolver,
            filter: RoleFilter::new(opts.roles.iter().cloned()),
            printer,
            sink,
            on_failure: opts.on_resolver_failure,
        },
    );

    let paginator = Paginator::new(accounts, opts.page_size, search);
    let outcome = paginator.run(|account| pool.submit(account)).await;
    let stats = match outcome {
        Ok(stats) => stats,
        Err(err) => {
            pool.abort().await;
            return Err(err);
        }
    };
    tracing::debug!(
        pages = stats.pages,
        accounts = stats.accounts,
        "pagination complete"
    );

    let printed = pool.finish().await?;
    Ok(RunSummary {
        pages: stats.pages,
        accounts: stats.accounts,
        printed,
    })
}
