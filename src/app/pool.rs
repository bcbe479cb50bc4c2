//! Fixed-size pool of workers resolving roles for queued accounts.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinSet;

use crate::error::{Error, Result};
use crate::output::{LineSink, RolePrinter};
use crate::remote::{Account, RoleResolver};
use crate::search::RoleFilter;

/// What a worker does when a role lookup fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResolverFailure {
    /// Report on stderr and terminate the process with exit code 1.
    #[default]
    Exit,
    /// Stop every worker and return the error from [`WorkerPool::finish`].
    Propagate,
}

/// Everything a worker needs to turn an account into an output line.
pub struct WorkerContext {
    pub resolver: Arc<dyn RoleResolver>,
    pub filter: RoleFilter,
    pub printer: RolePrinter,
    pub sink: Arc<dyn LineSink>,
    pub on_failure: ResolverFailure,
}

impl WorkerContext {
    /// Resolve, filter and print one account. Returns whether a line was written.
    async fn process(&self, worker: usize, account: &Account) -> Result<bool> {
        let roles = self
            .resolver
            .roles_of(account)
            .await
            .map_err(|e| match e {
                e @ Error::Resolution { .. } => e,
                other => Error::Resolution {
                    username: account.username.clone(),
                    source: Box::new(other),
                },
            })?;
        tracing::debug!(
            worker,
            user = %account.username,
            roles = roles.len(),
            "resolved roles"
        );

        if !self.filter.accepts(&roles) {
            return Ok(false);
        }
        let line = self.printer.format(&account.username, &account.id, &roles);
        self.sink.write_line(&line)?;
        Ok(true)
    }
}

type Queue = Arc<Mutex<mpsc::UnboundedReceiver<Account>>>;

/// Workers share one unbounded FIFO queue. Closing the queue with [`WorkerPool::finish`]
/// lets the workers drain what is left and exit.
pub struct WorkerPool {
    sender: mpsc::UnboundedSender<Account>,
    workers: JoinSet<Result<usize>>,
    cancel: Arc<watch::Sender<bool>>,
}

impl WorkerPool {
    /// Spawn `workers` tasks (at least one) on the current runtime.
    pub fn start(workers: usize, ctx: WorkerContext) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let queue: Queue = Arc::new(Mutex::new(receiver));
        let (cancel, _) = watch::channel(false);
        let cancel = Arc::new(cancel);
        let ctx = Arc::new(ctx);

        let mut set = JoinSet::new();
        for id in 1..=workers.max(1) {
            set.spawn(work(
                id,
                Arc::clone(&queue),
                Arc::clone(&ctx),
                Arc::clone(&cancel),
            ));
        }
        tracing::debug!(workers = set.len(), "worker pool started");

        Self {
            sender,
            workers: set,
            cancel,
        }
    }

    /// Queue an account. Returns `false` once the pool has stopped accepting work.
    pub fn submit(&self, account: Account) -> bool {
        !self.is_cancelled() && self.sender.send(account).is_ok()
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Close the queue, wait for every worker and return the number of printed lines.
    pub async fn finish(self) -> Result<usize> {
        let Self {
            sender,
            mut workers,
            cancel: _cancel,
        } = self;
        drop(sender);

        let mut printed = 0;
        let mut first_err = None;
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(Ok(n)) => printed += n,
                Ok(Err(e)) => {
                    first_err.get_or_insert(e);
                }
                Err(e) => {
                    first_err.get_or_insert(Error::Worker(e.to_string()));
                }
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(printed),
        }
    }

    /// Stop all workers without draining the queue.
    pub async fn abort(mut self) {
        self.cancel.send_replace(true);
        self.workers.shutdown().await;
    }
}

async fn work(
    id: usize,
    queue: Queue,
    ctx: Arc<WorkerContext>,
    cancel: Arc<watch::Sender<bool>>,
) -> Result<usize> {
    let mut cancelled = cancel.subscribe();
    let mut printed = 0;
    tracing::debug!(worker = id, "worker started");

    loop {
        let next = {
            let mut queue = queue.lock().await;
            tokio::select! {
                biased;
                _ = cancelled.wait_for(|c| *c) => None,
                account = queue.recv() => account,
            }
        };
        let Some(account) = next else { break };

        match ctx.process(id, &account).await {
            Ok(true) => printed += 1,
            Ok(false) => {}
            Err(err @ Error::Resolution { .. }) if ctx.on_failure == ResolverFailure::Exit => {
                tracing::error!(worker = id, user = %account.username, "role lookup failed");
                eprintln!("{err}");
                std::process::exit(1);
            }
            Err(err) => {
                tracing::error!(
                    worker = id,
                    user = %account.username,
                    error = %err,
                    "worker stopping"
                );
                cancel.send_replace(true);
                return Err(err);
            }
        }
    }

    tracing::debug!(worker = id, printed, "worker finished");
    Ok(printed)
}
