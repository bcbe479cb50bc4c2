//! Command line definition and dispatch.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use crate::app::{self, RunOptions};
use crate::error::Error;
use crate::output::StdoutSink;
use crate::remote::session;

/// Inspect organization accounts and the roles bound to them
#[derive(Debug, Parser)]
#[command(name = "ocm-users", version, about, long_about = None)]
pub struct Cli {
    /// Session file written by the `login` command. Defaults to ~/.ocm.json
    #[arg(long, env = "OCM_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Retrieve users and their roles
    ///
    /// Lists every user in the organization together with their roles.
    Users(UsersArgs),
}

#[derive(Debug, Args)]
pub struct UsersArgs {
    /// Enable debug mode
    #[arg(long)]
    pub debug: bool,

    /// Organization identifier. Defaults to the organization of the current user
    #[arg(long)]
    pub org: Option<String>,

    /// Role identifiers. Returns users with one or more of the specified roles,
    /// searching across organizations unless --org is given. Example: --roles=role1,role2
    #[arg(long, value_delimiter = ',')]
    pub roles: Vec<String>,

    /// Number of workers resolving roles concurrently
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub workers: u32,

    /// Size of page to return from the server
    #[arg(
        long = "pagesize",
        default_value_t = 100,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub page_size: u32,
}

impl UsersArgs {
    pub fn options(&self) -> RunOptions {
        RunOptions {
            org: self.org.clone(),
            roles: self.roles.iter().map(|r| r.trim().to_string()).collect(),
            workers: self.workers as usize,
            page_size: self.page_size as usize,
            ..RunOptions::default()
        }
    }
}

impl Cli {
    pub fn debug(&self) -> bool {
        match &self.command {
            Commands::Users(args) => args.debug,
        }
    }

    fn config_path(&self) -> Result<PathBuf, Error> {
        self.config
            .clone()
            .or_else(session::default_config_path)
            .ok_or_else(|| Error::config("Can't load config file: HOME is not set, use --config"))
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        match &self.command {
            Commands::Users(args) => users(args, self.config_path()?).await,
        }
    }
}

async fn users(args: &UsersArgs, config: PathBuf) -> anyhow::Result<()> {
    let connection = Arc::new(session::connect(&config)?);
    let summary = app::run(
        &args.options(),
        connection.clone(),
        connection,
        Arc::new(StdoutSink),
    )
    .await?;
    tracing::debug!(
        pages = summary.pages,
        accounts = summary.accounts,
        printed = summary.printed,
        "listing finished"
    );
    Ok(())
}
