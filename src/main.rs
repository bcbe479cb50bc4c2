//! ocm-users binary entry point.
//!
//! Parses the command line, installs the stderr log subscriber and runs the
//! selected command, reporting any top-level error on stderr.
//!
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ocm_users::cli::Cli;

/// Log to stderr so the table on stdout stays clean. `RUST_LOG` overrides `--debug`.
fn init_tracing(debug: bool) {
    let fallback = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug());

    if let Err(err) = cli.execute().await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
