mod commands;
mod setup;

use anyhow::{bail, Context, Result};
use clap::Parser;
use flatdb::config::FlatDbConfig;
use flatdb::{Store, StoreOptions};
use setup::Cli;
use std::io;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        if !path.exists() {
            bail!("config file '{}' does not exist", path.display());
        }
    }
    let config = FlatDbConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    init_logging(&config.log_level, cli.verbose);

    let root = cli.root.clone().unwrap_or(config.root);
    debug!(root = %root.display(), "opening store");
    let store = Store::open(&root, StoreOptions::default())
        .with_context(|| format!("failed to open store at '{}'", root.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    commands::execute(&store, cli.command, &mut out)
}

/// Installs a stderr tracing subscriber.
/// - Respects `RUST_LOG` if set
/// - Otherwise uses the configured level, or `info` with `--verbose`
fn init_logging(default_level: &str, verbose: bool) {
    let fallback = if verbose { "info" } else { default_level };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .try_init();
}
