//! Undoable CLI
//!
//! Runs file system plans as undoable run-queues.

use clap::Parser;
use undoable::cli::{
    args::{Cli, Commands},
    commands::{check, run, trash},
};
use undoable::models::config::{self, Config};

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Run {
            plan_file,
            root,
            gracefully,
            keep_on_failure,
        } => {
            let options = run::RunOptions {
                gracefully,
                keep_on_failure,
            };
            if !run::run(&plan_file, &root, &config, options)? {
                anyhow::bail!("Plan did not complete successfully");
            }
        }

        Commands::Check { plan_file } => {
            check::check(&plan_file)?;
        }

        Commands::Trash { root } => {
            trash::list_trash(&root, &config)?;
        }
    }

    Ok(())
}

/// Load the configuration given on the command line, or the default one.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    match cli.config {
        Some(ref path) => Ok(config::load_config_file(path)?),
        None => Ok(config::load_config()),
    }
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("undoable=debug")
    } else {
        EnvFilter::new("undoable=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
