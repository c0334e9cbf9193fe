//! metastage CLI - staged metadata-change generator
//!
//! Usage: metastage <COMMAND>
//!
//! Commands:
//!   stage        Stage one entity's change proposals
//!   stage-batch  Stage a list of entities
//!   diff         Preview staged changes without writing
//!   check        Validate an entity descriptor

mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use metastage::commands::check::{self, CheckArgs};
use metastage::commands::diff::{self, DiffArgs};
use metastage::commands::stage::{self, StageArgs};
use metastage::config::Config;
use metastage::output::Reporter;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let reporter = Reporter::new(cli.json);
    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            reporter.error(&err.to_string());
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Stage {
            file,
            kind,
            environment,
            owner,
            base_dir,
            layout,
            dry_run,
            skip_aspects,
        } => stage::run(
            &config,
            StageArgs {
                file,
                kind,
                environment,
                owner,
                base_dir,
                layout,
                dry_run,
                skip_aspects,
            },
            &reporter,
        ),
        Commands::StageBatch {
            file,
            kind,
            environment,
            owner,
            base_dir,
            layout,
            skip_aspects,
        } => stage::run_batch(
            &config,
            StageArgs {
                file,
                kind,
                environment,
                owner,
                base_dir,
                layout,
                dry_run: false,
                skip_aspects,
            },
            &reporter,
        ),
        Commands::Diff {
            file,
            kind,
            environment,
            owner,
            base_dir,
        } => diff::run(
            &config,
            DiffArgs {
                file,
                kind,
                environment,
                owner,
                base_dir,
            },
            &reporter,
        ),
        Commands::Check { file, kind } => check::run(&config, CheckArgs { file, kind }, &reporter),
    };

    std::process::exit(code);
}

fn load_config() -> anyhow::Result<Config> {
    let cwd = std::env::current_dir()?;
    Ok(Config::load(&cwd)?)
}

/// `-v` raises verbosity; `RUST_LOG` wins when set.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
