//! `sitecrew` binary entry point.

mod cli;
mod commands;
mod error;
mod output;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sitecrew_config::{Backend, Config, load_config_or_default};
use sitecrew_core::store::{MemoryStore, PostgrestStore, SheetsStore};
use sitecrew_core::{Coordinator, EntityStore};

use cli::{BackendOpt, Cli, Command, GlobalOpts, OutputFormat};
use error::CliError;

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sitecrew={default}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Fold CLI overrides into the loaded config.
fn apply_overrides(mut cfg: Config, global: &GlobalOpts) -> Config {
    if let Some(backend) = global.backend {
        cfg.backend = match backend {
            BackendOpt::Memory => Backend::Memory,
            BackendOpt::Sheets => Backend::Sheets,
            BackendOpt::Postgrest => Backend::Postgrest,
        };
    }
    if let Some(timeout) = global.timeout {
        cfg.defaults.timeout = timeout;
    }
    cfg
}

fn build_store(cfg: &Config) -> Result<Arc<dyn EntityStore>, CliError> {
    match cfg.backend {
        Backend::Memory => Ok(Arc::new(MemoryStore::new())),
        Backend::Sheets => {
            let client = sitecrew_config::sheets_client(cfg)?;
            Ok(Arc::new(SheetsStore::new(client)))
        }
        Backend::Postgrest => {
            let client = sitecrew_config::postgrest_client(cfg)?;
            Ok(Arc::new(PostgrestStore::new(client)))
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let global = &cli.global;

    // Config subcommands don't need a store.
    let command = match cli.command {
        Command::Config(args) => return commands::config_cmd::handle(args, global),
        other => other,
    };

    let cfg = apply_overrides(load_config_or_default(), global);
    let store = build_store(&cfg)?;
    let coordinator = Coordinator::new(store);

    match command {
        Command::Sites(args) => commands::sites::handle(&coordinator, args, global).await,
        Command::Personnel(args) => commands::personnel::handle(&coordinator, args, global).await,
        Command::Certs(args) => commands::certs::handle(&coordinator, args, global).await,
        Command::Assign(args) => commands::assign::assign(&coordinator, args, global).await,
        Command::Unassign(args) => commands::assign::unassign(&coordinator, args, global).await,
        Command::Stats => commands::stats::handle(&coordinator, global).await,
        Command::Config(_) => Ok(()),
    }
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);
    let format = cli.global.output.clone();

    match run(cli).await {
        Ok(()) => Ok(()),
        Err(err) => {
            let code = err.exit_code();
            let json = matches!(format, OutputFormat::Json | OutputFormat::JsonCompact);
            // In JSON modes domain failures go to stdout in the same
            // envelope as successes, so scripts parse one stream.
            match err {
                CliError::Domain { ref source, .. } if json => {
                    let compact = matches!(format, OutputFormat::JsonCompact);
                    println!("{}", output::render_failure(source, compact));
                }
                other => {
                    let report: miette::Report = other.into();
                    eprintln!("{report:?}");
                }
            }
            std::process::exit(code);
        }
    }
}
