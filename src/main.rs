use clap::Parser;
use fleet_manager::args::{Args, Command};
use fleet_manager::{commands, Config, Result};
use std::io;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Log target prefix of everything in the library crate.
const LIB_TARGET: &str = "fleet_manager";

fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let mut config = Config::load(args.common().fleet_home().path())?;
    if let Some(snapshot) = args.common().snapshot() {
        config = config.with_snapshot_path(snapshot);
    }
    debug!("Using snapshot {}", config.snapshot_path().display());

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Run(run_args) => commands::run(
            &config,
            run_args.csv(),
            run_args.policy(),
            io::stdin().lock(),
            io::stdout().lock(),
        )?
        .print(),

        Command::Import(import_args) => {
            commands::import(&config, import_args.csv(), import_args.policy())?.print()
        }

        Command::Print => commands::print(&config)?.print(),

        Command::Add(add_args) => commands::add(&config, add_args.csv_line())?.print(),

        Command::Remove(remove_args) => commands::remove(&config, remove_args.name())?.print(),

        Command::Expense(expense_args) => {
            commands::expense(&config, expense_args.name(), expense_args.amount())?.print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for the library and binary only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                LIB_TARGET,
                level,
                env!("CARGO_CRATE_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
