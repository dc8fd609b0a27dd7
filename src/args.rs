//! These structs provide the CLI interface for the fleet CLI.

use crate::import::ImportPolicy;
use crate::model::Amount;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// fleet: keep track of a fleet of boats and what is spent maintaining them.
///
/// Boats are loaded from a CSV file or from the saved fleet data, managed through a small menu,
/// and saved again on exit. Each boat may be maintained for up to its purchase price, and no
/// expense is authorized past that.
///
/// Run without a subcommand to start the interactive menu.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    /// The subcommand, `Command::Run` without a CSV file when none was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run(RunArgs::default()))
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the interactive menu. This is what happens when no subcommand is given.
    ///
    /// With a CSV file the fleet is populated from it, otherwise from the saved fleet data. The
    /// fleet is saved when you exit the menu.
    Run(RunArgs),
    /// Replace the saved fleet with the boats in a CSV file.
    Import(ImportArgs),
    /// Print the fleet report.
    Print,
    /// Add one boat, given as a CSV line: category,name,year,make/model,length,price
    Add(AddArgs),
    /// Remove a boat by name (ignoring case).
    Remove(RemoveArgs),
    /// Request a maintenance expense for a boat.
    Expense(ExpenseArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, global = true, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where fleet data and configuration is held. Defaults to ~/fleet
    #[arg(long, global = true, env = "FLEET_HOME", default_value_t = default_fleet_home())]
    fleet_home: DisplayPath,

    /// Use this snapshot file instead of the one named in config.json.
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn fleet_home(&self) -> &DisplayPath {
        &self.fleet_home
    }

    pub fn snapshot(&self) -> Option<&Path> {
        self.snapshot.as_deref()
    }
}

/// (Not shown): Args for the `fleet run` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct RunArgs {
    /// A CSV file to populate the fleet from instead of the saved fleet data.
    csv: Option<PathBuf>,

    /// Skip malformed lines instead of rejecting the whole file.
    #[arg(long)]
    skip_invalid: bool,
}

impl RunArgs {
    pub fn csv(&self) -> Option<&Path> {
        self.csv.as_deref()
    }

    pub fn policy(&self) -> ImportPolicy {
        policy(self.skip_invalid)
    }
}

/// (Not shown): Args for the `fleet import` command.
#[derive(Debug, Parser, Clone)]
pub struct ImportArgs {
    /// The CSV file to import.
    csv: PathBuf,

    /// Skip malformed lines instead of rejecting the whole file.
    #[arg(long)]
    skip_invalid: bool,
}

impl ImportArgs {
    pub fn csv(&self) -> &Path {
        &self.csv
    }

    pub fn policy(&self) -> ImportPolicy {
        policy(self.skip_invalid)
    }
}

/// (Not shown): Args for the `fleet add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// The boat as a CSV line, for example: "Power,Seeker,2020,Bayliner 19,19.5,22000.00"
    csv_line: String,
}

impl AddArgs {
    pub fn csv_line(&self) -> &str {
        &self.csv_line
    }
}

/// (Not shown): Args for the `fleet remove` command.
#[derive(Debug, Parser, Clone)]
pub struct RemoveArgs {
    /// The name of the boat to remove.
    name: String,
}

impl RemoveArgs {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// (Not shown): Args for the `fleet expense` command.
#[derive(Debug, Parser, Clone)]
pub struct ExpenseArgs {
    /// The name of the boat to spend on.
    name: String,

    /// How much to spend, for example 1500 or 1500.00
    #[arg(allow_negative_numbers = true)]
    amount: Amount,
}

impl ExpenseArgs {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

fn policy(skip_invalid: bool) -> ImportPolicy {
    if skip_invalid {
        ImportPolicy::SkipAndCollect
    } else {
        ImportPolicy::AbortOnFirstError
    }
}

fn default_fleet_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("fleet"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --fleet-home or FLEET_HOME instead of relying on the default \
                fleet home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("fleet")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
