//! Command handlers for the fleet CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod add;
mod expense;
mod import;
mod print;
mod remove;
mod run;

use crate::model::Fleet;
use crate::{snapshot, Config, Result};
use serde::Serialize;
use std::fmt::Debug;
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub use add::add;
pub use expense::expense;
pub use import::import;
pub use print::{print, report, FleetReport};
pub use remove::remove;
pub use run::run;

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Loads the fleet from the configured snapshot, or an empty fleet if there is none yet.
fn load_fleet(config: &Config) -> Result<Fleet> {
    Ok(snapshot::load(config.snapshot_path())?.into_fleet())
}

/// Backs up the current snapshot (if any) and replaces it with `fleet`.
///
/// A failed backup is logged and does not prevent the save.
fn save_fleet(config: &Config, fleet: &Fleet) -> Result<PathBuf> {
    let path = config.snapshot_path();
    match config.backup().copy_snapshot(path) {
        Ok(Some(backup_path)) => debug!("Saved backup to {}", backup_path.display()),
        Ok(None) => {}
        Err(e) => warn!("Unable to back up {} before saving: {e:#}", path.display()),
    }
    snapshot::save(fleet, path)?;
    Ok(path.to_path_buf())
}

/// "1 boat", "2 boats".
fn boats(count: usize) -> String {
    format!("{count} boat{}", if count == 1 { "" } else { "s" })
}
