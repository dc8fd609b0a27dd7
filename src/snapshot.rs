//! Saving and loading the whole fleet as a single snapshot file.
//!
//! The snapshot is a JSON document:
//!
//! ```json
//! {
//!   "app_name": "fleet",
//!   "snapshot_version": 1,
//!   "saved_at": "2026-10-19T08:15:00Z",
//!   "boats": [
//!     {
//!       "boat_type": "SAILING",
//!       "name": "Orion",
//!       "year": 2015,
//!       "make_model": "Catalina 22",
//!       "length_feet": 22.0,
//!       "purchase_price": "15000.00",
//!       "maintenance_spent": "5000"
//!     }
//!   ]
//! }
//! ```

use crate::error::{ErrorType, IntoResult};
use crate::model::{Boat, Fleet};
use crate::{utils, Result};
use anyhow::{ensure, Context};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

const APP_NAME: &str = "fleet";
const SNAPSHOT_VERSION: u8 = 1;

/// The outcome of `load`.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    /// A snapshot was read.
    Found(Fleet),
    /// Nothing exists at the snapshot path yet, which is normal on a first run.
    Absent,
}

impl Loaded {
    /// The loaded fleet, or an empty one when there was no snapshot.
    pub fn into_fleet(self) -> Fleet {
        match self {
            Loaded::Found(fleet) => fleet,
            Loaded::Absent => Fleet::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile<'a> {
    app_name: String,
    snapshot_version: u8,
    saved_at: DateTime<Utc>,
    boats: Cow<'a, [Boat]>,
}

/// Writes every boat in `fleet`, in order, to `path`, replacing whatever was there.
///
/// The data is written to a temporary file next to `path` which is then renamed over it, so a
/// failed save never leaves a half-written snapshot behind. Missing parent directories are
/// created.
///
/// # Errors
/// - `ErrorType::Persistence` if anything goes wrong. `fleet` is not touched either way.
pub fn save(fleet: &Fleet, path: impl AsRef<Path>) -> Result<()> {
    save_inner(fleet, path.as_ref()).pub_result(ErrorType::Persistence)
}

/// Reads the snapshot at `path`.
///
/// # Errors
/// - `ErrorType::Persistence` if the file exists but cannot be read, is not a fleet snapshot, or
///   was written by an unsupported snapshot version.
pub fn load(path: impl AsRef<Path>) -> Result<Loaded> {
    load_inner(path.as_ref()).pub_result(ErrorType::Persistence)
}

fn save_inner(fleet: &Fleet, path: &Path) -> anyhow::Result<()> {
    let snapshot = SnapshotFile {
        app_name: APP_NAME.to_string(),
        snapshot_version: SNAPSHOT_VERSION,
        saved_at: Utc::now(),
        boats: Cow::Borrowed(fleet.boats()),
    };
    let json = serde_json::to_string_pretty(&snapshot).context("Unable to serialize the fleet")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        utils::create_dir_all(parent)?;
    }
    let tmp_path = utils::tmp_path(path);
    utils::write_synced(&tmp_path, json.as_bytes())?;
    if let Err(e) = utils::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e);
    }

    debug!("Saved {} boats to {}", fleet.len(), path.display());
    Ok(())
}

fn load_inner(path: &Path) -> anyhow::Result<Loaded> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No snapshot at {}", path.display());
            return Ok(Loaded::Absent);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Unable to read snapshot {}", path.display()))
        }
    };

    let snapshot: SnapshotFile<'static> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;

    ensure!(
        snapshot.app_name == APP_NAME,
        "Invalid app_name in snapshot {}: expected '{}', got '{}'",
        path.display(),
        APP_NAME,
        snapshot.app_name
    );
    ensure!(
        snapshot.snapshot_version == SNAPSHOT_VERSION,
        "Snapshot {} has version {} but only version {} is supported",
        path.display(),
        snapshot.snapshot_version,
        SNAPSHOT_VERSION
    );

    for (ix, boat) in snapshot.boats.iter().enumerate() {
        boat.validate().with_context(|| {
            format!(
                "Boat {} ('{}') in snapshot {} is invalid",
                ix + 1,
                boat.name(),
                path.display()
            )
        })?;
    }

    let fleet: Fleet = snapshot.boats.into_owned().into();
    debug!(
        "Loaded {} boats saved at {} from {}",
        fleet.len(),
        snapshot.saved_at,
        path.display()
    );
    Ok(Loaded::Found(fleet))
}
