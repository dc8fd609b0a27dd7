//! Configuration file handling for the fleet home directory.
//!
//! The configuration file is stored at `$FLEET_HOME/config.json`. It holds the number of snapshot
//! backups to keep and, optionally, where the snapshot lives.

use crate::backup::Backup;
use crate::error::{ErrorType, IntoResult};
use crate::{utils, Result};
use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "fleet";
const CONFIG_VERSION: u8 = 1;
const BACKUP_COPIES: u32 = 5;
const BACKUPS: &str = ".backups";
const CONFIG_JSON: &str = "config.json";
const FLEET_DATA_JSON: &str = "fleet-data.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$FLEET_HOME` and from there it loads `$FLEET_HOME/config.json`, creating the
/// directory and a default config file on first use.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    backups: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    snapshot_path: PathBuf,
}

impl Config {
    /// This will
    /// - create `fleet_home` and its backups directory if they are missing
    /// - write a default config file if there is none
    /// - load and validate the config file
    ///
    /// # Errors
    /// - `ErrorType::Config` if a directory cannot be created or the config file cannot be
    ///   written, read or parsed.
    pub fn load(fleet_home: impl Into<PathBuf>) -> Result<Self> {
        Self::load_inner(fleet_home.into()).pub_result(ErrorType::Config)
    }

    fn load_inner(fleet_home: PathBuf) -> anyhow::Result<Self> {
        utils::create_dir_all(&fleet_home).context("Unable to create the fleet home directory")?;
        let root = fleet_home
            .canonicalize()
            .with_context(|| format!("Unable to resolve {}", fleet_home.display()))?;

        let backups = root.join(BACKUPS);
        utils::create_dir_all(&backups)?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            debug!("Writing default config to {}", config_path.display());
            ConfigFile::default().save(&config_path)?;
        }
        let config_file = ConfigFile::load(&config_path)?;
        let snapshot_path = resolve(&root, config_file.snapshot_path());

        Ok(Self {
            root,
            backups,
            config_path,
            config_file,
            snapshot_path,
        })
    }

    /// Replaces the snapshot path for this run only. Relative paths are kept as given, i.e. they
    /// are relative to the working directory like any other command line path.
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = path.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups(&self) -> &Path {
        &self.backups
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    pub fn backup_copies(&self) -> u32 {
        self.config_file.backup_copies
    }

    /// Creates a new `Backup` instance for managing backup files.
    pub fn backup(&self) -> Backup {
        Backup::new(self)
    }
}

/// Returns `p` if it is absolute, otherwise `root.join(p)`.
fn resolve(root: &Path, p: PathBuf) -> PathBuf {
    if p.is_absolute() {
        return p;
    }
    root.join(p)
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "fleet",
///   "config_version": 1,
///   "backup_copies": 5,
///   "snapshot_path": "fleet-data.json"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "fleet"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Number of snapshot backups to keep, zero disables backups
    #[serde(default = "default_backup_copies")]
    backup_copies: u32,

    /// Path to the snapshot file (optional, relative to the fleet home or absolute)
    /// Defaults to $FLEET_HOME/fleet-data.json if not specified
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot_path: Option<PathBuf>,
}

fn default_backup_copies() -> u32 {
    BACKUP_COPIES
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            backup_copies: BACKUP_COPIES,
            snapshot_path: None,
        }
    }
}

impl ConfigFile {
    fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path)?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        ensure!(
            config.config_version <= CONFIG_VERSION,
            "Config file {} has version {} but only versions up to {} are supported",
            path.display(),
            config.config_version,
            CONFIG_VERSION
        );

        Ok(config)
    }

    fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(path, data).context("Unable to write config file")
    }

    /// Gets the snapshot path, relative to the fleet home unless it is absolute.
    fn snapshot_path(&self) -> PathBuf {
        self.snapshot_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(FLEET_DATA_JSON))
    }
}
