//! Rotated copies of the snapshot, taken before a save replaces it.

use crate::{utils, Config};
use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};

/// Prefix for snapshot backup files.
pub const FLEET_DATA: &str = "fleet-data";

const EXTENSION: &str = "json";

/// Manages backup file creation and rotation.
///
/// The `Backup` struct is immutable and owns copies of the paths and settings it needs.
/// Create a new instance via `Config::backup()` or `Backup::new()`.
#[derive(Debug, Clone)]
pub struct Backup {
    backups_dir: PathBuf,
    backup_copies: u32,
}

impl Backup {
    /// Creates a new `Backup` instance from a `Config`.
    pub fn new(config: &Config) -> Self {
        Self {
            backups_dir: config.backups().to_path_buf(),
            backup_copies: config.backup_copies(),
        }
    }

    /// Copies the snapshot at `snapshot` into the backups directory.
    ///
    /// The filename format is `fleet-data.YYYY-MM-DD-NNN.json` where NNN is a sequence number.
    /// Automatically rotates old backups, keeping only `backup_copies` files.
    ///
    /// Returns the path to the created backup file, or `None` if there was nothing to back up or
    /// backups are disabled.
    pub fn copy_snapshot(&self, snapshot: &Path) -> Result<Option<PathBuf>> {
        if self.backup_copies == 0 || !snapshot.is_file() {
            return Ok(None);
        }

        let date = today();
        let seq = self.next_sequence_number(&date)?;
        let filename = format!("{FLEET_DATA}.{date}-{seq:03}.{EXTENSION}");
        let path = self.backups_dir.join(&filename);

        utils::copy(snapshot, &path)?;

        self.rotate()?;

        Ok(Some(path))
    }

    /// Scans the backups directory for existing files with the given date and returns the next
    /// sequence number.
    fn next_sequence_number(&self, date: &str) -> Result<u32> {
        let mut max_seq: u32 = 0;

        for entry in utils::read_dir(&self.backups_dir)? {
            let entry = entry.context("Failed to read directory entry")?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();

            if let Some(seq) = parse_sequence_number(&name, date) {
                max_seq = max_seq.max(seq);
            }
        }

        Ok(max_seq + 1)
    }

    /// Rotates old backup files, keeping only `backup_copies` files.
    fn rotate(&self) -> Result<()> {
        let mut files: Vec<(String, u32, PathBuf)> = Vec::new();

        for entry in utils::read_dir(&self.backups_dir)? {
            let entry = entry.context("Failed to read directory entry")?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();

            if let Some((date, seq)) = parse_backup_name(&name) {
                files.push((date.to_string(), seq, entry.path()));
            }
        }

        // Oldest first. The sequence number is compared as a number, it can outgrow its padding.
        files.sort();

        let to_delete = files.len().saturating_sub(self.backup_copies as usize);
        for (_, _, path) in files.into_iter().take(to_delete) {
            utils::remove(&path)?;
        }

        Ok(())
    }
}

/// Returns today's date in YYYY-MM-DD format.
fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Splits a backup filename into its date and sequence number.
/// Returns None if the filename doesn't match the expected pattern.
fn parse_backup_name(filename: &str) -> Option<(&str, u32)> {
    let stem = filename
        .strip_prefix(&format!("{FLEET_DATA}."))?
        .strip_suffix(&format!(".{EXTENSION}"))?;
    let (date, seq) = stem.rsplit_once('-')?;
    Some((date, seq.parse().ok()?))
}

/// The sequence number of a backup taken on `date`.
fn parse_sequence_number(filename: &str, date: &str) -> Option<u32> {
    parse_backup_name(filename)
        .filter(|(backup_date, _)| *backup_date == date)
        .map(|(_, seq)| seq)
}
