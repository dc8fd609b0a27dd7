use crate::commands::{boats, save_fleet, Out};
use crate::import::{import_file, Import, ImportPolicy};
use crate::model::Fleet;
use crate::{Config, Result};
use std::path::Path;

/// Replaces the saved fleet with the boats decoded from the CSV file at `csv`.
///
/// Under `ImportPolicy::AbortOnFirstError` a single bad line fails the command and the existing
/// snapshot is left untouched.
pub fn import(config: &Config, csv: &Path, policy: ImportPolicy) -> Result<Out<Import>> {
    let import = import_file(csv, policy)?;
    let fleet: Fleet = import.boats.iter().cloned().collect();
    let path = save_fleet(config, &fleet)?;

    let mut message = format!(
        "Imported {} from {} into {}",
        boats(fleet.len()),
        csv.display(),
        path.display()
    );
    let skipped = import.rejected.len();
    if skipped > 0 {
        let plural = if skipped == 1 { "" } else { "s" };
        message.push_str(&format!(", skipped {skipped} malformed line{plural}"));
    }
    Ok(Out::new(message, import))
}
