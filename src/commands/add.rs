use crate::commands::{load_fleet, save_fleet, Out};
use crate::import::decode;
use crate::model::Boat;
use crate::{Config, Result};

/// Decodes `csv_line` into a boat, appends it to the saved fleet and saves.
///
/// # Errors
/// - `ErrorType::MalformedRecord` if `csv_line` does not decode. Nothing is saved.
/// - `ErrorType::Persistence` if the snapshot cannot be read or written.
pub fn add(config: &Config, csv_line: &str) -> Result<Out<Boat>> {
    let boat = decode(csv_line)?;
    let mut fleet = load_fleet(config)?;
    fleet.add(boat.clone());
    save_fleet(config, &fleet)?;
    Ok(Out::new(format!("{} added successfully.", boat.name()), boat))
}
