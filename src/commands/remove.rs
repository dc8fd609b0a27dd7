use crate::commands::{load_fleet, save_fleet, Out};
use crate::model::Removal;
use crate::{Config, Result};

/// Removes the first boat named `name` (ignoring case) from the saved fleet.
///
/// A name that matches nothing is not an error, the fleet is left alone and the outcome is
/// `Removal::NotFound`. The snapshot is only rewritten when something was removed.
pub fn remove(config: &Config, name: &str) -> Result<Out<Removal>> {
    let mut fleet = load_fleet(config)?;
    let removal = fleet.remove(name);
    let message = match &removal {
        Removal::Removed(boat) => {
            save_fleet(config, &fleet)?;
            format!("{} removed successfully.", boat.name())
        }
        Removal::NotFound => format!("Cannot find boat {name}."),
    };
    Ok(Out::new(message, removal))
}
