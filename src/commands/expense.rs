use crate::commands::{load_fleet, save_fleet, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::{Amount, Expense};
use crate::{Config, Result};
use anyhow::anyhow;

/// Authorizes spending `amount` on maintenance of the boat named `name`.
///
/// The expense is recorded and saved only if it keeps the boat's total maintenance spend within
/// its purchase price. Rejections and unknown names are outcomes, not errors.
///
/// # Errors
/// - `ErrorType::Input` if `amount` is negative.
/// - `ErrorType::Persistence` if the snapshot cannot be read or written.
pub fn expense(config: &Config, name: &str, amount: Amount) -> Result<Out<Expense>> {
    if amount.is_negative() {
        return Err(anyhow!("An expense cannot be negative, got {amount}"))
            .pub_result(ErrorType::Input);
    }

    let mut fleet = load_fleet(config)?;
    let outcome = fleet.authorize_expense(name, amount);
    let message = match outcome {
        Expense::Authorized { spent } => {
            save_fleet(config, &fleet)?;
            format!("Expense authorized. ${spent} spent.")
        }
        Expense::Rejected { remaining } => {
            format!("Expense not permitted, only ${remaining} left to spend.")
        }
        Expense::NotFound => format!("Cannot find boat {name}."),
    };
    Ok(Out::new(message, outcome))
}
