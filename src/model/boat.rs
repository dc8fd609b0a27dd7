use crate::model::Amount;
use anyhow::{bail, ensure};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The kind of boat. Fixed when the boat is created.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoatType {
    Sailing,
    Power,
}

serde_plain::derive_display_from_serialize!(BoatType);

impl FromStr for BoatType {
    type Err = anyhow::Error;

    /// Case-insensitive, ignoring surrounding whitespace: `sailing`, `Sailing` and `SAILING` all
    /// parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sailing" => Ok(BoatType::Sailing),
            "power" => Ok(BoatType::Power),
            _ => bail!("'{s}' is not a boat type, expected 'Sailing' or 'Power'"),
        }
    }
}

/// A single boat in the fleet.
///
/// Everything except `maintenance_spent` is fixed at creation. `maintenance_spent` only ever grows,
/// and never beyond `purchase_price`, which acts as the authorization ceiling for the lifetime
/// maintenance spend on the boat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Boat {
    boat_type: BoatType,
    name: String,
    year: i32,
    make_model: String,
    length_feet: f64,
    purchase_price: Amount,
    maintenance_spent: Amount,
}

impl Boat {
    /// Creates a boat with nothing spent on maintenance yet. Ranges are not validated here, that is
    /// the job of whatever decoded the raw input.
    pub fn new(
        boat_type: BoatType,
        name: impl Into<String>,
        year: i32,
        make_model: impl Into<String>,
        length_feet: f64,
        purchase_price: Amount,
    ) -> Self {
        Self {
            boat_type,
            name: name.into(),
            year,
            make_model: make_model.into(),
            length_feet,
            purchase_price,
            maintenance_spent: Amount::ZERO,
        }
    }

    pub fn boat_type(&self) -> BoatType {
        self.boat_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn make_model(&self) -> &str {
        &self.make_model
    }

    pub fn length_feet(&self) -> f64 {
        self.length_feet
    }

    pub fn purchase_price(&self) -> Amount {
        self.purchase_price
    }

    pub fn maintenance_spent(&self) -> Amount {
        self.maintenance_spent
    }

    /// Case-insensitive comparison against the boat's name.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// Adds `amount` to the maintenance spend if the new total stays within the purchase price.
    ///
    /// Returns `false` and leaves the boat untouched otherwise. Only the ceiling is guarded here;
    /// callers reject negative amounts before getting this far.
    /// A total too large to represent is rejected like any other expense over the ceiling.
    pub fn authorize_expense(&mut self, amount: Amount) -> bool {
        match self.maintenance_spent.checked_add(amount) {
            Some(total) if total <= self.purchase_price => {
                self.maintenance_spent = total;
                true
            }
            _ => false,
        }
    }

    /// What can still be spent before reaching the purchase price.
    pub fn remaining_budget(&self) -> Amount {
        self.purchase_price.saturating_sub(self.maintenance_spent)
    }

    /// Checks the values a boat read from storage must satisfy: a finite, non-negative length, a
    /// non-negative price and a maintenance spend between zero and the price.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.length_feet.is_finite() && self.length_feet >= 0.0,
            "length_feet must be a non-negative number but was {}",
            self.length_feet
        );
        ensure!(
            !self.purchase_price.is_negative(),
            "purchase_price must not be negative but was {}",
            self.purchase_price
        );
        ensure!(
            !self.maintenance_spent.is_negative(),
            "maintenance_spent must not be negative but was {}",
            self.maintenance_spent
        );
        ensure!(
            self.maintenance_spent <= self.purchase_price,
            "maintenance_spent {} exceeds purchase_price {}",
            self.maintenance_spent,
            self.purchase_price
        );
        Ok(())
    }
}

impl Display for Boat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // f64::round goes half away from zero, plain `{:.0}` would round half to even.
        let length = self.length_feet.round();
        write!(
            f,
            "{:<8} {:<20} {:>4} {:<12} {:>3.0}' : Paid ${:>10} : Spent ${:>10}",
            self.boat_type.to_string(),
            self.name,
            self.year,
            self.make_model,
            length,
            self.purchase_price.to_string(),
            self.maintenance_spent.to_string(),
        )
    }
}
