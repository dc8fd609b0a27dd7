use crate::model::{Amount, Boat};
use serde::{Deserialize, Serialize};

/// The boats tracked during one run, in insertion order.
///
/// Names are not required to be unique. Every lookup is case-insensitive and resolves to the first
/// matching boat in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fleet {
    boats: Vec<Boat>,
}

/// The outcome of `Fleet::remove`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Removal {
    /// The boat that was removed.
    Removed(Boat),
    NotFound,
}

/// The outcome of `Fleet::authorize_expense`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expense {
    /// The expense was recorded. `spent` is the boat's new maintenance total.
    Authorized { spent: Amount },
    /// The expense would exceed the purchase price. Nothing was recorded.
    Rejected { remaining: Amount },
    NotFound,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a boat to the end of the fleet.
    pub fn add(&mut self, boat: Boat) {
        self.boats.push(boat);
    }

    /// Removes the first boat whose name matches `name`, ignoring case.
    pub fn remove(&mut self, name: &str) -> Removal {
        match self.position(name) {
            Some(ix) => Removal::Removed(self.boats.remove(ix)),
            None => Removal::NotFound,
        }
    }

    /// Finds the first boat whose name matches `name`, ignoring case.
    pub fn find(&self, name: &str) -> Option<&Boat> {
        self.boats.iter().find(|boat| boat.is_named(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Boat> {
        self.boats.iter_mut().find(|boat| boat.is_named(name))
    }

    /// Looks up a boat by name and tries to record `amount` against its maintenance budget.
    pub fn authorize_expense(&mut self, name: &str, amount: Amount) -> Expense {
        let Some(boat) = self.find_mut(name) else {
            return Expense::NotFound;
        };
        if boat.authorize_expense(amount) {
            Expense::Authorized {
                spent: boat.maintenance_spent(),
            }
        } else {
            Expense::Rejected {
                remaining: boat.remaining_budget(),
            }
        }
    }

    /// The sum of purchase prices and the sum of maintenance spend, in that order.
    ///
    /// `None` if either sum is too large to represent.
    pub fn totals(&self) -> Option<(Amount, Amount)> {
        let paid = Amount::checked_sum(self.boats.iter().map(Boat::purchase_price))?;
        let spent = Amount::checked_sum(self.boats.iter().map(Boat::maintenance_spent))?;
        Some((paid, spent))
    }

    pub fn is_empty(&self) -> bool {
        self.boats.is_empty()
    }

    pub fn len(&self) -> usize {
        self.boats.len()
    }

    pub fn boats(&self) -> &[Boat] {
        &self.boats
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Boat> {
        self.boats.iter()
    }

    pub fn into_boats(self) -> Vec<Boat> {
        self.boats
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.boats.iter().position(|boat| boat.is_named(name))
    }
}

impl From<Vec<Boat>> for Fleet {
    fn from(boats: Vec<Boat>) -> Self {
        Self { boats }
    }
}

impl FromIterator<Boat> for Fleet {
    fn from_iter<I: IntoIterator<Item = Boat>>(iter: I) -> Self {
        Self {
            boats: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Fleet {
    type Item = &'a Boat;
    type IntoIter = std::slice::Iter<'a, Boat>;

    fn into_iter(self) -> Self::IntoIter {
        self.boats.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoatType;

    fn boat(name: &str, price: i64) -> Boat {
        Boat::new(BoatType::Sailing, name, 2015, "Catalina 22", 22.0, Amount::from(price))
    }

    fn names(fleet: &Fleet) -> Vec<&str> {
        fleet.iter().map(Boat::name).collect()
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut fleet = Fleet::new();
        assert!(fleet.is_empty());
        fleet.add(boat("Orion", 15000));
        fleet.add(boat("Seeker", 22000));
        fleet.add(boat("Breeze", 1000));
        assert_eq!(names(&fleet), vec!["Orion", "Seeker", "Breeze"]);
        assert_eq!(fleet.len(), 3);
    }

    #[test]
    fn test_remove_is_case_insensitive() {
        let mut fleet: Fleet = vec![boat("Orion", 1), boat("Seeker", 2)].into();
        match fleet.remove("sEEKER") {
            Removal::Removed(removed) => assert_eq!(removed.name(), "Seeker"),
            Removal::NotFound => panic!("expected Seeker to be removed"),
        }
        assert_eq!(names(&fleet), vec!["Orion"]);
    }

    #[test]
    fn test_remove_missing_leaves_fleet_unchanged() {
        let mut fleet: Fleet = vec![boat("Orion", 1), boat("Seeker", 2)].into();
        let before = fleet.clone();
        assert_eq!(fleet.remove("Nautilus"), Removal::NotFound);
        assert_eq!(fleet.remove("Nautilus"), Removal::NotFound);
        assert_eq!(fleet, before);
    }

    #[test]
    fn test_duplicate_names_resolve_to_first() {
        let mut fleet: Fleet = vec![boat("Twin", 100), boat("twin", 200)].into();
        assert_eq!(fleet.find("TWIN").unwrap().purchase_price(), Amount::from(100));
        let _ = fleet.remove("twin");
        assert_eq!(fleet.find("twin").unwrap().purchase_price(), Amount::from(200));
    }

    #[test]
    fn test_authorize_expense_outcomes() {
        let mut fleet: Fleet = vec![boat("Orion", 15000)].into();
        assert_eq!(
            fleet.authorize_expense("orion", Amount::from(5000)),
            Expense::Authorized {
                spent: Amount::from(5000)
            }
        );
        assert_eq!(
            fleet.authorize_expense("Orion", Amount::from(11000)),
            Expense::Rejected {
                remaining: Amount::from(10000)
            }
        );
        assert_eq!(
            fleet.authorize_expense("Nautilus", Amount::from(1)),
            Expense::NotFound
        );
        assert_eq!(
            fleet.find("Orion").unwrap().maintenance_spent(),
            Amount::from(5000)
        );
    }

    #[test]
    fn test_totals() {
        assert_eq!(Fleet::new().totals(), Some((Amount::ZERO, Amount::ZERO)));

        let mut fleet: Fleet = vec![boat("Orion", 15000), boat("Seeker", 22000)].into();
        let _ = fleet.authorize_expense("Seeker", Amount::from(250));
        assert_eq!(
            fleet.totals(),
            Some((Amount::from(37000), Amount::from(250)))
        );
    }

    #[test]
    fn test_totals_too_large() {
        let huge = Boat::new(
            BoatType::Power,
            "Big",
            2020,
            "X",
            20.0,
            "79228162514264337593543950335".parse().unwrap(),
        );
        let fleet: Fleet = vec![huge, boat("Orion", 1)].into();
        assert_eq!(fleet.totals(), None);
    }
}
