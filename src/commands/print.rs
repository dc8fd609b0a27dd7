use crate::commands::{load_fleet, Out};
use crate::model::{Amount, Boat, Fleet};
use crate::{Config, Result};
use serde::Serialize;

/// The structured form of the fleet report. The totals are `None` when they are too large to
/// represent.
#[derive(Debug, Clone, Serialize)]
pub struct FleetReport {
    pub boats: Vec<Boat>,
    pub total_paid: Option<Amount>,
    pub total_spent: Option<Amount>,
}

/// Prints every boat in the saved fleet followed by the purchase and maintenance totals.
pub fn print(config: &Config) -> Result<Out<FleetReport>> {
    let fleet = load_fleet(config)?;
    let totals = fleet.totals();
    let message = report(&fleet);
    Ok(Out::new(
        message,
        FleetReport {
            boats: fleet.into_boats(),
            total_paid: totals.map(|(paid, _)| paid),
            total_spent: totals.map(|(_, spent)| spent),
        },
    ))
}

/// Renders the fleet report: a header, one line per boat and a line of totals aligned under the
/// monetary columns.
pub fn report(fleet: &Fleet) -> String {
    if fleet.is_empty() {
        return String::from("No boats are in the fleet.");
    }

    let mut lines = vec![String::from("Fleet report:")];
    lines.extend(fleet.iter().map(Boat::to_string));
    lines.push(match fleet.totals() {
        Some((paid, spent)) => format!(
            "{:<53}: Paid ${:>10} : Spent ${:>10}",
            "Total",
            paid.to_string(),
            spent.to_string()
        ),
        None => format!("{:<53}: too large to add up", "Total"),
    });
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{test_fleet, TestEnv};

    #[test]
    fn test_report_empty() {
        assert_eq!(report(&Fleet::new()), "No boats are in the fleet.");
    }

    #[test]
    fn test_report_totals_line_up() {
        let mut fleet = test_fleet();
        let _ = fleet.authorize_expense("Orion", Amount::from(5000));
        let report = report(&fleet);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Fleet report:");
        assert!(lines[1].starts_with("SAILING  Orion"));
        assert!(lines[2].starts_with("POWER    Seeker"));
        assert_eq!(
            lines[3],
            "Total                                                : Paid $  37000.00 : Spent $   5000.00"
        );
        // The totals sit in the same columns as the boat lines.
        assert_eq!(lines[1].len(), lines[3].len());
        assert_eq!(lines[1].find(": Paid"), lines[3].find(": Paid"));
    }

    #[test]
    fn test_print_without_snapshot() {
        let env = TestEnv::new();
        let out = print(&env.config()).unwrap();
        assert_eq!(out.message(), "No boats are in the fleet.");
        let structure = out.structure().unwrap();
        assert!(structure.boats.is_empty());
        assert_eq!(structure.total_paid, Some(Amount::ZERO));
    }

    #[test]
    fn test_print_saved_fleet() {
        let env = TestEnv::new();
        env.save_fleet(&test_fleet());
        let out = print(&env.config()).unwrap();
        assert!(out.message().contains("Seeker"));
        assert_eq!(
            out.structure().unwrap().total_paid,
            Some(Amount::from(37000))
        );
    }

    #[test]
    fn test_report_totals_too_large() {
        let mut fleet = test_fleet();
        fleet.add(
            crate::import::decode("Power,Big,2020,X,20,79228162514264337593543950335").unwrap(),
        );
        let report = report(&fleet);
        assert!(report.lines().any(|line| line.starts_with("POWER    Big")));
        assert!(report.ends_with(": too large to add up"));
    }
}
