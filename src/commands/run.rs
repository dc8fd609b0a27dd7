use crate::commands::{boats, save_fleet, Out};
use crate::error::{ErrorType, IntoResult};
use crate::import::{import_file, ImportPolicy};
use crate::model::Fleet;
use crate::snapshot::{self, Loaded};
use crate::{menu, Config, Result};
use anyhow::Context;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::debug;

/// Runs an interactive session and saves the fleet when it ends.
///
/// The fleet starts from the CSV file at `csv` when one is given, otherwise from the saved
/// snapshot. If that source cannot be read the problem is reported on `output` and the session
/// starts with an empty fleet. The previous snapshot is backed up before it is overwritten, so
/// nothing is lost for good.
///
/// # Errors
/// - `ErrorType::Input` if reading from `input` or writing to `output` fails.
/// - `ErrorType::Persistence` if the fleet cannot be saved at the end.
pub fn run<R, W>(
    config: &Config,
    csv: Option<&Path>,
    policy: ImportPolicy,
    input: R,
    mut output: W,
) -> Result<Out<Fleet>>
where
    R: BufRead,
    W: Write,
{
    let (mut fleet, status) = starting_fleet(config, csv, policy);
    greet(&mut output, &status).pub_result(ErrorType::Input)?;

    menu::session(&mut fleet, input, &mut output).pub_result(ErrorType::Input)?;

    let path = save_fleet(config, &fleet)?;
    writeln!(output, "Exiting the Fleet Management System :)")
        .context("Unable to write to the output")
        .pub_result(ErrorType::Input)?;

    Ok(Out::new(
        format!("Saved {} to {}", boats(fleet.len()), path.display()),
        fleet,
    ))
}

/// Returns the fleet to start with and a line telling the user where it came from.
fn starting_fleet(config: &Config, csv: Option<&Path>, policy: ImportPolicy) -> (Fleet, String) {
    if let Some(csv) = csv {
        debug!("Populating the fleet from {}", csv.display());
        return match import_file(csv, policy) {
            Ok(import) => {
                for rejection in &import.rejected {
                    debug!("Skipped line {}: {}", rejection.line, rejection.message);
                }
                let fleet: Fleet = import.boats.into_iter().collect();
                let status = format!("Loaded {} from {}.", boats(fleet.len()), csv.display());
                (fleet, status)
            }
            Err(e) => (Fleet::new(), format!("Error reading CSV file: {e}")),
        };
    }

    let path = config.snapshot_path();
    debug!("Loading the fleet from {}", path.display());
    match snapshot::load(path) {
        Ok(Loaded::Found(fleet)) => (fleet, String::from("Fleet data loaded successfully.")),
        Ok(Loaded::Absent) => (
            Fleet::new(),
            String::from("No saved fleet data found. Starting with an empty fleet."),
        ),
        Err(e) => (Fleet::new(), format!("Error loading fleet data: {e}")),
    }
}

fn greet(output: &mut impl Write, status: &str) -> anyhow::Result<()> {
    writeln!(output, "{status}")?;
    writeln!(output)?;
    writeln!(output, "Welcome to the Fleet Management System")?;
    writeln!(output, "--------------------------------------")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Amount;
    use crate::test::{test_fleet, TestEnv};
    use std::io::Cursor;

    fn drive(
        env: &TestEnv,
        csv: Option<&Path>,
        policy: ImportPolicy,
        keys: &str,
    ) -> (Out<Fleet>, String) {
        let mut output = Vec::new();
        let out = run(
            &env.config(),
            csv,
            policy,
            Cursor::new(keys.as_bytes()),
            &mut output,
        )
        .unwrap();
        (out, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_run_from_snapshot() {
        let env = TestEnv::new();
        env.save_fleet(&test_fleet());

        let (out, text) = drive(
            &env,
            None,
            ImportPolicy::default(),
            "e\nSeeker\n1000\nx\n",
        );
        assert!(text.starts_with("Fleet data loaded successfully.\n"));
        assert!(text.contains("Welcome to the Fleet Management System"));
        assert!(text.ends_with("Exiting the Fleet Management System :)\n"));
        assert_eq!(out.structure().unwrap().len(), 2);

        let spent = env.load_fleet().find("Seeker").unwrap().maintenance_spent();
        assert_eq!(spent, Amount::from(1000));
    }

    #[test]
    fn test_run_without_snapshot() {
        let env = TestEnv::new();
        let (_, text) = drive(&env, None, ImportPolicy::default(), "p\nx\n");
        assert!(text.starts_with("No saved fleet data found. Starting with an empty fleet."));
        assert!(text.contains("No boats are in the fleet."));
        assert!(env.load_fleet().is_empty());
        assert!(env.config().snapshot_path().is_file());
    }

    #[test]
    fn test_run_from_csv_replaces_snapshot() {
        let env = TestEnv::new();
        let mut existing = test_fleet();
        let _ = existing.remove("Seeker");
        env.save_fleet(&existing);

        let csv = env.scratch().join("fleet.csv");
        std::fs::write(
            &csv,
            "Sailing,Orion,2015,Catalina 22,22.0,15000.00\n\
             Power,Seeker,2020,Bayliner 19,19.5,22000.00\n",
        )
        .unwrap();

        let (out, text) = drive(&env, Some(&csv), ImportPolicy::default(), "x\n");
        assert!(text.starts_with("Loaded 2 boats from"));
        assert!(out.message().starts_with("Saved 2 boats to"));
        assert_eq!(env.load_fleet(), test_fleet());
    }

    #[test]
    fn test_run_with_bad_csv_starts_empty() {
        let env = TestEnv::new();
        env.save_fleet(&test_fleet());
        let csv = env.scratch().join("fleet.csv");
        std::fs::write(&csv, "Catamaran,Breeze,2019,X,20,1000\n").unwrap();

        let (_, text) = drive(&env, Some(&csv), ImportPolicy::AbortOnFirstError, "");
        assert!(text.starts_with("Error reading CSV file:"));
        assert!(env.load_fleet().is_empty());

        // The replaced snapshot survives as a backup.
        let backups: Vec<_> = std::fs::read_dir(env.config().backups())
            .unwrap()
            .collect();
        assert_eq!(backups.len(), 1);
    }

    #[test]
    fn test_run_with_corrupt_snapshot() {
        let env = TestEnv::new();
        std::fs::write(env.config().snapshot_path(), "not json").unwrap();

        let (_, text) = drive(&env, None, ImportPolicy::default(), "x\n");
        assert!(text.starts_with("Error loading fleet data:"));
        assert!(env.load_fleet().is_empty());
    }
}
