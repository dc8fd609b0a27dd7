//! Decoding boats from comma-separated text.
//!
//! One boat per line, six fields in a fixed order and no header:
//!
//! ```text
//! category,name,year,makeModel,lengthFeet,purchasePrice
//! Power,Seeker,2020,Bayliner 19,19.5,22000.00
//! ```
//!
//! The format has no quoting, so names and make/model strings cannot contain commas. They are
//! taken verbatim, surrounding whitespace included.

use crate::error::{ErrorType, IntoResult};
use crate::model::{Amount, Boat, BoatType};
use crate::Result;
use anyhow::{bail, ensure, Context};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

const FIELD_COUNT: usize = 6;

/// What to do when a line of a CSV source cannot be decoded.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum ImportPolicy {
    /// The first bad line fails the whole import and nothing is returned.
    #[default]
    AbortOnFirstError,
    /// Bad lines are skipped and reported next to the boats that could be decoded.
    SkipAndCollect,
}

/// A line that was skipped under `ImportPolicy::SkipAndCollect`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Rejection {
    /// 1-based line number in the source.
    pub line: u64,
    pub message: String,
}

/// The result of decoding a whole CSV source.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Import {
    pub boats: Vec<Boat>,
    /// Always empty under `ImportPolicy::AbortOnFirstError`.
    pub rejected: Vec<Rejection>,
}

/// Decodes a single CSV line into a `Boat`.
///
/// # Errors
/// - `ErrorType::MalformedRecord` if the line does not have exactly six fields, the category is
///   not `Sailing` or `Power`, a number does not parse, or the length or price is negative.
pub fn decode(line: &str) -> Result<Boat> {
    decode_fields(strip_line_ending(line).split(',')).pub_result(ErrorType::MalformedRecord)
}

/// Decodes every line of `source`. Blank lines are ignored.
///
/// Lines end at `\n`, with an optional `\r` before it. Any other `\r` is part of a field, the
/// same as for `decode`.
///
/// # Errors
/// - `ErrorType::Persistence` if reading from `source` fails.
/// - `ErrorType::MalformedRecord` for the first bad line under `ImportPolicy::AbortOnFirstError`.
pub fn decode_all(source: impl Read, policy: ImportPolicy) -> Result<Import> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_reader(source);

    let mut import = Import::default();
    for (ix, result) in reader.records().enumerate() {
        let (line, decoded) = match result {
            Ok(record) => {
                let line = record.position().map(|p| p.line()).unwrap_or(ix as u64 + 1);
                let mut fields: Vec<&str> = record.iter().collect();
                if let Some(last) = fields.last_mut() {
                    *last = strip_line_ending(*last);
                }
                if let [""] = fields.as_slice() {
                    continue;
                }
                let decoded = decode_fields(fields).with_context(|| format!("line {line}"));
                (line, decoded)
            }
            Err(e) => match e.kind() {
                csv::ErrorKind::Io(_) => {
                    return Err(anyhow::Error::new(e))
                        .context("Unable to read CSV source")
                        .pub_result(ErrorType::Persistence)
                }
                _ => {
                    let line = e.position().map(|p| p.line()).unwrap_or(ix as u64 + 1);
                    let decoded = Err(anyhow::Error::new(e)).with_context(|| format!("line {line}"));
                    (line, decoded)
                }
            },
        };

        match (decoded, policy) {
            (Ok(boat), _) => import.boats.push(boat),
            (Err(e), ImportPolicy::AbortOnFirstError) => {
                return Err(e).pub_result(ErrorType::MalformedRecord)
            }
            (Err(e), ImportPolicy::SkipAndCollect) => {
                warn!("Skipping malformed record: {e:#}");
                import.rejected.push(Rejection {
                    line,
                    message: format!("{e:#}"),
                });
            }
        }
    }

    debug!(
        "Decoded {} boats, rejected {} lines",
        import.boats.len(),
        import.rejected.len()
    );
    Ok(import)
}

/// Opens the CSV file at `path` and decodes it with `decode_all`.
///
/// # Errors
/// - `ErrorType::Persistence` if the file cannot be opened or read.
/// - `ErrorType::MalformedRecord` as described on `decode_all`.
pub fn import_file(path: impl AsRef<Path>, policy: ImportPolicy) -> Result<Import> {
    let path = path.as_ref();
    debug!("Importing boats from {}", path.display());
    let file = std::fs::File::open(path)
        .with_context(|| format!("Unable to open CSV file {}", path.display()))
        .pub_result(ErrorType::Persistence)?;
    decode_all(file, policy)
}

/// Drops one trailing `\n` and then one trailing `\r`.
fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

fn decode_fields<'a>(fields: impl IntoIterator<Item = &'a str>) -> anyhow::Result<Boat> {
    let fields: Vec<&str> = fields.into_iter().collect();
    if fields.len() != FIELD_COUNT {
        bail!(
            "expected {FIELD_COUNT} comma-separated fields \
            (category,name,year,makeModel,lengthFeet,purchasePrice) but found {}",
            fields.len()
        );
    }

    let boat_type: BoatType = fields[0]
        .parse()
        .with_context(|| format!("field 'category' has an invalid value '{}'", fields[0]))?;
    let name = fields[1];
    let year: i32 = fields[2]
        .trim()
        .parse()
        .with_context(|| format!("field 'year' has an invalid value '{}'", fields[2]))?;
    let make_model = fields[3];
    let length_feet: f64 = fields[4]
        .trim()
        .parse()
        .with_context(|| format!("field 'lengthFeet' has an invalid value '{}'", fields[4]))?;
    ensure!(
        length_feet.is_finite() && length_feet >= 0.0,
        "field 'lengthFeet' must be a non-negative number but was '{}'",
        fields[4]
    );
    let purchase_price: Amount = fields[5]
        .parse()
        .with_context(|| format!("field 'purchasePrice' has an invalid value '{}'", fields[5]))?;
    ensure!(
        !purchase_price.is_negative(),
        "field 'purchasePrice' must not be negative but was '{}'",
        fields[5]
    );

    Ok(Boat::new(
        boat_type,
        name,
        year,
        make_model,
        length_feet,
        purchase_price,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Fleet;
    use tempfile::TempDir;

    const FLEET_CSV: &str = "\
Sailing,Orion,2015,Catalina 22,22.0,15000.00
Power,Seeker,2020,Bayliner 19,19.5,22000.00
power,Big Brother,2019,Mako,20,12000
";

    #[test]
    fn test_decode_power_boat() {
        let boat = decode("Power,Seeker,2020,Bayliner 19,19.5,22000.00").unwrap();
        assert_eq!(boat.boat_type(), BoatType::Power);
        assert_eq!(boat.name(), "Seeker");
        assert_eq!(boat.year(), 2020);
        assert_eq!(boat.make_model(), "Bayliner 19");
        assert_eq!(boat.length_feet(), 19.5);
        assert_eq!(boat.purchase_price(), Amount::from(22000));
        assert!(boat.maintenance_spent().is_zero());
    }

    #[test]
    fn test_decode_invalid_category() {
        let err = decode("Catamaran,Breeze,2019,X,20,1000").unwrap_err();
        assert!(err.is_malformed_record());
        assert!(err.to_string().contains("category"));
        assert!(err.to_string().contains("Catamaran"));
    }

    #[test]
    fn test_decode_category_ignores_case() {
        let boat = decode("sAiLiNg,Breeze,2019,X,20,1000").unwrap();
        assert_eq!(boat.boat_type(), BoatType::Sailing);
    }

    #[test]
    fn test_decode_text_fields_are_verbatim() {
        let boat = decode("Power, Sea Ray ,2019,  Sundancer 320,32,150000").unwrap();
        assert_eq!(boat.name(), " Sea Ray ");
        assert_eq!(boat.make_model(), "  Sundancer 320");
    }

    #[test]
    fn test_decode_bad_numbers() {
        for (line, field) in [
            ("Power,A,twenty,X,20,1000", "year"),
            ("Power,A,2019,X,long,1000", "lengthFeet"),
            ("Power,A,2019,X,20,lots", "purchasePrice"),
            ("Power,A,2019,X,-20,1000", "lengthFeet"),
            ("Power,A,2019,X,NaN,1000", "lengthFeet"),
            ("Power,A,2019,X,20,-1000", "purchasePrice"),
        ] {
            let err = decode(line).unwrap_err();
            assert!(err.is_malformed_record(), "{line}");
            assert!(err.to_string().contains(field), "{line}: {err}");
        }
    }

    #[test]
    fn test_decode_wrong_field_count() {
        assert!(decode("Power,A,2019,X,20").unwrap_err().is_malformed_record());
        assert!(decode("Power,A,2019,X,20,1000,extra")
            .unwrap_err()
            .is_malformed_record());
        assert!(decode("").unwrap_err().is_malformed_record());
        // A comma inside the name is just another field.
        assert!(decode("Power,Smith, Jones,2019,X,20,1000")
            .unwrap_err()
            .is_malformed_record());
    }

    #[test]
    fn test_decode_render_preserves_fields() {
        let boat = decode("Sailing,Orion,2015,Catalina 22,22.0,15000.00").unwrap();
        let rendered = boat.to_string();
        assert!(rendered.starts_with("SAILING  Orion "));
        assert!(rendered.contains(" 2015 Catalina 22 "));
        assert!(rendered.contains(" 22' "));
        assert!(rendered.contains("Paid $  15000.00"));
        assert!(rendered.ends_with("Spent $      0.00"));
    }

    #[test]
    fn test_decode_all_keeps_order() {
        let import = decode_all(FLEET_CSV.as_bytes(), ImportPolicy::default()).unwrap();
        assert!(import.rejected.is_empty());
        let fleet: Fleet = import.boats.into();
        let names: Vec<&str> = fleet.iter().map(Boat::name).collect();
        assert_eq!(names, vec!["Orion", "Seeker", "Big Brother"]);
    }

    #[test]
    fn test_decode_all_crlf_and_blank_lines() {
        let csv = "Sailing,Orion,2015,Catalina 22,22.0,15000.00\r\n\r\nPower,Seeker,2020,Bayliner 19,19.5,22000.00\r\n";
        let import = decode_all(csv.as_bytes(), ImportPolicy::AbortOnFirstError).unwrap();
        assert_eq!(import.boats.len(), 2);
        assert_eq!(import.boats[1].purchase_price(), Amount::from(22000));
    }

    #[test]
    fn test_carriage_return_inside_a_line() {
        let line = "Power,Sea\rRay,2020,X\r,20,1000";
        let one = decode(line).unwrap();
        assert_eq!(one.name(), "Sea\rRay");
        assert_eq!(one.make_model(), "X\r");

        let csv = format!("{line}\r\n");
        let all = decode_all(csv.as_bytes(), ImportPolicy::AbortOnFirstError).unwrap();
        assert_eq!(all.boats, vec![one]);
    }

    /// Hands out one good line, then fails like a disk that went away.
    struct BrokenSource {
        sent: bool,
    }

    impl Read for BrokenSource {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.sent {
                return Err(std::io::Error::other("device went away"));
            }
            self.sent = true;
            let line = b"Sailing,Orion,2015,Catalina 22,22.0,15000.00\n";
            buf[..line.len()].copy_from_slice(line);
            Ok(line.len())
        }
    }

    #[test]
    fn test_decode_all_read_failure() {
        for policy in [ImportPolicy::AbortOnFirstError, ImportPolicy::SkipAndCollect] {
            let err = decode_all(BrokenSource { sent: false }, policy).unwrap_err();
            assert!(err.is_persistence(), "{policy:?}");
            assert!(err.to_string().contains("Unable to read CSV source"));
        }
    }

    #[test]
    fn test_decode_all_aborts_on_first_error() {
        let csv = format!("{FLEET_CSV}Catamaran,Breeze,2019,X,20,1000\n");
        let err = decode_all(csv.as_bytes(), ImportPolicy::AbortOnFirstError).unwrap_err();
        assert!(err.is_malformed_record());
        assert!(err.to_string().contains("line 4"), "{err}");
    }

    #[test]
    fn test_decode_all_skip_and_collect() {
        let csv = "\
Sailing,Orion,2015,Catalina 22,22.0,15000.00
Catamaran,Breeze,2019,X,20,1000
Power,Seeker,2020,Bayliner 19,19.5,22000.00
Power,Short,2020
";
        let import = decode_all(csv.as_bytes(), ImportPolicy::SkipAndCollect).unwrap();
        let names: Vec<&str> = import.boats.iter().map(Boat::name).collect();
        assert_eq!(names, vec!["Orion", "Seeker"]);
        let lines: Vec<u64> = import.rejected.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![2, 4]);
        assert!(import.rejected[0].message.contains("Catamaran"));
    }

    #[test]
    fn test_import_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fleet.csv");
        std::fs::write(&path, FLEET_CSV).unwrap();
        let import = import_file(&path, ImportPolicy::AbortOnFirstError).unwrap();
        assert_eq!(import.boats.len(), 3);
    }

    #[test]
    fn test_import_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = import_file(dir.path().join("nope.csv"), ImportPolicy::SkipAndCollect).unwrap_err();
        assert!(err.is_persistence());
        assert!(err.to_string().contains("nope.csv"));
    }
}
