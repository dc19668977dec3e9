//! Loading of the business-unit emissions table.
//!
//! A missing or malformed data file is never fatal: the loader substitutes the
//! built-in sample table and hands back a warning for the caller to surface.

use crate::error::{ClearError, ClearResult};
use clear_schemas::emissions::{DatasetSource, EmissionsRecord, REQUIRED_COLUMNS};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::Path;

/// The emissions table that a session works from, with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDataset {
    pub records: Vec<EmissionsRecord>,
    pub source: DatasetSource,
    pub warning: Option<String>,
}

impl LoadedDataset {
    pub fn is_sample(&self) -> bool {
        self.source == DatasetSource::Sample
    }
}

/// The five-unit table used whenever no usable data file is available.
pub fn sample_dataset() -> Vec<EmissionsRecord> {
    vec![
        EmissionsRecord::new("Dairy", 10000.0, 3000.0, 50000.0, 20000.0, 50000.0)
            .with_breakdown(5000.0, 7000.0, 35000.0),
        EmissionsRecord::new("Meat", 8000.0, 2500.0, 45000.0, 15000.0, 60000.0)
            .with_breakdown(3000.0, 4000.0, 30000.0),
        EmissionsRecord::new("Plant-Based", 5000.0, 1500.0, 30000.0, 10000.0, 20000.0)
            .with_breakdown(2500.0, 2800.0, 20000.0),
        EmissionsRecord::new("Beverages", 6000.0, 1800.0, 35000.0, 12000.0, 30000.0)
            .with_breakdown(2800.0, 3200.0, 25000.0),
        EmissionsRecord::new("Snacks", 4000.0, 1200.0, 20000.0, 8000.0, 25000.0)
            .with_breakdown(2000.0, 2200.0, 15000.0),
    ]
}

/// Loads the emissions table at `path`, falling back to [`sample_dataset`].
pub fn load_emissions<P: AsRef<Path>>(path: P) -> LoadedDataset {
    let path = path.as_ref();
    match read_emissions_file(path) {
        Ok(records) => {
            info!("Loaded {} business units from '{}'", records.len(), path.display());
            LoadedDataset {
                records,
                source: DatasetSource::File,
                warning: None,
            }
        }
        Err(e) => {
            let message = format!("{}. Using sample data instead.", e);
            warn!("{}", message);
            LoadedDataset {
                records: sample_dataset(),
                source: DatasetSource::Sample,
                warning: Some(message),
            }
        }
    }
}

/// Strict variant of [`load_emissions`]: reports `FileNotFound` or `FileParse`.
pub fn read_emissions_file(path: &Path) -> ClearResult<Vec<EmissionsRecord>> {
    let name = path.display().to_string();
    if !path.is_file() {
        return Err(ClearError::FileNotFound(name));
    }
    let file = fs::File::open(path).map_err(|e| ClearError::FileParse(name.clone(), e.to_string()))?;
    parse_emissions(&name, file)
}

/// Parses comma-separated emissions data.
///
/// All failures are reported as `FileParse` tagged with `source_name`, so a
/// caller only has to handle one kind of error for bad input.
pub fn parse_emissions<R: Read>(source_name: &str, reader: R) -> ClearResult<Vec<EmissionsRecord>> {
    let parse_err = |cause: String| ClearError::FileParse(source_name.to_string(), cause);

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(|e| parse_err(e.to_string()))?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        return Err(parse_err(format!("missing column(s): {}", missing.join(", "))));
    }

    let mut records = Vec::new();
    for (row, result) in reader.deserialize::<EmissionsRecord>().enumerate() {
        let record = result.map_err(|e| parse_err(format!("row {}: {}", row + 1, e)))?;
        check_record(&record).map_err(|cause| parse_err(format!("row {}: {}", row + 1, cause)))?;
        records.push(record);
    }

    validate_table(&records).map_err(|e| parse_err(e.to_string()))?;
    debug!("Parsed {} emissions rows from '{}'", records.len(), source_name);
    Ok(records)
}

fn check_record(record: &EmissionsRecord) -> Result<(), String> {
    if record.business_unit.is_empty() {
        return Err("business unit is empty".to_string());
    }
    let numeric = [
        ("scope 1", record.scope1),
        ("scope 2", record.scope2),
        ("scope 3", record.scope3),
        ("electricity", record.electricity_mwh),
        ("fuels", record.fuel_liters),
        ("direct", record.direct_emissions),
        ("indirect", record.indirect_emissions),
        ("supply chain", record.supply_chain_emissions),
    ];
    for (label, value) in numeric {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(format!("{} value {} for '{}' must be a non-negative number", label, v, record.business_unit));
            }
        }
    }
    Ok(())
}

/// Table-level invariants: at least one row, business units unique.
pub fn validate_table(records: &[EmissionsRecord]) -> ClearResult<()> {
    if records.is_empty() {
        return Err(ClearError::EmptyDataset);
    }
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.business_unit.as_str()) {
            return Err(ClearError::DuplicateBusinessUnit(record.business_unit.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Business Unit,Scope 1 Emissions (MT CO2e),Scope 2 Emissions (MT CO2e),Scope 3 Emissions (MT CO2e),Electricity Consumption (MWh),Fuels Consumption (Liters)";

    #[test]
    fn sample_has_five_named_units() {
        let units: Vec<String> = sample_dataset().into_iter().map(|r| r.business_unit).collect();
        assert_eq!(units, vec!["Dairy", "Meat", "Plant-Based", "Beverages", "Snacks"]);
    }

    #[test]
    fn parses_required_columns_and_ignores_extras() {
        let data = format!("{},Region\nCheese,100,20,300,40,50,North\n", HEADER);
        let records = parse_emissions("inline", data.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].business_unit, "Cheese");
        assert_eq!(records[0].scope3, Some(300.0));
        assert_eq!(records[0].direct_emissions, None);
    }

    #[test]
    fn blank_cell_is_kept_as_missing() {
        let data = format!("{}\nCheese,,20,300,40,50\n", HEADER);
        let records = parse_emissions("inline", data.as_bytes()).unwrap();
        assert_eq!(records[0].scope1, None);
    }

    #[test]
    fn missing_column_is_a_parse_error() {
        let data = "Business Unit,Scope 1 Emissions (MT CO2e)\nCheese,1\n";
        let err = parse_emissions("inline", data.as_bytes()).unwrap_err();
        match err {
            ClearError::FileParse(source, cause) => {
                assert_eq!(source, "inline");
                assert!(cause.contains("Scope 2 Emissions (MT CO2e)"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_text_in_numeric_column() {
        let data = format!("{}\nCheese,lots,20,300,40,50\n", HEADER);
        assert!(matches!(
            parse_emissions("inline", data.as_bytes()),
            Err(ClearError::FileParse(..))
        ));
    }

    #[test]
    fn rejects_negative_values() {
        let data = format!("{}\nCheese,-5,20,300,40,50\n", HEADER);
        assert!(parse_emissions("inline", data.as_bytes()).is_err());
    }

    #[test]
    fn rejects_duplicate_units_and_empty_tables() {
        let dup = format!("{}\nA,1,1,1,1,1\nA,2,2,2,2,2\n", HEADER);
        let err = parse_emissions("inline", dup.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("more than once"));

        let empty = format!("{}\n", HEADER);
        assert!(parse_emissions("inline", empty.as_bytes()).is_err());
    }

    #[test]
    fn nonexistent_path_falls_back_to_sample() {
        let loaded = load_emissions("definitely/not/here.csv");
        assert!(loaded.is_sample());
        assert_eq!(loaded.records, sample_dataset());
        assert!(loaded.warning.unwrap().contains("File not found"));
    }
}
