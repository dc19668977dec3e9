//! Comma-separated export of scenario results.
//!
//! Output is a pure function of the result sequence: fixed column order and
//! shortest round-trip decimal formatting with no locale involvement.

use crate::error::{ClearError, ClearResult};
use clear_schemas::scenario::ScenarioResult;
use std::io::{Read, Write};

pub const EXPORT_HEADER: [&str; 6] = [
    "Business Unit",
    "Adjusted Scope 1",
    "Adjusted Scope 2",
    "Adjusted Scope 3",
    "Total Adjusted Emissions",
    "Carbon Tax Cost",
];

pub fn write_results<W: Write>(writer: W, results: &[ScenarioResult]) -> ClearResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    // Written explicitly so an empty result set still carries the header.
    writer
        .write_record(EXPORT_HEADER)
        .map_err(|e| ClearError::CsvError("export".to_string(), e))?;
    for result in results {
        writer
            .write_record(&[
                result.business_unit.clone(),
                result.adjusted_scope1.to_string(),
                result.adjusted_scope2.to_string(),
                result.adjusted_scope3.to_string(),
                result.total_adjusted.to_string(),
                result.tax_cost.to_string(),
            ])
            .map_err(|e| ClearError::CsvError("export".to_string(), e))?;
    }
    writer
        .flush()
        .map_err(|e| ClearError::FileIO("export".to_string(), e))?;
    Ok(())
}

pub fn results_to_csv(results: &[ScenarioResult]) -> ClearResult<String> {
    let mut buffer = Vec::new();
    write_results(&mut buffer, results)?;
    String::from_utf8(buffer).map_err(|e| ClearError::Utf8("export".to_string(), e))
}

pub fn read_results<R: Read>(reader: R) -> ClearResult<Vec<ScenarioResult>> {
    let mut reader = csv::Reader::from_reader(reader);
    reader
        .deserialize()
        .map(|row| row.map_err(|e| ClearError::CsvError("scenario results".to_string(), e)))
        .collect()
}

pub fn export_file_name(scenario_name: &str) -> String {
    format!("{}_results.csv", scenario_name)
}
