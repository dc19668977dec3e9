use crate::error::{ClearError, ClearResult};
use crate::scenario::{total_adjusted_emissions, total_cost};
use clear_schemas::scenario::{Scenario, ScenarioResult};
use csv::Writer;
use serde::Serialize;
use std::fs;

#[derive(Debug, Serialize)]
struct LedgerEntry {
    scenario: String,
    carbon_tax_rate: f64,
    renewable_fraction: f64,
    efficiency_fraction: f64,
    business_units: usize,
    total_adjusted_emissions: f64,
    total_cost: f64,
}

/// Writes one summary row per evaluated scenario into a run directory.
pub struct ScenarioLedger {
    path: String,
    writer: Writer<fs::File>,
}

impl ScenarioLedger {
    pub fn new(path: &str) -> ClearResult<Self> {
        let writer = Writer::from_path(path).map_err(|e| ClearError::CsvError(path.to_string(), e))?;
        Ok(Self {
            path: path.to_string(),
            writer,
        })
    }

    pub fn record(&mut self, scenario: &Scenario, results: &[ScenarioResult]) -> ClearResult<()> {
        let entry = LedgerEntry {
            scenario: scenario.name.clone(),
            carbon_tax_rate: scenario.parameters.carbon_tax_rate,
            renewable_fraction: scenario.parameters.renewable_fraction,
            efficiency_fraction: scenario.parameters.efficiency_fraction,
            business_units: results.len(),
            total_adjusted_emissions: total_adjusted_emissions(results),
            total_cost: total_cost(results),
        };

        self.writer
            .serialize(entry)
            .map_err(|e| ClearError::CsvError(self.path.clone(), e))?;
        self.writer
            .flush()
            .map_err(|e| ClearError::FileIO(self.path.clone(), e))?;
        Ok(())
    }
}
