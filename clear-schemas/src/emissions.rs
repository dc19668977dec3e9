use serde::{Deserialize, Serialize};

pub const COL_BUSINESS_UNIT: &str = "Business Unit";
pub const COL_SCOPE1: &str = "Scope 1 Emissions (MT CO2e)";
pub const COL_SCOPE2: &str = "Scope 2 Emissions (MT CO2e)";
pub const COL_SCOPE3: &str = "Scope 3 Emissions (MT CO2e)";
pub const COL_ELECTRICITY: &str = "Electricity Consumption (MWh)";
pub const COL_FUELS: &str = "Fuels Consumption (Liters)";
pub const COL_DIRECT: &str = "Direct Emissions (MT CO2e)";
pub const COL_INDIRECT: &str = "Indirect Emissions (MT CO2e)";
pub const COL_SUPPLY_CHAIN: &str = "Supply Chain Emissions (MT CO2e)";

/// Columns every emissions data file must carry in its header.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_BUSINESS_UNIT,
    COL_SCOPE1,
    COL_SCOPE2,
    COL_SCOPE3,
    COL_ELECTRICITY,
    COL_FUELS,
];

/// One row of the emissions table, keyed by business unit.
///
/// Numeric cells are optional because data files may leave them blank; the
/// scenario calculator reports a missing scope value instead of guessing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionsRecord {
    #[serde(rename = "Business Unit")]
    pub business_unit: String,
    #[serde(rename = "Scope 1 Emissions (MT CO2e)")]
    pub scope1: Option<f64>,
    #[serde(rename = "Scope 2 Emissions (MT CO2e)")]
    pub scope2: Option<f64>,
    #[serde(rename = "Scope 3 Emissions (MT CO2e)")]
    pub scope3: Option<f64>,
    #[serde(rename = "Electricity Consumption (MWh)")]
    pub electricity_mwh: Option<f64>,
    #[serde(rename = "Fuels Consumption (Liters)")]
    pub fuel_liters: Option<f64>,
    #[serde(rename = "Direct Emissions (MT CO2e)", default)]
    pub direct_emissions: Option<f64>,
    #[serde(rename = "Indirect Emissions (MT CO2e)", default)]
    pub indirect_emissions: Option<f64>,
    #[serde(rename = "Supply Chain Emissions (MT CO2e)", default)]
    pub supply_chain_emissions: Option<f64>,
}

impl EmissionsRecord {
    /// Builds a record with the three scopes and consumption figures set and no breakdown columns.
    pub fn new(
        business_unit: &str,
        scope1: f64,
        scope2: f64,
        scope3: f64,
        electricity_mwh: f64,
        fuel_liters: f64,
    ) -> Self {
        Self {
            business_unit: business_unit.to_string(),
            scope1: Some(scope1),
            scope2: Some(scope2),
            scope3: Some(scope3),
            electricity_mwh: Some(electricity_mwh),
            fuel_liters: Some(fuel_liters),
            direct_emissions: None,
            indirect_emissions: None,
            supply_chain_emissions: None,
        }
    }

    pub fn with_breakdown(mut self, direct: f64, indirect: f64, supply_chain: f64) -> Self {
        self.direct_emissions = Some(direct);
        self.indirect_emissions = Some(indirect);
        self.supply_chain_emissions = Some(supply_chain);
        self
    }

    /// Sum of whichever scope values are present.
    pub fn total_emissions(&self) -> f64 {
        [self.scope1, self.scope2, self.scope3]
            .iter()
            .map(|v| v.unwrap_or(0.0))
            .sum()
    }
}

/// A row typed in by hand during a session. Only the scopes are collected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualEntry {
    pub business_unit: String,
    pub scope1: f64,
    pub scope2: f64,
    pub scope3: f64,
}

/// Where the active emissions table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetSource {
    File,
    Sample,
    Uploaded,
}
