use serde::{Deserialize, Serialize};

/// The three levers of a what-if scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParameters {
    /// Currency per MT CO2e.
    pub carbon_tax_rate: f64,
    /// Percentage of Scope 2 removed by renewable supply.
    pub renewable_fraction: f64,
    /// Percentage of Scope 1 removed by efficiency work.
    pub efficiency_fraction: f64,
}

impl ScenarioParameters {
    pub fn new(carbon_tax_rate: f64, renewable_fraction: f64, efficiency_fraction: f64) -> Self {
        Self {
            carbon_tax_rate,
            renewable_fraction,
            efficiency_fraction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(flatten)]
    pub parameters: ScenarioParameters,
}

impl Scenario {
    pub fn new(name: &str, parameters: ScenarioParameters) -> Self {
        Self {
            name: name.to_string(),
            parameters,
        }
    }
}

/// Identifies one of the two side-by-side scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioSlot {
    First,
    Second,
}

impl ScenarioSlot {
    pub fn index(self) -> usize {
        match self {
            ScenarioSlot::First => 0,
            ScenarioSlot::Second => 1,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(ScenarioSlot::First),
            2 => Some(ScenarioSlot::Second),
            _ => None,
        }
    }
}

/// Adjusted emissions and tax cost for one business unit under one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    #[serde(rename = "Business Unit")]
    pub business_unit: String,
    #[serde(rename = "Adjusted Scope 1")]
    pub adjusted_scope1: f64,
    #[serde(rename = "Adjusted Scope 2")]
    pub adjusted_scope2: f64,
    #[serde(rename = "Adjusted Scope 3")]
    pub adjusted_scope3: f64,
    #[serde(rename = "Total Adjusted Emissions")]
    pub total_adjusted: f64,
    #[serde(rename = "Carbon Tax Cost")]
    pub tax_cost: f64,
}
