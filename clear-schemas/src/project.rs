use serde::{Deserialize, Serialize};

/// An abatement project considered alongside the scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReductionProject {
    pub project: String,
    pub carbon_reduction_mt: f64,
    pub cost_usd: f64,
    pub roi_percent: f64,
}
