use clear_schemas::emissions::EmissionsRecord;
use serde::Serialize;
use std::cmp::Ordering;

/// Column sums over the whole table: the "TOTAL" row of the overview.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct EmissionsTotals {
    pub scope1: f64,
    pub scope2: f64,
    pub scope3: f64,
    pub electricity_mwh: f64,
    pub fuel_liters: f64,
    pub direct_emissions: f64,
    pub indirect_emissions: f64,
    pub supply_chain_emissions: f64,
}

impl EmissionsTotals {
    pub fn all_scopes(&self) -> f64 {
        self.scope1 + self.scope2 + self.scope3
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopeShare {
    pub scope: &'static str,
    pub emissions: f64,
    pub percent: f64,
}

/// Emissions normalised by consumption. `None` where the divisor is zero or absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntensityMetrics {
    pub business_unit: String,
    pub scope1_per_mwh: Option<f64>,
    pub scope2_per_mwh: Option<f64>,
    pub scope1_per_kilolitre_fuel: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hotspot {
    pub business_unit: String,
    pub total_emissions: f64,
    pub share_percent: f64,
}

pub fn totals(records: &[EmissionsRecord]) -> EmissionsTotals {
    let mut t = EmissionsTotals::default();
    for r in records {
        t.scope1 += r.scope1.unwrap_or(0.0);
        t.scope2 += r.scope2.unwrap_or(0.0);
        t.scope3 += r.scope3.unwrap_or(0.0);
        t.electricity_mwh += r.electricity_mwh.unwrap_or(0.0);
        t.fuel_liters += r.fuel_liters.unwrap_or(0.0);
        t.direct_emissions += r.direct_emissions.unwrap_or(0.0);
        t.indirect_emissions += r.indirect_emissions.unwrap_or(0.0);
        t.supply_chain_emissions += r.supply_chain_emissions.unwrap_or(0.0);
    }
    t
}

fn percent_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

pub fn scope_distribution(totals: &EmissionsTotals) -> [ScopeShare; 3] {
    let whole = totals.all_scopes();
    [
        ("Scope 1", totals.scope1),
        ("Scope 2", totals.scope2),
        ("Scope 3", totals.scope3),
    ]
    .map(|(scope, emissions)| ScopeShare {
        scope,
        emissions,
        percent: percent_of(emissions, whole),
    })
}

/// Divides, refusing zero and missing divisors rather than producing infinities.
pub fn safe_ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => {
            let ratio = n / d;
            ratio.is_finite().then_some(ratio)
        }
        _ => None,
    }
}

pub fn intensity_metrics(records: &[EmissionsRecord]) -> Vec<IntensityMetrics> {
    records
        .iter()
        .map(|r| IntensityMetrics {
            business_unit: r.business_unit.clone(),
            scope1_per_mwh: safe_ratio(r.scope1, r.electricity_mwh),
            scope2_per_mwh: safe_ratio(r.scope2, r.electricity_mwh),
            scope1_per_kilolitre_fuel: safe_ratio(r.scope1, r.fuel_liters.map(|l| l / 1000.0)),
        })
        .collect()
}

/// Business units ranked by total emissions, largest first.
pub fn hotspots(records: &[EmissionsRecord]) -> Vec<Hotspot> {
    let whole: f64 = records.iter().map(|r| r.total_emissions()).sum();
    let mut spots: Vec<Hotspot> = records
        .iter()
        .map(|r| Hotspot {
            business_unit: r.business_unit.clone(),
            total_emissions: r.total_emissions(),
            share_percent: percent_of(r.total_emissions(), whole),
        })
        .collect();
    spots.sort_by(|a, b| {
        b.total_emissions
            .partial_cmp(&a.total_emissions)
            .unwrap_or(Ordering::Equal)
    });
    spots
}

/// Renders an optional metric the way the overview tables show it.
pub fn format_metric(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "N/A".to_string(),
    }
}
