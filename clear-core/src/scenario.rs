use crate::error::{ClearError, ClearResult};
use clear_schemas::{
    emissions::EmissionsRecord,
    scenario::{Scenario, ScenarioParameters, ScenarioResult, ScenarioSlot},
};
use log::debug;
use serde::Serialize;

/// Allowed range for one scenario lever. `step` is the granularity offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterDomain {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParameterDomain {
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    fn check(&self, value: f64) -> ClearResult<()> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(ClearError::ParameterOutOfRange {
                name: self.name,
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

pub const CARBON_TAX_DOMAIN: ParameterDomain = ParameterDomain {
    name: "carbon_tax_rate",
    min: 0.0,
    max: 150.0,
    step: 10.0,
};

pub const RENEWABLE_DOMAIN: ParameterDomain = ParameterDomain {
    name: "renewable_fraction",
    min: 0.0,
    max: 100.0,
    step: 10.0,
};

pub const EFFICIENCY_DOMAIN: ParameterDomain = ParameterDomain {
    name: "efficiency_fraction",
    min: 0.0,
    max: 30.0,
    step: 1.0,
};

/// Rejects parameters that fall outside the ranges offered to users.
pub fn validate_parameters(params: &ScenarioParameters) -> ClearResult<()> {
    CARBON_TAX_DOMAIN.check(params.carbon_tax_rate)?;
    RENEWABLE_DOMAIN.check(params.renewable_fraction)?;
    EFFICIENCY_DOMAIN.check(params.efficiency_fraction)?;
    Ok(())
}

/// The two side-by-side scenarios a session starts with.
pub fn default_scenarios() -> [Scenario; 2] {
    [
        Scenario::new("Scenario 1", ScenarioParameters::new(50.0, 50.0, 10.0)),
        Scenario::new("Scenario 2", ScenarioParameters::new(25.0, 75.0, 20.0)),
    ]
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

fn required(value: Option<f64>, field: &'static str, record: &EmissionsRecord) -> ClearResult<f64> {
    value.ok_or_else(|| ClearError::MissingField {
        field,
        business_unit: record.business_unit.clone(),
    })
}

/// Applies the scenario levers to every record, preserving input order.
///
/// Fractions are clamped to 0..=100 and the tax rate to >= 0, so adjusted
/// emissions and costs are never negative.
pub fn compute_scenario(
    records: &[EmissionsRecord],
    params: &ScenarioParameters,
) -> ClearResult<Vec<ScenarioResult>> {
    if records.is_empty() {
        return Err(ClearError::EmptyDataset);
    }

    let efficiency = clamp_percent(params.efficiency_fraction) / 100.0;
    let renewable = clamp_percent(params.renewable_fraction) / 100.0;
    let tax = if params.carbon_tax_rate.is_nan() { 0.0 } else { params.carbon_tax_rate.max(0.0) };

    records
        .iter()
        .map(|record| {
            let scope1 = required(record.scope1, "scope1", record)?;
            let scope2 = required(record.scope2, "scope2", record)?;
            let scope3 = required(record.scope3, "scope3", record)?;

            let adjusted_scope1 = scope1 * (1.0 - efficiency);
            let adjusted_scope2 = scope2 * (1.0 - renewable);
            let adjusted_scope3 = scope3;
            let total_adjusted = adjusted_scope1 + adjusted_scope2 + adjusted_scope3;

            Ok(ScenarioResult {
                business_unit: record.business_unit.clone(),
                adjusted_scope1,
                adjusted_scope2,
                adjusted_scope3,
                total_adjusted,
                tax_cost: total_adjusted * tax,
            })
        })
        .collect::<ClearResult<Vec<_>>>()
        .map(|results| {
            debug!(
                "Computed scenario (tax {}, renewable {}%, efficiency {}%) for {} units",
                params.carbon_tax_rate,
                params.renewable_fraction,
                params.efficiency_fraction,
                results.len()
            );
            results
        })
}

pub fn total_cost(results: &[ScenarioResult]) -> f64 {
    results.iter().map(|r| r.tax_cost).sum()
}

pub fn total_adjusted_emissions(results: &[ScenarioResult]) -> f64 {
    results.iter().map(|r| r.total_adjusted).sum()
}

/// Outcome of comparing two scenarios by total cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioComparison {
    pub first_cost: f64,
    pub second_cost: f64,
    /// `second_cost - first_cost`.
    pub delta: f64,
    pub cheaper: ScenarioSlot,
}

impl ScenarioComparison {
    pub fn cheapest_cost(&self) -> f64 {
        match self.cheaper {
            ScenarioSlot::First => self.first_cost,
            ScenarioSlot::Second => self.second_cost,
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self.cheaper {
            ScenarioSlot::First => "Consider increasing efficiency improvements to further reduce emissions.",
            ScenarioSlot::Second => "Consider adopting a higher renewable energy mix to reduce Scope 2 emissions.",
        }
    }
}

/// Compares scenarios by total cost only. A tie favours the second scenario.
pub fn compare_scenarios(first: &[ScenarioResult], second: &[ScenarioResult]) -> ScenarioComparison {
    let first_cost = total_cost(first);
    let second_cost = total_cost(second);
    ScenarioComparison {
        first_cost,
        second_cost,
        delta: second_cost - first_cost,
        cheaper: if first_cost < second_cost {
            ScenarioSlot::First
        } else {
            ScenarioSlot::Second
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::sample_dataset;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    fn dairy() -> EmissionsRecord {
        EmissionsRecord::new("Dairy", 10000.0, 3000.0, 50000.0, 20000.0, 50000.0)
    }

    #[test]
    fn worked_example() {
        let results = compute_scenario(&[dairy()], &ScenarioParameters::new(50.0, 50.0, 10.0)).unwrap();
        let r = &results[0];
        assert!(close(r.adjusted_scope1, 9000.0));
        assert!(close(r.adjusted_scope2, 1500.0));
        assert_eq!(r.adjusted_scope3, 50000.0);
        assert!(close(r.total_adjusted, 60500.0));
        assert!(close(r.tax_cost, 3_025_000.0));
    }

    #[test]
    fn output_matches_input_order_and_length() {
        let records = sample_dataset();
        let results = compute_scenario(&records, &ScenarioParameters::new(10.0, 20.0, 5.0)).unwrap();
        assert_eq!(results.len(), records.len());
        for (record, result) in records.iter().zip(&results) {
            assert_eq!(record.business_unit, result.business_unit);
        }
    }

    #[test]
    fn levers_only_reduce_their_own_scope() {
        let records = sample_dataset();
        for fraction in [0.0, 10.0, 50.0, 100.0] {
            let params = ScenarioParameters::new(30.0, fraction, fraction);
            for (rec, res) in records.iter().zip(compute_scenario(&records, &params).unwrap()) {
                let (s1, s2, s3) = (rec.scope1.unwrap(), rec.scope2.unwrap(), rec.scope3.unwrap());
                assert!(res.adjusted_scope1 <= s1);
                assert!(res.adjusted_scope2 <= s2);
                assert_eq!(res.adjusted_scope1 == s1, fraction == 0.0);
                assert_eq!(res.adjusted_scope2 == s2, fraction == 0.0);
                assert_eq!(res.adjusted_scope3, s3);
                assert_eq!(res.total_adjusted, res.adjusted_scope1 + res.adjusted_scope2 + res.adjusted_scope3);
            }
        }
    }

    #[test]
    fn tax_cost_is_linear_in_rate() {
        let records = sample_dataset();
        let base = compute_scenario(&records, &ScenarioParameters::new(35.0, 40.0, 12.0)).unwrap();
        let doubled = compute_scenario(&records, &ScenarioParameters::new(70.0, 40.0, 12.0)).unwrap();
        for (a, b) in base.iter().zip(&doubled) {
            assert!(close(b.tax_cost, 2.0 * a.tax_cost));
        }
    }

    #[test]
    fn total_cost_ignores_record_order() {
        let mut records = sample_dataset();
        let params = ScenarioParameters::new(50.0, 30.0, 7.0);
        let forward = total_cost(&compute_scenario(&records, &params).unwrap());
        records.reverse();
        records.swap(0, 2);
        let shuffled = total_cost(&compute_scenario(&records, &params).unwrap());
        assert!(close(forward, shuffled));
    }

    #[test]
    fn fractions_above_hundred_clamp_to_zero_emissions() {
        let results = compute_scenario(&[dairy()], &ScenarioParameters::new(10.0, 250.0, 140.0)).unwrap();
        assert_eq!(results[0].adjusted_scope1, 0.0);
        assert_eq!(results[0].adjusted_scope2, 0.0);
        assert_eq!(results[0].total_adjusted, 50000.0);
    }

    #[test]
    fn negative_tax_costs_nothing() {
        let results = compute_scenario(&[dairy()], &ScenarioParameters::new(-20.0, 0.0, 0.0)).unwrap();
        assert_eq!(results[0].tax_cost, 0.0);
    }

    #[test]
    fn missing_scope_names_field_and_unit() {
        let mut record = dairy();
        record.business_unit = "Cheese".to_string();
        record.scope2 = None;
        let err = compute_scenario(&[dairy(), record], &ScenarioParameters::new(1.0, 1.0, 1.0)).unwrap_err();
        match err {
            ClearError::MissingField { field, business_unit } => {
                assert_eq!(field, "scope2");
                assert_eq!(business_unit, "Cheese");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            compute_scenario(&[], &ScenarioParameters::new(1.0, 1.0, 1.0)),
            Err(ClearError::EmptyDataset)
        ));
    }

    #[test]
    fn comparison_picks_cheaper_and_breaks_ties_to_second() {
        let records = sample_dataset();
        let [s1, s2] = default_scenarios();
        let r1 = compute_scenario(&records, &s1.parameters).unwrap();
        let r2 = compute_scenario(&records, &s2.parameters).unwrap();
        let cmp = compare_scenarios(&r1, &r2);
        assert_eq!(cmp.cheaper, ScenarioSlot::Second);
        assert!(close(cmp.delta, cmp.second_cost - cmp.first_cost));

        let tie = compare_scenarios(&r1, &r1);
        assert_eq!(tie.cheaper, ScenarioSlot::Second);
        assert_eq!(tie.delta, 0.0);
    }

    #[test]
    fn cheaper_first_scenario_recommends_efficiency() {
        let records = sample_dataset();
        let low = compute_scenario(&records, &ScenarioParameters::new(10.0, 50.0, 10.0)).unwrap();
        let high = compute_scenario(&records, &ScenarioParameters::new(100.0, 50.0, 10.0)).unwrap();
        let cmp = compare_scenarios(&low, &high);
        assert_eq!(cmp.cheaper, ScenarioSlot::First);
        assert!(cmp.delta > 0.0);
        assert_eq!(cmp.cheapest_cost(), cmp.first_cost);
        assert_eq!(
            cmp.recommendation(),
            "Consider increasing efficiency improvements to further reduce emissions."
        );

        let reversed = compare_scenarios(&high, &low);
        assert_eq!(reversed.cheaper, ScenarioSlot::Second);
        assert_eq!(reversed.cheapest_cost(), reversed.second_cost);
        assert_eq!(
            reversed.recommendation(),
            "Consider adopting a higher renewable energy mix to reduce Scope 2 emissions."
        );
    }

    #[test]
    fn validation_uses_slider_ranges() {
        assert!(validate_parameters(&ScenarioParameters::new(150.0, 100.0, 30.0)).is_ok());
        let err = validate_parameters(&ScenarioParameters::new(50.0, 50.0, 31.0)).unwrap_err();
        assert!(matches!(err, ClearError::ParameterOutOfRange { name: "efficiency_fraction", .. }));
        assert!(validate_parameters(&ScenarioParameters::new(-1.0, 0.0, 0.0)).is_err());
    }
}
