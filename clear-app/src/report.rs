//! Plain-text reports for each command, written to any `io::Write` sink.

use clear_core::{
    analysis::{self, format_metric},
    dataset::LoadedDataset,
    regulatory::{self, Priority, TimelineEntry},
    scenario::ScenarioComparison,
};
use clear_schemas::{
    audit::AuditItem,
    emissions::{EmissionsRecord, ManualEntry},
    project::ReductionProject,
    regulation::{ComplianceTask, Regulation},
    scenario::{Scenario, ScenarioResult},
};
use std::io::{self, Write};

pub const FOOTER: &str = "Powered by Oporto-Carbon | CLEAR Dashboard";

/// Formats a number with thousands separators and the given number of decimals.
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

pub fn currency(value: f64) -> String {
    if value < 0.0 {
        format!("-${}", group_thousands(-value, 0))
    } else {
        format!("${}", group_thousands(value, 0))
    }
}

fn opt(value: Option<f64>) -> String {
    format_metric(value, 0)
}

pub fn print_dataset_notice(out: &mut impl Write, dataset: &LoadedDataset) -> io::Result<()> {
    if let Some(warning) = &dataset.warning {
        writeln!(out, "Warning: {}", warning)?;
    }
    Ok(())
}

pub fn print_emissions_table(out: &mut impl Write, records: &[EmissionsRecord], with_total: bool) -> io::Result<()> {
    writeln!(
        out,
        "{:<16} {:>10} {:>10} {:>10} {:>12} {:>12} {:>10} {:>10} {:>12}",
        "Business Unit", "Scope 1", "Scope 2", "Scope 3", "Elec (MWh)", "Fuels (L)", "Direct", "Indirect", "Supply Chain"
    )?;
    for r in records {
        writeln!(
            out,
            "{:<16} {:>10} {:>10} {:>10} {:>12} {:>12} {:>10} {:>10} {:>12}",
            r.business_unit,
            opt(r.scope1),
            opt(r.scope2),
            opt(r.scope3),
            opt(r.electricity_mwh),
            opt(r.fuel_liters),
            opt(r.direct_emissions),
            opt(r.indirect_emissions),
            opt(r.supply_chain_emissions),
        )?;
    }
    if with_total {
        let t = analysis::totals(records);
        writeln!(
            out,
            "{:<16} {:>10.0} {:>10.0} {:>10.0} {:>12.0} {:>12.0} {:>10.0} {:>10.0} {:>12.0}",
            "TOTAL",
            t.scope1,
            t.scope2,
            t.scope3,
            t.electricity_mwh,
            t.fuel_liters,
            t.direct_emissions,
            t.indirect_emissions,
            t.supply_chain_emissions,
        )?;
    }
    Ok(())
}

pub fn print_overview(out: &mut impl Write, dataset: &LoadedDataset) -> io::Result<()> {
    let records = &dataset.records;
    writeln!(out, "\n--- Scope 1, 2, and 3 Emissions Overview ---")?;
    print_emissions_table(out, records, true)?;

    writeln!(out, "\nTotal Emissions Distribution:")?;
    for share in analysis::scope_distribution(&analysis::totals(records)) {
        writeln!(
            out,
            "  - {}: {:>12} MT CO2e ({:.1}%)",
            share.scope,
            group_thousands(share.emissions, 0),
            share.percent
        )?;
    }

    writeln!(out, "\nEmission Intensity Metrics:")?;
    writeln!(
        out,
        "{:<16} {:>18} {:>18} {:>22}",
        "Business Unit", "Scope 1 / MWh", "Scope 2 / MWh", "Scope 1 / 1000 L fuel"
    )?;
    for m in analysis::intensity_metrics(records) {
        writeln!(
            out,
            "{:<16} {:>18} {:>18} {:>22}",
            m.business_unit,
            format_metric(m.scope1_per_mwh, 3),
            format_metric(m.scope2_per_mwh, 3),
            format_metric(m.scope1_per_kilolitre_fuel, 3),
        )?;
    }

    writeln!(out, "\nEmission Hotspots by Business Unit:")?;
    for spot in analysis::hotspots(records) {
        writeln!(
            out,
            "  - {:<16} {:>12} MT CO2e ({:.1}% of total)",
            spot.business_unit,
            group_thousands(spot.total_emissions, 0),
            spot.share_percent
        )?;
    }
    Ok(())
}

pub fn print_scenario_results(out: &mut impl Write, scenario: &Scenario, results: &[ScenarioResult]) -> io::Result<()> {
    let p = &scenario.parameters;
    writeln!(
        out,
        "\n#### {} Results (tax ${}/t, renewable {}%, efficiency {}%)",
        scenario.name, p.carbon_tax_rate, p.renewable_fraction, p.efficiency_fraction
    )?;
    writeln!(out, "{:<16} {:>26} {:>18}", "Business Unit", "Total Adjusted Emissions", "Carbon Tax Cost")?;
    for r in results {
        writeln!(
            out,
            "{:<16} {:>26} {:>18}",
            r.business_unit,
            group_thousands(r.total_adjusted, 1),
            currency(r.tax_cost)
        )?;
    }
    Ok(())
}

pub fn print_financial_impact(out: &mut impl Write, scenarios: &[Scenario; 2], comparison: &ScenarioComparison) -> io::Result<()> {
    writeln!(out, "\n--- Financial Impact Analysis ---")?;
    writeln!(out, "  - Total Cost ({}): {}", scenarios[0].name, currency(comparison.first_cost))?;
    writeln!(
        out,
        "  - Total Cost ({}): {} (delta {})",
        scenarios[1].name,
        currency(comparison.second_cost),
        currency(comparison.delta)
    )
}

pub fn print_projects(out: &mut impl Write, projects: &[ReductionProject]) -> io::Result<()> {
    writeln!(out, "\n--- Carbon Reduction vs ROI ---")?;
    writeln!(out, "{:<28} {:>14} {:>14} {:>8}", "Project", "Reduction (t)", "Cost (USD)", "ROI (%)")?;
    for p in projects {
        writeln!(
            out,
            "{:<28} {:>14} {:>14} {:>8}",
            p.project,
            group_thousands(p.carbon_reduction_mt, 0),
            currency(p.cost_usd),
            p.roi_percent
        )?;
    }
    Ok(())
}

pub fn print_recommendation(out: &mut impl Write, scenarios: &[Scenario; 2], comparison: &ScenarioComparison) -> io::Result<()> {
    let cheaper = &scenarios[comparison.cheaper.index()];
    writeln!(out, "\n--- Recommendations ---")?;
    writeln!(
        out,
        "{} is more cost-effective with a total cost of {}.",
        cheaper.name,
        currency(comparison.cheapest_cost())
    )?;
    writeln!(out, "{}", comparison.recommendation())
}

pub fn print_regulations(out: &mut impl Write, regulations: &[Regulation]) -> io::Result<()> {
    writeln!(out, "\n--- Regulatory Summary ---")?;
    for r in regulations {
        writeln!(out, "  - {} [{}] due {}", r.name, r.status, r.deadline)?;
        writeln!(out, "      {}", r.description)?;
    }
    Ok(())
}

pub fn print_tasks(out: &mut impl Write, tasks: &[ComplianceTask]) -> io::Result<()> {
    writeln!(out, "\n--- Current Tasks ---")?;
    if tasks.is_empty() {
        writeln!(out, "  (no tasks)")?;
    }
    for t in tasks {
        writeln!(out, "  - {:<28} {:<22} {:<12} {}", t.task, t.regulation, t.status.label(), t.due_date)?;
    }
    Ok(())
}

pub fn print_upcoming(out: &mut impl Write, upcoming: &[Regulation], months: u32) -> io::Result<()> {
    writeln!(out, "\n--- Upcoming Deadlines ---")?;
    if upcoming.is_empty() {
        return writeln!(out, "No deadlines in the next {} months.", months);
    }
    writeln!(out, "Deadlines in the next {} months:", months)?;
    for r in upcoming {
        writeln!(out, "  - {:<44} {}  {}", r.name, r.deadline, r.status)?;
    }
    Ok(())
}

pub fn print_timeline(out: &mut impl Write, entries: &[TimelineEntry]) -> io::Result<()> {
    writeln!(out, "\n--- Compliance Timeline ---")?;
    for e in entries {
        let days = (e.end - e.start).num_days();
        writeln!(out, "  - {:<44} {} -> {} ({:>5} days, {})", e.name, e.start, e.end, days, e.colour)?;
    }
    Ok(())
}

pub fn print_priority(out: &mut impl Write, regulation: &Regulation, priority: Priority) -> io::Result<()> {
    writeln!(out, "\n#### Regulation: {}", regulation.name)?;
    writeln!(out, "Description: {}", regulation.description)?;
    writeln!(out, "Status: {}", regulation.status)?;
    writeln!(out, "Compliance Deadline: {}", regulation.deadline)?;
    writeln!(out, "{}", priority.message())
}

pub fn print_audit(out: &mut impl Write, items: &[AuditItem]) -> io::Result<()> {
    writeln!(out, "\n--- Audit & Assurance ---")?;
    for item in items {
        writeln!(out, "  - {}: {}", item.label, item.schedule)?;
    }
    Ok(())
}

pub fn print_manual_entries(out: &mut impl Write, entries: &[ManualEntry]) -> io::Result<()> {
    writeln!(out, "\n--- Manual Entries ---")?;
    if entries.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for e in entries {
        writeln!(out, "  - {} | S1={} | S2={} | S3={}", e.business_unit, e.scope1, e.scope2, e.scope3)?;
    }
    Ok(())
}

pub fn print_footer(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "\n---")?;
    writeln!(out, "{}", FOOTER)
}

/// Regulation list plus the derived views, as printed by the `regulations` command.
pub fn print_regulatory_tracker(
    out: &mut impl Write,
    regulations: &[Regulation],
    tasks: &[ComplianceTask],
    today: chrono::NaiveDate,
    months: u32,
) -> io::Result<()> {
    print_regulations(out, regulations)?;
    print_tasks(out, tasks)?;
    print_upcoming(out, &regulatory::upcoming_deadlines(regulations, today, months), months)?;
    print_timeline(out, &regulatory::timeline(regulations, today))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0.0, 0), "0");
        assert_eq!(group_thousands(999.0, 0), "999");
        assert_eq!(group_thousands(1000.0, 0), "1,000");
        assert_eq!(group_thousands(3_025_000.0, 0), "3,025,000");
        assert_eq!(group_thousands(60500.24, 1), "60,500.2");
        assert_eq!(group_thousands(-1234.0, 0), "-1,234");
    }

    #[test]
    fn currency_format() {
        assert_eq!(currency(10_735_000.0), "$10,735,000");
        assert_eq!(currency(-5_512_500.0), "-$5,512,500");
    }

    #[test]
    fn tasks_view_lists_each_task() {
        let mut out = Vec::new();
        print_tasks(&mut out, &regulatory::seed_tasks()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\n--- Current Tasks ---\n"));
        assert!(text.contains("Verify GHG report"));

        let mut empty = Vec::new();
        print_tasks(&mut empty, &[]).unwrap();
        assert!(String::from_utf8(empty).unwrap().contains("(no tasks)"));
    }
}
