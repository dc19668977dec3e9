//! This module is responsible for rendering the dashboard charts as PNG files.

use anyhow::Result;
use clear_core::{analysis::ScopeShare, regulatory::TimelineEntry};
use clear_schemas::{
    emissions::EmissionsRecord,
    project::ReductionProject,
    scenario::{Scenario, ScenarioResult},
};
use log::{info, warn};
use plotters::prelude::*;

const SCOPE_COLOURS: [RGBColor; 3] = [RGBColor(81, 60, 44), RGBColor(70, 130, 180), RGBColor(60, 160, 90)];

/// Renders every chart for a dataset and scenario pair into `output_dir`.
pub fn generate_all_plots(
    output_dir: &str,
    records: &[EmissionsRecord],
    shares: &[ScopeShare],
    scenarios: &[(Scenario, Vec<ScenarioResult>)],
    timeline: &[TimelineEntry],
    projects: &[ReductionProject],
) -> Result<()> {
    info!("Generating charts in '{}'", output_dir);

    if records.is_empty() {
        warn!("No emissions data to plot");
        return Ok(());
    }

    plot_scope_distribution(output_dir, shares)?;
    plot_emission_hotspots(output_dir, records)?;
    plot_scenario_costs(output_dir, scenarios)?;
    plot_compliance_timeline(output_dir, timeline)?;
    plot_reduction_vs_roi(output_dir, projects)?;

    info!("Charts have been saved to '{}'", output_dir);
    Ok(())
}

fn category_label(labels: &[String], x: f64) -> String {
    let idx = x.floor();
    if idx >= 0.0 && (idx as usize) < labels.len() && (x - idx - 0.5).abs() < 0.25 {
        labels[idx as usize].clone()
    } else {
        String::new()
    }
}

/// Wedge sizes, labels and colours for the scope pie; `None` when there is nothing to draw.
fn pie_slices(shares: &[ScopeShare]) -> Option<(Vec<f64>, Vec<String>, Vec<RGBColor>)> {
    let sizes: Vec<f64> = shares.iter().map(|s| s.emissions).collect();
    if sizes.iter().sum::<f64>() <= 0.0 {
        return None;
    }
    let labels = shares
        .iter()
        .map(|s| format!("{} ({:.1}%)", s.scope, s.percent))
        .collect();
    let colours = (0..shares.len()).map(|i| SCOPE_COLOURS[i % SCOPE_COLOURS.len()]).collect();
    Some((sizes, labels, colours))
}

/// Pie chart of total emissions per scope, labelled with each share.
fn plot_scope_distribution(output_dir: &str, shares: &[ScopeShare]) -> Result<()> {
    let path = format!("{}/1_scope_distribution.png", output_dir);
    let root = BitMapBackend::new(&path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let Some((sizes, labels, colours)) = pie_slices(shares) else {
        warn!("All scope totals are zero, skipping scope distribution chart");
        return Ok(());
    };

    let root = root.titled("Total Emissions by Scope", ("sans-serif", 50).into_font())?;
    let (width, height) = root.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = f64::from(width.min(height)) * 0.35;

    let mut pie = Pie::new(&center, &radius, &sizes, &colours, &labels);
    pie.start_angle(-90.0);
    pie.label_style(("sans-serif", 24).into_font().color(&BLACK));
    pie.percentages(("sans-serif", 20).into_font().color(&WHITE));
    root.draw(&pie)?;

    root.present()?;
    Ok(())
}

/// Grouped bars of Scope 1, 2 and 3 per business unit.
fn plot_emission_hotspots(output_dir: &str, records: &[EmissionsRecord]) -> Result<()> {
    let path = format!("{}/2_emission_hotspots.png", output_dir);
    let root = BitMapBackend::new(&path, (1280, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let labels: Vec<String> = records.iter().map(|r| r.business_unit.clone()).collect();
    let max = records
        .iter()
        .flat_map(|r| [r.scope1, r.scope2, r.scope3])
        .map(|v| v.unwrap_or(0.0))
        .fold(0.0, f64::max)
        .max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption("Emission Hotspots by Business Unit", ("sans-serif", 50).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(0f64..records.len() as f64, 0f64..max * 1.1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(records.len() * 4)
        .x_label_formatter(&|x| category_label(&labels, *x))
        .y_desc("Emissions (MT CO2e)")
        .draw()?;

    let bar_width = 0.25;
    for (scope_idx, scope_name) in ["Scope 1", "Scope 2", "Scope 3"].iter().enumerate() {
        let colour = SCOPE_COLOURS[scope_idx];
        chart
            .draw_series(records.iter().enumerate().map(|(i, r)| {
                let value = [r.scope1, r.scope2, r.scope3][scope_idx].unwrap_or(0.0);
                let x0 = i as f64 + 0.125 + scope_idx as f64 * bar_width;
                Rectangle::new([(x0, 0.0), (x0 + bar_width, value)], colour.filled())
            }))?
            .label(*scope_name)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], colour.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Carbon tax cost per business unit for each scenario side by side.
fn plot_scenario_costs(output_dir: &str, scenarios: &[(Scenario, Vec<ScenarioResult>)]) -> Result<()> {
    let path = format!("{}/3_scenario_costs.png", output_dir);
    let root = BitMapBackend::new(&path, (1280, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let Some((_, first_results)) = scenarios.first() else {
        return Ok(());
    };
    let labels: Vec<String> = first_results.iter().map(|r| r.business_unit.clone()).collect();
    let max = scenarios
        .iter()
        .flat_map(|(_, results)| results.iter().map(|r| r.tax_cost))
        .fold(0.0, f64::max)
        .max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption("Carbon Tax Cost by Scenario", ("sans-serif", 50).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(100)
        .build_cartesian_2d(0f64..labels.len() as f64, 0f64..max * 1.1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len() * 4)
        .x_label_formatter(&|x| category_label(&labels, *x))
        .y_desc("Cost (USD)")
        .draw()?;

    let colours = [RGBColor(70, 130, 180), RGBColor(230, 140, 40)];
    let bar_width = 0.8 / scenarios.len() as f64;
    for (s_idx, (scenario, results)) in scenarios.iter().enumerate() {
        let colour = colours[s_idx % colours.len()];
        chart
            .draw_series(results.iter().enumerate().map(|(i, r)| {
                let x0 = i as f64 + 0.1 + s_idx as f64 * bar_width;
                Rectangle::new([(x0, 0.0), (x0 + bar_width, r.tax_cost)], colour.filled())
            }))?
            .label(scenario.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], colour.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

fn status_colour(name: &str) -> RGBColor {
    match name {
        "green" => RGBColor(60, 160, 90),
        "blue" => RGBColor(70, 130, 180),
        "orange" => RGBColor(240, 150, 40),
        "yellow" => RGBColor(230, 200, 40),
        "purple" => RGBColor(140, 80, 170),
        _ => RGBColor(128, 128, 128),
    }
}

/// Gantt chart from today to each regulation's deadline.
fn plot_compliance_timeline(output_dir: &str, timeline: &[TimelineEntry]) -> Result<()> {
    let path = format!("{}/4_compliance_timeline.png", output_dir);
    let root = BitMapBackend::new(&path, (1280, 512)).into_drawing_area();
    root.fill(&WHITE)?;

    let Some(origin) = timeline.iter().flat_map(|e| [e.start, e.end]).min() else {
        return Ok(());
    };
    let span = timeline
        .iter()
        .flat_map(|e| [e.start, e.end])
        .map(|d| (d - origin).num_days())
        .max()
        .unwrap_or(0)
        .max(1) as f64;
    let labels: Vec<String> = timeline.iter().map(|e| e.name.clone()).collect();

    let mut chart = ChartBuilder::on(&root)
        .caption("Regulation Compliance Timeline", ("sans-serif", 36).into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(320)
        .build_cartesian_2d(0f64..span, 0f64..timeline.len() as f64)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(timeline.len() * 4)
        .y_label_formatter(&|y| category_label(&labels, *y))
        .x_label_formatter(&|x| (origin + chrono::Duration::days(*x as i64)).to_string())
        .x_desc("Date")
        .draw()?;

    chart.draw_series(timeline.iter().enumerate().map(|(i, e)| {
        let a = (e.start - origin).num_days() as f64;
        let b = (e.end - origin).num_days() as f64;
        let (x0, x1) = if a <= b { (a, b) } else { (b, a) };
        Rectangle::new(
            [(x0, i as f64 + 0.2), (x1.max(x0 + 1.0), i as f64 + 0.8)],
            status_colour(e.colour).filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}

/// Scatter of carbon reduction against ROI, bubble size scaled by project cost.
fn plot_reduction_vs_roi(output_dir: &str, projects: &[ReductionProject]) -> Result<()> {
    let path = format!("{}/5_reduction_vs_roi.png", output_dir);
    let root = BitMapBackend::new(&path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_reduction = projects.iter().map(|p| p.carbon_reduction_mt).fold(0.0, f64::max).max(1.0);
    let max_roi = projects.iter().map(|p| p.roi_percent).fold(0.0, f64::max).max(1.0);
    let max_cost = projects.iter().map(|p| p.cost_usd).fold(0.0, f64::max).max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption("Carbon Reduction vs ROI", ("sans-serif", 50).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..max_reduction * 1.2, 0f64..max_roi * 1.3)?;

    chart
        .configure_mesh()
        .x_desc("Carbon Reduction (MT CO2e)")
        .y_desc("ROI (%)")
        .draw()?;

    let colours = [RED, GREEN, BLUE, MAGENTA, CYAN];
    for (i, project) in projects.iter().enumerate() {
        let colour = colours[i % colours.len()];
        let radius = (8.0 + 32.0 * (project.cost_usd / max_cost)) as i32;
        chart
            .draw_series(std::iter::once(Circle::new(
                (project.carbon_reduction_mt, project.roi_percent),
                radius,
                colour.mix(0.6).filled(),
            )))?
            .label(project.project.as_str())
            .legend(move |(x, y)| Circle::new((x + 10, y), 5, colour.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clear_core::{analysis, dataset::sample_dataset};

    #[test]
    fn category_labels_only_at_bar_centres() {
        let labels = vec!["Dairy".to_string(), "Meat".to_string()];
        assert_eq!(category_label(&labels, 0.5), "Dairy");
        assert_eq!(category_label(&labels, 1.5), "Meat");
        assert_eq!(category_label(&labels, 1.0), "");
        assert_eq!(category_label(&labels, 2.5), "");
    }

    #[test]
    fn pie_slices_follow_scope_shares() {
        let shares = analysis::scope_distribution(&analysis::totals(&sample_dataset()));
        let (sizes, labels, colours) = pie_slices(&shares).unwrap();
        assert_eq!(sizes, vec![33000.0, 10000.0, 180000.0]);
        assert_eq!(labels.len(), 3);
        assert!(labels[2].ends_with("(80.7%)"));
        assert_eq!(colours.len(), sizes.len());

        let empty = analysis::scope_distribution(&analysis::EmissionsTotals::default());
        assert!(pie_slices(&empty).is_none());
    }
}
