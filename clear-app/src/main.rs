use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use clear_core::{
    analysis,
    dataset::{self, LoadedDataset},
    export,
    ledger::ScenarioLedger,
    regulatory,
    scenario::{self, compare_scenarios, compute_scenario, total_cost, ScenarioComparison},
    session::SessionState,
};
use clear_schemas::{
    emissions::EmissionsRecord,
    scenario::{Scenario, ScenarioParameters, ScenarioResult, ScenarioSlot},
};
use log::info;
use std::{
    fs,
    io::{self, Write},
    path::Path,
};

mod config;
mod interactive;
mod plotting;
mod report;

use config::AppConfig;

/// CLEAR: Compliance, Lifecycle Emissions Analysis, and Reporting.
#[derive(Debug, Parser)]
#[command(name = "clear", version, about)]
struct Cli {
    /// YAML configuration file; defaults apply when it does not exist.
    #[arg(long, default_value = "clear.yaml")]
    config: String,

    /// Emissions data file, overriding the configured path.
    #[arg(long)]
    data: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Emissions table with totals, scope distribution, intensities and hotspots.
    Overview {
        #[arg(long)]
        json: bool,
    },
    /// Compare two carbon-tax scenarios and optionally export one.
    Simulate(SimulateArgs),
    /// Regulatory summary, upcoming deadlines and compliance timeline.
    Regulations {
        /// Reference date for deadline calculations (defaults to today).
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Deadline horizon in months.
        #[arg(long)]
        months: Option<u32>,
        /// Show the priority assessment for one regulation.
        #[arg(long)]
        prioritize: Option<String>,
    },
    /// Audit and assurance schedule.
    Audit,
    /// Validate and preview a new emissions data file.
    Preview { path: String },
    /// Render all charts as PNG files.
    Plot {
        #[arg(long)]
        out_dir: Option<String>,
    },
    /// Interactive session reading commands from stdin.
    Session,
}

#[derive(Debug, Args)]
struct SimulateArgs {
    #[arg(long)]
    s1_tax: Option<f64>,
    #[arg(long)]
    s1_renewable: Option<f64>,
    #[arg(long)]
    s1_efficiency: Option<f64>,
    #[arg(long)]
    s2_tax: Option<f64>,
    #[arg(long)]
    s2_renewable: Option<f64>,
    #[arg(long)]
    s2_efficiency: Option<f64>,
    /// Scenario to export as CSV (1 or 2).
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
    export: Option<u8>,
    /// Export path; defaults to a timestamped run directory.
    #[arg(long, requires = "export")]
    out: Option<String>,
    #[arg(long)]
    json: bool,
}

fn override_params(base: ScenarioParameters, tax: Option<f64>, renewable: Option<f64>, efficiency: Option<f64>) -> ScenarioParameters {
    ScenarioParameters {
        carbon_tax_rate: tax.unwrap_or(base.carbon_tax_rate),
        renewable_fraction: renewable.unwrap_or(base.renewable_fraction),
        efficiency_fraction: efficiency.unwrap_or(base.efficiency_fraction),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = AppConfig::load(&cli.config)?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::Overview { json } => run_overview(&mut out, &config, json),
        Commands::Simulate(args) => run_simulate(&mut out, &config, args),
        Commands::Regulations { today, months, prioritize } => {
            run_regulations(&mut out, &config, today, months, prioritize)
        }
        Commands::Audit => {
            report::print_audit(&mut out, &regulatory::audit_schedule())?;
            report::print_footer(&mut out)?;
            Ok(())
        }
        Commands::Preview { path } => run_preview(&mut out, &path),
        Commands::Plot { out_dir } => run_plot(&mut out, &config, out_dir),
        Commands::Session => {
            let dataset = dataset::load_emissions(&config.data_path);
            let mut state = SessionState::new(dataset);
            state.scenarios = config.scenarios.clone();
            let stdin = io::stdin();
            interactive::run_session(state, stdin.lock(), &mut out)?;
            Ok(())
        }
    }
}

fn overview_json(dataset: &LoadedDataset) -> serde_json::Value {
    let totals = analysis::totals(&dataset.records);
    serde_json::json!({
        "source": dataset.source,
        "warning": dataset.warning,
        "records": dataset.records,
        "totals": totals,
        "distribution": analysis::scope_distribution(&totals),
        "intensity": analysis::intensity_metrics(&dataset.records),
        "hotspots": analysis::hotspots(&dataset.records),
    })
}

fn run_overview(out: &mut impl Write, config: &AppConfig, json: bool) -> Result<()> {
    let dataset = dataset::load_emissions(&config.data_path);
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&overview_json(&dataset))?)?;
        return Ok(());
    }
    report::print_dataset_notice(out, &dataset)?;
    report::print_overview(out, &dataset)?;
    report::print_footer(out)?;
    Ok(())
}

fn evaluate(records: &[EmissionsRecord], scenarios: &[Scenario; 2]) -> Result<[Vec<ScenarioResult>; 2]> {
    let first = compute_scenario(records, &scenarios[0].parameters)
        .with_context(|| format!("Failed to compute {}", scenarios[0].name))?;
    let second = compute_scenario(records, &scenarios[1].parameters)
        .with_context(|| format!("Failed to compute {}", scenarios[1].name))?;
    Ok([first, second])
}

fn simulate_json(
    dataset: &LoadedDataset,
    scenarios: &[Scenario; 2],
    results: &[Vec<ScenarioResult>; 2],
    comparison: &ScenarioComparison,
) -> serde_json::Value {
    serde_json::json!({
        "source": dataset.source,
        "warning": dataset.warning,
        "scenarios": scenarios.iter().zip(results.iter()).map(|(s, r)| serde_json::json!({
            "name": s.name,
            "parameters": s.parameters,
            "results": r,
            "total_cost": total_cost(r),
        })).collect::<Vec<_>>(),
        "comparison": comparison,
        "recommendation": comparison.recommendation(),
    })
}

fn run_simulate(out: &mut impl Write, config: &AppConfig, args: SimulateArgs) -> Result<()> {
    let mut scenarios = config.scenarios.clone();
    scenarios[0].parameters = override_params(scenarios[0].parameters, args.s1_tax, args.s1_renewable, args.s1_efficiency);
    scenarios[1].parameters = override_params(scenarios[1].parameters, args.s2_tax, args.s2_renewable, args.s2_efficiency);
    for s in &scenarios {
        scenario::validate_parameters(&s.parameters).with_context(|| format!("Invalid parameters for {}", s.name))?;
    }

    let dataset = dataset::load_emissions(&config.data_path);
    let results = evaluate(&dataset.records, &scenarios)?;
    let comparison = compare_scenarios(&results[0], &results[1]);

    if args.json {
        let body = simulate_json(&dataset, &scenarios, &results, &comparison);
        writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
    } else {
        report::print_dataset_notice(out, &dataset)?;
        writeln!(out, "\n--- Scenario Results ---")?;
        for (s, r) in scenarios.iter().zip(results.iter()) {
            report::print_scenario_results(out, s, r)?;
        }
        report::print_financial_impact(out, &scenarios, &comparison)?;
        report::print_projects(out, &regulatory::reduction_projects())?;
        report::print_recommendation(out, &scenarios, &comparison)?;
    }

    if let Some(n) = args.export {
        let slot = ScenarioSlot::from_number(n).context("Export scenario must be 1 or 2")?;
        let chosen = &scenarios[slot.index()];
        let path = match args.out {
            Some(path) => path,
            None => {
                let run_dir = config.run_dir();
                fs::create_dir_all(&run_dir)
                    .with_context(|| format!("Failed to create output directory: {}", run_dir))?;

                let ledger_path = Path::new(&run_dir).join("scenario_summary.csv");
                let mut ledger = ScenarioLedger::new(&ledger_path.to_string_lossy())?;
                for (s, r) in scenarios.iter().zip(results.iter()) {
                    ledger.record(s, r)?;
                }
                Path::new(&run_dir)
                    .join(export::export_file_name(&chosen.name))
                    .to_string_lossy()
                    .into_owned()
            }
        };

        let file = fs::File::create(&path).with_context(|| format!("Failed to create export file: {}", path))?;
        export::write_results(file, &results[slot.index()])?;
        info!("Exported {} results to '{}'", chosen.name, path);
        if !args.json {
            writeln!(out, "\n{} exported to '{}'", chosen.name, path)?;
        }
    }

    if !args.json {
        report::print_footer(out)?;
    }
    Ok(())
}

fn run_regulations(
    out: &mut impl Write,
    config: &AppConfig,
    today: Option<NaiveDate>,
    months: Option<u32>,
    prioritize: Option<String>,
) -> Result<()> {
    let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
    let months = months.unwrap_or(config.deadline_horizon_months);
    let regulations = regulatory::regulations();

    report::print_regulatory_tracker(out, &regulations, &regulatory::seed_tasks(), today, months)?;

    if let Some(name) = prioritize {
        let regulation = regulatory::find_regulation(&regulations, &name)?;
        report::print_priority(out, regulation, regulatory::prioritize(regulation, today))?;
    }
    report::print_footer(out)?;
    Ok(())
}

fn run_preview(out: &mut impl Write, path: &str) -> Result<()> {
    let records = dataset::read_emissions_file(Path::new(path))
        .with_context(|| format!("Could not load new emissions data from '{}'", path))?;
    writeln!(out, "Preview of new data:")?;
    report::print_emissions_table(out, &records, false)?;
    writeln!(out, "\nData validated successfully ({} business units).", records.len())?;
    Ok(())
}

fn run_plot(out: &mut impl Write, config: &AppConfig, out_dir: Option<String>) -> Result<()> {
    let output_dir = out_dir.unwrap_or_else(|| config.run_dir());
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir))?;

    let dataset = dataset::load_emissions(&config.data_path);
    report::print_dataset_notice(out, &dataset)?;
    let shares = analysis::scope_distribution(&analysis::totals(&dataset.records));
    let [first, second] = evaluate(&dataset.records, &config.scenarios)?;
    let scenario_results = vec![
        (config.scenarios[0].clone(), first),
        (config.scenarios[1].clone(), second),
    ];
    let today = chrono::Local::now().date_naive();
    let timeline = regulatory::timeline(&regulatory::regulations(), today);

    plotting::generate_all_plots(
        &output_dir,
        &dataset.records,
        &shares,
        &scenario_results,
        &timeline,
        &regulatory::reduction_projects(),
    )?;

    writeln!(out, "Charts written to '{}'", output_dir)?;
    Ok(())
}
