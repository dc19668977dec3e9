use clear_core::{
    dataset::{load_emissions, read_emissions_file, sample_dataset},
    error::ClearError,
    export::{read_results, write_results},
    ledger::ScenarioLedger,
    scenario::{compute_scenario, default_scenarios, total_cost},
};
use clear_schemas::emissions::DatasetSource;
use std::fs;
use tempfile::TempDir;

const FULL_HEADER: &str = "Business Unit,Scope 1 Emissions (MT CO2e),Scope 2 Emissions (MT CO2e),Scope 3 Emissions (MT CO2e),Electricity Consumption (MWh),Fuels Consumption (Liters),Direct Emissions (MT CO2e),Indirect Emissions (MT CO2e),Supply Chain Emissions (MT CO2e)";

fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

#[test]
fn loads_real_file_without_warning() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = write_file(
        &dir,
        "scope_data.csv",
        &format!(
            "{}\nYogurt,1200,300,9000,2500,4000,600,700,5000\nCheese,900,250,7000,0,3500,400,500,4000\n",
            FULL_HEADER
        ),
    );

    let loaded = load_emissions(&path);
    assert_eq!(loaded.source, DatasetSource::File);
    assert!(loaded.warning.is_none());
    assert_eq!(loaded.records.len(), 2);
    assert_eq!(loaded.records[1].electricity_mwh, Some(0.0));
    assert_eq!(loaded.records[0].supply_chain_emissions, Some(5000.0));
}

#[test]
fn malformed_file_degrades_to_sample_with_cause() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = write_file(&dir, "broken.csv", "Business Unit,Scope 1 Emissions (MT CO2e)\nYogurt,12\n");

    let loaded = load_emissions(&path);
    assert_eq!(loaded.source, DatasetSource::Sample);
    assert_eq!(loaded.records, sample_dataset());
    let warning = loaded.warning.expect("warning present");
    assert!(warning.contains("missing column"));
    assert!(warning.ends_with("Using sample data instead."));

    assert!(matches!(read_emissions_file(&path), Err(ClearError::FileParse(..))));
}

#[test]
fn missing_file_is_reported_by_strict_reader() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let err = read_emissions_file(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, ClearError::FileNotFound(_)));
}

#[test]
fn exported_file_reparses_to_same_costs() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let [scenario, _] = default_scenarios();
    let results = compute_scenario(&sample_dataset(), &scenario.parameters).expect("compute");

    let path = dir.path().join("Scenario 1_results.csv");
    write_results(fs::File::create(&path).expect("create export"), &results).expect("export");

    let parsed = read_results(fs::File::open(&path).expect("open export")).expect("re-read");
    assert_eq!(parsed, results);
    assert_eq!(total_cost(&parsed), total_cost(&results));
}

#[test]
fn ledger_writes_one_row_per_scenario() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("scenario_summary.csv");
    let records = sample_dataset();

    let mut ledger = ScenarioLedger::new(path.to_str().expect("utf-8 path")).expect("open ledger");
    for scenario in default_scenarios() {
        let results = compute_scenario(&records, &scenario.parameters).expect("compute");
        ledger.record(&scenario, &results).expect("record");
    }

    let text = fs::read_to_string(&path).expect("read ledger");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("scenario,carbon_tax_rate"));
    let fields: Vec<&str> = lines[1].split(',').collect();
    assert_eq!(fields[0], "Scenario 1");
    assert_eq!(fields[1].parse::<f64>().expect("tax"), 50.0);
    assert_eq!(fields[4], "5");
    assert!((fields[6].parse::<f64>().expect("cost") - 10_735_000.0).abs() < 1e-3);
}
