//! Line-oriented interactive session driving the session reducer.
//!
//! Each input line is parsed into an [`Input`]; state-changing inputs become
//! reducer actions, the rest are views over the current state.

use crate::report;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clear_core::{
    error::ClearResult,
    export,
    scenario::{compare_scenarios, compute_scenario},
    session::{reduce, Action, Notice, NoticeLevel, SessionState},
};
use clear_schemas::{
    emissions::ManualEntry,
    regulation::{ComplianceTask, TaskStatus},
    scenario::{ScenarioParameters, ScenarioResult, ScenarioSlot},
};
use log::info;
use std::{
    fs,
    io::{BufRead, Write},
};

pub const HELP: &str = "\
Commands:
  start                                         leave the landing page
  overview                                      emissions overview
  tasks                                         list compliance tasks
  add-task <name> | <regulation> | <status> | <YYYY-MM-DD>
  delete-task <name>
  upload <path.csv>                             replace the session data
  entry <business unit> | <s1> | <s2> | <s3>     record a manual entry
  entries                                       list manual entries
  scenario <1|2> <tax> <renewable%> <efficiency%>
  results                                       compare both scenarios
  select-export <1|2>
  export <path>                                 write the selected scenario
  help | quit";

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Act(Action),
    Overview,
    Tasks,
    Entries,
    Upload(String),
    Results,
    Export(String),
    Help,
    Quit,
    Empty,
}

fn parse_slot(s: &str) -> Result<ScenarioSlot, String> {
    s.trim()
        .parse::<u8>()
        .ok()
        .and_then(ScenarioSlot::from_number)
        .ok_or_else(|| format!("Expected scenario 1 or 2, got '{}'", s.trim()))
}

fn parse_number(s: &str, what: &str) -> Result<f64, String> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid {}: '{}'", what, s.trim()))
}

fn pipe_fields(rest: &str, expected: usize, usage: &str) -> Result<Vec<String>, String> {
    let fields: Vec<String> = rest.split('|').map(|f| f.trim().to_string()).collect();
    if fields.len() != expected {
        return Err(format!("Usage: {}", usage));
    }
    Ok(fields)
}

pub fn parse_line(line: &str) -> Result<Input, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Input::Empty);
    }
    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "start" => Ok(Input::Act(Action::Start)),
        "overview" => Ok(Input::Overview),
        "tasks" => Ok(Input::Tasks),
        "entries" => Ok(Input::Entries),
        "results" => Ok(Input::Results),
        "help" => Ok(Input::Help),
        "quit" | "exit" => Ok(Input::Quit),
        "add-task" => {
            let f = pipe_fields(rest, 4, "add-task <name> | <regulation> | <status> | <YYYY-MM-DD>")?;
            let status = TaskStatus::parse(&f[2]).ok_or_else(|| format!("Unknown status '{}'", f[2]))?;
            let due_date = f[3]
                .parse::<NaiveDate>()
                .map_err(|_| format!("Invalid date '{}'", f[3]))?;
            Ok(Input::Act(Action::AddTask(ComplianceTask {
                task: f[0].clone(),
                regulation: f[1].clone(),
                status,
                due_date,
            })))
        }
        "delete-task" if !rest.is_empty() => Ok(Input::Act(Action::DeleteTask(rest.to_string()))),
        "upload" if !rest.is_empty() => Ok(Input::Upload(rest.to_string())),
        "export" if !rest.is_empty() => Ok(Input::Export(rest.to_string())),
        "entry" => {
            let f = pipe_fields(rest, 4, "entry <business unit> | <s1> | <s2> | <s3>")?;
            Ok(Input::Act(Action::AddManualEntry(ManualEntry {
                business_unit: f[0].clone(),
                scope1: parse_number(&f[1], "scope 1")?,
                scope2: parse_number(&f[2], "scope 2")?,
                scope3: parse_number(&f[3], "scope 3")?,
            })))
        }
        "scenario" => {
            let parts: Vec<&str> = rest.split_whitespace().collect();
            if parts.len() != 4 {
                return Err("Usage: scenario <1|2> <tax> <renewable%> <efficiency%>".to_string());
            }
            Ok(Input::Act(Action::SetScenario {
                slot: parse_slot(parts[0])?,
                params: ScenarioParameters::new(
                    parse_number(parts[1], "tax rate")?,
                    parse_number(parts[2], "renewable fraction")?,
                    parse_number(parts[3], "efficiency fraction")?,
                ),
            }))
        }
        "delete-task" | "upload" | "export" => Err(format!("Usage: {} <argument>", command)),
        "select-export" => Ok(Input::Act(Action::SelectExport(parse_slot(rest)?))),
        other => Err(format!("Unknown command '{}'. Type 'help' for a list.", other)),
    }
}

fn print_notices<W: Write>(out: &mut W, notices: &[Notice]) -> Result<()> {
    for notice in notices {
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        writeln!(out, "[{}] {}", tag, notice.message)?;
    }
    Ok(())
}

fn landing<W: Write>(out: &mut W, state: &SessionState) -> Result<()> {
    writeln!(out, "Welcome to the CLEAR Environmental Decision Dashboard")?;
    writeln!(
        out,
        "Compliance, Lifecycle Emissions Analysis, and Reporting: analyse impacts, estimate carbon costs, track regulations and model scenarios."
    )?;
    match &state.dataset.warning {
        Some(warning) => writeln!(out, "{}", warning)?,
        None => writeln!(out, "Emissions data loaded successfully!")?,
    }
    writeln!(out, "Type 'start' to begin, or 'help' for commands.")?;
    Ok(())
}

/// Runs the session until `quit` or end of input, returning the final state.
pub fn run_session<R: BufRead, W: Write>(mut state: SessionState, input: R, out: &mut W) -> Result<SessionState> {
    landing(out, &state)?;

    for line in input.lines() {
        let line = line.context("Failed to read session input")?;
        let parsed = match parse_line(&line) {
            Ok(parsed) => parsed,
            Err(message) => {
                writeln!(out, "[error] {}", message)?;
                continue;
            }
        };

        let allowed_before_start = matches!(
            parsed,
            Input::Act(Action::Start) | Input::Help | Input::Quit | Input::Empty
        );
        if !state.started && !allowed_before_start {
            writeln!(out, "Type 'start' to begin.")?;
            continue;
        }

        match parsed {
            Input::Empty => {}
            Input::Quit => break,
            Input::Help => writeln!(out, "{}", HELP)?,
            Input::Act(action) => {
                let (next, notices) = reduce(state, action);
                state = next;
                print_notices(out, &notices)?;
            }
            Input::Upload(path) => {
                let action = match fs::read_to_string(&path) {
                    Ok(contents) => Action::UploadDataset { name: path, contents },
                    Err(e) => {
                        writeln!(out, "[error] Could not read '{}': {}", path, e)?;
                        continue;
                    }
                };
                let (next, notices) = reduce(state, action);
                state = next;
                print_notices(out, &notices)?;
            }
            Input::Overview => report::print_overview(out, &state.dataset)?,
            Input::Tasks => report::print_tasks(out, &state.tasks)?,
            Input::Entries => report::print_manual_entries(out, &state.manual_entries)?,
            Input::Results => match scenario_pair(&state) {
                Ok((first, second)) => {
                    report::print_scenario_results(out, &state.scenarios[0], &first)?;
                    report::print_scenario_results(out, &state.scenarios[1], &second)?;
                    let comparison = compare_scenarios(&first, &second);
                    report::print_financial_impact(out, &state.scenarios, &comparison)?;
                    report::print_recommendation(out, &state.scenarios, &comparison)?;
                }
                Err(e) => writeln!(out, "[error] {}", e)?,
            },
            Input::Export(path) => {
                let scenario = state.scenario(state.export_slot);
                let written = compute_scenario(&state.dataset.records, &scenario.parameters)
                    .map_err(anyhow::Error::from)
                    .and_then(|results| {
                        let file = fs::File::create(&path)
                            .with_context(|| format!("Failed to create '{}'", path))?;
                        export::write_results(file, &results)?;
                        Ok(())
                    });
                match written {
                    Ok(()) => {
                        info!("Exported {} to '{}'", scenario.name, path);
                        writeln!(out, "[ok] {} exported to '{}'", scenario.name, path)?;
                    }
                    Err(e) => writeln!(out, "[error] {:#}", e)?,
                }
            }
        }
    }

    Ok(state)
}

fn scenario_pair(state: &SessionState) -> ClearResult<(Vec<ScenarioResult>, Vec<ScenarioResult>)> {
    let records = &state.dataset.records;
    Ok((
        compute_scenario(records, &state.scenarios[0].parameters)?,
        compute_scenario(records, &state.scenarios[1].parameters)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clear_core::dataset::{sample_dataset, LoadedDataset};
    use clear_schemas::emissions::DatasetSource;

    fn state() -> SessionState {
        SessionState::new(LoadedDataset {
            records: sample_dataset(),
            source: DatasetSource::Sample,
            warning: Some("File not found: 'x.csv'. Using sample data instead.".to_string()),
        })
    }

    #[test]
    fn parses_task_line() {
        let input = parse_line("add-task File EU report | EU Carbon Reporting | in progress | 2024-10-01").unwrap();
        match input {
            Input::Act(Action::AddTask(task)) => {
                assert_eq!(task.task, "File EU report");
                assert_eq!(task.status, TaskStatus::InProgress);
                assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 10, 1).unwrap());
            }
            other => panic!("unexpected input: {other:?}"),
        }
    }

    #[test]
    fn parses_scenario_line() {
        assert_eq!(
            parse_line("scenario 2 100 60 15").unwrap(),
            Input::Act(Action::SetScenario {
                slot: ScenarioSlot::Second,
                params: ScenarioParameters::new(100.0, 60.0, 15.0),
            })
        );
        assert!(parse_line("scenario 3 1 1 1").is_err());
        assert!(parse_line("scenario 1 x 1 1").is_err());
    }

    #[test]
    fn rejects_unknown_and_incomplete_commands() {
        assert!(parse_line("dance").is_err());
        assert!(parse_line("entry only-name").is_err());
        assert!(parse_line("delete-task").is_err());
        assert_eq!(parse_line("   ").unwrap(), Input::Empty);
    }

    #[test]
    fn commands_are_gated_until_start() {
        let script = "tasks\ndelete-task Verify GHG report\nstart\ndelete-task Verify GHG report\nquit\ntasks\n";
        let mut out = Vec::new();
        let final_state = run_session(state(), script.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(final_state.started);
        assert_eq!(final_state.tasks.len(), 2);
        assert_eq!(text.matches("Type 'start' to begin.").count(), 2);
        assert!(text.contains("[ok] Task deleted successfully!"));
        assert!(text.contains("Using sample data instead."));
    }

    #[test]
    fn export_writes_selected_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let script = format!("start\nselect-export 2\nexport {}\n", path.display());
        let mut out = Vec::new();
        run_session(state(), script.as_bytes(), &mut out).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let results = export::read_results(written.as_bytes()).unwrap();
        assert_eq!(results.len(), 5);
        // Scenario 2 defaults: tax 25, renewable 75, efficiency 20.
        assert!((results[0].tax_cost - (8000.0 + 750.0 + 50000.0) * 25.0).abs() < 1e-6);
    }

    #[test]
    fn views_are_written_to_the_session_output() {
        let script = "start\ntasks\nentry Dairy | 1 | 2 | 3\nentries\nresults\noverview\n";
        let mut out = Vec::new();
        run_session(state(), script.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("--- Current Tasks ---"));
        assert!(text.contains("Verify GHG report"));
        assert!(text.contains("--- Manual Entries ---"));
        assert!(text.contains("Dairy | S1=1 | S2=2 | S3=3"));
        assert!(text.contains("#### Scenario 1 Results"));
        assert!(text.contains("#### Scenario 2 Results"));
        assert!(text.contains("--- Financial Impact Analysis ---"));
        assert!(text.contains("Scenario 2 is more cost-effective"));
        assert!(text.contains("--- Scope 1, 2, and 3 Emissions Overview ---"));
    }
}
