//! Per-session state and the reducer that advances it.
//!
//! The caller owns a [`SessionState`] and threads it through [`reduce`] for
//! every user action. Nothing here touches global state or the filesystem.

use crate::{
    dataset::{parse_emissions, LoadedDataset},
    regulatory::seed_tasks,
    scenario::{default_scenarios, validate_parameters},
};
use clear_schemas::{
    emissions::{DatasetSource, ManualEntry},
    regulation::ComplianceTask,
    scenario::{Scenario, ScenarioParameters, ScenarioSlot},
};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A message for the user produced while handling an action.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub started: bool,
    pub dataset: LoadedDataset,
    pub tasks: Vec<ComplianceTask>,
    pub manual_entries: Vec<ManualEntry>,
    pub scenarios: [Scenario; 2],
    pub export_slot: ScenarioSlot,
}

impl SessionState {
    /// Fresh session over an already loaded dataset, with the seed task list.
    pub fn new(dataset: LoadedDataset) -> Self {
        Self {
            started: false,
            dataset,
            tasks: seed_tasks(),
            manual_entries: Vec::new(),
            scenarios: default_scenarios(),
            export_slot: ScenarioSlot::First,
        }
    }

    pub fn scenario(&self, slot: ScenarioSlot) -> &Scenario {
        &self.scenarios[slot.index()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Start,
    AddTask(ComplianceTask),
    DeleteTask(String),
    UploadDataset { name: String, contents: String },
    AddManualEntry(ManualEntry),
    SetScenario { slot: ScenarioSlot, params: ScenarioParameters },
    SelectExport(ScenarioSlot),
}

/// Applies one action, returning the next state and any notices to show.
pub fn reduce(mut state: SessionState, action: Action) -> (SessionState, Vec<Notice>) {
    let mut notices = Vec::new();
    debug!("Reducing session action: {:?}", action);

    match action {
        Action::Start => {
            state.started = true;
        }
        Action::AddTask(task) => {
            if task.task.trim().is_empty() {
                notices.push(Notice::new(NoticeLevel::Warning, "Task name must not be empty."));
            } else {
                state.tasks.push(task);
                notices.push(Notice::new(NoticeLevel::Success, "Task added successfully!"));
            }
        }
        Action::DeleteTask(name) => {
            let before = state.tasks.len();
            state.tasks.retain(|t| t.task != name);
            if state.tasks.len() == before {
                notices.push(Notice::new(NoticeLevel::Warning, format!("No task named '{}'.", name)));
            } else {
                notices.push(Notice::new(NoticeLevel::Success, "Task deleted successfully!"));
            }
        }
        Action::UploadDataset { name, contents } => match parse_emissions(&name, contents.as_bytes()) {
            Ok(records) => {
                notices.push(Notice::new(
                    NoticeLevel::Success,
                    format!("Data uploaded successfully ({} business units).", records.len()),
                ));
                state.dataset = LoadedDataset {
                    records,
                    source: DatasetSource::Uploaded,
                    warning: None,
                };
            }
            Err(e) => {
                notices.push(Notice::new(
                    NoticeLevel::Error,
                    format!("{}. Keeping the current data.", e),
                ));
            }
        },
        Action::AddManualEntry(entry) => {
            let values = [entry.scope1, entry.scope2, entry.scope3];
            if entry.business_unit.trim().is_empty() {
                notices.push(Notice::new(NoticeLevel::Warning, "Business unit must not be empty."));
            } else if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
                notices.push(Notice::new(NoticeLevel::Warning, "Emissions must be non-negative numbers."));
            } else {
                notices.push(Notice::new(
                    NoticeLevel::Success,
                    format!(
                        "Added entry for {} | S1={} | S2={} | S3={}",
                        entry.business_unit, entry.scope1, entry.scope2, entry.scope3
                    ),
                ));
                state.manual_entries.push(entry);
            }
        }
        Action::SetScenario { slot, params } => match validate_parameters(&params) {
            Ok(()) => {
                state.scenarios[slot.index()].parameters = params;
            }
            Err(e) => notices.push(Notice::new(NoticeLevel::Error, e.to_string())),
        },
        Action::SelectExport(slot) => {
            state.export_slot = slot;
            notices.push(Notice::new(
                NoticeLevel::Info,
                format!("{} selected for export.", state.scenario(slot).name),
            ));
        }
    }

    (state, notices)
}
