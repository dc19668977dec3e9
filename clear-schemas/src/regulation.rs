use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    InCompliance,
    RenewalDue,
    Completed,
    PendingSubmission,
    InProgress,
}

impl ComplianceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ComplianceStatus::InCompliance => "In Compliance",
            ComplianceStatus::RenewalDue => "Renewal Due",
            ComplianceStatus::Completed => "Completed",
            ComplianceStatus::PendingSubmission => "Pending Submission",
            ComplianceStatus::InProgress => "In Progress",
        }
    }

    /// Timeline colour used when charting the status.
    pub fn colour(&self) -> &'static str {
        match self {
            ComplianceStatus::Completed => "green",
            ComplianceStatus::InCompliance => "blue",
            ComplianceStatus::PendingSubmission => "orange",
            ComplianceStatus::RenewalDue => "yellow",
            ComplianceStatus::InProgress => "purple",
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regulation {
    pub name: String,
    pub description: String,
    pub status: ComplianceStatus,
    pub deadline: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "Not Started",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "not started" => Some(TaskStatus::NotStarted),
            "in progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

/// An entry in the session's compliance task list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceTask {
    pub task: String,
    pub regulation: String,
    pub status: TaskStatus,
    pub due_date: NaiveDate,
}
