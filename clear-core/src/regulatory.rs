use crate::error::{ClearError, ClearResult};
use chrono::{Months, NaiveDate};
use clear_schemas::{
    audit::AuditItem,
    project::ReductionProject,
    regulation::{ComplianceStatus, ComplianceTask, Regulation, TaskStatus},
};
use serde::Serialize;

pub const DEFAULT_HORIZON_MONTHS: u32 = 6;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

fn regulation(name: &str, description: &str, status: ComplianceStatus, deadline: NaiveDate) -> Regulation {
    Regulation {
        name: name.to_string(),
        description: description.to_string(),
        status,
        deadline,
    }
}

/// Reference list of regulations the organisation reports against.
pub fn regulations() -> Vec<Regulation> {
    vec![
        regulation(
            "CBAM (Carbon Border Adjustment Mechanism)",
            "Imposes a carbon tax on imported goods based on their embedded emissions.",
            ComplianceStatus::InCompliance,
            date(2025, 12, 31),
        ),
        regulation(
            "ISO 14001 Certification",
            "Certification for environmental management systems.",
            ComplianceStatus::RenewalDue,
            date(2024, 6, 30),
        ),
        regulation(
            "GHG Protocol Verification",
            "Ensures comprehensive GHG accounting and reporting.",
            ComplianceStatus::Completed,
            date(2023, 12, 15),
        ),
        regulation(
            "EU Carbon Reporting",
            "Mandates detailed carbon reporting for goods exported to the EU.",
            ComplianceStatus::PendingSubmission,
            date(2024, 10, 1),
        ),
        regulation(
            "Local Water Use Regulation",
            "Limits industrial water use based on local laws.",
            ComplianceStatus::InProgress,
            date(2025, 3, 31),
        ),
    ]
}

/// Tasks every new session starts with.
pub fn seed_tasks() -> Vec<ComplianceTask> {
    let task = |task: &str, regulation: &str, status, due_date| ComplianceTask {
        task: task.to_string(),
        regulation: regulation.to_string(),
        status,
        due_date,
    };
    vec![
        task("Prepare CBAM submission", "CBAM", TaskStatus::NotStarted, date(2024, 10, 1)),
        task("Schedule ISO 14001 audit", "ISO 14001", TaskStatus::InProgress, date(2024, 6, 30)),
        task("Verify GHG report", "GHG Protocol", TaskStatus::Completed, date(2023, 12, 15)),
    ]
}

pub fn reduction_projects() -> Vec<ReductionProject> {
    [
        ("Solar Installation", 15000.0, 200000.0, 15.0),
        ("Energy Efficiency", 8000.0, 50000.0, 20.0),
        ("Waste-to-Energy", 10000.0, 120000.0, 10.0),
        ("Supply Chain Optimization", 12000.0, 75000.0, 18.0),
    ]
    .into_iter()
    .map(|(project, carbon_reduction_mt, cost_usd, roi_percent)| ReductionProject {
        project: project.to_string(),
        carbon_reduction_mt,
        cost_usd,
        roi_percent,
    })
    .collect()
}

pub fn audit_schedule() -> Vec<AuditItem> {
    [
        ("Next Internal Audit", "May 2025"),
        ("External Certification", "ISO 14001 (Renewal due Q2 2026)"),
        ("GHG Protocol Verification", "Completed Q4 2024"),
    ]
    .into_iter()
    .map(|(label, schedule)| AuditItem {
        label: label.to_string(),
        schedule: schedule.to_string(),
    })
    .collect()
}

fn horizon_end(today: NaiveDate, months: u32) -> NaiveDate {
    today.checked_add_months(Months::new(months)).unwrap_or(NaiveDate::MAX)
}

/// Regulations due on or before `today + months`. Overdue deadlines are included.
pub fn upcoming_deadlines(regulations: &[Regulation], today: NaiveDate, months: u32) -> Vec<Regulation> {
    let cutoff = horizon_end(today, months);
    regulations
        .iter()
        .filter(|r| r.deadline <= cutoff)
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Priority {
    Urgent,
    NeedsAttention,
    OnTrack,
}

impl Priority {
    pub fn message(&self) -> &'static str {
        match self {
            Priority::Urgent => "This regulation has an urgent deadline within the next month!",
            Priority::NeedsAttention => "This regulation requires immediate attention due to pending compliance actions.",
            Priority::OnTrack => "This regulation is currently in compliance.",
        }
    }
}

pub fn prioritize(regulation: &Regulation, today: NaiveDate) -> Priority {
    if regulation.deadline <= horizon_end(today, 1) {
        Priority::Urgent
    } else if matches!(
        regulation.status,
        ComplianceStatus::PendingSubmission | ComplianceStatus::RenewalDue
    ) {
        Priority::NeedsAttention
    } else {
        Priority::OnTrack
    }
}

/// Looks a regulation up by exact name, falling back to a case-insensitive prefix match.
pub fn find_regulation<'a>(regulations: &'a [Regulation], name: &str) -> ClearResult<&'a Regulation> {
    let needle = name.trim().to_lowercase();
    regulations
        .iter()
        .find(|r| r.name == name)
        .or_else(|| regulations.iter().find(|r| r.name.to_lowercase().starts_with(&needle)))
        .ok_or_else(|| ClearError::UnknownRegulation(name.to_string()))
}

/// One bar of the compliance Gantt chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub colour: &'static str,
}

pub fn timeline(regulations: &[Regulation], today: NaiveDate) -> Vec<TimelineEntry> {
    regulations
        .iter()
        .map(|r| TimelineEntry {
            name: r.name.clone(),
            start: today,
            end: r.deadline,
            colour: r.status.colour(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizon_filters_deadlines() {
        let regs = regulations();
        let upcoming = upcoming_deadlines(&regs, date(2024, 5, 1), 6);
        let names: Vec<&str> = upcoming.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["ISO 14001 Certification", "GHG Protocol Verification", "EU Carbon Reporting"]
        );
        assert!(upcoming_deadlines(&regs, date(2020, 1, 1), 6).is_empty());
        assert_eq!(upcoming_deadlines(&regs, date(2026, 1, 1), 0).len(), 5);
    }

    #[test]
    fn priority_rules() {
        let regs = regulations();
        let today = date(2024, 8, 1);
        // Water use: deadline far away, in progress.
        assert_eq!(prioritize(&regs[4], today), Priority::OnTrack);
        // EU reporting: pending submission, two months out.
        assert_eq!(prioritize(&regs[3], today), Priority::NeedsAttention);
        // EU reporting: three weeks out.
        assert_eq!(prioritize(&regs[3], date(2024, 9, 10)), Priority::Urgent);
        // GHG verification is already past.
        assert_eq!(prioritize(&regs[2], today), Priority::Urgent);
    }

    #[test]
    fn lookup_by_prefix() {
        let regs = regulations();
        assert_eq!(find_regulation(&regs, "cbam").unwrap().status, ComplianceStatus::InCompliance);
        assert!(matches!(
            find_regulation(&regs, "Nope"),
            Err(ClearError::UnknownRegulation(_))
        ));
    }

    #[test]
    fn timeline_colours_follow_status() {
        let today = date(2024, 1, 1);
        let entries = timeline(&regulations(), today);
        assert_eq!(entries.len(), 5);
        assert!(entries.iter().all(|e| e.start == today));
        assert_eq!(entries[2].colour, "green");
        assert_eq!(entries[3].colour, "orange");
    }

    #[test]
    fn reference_lists() {
        assert_eq!(seed_tasks().len(), 3);
        assert_eq!(reduction_projects()[1].roi_percent, 20.0);
        assert_eq!(audit_schedule().len(), 3);
    }
}
