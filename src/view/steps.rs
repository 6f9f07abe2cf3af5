use crate::models::ProgressStatus;
use crate::session::AnalysisSession;
use crate::utils::formatting::format_step_duration;

pub struct StepInfo {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
}

/// The three stages the backend reports on.
pub static ANALYSIS_STEPS: &[StepInfo] = &[
    StepInfo {
        id: 1,
        name: "Analyzing Repository Content",
        description: "Analyzes README and repository structure",
    },
    StepInfo {
        id: 2,
        name: "Identifying Configuration Files",
        description: "Scanning for important configuration and dependency files",
    },
    StepInfo {
        id: 3,
        name: "Extracting Setup Instructions",
        description: "Generating tailored setup commands and instructions",
    },
];

pub const PREPARING_MESSAGE: &str = "Preparing to analyze...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

/// Derive a step's status from the session; nothing here is stored.
pub fn step_status(session: &AnalysisSession, step: u32) -> StepStatus {
    let latest = session.updates_for_step(step).last();
    if latest.map(|u| u.status) == Some(ProgressStatus::Failed) {
        return StepStatus::Failed;
    }
    if session.results.is_some() {
        return StepStatus::Completed;
    }

    let completed_event = session
        .updates_for_step(step)
        .any(|u| u.status == ProgressStatus::Completed);
    if completed_event || session.current_step > step {
        return StepStatus::Completed;
    }

    if session.current_step == step {
        if session.error.is_some() {
            return StepStatus::Failed;
        }
        if session.is_analyzing || latest.is_some() {
            return StepStatus::InProgress;
        }
    }
    StepStatus::Pending
}

pub fn current_message(session: &AnalysisSession) -> &str {
    session
        .latest_update()
        .map(|u| u.message.as_str())
        .unwrap_or(PREPARING_MESSAGE)
}

/// Backend-reported elapsed time of the latest event for `step`.
pub fn latest_elapsed(session: &AnalysisSession, step: u32) -> Option<f64> {
    session.updates_for_step(step).last().and_then(|u| u.elapsed_time)
}

/// One row of the step list.
#[derive(Debug, Clone, PartialEq)]
pub struct StepView {
    pub id: u32,
    pub name: String,
    pub status: StepStatus,
    pub elapsed: Option<String>,
    pub message: Option<String>,
}

/// Project the session onto the step list. Steps the backend reports beyond
/// the known three are appended using the name it sent.
pub fn project(session: &AnalysisSession) -> Vec<StepView> {
    let mut views: Vec<StepView> = ANALYSIS_STEPS
        .iter()
        .map(|s| view_for(session, s.id, s.name))
        .collect();

    let mut extra: Vec<(u32, &str)> = session
        .progress_updates
        .iter()
        .filter(|u| ANALYSIS_STEPS.iter().all(|s| s.id != u.step))
        .map(|u| (u.step, u.step_name.as_str()))
        .collect();
    extra.sort_by_key(|(id, _)| *id);
    extra.dedup_by_key(|(id, _)| *id);
    views.extend(extra.into_iter().map(|(id, name)| view_for(session, id, name)));
    views
}

fn view_for(session: &AnalysisSession, id: u32, name: &str) -> StepView {
    let latest = session.updates_for_step(id).last();
    StepView {
        id,
        name: if name.is_empty() { format!("Step {}", id) } else { name.to_string() },
        status: step_status(session, id),
        elapsed: latest_elapsed(session, id).map(format_step_duration),
        message: latest.map(|u| u.message.clone()).filter(|m| !m.is_empty()),
    }
}
