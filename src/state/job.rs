/// Lifecycle of one comparison run as seen by the UI
///
/// The runner knows nothing about status; this is the controller's
/// record of the job it started and what came back.

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::runner::{JobCommand, JobOutcome};

/// Status of a job: Pending → Running → Succeeded | Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "Pending"),
            JobStatus::Running => write!(f, "Running"),
            JobStatus::Succeeded => write!(f, "Succeeded"),
            JobStatus::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("job cannot move from {from} to {to}")]
pub struct InvalidTransition {
    pub from: JobStatus,
    pub to: JobStatus,
}

/// One run of the external program
#[derive(Debug, Clone)]
pub struct Job {
    /// Runner-assigned id, set once the job is running
    pub id: Option<u64>,
    pub command: JobCommand,
    pub status: JobStatus,
    pub started_at: Option<DateTime<Local>>,
    pub finished_at: Option<DateTime<Local>>,
    /// Set once, when the job reaches a terminal status
    pub outcome: Option<JobOutcome>,
}

impl Job {
    pub fn new(command: JobCommand) -> Self {
        Self {
            id: None,
            command,
            status: JobStatus::Pending,
            started_at: None,
            finished_at: None,
            outcome: None,
        }
    }

    /// Pending → Running
    pub fn mark_running(&mut self, id: u64) -> Result<(), InvalidTransition> {
        self.transition(JobStatus::Running)?;
        self.id = Some(id);
        self.started_at = Some(Local::now());
        Ok(())
    }

    /// Running → Succeeded | Failed, depending on the outcome
    pub fn finish(&mut self, outcome: JobOutcome) -> Result<(), InvalidTransition> {
        let to = if outcome.is_ok() {
            JobStatus::Succeeded
        } else {
            JobStatus::Failed
        };
        self.transition(to)?;
        self.finished_at = Some(Local::now());
        self.outcome = Some(outcome);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.status == JobStatus::Running
    }

    /// Wall-clock run time in seconds, once finished
    pub fn elapsed_secs(&self) -> Option<f64> {
        let started = self.started_at?;
        let finished = self.finished_at?;
        Some((finished - started).num_milliseconds() as f64 / 1000.0)
    }

    fn transition(&mut self, to: JobStatus) -> Result<(), InvalidTransition> {
        let allowed = match (self.status, to) {
            (JobStatus::Pending, JobStatus::Running) => true,
            (JobStatus::Running, next) => next.is_terminal(),
            _ => false,
        };

        if !allowed {
            return Err(InvalidTransition {
                from: self.status,
                to,
            });
        }

        self.status = to;
        Ok(())
    }
}
