use thiserror::Error;

/// Everything that can end a job without a difference image.
///
/// The `Display` text is what the user sees in the error dialog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error("Empty command")]
    EmptyCommand,

    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("Script execution error: failed to launch `{program}`: {reason}")]
    Launch { program: String, reason: String },

    #[error("Script execution error: command `{command}` returned non-zero exit status {status}")]
    ExitStatus { command: String, status: String },

    #[error("Script execution error: worker thread stopped before reporting")]
    WorkerLost,

    #[error("Difference image not found")]
    DiffNotFound,
}

/// Coarse classification of a job failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The command was rejected before anything was launched
    Rejected,
    /// The program could not be run or did not exit cleanly
    Execution,
    /// The program exited cleanly but produced no difference image
    MissingArtifact,
}

impl JobError {
    pub fn kind(&self) -> FailureKind {
        match self {
            JobError::EmptyCommand | JobError::MissingArgument(_) => FailureKind::Rejected,
            JobError::Launch { .. } | JobError::ExitStatus { .. } | JobError::WorkerLost => {
                FailureKind::Execution
            }
            JobError::DiffNotFound => FailureKind::MissingArtifact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_messages_share_prefix() {
        let launch = JobError::Launch {
            program: "python".into(),
            reason: "No such file or directory".into(),
        };
        let exit = JobError::ExitStatus {
            command: "python main.py".into(),
            status: "1".into(),
        };

        for err in [launch, exit, JobError::WorkerLost] {
            assert!(err.to_string().starts_with("Script execution error: "));
            assert_eq!(err.kind(), FailureKind::Execution);
        }
    }

    #[test]
    fn test_missing_artifact_is_distinct() {
        let err = JobError::DiffNotFound;
        assert_eq!(err.to_string(), "Difference image not found");
        assert_eq!(err.kind(), FailureKind::MissingArtifact);
    }
}
