/// Background job runner
///
/// Runs the external comparison program on a dedicated worker thread
/// and hands exactly one outcome back through a one-shot channel:
/// - `command.rs` - argv construction and path extraction
/// - `error.rs` - failure taxonomy and user-facing messages
///
/// The worker blocks on the child process; the caller never does.
/// Awaiting the returned handle (e.g. from an iced `Task`) delivers the
/// outcome on whichever thread polls it.

pub mod command;
pub mod error;

use std::path::PathBuf;
use std::process::{Command, ExitStatus};
use std::thread;

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

pub use command::{build_command, JobCommand, JobPaths, DIFF_FILE_NAME};
pub use error::{FailureKind, JobError};

/// The three images of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobImages {
    pub input: PathBuf,
    pub reference: PathBuf,
    pub diff: PathBuf,
}

/// Terminal result of one job
pub type JobOutcome = Result<JobImages, JobError>;

/// Handle to a job in flight. Resolves once, after the process exited.
#[derive(Debug)]
pub struct JobHandle {
    id: u64,
    receiver: oneshot::Receiver<JobOutcome>,
}

impl JobHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wait for the outcome without blocking the executor
    pub async fn outcome(self) -> JobOutcome {
        self.receiver.await.unwrap_or(Err(JobError::WorkerLost))
    }

    /// Wait for the outcome by parking the current thread
    #[cfg(test)]
    pub fn outcome_blocking(self) -> JobOutcome {
        self.receiver.blocking_recv().unwrap_or(Err(JobError::WorkerLost))
    }
}

/// Spawns one worker thread per job
#[derive(Debug, Default)]
pub struct JobRunner {
    next_id: u64,
}

impl JobRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `command` on a fresh worker thread and return immediately.
    ///
    /// A command missing the program or any of the output directory,
    /// input and reference arguments is rejected here, before launch.
    /// Otherwise the handle yields exactly one outcome.
    pub fn start(&mut self, command: JobCommand) -> Result<JobHandle, JobError> {
        let paths = command.paths()?;

        self.next_id += 1;
        let id = self.next_id;
        let (sender, receiver) = oneshot::channel();

        info!(job = id, "Starting job: {}", command);

        let spawned = thread::Builder::new()
            .name(format!("job-{}", id))
            .spawn(move || {
                let outcome = run_to_completion(&command, &paths);
                match &outcome {
                    Ok(images) => info!(job = id, diff = %images.diff.display(), "Job succeeded"),
                    Err(err) => warn!(job = id, "Job failed: {}", err),
                }
                // The receiver may be gone if the UI shut down; nothing to report to then
                let _ = sender.send(outcome);
            });

        // On spawn failure the sender is dropped with the closure and the
        // handle resolves to `WorkerLost`.
        if let Err(err) = spawned {
            warn!(job = id, "Failed to spawn worker thread: {}", err);
        }

        Ok(JobHandle { id, receiver })
    }
}

/// Run the process to exit, then classify: exit status first, artifact second
fn run_to_completion(command: &JobCommand, paths: &JobPaths) -> JobOutcome {
    let program = command.program().ok_or(JobError::EmptyCommand)?;

    debug!("Spawning {:?}", command.argv());

    let status = Command::new(program)
        .args(command.args())
        .status()
        .map_err(|e| JobError::Launch {
            program: program.to_string(),
            reason: e.to_string(),
        })?;

    if !status.success() {
        return Err(JobError::ExitStatus {
            command: command.to_string(),
            status: describe_status(status),
        });
    }

    let diff = paths.diff_path();
    if !diff.exists() {
        debug!("Expected difference image at {}", diff.display());
        return Err(JobError::DiffNotFound);
    }

    Ok(JobImages {
        input: paths.input.clone(),
        reference: paths.reference.clone(),
        diff,
    })
}

/// Exit code when there is one, otherwise the platform description (e.g. a signal)
fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => code.to_string(),
        None => status.to_string(),
    }
}
