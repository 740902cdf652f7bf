use iced::widget::{container, row, scrollable};
use iced::{window, Element, Length, Subscription, Task, Theme};
use std::time::Duration;
use tracing::{info, warn};

mod config;
mod dialogs;
mod logging;
mod runner;
mod state;
mod ui;

use config::AppConfig;
use runner::{FailureKind, JobOutcome, JobRunner, DIFF_FILE_NAME};
use state::form::{Field, ProcessForm, Toggle};
use state::job::Job;
use ui::results::ResultImage;

/// Progress bar step per tick while a job is running
const BUSY_STEP: f32 = 5.0;

/// An error to put in front of the user as a modal dialog
#[derive(Debug, Clone, PartialEq)]
struct ErrorNotice {
    title: &'static str,
    message: String,
}

impl ErrorNotice {
    fn new(title: &'static str, message: impl Into<String>) -> Self {
        Self {
            title,
            message: message.into(),
        }
    }
}

/// Main application state
struct PcbChangeDetect {
    /// Interpreter, script and defaults
    config: AppConfig,
    /// Left panel contents
    form: ProcessForm,
    /// Spawns the worker thread for each job
    runner: JobRunner,
    /// The current or most recent job
    job: Option<Job>,
    /// Images shown in the right panel
    results: Vec<ResultImage>,
    /// Progress bar value, 0..=100
    progress: f32,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// A text field was edited
    FieldChanged(Field, String),
    /// An option checkbox was toggled
    Toggled(Toggle, bool),
    /// User clicked a "Browse" button next to a path field
    Browse(Field),
    /// User clicked "Process Images"
    Process,
    /// The worker thread reported the outcome of job `id`
    JobFinished(u64, JobOutcome),
    /// Result image headers were read
    ResultsLoaded(Vec<ResultImage>),
    /// Busy indicator animation
    Tick,
}

impl PcbChangeDetect {
    fn new(config: AppConfig) -> (Self, Task<Message>) {
        let form = ProcessForm::new(&config.default_output_dir, &config.defaults);

        info!(
            "Ready. Running `{} {}` for each comparison",
            config.interpreter,
            config.script.display()
        );

        (
            PcbChangeDetect {
                config,
                form,
                runner: JobRunner::new(),
                job: None,
                results: Vec::new(),
                progress: 0.0,
            },
            // Start maximized once the window exists
            window::get_latest().and_then(|id| window::maximize(id, true)),
        )
    }

    fn is_busy(&self) -> bool {
        self.job.as_ref().is_some_and(Job::is_running)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::FieldChanged(field, value) => {
                self.form.set(field, value);
                Task::none()
            }
            Message::Toggled(toggle, checked) => {
                self.form.toggle(toggle, checked);
                Task::none()
            }
            Message::Browse(field) => {
                let picked = match field {
                    Field::OutputDir => dialogs::pick_output_dir(),
                    _ => dialogs::pick_image(),
                };

                if let Some(path) = picked {
                    self.form.set(field, path.display().to_string());
                }

                Task::none()
            }
            Message::Process => self.start_job().unwrap_or_else(report),
            Message::JobFinished(id, outcome) => self.finish_job(id, outcome).unwrap_or_else(report),
            Message::ResultsLoaded(results) => {
                self.results = results;
                Task::none()
            }
            Message::Tick => {
                if self.is_busy() {
                    self.progress = (self.progress + BUSY_STEP) % 100.0;
                }
                Task::none()
            }
        }
    }

    /// Validate the form and hand the command to the runner.
    ///
    /// Does nothing while a job is running.
    fn start_job(&mut self) -> Result<Task<Message>, ErrorNotice> {
        // The button is disabled while busy; guard anyway against a queued click
        if self.is_busy() {
            return Ok(Task::none());
        }

        let request = self
            .form
            .validate()
            .map_err(|message| ErrorNotice::new("Error", message))?;

        let command = request.to_command(&self.config.interpreter, &self.config.script);
        let mut job = Job::new(command.clone());

        let handle = self.runner.start(command).map_err(|err| {
            warn!("Job rejected: {}", err);
            ErrorNotice::new("Processing Error", err.to_string())
        })?;

        let id = handle.id();
        if let Err(err) = job.mark_running(id) {
            warn!(job = id, "{}", err);
        }

        self.job = Some(job);
        self.progress = 0.0;

        Ok(Task::perform(handle.outcome(), move |outcome| {
            Message::JobFinished(id, outcome)
        }))
    }

    /// Record the outcome of job `id` and update the panels.
    ///
    /// Outcomes for any job other than the current one are dropped.
    fn finish_job(&mut self, id: u64, outcome: JobOutcome) -> Result<Task<Message>, ErrorNotice> {
        let Some(job) = self.job.as_mut().filter(|job| job.id == Some(id)) else {
            warn!(job = id, "Ignoring outcome for unknown job");
            return Ok(Task::none());
        };

        if let Err(err) = job.finish(outcome) {
            warn!(job = id, "{}", err);
            return Ok(Task::none());
        }

        match job.elapsed_secs() {
            Some(secs) => info!(job = id, "Job {} after {:.1}s: {}", job.status, secs, job.command),
            None => info!(job = id, "Job {}: {}", job.status, job.command),
        }

        match &job.outcome {
            Some(Ok(images)) => {
                self.progress = 100.0;
                self.results.clear();
                Ok(Task::perform(
                    ui::results::load_results(images.clone()),
                    Message::ResultsLoaded,
                ))
            }
            Some(Err(err)) => {
                if err.kind() == FailureKind::MissingArtifact {
                    warn!(
                        job = id,
                        "Program exited cleanly but left no {} in the output directory",
                        DIFF_FILE_NAME
                    );
                }
                self.progress = 0.0;
                Err(ErrorNotice::new("Processing Error", err.to_string()))
            }
            None => Ok(Task::none()),
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        if self.is_busy() {
            iced::time::every(Duration::from_millis(100)).map(|_| Message::Tick)
        } else {
            Subscription::none()
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let left = scrollable(ui::form::view(&self.form, self.is_busy(), self.progress))
            .width(Length::FillPortion(2))
            .height(Length::Fill);

        let images = if self.results.is_empty() {
            ui::results::placeholder()
        } else {
            ui::results::view(&self.results)
        };

        let right = scrollable(images)
            .direction(scrollable::Direction::Both {
                vertical: scrollable::Scrollbar::default(),
                horizontal: scrollable::Scrollbar::default(),
            })
            .width(Length::FillPortion(3))
            .height(Length::Fill);

        container(row![left, right].spacing(10))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Show `notice` to the user; nothing further to do afterwards
fn report(notice: ErrorNotice) -> Task<Message> {
    dialogs::show_error(notice.title, &notice.message);
    Task::none()
}

fn main() -> iced::Result {
    let loaded = AppConfig::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();

    logging::init(&config.log_filter);
    if let Err(err) = &loaded {
        warn!("Using default configuration: {}", err);
    }

    iced::application(
        "Golden_PCB_Change_Detection",
        PcbChangeDetect::update,
        PcbChangeDetect::view,
    )
    .theme(PcbChangeDetect::theme)
    .subscription(PcbChangeDetect::subscription)
    .run_with(move || PcbChangeDetect::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use runner::{JobCommand, JobError, JobImages};
    use state::job::JobStatus;
    use std::path::PathBuf;

    const RUNNING_ID: u64 = 42;

    fn app() -> PcbChangeDetect {
        let (app, _maximize) = PcbChangeDetect::new(AppConfig::default());
        app
    }

    /// An app whose current job is running under `RUNNING_ID`
    fn busy_app() -> PcbChangeDetect {
        let mut app = app();
        let mut job = Job::new(JobCommand::new([
            "python",
            "main.py",
            "-output_dir=/tmp/out",
            "-input_path=a.png",
            "-reference_path=b.png",
        ]));
        job.mark_running(RUNNING_ID).unwrap();
        app.job = Some(job);
        app.progress = 35.0;
        app
    }

    fn scenario_images() -> JobImages {
        JobImages {
            input: PathBuf::from("a.png"),
            reference: PathBuf::from("b.png"),
            diff: PathBuf::from("/tmp/out/final_diff.jpg"),
        }
    }

    #[test]
    fn test_new_app_is_idle_with_config_defaults() {
        let app = app();

        assert!(!app.is_busy());
        assert!(app.job.is_none());
        assert!(app.results.is_empty());
        assert_eq!(app.form.output_dir, "example_output");
        assert_eq!(app.form.n, "16");
    }

    #[test]
    fn test_process_while_busy_is_ignored() {
        let mut app = busy_app();

        assert!(app.start_job().is_ok());
        assert_eq!(app.job.as_ref().and_then(|job| job.id), Some(RUNNING_ID));
        assert_eq!(app.progress, 35.0);
    }

    #[test]
    fn test_validation_failure_becomes_error_notice() {
        let mut app = app();

        let notice = app.start_job().err().unwrap();

        assert_eq!(notice, ErrorNotice::new("Error", "Please select an input image"));
        assert!(app.job.is_none());
        assert!(!app.is_busy());
    }

    #[cfg(unix)]
    #[test]
    fn test_valid_form_starts_job() {
        let out = tempfile::tempdir().unwrap();
        let mut app = app();
        app.config.interpreter = "true".to_string();
        app.form.set(Field::InputPath, "a.png".into());
        app.form.set(Field::ReferencePath, "b.png".into());
        app.form.set(Field::OutputDir, out.path().display().to_string());
        app.progress = 100.0;

        assert!(app.start_job().is_ok());
        assert!(app.is_busy());
        assert_eq!(app.progress, 0.0);
        assert_eq!(app.job.as_ref().and_then(|job| job.id), Some(1));
    }

    #[test]
    fn test_outcome_for_other_job_is_dropped() {
        let mut app = busy_app();

        assert!(app.finish_job(RUNNING_ID + 1, Ok(scenario_images())).is_ok());
        assert!(app.is_busy());
        assert_eq!(app.progress, 35.0);
    }

    #[test]
    fn test_failure_becomes_processing_error_notice() {
        let mut app = busy_app();
        let failure = JobError::ExitStatus {
            command: "python main.py".to_string(),
            status: "1".to_string(),
        };

        let notice = app.finish_job(RUNNING_ID, Err(failure)).err().unwrap();

        assert_eq!(notice.title, "Processing Error");
        assert!(notice.message.starts_with("Script execution error"));
        assert_eq!(app.progress, 0.0);
        assert!(!app.is_busy());
        assert_eq!(app.job.as_ref().map(|job| job.status), Some(JobStatus::Failed));
    }

    #[test]
    fn test_missing_diff_reported_once_finished() {
        let mut app = busy_app();

        let notice = app.finish_job(RUNNING_ID, Err(JobError::DiffNotFound)).err().unwrap();

        assert_eq!(notice, ErrorNotice::new("Processing Error", "Difference image not found"));
        assert!(!app.is_busy());
    }

    #[test]
    fn test_success_clears_previous_results() {
        let mut app = busy_app();
        app.results.push(ResultImage {
            label: "Input Image",
            path: PathBuf::from("old.png"),
            handle: iced::widget::image::Handle::from_path("old.png"),
            dimensions: None,
        });

        assert!(app.finish_job(RUNNING_ID, Ok(scenario_images())).is_ok());
        assert_eq!(app.progress, 100.0);
        assert!(app.results.is_empty());
        assert_eq!(app.job.as_ref().map(|job| job.status), Some(JobStatus::Succeeded));
    }

    #[test]
    fn test_second_outcome_for_same_job_is_ignored() {
        let mut app = busy_app();
        app.finish_job(RUNNING_ID, Ok(scenario_images())).unwrap();

        assert!(app.finish_job(RUNNING_ID, Err(JobError::WorkerLost)).is_ok());
        assert_eq!(app.job.as_ref().map(|job| job.status), Some(JobStatus::Succeeded));
        assert_eq!(app.progress, 100.0);
    }
}
