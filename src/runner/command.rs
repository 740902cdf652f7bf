/// Command lines for the external comparison program
///
/// A `JobCommand` is the ordered argument vector handed to the OS.
/// The three path arguments the runner needs afterwards are recovered
/// from it by prefix, so a command built elsewhere behaves the same as
/// one built from the form.

use std::fmt;
use std::path::{Path, PathBuf};

use super::error::JobError;

pub const OUTPUT_DIR_ARG: &str = "-output_dir=";
pub const INPUT_PATH_ARG: &str = "-input_path=";
pub const REFERENCE_PATH_ARG: &str = "-reference_path=";

/// Fixed name of the difference image written into the output directory
pub const DIFF_FILE_NAME: &str = "final_diff.jpg";

/// Ordered argv for one run; element 0 is the program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCommand {
    argv: Vec<String>,
}

/// The paths a command refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPaths {
    pub output_dir: PathBuf,
    pub input: PathBuf,
    pub reference: PathBuf,
}

impl JobPaths {
    /// Where the program is expected to leave the difference image
    pub fn diff_path(&self) -> PathBuf {
        self.output_dir.join(DIFF_FILE_NAME)
    }
}

impl JobCommand {
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
        }
    }

    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or(&[])
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Value of the first `-key=` argument, everything after the first `=`
    fn value_of(&self, prefix: &str) -> Option<&str> {
        self.args().iter().find_map(|arg| arg.strip_prefix(prefix))
    }

    /// Extract the output directory, input and reference paths.
    ///
    /// Fails on an empty command or when any of the three is absent.
    pub fn paths(&self) -> Result<JobPaths, JobError> {
        if self.argv.is_empty() {
            return Err(JobError::EmptyCommand);
        }

        let required = |prefix: &'static str| {
            self.value_of(prefix)
                .map(PathBuf::from)
                .ok_or(JobError::MissingArgument(prefix.trim_end_matches('=')))
        };

        Ok(JobPaths {
            output_dir: required(OUTPUT_DIR_ARG)?,
            input: required(INPUT_PATH_ARG)?,
            reference: required(REFERENCE_PATH_ARG)?,
        })
    }
}

impl fmt::Display for JobCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv.join(" "))
    }
}

/// Build the full command for a run of `script` under `interpreter`
pub fn build_command(
    interpreter: &str,
    script: &Path,
    paths: &JobPaths,
    extra_args: Vec<String>,
) -> JobCommand {
    let mut argv = vec![
        interpreter.to_string(),
        script.display().to_string(),
        format!("{}{}", OUTPUT_DIR_ARG, paths.output_dir.display()),
        format!("{}{}", INPUT_PATH_ARG, paths.input.display()),
        format!("{}{}", REFERENCE_PATH_ARG, paths.reference.display()),
    ];
    argv.extend(extra_args);

    JobCommand::new(argv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scenario_paths() -> JobPaths {
        JobPaths {
            output_dir: PathBuf::from("/tmp/out"),
            input: PathBuf::from("a.png"),
            reference: PathBuf::from("b.png"),
        }
    }

    #[test]
    fn test_build_then_extract_paths() {
        let paths = scenario_paths();
        let command = build_command("python", Path::new("main.py"), &paths, vec!["-n=16".into()]);

        assert_eq!(command.program(), Some("python"));
        assert_eq!(
            command.argv(),
            &[
                "python",
                "main.py",
                "-output_dir=/tmp/out",
                "-input_path=a.png",
                "-reference_path=b.png",
                "-n=16",
            ]
        );
        assert_eq!(command.paths().unwrap(), paths);
        assert_eq!(paths.diff_path(), PathBuf::from("/tmp/out/final_diff.jpg"));
    }

    #[test]
    fn test_value_keeps_everything_after_first_equals() {
        let command = JobCommand::new([
            "python",
            "-output_dir=/tmp/run=2",
            "-input_path=a.png",
            "-reference_path=b.png",
        ]);

        assert_eq!(command.paths().unwrap().output_dir, PathBuf::from("/tmp/run=2"));
    }

    #[test]
    fn test_missing_required_argument() {
        let command = JobCommand::new(["python", "main.py", "-output_dir=/tmp/out", "-input_path=a.png"]);

        assert_eq!(
            command.paths(),
            Err(JobError::MissingArgument("-reference_path"))
        );
    }

    #[test]
    fn test_program_is_not_an_argument() {
        // argv[0] must not satisfy a required argument
        let command = JobCommand::new(["-output_dir=/tmp/out", "-input_path=a.png", "-reference_path=b.png"]);

        assert_eq!(command.paths(), Err(JobError::MissingArgument("-output_dir")));
    }

    #[test]
    fn test_empty_command() {
        let command = JobCommand::new(Vec::<String>::new());

        assert_eq!(command.program(), None);
        assert_eq!(command.paths(), Err(JobError::EmptyCommand));
    }
}
