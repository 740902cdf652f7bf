/// Form state behind the left-hand panel
///
/// Text fields are kept as typed. Only the three paths are checked;
/// parameter text is forwarded to the comparison program unchanged
/// apart from surrounding whitespace.

use std::path::{Path, PathBuf};

use crate::runner::{build_command, JobCommand, JobPaths};
use super::params::ProcessingParams;

/// Editable text fields of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    InputPath,
    ReferencePath,
    OutputDir,
    N,
    WindowSize,
    PcaDimGray,
    PcaDimRgb,
    ResizeFactor,
}

impl Field {
    /// Numeric parameter fields in display order
    pub const PARAMS: [Field; 5] = [
        Field::N,
        Field::WindowSize,
        Field::PcaDimGray,
        Field::PcaDimRgb,
        Field::ResizeFactor,
    ];

    /// Argument name on the comparison program's command line
    pub fn arg_key(self) -> &'static str {
        match self {
            Field::InputPath => "input_path",
            Field::ReferencePath => "reference_path",
            Field::OutputDir => "output_dir",
            Field::N => "n",
            Field::WindowSize => "window_size",
            Field::PcaDimGray => "pca_dim_gray",
            Field::PcaDimRgb => "pca_dim_rgb",
            Field::ResizeFactor => "resize_factor",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::InputPath => "Input Image",
            Field::ReferencePath => "Reference Image",
            Field::OutputDir => "Output Directory",
            Field::N => "n",
            Field::WindowSize => "Window Size",
            Field::PcaDimGray => "PCA Dim Gray",
            Field::PcaDimRgb => "PCA Dim RGB",
            Field::ResizeFactor => "Resize Factor",
        }
    }
}

/// Option checkboxes of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    LightingFix,
    UseHomography,
    SaveExtraStuff,
}

impl Toggle {
    pub const ALL: [Toggle; 3] = [Toggle::LightingFix, Toggle::UseHomography, Toggle::SaveExtraStuff];

    /// Bare flag passed when the option is checked
    pub fn flag(self) -> &'static str {
        match self {
            Toggle::LightingFix => "-lighting_fix",
            Toggle::UseHomography => "-use_homography",
            Toggle::SaveExtraStuff => "-save_extra_stuff",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Toggle::LightingFix => "Lighting Fix",
            Toggle::UseHomography => "Use Homography",
            Toggle::SaveExtraStuff => "Save Extra Stuff",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessForm {
    pub input_path: String,
    pub reference_path: String,
    pub output_dir: String,
    pub n: String,
    pub window_size: String,
    pub pca_dim_gray: String,
    pub pca_dim_rgb: String,
    pub resize_factor: String,
    pub lighting_fix: bool,
    pub use_homography: bool,
    pub save_extra_stuff: bool,
}

/// A form that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct JobRequest {
    pub paths: JobPaths,
    /// Parameter arguments and set flags, in command-line order
    pub args: Vec<String>,
}

impl JobRequest {
    pub fn to_command(&self, interpreter: &str, script: &Path) -> JobCommand {
        build_command(interpreter, script, &self.paths, self.args.clone())
    }
}

impl ProcessForm {
    /// Empty paths, given output directory, fields pre-filled from `defaults`
    pub fn new(output_dir: &str, defaults: &ProcessingParams) -> Self {
        Self {
            input_path: String::new(),
            reference_path: String::new(),
            output_dir: output_dir.to_string(),
            n: defaults.n.to_string(),
            window_size: defaults.window_size.to_string(),
            pca_dim_gray: defaults.pca_dim_gray.to_string(),
            pca_dim_rgb: defaults.pca_dim_rgb.to_string(),
            resize_factor: defaults.resize_factor.to_string(),
            lighting_fix: defaults.lighting_fix,
            use_homography: defaults.use_homography,
            save_extra_stuff: defaults.save_extra_stuff,
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::InputPath => &self.input_path,
            Field::ReferencePath => &self.reference_path,
            Field::OutputDir => &self.output_dir,
            Field::N => &self.n,
            Field::WindowSize => &self.window_size,
            Field::PcaDimGray => &self.pca_dim_gray,
            Field::PcaDimRgb => &self.pca_dim_rgb,
            Field::ResizeFactor => &self.resize_factor,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::InputPath => &mut self.input_path,
            Field::ReferencePath => &mut self.reference_path,
            Field::OutputDir => &mut self.output_dir,
            Field::N => &mut self.n,
            Field::WindowSize => &mut self.window_size,
            Field::PcaDimGray => &mut self.pca_dim_gray,
            Field::PcaDimRgb => &mut self.pca_dim_rgb,
            Field::ResizeFactor => &mut self.resize_factor,
        };
        *slot = value;
    }

    pub fn is_set(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::LightingFix => self.lighting_fix,
            Toggle::UseHomography => self.use_homography,
            Toggle::SaveExtraStuff => self.save_extra_stuff,
        }
    }

    pub fn toggle(&mut self, toggle: Toggle, checked: bool) {
        match toggle {
            Toggle::LightingFix => self.lighting_fix = checked,
            Toggle::UseHomography => self.use_homography = checked,
            Toggle::SaveExtraStuff => self.save_extra_stuff = checked,
        }
    }

    /// Check the required paths and collect the command-line arguments.
    ///
    /// Returns the message for the user on the first empty path.
    pub fn validate(&self) -> Result<JobRequest, String> {
        if self.input_path.is_empty() {
            return Err("Please select an input image".to_string());
        }
        if self.reference_path.is_empty() {
            return Err("Please select a reference image".to_string());
        }
        if self.output_dir.is_empty() {
            return Err("Please select an output directory".to_string());
        }

        Ok(JobRequest {
            paths: JobPaths {
                output_dir: PathBuf::from(&self.output_dir),
                input: PathBuf::from(&self.input_path),
                reference: PathBuf::from(&self.reference_path),
            },
            args: self.param_args(),
        })
    }

    /// `-key=value` for each parameter field as typed, then the checked flags
    fn param_args(&self) -> Vec<String> {
        let values = Field::PARAMS
            .into_iter()
            .map(|field| format!("-{}={}", field.arg_key(), self.value(field).trim()));

        let flags = Toggle::ALL
            .into_iter()
            .filter(|toggle| self.is_set(*toggle))
            .map(|toggle| toggle.flag().to_string());

        values.chain(flags).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filled_form() -> ProcessForm {
        let mut form = ProcessForm::new("/tmp/out", &ProcessingParams::default());
        form.set(Field::InputPath, "a.png".into());
        form.set(Field::ReferencePath, "b.png".into());
        form
    }

    #[test]
    fn test_defaults_prefill_fields() {
        let form = ProcessForm::new("example_output", &ProcessingParams::default());

        assert_eq!(form.output_dir, "example_output");
        assert_eq!(form.n, "16");
        assert_eq!(form.window_size, "5");
        assert_eq!(form.pca_dim_gray, "3");
        assert_eq!(form.pca_dim_rgb, "9");
        assert_eq!(form.resize_factor, "0.2");
        assert!(Toggle::ALL.iter().all(|t| !form.is_set(*t)));
    }

    #[test]
    fn test_required_paths_checked_in_order() {
        let form = ProcessForm::new("", &ProcessingParams::default());
        assert_eq!(form.validate().unwrap_err(), "Please select an input image");

        let mut form = form;
        form.set(Field::InputPath, "a.png".into());
        assert_eq!(form.validate().unwrap_err(), "Please select a reference image");

        form.set(Field::ReferencePath, "b.png".into());
        assert_eq!(form.validate().unwrap_err(), "Please select an output directory");
    }

    #[test]
    fn test_parameter_text_forwarded_as_typed() {
        let mut form = filled_form();
        form.set(Field::N, "16.0".into());
        form.set(Field::ResizeFactor, " .50 ".into());

        let request = form.validate().unwrap();

        assert_eq!(request.args[0], "-n=16.0");
        assert_eq!(request.args[4], "-resize_factor=.50");
    }

    #[test]
    fn test_empty_parameter_is_not_a_validation_error() {
        let mut form = filled_form();
        form.set(Field::WindowSize, String::new());

        let request = form.validate().unwrap();

        assert_eq!(request.args[1], "-window_size=");
    }

    #[test]
    fn test_scenario_command() {
        let request = filled_form().validate().unwrap();
        let command = request.to_command("python", Path::new("main.py"));

        assert_eq!(
            command.argv(),
            &[
                "python",
                "main.py",
                "-output_dir=/tmp/out",
                "-input_path=a.png",
                "-reference_path=b.png",
                "-n=16",
                "-window_size=5",
                "-pca_dim_gray=3",
                "-pca_dim_rgb=9",
                "-resize_factor=0.2",
            ]
        );
    }

    #[test]
    fn test_toggles_append_flags() {
        let mut form = filled_form();
        form.toggle(Toggle::UseHomography, true);
        form.toggle(Toggle::SaveExtraStuff, true);

        let command = form.validate().unwrap().to_command("python", Path::new("main.py"));
        let tail: Vec<&str> = command.argv()[10..].iter().map(String::as_str).collect();

        assert_eq!(tail, vec!["-use_homography", "-save_extra_stuff"]);
    }
}
