//! Pipeline options and file naming conventions

use std::path::{Path, PathBuf};

/// File naming rules for inputs and outputs
///
/// The default follows the Spring Boot layout: `bootstrap.yml`,
/// `application.yml` and `application-<profile>.yml` in, and
/// `application-<profile>.properties` out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conventions {
    /// Optional bootstrap document, read first
    pub bootstrap_file: String,
    /// Required default document
    pub default_file: String,
    /// Prefix of profile document file names
    pub profile_prefix: String,
    /// Extension of profile documents (without the dot)
    pub document_extension: String,
    /// Flattened key that tags a sub-document with its profile
    pub profile_key: String,
    /// Extension of environment files (without the dot)
    pub env_extension: String,
    /// Prefix of output file names
    pub output_prefix: String,
    /// Extension of output files (without the dot)
    pub output_extension: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            bootstrap_file: "bootstrap.yml".into(),
            default_file: "application.yml".into(),
            profile_prefix: "application-".into(),
            document_extension: "yml".into(),
            profile_key: "spring.profiles".into(),
            env_extension: "json".into(),
            output_prefix: "application-".into(),
            output_extension: "properties".into(),
        }
    }
}

impl Conventions {
    /// Glob matching every profile document in `dir`
    pub fn profile_glob(&self, dir: &Path) -> String {
        join_glob(
            dir,
            &format!(
                "{}*.{}",
                glob::Pattern::escape(&self.profile_prefix),
                glob::Pattern::escape(&self.document_extension)
            ),
        )
    }

    /// Anchored regex a profile document file name must match; group 1 is the profile
    pub fn profile_file_regex(&self) -> String {
        format!(
            r"^{}(\w+)\.{}$",
            regex::escape(&self.profile_prefix),
            regex::escape(&self.document_extension)
        )
    }

    /// Human readable form of the profile document name, for messages
    pub fn profile_file_template(&self) -> String {
        format!(
            "{}<profile>.{}",
            self.profile_prefix, self.document_extension
        )
    }

    /// Glob matching every environment file in `dir`
    pub fn env_glob(&self, dir: &Path) -> String {
        join_glob(
            dir,
            &format!("*.{}", glob::Pattern::escape(&self.env_extension)),
        )
    }

    /// Profile an environment file applies to: its name without the extension
    pub fn env_profile(&self, path: &Path) -> Option<String> {
        let file_name = path.file_name()?.to_str()?;
        file_name
            .strip_suffix(&format!(".{}", self.env_extension))
            .map(str::to_string)
    }

    /// Output file name for a named profile
    pub fn output_file_name(&self, profile: &str) -> String {
        format!(
            "{}{}.{}",
            self.output_prefix, profile, self.output_extension
        )
    }
}

fn join_glob(dir: &Path, pattern: &str) -> String {
    let dir = glob::Pattern::escape(&dir.to_string_lossy());
    Path::new(&dir).join(pattern).to_string_lossy().into_owned()
}

/// Options for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Directory holding the YAML documents
    pub input_dir: PathBuf,
    /// Directory the properties files are written to (created if missing)
    pub output_dir: PathBuf,
    /// Directory of per-profile environment files; substitution is skipped when unset
    pub env_dir: Option<PathBuf>,
    /// File naming rules
    pub conventions: Conventions,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            env_dir: None,
            conventions: Conventions::default(),
        }
    }
}

impl PipelineOptions {
    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_env_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.env_dir = Some(dir.into());
        self
    }

    pub fn with_conventions(mut self, conventions: Conventions) -> Self {
        self.conventions = conventions;
        self
    }
}
