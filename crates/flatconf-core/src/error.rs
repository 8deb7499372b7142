//! Error types for flatconf
//!
//! Every error is fatal to the run: the pipeline aborts at the first one and
//! the CLI reports it with the offending file and, where possible, a hint.

use std::fmt;
use std::path::Path;

/// Result type alias for flatconf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for flatconf operations
#[derive(Debug, Clone)]
pub struct Error {
    /// The kind of error that occurred
    pub kind: ErrorKind,
    /// File the error relates to, if any
    pub file: Option<String>,
    /// Actionable help message
    pub help: Option<String>,
    /// Underlying cause (as string for Clone compatibility)
    pub cause: Option<String>,
}

/// Categories of errors that can occur
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// The required default document is absent
    #[error("Default document not found")]
    MissingDefaultDocument,
    /// A document root is not a mapping
    #[error("Document root must be a mapping, found {found}")]
    InvalidDocumentShape { found: String },
    /// A profile document's file name does not follow the naming convention
    #[error("Invalid profile document file name: {file_name}")]
    InvalidProfileFilename { file_name: String },
    /// An environment file is not a flat string-to-string map
    #[error("Malformed environment file")]
    MalformedEnvironmentFile,
    /// YAML syntax error
    #[error("Parse error")]
    Parse,
    /// I/O error (read, write, directory listing)
    #[error("I/O error")]
    Io,
    /// File naming conventions produce an unusable glob or regex
    #[error("Invalid file naming conventions")]
    InvalidConventions,
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

impl Error {
    fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            file: None,
            help: None,
            cause: None,
        }
    }

    /// Create a missing default document error
    pub fn missing_default_document(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            file: Some(display_path(path)),
            help: Some(format!(
                "Create '{}' in the input directory or point --input-dir at the right place",
                file_name
            )),
            ..Self::new(ErrorKind::MissingDefaultDocument)
        }
    }

    /// Create an invalid document shape error
    pub fn invalid_document_shape(found: impl Into<String>) -> Self {
        Self {
            help: Some("Each YAML document must have a mapping at its root".into()),
            ..Self::new(ErrorKind::InvalidDocumentShape {
                found: found.into(),
            })
        }
    }

    /// Create an invalid profile file name error
    pub fn invalid_profile_filename(path: &Path, expected: impl Into<String>) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| display_path(path));
        Self {
            file: Some(display_path(path)),
            help: Some(format!("Profile documents must match {}", expected.into())),
            ..Self::new(ErrorKind::InvalidProfileFilename { file_name })
        }
    }

    /// Create a malformed environment file error
    pub fn malformed_environment_file(path: &Path, message: impl Into<String>) -> Self {
        Self {
            file: Some(display_path(path)),
            help: Some("Environment files must contain a flat JSON object of strings".into()),
            cause: Some(message.into()),
            ..Self::new(ErrorKind::MalformedEnvironmentFile)
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            cause: Some(message.into()),
            ..Self::new(ErrorKind::Parse)
        }
    }

    /// Create an invalid conventions error
    pub fn invalid_conventions(message: impl Into<String>) -> Self {
        Self {
            help: Some(
                "Check the prefixes and extensions configured in Conventions".into(),
            ),
            cause: Some(message.into()),
            ..Self::new(ErrorKind::InvalidConventions)
        }
    }

    /// Create an I/O error for the given path
    pub fn io(path: &Path, err: &std::io::Error) -> Self {
        Self {
            file: Some(display_path(path)),
            cause: Some(err.to_string()),
            ..Self::new(ErrorKind::Io)
        }
    }

    /// Attach the file the error relates to, unless one is already set
    pub fn in_file(mut self, path: &Path) -> Self {
        if self.file.is_none() {
            self.file = Some(display_path(path));
        }
        self
    }

    /// Add help message to the error
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(file) = &self.file {
            write!(f, "\n  File: {}", file)?;
        }

        if let Some(cause) = &self.cause {
            write!(f, "\n  {}", cause)?;
        }

        if let Some(help) = &self.help {
            write!(f, "\n  Help: {}", help)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}
