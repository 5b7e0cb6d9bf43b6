//! Errors raised by project resolution, scanning and reading.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse category of an [`Error`], as seen by the calling agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The referenced project or file does not exist.
    NotFound,
    /// The input violates an allow/deny-list or project-recognition rule.
    Validation,
    /// The filesystem failed underneath us.
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::Validation => "invalid",
            ErrorKind::Io => "io failure",
        })
    }
}

/// Errors from the project browser core.
#[derive(Error, Debug)]
pub enum Error {
    /// The project name is not in the registry.
    #[error("Project {name} not found. Available projects: {}", .available.join(", "))]
    UnknownProject {
        name: String,
        available: Vec<String>,
    },
    /// The project reference is empty.
    #[error("project reference must not be empty")]
    EmptyReference,
    /// The resolved project root does not exist.
    #[error("project directory does not exist: {}", .0.display())]
    MissingRoot(PathBuf),
    /// The resolved project root exists but is not a directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    /// Strict mode: the root lacks the Gradle marker files.
    #[error(
        "not a Gradle project (missing settings.gradle* or build.gradle*): {}",
        .0.display()
    )]
    NotGradleProject(PathBuf),
    /// The path goes through a deny-listed directory.
    #[error("access to restricted directories denied for file: {0}")]
    RestrictedPath(String),
    /// The file name is not allow-listed.
    #[error("file type not allowed: {0}")]
    FileTypeNotAllowed(String),
    /// The path resolves to somewhere outside the project root.
    #[error("path escapes the project root: {0}")]
    OutsideRoot(String),
    /// The file does not exist or is not a regular file.
    #[error("file not found: {0}")]
    FileNotFound(String),
    /// The file content is not UTF-8.
    #[error("file is not valid UTF-8 text: {0}")]
    NotUtf8(String),
    /// A marker glob could not be built.
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    /// An I/O error occurred.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownProject { .. } | Error::FileNotFound(_) => ErrorKind::NotFound,
            Error::Io(_) => ErrorKind::Io,
            Error::EmptyReference
            | Error::MissingRoot(_)
            | Error::NotADirectory(_)
            | Error::NotGradleProject(_)
            | Error::RestrictedPath(_)
            | Error::FileTypeNotAllowed(_)
            | Error::OutsideRoot(_)
            | Error::NotUtf8(_)
            | Error::Pattern(_) => ErrorKind::Validation,
        }
    }

    /// Message returned to the calling agent, prefixed with the kind so
    /// missing targets and rejected requests stay distinguishable.
    pub fn tool_message(&self) -> String {
        format!("{}: {self}", self.kind())
    }
}
