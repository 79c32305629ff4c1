use std::fmt;
use std::process::ExitCode;

use timebucket_core::TimebucketError;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_INPUT_ERROR: u8 = 2;
pub const EXIT_RUNTIME_ERROR: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad configuration or a record that could not be bucketed.
    Input,
    /// Reading input, serializing or writing output failed.
    Runtime,
}

#[derive(Debug)]
pub struct CliError {
    kind: ErrorKind,
    message: String,
}

impl CliError {
    pub fn input(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Input,
            message: message.into(),
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Runtime,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        match self.kind {
            ErrorKind::Input => EXIT_INPUT_ERROR,
            ErrorKind::Runtime => EXIT_RUNTIME_ERROR,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<TimebucketError> for CliError {
    fn from(err: TimebucketError) -> Self {
        if err.is_config_error() || err.is_record_error() {
            CliError::input(err.to_string())
        } else {
            CliError::runtime(err.to_string())
        }
    }
}

/// Keeps clap's one-line summary and drops the usage block.
impl From<clap::Error> for CliError {
    fn from(err: clap::Error) -> Self {
        let rendered = err.to_string();
        let summary = rendered.lines().next().unwrap_or_default();
        CliError::input(summary.trim_start_matches("error:").trim())
    }
}

pub type CliResult<T> = std::result::Result<T, CliError>;

/// Report a fatal error as a single stderr line.
pub fn render_error(err: &CliError) -> ExitCode {
    let message = err.message.replace(['\r', '\n'], " ");
    eprintln!("timebucket: {}", message);
    ExitCode::from(err.exit_code())
}
