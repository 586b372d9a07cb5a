use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("no targets given; pass URLs or --targets-file")]
    EmptyCatalog,

    #[error("failed to read targets file `{path}`: {source}")]
    TargetsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid target `{input}`: {reason}")]
    InvalidTarget { input: String, reason: String },

    #[error("targets file line {line}: {reason}")]
    InvalidLine { line: usize, reason: String },

    #[error("invalid --timeout {0}: must be a positive, representable number of seconds")]
    InvalidTimeout(f64),

    #[error(transparent)]
    Engine(#[from] vigil_engine::EngineError),

    #[error("terminal output failed: {0}")]
    Render(#[from] std::io::Error),
}

impl CliError {
    pub fn invalid_target(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_line(line: usize, reason: impl Into<String>) -> Self {
        Self::InvalidLine {
            line,
            reason: reason.into(),
        }
    }
}
