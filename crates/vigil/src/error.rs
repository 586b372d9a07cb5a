use thiserror::Error;

/// Errors surfaced while assembling the probing engine.
///
/// Request failures never appear here: they are classified into
/// [`Outcome`](crate::outcome::Outcome) values and absorbed by the probe
/// loops. Cancellation is not an error either; it is the normal way out.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The shared HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    /// A catalog entry cannot be probed as configured.
    #[error("invalid target `{identifier}`: {reason}")]
    InvalidTarget { identifier: String, reason: String },
}

impl EngineError {
    /// Creates an invalid-target error for a catalog entry.
    pub fn invalid_target(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }
}
