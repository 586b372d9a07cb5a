use reqwest::StatusCode;

/// Fixed `last_message` marker for a target that answered with a success
/// status. Reachability is the notable case here: the tool exists to watch
/// targets go dark.
pub const REACHABLE_MESSAGE: &str = "unexpectedly reachable";

/// Classification of one completed probe attempt.
///
/// Every possible result of a request maps into exactly one variant; the
/// probe loop never sees an error type from a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Success-class response. The notable outcome, never an error.
    Reachable { status: StatusCode, bytes: u64 },

    /// Response arrived with a non-success status.
    HttpError { status: StatusCode, bytes: u64 },

    /// No usable response: connect/DNS/timeout/protocol failure, or a body
    /// that died mid-read. `bytes` keeps whatever was drained before that.
    TransportError { reason: String, bytes: u64 },
}

impl Outcome {
    /// Classifies a response whose body drain ran to completion.
    pub fn classify(status: StatusCode, bytes: u64) -> Self {
        if status.is_success() {
            Self::Reachable { status, bytes }
        } else {
            Self::HttpError { status, bytes }
        }
    }

    /// Wraps a failure that produced no classified response.
    pub fn transport(reason: impl Into<String>, bytes: u64) -> Self {
        Self::TransportError {
            reason: reason.into(),
            bytes,
        }
    }

    /// Whether this outcome increments the error counter.
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Reachable { .. })
    }

    /// Body bytes actually drained for this attempt, partial reads included.
    pub fn bytes(&self) -> u64 {
        match self {
            Self::Reachable { bytes, .. }
            | Self::HttpError { bytes, .. }
            | Self::TransportError { bytes, .. } => *bytes,
        }
    }

    /// Short human-readable message for the stats board.
    pub fn message(&self) -> String {
        match self {
            Self::Reachable { .. } => REACHABLE_MESSAGE.to_owned(),
            Self::HttpError { status, .. } => format!("http error: {}", status.as_u16()),
            Self::TransportError { reason, .. } => format!("error: {reason}"),
        }
    }
}
