use std::time::Duration;

/// Default requests-per-second ceiling for a target.
pub const DEFAULT_MAX_FREQUENCY_HZ: f64 = 2.0;

/// One remote endpoint under probing, fixed for the process lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    /// Display name, the probed URL without its scheme.
    pub identifier: String,

    /// Literal URL, or a pattern with `{year}`, `{month}`, `{day}`,
    /// `{number}` and `{text}` slots filled per request.
    pub url_template: String,

    /// Requests-per-second ceiling for this target's loop.
    pub max_frequency_hz: f64,
}

impl Target {
    /// Target probing a fixed URL.
    pub fn literal(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            identifier: strip_scheme(&url).to_owned(),
            url_template: url,
            max_frequency_hz: DEFAULT_MAX_FREQUENCY_HZ,
        }
    }

    /// Target named after `url` but probing URLs synthesized from `template`.
    pub fn templated(url: &str, template: impl Into<String>) -> Self {
        Self {
            identifier: strip_scheme(url).to_owned(),
            url_template: template.into(),
            max_frequency_hz: DEFAULT_MAX_FREQUENCY_HZ,
        }
    }

    pub fn with_max_frequency_hz(mut self, hz: f64) -> Self {
        self.max_frequency_hz = hz;
        self
    }

    /// Pacing period for this target, when `max_frequency_hz` yields one.
    ///
    /// `None` for a non-positive, non-finite, or unrepresentably low
    /// frequency; the orchestrator rejects those up front.
    pub fn pacing_period(&self) -> Option<Duration> {
        if !self.max_frequency_hz.is_finite() || self.max_frequency_hz <= 0.0 {
            return None;
        }
        Duration::try_from_secs_f64(1.0 / self.max_frequency_hz).ok()
    }
}

/// Strips a leading `http://` or `https://` for display purposes.
pub fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}
