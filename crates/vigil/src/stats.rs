use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::RwLock;

use crate::outcome::Outcome;

/// Live counters for one target.
///
/// Exactly one probe loop writes; any number of reporting readers take
/// [`snapshot`](Self::snapshot) copies. The monotonic counters are relaxed
/// atomics. The last-attempt group moves as one unit behind a lock so a
/// reader never pairs one attempt's message with another attempt's latency.
#[derive(Debug, Default)]
pub struct TargetStats {
    request_count: AtomicU64,
    error_count: AtomicU64,
    bytes_received: AtomicU64,
    last_attempt: RwLock<LastAttempt>,
}

#[derive(Debug, Default)]
struct LastAttempt {
    message: String,
    url: String,
    latency: Duration,
}

/// Owned copy of one target's stats at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub request_count: u64,
    pub error_count: u64,
    pub bytes_received: u64,
    pub last_message: String,
    pub last_url: String,
    pub last_latency: Duration,
}

impl TargetStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one completed attempt into the counters and last-attempt group.
    pub fn record(&self, url: &str, outcome: &Outcome, latency: Duration) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        if outcome.is_error() {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
        self.bytes_received.fetch_add(outcome.bytes(), Ordering::Relaxed);

        let mut last = self.last_attempt.write();
        last.message = outcome.message();
        last.url = url.to_owned();
        last.latency = latency;
    }

    /// Cheap coherent copy for reporting.
    pub fn snapshot(&self) -> StatsSnapshot {
        let last = self.last_attempt.read();
        StatsSnapshot {
            request_count: self.request_count.load(Ordering::Relaxed),
            error_count: self.error_count.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            last_message: last.message.clone(),
            last_url: last.url.clone(),
            last_latency: last.latency,
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn fresh_stats_snapshot_is_zeroed() {
        let snapshot = TargetStats::new().snapshot();
        assert_eq!(snapshot, StatsSnapshot::default());
    }

    #[test]
    fn repeated_http_errors_accumulate_identically() {
        let stats = TargetStats::new();
        let outcome = Outcome::classify(StatusCode::SERVICE_UNAVAILABLE, 120);

        stats.record("https://example.com/a", &outcome, Duration::from_millis(10));
        stats.record("https://example.com/b", &outcome, Duration::from_millis(12));

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.request_count, 2);
        assert_eq!(snapshot.error_count, 2);
        assert_eq!(snapshot.bytes_received, 240);
        assert!(snapshot.last_message.contains("503"));
    }

    #[test]
    fn successes_never_touch_the_error_counter() {
        let stats = TargetStats::new();
        let ok = Outcome::classify(StatusCode::OK, 2);
        stats.record("https://example.com/", &ok, Duration::from_millis(5));
        stats.record("https://example.com/", &ok, Duration::from_millis(5));
        stats.record(
            "https://example.com/",
            &Outcome::transport("connection refused", 0),
            Duration::from_millis(5),
        );

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.request_count, 3);
        assert_eq!(snapshot.error_count, 1);
        assert_eq!(snapshot.bytes_received, 4);
    }

    #[test]
    fn snapshot_reflects_the_latest_attempt_as_a_unit() {
        let stats = TargetStats::new();
        stats.record(
            "https://example.com/first",
            &Outcome::classify(StatusCode::OK, 10),
            Duration::from_millis(3),
        );
        stats.record(
            "https://example.com/second",
            &Outcome::transport("timed out", 0),
            Duration::from_millis(2000),
        );

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.last_url, "https://example.com/second");
        assert_eq!(snapshot.last_message, "error: timed out");
        assert_eq!(snapshot.last_latency, Duration::from_millis(2000));
    }

    fn outcome_strategy() -> impl Strategy<Value = Outcome> {
        prop_oneof![
            (200u16..=299, 0u64..4096).prop_map(|(code, bytes)| {
                Outcome::classify(StatusCode::from_u16(code).unwrap(), bytes)
            }),
            (400u16..=599, 0u64..4096).prop_map(|(code, bytes)| {
                Outcome::classify(StatusCode::from_u16(code).unwrap(), bytes)
            }),
            ("[a-z ]{1,24}", 0u64..1024)
                .prop_map(|(reason, bytes)| Outcome::transport(reason, bytes)),
        ]
    }

    proptest! {
        #[test]
        fn counter_ordering_holds_for_any_sequence(
            outcomes in proptest::collection::vec(outcome_strategy(), 0..64)
        ) {
            let stats = TargetStats::new();
            let mut expected_bytes = 0u64;
            for (i, outcome) in outcomes.iter().enumerate() {
                expected_bytes += outcome.bytes();
                stats.record(
                    &format!("https://example.com/{i}"),
                    outcome,
                    Duration::from_millis(5),
                );
            }

            let snapshot = stats.snapshot();
            prop_assert_eq!(snapshot.request_count, outcomes.len() as u64);
            prop_assert!(snapshot.request_count >= snapshot.error_count);
            prop_assert_eq!(snapshot.bytes_received, expected_bytes);
        }
    }
}
