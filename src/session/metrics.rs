//! Completion call metrics
//!
//! Recorded through the `metrics` facade; nothing is exported unless a
//! recorder is installed (see [`init_metrics_exporter`]).
//!
//! # Metrics
//!
//! - `chat_completions_total`: Counter of completion calls by backend and status
//! - `chat_completion_duration_seconds`: Histogram of completion call latency
//! - `chat_sessions_active`: Gauge of live sessions in the web host

use metrics::{decrement_gauge, histogram, increment_counter, increment_gauge};
use std::time::Instant;

/// Timer for a single completion call
///
/// Create it right before the call and finish it with
/// [`CompletionMetrics::record_success`] or [`CompletionMetrics::record_failure`].
#[derive(Debug)]
pub struct CompletionMetrics {
    backend: String,
    start: Instant,
}

impl CompletionMetrics {
    pub fn start(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            start: Instant::now(),
        }
    }

    pub fn record_success(self) {
        self.record("success");
    }

    pub fn record_failure(self) {
        self.record("error");
    }

    fn record(self, status: &'static str) {
        let elapsed = self.start.elapsed();
        increment_counter!(
            "chat_completions_total",
            "backend" => self.backend.clone(),
            "status" => status
        );
        histogram!(
            "chat_completion_duration_seconds",
            elapsed.as_secs_f64(),
            "backend" => self.backend,
            "status" => status
        );
    }
}

/// Track a session being opened in the web host
pub fn session_opened() {
    increment_gauge!("chat_sessions_active", 1.0);
}

/// Track a session being closed in the web host
pub fn session_closed() {
    decrement_gauge!("chat_sessions_active", 1.0);
}

/// Initializes the metrics exporter for Prometheus
///
/// Only has an effect when compiled with the `prometheus` feature; otherwise
/// it is a no-op that is still safe to call.
pub fn init_metrics_exporter() {
    #[cfg(feature = "prometheus")]
    {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let builder = PrometheusBuilder::new();
        let _ = builder.install().map_err(|e| {
            tracing::warn!("Failed to install Prometheus exporter: {}", e);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        CompletionMetrics::start("fake").record_success();
        CompletionMetrics::start("fake").record_failure();
        session_opened();
        session_closed();
    }

    #[test]
    fn test_init_metrics_exporter_no_panic() {
        init_metrics_exporter();
    }
}
