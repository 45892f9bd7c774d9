//! Structured run report events and sinks.
//!
//! Nudger logs through `tracing` for humans; when a machine-readable record
//! of a run is wanted, the same outcomes are emitted as telemetry events and
//! written as JSON lines.

use std::io;

use serde::{Deserialize, Serialize};

/// A structured telemetry event emitted by Nudger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// A requested reviewer has no chat identity.
    ReviewerUnmapped {
        /// Pull request the reviewer was requested on.
        pull_request_number: u64,
        /// GitHub login of the reviewer.
        host_username: String,
    },
    /// A notification was delivered.
    NotificationSent {
        /// Pull request the reviewer was requested on.
        pull_request_number: u64,
        /// GitHub login of the reviewer.
        host_username: String,
        /// Discord username that received the message.
        chat_username: String,
    },
    /// A notification could not be delivered.
    NotificationFailed {
        /// Pull request the reviewer was requested on.
        pull_request_number: u64,
        /// GitHub login of the reviewer.
        host_username: String,
        /// Discord username the message was meant for.
        chat_username: String,
        /// Failure label such as `channel-error`.
        stage: String,
        /// Underlying error message.
        reason: String,
    },
    /// A run finished without a fatal error.
    RunCompleted {
        /// Repository in `owner/repo` form.
        repository: String,
        /// Number of pull requests inspected.
        pull_requests: usize,
        /// Delivered notifications.
        sent: usize,
        /// Unmapped reviewers.
        skipped: usize,
        /// Failed deliveries.
        failed: usize,
        /// Run status label (e.g. `succeeded_with_skips`).
        status: String,
    },
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Records telemetry events to stderr as JSON lines (JSONL).
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}
