//! Output formatting utilities for CLI operations.

use std::io::{self, Write};

use nudger::{RecipientOutcome, RecipientReport, RunError, RunSummary};

/// Writes a per-reviewer report and totals for a finished run.
pub fn write_run_summary<W: Write>(
    writer: &mut W,
    repository: &str,
    summary: &RunSummary,
) -> Result<(), RunError> {
    let noun = if summary.pull_requests == 1 {
        "pull request"
    } else {
        "pull requests"
    };
    writeln!(
        writer,
        "Reviewer notifications for {repository} ({} {noun}):",
        summary.pull_requests
    )
    .map_err(|e| io_error(&e))?;

    if summary.reports.is_empty() {
        writeln!(writer, "  no reviewers requested").map_err(|e| io_error(&e))?;
    }
    for report in &summary.reports {
        writeln!(writer, "  {}", describe(report)).map_err(|e| io_error(&e))?;
    }

    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(
        writer,
        "{} sent, {} skipped, {} failed ({})",
        summary.sent(),
        summary.skipped(),
        summary.failed(),
        summary.status().as_str()
    )
    .map_err(|e| io_error(&e))?;

    Ok(())
}

fn describe(report: &RecipientReport) -> String {
    let number = report.pull_request_number;
    let host = &report.host_username;
    let recipient = report
        .chat_username
        .as_deref()
        .map_or_else(|| host.clone(), |chat| format!("{host} -> {chat}"));

    match &report.outcome {
        RecipientOutcome::Sent { .. } => format!("#{number} {recipient}: sent"),
        RecipientOutcome::Skipped(_) => format!("#{number} {recipient}: skipped (unmapped)"),
        RecipientOutcome::Failed { stage, reason } => format!(
            "#{number} {recipient}: failed ({}: {reason})",
            stage.failure_label(reason)
        ),
    }
}

/// Converts an I/O error to a [`RunError::Io`].
pub(crate) fn io_error(error: &io::Error) -> RunError {
    RunError::Io {
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use nudger::{
        DeliveryStage, FailureReason, PullRequestNumber, RecipientOutcome, RecipientReport,
        RunSummary,
    };

    use super::write_run_summary;

    fn number(value: u64) -> PullRequestNumber {
        PullRequestNumber::new(value).expect("number should be positive")
    }

    #[test]
    fn write_run_summary_lists_each_reviewer_and_totals() {
        let summary = RunSummary {
            pull_requests: 2,
            reports: vec![
                RecipientReport {
                    pull_request_number: number(42),
                    host_username: "alice".to_owned(),
                    chat_username: Some("alice#1".to_owned()),
                    outcome: RecipientOutcome::Sent {
                        message_id: "1".to_owned(),
                    },
                },
                RecipientReport::unmapped(number(42), "carol".to_owned()),
                RecipientReport {
                    pull_request_number: number(43),
                    host_username: "bob".to_owned(),
                    chat_username: Some("bob#2".to_owned()),
                    outcome: RecipientOutcome::Failed {
                        stage: DeliveryStage::ChannelOpen,
                        reason: FailureReason::TimedOut,
                    },
                },
            ],
        };

        let mut buffer = Vec::new();
        write_run_summary(&mut buffer, "unikraft/unikraft", &summary)
            .expect("should write run summary");

        let output = String::from_utf8(buffer).expect("output should be valid UTF-8");
        assert!(
            output.contains("Reviewer notifications for unikraft/unikraft (2 pull requests):"),
            "missing header: {output}"
        );
        assert!(output.contains("#42 alice -> alice#1: sent"), "{output}");
        assert!(output.contains("#42 carol: skipped (unmapped)"), "{output}");
        assert!(
            output.contains("#43 bob -> bob#2: failed (channel-error: timed out)"),
            "{output}"
        );
        assert!(
            output.contains("1 sent, 1 skipped, 1 failed (completed_with_failures)"),
            "{output}"
        );
    }

    #[test]
    fn write_run_summary_notes_empty_review_set() {
        let summary = RunSummary {
            pull_requests: 1,
            reports: vec![],
        };

        let mut buffer = Vec::new();
        write_run_summary(&mut buffer, "o/r", &summary).expect("should write run summary");

        let output = String::from_utf8(buffer).expect("output should be valid UTF-8");
        assert!(output.contains("(1 pull request):"), "{output}");
        assert!(output.contains("no reviewers requested"), "{output}");
        assert!(output.contains("(succeeded)"), "{output}");
    }
}
