//! Per-recipient outcomes and the run summary built from them.

use std::fmt;

use crate::chat::ChatError;
use crate::github::PullRequestNumber;

/// Direct message to one reviewer about one pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Discord username receiving the message.
    pub chat_username: String,
    /// GitHub login of the reviewer.
    pub host_username: String,
    /// Pull request awaiting review.
    pub pull_request_number: PullRequestNumber,
    /// Rendered message text.
    pub message_text: String,
}

/// Delivery step at which a notification stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStage {
    /// Looking up the chat member.
    MemberLookup,
    /// Opening the direct channel.
    ChannelOpen,
    /// Posting the message.
    Send,
}

impl DeliveryStage {
    /// Short label used in reports, e.g. `channel-error`.
    ///
    /// A member lookup is only `member-not-found` when Discord answered
    /// without a match; any other lookup failure is `member-lookup-error`.
    #[must_use]
    pub const fn failure_label(self, reason: &FailureReason) -> &'static str {
        match self {
            Self::MemberLookup => match reason {
                FailureReason::Chat(ChatError::MemberNotFound { .. }) => "member-not-found",
                _ => "member-lookup-error",
            },
            Self::ChannelOpen => "channel-error",
            Self::Send => "send-error",
        }
    }
}

/// Why a delivery step failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The chat platform returned an error.
    Chat(ChatError),
    /// The step exceeded the per-call timeout.
    TimedOut,
    /// The run was cancelled while the step was pending.
    Cancelled,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chat(error) => write!(formatter, "{error}"),
            Self::TimedOut => formatter.write_str("timed out"),
            Self::Cancelled => formatter.write_str("cancelled"),
        }
    }
}

/// Reason a reviewer was skipped without contacting the chat platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The reviewer has no entry in the identity directory.
    Unmapped,
}

/// Terminal state of one reviewer notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientOutcome {
    /// The message was delivered.
    Sent {
        /// Chat platform message identifier.
        message_id: String,
    },
    /// The reviewer was not contacted.
    Skipped(SkipReason),
    /// Delivery stopped at `stage`.
    Failed {
        /// Step that failed.
        stage: DeliveryStage,
        /// Underlying cause.
        reason: FailureReason,
    },
}

impl RecipientOutcome {
    /// Whether the message was delivered.
    #[must_use]
    pub const fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

/// Outcome for one (pull request, reviewer) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientReport {
    /// Pull request the reviewer was requested on.
    pub pull_request_number: PullRequestNumber,
    /// GitHub login of the reviewer.
    pub host_username: String,
    /// Discord username, when the reviewer was mapped.
    pub chat_username: Option<String>,
    /// What happened.
    pub outcome: RecipientOutcome,
}

impl RecipientReport {
    /// Report for a reviewer with no chat identity.
    #[must_use]
    pub const fn unmapped(pull_request_number: PullRequestNumber, host_username: String) -> Self {
        Self {
            pull_request_number,
            host_username,
            chat_username: None,
            outcome: RecipientOutcome::Skipped(SkipReason::Unmapped),
        }
    }

    /// Report for an attempted delivery.
    #[must_use]
    pub fn delivered(notification: Notification, outcome: RecipientOutcome) -> Self {
        Self {
            pull_request_number: notification.pull_request_number,
            host_username: notification.host_username,
            chat_username: Some(notification.chat_username),
            outcome,
        }
    }
}

/// Overall result of a run that was not aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every reviewer was notified.
    Succeeded,
    /// Some reviewers were unmapped; everyone else was notified.
    SucceededWithSkips,
    /// At least one mapped reviewer could not be notified.
    CompletedWithFailures,
}

impl RunStatus {
    /// Machine-friendly label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::SucceededWithSkips => "succeeded_with_skips",
            Self::CompletedWithFailures => "completed_with_failures",
        }
    }
}

/// Ordered outcomes of a run, in pull request then reviewer order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of pull requests inspected.
    pub pull_requests: usize,
    /// One report per (pull request, reviewer) pair.
    pub reports: Vec<RecipientReport>,
}

impl RunSummary {
    /// Number of delivered notifications.
    #[must_use]
    pub fn sent(&self) -> usize {
        self.count(|outcome| outcome.is_sent())
    }

    /// Number of skipped reviewers.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, RecipientOutcome::Skipped(_)))
    }

    /// Number of failed deliveries.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, RecipientOutcome::Failed { .. }))
    }

    /// Classifies the run.
    #[must_use]
    pub fn status(&self) -> RunStatus {
        if self.failed() > 0 {
            RunStatus::CompletedWithFailures
        } else if self.skipped() > 0 {
            RunStatus::SucceededWithSkips
        } else {
            RunStatus::Succeeded
        }
    }

    fn count(&self, predicate: impl Fn(&RecipientOutcome) -> bool) -> usize {
        self.reports
            .iter()
            .filter(|report| predicate(&report.outcome))
            .count()
    }
}
