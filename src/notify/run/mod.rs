//! End-to-end notification run.
//!
//! A run resolves the review set for a target, maps every requested reviewer
//! through the identity directory, delivers one message per mapped reviewer,
//! and summarises the outcomes. Resolution failures abort the run; delivery
//! failures only affect the reviewer concerned.

use tokio_util::sync::CancellationToken;

use crate::chat::ChatGateway;
use crate::directory::{IdentityDirectory, IdentityMapper, MappedIdentity};
use crate::github::{PullRequest, ReviewGateway, ReviewSetResolver, ReviewTarget};
use crate::telemetry::{NoopTelemetrySink, TelemetryEvent, TelemetrySink};

use super::dispatcher::{DispatchSettings, NotificationDispatcher, PlannedDelivery};
use super::error::RunError;
use super::message::MessageTemplate;
use super::outcome::{Notification, RecipientOutcome, RecipientReport, RunSummary};

/// Coordinates review set resolution, identity mapping, and delivery.
pub struct ReviewNotifier<'run, Review, Chat>
where
    Review: ReviewGateway,
    Chat: ChatGateway,
{
    review: &'run Review,
    chat: &'run Chat,
    directory: &'run IdentityDirectory,
    template: MessageTemplate,
    settings: DispatchSettings,
    cancel: CancellationToken,
    telemetry: &'run dyn TelemetrySink,
}

impl<'run, Review, Chat> ReviewNotifier<'run, Review, Chat>
where
    Review: ReviewGateway,
    Chat: ChatGateway,
{
    /// Creates a notifier with the default template, limits, and no
    /// telemetry.
    #[must_use]
    pub fn new(review: &'run Review, chat: &'run Chat, directory: &'run IdentityDirectory) -> Self {
        Self {
            review,
            chat,
            directory,
            template: MessageTemplate::default(),
            settings: DispatchSettings::default(),
            cancel: CancellationToken::new(),
            telemetry: &NoopTelemetrySink,
        }
    }

    /// Uses `template` for message text.
    #[must_use]
    pub fn with_template(mut self, template: MessageTemplate) -> Self {
        self.template = template;
        self
    }

    /// Overrides concurrency and timeout limits.
    #[must_use]
    pub const fn with_settings(mut self, settings: DispatchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Observes `cancel` during resolution and delivery.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Records per-recipient and run events to `telemetry`.
    #[must_use]
    pub const fn with_telemetry(mut self, telemetry: &'run dyn TelemetrySink) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Notifies every requested reviewer of every pull request in `target`.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::ReviewSet`] when pull requests or reviewers cannot
    /// be listed, and [`RunError::Cancelled`] when cancellation fires before
    /// the review set is resolved. No message is sent in either case.
    pub async fn run(&self, target: &ReviewTarget) -> Result<RunSummary, RunError> {
        let repository = target.locator().to_string();
        tracing::info!("resolving requested reviewers for {repository}");

        let resolver = ReviewSetResolver::new(self.review);
        let pull_requests = tokio::select! {
            biased;
            () = self.cancel.cancelled() => return Err(RunError::Cancelled),
            resolved = resolver.resolve(target) => resolved.map_err(|source| RunError::ReviewSet {
                repository: repository.clone(),
                source,
            })?,
        };

        let plan = self.plan(&pull_requests);
        let dispatcher = NotificationDispatcher::new(self.chat, self.settings, self.cancel.clone());
        let reports = dispatcher.dispatch(plan).await;
        self.record_reports(&reports);

        let summary = RunSummary {
            pull_requests: pull_requests.len(),
            reports,
        };
        let status = summary.status();
        tracing::info!(
            "finished {repository}: {sent} sent, {skipped} skipped, {failed} failed across {count} pull request(s)",
            sent = summary.sent(),
            skipped = summary.skipped(),
            failed = summary.failed(),
            count = summary.pull_requests,
        );
        self.telemetry.record(TelemetryEvent::RunCompleted {
            repository,
            pull_requests: summary.pull_requests,
            sent: summary.sent(),
            skipped: summary.skipped(),
            failed: summary.failed(),
            status: status.as_str().to_owned(),
        });
        Ok(summary)
    }

    fn plan(&self, pull_requests: &[PullRequest]) -> Vec<PlannedDelivery> {
        let mapper = IdentityMapper::new(self.directory);
        pull_requests
            .iter()
            .flat_map(|pull_request| {
                pull_request
                    .reviewers
                    .iter()
                    .map(move |reviewer| (pull_request.number, reviewer))
            })
            .map(|(number, reviewer)| match mapper.map(reviewer) {
                MappedIdentity::Mapped(chat_username) => PlannedDelivery::Deliver(Notification {
                    chat_username: chat_username.to_owned(),
                    host_username: reviewer.clone(),
                    pull_request_number: number,
                    message_text: self.template.render(chat_username, reviewer, number),
                }),
                MappedIdentity::Unmapped => {
                    tracing::warn!(
                        "reviewer {reviewer} on #{number} has no Discord identity; skipping"
                    );
                    PlannedDelivery::Resolved(RecipientReport::unmapped(number, reviewer.clone()))
                }
            })
            .collect()
    }

    fn record_reports(&self, reports: &[RecipientReport]) {
        for report in reports {
            let pull_request_number = report.pull_request_number.get();
            let host_username = report.host_username.clone();
            let chat_username = report.chat_username.clone().unwrap_or_default();
            let event = match &report.outcome {
                RecipientOutcome::Skipped(_) => TelemetryEvent::ReviewerUnmapped {
                    pull_request_number,
                    host_username,
                },
                RecipientOutcome::Sent { .. } => TelemetryEvent::NotificationSent {
                    pull_request_number,
                    host_username,
                    chat_username,
                },
                RecipientOutcome::Failed { stage, reason } => TelemetryEvent::NotificationFailed {
                    pull_request_number,
                    host_username,
                    chat_username,
                    stage: stage.failure_label(reason).to_owned(),
                    reason: reason.to_string(),
                },
            };
            self.telemetry.record(event);
        }
    }
}
