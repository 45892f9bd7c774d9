//! Notification delivery with per-recipient failure isolation.
//!
//! Each mapped reviewer walks `find member → open channel → send`. A failure
//! at any step ends that reviewer's delivery with a [`RecipientOutcome::Failed`]
//! naming the step; it never propagates to other reviewers. Deliveries run
//! concurrently up to a configured limit, every chat call is bounded by a
//! timeout, and a shared [`CancellationToken`] stops pending steps.

use std::future::Future;
use std::num::NonZeroUsize;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::chat::{ChatError, ChatGateway};

use super::outcome::{
    DeliveryStage, FailureReason, Notification, RecipientOutcome, RecipientReport,
};

const DEFAULT_CONCURRENCY: NonZeroUsize = match NonZeroUsize::new(4) {
    Some(value) => value,
    None => NonZeroUsize::MIN,
};
const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(20);

/// Concurrency and timeout limits for delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSettings {
    /// Maximum number of reviewers notified at once.
    pub concurrency: NonZeroUsize,
    /// Upper bound for each individual chat call.
    pub call_timeout: Duration,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

/// Work item for [`NotificationDispatcher::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedDelivery {
    /// Already decided without contacting the chat platform.
    Resolved(RecipientReport),
    /// Needs delivery.
    Deliver(Notification),
}

/// Delivers notifications through a chat gateway.
pub struct NotificationDispatcher<'client, Gateway>
where
    Gateway: ChatGateway,
{
    client: &'client Gateway,
    settings: DispatchSettings,
    cancel: CancellationToken,
}

impl<'client, Gateway> NotificationDispatcher<'client, Gateway>
where
    Gateway: ChatGateway,
{
    /// Creates a dispatcher observing `cancel`.
    #[must_use]
    pub const fn new(
        client: &'client Gateway,
        settings: DispatchSettings,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            client,
            settings,
            cancel,
        }
    }

    /// Processes planned deliveries with bounded concurrency.
    ///
    /// Reports are returned in the order of `plan`, whatever order the
    /// deliveries complete in.
    pub async fn dispatch(&self, plan: Vec<PlannedDelivery>) -> Vec<RecipientReport> {
        stream::iter(plan)
            .map(|planned| async move {
                match planned {
                    PlannedDelivery::Resolved(report) => report,
                    PlannedDelivery::Deliver(notification) => {
                        let outcome = self.deliver(&notification).await;
                        RecipientReport::delivered(notification, outcome)
                    }
                }
            })
            .buffered(self.settings.concurrency.get())
            .collect()
            .await
    }

    /// Delivers one notification and reports its terminal state.
    pub async fn deliver(&self, notification: &Notification) -> RecipientOutcome {
        let outcome = match self.try_deliver(notification).await {
            Ok(message_id) => RecipientOutcome::Sent { message_id },
            Err((stage, reason)) => RecipientOutcome::Failed { stage, reason },
        };
        log_outcome(notification, &outcome);
        outcome
    }

    async fn try_deliver(
        &self,
        notification: &Notification,
    ) -> Result<String, (DeliveryStage, FailureReason)> {
        let member = self
            .step(
                DeliveryStage::MemberLookup,
                self.client.find_member(&notification.chat_username),
            )
            .await?;
        let channel = self
            .step(
                DeliveryStage::ChannelOpen,
                self.client.open_direct_channel(&member),
            )
            .await?;
        let ack = self
            .step(
                DeliveryStage::Send,
                self.client
                    .send_message(&channel, &notification.message_text),
            )
            .await?;
        Ok(ack.message_id)
    }

    async fn step<T, F>(
        &self,
        stage: DeliveryStage,
        call: F,
    ) -> Result<T, (DeliveryStage, FailureReason)>
    where
        F: Future<Output = Result<T, ChatError>>,
    {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err((stage, FailureReason::Cancelled)),
            result = tokio::time::timeout(self.settings.call_timeout, call) => match result {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(error)) => Err((stage, FailureReason::Chat(error))),
                Err(_elapsed) => Err((stage, FailureReason::TimedOut)),
            },
        }
    }
}

fn log_outcome(notification: &Notification, outcome: &RecipientOutcome) {
    let Notification {
        chat_username,
        host_username,
        pull_request_number,
        message_text,
    } = notification;
    match outcome {
        RecipientOutcome::Sent { .. } => tracing::info!(
            "sent message to {chat_username} ({host_username}) for #{pull_request_number}: {message_text}"
        ),
        RecipientOutcome::Failed { stage, reason } => tracing::warn!(
            "could not notify {chat_username} ({host_username}) for #{pull_request_number}: {label}: {reason}",
            label = stage.failure_label(reason)
        ),
        RecipientOutcome::Skipped(_) => {}
    }
}
