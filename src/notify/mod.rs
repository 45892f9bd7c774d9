//! Reviewer notification pipeline.
//!
//! [`ReviewNotifier`] ties the pieces together: it resolves the review set
//! through a [`crate::github::ReviewGateway`], maps reviewers with the
//! [`crate::directory::IdentityDirectory`], and hands mapped reviewers to the
//! [`NotificationDispatcher`]. Every (pull request, reviewer) pair ends up as
//! one [`RecipientReport`] in the returned [`RunSummary`].

pub mod dispatcher;
mod error;
pub mod message;
pub mod outcome;
pub mod run;

pub use dispatcher::{DispatchSettings, NotificationDispatcher, PlannedDelivery};
pub use error::RunError;
pub use message::{DEFAULT_MESSAGE_TEMPLATE, MessageTemplate, default_message};
pub use outcome::{
    DeliveryStage, FailureReason, Notification, RecipientOutcome, RecipientReport, RunStatus,
    RunSummary, SkipReason,
};
pub use run::ReviewNotifier;
