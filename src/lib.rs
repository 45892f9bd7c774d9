//! Nudger library crate: reminds pull request reviewers on Discord.
//!
//! The library lists the open pull requests of a GitHub repository, resolves
//! the users requested to review each one, maps those GitHub logins to
//! Discord usernames through an identity directory, and sends every mapped
//! reviewer a direct message. Delivery failures are isolated per reviewer and
//! collected into a [`RunSummary`].

pub mod chat;
pub mod config;
pub mod directory;
pub mod github;
pub mod notify;
pub mod telemetry;

pub use chat::{ChatError, DiscordConfig, DiscordGateway};
pub use config::NudgerConfig;
pub use directory::{DirectoryError, IdentityDirectory};
pub use github::{
    IntakeError, OctocrabReviewGateway, PersonalAccessToken, PullRequestNumber,
    RepositoryLocator, ReviewTarget,
};
pub use notify::{
    DeliveryStage, FailureReason, RecipientOutcome, RecipientReport, ReviewNotifier, RunError,
    RunStatus, RunSummary,
};
