//! GitHub access: target parsing, reviewer listing, and review set resolution.
//!
//! This module wraps Octocrab to list the open pull requests of a repository
//! and the users requested to review each one. Errors are mapped into
//! user-friendly variants so that callers can surface precise failures
//! without exposing Octocrab internals.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod resolver;

pub use error::IntakeError;
pub use gateway::{OctocrabReviewGateway, ReviewGateway};
pub use locator::{
    GITHUB_API_BASE, PersonalAccessToken, PullRequestNumber, RepositoryLocator, RepositoryName,
    RepositoryOwner, ReviewTarget,
};
pub use models::PullRequest;
pub use resolver::ReviewSetResolver;

#[cfg(test)]
pub use gateway::MockReviewGateway;
