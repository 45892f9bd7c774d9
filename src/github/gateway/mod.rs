//! Gateways for loading pull requests and reviewers through Octocrab.
//!
//! The trait-based design lets the resolver be exercised against mocks while
//! the Octocrab implementation handles real HTTP requests.

mod client;
mod error_mapping;
mod review;

pub use review::OctocrabReviewGateway;

use async_trait::async_trait;

use crate::github::error::IntakeError;
use crate::github::locator::{PullRequestNumber, RepositoryLocator};

/// Gateway that can enumerate open pull requests and their reviewers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewGateway: Send + Sync {
    /// List the numbers of every open pull request in the repository.
    async fn list_open_pull_requests(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<Vec<PullRequestNumber>, IntakeError>;

    /// List the logins of users requested to review the pull request.
    async fn list_reviewers(
        &self,
        locator: &RepositoryLocator,
        number: PullRequestNumber,
    ) -> Result<Vec<String>, IntakeError>;
}
