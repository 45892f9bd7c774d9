//! Octocrab implementation of the review gateway.

use async_trait::async_trait;
use octocrab::{Octocrab, Page};

use crate::github::error::IntakeError;
use crate::github::locator::{PersonalAccessToken, PullRequestNumber, RepositoryLocator};
use crate::github::models::{ApiPullRequestSummary, ApiRequestedReviewers};

use super::ReviewGateway;
use super::client::build_octocrab_client;
use super::error_mapping::map_octocrab_error;

const PULLS_PER_PAGE: &str = "100";

/// Octocrab-backed review gateway.
pub struct OctocrabReviewGateway {
    client: Octocrab,
}

impl OctocrabReviewGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the given token and repository locator.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::InvalidUrl` when the base URI cannot be parsed or
    /// `IntakeError::Api` when Octocrab fails to construct a client.
    pub fn for_token(
        token: &PersonalAccessToken,
        locator: &RepositoryLocator,
    ) -> Result<Self, IntakeError> {
        let octocrab = build_octocrab_client(token, locator.api_base().as_str())?;
        Ok(Self::new(octocrab))
    }
}

#[async_trait]
impl ReviewGateway for OctocrabReviewGateway {
    async fn list_open_pull_requests(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<Vec<PullRequestNumber>, IntakeError> {
        let query_params = [("state", "open"), ("per_page", PULLS_PER_PAGE)];

        tracing::debug!("listing open pull requests for {locator}");
        let first_page: Page<ApiPullRequestSummary> = self
            .client
            .get(locator.pulls_path(), Some(&query_params))
            .await
            .map_err(|error| map_octocrab_error("list open pull requests", &error))?;

        let summaries = self
            .client
            .all_pages(first_page)
            .await
            .map_err(|error| map_octocrab_error("list open pull requests", &error))?;

        summaries
            .into_iter()
            .map(|summary| PullRequestNumber::new(summary.number))
            .collect()
    }

    async fn list_reviewers(
        &self,
        locator: &RepositoryLocator,
        number: PullRequestNumber,
    ) -> Result<Vec<String>, IntakeError> {
        tracing::debug!("listing requested reviewers for {locator}#{number}");
        self.client
            .get::<ApiRequestedReviewers, _, _>(
                locator.requested_reviewers_path(number),
                None::<&()>,
            )
            .await
            .map(ApiRequestedReviewers::into_logins)
            .map_err(|error| {
                map_octocrab_error(&format!("list reviewers for pull request #{number}"), &error)
            })
    }
}

#[cfg(test)]
mod tests;
