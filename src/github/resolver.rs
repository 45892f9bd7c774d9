//! Review set resolution: open pull requests and their requested reviewers.

use super::error::IntakeError;
use super::gateway::ReviewGateway;
use super::locator::ReviewTarget;
use super::models::PullRequest;

/// Resolves the review set for a target using a gateway.
pub struct ReviewSetResolver<'client, Gateway>
where
    Gateway: ReviewGateway,
{
    client: &'client Gateway,
}

impl<'client, Gateway> ReviewSetResolver<'client, Gateway>
where
    Gateway: ReviewGateway,
{
    /// Create a new resolver using the provided gateway.
    #[must_use]
    pub const fn new(client: &'client Gateway) -> Self {
        Self { client }
    }

    /// Load every open pull request in the target with its reviewers.
    ///
    /// Targets narrowed to one pull request skip the listing call. Pull
    /// requests are returned in the order the gateway lists them.
    ///
    /// # Errors
    ///
    /// Propagates the first gateway failure. A reviewer listing failure for
    /// any pull request aborts resolution.
    pub async fn resolve(&self, target: &ReviewTarget) -> Result<Vec<PullRequest>, IntakeError> {
        let locator = target.locator();
        let numbers = match target.only_pull_request() {
            Some(number) => vec![number],
            None => self.client.list_open_pull_requests(locator).await?,
        };

        let mut pull_requests = Vec::with_capacity(numbers.len());
        for number in numbers {
            let reviewers = self.client.list_reviewers(locator, number).await?;
            tracing::debug!(
                "pull request #{number} has {count} requested reviewer(s)",
                count = reviewers.len()
            );
            pull_requests.push(PullRequest { number, reviewers });
        }
        Ok(pull_requests)
    }
}
