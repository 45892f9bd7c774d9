//! Data models for pull requests and their requested reviewers.
//!
//! Types prefixed with `Api` are internal deserialisation targets that convert
//! into public domain types.

use serde::Deserialize;

use crate::github::locator::PullRequestNumber;

/// Open pull request together with the users requested to review it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// Pull request number.
    pub number: PullRequestNumber,
    /// GitHub logins of the requested reviewers, in API order.
    pub reviewers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequestSummary {
    pub(crate) number: u64,
}

/// Response body of the requested reviewers endpoint.
///
/// Team reviewers are not deserialised: a team has no single chat identity.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiRequestedReviewers {
    #[serde(default)]
    pub(crate) users: Vec<ApiUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    pub(crate) login: Option<String>,
}

impl ApiRequestedReviewers {
    /// Returns reviewer logins, dropping users without one.
    pub(crate) fn into_logins(self) -> Vec<String> {
        self.users
            .into_iter()
            .filter_map(|user| user.login)
            .filter(|login| !login.is_empty())
            .collect()
    }
}
