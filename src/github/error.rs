//! Error types exposed by the GitHub layer.

use thiserror::Error;

/// Errors surfaced while parsing input, loading configuration, or
/// communicating with GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntakeError {
    /// No target repository was configured.
    #[error("target repository is required (use --target ORG/REPO or --owner and --repo)")]
    MissingTarget,

    /// The target argument did not have the `ORG/REPO[/PRID]` shape.
    #[error("target must match ORG/REPO or ORG/REPO/PRID: {target}")]
    InvalidTarget {
        /// The rejected target value.
        target: String,
    },

    /// The provided URL could not be parsed.
    #[error("URL is invalid: {0}")]
    InvalidUrl(String),

    /// An owner or repository segment was empty.
    #[error("repository owner and name must not be empty")]
    MissingPathSegments,

    /// The pull request number is not a valid integer.
    #[error("pull request number must be a positive integer")]
    InvalidPullRequestNumber,

    /// The authentication token was missing.
    #[error("personal access token is required")]
    MissingToken,

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// The repository or pull request does not exist or is not visible.
    #[error("GitHub resource not found: {message}")]
    NotFound {
        /// Description of the missing resource.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Rate limit exceeded - the API returned 403/429 with a rate limit message.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Error message from GitHub.
        message: String,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}
