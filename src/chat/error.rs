//! Error types exposed by the chat layer.

use std::time::Duration;

use thiserror::Error;

/// Errors surfaced while talking to the chat platform.
///
/// These are per-recipient failures: the dispatcher records them against a
/// single reviewer and carries on with the rest of the run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatError {
    /// No guild member matches the configured chat username.
    #[error("no Discord member named `{username}`")]
    MemberNotFound {
        /// Chat username that was searched for.
        username: String,
    },

    /// The bot token was rejected.
    #[error("Discord rejected the bot token: {message}")]
    Authentication {
        /// Error detail returned with the 401/403 response.
        message: String,
    },

    /// A channel, guild, or user referenced by the request does not exist.
    #[error("Discord resource not found: {message}")]
    NotFound {
        /// Error detail returned by Discord.
        message: String,
    },

    /// Discord asked the client to slow down.
    #[error("Discord rate limit hit: {message}")]
    RateLimited {
        /// Error detail returned by Discord.
        message: String,
        /// Delay suggested by Discord before retrying, when provided.
        retry_after: Option<Duration>,
    },

    /// Discord returned another non-success response.
    #[error("Discord API error: {message}")]
    Api {
        /// Status and response body detail.
        message: String,
    },

    /// Networking failed while calling Discord.
    #[error("network error talking to Discord: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// The chat client could not be configured.
    #[error("Discord configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}
