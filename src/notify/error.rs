//! Fatal errors that abort a notification run.

use thiserror::Error;

use crate::chat::ChatError;
use crate::directory::DirectoryError;
use crate::github::IntakeError;

/// Errors that stop a run or prevent its report from being written.
///
/// Per-recipient delivery failures are not represented here; they are
/// recorded in the run summary instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RunError {
    /// Configuration was missing or invalid.
    #[error(transparent)]
    Configuration(#[from] IntakeError),

    /// The identity directory could not be loaded.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// The chat client could not be set up.
    #[error(transparent)]
    Chat(#[from] ChatError),

    /// Listing pull requests or reviewers failed.
    #[error("could not resolve reviewers for {repository}: {source}")]
    ReviewSet {
        /// Repository in `owner/repo` form.
        repository: String,
        /// Underlying GitHub failure.
        #[source]
        source: IntakeError,
    },

    /// The run was cancelled before the review set was resolved.
    #[error("run cancelled before reviewers were resolved")]
    Cancelled,

    /// Writing the run report failed.
    #[error("failed to write run report: {message}")]
    Io {
        /// Error detail from the writer.
        message: String,
    },
}
