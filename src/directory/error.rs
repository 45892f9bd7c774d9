//! Errors raised while loading the identity directory.

use thiserror::Error;

/// Failures that prevent the identity directory from loading.
///
/// Every variant is fatal to a run: no partial directory is ever returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    /// The document could not be read.
    #[error("could not read identity file {path}: {message}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// The document is not a mapping of identity entries.
    #[error("could not parse identity file {source_name}: {message}")]
    Parse {
        /// Path or description of the document.
        source_name: String,
        /// Parser error detail.
        message: String,
    },

    /// The same label appears twice in the document.
    #[error("identity label `{label}` appears more than once")]
    DuplicateLabel {
        /// Repeated label.
        label: String,
    },

    /// An entry has an empty username.
    #[error("identity entry `{label}` has a blank `{field}` username")]
    BlankField {
        /// Label of the offending entry.
        label: String,
        /// Field that was blank.
        field: &'static str,
    },

    /// Two entries map the same GitHub login.
    #[error(
        "GitHub user `{host_username}` is mapped by both `{first_label}` and `{second_label}`"
    )]
    DuplicateHostUsername {
        /// GitHub login that appears twice.
        host_username: String,
        /// Label of the entry indexed first.
        first_label: String,
        /// Label of the conflicting entry.
        second_label: String,
    },
}
