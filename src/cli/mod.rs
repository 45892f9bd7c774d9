//! CLI operation handlers.
//!
//! - [`notify_reviewers`]: resolve reviewers and deliver Discord messages
//!
//! Argument pre-processing lives in [`arguments`], exit codes in
//! [`exit_status`], and output formatting utilities in [`output`].

pub mod arguments;
pub mod exit_status;
pub mod notify_reviewers;
pub mod output;
