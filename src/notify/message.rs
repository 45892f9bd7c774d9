//! Notification message rendering.
//!
//! The default template produces the fixed greeting reviewers have always
//! received. Operators can replace it with a `minijinja` template that has
//! access to `chat_username`, `host_username`, and `pull_request_number`.

use std::borrow::Cow;

use minijinja::{Environment, context};

use crate::github::IntakeError;
use crate::github::PullRequestNumber;

/// Template used when no override is configured.
pub const DEFAULT_MESSAGE_TEMPLATE: &str = concat!(
    "Hello {{ chat_username }}! ",
    "You have a pull request #{{ pull_request_number }} to review on GitHub ",
    "(GitHub username: {{ host_username }})."
);

/// Validated message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    source: Cow<'static, str>,
}

impl MessageTemplate {
    /// Compiles `source`, rejecting syntax errors and unknown variables up
    /// front.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] when the template does not
    /// compile or fails to render sample values.
    pub fn new(source: impl Into<String>) -> Result<Self, IntakeError> {
        let template = Self {
            source: Cow::Owned(source.into()),
        };
        template.try_render("reviewer", "reviewer", 1)?;
        Ok(template)
    }

    /// Renders the message for one reviewer.
    ///
    /// A template that rendered sample values cannot fail for other string
    /// and number inputs; should it happen anyway the default wording is
    /// used.
    #[must_use]
    pub fn render(
        &self,
        chat_username: &str,
        host_username: &str,
        number: PullRequestNumber,
    ) -> String {
        self.try_render(chat_username, host_username, number.get())
            .unwrap_or_else(|error| {
                tracing::warn!("message template failed, using default wording: {error}");
                default_message(chat_username, host_username, number)
            })
    }

    fn try_render(
        &self,
        chat_username: &str,
        host_username: &str,
        number: u64,
    ) -> Result<String, IntakeError> {
        let mut env = Environment::new();

        // Messages are plain text, not HTML.
        env.set_auto_escape_callback(|_| minijinja::AutoEscape::None);
        env.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);

        let ctx = context! {
            chat_username => chat_username,
            host_username => host_username,
            pull_request_number => number,
        };
        env.render_str(&self.source, ctx)
            .map_err(|error| IntakeError::Configuration {
                message: format!("invalid message template: {error}"),
            })
    }
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self {
            source: Cow::Borrowed(DEFAULT_MESSAGE_TEMPLATE),
        }
    }
}

/// Formats the default greeting without the template engine.
#[must_use]
pub fn default_message(
    chat_username: &str,
    host_username: &str,
    number: PullRequestNumber,
) -> String {
    format!(
        "Hello {chat_username}! You have a pull request #{number} to review on GitHub \
         (GitHub username: {host_username})."
    )
}
