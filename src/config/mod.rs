//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.nudger.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `NUDGER_TARGET`, `NUDGER_TOKEN`,
//!    `NUDGER_DISCORD_TOKEN`, and so on, plus the legacy `GITHUB_TOKEN` and
//!    `GOVERN_DISCORD_TOKEN`
//! 4. **Command-line arguments** – the positional `ORG/REPO[/PRID]`
//!    target, `--target`/`-T`, `--token`/`-t`, ...
//!
//! # Configuration File
//!
//! ```toml
//! target = "unikraft/unikraft"
//! discord_guild_id = "123456789012345678"
//! users_file = "users.yaml"
//! concurrency = 4
//! request_timeout_seconds = 20
//! ```

use std::env;
use std::num::NonZeroUsize;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::chat::DiscordConfig;
use crate::chat::discord::DEFAULT_API_BASE as DISCORD_API_BASE;
use crate::github::error::IntakeError;
use crate::github::{GITHUB_API_BASE, RepositoryLocator, ReviewTarget};
use crate::notify::{DispatchSettings, MessageTemplate};

const DEFAULT_USERS_FILE: &str = "users.yaml";
const DEFAULT_CONCURRENCY: usize = 4;
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 20;
const LEGACY_GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";
const LEGACY_DISCORD_TOKEN_ENV: &str = "GOVERN_DISCORD_TOKEN";

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `NUDGER_TARGET` or `--target`: `ORG/REPO` or `ORG/REPO/PRID`
/// - `NUDGER_TOKEN`, `GITHUB_TOKEN`, or `--token`: GitHub token
/// - `NUDGER_DISCORD_TOKEN`, `GOVERN_DISCORD_TOKEN`, or `--discord-token`:
///   Discord bot token
/// - `NUDGER_DISCORD_GUILD_ID` or `--discord-guild-id`: guild to search
/// - `NUDGER_USERS_FILE` or `--users-file`: identity document path
///
/// # Example
///
/// ```no_run
/// use nudger::NudgerConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = NudgerConfig::load().expect("failed to load configuration");
/// let target = config.review_target().expect("target required");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "NUDGER",
    discovery(
        dotfile_name = ".nudger.toml",
        config_file_name = "nudger.toml",
        app_name = "nudger"
    )
)]
pub struct NudgerConfig {
    /// Repository to scan as `ORG/REPO`, or a single pull request as
    /// `ORG/REPO/PRID`.
    ///
    /// Can be provided via:
    /// - CLI: positional `ORG/REPO[/PRID]`, `--target <TARGET>`, or
    ///   `-T <TARGET>`
    /// - Environment: `NUDGER_TARGET`
    /// - Config file: `target = "..."`
    #[ortho_config(cli_short = 'T')]
    pub target: Option<String>,

    /// Repository owner, used together with `repo` instead of `target`.
    #[ortho_config(cli_short = 'o')]
    pub owner: Option<String>,

    /// Repository name, used together with `owner` instead of `target`.
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `NUDGER_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// GitHub API base URL, for GitHub Enterprise installations.
    ///
    /// Defaults to `https://api.github.com`.
    #[ortho_config(cli_short = 'g')]
    pub github_api_url: Option<String>,

    /// Discord bot token.
    ///
    /// Can be provided via:
    /// - CLI: `--discord-token <TOKEN>`
    /// - Environment: `NUDGER_DISCORD_TOKEN` or `GOVERN_DISCORD_TOKEN`
    ///   (legacy)
    /// - Config file: `discord_token = "..."`
    #[ortho_config(cli_short = 'd')]
    pub discord_token: Option<String>,

    /// Discord guild (server) whose members receive notifications.
    #[ortho_config(cli_short = 'D')]
    pub discord_guild_id: Option<String>,

    /// Discord API base URL. Defaults to the public v10 API.
    #[ortho_config(cli_short = 'a')]
    pub discord_api_url: Option<String>,

    /// Path of the YAML identity document mapping GitHub logins to Discord
    /// usernames.
    ///
    /// Defaults to `users.yaml`.
    #[ortho_config(cli_short = 'u')]
    pub users_file: String,

    /// Maximum number of reviewers notified at once. Defaults to 4.
    #[ortho_config(cli_short = 'c')]
    pub concurrency: usize,

    /// Timeout applied to every Discord call, in seconds. Defaults to 20.
    #[ortho_config(cli_short = 's')]
    pub request_timeout_seconds: u64,

    /// Message template overriding the default greeting.
    ///
    /// Rendered with `minijinja`; `chat_username`, `host_username`, and
    /// `pull_request_number` are available.
    #[ortho_config(cli_short = 'm')]
    pub message_template: Option<String>,

    /// Writes a JSON line per recipient and per run to stderr.
    #[ortho_config()]
    pub report_jsonl: bool,

    /// Exits with status 2 when any mapped reviewer could not be notified.
    #[ortho_config()]
    pub fail_on_undelivered: bool,
}

impl Default for NudgerConfig {
    fn default() -> Self {
        Self {
            target: None,
            owner: None,
            repo: None,
            token: None,
            github_api_url: None,
            discord_token: None,
            discord_guild_id: None,
            discord_api_url: None,
            users_file: DEFAULT_USERS_FILE.to_owned(),
            concurrency: DEFAULT_CONCURRENCY,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            message_template: None,
            report_jsonl: false,
            fail_on_undelivered: false,
        }
    }
}

impl NudgerConfig {
    /// Sets the target given as a positional command-line argument.
    pub fn set_target(&mut self, target: impl Into<String>) {
        self.target = Some(target.into());
    }

    /// Resolves the GitHub token from configuration or the legacy
    /// `GITHUB_TOKEN` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingToken`] when no token source provides a
    /// value.
    pub fn resolve_token(&self) -> Result<String, IntakeError> {
        self.token
            .clone()
            .or_else(|| env::var(LEGACY_GITHUB_TOKEN_ENV).ok())
            .filter(|token| !token.trim().is_empty())
            .ok_or(IntakeError::MissingToken)
    }

    /// Resolves the Discord bot token from configuration or the legacy
    /// `GOVERN_DISCORD_TOKEN` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] when no token source provides a
    /// value.
    pub fn resolve_discord_token(&self) -> Result<String, IntakeError> {
        self.discord_token
            .clone()
            .or_else(|| env::var(LEGACY_DISCORD_TOKEN_ENV).ok())
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| IntakeError::Configuration {
                message: "Discord bot token is required (use --discord-token or \
                          NUDGER_DISCORD_TOKEN)"
                    .to_owned(),
            })
    }

    /// Returns the Discord guild identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] when no guild is configured.
    pub fn require_guild_id(&self) -> Result<&str, IntakeError> {
        self.discord_guild_id
            .as_deref()
            .map(str::trim)
            .filter(|guild| !guild.is_empty())
            .ok_or_else(|| IntakeError::Configuration {
                message: "Discord guild id is required (use --discord-guild-id)".to_owned(),
            })
    }

    /// GitHub API base URL, falling back to the public API.
    #[must_use]
    pub fn github_api_base(&self) -> &str {
        self.github_api_url.as_deref().unwrap_or(GITHUB_API_BASE)
    }

    /// Builds the review target from `target` or from `owner` and `repo`.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingTarget`] when nothing is configured,
    /// [`IntakeError::Configuration`] when `target` conflicts with
    /// `owner`/`repo` or only one of them is set, and the parsing errors of
    /// [`ReviewTarget::parse`] for malformed targets.
    pub fn review_target(&self) -> Result<ReviewTarget, IntakeError> {
        let api_base = self.github_api_base();
        match (&self.target, &self.owner, &self.repo) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(IntakeError::Configuration {
                message: "use either --target or --owner/--repo, not both".to_owned(),
            }),
            (Some(target), None, None) => ReviewTarget::parse(target, api_base),
            (None, Some(owner), Some(repo)) => Ok(ReviewTarget::repository(
                RepositoryLocator::with_api_base(owner, repo, api_base)?,
            )),
            (None, None, Some(_)) => Err(IntakeError::Configuration {
                message: "repository owner is required (use --owner or -o)".to_owned(),
            }),
            (None, Some(_), None) => Err(IntakeError::Configuration {
                message: "repository name is required (use --repo or -r)".to_owned(),
            }),
            (None, None, None) => Err(IntakeError::MissingTarget),
        }
    }

    /// Concurrency and timeout limits for delivery.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] when either limit is zero.
    pub fn dispatch_settings(&self) -> Result<DispatchSettings, IntakeError> {
        let concurrency =
            NonZeroUsize::new(self.concurrency).ok_or_else(|| IntakeError::Configuration {
                message: "concurrency must be at least 1".to_owned(),
            })?;
        Ok(DispatchSettings {
            concurrency,
            call_timeout: self.request_timeout()?,
        })
    }

    /// Message template, validated before any network call.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] when the template is invalid.
    pub fn message_template(&self) -> Result<MessageTemplate, IntakeError> {
        self.message_template
            .as_deref()
            .map_or_else(|| Ok(MessageTemplate::default()), MessageTemplate::new)
    }

    /// Discord gateway configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] when the bot token or guild is
    /// missing or the timeout is zero.
    pub fn discord_config(&self) -> Result<DiscordConfig, IntakeError> {
        let token = self.resolve_discord_token()?;
        let guild_id = self.require_guild_id()?;
        Ok(DiscordConfig::new(token, guild_id)
            .with_api_base(self.discord_api_url.as_deref().unwrap_or(DISCORD_API_BASE))
            .with_timeout(self.request_timeout()?))
    }

    /// Checks every setting that can be validated without network access.
    ///
    /// # Errors
    ///
    /// Returns the first configuration problem found.
    pub fn validate(&self) -> Result<(), IntakeError> {
        self.review_target()?;
        self.resolve_token()?;
        self.discord_config()?;
        self.dispatch_settings()?;
        self.message_template()?;
        Ok(())
    }

    fn request_timeout(&self) -> Result<Duration, IntakeError> {
        if self.request_timeout_seconds == 0 {
            return Err(IntakeError::Configuration {
                message: "request timeout must be at least one second".to_owned(),
            });
        }
        Ok(Duration::from_secs(self.request_timeout_seconds))
    }
}

#[cfg(test)]
mod tests;
