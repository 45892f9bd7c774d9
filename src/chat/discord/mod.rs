//! Discord REST implementation of the chat gateway.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::ChatError;
use super::{ChannelHandle, ChatGateway, MemberHandle, MessageAck};

/// Public Discord REST API base.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";
const DEFAULT_TIMEOUT_SECS: u64 = 20;
const MEMBER_SEARCH_LIMIT: &str = "100";

/// Configuration for [`DiscordGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscordConfig {
    /// Base API URL (e.g., `https://discord.com/api/v10`).
    pub api_base: String,
    /// Bot token sent as `Authorization: Bot <token>`.
    pub token: String,
    /// Guild whose members are searched.
    pub guild_id: String,
    /// HTTP timeout applied to every request.
    pub timeout: Duration,
}

impl DiscordConfig {
    /// Constructs configuration for the public API with the default timeout.
    #[must_use]
    pub fn new(token: impl Into<String>, guild_id: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            token: token.into(),
            guild_id: guild_id.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Overrides the HTTP timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Discord-backed chat gateway.
#[derive(Debug, Clone)]
pub struct DiscordGateway {
    config: DiscordConfig,
    client: Client,
}

impl DiscordGateway {
    /// Creates a gateway and its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Configuration`] when the token or guild is blank
    /// or the HTTP client cannot be built.
    pub fn new(config: DiscordConfig) -> Result<Self, ChatError> {
        if config.token.trim().is_empty() {
            return Err(ChatError::Configuration {
                message: "bot token is required".to_owned(),
            });
        }
        if config.guild_id.trim().is_empty() {
            return Err(ChatError::Configuration {
                message: "guild id is required".to_owned(),
            });
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| ChatError::Configuration {
                message: format!("failed to configure Discord HTTP client: {error}"),
            })?;
        Ok(Self { config, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_base.trim_end_matches('/'))
    }

    fn authorise(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(
            reqwest::header::AUTHORIZATION,
            format!("Bot {}", self.config.token.trim()),
        )
    }

    async fn execute<T>(&self, operation: &str, request: RequestBuilder) -> Result<T, ChatError>
    where
        T: DeserializeOwned + Send,
    {
        let response = self
            .authorise(request)
            .send()
            .await
            .map_err(|error| ChatError::Network {
                message: format!("{operation} failed: {error}"),
            })?;
        let checked = check_status(operation, response).await?;
        checked.json::<T>().await.map_err(|error| ChatError::Api {
            message: format!("{operation} returned an unexpected body: {error}"),
        })
    }
}

#[async_trait]
impl ChatGateway for DiscordGateway {
    async fn find_member(&self, username: &str) -> Result<MemberHandle, ChatError> {
        let handle = ChatHandle::parse(username);
        let endpoint = self.endpoint(&format!(
            "/guilds/{}/members/search",
            self.config.guild_id.trim()
        ));
        let request = self
            .client
            .get(endpoint)
            .query(&[("query", handle.name), ("limit", MEMBER_SEARCH_LIMIT)]);

        tracing::debug!("searching Discord guild members for {username}");
        let members: Vec<ApiGuildMember> = self.execute("member search", request).await?;

        members
            .into_iter()
            .find(|member| handle.matches(member))
            .map(|member| MemberHandle {
                user_id: member.user.id,
                username: username.to_owned(),
            })
            .ok_or_else(|| ChatError::MemberNotFound {
                username: username.to_owned(),
            })
    }

    async fn open_direct_channel(
        &self,
        member: &MemberHandle,
    ) -> Result<ChannelHandle, ChatError> {
        let request = self
            .client
            .post(self.endpoint("/users/@me/channels"))
            .json(&CreateDirectChannel {
                recipient_id: member.user_id.as_str(),
            });

        let channel: ApiChannel = self.execute("open direct channel", request).await?;
        Ok(ChannelHandle {
            channel_id: channel.id,
        })
    }

    async fn send_message(
        &self,
        channel: &ChannelHandle,
        content: &str,
    ) -> Result<MessageAck, ChatError> {
        let request = self
            .client
            .post(self.endpoint(&format!("/channels/{}/messages", channel.channel_id)))
            .json(&CreateMessage { content });

        let message: ApiMessage = self.execute("send message", request).await?;
        Ok(MessageAck {
            message_id: message.id,
        })
    }
}

/// Chat username split into name and optional legacy discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChatHandle<'a> {
    name: &'a str,
    discriminator: Option<&'a str>,
}

impl<'a> ChatHandle<'a> {
    fn parse(username: &'a str) -> Self {
        let trimmed = username.trim();
        match trimmed.rsplit_once('#') {
            Some((name, discriminator))
                if !name.is_empty()
                    && !discriminator.is_empty()
                    && discriminator.chars().all(|character| character.is_ascii_digit()) =>
            {
                Self {
                    name,
                    discriminator: Some(discriminator),
                }
            }
            _ => Self {
                name: trimmed,
                discriminator: None,
            },
        }
    }

    fn matches(&self, member: &ApiGuildMember) -> bool {
        if let Some(discriminator) = self.discriminator {
            return member.user.username == self.name
                && member
                    .user
                    .discriminator
                    .as_deref()
                    .is_some_and(|actual| same_discriminator(discriminator, actual));
        }

        member.user.username == self.name
            || member.user.global_name.as_deref() == Some(self.name)
            || member.nick.as_deref() == Some(self.name)
    }
}

/// Discord zero-pads discriminators to four digits; handles often do not.
fn same_discriminator(expected: &str, actual: &str) -> bool {
    expected.trim_start_matches('0') == actual.trim_start_matches('0')
}

async fn check_status(operation: &str, response: Response) -> Result<Response, ChatError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "(failed to read error response body)".to_owned());
    let detail = serde_json::from_str::<ApiError>(&body).ok();
    let reason = detail
        .as_ref()
        .and_then(|error| error.message.clone())
        .unwrap_or(body);
    let message = format!("{operation} failed with status {}: {reason}", status.as_u16());

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ChatError::Authentication { message },
        StatusCode::NOT_FOUND => ChatError::NotFound { message },
        StatusCode::TOO_MANY_REQUESTS => ChatError::RateLimited {
            message,
            retry_after: detail
                .and_then(|error| error.retry_after)
                .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok()),
        },
        _ => ChatError::Api { message },
    })
}

#[derive(Debug, Serialize)]
struct CreateDirectChannel<'a> {
    recipient_id: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateMessage<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiGuildMember {
    user: ApiUser,
    nick: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    id: String,
    username: String,
    global_name: Option<String>,
    discriminator: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiChannel {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: Option<String>,
    retry_after: Option<f64>,
}
