//! Chat platform access for delivering reviewer notifications.
//!
//! The dispatcher only needs three operations from the chat platform: find a
//! member by username, open a direct channel with them, and post a message.
//! [`ChatGateway`] captures those so the dispatcher can be tested with mocks,
//! while [`DiscordGateway`] talks to the Discord REST API.

pub mod discord;
mod error;

use async_trait::async_trait;

pub use discord::{DiscordConfig, DiscordGateway};
pub use error::ChatError;

/// Chat member located by username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberHandle {
    /// Platform user identifier.
    pub user_id: String,
    /// Username the member was found under.
    pub username: String,
}

/// Open direct-message channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelHandle {
    /// Platform channel identifier.
    pub channel_id: String,
}

/// Acknowledgement of a delivered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAck {
    /// Platform message identifier.
    pub message_id: String,
}

/// Gateway that can deliver direct messages to chat members.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Find the member whose username matches `username`.
    async fn find_member(&self, username: &str) -> Result<MemberHandle, ChatError>;

    /// Open (or reuse) a direct-message channel with `member`.
    async fn open_direct_channel(&self, member: &MemberHandle)
    -> Result<ChannelHandle, ChatError>;

    /// Post `content` to `channel`.
    async fn send_message(
        &self,
        channel: &ChannelHandle,
        content: &str,
    ) -> Result<MessageAck, ChatError>;
}
