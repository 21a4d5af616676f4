use {async_trait::async_trait, rsvp_common::types::OutboundMessage};

use crate::Result;

/// Transports the bot can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelType {
    Zulip,
    Console,
}

impl ChannelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zulip => "zulip",
            Self::Console => "console",
        }
    }
}

impl std::fmt::Display for ChannelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Send rendered replies to a channel.
#[async_trait]
pub trait ChannelOutbound: Send + Sync {
    /// Which transport this sender belongs to, for logging.
    fn channel_type(&self) -> ChannelType;

    /// Deliver one message to its [`rsvp_common::types::ReplyTarget`].
    async fn send(&self, message: &OutboundMessage) -> Result<()>;
}
