//! Messages crossing the boundary between chat transports and the bot core.

use serde::{Deserialize, Serialize};

/// Whether a message was broadcast to a channel or addressed to one person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

/// Where an inbound message arrived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InboundRoute {
    /// A shared channel (a Zulip stream), optionally inside a thread/topic.
    Channel {
        channel: String,
        thread: Option<String>,
    },
    /// A direct message to the bot.
    Direct,
}

/// A message received from a chat transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub body: String,
    /// Stable sender identity (email address, handle).
    pub sender_id: String,
    pub sender_name: String,
    pub route: InboundRoute,
}

impl InboundMessage {
    pub fn public(
        body: impl Into<String>,
        sender_id: impl Into<String>,
        sender_name: impl Into<String>,
        channel: impl Into<String>,
        thread: Option<String>,
    ) -> Self {
        Self {
            body: body.into(),
            sender_id: sender_id.into(),
            sender_name: sender_name.into(),
            route: InboundRoute::Channel {
                channel: channel.into(),
                thread,
            },
        }
    }

    pub fn private(
        body: impl Into<String>,
        sender_id: impl Into<String>,
        sender_name: impl Into<String>,
    ) -> Self {
        Self {
            body: body.into(),
            sender_id: sender_id.into(),
            sender_name: sender_name.into(),
            route: InboundRoute::Direct,
        }
    }

    #[must_use]
    pub fn visibility(&self) -> Visibility {
        match self.route {
            InboundRoute::Channel { .. } => Visibility::Public,
            InboundRoute::Direct => Visibility::Private,
        }
    }

    /// Public messages are answered in the originating channel, private
    /// messages are answered to the sender.
    #[must_use]
    pub fn reply_target(&self) -> ReplyTarget {
        match &self.route {
            InboundRoute::Channel { channel, thread } => ReplyTarget::Channel {
                channel: channel.clone(),
                thread: thread.clone(),
            },
            InboundRoute::Direct => ReplyTarget::Direct {
                recipient: self.sender_id.clone(),
            },
        }
    }
}

/// Destination of an outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplyTarget {
    Channel {
        channel: String,
        thread: Option<String>,
    },
    Direct {
        recipient: String,
    },
}

/// A rendered reply handed to the messaging boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub text: String,
    pub to: ReplyTarget,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_reply_goes_back_to_channel() {
        let msg = InboundMessage::public(
            "RSVPbot lunch",
            "a@example.com",
            "A",
            "social",
            Some("food".into()),
        );
        assert_eq!(msg.visibility(), Visibility::Public);
        assert_eq!(msg.reply_target(), ReplyTarget::Channel {
            channel: "social".into(),
            thread: Some("food".into()),
        });
    }

    #[test]
    fn private_reply_goes_to_sender() {
        let msg = InboundMessage::private("lunch\n1", "b@example.com", "B");
        assert_eq!(msg.visibility(), Visibility::Private);
        assert_eq!(msg.reply_target(), ReplyTarget::Direct {
            recipient: "b@example.com".into(),
        });
    }

    #[test]
    fn route_serializes_with_kind_tag() {
        let json = serde_json::to_value(InboundRoute::Direct).unwrap_or_default();
        assert_eq!(json["kind"], "direct");
    }
}
