//! Zulip event payloads and their conversion into [`InboundMessage`].

use {rsvp_common::types::InboundMessage, serde::Deserialize};

/// One entry of a `GET /api/v1/events` response.
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub message: Option<ZulipMessage>,
}

/// A message as delivered in a `message` event.
#[derive(Debug, Clone, Deserialize)]
pub struct ZulipMessage {
    pub id: u64,
    /// `"stream"` or `"private"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub sender_email: String,
    pub sender_full_name: String,
    pub display_recipient: DisplayRecipient,
    /// Topic name; older servers only send `subject`.
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub topic: Option<String>,
}

/// Stream name for stream messages, participant list for private ones.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DisplayRecipient {
    Stream(String),
    Users(Vec<RecipientUser>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecipientUser {
    pub email: String,
    #[serde(default)]
    pub full_name: String,
}

impl ZulipMessage {
    /// Stream the message was posted to, if any.
    pub fn stream(&self) -> Option<&str> {
        match &self.display_recipient {
            DisplayRecipient::Stream(name) if self.kind == "stream" => Some(name),
            _ => None,
        }
    }

    /// Convert to the transport-neutral form, or `None` for message types the
    /// bot does not handle.
    pub fn to_inbound(&self) -> Option<InboundMessage> {
        match self.kind.as_str() {
            "stream" => {
                let stream = self.stream()?;
                let thread = self
                    .topic
                    .as_deref()
                    .filter(|t| !t.is_empty())
                    .or(Some(self.subject.as_str()))
                    .filter(|t| !t.is_empty())
                    .map(str::to_string);
                Some(InboundMessage::public(
                    self.content.as_str(),
                    self.sender_email.as_str(),
                    self.sender_full_name.as_str(),
                    stream,
                    thread,
                ))
            },
            "private" => Some(InboundMessage::private(
                self.content.as_str(),
                self.sender_email.as_str(),
                self.sender_full_name.as_str(),
            )),
            _ => None,
        }
    }
}
