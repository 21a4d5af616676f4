use {
    async_trait::async_trait, rsvp_common::types::OutboundMessage, std::sync::Mutex,
    tracing::debug,
};

use crate::{ChannelOutbound, ChannelType, Result};

/// Outbound that keeps every sent message in memory instead of delivering it.
///
/// Lets tests observe exactly what the router would have delivered.
#[derive(Debug, Default)]
pub struct RecordingOutbound {
    sent: Mutex<Vec<OutboundMessage>>,
}

impl RecordingOutbound {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, oldest first.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Remove and return everything sent so far.
    pub fn take(&self) -> Vec<OutboundMessage> {
        std::mem::take(&mut *self.sent.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

#[async_trait]
impl ChannelOutbound for RecordingOutbound {
    fn channel_type(&self) -> ChannelType {
        ChannelType::Console
    }

    async fn send(&self, message: &OutboundMessage) -> Result<()> {
        debug!(to = ?message.to, "recording outbound message");
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, rsvp_common::types::ReplyTarget};

    #[tokio::test]
    async fn records_in_order_and_drains() {
        let outbound = RecordingOutbound::new();
        for text in ["one", "two"] {
            outbound
                .send(&OutboundMessage {
                    text: text.into(),
                    to: ReplyTarget::Direct {
                        recipient: "a@x".into(),
                    },
                })
                .await
                .unwrap();
        }

        let texts: Vec<_> = outbound.sent().into_iter().map(|m| m.text).collect();
        assert_eq!(texts, ["one", "two"]);
        assert_eq!(outbound.take().len(), 2);
        assert!(outbound.sent().is_empty());
    }
}
