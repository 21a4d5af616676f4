use {
    async_trait::async_trait,
    rsvp_channels::{ChannelOutbound, ChannelType},
    rsvp_common::types::OutboundMessage,
    tracing::debug,
};

use crate::{Error, client::ZulipClient};

/// Outbound message sender for Zulip.
#[derive(Debug, Clone)]
pub struct ZulipOutbound {
    client: ZulipClient,
}

impl ZulipOutbound {
    pub fn new(client: ZulipClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChannelOutbound for ZulipOutbound {
    fn channel_type(&self) -> ChannelType {
        ChannelType::Zulip
    }

    async fn send(&self, message: &OutboundMessage) -> rsvp_channels::Result<()> {
        if message.text.trim().is_empty() {
            return Err(rsvp_channels::Error::invalid_target("empty message body"));
        }
        self.client
            .send_message(message)
            .await
            .map_err(|e| match e {
                Error::Api { code, msg } => {
                    rsvp_channels::Error::rejected("zulip", format!("{code}: {msg}"))
                },
                other => rsvp_channels::Error::external("zulip send", other),
            })?;
        debug!(to = ?message.to, "zulip message sent");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {
        super::*,
        rsvp_common::types::ReplyTarget,
        rsvp_config::ZulipConfig,
        secrecy::Secret,
    };

    fn outbound(site: String) -> ZulipOutbound {
        let config = ZulipConfig {
            site,
            email: "rsvp-bot@example.com".into(),
            api_key: Secret::new("key".into()),
            ..ZulipConfig::default()
        };
        ZulipOutbound::new(ZulipClient::new(&config).unwrap())
    }

    fn to_social(text: &str) -> OutboundMessage {
        OutboundMessage {
            text: text.into(),
            to: ReplyTarget::Channel {
                channel: "social".into(),
                thread: None,
            },
        }
    }

    #[tokio::test]
    async fn rejected_send_maps_to_channel_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/v1/messages")
            .with_status(400)
            .with_body(
                r#"{"result":"error","msg":"Stream 'social' does not exist","code":"STREAM_DOES_NOT_EXIST"}"#,
            )
            .create_async()
            .await;

        let err = outbound(server.url())
            .send(&to_social("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, rsvp_channels::Error::Rejected { .. }));
        assert!(err.to_string().contains("STREAM_DOES_NOT_EXIST"));
    }

    #[tokio::test]
    async fn empty_body_is_not_sent() {
        let err = outbound("http://127.0.0.1:9".into())
            .send(&to_social("  "))
            .await
            .unwrap_err();
        assert!(matches!(err, rsvp_channels::Error::InvalidTarget { .. }));
    }
}
