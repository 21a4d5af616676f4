use std::time::Duration;

use {
    rsvp_channels::{
        ChannelOutbound,
        gating::{channel_allowed, literal_channels},
    },
    rsvp_config::ZulipConfig,
    rsvp_router::MessageRouter,
    tokio::task::JoinHandle,
    tokio_util::sync::CancellationToken,
    tracing::{debug, info, warn},
};

use crate::{
    Result,
    client::{EventQueue, ZulipClient},
    message::Event,
    outbound::ZulipOutbound,
};

/// Connect the bot account and start the event loop.
///
/// Subscribes to the configured streams (or every stream when none are
/// configured), then spawns a task that feeds message events through `router`
/// until the returned `CancellationToken` is cancelled.
pub async fn start_polling(
    config: &ZulipConfig,
    router: MessageRouter,
) -> anyhow::Result<(CancellationToken, JoinHandle<()>)> {
    if !config.has_credentials() {
        anyhow::bail!("zulip.email and zulip.api_key must be set");
    }

    let client = ZulipClient::new(config)?;
    let streams = resolve_streams(&client, &config.streams).await?;
    client.subscribe(&streams).await?;

    info!(
        email = client.email(),
        site = %config.site,
        streams = streams.len(),
        "zulip bot connected"
    );

    let cancel = CancellationToken::new();
    let poller = Poller {
        outbound: ZulipOutbound::new(client.clone()),
        client,
        allowlist: config.streams.clone(),
        backoff: Duration::from_secs(config.poll_backoff_secs.max(1)),
    };
    let handle = tokio::spawn(poller.run(router, cancel.clone()));
    Ok((cancel, handle))
}

/// Streams to subscribe to. A purely literal allowlist is used as given;
/// otherwise the server's stream list is filtered through it.
async fn resolve_streams(client: &ZulipClient, allowlist: &[String]) -> Result<Vec<String>> {
    let literal = literal_channels(allowlist);
    if !literal.is_empty() && literal.len() == allowlist.len() {
        return Ok(literal.into_iter().map(str::to_string).collect());
    }
    let all = client.list_streams().await?;
    Ok(all
        .into_iter()
        .filter(|name| channel_allowed(name, allowlist))
        .collect())
}

struct Poller {
    client: ZulipClient,
    outbound: ZulipOutbound,
    allowlist: Vec<String>,
    backoff: Duration,
}

impl Poller {
    async fn run(self, mut router: MessageRouter, cancel: CancellationToken) {
        info!("starting zulip event loop");
        let mut queue: Option<EventQueue> = None;

        loop {
            let mut current = match queue.take() {
                Some(q) => q,
                None => {
                    let registered = tokio::select! {
                        _ = cancel.cancelled() => break,
                        r = self.client.register_queue() => r,
                    };
                    match registered {
                        Ok(q) => q,
                        Err(e) => {
                            warn!(error = %e, "zulip queue registration failed");
                            if !self.pause(&cancel).await {
                                break;
                            }
                            continue;
                        },
                    }
                },
            };

            let polled = tokio::select! {
                _ = cancel.cancelled() => break,
                r = self.client.get_events(&current) => r,
            };

            match polled {
                Ok(events) => {
                    debug!(count = events.len(), "got zulip events");
                    process_events(
                        events,
                        &mut current,
                        &self.allowlist,
                        &mut router,
                        &self.outbound,
                    )
                    .await;
                    queue = Some(current);
                },
                Err(e) if e.is_bad_event_queue() => {
                    info!(queue_id = %current.queue_id, "zulip event queue expired, re-registering");
                },
                Err(e) => {
                    warn!(error = %e, "zulip get events failed");
                    queue = Some(current);
                    if !self.pause(&cancel).await {
                        break;
                    }
                },
            }
        }

        info!("zulip event loop stopped");
    }

    /// Sleep for the backoff interval. Returns `false` if cancelled meanwhile.
    async fn pause(&self, cancel: &CancellationToken) -> bool {
        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(self.backoff) => true,
        }
    }
}

/// Route message events through the router, advancing `queue` past every
/// event seen, including ones that fail to decode. Returns the number of
/// replies sent.
async fn process_events(
    events: Vec<serde_json::Value>,
    queue: &mut EventQueue,
    allowlist: &[String],
    router: &mut MessageRouter,
    outbound: &dyn ChannelOutbound,
) -> usize {
    let mut sent = 0;
    for raw in events {
        if let Some(id) = raw.get("id").and_then(serde_json::Value::as_i64) {
            queue.last_event_id = queue.last_event_id.max(id);
        }
        let event: Event = match serde_json::from_value(raw) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "skipping undecodable zulip event");
                continue;
            },
        };

        let Some(message) = event.message.filter(|_| event.kind == "message") else {
            continue;
        };
        if let Some(stream) = message.stream()
            && !channel_allowed(stream, allowlist)
        {
            debug!(stream, "ignoring message from stream outside allowlist");
            continue;
        }
        let Some(inbound) = message.to_inbound() else {
            debug!(kind = %message.kind, "ignoring unsupported zulip message type");
            continue;
        };

        match router.dispatch(&inbound, outbound).await {
            Ok(true) => sent += 1,
            Ok(false) => {},
            Err(e) => warn!(
                message_id = message.id,
                sender = %inbound.sender_id,
                error = %e,
                "failed to send zulip reply"
            ),
        }
    }
    sent
}
