//! Minimal Zulip REST client: the endpoints the bot needs and nothing else.

use std::time::Duration;

use {
    reqwest::{Client, RequestBuilder, Response},
    rsvp_common::types::{OutboundMessage, ReplyTarget},
    rsvp_config::ZulipConfig,
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, de::DeserializeOwned},
    tracing::{debug, info},
};

use crate::{Error, Result};

/// Long-poll requests are held open by the server for about a minute before
/// a heartbeat, so the client timeout must exceed that.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Authenticated client for one bot account.
#[derive(Clone)]
pub struct ZulipClient {
    http: Client,
    base_url: String,
    email: String,
    api_key: Secret<String>,
}

/// A registered event queue and the last event seen on it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventQueue {
    pub queue_id: String,
    pub last_event_id: i64,
}

#[derive(Deserialize)]
struct Envelope {
    result: String,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    code: Option<String>,
}

#[derive(Deserialize)]
struct StreamsResponse {
    streams: Vec<StreamInfo>,
}

#[derive(Deserialize)]
struct StreamInfo {
    name: String,
}

/// Events stay raw here so one payload the bot cannot parse does not fail
/// the whole batch.
#[derive(Deserialize)]
struct EventsResponse {
    #[serde(default)]
    events: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct Ignored {}

impl ZulipClient {
    pub fn new(config: &ZulipConfig) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: config.site.trim().trim_end_matches('/').to_string(),
            email: config.email.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Names of every stream visible to the bot.
    pub async fn list_streams(&self) -> Result<Vec<String>> {
        let resp = self.get("streams").send().await?;
        let body: StreamsResponse = parse(resp).await?;
        Ok(body.streams.into_iter().map(|s| s.name).collect())
    }

    /// Subscribe the bot to `streams`. Already-subscribed streams are fine.
    pub async fn subscribe(&self, streams: &[String]) -> Result<()> {
        if streams.is_empty() {
            return Ok(());
        }
        let subscriptions = serde_json::Value::Array(
            streams
                .iter()
                .map(|name| serde_json::json!({ "name": name }))
                .collect(),
        )
        .to_string();
        let resp = self
            .post("users/me/subscriptions")
            .form(&[("subscriptions", subscriptions)])
            .send()
            .await?;
        parse::<Ignored>(resp).await?;
        info!(count = streams.len(), "subscribed to zulip streams");
        Ok(())
    }

    /// Register a queue that receives raw-markdown message events.
    pub async fn register_queue(&self) -> Result<EventQueue> {
        let resp = self
            .post("register")
            .form(&[
                ("event_types", r#"["message"]"#),
                ("apply_markdown", "false"),
            ])
            .send()
            .await?;
        let queue: EventQueue = parse(resp).await?;
        debug!(queue_id = %queue.queue_id, "registered zulip event queue");
        Ok(queue)
    }

    /// Long-poll for events after `queue.last_event_id`, undecoded.
    pub async fn get_events(&self, queue: &EventQueue) -> Result<Vec<serde_json::Value>> {
        let last_event_id = queue.last_event_id.to_string();
        let resp = self
            .get("events")
            .query(&[
                ("queue_id", queue.queue_id.as_str()),
                ("last_event_id", last_event_id.as_str()),
            ])
            .send()
            .await?;
        let body: EventsResponse = parse(resp).await?;
        Ok(body.events)
    }

    /// Post `message` to a stream topic or as a private message.
    pub async fn send_message(&self, message: &OutboundMessage) -> Result<()> {
        let form: Vec<(&str, &str)> = match &message.to {
            ReplyTarget::Channel { channel, thread } => vec![
                ("type", "stream"),
                ("to", channel.as_str()),
                ("topic", thread.as_deref().unwrap_or("(no topic)")),
                ("content", message.text.as_str()),
            ],
            ReplyTarget::Direct { recipient } => vec![
                ("type", "private"),
                ("to", recipient.as_str()),
                ("content", message.text.as_str()),
            ],
        };
        let resp = self.post("messages").form(&form).send().await?;
        parse::<Ignored>(resp).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/{path}", self.base_url)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http
            .get(self.url(path))
            .basic_auth(&self.email, Some(self.api_key.expose_secret()))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.http
            .post(self.url(path))
            .basic_auth(&self.email, Some(self.api_key.expose_secret()))
    }
}

impl std::fmt::Debug for ZulipClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZulipClient")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Zulip reports failures in the body (`"result": "error"`), usually with a
/// 4xx status, so the envelope is checked before the status.
async fn parse<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    let body = resp.text().await?;
    let envelope: Envelope = serde_json::from_str(&body)
        .map_err(|_| Error::message(format!("zulip returned HTTP {status}: {body}")))?;
    if envelope.result != "success" {
        return Err(Error::Api {
            code: envelope.code.unwrap_or_else(|| status.as_u16().to_string()),
            msg: envelope.msg,
        });
    }
    serde_json::from_str(&body)
        .map_err(|source| Error::external("failed to parse zulip response", source))
}
