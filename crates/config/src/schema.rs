/// Config schema types (bot identity, help documents, Zulip account).
use std::path::PathBuf;

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Trigger keyword used when none is configured.
pub const DEFAULT_TRIGGER: &str = "RSVPbot";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RsvpConfig {
    pub bot: BotConfig,
    pub help: HelpConfig,
    pub zulip: ZulipConfig,
}

impl RsvpConfig {
    /// Sender identity the bot posts as, so its own messages can be skipped.
    /// Falls back to the Zulip bot email.
    pub fn bot_identity(&self) -> Option<&str> {
        self.bot
            .identity
            .as_deref()
            .or(Some(self.zulip.email.as_str()))
            .filter(|s| !s.trim().is_empty())
    }
}

/// Command interpretation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Keyword that must start a public message for the bot to react.
    /// Compared case-insensitively.
    pub trigger: String,
    /// The bot's own sender identity.
    pub identity: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            trigger: DEFAULT_TRIGGER.into(),
            identity: None,
        }
    }
}

/// External help documents. Built-in texts are used when unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HelpConfig {
    /// Shown for public `help` and unrecognized public commands.
    pub public_path: Option<PathBuf>,
    /// Shown for private messages that don't name an open topic.
    pub private_path: Option<PathBuf>,
}

/// Zulip bot account.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZulipConfig {
    /// Server base URL, e.g. `https://chat.example.org`.
    pub site: String,
    /// Bot account email.
    pub email: String,
    /// Bot API key.
    #[serde(serialize_with = "serialize_secret")]
    pub api_key: Secret<String>,
    /// Streams to subscribe to and act in. Empty means every stream on the
    /// server. Entries may use `*` wildcards to filter without subscribing.
    pub streams: Vec<String>,
    /// Delay before retrying after a failed event poll.
    pub poll_backoff_secs: u64,
}

impl ZulipConfig {
    pub fn has_credentials(&self) -> bool {
        !self.email.trim().is_empty() && !self.api_key.expose_secret().trim().is_empty()
    }
}

impl std::fmt::Debug for ZulipConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZulipConfig")
            .field("site", &self.site)
            .field("email", &self.email)
            .field("api_key", &"[REDACTED]")
            .field("streams", &self.streams)
            .finish_non_exhaustive()
    }
}

impl Default for ZulipConfig {
    fn default() -> Self {
        Self {
            site: "https://api.zulip.com".into(),
            email: String::new(),
            api_key: Secret::new(String::new()),
            streams: Vec::new(),
            poll_backoff_secs: 5,
        }
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = RsvpConfig::default();
        assert_eq!(cfg.bot.trigger, "RSVPbot");
        assert_eq!(cfg.zulip.site, "https://api.zulip.com");
        assert_eq!(cfg.zulip.poll_backoff_secs, 5);
        assert!(cfg.zulip.streams.is_empty());
        assert!(!cfg.zulip.has_credentials());
        assert_eq!(cfg.bot_identity(), None);
    }

    #[test]
    fn deserialize_partial_toml() {
        let cfg: RsvpConfig = toml::from_str(
            r#"
            [bot]
            trigger = "pollbot"

            [zulip]
            email = "rsvp-bot@chat.example.org"
            api_key = "abc123"
            streams = ["social", "team-*"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.bot.trigger, "pollbot");
        assert_eq!(cfg.zulip.api_key.expose_secret(), "abc123");
        assert_eq!(cfg.zulip.streams, ["social", "team-*"]);
        assert_eq!(cfg.zulip.site, "https://api.zulip.com");
        assert!(cfg.zulip.has_credentials());
        assert_eq!(cfg.bot_identity(), Some("rsvp-bot@chat.example.org"));
    }

    #[test]
    fn explicit_identity_wins() {
        let mut cfg = RsvpConfig::default();
        cfg.zulip.email = "bot@x".into();
        cfg.bot.identity = Some("me@x".into());
        assert_eq!(cfg.bot_identity(), Some("me@x"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let cfg = ZulipConfig {
            api_key: Secret::new("supersecret".into()),
            ..Default::default()
        };
        let dbg = format!("{cfg:?}");
        assert!(dbg.contains("[REDACTED]"));
        assert!(!dbg.contains("supersecret"));
    }
}
