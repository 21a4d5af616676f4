use std::path::{Path, PathBuf};

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::{
    Error, Result,
    env_subst::substitute_env,
    error::Context,
    schema::RsvpConfig,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "rsvpbot.toml",
    "rsvpbot.yaml",
    "rsvpbot.yml",
    "rsvpbot.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<RsvpConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations, then apply `RSVPBOT_*`
/// environment overrides.
///
/// Search order:
/// 1. `./rsvpbot.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/rsvpbot/rsvpbot.{toml,yaml,yml,json}` (user-global)
///
/// Falls back to `RsvpConfig::default()` if no file is found or it fails to
/// load.
pub fn discover_and_load() -> RsvpConfig {
    let mut config = match find_config_file() {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config(&path).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                RsvpConfig::default()
            })
        },
        None => {
            debug!("no config file found, using defaults");
            RsvpConfig::default()
        },
    };
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    config
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    let local = CONFIG_FILENAMES.iter().map(PathBuf::from);
    let global = config_dir()
        .into_iter()
        .flat_map(|dir| CONFIG_FILENAMES.iter().map(move |name| dir.join(name)));
    local.chain(global).find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/rsvpbot/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "rsvpbot").map(|d| d.config_dir().to_path_buf())
}

/// Override config values from the environment.
///
/// `ZULIP_API_KEY` is honoured as well as `RSVPBOT_ZULIP_API_KEY`; the
/// prefixed name wins when both are set.
pub fn apply_env_overrides(config: &mut RsvpConfig, lookup: impl Fn(&str) -> Option<String>) {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(trigger) = get("RSVPBOT_TRIGGER") {
        config.bot.trigger = trigger;
    }
    if let Some(site) = get("RSVPBOT_ZULIP_SITE") {
        config.zulip.site = site;
    }
    if let Some(email) = get("RSVPBOT_ZULIP_EMAIL") {
        config.zulip.email = email;
    }
    if let Some(key) = get("RSVPBOT_ZULIP_API_KEY").or_else(|| get("ZULIP_API_KEY")) {
        config.zulip.api_key = Secret::new(key);
    }
}

fn parse_config(raw: &str, path: &Path) -> Result<RsvpConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        other => Err(Error::UnsupportedFormat(other.to_string())),
    }
}
