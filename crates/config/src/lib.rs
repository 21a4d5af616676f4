//! Configuration loading, validation, and env substitution.
//!
//! Config files: `rsvpbot.toml`, `rsvpbot.yaml`, or `rsvpbot.json`
//! Searched in `./` then `~/.config/rsvpbot/`.
//!
//! Supports `${ENV_VAR}` and `${ENV_VAR:-fallback}` substitution in the raw
//! file, and `RSVPBOT_*` environment overrides after parsing.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{apply_env_overrides, config_dir, discover_and_load, find_config_file, load_config},
    schema::{BotConfig, DEFAULT_TRIGGER, HelpConfig, RsvpConfig, ZulipConfig},
    validate::{Diagnostic, Severity, ValidationResult},
};
