//! Configuration validation.
//!
//! Reports problems that would make the bot misbehave at runtime: an unusable
//! trigger keyword, a bad server URL, missing credentials, unreadable help
//! documents.

use std::path::{Path, PathBuf};

use crate::{
    loader::{apply_env_overrides, load_config},
    schema::RsvpConfig,
};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Category: "syntax", "value", "credentials", "file-ref"
    pub category: &'static str,
    /// Dotted path, e.g. "bot.trigger"
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.severity, self.category, self.path, self.message
        )
    }
}

/// Result of validating a configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub config_path: Option<PathBuf>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    fn push(
        &mut self,
        severity: Severity,
        category: &'static str,
        path: &str,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(Diagnostic {
            severity,
            category,
            path: path.to_string(),
            message: message.into(),
        });
    }
}

/// Load and validate the file at `path` with environment overrides applied,
/// as the bot would see it. Parse failures become a single `syntax` error.
pub fn validate_file(path: &Path) -> ValidationResult {
    match load_config(path) {
        Ok(mut config) => {
            apply_env_overrides(&mut config, |name| std::env::var(name).ok());
            let mut result = validate(&config);
            result.config_path = Some(path.to_path_buf());
            result
        },
        Err(e) => {
            let mut result = ValidationResult {
                config_path: Some(path.to_path_buf()),
                ..Default::default()
            };
            result.push(Severity::Error, "syntax", "", e.to_string());
            result
        },
    }
}

/// Validate an already-parsed configuration.
pub fn validate(config: &RsvpConfig) -> ValidationResult {
    let mut result = ValidationResult::default();

    let trigger = config.bot.trigger.trim();
    if trigger.is_empty() {
        result.push(
            Severity::Error,
            "value",
            "bot.trigger",
            "trigger keyword must not be empty",
        );
    } else if trigger.contains(char::is_whitespace) {
        result.push(
            Severity::Error,
            "value",
            "bot.trigger",
            format!("trigger keyword must be a single word, got {trigger:?}"),
        );
    }

    let site = config.zulip.site.trim();
    if !(site.starts_with("https://") || site.starts_with("http://")) {
        result.push(
            Severity::Error,
            "value",
            "zulip.site",
            format!("expected an http(s) URL, got {site:?}"),
        );
    }

    if !config.zulip.has_credentials() {
        result.push(
            Severity::Warning,
            "credentials",
            "zulip",
            "zulip.email and zulip.api_key are required to connect to Zulip",
        );
    }

    for (i, stream) in config.zulip.streams.iter().enumerate() {
        if stream.trim().is_empty() {
            result.push(
                Severity::Warning,
                "value",
                &format!("zulip.streams[{i}]"),
                "empty stream name is ignored",
            );
        }
    }

    for (key, path) in [
        ("help.public_path", &config.help.public_path),
        ("help.private_path", &config.help.private_path),
    ] {
        if let Some(path) = path
            && !path.is_file()
        {
            result.push(
                Severity::Warning,
                "file-ref",
                key,
                format!(
                    "{} is not a readable file; the built-in help will be used",
                    path.display()
                ),
            );
        }
    }

    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, secrecy::Secret, std::io::Write};

    fn configured() -> RsvpConfig {
        let mut cfg = RsvpConfig::default();
        cfg.zulip.email = "bot@x".into();
        cfg.zulip.api_key = Secret::new("key".into());
        cfg
    }

    #[test]
    fn configured_default_is_clean() {
        let result = validate(&configured());
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn missing_credentials_is_a_warning() {
        let result = validate(&RsvpConfig::default());
        assert!(!result.has_errors());
        assert_eq!(result.count(Severity::Warning), 1);
        assert_eq!(result.diagnostics[0].category, "credentials");
    }

    #[test]
    fn bad_trigger_is_an_error() {
        for trigger in ["", "   ", "rsvp bot"] {
            let mut cfg = configured();
            cfg.bot.trigger = trigger.into();
            let result = validate(&cfg);
            assert!(result.has_errors(), "trigger {trigger:?}");
            assert_eq!(result.diagnostics[0].path, "bot.trigger");
        }
    }

    #[test]
    fn non_http_site_is_an_error() {
        let mut cfg = configured();
        cfg.zulip.site = "chat.example.org".into();
        let result = validate(&cfg);
        assert!(result.has_errors());
        assert_eq!(result.diagnostics[0].path, "zulip.site");
    }

    #[test]
    fn missing_help_file_is_a_warning() {
        let mut cfg = configured();
        cfg.help.private_path = Some(PathBuf::from("/nonexistent/voting_help_msg.txt"));
        let result = validate(&cfg);
        assert_eq!(result.count(Severity::Warning), 1);
        assert_eq!(result.diagnostics[0].path, "help.private_path");
        assert_eq!(result.diagnostics[0].category, "file-ref");
    }

    #[test]
    fn syntax_error_detected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rsvpbot.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"[bot\ntrigger = ").unwrap();

        let result = validate_file(&path);
        assert!(result.has_errors());
        assert_eq!(result.diagnostics[0].category, "syntax");
        assert_eq!(result.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn diagnostic_display() {
        let mut cfg = configured();
        cfg.bot.trigger = String::new();
        let line = validate(&cfg).diagnostics[0].to_string();
        assert_eq!(
            line,
            "error [value] bot.trigger: trigger keyword must not be empty"
        );
    }
}
