use std::path::Path;

use {
    rsvp_common::Error,
    rsvp_config::HelpConfig,
    rsvp_polls::HelpTexts,
    tracing::{debug, warn},
};

/// Public help used when no `help.public_path` is configured. `{trigger}` is
/// replaced with the configured trigger keyword.
pub const BUILTIN_PUBLIC_HELP: &str = "\
To start a new topic, post:
{trigger} <topic title>
<option 1>
<option 2>

To vote in a topic, post:
{trigger} <topic title>
<option number>

\"{trigger} <topic title>\" followed by \"i'm in\" votes for the default option,
\"add <label>\" adds an option, and \"who's in\" posts the results and closes the topic.
You can also vote privately: send me the topic title and the option number on two lines.";

/// Private help used when no `help.private_path` is configured.
pub const BUILTIN_PRIVATE_HELP: &str = "\
To vote privately, send me two lines:
<topic title>
<option number>

\"i'm in\" on the second line votes for the default option.
Topics are created in public streams with \"{trigger} <topic title>\".";

/// Read the configured help documents, falling back to the built-in texts
/// when a path is unset or unreadable.
pub fn load_help_texts(config: &HelpConfig, trigger: &str) -> HelpTexts {
    HelpTexts {
        public: load_one(config.public_path.as_deref(), BUILTIN_PUBLIC_HELP, trigger),
        private: load_one(config.private_path.as_deref(), BUILTIN_PRIVATE_HELP, trigger),
    }
}

fn load_one(path: Option<&Path>, builtin: &str, trigger: &str) -> String {
    if let Some(path) = path {
        match read_help_file(path) {
            Ok(text) => {
                debug!(path = %path.display(), "loaded help text");
                return text;
            },
            Err(e) => warn!(error = %e, "falling back to built-in help"),
        }
    }
    builtin.replace("{trigger}", trigger)
}

fn read_help_file(path: &Path) -> rsvp_common::Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::read(path, source))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, std::path::PathBuf};

    #[test]
    fn builtin_texts_mention_trigger() {
        let help = load_help_texts(&HelpConfig::default(), "pollbot");
        assert!(help.public.contains("pollbot <topic title>"));
        assert!(!help.public.contains("{trigger}"));
        assert!(help.private.contains("<option number>"));
    }

    #[test]
    fn configured_files_are_read_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let public = dir.path().join("help_msg.txt");
        std::fs::write(&public, "PUBLIC {trigger}").unwrap();

        let help = load_help_texts(
            &HelpConfig {
                public_path: Some(public),
                private_path: Some(PathBuf::from("/nonexistent/voting_help_msg.txt")),
            },
            "RSVPbot",
        );
        assert_eq!(help.public, "PUBLIC {trigger}");
        assert!(help.private.starts_with("To vote privately"));
    }
}
