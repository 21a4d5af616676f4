//! Turn a raw chat message into a [`Command`].
//!
//! Public messages must start with the trigger keyword; the rest of the first
//! line is the topic title and an optional second line the payload. Private
//! messages are always commands: title on the first line, payload on the
//! second.

use rsvp_common::types::{InboundMessage, Visibility};

use crate::registry::PollRegistry;

const RESULTS_KEYWORD: &str = "who's in";
const IMPLICIT_VOTE_KEYWORD: &str = "i'm in";
const ADD_OPTION_PREFIX: &str = "add ";
const HELP_KEYWORD: &str = "help";

/// What an inbound message asks the bot to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// Open a topic; `options` exclude the default option.
    NewTopic { title: String, options: Vec<String> },
    ResultsRequest { title: String },
    Vote { title: String, option: usize },
    /// "i'm in": a vote for option 0.
    ImplicitVote { title: String },
    AddOption { title: String, label: String },
    /// The topic exists but the payload is unrecognized or the line count is
    /// wrong.
    Malformed { title: String },
    /// Not an open topic and not a creation command.
    NotFound { title: String },
}

/// Parse `msg` against the open topics in `polls`.
///
/// Returns `None` for public messages that do not start with `trigger`.
pub fn parse(msg: &InboundMessage, trigger: &str, polls: &PollRegistry) -> Option<Command> {
    match msg.visibility() {
        Visibility::Public => parse_public(&msg.body, trigger, polls),
        Visibility::Private => Some(parse_private(&msg.body, polls)),
    }
}

fn parse_public(body: &str, trigger: &str, polls: &PollRegistry) -> Option<Command> {
    let first_word = body.split_whitespace().next()?;
    if first_word.to_lowercase() != trigger.trim().to_lowercase() {
        return None;
    }

    let lines: Vec<&str> = body.lines().collect();
    let title = lines
        .first()
        .map(|line| line.split_whitespace().skip(1).collect::<Vec<_>>().join(" "))
        .unwrap_or_default();

    if title.is_empty() || title.eq_ignore_ascii_case(HELP_KEYWORD) {
        return Some(Command::Help);
    }

    if !polls.contains(&title) {
        // A lone vote or results payload addresses a topic that is not open
        // (e.g. already closed); it is not a request to create one.
        if let [_, payload] = lines.as_slice()
            && is_topic_payload(payload)
        {
            return Some(Command::NotFound { title });
        }
        let options = lines[1..]
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        return Some(Command::NewTopic { title, options });
    }

    let [_, payload] = lines.as_slice() else {
        return Some(Command::Malformed { title });
    };

    let keyword = normalize_keyword(payload);
    let command = if keyword == RESULTS_KEYWORD {
        Command::ResultsRequest { title }
    } else if keyword == IMPLICIT_VOTE_KEYWORD {
        Command::ImplicitVote { title }
    } else if let Some(option) = leading_index(payload.trim()) {
        Command::Vote { title, option }
    } else if let Some(label) = add_option_label(payload) {
        Command::AddOption { title, label }
    } else {
        Command::Malformed { title }
    };
    Some(command)
}

fn parse_private(body: &str, polls: &PollRegistry) -> Command {
    let lines: Vec<&str> = body.lines().collect();
    let title = lines.first().map(|l| l.trim()).unwrap_or_default().to_string();

    if title.is_empty() || !polls.contains(&title) {
        return Command::NotFound { title };
    }

    let [_, payload] = lines.as_slice() else {
        return Command::Malformed { title };
    };

    if normalize_keyword(payload) == IMPLICIT_VOTE_KEYWORD {
        return Command::ImplicitVote { title };
    }
    match payload.split_whitespace().next().and_then(leading_index) {
        Some(option) => Command::Vote { title, option },
        None => Command::Malformed { title },
    }
}

fn is_topic_payload(payload: &str) -> bool {
    let keyword = normalize_keyword(payload);
    keyword == RESULTS_KEYWORD
        || keyword == IMPLICIT_VOTE_KEYWORD
        || (!keyword.is_empty() && keyword.chars().all(|c| c.is_ascii_digit()))
}

/// Lower-case, trim, and fold typographic apostrophes so "Who’s in" matches.
fn normalize_keyword(payload: &str) -> String {
    payload.trim().to_lowercase().replace('\u{2019}', "'")
}

/// Leading ASCII digits as an option index ("2 please" → 2). Digit runs too
/// large for `usize` saturate, which is always out of range.
fn leading_index(payload: &str) -> Option<usize> {
    let end = payload
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(payload.len());
    let digits = &payload[..end];
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse().unwrap_or(usize::MAX))
}

fn add_option_label(payload: &str) -> Option<String> {
    let trimmed = payload.trim();
    let prefix = trimmed.get(..ADD_OPTION_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(ADD_OPTION_PREFIX) {
        return None;
    }
    let label = trimmed[ADD_OPTION_PREFIX.len()..].trim();
    (!label.is_empty()).then(|| label.to_string())
}
