//! Reply text for every command outcome.
//!
//! Rendering is pure: it never touches the registry. Wording differs for
//! public and private messages where noted.

use rsvp_common::types::Visibility;

use crate::{poll::Poll, vote::VoteOutcome};

const CHANGED_VOTE_NOTICE: &str = "You have changed your vote.";
const OUT_OF_RANGE_NOTICE: &str =
    "That option is not in the range of the voting options. Here are your options:";
const MALFORMED_NOTICE: &str = "Sorry, I couldn't understand that command.";

/// Help documents shown for public and private (voting) help requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpTexts {
    pub public: String,
    pub private: String,
}

impl HelpTexts {
    pub fn for_visibility(&self, visibility: Visibility) -> &str {
        match visibility {
            Visibility::Public => &self.public,
            Visibility::Private => &self.private,
        }
    }
}

/// `"<index>. <label>"` for every option, one per line, in index order.
pub fn option_listing(poll: &Poll) -> String {
    poll.options()
        .iter()
        .enumerate()
        .map(|(index, option)| format!("{index}. {}", option.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Confirmation for a new topic: its title followed by the option listing.
pub fn new_topic(poll: &Poll) -> String {
    format!("{}\n{}", poll.title(), option_listing(poll))
}

pub fn vote_confirmation(poll: &Poll, outcome: VoteOutcome, visibility: Visibility) -> String {
    let label = poll
        .option(outcome.option())
        .map(|o| o.label())
        .unwrap_or_default();

    let body = match visibility {
        Visibility::Private => {
            format!("One vote in this topic: {} for this option: {label}", poll.title())
        },
        Visibility::Public => format!(
            "You just voted for '{label}' but remember! You can also vote privately if you want :)"
        ),
    };

    if outcome.is_change() {
        format!("{CHANGED_VOTE_NOTICE}\n{body}")
    } else {
        body
    }
}

pub fn out_of_range(poll: &Poll) -> String {
    format!("{OUT_OF_RANGE_NOTICE}\n{}", option_listing(poll))
}

/// Final tally: the title, then `"<label> participants (<n>): <names>"` per
/// option. A topic with only the default option renders on a single line.
pub fn results(poll: &Poll) -> String {
    if let [only] = poll.options() {
        return format!(
            "{} participants ({}): {}",
            poll.title(),
            only.count(),
            only.voter_names().join(", ")
        );
    }

    let mut out = poll.title().to_string();
    for option in poll.options() {
        out.push_str(&format!(
            "\n{} participants ({}): {}",
            option.label(),
            option.count(),
            option.voter_names().join(", ")
        ));
    }
    out
}

pub fn option_added(poll: &Poll) -> String {
    format!(
        "There is a new option in topic: {}\n{}",
        poll.title(),
        option_listing(poll)
    )
}

pub fn duplicate_option(title: &str, label: &str) -> String {
    format!("{label} is already an option in topic: {title}\nDo not attempt to repeat options!")
}

pub fn topic_exists(title: &str) -> String {
    format!("There is already an open topic called {title}.")
}

pub fn malformed(help: &str) -> String {
    format!("{MALFORMED_NOTICE}\n\n{help}")
}
