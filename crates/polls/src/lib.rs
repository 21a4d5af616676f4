//! Poll/RSVP engine: command parsing, in-memory poll state, vote bookkeeping
//! and reply rendering.
//!
//! Flow: inbound message → [`command::parse`] → [`PollRegistry`] lookup →
//! [`vote::cast_vote`] or topic management → [`render`] → reply text.

pub mod command;
pub mod error;
pub mod poll;
pub mod registry;
pub mod render;
pub mod vote;

pub use {
    command::{Command, parse},
    error::{Error, Result},
    poll::{DEFAULT_OPTION_LABEL, Poll, PollOption, normalize_title},
    registry::PollRegistry,
    render::HelpTexts,
    vote::{VoteOutcome, add_option, cast_vote},
};
