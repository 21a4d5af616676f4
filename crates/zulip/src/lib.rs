//! Zulip transport for rsvpbot.
//!
//! Subscribes the bot account to its streams, long-polls the event queue and
//! feeds each message through a [`rsvp_router::MessageRouter`], posting the
//! replies back with [`ZulipOutbound`].

pub mod bot;
pub mod client;
pub mod error;
pub mod message;
pub mod outbound;

pub use {
    bot::start_polling,
    client::{EventQueue, ZulipClient},
    error::{Error, Result},
    outbound::ZulipOutbound,
};
