//! Messaging boundary between chat transports and the bot core.
//!
//! Each transport (Zulip, the local console) implements [`ChannelOutbound`]
//! and turns its native events into [`rsvp_common::types::InboundMessage`].

pub mod error;
pub mod gating;
pub mod memory;
pub mod plugin;

pub use {
    error::{Error, Result},
    memory::RecordingOutbound,
    plugin::{ChannelOutbound, ChannelType},
};
