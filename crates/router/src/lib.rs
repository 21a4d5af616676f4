//! Inbound message processing: the glue between channels and the poll engine.
//!
//! Flow: channel message → parse command → registry / vote engine → render
//! reply → deliver via channel outbound.

pub mod help;
pub mod router;

pub use {
    help::{BUILTIN_PRIVATE_HELP, BUILTIN_PUBLIC_HELP, load_help_texts},
    router::MessageRouter,
};
