//! Shared message types, error definitions, and utilities used across all
//! rsvpbot crates.

pub mod error;
pub mod types;

pub use error::{Error, FromMessage, Result};
