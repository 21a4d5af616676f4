use std::error::Error as StdError;

/// Crate-wide result type for channel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed channel errors shared across transports.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The message cannot be delivered as addressed.
    #[error("invalid outbound message: {message}")]
    InvalidTarget { message: String },

    /// The remote service rejected the request.
    #[error("{channel} rejected the request: {message}")]
    Rejected { channel: String, message: String },

    /// Wrapped source error from the transport.
    #[error("channel operation failed: {context}: {source}")]
    External {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl Error {
    #[must_use]
    pub fn invalid_target(message: impl std::fmt::Display) -> Self {
        Self::InvalidTarget {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn rejected(channel: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Rejected {
            channel: channel.into(),
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn external(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            context: context.into(),
            source: Box::new(source),
        }
    }
}
