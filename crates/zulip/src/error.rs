use thiserror::Error;

/// Error code Zulip returns once an event queue has been garbage-collected.
pub const BAD_EVENT_QUEUE_ID: &str = "BAD_EVENT_QUEUE_ID";

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    /// The server answered with `"result": "error"`.
    #[error("zulip API error ({code}): {msg}")]
    Api { code: String, msg: String },

    #[error("{message}")]
    Message { message: String },

    #[error("{context}: {source}")]
    External {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn external(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Whether the event queue expired and must be registered again.
    pub fn is_bad_event_queue(&self) -> bool {
        matches!(self, Self::Api { code, .. } if code == BAD_EVENT_QUEUE_ID)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
