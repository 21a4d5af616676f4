/// Informational failures of poll operations. None of them are fatal: each
/// one is rendered into a reply and the bot keeps serving.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The requested option index is not present in the topic.
    #[error("option {index} is not in the range of topic {title}")]
    OptionOutOfRange { title: String, index: usize },

    /// An option with the same label (case-insensitive) already exists.
    #[error("{label} is already an option in topic: {title}")]
    DuplicateOption { title: String, label: String },

    /// A topic with the same normalized title is already open.
    #[error("topic already exists: {title}")]
    TopicExists { title: String },

    /// No open topic with this title.
    #[error("unknown topic: {title}")]
    UnknownTopic { title: String },
}

pub type Result<T> = std::result::Result<T, Error>;
