use std::collections::{HashMap, hash_map::Entry};

use tracing::debug;

use crate::{
    Error, Result,
    poll::{DEFAULT_OPTION_LABEL, Poll, normalize_title, same_label},
};

/// Open topics keyed by normalized title.
///
/// A topic exists iff it is present here. Creation never overwrites; removal
/// is the terminal step of a results request.
#[derive(Debug, Default)]
pub struct PollRegistry {
    polls: HashMap<String, Poll>,
}

impl PollRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, title: &str) -> Option<&Poll> {
        self.polls.get(&normalize_title(title))
    }

    pub fn lookup_mut(&mut self, title: &str) -> Option<&mut Poll> {
        self.polls.get_mut(&normalize_title(title))
    }

    /// Like [`lookup_mut`](Self::lookup_mut), failing with
    /// [`Error::UnknownTopic`] when no topic has this title.
    pub fn require_mut(&mut self, title: &str) -> Result<&mut Poll> {
        self.polls
            .get_mut(&normalize_title(title))
            .ok_or_else(|| unknown(title))
    }

    pub fn contains(&self, title: &str) -> bool {
        self.polls.contains_key(&normalize_title(title))
    }

    /// Open a new topic with the default option plus `labels`.
    ///
    /// Fails with [`Error::TopicExists`] when the normalized title is taken and
    /// with [`Error::DuplicateOption`] when two labels (including the default)
    /// compare equal ignoring case.
    pub fn create(&mut self, title: &str, labels: &[String]) -> Result<&mut Poll> {
        let mut seen: Vec<&str> = vec![DEFAULT_OPTION_LABEL];
        for label in labels {
            if seen.iter().any(|s| same_label(s, label)) {
                return Err(Error::DuplicateOption {
                    title: title.trim().to_string(),
                    label: label.trim().to_string(),
                });
            }
            seen.push(label);
        }

        match self.polls.entry(normalize_title(title)) {
            Entry::Occupied(entry) => Err(Error::TopicExists {
                title: entry.get().title().to_string(),
            }),
            Entry::Vacant(entry) => {
                debug!(topic = title.trim(), options = labels.len(), "topic opened");
                Ok(entry.insert(Poll::new(title, labels.iter().map(|l| l.trim()))))
            },
        }
    }

    pub fn remove(&mut self, title: &str) -> Option<Poll> {
        let removed = self.polls.remove(&normalize_title(title));
        if removed.is_some() {
            debug!(topic = title.trim(), "topic closed");
        }
        removed
    }

    /// Remove a topic for its results, failing with [`Error::UnknownTopic`].
    pub fn close(&mut self, title: &str) -> Result<Poll> {
        self.remove(title).ok_or_else(|| unknown(title))
    }

    pub fn len(&self) -> usize {
        self.polls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polls.is_empty()
    }

    /// Display titles of all open topics, sorted.
    pub fn titles(&self) -> Vec<&str> {
        let mut titles: Vec<&str> = self.polls.values().map(Poll::title).collect();
        titles.sort_unstable();
        titles
    }
}

fn unknown(title: &str) -> Error {
    Error::UnknownTopic {
        title: title.trim().to_string(),
    }
}
