use tracing::debug;

use crate::{Error, Result, poll::Poll};

/// Result of a successful vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// First vote by this voter in the topic.
    Recorded { option: usize },
    /// The voter already backed `previous` (which may equal `option`).
    Changed { previous: usize, option: usize },
}

impl VoteOutcome {
    pub fn option(&self) -> usize {
        match *self {
            Self::Recorded { option } | Self::Changed { option, .. } => option,
        }
    }

    pub fn is_change(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

/// Record `voter_id`'s choice of `option` in `poll`.
///
/// A voter holds at most one option: a repeat vote detaches the voter from
/// the previous option before attaching to the new one, so counts and voter
/// lists stay consistent. An index outside the topic leaves it untouched.
pub fn cast_vote(
    poll: &mut Poll,
    voter_id: &str,
    voter_name: &str,
    option: usize,
) -> Result<VoteOutcome> {
    if poll.option(option).is_none() {
        return Err(Error::OptionOutOfRange {
            title: poll.title().to_string(),
            index: option,
        });
    }

    let outcome = match poll.assign(voter_id, voter_name, option) {
        None => VoteOutcome::Recorded { option },
        Some(previous) => VoteOutcome::Changed { previous, option },
    };
    debug!(topic = poll.title(), voter = voter_id, ?outcome, "vote applied");
    Ok(outcome)
}

/// Append a new option to `poll`, returning its index.
///
/// Labels are compared case-insensitively; an existing label is rejected with
/// [`Error::DuplicateOption`].
pub fn add_option(poll: &mut Poll, label: &str) -> Result<usize> {
    if poll.has_label(label) {
        return Err(Error::DuplicateOption {
            title: poll.title().to_string(),
            label: label.trim().to_string(),
        });
    }
    let index = poll.push_option(label);
    debug!(topic = poll.title(), index, "option added");
    Ok(index)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn lunch() -> Poll {
        Poll::new("Lunch", ["Pizza", "Sushi"])
    }

    fn assert_consistent(poll: &Poll) {
        assert_eq!(poll.total_votes(), poll.voter_count());
        for option in poll.options() {
            assert_eq!(option.count(), option.voter_names().len());
        }
    }

    #[test]
    fn first_vote_is_recorded() {
        let mut poll = lunch();
        let outcome = cast_vote(&mut poll, "a@x", "A", 1).unwrap();

        assert_eq!(outcome, VoteOutcome::Recorded { option: 1 });
        assert_eq!(poll.options()[1].count(), 1);
        assert_eq!(poll.options()[1].voter_emails(), ["a@x"]);
        assert_eq!(poll.choice_of("a@x"), Some(1));
        assert_consistent(&poll);
    }

    #[test]
    fn changing_vote_moves_the_voter() {
        let mut poll = lunch();
        cast_vote(&mut poll, "a@x", "A", 1).unwrap();
        let outcome = cast_vote(&mut poll, "a@x", "A", 2).unwrap();

        assert_eq!(outcome, VoteOutcome::Changed {
            previous: 1,
            option: 2
        });
        assert_eq!(poll.options()[1].count(), 0);
        assert_eq!(poll.options()[2].count(), 1);
        assert!(!poll.options()[1].has_voter("a@x"));
        assert!(poll.options()[2].has_voter("a@x"));
        assert_consistent(&poll);
    }

    #[test]
    fn same_option_revote_is_a_net_noop() {
        let mut poll = lunch();
        cast_vote(&mut poll, "a@x", "A", 1).unwrap();
        cast_vote(&mut poll, "b@x", "B", 1).unwrap();
        let outcome = cast_vote(&mut poll, "a@x", "A", 1).unwrap();

        assert!(outcome.is_change());
        assert_eq!(outcome.option(), 1);
        assert_eq!(poll.options()[1].count(), 2);
        assert_eq!(poll.options()[1].voter_names(), ["B", "A"]);
        assert_consistent(&poll);
    }

    #[test]
    fn out_of_range_leaves_poll_untouched() {
        let mut poll = lunch();
        cast_vote(&mut poll, "a@x", "A", 2).unwrap();
        let before = poll.clone();

        for index in [3, 42, usize::MAX] {
            let err = cast_vote(&mut poll, "a@x", "A", index).unwrap_err();
            assert_eq!(err, Error::OptionOutOfRange {
                title: "Lunch".into(),
                index,
            });
        }
        assert_eq!(poll, before);
    }

    #[test]
    fn one_option_per_voter_across_many_votes() {
        let mut poll = lunch();
        let sequence = [
            ("a", 0),
            ("b", 1),
            ("a", 2),
            ("c", 2),
            ("b", 1),
            ("a", 0),
            ("c", 1),
        ];
        for (voter, option) in sequence {
            cast_vote(&mut poll, voter, voter, option).unwrap();
            assert_consistent(&poll);
            for id in ["a", "b", "c"] {
                let holders = poll.options().iter().filter(|o| o.has_voter(id)).count();
                assert!(holders <= 1, "{id} appears in {holders} options");
            }
        }
        assert_eq!(poll.voter_count(), 3);
        assert_eq!(poll.options()[0].voter_emails(), ["a"]);
        assert_eq!(poll.options()[1].voter_emails(), ["b", "c"]);
        assert_eq!(poll.options()[2].count(), 0);
    }

    #[test]
    fn add_option_appends_contiguous_index() {
        let mut poll = lunch();
        assert_eq!(add_option(&mut poll, " Tacos ").unwrap(), 3);
        assert_eq!(poll.options()[3].label(), "Tacos");
        cast_vote(&mut poll, "a@x", "A", 3).unwrap();
        assert_eq!(poll.options()[3].count(), 1);
    }

    #[test]
    fn add_option_rejects_duplicates() {
        let mut poll = lunch();
        let err = add_option(&mut poll, "SUSHI").unwrap_err();
        assert_eq!(err, Error::DuplicateOption {
            title: "Lunch".into(),
            label: "SUSHI".into(),
        });
        assert_eq!(poll.options().len(), 3);
    }
}
