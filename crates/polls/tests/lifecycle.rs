#![allow(clippy::unwrap_used, clippy::expect_used)]
use rsvp_polls::{
    Error, PollRegistry, VoteOutcome, add_option, cast_vote, render,
};

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn lunch_topic_from_open_to_closed() {
    let mut polls = PollRegistry::new();
    let poll = polls.create("Lunch", &labels(&["Pizza", "Sushi"])).unwrap();
    assert_eq!(poll.options()[0].label(), "Default");
    assert_eq!(poll.options()[0].count(), 0);

    let poll = polls.lookup_mut("lunch").unwrap();
    cast_vote(poll, "a@example.com", "A", 1).unwrap();
    assert_eq!(poll.options()[1].count(), 1);
    assert_eq!(poll.options()[2].count(), 0);

    let poll = polls.lookup_mut("LUNCH").unwrap();
    let outcome = cast_vote(poll, "a@example.com", "A", 2).unwrap();
    assert_eq!(outcome, VoteOutcome::Changed {
        previous: 1,
        option: 2
    });

    let poll = polls.lookup_mut("Lunch").unwrap();
    cast_vote(poll, "b@example.com", "B", 0).unwrap();

    let poll = polls.lookup("lunch").unwrap();
    assert_eq!(poll.options()[1].count(), 0);
    assert_eq!(poll.options()[2].voter_emails(), ["a@example.com"]);
    assert_eq!(poll.total_votes(), 2);

    let closed = polls.close("lunch").unwrap();
    let text = render::results(&closed);
    assert!(text.contains("Default participants (1): B"));
    assert!(text.contains("Pizza participants (0): "));
    assert!(text.contains("Sushi participants (1): A"));
    assert!(polls.lookup("lunch").is_none());
    assert_eq!(polls.close("Lunch").unwrap_err(), Error::UnknownTopic {
        title: "Lunch".into()
    });
}

#[test]
fn mutations_are_visible_to_later_lookups() {
    let mut polls = PollRegistry::new();
    polls.create("Retro", &[]).unwrap();

    add_option(polls.lookup_mut("retro").unwrap(), "Thursday").unwrap();
    assert_eq!(polls.lookup("RETRO").unwrap().options().len(), 2);

    let err = add_option(polls.lookup_mut("retro").unwrap(), "thursday").unwrap_err();
    assert!(matches!(err, Error::DuplicateOption { .. }));
}

#[test]
fn closed_topic_can_be_reopened_empty() {
    let mut polls = PollRegistry::new();
    polls.create("Lunch", &labels(&["Pizza"])).unwrap();
    cast_vote(polls.lookup_mut("lunch").unwrap(), "a", "A", 1).unwrap();
    polls.remove("lunch").unwrap();

    let poll = polls.create("lunch", &labels(&["Salad"])).unwrap();
    assert_eq!(poll.title(), "lunch");
    assert_eq!(poll.total_votes(), 0);
    assert_eq!(poll.choice_of("a"), None);
}
