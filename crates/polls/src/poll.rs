use std::collections::HashMap;

/// Label of the option every topic starts with, at index 0.
pub const DEFAULT_OPTION_LABEL: &str = "Default";

/// Registry key for a topic title: trimmed and lower-cased.
///
/// Titles are matched case-insensitively but displayed as first typed.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Label comparison used for duplicate detection.
pub(crate) fn same_label(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// One selectable choice within a topic.
///
/// The vote count is the length of the voter lists, so it cannot drift from
/// membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOption {
    label: String,
    voter_emails: Vec<String>,
    voter_names: Vec<String>,
}

impl PollOption {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            voter_emails: Vec::new(),
            voter_names: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn count(&self) -> usize {
        self.voter_emails.len()
    }

    pub fn voter_emails(&self) -> &[String] {
        &self.voter_emails
    }

    pub fn voter_names(&self) -> &[String] {
        &self.voter_names
    }

    pub fn has_voter(&self, voter_id: &str) -> bool {
        self.voter_emails.iter().any(|id| id == voter_id)
    }

    fn push_voter(&mut self, voter_id: &str, voter_name: &str) {
        self.voter_emails.push(voter_id.to_string());
        self.voter_names.push(voter_name.to_string());
    }

    fn remove_voter(&mut self, voter_id: &str) -> bool {
        match self.voter_emails.iter().position(|id| id == voter_id) {
            Some(pos) => {
                self.voter_emails.remove(pos);
                self.voter_names.remove(pos);
                true
            },
            None => false,
        }
    }
}

/// A named voting topic: its options and who currently backs which one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poll {
    title: String,
    options: Vec<PollOption>,
    voters: HashMap<String, usize>,
}

impl Poll {
    /// Build a topic with the default option at index 0 followed by `labels`
    /// at indices `1..`.
    pub fn new<I, S>(title: &str, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options = std::iter::once(PollOption::new(DEFAULT_OPTION_LABEL))
            .chain(labels.into_iter().map(PollOption::new))
            .collect();
        Self {
            title: title.trim().to_string(),
            options,
            voters: HashMap::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn key(&self) -> String {
        normalize_title(&self.title)
    }

    /// Options in index order; the position is the option number.
    pub fn options(&self) -> &[PollOption] {
        &self.options
    }

    pub fn option(&self, index: usize) -> Option<&PollOption> {
        self.options.get(index)
    }

    /// Option index the voter currently backs.
    pub fn choice_of(&self, voter_id: &str) -> Option<usize> {
        self.voters.get(voter_id).copied()
    }

    /// Number of distinct voters in this topic.
    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    /// Sum of all option counts.
    pub fn total_votes(&self) -> usize {
        self.options.iter().map(PollOption::count).sum()
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.options.iter().any(|o| same_label(o.label(), label))
    }

    pub(crate) fn push_option(&mut self, label: &str) -> usize {
        self.options.push(PollOption::new(label.trim()));
        self.options.len() - 1
    }

    /// Move `voter_id` onto `index`, detaching it from any previous option
    /// first. Returns the previous index. The caller checks `index` is in
    /// range.
    pub(crate) fn assign(&mut self, voter_id: &str, voter_name: &str, index: usize) -> Option<usize> {
        let previous = self.voters.insert(voter_id.to_string(), index);
        if let Some(prev) = previous
            && let Some(option) = self.options.get_mut(prev)
        {
            option.remove_voter(voter_id);
        }
        if let Some(option) = self.options.get_mut(index) {
            option.push_voter(voter_id, voter_name);
        }
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize_title("  Friday LUNCH "), "friday lunch");
    }

    #[test]
    fn new_poll_seeds_default_option() {
        let poll = Poll::new("Lunch", Vec::<String>::new());
        assert_eq!(poll.options().len(), 1);
        assert_eq!(poll.options()[0].label(), DEFAULT_OPTION_LABEL);
        assert_eq!(poll.options()[0].count(), 0);
    }

    #[test]
    fn user_options_follow_default() {
        let poll = Poll::new(" Lunch ", ["Pizza", "Sushi"]);
        assert_eq!(poll.title(), "Lunch");
        assert_eq!(poll.key(), "lunch");
        let labels: Vec<_> = poll.options().iter().map(PollOption::label).collect();
        assert_eq!(labels, ["Default", "Pizza", "Sushi"]);
    }

    #[test]
    fn assign_moves_voter_between_options() {
        let mut poll = Poll::new("Lunch", ["Pizza", "Sushi"]);
        assert_eq!(poll.assign("a@x", "A", 1), None);
        assert_eq!(poll.assign("a@x", "A", 2), Some(1));

        assert_eq!(poll.options()[1].count(), 0);
        assert!(!poll.options()[1].has_voter("a@x"));
        assert_eq!(poll.options()[2].voter_names(), ["A"]);
        assert_eq!(poll.choice_of("a@x"), Some(2));
    }

    #[test]
    fn has_label_ignores_case_and_padding() {
        let poll = Poll::new("Lunch", ["Pizza"]);
        assert!(poll.has_label(" pizza"));
        assert!(poll.has_label("DEFAULT"));
        assert!(!poll.has_label("Sushi"));
    }
}
