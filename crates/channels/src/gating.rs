/// Check whether the bot should act on messages from `channel`.
///
/// An empty allowlist admits every channel. Entries match case-insensitively
/// and may use `*` as a wildcard for any sequence of characters
/// (`"team-*"`, `"*-social"`).
pub fn channel_allowed(channel: &str, allowlist: &[String]) -> bool {
    if allowlist.is_empty() {
        return true;
    }
    let channel = channel.to_lowercase();
    allowlist.iter().any(|pattern| {
        let pattern = pattern.to_lowercase();
        if pattern.contains('*') {
            wildcard_match(&pattern, &channel)
        } else {
            pattern == channel
        }
    })
}

/// Whether `pattern` (with `*` wildcards) covers all of `text`.
fn wildcard_match(pattern: &str, text: &str) -> bool {
    let mut segments = pattern.split('*');
    let Some(head) = segments.next() else {
        return true;
    };
    let Some(mut rest) = text.strip_prefix(head) else {
        return false;
    };

    let tail: Vec<&str> = segments.collect();
    let Some((last, middle)) = tail.split_last() else {
        return rest.is_empty();
    };

    for segment in middle.iter().filter(|s| !s.is_empty()) {
        match rest.find(segment) {
            Some(idx) => rest = &rest[idx + segment.len()..],
            None => return false,
        }
    }
    rest.ends_with(last)
}

/// Static names (no wildcard) from an allowlist, i.e. the channels that can
/// be subscribed to by name.
pub fn literal_channels(allowlist: &[String]) -> Vec<&str> {
    allowlist
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && !s.contains('*'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_allowlist_admits_everything() {
        assert!(channel_allowed("general", &[]));
    }

    #[test]
    fn literal_names_ignore_case() {
        let allow = list(&["Social", "lunch"]);
        assert!(channel_allowed("social", &allow));
        assert!(channel_allowed("LUNCH", &allow));
        assert!(!channel_allowed("general", &allow));
    }

    #[test]
    fn wildcard_prefix_suffix_and_middle() {
        assert!(channel_allowed("team-core", &list(&["team-*"])));
        assert!(!channel_allowed("core-team", &list(&["team-*"])));
        assert!(channel_allowed("nyc-social", &list(&["*-social"])));
        assert!(!channel_allowed("nyc-social-2", &list(&["*-social"])));
        assert!(channel_allowed("rc-2024-batch", &list(&["rc-*-batch"])));
        assert!(!channel_allowed("rc-2024-batches", &list(&["rc-*-batch"])));
        assert!(channel_allowed("anything", &list(&["*"])));
    }

    #[test]
    fn suffix_cannot_overlap_consumed_prefix() {
        assert!(!channel_allowed("ab", &list(&["ab*b"])));
        assert!(channel_allowed("abb", &list(&["ab*b"])));
    }

    #[test]
    fn literal_channels_skip_patterns_and_blanks() {
        let allow = list(&["social", "team-*", " ", " lunch "]);
        assert_eq!(literal_channels(&allow), ["social", "lunch"]);
    }
}
