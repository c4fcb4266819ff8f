//! Caller-supplied domain deny-set.
//!
//! Entries and lookups are both normalized (trimmed, trailing dot removed,
//! lowercased), so membership is case-insensitive and FQDN-tolerant. The
//! set is plain owned data; batch workers only ever borrow it.

use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blacklist {
    domains: HashSet<String>,
}

impl Blacklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses one domain per line; blank lines and `#` comments are skipped.
    pub fn from_lines(text: &str) -> Self {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect()
    }

    pub fn insert(&mut self, domain: &str) {
        if let Some(normalized) = normalize(domain) {
            self.domains.insert(normalized);
        }
    }

    pub fn contains(&self, domain: &str) -> bool {
        match normalize(domain) {
            Some(normalized) => self.domains.contains(&normalized),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Blacklist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut blacklist = Blacklist::new();
        for domain in iter {
            blacklist.insert(domain.as_ref());
        }
        blacklist
    }
}

fn normalize(domain: &str) -> Option<String> {
    let trimmed = domain.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let blacklist: Blacklist = ["Blacklisted.TEST"].into_iter().collect();
        assert!(blacklist.contains("blacklisted.test"));
        assert!(blacklist.contains("BLACKLISTED.test"));
        assert!(!blacklist.contains("example.com"));
    }

    #[test]
    fn trailing_dot_is_ignored_on_both_sides() {
        let blacklist: Blacklist = ["spam.example."].into_iter().collect();
        assert!(blacklist.contains("spam.example"));
        assert!(blacklist.contains("spam.example."));
    }

    #[test]
    fn from_lines_skips_blanks_and_comments() {
        let blacklist = Blacklist::from_lines("# deny-list\n\nspam.example\n  other.test  \n");
        assert_eq!(blacklist.len(), 2);
        assert!(blacklist.contains("spam.example"));
        assert!(blacklist.contains("other.test"));
    }

    #[test]
    fn empty_entries_are_dropped() {
        let mut blacklist = Blacklist::new();
        blacklist.insert("   ");
        blacklist.insert(".");
        assert!(blacklist.is_empty());
        assert!(!blacklist.contains(""));
    }
}
