//! Contributor list normalization: dedupe and order by family name.

use std::collections::HashSet;

/// Trim, dedupe, and sort author names by family name.
///
/// Names are deduplicated by exact equality after trimming; empty names are
/// dropped. The sort key is the last whitespace-delimited token that starts
/// with an ASCII letter, compared case-sensitively. A name with no such
/// token sorts by its full trimmed form instead of being dropped. Ties keep
/// first-encounter order (the sort is stable over the deduplicated list).
pub fn dedupe_and_sort<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut unique: Vec<String> = names
        .into_iter()
        .filter_map(|name| {
            let trimmed = name.as_ref().trim();
            (!trimmed.is_empty() && seen.insert(trimmed.to_string()))
                .then(|| trimmed.to_string())
        })
        .collect();

    unique.sort_by(|a, b| family_key(a).cmp(family_key(b)));
    unique
}

/// The family-name sort key: the last token whose first character is an
/// ASCII letter, or the whole name when no token qualifies.
fn family_key(name: &str) -> &str {
    name.split_whitespace()
        .filter(|token| {
            token
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic())
        })
        .next_back()
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_collapse_to_distinct_names() {
        let authors = dedupe_and_sort([
            "Jane A. Doe",
            "doe, jane",
            "Bob  Smith",
            "Jane A. Doe",
        ]);
        assert_eq!(authors.len(), 3);
    }

    #[test]
    fn sorted_by_last_alphabetic_token() {
        let authors = dedupe_and_sort(["Jane A. Doe", "doe, jane", "Bob  Smith"]);
        // Keys are "Doe", "jane", "Smith"; byte order puts uppercase first.
        assert_eq!(authors, ["Jane A. Doe", "Bob  Smith", "doe, jane"]);
    }

    #[test]
    fn sorting_is_idempotent() {
        let once = dedupe_and_sort(["Grace Hopper", "Alan Turing", "Ada Lovelace"]);
        let twice = dedupe_and_sort(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed_before_dedup() {
        let authors = dedupe_and_sort(["  Ada Lovelace", "Ada Lovelace  "]);
        assert_eq!(authors, ["Ada Lovelace"]);
    }

    #[test]
    fn empty_names_are_dropped() {
        let authors = dedupe_and_sort(["", "   ", "Ada Lovelace"]);
        assert_eq!(authors, ["Ada Lovelace"]);
    }

    #[test]
    fn non_letter_tokens_do_not_become_keys() {
        // "(bot)" starts with a parenthesis, so "deploy" is the key.
        let authors = dedupe_and_sort(["deploy (bot)", "Ada Lovelace"]);
        assert_eq!(authors, ["Ada Lovelace", "deploy (bot)"]);
    }

    #[test]
    fn name_without_alphabetic_token_is_kept() {
        let authors = dedupe_and_sort(["=^.^=", "Ada Lovelace"]);
        assert_eq!(authors.len(), 2);
        assert!(authors.contains(&"=^.^=".to_string()));
    }

    #[test]
    fn ties_keep_first_encounter_order() {
        let authors = dedupe_and_sort(["Jane Doe", "John Doe"]);
        assert_eq!(authors, ["Jane Doe", "John Doe"]);

        let reversed = dedupe_and_sort(["John Doe", "Jane Doe"]);
        assert_eq!(reversed, ["John Doe", "Jane Doe"]);
    }
}
