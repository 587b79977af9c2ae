//! Merge-log parsing: raw merge bodies into structured entries.
//!
//! The input is the text produced by the history fetcher: every merge body
//! prefixed with [`RECORD_MARKER`](crate::history::RECORD_MARKER), bodies in
//! chronological order. Blank lines carry no information here (git separates
//! a subject from its body with one), so they are stripped before the text
//! is chunked into records.

use serde::Serialize;
use tracing::warn;

use crate::history::RECORD_MARKER;

/// Title prefix git uses for pull-request merges.
const PR_TITLE_PREFIX: &str = "Merge pull request #";

/// A merge entry worth reporting: a title, a description, and the
/// pull-request reference when the title carries one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedMerge {
    /// First line of the merge body.
    pub title: String,
    /// First body line after the title.
    pub description: String,
    /// Reference label (e.g., `#42`) extracted from a pull-request title.
    pub pr_reference: Option<String>,
}

/// Parse a marked merge log into reportable entries, preserving order.
///
/// Entries without a description are dropped: a merge with no body content
/// is not actionable changelog material. Pull-request titles too short to
/// carry their reference token are skipped entirely with a warning.
pub fn parse_merge_log(raw: &str) -> Vec<ParsedMerge> {
    let compact = raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let mut merges = Vec::new();
    for chunk in compact.split(RECORD_MARKER) {
        let mut lines = chunk.lines();
        let (Some(title), Some(description)) = (lines.next(), lines.next()) else {
            continue;
        };
        let description = description.trim();
        if description.is_empty() {
            continue;
        }

        let pr_reference = match pr_reference(title) {
            TitleKind::Plain => None,
            TitleKind::PullRequest(label) => Some(label.to_string()),
            TitleKind::MalformedPullRequest => {
                warn!(%title, "pull-request merge title has no reference token, skipping entry");
                continue;
            }
        };

        merges.push(ParsedMerge {
            title: title.to_string(),
            description: description.to_string(),
            pr_reference,
        });
    }
    merges
}

enum TitleKind<'a> {
    Plain,
    PullRequest(&'a str),
    MalformedPullRequest,
}

/// Classify a merge title and pull out its reference label.
///
/// Pull-request titles look like `Merge pull request #42 from org/branch`;
/// the reference is the fourth whitespace-delimited token, taken verbatim.
fn pr_reference(title: &str) -> TitleKind<'_> {
    if !title.starts_with(PR_TITLE_PREFIX) {
        return TitleKind::Plain;
    }
    title
        .split_whitespace()
        .nth(3)
        .map_or(TitleKind::MalformedPullRequest, TitleKind::PullRequest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pull_request_title_yields_reference() {
        let raw = ">>>Merge pull request #42 from org/branch\n\nSupport nested tables\n";
        let merges = parse_merge_log(raw);
        assert_eq!(merges.len(), 1);
        assert_eq!(merges[0].title, "Merge pull request #42 from org/branch");
        assert_eq!(merges[0].description, "Support nested tables");
        assert_eq!(merges[0].pr_reference.as_deref(), Some("#42"));
    }

    #[test]
    fn plain_title_has_no_reference() {
        let raw = ">>>Fix bug\nCloses #1\n>>>No description line\n";
        let merges = parse_merge_log(raw);
        assert_eq!(merges.len(), 1);
        assert_eq!(merges[0].title, "Fix bug");
        assert_eq!(merges[0].description, "Closes #1");
        assert_eq!(merges[0].pr_reference, None);
    }

    #[test]
    fn single_line_body_is_dropped() {
        let raw = ">>>Merge branch 'hotfix'\n";
        assert!(parse_merge_log(raw).is_empty());
    }

    #[test]
    fn whitespace_only_description_is_dropped() {
        // The blank-line strip removes the padding, leaving a one-line body.
        let raw = ">>>Merge branch 'hotfix'\n   \n\n";
        assert!(parse_merge_log(raw).is_empty());
    }

    #[test]
    fn blank_subject_separator_is_skipped_over() {
        // git bodies separate subject and description with a blank line; the
        // description must still be the first real body line.
        let raw = ">>>Merge pull request #7 from ada/topic\n\nTeach the parser new tricks\n";
        let merges = parse_merge_log(raw);
        assert_eq!(merges[0].description, "Teach the parser new tricks");
        assert_eq!(merges[0].pr_reference.as_deref(), Some("#7"));
    }

    #[test]
    fn reference_token_is_extracted_verbatim() {
        // Positional extraction only: no validation of the label's shape.
        let raw = ">>>Merge pull request #notanumber from x/y\nSome description\n";
        let merges = parse_merge_log(raw);
        assert_eq!(merges[0].pr_reference.as_deref(), Some("#notanumber"));
    }

    #[test]
    fn order_matches_input_order() {
        let raw = "\
>>>Merge pull request #1 from a/x
First change
>>>Merge pull request #2 from b/y
Second change
";
        let merges = parse_merge_log(raw);
        assert_eq!(merges.len(), 2);
        assert_eq!(merges[0].pr_reference.as_deref(), Some("#1"));
        assert_eq!(merges[1].pr_reference.as_deref(), Some("#2"));
    }

    #[test]
    fn extra_body_lines_are_ignored() {
        let raw = ">>>Merge pull request #9 from c/z\n\nHeadline change\nDetail one\nDetail two\n";
        let merges = parse_merge_log(raw);
        assert_eq!(merges.len(), 1);
        assert_eq!(merges[0].description, "Headline change");
    }

    #[test]
    fn empty_log_parses_to_nothing() {
        assert!(parse_merge_log("").is_empty());
        assert!(parse_merge_log("\n\n").is_empty());
    }
}
