//! Report rendering: a [`ReleaseSummary`] into the final text document.
//!
//! Pure formatting, no I/O. The document has four header lines in fixed
//! order; a header is printed even when its list is empty.

use std::fmt::Write;

use crate::summary::ReleaseSummary;

/// Bullet marker for list lines.
const BULLET: &str = "- ";

/// Render the summary as the plain-text release report.
pub fn render(summary: &ReleaseSummary) -> String {
    let mut out = String::new();

    // Infallible: writing to a String cannot produce an fmt error.
    let _ = writeln!(
        out,
        "Release {} was on {}\n",
        summary.tag, summary.timestamp
    );
    let _ = writeln!(
        out,
        "A total of {} changes have been committed.\n",
        summary.commit_count
    );

    for subject in &summary.subjects {
        let _ = writeln!(out, "{BULLET}{subject}");
    }

    let _ = writeln!(
        out,
        "\nIt contained the following {} merges:\n",
        summary.merges.len()
    );
    for merge in &summary.merges {
        match merge.pr_reference.as_deref() {
            Some(reference) => {
                let _ = writeln!(out, "{BULLET}{} ({reference})", merge.description);
            }
            None => {
                let _ = writeln!(out, "{BULLET}{}", merge.description);
            }
        }
    }

    let _ = writeln!(
        out,
        "\nMade by the following committers [alphabetical by last name]:\n"
    );
    for author in &summary.authors {
        let _ = writeln!(out, "{BULLET}{author}");
    }

    out
}
