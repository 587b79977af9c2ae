//! Release summary pipeline.
//!
//! A linear, synchronous pass over the record streams of a [`History`]
//! backend: resolve the tag's timestamp, then derive the three report views
//! (commit subjects, parsed merges, sorted contributors). Every stage either
//! fully succeeds or the run aborts; there are no retries or partial states.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::authors;
use crate::history::{History, HistoryError};
use crate::merges::{self, ParsedMerge};

/// Errors from the summary pipeline.
#[derive(Error, Debug)]
pub enum SummaryError {
    /// A history query failed; the summary cannot be derived without it.
    #[error("history query failed: {0}")]
    History(#[from] HistoryError),
}

/// What to summarize, passed explicitly into the pipeline entry point.
#[derive(Debug, Clone, Default)]
pub struct SummaryRequest {
    /// Tag of the previous release; the summary covers everything after it.
    pub prior_tag: String,
    /// Access token for fetchers that talk to a hosted service.
    ///
    /// [`GitHistory`](crate::history::GitHistory) reads the on-disk
    /// repository and ignores it.
    pub credential: Option<String>,
}

/// Everything the report renders, in render order.
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseSummary {
    /// The prior release tag the summary is relative to.
    pub tag: String,
    /// Committer timestamp of that tag.
    pub timestamp: String,
    /// Number of commits between the tag and the current head.
    pub commit_count: u64,
    /// Commit subjects since the tag, oldest first.
    pub subjects: Vec<String>,
    /// Reportable merges since the tag, oldest first.
    pub merges: Vec<ParsedMerge>,
    /// Unique contributors, ordered by family name.
    pub authors: Vec<String>,
}

/// Derive a [`ReleaseSummary`] from history records.
#[instrument(skip(history), fields(tag = %request.prior_tag))]
pub fn summarize<H: History>(
    history: &H,
    request: &SummaryRequest,
) -> Result<ReleaseSummary, SummaryError> {
    let tag = &request.prior_tag;
    let timestamp = history.tag_timestamp(tag)?;

    let merges = merges::parse_merge_log(&history.merge_log_since(&timestamp)?);
    let commit_count = history.commit_count(tag)?;
    let subjects = history.subjects_since(&timestamp)?;
    let authors = authors::dedupe_and_sort(history.authors_since(&timestamp)?);

    debug!(
        commit_count,
        subjects = subjects.len(),
        merges = merges.len(),
        authors = authors.len(),
        "summary derived"
    );

    Ok(ReleaseSummary {
        tag: tag.clone(),
        timestamp,
        commit_count,
        subjects,
        merges,
        authors,
    })
}
