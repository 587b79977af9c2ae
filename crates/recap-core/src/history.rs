//! Version-control history access for recap workflows.
//!
//! Shells out to `git` for all queries. This ensures we inherit the user's
//! mailmap, replace refs, and other repository configuration.

use std::process::Command;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};

/// Marker prepended to every merge body in the raw merge log.
///
/// Chosen because it cannot start a legitimate commit subject produced by
/// `git log --format`, so splitting on it recovers record boundaries.
pub const RECORD_MARKER: &str = ">>>";

/// Errors from history queries.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// Failed to execute the `git` command.
    #[error("failed to run git: {0}")]
    Exec(#[from] std::io::Error),

    /// `git` returned a non-zero exit code.
    #[error("git {command} failed: {stderr}")]
    Command {
        /// The git subcommand that failed (e.g., "log").
        command: String,
        /// Captured stderr.
        stderr: String,
    },

    /// Not inside a git repository.
    #[error("not a git repository (or any parent up to mount point)")]
    NotARepo,

    /// The requested tag produced no history data.
    #[error("tag {0:?} not found in repository history")]
    UnknownTag(String),

    /// Output that should have been a decimal count was not.
    #[error("unexpected git output: {0:?} is not a commit count")]
    BadCount(String),
}

/// Result alias for history queries.
pub type HistoryResult<T> = Result<T, HistoryError>;

/// The record streams a release recap is derived from.
///
/// One implementation per history backend. [`GitHistory`] reads the local
/// repository; tests substitute an in-memory fake.
pub trait History {
    /// Committer timestamp of the given tag (ISO-like date text).
    fn tag_timestamp(&self, tag: &str) -> HistoryResult<String>;

    /// Raw merge-commit bodies since the timestamp, each prefixed with
    /// [`RECORD_MARKER`], oldest first.
    fn merge_log_since(&self, timestamp: &str) -> HistoryResult<String>;

    /// Number of commits between the tag and the current head.
    fn commit_count(&self, tag: &str) -> HistoryResult<u64>;

    /// Commit subject lines since the timestamp, oldest first.
    fn subjects_since(&self, timestamp: &str) -> HistoryResult<Vec<String>>;

    /// Author names of commits since the timestamp, oldest first.
    fn authors_since(&self, timestamp: &str) -> HistoryResult<Vec<String>>;
}

/// History backed by the `git` binary, run inside a repository root.
#[derive(Debug, Clone)]
pub struct GitHistory {
    root: Utf8PathBuf,
}

impl GitHistory {
    /// Create a fetcher that runs `git` in the given repository root.
    pub fn new<P: AsRef<Utf8Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Run a git command in the repository root and return its stdout.
    fn git(&self, args: &[&str]) -> HistoryResult<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.root.as_std_path())
            .output()?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

            // Detect "not a git repo" specifically
            if stderr.contains("not a git repository") {
                return Err(HistoryError::NotARepo);
            }

            Err(HistoryError::Command {
                command: args.first().unwrap_or(&"").to_string(),
                stderr,
            })
        }
    }

    /// Run a git command and keep only non-empty output lines.
    fn git_lines(&self, args: &[&str]) -> HistoryResult<Vec<String>> {
        let output = self.git(args)?;
        Ok(output
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

impl History for GitHistory {
    #[instrument(skip(self))]
    fn tag_timestamp(&self, tag: &str) -> HistoryResult<String> {
        let output = self.git(&["log", "-n1", "--format=%ci", tag])?;
        let timestamp = output.lines().next().unwrap_or("").trim().to_string();
        if timestamp.is_empty() {
            return Err(HistoryError::UnknownTag(tag.to_string()));
        }
        debug!(%timestamp, "resolved tag timestamp");
        Ok(timestamp)
    }

    #[instrument(skip(self))]
    fn merge_log_since(&self, timestamp: &str) -> HistoryResult<String> {
        let since = format!("--since={timestamp}");
        let format = format!("--format={RECORD_MARKER}%B");
        let log = self.git(&["log", &since, "--merges", &format, "--reverse"])?;
        debug!(bytes = log.len(), "fetched merge log");
        Ok(log)
    }

    #[instrument(skip(self))]
    fn commit_count(&self, tag: &str) -> HistoryResult<u64> {
        let range = format!("{tag}..HEAD");
        let output = self.git(&["rev-list", &range, "--count"])?;
        let raw = output.trim();
        let count = raw
            .parse()
            .map_err(|_| HistoryError::BadCount(raw.to_string()))?;
        debug!(count, "counted commits since tag");
        Ok(count)
    }

    #[instrument(skip(self))]
    fn subjects_since(&self, timestamp: &str) -> HistoryResult<Vec<String>> {
        let since = format!("--since={timestamp}");
        let subjects = self.git_lines(&["log", &since, "--pretty=%s", "--reverse"])?;
        debug!(count = subjects.len(), "fetched commit subjects");
        Ok(subjects)
    }

    #[instrument(skip(self))]
    fn authors_since(&self, timestamp: &str) -> HistoryResult<Vec<String>> {
        let since = format!("--since={timestamp}");
        let authors = self.git_lines(&["log", &since, "--format=%aN", "--reverse"])?;
        debug!(count = authors.len(), "fetched commit authors");
        Ok(authors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;
    use tempfile::TempDir;

    // These tests build a scratch repository with the real git binary. When
    // git is unavailable in the environment, they skip rather than fail.

    fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .is_ok_and(|out| out.status.success())
    }

    /// Run git in `dir` with a fixed identity and deterministic dates.
    fn run_git(dir: &std::path::Path, date: &str, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(dir)
            .env("GIT_AUTHOR_NAME", "Ada Lovelace")
            .env("GIT_AUTHOR_EMAIL", "ada@example.org")
            .env("GIT_COMMITTER_NAME", "Ada Lovelace")
            .env("GIT_COMMITTER_EMAIL", "ada@example.org")
            .env("GIT_AUTHOR_DATE", date)
            .env("GIT_COMMITTER_DATE", date)
            .status()
            .expect("git should run");
        assert!(status.success(), "git {args:?} failed");
    }

    /// Scratch repo: one tagged commit, one later commit, one no-ff merge.
    fn scratch_repo() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();

        run_git(dir, "2024-03-01T10:00:00+00:00", &["init", "-q", "-b", "main"]);
        run_git(
            dir,
            "2024-03-01T10:00:00+00:00",
            &["commit", "-q", "--allow-empty", "-m", "initial import"],
        );
        run_git(dir, "2024-03-01T10:00:00+00:00", &["tag", "v0.1.0"]);

        run_git(
            dir,
            "2024-03-02T10:00:00+00:00",
            &["commit", "-q", "--allow-empty", "-m", "teach the parser new tricks"],
        );

        run_git(dir, "2024-03-03T10:00:00+00:00", &["switch", "-q", "-c", "topic"]);
        run_git(
            dir,
            "2024-03-03T10:00:00+00:00",
            &["commit", "-q", "--allow-empty", "-m", "add topic work"],
        );
        run_git(dir, "2024-03-03T10:00:00+00:00", &["switch", "-q", "main"]);
        run_git(
            dir,
            "2024-03-04T10:00:00+00:00",
            &[
                "merge",
                "-q",
                "--no-ff",
                "topic",
                "-m",
                "Merge pull request #7 from ada/topic\n\nTeach the parser new tricks",
            ],
        );

        tmp
    }

    fn history_for(tmp: &TempDir) -> GitHistory {
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        GitHistory::new(root)
    }

    #[test]
    fn tag_timestamp_resolves() {
        if !git_available() {
            return;
        }
        let tmp = scratch_repo();
        let history = history_for(&tmp);

        let ts = history.tag_timestamp("v0.1.0").unwrap();
        assert!(ts.starts_with("2024-03-01"), "unexpected timestamp {ts}");
    }

    #[test]
    fn unknown_tag_is_an_error() {
        if !git_available() {
            return;
        }
        let tmp = scratch_repo();
        let history = history_for(&tmp);

        let err = history.tag_timestamp("v9.9.9").unwrap_err();
        assert!(matches!(
            err,
            HistoryError::UnknownTag(_) | HistoryError::Command { .. }
        ));
    }

    #[test]
    fn commit_count_covers_tag_to_head() {
        if !git_available() {
            return;
        }
        let tmp = scratch_repo();
        let history = history_for(&tmp);

        // one direct commit + one topic commit + the merge commit
        assert_eq!(history.commit_count("v0.1.0").unwrap(), 3);
    }

    #[test]
    fn subjects_are_oldest_first() {
        if !git_available() {
            return;
        }
        let tmp = scratch_repo();
        let history = history_for(&tmp);
        let ts = history.tag_timestamp("v0.1.0").unwrap();

        let subjects = history.subjects_since(&ts).unwrap();
        let parser = subjects
            .iter()
            .position(|s| s == "teach the parser new tricks")
            .expect("direct commit present");
        let merge = subjects
            .iter()
            .position(|s| s.starts_with("Merge pull request #7"))
            .expect("merge commit present");
        assert!(parser < merge, "expected chronological order");
    }

    #[test]
    fn merge_log_is_marked_and_has_body() {
        if !git_available() {
            return;
        }
        let tmp = scratch_repo();
        let history = history_for(&tmp);
        let ts = history.tag_timestamp("v0.1.0").unwrap();

        let log = history.merge_log_since(&ts).unwrap();
        assert!(log.contains(&format!("{RECORD_MARKER}Merge pull request #7")));
        assert!(log.contains("Teach the parser new tricks"));
    }

    #[test]
    fn authors_come_from_commit_metadata() {
        if !git_available() {
            return;
        }
        let tmp = scratch_repo();
        let history = history_for(&tmp);
        let ts = history.tag_timestamp("v0.1.0").unwrap();

        let authors = history.authors_since(&ts).unwrap();
        assert!(!authors.is_empty());
        assert!(authors.iter().all(|a| a == "Ada Lovelace"));
    }

    #[test]
    fn missing_repo_is_detected() {
        if !git_available() {
            return;
        }
        let tmp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        let history = GitHistory::new(root);

        let err = history.tag_timestamp("v0.1.0").unwrap_err();
        assert!(matches!(err, HistoryError::NotARepo));
    }
}
