//! Core library for recap.
//!
//! This crate derives a release recap — commit subjects, merge summaries,
//! and a contributor roll — from a repository's history since a prior
//! release tag. The `recap` CLI is a thin layer over it.
//!
//! # Modules
//!
//! - [`authors`] - Contributor dedup and family-name ordering
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//! - [`history`] - Version-control history access
//! - [`merges`] - Merge-log parsing
//! - [`report`] - Plain-text report rendering
//! - [`summary`] - The summary pipeline
//!
//! # Quick Start
//!
//! ```no_run
//! use recap_core::history::GitHistory;
//! use recap_core::summary::{SummaryRequest, summarize};
//!
//! let history = GitHistory::new(".");
//! let request = SummaryRequest {
//!     prior_tag: "v1.0.0".into(),
//!     credential: None,
//! };
//! let summary = summarize(&history, &request).expect("history query failed");
//! print!("{}", recap_core::report::render(&summary));
//! ```
#![deny(unsafe_code)]

pub mod authors;

pub mod config;

pub mod error;

pub mod history;

pub mod merges;

pub mod report;

pub mod summary;

pub use config::{Config, ConfigLoader, LogLevel};

pub use error::{ConfigError, ConfigResult};
