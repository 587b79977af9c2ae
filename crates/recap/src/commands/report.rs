//! Report command — thin CLI layer over `recap_core::summary`.

use anyhow::Context;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use recap_core::config::Config;
use recap_core::history::GitHistory;
use recap_core::report;
use recap_core::summary::{SummaryRequest, summarize};

/// Arguments for the report.
#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Tag of the previous release; the recap covers everything after it
    #[arg(value_name = "TAG")]
    pub tag: String,
}

/// Execute the report command.
#[instrument(name = "cmd_report", skip_all, fields(tag = %args.tag))]
pub fn cmd_report(
    args: ReportArgs,
    global_json: bool,
    config: &Config,
    cwd: &camino::Utf8Path,
) -> anyhow::Result<()> {
    debug!("deriving release summary");

    let history = GitHistory::new(cwd);
    let request = SummaryRequest {
        prior_tag: args.tag,
        credential: config.credential.clone(),
    };

    let summary = summarize(&history, &request)
        .with_context(|| format!("failed to summarize changes since {}", request.prior_tag))?;

    if summary.subjects.is_empty() && summary.merges.is_empty() {
        eprintln!(
            "{}",
            "No commits found since the tag; the recap will be empty.".yellow()
        );
    }

    if global_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", report::render(&summary));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_repository_is_an_error_not_a_panic() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cwd = camino::Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        let args = ReportArgs {
            tag: "v1.0.0".into(),
        };

        let result = cmd_report(args, false, &Config::default(), &cwd);
        assert!(result.is_err());
    }
}
