use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::Config;
use crate::models::{ResultNode, Status};
use crate::prefs::{FileStore, PreferenceStore, toggle};
use crate::render::render;
use crate::sorter::{SortKey, TreeSorter};

#[derive(Debug, PartialEq, Parser)]
#[command(name = "report-tree")]
#[command(about = "Filter and sort a test report tree", long_about = None)]
#[command(version)]
pub struct Args {
    /// Report tree JSON file
    pub report: PathBuf,

    /// Statuses to show, comma separated
    #[arg(long = "status", value_delimiter = ',')]
    pub statuses: Option<Vec<Status>>,

    /// Shortest test to show, in milliseconds
    #[arg(long = "min")]
    pub min_duration: Option<u64>,

    /// Longest test to show, in milliseconds
    #[arg(long = "max")]
    pub max_duration: Option<u64>,

    /// Case-sensitive name search
    #[arg(long)]
    pub text: Option<String>,

    /// Sorter to select (toggles direction when already active)
    #[arg(long, value_name = "name|duration|status")]
    pub sort: Option<SortKey>,

    /// Context the sort preference is stored under
    #[arg(long)]
    pub key: Option<String>,
}

pub fn load_report(path: &Path) -> Result<ResultNode> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// Load, filter, and sort the report, returning the text listing.
pub fn run(args: &Args, workspace: &Path) -> Result<String> {
    let config = Config::load(workspace);
    let order = config.status_order()?;

    let mut criteria = config.filter_criteria();
    if let Some(statuses) = &args.statuses {
        criteria = criteria.with_statuses(statuses.iter().copied());
    }
    if args.min_duration.is_some() || args.max_duration.is_some() {
        let min = args.min_duration.unwrap_or(criteria.min_duration);
        let max = args.max_duration.unwrap_or(criteria.max_duration);
        criteria = criteria.with_duration(min, max);
    }
    if let Some(text) = &args.text {
        criteria = criteria.with_text(text.clone());
    }

    let report = load_report(&args.report)?;
    let filtered = criteria.apply(&report);

    let key = args
        .key
        .as_deref()
        .unwrap_or_else(|| config.preferences_key())
        .to_string();
    let mut store = FileStore::new(config.preferences_path(workspace));
    let preference = match args.sort {
        Some(target) => toggle(&mut store, &key, target)?,
        None => store.get(&key),
    };

    let Some(mut tree) = filtered else {
        return Ok(String::new());
    };

    let sorter = TreeSorter::new(order);
    sorter.comparator(preference).sort_tree(&mut tree);
    tracing::debug!(
        key = %key,
        sorter = %preference.sorter,
        ascending = preference.ascending,
        "sorted report tree"
    );

    Ok(render(&tree, sorter.order()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("report-tree").chain(list.iter().copied()))
    }

    #[test]
    fn parses_every_flag() {
        let parsed = args(&[
            "report.json",
            "--status",
            "failed,broken",
            "--min",
            "10",
            "--max",
            "20",
            "--text",
            "login",
            "--sort",
            "duration",
            "--key",
            "suites",
        ])
        .unwrap();
        assert_eq!(parsed.report, PathBuf::from("report.json"));
        assert_eq!(parsed.statuses, Some(vec![Status::Failed, Status::Broken]));
        assert_eq!(parsed.min_duration, Some(10));
        assert_eq!(parsed.max_duration, Some(20));
        assert_eq!(parsed.text.as_deref(), Some("login"));
        assert_eq!(parsed.sort, Some(SortKey::Duration));
        assert_eq!(parsed.key.as_deref(), Some("suites"));
    }

    #[test]
    fn accepts_equals_form() {
        let parsed = args(&["r.json", "--min=40", "--status=passed", "--sort=status"]).unwrap();
        assert_eq!(parsed.min_duration, Some(40));
        assert_eq!(parsed.statuses, Some(vec![Status::Passed]));
        assert_eq!(parsed.sort, Some(SortKey::Status));
    }

    #[test]
    fn help_is_available() {
        let err = args(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn requires_report_path() {
        assert!(args(&["--text", "x"]).is_err());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(args(&["r.json", "--min", "soon"]).is_err());
        assert!(args(&["r.json", "--sort", "size"]).is_err());
        assert!(args(&["r.json", "--status", "flaky"]).is_err());
        assert!(args(&["r.json", "--max"]).is_err());
        assert!(args(&["r.json", "--verbose"]).is_err());
        assert!(args(&["a.json", "b.json"]).is_err());
    }
}
