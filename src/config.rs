//! Dashboard configuration.
//!
//! Every value has a built-in default; a TOML file may override any subset
//! of them, and a couple of runtime knobs can also be set through the
//! environment.

use std::{path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const ENV_MAX_CONCURRENT: &str = "PRSTATUS_MAX_CONCURRENT";
pub const ENV_QUERY_TIMEOUT_SECS: &str = "PRSTATUS_QUERY_TIMEOUT_SECS";

const DEFAULT_ASSIGNEE: &str = "Copilot";
const DEFAULT_MAX_CONCURRENT: usize = 5;
const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Login whose assigned issues get their own table.
    pub assignee: String,
    /// Upper bound on forge queries in flight at once.
    pub max_concurrent: usize,
    pub query_timeout_secs: u64,
    pub classifier: ClassifierConfig,
    pub fallback: FallbackConfig,
    pub thresholds: Thresholds,
}

/// Inputs of the readiness classifier. Keywords match case-insensitively.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    pub completion_keywords: Vec<String>,
    pub planning_keywords: Vec<String>,
    /// A PR whose single changed file contains this is a setup-only change.
    pub lock_only_marker: String,
    /// Files that never count as real implementation.
    pub lock_files: Vec<String>,
    /// How many of the most recent commit headlines are scanned.
    pub commit_window: usize,
}

/// Inputs of the basic classifier used when per-file data is unavailable.
/// Markers match case-sensitively against the latest branch commit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FallbackConfig {
    pub completion_markers: Vec<String>,
    pub planning_markers: Vec<String>,
    /// Change volume (additions + deletions) above which a PR has real work.
    pub implementation_threshold: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    pub planning_stale_minutes: u64,
    pub stale_minutes: u64,
    pub investigation_minutes: u64,
    pub lock_only_grace_minutes: u64,
    pub next_check_minutes: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            assignee: DEFAULT_ASSIGNEE.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            query_timeout_secs: DEFAULT_QUERY_TIMEOUT_SECS,
            classifier: ClassifierConfig::default(),
            fallback: FallbackConfig::default(),
            thresholds: Thresholds::default(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            completion_keywords: strings(&[
                "complete",
                "ready for review",
                "implementation complete",
                "final",
                "done",
                "finished",
                "all requirements met",
                "feature complete",
                "implementation done",
            ]),
            planning_keywords: strings(&[
                "initial plan",
                "wip",
                "work in progress",
                "planning",
                "analysis",
                "setup",
                "preparation",
                "initial",
            ]),
            lock_only_marker: "yarn.lock".to_string(),
            lock_files: strings(&["yarn.lock", "package-lock.json"]),
            commit_window: 3,
        }
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            completion_markers: strings(&["Complete", "Ready for review", "Implementation complete"]),
            planning_markers: strings(&["Initial plan", "WIP"]),
            implementation_threshold: 1000,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            planning_stale_minutes: 30,
            stale_minutes: 60,
            investigation_minutes: 45,
            lock_only_grace_minutes: 20,
            next_check_minutes: 20,
        }
    }
}

impl DashboardConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid dashboard configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))
    }

    /// Applies `PRSTATUS_*` overrides; unparseable values are ignored.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(n) = lookup(ENV_MAX_CONCURRENT).and_then(|s| s.trim().parse().ok()) {
            self.max_concurrent = n;
        }
        if let Some(secs) = lookup(ENV_QUERY_TIMEOUT_SECS).and_then(|s| s.trim().parse().ok()) {
            self.query_timeout_secs = secs;
        }
        self
    }

    /// Fan-out width; never below one.
    pub fn concurrency(&self) -> usize {
        self.max_concurrent.max(1)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_documented_keyword_sets() {
        let config = DashboardConfig::default();

        assert_eq!(config.assignee, "Copilot");
        assert_eq!(config.max_concurrent, 5);
        assert_eq!(config.classifier.completion_keywords.len(), 9);
        assert_eq!(config.classifier.planning_keywords.len(), 8);
        assert_eq!(config.classifier.commit_window, 3);
        assert_eq!(config.fallback.implementation_threshold, 1000);
        assert_eq!(config.thresholds.investigation_minutes, 45);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config = DashboardConfig::from_toml_str(
            r#"
            assignee = "renovate"

            [classifier]
            planning_keywords = ["draft", "spike"]

            [thresholds]
            stale_minutes = 120
            "#,
        )
        .unwrap();

        assert_eq!(config.assignee, "renovate");
        assert_eq!(config.classifier.planning_keywords, vec!["draft", "spike"]);
        assert_eq!(config.classifier.completion_keywords.len(), 9);
        assert_eq!(config.thresholds.stale_minutes, 120);
        assert_eq!(config.thresholds.planning_stale_minutes, 30);
        assert_eq!(config.query_timeout_secs, 30);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = DashboardConfig::from_toml_str("colour = true").unwrap_err();
        assert!(err.to_string().contains("Invalid dashboard configuration"));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_concurrent = 8").unwrap();

        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config.max_concurrent, 8);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DashboardConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn overrides_apply_only_parseable_values() {
        let config = DashboardConfig::default().with_overrides(|key| match key {
            ENV_MAX_CONCURRENT => Some("12".to_string()),
            ENV_QUERY_TIMEOUT_SECS => Some("soon".to_string()),
            _ => None,
        });

        assert_eq!(config.max_concurrent, 12);
        assert_eq!(config.query_timeout_secs, 30);
    }

    #[test]
    fn concurrency_and_timeout_have_floors() {
        let config = DashboardConfig {
            max_concurrent: 0,
            query_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.concurrency(), 1);
        assert_eq!(config.query_timeout(), Duration::from_secs(1));
    }
}
