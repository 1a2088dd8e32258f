use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::{
    process::run_captured,
    types::{BranchProgress, GitStatus, LocalRepo},
};

const UNKNOWN: &str = "unknown";

/// [`LocalRepo`] backed by the `git` CLI in the current directory.
#[derive(Debug, Clone)]
pub struct Git {
    timeout: Duration,
}

impl Git {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Trimmed, non-empty stdout of a successful `git` invocation.
    async fn git(&self, args: &[&str]) -> Option<String> {
        match run_captured("git", args, self.timeout).await {
            Ok(out) => Some(out).filter(|s| !s.is_empty()),
            Err(e) => {
                debug!(error = %e, "git query failed");
                None
            }
        }
    }

    async fn git_ok(&self, args: &[&str]) -> bool {
        match run_captured("git", args, self.timeout).await {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "git command failed");
                false
            }
        }
    }
}

/// Option-looking branch names would be parsed as flags by git.
fn usable_branch(branch: &str) -> bool {
    !branch.trim().is_empty() && !branch.starts_with('-')
}

#[async_trait]
impl LocalRepo for Git {
    async fn sync(&self) {
        info!("Updating git state...");

        if !self.git_ok(&["fetch", "--all"]).await {
            warn!("git fetch --all failed");
        }

        if let Some(branch) = self.git(&["branch", "--show-current"]).await
            && !self.git_ok(&["pull", "origin", &branch]).await
        {
            warn!("git pull origin {branch} failed (may be on remote-only branch)");
        }

        info!("Git state updated");
    }

    async fn status(&self) -> GitStatus {
        let current_branch = self.git(&["branch", "--show-current"]).await;
        let last_commit = self.git(&["log", "-1", "--format=%h %s"]).await;

        GitStatus {
            current_branch: current_branch.unwrap_or_else(|| UNKNOWN.to_string()),
            last_commit: last_commit.unwrap_or_else(|| UNKNOWN.to_string()),
            last_updated: Utc::now().to_rfc3339(),
        }
    }

    async fn branch_progress(&self, branch: &str) -> BranchProgress {
        if !usable_branch(branch) {
            return BranchProgress::default();
        }

        if !self.git_ok(&["fetch", "origin", branch]).await {
            debug!(%branch, "Could not refresh remote branch");
        }

        let remote = format!("origin/{branch}");
        let commits = self
            .git(&["rev-list", "--count", &remote])
            .await
            .and_then(|count| count.parse().ok())
            .unwrap_or(0);
        let latest_commit = self
            .git(&["log", &remote, "--format=%s", "-1"])
            .await
            .unwrap_or_default();
        let last_activity = self
            .git(&["log", &remote, "--format=%ai", "-1"])
            .await
            .unwrap_or_default();

        BranchProgress {
            commits,
            latest_commit,
            last_activity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_like_branches_are_rejected() {
        assert!(usable_branch("copilot/fix-12"));
        assert!(!usable_branch(""));
        assert!(!usable_branch("   "));
        assert!(!usable_branch("--upload-pack=evil"));
    }

    #[tokio::test]
    async fn empty_branch_has_no_progress() {
        let git = Git::new(Duration::from_secs(5));
        assert_eq!(git.branch_progress("").await, BranchProgress::default());
    }
}
