use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::SourceError,
    process::{parse_json, run_captured},
    types::{CommitRecord, Forge, IssueRecord, PrBody, PrRecord},
};

const PR_FIELDS: &str = "number,title,isDraft,mergeable,headRefName,createdAt,additions,deletions";
const ISSUE_FIELDS: &str = "number,title,assignees,createdAt";
const LIST_LIMIT: &str = "200";

#[derive(Debug, Deserialize)]
struct NumberOnly {
    number: u64,
}

#[derive(Debug, Deserialize)]
struct CommitsEnvelope {
    #[serde(default)]
    commits: Vec<CommitRecord>,
}

/// [`Forge`] backed by the `gh` CLI, operating on the repository of the
/// current directory with whatever credentials `gh` is logged in with.
#[derive(Debug, Clone)]
pub struct GitHub {
    timeout: Duration,
}

impl GitHub {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn gh(&self, args: &[&str]) -> Result<String, SourceError> {
        run_captured("gh", args, self.timeout).await
    }

    async fn gh_json<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T, SourceError> {
        let stdout = self.gh(args).await?;
        parse_json(&format!("gh {}", args.join(" ")), &stdout)
    }

    /// Like [`GitHub::gh_json`], but a "not found" answer from gh is `None`.
    async fn gh_json_optional<T: DeserializeOwned>(
        &self,
        args: &[&str],
    ) -> Result<Option<T>, SourceError> {
        match self.gh_json(args).await {
            Ok(value) => Ok(Some(value)),
            Err(SourceError::Failed { stderr, .. }) if is_not_found(&stderr) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn is_not_found(stderr: &str) -> bool {
    let stderr = stderr.to_lowercase();
    stderr.contains("could not resolve to")
        || stderr.contains("no pull requests found")
        || stderr.contains("not found")
}

/// Splits `gh pr diff --name-only` output into paths.
pub fn parse_name_only(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn issues_assigned_to(issues: &[IssueRecord], login: &str) -> Vec<u64> {
    issues
        .iter()
        .filter(|issue| issue.is_assigned_to(login))
        .map(|issue| issue.number)
        .collect()
}

#[async_trait]
impl Forge for GitHub {
    async fn open_pr_numbers(&self) -> Result<Vec<u64>, SourceError> {
        let prs: Vec<NumberOnly> = self
            .gh_json(&["pr", "list", "--state", "open", "--limit", LIST_LIMIT, "--json", "number"])
            .await?;
        Ok(prs.into_iter().map(|pr| pr.number).collect())
    }

    async fn pull_request(&self, number: u64) -> Result<Option<PrRecord>, SourceError> {
        let number = number.to_string();
        self.gh_json_optional(&["pr", "view", &number, "--json", PR_FIELDS])
            .await
    }

    async fn pr_commits(&self, number: u64) -> Result<Vec<CommitRecord>, SourceError> {
        let number = number.to_string();
        let envelope: CommitsEnvelope = self
            .gh_json(&["pr", "view", &number, "--json", "commits"])
            .await?;
        Ok(envelope.commits)
    }

    async fn pr_changed_files(&self, number: u64) -> Result<Vec<String>, SourceError> {
        let number = number.to_string();
        let stdout = self.gh(&["pr", "diff", &number, "--name-only"]).await?;
        Ok(parse_name_only(&stdout))
    }

    async fn open_pr_bodies(&self) -> Result<Vec<PrBody>, SourceError> {
        self.gh_json(&[
            "pr", "list", "--state", "open", "--limit", LIST_LIMIT, "--json", "number,body",
        ])
        .await
    }

    async fn issue(&self, number: u64) -> Result<Option<IssueRecord>, SourceError> {
        let number = number.to_string();
        self.gh_json_optional(&["issue", "view", &number, "--json", ISSUE_FIELDS])
            .await
    }

    async fn assigned_issues(&self, login: &str) -> Result<Vec<u64>, SourceError> {
        let issues: Vec<IssueRecord> = self
            .gh_json(&[
                "issue", "list", "--state", "open", "--limit", LIST_LIMIT, "--json",
                "number,assignees",
            ])
            .await?;
        Ok(issues_assigned_to(&issues, login))
    }
}
