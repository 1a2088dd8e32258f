use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SourceError;

// gh reports mergeability as an UPPERCASE string, occasionally null while
// GitHub is still computing it. Anything unrecognised is treated as unknown.
pub fn deserialize_mergeable<'de, D>(deserializer: D) -> std::result::Result<Mergeable, D::Error>
where
    D: Deserializer<'de>,
{
    let s = Option::<String>::deserialize(deserializer)?;
    Ok(s.as_deref().map(Mergeable::parse).unwrap_or_default())
}

// gh emits `null` for empty bodies and titles on some API versions.
pub fn deserialize_null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Source-control mergeability of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mergeable {
    Mergeable,
    Conflicting,
    #[default]
    Unknown,
}

impl Mergeable {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "MERGEABLE" => Mergeable::Mergeable,
            "CONFLICTING" => Mergeable::Conflicting,
            _ => Mergeable::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mergeable::Mergeable => "MERGEABLE",
            Mergeable::Conflicting => "CONFLICTING",
            Mergeable::Unknown => "UNKNOWN",
        }
    }
}

/// What the readiness classifier suggests doing next with a PR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    ResolveConflicts,
    ReviewReady,
    ConvertToReady,
    Wait,
    Investigate,
}

/// How much the classifier trusts its recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    #[default]
    Low,
    Medium,
    High,
}

/// Coarse progress state shown in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrStatus {
    ReadyForReview,
    Draft,
    Planning,
    InProgress,
    Error,
    NoPr,
    YarnLockOnly,
}

/// Every action the dashboard can suggest, per entry or in the summary list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ResolveConflicts,
    ReviewReady,
    ConvertToReady,
    Investigate,
    Wait,
    CheckBranchActivity,
    ResolveMergeConflicts,
    MonitorProgress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Normal,
    Low,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        Action::from(*self).as_str()
    }
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl PrStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrStatus::ReadyForReview => "ready_for_review",
            PrStatus::Draft => "draft",
            PrStatus::Planning => "planning",
            PrStatus::InProgress => "in_progress",
            PrStatus::Error => "error",
            PrStatus::NoPr => "no_pr",
            PrStatus::YarnLockOnly => "yarn_lock_only",
        }
    }
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::ResolveConflicts => "resolve_conflicts",
            Action::ReviewReady => "review_ready",
            Action::ConvertToReady => "convert_to_ready",
            Action::Investigate => "investigate",
            Action::Wait => "wait",
            Action::CheckBranchActivity => "check_branch_activity",
            Action::ResolveMergeConflicts => "resolve_merge_conflicts",
            Action::MonitorProgress => "monitor_progress",
        }
    }
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Normal => "normal",
            Priority::Low => "low",
        }
    }
}

impl From<Recommendation> for Action {
    fn from(recommendation: Recommendation) -> Self {
        match recommendation {
            Recommendation::ResolveConflicts => Action::ResolveConflicts,
            Recommendation::ReviewReady => Action::ReviewReady,
            Recommendation::ConvertToReady => Action::ConvertToReady,
            Recommendation::Wait => Action::Wait,
            Recommendation::Investigate => Action::Investigate,
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),+) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

display_as_str!(Mergeable, Recommendation, Confidence, PrStatus, Action, Priority);

/// Pull request metadata as returned by `gh pr view --json`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrRecord {
    pub number: u64,
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub title: String,
    pub is_draft: bool,
    #[serde(deserialize_with = "deserialize_mergeable")]
    pub mergeable: Mergeable,
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub head_ref_name: String,
    pub created_at: Option<String>,
    pub additions: u64,
    pub deletions: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommitRecord {
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub message_headline: String,
}

/// Number and body of an open PR, used to link issues to PRs.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PrBody {
    pub number: u64,
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Assignee {
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub login: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IssueRecord {
    pub number: u64,
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub title: String,
    pub created_at: Option<String>,
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub assignees: Vec<Assignee>,
}

impl IssueRecord {
    pub fn is_assigned_to(&self, login: &str) -> bool {
        self.assignees.iter().any(|a| a.login == login)
    }
}

/// Progress of a remote feature branch as seen by the local clone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BranchProgress {
    pub commits: u64,
    pub latest_commit: String,
    pub last_activity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GitStatus {
    pub current_branch: String,
    pub last_commit: String,
    pub last_updated: String,
}

/// Read-only queries against the code-hosting project.
///
/// `Ok(None)` means the item does not exist; `Err` means the source could
/// not answer. Callers decide how to degrade.
#[async_trait]
pub trait Forge {
    async fn open_pr_numbers(&self) -> Result<Vec<u64>, SourceError>;

    async fn pull_request(&self, number: u64) -> Result<Option<PrRecord>, SourceError>;

    async fn pr_commits(&self, number: u64) -> Result<Vec<CommitRecord>, SourceError>;

    async fn pr_changed_files(&self, number: u64) -> Result<Vec<String>, SourceError>;

    async fn open_pr_bodies(&self) -> Result<Vec<PrBody>, SourceError>;

    async fn issue(&self, number: u64) -> Result<Option<IssueRecord>, SourceError>;

    /// Open issues with `login` among their assignees.
    async fn assigned_issues(&self, login: &str) -> Result<Vec<u64>, SourceError>;
}

/// The local clone the dashboard runs in.
///
/// Every method is best effort and never fails: missing data comes back as
/// defaults.
#[async_trait]
pub trait LocalRepo {
    /// Fetches all remotes and fast-forwards the current branch.
    async fn sync(&self);

    async fn status(&self) -> GitStatus;

    async fn branch_progress(&self, branch: &str) -> BranchProgress;
}
