//! prstatus: status dashboard for open pull requests and agent-assigned
//! issues.
//!
//! Gathers PR metadata, commits and changed files through a [`Forge`],
//! branch activity through a [`LocalRepo`], classifies each PR's readiness
//! and aggregates everything into a [`Report`] that can be printed as JSON
//! or rendered as a terminal dashboard.

pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod github;
pub mod process;
pub mod report;
pub mod types;

pub use classify::{
    Assessment, BasicClassifier, ClassifierSet, PrClassifier, PrEvidence, PullRequestSignal,
    ReadinessAnalysis, ReadinessClassifier, ReadinessVerdict, classify, elapsed_minutes,
};
pub use cli::{DashboardRequest, OutputMode, parse_args};
pub use config::DashboardConfig;
pub use error::SourceError;
pub use git::Git;
pub use github::GitHub;
pub use report::{
    IssueReport, PrEntry, PrReport, RecommendedAction, Report, Summary, build_report,
};
pub use types::{
    Action, BranchProgress, CommitRecord, Confidence, Forge, GitStatus, IssueRecord, LocalRepo,
    Mergeable, PrBody, PrRecord, PrStatus, Priority, Recommendation,
};
