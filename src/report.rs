//! Aggregation of per-PR and per-issue analysis into one dashboard report.
//!
//! Every external query degrades on failure: it is logged and replaced by an
//! empty value, so a report is always produced.

use std::{
    collections::{HashMap, HashSet},
    future::Future,
    time::Duration,
};

use chrono::{DateTime, Utc};
use futures::{StreamExt, stream};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    classify::{ClassifierSet, PrEvidence, ReadinessAnalysis, elapsed_minutes, priority_for_action},
    config::{DashboardConfig, Thresholds},
    error::SourceError,
    types::{
        Action, BranchProgress, Forge, GitStatus, LocalRepo, Mergeable, PrBody, PrRecord,
        PrStatus, Priority,
    },
};

pub const DASHBOARD_TYPE: &str = "process_management";
const PR_NOT_FOUND: &str = "PR not found";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrReport {
    pub pr_number: u64,
    pub title: String,
    pub is_draft: bool,
    pub mergeable: Mergeable,
    pub branch: String,
    pub elapsed_minutes: u64,
    pub latest_commit_msg: String,
    pub pr_status: PrStatus,
    pub action_needed: Action,
    pub priority: Priority,
    pub additions: u64,
    pub deletions: u64,
    pub commit_count: usize,
    pub branch_progress: BranchProgress,
    pub readiness_analysis: Option<ReadinessAnalysis>,
}

/// Placeholder for a PR that was listed as open but could not be loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingPr {
    pub pr_number: u64,
    pub error: String,
    pub action_needed: Action,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PrEntry {
    Analyzed(PrReport),
    Missing(MissingPr),
}

impl PrEntry {
    fn missing(pr_number: u64) -> Self {
        PrEntry::Missing(MissingPr {
            pr_number,
            error: PR_NOT_FOUND.to_string(),
            action_needed: Action::Investigate,
            priority: Priority::High,
        })
    }

    pub fn pr_number(&self) -> u64 {
        match self {
            PrEntry::Analyzed(pr) => pr.pr_number,
            PrEntry::Missing(pr) => pr.pr_number,
        }
    }

    pub fn action(&self) -> Action {
        match self {
            PrEntry::Analyzed(pr) => pr.action_needed,
            PrEntry::Missing(pr) => pr.action_needed,
        }
    }

    pub fn priority(&self) -> Priority {
        match self {
            PrEntry::Analyzed(pr) => pr.priority,
            PrEntry::Missing(pr) => pr.priority,
        }
    }

    pub fn analyzed(&self) -> Option<&PrReport> {
        match self {
            PrEntry::Analyzed(pr) => Some(pr),
            PrEntry::Missing(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IssueProgress {
    pub elapsed_minutes: u64,
    pub commit_count: u64,
    pub latest_commit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueReport {
    pub issue_number: u64,
    pub title: String,
    pub related_pr: Option<u64>,
    pub status: PrStatus,
    pub action: Action,
    pub priority: Priority,
    pub progress: IssueProgress,
    pub message: String,
}

/// Outcome of analysing the work behind one assigned issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueAnalysis {
    pub status: PrStatus,
    pub action: Action,
    pub priority: Priority,
    pub progress: IssueProgress,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub blocked_count: usize,
    pub ready_for_review_count: usize,
    pub needs_investigation_count: usize,
    pub normal_progress_count: usize,
    pub total_prs: usize,
    pub copilot_active_issues: usize,
    pub copilot_blocked_issues: usize,
    pub total_copilot_issues: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendedAction {
    pub priority: Priority,
    pub action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_check_minutes: Option<u64>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub timestamp: String,
    pub dashboard_type: &'static str,
    pub git_status: GitStatus,
    pub prs: Vec<PrEntry>,
    pub copilot_issues: Vec<IssueReport>,
    pub summary: Summary,
    pub recommended_actions: Vec<RecommendedAction>,
}

/// Runs `query` under `timeout`, turning an elapsed deadline into
/// [`SourceError::Timeout`].
async fn bounded<T, Fut>(what: &str, timeout: Duration, query: Fut) -> Result<T, SourceError>
where
    Fut: Future<Output = Result<T, SourceError>>,
{
    tokio::time::timeout(timeout, query)
        .await
        .unwrap_or_else(|_| {
            Err(SourceError::Timeout {
                command: what.to_string(),
                timeout,
            })
        })
}

fn degrade<T>(what: &str, result: Result<T, SourceError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, "Could not fetch {what}");
            None
        }
    }
}

/// Raw answers for one PR.
#[derive(Debug, Default)]
struct PrQueries {
    record: Option<PrRecord>,
    commit_messages: Option<Vec<String>>,
    changed_files: Option<Vec<String>>,
}

/// Runs the queries for one PR one after another, so a fan-out worker never
/// holds more than one forge query open. A PR whose metadata cannot be read
/// becomes a placeholder, so its commits and files are not fetched.
async fn query_pr<F>(forge: &F, number: u64, timeout: Duration) -> PrQueries
where
    F: Forge + Sync,
{
    let record = bounded("pull request", timeout, forge.pull_request(number)).await;
    let Some(record) = degrade(&format!("PR #{number}"), record).flatten() else {
        return PrQueries::default();
    };

    let commits = bounded("commits", timeout, forge.pr_commits(number)).await;
    let files = bounded("changed files", timeout, forge.pr_changed_files(number)).await;

    PrQueries {
        record: Some(record),
        commit_messages: degrade(&format!("commits of PR #{number}"), commits)
            .map(|commits| commits.into_iter().map(|c| c.message_headline).collect()),
        changed_files: degrade(&format!("changed files of PR #{number}"), files),
    }
}

/// Analyses every open PR.
///
/// PRs fan out across `config.max_concurrent` workers, each issuing one forge
/// query at a time, so no more than that many queries are ever in flight.
/// Branch progress is read afterwards one PR at a time, since concurrent
/// `git fetch` runs contend for the same lock. Entries come back in the order
/// the forge listed the PRs; a PR that cannot be loaded becomes a
/// [`MissingPr`] placeholder.
pub async fn collect_pr_entries<F, R>(
    forge: &F,
    repo: &R,
    config: &DashboardConfig,
    classifiers: &ClassifierSet,
    now: DateTime<Utc>,
) -> Vec<PrEntry>
where
    F: Forge + Sync,
    R: LocalRepo + Sync,
{
    let timeout = config.query_timeout();
    let listed = degrade(
        "open pull requests",
        bounded("open pull requests", timeout, forge.open_pr_numbers()).await,
    )
    .unwrap_or_default();

    let mut seen = HashSet::new();
    let numbers: Vec<u64> = listed.into_iter().filter(|n| seen.insert(*n)).collect();
    if numbers.is_empty() {
        return Vec::new();
    }

    let mut answers: HashMap<u64, PrQueries> = stream::iter(numbers.iter().copied())
        .map(|number| async move { (number, query_pr(forge, number, timeout).await) })
        .buffer_unordered(config.concurrency())
        .collect()
        .await;

    let mut entries = Vec::with_capacity(numbers.len());
    for number in numbers {
        let Some(PrQueries {
            record: Some(record),
            commit_messages,
            changed_files,
        }) = answers.remove(&number)
        else {
            entries.push(PrEntry::missing(number));
            continue;
        };

        let branch_progress = repo.branch_progress(&record.head_ref_name).await;
        let evidence = PrEvidence {
            elapsed_minutes: elapsed_minutes(record.created_at.as_deref(), now),
            latest_commit_msg: branch_progress.latest_commit.clone(),
            commit_messages,
            changed_files,
            record,
        };

        let classifier = classifiers.select(&evidence);
        let assessment = classifier.assess(&evidence);
        debug!(
            pr = number,
            classifier = classifier.name(),
            status = %assessment.status,
            action = %assessment.action,
            "Classified pull request"
        );

        let PrEvidence {
            record,
            elapsed_minutes,
            latest_commit_msg,
            commit_messages,
            ..
        } = evidence;

        entries.push(PrEntry::Analyzed(PrReport {
            pr_number: number,
            title: record.title,
            is_draft: record.is_draft,
            mergeable: record.mergeable,
            branch: record.head_ref_name,
            elapsed_minutes,
            latest_commit_msg,
            pr_status: assessment.status,
            action_needed: assessment.action,
            priority: assessment.priority,
            additions: record.additions,
            deletions: record.deletions,
            commit_count: commit_messages.map_or(0, |c| c.len()),
            branch_progress,
            readiness_analysis: assessment.readiness,
        }));
    }

    entries
}

/// Finds the first open PR whose body references `#issue_number` or says
/// `Fixes #issue_number`.
pub fn find_related_pr(bodies: &[PrBody], issue_number: u64) -> Option<u64> {
    let reference = Regex::new(&format!(r"#\s*{issue_number}\b")).ok()?;
    let fixes = Regex::new(&format!(r"(?i)fixes\s+#{issue_number}\b")).ok()?;

    bodies
        .iter()
        .find(|pr| reference.is_match(&pr.body) || fixes.is_match(&pr.body))
        .map(|pr| pr.number)
}

/// Works out how the work on an assigned issue is going from its related
/// PR, if there is one.
pub fn analyze_issue_progress(
    classifiers: &ClassifierSet,
    thresholds: &Thresholds,
    pr: Option<&PrRecord>,
    changed_files: Option<&[String]>,
    branch: &BranchProgress,
    now: DateTime<Utc>,
) -> IssueAnalysis {
    let Some(pr) = pr else {
        return IssueAnalysis {
            status: PrStatus::NoPr,
            action: Action::CheckBranchActivity,
            priority: Priority::Medium,
            progress: IssueProgress::default(),
            message: "No PR found, check if agent is working on feature branch".to_string(),
        };
    };

    let elapsed = elapsed_minutes(pr.created_at.as_deref(), now);
    let progress = IssueProgress {
        elapsed_minutes: elapsed,
        commit_count: branch.commits,
        latest_commit: branch.latest_commit.clone(),
    };

    let lock_only = changed_files.is_some_and(|files| classifiers.readiness.is_lock_only(files));
    if lock_only && elapsed > thresholds.lock_only_grace_minutes {
        return IssueAnalysis {
            status: PrStatus::YarnLockOnly,
            action: Action::Investigate,
            priority: Priority::Medium,
            progress,
            message: "PR contains only yarn.lock changes - may indicate setup phase or blocked work"
                .to_string(),
        };
    }

    let basic = &classifiers.basic;
    let implemented = basic.has_implementation(pr.additions, pr.deletions, changed_files);
    let status = basic.status(&branch.latest_commit, pr.is_draft, implemented);
    let action = basic.action(pr.mergeable, status, elapsed);

    IssueAnalysis {
        status,
        action,
        priority: priority_for_action(action),
        progress,
        message: String::new(),
    }
}

/// Analyses every open issue assigned to `config.assignee`. Issues that
/// cannot be loaded are left out.
pub async fn collect_assigned_issues<F, R>(
    forge: &F,
    repo: &R,
    config: &DashboardConfig,
    classifiers: &ClassifierSet,
    now: DateTime<Utc>,
) -> Vec<IssueReport>
where
    F: Forge + Sync,
    R: LocalRepo + Sync,
{
    let timeout = config.query_timeout();
    let numbers = degrade(
        "assigned issues",
        bounded("assigned issues", timeout, forge.assigned_issues(&config.assignee)).await,
    )
    .unwrap_or_default();
    if numbers.is_empty() {
        return Vec::new();
    }

    let bodies = degrade(
        "open pull request bodies",
        bounded("open pull request bodies", timeout, forge.open_pr_bodies()).await,
    )
    .unwrap_or_default();

    let mut issues = Vec::with_capacity(numbers.len());
    for number in numbers {
        let fetched = bounded("issue", timeout, forge.issue(number)).await;
        let Some(issue) = degrade(&format!("issue #{number}"), fetched).flatten() else {
            debug!(issue = number, "Skipping issue that could not be loaded");
            continue;
        };

        let related_pr = find_related_pr(&bodies, number);
        let pr = match related_pr {
            Some(pr_number) => degrade(
                &format!("PR #{pr_number}"),
                bounded("pull request", timeout, forge.pull_request(pr_number)).await,
            )
            .flatten(),
            None => None,
        };

        let (branch, changed_files) = match &pr {
            Some(pr) => {
                let files = degrade(
                    &format!("changed files of PR #{}", pr.number),
                    bounded("changed files", timeout, forge.pr_changed_files(pr.number)).await,
                );
                (repo.branch_progress(&pr.head_ref_name).await, files)
            }
            None => (BranchProgress::default(), None),
        };

        let analysis = analyze_issue_progress(
            classifiers,
            &config.thresholds,
            pr.as_ref(),
            changed_files.as_deref(),
            &branch,
            now,
        );

        issues.push(IssueReport {
            issue_number: number,
            title: issue.title,
            related_pr,
            status: analysis.status,
            action: analysis.action,
            priority: analysis.priority,
            progress: analysis.progress,
            message: analysis.message,
        });
    }

    issues
}

pub fn summarize(prs: &[PrEntry], issues: &[IssueReport], thresholds: &Thresholds) -> Summary {
    let analyzed = || prs.iter().filter_map(PrEntry::analyzed);

    let blocked_count = analyzed()
        .filter(|pr| pr.mergeable == Mergeable::Conflicting)
        .count();
    let ready_for_review_count = analyzed()
        .filter(|pr| pr.pr_status == PrStatus::ReadyForReview && pr.mergeable == Mergeable::Mergeable)
        .count();
    let needs_investigation_count = analyzed()
        .filter(|pr| pr.elapsed_minutes > thresholds.investigation_minutes)
        .count();

    Summary {
        blocked_count,
        ready_for_review_count,
        needs_investigation_count,
        normal_progress_count: prs
            .len()
            .saturating_sub(blocked_count + ready_for_review_count + needs_investigation_count),
        total_prs: prs.len(),
        copilot_active_issues: issues
            .iter()
            .filter(|i| matches!(i.status, PrStatus::InProgress | PrStatus::Draft))
            .count(),
        copilot_blocked_issues: issues
            .iter()
            .filter(|i| i.action == Action::Investigate)
            .count(),
        total_copilot_issues: issues.len(),
    }
}

pub fn recommend(summary: &Summary, thresholds: &Thresholds) -> Vec<RecommendedAction> {
    let counted = |priority, action, count: usize, message: &str| {
        (count > 0).then(|| RecommendedAction {
            priority,
            action,
            count: Some(count),
            next_check_minutes: None,
            message: message.to_string(),
        })
    };

    let monitor = (summary.total_prs > 0 || summary.total_copilot_issues > 0).then(|| {
        RecommendedAction {
            priority: Priority::Low,
            action: Action::MonitorProgress,
            count: None,
            next_check_minutes: Some(thresholds.next_check_minutes),
            message: "Continue monitoring active work".to_string(),
        }
    });

    [
        counted(
            Priority::High,
            Action::ResolveMergeConflicts,
            summary.blocked_count,
            "Merge conflicts are blocking progress",
        ),
        counted(
            Priority::High,
            Action::Investigate,
            summary.copilot_blocked_issues,
            "GitHub Copilot issues need attention",
        ),
        counted(
            Priority::Medium,
            Action::ReviewReady,
            summary.ready_for_review_count,
            "PRs are ready for review",
        ),
        counted(
            Priority::Medium,
            Action::Investigate,
            summary.needs_investigation_count,
            "Long-running PRs may need attention",
        ),
        monitor,
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Collects everything the dashboard shows, as of `now`.
pub async fn build_report<F, R>(
    forge: &F,
    repo: &R,
    config: &DashboardConfig,
    now: DateTime<Utc>,
) -> Report
where
    F: Forge + Sync,
    R: LocalRepo + Sync,
{
    let classifiers = ClassifierSet::new(
        config.classifier.clone(),
        config.fallback.clone(),
        config.thresholds.clone(),
    );

    let git_status = repo.status().await;
    let prs = collect_pr_entries(forge, repo, config, &classifiers, now).await;
    let copilot_issues = collect_assigned_issues(forge, repo, config, &classifiers, now).await;

    let summary = summarize(&prs, &copilot_issues, &config.thresholds);
    let recommended_actions = recommend(&summary, &config.thresholds);

    Report {
        timestamp: now.to_rfc3339(),
        dashboard_type: DASHBOARD_TYPE,
        git_status,
        prs,
        copilot_issues,
        summary,
        recommended_actions,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    fn body(number: u64, text: &str) -> PrBody {
        PrBody {
            number,
            body: text.to_string(),
        }
    }

    fn analyzed(mergeable: Mergeable, status: PrStatus, elapsed: u64) -> PrEntry {
        PrEntry::Analyzed(PrReport {
            pr_number: 1,
            title: String::new(),
            is_draft: false,
            mergeable,
            branch: String::new(),
            elapsed_minutes: elapsed,
            latest_commit_msg: String::new(),
            pr_status: status,
            action_needed: Action::Wait,
            priority: Priority::Normal,
            additions: 0,
            deletions: 0,
            commit_count: 0,
            branch_progress: BranchProgress::default(),
            readiness_analysis: None,
        })
    }

    fn issue(status: PrStatus, action: Action) -> IssueReport {
        IssueReport {
            issue_number: 9,
            title: String::new(),
            related_pr: None,
            status,
            action,
            priority: priority_for_action(action),
            progress: IssueProgress::default(),
            message: String::new(),
        }
    }

    #[test]
    fn related_pr_matches_hash_reference_on_word_boundary() {
        let bodies = vec![
            body(10, "Relates to #120"),
            body(11, "Part of # 12 cleanup"),
            body(12, "Fixes #12"),
        ];

        assert_eq!(find_related_pr(&bodies, 12), Some(11));
        assert_eq!(find_related_pr(&bodies, 120), Some(10));
        assert_eq!(find_related_pr(&bodies, 1), None);
    }

    #[test]
    fn related_pr_accepts_fixes_in_any_case() {
        let bodies = vec![body(20, "FIXES #7 by adding a parser")];
        assert_eq!(find_related_pr(&bodies, 7), Some(20));
    }

    #[test]
    fn issue_without_pr_asks_for_branch_check() {
        let analysis = analyze_issue_progress(
            &ClassifierSet::default(),
            &Thresholds::default(),
            None,
            None,
            &BranchProgress::default(),
            now(),
        );

        assert_eq!(analysis.status, PrStatus::NoPr);
        assert_eq!(analysis.action, Action::CheckBranchActivity);
        assert_eq!(analysis.priority, Priority::Medium);
        assert!(analysis.message.starts_with("No PR found"));
    }

    #[test]
    fn lock_only_issue_pr_is_flagged_after_grace_period() {
        let pr = PrRecord {
            number: 5,
            created_at: Some("2024-01-15T11:30:00Z".to_string()),
            additions: 3510,
            deletions: 5146,
            ..Default::default()
        };
        let files = vec!["yarn.lock".to_string()];
        let branch = BranchProgress {
            commits: 2,
            latest_commit: "Initial plan".to_string(),
            last_activity: String::new(),
        };

        let analysis = analyze_issue_progress(
            &ClassifierSet::default(),
            &Thresholds::default(),
            Some(&pr),
            Some(files.as_slice()),
            &branch,
            now(),
        );

        assert_eq!(analysis.status, PrStatus::YarnLockOnly);
        assert_eq!(analysis.action, Action::Investigate);
        assert_eq!(analysis.progress.elapsed_minutes, 30);
        assert_eq!(analysis.progress.commit_count, 2);
    }

    #[test]
    fn young_lock_only_issue_pr_uses_basic_classification() {
        let pr = PrRecord {
            number: 5,
            is_draft: true,
            created_at: Some("2024-01-15T11:50:00Z".to_string()),
            additions: 3510,
            deletions: 5146,
            ..Default::default()
        };
        let files = vec!["yarn.lock".to_string()];

        let analysis = analyze_issue_progress(
            &ClassifierSet::default(),
            &Thresholds::default(),
            Some(&pr),
            Some(files.as_slice()),
            &BranchProgress::default(),
            now(),
        );

        assert_eq!(analysis.status, PrStatus::Planning);
        assert_eq!(analysis.action, Action::Wait);
        assert_eq!(analysis.priority, Priority::Normal);
    }

    #[test]
    fn summary_counts_each_bucket() {
        let prs = vec![
            analyzed(Mergeable::Conflicting, PrStatus::InProgress, 10),
            analyzed(Mergeable::Mergeable, PrStatus::ReadyForReview, 5),
            analyzed(Mergeable::Unknown, PrStatus::ReadyForReview, 50),
            analyzed(Mergeable::Mergeable, PrStatus::Draft, 1),
            PrEntry::missing(99),
        ];
        let issues = vec![
            issue(PrStatus::InProgress, Action::Wait),
            issue(PrStatus::Planning, Action::Investigate),
            issue(PrStatus::NoPr, Action::CheckBranchActivity),
        ];

        let summary = summarize(&prs, &issues, &Thresholds::default());
        assert_eq!(
            summary,
            Summary {
                blocked_count: 1,
                ready_for_review_count: 1,
                needs_investigation_count: 1,
                normal_progress_count: 2,
                total_prs: 5,
                copilot_active_issues: 1,
                copilot_blocked_issues: 1,
                total_copilot_issues: 3,
            }
        );
    }

    #[test]
    fn normal_count_never_underflows() {
        let prs = vec![analyzed(Mergeable::Conflicting, PrStatus::InProgress, 100)];
        let summary = summarize(&prs, &[], &Thresholds::default());
        assert_eq!(summary.blocked_count, 1);
        assert_eq!(summary.needs_investigation_count, 1);
        assert_eq!(summary.normal_progress_count, 0);
    }

    #[test]
    fn recommendations_follow_priority_order() {
        let summary = Summary {
            blocked_count: 2,
            ready_for_review_count: 1,
            needs_investigation_count: 3,
            copilot_blocked_issues: 1,
            total_prs: 6,
            total_copilot_issues: 1,
            ..Default::default()
        };

        let actions: Vec<_> = recommend(&summary, &Thresholds::default())
            .into_iter()
            .map(|r| (r.priority, r.action, r.count))
            .collect();

        assert_eq!(
            actions,
            vec![
                (Priority::High, Action::ResolveMergeConflicts, Some(2)),
                (Priority::High, Action::Investigate, Some(1)),
                (Priority::Medium, Action::ReviewReady, Some(1)),
                (Priority::Medium, Action::Investigate, Some(3)),
                (Priority::Low, Action::MonitorProgress, None),
            ]
        );
    }

    #[test]
    fn nothing_to_recommend_for_an_empty_project() {
        assert!(recommend(&Summary::default(), &Thresholds::default()).is_empty());
    }

    #[test]
    fn monitor_recommendation_carries_next_check() {
        let summary = Summary {
            total_prs: 1,
            normal_progress_count: 1,
            ..Default::default()
        };
        let recommended = recommend(&summary, &Thresholds::default());

        assert_eq!(recommended.len(), 1);
        assert_eq!(recommended[0].next_check_minutes, Some(20));
        let json = serde_json::to_value(&recommended[0]).unwrap();
        assert!(json.get("count").is_none());
        assert_eq!(json["action"], "monitor_progress");
    }

    #[test]
    fn missing_pr_serialises_as_placeholder() {
        let json = serde_json::to_value(PrEntry::missing(42)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "pr_number": 42,
                "error": "PR not found",
                "action_needed": "investigate",
                "priority": "high"
            })
        );
    }

    #[tokio::test]
    async fn bounded_query_times_out() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, SourceError>(1)
        };
        let result = bounded("slow query", Duration::from_millis(50), slow).await;
        assert!(matches!(result, Err(SourceError::Timeout { .. })));
    }
}
