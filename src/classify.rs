//! PR readiness classification.
//!
//! [`ReadinessClassifier`] is the primary classifier: a pure, ordered rule
//! chain over draft state, mergeability, recent commit headlines and the
//! changed-file list. [`BasicClassifier`] is the degraded path used when the
//! commit or file data could not be fetched; it works from diff volume, the
//! latest branch commit and PR age. Both sit behind [`PrClassifier`] and
//! [`ClassifierSet::select`] picks one per PR by data availability.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    config::{ClassifierConfig, FallbackConfig, Thresholds},
    types::{Action, Confidence, Mergeable, PrRecord, PrStatus, Priority, Recommendation},
};

/// Raw signals the readiness classifier consumes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PullRequestSignal {
    pub is_draft: bool,
    pub mergeable: Mergeable,
    pub created_at: Option<String>,
    pub additions: u64,
    pub deletions: u64,
    pub changed_files: Vec<String>,
    /// Oldest first.
    pub recent_commit_messages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadinessVerdict {
    #[serde(rename = "ready")]
    pub ready_for_review: bool,
    pub recommendation: Recommendation,
    pub confidence: Confidence,
    pub reasons: Vec<String>,
}

impl ReadinessVerdict {
    fn new(recommendation: Recommendation) -> Self {
        Self {
            ready_for_review: false,
            recommendation,
            confidence: Confidence::default(),
            reasons: Vec::new(),
        }
    }

    fn ready(mut self) -> Self {
        self.ready_for_review = true;
        self
    }

    fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    fn because(mut self, reason: &str) -> Self {
        self.reasons.push(reason.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileAnalysis {
    pub files_changed: usize,
    pub has_real_implementation: bool,
    pub yarn_lock_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitAnalysis {
    pub has_completion_indicators: bool,
    pub has_planning_indicators: bool,
    /// The headlines that were scanned, oldest first.
    pub latest_messages: Vec<String>,
}

/// A verdict together with the facts it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadinessAnalysis {
    #[serde(flatten)]
    pub verdict: ReadinessVerdict,
    pub file_analysis: FileAnalysis,
    pub commit_analysis: CommitAnalysis,
}

/// Everything gathered about one PR before classification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrEvidence {
    pub record: PrRecord,
    pub elapsed_minutes: u64,
    /// Headline of the newest commit on the remote branch.
    pub latest_commit_msg: String,
    /// `None` when the commit list could not be fetched.
    pub commit_messages: Option<Vec<String>>,
    /// `None` when the changed-file list could not be fetched.
    pub changed_files: Option<Vec<String>>,
}

impl PrEvidence {
    pub fn has_readiness_data(&self) -> bool {
        self.commit_messages.is_some() && self.changed_files.is_some()
    }

    pub fn signal(&self) -> PullRequestSignal {
        PullRequestSignal {
            is_draft: self.record.is_draft,
            mergeable: self.record.mergeable,
            created_at: self.record.created_at.clone(),
            additions: self.record.additions,
            deletions: self.record.deletions,
            changed_files: self.changed_files.clone().unwrap_or_default(),
            recent_commit_messages: self.commit_messages.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub status: PrStatus,
    pub action: Action,
    pub priority: Priority,
    pub readiness: Option<ReadinessAnalysis>,
}

/// Maps the evidence for one PR to a dashboard status, action and priority.
pub trait PrClassifier: Send + Sync {
    fn name(&self) -> &'static str;

    fn assess(&self, evidence: &PrEvidence) -> Assessment;
}

/// Whole minutes since `created_at`; zero when it is missing, unparseable
/// or in the future.
pub fn elapsed_minutes(created_at: Option<&str>, now: DateTime<Utc>) -> u64 {
    created_at
        .and_then(|ts| DateTime::parse_from_rfc3339(ts.trim()).ok())
        .map(|created| (now - created.with_timezone(&Utc)).num_minutes())
        .and_then(|minutes| u64::try_from(minutes).ok())
        .unwrap_or(0)
}

pub fn priority_for_action(action: Action) -> Priority {
    match action {
        Action::ResolveConflicts | Action::ResolveMergeConflicts => Priority::High,
        Action::ReviewReady | Action::Investigate => Priority::Medium,
        _ => Priority::Normal,
    }
}

fn contains_any_ignore_case(haystack: &str, needles: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    needles
        .iter()
        .any(|needle| haystack.contains(&needle.to_lowercase()))
}

#[derive(Debug, Clone, Default)]
pub struct ReadinessClassifier {
    config: ClassifierConfig,
}

impl ReadinessClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn is_lock_only(&self, files: &[String]) -> bool {
        matches!(files, [only] if only.contains(&self.config.lock_only_marker))
    }

    pub fn analyze_files(&self, files: &[String]) -> FileAnalysis {
        let has_real_implementation = files.len() > 1
            && files
                .iter()
                .any(|f| !self.config.lock_files.iter().any(|lock| f.contains(lock)));

        FileAnalysis {
            files_changed: files.len(),
            has_real_implementation,
            yarn_lock_only: self.is_lock_only(files),
        }
    }

    pub fn analyze_commits(&self, messages: &[String]) -> CommitAnalysis {
        let window = &messages[messages.len().saturating_sub(self.config.commit_window)..];

        CommitAnalysis {
            has_completion_indicators: window
                .iter()
                .any(|m| contains_any_ignore_case(m, &self.config.completion_keywords)),
            has_planning_indicators: window
                .iter()
                .any(|m| contains_any_ignore_case(m, &self.config.planning_keywords)),
            latest_messages: window.to_vec(),
        }
    }

    pub fn analyze(&self, signal: &PullRequestSignal) -> ReadinessAnalysis {
        let file_analysis = self.analyze_files(&signal.changed_files);
        let commit_analysis = self.analyze_commits(&signal.recent_commit_messages);
        let verdict = decide(signal, &file_analysis, &commit_analysis);

        ReadinessAnalysis {
            verdict,
            file_analysis,
            commit_analysis,
        }
    }

    pub fn classify(&self, signal: &PullRequestSignal) -> ReadinessVerdict {
        self.analyze(signal).verdict
    }
}

/// Classifies `signal` with the built-in keyword sets.
pub fn classify(signal: &PullRequestSignal) -> ReadinessVerdict {
    ReadinessClassifier::default().classify(signal)
}

// First matching rule wins.
fn decide(
    signal: &PullRequestSignal,
    files: &FileAnalysis,
    commits: &CommitAnalysis,
) -> ReadinessVerdict {
    let draft = signal.is_draft;

    if signal.mergeable == Mergeable::Conflicting {
        ReadinessVerdict::new(Recommendation::ResolveConflicts).because("Has merge conflicts")
    } else if files.yarn_lock_only {
        ReadinessVerdict::new(Recommendation::Wait)
            .because("Only yarn.lock changes - likely setup phase")
    } else if commits.has_completion_indicators && !draft {
        ReadinessVerdict::new(Recommendation::ReviewReady)
            .ready()
            .with_confidence(Confidence::High)
            .because("Has completion indicators in commits")
    } else if files.has_real_implementation && !draft {
        ReadinessVerdict::new(Recommendation::ReviewReady)
            .ready()
            .with_confidence(Confidence::Medium)
            .because("Has substantial implementation")
    } else if draft && commits.has_completion_indicators {
        ReadinessVerdict::new(Recommendation::ConvertToReady)
            .with_confidence(Confidence::High)
            .because("Claims completion but still marked as draft")
    } else if commits.has_planning_indicators {
        ReadinessVerdict::new(Recommendation::Wait).because("Still in planning/setup phase")
    } else {
        ReadinessVerdict::new(Recommendation::Investigate)
            .with_confidence(Confidence::Low)
            .because("Unclear status - needs manual review")
    }
}

impl PrClassifier for ReadinessClassifier {
    fn name(&self) -> &'static str {
        "readiness"
    }

    fn assess(&self, evidence: &PrEvidence) -> Assessment {
        let analysis = self.analyze(&evidence.signal());
        let verdict = &analysis.verdict;

        let status = if verdict.ready_for_review {
            PrStatus::ReadyForReview
        } else if evidence.record.is_draft {
            PrStatus::Draft
        } else {
            PrStatus::InProgress
        };
        let priority = match verdict.recommendation {
            Recommendation::ResolveConflicts | Recommendation::ConvertToReady => Priority::High,
            Recommendation::ReviewReady => Priority::Medium,
            Recommendation::Wait | Recommendation::Investigate => Priority::Normal,
        };

        Assessment {
            status,
            action: verdict.recommendation.into(),
            priority,
            readiness: Some(analysis),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BasicClassifier {
    fallback: FallbackConfig,
    thresholds: Thresholds,
    files: ReadinessClassifier,
}

impl BasicClassifier {
    pub fn new(classifier: ClassifierConfig, fallback: FallbackConfig, thresholds: Thresholds) -> Self {
        Self {
            fallback,
            thresholds,
            files: ReadinessClassifier::new(classifier),
        }
    }

    /// Change volume counts as implementation unless the file list is known
    /// and consists of a lone lock file.
    pub fn has_implementation(
        &self,
        additions: u64,
        deletions: u64,
        changed_files: Option<&[String]>,
    ) -> bool {
        let lock_only = changed_files.is_some_and(|files| self.files.is_lock_only(files));
        !lock_only && additions.saturating_add(deletions) > self.fallback.implementation_threshold
    }

    pub fn status(
        &self,
        latest_commit_msg: &str,
        is_draft: bool,
        has_implementation: bool,
    ) -> PrStatus {
        let mentions = |markers: &[String]| markers.iter().any(|m| latest_commit_msg.contains(m.as_str()));

        if mentions(self.fallback.completion_markers.as_slice()) && !is_draft {
            PrStatus::ReadyForReview
        } else if is_draft && !has_implementation {
            PrStatus::Planning
        } else if is_draft {
            PrStatus::Draft
        } else if mentions(self.fallback.planning_markers.as_slice()) {
            PrStatus::Planning
        } else if has_implementation {
            PrStatus::InProgress
        } else {
            PrStatus::Planning
        }
    }

    pub fn action(&self, mergeable: Mergeable, status: PrStatus, elapsed_minutes: u64) -> Action {
        if mergeable == Mergeable::Conflicting {
            Action::ResolveConflicts
        } else if status == PrStatus::ReadyForReview && mergeable == Mergeable::Mergeable {
            Action::ReviewReady
        } else if status == PrStatus::Planning
            && elapsed_minutes > self.thresholds.planning_stale_minutes
        {
            Action::Investigate
        } else if elapsed_minutes > self.thresholds.stale_minutes {
            Action::Investigate
        } else {
            Action::Wait
        }
    }
}

impl PrClassifier for BasicClassifier {
    fn name(&self) -> &'static str {
        "basic"
    }

    fn assess(&self, evidence: &PrEvidence) -> Assessment {
        let record = &evidence.record;
        let implemented = self.has_implementation(
            record.additions,
            record.deletions,
            evidence.changed_files.as_deref(),
        );
        let status = self.status(&evidence.latest_commit_msg, record.is_draft, implemented);
        let action = self.action(record.mergeable, status, evidence.elapsed_minutes);

        Assessment {
            status,
            action,
            priority: priority_for_action(action),
            readiness: None,
        }
    }
}

/// Both classifiers, configured once per run.
#[derive(Debug, Clone, Default)]
pub struct ClassifierSet {
    pub readiness: ReadinessClassifier,
    pub basic: BasicClassifier,
}

impl ClassifierSet {
    pub fn new(classifier: ClassifierConfig, fallback: FallbackConfig, thresholds: Thresholds) -> Self {
        Self {
            readiness: ReadinessClassifier::new(classifier.clone()),
            basic: BasicClassifier::new(classifier, fallback, thresholds),
        }
    }

    pub fn select(&self, evidence: &PrEvidence) -> &dyn PrClassifier {
        if evidence.has_readiness_data() {
            &self.readiness
        } else {
            &self.basic
        }
    }

    pub fn assess(&self, evidence: &PrEvidence) -> Assessment {
        self.select(evidence).assess(evidence)
    }
}
