use std::io::{self, IsTerminal, Write};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_humanize::HumanTime;
use owo_colors::{OwoColorize, Style};
use prstatus::{
    Action, IssueReport, PrEntry, PrReport, PrStatus, Priority, ReadinessAnalysis,
    RecommendedAction, Report, Summary,
};

const COLUMN_SEPARATOR: &str = " ";
const TRUNCATION_SUFFIX: &str = "...";
const DEFAULT_TITLE_WIDTH: usize = 35;
const MIN_TITLE_WIDTH: usize = 12;
const MAX_TITLE_WIDTH: usize = 60;
const ISSUE_TITLE_WIDTH: usize = 40;
const DETAIL_TITLE_WIDTH: usize = 50;
const COMMIT_WIDTH: usize = 60;
const RECENT_COMMITS_SHOWN: usize = 2;

/// Widths of every PR table column except the title, icons included.
const PR_FIXED_WIDTHS: &[usize] = &[5, 18, 20, 10, 10, 15];

/// Colours and icons used by the dashboard.
///
/// The plain palette keeps the icons but emits no escape sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    colored: bool,
}

impl Palette {
    pub const fn ansi() -> Self {
        Self { colored: true }
    }

    pub const fn plain() -> Self {
        Self { colored: false }
    }

    /// Colours only when stdout is a terminal and neither `--no-color` nor
    /// `NO_COLOR` asks otherwise.
    pub fn detect(no_color: bool) -> Self {
        let no_color_env = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        if no_color || no_color_env || !io::stdout().is_terminal() {
            Self::plain()
        } else {
            Self::ansi()
        }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.colored {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(text, Style::new().bold())
    }

    fn heading(&self, text: &str) -> String {
        self.paint(text, Style::new().cyan())
    }

    fn dim(&self, text: &str) -> String {
        self.paint(text, Style::new().dimmed())
    }

    fn status(&self, status: PrStatus, padded: &str) -> String {
        let style = match status {
            PrStatus::ReadyForReview => Style::new().green(),
            PrStatus::Draft | PrStatus::Planning => Style::new().yellow(),
            PrStatus::InProgress => Style::new().cyan(),
            PrStatus::Error | PrStatus::YarnLockOnly => Style::new().red(),
            PrStatus::NoPr => Style::new().blue(),
        };
        self.paint(padded, style)
    }

    fn action(&self, action: Action, padded: &str) -> String {
        let style = match action {
            Action::ResolveConflicts | Action::ResolveMergeConflicts => Style::new().red(),
            Action::ReviewReady | Action::ConvertToReady => Style::new().green(),
            Action::Investigate => Style::new().yellow(),
            Action::Wait | Action::CheckBranchActivity => Style::new().cyan(),
            Action::MonitorProgress => Style::new().blue(),
        };
        self.paint(padded, style)
    }

    fn status_icon(&self, status: PrStatus) -> &'static str {
        match status {
            PrStatus::ReadyForReview => "✅",
            PrStatus::Draft => "📝",
            PrStatus::Planning => "🧠",
            PrStatus::InProgress => "🚧",
            PrStatus::Error => "❌",
            PrStatus::NoPr => "🔍",
            PrStatus::YarnLockOnly => "📦",
        }
    }

    fn action_icon(&self, action: Action) -> String {
        let (icon, style) = match action {
            Action::ResolveConflicts | Action::ResolveMergeConflicts => ("⚡", Style::new().red()),
            Action::ReviewReady => ("👀", Style::new().green()),
            Action::ConvertToReady => ("🚀", Style::new().green()),
            Action::Investigate => ("🔍", Style::new().yellow()),
            Action::Wait => ("⏳", Style::new().cyan()),
            Action::CheckBranchActivity => ("🌿", Style::new().blue()),
            Action::MonitorProgress => ("📊", Style::new().blue()),
        };
        self.paint(icon, style)
    }

    fn priority_icon(&self, priority: Priority) -> String {
        let (icon, style) = match priority {
            Priority::High => ("🔴", Style::new().red()),
            Priority::Medium => ("🟡", Style::new().yellow()),
            Priority::Normal => ("🟢", Style::new().green()),
            Priority::Low => ("🔵", Style::new().blue()),
        };
        self.paint(icon, style)
    }
}

/// Formats minutes as `Nmin`, `XhYm` or `XdYh`.
pub fn format_elapsed_time(minutes: u64) -> String {
    match minutes {
        0..60 => format!("{minutes}min"),
        60..1440 => format!("{}h{}m", minutes / 60, minutes % 60),
        _ => format!("{}d{}h", minutes / 1440, (minutes % 1440) / 60),
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let keep = width.saturating_sub(TRUNCATION_SUFFIX.len());
    let head: String = text.chars().take(keep).collect();
    format!("{head}{TRUNCATION_SUFFIX}")
}

fn pad(text: &str, width: usize) -> String {
    format!("{text:<width$}")
}

/// Title column width for a terminal `terminal_width` columns wide.
fn title_width(terminal_width: Option<usize>) -> usize {
    let Some(terminal_width) = terminal_width else {
        return DEFAULT_TITLE_WIDTH;
    };
    let fixed: usize =
        PR_FIXED_WIDTHS.iter().sum::<usize>() + COLUMN_SEPARATOR.len() * PR_FIXED_WIDTHS.len();
    terminal_width
        .saturating_sub(fixed)
        .clamp(MIN_TITLE_WIDTH, MAX_TITLE_WIDTH)
}

pub fn get_terminal_width(width_override: Option<usize>) -> Option<usize> {
    width_override.or_else(|| {
        io::stdout()
            .is_terminal()
            .then(terminal_size::terminal_size)
            .flatten()
            .map(|(w, _)| w.0 as usize)
    })
}

fn analysis_summary(readiness: Option<&ReadinessAnalysis>) -> String {
    match readiness {
        Some(analysis) => {
            let mut summary = format!(
                "{}/{}f",
                analysis.verdict.confidence, analysis.file_analysis.files_changed
            );
            if analysis.file_analysis.has_real_implementation {
                summary.push_str("/impl");
            }
            summary
        }
        None => "basic".to_string(),
    }
}

/// Parses `git log --format=%ai` output.
fn parse_git_date(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(text.trim(), "%Y-%m-%d %H:%M:%S %z")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn report_time(report: &Report) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&report.timestamp)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

struct DashboardRenderer<'a> {
    report: &'a Report,
    palette: Palette,
    title_width: usize,
    now: DateTime<Utc>,
}

impl<'a> DashboardRenderer<'a> {
    fn new(report: &'a Report, palette: Palette, terminal_width: Option<usize>) -> Self {
        Self {
            report,
            palette,
            title_width: title_width(terminal_width),
            now: report_time(report),
        }
    }

    fn render<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.write_header(writer)?;
        self.write_pr_table(writer)?;
        self.write_detailed_analysis(writer)?;
        self.write_issue_table(writer)?;
        self.write_recommendations(writer)?;
        self.write_footer(writer)?;
        Ok(())
    }

    fn write_header<W: Write>(&self, writer: &mut W) -> Result<()> {
        let p = &self.palette;
        let git = &self.report.git_status;
        let Summary {
            total_prs,
            blocked_count,
            ready_for_review_count,
            needs_investigation_count,
            normal_progress_count,
            ..
        } = &self.report.summary;

        writeln!(writer)?;
        writeln!(writer, "{}", p.bold("==== PROCESS DASHBOARD ===="))?;
        writeln!(writer, "{} {}", p.heading("Timestamp:"), self.report.timestamp)?;
        writeln!(
            writer,
            "{} {} | Updated: {}",
            p.heading("Git Status:"),
            git.current_branch,
            git.last_updated
        )?;
        writeln!(writer, "{} {total_prs}", p.bold("Total PRs:"))?;
        writeln!(
            writer,
            "{} {blocked_count} | {} {ready_for_review_count} | {} {needs_investigation_count} | {} {normal_progress_count}",
            p.paint("Blocked:", Style::new().red()),
            p.paint("Ready:", Style::new().green()),
            p.paint("Investigation:", Style::new().yellow()),
            p.paint("Normal:", Style::new().cyan()),
        )?;
        Ok(())
    }

    fn write_pr_table<W: Write>(&self, writer: &mut W) -> Result<()> {
        let p = &self.palette;
        let prs = &self.report.prs;

        writeln!(writer)?;
        if prs.is_empty() {
            writeln!(writer, "{}", p.dim("No open PRs found."))?;
            return Ok(());
        }

        writeln!(writer, "{}", p.bold("Pull Requests:"))?;
        let header = [
            pad("#", 5),
            pad("Title", self.title_width),
            pad("Status", 18),
            pad("Action", 20),
            pad("Priority", 10),
            pad("Elapsed", 10),
            "Analysis".to_string(),
        ]
        .join(COLUMN_SEPARATOR);
        writeln!(writer, "{header}")?;
        writeln!(writer, "{}", "-".repeat(header.chars().count() + 7))?;

        for entry in prs {
            writeln!(writer, "{}", self.pr_row(entry))?;
        }
        Ok(())
    }

    fn pr_row(&self, entry: &PrEntry) -> String {
        let p = &self.palette;
        let (title, status, elapsed, readiness) = match entry {
            PrEntry::Analyzed(pr) => (
                pr.title.as_str(),
                pr.pr_status,
                pr.elapsed_minutes,
                pr.readiness_analysis.as_ref(),
            ),
            PrEntry::Missing(missing) => (missing.error.as_str(), PrStatus::Error, 0, None),
        };
        let action = entry.action();
        let priority = entry.priority();

        [
            pad(&entry.pr_number().to_string(), 5),
            pad(&truncate(title, self.title_width - 2), self.title_width),
            format!("{} {}", p.status_icon(status), p.status(status, &pad(status.as_str(), 15))),
            format!("{} {}", p.action_icon(action), p.action(action, &pad(action.as_str(), 17))),
            format!("{} {}", p.priority_icon(priority), pad(priority.as_str(), 7)),
            pad(&format_elapsed_time(elapsed), 10),
            analysis_summary(readiness),
        ]
        .join(COLUMN_SEPARATOR)
    }

    fn write_detailed_analysis<W: Write>(&self, writer: &mut W) -> Result<()> {
        let attention: Vec<(&PrReport, &ReadinessAnalysis)> = self
            .report
            .prs
            .iter()
            .filter_map(PrEntry::analyzed)
            .filter(|pr| matches!(pr.priority, Priority::High | Priority::Medium))
            .filter_map(|pr| pr.readiness_analysis.as_ref().map(|r| (pr, r)))
            .collect();

        if attention.is_empty() {
            return Ok(());
        }

        writeln!(writer)?;
        writeln!(writer, "{}", self.palette.bold("Detailed PR Analysis:"))?;
        for (pr, readiness) in attention {
            self.write_pr_detail(pr, readiness, writer)?;
        }
        Ok(())
    }

    fn write_pr_detail<W: Write>(
        &self,
        pr: &PrReport,
        readiness: &ReadinessAnalysis,
        writer: &mut W,
    ) -> Result<()> {
        let p = &self.palette;
        let verdict = &readiness.verdict;
        let recommended = Action::from(verdict.recommendation);

        writeln!(writer)?;
        writeln!(
            writer,
            "{}",
            p.heading(&format!(
                "PR #{}: {}",
                pr.pr_number,
                truncate(&pr.title, DETAIL_TITLE_WIDTH)
            ))
        )?;
        writeln!(
            writer,
            "  {} {} ({} confidence)",
            p.bold("Recommendation:"),
            p.action(recommended, recommended.as_str()),
            verdict.confidence
        )?;

        if !verdict.reasons.is_empty() {
            writeln!(writer, "  {}", p.bold("Reasons:"))?;
            for reason in &verdict.reasons {
                writeln!(writer, "    • {reason}")?;
            }
        }

        let files = &readiness.file_analysis;
        writeln!(writer, "  {} {} changed", p.bold("Files:"), files.files_changed)?;
        if files.yarn_lock_only {
            writeln!(
                writer,
                "    {}",
                p.paint("⚠️  Only yarn.lock changes detected", Style::new().yellow())
            )?;
        } else if files.has_real_implementation {
            writeln!(
                writer,
                "    {}",
                p.paint("✅ Real implementation detected", Style::new().green())
            )?;
        }

        let messages = &readiness.commit_analysis.latest_messages;
        if !messages.is_empty() {
            writeln!(writer, "  {}", p.bold("Recent commits:"))?;
            let skip = messages.len().saturating_sub(RECENT_COMMITS_SHOWN);
            for message in &messages[skip..] {
                writeln!(writer, "    • {}", truncate(message, COMMIT_WIDTH))?;
            }
        }

        if let Some(activity) = parse_git_date(&pr.branch_progress.last_activity) {
            writeln!(
                writer,
                "  {} {}",
                p.bold("Branch activity:"),
                HumanTime::from(activity - self.now)
            )?;
        }

        match recommended {
            Action::ConvertToReady => writeln!(
                writer,
                "  {} gh pr ready {}",
                p.paint("💡 Suggested command:", Style::new().green()),
                pr.pr_number
            )?,
            Action::ReviewReady => writeln!(
                writer,
                "  {}",
                p.paint("👀 Ready for review!", Style::new().green())
            )?,
            Action::ResolveConflicts => writeln!(
                writer,
                "  {}",
                p.paint("⚡ Conflicts need resolution", Style::new().red())
            )?,
            _ => {}
        }
        Ok(())
    }

    fn write_issue_table<W: Write>(&self, writer: &mut W) -> Result<()> {
        let issues = &self.report.copilot_issues;
        if issues.is_empty() {
            return Ok(());
        }

        writeln!(writer)?;
        writeln!(writer, "{}", self.palette.bold("GitHub Copilot Issues:"))?;
        let header = [
            pad("#", 5),
            pad("Title", ISSUE_TITLE_WIDTH),
            pad("Status", 20),
            pad("Progress", 15),
            pad("Action", 20),
        ]
        .join(COLUMN_SEPARATOR);
        writeln!(writer, "{}", header.trim_end())?;
        writeln!(writer, "{}", "-".repeat(header.chars().count()))?;

        for issue in issues {
            writeln!(writer, "{}", self.issue_row(issue).trim_end())?;
        }
        Ok(())
    }

    fn issue_row(&self, issue: &IssueReport) -> String {
        let p = &self.palette;
        let progress = format!(
            "{}c/{}",
            issue.progress.commit_count,
            format_elapsed_time(issue.progress.elapsed_minutes)
        );

        [
            pad(&issue.issue_number.to_string(), 5),
            pad(
                &truncate(&issue.title, ISSUE_TITLE_WIDTH - 2),
                ISSUE_TITLE_WIDTH,
            ),
            format!(
                "{} {}",
                p.status_icon(issue.status),
                p.status(issue.status, &pad(issue.status.as_str(), 17))
            ),
            pad(&progress, 15),
            format!(
                "{} {}",
                p.action_icon(issue.action),
                p.action(issue.action, issue.action.as_str())
            ),
        ]
        .join(COLUMN_SEPARATOR)
    }

    fn write_recommendations<W: Write>(&self, writer: &mut W) -> Result<()> {
        let actions = &self.report.recommended_actions;
        if actions.is_empty() {
            return Ok(());
        }

        writeln!(writer)?;
        writeln!(writer, "{}", self.palette.bold("Recommended Actions:"))?;
        for recommended in actions {
            self.write_recommendation(recommended, writer)?;
        }
        Ok(())
    }

    fn write_recommendation<W: Write>(
        &self,
        recommended: &RecommendedAction,
        writer: &mut W,
    ) -> Result<()> {
        let p = &self.palette;
        let RecommendedAction {
            priority,
            action,
            count,
            next_check_minutes,
            message,
        } = recommended;

        let detail = match (next_check_minutes, count) {
            (Some(minutes), _) => format!(" (Next check in {minutes} min)"),
            (None, Some(count)) => format!(" ({count} items)"),
            (None, None) => String::new(),
        };
        writeln!(
            writer,
            "- {} [{priority}] {} {action}{detail}",
            p.priority_icon(*priority),
            p.action_icon(*action),
        )?;

        if !message.is_empty() {
            writeln!(writer, "  {}", p.dim(message))?;
        }
        Ok(())
    }

    fn write_footer<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "{}", self.palette.bold("==========================="))?;
        writeln!(writer)?;
        Ok(())
    }
}

/// Renders the terminal dashboard for `report`.
pub fn render_dashboard<W: Write>(
    report: &Report,
    palette: Palette,
    terminal_width: Option<usize>,
    writer: &mut W,
) -> Result<()> {
    DashboardRenderer::new(report, palette, terminal_width).render(writer)
}

pub fn write_json<W: Write>(report: &Report, writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report).context("Failed to serialise report")?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use prstatus::{
        BranchProgress, GitStatus, Mergeable,
        classify::{CommitAnalysis, FileAnalysis, ReadinessVerdict},
        report::{IssueProgress, MissingPr},
        types::{Confidence, Recommendation},
    };

    use super::*;

    fn readiness(recommendation: Recommendation) -> ReadinessAnalysis {
        ReadinessAnalysis {
            verdict: ReadinessVerdict {
                ready_for_review: true,
                recommendation,
                confidence: Confidence::High,
                reasons: vec!["Real implementation files changed".to_string()],
            },
            file_analysis: FileAnalysis {
                files_changed: 3,
                has_real_implementation: true,
                yarn_lock_only: false,
            },
            commit_analysis: CommitAnalysis {
                has_completion_indicators: true,
                has_planning_indicators: false,
                latest_messages: vec![
                    "Initial plan".to_string(),
                    "Add parser".to_string(),
                    "Implementation complete".to_string(),
                ],
            },
        }
    }

    fn sample_report() -> Report {
        Report {
            timestamp: "2024-01-15T12:00:00+00:00".to_string(),
            dashboard_type: "process_management",
            git_status: GitStatus {
                current_branch: "main".to_string(),
                last_commit: "abc123 Merge".to_string(),
                last_updated: "2024-01-15T12:00:00+00:00".to_string(),
            },
            prs: vec![
                PrEntry::Analyzed(PrReport {
                    pr_number: 101,
                    title: "Add a configurable readiness classifier for agent pull requests"
                        .to_string(),
                    is_draft: true,
                    mergeable: Mergeable::Mergeable,
                    branch: "copilot/fix-7".to_string(),
                    elapsed_minutes: 95,
                    latest_commit_msg: "Implementation complete".to_string(),
                    pr_status: PrStatus::Draft,
                    action_needed: Action::ConvertToReady,
                    priority: Priority::High,
                    additions: 400,
                    deletions: 20,
                    commit_count: 3,
                    branch_progress: BranchProgress {
                        commits: 3,
                        latest_commit: "Implementation complete".to_string(),
                        last_activity: "2024-01-15 10:00:00 +0000".to_string(),
                    },
                    readiness_analysis: Some(readiness(Recommendation::ConvertToReady)),
                }),
                PrEntry::Missing(MissingPr {
                    pr_number: 102,
                    error: "PR not found".to_string(),
                    action_needed: Action::Investigate,
                    priority: Priority::High,
                }),
            ],
            copilot_issues: vec![IssueReport {
                issue_number: 7,
                title: "Classify agent PRs".to_string(),
                related_pr: Some(101),
                status: PrStatus::Draft,
                action: Action::Wait,
                priority: Priority::Normal,
                progress: IssueProgress {
                    elapsed_minutes: 95,
                    commit_count: 3,
                    latest_commit: "Implementation complete".to_string(),
                },
                message: String::new(),
            }],
            summary: Summary {
                total_prs: 2,
                normal_progress_count: 2,
                copilot_active_issues: 1,
                total_copilot_issues: 1,
                ..Default::default()
            },
            recommended_actions: vec![RecommendedAction {
                priority: Priority::Low,
                action: Action::MonitorProgress,
                count: None,
                next_check_minutes: Some(20),
                message: "Continue monitoring active work".to_string(),
            }],
        }
    }

    fn render_plain(report: &Report, width: Option<usize>) -> String {
        let mut out = Vec::new();
        render_dashboard(report, Palette::plain(), width, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn elapsed_time_formats() {
        assert_eq!(format_elapsed_time(0), "0min");
        assert_eq!(format_elapsed_time(59), "59min");
        assert_eq!(format_elapsed_time(60), "1h0m");
        assert_eq!(format_elapsed_time(125), "2h5m");
        assert_eq!(format_elapsed_time(1439), "23h59m");
        assert_eq!(format_elapsed_time(1440), "1d0h");
        assert_eq!(format_elapsed_time(3000), "2d2h");
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }

    #[test]
    fn title_width_follows_terminal() {
        assert_eq!(title_width(None), DEFAULT_TITLE_WIDTH);
        assert_eq!(title_width(Some(40)), MIN_TITLE_WIDTH);
        assert_eq!(title_width(Some(500)), MAX_TITLE_WIDTH);
        assert_eq!(title_width(Some(120)), 120 - 78 - 6);
    }

    #[test]
    fn plain_palette_emits_no_escapes() {
        let output = render_plain(&sample_report(), None);
        assert!(!output.contains('\u{1b}'));
        assert!(output.contains("==== PROCESS DASHBOARD ===="));
        assert!(output.contains("Git Status: main | Updated: 2024-01-15T12:00:00+00:00"));
        assert!(output.contains("Blocked: 0 | Ready: 0 | Investigation: 0 | Normal: 2"));
    }

    #[test]
    fn ansi_palette_colours_output() {
        let mut out = Vec::new();
        render_dashboard(&sample_report(), Palette::ansi(), None, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains('\u{1b}'));
    }

    #[test]
    fn pr_table_shows_analysis_and_placeholder() {
        let output = render_plain(&sample_report(), None);
        let row = output
            .lines()
            .find(|l| l.starts_with("101"))
            .expect("row for PR 101");
        assert!(row.contains("draft"));
        assert!(row.contains("convert_to_ready"));
        assert!(row.contains("1h35m"));
        assert!(row.ends_with("high/3f/impl"));
        assert!(row.contains("Add a configurable readiness c..."));

        let missing = output
            .lines()
            .find(|l| l.starts_with("102"))
            .expect("row for PR 102");
        assert!(missing.contains("PR not found"));
        assert!(missing.contains("error"));
        assert!(missing.ends_with("basic"));
    }

    #[test]
    fn detailed_analysis_suggests_gh_pr_ready() {
        let output = render_plain(&sample_report(), None);
        assert!(output.contains("Detailed PR Analysis:"));
        assert!(output.contains("Recommendation: convert_to_ready (high confidence)"));
        assert!(output.contains("    • Real implementation files changed"));
        assert!(output.contains("Files: 3 changed"));
        assert!(output.contains("✅ Real implementation detected"));
        assert!(output.contains("💡 Suggested command: gh pr ready 101"));
        assert!(output.contains("Branch activity: 2 hours ago"));
        assert!(!output.contains("• Initial plan"));
        assert!(output.contains("• Implementation complete"));
    }

    #[test]
    fn issue_table_and_recommendations_render() {
        let output = render_plain(&sample_report(), None);
        assert!(output.contains("GitHub Copilot Issues:"));
        let row = output
            .lines()
            .find(|l| l.starts_with("7 "))
            .expect("row for issue 7");
        assert!(row.contains("3c/1h35m"));
        assert!(row.contains("wait"));
        assert!(output.contains("[low] 📊 monitor_progress (Next check in 20 min)"));
        assert!(output.contains("  Continue monitoring active work"));
    }

    #[test]
    fn empty_report_says_no_prs() {
        let mut report = sample_report();
        report.prs.clear();
        report.copilot_issues.clear();
        report.recommended_actions.clear();

        let output = render_plain(&report, None);
        assert!(output.contains("No open PRs found."));
        assert!(!output.contains("Detailed PR Analysis:"));
        assert!(!output.contains("Recommended Actions:"));
        assert!(output.trim_end().ends_with("==========================="));
    }

    #[test]
    fn json_output_has_dashboard_keys() {
        let mut out = Vec::new();
        write_json(&sample_report(), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        for key in [
            "timestamp",
            "dashboard_type",
            "git_status",
            "prs",
            "copilot_issues",
            "summary",
            "recommended_actions",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["prs"][0]["readiness_analysis"]["ready"], true);
        assert_eq!(value["prs"][1]["error"], "PR not found");
    }
}
