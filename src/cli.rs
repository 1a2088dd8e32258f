use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

const BUILD_INFO_HUMAN: &str = env!("BUILD_INFO_HUMAN");

/// How the finished report is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Json,
    Dashboard,
}

/// Everything the command line controls apart from the output mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardRequest {
    pub config_path: Option<PathBuf>,
    pub assignee: Option<String>,
    pub update_git: bool,
    pub no_color: bool,
}

#[derive(Parser, Default, Debug)]
#[command(
    name = "prstatus",
    about = "Report the state of open pull requests and agent-assigned issues as JSON or a terminal dashboard"
)]
#[command(long_version = BUILD_INFO_HUMAN)]
struct CliArgs {
    /// Render a coloured dashboard instead of JSON
    #[arg(short = 'd', long)]
    pub dashboard: bool,

    /// Skip fetching and pulling before collecting status
    #[arg(long = "no-update")]
    pub no_update: bool,

    /// TOML file with classifier keywords and thresholds
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Login whose assigned issues are tracked (overrides the config file)
    #[arg(long, value_name = "LOGIN")]
    pub assignee: Option<String>,

    /// Disable ANSI colours in the dashboard
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl CliArgs {
    fn validate(&self) -> Result<()> {
        if let Some(assignee) = &self.assignee
            && assignee.trim().is_empty()
        {
            anyhow::bail!("--assignee must not be empty");
        }
        Ok(())
    }
}

fn build_request_from_cli(cli: CliArgs) -> Result<(DashboardRequest, OutputMode)> {
    cli.validate()?;

    let mode = if cli.dashboard {
        OutputMode::Dashboard
    } else {
        OutputMode::Json
    };

    Ok((
        DashboardRequest {
            config_path: cli.config,
            assignee: cli.assignee.map(|a| a.trim().to_string()),
            update_git: !cli.no_update,
            no_color: cli.no_color,
        },
        mode,
    ))
}

/// Parses command-line arguments into a dashboard request and output mode.
///
/// Clap errors, including `--help` and `--version`, are returned as
/// [`clap::Error`] inside the [`anyhow::Error`] so the caller can choose the
/// exit status.
pub fn parse_args<I, T>(args: I) -> Result<(DashboardRequest, OutputMode)>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = CliArgs::try_parse_from(args)?;
    build_request_from_cli(cli)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_json_with_git_update() {
        let (request, mode) = parse_args(["prstatus"]).unwrap();
        assert_eq!(mode, OutputMode::Json);
        assert!(request.update_git);
        assert!(!request.no_color);
        assert_eq!(request.config_path, None);
        assert_eq!(request.assignee, None);
    }

    #[test]
    fn dashboard_flags_are_recognised() {
        let (request, mode) = parse_args([
            "prstatus",
            "-d",
            "--no-update",
            "--no-color",
            "--config",
            "dash.toml",
            "--assignee",
            "octobot",
        ])
        .unwrap();

        assert_eq!(mode, OutputMode::Dashboard);
        assert!(!request.update_git);
        assert!(request.no_color);
        assert_eq!(request.config_path, Some(PathBuf::from("dash.toml")));
        assert_eq!(request.assignee.as_deref(), Some("octobot"));
    }

    #[test]
    fn long_dashboard_flag_matches_short() {
        let (_, mode) = parse_args(["prstatus", "--dashboard"]).unwrap();
        assert_eq!(mode, OutputMode::Dashboard);
    }

    #[test]
    fn unknown_flags_are_clap_errors() {
        let err = parse_args(["prstatus", "--bogus"]).unwrap_err();
        assert!(err.downcast_ref::<clap::Error>().is_some());
    }

    #[test]
    fn blank_assignee_is_rejected() {
        let err = parse_args(["prstatus", "--assignee", "  "]).unwrap_err();
        assert!(err.to_string().contains("--assignee"));
    }
}
