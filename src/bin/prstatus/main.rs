mod display;

use anyhow::Result;
use chrono::Utc;
use prstatus::{
    DashboardConfig, DashboardRequest, Git, GitHub, LocalRepo, OutputMode, build_report,
    parse_args,
};
use tracing::info;

use display::{Palette, get_terminal_width, render_dashboard, write_json};

fn handle_clap_help_version(clap_err: &clap::Error) -> ! {
    use clap::error::ErrorKind;
    match clap_err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{clap_err}");
            std::process::exit(0);
        }
        _ => {
            eprint!("{clap_err}");
            std::process::exit(2);
        }
    }
}

/// Progress notices from this crate stay visible; dependencies only warn.
const DEFAULT_LOG_FILTER: &str = "warn,prstatus=info";

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// File settings, then environment overrides, then the command line.
fn load_config(request: &DashboardRequest) -> Result<DashboardConfig> {
    let config = match &request.config_path {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    let mut config = config.with_env_overrides();
    if let Some(assignee) = &request.assignee {
        config.assignee = assignee.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let (request, output_mode) = match parse_args(std::env::args()) {
        Ok(result) => result,
        Err(err) => {
            if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
                handle_clap_help_version(clap_err);
            } else {
                return Err(err);
            }
        }
    };

    let config = load_config(&request)?;
    let forge = GitHub::new(config.query_timeout());
    let repo = Git::new(config.query_timeout());

    if request.update_git {
        repo.sync().await;
    }

    info!(
        assignee = %config.assignee,
        max_concurrent = config.concurrency(),
        "Collecting status"
    );
    let report = build_report(&forge, &repo, &config, Utc::now()).await;
    let mut stdout = std::io::stdout().lock();

    match output_mode {
        OutputMode::Json => write_json(&report, &mut stdout)?,
        OutputMode::Dashboard => render_dashboard(
            &report,
            Palette::detect(request.no_color),
            get_terminal_width(None),
            &mut stdout,
        )?,
    }

    Ok(())
}
