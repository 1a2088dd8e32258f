//! Build script for prstatus: embeds a human-readable version string.
//!
//! The string is `{CARGO_PKG_VERSION} ({git}) {rustc --version}` where `{git}`
//! is `git describe --tags --always --dirty` when a tag is reachable, or a
//! pseudo-version `v{CARGO_PKG_VERSION}-{yyyymmddHHMMSS}-{sha12}[+dirty]`
//! otherwise. Clean trees stamp the commit time; dirty trees stamp the build
//! time. Missing pieces are simply left out.

use std::{env, process::Command};

use chrono::{DateTime, Utc};

const STAMP_FORMAT: &str = "%Y%m%d%H%M%S";

fn main() {
    for path in ["src", "build.rs", "Cargo.toml", "Cargo.lock"] {
        println!("cargo:rerun-if-changed={path}");
    }

    println!("cargo:rustc-env=BUILD_INFO_HUMAN={}", build_info());
}

fn capture(program: &str, args: &[&str]) -> Option<String> {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// `None` outside a git checkout. `.cargo-ok` is written by
/// `cargo install --git` and does not make the tree dirty.
fn worktree_dirty() -> Option<bool> {
    capture("git", &["status", "--porcelain"])
        .map(|status| status.lines().any(|line| line.get(3..) != Some(".cargo-ok")))
        .or_else(|| capture("git", &["rev-parse", "--git-dir"]).map(|_| false))
}

fn pseudo_version() -> String {
    let sha = capture("git", &["rev-parse", "--short=12", "HEAD"])
        .unwrap_or_else(|| "unknown".to_string());
    let dirty = worktree_dirty() == Some(true);

    let commit_time = (!dirty)
        .then(|| capture("git", &["log", "-1", "--format=%ct"]))
        .flatten()
        .and_then(|secs| secs.parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0));
    let stamp = commit_time.unwrap_or_else(Utc::now).format(STAMP_FORMAT);

    let suffix = if dirty { "+dirty" } else { "" };
    format!("v{}-{stamp}-{sha}{suffix}", env!("CARGO_PKG_VERSION"))
}

fn git_version() -> String {
    match capture("git", &["describe", "--tags", "--always", "--dirty"]) {
        // A bare hash means no tag is reachable.
        Some(desc) if desc.contains('v') || desc.contains("-g") => desc,
        _ => pseudo_version(),
    }
}

fn build_info() -> String {
    [
        Some(env!("CARGO_PKG_VERSION").to_string()),
        Some(format!("({})", git_version())),
        capture("rustc", &["--version"]),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
}
