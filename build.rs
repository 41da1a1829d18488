//! Build script for close-fork-prs - embeds version information.
//!
//! `BUILD_INFO_HUMAN` is assembled from:
//!
//! 1. The crate version from Cargo.toml.
//! 2. The source revision, when built from a git checkout:
//!    - `git describe --tags --dirty` when a tag is reachable
//!      (e.g. `v0.1.0-4-g1a2b3c4d-dirty`);
//!    - otherwise the 12-character commit SHA plus the commit date,
//!      suffixed with `+dirty` for uncommitted changes
//!      (e.g. `1a2b3c4d5e6f 2025-06-10+dirty`).
//! 3. The rustc version used for the build.
//!
//! Missing git or rustc simply drops that component.

use std::{env, process::Command};

use chrono::DateTime;

fn main() {
    ["src", "build.rs", "Cargo.toml", "Cargo.lock"]
        .iter()
        .for_each(|path| println!("cargo:rerun-if-changed={path}"));

    println!("cargo:rustc-env=BUILD_INFO_HUMAN={}", build_info());
}

/// Runs a command and returns its trimmed stdout when it succeeds.
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

fn git(args: &[&str]) -> Option<String> {
    capture("git", args)
}

/// Whether the checkout has uncommitted changes, ignoring the `.cargo-ok`
/// marker left behind by `cargo install --git`.
fn is_dirty() -> bool {
    git(&["status", "--porcelain"])
        .map(|status| status.lines().any(|line| line.get(3..) != Some(".cargo-ok")))
        .unwrap_or(false)
}

fn commit_date() -> Option<String> {
    git(&["log", "-1", "--format=%ct"])
        .and_then(|s| s.parse::<i64>().ok())
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.format("%Y-%m-%d").to_string())
}

fn revision() -> Option<String> {
    if let Some(described) = git(&["describe", "--tags", "--dirty"]) {
        return Some(described);
    }

    let sha = git(&["rev-parse", "--short=12", "HEAD"])?;
    let mut revision = match commit_date() {
        Some(date) => format!("{sha} {date}"),
        None => sha,
    };
    if is_dirty() {
        revision.push_str("+dirty");
    }
    Some(revision)
}

fn build_info() -> String {
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());

    [
        Some(env!("CARGO_PKG_VERSION").to_string()),
        revision().map(|r| format!("({r})")),
        capture(&rustc, &["--version"]),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
}
