//! Build script for tutor-shared.
//! Sets build-time environment variables for `--version` and `/health`.
//!
//! This script sets:
//! - TUTOR_GIT_SHA: Short git commit hash, or the value of `TUTOR_GIT_SHA`
//!   when building from a source tarball
//! - TUTOR_BUILD_DATE: UTC ISO date

use std::process::Command;

/// Git metadata lives at the workspace root, two levels above this crate
const WORKSPACE_GIT_DIR: &str = "../../.git";

fn git_short_sha() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let sha = String::from_utf8(output.stdout).ok()?;
    Some(sha.trim().to_string()).filter(|s| !s.is_empty())
}

fn main() {
    // Packagers can pin the sha when there is no git checkout
    let git_sha = std::env::var("TUTOR_GIT_SHA")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(git_short_sha)
        .unwrap_or_else(|| "unknown".to_string());

    // UTC date, no time of day
    let build_date = chrono::Utc::now().format("%Y-%m-%d").to_string();

    println!("cargo:rustc-env=TUTOR_GIT_SHA={}", git_sha);
    println!("cargo:rustc-env=TUTOR_BUILD_DATE={}", build_date);

    // Rebuild when HEAD moves or the override changes
    println!("cargo:rerun-if-env-changed=TUTOR_GIT_SHA");
    println!("cargo:rerun-if-changed={}/HEAD", WORKSPACE_GIT_DIR);
    println!("cargo:rerun-if-changed={}/refs/heads/", WORKSPACE_GIT_DIR);
}
