//! Build script for airfryer-server
//!
//! Exposes `GIT_HASH`, `BUILD_TIMESTAMP` and `BUILD_PROFILE` to the binary,
//! which logs them at startup and reports them on `/api/buildinfo`.

use std::process::Command;

const UNKNOWN: &str = "unknown";

fn main() {
    emit("GIT_HASH", &short_commit().unwrap_or_else(|| UNKNOWN.to_string()));
    emit(
        "BUILD_TIMESTAMP",
        &chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
    );
    emit(
        "BUILD_PROFILE",
        &std::env::var("PROFILE").unwrap_or_else(|_| UNKNOWN.to_string()),
    );

    // No rerun-if-changed: the script reruns on every build
}

/// Short commit hash, or `None` outside a git checkout
fn short_commit() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8(output.stdout).ok()?;
    Some(hash.trim().to_string())
}

fn emit(key: &str, value: &str) {
    println!("cargo:rustc-env={}={}", key, value);
}
