// SPDX-License-Identifier: MPL-2.0

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-env-changed=SNAPCAM_VERSION");

    // Packagers may pin the version (e.g., flatpak builds)
    let version = std::env::var("SNAPCAM_VERSION").unwrap_or_else(|_| describe());
    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// "0.1.0" from Cargo.toml, suffixed with the short commit when built from git
fn describe() -> String {
    let base = std::env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string());
    match short_commit() {
        Some(hash) => format!("{}-{}", base, hash),
        None => base,
    }
}

fn short_commit() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;

    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|hash| !hash.is_empty())
}
