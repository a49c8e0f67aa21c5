//! Stamps the CLI version with the commit it was built from.
//!
//! `SESAME_VERSION` is the package version, with the short commit hash as
//! semver build metadata when the source is a git checkout (`0.1.0+1a2b3c4`).

use std::path::PathBuf;
use std::process::Command;

fn main() {
    let package = env!("CARGO_PKG_VERSION");
    let version = match commit() {
        Some(sha) => format!("{package}+{sha}"),
        None => package.to_string(),
    };
    println!("cargo:rustc-env=SESAME_VERSION={version}");

    if let Some(git_dir) = git(&["rev-parse", "--absolute-git-dir"]).map(PathBuf::from) {
        println!("cargo:rerun-if-changed={}", git_dir.join("HEAD").display());
        println!("cargo:rerun-if-changed={}", git_dir.join("refs").display());
    }
}

fn commit() -> Option<String> {
    git(&["rev-parse", "--short", "HEAD"])
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
