//! Stamps `ledgerscan --version` with the workspace's git commit.

use std::path::{Path, PathBuf};
use std::process::Command;

fn workspace_root() -> PathBuf {
    let manifest = std::env::var_os("CARGO_MANIFEST_DIR").map_or_else(|| PathBuf::from("."), PathBuf::from);
    manifest.parent().map(Path::to_path_buf).unwrap_or(manifest)
}

fn commit_id(root: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(["log", "-1", "--format=%h"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let id = String::from_utf8(out.stdout).ok()?;
    let id = id.trim();
    (!id.is_empty()).then(|| id.to_owned())
}

fn main() {
    let root = workspace_root();
    let commit = commit_id(&root).unwrap_or_else(|| "dev".to_owned());

    println!("cargo:rustc-env=LEDGERSCAN_BUILD_SHA={commit}");
    println!("cargo:rerun-if-changed={}", root.join(".git").join("HEAD").display());
}
