//! Shared fixtures: a local bare repository served over `file://`

#![allow(dead_code)]

use sparsefetch::SessionConfig;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

pub const OWNER: &str = "acme";
pub const NAME: &str = "widgets";

/// Run git in `dir`, panicking with its stderr on failure
pub fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args([
            "-c",
            "user.email=test@test.com",
            "-c",
            "user.name=Test User",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A bare repository at `<base>/acme/widgets.git` whose HEAD is `main`
///
/// `main` holds `docs/`, `src/`, `vtr_flow/benchmarks/...` and a root
/// README. A `release` branch adds `RELEASE_NOTES.md`.
pub struct TestRemote {
    pub base: TempDir,
}

impl TestRemote {
    pub fn new() -> Self {
        let base = TempDir::new().unwrap();
        let work = base.path().join("work");
        fs::create_dir_all(&work).unwrap();

        git(&work, &["init"]);
        write_file(&work, "README.md", "# widgets\n");
        write_file(&work, "docs/guide.md", "guide\n");
        write_file(&work, "docs/api/index.md", "api\n");
        write_file(&work, "src/lib.rs", "pub fn widget() {}\n");
        write_file(&work, "src/bin/tool.rs", "fn main() {}\n");
        write_file(&work, "vtr_flow/benchmarks/fpu/add.v", "module add;\n");
        write_file(&work, "vtr_flow/benchmarks/blif/alu.blif", ".model alu\n");
        write_file(
            &work,
            "vtr_flow/benchmarks/vexriscv/VexRiscvSmallest.v",
            "module VexRiscv;\n",
        );
        git(&work, &["add", "."]);
        git(&work, &["commit", "-m", "Initial commit"]);
        git(&work, &["branch", "-M", "main"]);

        git(&work, &["checkout", "-b", "release"]);
        write_file(&work, "RELEASE_NOTES.md", "1.0\n");
        git(&work, &["add", "."]);
        git(&work, &["commit", "-m", "Release notes"]);
        git(&work, &["checkout", "main"]);

        let owner_dir = base.path().join(OWNER);
        fs::create_dir_all(&owner_dir).unwrap();
        git(
            &owner_dir,
            &["clone", "--bare", work.to_str().unwrap(), &format!("{NAME}.git")],
        );
        let bare = owner_dir.join(format!("{NAME}.git"));
        git(&bare, &["config", "uploadpack.allowFilter", "true"]);
        git(&bare, &["config", "uploadpack.allowAnySHA1InWant", "true"]);
        git(&bare, &["symbolic-ref", "HEAD", "refs/heads/main"]);

        Self { base }
    }

    /// URL base to pass as the session host
    pub fn host(&self) -> String {
        format!("file://{}", self.base.path().canonicalize().unwrap().display())
    }

    pub fn url(&self) -> String {
        format!("{}/{OWNER}/{NAME}.git", self.host())
    }

    pub fn config(&self) -> SessionConfig {
        SessionConfig::new(OWNER, NAME).with_host(self.host())
    }
}

/// Names of the entries directly under `dir`, sorted
pub fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
