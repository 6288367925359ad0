use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, Output, Stdio};
use tempfile::TempDir;

/// Stand-in for the sops CLI.
///
/// Encrypts to `ENC[FAKE,type:<codec>,nonce:<pid>,data:<base64>]`, so every
/// call yields different bytes, and refuses to decrypt anything else or a
/// mismatched type. Every invocation is appended to `calls.log` as
/// `<op> <filename>`.
#[allow(dead_code)]
const FAKE_SOPS: &str = r#"#!/bin/sh
op="$3"
type="$5"
echo "$op $9" >> "$(dirname "$0")/../calls.log"
case "$op" in
  encrypt)
    data=$(base64 | tr -d '\n')
    printf 'ENC[FAKE,type:%s,nonce:%s,data:%s]' "$type" "$$" "$data"
    ;;
  decrypt)
    content=$(cat)
    case "$content" in
      "ENC[FAKE,type:$type,"*) ;;
      *) echo "Error unmarshalling input: sops metadata not found" >&2; exit 1 ;;
    esac
    printf '%s' "$content" | sed -e 's/^.*,data://' -e 's/]$//' | base64 -d
    ;;
  *)
    echo "unknown command: $op" >&2
    exit 2
    ;;
esac
"#;

/// Create a new temporary git repository with user config set.
pub fn create_git_repo() -> TempDir {
    let temp = TempDir::new().expect("failed to create temp dir");

    git(temp.path(), &["init"]);
    git(temp.path(), &["config", "user.email", "test@example.com"]);
    git(temp.path(), &["config", "user.name", "Test User"]);

    temp
}

/// Run git in `dir`, panicking on failure.
#[allow(dead_code)]
pub fn git(dir: &Path, args: &[&str]) -> Output {
    let output = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

/// Convenience helper for spawning the git-sops binary via assert_cmd.
#[allow(dead_code)]
pub fn git_sops_cmd() -> Command {
    cargo_bin_cmd!("git-sops")
}

/// Absolute path to the git-sops test binary.
#[allow(dead_code)]
pub fn git_sops_bin() -> &'static str {
    env!("CARGO_BIN_EXE_git-sops")
}

/// A fake `sops` on a private PATH entry plus an existing sops config.
#[allow(dead_code)]
pub struct FakeSops {
    dir: TempDir,
}

#[allow(dead_code)]
impl FakeSops {
    #[cfg(unix)]
    pub fn new() -> Self {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().expect("failed to create temp dir");
        let bin = dir.path().join("bin");
        fs::create_dir(&bin).unwrap();

        let script = bin.join("sops");
        fs::write(&script, FAKE_SOPS).unwrap();
        let mut perms = fs::metadata(&script).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&script, perms).unwrap();

        fs::write(dir.path().join("config.yaml"), "creation_rules: []\n").unwrap();

        Self { dir }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.yaml")
    }

    /// `PATH` with the fake first, so git and coreutils stay reachable.
    pub fn path_env(&self) -> OsString {
        let original = std::env::var_os("PATH").unwrap_or_default();
        let dirs = std::iter::once(self.dir.path().join("bin"))
            .chain(std::env::split_paths(&original));
        std::env::join_paths(dirs).unwrap()
    }

    pub fn envs(&self) -> Vec<(&'static str, OsString)> {
        vec![
            ("PATH", self.path_env()),
            ("SOPS_CONFIG", self.config_path().into_os_string()),
        ]
    }

    /// Recorded `<op> <filename>` lines.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Run a git-sops subcommand with `input` on stdin.
    pub fn run(&self, repo: &Path, args: &[&str], input: &[u8]) -> Output {
        let mut child = StdCommand::new(git_sops_bin())
            .args(args)
            .envs(self.envs())
            .current_dir(repo)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to spawn git-sops");

        {
            let stdin = child.stdin.as_mut().expect("failed to open stdin");
            stdin.write_all(input).expect("failed to write to stdin");
        }

        child.wait_with_output().expect("failed to read output")
    }

    /// Run git with the fake sops reachable, for operations that invoke filters.
    pub fn git(&self, dir: &Path, args: &[&str]) -> Output {
        let output = StdCommand::new("git")
            .args(args)
            .envs(self.envs())
            .current_dir(dir)
            .output()
            .expect("failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        output
    }

    /// Encrypt `plaintext` for `path` through the CLI and return the ciphertext.
    pub fn encrypt(&self, repo: &Path, path: &str, plaintext: &[u8]) -> Vec<u8> {
        let output = self.run(repo, &["clean", path], plaintext);
        assert!(
            output.status.success(),
            "clean failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        output.stdout
    }
}

/// Write `content` to `path` in the repo and commit it without any filter.
#[allow(dead_code)]
pub fn commit_file(repo: &Path, path: &str, content: &[u8]) {
    let full = repo.join(path);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(full, content).unwrap();
    git(repo, &["add", path]);
    git(repo, &["commit", "-m", &format!("add {path}")]);
}
