//! Shared test infrastructure for integration tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Isolated store + config directory for one splitpay invocation chain.
pub struct Workspace {
    dir: TempDir,
}

/// Captured result of one splitpay run.
#[derive(Debug)]
pub struct RunResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl From<Output> for RunResult {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        std::fs::write(
            dir.path().join("config.json"),
            r#"{"schema_version": 1, "log_level": "warn"}"#,
        )
        .expect("write config");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("store.json")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_splitpay"));
        cmd.arg("--config")
            .arg(self.dir.path().join("config.json"))
            .arg("--store")
            .arg(self.store_path())
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run splitpay with `args`.
    pub fn run(&self, args: &[&str]) -> RunResult {
        self.command()
            .args(args)
            .output()
            .expect("spawn splitpay")
            .into()
    }

    /// Run `splitpay session`, feeding `script` on stdin.
    pub fn session(&self, script: &str) -> RunResult {
        use std::io::Write;
        use std::process::Stdio;

        let mut child = self
            .command()
            .arg("session")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn splitpay session");
        child
            .stdin
            .take()
            .expect("session stdin")
            .write_all(script.as_bytes())
            .expect("write session script");
        child
            .wait_with_output()
            .expect("wait for session")
            .into()
    }

    /// Parsed contents of the on-disk store.
    pub fn stored_ids(&self) -> serde_json::Value {
        let text = std::fs::read_to_string(self.store_path()).expect("read store");
        let entries: serde_json::Value = serde_json::from_str(&text).expect("store is JSON");
        let ids = entries["promptPayIds"].as_str().expect("promptPayIds entry");
        serde_json::from_str(ids).expect("promptPayIds is JSON")
    }
}
