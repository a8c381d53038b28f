//! Fluent wrapper around assert_cmd::Command.

// Allow dead code since this is a test utility shared by several test files
#![allow(dead_code)]

use assert_cmd::Command;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Fluent wrapper around `assert_cmd::Command` for the `doctor` binary.
///
/// Provides a builder-style API for constructing and executing CLI commands.
pub struct DoctorCommand {
    args: Vec<String>,
    envs: Vec<(String, String)>,
    current_dir: Option<PathBuf>,
    stdin: Option<String>,
}

impl DoctorCommand {
    /// Creates a new command for the `doctor` binary.
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            envs: Vec::new(),
            current_dir: None,
            stdin: None,
        }
    }

    /// Sets the `--dir` option to point at a document.
    pub fn dir(mut self, path: &Path) -> Self {
        self.args.push("--dir".to_string());
        self.args.push(path.to_string_lossy().to_string());
        self
    }

    /// Runs the command from `path` instead of the test's working directory.
    pub fn current_dir(mut self, path: &Path) -> Self {
        self.current_dir = Some(path.to_path_buf());
        self
    }

    /// Adds arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Sets an environment variable for the child process.
    pub fn env(mut self, key: &str, value: impl AsRef<str>) -> Self {
        self.envs.push((key.to_string(), value.as_ref().to_string()));
        self
    }

    /// Feeds `input` to the command's standard input.
    pub fn stdin(mut self, input: &str) -> Self {
        self.stdin = Some(input.to_string());
        self
    }

    /// Returns the current arguments (for testing).
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Runs the command and returns an Assert for making assertions.
    #[allow(deprecated)]
    pub fn assert(self) -> assert_cmd::assert::Assert {
        let mut cmd = Command::cargo_bin("doctor").expect("Failed to find doctor binary");
        cmd.env_remove("RUST_LOG")
            .env_remove("EDITOR")
            .env_remove("VISUAL");
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        if let Some(input) = self.stdin {
            cmd.write_stdin(input);
        }
        cmd.args(&self.args);
        cmd.assert()
    }

    /// Runs the command, expects success, and returns stdout as a string.
    pub fn output_success(self) -> String {
        let output = self.assert().success().get_output().stdout.clone();
        String::from_utf8(output).expect("Output was not valid UTF-8")
    }

    /// Runs the command, expects success, and parses stdout as JSON.
    pub fn output_json<T: DeserializeOwned>(self) -> T {
        let output = self.output_success();
        serde_json::from_str(&output).expect("Failed to parse output as JSON")
    }

    // ===========================================
    // Command Shortcuts
    // ===========================================

    /// Configures for the `add` command.
    pub fn add(self, name: &str) -> Self {
        self.args(["add", name])
    }

    /// Configures for the `list` command.
    pub fn list(self) -> Self {
        self.args(["list"])
    }

    /// Configures for the `move` command.
    pub fn mv(self, section: &str, to: usize) -> Self {
        self.args(["move".to_string(), section.to_string(), to.to_string()])
    }

    /// Configures for the `remove` command without confirmation prompts.
    pub fn remove_confirmed(self, sections: &[&str]) -> Self {
        self.args(["remove", "-y"]).args(sections)
    }

    /// Configures for the `stats` command.
    pub fn stats(self) -> Self {
        self.args(["stats"])
    }

    // ===========================================
    // Format Options
    // ===========================================

    /// Adds `--format json` to the command.
    pub fn format_json(self) -> Self {
        self.args(["--format", "json"])
    }

    /// Adds `--format paths` to the command.
    pub fn format_paths(self) -> Self {
        self.args(["--format", "paths"])
    }
}

impl Default for DoctorCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_command_runs_binary() {
        DoctorCommand::new().args(["--help"]).assert().success();
    }

    #[test]
    fn test_command_with_dir() {
        let temp = TempDir::new().unwrap();
        let cmd = DoctorCommand::new().dir(temp.path());
        let args = cmd.get_args();
        assert_eq!(args[0], "--dir");
        assert_eq!(args[1], temp.path().to_string_lossy());
    }

    #[test]
    fn test_command_shortcuts() {
        let cmd = DoctorCommand::new().list().format_json();
        assert_eq!(cmd.get_args(), ["list", "--format", "json"]);

        let cmd = DoctorCommand::new().mv("Intro", 2);
        assert_eq!(cmd.get_args(), ["move", "Intro", "2"]);
    }
}
