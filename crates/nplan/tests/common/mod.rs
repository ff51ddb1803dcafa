//! Common test utilities for integration tests.
//!
//! Provides fixture loading and `FixtureRunner`, a [`CommandRunner`] that
//! answers known command lines with canned output.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use nplan::command::{BinaryPaths, CommandOutput, CommandRunner};
use nplan::{Error, Result};

/// Read a file from `tests/data`.
pub fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", path.display(), e))
}

/// Parse a YAML fixture into a generic value for structural comparison.
pub fn yaml_fixture(name: &str) -> serde_yaml::Value {
    serde_yaml::from_str(&fixture(name)).expect("fixture is valid YAML")
}

/// Binary paths that never touch the host.
pub fn fake_binaries() -> BinaryPaths {
    BinaryPaths {
        netplan: Some(PathBuf::from("/usr/sbin/netplan")),
        ip: Some(PathBuf::from("/usr/bin/ip")),
        route: Some(PathBuf::from("/usr/sbin/route")),
    }
}

/// Canned response to a command line.
#[derive(Debug, Clone)]
pub enum Response {
    Stdout(String),
    Exit(i32),
}

/// Runs nothing; replays canned responses and records each call.
#[derive(Debug, Default)]
pub struct FixtureRunner {
    responses: Vec<(String, Response)>,
    calls: Mutex<Vec<String>>,
}

impl FixtureRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `command` (e.g. `route -n`) with the contents of a fixture.
    pub fn stdout_from(mut self, command: &str, fixture_name: &str) -> Self {
        self.responses
            .push((command.to_string(), Response::Stdout(fixture(fixture_name))));
        self
    }

    /// Answer `command` with a non-zero exit.
    pub fn exit(mut self, command: &str, code: i32) -> Self {
        self.responses
            .push((command.to_string(), Response::Exit(code)));
        self
    }

    /// Command lines executed so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for FixtureRunner {
    async fn execute(&self, binary: &Path, args: &[&str]) -> Result<CommandOutput> {
        let name = binary
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let line = format!("{} {}", name, args.join(" "));
        self.calls.lock().unwrap().push(line.clone());

        match self.responses.iter().find(|(cmd, _)| *cmd == line) {
            Some((_, Response::Stdout(out))) => Ok(CommandOutput {
                stdout: out.trim().to_string(),
                stderr: String::new(),
                code: 0,
            }),
            Some((_, Response::Exit(code))) => Err(Error::Execution {
                binary: binary.display().to_string(),
                args: args.iter().map(ToString::to_string).collect(),
                code: Some(*code),
                stdout: String::new(),
                stderr: format!("{}: exited with {}", name, code),
            }),
            None => panic!("unexpected command: {}", line),
        }
    }
}
