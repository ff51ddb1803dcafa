//! Running external commands.
//!
//! The [`CommandRunner`] trait is the seam between the plan/status logic
//! and process spawning. [`ProcessRunner`] runs real binaries with tokio;
//! tests substitute a scripted runner.
//!
//! [`BinaryPaths`] locates the `netplan`, `ip` and `route` executables.

use std::env;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::error::{Error, Result};

/// Directories searched in addition to `PATH`.
const EXTRA_SEARCH_DIRS: &[&str] = &["/sbin", "/usr/sbin"];

/// Captured output of a successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output, trimmed.
    pub stdout: String,
    /// Standard error, trimmed.
    pub stderr: String,
    /// Exit code (always 0 for a successful run).
    pub code: i32,
}

/// Executes external binaries.
pub trait CommandRunner {
    /// Run `binary` with `args` to completion.
    ///
    /// Fails with [`Error::BinaryNotFound`] if `binary` is empty and with
    /// [`Error::Execution`] if it exits non-zero.
    fn execute(
        &self,
        binary: &Path,
        args: &[&str],
    ) -> impl Future<Output = Result<CommandOutput>> + Send;
}

/// Runs commands as child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    async fn execute(&self, binary: &Path, args: &[&str]) -> Result<CommandOutput> {
        if binary.as_os_str().is_empty() {
            return Err(Error::BinaryNotFound(String::from("(empty path)")));
        }

        tracing::debug!(binary = %binary.display(), ?args, "executing");

        let output = Command::new(binary)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    Error::BinaryNotFound(binary.display().to_string())
                }
                _ => Error::Io(e),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        match output.status.code() {
            Some(0) => Ok(CommandOutput {
                stdout,
                stderr,
                code: 0,
            }),
            code => {
                tracing::debug!(binary = %binary.display(), ?code, %stderr, "command failed");
                Err(Error::Execution {
                    binary: binary.display().to_string(),
                    args: args.iter().map(ToString::to_string).collect(),
                    code,
                    stdout,
                    stderr,
                })
            }
        }
    }
}

/// An external tool used by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// The netplan generator/applier.
    Netplan,
    /// iproute2's `ip`.
    Ip,
    /// net-tools' `route`.
    Route,
}

impl Tool {
    /// Executable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Netplan => "netplan",
            Self::Ip => "ip",
            Self::Route => "route",
        }
    }
}

/// Resolved locations of the external tools.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryPaths {
    /// Path to `netplan`.
    pub netplan: Option<PathBuf>,
    /// Path to `ip`.
    pub ip: Option<PathBuf>,
    /// Path to `route`.
    pub route: Option<PathBuf>,
}

impl BinaryPaths {
    /// Search `PATH`, `/sbin` and `/usr/sbin`.
    pub fn discover() -> Self {
        let path = env::var_os("PATH").unwrap_or_default();
        Self::discover_in(env::split_paths(&path))
    }

    /// Search the given directories plus `/sbin` and `/usr/sbin`.
    ///
    /// Directories are searched in order; the first match wins.
    pub fn discover_in<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut search: Vec<PathBuf> = Vec::new();
        for dir in dirs
            .into_iter()
            .map(Into::into)
            .chain(EXTRA_SEARCH_DIRS.iter().map(PathBuf::from))
        {
            if !dir.as_os_str().is_empty() && !search.contains(&dir) {
                search.push(dir);
            }
        }

        let find = |tool: Tool| {
            search
                .iter()
                .map(|dir| dir.join(tool.name()))
                .find(|candidate| candidate.is_file())
        };

        let paths = Self {
            netplan: find(Tool::Netplan),
            ip: find(Tool::Ip),
            route: find(Tool::Route),
        };
        tracing::debug!(?paths, "discovered binaries");
        paths
    }

    /// Get the path for a tool, if it was found.
    pub fn get(&self, tool: Tool) -> Option<&Path> {
        match tool {
            Tool::Netplan => self.netplan.as_deref(),
            Tool::Ip => self.ip.as_deref(),
            Tool::Route => self.route.as_deref(),
        }
    }

    /// Set the path for a tool.
    pub fn set(&mut self, tool: Tool, path: impl Into<PathBuf>) {
        let slot = match tool {
            Tool::Netplan => &mut self.netplan,
            Tool::Ip => &mut self.ip,
            Tool::Route => &mut self.route,
        };
        *slot = Some(path.into());
    }

    /// Get the path for a tool or fail with [`Error::BinaryNotFound`].
    pub fn require(&self, tool: Tool) -> Result<&Path> {
        self.get(tool)
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| Error::BinaryNotFound(tool.name().to_string()))
    }
}

/// Run `binary` for `tool`, failing early if it was never located.
pub(crate) async fn run_tool<R: CommandRunner>(
    runner: &R,
    paths: &BinaryPaths,
    tool: Tool,
    args: &[&str],
) -> Result<CommandOutput> {
    let binary = paths.require(tool)?;
    runner.execute(binary, args).await
}
