//! Structured error types for renderprof
//!
//! Using thiserror for automatic Display implementation and error chaining.

use super::types::Pid;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// The target could not be started. Always fatal.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Target not found: {0}")]
    NotFound(PathBuf),

    #[error("Target is not an executable file: {0}")]
    NotExecutable(PathBuf),

    #[error("Failed to start {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures local to one profiling session.
#[derive(Error, Debug)]
pub enum ProfilerError {
    #[error("{tool} not found in PATH")]
    ToolNotFound { tool: String },

    #[error("{tool} failed: {status}")]
    ToolFailed { tool: String, status: ExitStatus },

    #[error("Session for pid {0} was deleted")]
    SessionDeleted(Pid),

    #[error("Pid {0} is already being profiled")]
    DuplicatePid(Pid),

    #[error("Failed to send SIGUSR1 to pid {pid}: {errno}")]
    Signal { pid: Pid, errno: nix::errno::Errno },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ProfilerError {
    /// Map a spawn failure of `tool` to `ToolNotFound` when the executable is missing.
    pub(crate) fn from_spawn(tool: &str, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            ProfilerError::ToolNotFound { tool: tool.to_string() }
        } else {
            ProfilerError::Io(err)
        }
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
