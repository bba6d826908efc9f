//! Domain types providing compile-time safety and self-documentation
//!
//! These newtype wrappers keep renderer pids apart from the many other
//! integers flowing through the tool (indices, sizes, frequencies).

use std::fmt;

/// Process ID of a paused renderer.
///
/// Stored as `i32` because that is what `kill(2)` takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pid(pub i32);

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Pid> for nix::unistd::Pid {
    fn from(pid: Pid) -> Self {
        nix::unistd::Pid::from_raw(pid.0)
    }
}

/// A renderer announced that it is waiting for a debugger.
///
/// Produced once per matching output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauseEvent {
    pub pid: Pid,
}

/// Lifecycle of a profiling session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// `perf record` is attached and writing the artifact
    Recording,
    /// The profiler exited; the artifact is complete
    Recorded,
    /// The artifact was removed; the session accepts no further operations
    Deleted,
}

/// What happens to an artifact once it has been reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetentionPolicy {
    /// Keep artifacts on disk after review and at exit
    Keep,
    /// Delete an artifact right after its review, and all remaining ones at exit
    #[default]
    Delete,
}

impl RetentionPolicy {
    #[must_use]
    pub fn from_keep(keep: bool) -> Self {
        if keep {
            RetentionPolicy::Keep
        } else {
            RetentionPolicy::Delete
        }
    }

    #[must_use]
    pub fn is_keep(self) -> bool {
        matches!(self, RetentionPolicy::Keep)
    }
}

impl fmt::Display for RetentionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetentionPolicy::Keep => f.write_str("keep data after review"),
            RetentionPolicy::Delete => f.write_str("delete data after review"),
        }
    }
}
