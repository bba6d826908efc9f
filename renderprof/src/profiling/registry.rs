//! Discovery-ordered collection of profiling sessions
//!
//! Indices are 1-based, as shown to the operator, and shift down after a
//! removal.

use log::warn;
use std::path::PathBuf;

use crate::domain::{Pid, ProfilerError, RetentionPolicy};
use crate::profiling::ProfilingSession;

/// One row of the review listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    pub index: usize,
    pub artifact: PathBuf,
    /// Artifact size in bytes; `None` when the file is missing
    pub size: Option<u64>,
    pub reviewed: bool,
}

#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Vec<ProfilingSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a session, keeping at most one per pid
    ///
    /// # Errors
    /// Returns [`ProfilerError::DuplicatePid`] if the pid is already registered
    pub fn push(&mut self, session: ProfilingSession) -> Result<(), ProfilerError> {
        if self.contains(session.pid()) {
            return Err(ProfilerError::DuplicatePid(session.pid()));
        }
        self.sessions.push(session);
        Ok(())
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.sessions.iter().any(|s| s.pid() == pid)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProfilingSession> {
        self.sessions.iter()
    }

    /// Wait for every profiler in discovery order.
    ///
    /// Failures are logged per session and do not stop the barrier.
    pub fn wait_all(&mut self) {
        for session in &mut self.sessions {
            if let Err(e) = session.wait() {
                warn!("Waiting for profiler of pid {} failed: {e}", session.pid());
            }
        }
    }

    /// Listing rows in display order
    pub fn enumerate(&self) -> Vec<SessionEntry> {
        self.sessions
            .iter()
            .enumerate()
            .map(|(i, session)| {
                let size = session.artifact_size();
                if size.is_none() {
                    warn!("{} not found", session.artifact_path().display());
                }
                SessionEntry {
                    index: i + 1,
                    artifact: session.artifact_path().to_path_buf(),
                    size,
                    reviewed: session.is_reviewed(),
                }
            })
            .collect()
    }

    pub fn get(&self, index: usize) -> Option<&ProfilingSession> {
        index.checked_sub(1).and_then(|i| self.sessions.get(i))
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ProfilingSession> {
        index.checked_sub(1).and_then(|i| self.sessions.get_mut(i))
    }

    /// Remove the session at `index`, deleting its artifact first under
    /// [`RetentionPolicy::Delete`]. Later sessions move up by one.
    ///
    /// Returns `Ok(None)` if there is no session at `index`.
    ///
    /// # Errors
    /// Returns an error if the artifact exists but cannot be removed; the
    /// session then stays registered
    pub fn remove_at(
        &mut self,
        index: usize,
        policy: RetentionPolicy,
    ) -> Result<Option<ProfilingSession>, ProfilerError> {
        let Some(session) = self.get_mut(index) else {
            return Ok(None);
        };
        if policy == RetentionPolicy::Delete {
            session.delete()?;
        }
        Ok(Some(self.sessions.remove(index - 1)))
    }

    /// Delete every remaining artifact, logging failures
    pub fn delete_all(&mut self) {
        for session in &mut self.sessions {
            if let Err(e) = session.delete() {
                warn!("Failed to delete {}: {e}", session.artifact_path().display());
            }
        }
    }
}
