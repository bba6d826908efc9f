//! Resuming paused renderers
//!
//! A renderer waiting at its startup dialog continues on `SIGUSR1`. Delivery
//! sits behind [`ResumeSignal`] so discovery can be exercised without real
//! processes.

use log::info;
use nix::sys::signal::{kill, Signal};

use crate::domain::{Pid, ProfilerError};

/// Wakes a renderer that announced a startup pause
pub trait ResumeSignal {
    /// # Errors
    /// Returns an error if the signal could not be delivered
    fn resume(&mut self, pid: Pid) -> Result<(), ProfilerError>;
}

/// Delivers POSIX `SIGUSR1` with `kill(2)`
#[derive(Debug, Default, Clone, Copy)]
pub struct Sigusr1;

impl ResumeSignal for Sigusr1 {
    fn resume(&mut self, pid: Pid) -> Result<(), ProfilerError> {
        kill(pid.into(), Signal::SIGUSR1).map_err(|errno| ProfilerError::Signal { pid, errno })?;
        info!("SIGUSR1 {pid}");
        Ok(())
    }
}
