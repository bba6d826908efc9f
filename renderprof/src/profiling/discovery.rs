//! Discovery phase: watch the target, attach, resume, register
//!
//! Runs synchronously with the target's output, so pause events are handled
//! strictly in the order their lines arrive.

use log::{info, warn};
use std::io::{self, BufRead, Write};

use crate::domain::PauseEvent;
use crate::profiling::{ProfilingSession, RecordOptions, ResumeSignal, SessionRegistry};
use crate::watcher;

/// Watch `output` until it ends and profile every renderer that pauses.
///
/// For each announcement the profiler is attached before the renderer is
/// resumed, so no early samples are lost. A profiler that fails to start only
/// affects its own renderer, which is still resumed.
///
/// # Errors
/// Returns an error if reading the target's output or echoing it fails
pub fn record_paused_renderers<R, W, S>(
    output: &mut R,
    echo: &mut W,
    options: &RecordOptions,
    resumer: &mut S,
) -> io::Result<SessionRegistry>
where
    R: BufRead,
    W: Write,
    S: ResumeSignal,
{
    let mut registry = SessionRegistry::new();

    let summary = watcher::watch(output, echo, |PauseEvent { pid }| {
        if registry.contains(pid) {
            warn!("Pid {pid} paused again; already profiled");
            return;
        }

        let session = match ProfilingSession::start(pid, options) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Cannot profile pid {pid}: {e}");
                None
            }
        };

        if let Err(e) = resumer.resume(pid) {
            warn!("{e}");
        }

        if let Some(session) = session {
            if let Err(e) = registry.push(session) {
                warn!("{e}");
            }
        }
    })?;

    info!("Target output closed: {} lines, {} paused renderers", summary.lines, summary.pauses);
    Ok(registry)
}
