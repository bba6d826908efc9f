//! Pause announcement watcher
//!
//! Renderers started with `--renderer-startup-dialog` print a fixed line and
//! stop until they receive `SIGUSR1`. The watcher echoes the target's output
//! untouched and reports each announcement as a [`PauseEvent`].

use log::warn;
use regex::Regex;
use std::io::{self, BufRead, Write};
use std::sync::LazyLock;

use crate::domain::{PauseEvent, Pid};

static PAUSE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"Renderer \((\d+)\) paused waiting for debugger to attach\. Send SIGUSR1 to unpause\.",
    )
    .expect("pause pattern is a valid regex")
});

/// Counters from one pass over the target's output
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WatchSummary {
    pub lines: usize,
    pub pauses: usize,
}

/// Extract the renderer pid from a pause announcement, if `line` is one
pub fn parse_pause_line(line: &str) -> Option<PauseEvent> {
    let captures = PAUSE_PATTERN.captures(line)?;
    let digits = &captures[1];
    match digits.parse::<i32>() {
        Ok(pid) if pid > 0 => Some(PauseEvent { pid: Pid(pid) }),
        _ => {
            warn!("Ignoring pause announcement with invalid pid {digits}");
            None
        }
    }
}

/// Read `output` to the end, echoing every line to `echo` and calling
/// `on_pause` for each announcement in the order it appears.
///
/// A final line without a terminator is still a line.
///
/// # Errors
/// Returns an error if reading the output or writing the echo fails
pub fn watch<R, W, F>(output: &mut R, echo: &mut W, mut on_pause: F) -> io::Result<WatchSummary>
where
    R: BufRead,
    W: Write,
    F: FnMut(PauseEvent),
{
    let mut summary = WatchSummary::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if output.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        summary.lines += 1;

        echo.write_all(&buf)?;
        echo.flush()?;

        if let Some(event) = parse_pause_line(&String::from_utf8_lossy(&buf)) {
            summary.pauses += 1;
            on_pause(event);
        }
    }
    Ok(summary)
}
