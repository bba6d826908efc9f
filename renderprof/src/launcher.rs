//! Target process launcher
//!
//! Starts the browser with renderer startup pauses enabled and exposes its
//! merged stdout/stderr as a single buffered stream.

use log::info;
use std::io::{self, BufReader, PipeReader};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};

use crate::domain::LaunchError;
use crate::preflight::check_target_executable;

/// Flags appended to every target invocation, before passthrough arguments.
pub const TARGET_FLAGS: [&str; 6] = [
    "--renderer-startup-dialog",
    "--no-sandbox",
    "--no-first-run",
    "--no-default-browser-check",
    "--remote-debugging-port=9999",
    "--user-data-dir=/tmp/chromium",
];

/// A launched target and the read end of its combined output.
pub struct TargetHandle {
    child: Child,
    output: BufReader<PipeReader>,
}

impl TargetHandle {
    /// Combined stdout+stderr of the target (and any descendant inheriting it)
    pub fn output(&mut self) -> &mut BufReader<PipeReader> {
        &mut self.output
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Reap the target once its output is exhausted
    ///
    /// # Errors
    /// Returns an error if waiting on the child fails
    pub fn finish(mut self) -> io::Result<ExitStatus> {
        let status = self.child.wait()?;
        info!("Target exited: {status}");
        Ok(status)
    }
}

/// Full argument list for the target: fixed flags, then passthrough args
pub fn target_args(passthrough: &[String]) -> Vec<String> {
    TARGET_FLAGS.iter().map(ToString::to_string).chain(passthrough.iter().cloned()).collect()
}

/// Launch the target executable
///
/// stdin is the null device; stdout and stderr share one pipe.
///
/// # Errors
/// Returns a [`LaunchError`] if `path` is not an executable file or cannot be spawned
pub fn start(path: &Path, passthrough: &[String]) -> Result<TargetHandle, LaunchError> {
    let resolved = check_target_executable(path)?;
    let path = resolved.as_path();

    let args = target_args(passthrough);
    let mut command_line = vec![path.to_string_lossy().into_owned()];
    command_line.extend(args.iter().cloned());
    info!("Starting: {}", shell_words::join(&command_line));

    let spawn_error = |source: io::Error| match source.kind() {
        io::ErrorKind::NotFound => LaunchError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => LaunchError::NotExecutable(path.to_path_buf()),
        _ => LaunchError::Spawn { path: path.to_path_buf(), source },
    };

    let (reader, writer) = io::pipe().map_err(spawn_error)?;
    let stderr_writer = writer.try_clone().map_err(spawn_error)?;

    let mut command = Command::new(path);
    command.args(&args).stdin(Stdio::null()).stdout(writer).stderr(stderr_writer);
    let child = command.spawn().map_err(spawn_error)?;

    // The command still owns our copies of the write end; the stream only
    // reaches EOF once they are closed.
    drop(command);

    Ok(TargetHandle { child, output: BufReader::new(reader) })
}
