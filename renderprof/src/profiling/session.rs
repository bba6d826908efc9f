//! One renderer's profiling session
//!
//! A session owns the `perf record` child attached to a renderer, the artifact
//! it writes, and the review/deletion operations performed on that artifact
//! afterwards.

use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command};

use crate::domain::{Pid, ProfilerError, SessionState};

pub const DEFAULT_PROFILER: &str = "perf";
pub const DEFAULT_VISUALIZER: &str = "pprof";

/// How `perf record` is invoked for each renderer
#[derive(Debug, Clone)]
pub struct RecordOptions {
    /// Profiler executable, looked up in `PATH`
    pub profiler: String,
    /// Sampling frequency (`-F`)
    pub frequency: Option<u32>,
    /// Event source (`-e`), e.g. `cpu-clock` where PMU counters are unavailable
    pub event: Option<String>,
    /// Directory for artifacts; empty means the working directory
    pub output_dir: PathBuf,
}

impl Default for RecordOptions {
    fn default() -> Self {
        Self {
            profiler: DEFAULT_PROFILER.to_string(),
            frequency: None,
            event: None,
            output_dir: PathBuf::new(),
        }
    }
}

impl RecordOptions {
    /// Artifact path for a renderer: `perf-<pid>.data` in the output directory
    pub fn artifact_path(&self, pid: Pid) -> PathBuf {
        self.output_dir.join(format!("perf-{pid}.data"))
    }

    /// Arguments passed to the profiler, without the program name
    pub fn record_args(&self, pid: Pid, artifact: &Path) -> Vec<String> {
        let mut args = vec![
            "record".to_string(),
            "-g".to_string(),
            "-p".to_string(),
            pid.to_string(),
            "-o".to_string(),
            artifact.to_string_lossy().into_owned(),
        ];
        if let Some(frequency) = self.frequency {
            args.extend(["-F".to_string(), frequency.to_string()]);
        }
        if let Some(event) = &self.event {
            args.extend(["-e".to_string(), event.clone()]);
        }
        args
    }
}

/// Profiling state for a single renderer
#[derive(Debug)]
pub struct ProfilingSession {
    pid: Pid,
    artifact: PathBuf,
    state: SessionState,
    reviewed: bool,
    recorder: Option<Child>,
}

impl ProfilingSession {
    /// Attach the profiler to `pid`. The caller resumes the renderer afterwards.
    ///
    /// # Errors
    /// Returns [`ProfilerError::ToolNotFound`] if the profiler is not installed
    pub fn start(pid: Pid, options: &RecordOptions) -> Result<Self, ProfilerError> {
        let artifact = options.artifact_path(pid);
        let args = options.record_args(pid, &artifact);

        let recorder = Command::new(&options.profiler)
            .args(&args)
            .spawn()
            .map_err(|e| ProfilerError::from_spawn(&options.profiler, e))?;

        let mut command_line = vec![options.profiler.clone()];
        command_line.extend(args);
        info!("Profiler for pid {pid} started: {}", shell_words::join(&command_line));

        Ok(Self {
            pid,
            artifact,
            state: SessionState::Recording,
            reviewed: false,
            recorder: Some(recorder),
        })
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_reviewed(&self) -> bool {
        self.reviewed
    }

    /// Size of the artifact on disk, `None` if it is missing
    pub fn artifact_size(&self) -> Option<u64> {
        fs::metadata(&self.artifact).ok().map(|m| m.len())
    }

    /// Block until the profiler exits. It stops on its own when the renderer does.
    ///
    /// # Errors
    /// Returns an error if the session was deleted or waiting fails
    pub fn wait(&mut self) -> Result<(), ProfilerError> {
        self.ensure_live()?;
        let Some(mut recorder) = self.recorder.take() else {
            return Ok(());
        };

        debug!("Waiting for profiler of pid {}...", self.pid);
        let status = recorder.wait()?;
        self.state = SessionState::Recorded;
        if status.success() {
            info!("Profile \"{}\" done.", self.artifact.display());
        } else {
            warn!("Profiler for pid {} exited with {status}", self.pid);
        }
        Ok(())
    }

    /// Run `visualizer <options...> <artifact>` and block until it exits.
    ///
    /// Marks the session reviewed only when the visualizer succeeds.
    ///
    /// # Errors
    /// Returns [`ProfilerError::ToolNotFound`] or [`ProfilerError::ToolFailed`]
    pub fn post_process(&mut self, visualizer: &str, options: &[String]) -> Result<(), ProfilerError> {
        self.ensure_live()?;

        let mut command_line = vec![visualizer.to_string()];
        command_line.extend(options.iter().cloned());
        command_line.push(self.artifact.to_string_lossy().into_owned());
        info!("Running {}", shell_words::join(&command_line));

        let status = Command::new(visualizer)
            .args(options)
            .arg(&self.artifact)
            .status()
            .map_err(|e| ProfilerError::from_spawn(visualizer, e))?;
        if !status.success() {
            return Err(ProfilerError::ToolFailed { tool: visualizer.to_string(), status });
        }

        self.reviewed = true;
        Ok(())
    }

    /// Remove the artifact. Idempotent; a missing file only logs a warning.
    ///
    /// A session still recording is joined first so the file is never removed
    /// under its writer.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed
    pub fn delete(&mut self) -> Result<(), ProfilerError> {
        if self.state == SessionState::Deleted {
            return Ok(());
        }
        if self.state == SessionState::Recording {
            self.wait()?;
        }

        match fs::remove_file(&self.artifact) {
            Ok(()) => info!("Deleted {}", self.artifact.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("{} not found", self.artifact.display());
            }
            Err(e) => return Err(e.into()),
        }
        self.state = SessionState::Deleted;
        Ok(())
    }

    fn ensure_live(&self) -> Result<(), ProfilerError> {
        if self.state == SessionState::Deleted {
            return Err(ProfilerError::SessionDeleted(self.pid));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `true` accepts any arguments and exits immediately, standing in for perf
    fn stub_options(dir: &Path) -> RecordOptions {
        RecordOptions { profiler: "true".to_string(), output_dir: dir.to_path_buf(), ..Default::default() }
    }

    fn recorded_session(dir: &Path, pid: i32) -> ProfilingSession {
        let mut session = ProfilingSession::start(Pid(pid), &stub_options(dir)).unwrap();
        session.wait().unwrap();
        fs::write(session.artifact_path(), b"profile").unwrap();
        session
    }

    #[test]
    fn test_artifact_path_in_working_directory() {
        let options = RecordOptions::default();
        assert_eq!(options.artifact_path(Pid(4242)), PathBuf::from("perf-4242.data"));
    }

    #[test]
    fn test_record_args() {
        let options = RecordOptions {
            frequency: Some(999),
            event: Some("cpu-clock".to_string()),
            ..Default::default()
        };
        let args = options.record_args(Pid(7), Path::new("perf-7.data"));
        assert_eq!(
            args,
            ["record", "-g", "-p", "7", "-o", "perf-7.data", "-F", "999", "-e", "cpu-clock"]
        );

        let plain = RecordOptions::default().record_args(Pid(7), Path::new("perf-7.data"));
        assert_eq!(plain, ["record", "-g", "-p", "7", "-o", "perf-7.data"]);
    }

    #[test]
    fn test_start_missing_profiler() {
        let options = RecordOptions {
            profiler: "renderprof-no-such-profiler".to_string(),
            ..Default::default()
        };
        let result = ProfilingSession::start(Pid(1), &options);
        assert!(matches!(result, Err(ProfilerError::ToolNotFound { .. })));
    }

    #[test]
    fn test_wait_transitions_to_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = ProfilingSession::start(Pid(5), &stub_options(dir.path())).unwrap();
        assert_eq!(session.state(), SessionState::Recording);

        session.wait().unwrap();
        assert_eq!(session.state(), SessionState::Recorded);

        // Second wait is a no-op
        session.wait().unwrap();
        assert_eq!(session.state(), SessionState::Recorded);
    }

    #[test]
    fn test_post_process_marks_reviewed() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = recorded_session(dir.path(), 10);

        session.post_process("true", &["-web".to_string()]).unwrap();
        assert!(session.is_reviewed());
        // Repeatable, artifact untouched
        session.post_process("true", &["-svg".to_string()]).unwrap();
        assert_eq!(session.artifact_size(), Some(7));
    }

    #[test]
    fn test_post_process_failures_leave_unreviewed() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = recorded_session(dir.path(), 11);

        let result = session.post_process("false", &[]);
        assert!(matches!(result, Err(ProfilerError::ToolFailed { .. })));
        assert!(!session.is_reviewed());

        let result = session.post_process("renderprof-no-such-visualizer", &[]);
        assert!(matches!(result, Err(ProfilerError::ToolNotFound { .. })));
        assert!(!session.is_reviewed());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = recorded_session(dir.path(), 12);
        let artifact = session.artifact_path().to_path_buf();

        session.delete().unwrap();
        assert!(!artifact.exists());
        assert_eq!(session.state(), SessionState::Deleted);

        session.delete().unwrap();
        assert_eq!(session.state(), SessionState::Deleted);
    }

    #[test]
    fn test_delete_externally_removed_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = recorded_session(dir.path(), 13);
        fs::remove_file(session.artifact_path()).unwrap();

        session.delete().unwrap();
        assert_eq!(session.state(), SessionState::Deleted);
        assert_eq!(session.artifact_size(), None);
    }

    #[test]
    fn test_deleted_session_rejects_operations() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = recorded_session(dir.path(), 14);
        session.delete().unwrap();

        assert!(matches!(session.wait(), Err(ProfilerError::SessionDeleted(Pid(14)))));
        assert!(matches!(
            session.post_process("true", &[]),
            Err(ProfilerError::SessionDeleted(_))
        ));
        assert!(!session.is_reviewed());
    }
}
