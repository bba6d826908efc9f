use renderprof::domain::{LaunchError, Pid, ProfilerError, RetentionPolicy, SessionState};
use renderprof::launcher;
use renderprof::profiling::{record_paused_renderers, RecordOptions, ResumeSignal};
use renderprof::review::{InteractiveController, PostProcessOptions, ReviewConfig};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Stands in for SIGUSR1 delivery; the pids in these tests are not real processes
#[derive(Default)]
struct RecordingResumer {
    pids: Vec<Pid>,
}

impl ResumeSignal for RecordingResumer {
    fn resume(&mut self, pid: Pid) -> Result<(), ProfilerError> {
        self.pids.push(pid);
        Ok(())
    }
}

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A browser that pauses the given renderers, with log noise around them
fn fake_target(dir: &Path, pids: &[i32]) -> PathBuf {
    let mut body = String::from("echo \"browser starting\"\necho \"warning: gpu\" >&2\n");
    for pid in pids {
        body.push_str(&format!(
            "echo \"[0101/000000.000:ERROR:content_main.cc(42)] Renderer ({pid}) paused waiting for debugger to attach. Send SIGUSR1 to unpause.\"\n"
        ));
    }
    body.push_str("printf 'no trailing newline'\n");
    write_script(dir, "chrome", &body)
}

/// A perf that logs its arguments and writes a small artifact to `-o`
fn fake_perf(dir: &Path) -> PathBuf {
    let log = dir.join("perf.log");
    write_script(
        dir,
        "perf",
        &format!(
            "echo \"$*\" >> '{}'\nout=\"\"\nwhile [ $# -gt 0 ]; do\n  if [ \"$1\" = \"-o\" ]; then out=\"$2\"; fi\n  shift\ndone\nprintf 'samples' > \"$out\"\n",
            log.display()
        ),
    )
}

/// A pprof that logs its arguments
fn fake_pprof(dir: &Path) -> PathBuf {
    let log = dir.join("pprof.log");
    write_script(dir, "pprof", &format!("echo \"$*\" >> '{}'\n", log.display()))
}

fn record_options(dir: &Path) -> RecordOptions {
    RecordOptions {
        profiler: fake_perf(dir).to_string_lossy().into_owned(),
        event: Some("cpu-clock".to_string()),
        output_dir: dir.to_path_buf(),
        ..RecordOptions::default()
    }
}

#[test]
fn test_single_renderer_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let target = fake_target(dir.path(), &[4242]);
    let options = record_options(dir.path());
    let mut resumer = RecordingResumer::default();

    // Discovery
    let mut handle = launcher::start(&target, &[]).unwrap();
    let mut echo = Vec::new();
    let mut registry =
        record_paused_renderers(handle.output(), &mut echo, &options, &mut resumer).unwrap();
    assert!(handle.finish().unwrap().success());

    let echo = String::from_utf8(echo).unwrap();
    assert!(echo.contains("browser starting\n"));
    assert!(echo.contains("warning: gpu\n"));
    assert!(echo.ends_with("no trailing newline"));
    assert_eq!(resumer.pids, vec![Pid(4242)]);

    // Recording barrier
    registry.wait_all();
    let artifact = dir.path().join("perf-4242.data");
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get(1).unwrap().state(), SessionState::Recorded);
    assert_eq!(registry.get(1).unwrap().artifact_path(), artifact);
    assert_eq!(fs::read_to_string(&artifact).unwrap(), "samples");

    let perf_log = fs::read_to_string(dir.path().join("perf.log")).unwrap();
    assert_eq!(
        perf_log.trim(),
        format!("record -g -p 4242 -o {} -e cpu-clock", artifact.display())
    );

    // Review: keep while reviewing, then switch to delete and quit
    let config = ReviewConfig {
        visualizer: fake_pprof(dir.path()).to_string_lossy().into_owned(),
        options: PostProcessOptions::default(),
        retention: RetentionPolicy::Keep,
    };
    let mut output = Vec::new();
    let outcome =
        InteractiveController::new(registry, config, "1\nd\nq\n".as_bytes(), &mut output)
            .run()
            .unwrap();

    let output = String::from_utf8(output).unwrap();
    assert!(output.contains(&format!("* 1: {}", artifact.display())));
    let pprof_log = fs::read_to_string(dir.path().join("pprof.log")).unwrap();
    assert_eq!(pprof_log.trim(), format!("-web {}", artifact.display()));

    assert_eq!(outcome.retention, RetentionPolicy::Delete);
    assert!(outcome.registry.get(1).unwrap().is_reviewed());
    assert!(!artifact.exists());
}

#[test]
fn test_multiple_renderers_keep_discovery_order() {
    let dir = tempfile::tempdir().unwrap();
    let target = fake_target(dir.path(), &[31, 12, 57]);
    let options = record_options(dir.path());
    let mut resumer = RecordingResumer::default();

    let mut handle = launcher::start(&target, &[]).unwrap();
    let mut registry =
        record_paused_renderers(handle.output(), &mut Vec::new(), &options, &mut resumer)
            .unwrap();
    handle.finish().unwrap();
    registry.wait_all();

    assert_eq!(resumer.pids, vec![Pid(31), Pid(12), Pid(57)]);
    let listed: Vec<PathBuf> = registry.enumerate().into_iter().map(|e| e.artifact).collect();
    assert_eq!(
        listed,
        vec![
            dir.path().join("perf-31.data"),
            dir.path().join("perf-12.data"),
            dir.path().join("perf-57.data"),
        ]
    );

    // Reviewing index 1 under the delete policy renumbers the rest
    let config = ReviewConfig {
        visualizer: fake_pprof(dir.path()).to_string_lossy().into_owned(),
        options: PostProcessOptions::default(),
        retention: RetentionPolicy::Delete,
    };
    let outcome = InteractiveController::new(registry, config, "1\nk\nq\n".as_bytes(), Vec::new())
        .run()
        .unwrap();

    assert!(!dir.path().join("perf-31.data").exists());
    assert_eq!(outcome.registry.len(), 2);
    assert_eq!(outcome.registry.get(1).unwrap().pid(), Pid(12));
    assert!(dir.path().join("perf-12.data").exists());
    assert!(dir.path().join("perf-57.data").exists());
}

#[test]
fn test_target_without_pauses_yields_empty_review() {
    let dir = tempfile::tempdir().unwrap();
    let target = fake_target(dir.path(), &[]);
    let mut resumer = RecordingResumer::default();

    let mut handle = launcher::start(&target, &[]).unwrap();
    let registry = record_paused_renderers(
        handle.output(),
        &mut Vec::new(),
        &record_options(dir.path()),
        &mut resumer,
    )
    .unwrap();
    handle.finish().unwrap();

    assert!(registry.is_empty());
    assert!(resumer.pids.is_empty());

    let outcome =
        InteractiveController::new(registry, ReviewConfig::default(), "\n".as_bytes(), Vec::new())
            .run()
            .unwrap();
    assert!(outcome.registry.is_empty());
}

#[test]
fn test_unlaunchable_target_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let not_executable = dir.path().join("chrome");
    fs::write(&not_executable, "plain text").unwrap();

    assert!(matches!(
        launcher::start(&not_executable, &[]),
        Err(LaunchError::NotExecutable(_))
    ));
    assert!(matches!(
        launcher::start(&dir.path().join("missing"), &[]),
        Err(LaunchError::NotFound(_))
    ));
}
