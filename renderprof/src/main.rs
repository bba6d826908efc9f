//! # renderprof - Main Entry Point
//!
//! Runs the three phases in order: discovery (launch and attach), recording
//! (wait for every profiler), review (interactive post-processing).

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::io;
use std::path::PathBuf;

use renderprof::cli::Args;
use renderprof::domain::{LaunchError, RetentionPolicy};
use renderprof::launcher;
use renderprof::preflight::run_preflight_checks;
use renderprof::profiling::{record_paused_renderers, RecordOptions, Sigusr1};
use renderprof::review::{InteractiveController, PostProcessOptions, ReviewConfig};
use renderprof::settings::Settings;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;
const EXIT_LAUNCH: i32 = 126;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<LaunchError>().is_some() {
        EXIT_LAUNCH
    } else if err.to_string().to_lowercase().contains("missing required argument") {
        EXIT_USAGE
    } else {
        EXIT_ERROR
    }
}

/// Load persisted settings; a broken file is reported and replaced by defaults
fn load_settings(path: Option<&PathBuf>) -> Settings {
    let Some(path) = path else {
        return Settings::default();
    };
    Settings::load(path).unwrap_or_else(|e| {
        warn!("{e}; using defaults");
        Settings::default()
    })
}

fn run() -> Result<()> {
    let args = Args::parse();
    let quiet = args.quiet;

    let settings_path = args.settings.clone().or_else(Settings::default_path);
    let mut settings = load_settings(settings_path.as_ref());
    args.apply_to(&mut settings)?;

    let target = args.target_path()?;
    let target =
        run_preflight_checks(&target, &[args.perf.as_str(), args.visualizer.as_str()])?;

    if !quiet {
        println!("renderprof v{}", env!("CARGO_PKG_VERSION"));
        println!("target: {}", target.display());
    }

    // ── Phase 1: launch the target, attach to each paused renderer ─────
    let mut handle = launcher::start(&target, &args.args)?;
    if !quiet {
        println!("pid: {}", handle.pid());
    }
    let record_options = RecordOptions {
        profiler: args.perf.clone(),
        frequency: settings.frequency,
        event: settings.event.clone(),
        ..RecordOptions::default()
    };
    let mut registry = {
        let mut echo = io::stdout().lock();
        record_paused_renderers(handle.output(), &mut echo, &record_options, &mut Sigusr1)
            .context("Failed to read target output")?
    };
    if let Err(e) = handle.finish() {
        warn!("Failed to reap target: {e}");
    }

    // ── Phase 2: wait until every profiler has written its artifact ─────
    info!("Waiting for {} profiler(s) to finish...", registry.len());
    registry.wait_all();

    // ── Phase 3: interactive review ─────────────────────────────────────
    let config = ReviewConfig {
        visualizer: args.visualizer.clone(),
        options: PostProcessOptions::new(settings.pprof.clone()),
        retention: RetentionPolicy::from_keep(settings.keep),
    };
    let controller =
        InteractiveController::new(registry, config, io::stdin().lock(), io::stdout().lock());
    let outcome = controller.run().context("Interactive review failed")?;

    settings.pprof = outcome.options.into_tokens();
    settings.keep = outcome.retention.is_keep();
    if let Some(path) = settings_path {
        if let Err(e) = settings.save(&path) {
            warn!("{e}");
        }
    }

    Ok(())
}
