//! CLI argument definitions

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use crate::profiling::{DEFAULT_PROFILER, DEFAULT_VISUALIZER};
use crate::settings::Settings;

#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
#[command(
    name = "renderprof",
    about = "Profile browser renderer processes with perf from their first instruction",
    after_help = "\
EXAMPLES:
    renderprof -t out/Release/chrome                     Launch and profile every renderer
    renderprof -e cpu-clock -F 4000                      Software clock events (VMs)
    renderprof --pprof '-svg' -- https://example.com     Pass arguments through to the target"
)]
pub struct Args {
    /// Browser executable to launch (default: $OUT/chrome)
    #[arg(short, long, value_name = "PATH")]
    pub target: Option<PathBuf>,

    /// perf sampling frequency
    #[arg(short = 'F', long)]
    pub frequency: Option<u32>,

    /// Forget a saved sampling frequency and use perf's default
    #[arg(long, conflicts_with = "frequency")]
    pub no_frequency: bool,

    /// perf event source, e.g. cpu-clock where PMU counters are unavailable
    #[arg(short, long)]
    pub event: Option<String>,

    /// Forget a saved event source and use perf's default
    #[arg(long, conflicts_with = "event")]
    pub no_event: bool,

    /// Initial visualizer options, shell-quoted (e.g. "-web -show_from=Foo")
    #[arg(long, value_name = "OPTIONS", allow_hyphen_values = true)]
    pub pprof: Option<String>,

    /// Keep profile data after review
    #[arg(short, long)]
    pub keep: bool,

    /// Delete profile data after review, overriding a saved --keep
    #[arg(long, conflicts_with = "keep")]
    pub delete: bool,

    /// Settings file (default: ~/.config/renderprof.json)
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Profiler executable
    #[arg(long, default_value = DEFAULT_PROFILER)]
    pub perf: String,

    /// Visualizer executable
    #[arg(long, default_value = DEFAULT_VISUALIZER)]
    pub visualizer: String,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,

    /// Extra arguments for the target, after `--`
    #[arg(last = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

impl Args {
    /// Resolve the target path, falling back to `$OUT/chrome`
    ///
    /// # Errors
    /// Returns an error if neither `--target` nor `$OUT` is set
    pub fn target_path(&self) -> Result<PathBuf> {
        if let Some(target) = &self.target {
            return Ok(target.clone());
        }
        match std::env::var_os("OUT") {
            Some(out) => Ok(PathBuf::from(out).join("chrome")),
            None => bail!(
                "Missing required argument: --target\n\n\
                 Pass the browser executable with -t/--target, or set $OUT to its build directory."
            ),
        }
    }

    /// Overlay command-line values on persisted settings
    ///
    /// # Errors
    /// Returns an error if `--pprof` is not valid shell syntax
    pub fn apply_to(&self, settings: &mut Settings) -> Result<()> {
        if let Some(pprof) = &self.pprof {
            settings.pprof = shell_words::split(pprof)
                .with_context(|| format!("Invalid --pprof options: {pprof}"))?;
        }
        if self.no_frequency {
            settings.frequency = None;
        } else if self.frequency.is_some() {
            settings.frequency = self.frequency;
        }
        if self.no_event {
            settings.event = None;
        } else if self.event.is_some() {
            settings.event.clone_from(&self.event);
        }
        if self.delete {
            settings.keep = false;
        } else if self.keep {
            settings.keep = true;
        }
        Ok(())
    }
}
