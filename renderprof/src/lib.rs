//! # renderprof - perf profiling for browser renderer processes
//!
//! Renderers are short-lived children of the browser, so attaching a profiler
//! by hand misses their startup. renderprof launches the browser with
//! `--renderer-startup-dialog`, which makes every renderer print its pid and
//! stop until it receives `SIGUSR1`. Each announcement gets a `perf record`
//! attached before the renderer is resumed.
//!
//! ## Phases
//!
//! ```text
//!  discovery                 recording                 review
//! ┌──────────────────┐      ┌──────────────────┐      ┌──────────────────────┐
//! │ launcher         │      │ wait_all()       │      │ InteractiveController│
//! │   └─▶ watcher    │─────▶│ barrier on every │─────▶│ pprof <opts> <file>  │
//! │ attach + SIGUSR1 │      │ perf record      │      │ keep / delete        │
//! └──────────────────┘      └──────────────────┘      └──────────────────────┘
//! ```
//!
//! Everything is synchronous and single-threaded. Announcements are handled in
//! the order their lines appear, and no artifact is touched before its
//! profiler has exited.
//!
//! ## Module Structure
//!
//! - [`launcher`]: start the target with the fixed flag set, merged output
//! - [`watcher`]: echo target output and detect pause announcements
//! - [`profiling`]: sessions, the session registry, resume signals, discovery
//! - [`review`]: command parsing, option editing, the interactive loop
//! - [`settings`]: persisted defaults
//! - [`preflight`]: target and tool checks
//! - [`cli`]: command-line arguments
//! - [`domain`]: core types and errors
//!
//! ## Typical Usage
//!
//! ```bash
//! # Profile every renderer of a local build
//! renderprof -t out/Release/chrome -- https://example.com
//!
//! # On a VM without PMU counters
//! renderprof -t out/Release/chrome -e cpu-clock
//! ```

pub mod cli;
pub mod domain;
pub mod launcher;
pub mod preflight;
pub mod profiling;
pub mod review;
pub mod settings;
pub mod watcher;
