//! Profiling core modules
//!
//! - Per-renderer profiling sessions (`perf record` lifecycle, review, deletion)
//! - The discovery-ordered session registry
//! - Resume signal delivery
//! - The discovery phase tying the watcher to sessions

pub mod discovery;
pub mod registry;
pub mod session;
pub mod signal;

// Re-export common types
pub use discovery::record_paused_renderers;
pub use registry::{SessionEntry, SessionRegistry};
pub use session::{ProfilingSession, RecordOptions, DEFAULT_PROFILER, DEFAULT_VISUALIZER};
pub use signal::{ResumeSignal, Sigusr1};
