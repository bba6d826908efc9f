//! Review phase: option editing, command parsing and the interactive loop

pub mod command;
pub mod controller;
pub mod options;

pub use command::{parse_command, Command};
pub use controller::{InteractiveController, ReviewConfig, ReviewOutcome};
pub use options::{PostProcessOptions, DEFAULT_OPTIONS};
