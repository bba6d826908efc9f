//! Interactive review loop
//!
//! Shows the recorded sessions, reads one command per line and executes it
//! against the registry, the option set and the retention policy. Quitting
//! applies the retention policy to whatever is left.

use log::warn;
use num_format::{Locale, ToFormattedString};
use std::io::{self, BufRead, Write};

use crate::domain::RetentionPolicy;
use crate::profiling::{SessionEntry, SessionRegistry, DEFAULT_VISUALIZER};
use crate::review::{parse_command, Command, PostProcessOptions};

/// Starting state for a review
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    pub visualizer: String,
    pub options: PostProcessOptions,
    pub retention: RetentionPolicy,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            visualizer: DEFAULT_VISUALIZER.to_string(),
            options: PostProcessOptions::default(),
            retention: RetentionPolicy::default(),
        }
    }
}

/// State left behind by a finished review, for persisting defaults
#[derive(Debug)]
pub struct ReviewOutcome {
    pub options: PostProcessOptions,
    pub retention: RetentionPolicy,
    pub registry: SessionRegistry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct InteractiveController<R, W> {
    registry: SessionRegistry,
    config: ReviewConfig,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InteractiveController<R, W> {
    pub fn new(registry: SessionRegistry, config: ReviewConfig, input: R, output: W) -> Self {
        Self { registry, config, input, output }
    }

    /// Prompt until the operator quits or input ends, then apply the
    /// retention policy to the remaining artifacts.
    ///
    /// # Errors
    /// Returns an error if reading input or writing the prompt fails
    pub fn run(mut self) -> io::Result<ReviewOutcome> {
        let mut line = String::new();
        loop {
            self.render()?;

            line.clear();
            let command = if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                Command::Quit
            } else {
                parse_command(&line)
            };

            if self.dispatch(command)? == Flow::Quit {
                break;
            }
        }

        if self.config.retention == RetentionPolicy::Delete {
            self.registry.delete_all();
        }

        Ok(ReviewOutcome {
            options: self.config.options,
            retention: self.config.retention,
            registry: self.registry,
        })
    }

    fn render(&mut self) -> io::Result<()> {
        for entry in self.registry.enumerate() {
            writeln!(self.output, "{}", format_entry(&entry))?;
        }
        writeln!(self.output, " -*: Set options (e.g., \"-web -show_from=BlockNode::Layout\")")?;
        writeln!(self.output, " +*: Add \"-*\" to the current options")?;
        writeln!(self.output, " /*: Remove \"-*\" from the current options")?;
        writeln!(self.output, "  s: Substitute strings in the current options (s/old/new/)")?;
        writeln!(self.output, "k/d: Keep or delete data after review (now: {})", self.config.retention)?;
        writeln!(self.output, "  q: Quit, ^C: Keep data and exit")?;
        write!(self.output, "Run \"{} {}\" for: ", self.config.visualizer, self.config.options)?;
        self.output.flush()
    }

    fn dispatch(&mut self, command: Command) -> io::Result<Flow> {
        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::SetOptions(tokens) => self.config.options.set(tokens),
            Command::AppendOptions(tokens) => self.config.options.append(tokens),
            Command::RemoveOptions(tokens) => {
                for token in tokens {
                    if !self.config.options.remove(&token) {
                        writeln!(
                            self.output,
                            "The \"{token}\" is not in the current options: {}",
                            self.config.options
                        )?;
                    }
                }
            }
            Command::Substitute { old, new } => self.config.options.substitute(&old, &new),
            Command::ToggleRetention(policy) => self.config.retention = policy,
            Command::RunReview { index, input } => self.review(index, &input)?,
            Command::Unrecognized(input) => writeln!(self.output, "\"{input}\" not recognized.")?,
        }
        Ok(Flow::Continue)
    }

    fn review(&mut self, index: usize, input: &str) -> io::Result<()> {
        let Some(session) = self.registry.get_mut(index) else {
            return writeln!(self.output, "\"{input}\" not recognized.");
        };

        if let Err(e) = session.post_process(&self.config.visualizer, self.config.options.tokens()) {
            warn!("{e}");
            return Ok(());
        }

        if self.config.retention == RetentionPolicy::Delete {
            if let Err(e) = self.registry.remove_at(index, RetentionPolicy::Delete) {
                warn!("{e}");
            }
        }
        Ok(())
    }
}

fn format_entry(entry: &SessionEntry) -> String {
    let marker = if entry.reviewed { '*' } else { ' ' };
    let size = entry
        .size
        .map_or_else(|| "unavailable".to_string(), |n| n.to_formatted_string(&Locale::en));
    format!("{marker} {}: {} {size:>11}", entry.index, entry.artifact.display())
}
