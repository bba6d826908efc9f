//! Interactive command parsing
//!
//! A pure mapping from one input line to a [`Command`]; the controller
//! executes it.

use regex::Regex;
use std::sync::LazyLock;

use crate::domain::RetentionPolicy;

static SUBSTITUTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^s/([^/]+)/([^/]*)/?$").expect("substitute pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    /// Replace the option set
    SetOptions(Vec<String>),
    /// Append to the option set
    AppendOptions(Vec<String>),
    /// Remove tokens from the option set
    RemoveOptions(Vec<String>),
    /// Literal replace inside every option token
    Substitute { old: String, new: String },
    ToggleRetention(RetentionPolicy),
    /// Post-process the session at this 1-based index; `input` is the line as
    /// typed, for messages
    RunReview { index: usize, input: String },
    Unrecognized(String),
}

/// Parse one line of operator input.
///
/// `+` and `/` take their arguments with the leading `-` implied, so
/// `+show_from=Foo` appends `-show_from=Foo`; when a space follows the prefix
/// the arguments are taken as written (`+ -show_from=Foo`). Tokens are split
/// like a POSIX shell would, so quoted option values keep their spaces.
/// Only trailing whitespace is stripped; a line with leading blanks matches
/// no command.
pub fn parse_command(line: &str) -> Command {
    let line = line.trim_end();
    let unrecognized = || Command::Unrecognized(line.to_string());

    match line {
        "" | "q" | "x" => return Command::Quit,
        "k" => return Command::ToggleRetention(RetentionPolicy::Keep),
        "d" => return Command::ToggleRetention(RetentionPolicy::Delete),
        _ => {}
    }

    if line.starts_with('-') {
        return split(line).map_or_else(unrecognized, Command::SetOptions);
    }
    if let Some(rest) = line.strip_prefix('+') {
        return split_implied_dash(rest).map_or_else(unrecognized, Command::AppendOptions);
    }
    if let Some(rest) = line.strip_prefix('/') {
        return split_implied_dash(rest).map_or_else(unrecognized, Command::RemoveOptions);
    }
    if let Some(captures) = SUBSTITUTE_PATTERN.captures(line) {
        return Command::Substitute { old: captures[1].to_string(), new: captures[2].to_string() };
    }
    if let Ok(index) = line.parse::<usize>() {
        return Command::RunReview { index, input: line.to_string() };
    }
    unrecognized()
}

fn split(text: &str) -> Option<Vec<String>> {
    shell_words::split(text).ok()
}

fn split_implied_dash(rest: &str) -> Option<Vec<String>> {
    if rest.starts_with(char::is_whitespace) {
        split(rest)
    } else {
        split(&format!("-{rest}"))
    }
}
