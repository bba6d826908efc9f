//! The post-processing option set shared by every review

use std::fmt;

pub const DEFAULT_OPTIONS: [&str; 1] = ["-web"];

/// Ordered visualizer option tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostProcessOptions(Vec<String>);

impl Default for PostProcessOptions {
    fn default() -> Self {
        Self(DEFAULT_OPTIONS.iter().map(ToString::to_string).collect())
    }
}

impl PostProcessOptions {
    pub fn new(tokens: Vec<String>) -> Self {
        Self(tokens)
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub fn into_tokens(self) -> Vec<String> {
        self.0
    }

    pub fn set(&mut self, tokens: Vec<String>) {
        self.0 = tokens;
    }

    pub fn append(&mut self, tokens: Vec<String>) {
        self.0.extend(tokens);
    }

    /// Remove the first occurrence of `token`; false if it was not present
    pub fn remove(&mut self, token: &str) -> bool {
        match self.0.iter().position(|t| t == token) {
            Some(i) => {
                self.0.remove(i);
                true
            }
            None => false,
        }
    }

    /// Literal substring replacement inside every token
    pub fn substitute(&mut self, old: &str, new: &str) {
        for token in &mut self.0 {
            *token = token.replace(old, new);
        }
    }
}

impl fmt::Display for PostProcessOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&shell_words::join(&self.0))
    }
}
