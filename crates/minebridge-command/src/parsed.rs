//! Tokenizer and the immutable result of parsing one command line.

use std::fmt;

use crate::SyntaxDefinition;

/// A command line after alias resolution and tokenization.
///
/// Positional parameters are kept verbatim; the first N of them are also
/// reachable by the names the command's [`SyntaxDefinition`] declares.
/// Values beyond the declared names stay positional only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    command_type: String,
    used_alias: String,
    parameters: Vec<String>,
    /// `names[i]` is the declared name of `parameters[i]`.
    names: Vec<String>,
}

impl ParsedCommand {
    pub(crate) fn new(
        command_type: String,
        used_alias: String,
        parameters: Vec<String>,
        syntax: Option<&SyntaxDefinition>,
    ) -> Self {
        let names = syntax
            .map(|s| {
                s.params()
                    .iter()
                    .zip(&parameters)
                    .map(|(p, _)| p.name.clone())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            command_type,
            used_alias,
            parameters,
            names,
        }
    }

    /// Canonical command type the alias resolved to.
    pub fn command_type(&self) -> &str {
        &self.command_type
    }

    /// The token exactly as typed (without the `/` prefix).
    pub fn used_alias(&self) -> &str {
        &self.used_alias
    }

    /// All positional parameters.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Positional parameter at `index`.
    pub fn parameter(&self, index: usize) -> Option<&str> {
        self.parameters.get(index).map(String::as_str)
    }

    pub fn has_parameter(&self, index: usize) -> bool {
        index < self.parameters.len()
    }

    /// Named parameter (case-insensitive).
    pub fn named(&self, name: &str) -> Option<&str> {
        self.named_index(name).map(|i| self.parameters[i].as_str())
    }

    pub fn named_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.named(name).unwrap_or(default)
    }

    pub fn has_named(&self, name: &str) -> bool {
        self.named_index(name).is_some()
    }

    /// Name → value pairs in declaration order.
    pub fn named_parameters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names
            .iter()
            .zip(&self.parameters)
            .map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Parameter `start` and everything after it, joined by single spaces.
    ///
    /// `ban PlayerX griefing the server` → `combined(1)` is
    /// `"griefing the server"`.
    pub fn combined(&self, start: usize) -> Option<String> {
        if start >= self.parameters.len() {
            return None;
        }
        Some(self.parameters[start..].join(" "))
    }

    /// Like [`combined`](Self::combined), starting at a named parameter.
    pub fn combined_named(&self, name: &str) -> Option<String> {
        self.combined(self.named_index(name)?)
    }

    fn named_index(&self, name: &str) -> Option<usize> {
        let name = name.to_lowercase();
        self.names.iter().position(|n| *n == name)
    }
}

impl fmt::Display for ParsedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ParsedCommand[type={}, alias={}, params={:?}]",
            self.command_type, self.used_alias, self.parameters
        )
    }
}

/// Splits a parameter string into values.
///
/// - whitespace outside quotes separates values; empty values are dropped
/// - `"..."` groups words into one value (the quotes themselves vanish)
/// - `\x` inserts `x` literally, including `\"` and `\\`
///
/// A trailing lone backslash is dropped; an unterminated quote runs to the
/// end of the input.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    values.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if !current.is_empty() {
        values.push(current);
    }

    values
}
