//! Command strings
//!
//! A command addresses one verb on a selection: `<selector>.<verb>`, e.g.
//! `Greeter.build` or `GccV2:cross.install`. The verb is everything after
//! the last `.`, so ids may contain dots.

use crate::core::artifact::Verb;
use crate::error::CommandError;

/// Parsed `<selector>.<verb>` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Artifact selector
    pub selector: String,
    /// Verb to dispatch
    pub verb: Verb,
}

impl Command {
    /// Parse a command string
    pub fn parse(command: &str) -> Result<Self, CommandError> {
        match command.rsplit_once('.') {
            Some((selector, verb)) if !selector.is_empty() && !verb.is_empty() => Ok(Self {
                selector: selector.to_string(),
                verb: Verb::parse(verb),
            }),
            _ => Err(CommandError::Malformed {
                command: command.to_string(),
            }),
        }
    }

    /// Command string for `verb` on `selector`
    pub fn format(selector: &str, verb: &Verb) -> String {
        format!("{selector}.{verb}")
    }
}
