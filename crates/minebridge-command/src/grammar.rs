//! The command grammar: aliases + syntax, in both directions.
//!
//! ```text
//!   "/k \"Player One\" spam"  ──parse──▶  ParsedCommand { kick, [Player One, spam] }
//!                                              │
//!                     {target, reason} ◀───────┘ (named parameters)
//!                            │
//!                            └──compile──▶  "/kick \"Player One\" spam"
//! ```

use std::collections::HashMap;

use crate::parsed::tokenize;
use crate::{AliasTable, GrammarError, ParsedCommand, SyntaxDefinition, ValidationError};

/// Character that may precede the command token.
pub const COMMAND_PREFIX: char = '/';

/// Alias table plus one [`SyntaxDefinition`] per command type.
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct CommandGrammar {
    aliases: AliasTable,
    syntax: HashMap<String, SyntaxDefinition>,
}

impl CommandGrammar {
    /// Builds a grammar from configuration tables.
    ///
    /// `aliases` maps command type → ordered alias list (the first entry is
    /// the primary alias); `syntax` maps command type → syntax line.
    ///
    /// # Errors
    /// Any [`GrammarError`]: malformed syntax, a command type present in one
    /// table but not the other, or an alias claimed twice.
    pub fn from_tables<'a, A, S, L>(aliases: A, syntax: S) -> Result<Self, GrammarError>
    where
        A: IntoIterator<Item = (&'a str, L)>,
        L: IntoIterator<Item = &'a str>,
        S: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let aliases = AliasTable::build(aliases)?;

        let mut parsed = HashMap::new();
        for (command_type, line) in syntax {
            let def = SyntaxDefinition::parse(line).map_err(|e| match e {
                GrammarError::EmptySyntax(_) => {
                    GrammarError::EmptySyntax(command_type.to_string())
                }
                other => other,
            })?;
            parsed.insert(command_type.to_string(), def);
        }

        for command_type in aliases.command_types() {
            if !parsed.contains_key(command_type) {
                return Err(GrammarError::MissingSyntax(command_type.to_string()));
            }
        }
        for command_type in parsed.keys() {
            if !aliases.has_command_type(command_type) {
                return Err(GrammarError::MissingAliases(command_type.clone()));
            }
        }

        tracing::debug!(
            command_types = parsed.len(),
            aliases = aliases.len(),
            "command grammar built"
        );

        Ok(Self {
            aliases,
            syntax: parsed,
        })
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn syntax(&self, command_type: &str) -> Option<&SyntaxDefinition> {
        self.syntax.get(command_type)
    }

    /// The configured usage line for a command type.
    pub fn usage(&self, command_type: &str) -> Option<&str> {
        self.syntax(command_type).map(SyntaxDefinition::usage)
    }

    /// All command types this grammar knows.
    pub fn command_types(&self) -> impl Iterator<Item = &str> {
        self.syntax.keys().map(String::as_str)
    }

    /// Parses a console/chat command line.
    ///
    /// Returns `None` for an empty line or a command token no alias matches.
    pub fn parse(&self, line: &str) -> Option<ParsedCommand> {
        let line = line.strip_prefix(COMMAND_PREFIX).unwrap_or(line);
        if line.is_empty() {
            return None;
        }

        let (token, rest) = match line.find(char::is_whitespace) {
            Some(at) => {
                let (token, rest) = line.split_at(at);
                // Skip exactly the separator character; tokenize drops the rest.
                let sep_len = rest.chars().next().map_or(0, char::len_utf8);
                (token, &rest[sep_len..])
            }
            None => (line, ""),
        };

        let command_type = self.aliases.resolve(token)?;
        let parameters = tokenize(rest);

        Some(ParsedCommand::new(
            command_type.to_string(),
            token.to_string(),
            parameters,
            self.syntax(command_type),
        ))
    }

    /// Checks that every required parameter has a non-empty value.
    ///
    /// # Errors
    /// The first missing required parameter, in declaration order, with the
    /// usage line attached.
    pub fn validate(&self, command: &ParsedCommand) -> Result<(), ValidationError> {
        let def = self.syntax(command.command_type()).ok_or_else(|| {
            ValidationError::UnknownCommandType(command.command_type().to_string())
        })?;

        for param in def.params().iter().filter(|p| p.required) {
            let present = command.named(&param.name).is_some_and(|v| !v.is_empty());
            if !present {
                return Err(ValidationError::MissingParameter {
                    name: param.name.clone(),
                    usage: def.usage().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Builds a command line from name-keyed parameters.
    ///
    /// Parameters are emitted in declaration order. Keys are matched
    /// case-insensitively. Empty values count as absent. Returns `None` if
    /// the command type is unknown or a required parameter is absent.
    pub fn compile_named<K, V>(
        &self,
        command_type: &str,
        parameters: &HashMap<K, V>,
    ) -> Option<String>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let def = self.syntax(command_type)?;
        let alias = self.aliases.primary(command_type)?;

        let lookup: HashMap<String, &str> = parameters
            .iter()
            .map(|(k, v)| (k.as_ref().to_lowercase(), v.as_ref()))
            .collect();

        let mut line = format!("{COMMAND_PREFIX}{alias}");
        for param in def.params() {
            match lookup.get(&param.name).copied().filter(|v| !v.is_empty()) {
                Some(value) => {
                    line.push(' ');
                    push_quoted(&mut line, value);
                }
                None if param.required => return None,
                None => {}
            }
        }
        Some(line)
    }

    /// Builds a command line from positional parameters.
    ///
    /// Fails only if fewer values than required parameters are supplied.
    /// Every supplied value is appended, declared or not.
    pub fn compile_ordered<V>(&self, command_type: &str, parameters: &[V]) -> Option<String>
    where
        V: AsRef<str>,
    {
        let def = self.syntax(command_type)?;
        let alias = self.aliases.primary(command_type)?;

        if parameters.len() < def.required_count() {
            return None;
        }

        let mut line = format!("{COMMAND_PREFIX}{alias}");
        for value in parameters {
            line.push(' ');
            push_quoted(&mut line, value.as_ref());
        }
        Some(line)
    }
}

/// Appends `value`, wrapping it in quotes when the tokenizer would
/// otherwise split or alter it.
fn push_quoted(out: &mut String, value: &str) {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '\\');
    if !needs_quotes {
        out.push_str(value);
        return;
    }

    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}
