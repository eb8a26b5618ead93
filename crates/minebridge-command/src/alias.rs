//! Alias table: many literal tokens → one canonical command type.

use std::collections::HashMap;

use crate::GrammarError;

/// Case-insensitive lookup from a typed token to its command type.
///
/// Built once from configuration and never mutated afterwards. The first
/// alias configured for a command type is its *primary alias*, which is
/// what [`compile`](crate::CommandGrammar::compile_named) emits.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    by_alias: HashMap<String, String>,
    primary: HashMap<String, String>,
}

impl AliasTable {
    /// Builds the table from `(command type, ordered aliases)` pairs.
    ///
    /// Empty alias strings are skipped. A command type whose alias list is
    /// empty gets no primary alias.
    ///
    /// # Errors
    /// [`GrammarError::ConflictingAlias`] when two command types claim the
    /// same token. (Repeating a token within one command type is fine.)
    pub fn build<'a, I, A>(entries: I) -> Result<Self, GrammarError>
    where
        I: IntoIterator<Item = (&'a str, A)>,
        A: IntoIterator<Item = &'a str>,
    {
        let mut table = Self::default();

        for (command_type, aliases) in entries {
            for alias in aliases {
                let alias = alias.trim();
                if alias.is_empty() {
                    continue;
                }
                let key = alias.to_lowercase();
                match table.by_alias.get(&key) {
                    Some(existing) if existing != command_type => {
                        return Err(GrammarError::ConflictingAlias {
                            alias: key,
                            first: existing.clone(),
                            second: command_type.to_string(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        table.by_alias.insert(key, command_type.to_string());
                    }
                }
                table
                    .primary
                    .entry(command_type.to_string())
                    .or_insert_with(|| alias.to_string());
            }
        }

        Ok(table)
    }

    /// Resolves a typed token to its command type.
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.by_alias.get(&token.to_lowercase()).map(String::as_str)
    }

    /// The first configured alias for a command type.
    pub fn primary(&self, command_type: &str) -> Option<&str> {
        self.primary.get(command_type).map(String::as_str)
    }

    /// Returns `true` if at least one alias is configured for the type.
    pub fn has_command_type(&self, command_type: &str) -> bool {
        self.primary.contains_key(command_type)
    }

    /// Command types with at least one alias.
    pub fn command_types(&self) -> impl Iterator<Item = &str> {
        self.primary.keys().map(String::as_str)
    }

    /// Number of distinct alias tokens.
    pub fn len(&self) -> usize {
        self.by_alias.len()
    }

    /// Returns `true` if no aliases are configured.
    pub fn is_empty(&self) -> bool {
        self.by_alias.is_empty()
    }
}
