//! Declarative syntax lines: `ban <target> [reason]`.
//!
//! The first token is the primary form of the command and is ignored for
//! binding purposes; each following token declares one parameter. Angle
//! brackets mark a required parameter, square brackets an optional one.

use std::fmt;
use std::str::FromStr;

use crate::GrammarError;

/// One declared parameter of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxParam {
    /// Lowercased parameter name (`target`, `duration`, ...).
    pub name: String,
    /// `true` for `<name>`, `false` for `[name]`.
    pub required: bool,
}

/// The ordered parameter list of one command type, plus the original
/// line so it can be shown back as a usage hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxDefinition {
    usage: String,
    params: Vec<SyntaxParam>,
}

impl SyntaxDefinition {
    /// Parses a syntax line.
    ///
    /// # Errors
    /// - [`GrammarError::EmptySyntax`] for a blank line
    /// - [`GrammarError::MalformedParameter`] for a token that isn't
    ///   bracketed
    /// - [`GrammarError::RequiredAfterOptional`] when `<x>` follows `[y]`
    /// - [`GrammarError::DuplicateParameter`] for a repeated name
    pub fn parse(line: &str) -> Result<Self, GrammarError> {
        let mut tokens = line.split_whitespace();
        if tokens.next().is_none() {
            return Err(GrammarError::EmptySyntax(line.to_string()));
        }

        let mut params: Vec<SyntaxParam> = Vec::new();
        let mut first_optional: Option<String> = None;

        for token in tokens {
            let (name, required) = if let Some(inner) =
                token.strip_prefix('<').and_then(|t| t.strip_suffix('>'))
            {
                (inner, true)
            } else if let Some(inner) =
                token.strip_prefix('[').and_then(|t| t.strip_suffix(']'))
            {
                (inner, false)
            } else {
                return Err(GrammarError::MalformedParameter {
                    syntax: line.to_string(),
                    token: token.to_string(),
                });
            };

            if name.is_empty() {
                return Err(GrammarError::MalformedParameter {
                    syntax: line.to_string(),
                    token: token.to_string(),
                });
            }

            let name = name.to_lowercase();
            if params.iter().any(|p| p.name == name) {
                return Err(GrammarError::DuplicateParameter {
                    syntax: line.to_string(),
                    name,
                });
            }

            match (&first_optional, required) {
                (Some(optional), true) => {
                    return Err(GrammarError::RequiredAfterOptional {
                        syntax: line.to_string(),
                        optional: optional.clone(),
                        required: name,
                    });
                }
                (None, false) => first_optional = Some(name.clone()),
                _ => {}
            }

            params.push(SyntaxParam { name, required });
        }

        Ok(Self {
            usage: line.trim().to_string(),
            params,
        })
    }

    /// The configured line, e.g. `tempban <target> <duration> [reason]`.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Declared parameters in order.
    pub fn params(&self) -> &[SyntaxParam] {
        &self.params
    }

    /// Number of `<required>` parameters.
    pub fn required_count(&self) -> usize {
        self.params.iter().filter(|p| p.required).count()
    }

    /// Position of a parameter by (case-insensitive) name.
    pub fn position(&self, name: &str) -> Option<usize> {
        let name = name.to_lowercase();
        self.params.iter().position(|p| p.name == name)
    }
}

impl FromStr for SyntaxDefinition {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SyntaxDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.usage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_marks_required_and_optional() {
        let def = SyntaxDefinition::parse("tempban <target> <duration> [reason]")
            .unwrap();
        let names: Vec<_> = def.params().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["target", "duration", "reason"]);
        assert!(def.params()[0].required);
        assert!(def.params()[1].required);
        assert!(!def.params()[2].required);
        assert_eq!(def.required_count(), 2);
    }

    #[test]
    fn test_parse_lowercases_names() {
        let def = SyntaxDefinition::parse("kick <Target>").unwrap();
        assert_eq!(def.params()[0].name, "target");
        assert_eq!(def.position("TARGET"), Some(0));
    }

    #[test]
    fn test_parse_command_without_parameters() {
        let def = SyntaxDefinition::parse("reload").unwrap();
        assert!(def.params().is_empty());
        assert_eq!(def.usage(), "reload");
    }

    #[test]
    fn test_parse_rejects_required_after_optional() {
        let err = SyntaxDefinition::parse("tempban <target> [reason] <duration>")
            .unwrap_err();
        assert_eq!(
            err,
            GrammarError::RequiredAfterOptional {
                syntax: "tempban <target> [reason] <duration>".into(),
                optional: "reason".into(),
                required: "duration".into(),
            }
        );
    }

    #[test]
    fn test_parse_rejects_unbracketed_token() {
        let err = SyntaxDefinition::parse("kick target").unwrap_err();
        assert!(matches!(err, GrammarError::MalformedParameter { .. }));
    }

    #[test]
    fn test_parse_rejects_empty_brackets() {
        let err = SyntaxDefinition::parse("kick <>").unwrap_err();
        assert!(matches!(err, GrammarError::MalformedParameter { .. }));
    }

    #[test]
    fn test_parse_rejects_duplicate_names() {
        let err = SyntaxDefinition::parse("kick <target> [target]").unwrap_err();
        assert!(matches!(err, GrammarError::DuplicateParameter { .. }));
    }

    #[test]
    fn test_parse_rejects_blank_line() {
        assert!(matches!(
            SyntaxDefinition::parse("   "),
            Err(GrammarError::EmptySyntax(_))
        ));
    }

    #[test]
    fn test_from_str_and_display() {
        let def: SyntaxDefinition = "ban <target> [reason]".parse().unwrap();
        assert_eq!(def.to_string(), "ban <target> [reason]");
    }
}
