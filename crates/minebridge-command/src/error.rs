//! Error types for the command grammar.
//!
//! These are all *configuration* faults: they surface while the alias and
//! syntax tables are being built, before anything connects. Parsing a
//! command line never errors; an unknown command is simply "no match".

/// Errors raised while building a [`CommandGrammar`](crate::CommandGrammar).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    /// A syntax line was empty (no primary form at all).
    #[error("empty syntax definition for command type `{0}`")]
    EmptySyntax(String),

    /// A parameter token was neither `<name>` nor `[name]`.
    #[error("malformed parameter `{token}` in syntax `{syntax}`")]
    MalformedParameter { syntax: String, token: String },

    /// A required parameter is declared after an optional one, e.g.
    /// `tempban <target> [reason] <duration>`. Positional binding would
    /// silently put the wrong value in `duration`, so the line is rejected.
    #[error(
        "required parameter `{required}` follows optional parameter \
         `{optional}` in syntax `{syntax}`"
    )]
    RequiredAfterOptional {
        syntax: String,
        optional: String,
        required: String,
    },

    /// The same parameter name appears twice in one syntax line.
    #[error("duplicate parameter `{name}` in syntax `{syntax}`")]
    DuplicateParameter { syntax: String, name: String },

    /// A command type has aliases configured but no syntax line.
    #[error("missing syntax definition for command type `{0}`")]
    MissingSyntax(String),

    /// A command type has a syntax line but no aliases, so it could never
    /// be typed or compiled.
    #[error("no aliases configured for command type `{0}`")]
    MissingAliases(String),

    /// One alias token is claimed by two different command types.
    #[error("alias `{alias}` is bound to both `{first}` and `{second}`")]
    ConflictingAlias {
        alias: String,
        first: String,
        second: String,
    },
}

/// Why a parsed command failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The command type has no syntax definition.
    #[error("unknown command type: {0}")]
    UnknownCommandType(String),

    /// A required parameter has no (or an empty) value. `usage` is the
    /// configured syntax line, ready to show to whoever typed the command.
    #[error("missing required parameter: {name}. Usage: {usage}")]
    MissingParameter { name: String, usage: String },
}
