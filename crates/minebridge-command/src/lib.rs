//! Command grammar for MineBridge.
//!
//! Moderation commands travel between game servers in two shapes: a
//! human-typed line (`/k "Player One" spamming`) and a structured
//! `(command type, named parameters)` pair. This crate converts between
//! the two:
//!
//! - **Syntax** ([`SyntaxDefinition`]): declares the parameters of one
//!   command type, e.g. `tempban <target> <duration> [reason]`.
//! - **Aliases** ([`AliasTable`]): maps every typed token (`ban`, `eban`,
//!   `permban`) to its canonical command type.
//! - **Grammar** ([`CommandGrammar`]): parses lines into
//!   [`ParsedCommand`]s, validates them, and compiles parameters back into
//!   lines.
//!
//! The grammar is built once from configuration and is read-only
//! afterwards, so it can be shared across tasks behind an `Arc`.
//!
//! ```rust
//! use minebridge_command::CommandGrammar;
//!
//! let grammar = CommandGrammar::from_tables(
//!     [("kick", vec!["kick", "k"])],
//!     [("kick", "kick <target> [reason]")],
//! )
//! .unwrap();
//!
//! let cmd = grammar.parse(r#"/k "Player One" spamming"#).unwrap();
//! assert_eq!(cmd.command_type(), "kick");
//! assert_eq!(cmd.named("target"), Some("Player One"));
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod alias;
mod error;
mod grammar;
mod parsed;
mod syntax;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use alias::AliasTable;
pub use error::{GrammarError, ValidationError};
pub use grammar::{COMMAND_PREFIX, CommandGrammar};
pub use parsed::{ParsedCommand, tokenize};
pub use syntax::{SyntaxDefinition, SyntaxParam};
