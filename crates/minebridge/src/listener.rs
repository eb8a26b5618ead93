//! Forwards locally typed moderation commands to the relay.

use std::collections::BTreeMap;
use std::sync::Arc;

use minebridge_command::{CommandGrammar, ParsedCommand};
use minebridge_protocol::{CommandExecuted, Envelope, actions};
use minebridge_router::Responder;

/// Executor name for commands typed on the server console.
pub const CONSOLE: &str = "CONSOLE";

/// Turns command lines into `command-executed` envelopes.
///
/// Lines that aren't configured commands are ignored, so every console or
/// chat command can be passed through [`process`](Self::process).
#[derive(Debug, Clone)]
pub struct CommandListener {
    grammar: Arc<CommandGrammar>,
    responder: Responder,
    server: String,
}

impl CommandListener {
    /// `server` is the local server name the envelopes are tagged with.
    pub fn new(grammar: Arc<CommandGrammar>, responder: Responder, server: impl Into<String>) -> Self {
        Self {
            grammar,
            responder,
            server: server.into(),
        }
    }

    /// Parses, validates and relays one command line.
    ///
    /// Returns `true` if a frame was queued.
    pub fn process(&self, line: &str, executor: &str) -> bool {
        let Some(command) = self.grammar.parse(line) else {
            return false;
        };
        if let Err(e) = self.grammar.validate(&command) {
            tracing::info!(
                command_type = command.command_type(),
                %executor,
                error = %e,
                "command not relayed"
            );
            return false;
        }

        let envelope = Envelope::with_body(
            actions::COMMAND_EXECUTED,
            CommandExecuted {
                command_type: command.command_type().to_string(),
                executor: executor.to_string(),
                args: self.arguments(&command),
            },
        )
        .server(self.server.as_str());

        match self.responder.send(&envelope) {
            Ok(()) => {
                tracing::info!(
                    command_type = command.command_type(),
                    %executor,
                    "relayed moderation command"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    command_type = command.command_type(),
                    error = %e,
                    "could not relay command"
                );
                false
            }
        }
    }

    /// Named parameters. A trailing optional parameter absorbs the
    /// remaining words so a free-text reason survives intact; a required
    /// last parameter takes a single word.
    fn arguments(&self, command: &ParsedCommand) -> BTreeMap<String, String> {
        let Some(syntax) = self.grammar.syntax(command.command_type()) else {
            return BTreeMap::new();
        };
        let last = syntax
            .params()
            .len()
            .checked_sub(1)
            .filter(|&i| !syntax.params()[i].required);

        syntax
            .params()
            .iter()
            .enumerate()
            .filter_map(|(i, param)| {
                let value = if Some(i) == last {
                    command.combined_named(&param.name)
                } else {
                    command.named(&param.name).map(str::to_string)
                };
                value
                    .filter(|v| !v.is_empty())
                    .map(|v| (param.name.clone(), v))
            })
            .collect()
    }
}
