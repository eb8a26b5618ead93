//! Remote command execution: `dispatch-command`, `command-executed`.

use std::collections::HashMap;
use std::sync::Arc;

use minebridge_command::CommandGrammar;
use minebridge_protocol::{CommandExecuted, DispatchCommand, Envelope, ServerTarget, actions};
use minebridge_router::{ActionModule, HandlerError, ModuleBindings};

use crate::Platform;

/// Runs relay-issued commands on the platform.
///
/// The envelope's `server` picks where: `all` runs on every server, a name
/// on that server, no `server` on the local console.
pub struct CommandActions<P> {
    platform: Arc<P>,
    grammar: Arc<CommandGrammar>,
}

impl<P: Platform> CommandActions<P> {
    pub fn new(platform: Arc<P>, grammar: Arc<CommandGrammar>) -> Self {
        Self { platform, grammar }
    }

    fn dispatch(&self, env: Envelope<DispatchCommand>) -> Result<(), HandlerError> {
        let target = env.target();
        let commands: Vec<&str> = env
            .body
            .commands
            .iter()
            .map(String::as_str)
            .filter(|c| !c.trim().is_empty())
            .collect();

        let mut first_error = None;
        for command in commands {
            if let Err(e) = self.run(target.as_ref(), command) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn executed(&self, env: Envelope<CommandExecuted>) -> Result<(), HandlerError> {
        let command_type = env.body.command_type.to_lowercase();
        let args: HashMap<&str, &str> = env
            .body
            .args
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        let Some(line) = self.grammar.compile_named(&command_type, &args) else {
            tracing::debug!(
                %command_type,
                executor = %env.body.executor,
                "cannot compile executed command"
            );
            return Ok(());
        };

        tracing::info!(
            %command_type,
            executor = %env.body.executor,
            target = ?env.server,
            "running relayed moderation command"
        );
        self.run(env.target().as_ref(), &line)
    }

    /// Runs one line on the target, collecting the first failure when the
    /// target is every server.
    fn run(&self, target: Option<&ServerTarget>, line: &str) -> Result<(), HandlerError> {
        match target {
            None => self.platform.dispatch_command(None, line),
            Some(ServerTarget::Named(server)) => self.platform.dispatch_command(Some(server), line),
            Some(ServerTarget::All) => {
                let mut first_error = None;
                for server in self.platform.server_names() {
                    if let Err(e) = self.platform.dispatch_command(Some(&server), line) {
                        tracing::warn!(%server, error = %e, "command dispatch failed");
                        first_error.get_or_insert(e);
                    }
                }
                first_error.map_or(Ok(()), Err)
            }
        }
    }
}

impl<P: Platform> ActionModule for CommandActions<P> {
    fn bindings(b: &mut ModuleBindings<Self>) {
        b.on(actions::DISPATCH_COMMAND, Self::dispatch)
            .on(actions::COMMAND_EXECUTED, Self::executed);
    }
}
