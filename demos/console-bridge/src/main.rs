//! A bridge whose "game server" is this terminal.
//!
//! Relay chat shows up on stdout, relay commands are printed instead of
//! executed, and moderation commands typed on stdin are relayed.
//!
//! Run: `cargo run -p console-bridge -- --config minebridge.toml`
//! Then type: `/ban PlayerX griefing the server`

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use minebridge::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Console platform
// ---------------------------------------------------------------------------

/// One server, one player: the operator at the keyboard.
struct ConsolePlatform {
    server: String,
    operator: PlayerInfo,
}

impl ConsolePlatform {
    fn new(server: String, operator: &str) -> Self {
        let operator = PlayerInfo::new(operator, Uuid::new_v4()).on(server.clone());
        Self { server, operator }
    }
}

impl Platform for ConsolePlatform {
    fn find_player(&self, key: &PlayerKey) -> Option<PlayerInfo> {
        self.operator.matches(key).then(|| self.operator.clone())
    }

    fn online_players(&self) -> Vec<PlayerInfo> {
        vec![self.operator.clone()]
    }

    fn players_on(&self, server: &str) -> Option<Vec<PlayerInfo>> {
        (server == self.server).then(|| self.online_players())
    }

    fn server_names(&self) -> Vec<String> {
        vec![self.server.clone()]
    }

    fn deliver(&self, player: &PlayerInfo, text: &str) {
        println!("[to {}] {text}", player.name);
    }

    fn dispatch_command(&self, server: Option<&str>, line: &str) -> Result<(), HandlerError> {
        match server {
            Some(server) if server != self.server => {
                Err(HandlerError::Platform(format!("unknown server {server}")))
            }
            _ => {
                println!("[console] {line}");
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(name = "console-bridge", about = "Connect this terminal to a MineBridge relay")]
struct Args {
    /// Path to the TOML configuration.
    #[arg(short, long, default_value = "minebridge.toml")]
    config: PathBuf,

    /// Log filter; overrides `logging.level` (`RUST_LOG` overrides both).
    #[arg(long)]
    log_level: Option<String>,

    /// Name the relay sees for the player at this terminal.
    #[arg(long, default_value = "Operator")]
    operator: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = BridgeConfig::load(&args.config)?;
    minebridge::logging::init(args.log_level.as_deref().unwrap_or(&config.logging.level));

    let grammar = Arc::new(config.grammar()?);
    let server = config.credentials()?.primary_server().to_string();
    let platform = Arc::new(ConsolePlatform::new(server.clone(), &args.operator));

    let builder = BridgeClient::from_config(&config)?
        .register(MessageActions::new(platform.clone()))?
        .register(CommandActions::new(platform.clone(), grammar.clone()))?
        .register(PlayerActions::new(platform))?;
    let listener = CommandListener::new(grammar, builder.responder(), server);
    let client = builder.connect();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            () = client.wait_closed() => {
                tracing::error!("relay connection closed; exiting");
                break;
            }
            line = lines.next_line() => match line? {
                Some(line) if !line.trim().is_empty() => {
                    if !listener.process(&line, CONSOLE) {
                        tracing::info!(%line, "not relayed");
                    }
                }
                Some(_) => {}
                None => break,
            },
        }
    }

    client.close().await;
    Ok(())
}
