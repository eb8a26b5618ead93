//! Bridge configuration.
//!
//! Loaded once at startup from a TOML file. Every section has defaults,
//! so a file only needs the relay connection details:
//!
//! ```toml
//! [relay]
//! host = "relay.example.net"
//! port = 8443
//! password = "secret"
//! servers = ["lobby"]
//! ```
//!
//! The `[aliases]` and `[syntax]` tables default to the six moderation
//! commands. A table that is present replaces its defaults entirely.
//!
//! Any problem here is fatal: [`BridgeConfig::load`] validates everything
//! the client will later rely on, including building the command grammar.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use minebridge_command::{CommandGrammar, GrammarError};
use minebridge_session::{Credentials, ReconnectPolicy, SessionError};
use serde::{Deserialize, Serialize};

/// Errors raised while loading or validating the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or has fields of the wrong type.
    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),

    /// The alias and syntax tables don't form a grammar.
    #[error("invalid command grammar: {0}")]
    Grammar(#[from] GrammarError),

    /// Credentials or reconnect settings are unusable.
    #[error("invalid relay settings: {0}")]
    Session(#[from] SessionError),
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Complete bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub relay: RelaySettings,
    pub reconnect: ReconnectSettings,
    pub logging: LoggingSettings,
    /// Command type → aliases; the first alias is the primary form.
    pub aliases: BTreeMap<String, Vec<String>>,
    /// Command type → `name <required> [optional]` syntax line.
    pub syntax: BTreeMap<String, String>,
}

/// Where the relay is and how to authenticate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaySettings {
    pub host: String,
    pub port: u16,
    pub password: String,
    /// Logical server names this process speaks for.
    pub servers: Vec<String>,
    /// Directory holding `<host>.crt`.
    pub certs_dir: PathBuf,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 8443,
            password: String::new(),
            servers: Vec::new(),
            certs_dir: PathBuf::from("certs"),
        }
    }
}

/// Reconnect backoff, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectSettings {
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub max_attempts: u32,
    /// Fraction of the delay added as random jitter.
    pub jitter: f64,
}

impl Default for ReconnectSettings {
    fn default() -> Self {
        let policy = ReconnectPolicy::default();
        Self {
            initial_delay_ms: millis(policy.initial_delay),
            max_delay_ms: millis(policy.max_delay),
            max_attempts: policy.max_attempts,
            jitter: policy.jitter_ratio,
        }
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive; `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

/// The moderation commands every bridge understands out of the box.
const DEFAULT_COMMANDS: [(&str, &str); 6] = [
    ("kick", "kick <target> [reason]"),
    ("ban", "ban <target> [reason]"),
    ("tempban", "tempban <target> <duration> [reason]"),
    ("unban", "unban <target> [reason]"),
    ("timeout", "timeout <target> <duration> [reason]"),
    ("untimeout", "untimeout <target> [reason]"),
];

fn default_aliases() -> BTreeMap<String, Vec<String>> {
    DEFAULT_COMMANDS
        .iter()
        .map(|(command, _)| (command.to_string(), vec![command.to_string()]))
        .collect()
}

fn default_syntax() -> BTreeMap<String, String> {
    DEFAULT_COMMANDS
        .iter()
        .map(|(command, line)| (command.to_string(), line.to_string()))
        .collect()
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            relay: RelaySettings::default(),
            reconnect: ReconnectSettings::default(),
            logging: LoggingSettings::default(),
            aliases: default_aliases(),
            syntax: default_syntax(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl BridgeConfig {
    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    /// Any [`ConfigError`]. A missing file is an error: the relay host and
    /// password have no usable defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parses TOML without validating.
    ///
    /// # Errors
    /// [`ConfigError::Parse`].
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Checks every setting the client depends on.
    ///
    /// # Errors
    /// The first problem found, as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.relay.host.trim().is_empty() {
            return Err(ConfigError::Invalid("relay.host must not be empty".into()));
        }
        if self.relay.port == 0 {
            return Err(ConfigError::Invalid(
                "relay.port must be between 1 and 65535".into(),
            ));
        }
        tracing_subscriber::EnvFilter::try_new(&self.logging.level).map_err(|e| {
            ConfigError::Invalid(format!(
                "logging.level `{}` is not a valid filter: {e}",
                self.logging.level
            ))
        })?;

        self.credentials()?;
        self.policy()?;
        self.grammar()?;
        Ok(())
    }

    /// Relay password and server list.
    ///
    /// # Errors
    /// [`ConfigError::Session`] for an empty password, no servers, or a
    /// server named `all`.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        Ok(Credentials::new(
            self.relay.password.clone(),
            self.relay.servers.iter().cloned(),
        )?)
    }

    /// Reconnect backoff.
    ///
    /// # Errors
    /// [`ConfigError::Session`] if the policy is inconsistent.
    pub fn policy(&self) -> Result<ReconnectPolicy, ConfigError> {
        let policy = ReconnectPolicy {
            initial_delay: Duration::from_millis(self.reconnect.initial_delay_ms),
            max_delay: Duration::from_millis(self.reconnect.max_delay_ms),
            max_attempts: self.reconnect.max_attempts,
            jitter_ratio: self.reconnect.jitter,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Builds the command grammar from the alias and syntax tables.
    ///
    /// # Errors
    /// [`ConfigError::Grammar`].
    pub fn grammar(&self) -> Result<CommandGrammar, ConfigError> {
        let aliases = self
            .aliases
            .iter()
            .map(|(command, list)| (command.as_str(), list.iter().map(String::as_str)));
        let syntax = self
            .syntax
            .iter()
            .map(|(command, line)| (command.as_str(), line.as_str()));
        Ok(CommandGrammar::from_tables(aliases, syntax)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [relay]
        host = "relay.example.net"
        password = "hunter2"
        servers = ["lobby", "survival"]
    "#;

    #[test]
    fn test_minimal_file_gets_defaults() {
        let config = BridgeConfig::from_toml_str(MINIMAL).unwrap();
        config.validate().unwrap();

        assert_eq!(config.relay.port, 8443);
        assert_eq!(config.relay.certs_dir, PathBuf::from("certs"));
        assert_eq!(config.reconnect.initial_delay_ms, 5_000);
        assert_eq!(config.reconnect.max_delay_ms, 60_000);
        assert_eq!(config.reconnect.max_attempts, 10);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.aliases.len(), 6);
        assert_eq!(
            config.syntax.get("tempban").map(String::as_str),
            Some("tempban <target> <duration> [reason]")
        );
    }

    #[test]
    fn test_policy_and_credentials_from_file() {
        let text = format!(
            "{MINIMAL}\n[reconnect]\ninitial_delay_ms = 250\nmax_delay_ms = 1000\nmax_attempts = 3\njitter = 0.0\n"
        );
        let config = BridgeConfig::from_toml_str(&text).unwrap();

        let policy = config.policy().unwrap();
        assert_eq!(policy.initial_delay, Duration::from_millis(250));
        assert_eq!(policy.max_attempts, 3);

        let creds = config.credentials().unwrap();
        assert_eq!(creds.server_list(), ["lobby", "survival"]);
    }

    #[test]
    fn test_custom_command_tables() {
        let text = format!(
            "{MINIMAL}\n[aliases]\nkick = [\"kick\", \"k\"]\n[syntax]\nkick = \"kick <target> [reason]\"\n"
        );
        let config = BridgeConfig::from_toml_str(&text).unwrap();
        config.validate().unwrap();

        let grammar = config.grammar().unwrap();
        assert_eq!(grammar.command_types().count(), 1);
        assert_eq!(grammar.parse("/k Steve").unwrap().command_type(), "kick");
    }

    #[test]
    fn test_validation_failures() {
        let cases = [
            ("[relay]\npassword = \"pw\"\nservers = [\"lobby\"]", "host"),
            (
                "[relay]\nhost = \"h\"\nport = 0\npassword = \"pw\"\nservers = [\"lobby\"]",
                "port",
            ),
            ("[relay]\nhost = \"h\"\nservers = [\"lobby\"]", "password"),
            ("[relay]\nhost = \"h\"\npassword = \"pw\"", "server"),
            (
                "[relay]\nhost = \"h\"\npassword = \"pw\"\nservers = [\"all\"]",
                "all",
            ),
        ];
        for (text, needle) in cases {
            let config = BridgeConfig::from_toml_str(text).unwrap();
            let err = config.validate().unwrap_err();
            assert!(
                err.to_string().contains(needle),
                "expected `{needle}` in `{err}`"
            );
        }
    }

    #[test]
    fn test_alias_without_syntax_is_rejected() {
        let text = format!("{MINIMAL}\n[syntax]\nkick = \"kick <target> [reason]\"\n");
        let config = BridgeConfig::from_toml_str(&text).unwrap();
        // Default aliases cover six commands; syntax only one.
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Grammar(GrammarError::MissingSyntax(_)))
        ));
    }

    #[test]
    fn test_required_after_optional_is_rejected() {
        let text = format!(
            "{MINIMAL}\n[aliases]\ntempban = [\"tempban\"]\n[syntax]\ntempban = \"tempban <target> [reason] <duration>\"\n"
        );
        let config = BridgeConfig::from_toml_str(&text).unwrap();
        assert!(matches!(
            config.grammar(),
            Err(ConfigError::Grammar(
                GrammarError::RequiredAfterOptional { .. }
            ))
        ));
    }

    #[test]
    fn test_bad_jitter_is_rejected() {
        let text = format!("{MINIMAL}\n[reconnect]\njitter = 1.5\n");
        let config = BridgeConfig::from_toml_str(&text).unwrap();
        assert!(matches!(config.policy(), Err(ConfigError::Session(_))));
    }

    #[test]
    fn test_wrong_type_is_a_parse_error() {
        let err = BridgeConfig::from_toml_str("[relay]\nport = \"high\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minebridge.toml");
        std::fs::write(&path, MINIMAL).unwrap();
        let config = BridgeConfig::load(&path).unwrap();
        assert_eq!(config.relay.host, "relay.example.net");

        let missing = BridgeConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Read { .. }));
    }
}
