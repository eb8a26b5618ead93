//! What the client presents to the relay after every connect.

use minebridge_protocol::{ALL_SERVERS, Authenticate, Envelope, actions};

use crate::SessionError;

/// Relay password plus the logical server names this process speaks for.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    password: String,
    server_list: Vec<String>,
}

impl Credentials {
    /// # Errors
    /// - [`SessionError::EmptyPassword`]
    /// - [`SessionError::NoServers`]
    /// - [`SessionError::InvalidServerName`] for a blank name or `all`
    pub fn new(
        password: impl Into<String>,
        server_list: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, SessionError> {
        let password = password.into();
        if password.is_empty() {
            return Err(SessionError::EmptyPassword);
        }

        let server_list: Vec<String> = server_list.into_iter().map(Into::into).collect();
        if server_list.is_empty() {
            return Err(SessionError::NoServers);
        }
        if let Some(bad) = server_list
            .iter()
            .find(|s| s.trim().is_empty() || s.eq_ignore_ascii_case(ALL_SERVERS))
        {
            return Err(SessionError::InvalidServerName(bad.clone()));
        }

        Ok(Self {
            password,
            server_list,
        })
    }

    pub fn server_list(&self) -> &[String] {
        &self.server_list
    }

    /// The first configured server name; used as the origin of frames this
    /// process emits.
    pub fn primary_server(&self) -> &str {
        // `new` guarantees at least one entry.
        self.server_list.first().map_or("", String::as_str)
    }

    /// The `authenticate` envelope sent right after each connect.
    pub fn authenticate_envelope(&self) -> Envelope<Authenticate> {
        Envelope::with_body(
            actions::AUTHENTICATE,
            Authenticate {
                password: self.password.clone(),
                server_list: self.server_list.clone(),
            },
        )
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("password", &"<redacted>")
            .field("server_list", &self.server_list)
            .finish()
    }
}
