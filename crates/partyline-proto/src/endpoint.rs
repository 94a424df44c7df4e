//! Room socket endpoint.
//!
//! Builds the socket URL for a room the way PartyKit hosts expect it:
//!
//! ```text
//! ws://localhost:1999/party/{room}?_pk={identity}
//! wss://example.partykit.dev/parties/{party}/{room}?_pk={identity}
//! ```

use std::fmt;

/// Default development host.
pub const DEFAULT_HOST: &str = "localhost:1999";

/// Default room.
pub const DEFAULT_ROOM: &str = "tic-tac-toe";

/// Hosts that are reached over plain `ws://` unless a scheme is given.
const LOCAL_HOSTS: &[&str] = &["localhost", "127.0.0.1", "0.0.0.0", "[::1]"];

/// Address of a room socket plus the identity presented on connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    room: String,
    party: Option<String>,
    identity: String,
}

impl Endpoint {
    /// Create an endpoint for `room` on `host`, connecting as `identity`.
    pub fn new(
        host: impl Into<String>,
        room: impl Into<String>,
        identity: impl Into<String>,
    ) -> Self {
        Self { host: host.into(), room: room.into(), party: None, identity: identity.into() }
    }

    /// Target a named party instead of the default one.
    #[must_use]
    pub fn with_party(mut self, party: impl Into<String>) -> Self {
        self.party = Some(party.into());
        self
    }

    /// Host, as configured (may include a scheme).
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Room identifier.
    pub fn room(&self) -> &str {
        &self.room
    }

    /// Named party. `None` for the default party.
    pub fn party(&self) -> Option<&str> {
        self.party.as_deref()
    }

    /// Identity presented to the room.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Full socket URL.
    pub fn url(&self) -> String {
        let (scheme, host) = split_scheme(&self.host);
        let host = host.trim_end_matches('/');
        let room = urlencoding::encode(&self.room);
        let identity = urlencoding::encode(&self.identity);

        match &self.party {
            Some(party) => {
                let party = urlencoding::encode(party);
                format!("{scheme}://{host}/parties/{party}/{room}?_pk={identity}")
            },
            None => format!("{scheme}://{host}/party/{room}?_pk={identity}"),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.room, self.host)
    }
}

/// Split an optional scheme off `host`, choosing one when absent.
fn split_scheme(host: &str) -> (&'static str, &str) {
    const PREFIXES: [(&str, &str); 4] =
        [("wss://", "wss"), ("https://", "wss"), ("ws://", "ws"), ("http://", "ws")];

    for (prefix, scheme) in PREFIXES {
        if let Some(rest) = host.strip_prefix(prefix) {
            return (scheme, rest);
        }
    }

    if is_local(host) { ("ws", host) } else { ("wss", host) }
}

fn is_local(host: &str) -> bool {
    LOCAL_HOSTS.iter().any(|local| {
        host.strip_prefix(local).is_some_and(|rest| rest.is_empty() || rest.starts_with(':'))
    })
}
