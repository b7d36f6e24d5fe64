//! Settings entities: command shortcuts and known servers.

use serde::{Deserialize, Serialize};

/// Name given to every server imported from the legacy `btc_servers.cfg` list.
pub const LEGACY_SERVER_NAME: &str = "legacy";

/// A user-defined command shortcut.
///
/// `format` is the command template sent to the server, typically containing
/// a placeholder for the selected player (e.g. `"kick %s"`).  Entries are
/// immutable once built; the store replaces the whole list when reloading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerCommandEntry {
    name: String,
    format: String,
}

impl PlayerCommandEntry {
    pub fn new(name: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format: format.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> &str {
        &self.format
    }
}

/// A known remote server.
///
/// Two entries are the same server only if every field matches, which is what
/// lets the store keep them in a set and collapse exact duplicates.  The
/// derived ordering (name, address, flag) is used to write servers in a
/// stable order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServerEntry {
    /// Display label.
    pub name: String,
    /// `host[:port]` or any connection string the client understands.
    pub address: String,
    /// Application-defined marker (the client uses it to remember the last
    /// server it connected to).  The store only persists it.
    pub flag: bool,
}

impl ServerEntry {
    pub fn new(name: impl Into<String>, address: impl Into<String>, flag: bool) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            flag,
        }
    }

    /// Builds the entry used for one line of the legacy server list.
    pub fn legacy(address: impl Into<String>) -> Self {
        Self::new(LEGACY_SERVER_NAME, address, false)
    }
}
