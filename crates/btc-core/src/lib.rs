//! # btc-core
//!
//! Shared library for BukkitTelnetClient containing the settings entities and
//! the markup codec that maps them to and from the `settings.xml` document.
//!
//! This crate never touches the file system.  Reading and writing the
//! settings file, provisioning the bundled default and migrating the legacy
//! server list live in the `btc-client` crate.
//!
//! # Architecture overview
//!
//! - **`domain`** – Plain data records: [`PlayerCommandEntry`] (a named
//!   command template) and [`ServerEntry`] (a known remote server).
//!
//! - **`document`** – A small owned element tree ([`Document`], [`Element`])
//!   parsed and written with `quick-xml`, the per-entity [`EntityCodec`]
//!   describing how each record type maps to elements, and the
//!   whole-document helpers used by the settings store.

pub mod document;
pub mod domain;

pub use document::codec::{
    from_node, to_node, EntityCodec, EntityCollection, PlayerCommandCodec, SectionError,
    ServerCodec,
};
pub use document::node::{Document, DocumentError, Element, Node};
pub use document::settings::{build_settings_document, read_settings_document, SectionReport};
pub use domain::entities::{PlayerCommandEntry, ServerEntry, LEGACY_SERVER_NAME};
