//! Domain entities for BukkitTelnetClient settings.
//!
//! Entities are plain data.  They know nothing about markup; the mapping to
//! the settings document lives in [`crate::document::codec`].

/// Command shortcuts and server definitions.
pub mod entities;
