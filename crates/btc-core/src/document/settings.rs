//! Whole-document assembly and decoding for `settings.xml`.

use std::collections::HashSet;

use tracing::debug;

use crate::document::codec::{from_node, to_node, PlayerCommandCodec, SectionError, ServerCodec};
use crate::document::node::{Document, Element};
use crate::domain::entities::{PlayerCommandEntry, ServerEntry};

/// Tag of the settings document's root element.
pub const ROOT_TAG: &str = "configuration";

/// Outcome of decoding both sections of a settings document.
///
/// Each section is decoded independently; a failure in one never prevents the
/// other from being read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionReport {
    pub commands: Result<usize, SectionError>,
    pub servers: Result<usize, SectionError>,
}

impl SectionReport {
    /// `true` if either section failed.
    pub fn had_errors(&self) -> bool {
        self.commands.is_err() || self.servers.is_err()
    }

    /// The section failures, commands first.
    pub fn errors(&self) -> impl Iterator<Item = &SectionError> {
        [&self.commands, &self.servers]
            .into_iter()
            .filter_map(|result| result.as_ref().err())
    }
}

/// Builds `<configuration>` holding the command section followed by the
/// server section.
///
/// Servers are written in sorted order so that repeated writes of the same
/// set produce identical bytes regardless of hash iteration order.
pub fn build_settings_document(
    commands: &[PlayerCommandEntry],
    servers: &HashSet<ServerEntry>,
) -> Document {
    let mut sorted: Vec<&ServerEntry> = servers.iter().collect();
    sorted.sort();

    let mut root = Element::new(ROOT_TAG);
    root.push_child(to_node::<PlayerCommandCodec, _>(commands));
    root.push_child(to_node::<ServerCodec, _>(sorted));
    Document::new(root)
}

/// Normalizes `doc` and decodes both sections into the given collections.
///
/// See [`from_node`] for what happens to a collection when its section is
/// missing or broken.
pub fn read_settings_document(
    doc: &mut Document,
    commands: &mut Vec<PlayerCommandEntry>,
    servers: &mut HashSet<ServerEntry>,
) -> SectionReport {
    doc.normalize();

    let report = SectionReport {
        commands: from_node::<PlayerCommandCodec, _>(doc, commands),
        servers: from_node::<ServerCodec, _>(doc, servers),
    };
    debug!(?report, "decoded settings document");
    report
}
