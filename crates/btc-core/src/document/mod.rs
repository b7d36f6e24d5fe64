//! The `settings.xml` document: element tree, entity codecs and the
//! whole-document read/write helpers.

pub mod codec;
pub mod node;
pub mod settings;

pub use codec::{from_node, to_node, EntityCodec, PlayerCommandCodec, SectionError, ServerCodec};
pub use node::{Document, DocumentError, Element, Node};
pub use settings::{build_settings_document, read_settings_document, SectionReport, ROOT_TAG};
