//! Mapping between settings entities and document elements.
//!
//! Each entity type gets a zero-sized codec implementing [`EntityCodec`],
//! which names its container/entry tags and converts one entity to and from
//! an entry element.  The generic [`to_node`] and [`from_node`] functions do
//! the collection-level work for every codec, so the entities themselves stay
//! plain data.
//!
//! # Partial failure
//!
//! [`from_node`] clears the destination as soon as the container is found and
//! then appends entries one by one.  If an entry is missing a field the
//! section is abandoned: entries before the broken one stay, everything after
//! it is lost.  A missing container leaves the destination untouched.

use std::collections::HashSet;
use std::hash::Hash;

use thiserror::Error;

use crate::document::node::{Document, Element};
use crate::domain::entities::{PlayerCommandEntry, ServerEntry};

/// Why one section of the settings document could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SectionError {
    /// The container element is not present anywhere under the root.
    #[error("missing <{container}> section")]
    MissingContainer { container: &'static str },

    /// An entry lacks one of its field elements.
    #[error("entry #{index} in <{container}> has no <{field}> element")]
    MissingField {
        container: &'static str,
        index: usize,
        field: &'static str,
    },
}

/// Describes how one entity type is laid out in the settings document.
pub trait EntityCodec {
    type Entity;

    /// Tag of the element wrapping every entry of this type.
    const CONTAINER_TAG: &'static str;
    /// Tag of each entry element.
    const ENTRY_TAG: &'static str;

    /// Builds the entry element for `entity`.
    fn encode(entity: &Self::Entity) -> Element;

    /// Reads one entity from an entry element.
    ///
    /// Returns the tag of the first missing field on failure.
    fn decode(entry: &Element) -> Result<Self::Entity, &'static str>;
}

/// A destination that [`from_node`] can clear and refill.
pub trait EntityCollection<T> {
    fn clear_entries(&mut self);
    fn push_entry(&mut self, entry: T);
}

impl<T> EntityCollection<T> for Vec<T> {
    fn clear_entries(&mut self) {
        self.clear();
    }

    fn push_entry(&mut self, entry: T) {
        self.push(entry);
    }
}

impl<T: Eq + Hash> EntityCollection<T> for HashSet<T> {
    fn clear_entries(&mut self) {
        self.clear();
    }

    fn push_entry(&mut self, entry: T) {
        self.insert(entry);
    }
}

/// Serializes `entities` into the codec's container element, in iteration
/// order.
pub fn to_node<'a, C, I>(entities: I) -> Element
where
    C: EntityCodec,
    C::Entity: 'a,
    I: IntoIterator<Item = &'a C::Entity>,
{
    let mut container = Element::new(C::CONTAINER_TAG);
    for entity in entities {
        container.push_child(C::encode(entity));
    }
    container
}

/// Replaces the contents of `destination` with the entries found in `doc`.
///
/// Returns the number of entries read.  Every element child of the container
/// is treated as an entry, whatever its tag.
///
/// # Errors
///
/// - [`SectionError::MissingContainer`]: `destination` is left untouched.
/// - [`SectionError::MissingField`]: `destination` has already been cleared
///   and holds only the entries preceding the broken one.
pub fn from_node<C, D>(doc: &Document, destination: &mut D) -> Result<usize, SectionError>
where
    C: EntityCodec,
    D: EntityCollection<C::Entity> + ?Sized,
{
    let container = doc
        .root
        .find_descendant(C::CONTAINER_TAG)
        .ok_or(SectionError::MissingContainer {
            container: C::CONTAINER_TAG,
        })?;

    destination.clear_entries();

    let mut count = 0;
    for (index, entry) in container.child_elements().enumerate() {
        let entity = C::decode(entry).map_err(|field| SectionError::MissingField {
            container: C::CONTAINER_TAG,
            index,
            field,
        })?;
        destination.push_entry(entity);
        count += 1;
    }
    Ok(count)
}

fn field_text(entry: &Element, field: &'static str) -> Result<String, &'static str> {
    entry
        .find_descendant(field)
        .map(Element::text_content)
        .ok_or(field)
}

// ── Player commands ───────────────────────────────────────────────────────────

/// `<playerCommands><playerCommand><name/><format/></playerCommand>…`
pub struct PlayerCommandCodec;

impl PlayerCommandCodec {
    pub const NAME: &'static str = "name";
    pub const FORMAT: &'static str = "format";
}

impl EntityCodec for PlayerCommandCodec {
    type Entity = PlayerCommandEntry;

    const CONTAINER_TAG: &'static str = "playerCommands";
    const ENTRY_TAG: &'static str = "playerCommand";

    fn encode(entity: &PlayerCommandEntry) -> Element {
        let mut entry = Element::new(Self::ENTRY_TAG);
        entry.push_child(Element::with_text(Self::NAME, entity.name()));
        entry.push_child(Element::with_text(Self::FORMAT, entity.format()));
        entry
    }

    fn decode(entry: &Element) -> Result<PlayerCommandEntry, &'static str> {
        Ok(PlayerCommandEntry::new(
            field_text(entry, Self::NAME)?,
            field_text(entry, Self::FORMAT)?,
        ))
    }
}

// ── Servers ───────────────────────────────────────────────────────────────────

/// `<servers><server><name/><address/><flag/></server>…`
pub struct ServerCodec;

impl ServerCodec {
    pub const NAME: &'static str = "name";
    pub const ADDRESS: &'static str = "address";
    pub const FLAG: &'static str = "flag";
}

impl EntityCodec for ServerCodec {
    type Entity = ServerEntry;

    const CONTAINER_TAG: &'static str = "servers";
    const ENTRY_TAG: &'static str = "server";

    fn encode(entity: &ServerEntry) -> Element {
        let mut entry = Element::new(Self::ENTRY_TAG);
        entry.push_child(Element::with_text(Self::NAME, &entity.name));
        entry.push_child(Element::with_text(Self::ADDRESS, &entity.address));
        entry.push_child(Element::with_text(
            Self::FLAG,
            if entity.flag { "true" } else { "false" },
        ));
        entry
    }

    fn decode(entry: &Element) -> Result<ServerEntry, &'static str> {
        let name = field_text(entry, Self::NAME)?;
        let address = field_text(entry, Self::ADDRESS)?;
        // Anything other than "true" reads as false.
        let flag = field_text(entry, Self::FLAG)?
            .trim()
            .eq_ignore_ascii_case("true");
        Ok(ServerEntry::new(name, address, flag))
    }
}
