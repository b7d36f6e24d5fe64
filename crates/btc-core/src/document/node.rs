//! Owned element tree for the settings document.
//!
//! `quick-xml` is a streaming (event) parser.  The settings store needs
//! DOM-style lookups ("first descendant named `servers`"), so the events are
//! folded into a small tree of [`Element`]s and text [`Node`]s.  Attributes,
//! comments and processing instructions carry no settings data and are
//! dropped while parsing.
//!
//! Writing goes the other way: the tree is replayed as events through an
//! indenting `quick_xml::Writer` (4 spaces per level), preceded by an XML
//! declaration.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use thiserror::Error;

/// Number of spaces per nesting level in written documents.
pub const INDENT_WIDTH: usize = 4;

/// Errors produced while parsing or writing a settings document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The markup is not well-formed.
    #[error("malformed markup: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Writing the document to its output buffer failed.
    #[error("failed to write markup: {0}")]
    Write(#[from] std::io::Error),

    /// A tag name or CDATA section is not valid UTF-8.
    #[error("invalid UTF-8 in markup: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The input contains no root element.
    #[error("document has no root element")]
    MissingRoot,

    /// A second top-level element follows the root element.
    #[error("unexpected second root element <{0}>")]
    MultipleRoots(String),

    /// Non-whitespace text appears outside the root element.
    #[error("text outside the root element: {0:?}")]
    TextOutsideRoot(String),

    /// The input ended while elements were still open.
    #[error("unexpected end of input inside <{0}>")]
    UnexpectedEof(String),
}

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// A named element with ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Builds `<name>text</name>`.  Empty text produces an element with no
    /// children, written as `<name/>`.
    pub fn with_text(name: impl Into<String>, text: &str) -> Self {
        let mut element = Self::new(name);
        element.push_text(text);
        element
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn push_text(&mut self, text: &str) {
        if !text.is_empty() {
            self.children.push(Node::Text(text.to_owned()));
        }
    }

    /// Direct element children, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// First descendant (excluding `self`) named `tag`, in document order.
    pub fn find_descendant(&self, tag: &str) -> Option<&Element> {
        for child in self.child_elements() {
            if child.name == tag {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(tag) {
                return Some(found);
            }
        }
        None
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }

    /// Merges adjacent text nodes and drops empty ones, recursively.
    pub fn normalize(&mut self) {
        let mut merged: Vec<Node> = Vec::with_capacity(self.children.len());
        for child in self.children.drain(..) {
            match child {
                Node::Text(text) if text.is_empty() => {}
                Node::Text(text) => match merged.last_mut() {
                    Some(Node::Text(previous)) => previous.push_str(&text),
                    _ => merged.push(Node::Text(text)),
                },
                Node::Element(mut element) => {
                    element.normalize();
                    merged.push(Node::Element(element));
                }
            }
        }
        self.children = merged;
    }

    fn has_element_children(&self) -> bool {
        self.child_elements().next().is_some()
    }

    fn write_to(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), DocumentError> {
        if self.children.is_empty() {
            writer.write_event(Event::Empty(BytesStart::new(self.name.as_str())))?;
            return Ok(());
        }

        // Whitespace between child elements is formatting; the indenting
        // writer produces its own.
        let skip_blank_text = self.has_element_children();

        writer.write_event(Event::Start(BytesStart::new(self.name.as_str())))?;
        for child in &self.children {
            match child {
                Node::Element(element) => element.write_to(writer)?,
                Node::Text(text) if skip_blank_text && text.trim().is_empty() => {}
                Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
            }
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

/// A parsed or freshly built settings document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Parses markup into a tree.  Text is kept verbatim (no trimming), so
    /// field values with leading or trailing spaces survive a round trip.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] when the markup is not a single well-formed
    /// element tree.
    pub fn parse(input: &str) -> Result<Self, DocumentError> {
        let mut reader = Reader::from_str(input);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    let name = std::str::from_utf8(start.name().as_ref())?.to_owned();
                    if stack.is_empty() && root.is_some() {
                        return Err(DocumentError::MultipleRoots(name));
                    }
                    stack.push(Element::new(name));
                }
                Event::Empty(start) => {
                    let name = std::str::from_utf8(start.name().as_ref())?.to_owned();
                    attach(&mut stack, &mut root, Element::new(name))?;
                }
                Event::End(_) => {
                    // quick-xml has already checked that the end tag matches.
                    if let Some(element) = stack.pop() {
                        attach(&mut stack, &mut root, element)?;
                    }
                }
                Event::Text(text) => {
                    let text = text.unescape()?;
                    push_text(&mut stack, &text)?;
                }
                Event::CData(data) => {
                    let text = std::str::from_utf8(&data)?;
                    push_text(&mut stack, text)?;
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions and
                // doctypes carry no settings data.
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(DocumentError::UnexpectedEof(open.name.clone()));
        }
        root.map(Self::new).ok_or(DocumentError::MissingRoot)
    }

    /// Merges adjacent text nodes throughout the tree.
    pub fn normalize(&mut self) {
        self.root.normalize();
    }

    /// Serializes the tree with an XML declaration and 4-space indentation.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Write`] if the writer fails.
    pub fn to_xml_string(&self) -> Result<String, DocumentError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))?;
        self.root.write_to(&mut writer)?;

        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        // Only `&str` input was written, so this is always valid UTF-8.
        String::from_utf8(bytes).map_err(|e| DocumentError::Utf8(e.utf8_error()))
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), DocumentError> {
    match stack.last_mut() {
        Some(parent) => parent.push_child(element),
        None if root.is_some() => return Err(DocumentError::MultipleRoots(element.name)),
        None => *root = Some(element),
    }
    Ok(())
}

fn push_text(stack: &mut [Element], text: &str) -> Result<(), DocumentError> {
    match stack.last_mut() {
        Some(parent) => {
            // Not `push_text`: adjacent pieces are kept separate until
            // `normalize` coalesces them.
            parent.children.push(Node::Text(text.to_owned()));
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(DocumentError::TextOutsideRoot(text.trim().to_owned())),
    }
}
