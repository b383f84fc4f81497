//! In-memory element tree.
//!
//! Content produced while the generator processes events is recorded as a
//! flat sequence of open tags, close tags and character runs. Sub-trees that
//! ODF needs fully self-contained (notes, annotations, frames, table bodies,
//! header and footer content) are built in their own [`ElementStorage`] and
//! spliced into their parent once closed.

use crate::common::Result;
use crate::odf::handler::DocumentHandler;
use crate::odf::property::PropertyList;

/// One recorded node
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentElement {
    /// Start tag with its attributes
    Open {
        name: &'static str,
        attributes: PropertyList,
    },
    /// End tag
    Close { name: &'static str },
    /// Character data
    Text(String),
}

impl DocumentElement {
    /// Replay this node on a handler.
    pub fn write(&self, handler: &mut dyn DocumentHandler) -> Result<()> {
        match self {
            Self::Open { name, attributes } => handler.start_element(name, attributes),
            Self::Close { name } => handler.end_element(name),
            Self::Text(text) => handler.characters(text),
        }
    }
}

/// Ordered list of recorded nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementStorage {
    elements: Vec<DocumentElement>,
}

impl ElementStorage {
    /// Create an empty storage.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a start tag.
    pub fn open_element(&mut self, name: &'static str, attributes: PropertyList) {
        self.elements.push(DocumentElement::Open { name, attributes });
    }

    /// Record a start tag without attributes.
    #[inline]
    pub fn open(&mut self, name: &'static str) {
        self.open_element(name, PropertyList::new());
    }

    /// Record an end tag.
    #[inline]
    pub fn close_element(&mut self, name: &'static str) {
        self.elements.push(DocumentElement::Close { name });
    }

    /// Record a start tag immediately followed by its end tag.
    pub fn empty_element(&mut self, name: &'static str, attributes: PropertyList) {
        self.open_element(name, attributes);
        self.close_element(name);
    }

    /// Record character data. Empty runs are dropped.
    pub fn characters(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() {
            self.elements.push(DocumentElement::Text(text));
        }
    }

    /// Move every node of `other` to the end of this storage.
    pub fn append(&mut self, mut other: ElementStorage) {
        self.elements.append(&mut other.elements);
    }

    /// Number of recorded nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether nothing was recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate over the recorded nodes.
    pub fn iter(&self) -> std::slice::Iter<'_, DocumentElement> {
        self.elements.iter()
    }

    /// Replay every node on a handler.
    pub fn write(&self, handler: &mut dyn DocumentHandler) -> Result<()> {
        for element in &self.elements {
            element.write(handler)?;
        }
        Ok(())
    }
}
