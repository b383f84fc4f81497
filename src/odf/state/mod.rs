//! Nesting state tracked while events arrive.
//!
//! The generator keeps a stack of [`Context`] entries (page span, section,
//! paragraph, table, ...). Closing events pop the matching entry; entries
//! opened above it are closed first. Numbering of lists and the cell grid of
//! tables need more than a stack entry and live in [`ListManager`] and
//! [`TableState`].

mod list;
mod table;

pub use list::{ItemOpen, ListLevel, ListManager};
pub use table::{RowStart, Slot, TableState};

use smallvec::SmallVec;

/// Kind of an open structural element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    PageSpan,
    Header,
    Footer,
    Section,
    Paragraph,
    Span,
    Link,
    List,
    ListElement,
    Footnote,
    Endnote,
    Comment,
    Frame,
    TextBox,
    Table,
    TableRow,
    TableCell,
    Group,
}

impl ContextKind {
    /// Whether text may be inserted directly inside this context.
    #[inline]
    pub fn accepts_text(self) -> bool {
        matches!(self, Self::Paragraph | Self::ListElement | Self::Span | Self::Link)
    }

    /// Whether this context owns a separate element storage.
    #[inline]
    pub fn owns_storage(self) -> bool {
        matches!(
            self,
            Self::Header
                | Self::Footer
                | Self::Footnote
                | Self::Endnote
                | Self::Comment
                | Self::Frame
                | Self::TextBox
                | Self::Table
        )
    }
}

/// One entry of the context stack.
#[derive(Debug, Clone)]
pub struct Context {
    pub kind: ContextKind,
    /// End tags written, in order, when the context closes
    pub closing: SmallVec<[&'static str; 2]>,
    /// Opened out of place: nothing was written and closing writes nothing
    pub ignored: bool,
}

impl Context {
    pub fn new(kind: ContextKind) -> Self {
        Self {
            kind,
            closing: SmallVec::new(),
            ignored: false,
        }
    }

    pub fn closing(kind: ContextKind, tags: &[&'static str]) -> Self {
        Self {
            kind,
            closing: SmallVec::from_slice(tags),
            ignored: false,
        }
    }

    pub fn ignored(kind: ContextKind) -> Self {
        Self {
            kind,
            closing: SmallVec::new(),
            ignored: true,
        }
    }
}
