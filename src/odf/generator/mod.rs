//! The event collector.
//!
//! [`OdfGenerator`] is what a format parser drives. Every event updates the
//! nesting state, interns the styles its property bag implies and records
//! the resulting elements. Malformed sequences are repaired or ignored with a
//! `log::warn!`; they never fail the conversion.
//!
//! ```
//! use odfgen::odf::{OdfGenerator, OdfStreamType, PropertyList, PropertyValue, StringHandler};
//!
//! # fn main() -> odfgen::Result<()> {
//! let mut out = StringHandler::new();
//! {
//!     let mut generator = OdfGenerator::default();
//!     generator.add_document_handler(&mut out, OdfStreamType::Flat);
//!     generator.open_page_span(&PropertyList::new().with("fo:page-width", PropertyValue::inch(8.5)));
//!     generator.open_paragraph(&PropertyList::new());
//!     generator.insert_text("hello");
//!     generator.close_paragraph();
//!     generator.close_page_span();
//!     generator.end_document()?;
//! }
//! assert!(out.as_str().contains(">hello</text:p>"));
//! # Ok(())
//! # }
//! ```

mod frame;
mod list;
mod note;
mod page;
mod table;
mod text;


use self::table::OpenTable;
use super::DocumentKind;
use super::element::ElementStorage;
use super::emitter::{OdfDocument, OdfStreamType};
use super::handler::DocumentHandler;
use super::options::GeneratorOptions;
use super::property::PropertyList;
use super::state::{Context, ContextKind, ListManager, Slot};
use super::style::{HeaderFooterKind, Zone};
use crate::common::Result;

/// Streaming ODF generator.
pub struct OdfGenerator<'h> {
    doc: OdfDocument,
    handlers: Vec<(OdfStreamType, &'h mut dyn DocumentHandler)>,
    contexts: Vec<Context>,
    /// Storages of the open sub-trees; the body is used when empty
    storages: Vec<ElementStorage>,
    lists: ListManager,
    /// List states of the enclosing sub-trees, one per open storage
    saved_lists: Vec<ListManager>,
    tables: Vec<OpenTable>,
    page_span: Option<usize>,
    /// Master page waiting for the first paragraph or table of its span
    pending_master: Option<String>,
    pending_header_footer: Option<(HeaderFooterKind, PropertyList)>,
    page_count: usize,
    section_count: usize,
    frame_count: usize,
    footnote_count: usize,
    endnote_count: usize,
    ended: bool,
}

impl Default for OdfGenerator<'_> {
    fn default() -> Self {
        Self::new(GeneratorOptions::default())
    }
}

impl<'h> OdfGenerator<'h> {
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            doc: OdfDocument::new(options),
            handlers: Vec::new(),
            contexts: Vec::new(),
            storages: Vec::new(),
            lists: ListManager::new(),
            saved_lists: Vec::new(),
            tables: Vec::new(),
            page_span: None,
            pending_master: None,
            pending_header_footer: None,
            page_count: 0,
            section_count: 0,
            frame_count: 0,
            footnote_count: 0,
            endnote_count: 0,
            ended: false,
        }
    }

    /// Register a sink that receives `stream` when the document ends.
    pub fn add_document_handler(&mut self, handler: &'h mut dyn DocumentHandler, stream: OdfStreamType) {
        self.handlers.push((stream, handler));
    }

    #[inline]
    pub fn kind(&self) -> DocumentKind {
        self.doc.kind()
    }

    /// The document collected so far.
    #[inline]
    pub fn document(&self) -> &OdfDocument {
        &self.doc
    }

    /// Whether `end_document` was called.
    #[inline]
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Merge document metadata (`dc:*`, `meta:*`).
    pub fn set_document_meta_data(&mut self, properties: &PropertyList) {
        if self.rejects("set_document_meta_data") {
            return;
        }
        for (key, value) in properties.iter() {
            self.doc.metadata.insert(key, value.clone());
        }
    }

    /// Begin the document; `properties` are merged into the metadata.
    pub fn start_document(&mut self, properties: &PropertyList) {
        if self.rejects("start_document") {
            return;
        }
        log::debug!("start document ({:?})", self.kind());
        self.set_document_meta_data(properties);
    }

    /// Close whatever is still open and write the document to every
    /// registered handler.
    pub fn end_document(&mut self) -> Result<()> {
        if self.ended {
            log::warn!("end_document called twice");
            return Ok(());
        }
        self.close_all();
        self.ended = true;

        for (stream, handler) in self.handlers.iter_mut() {
            self.doc.write(*stream, &mut **handler)?;
        }
        Ok(())
    }

    /// Close whatever is still open and hand out the collected document.
    pub fn finish(mut self) -> OdfDocument {
        if !self.ended {
            self.close_all();
            self.ended = true;
        }
        self.doc
    }

    fn close_all(&mut self) {
        while let Some(top) = self.contexts.last() {
            if !top.ignored {
                log::warn!("{:?} still open at end of document", top.kind);
            }
            self.pop_context();
        }
        self.lists.reset();
    }

    // ------------------------------------------------------------------
    // State helpers shared by the event modules
    // ------------------------------------------------------------------

    fn rejects(&self, event: &str) -> bool {
        if self.ended {
            log::warn!("{} after end_document ignored", event);
        }
        self.ended
    }

    /// Storage receiving new elements.
    fn storage(&mut self) -> &mut ElementStorage {
        match self.storages.last_mut() {
            Some(storage) => storage,
            None => &mut self.doc.body,
        }
    }

    /// Zone of styles created at this point.
    fn zone(&self) -> Zone {
        let in_master = self
            .contexts
            .iter()
            .any(|c| !c.ignored && matches!(c.kind, ContextKind::Header | ContextKind::Footer));
        if in_master {
            Zone::StyleAutomatic
        } else {
            Zone::ContentAutomatic
        }
    }

    /// Innermost context that was actually opened.
    fn top_kind(&self) -> Option<ContextKind> {
        self.contexts.iter().rev().find(|c| !c.ignored).map(|c| c.kind)
    }

    fn in_context(&self, kind: ContextKind) -> bool {
        self.contexts.iter().any(|c| !c.ignored && c.kind == kind)
    }

    /// Whether character content may be written here.
    fn accepts_text(&self) -> bool {
        self.top_kind().is_some_and(ContextKind::accepts_text)
    }

    /// Master page name for a paragraph or table opened at body level.
    fn take_master_page(&mut self) -> Option<String> {
        if self.storages.is_empty() {
            self.pending_master.take()
        } else {
            None
        }
    }

    /// Start a sub-tree: new elements go to a fresh storage and lists start
    /// over at the first level.
    fn push_storage(&mut self) {
        self.storages.push(ElementStorage::new());
        let outer = self.lists.suspend();
        self.saved_lists.push(outer);
    }

    /// End the innermost sub-tree and return what it recorded.
    fn pop_storage(&mut self) -> ElementStorage {
        if let Some(outer) = self.saved_lists.pop() {
            self.lists.resume(outer);
        }
        self.storages.pop().unwrap_or_default()
    }

    /// Close the innermost context of `kind`, closing anything opened above it.
    fn close_context(&mut self, kind: ContextKind) {
        if self.rejects("close") {
            return;
        }
        let Some(position) = self.contexts.iter().rposition(|c| c.kind == kind) else {
            log::warn!("close of {:?} without matching open ignored", kind);
            return;
        };
        while self.contexts.len() > position + 1 {
            if let Some(top) = self.contexts.last()
                && !top.ignored
            {
                log::warn!("{:?} still open when closing {:?}", top.kind, kind);
            }
            self.pop_context();
        }
        self.pop_context();
    }

    fn pop_context(&mut self) {
        let Some(context) = self.contexts.pop() else {
            return;
        };
        if context.ignored {
            return;
        }

        match context.kind {
            ContextKind::List => {
                if let Some(level) = self.lists.close_level()
                    && let Some(item) = level.item
                {
                    self.storage().close_element(item);
                }
            },
            ContextKind::TableRow => {
                let fill = self
                    .tables
                    .last_mut()
                    .map(|t| t.state.close_row())
                    .unwrap_or_default();
                for slot in fill {
                    match slot {
                        Slot::Covered => self.storage().empty_element("table:covered-table-cell", PropertyList::new()),
                        Slot::Empty => self.storage().empty_element("table:table-cell", PropertyList::new()),
                    }
                }
            },
            ContextKind::Table => {
                let header_rows_open = self.tables.last_mut().is_some_and(|t| t.state.close());
                if header_rows_open {
                    self.storage().close_element("table:table-header-rows");
                }
            },
            ContextKind::PageSpan => {
                self.pending_master = None;
                self.page_span = None;
                self.lists.reset();
            },
            _ => {},
        }

        for &tag in context.closing.iter() {
            self.storage().close_element(tag);
        }

        match context.kind {
            ContextKind::Header | ContextKind::Footer => self.finish_header_footer(),
            ContextKind::Table => self.finish_table(),
            kind if kind.owns_storage() => {
                let child = self.pop_storage();
                self.storage().append(child);
            },
            _ => {},
        }
    }
}
