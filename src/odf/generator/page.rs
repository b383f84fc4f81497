//! Page spans, headers, footers and sections.

use super::OdfGenerator;
use crate::odf::DocumentKind;
use crate::odf::property::{PropertyList, is_reserved_key};
use crate::odf::state::{Context, ContextKind};
use crate::odf::style::HeaderFooterKind;

/// Margins that turn a single-column section into a real one.
const SECTION_MARGIN_KEYS: [&str; 2] = ["fo:margin-left", "fo:margin-right"];

impl OdfGenerator<'_> {
    /// Start a run of pages sharing one layout (`fo:page-width`,
    /// `fo:page-height`, margins, ...).
    pub fn open_page_span(&mut self, properties: &PropertyList) {
        if self.rejects("open_page_span") {
            return;
        }
        if self.in_context(ContextKind::PageSpan) {
            log::warn!("page span opened inside another page span");
            self.close_context(ContextKind::PageSpan);
        }
        self.close_open_lists();
        self.lists.reset();

        let index = self.doc.styles.add_page_span(properties);
        let master = self
            .doc
            .styles
            .page_span(index)
            .map(|span| span.master_name().to_string())
            .unwrap_or_default();
        self.page_span = Some(index);

        match self.kind() {
            DocumentKind::Drawing | DocumentKind::Presentation => {
                self.page_count += 1;
                let attrs = PropertyList::new()
                    .with("draw:name", format!("page{}", self.page_count))
                    .with("draw:master-page-name", master);
                self.storage().open_element("draw:page", attrs);
                self.contexts
                    .push(Context::closing(ContextKind::PageSpan, &["draw:page"]));
            },
            DocumentKind::Text | DocumentKind::Spreadsheet => {
                self.pending_master = Some(master);
                self.contexts.push(Context::new(ContextKind::PageSpan));
            },
        }
    }

    pub fn close_page_span(&mut self) {
        self.close_context(ContextKind::PageSpan);
    }

    pub fn open_header(&mut self, properties: &PropertyList) {
        self.open_header_footer(false, properties);
    }

    pub fn close_header(&mut self) {
        self.close_context(ContextKind::Header);
    }

    pub fn open_footer(&mut self, properties: &PropertyList) {
        self.open_header_footer(true, properties);
    }

    pub fn close_footer(&mut self) {
        self.close_context(ContextKind::Footer);
    }

    fn open_header_footer(&mut self, footer: bool, properties: &PropertyList) {
        let context = if footer {
            ContextKind::Footer
        } else {
            ContextKind::Header
        };
        if self.rejects("open_header_footer") {
            return;
        }
        if self.page_span.is_none() || self.top_kind() != Some(ContextKind::PageSpan) {
            log::warn!("{:?} opened outside a page span ignored", context);
            self.contexts.push(Context::ignored(context));
            return;
        }

        let occurrence = properties.get_str("librevenge:occurrence");
        let kind = HeaderFooterKind::from_occurrence(footer, occurrence.as_deref());
        let properties = properties.filtered(|key| !is_reserved_key(key));
        self.pending_header_footer = Some((kind, properties));
        self.push_storage();
        self.contexts.push(Context::new(context));
    }

    /// Move the content of the closed header or footer to its master page.
    pub(super) fn finish_header_footer(&mut self) {
        let content = self.pop_storage();
        let Some((kind, properties)) = self.pending_header_footer.take() else {
            return;
        };
        match self.page_span.and_then(|i| self.doc.styles.page_span_mut(i)) {
            Some(span) => span.set_header_footer(kind, properties, content),
            None => log::warn!("{:?} closed without a page span, content dropped", kind),
        }
    }

    /// Open a section. `style:columns` holds one bag per column; sections
    /// with fewer than two columns and no margins write no element.
    pub fn open_section(&mut self, properties: &PropertyList) {
        if self.rejects("open_section") {
            return;
        }
        self.close_open_lists();
        if self.accepts_text() {
            log::warn!("section opened inside a paragraph ignored");
            self.contexts.push(Context::ignored(ContextKind::Section));
            return;
        }

        let columns = properties.get_vector("style:columns").map_or(0, |c| c.len());
        let has_margins = SECTION_MARGIN_KEYS
            .iter()
            .any(|key| properties.get_inches(key).is_some_and(|v| v.abs() > f64::EPSILON));
        if columns < 2 && !has_margins {
            self.contexts.push(Context::new(ContextKind::Section));
            return;
        }

        self.section_count += 1;
        let style = properties.filtered(|key| key != "text:name");
        let zone = self.zone();
        let style_name = self.doc.styles.add_section(&style, zone);
        let name = properties
            .get_str("text:name")
            .unwrap_or_else(|| format!("Section{}", self.section_count));
        let attrs = PropertyList::new()
            .with("text:style-name", style_name)
            .with("text:name", name);
        self.storage().open_element("text:section", attrs);
        self.contexts
            .push(Context::closing(ContextKind::Section, &["text:section"]));
    }

    pub fn close_section(&mut self) {
        self.close_context(ContextKind::Section);
    }

    /// Close list levels left open in front of a block that cannot live in a list.
    fn close_open_lists(&mut self) {
        while self.lists.depth() > 0
            && matches!(
                self.top_kind(),
                Some(
                    ContextKind::List
                        | ContextKind::ListElement
                        | ContextKind::Paragraph
                        | ContextKind::Span
                        | ContextKind::Link
                )
            )
        {
            log::warn!("closing list left open");
            self.pop_context();
        }
    }
}
