//! Paragraphs, spans, links, text runs and fields.

use super::OdfGenerator;
use crate::odf::element::ElementStorage;
use crate::odf::property::{PropertyList, is_reserved_key};
use crate::odf::state::{Context, ContextKind};
use phf::{Map, phf_map};

/// Paragraph keys written on `text:p`/`text:h` instead of the style.
const PARAGRAPH_ELEMENT_KEYS: [&str; 5] = [
    "text:outline-level",
    "text:id",
    "xml:id",
    "text:class-names",
    "text:cond-style-name",
];

/// Link keys copied onto `text:a`.
const LINK_KEYS: [&str; 5] = [
    "xlink:href",
    "xlink:show",
    "office:name",
    "office:target-frame-name",
    "text:style-name",
];

/// Supported fields and the text shown before the consumer recomputes them.
static FIELDS: Map<&'static str, &'static str> = phf_map! {
    "text:page-number" => "1",
    "text:page-count" => "1",
    "text:chapter" => "",
    "text:date" => "",
    "text:time" => "",
    "text:title" => "",
    "text:subject" => "",
    "text:file-name" => "",
    "text:author-name" => "",
    "text:sheet-name" => "",
    "text:word-count" => "0",
    "text:paragraph-count" => "0",
};

impl OdfGenerator<'_> {
    /// Define a named paragraph style; paragraphs refer to it through
    /// `librevenge:paragraph-id`.
    pub fn define_paragraph_style(&mut self, properties: &PropertyList) {
        if self.rejects("define_paragraph_style") {
            return;
        }
        let id = properties.get_int("librevenge:paragraph-id");
        let style = properties.filtered(|key| !is_reserved_key(key) && !PARAGRAPH_ELEMENT_KEYS.contains(&key));
        self.doc.styles.define_paragraph_style(id, &style);
    }

    /// Define a named character style; spans refer to it through
    /// `librevenge:span-id`.
    pub fn define_character_style(&mut self, properties: &PropertyList) {
        if self.rejects("define_character_style") {
            return;
        }
        let id = properties.get_int("librevenge:span-id");
        let style = properties.filtered(|key| !is_reserved_key(key));
        self.doc.styles.define_character_style(id, &style);
    }

    pub fn open_paragraph(&mut self, properties: &PropertyList) {
        if self.rejects("open_paragraph") {
            return;
        }
        if self.accepts_text() {
            log::warn!("paragraph opened inside another paragraph");
        }
        let tag = self.write_paragraph_start(properties);
        self.contexts.push(Context::closing(ContextKind::Paragraph, &[tag]));
    }

    pub fn close_paragraph(&mut self) {
        self.close_context(ContextKind::Paragraph);
    }

    /// Write the start tag of a paragraph or heading and return its name.
    pub(super) fn write_paragraph_start(&mut self, properties: &PropertyList) -> &'static str {
        let mut style = properties.filtered(|key| !is_reserved_key(key) && !PARAGRAPH_ELEMENT_KEYS.contains(&key));
        if let Some(parent) = properties
            .get_int("librevenge:paragraph-id")
            .and_then(|id| self.doc.styles.named_paragraph(id))
            .map(str::to_string)
        {
            style.insert("style:parent-style-name", parent);
        }
        if let Some(master) = self.take_master_page() {
            style.insert("style:master-page-name", master);
        }
        let zone = self.zone();
        let name = self.doc.styles.add_paragraph(&style, zone);

        let mut attrs = PropertyList::new().with("text:style-name", name);
        let level = properties.get_int("text:outline-level").filter(|l| *l > 0);
        for key in &PARAGRAPH_ELEMENT_KEYS[1..] {
            if let Some(value) = properties.get(key) {
                attrs.insert(key, value.clone());
            }
        }
        let tag = match level {
            Some(level) => {
                attrs.insert("text:outline-level", level);
                "text:h"
            },
            None => "text:p",
        };
        self.storage().open_element(tag, attrs);
        tag
    }

    pub fn open_span(&mut self, properties: &PropertyList) {
        if self.rejects("open_span") {
            return;
        }
        if !self.accepts_text() {
            log::warn!("span opened outside a paragraph ignored");
            self.contexts.push(Context::ignored(ContextKind::Span));
            return;
        }

        let style = properties.filtered(|key| !is_reserved_key(key));
        let named = properties
            .get_int("librevenge:span-id")
            .and_then(|id| self.doc.styles.named_span(id))
            .map(str::to_string);
        let name = match named {
            Some(named) if !style.has_attributes() => named,
            Some(named) => {
                let style = style.with("style:parent-style-name", named);
                let zone = self.zone();
                self.doc.styles.add_span(&style, zone)
            },
            None => {
                let zone = self.zone();
                self.doc.styles.add_span(&style, zone)
            },
        };

        self.storage()
            .open_element("text:span", PropertyList::new().with("text:style-name", name));
        self.contexts.push(Context::closing(ContextKind::Span, &["text:span"]));
    }

    pub fn close_span(&mut self) {
        self.close_context(ContextKind::Span);
    }

    /// Open a hyperlink (`xlink:href`).
    pub fn open_link(&mut self, properties: &PropertyList) {
        if self.rejects("open_link") {
            return;
        }
        if !self.accepts_text() {
            log::warn!("link opened outside a paragraph ignored");
            self.contexts.push(Context::ignored(ContextKind::Link));
            return;
        }
        let mut attrs = PropertyList::new().with("xlink:type", "simple");
        for key in LINK_KEYS {
            if let Some(value) = properties.get(key) {
                attrs.insert(key, value.clone());
            }
        }
        self.storage().open_element("text:a", attrs);
        self.contexts.push(Context::closing(ContextKind::Link, &["text:a"]));
    }

    pub fn close_link(&mut self) {
        self.close_context(ContextKind::Link);
    }

    fn text_allowed(&self, event: &str) -> bool {
        if self.rejects(event) {
            return false;
        }
        if !self.accepts_text() {
            log::warn!("{} outside a paragraph ignored", event);
            return false;
        }
        true
    }

    pub fn insert_tab(&mut self) {
        if self.text_allowed("insert_tab") {
            self.storage().empty_element("text:tab", PropertyList::new());
        }
    }

    pub fn insert_space(&mut self) {
        if self.text_allowed("insert_space") {
            self.storage().empty_element("text:s", PropertyList::new());
        }
    }

    pub fn insert_line_break(&mut self) {
        if self.text_allowed("insert_line_break") {
            self.storage().empty_element("text:line-break", PropertyList::new());
        }
    }

    /// Insert text. The first space of a run is kept as is, further spaces
    /// become `text:s`; tabs and newlines become `text:tab` and
    /// `text:line-break`.
    pub fn insert_text(&mut self, text: &str) {
        if text.is_empty() || !self.text_allowed("insert_text") {
            return;
        }
        let storage = self.storage();
        let mut run = String::with_capacity(text.len());
        let mut spaces = 0usize;

        for c in text.chars() {
            if c == ' ' {
                spaces += 1;
                if spaces == 1 {
                    run.push(' ');
                }
                continue;
            }
            flush_spaces(&mut run, &mut spaces, storage);
            match c {
                '\t' => {
                    storage.characters(std::mem::take(&mut run));
                    storage.empty_element("text:tab", PropertyList::new());
                },
                '\n' => {
                    storage.characters(std::mem::take(&mut run));
                    storage.empty_element("text:line-break", PropertyList::new());
                },
                '\r' => {},
                c => run.push(c),
            }
        }
        flush_spaces(&mut run, &mut spaces, storage);
        storage.characters(run);
    }

    /// Insert a field named by `librevenge:field-type` (`text:page-number`, ...).
    pub fn insert_field(&mut self, properties: &PropertyList) {
        if !self.text_allowed("insert_field") {
            return;
        }
        let Some(field) = properties.get_str("librevenge:field-type") else {
            log::warn!("field without librevenge:field-type ignored");
            return;
        };
        let Some((&element, &placeholder)) = FIELDS.get_entry(field.as_str()) else {
            log::warn!("unsupported field {} ignored", field);
            return;
        };

        let mut attrs = properties.filtered(|key| !is_reserved_key(key));
        if element == "text:page-number" && !attrs.contains("text:select-page") {
            attrs.insert("text:select-page", "current");
        }
        if matches!(element, "text:page-number" | "text:page-count") && !attrs.contains("style:num-format") {
            attrs.insert("style:num-format", "1");
        }
        let content = properties
            .get_str("librevenge:field-content")
            .unwrap_or_else(|| placeholder.to_string());

        let storage = self.storage();
        storage.open_element(element, attrs);
        storage.characters(content);
        storage.close_element(element);
    }
}

/// Write the spaces of a run beyond the first as `text:s`.
fn flush_spaces(run: &mut String, spaces: &mut usize, storage: &mut ElementStorage) {
    if *spaces > 1 {
        storage.characters(std::mem::take(run));
        let mut attrs = PropertyList::new();
        if *spaces > 2 {
            attrs.insert("text:c", *spaces - 1);
        }
        storage.empty_element("text:s", attrs);
    }
    *spaces = 0;
}
