//! Footnotes, endnotes and comments.
//!
//! Each is built in its own storage and spliced into the paragraph once
//! closed.

use super::OdfGenerator;
use crate::odf::property::PropertyList;
use crate::odf::state::{Context, ContextKind};

/// Note flavours sharing the `text:note` element.
#[derive(Debug, Clone, Copy)]
enum NoteClass {
    Footnote,
    Endnote,
}

impl NoteClass {
    fn context(self) -> ContextKind {
        match self {
            Self::Footnote => ContextKind::Footnote,
            Self::Endnote => ContextKind::Endnote,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Footnote => "footnote",
            Self::Endnote => "endnote",
        }
    }

    fn id_prefix(self) -> &'static str {
        match self {
            Self::Footnote => "ftn",
            Self::Endnote => "edn",
        }
    }
}

impl OdfGenerator<'_> {
    /// Open a footnote; `librevenge:number` overrides the citation label.
    pub fn open_footnote(&mut self, properties: &PropertyList) {
        self.open_note(NoteClass::Footnote, properties);
    }

    pub fn close_footnote(&mut self) {
        self.close_context(ContextKind::Footnote);
    }

    pub fn open_endnote(&mut self, properties: &PropertyList) {
        self.open_note(NoteClass::Endnote, properties);
    }

    pub fn close_endnote(&mut self) {
        self.close_context(ContextKind::Endnote);
    }

    fn open_note(&mut self, class: NoteClass, properties: &PropertyList) {
        if self.rejects("open_note") {
            return;
        }
        if !self.accepts_text() || self.in_context(ContextKind::Footnote) || self.in_context(ContextKind::Endnote) {
            log::warn!("{} outside running text ignored", class.as_str());
            self.contexts.push(Context::ignored(class.context()));
            return;
        }

        let counter = match class {
            NoteClass::Footnote => &mut self.footnote_count,
            NoteClass::Endnote => &mut self.endnote_count,
        };
        let id = *counter;
        *counter += 1;
        let label = properties
            .get_str("librevenge:number")
            .unwrap_or_else(|| (id + 1).to_string());

        self.push_storage();
        let storage = self.storage();
        storage.open_element(
            "text:note",
            PropertyList::new()
                .with("text:id", format!("{}{}", class.id_prefix(), id))
                .with("text:note-class", class.as_str()),
        );
        storage.open("text:note-citation");
        storage.characters(label);
        storage.close_element("text:note-citation");
        storage.open("text:note-body");
        self.contexts
            .push(Context::closing(class.context(), &["text:note-body", "text:note"]));
    }

    /// Open an annotation; `dc:creator` (or `meta:initial-creator`) and
    /// `dc:date` are written before its paragraphs.
    pub fn open_comment(&mut self, properties: &PropertyList) {
        if self.rejects("open_comment") {
            return;
        }
        if !self.accepts_text() && self.top_kind() != Some(ContextKind::TableCell) {
            log::warn!("comment outside running text ignored");
            self.contexts.push(Context::ignored(ContextKind::Comment));
            return;
        }

        self.push_storage();
        let storage = self.storage();
        storage.open("office:annotation");
        let creator = properties
            .get_str("dc:creator")
            .or_else(|| properties.get_str("meta:initial-creator"));
        if let Some(creator) = creator {
            storage.open("dc:creator");
            storage.characters(creator);
            storage.close_element("dc:creator");
        }
        if let Some(date) = properties.get_str("dc:date") {
            storage.open("dc:date");
            storage.characters(date);
            storage.close_element("dc:date");
        }
        self.contexts
            .push(Context::closing(ContextKind::Comment, &["office:annotation"]));
    }

    pub fn close_comment(&mut self) {
        self.close_context(ContextKind::Comment);
    }
}
