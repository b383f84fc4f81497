//! Ordered and unordered lists.

use super::OdfGenerator;
use crate::odf::property::PropertyList;
use crate::odf::state::{Context, ContextKind};
use crate::odf::style::{ListLevelStyle, ListStyleManager};

/// Whether applying `definition` to `level` of style `index` changes anything
/// worth recording. An empty bag only matters when the level is undefined or
/// of the other kind.
fn needs_definition(lists: &ListStyleManager, index: usize, level: u32, definition: &ListLevelStyle, ordered: bool) -> bool {
    match lists.get(index).and_then(|style| style.level(level)) {
        Some(existing) => existing != definition && (definition.has_properties() || existing.is_ordered() != ordered),
        None => true,
    }
}

impl OdfGenerator<'_> {
    pub fn define_ordered_list_level(&mut self, properties: &PropertyList) {
        self.define_list_level(true, properties);
    }

    pub fn define_unordered_list_level(&mut self, properties: &PropertyList) {
        self.define_list_level(false, properties);
    }

    /// Record the definition of `librevenge:level` for list
    /// `librevenge:list-id` (or the list currently open).
    fn define_list_level(&mut self, ordered: bool, properties: &PropertyList) {
        if self.rejects("define_list_level") {
            return;
        }
        let Some(level) = properties
            .get_int("librevenge:level")
            .filter(|l| *l >= 1)
            .and_then(|l| u32::try_from(l).ok())
        else {
            log::warn!("list level definition without librevenge:level ignored");
            return;
        };
        let definition = ListLevelStyle::new(ordered, properties);
        let zone = self.zone();

        match properties.get_int("librevenge:list-id").or(self.lists.list_id()) {
            Some(id) => {
                self.doc.styles.lists_mut().define_level(id, level, definition, zone);
            },
            None => match self.lists.current().map(|l| l.style) {
                Some(current) => {
                    let updated = self.doc.styles.lists_mut().set_level(current, level, definition);
                    self.lists.retarget(current, updated);
                },
                None => log::warn!("anonymous list level defined outside a list ignored"),
            },
        }
    }

    pub fn open_ordered_list_level(&mut self, properties: &PropertyList) {
        self.open_list_level(true, properties);
    }

    pub fn open_unordered_list_level(&mut self, properties: &PropertyList) {
        self.open_list_level(false, properties);
    }

    pub fn close_ordered_list_level(&mut self) {
        self.close_context(ContextKind::List);
    }

    pub fn close_unordered_list_level(&mut self) {
        self.close_context(ContextKind::List);
    }

    fn open_list_level(&mut self, ordered: bool, properties: &PropertyList) {
        if self.rejects("open_list_level") {
            return;
        }
        // a nested level lives in the current item, after its paragraph
        if self.top_kind() == Some(ContextKind::ListElement) {
            self.close_context(ContextKind::ListElement);
        }
        let depth = self.lists.depth();
        if depth == 0 {
            while matches!(
                self.top_kind(),
                Some(ContextKind::Paragraph | ContextKind::Span | ContextKind::Link)
            ) {
                log::warn!("paragraph still open when a list starts, closing it");
                self.pop_context();
            }
        }
        if depth > 0 && self.top_kind() != Some(ContextKind::List) {
            log::warn!("nested list level opened out of place ignored");
            self.contexts.push(Context::ignored(ContextKind::List));
            return;
        }

        let level = depth as u32 + 1;
        let zone = self.zone();
        let id = match properties.get_int("librevenge:list-id") {
            Some(id) => Some(id),
            None if depth > 0 => self.lists.list_id(),
            None => None,
        };
        let definition =
            ListLevelStyle::new(ordered, &properties.filtered(|key| key != "text:start-value"));

        let parent = self.lists.current().map(|l| l.style);
        let lists = self.doc.styles.lists_mut();
        let style = match (id, parent) {
            (Some(id), _) => match lists.style_for_id(id) {
                Some(current) if !needs_definition(lists, current, level, &definition, ordered) => current,
                _ => lists.define_level(id, level, definition, zone),
            },
            (None, Some(parent)) => {
                if needs_definition(lists, parent, level, &definition, ordered) {
                    let updated = lists.set_level(parent, level, definition);
                    self.lists.retarget(parent, updated);
                    updated
                } else {
                    parent
                }
            },
            (None, None) => {
                let fresh = lists.create_anonymous(zone);
                lists.set_level(fresh, level, definition)
            },
        };
        let lists = self.doc.styles.lists_mut();
        lists.ensure_level(style, level, ordered);
        let name = lists.name(style).to_string();

        if let Some(item) = self.lists.ensure_item() {
            self.storage().open(item);
        }
        self.lists
            .open_level(id, ordered, style, properties.get_int("text:start-value"));
        self.storage()
            .open_element("text:list", PropertyList::new().with("text:style-name", name));
        self.contexts.push(Context::closing(ContextKind::List, &["text:list"]));
    }

    /// Open a list item and its paragraph. The item itself stays open until
    /// the next item or the end of the level.
    pub fn open_list_element(&mut self, properties: &PropertyList) {
        if self.rejects("open_list_element") {
            return;
        }
        if self.top_kind() == Some(ContextKind::ListElement) {
            log::warn!("list element opened before the previous one was closed");
            self.close_context(ContextKind::ListElement);
        }
        if self.top_kind() != Some(ContextKind::List) {
            log::warn!("list element opened outside a list ignored");
            self.contexts.push(Context::ignored(ContextKind::ListElement));
            return;
        }
        let Some(item) = self.lists.open_item() else {
            self.contexts.push(Context::ignored(ContextKind::ListElement));
            return;
        };

        if let Some(previous) = item.close_previous {
            self.storage().close_element(previous);
        }
        let mut attrs = PropertyList::new();
        if let Some(start) = item.start_value {
            attrs.insert("text:start-value", start);
        }
        self.storage().open_element("text:list-item", attrs);
        self.doc.styles.lists_mut().mark_used(item.style, item.level);

        let tag = self.write_paragraph_start(properties);
        self.contexts
            .push(Context::closing(ContextKind::ListElement, &[tag]));
    }

    pub fn close_list_element(&mut self) {
        self.close_context(ContextKind::ListElement);
    }
}
