//! Tables, rows, cells and covered cells.

use super::OdfGenerator;
use crate::odf::property::{PropertyList, is_reserved_key};
use crate::odf::state::{Context, ContextKind, TableState};

/// A table whose body is being built.
#[derive(Debug)]
pub(super) struct OpenTable {
    pub(super) state: TableState,
    attributes: PropertyList,
}

/// Whether a cell key is written on the cell element rather than its style.
fn is_cell_attribute(key: &str) -> bool {
    key.starts_with("table:") || key.starts_with("office:") || key.starts_with("calcext:")
}

impl OdfGenerator<'_> {
    /// Open a table; `librevenge:table-columns` holds one bag per column.
    pub fn open_table(&mut self, properties: &PropertyList) {
        if self.rejects("open_table") {
            return;
        }
        if self.accepts_text() {
            log::warn!("table opened inside a paragraph");
        }

        // a table between items belongs to the last item of the level
        if self.top_kind() == Some(ContextKind::List)
            && let Some(item) = self.lists.ensure_item()
        {
            self.storage().open(item);
        }

        let master = self.take_master_page();
        let zone = self.zone();
        let index = self.doc.styles.add_table(properties, zone, master.as_deref());
        let (name, declared) = self
            .doc
            .styles
            .table(index)
            .map(|t| (t.name().to_string(), t.column_count()))
            .unwrap_or_default();

        let table_name = properties.get_str("table:name").unwrap_or_else(|| name.clone());
        let attributes = PropertyList::new()
            .with("table:name", table_name)
            .with("table:style-name", name);
        self.tables.push(OpenTable {
            state: TableState::new(index, declared),
            attributes,
        });
        self.push_storage();
        self.contexts.push(Context::new(ContextKind::Table));
    }

    pub fn close_table(&mut self) {
        self.close_context(ContextKind::Table);
    }

    /// Write the finished table into the parent storage: columns first,
    /// then the rows recorded meanwhile.
    pub(super) fn finish_table(&mut self) {
        let rows = self.pop_storage();
        let Some(table) = self.tables.pop() else {
            return;
        };
        let style = self.doc.styles.table(table.state.style);
        let declared = style.map_or(0, |s| s.column_count());
        let column_names: Vec<String> = (0..declared)
            .filter_map(|k| style.map(|s| s.column_style_name(k)))
            .collect();
        let extra = table.state.column_count().saturating_sub(declared).max(usize::from(declared == 0));

        let storage = self.storage();
        storage.open_element("table:table", table.attributes);
        for name in column_names {
            storage.empty_element(
                "table:table-column",
                PropertyList::new().with("table:style-name", name),
            );
        }
        if extra > 0 {
            let mut attrs = PropertyList::new();
            if extra > 1 {
                attrs.insert("table:number-columns-repeated", extra);
            }
            storage.empty_element("table:table-column", attrs);
        }
        storage.append(rows);
        storage.close_element("table:table");
    }

    /// Open a row; `librevenge:is-header-row` puts it in the header group.
    pub fn open_table_row(&mut self, properties: &PropertyList) {
        if self.rejects("open_table_row") {
            return;
        }
        if matches!(self.top_kind(), Some(ContextKind::TableRow | ContextKind::TableCell)) {
            log::warn!("table row opened before the previous row was closed");
            self.close_context(ContextKind::TableRow);
        }
        if self.top_kind() != Some(ContextKind::Table) {
            log::warn!("table row opened outside a table ignored");
            self.contexts.push(Context::ignored(ContextKind::TableRow));
            return;
        }
        let Some(table) = self.tables.last_mut() else {
            self.contexts.push(Context::ignored(ContextKind::TableRow));
            return;
        };

        let header = properties.get_bool("librevenge:is-header-row").unwrap_or(false);
        let start = table.state.open_row(header);
        let style_index = table.state.style;
        let style = properties.filtered(|key| !is_reserved_key(key));
        let name = self
            .doc
            .styles
            .table_mut(style_index)
            .map(|t| t.add_row_style(&style))
            .unwrap_or_default();

        let storage = self.storage();
        if start.close_header_rows {
            storage.close_element("table:table-header-rows");
        }
        if start.open_header_rows {
            storage.open("table:table-header-rows");
        }
        storage.open_element(
            "table:table-row",
            PropertyList::new().with("table:style-name", name),
        );
        self.contexts
            .push(Context::closing(ContextKind::TableRow, &["table:table-row"]));
    }

    pub fn close_table_row(&mut self) {
        self.close_context(ContextKind::TableRow);
    }

    /// Open a cell. `table:number-columns-spanned` and
    /// `table:number-rows-spanned` reserve grid slots that are filled with
    /// covered cells unless the parser inserts them itself.
    pub fn open_table_cell(&mut self, properties: &PropertyList) {
        if self.rejects("open_table_cell") {
            return;
        }
        if self.top_kind() == Some(ContextKind::TableCell) {
            log::warn!("table cell opened before the previous cell was closed");
            self.close_context(ContextKind::TableCell);
        }
        if self.top_kind() != Some(ContextKind::TableRow) {
            log::warn!("table cell opened outside a table row ignored");
            self.contexts.push(Context::ignored(ContextKind::TableCell));
            return;
        }
        let Some(table) = self.tables.last_mut() else {
            self.contexts.push(Context::ignored(ContextKind::TableCell));
            return;
        };

        let covered = table.state.take_reserved();
        let span = |key: &str| {
            properties
                .get_int(key)
                .and_then(|n| usize::try_from(n).ok())
                .unwrap_or(1)
                .max(1)
        };
        table
            .state
            .place_cell(span("table:number-columns-spanned"), span("table:number-rows-spanned"));
        let style_index = table.state.style;

        let style = properties.filtered(|key| !is_reserved_key(key) && !is_cell_attribute(key));
        let name = self
            .doc
            .styles
            .table_mut(style_index)
            .map(|t| t.add_cell_style(&style))
            .unwrap_or_default();
        let mut attrs = PropertyList::new().with("table:style-name", name);
        for (key, value) in properties.iter() {
            if !is_reserved_key(key) && is_cell_attribute(key) {
                attrs.insert(key, value.clone());
            }
        }

        let storage = self.storage();
        for _ in 0..covered {
            storage.empty_element("table:covered-table-cell", PropertyList::new());
        }
        storage.open_element("table:table-cell", attrs);
        self.contexts
            .push(Context::closing(ContextKind::TableCell, &["table:table-cell"]));
    }

    pub fn close_table_cell(&mut self) {
        self.close_context(ContextKind::TableCell);
    }

    /// Insert a placeholder for a slot taken by a spanning cell.
    pub fn insert_covered_table_cell(&mut self, properties: &PropertyList) {
        if self.rejects("insert_covered_table_cell") {
            return;
        }
        if self.top_kind() != Some(ContextKind::TableRow) {
            log::warn!("covered cell outside a table row ignored");
            return;
        }
        if let Some(table) = self.tables.last_mut() {
            table.state.place_covered();
        }
        let attrs = properties.filtered(|key| !is_reserved_key(key));
        self.storage().empty_element("table:covered-table-cell", attrs);
    }
}
