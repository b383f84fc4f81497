use super::Zone;
use super::record::write_properties;
use crate::common::Result;
use crate::odf::handler::DocumentHandler;
use crate::odf::property::{PropertyList, PropertyValue};
use std::collections::HashMap;

/// Key carrying the per-column bags of a table.
pub const TABLE_COLUMNS_KEY: &str = "librevenge:table-columns";

/// A table style together with its column, row and cell sub-styles.
///
/// Sub-styles are named after the table (`Table0.Column0`, `Table0.Row1`,
/// `Table0.Cell2`); rows and cells with identical properties share a name.
#[derive(Debug, Clone)]
pub struct TableStyle {
    name: String,
    zone: Zone,
    master_page: Option<String>,
    properties: PropertyList,
    columns: Vec<PropertyList>,
    rows: Vec<PropertyList>,
    cells: Vec<PropertyList>,
    row_lookup: HashMap<String, usize>,
    cell_lookup: HashMap<String, usize>,
}

impl TableStyle {
    pub fn new(name: String, zone: Zone, properties: &PropertyList, master_page: Option<&str>) -> Self {
        let columns: Vec<PropertyList> = properties
            .get_vector(TABLE_COLUMNS_KEY)
            .map(|v| v.iter().cloned().collect())
            .unwrap_or_default();

        let mut table = properties.filtered(|key| key != "table:name" && key != TABLE_COLUMNS_KEY);
        if !table.contains("style:width") {
            let total: Option<f64> = columns
                .iter()
                .map(|c| c.get_inches("style:column-width"))
                .sum();
            if let Some(total) = total.filter(|t| *t > 0.0) {
                table.insert("style:width", PropertyValue::inch(total));
            }
        }

        Self {
            name,
            zone,
            master_page: master_page.map(str::to_string),
            properties: table,
            columns,
            rows: Vec::new(),
            cells: Vec::new(),
            row_lookup: HashMap::new(),
            cell_lookup: HashMap::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// Number of columns declared when the table was opened.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Name of the style of column `index`.
    pub fn column_style_name(&self, index: usize) -> String {
        self.sub_name("Column", index)
    }

    /// Intern a row style.
    pub fn add_row_style(&mut self, properties: &PropertyList) -> String {
        let index = Self::intern(&mut self.rows, &mut self.row_lookup, properties);
        self.sub_name("Row", index)
    }

    /// Intern a cell style.
    pub fn add_cell_style(&mut self, properties: &PropertyList) -> String {
        let index = Self::intern(&mut self.cells, &mut self.cell_lookup, properties);
        self.sub_name("Cell", index)
    }

    fn intern(
        styles: &mut Vec<PropertyList>,
        lookup: &mut HashMap<String, usize>,
        properties: &PropertyList,
    ) -> usize {
        let signature = properties.signature();
        if let Some(&index) = lookup.get(&signature) {
            return index;
        }
        styles.push(properties.clone());
        lookup.insert(signature, styles.len() - 1);
        styles.len() - 1
    }

    fn sub_name(&self, kind: &str, index: usize) -> String {
        let mut buf = itoa::Buffer::new();
        let mut name = String::with_capacity(self.name.len() + kind.len() + 4);
        name.push_str(&self.name);
        name.push('.');
        name.push_str(kind);
        name.push_str(buf.format(index));
        name
    }

    pub fn write(&self, handler: &mut dyn DocumentHandler) -> Result<()> {
        let mut attrs = PropertyList::new()
            .with("style:name", self.name.as_str())
            .with("style:family", "table");
        if let Some(master) = &self.master_page {
            attrs.insert("style:master-page-name", master.as_str());
        }
        handler.start_element("style:style", &attrs)?;
        write_properties(handler, "style:table-properties", &self.properties)?;
        handler.end_element("style:style")?;

        let families = [
            ("table-column", "style:table-column-properties", &self.columns, "Column"),
            ("table-row", "style:table-row-properties", &self.rows, "Row"),
            ("table-cell", "style:table-cell-properties", &self.cells, "Cell"),
        ];
        for (family, element, styles, kind) in families {
            for (index, properties) in styles.iter().enumerate() {
                let attrs = PropertyList::new()
                    .with("style:name", self.sub_name(kind, index))
                    .with("style:family", family);
                handler.start_element("style:style", &attrs)?;
                write_properties(handler, element, properties)?;
                handler.end_element("style:style")?;
            }
        }
        Ok(())
    }
}
