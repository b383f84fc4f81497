//! Style registry.
//!
//! Every property bag that implies a style goes through [`StyleRegistry`],
//! which interns it into a named record of the right family and zone:
//!
//! | zone               | written to                                 | names          |
//! |--------------------|--------------------------------------------|----------------|
//! | `Style`            | `office:styles` (styles.xml)               | `P_N0`, ...    |
//! | `StyleAutomatic`   | `office:automatic-styles` of styles.xml    | `P_M0`, ...    |
//! | `ContentAutomatic` | `office:automatic-styles` of content.xml   | `P0`, ...      |
//!
//! Counters are kept per family and per zone and start at 0. Bags that are
//! identical within one family and zone share a name.

mod font;
mod list;
mod page;
mod record;
mod table;

pub use font::FontRegistry;
pub use list::{ListLevelStyle, ListStyle, ListStyleManager};
pub use page::{HeaderFooterKind, PageSpan};
pub use record::{Style, is_text_property};
pub use table::{TABLE_COLUMNS_KEY, TableStyle};

use crate::common::Result;
use crate::odf::handler::DocumentHandler;
use crate::odf::property::PropertyList;
use std::collections::HashMap;
use std::fmt::Write as _;

/// Where a style is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// Named styles (`office:styles`)
    Style,
    /// Automatic styles used by master pages, headers and footers
    StyleAutomatic,
    /// Automatic styles used by the document body
    ContentAutomatic,
}

impl Zone {
    #[inline]
    fn index(self) -> usize {
        match self {
            Self::Style => 0,
            Self::StyleAutomatic => 1,
            Self::ContentAutomatic => 2,
        }
    }

    /// Text inserted between the family prefix and the counter.
    #[inline]
    pub fn name_infix(self) -> &'static str {
        match self {
            Self::Style => "_N",
            Self::StyleAutomatic => "_M",
            Self::ContentAutomatic => "",
        }
    }
}

/// Families of `style:style` records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleFamily {
    /// Paragraph styles
    Paragraph,
    /// Text/character styles
    Text,
    /// Section styles
    Section,
    /// Table styles
    Table,
    /// Table column styles
    TableColumn,
    /// Table row styles
    TableRow,
    /// Table cell styles
    TableCell,
    /// Graphic styles (frames and shapes)
    Graphic,
}

impl StyleFamily {
    /// Value of `style:family`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Text => "text",
            Self::Section => "section",
            Self::Table => "table",
            Self::TableColumn => "table-column",
            Self::TableRow => "table-row",
            Self::TableCell => "table-cell",
            Self::Graphic => "graphic",
        }
    }

    /// Properties child element
    pub fn properties_element(&self) -> &'static str {
        match self {
            Self::Paragraph => "style:paragraph-properties",
            Self::Text => "style:text-properties",
            Self::Section => "style:section-properties",
            Self::Table => "style:table-properties",
            Self::TableColumn => "style:table-column-properties",
            Self::TableRow => "style:table-row-properties",
            Self::TableCell => "style:table-cell-properties",
            Self::Graphic => "style:graphic-properties",
        }
    }

    /// Prefix of generated names
    pub fn name_prefix(&self) -> &'static str {
        match self {
            Self::Paragraph => "P",
            Self::Text => "Span",
            Self::Section => "Section",
            Self::Table => "Table",
            Self::TableColumn => "Column",
            Self::TableRow => "Row",
            Self::TableCell => "Cell",
            Self::Graphic => "gr",
        }
    }
}

/// Per-zone name counters of one family.
#[derive(Debug, Default, Clone)]
pub struct NameAllocator {
    next: [usize; 3],
}

impl NameAllocator {
    /// Allocate `<prefix><infix><n>`.
    pub fn allocate(&mut self, prefix: &str, zone: Zone) -> String {
        let slot = &mut self.next[zone.index()];
        let n = *slot;
        *slot += 1;

        let mut buf = itoa::Buffer::new();
        let digits = buf.format(n);
        let infix = zone.name_infix();
        let mut name = String::with_capacity(prefix.len() + infix.len() + digits.len());
        name.push_str(prefix);
        name.push_str(infix);
        name.push_str(digits);
        name
    }
}

/// Turn a display name into a valid `style:name`.
///
/// Characters outside `[A-Za-z0-9_.-]` (and a leading digit, dot or dash)
/// are written as `_<hex>_`, so `Heading 1` becomes `Heading_20_1`.
pub fn encode_style_name(display_name: &str) -> String {
    let mut out = String::with_capacity(display_name.len());
    for (i, c) in display_name.chars().enumerate() {
        let allowed = if i == 0 {
            c.is_ascii_alphabetic() || c == '_'
        } else {
            c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
        };
        if allowed {
            out.push(c);
        } else {
            let _ = write!(out, "_{:x}_", c as u32);
        }
    }
    out
}

/// Every style of one document.
#[derive(Debug, Default, Clone)]
pub struct StyleRegistry {
    styles: Vec<Style>,
    lookup: HashMap<String, usize>,
    allocators: HashMap<StyleFamily, NameAllocator>,
    named_paragraphs: HashMap<i64, String>,
    named_spans: HashMap<i64, String>,
    tables: Vec<TableStyle>,
    lists: ListStyleManager,
    fonts: FontRegistry,
    page_spans: Vec<PageSpan>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self, family: StyleFamily, zone: Zone) -> String {
        self.allocators
            .entry(family)
            .or_default()
            .allocate(family.name_prefix(), zone)
    }

    /// Intern `properties` as a style of `family` in `zone`.
    pub fn add(&mut self, family: StyleFamily, properties: &PropertyList, zone: Zone) -> String {
        let key = format!("{}|{:?}|{}", family.as_str(), zone, properties.signature());
        if let Some(&index) = self.lookup.get(&key) {
            return self.styles[index].name().to_string();
        }

        if matches!(family, StyleFamily::Paragraph | StyleFamily::Text) {
            self.fonts.register_from(properties);
        }
        let name = self.allocate(family, zone);
        log::debug!("new {} style {}", family.as_str(), name);
        self.styles.push(Style::new(family, name.clone(), zone, properties.clone()));
        self.lookup.insert(key, self.styles.len() - 1);
        name
    }

    #[inline]
    pub fn add_paragraph(&mut self, properties: &PropertyList, zone: Zone) -> String {
        self.add(StyleFamily::Paragraph, properties, zone)
    }

    #[inline]
    pub fn add_span(&mut self, properties: &PropertyList, zone: Zone) -> String {
        self.add(StyleFamily::Text, properties, zone)
    }

    #[inline]
    pub fn add_section(&mut self, properties: &PropertyList, zone: Zone) -> String {
        self.add(StyleFamily::Section, properties, zone)
    }

    #[inline]
    pub fn add_graphic(&mut self, properties: &PropertyList, zone: Zone) -> String {
        self.add(StyleFamily::Graphic, properties, zone)
    }

    /// Create a named style in the `Style` zone.
    ///
    /// The name comes from `style:display-name` when one is given and not
    /// already taken; otherwise a `<prefix>_N<n>` name is allocated.
    fn define_named(&mut self, family: StyleFamily, properties: &PropertyList) -> String {
        let requested = properties
            .get_str("style:display-name")
            .map(|display| encode_style_name(&display))
            .filter(|name| !name.is_empty() && name != "Standard")
            .filter(|name| !self.styles.iter().any(|s| s.name() == name.as_str()));
        let name = match requested {
            Some(name) => name,
            None => self.allocate(family, Zone::Style),
        };

        self.fonts.register_from(properties);
        log::debug!("named {} style {}", family.as_str(), name);
        self.styles.push(Style::new(family, name.clone(), Zone::Style, properties.clone()));
        name
    }

    /// Define a named paragraph style, optionally under an id for later lookup.
    pub fn define_paragraph_style(&mut self, id: Option<i64>, properties: &PropertyList) -> String {
        let name = self.define_named(StyleFamily::Paragraph, properties);
        if let Some(id) = id {
            self.named_paragraphs.insert(id, name.clone());
        }
        name
    }

    /// Define a named character style, optionally under an id for later lookup.
    pub fn define_character_style(&mut self, id: Option<i64>, properties: &PropertyList) -> String {
        let name = self.define_named(StyleFamily::Text, properties);
        if let Some(id) = id {
            self.named_spans.insert(id, name.clone());
        }
        name
    }

    /// Named paragraph style defined under `id`.
    pub fn named_paragraph(&self, id: i64) -> Option<&str> {
        self.named_paragraphs.get(&id).map(String::as_str)
    }

    /// Named character style defined under `id`.
    pub fn named_span(&self, id: i64) -> Option<&str> {
        self.named_spans.get(&id).map(String::as_str)
    }

    /// Create a table style; tables never share styles.
    pub fn add_table(&mut self, properties: &PropertyList, zone: Zone, master_page: Option<&str>) -> usize {
        let name = self.allocate(StyleFamily::Table, zone);
        log::debug!("new table style {}", name);
        self.tables.push(TableStyle::new(name, zone, properties, master_page));
        self.tables.len() - 1
    }

    #[inline]
    pub fn table(&self, index: usize) -> Option<&TableStyle> {
        self.tables.get(index)
    }

    #[inline]
    pub fn table_mut(&mut self, index: usize) -> Option<&mut TableStyle> {
        self.tables.get_mut(index)
    }

    #[inline]
    pub fn lists(&self) -> &ListStyleManager {
        &self.lists
    }

    #[inline]
    pub fn lists_mut(&mut self) -> &mut ListStyleManager {
        &mut self.lists
    }

    #[inline]
    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    /// Create the layout and master page of a new page span.
    pub fn add_page_span(&mut self, properties: &PropertyList) -> usize {
        let span = PageSpan::new(self.page_spans.len(), properties);
        log::debug!("new page span {} / {}", span.layout_name(), span.master_name());
        self.page_spans.push(span);
        self.page_spans.len() - 1
    }

    #[inline]
    pub fn page_span(&self, index: usize) -> Option<&PageSpan> {
        self.page_spans.get(index)
    }

    #[inline]
    pub fn page_span_mut(&mut self, index: usize) -> Option<&mut PageSpan> {
        self.page_spans.get_mut(index)
    }

    #[inline]
    pub fn page_spans(&self) -> &[PageSpan] {
        &self.page_spans
    }

    /// Number of `style:style` records (tables excluded).
    #[inline]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Emit `office:font-face-decls`.
    pub fn write_font_faces(&self, handler: &mut dyn DocumentHandler) -> Result<()> {
        self.fonts.write(handler)
    }

    /// Emit the children of `office:styles`: the default paragraph style and
    /// every named style.
    pub fn write_named_styles(&self, handler: &mut dyn DocumentHandler) -> Result<()> {
        let standard = PropertyList::new()
            .with("style:name", "Standard")
            .with("style:family", "paragraph")
            .with("style:class", "text");
        handler.start_element("style:style", &standard)?;
        handler.end_element("style:style")?;
        self.write_zone(Zone::Style, handler)
    }

    /// Emit every style record, table style and list style of `zone`.
    pub fn write_zone(&self, zone: Zone, handler: &mut dyn DocumentHandler) -> Result<()> {
        for style in self.styles.iter().filter(|s| s.zone() == zone) {
            style.write(handler)?;
        }
        for table in self.tables.iter().filter(|t| t.zone() == zone) {
            table.write(handler)?;
        }
        self.lists.write_zone(zone, handler)
    }

    /// Emit every `style:page-layout`.
    pub fn write_page_layouts(&self, handler: &mut dyn DocumentHandler) -> Result<()> {
        for span in &self.page_spans {
            span.write_layout(handler)?;
        }
        Ok(())
    }

    /// Emit every `style:master-page`.
    pub fn write_master_pages(&self, handler: &mut dyn DocumentHandler) -> Result<()> {
        for span in &self.page_spans {
            span.write_master(handler)?;
        }
        Ok(())
    }
}
