//! Style records for the `style:style` families.

use super::{StyleFamily, Zone};
use crate::common::Result;
use crate::odf::handler::DocumentHandler;
use crate::odf::property::{PropertyList, PropertyListVector, is_reserved_key};
use phf::{Set, phf_set};

/// Keys that belong in `style:text-properties` rather than in the paragraph
/// properties of a paragraph style.
static TEXT_PROPERTY_KEYS: Set<&'static str> = phf_set! {
    "fo:color",
    "fo:country",
    "fo:hyphenate",
    "fo:language",
    "fo:letter-spacing",
    "fo:script",
    "fo:text-shadow",
    "fo:text-transform",
    "style:country-asian",
    "style:country-complex",
    "style:language-asian",
    "style:language-complex",
    "style:letter-kerning",
    "style:use-window-font-color",
};

/// `style:text-*` keys that are paragraph properties despite their prefix.
static PARAGRAPH_TEXT_KEYS: Set<&'static str> = phf_set! {
    "style:text-autospace",
    "style:text-align-source",
};

/// Keys stored on the `style:style` element itself.
const STYLE_ELEMENT_KEYS: [&str; 3] = [
    "style:parent-style-name",
    "style:master-page-name",
    "style:display-name",
];

/// Whether `key` is a character-level property.
pub fn is_text_property(key: &str) -> bool {
    if PARAGRAPH_TEXT_KEYS.contains(key) {
        return false;
    }
    TEXT_PROPERTY_KEYS.contains(key)
        || key.starts_with("fo:font-")
        || key.starts_with("style:font-")
        || key.starts_with("style:text-")
}

/// One `style:style` record.
#[derive(Debug, Clone)]
pub struct Style {
    family: StyleFamily,
    name: String,
    zone: Zone,
    display_name: Option<String>,
    parent: Option<String>,
    master_page: Option<String>,
    properties: PropertyList,
}

impl Style {
    /// Build a record; `style:parent-style-name`, `style:master-page-name` and
    /// `style:display-name` are lifted out of `properties` onto the element.
    pub fn new(family: StyleFamily, name: String, zone: Zone, mut properties: PropertyList) -> Self {
        let parent = properties.remove(STYLE_ELEMENT_KEYS[0]).map(|v| v.to_string());
        let master_page = properties.remove(STYLE_ELEMENT_KEYS[1]).map(|v| v.to_string());
        let display_name = properties.remove(STYLE_ELEMENT_KEYS[2]).map(|v| v.to_string());
        let parent = match family {
            StyleFamily::Paragraph => parent.or_else(|| Some("Standard".to_string())),
            _ => parent,
        };
        Self {
            family,
            name,
            zone,
            display_name,
            parent,
            master_page,
            properties,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn family(&self) -> StyleFamily {
        self.family
    }

    #[inline]
    pub fn zone(&self) -> Zone {
        self.zone
    }

    #[inline]
    pub fn properties(&self) -> &PropertyList {
        &self.properties
    }

    #[inline]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    #[inline]
    pub fn master_page(&self) -> Option<&str> {
        self.master_page.as_deref()
    }

    /// Emit the record.
    pub fn write(&self, handler: &mut dyn DocumentHandler) -> Result<()> {
        let mut attrs = PropertyList::new()
            .with("style:name", self.name.as_str())
            .with("style:family", self.family.as_str());
        if let Some(display) = &self.display_name {
            attrs.insert("style:display-name", display.as_str());
        }
        if let Some(parent) = &self.parent {
            attrs.insert("style:parent-style-name", parent.as_str());
        }
        if let Some(master) = &self.master_page {
            attrs.insert("style:master-page-name", master.as_str());
        }
        if self.family == StyleFamily::Paragraph && self.zone == Zone::Style {
            attrs.insert("style:class", "text");
        }
        handler.start_element("style:style", &attrs)?;

        match self.family {
            StyleFamily::Paragraph => {
                write_paragraph_properties(handler, &self.properties)?;
                let text = self.properties.filtered(is_text_property);
                write_properties(handler, "style:text-properties", &text)?;
            },
            StyleFamily::Section => write_section_properties(handler, &self.properties)?,
            family => write_properties(handler, family.properties_element(), &self.properties)?,
        }

        handler.end_element("style:style")
    }
}

/// Write `<element .../>` when `properties` yields at least one attribute.
pub(crate) fn write_properties(
    handler: &mut dyn DocumentHandler,
    element: &str,
    properties: &PropertyList,
) -> Result<()> {
    if !properties.has_attributes() {
        return Ok(());
    }
    handler.start_element(element, properties)?;
    handler.end_element(element)
}

fn write_paragraph_properties(handler: &mut dyn DocumentHandler, properties: &PropertyList) -> Result<()> {
    let paragraph = properties.filtered(|key| !is_text_property(key));
    let tab_stops = properties.get_vector("style:tab-stops").filter(|v| !v.is_empty());
    if !paragraph.has_attributes() && tab_stops.is_none() {
        return Ok(());
    }

    handler.start_element("style:paragraph-properties", &paragraph)?;
    if let Some(tab_stops) = tab_stops {
        handler.start_element("style:tab-stops", &PropertyList::new())?;
        for stop in tab_stops {
            handler.start_element("style:tab-stop", stop)?;
            handler.end_element("style:tab-stop")?;
        }
        handler.end_element("style:tab-stops")?;
    }
    handler.end_element("style:paragraph-properties")
}

fn write_section_properties(handler: &mut dyn DocumentHandler, properties: &PropertyList) -> Result<()> {
    let section = properties.filtered(|key| key != "fo:column-gap");
    handler.start_element("style:section-properties", &section)?;

    let columns = properties.get_vector("style:columns");
    match columns {
        Some(columns) if columns.len() >= 2 => write_columns(handler, properties, columns)?,
        _ => {
            // Single-column layouts are written as an explicit zero count
            let degenerate = PropertyList::new()
                .with("fo:column-count", 0)
                .with("fo:column-gap", "0.0in");
            handler.start_element("style:columns", &degenerate)?;
            handler.end_element("style:columns")?;
        },
    }

    handler.end_element("style:section-properties")
}

fn write_columns(
    handler: &mut dyn DocumentHandler,
    properties: &PropertyList,
    columns: &PropertyListVector,
) -> Result<()> {
    let gap = properties
        .get_str("fo:column-gap")
        .unwrap_or_else(|| "0in".to_string());
    let attrs = PropertyList::new()
        .with("fo:column-count", columns.len())
        .with("fo:column-gap", gap);
    handler.start_element("style:columns", &attrs)?;

    if let (Some(width), Some(color)) = (
        properties.get_str("librevenge:colsep-width"),
        properties.get_str("librevenge:colsep-color"),
    ) {
        let separator = PropertyList::new()
            .with("style:width", width)
            .with("style:color", color)
            .with(
                "style:height",
                properties
                    .get_str("librevenge:colsep-height")
                    .unwrap_or_else(|| "100%".to_string()),
            )
            .with(
                "style:vertical-align",
                properties
                    .get_str("librevenge:colsep-vertical-align")
                    .unwrap_or_else(|| "middle".to_string()),
            );
        handler.start_element("style:column-sep", &separator)?;
        handler.end_element("style:column-sep")?;
    }

    for column in columns {
        let column = column.filtered(|key| !is_reserved_key(key));
        handler.start_element("style:column", &column)?;
        handler.end_element("style:column")?;
    }

    handler.end_element("style:columns")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::handler::StringHandler;
    use crate::odf::property::PropertyValue;

    fn render(style: &Style) -> String {
        let mut out = StringHandler::new();
        style.write(&mut out).unwrap();
        out.into_string()
    }

    fn two_columns() -> PropertyListVector {
        PropertyListVector::new()
            .with(PropertyList::new().with("style:rel-width", "1*"))
            .with(PropertyList::new().with("style:rel-width", "1*"))
    }

    #[test]
    fn test_paragraph_splits_text_properties() {
        let props = PropertyList::new()
            .with("fo:margin-left", PropertyValue::inch(0.5))
            .with("fo:font-size", PropertyValue::point(12.0))
            .with("style:font-name", "Arial");
        let style = Style::new(StyleFamily::Paragraph, "P0".into(), Zone::ContentAutomatic, props);
        assert_eq!(
            render(&style),
            concat!(
                r#"<style:style style:name="P0" style:family="paragraph" style:parent-style-name="Standard">"#,
                r#"<style:paragraph-properties fo:margin-left="0.5in"/>"#,
                r#"<style:text-properties fo:font-size="12pt" style:font-name="Arial"/>"#,
                "</style:style>"
            )
        );
    }

    #[test]
    fn test_paragraph_tab_stops() {
        let stops = PropertyListVector::new()
            .with(PropertyList::new().with("style:position", PropertyValue::inch(1.0)));
        let props = PropertyList::new().with("style:tab-stops", stops);
        let style = Style::new(StyleFamily::Paragraph, "P0".into(), Zone::ContentAutomatic, props);
        let xml = render(&style);
        assert!(xml.contains(
            r#"<style:paragraph-properties><style:tab-stops><style:tab-stop style:position="1in"/></style:tab-stops></style:paragraph-properties>"#
        ));
    }

    #[test]
    fn test_master_page_lands_on_style_element() {
        let props = PropertyList::new().with("style:master-page-name", "Page_Style_0");
        let style = Style::new(StyleFamily::Paragraph, "P0".into(), Zone::ContentAutomatic, props);
        assert_eq!(style.master_page(), Some("Page_Style_0"));
        assert!(render(&style).contains(r#"style:master-page-name="Page_Style_0"/>"#));
    }

    #[test]
    fn test_section_with_separator_defaults() {
        let props = PropertyList::new()
            .with("style:columns", two_columns())
            .with("librevenge:colsep-width", PropertyValue::inch(0.01))
            .with("librevenge:colsep-color", "#000000");
        let style = Style::new(StyleFamily::Section, "Section0".into(), Zone::ContentAutomatic, props);
        let xml = render(&style);
        assert!(xml.contains(r#"<style:columns fo:column-count="2" fo:column-gap="0in">"#));
        assert!(xml.contains(
            r##"<style:column-sep style:width="0.01in" style:color="#000000" style:height="100%" style:vertical-align="middle"/>"##
        ));
        assert_eq!(xml.matches("<style:column ").count(), 2);
        assert!(!xml.contains("librevenge"));
    }

    #[test]
    fn test_section_single_column_degenerates() {
        for columns in [
            PropertyListVector::new(),
            PropertyListVector::new().with(PropertyList::new().with("style:rel-width", "5*")),
        ] {
            let props = PropertyList::new().with("style:columns", columns);
            let style = Style::new(StyleFamily::Section, "Section0".into(), Zone::ContentAutomatic, props);
            let xml = render(&style);
            assert!(xml.contains(r#"<style:columns fo:column-count="0" fo:column-gap="0.0in"/>"#));
            assert!(!xml.contains("<style:column "));
        }
    }

    #[test]
    fn test_text_property_classification() {
        assert!(is_text_property("fo:font-weight"));
        assert!(is_text_property("style:text-underline-style"));
        assert!(!is_text_property("style:text-autospace"));
        assert!(!is_text_property("fo:text-align"));
        assert!(!is_text_property("fo:margin-top"));
    }
}
