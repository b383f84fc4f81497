use super::record::write_properties;
use crate::common::Result;
use crate::odf::element::ElementStorage;
use crate::odf::handler::DocumentHandler;
use crate::odf::property::PropertyList;

/// Which header or footer slot of a master page some content fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HeaderFooterKind {
    Header,
    HeaderLeft,
    HeaderFirst,
    Footer,
    FooterLeft,
    FooterFirst,
}

impl HeaderFooterKind {
    /// Slot selected by a `librevenge:occurrence` value.
    pub fn from_occurrence(footer: bool, occurrence: Option<&str>) -> Self {
        match (footer, occurrence) {
            (false, Some("left" | "even")) => Self::HeaderLeft,
            (false, Some("first")) => Self::HeaderFirst,
            (false, _) => Self::Header,
            (true, Some("left" | "even")) => Self::FooterLeft,
            (true, Some("first")) => Self::FooterFirst,
            (true, _) => Self::Footer,
        }
    }

    pub fn element_name(self) -> &'static str {
        match self {
            Self::Header => "style:header",
            Self::HeaderLeft => "style:header-left",
            Self::HeaderFirst => "style:header-first",
            Self::Footer => "style:footer",
            Self::FooterLeft => "style:footer-left",
            Self::FooterFirst => "style:footer-first",
        }
    }

    #[inline]
    pub fn is_footer(self) -> bool {
        matches!(self, Self::Footer | Self::FooterLeft | Self::FooterFirst)
    }
}

#[derive(Debug, Clone)]
struct HeaderFooter {
    kind: HeaderFooterKind,
    properties: PropertyList,
    content: ElementStorage,
}

/// A page layout (`PM<n>`) and its master page (`Page_Style_<n>`).
#[derive(Debug, Clone)]
pub struct PageSpan {
    layout_name: String,
    master_name: String,
    properties: PropertyList,
    header_footers: Vec<HeaderFooter>,
}

impl PageSpan {
    pub fn new(index: usize, properties: &PropertyList) -> Self {
        let mut buf = itoa::Buffer::new();
        let n = buf.format(index);
        Self {
            layout_name: format!("PM{}", n),
            master_name: format!("Page_Style_{}", n),
            properties: properties.clone(),
            header_footers: Vec::new(),
        }
    }

    #[inline]
    pub fn layout_name(&self) -> &str {
        &self.layout_name
    }

    #[inline]
    pub fn master_name(&self) -> &str {
        &self.master_name
    }

    #[inline]
    pub fn properties(&self) -> &PropertyList {
        &self.properties
    }

    /// Store header or footer content, replacing earlier content of the same slot.
    pub fn set_header_footer(&mut self, kind: HeaderFooterKind, properties: PropertyList, content: ElementStorage) {
        self.header_footers.retain(|h| h.kind != kind);
        self.header_footers.push(HeaderFooter {
            kind,
            properties,
            content,
        });
        self.header_footers.sort_by_key(|h| h.kind);
    }

    /// Emit `style:page-layout`.
    pub fn write_layout(&self, handler: &mut dyn DocumentHandler) -> Result<()> {
        let attrs = PropertyList::new().with("style:name", self.layout_name.as_str());
        handler.start_element("style:page-layout", &attrs)?;
        write_properties(handler, "style:page-layout-properties", &self.properties)?;

        for (footer, element) in [(false, "style:header-style"), (true, "style:footer-style")] {
            let Some(first) = self.header_footers.iter().find(|h| h.kind.is_footer() == footer) else {
                continue;
            };
            let mut props = first
                .properties
                .filtered(|key| key.starts_with("fo:") || key.starts_with("style:"));
            if !props.contains("fo:min-height") {
                props.insert("fo:min-height", "0in");
            }
            handler.start_element(element, &PropertyList::new())?;
            write_properties(handler, "style:header-footer-properties", &props)?;
            handler.end_element(element)?;
        }

        handler.end_element("style:page-layout")
    }

    /// Emit `style:master-page` with its header and footer content.
    pub fn write_master(&self, handler: &mut dyn DocumentHandler) -> Result<()> {
        let attrs = PropertyList::new()
            .with("style:name", self.master_name.as_str())
            .with("style:page-layout-name", self.layout_name.as_str());
        handler.start_element("style:master-page", &attrs)?;
        for header_footer in &self.header_footers {
            let element = header_footer.kind.element_name();
            handler.start_element(element, &PropertyList::new())?;
            header_footer.content.write(handler)?;
            handler.end_element(element)?;
        }
        handler.end_element("style:master-page")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::handler::StringHandler;
    use crate::odf::property::PropertyValue;

    #[test]
    fn test_names_follow_index() {
        let span = PageSpan::new(3, &PropertyList::new());
        assert_eq!(span.layout_name(), "PM3");
        assert_eq!(span.master_name(), "Page_Style_3");
    }

    #[test]
    fn test_occurrence_mapping() {
        assert_eq!(HeaderFooterKind::from_occurrence(false, None), HeaderFooterKind::Header);
        assert_eq!(HeaderFooterKind::from_occurrence(false, Some("both")), HeaderFooterKind::Header);
        assert_eq!(HeaderFooterKind::from_occurrence(true, Some("even")), HeaderFooterKind::FooterLeft);
        assert_eq!(HeaderFooterKind::from_occurrence(true, Some("first")), HeaderFooterKind::FooterFirst);
    }

    #[test]
    fn test_layout_and_master() {
        let props = PropertyList::new()
            .with("fo:page-width", PropertyValue::inch(8.5))
            .with("fo:page-height", PropertyValue::inch(11.0))
            .with("librevenge:num-pages", 1);
        let mut span = PageSpan::new(0, &props);
        let mut content = ElementStorage::new();
        content.open("text:p");
        content.characters("header");
        content.close_element("text:p");
        span.set_header_footer(HeaderFooterKind::Header, PropertyList::new(), content);

        let mut out = StringHandler::new();
        span.write_layout(&mut out).unwrap();
        span.write_master(&mut out).unwrap();
        assert_eq!(
            out.as_str(),
            concat!(
                r#"<style:page-layout style:name="PM0">"#,
                r#"<style:page-layout-properties fo:page-width="8.5in" fo:page-height="11in"/>"#,
                r#"<style:header-style><style:header-footer-properties fo:min-height="0in"/></style:header-style>"#,
                "</style:page-layout>",
                r#"<style:master-page style:name="Page_Style_0" style:page-layout-name="PM0">"#,
                "<style:header><text:p>header</text:p></style:header>",
                "</style:master-page>"
            )
        );
    }
}
