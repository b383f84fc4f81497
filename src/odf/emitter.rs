//! Serialisation of a finished document.
//!
//! [`OdfDocument`] holds everything the generator collected. It can be
//! written as one flat XML document or as the separate streams of a package;
//! both envelopes carry the same logical content in the same order: metadata,
//! settings, font faces, named styles, automatic styles, master pages, body.

use super::DocumentKind;
use super::constants::{
    DOCUMENT_NAMESPACES, META_NAMESPACES, ODF_CONTENT, ODF_MANIFEST, ODF_META, ODF_SETTINGS,
    ODF_STYLES, OFFICE_VERSION, SETTINGS_NAMESPACES, XML_MEDIA_TYPE, namespace_uri,
};
use super::element::ElementStorage;
use super::handler::{DocumentHandler, StringHandler};
use super::options::GeneratorOptions;
use super::property::{PropertyList, PropertyValue, is_reserved_key};
use super::style::{StyleRegistry, Zone};
use crate::common::Result;
use smallvec::SmallVec;

/// Hundredths of a millimetre per inch, the unit of view settings.
const HMM_PER_INCH: f64 = 2540.0;

/// Stream selected when writing a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OdfStreamType {
    /// Single flat XML document (`office:document`)
    Flat,
    /// `content.xml`
    Content,
    /// `styles.xml`
    Styles,
    /// `settings.xml`
    Settings,
    /// `meta.xml`
    Meta,
    /// `META-INF/manifest.xml`
    Manifest,
}

impl OdfStreamType {
    /// Path of the stream inside a package.
    pub fn part_name(self) -> Option<&'static str> {
        match self {
            Self::Flat => None,
            Self::Content => Some(ODF_CONTENT),
            Self::Styles => Some(ODF_STYLES),
            Self::Settings => Some(ODF_SETTINGS),
            Self::Meta => Some(ODF_META),
            Self::Manifest => Some(ODF_MANIFEST),
        }
    }
}

/// A fully collected document, ready to be written.
#[derive(Debug, Clone)]
pub struct OdfDocument {
    pub(crate) options: GeneratorOptions,
    pub(crate) styles: StyleRegistry,
    pub(crate) metadata: PropertyList,
    pub(crate) body: ElementStorage,
}

impl OdfDocument {
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            options,
            styles: StyleRegistry::new(),
            metadata: PropertyList::new(),
            body: ElementStorage::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> DocumentKind {
        self.options.kind
    }

    #[inline]
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    #[inline]
    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    #[inline]
    pub fn metadata(&self) -> &PropertyList {
        &self.metadata
    }

    #[inline]
    pub fn body(&self) -> &ElementStorage {
        &self.body
    }

    /// XML streams of a package, in writing order (the manifest excluded).
    pub fn package_streams(&self) -> SmallVec<[OdfStreamType; 4]> {
        let mut streams = SmallVec::new();
        streams.push(OdfStreamType::Meta);
        streams.push(OdfStreamType::Styles);
        if self.options.include_settings {
            streams.push(OdfStreamType::Settings);
        }
        streams.push(OdfStreamType::Content);
        streams
    }

    /// Write one complete stream.
    pub fn write(&self, stream: OdfStreamType, handler: &mut dyn DocumentHandler) -> Result<()> {
        log::debug!("writing {:?} stream", stream);
        handler.start_document()?;
        match stream {
            OdfStreamType::Flat => self.write_flat(handler)?,
            OdfStreamType::Content => self.write_content(handler)?,
            OdfStreamType::Styles => self.write_styles(handler)?,
            OdfStreamType::Settings => self.write_settings_stream(handler)?,
            OdfStreamType::Meta => self.write_meta_stream(handler)?,
            OdfStreamType::Manifest => self.write_manifest(handler)?,
        }
        handler.end_document()
    }

    /// Render one stream to a string.
    pub fn to_xml(&self, stream: OdfStreamType) -> Result<String> {
        let mut handler = StringHandler::new();
        self.write(stream, &mut handler)?;
        Ok(handler.into_string())
    }

    fn root_attributes(namespaces: &[&str]) -> PropertyList {
        let mut attrs = PropertyList::new();
        for prefix in namespaces {
            if let Some(uri) = namespace_uri(prefix) {
                attrs.insert(&format!("xmlns:{}", prefix), uri);
            }
        }
        attrs.insert("office:version", OFFICE_VERSION);
        attrs
    }

    fn write_flat(&self, handler: &mut dyn DocumentHandler) -> Result<()> {
        let mut attrs = Self::root_attributes(DOCUMENT_NAMESPACES);
        attrs.insert("office:mimetype", self.kind().mime_type());
        handler.start_element("office:document", &attrs)?;

        self.write_meta(handler)?;
        if self.options.include_settings {
            self.write_settings(handler)?;
        }
        self.styles.write_font_faces(handler)?;
        self.write_office_styles(handler)?;

        handler.start_element("office:automatic-styles", &PropertyList::new())?;
        self.styles.write_page_layouts(handler)?;
        self.styles.write_zone(Zone::StyleAutomatic, handler)?;
        self.styles.write_zone(Zone::ContentAutomatic, handler)?;
        handler.end_element("office:automatic-styles")?;

        self.write_master_styles(handler)?;
        self.write_body(handler)?;
        handler.end_element("office:document")
    }

    fn write_content(&self, handler: &mut dyn DocumentHandler) -> Result<()> {
        let attrs = Self::root_attributes(DOCUMENT_NAMESPACES);
        handler.start_element("office:document-content", &attrs)?;
        self.styles.write_font_faces(handler)?;
        handler.start_element("office:automatic-styles", &PropertyList::new())?;
        self.styles.write_zone(Zone::ContentAutomatic, handler)?;
        handler.end_element("office:automatic-styles")?;
        self.write_body(handler)?;
        handler.end_element("office:document-content")
    }

    fn write_styles(&self, handler: &mut dyn DocumentHandler) -> Result<()> {
        let attrs = Self::root_attributes(DOCUMENT_NAMESPACES);
        handler.start_element("office:document-styles", &attrs)?;
        self.styles.write_font_faces(handler)?;
        self.write_office_styles(handler)?;
        handler.start_element("office:automatic-styles", &PropertyList::new())?;
        self.styles.write_page_layouts(handler)?;
        self.styles.write_zone(Zone::StyleAutomatic, handler)?;
        handler.end_element("office:automatic-styles")?;
        self.write_master_styles(handler)?;
        handler.end_element("office:document-styles")
    }

    fn write_settings_stream(&self, handler: &mut dyn DocumentHandler) -> Result<()> {
        let attrs = Self::root_attributes(SETTINGS_NAMESPACES);
        handler.start_element("office:document-settings", &attrs)?;
        self.write_settings(handler)?;
        handler.end_element("office:document-settings")
    }

    fn write_meta_stream(&self, handler: &mut dyn DocumentHandler) -> Result<()> {
        let attrs = Self::root_attributes(META_NAMESPACES);
        handler.start_element("office:document-meta", &attrs)?;
        self.write_meta(handler)?;
        handler.end_element("office:document-meta")
    }

    fn write_office_styles(&self, handler: &mut dyn DocumentHandler) -> Result<()> {
        handler.start_element("office:styles", &PropertyList::new())?;
        self.styles.write_named_styles(handler)?;
        handler.end_element("office:styles")
    }

    fn write_master_styles(&self, handler: &mut dyn DocumentHandler) -> Result<()> {
        handler.start_element("office:master-styles", &PropertyList::new())?;
        self.styles.write_master_pages(handler)?;
        handler.end_element("office:master-styles")
    }

    fn write_body(&self, handler: &mut dyn DocumentHandler) -> Result<()> {
        let body = self.kind().body_element();
        handler.start_element("office:body", &PropertyList::new())?;
        handler.start_element(body, &PropertyList::new())?;
        self.body.write(handler)?;
        handler.end_element(body)?;
        handler.end_element("office:body")
    }

    fn write_text_element(handler: &mut dyn DocumentHandler, name: &str, text: &str) -> Result<()> {
        handler.start_element(name, &PropertyList::new())?;
        handler.characters(text)?;
        handler.end_element(name)
    }

    fn write_meta(&self, handler: &mut dyn DocumentHandler) -> Result<()> {
        handler.start_element("office:meta", &PropertyList::new())?;
        Self::write_text_element(handler, "meta:generator", &self.options.generator)?;
        if let Some(date) = self.options.creation_date
            && !self.metadata.contains("meta:creation-date")
        {
            let stamp = date.format("%Y-%m-%dT%H:%M:%S").to_string();
            Self::write_text_element(handler, "meta:creation-date", &stamp)?;
        }
        for (key, value) in self.metadata.iter() {
            if is_reserved_key(key)
                || key == "meta:generator"
                || matches!(value, PropertyValue::Vector(_))
                || !(key.starts_with("dc:") || key.starts_with("meta:"))
            {
                continue;
            }
            Self::write_text_element(handler, key, &value.to_string())?;
        }
        handler.end_element("office:meta")
    }

    fn write_config_item(handler: &mut dyn DocumentHandler, name: &str, kind: &str, value: &str) -> Result<()> {
        let attrs = PropertyList::new()
            .with("config:name", name)
            .with("config:type", kind);
        handler.start_element("config:config-item", &attrs)?;
        handler.characters(value)?;
        handler.end_element("config:config-item")
    }

    fn write_settings(&self, handler: &mut dyn DocumentHandler) -> Result<()> {
        let first_page = self.styles.page_spans().first().map(|s| s.properties());
        let extent = |key: &str| -> i64 {
            first_page
                .and_then(|p| p.get_inches(key))
                .map(|inches| (inches * HMM_PER_INCH).round() as i64)
                .unwrap_or(0)
        };
        let mut buf = itoa::Buffer::new();

        handler.start_element("office:settings", &PropertyList::new())?;
        let view = PropertyList::new().with("config:name", "ooo:view-settings");
        handler.start_element("config:config-item-set", &view)?;
        Self::write_config_item(handler, "ViewAreaTop", "int", "0")?;
        Self::write_config_item(handler, "ViewAreaLeft", "int", "0")?;
        Self::write_config_item(handler, "ViewAreaWidth", "int", buf.format(extent("fo:page-width")))?;
        Self::write_config_item(handler, "ViewAreaHeight", "int", buf.format(extent("fo:page-height")))?;
        handler.end_element("config:config-item-set")?;

        let configuration = PropertyList::new().with("config:name", "ooo:configuration-settings");
        handler.start_element("config:config-item-set", &configuration)?;
        Self::write_config_item(handler, "PrinterIndependentLayout", "string", "high-resolution")?;
        handler.end_element("config:config-item-set")?;
        handler.end_element("office:settings")
    }

    fn write_manifest(&self, handler: &mut dyn DocumentHandler) -> Result<()> {
        let mut attrs = PropertyList::new();
        if let Some(uri) = namespace_uri("manifest") {
            attrs.insert("xmlns:manifest", uri);
        }
        attrs.insert("manifest:version", OFFICE_VERSION);
        handler.start_element("manifest:manifest", &attrs)?;

        let root = PropertyList::new()
            .with("manifest:full-path", "/")
            .with("manifest:version", OFFICE_VERSION)
            .with("manifest:media-type", self.kind().mime_type());
        handler.start_element("manifest:file-entry", &root)?;
        handler.end_element("manifest:file-entry")?;

        for stream in self.package_streams() {
            let Some(path) = stream.part_name() else {
                continue;
            };
            let entry = PropertyList::new()
                .with("manifest:full-path", path)
                .with("manifest:media-type", XML_MEDIA_TYPE);
            handler.start_element("manifest:file-entry", &entry)?;
            handler.end_element("manifest:file-entry")?;
        }
        handler.end_element("manifest:manifest")
    }
}
