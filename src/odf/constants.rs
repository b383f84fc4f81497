//! ODF constants: MIME types, package part paths and XML namespaces.
//!
//! # References
//!
//! - ODF 1.3 Part 3 (Packages), §3 (manifest), §19 (namespaces)

use phf::{Map, phf_map};

/// ODF specification version written on every root element
pub const OFFICE_VERSION: &str = "1.3";

// ============================================================================
// MIME TYPES
// ============================================================================

/// MIME type for OpenDocument Text (.odt)
pub const ODF_TEXT: &str = "application/vnd.oasis.opendocument.text";

/// MIME type for OpenDocument Spreadsheet (.ods)
pub const ODF_SPREADSHEET: &str = "application/vnd.oasis.opendocument.spreadsheet";

/// MIME type for OpenDocument Presentation (.odp)
pub const ODF_PRESENTATION: &str = "application/vnd.oasis.opendocument.presentation";

/// MIME type for OpenDocument Drawing (.odg)
pub const ODF_DRAWING: &str = "application/vnd.oasis.opendocument.graphics";

/// MIME type of XML package parts in the manifest
pub const XML_MEDIA_TYPE: &str = "text/xml";

// ============================================================================
// STANDARD ODF PARTS PATHS
// ============================================================================

/// Path to the mimetype entry (first, stored uncompressed)
pub const ODF_MIMETYPE: &str = "mimetype";

/// Path to content.xml (main document content)
pub const ODF_CONTENT: &str = "content.xml";

/// Path to meta.xml (document metadata)
pub const ODF_META: &str = "meta.xml";

/// Path to settings.xml (application settings)
pub const ODF_SETTINGS: &str = "settings.xml";

/// Path to styles.xml (document styles)
pub const ODF_STYLES: &str = "styles.xml";

/// Path to manifest.xml (package manifest)
pub const ODF_MANIFEST: &str = "META-INF/manifest.xml";

// ============================================================================
// NAMESPACES
// ============================================================================

/// Prefix to namespace URI (compile-time perfect hash map)
pub static PREFIX_TO_URI: Map<&'static str, &'static str> = phf_map! {
    "office" => "urn:oasis:names:tc:opendocument:xmlns:office:1.0",
    "style" => "urn:oasis:names:tc:opendocument:xmlns:style:1.0",
    "text" => "urn:oasis:names:tc:opendocument:xmlns:text:1.0",
    "table" => "urn:oasis:names:tc:opendocument:xmlns:table:1.0",
    "draw" => "urn:oasis:names:tc:opendocument:xmlns:drawing:1.0",
    "fo" => "urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0",
    "xlink" => "http://www.w3.org/1999/xlink",
    "dc" => "http://purl.org/dc/elements/1.1/",
    "meta" => "urn:oasis:names:tc:opendocument:xmlns:meta:1.0",
    "number" => "urn:oasis:names:tc:opendocument:xmlns:datastyle:1.0",
    "presentation" => "urn:oasis:names:tc:opendocument:xmlns:presentation:1.0",
    "svg" => "urn:oasis:names:tc:opendocument:xmlns:svg-compatible:1.0",
    "chart" => "urn:oasis:names:tc:opendocument:xmlns:chart:1.0",
    "dr3d" => "urn:oasis:names:tc:opendocument:xmlns:dr3d:1.0",
    "math" => "http://www.w3.org/1998/Math/MathML",
    "form" => "urn:oasis:names:tc:opendocument:xmlns:form:1.0",
    "script" => "urn:oasis:names:tc:opendocument:xmlns:script:1.0",
    "config" => "urn:oasis:names:tc:opendocument:xmlns:config:1.0",
    "ooo" => "http://openoffice.org/2004/office",
    "loext" => "urn:org:documentfoundation:names:experimental:office:xmlns:loext:1.0",
    "manifest" => "urn:oasis:names:tc:opendocument:xmlns:manifest:1.0",
};

/// Namespaces declared on document roots, in declaration order
pub const DOCUMENT_NAMESPACES: &[&str] = &[
    "office",
    "style",
    "text",
    "table",
    "draw",
    "fo",
    "xlink",
    "dc",
    "meta",
    "number",
    "presentation",
    "svg",
    "chart",
    "dr3d",
    "math",
    "form",
    "script",
    "config",
    "ooo",
    "loext",
];

/// Namespaces declared on the meta.xml root
pub const META_NAMESPACES: &[&str] = &["office", "xlink", "dc", "meta", "ooo"];

/// Namespaces declared on the settings.xml root
pub const SETTINGS_NAMESPACES: &[&str] = &["office", "xlink", "config", "ooo"];

/// Get the namespace URI bound to `prefix`.
///
/// # Examples
///
/// ```
/// use odfgen::odf::constants::namespace_uri;
///
/// assert_eq!(namespace_uri("xlink"), Some("http://www.w3.org/1999/xlink"));
/// assert_eq!(namespace_uri("nope"), None);
/// ```
#[inline]
pub fn namespace_uri(prefix: &str) -> Option<&'static str> {
    PREFIX_TO_URI.get(prefix).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_declared_namespace_is_known() {
        for prefix in DOCUMENT_NAMESPACES
            .iter()
            .chain(META_NAMESPACES)
            .chain(SETTINGS_NAMESPACES)
        {
            assert!(namespace_uri(prefix).is_some(), "missing namespace {prefix}");
        }
        assert!(namespace_uri("manifest").is_some());
    }
}
