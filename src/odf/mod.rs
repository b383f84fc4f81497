//! OpenDocument generation.
//!
//! A format parser drives an [`OdfGenerator`] with content events; the
//! generator interns styles, tracks nesting and records elements, and at the
//! end hands every registered [`DocumentHandler`] the stream it asked for.
//! [`OdfFilter`] wraps one conversion with a single-use lifecycle and
//! [`PackageWriter`] turns a finished [`OdfDocument`] into a ZIP package.

pub mod constants;
/// Recorded element trees
pub mod element;
/// Zone writer
pub mod emitter;
/// Single-use conversion driver and input streams
pub mod filter;
/// Event entry points
pub mod generator;
/// Output sinks
pub mod handler;
pub mod options;
#[cfg(feature = "package")]
pub mod package;
pub mod property;
/// Nesting state of lists, tables and open contexts
pub mod state;
/// Style interning and naming
pub mod style;

pub use emitter::{OdfDocument, OdfStreamType};
pub use filter::{Confidence, DocumentParser, FilterState, InputStream, MemoryInputStream, OdfFilter};
pub use generator::OdfGenerator;
pub use handler::{DocumentHandler, FileHandler, StdoutHandler, StreamHandler, StringHandler};
pub use options::GeneratorOptions;
#[cfg(feature = "package")]
pub use package::PackageWriter;
pub use property::{PropertyList, PropertyListVector, PropertyValue};
pub use style::Zone;

use phf::{Map, phf_map};

/// Flavour of the generated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentKind {
    /// OpenDocument Text (.odt)
    #[default]
    Text,
    /// OpenDocument Drawing (.odg)
    Drawing,
    /// OpenDocument Presentation (.odp)
    Presentation,
    /// OpenDocument Spreadsheet (.ods)
    Spreadsheet,
}

static MIME_TO_KIND: Map<&'static str, DocumentKind> = phf_map! {
    "application/vnd.oasis.opendocument.text" => DocumentKind::Text,
    "application/vnd.oasis.opendocument.text-template" => DocumentKind::Text,
    "application/vnd.oasis.opendocument.graphics" => DocumentKind::Drawing,
    "application/vnd.oasis.opendocument.graphics-template" => DocumentKind::Drawing,
    "application/vnd.oasis.opendocument.presentation" => DocumentKind::Presentation,
    "application/vnd.oasis.opendocument.presentation-template" => DocumentKind::Presentation,
    "application/vnd.oasis.opendocument.spreadsheet" => DocumentKind::Spreadsheet,
    "application/vnd.oasis.opendocument.spreadsheet-template" => DocumentKind::Spreadsheet,
};

impl DocumentKind {
    /// MIME type written to the `mimetype` entry and `office:mimetype`.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Text => constants::ODF_TEXT,
            Self::Drawing => constants::ODF_DRAWING,
            Self::Presentation => constants::ODF_PRESENTATION,
            Self::Spreadsheet => constants::ODF_SPREADSHEET,
        }
    }

    /// Child of `office:body` holding the content.
    pub fn body_element(self) -> &'static str {
        match self {
            Self::Text => "office:text",
            Self::Drawing => "office:drawing",
            Self::Presentation => "office:presentation",
            Self::Spreadsheet => "office:spreadsheet",
        }
    }

    /// Package file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "odt",
            Self::Drawing => "odg",
            Self::Presentation => "odp",
            Self::Spreadsheet => "ods",
        }
    }

    /// Flat XML file extension.
    pub fn flat_extension(self) -> &'static str {
        match self {
            Self::Text => "fodt",
            Self::Drawing => "fodg",
            Self::Presentation => "fodp",
            Self::Spreadsheet => "fods",
        }
    }

    /// Kind for a MIME type, template variants included.
    ///
    /// ```
    /// use odfgen::odf::DocumentKind;
    ///
    /// assert_eq!(
    ///     DocumentKind::from_mime_type("application/vnd.oasis.opendocument.graphics"),
    ///     Some(DocumentKind::Drawing)
    /// );
    /// assert_eq!(DocumentKind::from_mime_type("text/plain"), None);
    /// ```
    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        MIME_TO_KIND.get(mime_type).copied()
    }
}
