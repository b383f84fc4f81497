//! odfgen - a streaming OpenDocument generator
//!
//! Format importers (word processors, drawing programs, spreadsheets) decode
//! their input into a sequence of content events: open a paragraph, insert
//! text, open a table cell, and so on, each carrying a property bag. This
//! crate receives those events, interns and names the styles they imply,
//! keeps the nesting of lists, tables, frames and notes consistent, and
//! writes the result as ODF XML.
//!
//! # Features
//!
//! - **Event generator**: [`odf::OdfGenerator`] with one entry point per event
//! - **Style deduplication**: identical property bags share one automatic style
//! - **Forgiving state machine**: out-of-place events are logged and repaired
//! - **Pluggable sinks**: in-memory, file, stdout or any [`std::io::Write`]
//! - **Packages**: flat XML (`.fodt`) or ZIP packages (`.odt`, `package` feature)
//!
//! # Example - Flat XML in memory
//!
//! ```
//! use odfgen::odf::{OdfGenerator, OdfStreamType, PropertyList, PropertyValue, StringHandler};
//!
//! # fn main() -> odfgen::Result<()> {
//! let mut out = StringHandler::new();
//! let mut generator = OdfGenerator::default();
//! generator.add_document_handler(&mut out, OdfStreamType::Flat);
//!
//! generator.open_page_span(
//!     &PropertyList::new()
//!         .with("fo:page-width", PropertyValue::inch(8.5))
//!         .with("fo:page-height", PropertyValue::inch(11.0)),
//! );
//! generator.open_paragraph(&PropertyList::new().with("fo:text-align", "center"));
//! generator.insert_text("Hello, ODF");
//! generator.close_paragraph();
//! generator.close_page_span();
//! generator.end_document()?;
//! drop(generator);
//!
//! assert!(out.as_str().contains("Hello, ODF"));
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Package on disk
//!
//! ```no_run
//! use odfgen::odf::{OdfGenerator, PackageWriter, PropertyList};
//! use std::fs::File;
//!
//! # fn main() -> odfgen::Result<()> {
//! let mut generator = OdfGenerator::default();
//! generator.open_paragraph(&PropertyList::new());
//! generator.insert_text("stored in a zip");
//! generator.close_paragraph();
//! let document = generator.finish();
//!
//! let mut writer = PackageWriter::new(File::create("out.odt")?, document.kind().mime_type())?;
//! writer.write_document(&document)?;
//! writer.finish()?;
//! # Ok(())
//! # }
//! ```

/// Shared utilities: errors, units and XML escaping
pub mod common;

/// ODF generation: events, styles, state, emission and packaging
pub mod odf;

pub use common::{Error, Result};
pub use odf::{
    DocumentHandler, DocumentKind, GeneratorOptions, OdfDocument, OdfFilter, OdfGenerator, OdfStreamType,
    PropertyList, PropertyValue,
};
