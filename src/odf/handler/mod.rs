//! Output sinks.
//!
//! Every destination the generator writes to (a file, standard output, an
//! in-memory buffer, a package part) implements [`DocumentHandler`]. The
//! serialisation protocol is shared by all of them and lives in
//! [`StreamHandler`]:
//!
//! - a start tag stays *pending* until something follows it, so that an
//!   element closed right away is written as `<tag/>`;
//! - character data forces the pending tag out with `>`; empty text is a no-op;
//! - closing a tag other than the pending one writes `>` and then the
//!   explicit `</tag>` (defensive path for malformed event streams);
//! - keys in the reserved `librevenge:` namespace never become attributes.

mod stream;
mod string;

pub use stream::{FileHandler, StdoutHandler, StreamHandler};
pub use string::StringHandler;

use crate::common::Result;
use crate::odf::property::PropertyList;

/// Receiver of serialised ODF XML.
pub trait DocumentHandler {
    /// Begin a new XML document.
    fn start_document(&mut self) -> Result<()>;

    /// Finish the document, flushing any pending start tag.
    fn end_document(&mut self) -> Result<()>;

    /// Open an element; non-reserved entries of `attributes` become XML attributes.
    fn start_element(&mut self, name: &str, attributes: &PropertyList) -> Result<()>;

    /// Close an element.
    fn end_element(&mut self, name: &str) -> Result<()>;

    /// Write character data.
    fn characters(&mut self, text: &str) -> Result<()>;
}

impl<H: DocumentHandler + ?Sized> DocumentHandler for &mut H {
    fn start_document(&mut self) -> Result<()> {
        (**self).start_document()
    }

    fn end_document(&mut self) -> Result<()> {
        (**self).end_document()
    }

    fn start_element(&mut self, name: &str, attributes: &PropertyList) -> Result<()> {
        (**self).start_element(name, attributes)
    }

    fn end_element(&mut self, name: &str) -> Result<()> {
        (**self).end_element(name)
    }

    fn characters(&mut self, text: &str) -> Result<()> {
        (**self).characters(text)
    }
}
