//! ODF package (ZIP) writing.
//!
//! The `mimetype` entry comes first and is stored uncompressed so that the
//! format can be sniffed from the first bytes of the file; every other part
//! is deflated.

use super::constants::ODF_MIMETYPE;
use super::emitter::{OdfDocument, OdfStreamType};
use crate::common::Result;
use std::io::{Seek, Write};
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Writer of an ODF package.
///
/// # Examples
///
/// ```
/// use odfgen::odf::{OdfGenerator, PackageWriter, PropertyList};
/// use std::io::Cursor;
///
/// # fn main() -> odfgen::Result<()> {
/// let mut generator = OdfGenerator::default();
/// generator.open_paragraph(&PropertyList::new());
/// generator.insert_text("packaged");
/// generator.close_paragraph();
/// let document = generator.finish();
///
/// let mut writer = PackageWriter::new(Cursor::new(Vec::new()), document.kind().mime_type())?;
/// writer.write_document(&document)?;
/// let bytes = writer.finish()?.into_inner();
/// assert_eq!(&bytes[..2], b"PK");
/// # Ok(())
/// # }
/// ```
pub struct PackageWriter<W: Write + Seek> {
    zip_writer: ZipWriter<W>,
}

impl<W: Write + Seek> PackageWriter<W> {
    /// Start a package on `writer`, writing the `mimetype` entry.
    pub fn new(writer: W, mimetype: &str) -> Result<Self> {
        let mut zip_writer = ZipWriter::new(writer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        zip_writer.start_file(ODF_MIMETYPE, options)?;
        zip_writer.write_all(mimetype.as_bytes())?;
        Ok(Self { zip_writer })
    }

    /// Add a deflated part.
    pub fn add_file(&mut self, path: &str, content: &[u8]) -> Result<()> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.zip_writer.start_file(path, options)?;
        self.zip_writer.write_all(content)?;
        Ok(())
    }

    /// Add every stream of `document` followed by its manifest.
    pub fn write_document(&mut self, document: &OdfDocument) -> Result<()> {
        let streams = document.package_streams();
        for stream in streams.iter().copied().chain([OdfStreamType::Manifest]) {
            let Some(path) = stream.part_name() else {
                continue;
            };
            let xml = document.to_xml(stream)?;
            log::debug!("package part {} ({} bytes)", path, xml.len());
            self.add_file(path, xml.as_bytes())?;
        }
        Ok(())
    }

    /// Write the central directory and return the underlying writer.
    pub fn finish(self) -> Result<W> {
        Ok(self.zip_writer.finish()?)
    }
}
