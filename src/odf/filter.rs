//! Single-use conversion driver.
//!
//! An [`OdfFilter`] pairs a [`DocumentParser`] (the format decoder living
//! outside this crate) with a fresh [`OdfGenerator`]. It runs exactly once:
//! detection, parsing, then output. Nothing is written to the destination
//! unless the parser reported success.

use super::DocumentKind;
use super::emitter::{OdfDocument, OdfStreamType};
use super::generator::OdfGenerator;
use super::handler::{DocumentHandler, FileHandler};
use super::options::GeneratorOptions;
use crate::common::{Error, Result};
use bytes::Bytes;
use std::io::SeekFrom;
use std::path::Path;

/// Random-access byte source handed to a parser.
pub trait InputStream {
    /// Read up to `len` bytes from the current position.
    fn read(&mut self, len: usize) -> Result<&[u8]>;

    /// Move the position; returns the new offset from the start.
    fn seek(&mut self, position: SeekFrom) -> Result<u64>;

    fn tell(&self) -> u64;

    fn is_end(&self) -> bool;

    /// Whether the stream is a container with named sub-streams.
    fn is_structured(&self) -> bool {
        false
    }

    /// Open the named sub-stream of a structured input.
    fn sub_stream(&self, _name: &str) -> Option<Box<dyn InputStream>> {
        None
    }
}

/// An input held in memory, optionally with named sub-streams.
#[derive(Debug, Clone, Default)]
pub struct MemoryInputStream {
    data: Bytes,
    position: usize,
    children: Vec<(String, Bytes)>,
}

impl MemoryInputStream {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            position: 0,
            children: Vec::new(),
        }
    }

    /// Attach a named sub-stream, making the input structured.
    pub fn with_sub_stream(mut self, name: &str, data: impl Into<Bytes>) -> Self {
        self.children.push((name.to_string(), data.into()));
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl InputStream for MemoryInputStream {
    fn read(&mut self, len: usize) -> Result<&[u8]> {
        let start = self.position;
        let end = start.saturating_add(len).min(self.data.len());
        self.position = end;
        Ok(&self.data[start..end])
    }

    fn seek(&mut self, position: SeekFrom) -> Result<u64> {
        let (base, offset) = match position {
            SeekFrom::Start(offset) => (0i64, i64::try_from(offset).unwrap_or(i64::MAX)),
            SeekFrom::Current(offset) => (self.position as i64, offset),
            SeekFrom::End(offset) => (self.data.len() as i64, offset),
        };
        let target = base.saturating_add(offset);
        if target < 0 {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "seek before start of stream",
            )));
        }
        self.position = (target as u64).min(self.data.len() as u64) as usize;
        Ok(self.position as u64)
    }

    fn tell(&self) -> u64 {
        self.position as u64
    }

    fn is_end(&self) -> bool {
        self.position >= self.data.len()
    }

    fn is_structured(&self) -> bool {
        !self.children.is_empty()
    }

    fn sub_stream(&self, name: &str) -> Option<Box<dyn InputStream>> {
        self.children
            .iter()
            .find(|(child, _)| child == name)
            .map(|(_, data)| Box::new(MemoryInputStream::new(data.clone())) as Box<dyn InputStream>)
    }
}

/// How sure a parser is that it understands an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    None,
    Weak,
    Good,
    Excellent,
    /// Encrypted, and the parser can decrypt it with a password
    SupportedEncryption,
    /// Encrypted with a scheme the parser cannot handle
    UnsupportedEncryption,
}

/// A format decoder that drives an [`OdfGenerator`].
pub trait DocumentParser {
    /// Inspect `input` without consuming it.
    fn detect(&mut self, input: &mut dyn InputStream) -> Confidence;

    /// Emit the content of `input` as generator events; `false` on failure.
    fn parse(&mut self, input: &mut dyn InputStream, generator: &mut OdfGenerator<'_>) -> bool;

    fn set_password(&mut self, _password: &str) {}
}

/// Lifecycle of an [`OdfFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterState {
    #[default]
    NotStarted,
    InProgress,
    Finished,
    Failed,
}

/// Single-use conversion of one input into one ODF document.
pub struct OdfFilter<P: DocumentParser> {
    parser: P,
    options: GeneratorOptions,
    state: FilterState,
}

impl<P: DocumentParser> OdfFilter<P> {
    pub fn new(parser: P, options: GeneratorOptions) -> Self {
        Self {
            parser,
            options,
            state: FilterState::NotStarted,
        }
    }

    #[inline]
    pub fn state(&self) -> FilterState {
        self.state
    }

    #[inline]
    pub fn kind(&self) -> DocumentKind {
        self.options.kind
    }

    /// Forward a password to the parser before conversion.
    pub fn set_password(&mut self, password: &str) {
        self.parser.set_password(password);
    }

    /// Convert `input` and write it as flat XML to `handler`.
    pub fn filter(&mut self, input: &mut dyn InputStream, handler: &mut dyn DocumentHandler) -> Result<()> {
        let document = self.convert(input)?;
        document.write(OdfStreamType::Flat, handler)
    }

    /// Convert `input` into a ZIP package written to `writer`.
    #[cfg(feature = "package")]
    pub fn filter_to_package<W>(&mut self, input: &mut dyn InputStream, writer: W) -> Result<W>
    where
        W: std::io::Write + std::io::Seek,
    {
        let document = self.convert(input)?;
        write_package(&document, writer)
    }

    /// Convert `input` and write it to `path`, as flat XML when the
    /// extension is a flat one (`fodt`, `fodg`, ...) and as a package
    /// otherwise. The file is only created once conversion succeeded.
    pub fn filter_to_path(&mut self, input: &mut dyn InputStream, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let document = self.convert(input)?;
        let flat = cfg!(not(feature = "package"))
            || path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(document.kind().flat_extension()));

        if flat {
            let mut handler = FileHandler::create(path)?;
            document.write(OdfStreamType::Flat, &mut handler)?;
            handler.into_inner().into_inner().map_err(|e| Error::Io(e.into_error()))?;
            return Ok(());
        }

        #[cfg(feature = "package")]
        {
            let file = std::io::BufWriter::new(std::fs::File::create(path)?);
            let mut file = write_package(&document, file)?;
            std::io::Write::flush(&mut file)?;
        }
        Ok(())
    }

    /// Run detection and parsing once.
    fn convert(&mut self, input: &mut dyn InputStream) -> Result<OdfDocument> {
        if self.state != FilterState::NotStarted {
            log::warn!("filter invoked again in state {:?}", self.state);
            return Err(Error::AlreadyUsed);
        }
        self.state = FilterState::InProgress;

        match self.run(input) {
            Ok(document) => {
                self.state = FilterState::Finished;
                Ok(document)
            },
            Err(err) => {
                self.state = FilterState::Failed;
                Err(err)
            },
        }
    }

    fn run(&mut self, input: &mut dyn InputStream) -> Result<OdfDocument> {
        match self.parser.detect(input) {
            Confidence::None => return Err(Error::UnsupportedFormat),
            Confidence::UnsupportedEncryption => {
                return Err(Error::Encrypted("unsupported encryption".to_string()));
            },
            confidence => log::debug!("input detected with confidence {:?}", confidence),
        }
        input.seek(SeekFrom::Start(0))?;

        let mut generator = OdfGenerator::new(self.options.clone());
        if !self.parser.parse(input, &mut generator) {
            return Err(Error::ParseFailed("parser reported failure".to_string()));
        }
        Ok(generator.finish())
    }
}

#[cfg(feature = "package")]
fn write_package<W: std::io::Write + std::io::Seek>(document: &OdfDocument, writer: W) -> Result<W> {
    let mut package = super::package::PackageWriter::new(writer, document.kind().mime_type())?;
    package.write_document(document)?;
    package.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::handler::StringHandler;
    use crate::odf::property::PropertyList;

    /// Parser for inputs of the form `TXT:<paragraph text>`.
    struct TextParser;

    impl DocumentParser for TextParser {
        fn detect(&mut self, input: &mut dyn InputStream) -> Confidence {
            match input.read(4) {
                Ok(b"TXT:") => Confidence::Excellent,
                _ => Confidence::None,
            }
        }

        fn parse(&mut self, input: &mut dyn InputStream, generator: &mut OdfGenerator<'_>) -> bool {
            if input.read(4).ok() != Some(b"TXT:".as_slice()) {
                return false;
            }
            let Ok(text) = input.read(usize::MAX).map(|b| String::from_utf8_lossy(b).into_owned()) else {
                return false;
            };
            generator.open_paragraph(&PropertyList::new());
            generator.insert_text(&text);
            generator.close_paragraph();
            !text.contains("FAIL")
        }
    }

    #[test]
    fn test_memory_stream_seek_and_read() {
        let mut input = MemoryInputStream::new(b"abcdef".to_vec());
        assert_eq!(input.read(2).unwrap(), b"ab");
        assert_eq!(input.seek(SeekFrom::Current(2)).unwrap(), 4);
        assert_eq!(input.read(10).unwrap(), b"ef");
        assert!(input.is_end());
        assert!(input.seek(SeekFrom::Current(-10)).is_err());
        assert_eq!(input.seek(SeekFrom::Start(1)).unwrap(), 1);
        assert_eq!(input.tell(), 1);
    }

    #[test]
    fn test_sub_streams() {
        let input = MemoryInputStream::new(Vec::new()).with_sub_stream("WordDocument", b"xyz".to_vec());
        assert!(input.is_structured());
        let mut child = input.sub_stream("WordDocument").unwrap();
        assert_eq!(child.read(3).unwrap(), b"xyz");
        assert!(input.sub_stream("missing").is_none());
    }

    #[test]
    fn test_filter_runs_once() {
        let mut filter = OdfFilter::new(TextParser, GeneratorOptions::default());
        let mut out = StringHandler::new();
        filter
            .filter(&mut MemoryInputStream::new(b"TXT:hello".to_vec()), &mut out)
            .unwrap();
        assert_eq!(filter.state(), FilterState::Finished);
        assert!(out.as_str().contains(">hello</text:p>"));

        let mut second = StringHandler::new();
        let err = filter
            .filter(&mut MemoryInputStream::new(b"TXT:again".to_vec()), &mut second)
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyUsed));
        assert_eq!(filter.state(), FilterState::Finished);
        assert!(second.as_str().is_empty());
        assert!(out.as_str().contains(">hello</text:p>"));
    }

    #[test]
    fn test_unsupported_input() {
        let mut filter = OdfFilter::new(TextParser, GeneratorOptions::default());
        let mut out = StringHandler::new();
        let err = filter
            .filter(&mut MemoryInputStream::new(b"PNG".to_vec()), &mut out)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat));
        assert_eq!(filter.state(), FilterState::Failed);
        assert!(out.as_str().is_empty());
    }

    #[test]
    fn test_failed_parse_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.fodt");
        let mut filter = OdfFilter::new(TextParser, GeneratorOptions::default());
        let err = filter
            .filter_to_path(&mut MemoryInputStream::new(b"TXT:FAIL".to_vec()), &path)
            .unwrap_err();
        assert!(matches!(err, Error::ParseFailed(_)));
        assert_eq!(filter.state(), FilterState::Failed);
        assert!(!path.exists());
    }

    #[test]
    fn test_flat_file_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.fodt");
        let mut filter = OdfFilter::new(TextParser, GeneratorOptions::default());
        filter
            .filter_to_path(&mut MemoryInputStream::new(b"TXT:on disk".to_vec()), &path)
            .unwrap();
        let xml = std::fs::read_to_string(&path).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains(">on disk</text:p>"));
    }
}
