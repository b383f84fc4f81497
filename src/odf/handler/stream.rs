use super::DocumentHandler;
use crate::common::xml::escape_xml_into;
use crate::common::Result;
use crate::odf::property::PropertyList;
use std::fs::File;
use std::io::{BufWriter, Stdout, Write};
use std::path::Path;

const XML_DECLARATION: &[u8] = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Handler writing to any [`Write`] implementation.
///
/// # Examples
///
/// ```
/// use odfgen::odf::{DocumentHandler, PropertyList, StreamHandler};
///
/// # fn main() -> odfgen::Result<()> {
/// let mut handler = StreamHandler::new(Vec::new());
/// handler.start_element("text:p", &PropertyList::new().with("text:style-name", "P0"))?;
/// handler.end_element("text:p")?;
/// assert_eq!(handler.into_inner(), br#"<text:p text:style-name="P0"/>"#);
/// # Ok(())
/// # }
/// ```
pub struct StreamHandler<W: Write> {
    writer: W,
    /// Name of the start tag written without its closing `>` yet
    open_tag: Option<String>,
    scratch: String,
}

/// Handler writing to a buffered file.
pub type FileHandler = StreamHandler<BufWriter<File>>;

/// Handler writing to standard output.
pub type StdoutHandler = StreamHandler<Stdout>;

impl<W: Write> StreamHandler<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            open_tag: None,
            scratch: String::with_capacity(256),
        }
    }

    /// Borrow the underlying writer.
    #[inline]
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Unwrap the underlying writer. A pending start tag is left unterminated;
    /// call [`DocumentHandler::end_document`] first.
    #[inline]
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Whether a start tag is waiting for its `>` or `/>`.
    #[inline]
    pub fn has_pending_tag(&self) -> bool {
        self.open_tag.is_some()
    }

    fn flush_pending_tag(&mut self) -> Result<()> {
        if self.open_tag.take().is_some() {
            self.writer.write_all(b">")?;
        }
        Ok(())
    }
}

impl FileHandler {
    /// Create (or truncate) `path` and write to it.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl StdoutHandler {
    /// Write to the process's standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> DocumentHandler for StreamHandler<W> {
    fn start_document(&mut self) -> Result<()> {
        self.writer.write_all(XML_DECLARATION)?;
        Ok(())
    }

    fn end_document(&mut self) -> Result<()> {
        self.flush_pending_tag()?;
        self.writer.flush()?;
        Ok(())
    }

    fn start_element(&mut self, name: &str, attributes: &PropertyList) -> Result<()> {
        self.flush_pending_tag()?;

        self.scratch.clear();
        self.scratch.push('<');
        self.scratch.push_str(name);
        for (key, value) in attributes.attributes() {
            self.scratch.push(' ');
            self.scratch.push_str(key);
            self.scratch.push_str("=\"");
            escape_xml_into(&value, &mut self.scratch);
            self.scratch.push('"');
        }
        self.writer.write_all(self.scratch.as_bytes())?;
        self.open_tag = Some(name.to_string());
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> Result<()> {
        match self.open_tag.take() {
            Some(open) if open == name => {
                self.writer.write_all(b"/>")?;
                return Ok(());
            },
            Some(open) => {
                log::warn!("closing <{}> while <{}> is still pending", name, open);
                self.writer.write_all(b">")?;
            },
            None => {},
        }
        self.scratch.clear();
        self.scratch.push_str("</");
        self.scratch.push_str(name);
        self.scratch.push('>');
        self.writer.write_all(self.scratch.as_bytes())?;
        Ok(())
    }

    fn characters(&mut self, text: &str) -> Result<()> {
        self.scratch.clear();
        escape_xml_into(text, &mut self.scratch);
        if self.scratch.is_empty() {
            return Ok(());
        }
        if self.open_tag.take().is_some() {
            self.writer.write_all(b">")?;
        }
        self.writer.write_all(self.scratch.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(handler: StreamHandler<Vec<u8>>) -> String {
        String::from_utf8(handler.into_inner()).unwrap()
    }

    #[test]
    fn test_empty_element_self_closes() {
        let mut h = StreamHandler::new(Vec::new());
        h.start_element("x", &PropertyList::new().with("a", "1")).unwrap();
        h.end_element("x").unwrap();
        assert_eq!(output(h), r#"<x a="1"/>"#);
    }

    #[test]
    fn test_characters_force_open_tag() {
        let mut h = StreamHandler::new(Vec::new());
        h.start_element("x", &PropertyList::new()).unwrap();
        h.characters("c").unwrap();
        h.end_element("x").unwrap();
        assert_eq!(output(h), "<x>c</x>");
    }

    #[test]
    fn test_empty_characters_keep_self_closing() {
        let mut h = StreamHandler::new(Vec::new());
        h.start_element("x", &PropertyList::new()).unwrap();
        h.characters("").unwrap();
        h.end_element("x").unwrap();
        assert_eq!(output(h), "<x/>");
    }

    #[test]
    fn test_nested_elements() {
        let mut h = StreamHandler::new(Vec::new());
        h.start_element("a", &PropertyList::new()).unwrap();
        h.start_element("b", &PropertyList::new()).unwrap();
        h.end_element("b").unwrap();
        h.end_element("a").unwrap();
        assert_eq!(output(h), "<a><b/></a>");
    }

    // Malformed event streams close the pending tag and write the requested
    // end tag; the result is not balanced and is only crash avoidance.
    #[test]
    fn test_mismatched_close_is_tolerated() {
        let mut h = StreamHandler::new(Vec::new());
        h.start_element("a", &PropertyList::new()).unwrap();
        h.end_element("b").unwrap();
        assert_eq!(output(h), "<a></b>");
    }

    #[test]
    fn test_escaping_in_attributes_and_text() {
        let mut h = StreamHandler::new(Vec::new());
        h.start_element("x", &PropertyList::new().with("v", "a\"<b>&")).unwrap();
        h.characters("1 < 2 & 3").unwrap();
        h.end_element("x").unwrap();
        assert_eq!(output(h), r#"<x v="a&quot;&lt;b&gt;&amp;">1 &lt; 2 &amp; 3</x>"#);
    }

    #[test]
    fn test_end_document_flushes_pending_tag() {
        let mut h = StreamHandler::new(Vec::new());
        h.start_element("x", &PropertyList::new()).unwrap();
        assert!(h.has_pending_tag());
        h.end_document().unwrap();
        assert_eq!(output(h), "<x>");
    }

    #[test]
    fn test_reserved_keys_are_not_written() {
        let mut h = StreamHandler::new(Vec::new());
        let attrs = PropertyList::new()
            .with("librevenge:list-id", 1)
            .with("text:style-name", "L0");
        h.start_element("text:list", &attrs).unwrap();
        h.end_element("text:list").unwrap();
        assert_eq!(output(h), r#"<text:list text:style-name="L0"/>"#);
    }

    #[test]
    fn test_file_handler_writes_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xml");
        let mut h = FileHandler::create(&path).unwrap();
        h.start_document().unwrap();
        h.start_element("root", &PropertyList::new()).unwrap();
        h.end_element("root").unwrap();
        h.end_document().unwrap();
        drop(h);
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("<root/>"));
        assert!(written.starts_with("<?xml"));
    }
}
