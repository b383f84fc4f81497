use super::{DocumentHandler, StreamHandler};
use crate::common::Result;
use crate::odf::property::PropertyList;

/// Handler accumulating the document in memory.
///
/// # Examples
///
/// ```
/// use odfgen::odf::{DocumentHandler, PropertyList, StringHandler};
///
/// # fn main() -> odfgen::Result<()> {
/// let mut handler = StringHandler::new();
/// handler.start_element("text:span", &PropertyList::new())?;
/// handler.characters("hello")?;
/// handler.end_element("text:span")?;
/// assert_eq!(handler.as_str(), "<text:span>hello</text:span>");
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct StringHandler {
    inner: Option<StreamHandler<Vec<u8>>>,
}

impl StringHandler {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            inner: Some(StreamHandler::new(Vec::new())),
        }
    }

    fn stream(&mut self) -> &mut StreamHandler<Vec<u8>> {
        self.inner.get_or_insert_with(|| StreamHandler::new(Vec::new()))
    }

    /// The text written so far.
    pub fn as_str(&self) -> &str {
        self.inner
            .as_ref()
            .and_then(|s| std::str::from_utf8(s.get_ref()).ok())
            .unwrap_or_default()
    }

    /// The bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_ref().map(|s| s.get_ref().as_slice()).unwrap_or_default()
    }

    /// Take the accumulated text.
    pub fn into_string(self) -> String {
        let bytes = self.inner.map(StreamHandler::into_inner).unwrap_or_default();
        String::from_utf8(bytes)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
    }
}

impl DocumentHandler for StringHandler {
    fn start_document(&mut self) -> Result<()> {
        self.stream().start_document()
    }

    fn end_document(&mut self) -> Result<()> {
        self.stream().end_document()
    }

    fn start_element(&mut self, name: &str, attributes: &PropertyList) -> Result<()> {
        self.stream().start_element(name, attributes)
    }

    fn end_element(&mut self, name: &str) -> Result<()> {
        self.stream().end_element(name)
    }

    fn characters(&mut self, text: &str) -> Result<()> {
        self.stream().characters(text)
    }
}
