use crate::common::Result;
use crate::odf::handler::DocumentHandler;
use crate::odf::property::PropertyList;
use std::collections::HashSet;

/// Keys whose values name a font face.
pub const FONT_NAME_KEYS: [&str; 3] = [
    "style:font-name",
    "style:font-name-asian",
    "style:font-name-complex",
];

/// Font faces referenced by the document, in first-use order.
#[derive(Debug, Default, Clone)]
pub struct FontRegistry {
    fonts: Vec<String>,
    seen: HashSet<String>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a font face once.
    pub fn register(&mut self, name: &str) {
        if name.is_empty() || self.seen.contains(name) {
            return;
        }
        self.seen.insert(name.to_string());
        self.fonts.push(name.to_string());
    }

    /// Declare every font named by `properties`.
    pub fn register_from(&mut self, properties: &PropertyList) {
        for key in FONT_NAME_KEYS {
            if let Some(name) = properties.get_str(key) {
                self.register(&name);
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Emit `office:font-face-decls`.
    pub fn write(&self, handler: &mut dyn DocumentHandler) -> Result<()> {
        handler.start_element("office:font-face-decls", &PropertyList::new())?;
        for font in &self.fonts {
            let family = if font.contains(char::is_whitespace) {
                format!("'{}'", font)
            } else {
                font.clone()
            };
            let attrs = PropertyList::new()
                .with("style:name", font.as_str())
                .with("svg:font-family", family);
            handler.start_element("style:font-face", &attrs)?;
            handler.end_element("style:font-face")?;
        }
        handler.end_element("office:font-face-decls")
    }
}
