use super::DocumentKind;
use chrono::{DateTime, Utc};

/// Configuration of a generator run.
///
/// The defaults produce a text document with a settings stream and no
/// creation timestamp, so two runs over the same events give byte-identical
/// output.
///
/// # Examples
///
/// ```rust
/// use odfgen::odf::{DocumentKind, GeneratorOptions};
///
/// let options = GeneratorOptions::new()
///     .with_kind(DocumentKind::Drawing)
///     .with_settings(false)
///     .with_generator("MyImporter/1.0");
/// assert_eq!(options.kind, DocumentKind::Drawing);
/// ```
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Flavor of the produced document
    pub kind: DocumentKind,
    /// Whether the settings stream (`settings.xml` / `office:settings`) is written
    pub include_settings: bool,
    /// Value of `meta:generator`
    pub generator: String,
    /// Value of `meta:creation-date`; omitted when `None`
    pub creation_date: Option<DateTime<Utc>>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            kind: DocumentKind::Text,
            include_settings: true,
            generator: concat!("odfgen/", env!("CARGO_PKG_VERSION")).to_string(),
            creation_date: None,
        }
    }
}

impl GeneratorOptions {
    /// Create options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document flavor.
    #[inline]
    pub fn with_kind(mut self, kind: DocumentKind) -> Self {
        self.kind = kind;
        self
    }

    /// Enable or disable the settings stream.
    #[inline]
    pub fn with_settings(mut self, include: bool) -> Self {
        self.include_settings = include;
        self
    }

    /// Set the `meta:generator` string.
    #[inline]
    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = generator.into();
        self
    }

    /// Stamp the document with a creation date.
    #[inline]
    pub fn with_creation_date(mut self, date: DateTime<Utc>) -> Self {
        self.creation_date = Some(date);
        self
    }

    /// Stamp the document with the current time.
    #[inline]
    pub fn with_current_date(self) -> Self {
        self.with_creation_date(Utc::now())
    }
}
