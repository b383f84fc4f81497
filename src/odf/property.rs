//! Property bags: the data-interchange unit between a format parser and the
//! generator.
//!
//! A [`PropertyList`] is an insertion-ordered map from namespaced keys
//! (`fo:margin-left`, `style:font-name`, ...) to typed [`PropertyValue`]s.
//! Keys in the reserved `librevenge:` namespace carry instructions for the
//! generator (list ids, column separators, binary mime types); they can be
//! read but are never written out as XML attributes.

use crate::common::Unit;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::fmt;

/// Prefix of keys reserved for generator instructions.
pub const RESERVED_PREFIX: &str = "librevenge:";

/// Whether `key` belongs to the reserved instruction namespace.
#[inline]
pub fn is_reserved_key(key: &str) -> bool {
    key.starts_with(RESERVED_PREFIX)
}

/// A typed property value
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Literal string
    Str(String),
    /// Integer
    Int(i64),
    /// Number with a unit
    Double(f64, Unit),
    /// Boolean, written as `true`/`false`
    Bool(bool),
    /// Binary payload, written as base64
    Binary(Vec<u8>),
    /// Nested list of property bags (columns, tab stops, points, ...)
    Vector(PropertyListVector),
}

impl PropertyValue {
    /// Length in inches.
    #[inline]
    pub fn inch(value: f64) -> Self {
        Self::Double(value, Unit::Inch)
    }

    /// Length in points.
    #[inline]
    pub fn point(value: f64) -> Self {
        Self::Double(value, Unit::Point)
    }

    /// Length in twips.
    #[inline]
    pub fn twip(value: f64) -> Self {
        Self::Double(value, Unit::Twip)
    }

    /// Fraction written as a percentage.
    #[inline]
    pub fn percent(value: f64) -> Self {
        Self::Double(value, Unit::Percent)
    }

    /// Plain number.
    #[inline]
    pub fn generic(value: f64) -> Self {
        Self::Double(value, Unit::Generic)
    }

    /// Integer view of the value, if it has one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Double(d, _) => Some(d.round() as i64),
            Self::Str(s) => s.trim().parse().ok(),
            Self::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Numeric view of the value without its unit.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Double(d, _) => Some(*d),
            Self::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Length in inches, parsing strings such as `"2cm"`.
    pub fn as_inches(&self) -> Option<f64> {
        match self {
            Self::Double(d, unit) => unit.to_inches(*d),
            Self::Int(i) => Some(*i as f64),
            Self::Str(s) => crate::common::unit::parse_length_inches(s),
            _ => None,
        }
    }

    /// Boolean view of the value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(i) => Some(*i != 0),
            Self::Str(s) => match s.as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// The nested list, if this is a vector value.
    pub fn as_vector(&self) -> Option<&PropertyListVector> {
        match self {
            Self::Vector(v) => Some(v),
            _ => None,
        }
    }

    /// The raw bytes, if this is a binary value.
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => f.write_str(itoa::Buffer::new().format(*i)),
            Self::Double(d, unit) => f.write_str(&unit.render(*d)),
            Self::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            Self::Binary(bytes) => f.write_str(&BASE64.encode(bytes)),
            Self::Vector(_) => Ok(()),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for PropertyValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for PropertyValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<usize> for PropertyValue {
    fn from(value: usize) -> Self {
        Self::Int(value as i64)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<u8>> for PropertyValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Binary(value)
    }
}

impl From<PropertyListVector> for PropertyValue {
    fn from(value: PropertyListVector) -> Self {
        Self::Vector(value)
    }
}

/// Ordered property bag with unique keys.
///
/// # Examples
///
/// ```
/// use odfgen::odf::{PropertyList, PropertyValue};
///
/// let props = PropertyList::new()
///     .with("fo:page-width", PropertyValue::inch(8.5))
///     .with("librevenge:num-pages", 1);
///
/// // Reserved keys are readable but never become attributes
/// assert_eq!(props.get_int("librevenge:num-pages"), Some(1));
/// let attrs: Vec<_> = props.attributes().collect();
/// assert_eq!(attrs, vec![("fo:page-width", "8.5in".to_string())]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyList {
    entries: Vec<(String, PropertyValue)>,
}

impl PropertyList {
    /// Create an empty bag.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[inline]
    pub fn with(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value, replacing any previous value for `key` in place.
    pub fn insert(&mut self, key: &str, value: impl Into<PropertyValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    /// Remove a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Look up a value.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Whether `key` is present.
    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Value rendered as an attribute string.
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| v.to_string())
    }

    /// Integer value.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(PropertyValue::as_int)
    }

    /// Numeric value without unit.
    pub fn get_double(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(PropertyValue::as_double)
    }

    /// Length in inches.
    pub fn get_inches(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(PropertyValue::as_inches)
    }

    /// Boolean value.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(PropertyValue::as_bool)
    }

    /// Nested list value.
    pub fn get_vector(&self, key: &str) -> Option<&PropertyListVector> {
        self.get(key).and_then(PropertyValue::as_vector)
    }

    /// Number of entries, reserved keys included.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bag has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over the entries that become XML attributes: reserved keys and
    /// nested vectors are skipped, values are rendered to strings.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, String)> {
        self.entries
            .iter()
            .filter(|(k, v)| !is_reserved_key(k) && !matches!(v, PropertyValue::Vector(_)))
            .map(|(k, v)| (k.as_str(), v.to_string()))
    }

    /// Whether the bag has at least one attribute-producing entry.
    pub fn has_attributes(&self) -> bool {
        self.attributes().next().is_some()
    }

    /// A new bag holding the entries for which `keep` returns true.
    pub fn filtered(&self, mut keep: impl FnMut(&str) -> bool) -> PropertyList {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(k, _)| keep(k))
                .cloned()
                .collect(),
        }
    }

    /// Canonical text form used to detect identical bags.
    pub fn signature(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push_str(key);
            out.push('=');
            match value {
                PropertyValue::Vector(vector) => {
                    out.push('[');
                    for item in vector.iter() {
                        out.push('{');
                        out.push_str(&item.signature());
                        out.push('}');
                    }
                    out.push(']');
                },
                other => out.push_str(&other.to_string()),
            }
            out.push(';');
        }
        out
    }
}

impl<'a> FromIterator<(&'a str, PropertyValue)> for PropertyList {
    fn from_iter<T: IntoIterator<Item = (&'a str, PropertyValue)>>(iter: T) -> Self {
        let mut list = PropertyList::new();
        for (k, v) in iter {
            list.insert(k, v);
        }
        list
    }
}

/// Ordered list of property bags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyListVector {
    items: Vec<PropertyList>,
}

impl PropertyListVector {
    /// Create an empty vector.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bag.
    #[inline]
    pub fn push(&mut self, item: PropertyList) {
        self.items.push(item);
    }

    /// Builder-style append.
    #[inline]
    pub fn with(mut self, item: PropertyList) -> Self {
        self.items.push(item);
        self
    }

    /// Number of bags.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the vector is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Bag at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&PropertyList> {
        self.items.get(index)
    }

    /// Iterate over the bags.
    pub fn iter(&self) -> std::slice::Iter<'_, PropertyList> {
        self.items.iter()
    }
}

impl From<Vec<PropertyList>> for PropertyListVector {
    fn from(items: Vec<PropertyList>) -> Self {
        Self { items }
    }
}

impl<'a> IntoIterator for &'a PropertyListVector {
    type Item = &'a PropertyList;
    type IntoIter = std::slice::Iter<'a, PropertyList>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut props = PropertyList::new();
        props.insert("a", "1");
        props.insert("b", "2");
        props.insert("a", "3");
        let keys: Vec<_> = props.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(props.get_str("a").as_deref(), Some("3"));
    }

    #[test]
    fn test_attributes_skip_reserved_and_vectors() {
        let props = PropertyList::new()
            .with("fo:margin-left", PropertyValue::inch(0.5))
            .with("librevenge:list-id", 3)
            .with("style:columns", PropertyListVector::new())
            .with("fo:hyphenate", true);
        let attrs: Vec<_> = props.attributes().collect();
        assert_eq!(
            attrs,
            vec![
                ("fo:margin-left", "0.5in".to_string()),
                ("fo:hyphenate", "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_typed_getters() {
        let props = PropertyList::new()
            .with("n", "42")
            .with("len", "2.54cm")
            .with("flag", "false");
        assert_eq!(props.get_int("n"), Some(42));
        assert!((props.get_inches("len").unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(props.get_bool("flag"), Some(false));
        assert_eq!(props.get_int("missing"), None);
    }

    #[test]
    fn test_binary_renders_base64() {
        let value = PropertyValue::Binary(b"hello".to_vec());
        assert_eq!(value.to_string(), "aGVsbG8=");
    }

    #[test]
    fn test_signature_distinguishes_nested_content() {
        let a = PropertyList::new().with(
            "style:columns",
            PropertyListVector::new().with(PropertyList::new().with("style:rel-width", 1)),
        );
        let b = PropertyList::new().with(
            "style:columns",
            PropertyListVector::new().with(PropertyList::new().with("style:rel-width", 2)),
        );
        assert_ne!(a.signature(), b.signature());
        assert_eq!(a.signature(), a.clone().signature());
    }

    #[test]
    fn test_remove() {
        let mut props = PropertyList::new().with("a", 1).with("b", 2);
        assert_eq!(props.remove("a"), Some(PropertyValue::Int(1)));
        assert_eq!(props.remove("a"), None);
        assert_eq!(props.len(), 1);
    }
}
