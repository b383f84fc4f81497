use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

const SPECIAL: [&str; 5] = ["&", "<", ">", "\"", "'"];
const ENTITIES: [&str; 5] = ["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"];

// Static initialization: automaton is built only once, thread-safe
static XML_ESCAPER: Lazy<AhoCorasick> =
    Lazy::new(|| AhoCorasick::new(SPECIAL).expect("Failed to build XML escaper"));

/// Escape XML special characters.
///
/// Used for both attribute values and character data.
///
/// # Examples
///
/// ```
/// use odfgen::common::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("<tag>\"hello\"</tag>"), "&lt;tag&gt;&quot;hello&quot;&lt;/tag&gt;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    XML_ESCAPER.replace_all(s, &ENTITIES)
}

/// Escape `s` and append the result to `out`, avoiding an intermediate allocation.
#[inline]
pub fn escape_xml_into(s: &str, out: &mut String) {
    XML_ESCAPER.replace_all_with(s, out, |mat, _, dst| {
        dst.push_str(ENTITIES[mat.pattern().as_usize()]);
        true
    });
}
