use super::{NameAllocator, Zone};
use crate::common::Result;
use crate::odf::handler::DocumentHandler;
use crate::odf::property::{PropertyList, is_reserved_key};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Keys written on `style:list-level-properties` instead of the level style.
const LEVEL_PROPERTY_KEYS: [&str; 9] = [
    "fo:height",
    "fo:text-align",
    "fo:width",
    "style:vertical-pos",
    "style:vertical-rel",
    "text:list-level-position-and-space-mode",
    "text:min-label-distance",
    "text:min-label-width",
    "text:space-before",
];

const DEFAULT_BULLET: &str = "\u{2022}";

/// Definition of one list level.
#[derive(Debug, Clone, PartialEq)]
pub struct ListLevelStyle {
    ordered: bool,
    properties: PropertyList,
}

impl ListLevelStyle {
    pub fn new(ordered: bool, properties: &PropertyList) -> Self {
        Self {
            ordered,
            properties: properties.filtered(|key| !is_reserved_key(key) && key != "text:level"),
        }
    }

    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    /// Whether the definition carries any attribute of its own.
    #[inline]
    pub fn has_properties(&self) -> bool {
        self.properties.has_attributes()
    }

    fn write(&self, level: u32, handler: &mut dyn DocumentHandler) -> Result<()> {
        let element = if self.ordered {
            "text:list-level-style-number"
        } else {
            "text:list-level-style-bullet"
        };

        let mut attrs = PropertyList::new().with("text:level", level);
        for (key, value) in self.properties.iter() {
            if !LEVEL_PROPERTY_KEYS.contains(&key) {
                attrs.insert(key, value.clone());
            }
        }
        if self.ordered && !attrs.contains("style:num-format") {
            attrs.insert("style:num-format", "1");
        }
        if !self.ordered && !attrs.contains("text:bullet-char") {
            attrs.insert("text:bullet-char", DEFAULT_BULLET);
        }
        let level_properties = self
            .properties
            .filtered(|key| LEVEL_PROPERTY_KEYS.contains(&key));

        handler.start_element(element, &attrs)?;
        handler.start_element("style:list-level-properties", &level_properties)?;
        handler.end_element("style:list-level-properties")?;
        handler.end_element(element)
    }
}

/// A `text:list-style` and the levels defined on it.
#[derive(Debug, Clone)]
pub struct ListStyle {
    name: String,
    zone: Zone,
    levels: BTreeMap<u32, ListLevelStyle>,
    used: BTreeSet<u32>,
}

impl ListStyle {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// Definition of `level`, if any.
    #[inline]
    pub fn level(&self, level: u32) -> Option<&ListLevelStyle> {
        self.levels.get(&level)
    }

    pub fn write(&self, handler: &mut dyn DocumentHandler) -> Result<()> {
        let attrs = PropertyList::new().with("style:name", self.name.as_str());
        handler.start_element("text:list-style", &attrs)?;
        for (level, style) in &self.levels {
            style.write(*level, handler)?;
        }
        handler.end_element("text:list-style")
    }
}

/// Owner of every list style of the document.
///
/// Identified lists keep one current style per id. Redefining a level that
/// was already used by a list item forks a new style, so earlier items keep
/// their labels while later opens pick up the new definition.
#[derive(Debug, Default, Clone)]
pub struct ListStyleManager {
    styles: Vec<ListStyle>,
    by_id: HashMap<i64, usize>,
    names: NameAllocator,
}

impl ListStyleManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current style of list `id`.
    #[inline]
    pub fn style_for_id(&self, id: i64) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&ListStyle> {
        self.styles.get(index)
    }

    /// Name of style `index`.
    pub fn name(&self, index: usize) -> &str {
        self.styles.get(index).map(ListStyle::name).unwrap_or_default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    fn create(&mut self, zone: Zone) -> usize {
        let name = self.names.allocate("L", zone);
        log::debug!("new list style {}", name);
        self.styles.push(ListStyle {
            name,
            zone,
            levels: BTreeMap::new(),
            used: BTreeSet::new(),
        });
        self.styles.len() - 1
    }

    /// Create a style that no id refers to.
    pub fn create_anonymous(&mut self, zone: Zone) -> usize {
        self.create(zone)
    }

    /// Define `level` of list `id` and return the style now current for it.
    pub fn define_level(&mut self, id: i64, level: u32, definition: ListLevelStyle, zone: Zone) -> usize {
        let index = match self.by_id.get(&id) {
            Some(&index) => index,
            None => {
                let index = self.create(zone);
                self.by_id.insert(id, index);
                index
            },
        };
        let index = self.set_level(index, level, definition);
        self.by_id.insert(id, index);
        index
    }

    /// Set the definition of `level` on style `index`, forking the style when
    /// the level was already used with a different definition.
    pub fn set_level(&mut self, index: usize, level: u32, definition: ListLevelStyle) -> usize {
        let Some(style) = self.styles.get(index) else {
            return index;
        };
        let (unchanged, used) = match style.levels.get(&level) {
            Some(existing) => (*existing == definition, style.used.contains(&level)),
            None => (false, false),
        };
        if unchanged {
            return index;
        }
        if !used {
            self.styles[index].levels.insert(level, definition);
            return index;
        }

        let mut forked = style.clone();
        forked.name = self.names.allocate("L", forked.zone);
        forked.used.clear();
        forked.levels.insert(level, definition);
        log::debug!("list level {} redefined, forking {} into {}", level, style.name, forked.name);
        self.styles.push(forked);
        self.styles.len() - 1
    }

    /// Give `level` a default definition if it has none.
    pub fn ensure_level(&mut self, index: usize, level: u32, ordered: bool) {
        if let Some(style) = self.styles.get_mut(index) {
            style
                .levels
                .entry(level)
                .or_insert_with(|| ListLevelStyle::new(ordered, &PropertyList::new()));
        }
    }

    /// Record that a list item was rendered at `level`.
    pub fn mark_used(&mut self, index: usize, level: u32) {
        if let Some(style) = self.styles.get_mut(index) {
            style.used.insert(level);
        }
    }

    /// Emit every style of `zone`.
    pub fn write_zone(&self, zone: Zone, handler: &mut dyn DocumentHandler) -> Result<()> {
        for style in self.styles.iter().filter(|s| s.zone == zone) {
            style.write(handler)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::handler::StringHandler;

    fn numbered(format: &str) -> ListLevelStyle {
        ListLevelStyle::new(true, &PropertyList::new().with("style:num-format", format))
    }

    #[test]
    fn test_same_definition_reuses_style() {
        let mut lists = ListStyleManager::new();
        let a = lists.define_level(1, 1, numbered("1"), Zone::ContentAutomatic);
        let b = lists.define_level(1, 1, numbered("1"), Zone::ContentAutomatic);
        assert_eq!(a, b);
        assert_eq!(lists.name(a), "L0");
    }

    #[test]
    fn test_redefinition_before_use_updates_in_place() {
        let mut lists = ListStyleManager::new();
        let a = lists.define_level(1, 1, numbered("1"), Zone::ContentAutomatic);
        let b = lists.define_level(1, 1, numbered("a"), Zone::ContentAutomatic);
        assert_eq!(a, b);
        assert_eq!(lists.len(), 1);
    }

    #[test]
    fn test_redefinition_after_use_forks() {
        let mut lists = ListStyleManager::new();
        let a = lists.define_level(1, 1, numbered("1"), Zone::ContentAutomatic);
        lists.define_level(1, 2, numbered("a"), Zone::ContentAutomatic);
        lists.mark_used(a, 1);
        let b = lists.define_level(1, 1, numbered("i"), Zone::ContentAutomatic);
        assert_ne!(a, b);
        assert_eq!(lists.style_for_id(1), Some(b));
        assert_eq!(lists.name(b), "L1");
        // The fork keeps the other levels
        assert!(lists.get(b).unwrap().level(2).is_some());
        assert_eq!(lists.get(a).unwrap().level(1), Some(&numbered("1")));
    }

    #[test]
    fn test_write_defaults() {
        let mut lists = ListStyleManager::new();
        let index = lists.create_anonymous(Zone::StyleAutomatic);
        lists.ensure_level(index, 1, false);
        let mut out = StringHandler::new();
        lists.write_zone(Zone::StyleAutomatic, &mut out).unwrap();
        assert_eq!(
            out.as_str(),
            concat!(
                r#"<text:list-style style:name="L_M0">"#,
                "<text:list-level-style-bullet text:level=\"1\" text:bullet-char=\"\u{2022}\">",
                "<style:list-level-properties/>",
                "</text:list-level-style-bullet>",
                "</text:list-style>"
            )
        );
    }
}
