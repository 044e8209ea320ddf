//! Style resolution for ODF documents.
//!
//! A document's named styles are collected in two passes (document styles
//! from `styles.xml`, then automatic styles from `content.xml`) into a
//! [`StyleTable`] of fully resolved property maps. Parent styles are applied
//! before a style's own property blocks, so a child's declarations always
//! win. Once the scans complete the table is read-only.

mod extract;

use crate::node::Node;
use std::collections::HashMap;

/// A resolved set of CSS declarations with stable insertion order.
///
/// Deterministic iteration order keeps the emitted `style=` attributes
/// byte-identical across runs. Updates are last-writer-wins and keep the
/// key's original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyMap {
    entries: Vec<(String, String)>,
}

impl PropertyMap {
    /// Set a property, replacing any previous value for the key
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    /// Get a property value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the key is present
    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Whether the map holds no properties
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Join the properties as CSS declarations: `key: value; key: value`
    pub fn to_css(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A font declaration from `style:font-face`.
#[derive(Debug, Clone)]
pub struct FontFace {
    /// Declared font family, quotes stripped
    pub family: String,
    /// Generic family hint ("roman", "swiss", "system", ...)
    pub generic: Option<String>,
}

/// One nesting level of a list style.
#[derive(Debug, Clone, PartialEq)]
pub enum ListLevel {
    /// Unordered level with its bullet character
    Bullet(String),
    /// Ordered level with its ODF number format ("1", "a", "I", ...)
    Number(String),
}

/// A `text:list-style` definition, keyed by 1-based nesting level.
#[derive(Debug, Clone, Default)]
pub struct ListStyle {
    levels: HashMap<u32, ListLevel>,
}

impl ListStyle {
    /// The level definition, if declared
    pub fn level(&self, level: u32) -> Option<&ListLevel> {
        self.levels.get(&level)
    }

    /// Whether the given nesting level renders as an ordered list
    pub fn is_ordered(&self, level: u32) -> bool {
        matches!(self.levels.get(&level), Some(ListLevel::Number(_)))
    }
}

/// Resolved style lookup for one document.
///
/// Built once per document, then consulted read-only by every other
/// component. Never share a table across documents.
#[derive(Debug, Default)]
pub struct StyleTable {
    styles: HashMap<String, PropertyMap>,
    fonts: HashMap<String, FontFace>,
    list_styles: HashMap<String, ListStyle>,
    respect_borders: bool,
}

impl StyleTable {
    /// Create an empty table
    pub fn new(respect_borders: bool) -> Self {
        Self {
            respect_borders,
            ..Self::default()
        }
    }

    /// Scan one XML root for font declarations, styles and list styles.
    ///
    /// Called once for `styles.xml` and once for `content.xml`; styles are
    /// processed in document order so a parent declared earlier is fully
    /// resolved before its children copy it.
    pub fn scan(&mut self, root: &Node) {
        for face in root.find_all("style:font-face") {
            let Some(name) = face.attr("style:name") else {
                continue;
            };
            let Some(family) = face.attr("svg:font-family") else {
                continue;
            };
            self.fonts.insert(
                name.to_string(),
                FontFace {
                    family: family.trim_matches(['\'', '"']).to_string(),
                    generic: face
                        .attr("style:font-family-generic")
                        .map(|s| s.to_string()),
                },
            );
        }

        for style in root.find_all("style:style") {
            let Some(name) = style.attr("style:name") else {
                continue;
            };
            let props = self.build_entry(style);
            self.styles.insert(name.to_string(), props);
        }

        for list_style in root.find_all("text:list-style") {
            if let Some(name) = list_style.attr("style:name") {
                self.list_styles
                    .insert(name.to_string(), parse_list_style(list_style));
            }
        }
    }

    fn build_entry(&self, style: &Node) -> PropertyMap {
        let mut props = PropertyMap::default();

        // Parent first, so the style's own blocks override it
        if let Some(parent) = style.attr("style:parent-style-name") {
            match self.styles.get(parent) {
                Some(inherited) => props = inherited.clone(),
                None => log::debug!(
                    "style parent '{}' not yet declared, starting from empty base",
                    parent
                ),
            }
        }

        if let Some(block) = style.child("style:text-properties") {
            extract::text_properties(block, &self.fonts, self.respect_borders, &mut props);
        }
        if let Some(block) = style.child("style:paragraph-properties") {
            extract::paragraph_properties(block, &mut props);
        }
        if let Some(block) = style.child("style:table-properties") {
            extract::table_properties(block, &mut props);
        }
        if let Some(block) = style.child("style:table-cell-properties") {
            extract::cell_properties(block, self.respect_borders, &mut props);
        }
        if let Some(block) = style.child("style:graphic-properties") {
            extract::graphic_properties(block, self.respect_borders, &mut props);
        }

        props
    }

    /// Resolved property map for a style name
    pub fn resolve(&self, name: &str) -> Option<&PropertyMap> {
        self.styles.get(name)
    }

    /// CSS declaration string for a style name, empty when unknown
    pub fn css(&self, name: &str) -> String {
        self.resolve(name)
            .map(PropertyMap::to_css)
            .unwrap_or_default()
    }

    /// Look up a list style by name
    pub fn list_style(&self, name: &str) -> Option<&ListStyle> {
        self.list_styles.get(name)
    }

    /// Look up a font declaration by name
    pub fn font(&self, name: &str) -> Option<&FontFace> {
        self.fonts.get(name)
    }
}

fn parse_list_style(list_style: &Node) -> ListStyle {
    let mut levels = HashMap::new();
    for child in list_style.children() {
        let level = child
            .attr("text:level")
            .and_then(|l| l.parse::<u32>().ok())
            .unwrap_or(1);
        let entry = match child.local_name() {
            "list-level-style-bullet" => {
                ListLevel::Bullet(child.attr_or("text:bullet-char", "\u{2022}").to_string())
            },
            "list-level-style-number" => {
                ListLevel::Number(child.attr_or("style:num-format", "1").to_string())
            },
            _ => ListLevel::Bullet("\u{2022}".to_string()),
        };
        levels.insert(level, entry);
    }
    ListStyle { levels }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(xml: &str) -> StyleTable {
        let root = Node::from_bytes(xml.as_bytes()).unwrap();
        let mut table = StyleTable::new(true);
        table.scan(&root);
        table
    }

    #[test]
    fn test_property_map_order_and_overwrite() {
        let mut map = PropertyMap::default();
        map.set("color", "#000000");
        map.set("font-size", "12pt");
        map.set("color", "#ff0000");
        assert_eq!(map.to_css(), "color: #ff0000; font-size: 12pt");
    }

    #[test]
    fn test_parent_inheritance() {
        let table = scan(
            r##"<office:styles>
                <style:style style:name="Base">
                    <style:text-properties fo:color="#112233" fo:font-size="12pt"/>
                </style:style>
                <style:style style:name="Child" style:parent-style-name="Base">
                    <style:text-properties fo:font-size="14pt"/>
                </style:style>
            </office:styles>"##,
        );

        let child = table.resolve("Child").unwrap();
        // Inherited, not overridden
        assert_eq!(child.get("color"), Some("#112233"));
        // Overridden locally
        assert_eq!(child.get("font-size"), Some("14pt"));

        let base = table.resolve("Base").unwrap();
        assert_eq!(base.get("font-size"), Some("12pt"));
    }

    #[test]
    fn test_forward_parent_reference_is_empty_base() {
        let table = scan(
            r##"<office:styles>
                <style:style style:name="Early" style:parent-style-name="Late">
                    <style:text-properties fo:color="#000000"/>
                </style:style>
                <style:style style:name="Late">
                    <style:text-properties fo:font-size="12pt"/>
                </style:style>
            </office:styles>"##,
        );
        let early = table.resolve("Early").unwrap();
        assert_eq!(early.get("color"), Some("#000000"));
        assert_eq!(early.get("font-size"), None);
    }

    #[test]
    fn test_missing_parent_tolerated() {
        let table = scan(
            r##"<office:styles>
                <style:style style:name="S" style:parent-style-name="Nowhere">
                    <style:text-properties fo:color="#000000"/>
                </style:style>
            </office:styles>"##,
        );
        assert_eq!(table.resolve("S").unwrap().get("color"), Some("#000000"));
    }

    #[test]
    fn test_no_family_blocks_resolves_empty() {
        let table = scan(r#"<office:styles><style:style style:name="S"/></office:styles>"#);
        assert!(table.resolve("S").unwrap().is_empty());
        assert_eq!(table.css("S"), "");
        assert_eq!(table.css("Unknown"), "");
    }

    #[test]
    fn test_multiple_family_blocks() {
        let table = scan(
            r#"<office:styles>
                <style:style style:name="Cell">
                    <style:text-properties fo:font-weight="bold"/>
                    <style:table-cell-properties fo:border="0.05pt solid #000000" fo:padding="0.1cm"/>
                </style:style>
            </office:styles>"#,
        );
        let cell = table.resolve("Cell").unwrap();
        assert_eq!(cell.get("font-weight"), Some("bold"));
        assert_eq!(cell.get("border"), Some("0.5pt solid #000000"));
        assert_eq!(cell.get("padding"), Some("0.1cm"));
    }

    #[test]
    fn test_css_idempotent() {
        let xml = r##"<office:styles>
            <style:style style:name="S">
                <style:text-properties fo:font-weight="bold" fo:color="#102030"/>
            </style:style>
        </office:styles>"##;
        let first = scan(xml).css("S");
        let second = scan(xml).css("S");
        assert_eq!(first, second);
    }

    #[test]
    fn test_list_style_parsing() {
        let table = scan(
            r#"<office:styles>
                <text:list-style style:name="L1">
                    <text:list-level-style-bullet text:level="1" text:bullet-char="-"/>
                    <text:list-level-style-number text:level="2" style:num-format="a"/>
                </text:list-style>
            </office:styles>"#,
        );
        let list = table.list_style("L1").unwrap();
        assert!(!list.is_ordered(1));
        assert!(list.is_ordered(2));
        assert_eq!(list.level(1), Some(&ListLevel::Bullet("-".to_string())));
        assert_eq!(list.level(2), Some(&ListLevel::Number("a".to_string())));
        assert_eq!(list.level(3), None);
    }

    #[test]
    fn test_font_face_collection() {
        let table = scan(
            r#"<office:styles>
                <style:font-face style:name="F1" svg:font-family="'Noto Serif'"
                                 style:font-family-generic="roman"/>
            </office:styles>"#,
        );
        let face = table.font("F1").unwrap();
        assert_eq!(face.family, "Noto Serif");
        assert_eq!(face.generic.as_deref(), Some("roman"));
    }
}
