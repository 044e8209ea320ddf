//! Generic XML element model.
//!
//! ODF documents use a fixed, well-known set of namespace prefixes
//! (`text:`, `style:`, `draw:`, `fo:`, ...), so tag and attribute names are
//! kept verbatim with their prefixes instead of resolving namespace URIs.
//! Mixed content order matters for inline text (text interleaved with spans,
//! links and shapes), so a node stores an ordered list of text runs and
//! child elements.

use crate::{Error, Result};
use quick_xml::events::Event;
use std::collections::HashMap;

/// One piece of a node's ordered content.
#[derive(Debug, Clone)]
pub enum Content {
    /// A run of character data
    Text(String),
    /// A child element
    Element(Node),
}

/// An XML element with attributes and ordered mixed content.
#[derive(Debug, Clone)]
pub struct Node {
    tag: String,
    attributes: HashMap<String, String>,
    content: Vec<Content>,
}

impl Node {
    /// Create a new element with the given (prefixed) tag name
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: HashMap::new(),
            content: Vec::new(),
        }
    }

    /// Get the full tag name including its namespace prefix
    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Get the tag name without its namespace prefix
    #[inline]
    pub fn local_name(&self) -> &str {
        self.tag.rsplit(':').next().unwrap_or(&self.tag)
    }

    /// Get an attribute value by its prefixed name
    #[inline]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Get an attribute value, or a default when absent
    #[inline]
    pub fn attr_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.attr(name).unwrap_or(default)
    }

    /// Set an attribute value
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes
            .insert(name.to_string(), value.to_string());
    }

    /// Append a text run
    pub fn push_text(&mut self, text: &str) {
        if let Some(Content::Text(last)) = self.content.last_mut() {
            last.push_str(text);
        } else {
            self.content.push(Content::Text(text.to_string()));
        }
    }

    /// Append a child element
    pub fn add_child(&mut self, child: Node) {
        self.content.push(Content::Element(child));
    }

    /// Ordered mixed content
    #[inline]
    pub fn content(&self) -> &[Content] {
        &self.content
    }

    /// Iterate over child elements, skipping text runs
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.content.iter().filter_map(|c| match c {
            Content::Element(node) => Some(node),
            Content::Text(_) => None,
        })
    }

    /// Direct text content (child element text excluded)
    pub fn text(&self) -> String {
        let mut out = String::new();
        for piece in &self.content {
            if let Content::Text(t) = piece {
                out.push_str(t);
            }
        }
        out
    }

    /// Text content of this element and all descendants, in document order
    pub fn text_recursive(&self) -> String {
        let mut out = String::new();
        for piece in &self.content {
            match piece {
                Content::Text(t) => out.push_str(t),
                Content::Element(node) => out.push_str(&node.text_recursive()),
            }
        }
        out
    }

    /// Find a direct child by tag name
    pub fn child(&self, tag: &str) -> Option<&Node> {
        self.children().find(|c| c.tag == tag)
    }

    /// Find the first descendant with the given tag name (depth-first)
    pub fn find(&self, tag: &str) -> Option<&Node> {
        for child in self.children() {
            if child.tag == tag {
                return Some(child);
            }
            if let Some(found) = child.find(tag) {
                return Some(found);
            }
        }
        None
    }

    /// Collect all descendants with the given tag name, in document order
    pub fn find_all<'a>(&'a self, tag: &str) -> Vec<&'a Node> {
        let mut out = Vec::new();
        self.collect_into(tag, &mut out);
        out
    }

    fn collect_into<'a>(&'a self, tag: &str, out: &mut Vec<&'a Node>) {
        for child in self.children() {
            if child.tag == tag {
                out.push(child);
            }
            child.collect_into(tag, out);
        }
    }

    /// Parse an XML document into its root element
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = quick_xml::Reader::from_reader(bytes);
        let mut buf = Vec::new();
        let mut stack: Vec<Node> = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    stack.push(Self::from_tag(e)?);
                },
                Ok(Event::Empty(ref e)) => {
                    let node = Self::from_tag(e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.add_child(node),
                        // A lone self-closing root element
                        None => return Ok(node),
                    }
                },
                Ok(Event::Text(ref t)) => {
                    if let Some(current) = stack.last_mut() {
                        let text = t
                            .xml_content()
                            .map_err(|e| Error::Xml(format!("Invalid text content: {}", e)))?;
                        current.push_text(&text);
                    }
                },
                // Entity references arrive as their own events
                Ok(Event::GeneralRef(ref r)) => {
                    if let Some(current) = stack.last_mut() {
                        let resolved = r
                            .resolve_char_ref()
                            .map_err(|e| Error::Xml(format!("Invalid character reference: {}", e)))?;
                        if let Some(ch) = resolved {
                            current.push_text(ch.encode_utf8(&mut [0u8; 4]));
                        } else {
                            let name = r
                                .decode()
                                .map_err(|e| Error::Xml(format!("Invalid entity reference: {}", e)))?;
                            match quick_xml::escape::resolve_predefined_entity(&name) {
                                Some(text) => current.push_text(text),
                                None => log::warn!("Skipping unknown entity reference: &{};", name),
                            }
                        }
                    }
                },
                Ok(Event::End(_)) => {
                    if let Some(node) = stack.pop() {
                        match stack.last_mut() {
                            Some(parent) => parent.add_child(node),
                            None => return Ok(node),
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::Xml(format!("XML parsing error: {}", e))),
                _ => {},
            }
            buf.clear();
        }

        Err(Error::Xml("No root element found".to_string()))
    }

    fn from_tag(e: &quick_xml::events::BytesStart<'_>) -> Result<Self> {
        let tag = String::from_utf8(e.name().as_ref().to_vec())
            .map_err(|_| Error::Xml("Invalid UTF-8 in tag name".to_string()))?;
        let mut node = Node::new(&tag);

        for attr_result in e.attributes() {
            let attr =
                attr_result.map_err(|e| Error::Xml(format!("Invalid attribute: {}", e)))?;
            let key = String::from_utf8(attr.key.as_ref().to_vec())
                .map_err(|_| Error::Xml("Invalid UTF-8 in attribute key".to_string()))?;
            let value = attr
                .unescape_value()
                .map_err(|e| Error::Xml(format!("Invalid attribute value: {}", e)))?;
            // Namespace declarations carry no information here; prefixes are fixed
            if key != "xmlns" && !key.starts_with("xmlns:") {
                node.set_attr(&key, &value);
            }
        }

        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let xml = br#"<text:p text:style-name="P1">Hello <text:span>world</text:span>!</text:p>"#;
        let node = Node::from_bytes(xml).unwrap();
        assert_eq!(node.tag(), "text:p");
        assert_eq!(node.local_name(), "p");
        assert_eq!(node.attr("text:style-name"), Some("P1"));
        assert_eq!(node.text_recursive(), "Hello world!");
    }

    #[test]
    fn test_mixed_content_order() {
        let xml = b"<p>a<b>c</b>d</p>";
        let node = Node::from_bytes(xml).unwrap();
        let kinds: Vec<&str> = node
            .content()
            .iter()
            .map(|c| match c {
                Content::Text(_) => "text",
                Content::Element(_) => "elem",
            })
            .collect();
        assert_eq!(kinds, vec!["text", "elem", "text"]);
        assert_eq!(node.text(), "ad");
    }

    #[test]
    fn test_self_closing_and_find() {
        let xml = br#"<office:text><text:p/><draw:frame><draw:image xlink:href="Pictures/a.png"/></draw:frame></office:text>"#;
        let node = Node::from_bytes(xml).unwrap();
        assert_eq!(node.children().count(), 2);
        let image = node.find("draw:image").unwrap();
        assert_eq!(image.attr("xlink:href"), Some("Pictures/a.png"));
        assert!(node.find("draw:object").is_none());
    }

    #[test]
    fn test_find_all_document_order() {
        let xml = b"<r><s n=\"1\"/><g><s n=\"2\"/></g><s n=\"3\"/></r>";
        let node = Node::from_bytes(xml).unwrap();
        let names: Vec<&str> = node
            .find_all("s")
            .iter()
            .filter_map(|s| s.attr("n"))
            .collect();
        assert_eq!(names, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_entity_unescape() {
        let xml = b"<p a=\"x&amp;y\">1 &lt; 2</p>";
        let node = Node::from_bytes(xml).unwrap();
        assert_eq!(node.attr("a"), Some("x&y"));
        assert_eq!(node.text(), "1 < 2");
    }

    #[test]
    fn test_character_references() {
        let xml = "<p>caf&#233; &amp; &#x41;&nosuchentity;</p>".as_bytes();
        let node = Node::from_bytes(xml).unwrap();
        assert_eq!(node.text(), "caf\u{e9} & A");
    }

    #[test]
    fn test_references_keep_document_order() {
        let xml = b"<p>a&amp;b<s>c</s>&gt;d</p>";
        let node = Node::from_bytes(xml).unwrap();
        assert_eq!(node.text(), "a&b>d");
        assert_eq!(node.text_recursive(), "a&bc>d");
    }
}
