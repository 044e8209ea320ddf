//! Per-family style property extraction.
//!
//! Each extractor is a pure function from one `style:*-properties` element to
//! CSS-equivalent updates on a property map. Within a single style node the
//! extractors run in a fixed order and the last writer wins per key.

use super::{FontFace, PropertyMap};
use crate::node::Node;
use crate::unit::Length;
use std::collections::HashMap;

/// Border properties recognized on property elements, in `fo:` namespace.
const BORDER_KEYS: &[&str] = &[
    "border",
    "border-top",
    "border-bottom",
    "border-left",
    "border-right",
];

/// Minimum on-screen border width. ODT files produced by LibreOffice often
/// declare hairline borders ("0.05pt") that disappear at screen resolution.
const MIN_BORDER_PT: f64 = 0.5;

/// Known font stacks for offline viewing. Maps the declared family to a full
/// CSS stack with portable fallbacks.
fn known_font_stack(family: &str) -> Option<&'static str> {
    match family {
        "Liberation Serif" => Some("'Liberation Serif', 'Times New Roman', 'Georgia', serif"),
        "Liberation Sans" => Some("'Liberation Sans', 'Arial', 'Helvetica Neue', sans-serif"),
        "Liberation Mono" => Some("'Liberation Mono', 'Courier New', 'Consolas', monospace"),
        "Times New Roman" => Some("'Times New Roman', 'Georgia', serif"),
        "Arial" => Some("'Arial', 'Helvetica Neue', sans-serif"),
        "Courier New" => Some("'Courier New', 'Consolas', monospace"),
        "Noto Serif" => Some("'Noto Serif', 'Times New Roman', serif"),
        "Noto Sans" => Some("'Noto Sans', 'Arial', sans-serif"),
        "Noto Sans Mono" => Some("'Noto Sans Mono', 'Courier New', monospace"),
        "Noto Serif CJK TC" => Some("'Noto Serif CJK TC', 'PMingLiU', 'SimSun', serif"),
        "Noto Sans CJK TC" => Some("'Noto Sans CJK TC', 'Microsoft JhengHei', 'SimHei', sans-serif"),
        _ => None,
    }
}

/// Clamp a border declaration's width component up to [`MIN_BORDER_PT`].
/// "0.05pt solid #000000" becomes "0.5pt solid #000000"; wider borders and
/// non-point widths pass through unchanged.
pub(crate) fn clamp_border_width(value: &str) -> String {
    let parts: Vec<&str> = value.split_whitespace().collect();
    if parts.len() >= 3
        && let Some(number) = parts[0].strip_suffix("pt")
        && let Ok(width) = number.parse::<f64>()
        && width < MIN_BORDER_PT
    {
        let mut clamped = vec!["0.5pt"];
        clamped.extend_from_slice(&parts[1..]);
        return clamped.join(" ");
    }
    value.to_string()
}

fn apply_borders(props: &Node, out: &mut PropertyMap) {
    for key in BORDER_KEYS {
        let attr = format!("fo:{}", key);
        if let Some(value) = props.attr(&attr)
            && value != "none"
        {
            out.set(key, clamp_border_width(value));
        }
    }
}

fn apply_background(props: &Node, out: &mut PropertyMap) {
    if let Some(color) = props.attr("fo:background-color")
        && color != "transparent"
    {
        out.set("background-color", color);
    }
}

/// Extract `style:text-properties` into CSS keys.
pub(crate) fn text_properties(
    props: &Node,
    fonts: &HashMap<String, FontFace>,
    respect_borders: bool,
    out: &mut PropertyMap,
) {
    if props.attr("fo:font-weight") == Some("bold") {
        out.set("font-weight", "bold");
    }
    if props.attr("fo:font-style") == Some("italic") {
        out.set("font-style", "italic");
    }

    // Underline and strikethrough combine into one decoration value
    if let Some(underline) = props.attr("style:text-underline-style")
        && underline != "none"
    {
        out.set("text-decoration", "underline");
    }
    let line_through = props
        .attr("style:text-line-through-style")
        .or_else(|| props.attr("style:text-line-through-type"));
    if let Some(style) = line_through
        && style != "none"
    {
        let existing = out.get("text-decoration").unwrap_or("");
        if !existing.contains("line-through") {
            let combined = format!("{} line-through", existing).trim().to_string();
            out.set("text-decoration", combined);
        }
    }

    if respect_borders {
        apply_borders(props, out);
    }

    if let Some(size) = props.attr("fo:font-size") {
        out.set("font-size", size);
    }
    if let Some(color) = props.attr("fo:color") {
        out.set("color", color);
    }

    // Prefer the font declaration lookup over the raw fo: family
    if let Some(name) = props.attr("style:font-name") {
        out.set("font-family", font_family_stack(name, fonts));
    }
    if let Some(family) = props.attr("fo:font-family")
        && !out.contains("font-family")
    {
        out.set("font-family", family);
    }

    apply_background(props, out);

    // Subscript/superscript; ODF allows an independent size percentage but a
    // fixed 0.8em reads well across documents
    if let Some(position) = props.attr("style:text-position") {
        if position.starts_with("sub") || position.starts_with('-') {
            out.set("vertical-align", "sub");
            out.set("font-size", "0.8em");
        } else if position.starts_with("super") || leading_percent(position) > 0.0 {
            out.set("vertical-align", "super");
            out.set("font-size", "0.8em");
        }
    }
}

fn leading_percent(value: &str) -> f64 {
    value
        .split('%')
        .next()
        .and_then(|n| n.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn font_family_stack(name: &str, fonts: &HashMap<String, FontFace>) -> String {
    match fonts.get(name) {
        Some(face) => {
            if let Some(stack) = known_font_stack(&face.family) {
                stack.to_string()
            } else if let Some(generic) = &face.generic {
                format!("'{}', {}", face.family, generic)
            } else {
                format!("'{}'", face.family)
            }
        },
        None => format!("'{}'", name),
    }
}

/// Extract `style:paragraph-properties` into CSS keys.
pub(crate) fn paragraph_properties(props: &Node, out: &mut PropertyMap) {
    if let Some(align) = props.attr("fo:text-align") {
        let mapped = match align {
            "start" => "left",
            "end" => "right",
            other => other,
        };
        out.set("text-align", mapped);
    }
    for key in ["margin-top", "margin-bottom", "margin-left"] {
        if let Some(value) = props.attr(&format!("fo:{}", key)) {
            out.set(key, value);
        }
    }
    if let Some(height) = props.attr("fo:line-height") {
        out.set("line-height", height);
    }
    apply_background(props, out);
}

/// Extract `style:table-properties` into CSS keys.
pub(crate) fn table_properties(props: &Node, out: &mut PropertyMap) {
    if let Some(width) = props.attr("style:width") {
        out.set("width", width);
    }
    for key in ["margin-left", "margin-right"] {
        if let Some(value) = props.attr(&format!("fo:{}", key)) {
            out.set(key, value);
        }
    }
}

/// Extract `style:table-cell-properties` into CSS keys.
pub(crate) fn cell_properties(props: &Node, respect_borders: bool, out: &mut PropertyMap) {
    if let Some(padding) = props.attr("fo:padding") {
        out.set("padding", padding);
    }
    if respect_borders {
        apply_borders(props, out);
    }
    apply_background(props, out);
    if let Some(align) = props.attr("style:vertical-align") {
        out.set("vertical-align", align);
    }
}

/// Extract `style:graphic-properties` into CSS and SVG keys.
///
/// An explicit `draw:stroke="none"` or `draw:fill="none"` is surfaced as a
/// literal `none` token so the shape renderer does not paint a default over
/// an intentionally invisible stroke or fill.
pub(crate) fn graphic_properties(props: &Node, respect_borders: bool, out: &mut PropertyMap) {
    let stroke_style = props.attr("draw:stroke");

    if stroke_style == Some("none") {
        out.set("border", "none");
        out.set("stroke", "none");
    } else if let Some(color) = props.attr("svg:stroke-color") {
        out.set("border-color", color);
        out.set("stroke", color);
    }

    if let Some(width) = props.attr("svg:stroke-width") {
        // "0cm" means hairline, the thinnest visible line
        let is_hairline = width.parse::<Length>().map(|l| l.is_zero()).unwrap_or(false);
        let width = if is_hairline { "1px" } else { width };
        out.set("border-width", width);
        out.set("stroke-width", width);
    }

    if props.attr("draw:fill") == Some("none") {
        out.set("background-color", "transparent");
        out.set("fill", "none");
    } else if let Some(color) = props.attr("draw:fill-color") {
        out.set("background-color", color);
        out.set("fill", color);
    }

    if stroke_style == Some("dash") || props.attr("draw:stroke-dash").is_some() {
        out.set("border-style", "dashed");
        out.set("stroke-dasharray", "5,5");
    } else if stroke_style == Some("solid") {
        out.set("border-style", "solid");
    }

    if respect_borders {
        apply_borders(props, out);
    }

    if let Some(padding) = props.attr("fo:padding") {
        out.set("padding", padding);
    }
    if let Some(margin) = props.attr("fo:margin") {
        out.set("margin", margin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(attrs: &[(&str, &str)]) -> Node {
        let mut node = Node::new("style:text-properties");
        for (key, value) in attrs {
            node.set_attr(key, value);
        }
        node
    }

    #[test]
    fn test_border_clamp() {
        assert_eq!(
            clamp_border_width("0.05pt solid #000000"),
            "0.5pt solid #000000"
        );
        assert_eq!(
            clamp_border_width("0.5pt solid #000000"),
            "0.5pt solid #000000"
        );
        assert_eq!(clamp_border_width("2pt dashed red"), "2pt dashed red");
        // Non-point widths pass through untouched
        assert_eq!(clamp_border_width("0.01cm solid red"), "0.01cm solid red");
    }

    #[test]
    fn test_decoration_is_additive() {
        let node = props(&[
            ("style:text-underline-style", "solid"),
            ("style:text-line-through-style", "solid"),
        ]);
        let mut out = PropertyMap::default();
        text_properties(&node, &HashMap::new(), true, &mut out);
        assert_eq!(out.get("text-decoration"), Some("underline line-through"));

        // Re-extracting must not duplicate the token
        text_properties(&node, &HashMap::new(), true, &mut out);
        assert_eq!(out.get("text-decoration"), Some("underline line-through"));
    }

    #[test]
    fn test_line_through_alone() {
        let node = props(&[("style:text-line-through-type", "single")]);
        let mut out = PropertyMap::default();
        text_properties(&node, &HashMap::new(), true, &mut out);
        assert_eq!(out.get("text-decoration"), Some("line-through"));
    }

    #[test]
    fn test_text_position() {
        for value in ["sub 58%", "-30%"] {
            let node = props(&[("style:text-position", value)]);
            let mut out = PropertyMap::default();
            text_properties(&node, &HashMap::new(), true, &mut out);
            assert_eq!(out.get("vertical-align"), Some("sub"));
            assert_eq!(out.get("font-size"), Some("0.8em"));
        }
        for value in ["super 58%", "33% 100%"] {
            let node = props(&[("style:text-position", value)]);
            let mut out = PropertyMap::default();
            text_properties(&node, &HashMap::new(), true, &mut out);
            assert_eq!(out.get("vertical-align"), Some("super"));
        }
        // "0%" is neither
        let node = props(&[("style:text-position", "0% 100%")]);
        let mut out = PropertyMap::default();
        text_properties(&node, &HashMap::new(), true, &mut out);
        assert_eq!(out.get("vertical-align"), None);
    }

    #[test]
    fn test_font_stack_rewrite() {
        let mut fonts = HashMap::new();
        fonts.insert(
            "F1".to_string(),
            FontFace {
                family: "Liberation Serif".to_string(),
                generic: Some("roman".to_string()),
            },
        );
        fonts.insert(
            "F2".to_string(),
            FontFace {
                family: "Custom Face".to_string(),
                generic: Some("serif".to_string()),
            },
        );

        let node = props(&[("style:font-name", "F1")]);
        let mut out = PropertyMap::default();
        text_properties(&node, &fonts, true, &mut out);
        assert_eq!(
            out.get("font-family"),
            Some("'Liberation Serif', 'Times New Roman', 'Georgia', serif")
        );

        let node = props(&[("style:font-name", "F2")]);
        let mut out = PropertyMap::default();
        text_properties(&node, &fonts, true, &mut out);
        assert_eq!(out.get("font-family"), Some("'Custom Face', serif"));

        // Undeclared font names are quoted as-is
        let node = props(&[("style:font-name", "Mystery")]);
        let mut out = PropertyMap::default();
        text_properties(&node, &fonts, true, &mut out);
        assert_eq!(out.get("font-family"), Some("'Mystery'"));
    }

    #[test]
    fn test_graphic_none_sentinels() {
        let mut node = Node::new("style:graphic-properties");
        node.set_attr("draw:stroke", "none");
        node.set_attr("draw:fill", "none");
        let mut out = PropertyMap::default();
        graphic_properties(&node, true, &mut out);
        assert_eq!(out.get("stroke"), Some("none"));
        assert_eq!(out.get("fill"), Some("none"));
        assert_eq!(out.get("background-color"), Some("transparent"));
    }

    #[test]
    fn test_graphic_hairline_stroke() {
        let mut node = Node::new("style:graphic-properties");
        node.set_attr("svg:stroke-width", "0cm");
        let mut out = PropertyMap::default();
        graphic_properties(&node, true, &mut out);
        assert_eq!(out.get("stroke-width"), Some("1px"));

        let mut node = Node::new("style:graphic-properties");
        node.set_attr("svg:stroke-width", "0.05pt");
        let mut out = PropertyMap::default();
        graphic_properties(&node, true, &mut out);
        assert_eq!(out.get("stroke-width"), Some("0.05pt"));
    }

    #[test]
    fn test_paragraph_align_mapping() {
        let mut node = Node::new("style:paragraph-properties");
        node.set_attr("fo:text-align", "start");
        let mut out = PropertyMap::default();
        paragraph_properties(&node, &mut out);
        assert_eq!(out.get("text-align"), Some("left"));

        node.set_attr("fo:text-align", "end");
        let mut out = PropertyMap::default();
        paragraph_properties(&node, &mut out);
        assert_eq!(out.get("text-align"), Some("right"));
    }

    #[test]
    fn test_transparent_background_skipped() {
        let node = props(&[("fo:background-color", "transparent")]);
        let mut out = PropertyMap::default();
        text_properties(&node, &HashMap::new(), true, &mut out);
        assert_eq!(out.get("background-color"), None);
    }
}
