//! ODT body to HTML conversion.
//!
//! The converter walks `office:text` in document order and emits semantic
//! HTML with inline `style=` attributes resolved from the style table.
//! Images and object replacements are inlined as base64 data URIs so the
//! output is a single self-contained file. Footnotes are collected during
//! the walk and rendered as a section at the end of the body.

mod page;

use crate::Result;
use crate::node::{Content, Node};
use crate::package::Package;
use crate::shape::render::{self, ShapeStyle};
use crate::style::StyleTable;
use crate::unit;
use base64::Engine;
use std::collections::HashMap;

/// Conversion switches.
#[derive(Debug, Clone, Copy)]
pub struct ConvertOptions {
    /// Render soft page breaks as visible separators
    pub show_page_breaks: bool,
    /// Carry table and frame border styles into the output
    pub respect_table_borders: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            show_page_breaks: true,
            respect_table_borders: true,
        }
    }
}

/// Convert an opened package to a standalone HTML document.
pub fn convert(package: &Package, options: ConvertOptions) -> Result<String> {
    let content = Node::from_bytes(package.content_xml().as_bytes())?;

    let mut styles = StyleTable::new(options.respect_table_borders);
    if let Some(styles_xml) = package.styles_xml() {
        styles.scan(&Node::from_bytes(styles_xml.as_bytes())?);
    }
    // Automatic styles live in the content stream and may shadow document
    // styles of the same name
    styles.scan(&content);

    let mut converter = Converter {
        styles,
        resources: package.resources(),
        footnotes: Vec::new(),
        options,
    };

    let mut body = converter.body(&content);
    if !converter.footnotes.is_empty() {
        body.push('\n');
        body.push_str(&converter.footnotes_section());
    }

    Ok(page::wrap(&body, options.show_page_breaks))
}

struct Footnote {
    id: String,
    citation: String,
    content: String,
}

struct Converter<'a> {
    styles: StyleTable,
    resources: &'a HashMap<String, Vec<u8>>,
    footnotes: Vec<Footnote>,
    options: ConvertOptions,
}

impl Converter<'_> {
    fn body(&mut self, content: &Node) -> String {
        match content.find("office:text") {
            Some(text) => self.blocks(text),
            None => "<p>No content found in document.</p>".to_string(),
        }
    }

    /// Block-level children: paragraphs, headings, lists, tables, sections,
    /// frames and page breaks.
    fn blocks(&mut self, element: &Node) -> String {
        let mut parts = Vec::new();
        for child in element.children() {
            match child.local_name() {
                "p" => parts.push(self.paragraph(child)),
                "h" => parts.push(self.heading(child)),
                "list" => parts.push(self.list(child, 1)),
                "table" => parts.push(self.table(child)),
                "section" => parts.push(self.blocks(child)),
                "frame" => parts.push(self.frame(child)),
                "soft-page-break" if self.options.show_page_breaks => {
                    parts.push(r#"<div class="page-break"><span>Page Break</span></div>"#.to_string());
                },
                "text-box" => parts.push(self.text_box(child)),
                _ => {},
            }
        }
        parts.join("\n")
    }

    fn paragraph(&mut self, para: &Node) -> String {
        let css = self.styles.css(para.attr_or("text:style-name", ""));
        let mut content = self.inline(para);
        if content.trim().is_empty() {
            // Empty paragraphs still take vertical space
            content = "&nbsp;".to_string();
        }
        format!("<p{}>{}</p>", style_attr_css(&css), content)
    }

    fn heading(&mut self, heading: &Node) -> String {
        let level = heading
            .attr_or("text:outline-level", "1")
            .parse::<u32>()
            .unwrap_or(1)
            .clamp(1, 6);
        let css = self.styles.css(heading.attr_or("text:style-name", ""));
        let content = self.inline(heading);
        format!("<h{level}{}>{}</h{level}>", style_attr_css(&css), content)
    }

    /// Inline content of a paragraph-like element, preserving the order of
    /// text runs and nested elements.
    fn inline(&mut self, element: &Node) -> String {
        let mut parts = Vec::new();
        for piece in element.content() {
            let child = match piece {
                Content::Text(text) => {
                    parts.push(escape(text));
                    continue;
                },
                Content::Element(child) => child,
            };
            match child.local_name() {
                "span" => parts.push(self.span(child)),
                "s" => {
                    // Cap the run so a hostile count cannot balloon the output
                    let count: usize = child
                        .attr_or("text:c", "1")
                        .parse()
                        .unwrap_or(1)
                        .min(1000);
                    parts.push("&nbsp;".repeat(count));
                },
                "tab" => parts.push("&emsp;".to_string()),
                "line-break" => parts.push("<br>".to_string()),
                "a" => parts.push(self.link(child)),
                "frame" => parts.push(self.frame(child)),
                "bookmark" | "bookmark-start" | "bookmark-end" => {
                    if let Some(name) = child.attr("text:name") {
                        parts.push(format!(r#"<a id="{}"></a>"#, escape(name)));
                    }
                },
                "note" => parts.push(self.note(child)),
                "soft-page-break" if self.options.show_page_breaks => {
                    parts.push(r#"<span class="inline-page-break"></span>"#.to_string());
                },
                "sequence" => parts.push(escape(&child.text())),
                "note-ref" => {
                    let ref_name = child.attr_or("text:ref-name", "");
                    let content = self.inline(child);
                    parts.push(format!(
                        r##"<sup><a href="#ref-{}" class="footnote-ref">{}</a></sup>"##,
                        ref_name, content
                    ));
                },
                "custom-shape" => parts.push(self.custom_shape(child, child, anchor_style(child))),
                "rect" => parts.push(self.rect(child, anchor_style(child))),
                "ellipse" => parts.push(self.ellipse(child, anchor_style(child))),
                "line" => parts.push(self.line(child, anchor_style(child))),
                _ => {
                    let text = child.text();
                    if !text.is_empty() {
                        parts.push(escape(&text));
                    }
                },
            }
        }
        parts.concat()
    }

    fn span(&mut self, span: &Node) -> String {
        let css = self.styles.css(span.attr_or("text:style-name", ""));
        let content = self.inline(span);
        if css.is_empty() {
            content
        } else {
            format!(r#"<span style="{}">{}</span>"#, css, content)
        }
    }

    fn link(&mut self, link: &Node) -> String {
        let href = link.attr_or("xlink:href", "#");
        let content = self.inline(link);
        format!(r#"<a href="{}">{}</a>"#, escape(href), content)
    }

    /// Collect a footnote or endnote and return its inline citation mark.
    fn note(&mut self, note: &Node) -> String {
        let note_id = note.attr_or("text:id", "").to_string();
        let citation = note
            .child("text:note-citation")
            .map(|c| c.text())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "*".to_string());

        let mut body_parts = Vec::new();
        if let Some(body) = note.child("text:note-body") {
            for child in body.children() {
                if child.local_name() == "p" {
                    body_parts.push(self.inline(child));
                }
            }
        }

        let mark = format!(
            r##"<sup class="footnote-ref"><a href="#note-{id}" id="ref-{id}">[{citation}]</a></sup>"##,
            id = escape(&note_id),
            citation = escape(&citation),
        );
        self.footnotes.push(Footnote {
            id: note_id,
            citation,
            content: body_parts.join(" "),
        });
        mark
    }

    fn footnotes_section(&self) -> String {
        let mut parts = vec![
            r#"<hr class="footnotes-separator">"#.to_string(),
            r#"<section class="footnotes">"#.to_string(),
            "<h4>Footnotes</h4>".to_string(),
            r#"<ol class="footnotes-list">"#.to_string(),
        ];
        for note in &self.footnotes {
            parts.push(format!(
                r##"<li id="note-{id}" value="{citation}">{content} <a href="#ref-{id}" class="footnote-backref" title="Go back to reference">&#8617;</a></li>"##,
                id = escape(&note.id),
                citation = escape(&note.citation),
                content = note.content,
            ));
        }
        parts.push("</ol>".to_string());
        parts.push("</section>".to_string());
        parts.join("\n")
    }

    fn list(&mut self, list: &Node, level: u32) -> String {
        let style_name = list.attr_or("text:style-name", "");
        let ordered = self
            .styles
            .list_style(style_name)
            .is_some_and(|s| s.is_ordered(level));
        let tag = if ordered { "ol" } else { "ul" };

        let mut items = Vec::new();
        for item in list.children() {
            if item.local_name() == "list-item" {
                items.push(self.list_item(item, level));
            }
        }
        format!("<{tag}>{}</{tag}>", items.concat())
    }

    fn list_item(&mut self, item: &Node, level: u32) -> String {
        let mut parts = Vec::new();
        for child in item.children() {
            match child.local_name() {
                // List items carry their own markup, no inner <p>
                "p" => parts.push(self.inline(child)),
                "list" => parts.push(self.list(child, level + 1)),
                "h" => parts.push(self.heading(child)),
                _ => {},
            }
        }
        format!("<li>{}</li>", parts.concat())
    }

    fn table(&mut self, table: &Node) -> String {
        let css = self.styles.css(table.attr_or("table:style-name", ""));
        let mut rows = Vec::new();
        for child in table.children() {
            match child.local_name() {
                "table-row" => rows.push(self.table_row(child, false)),
                "table-header-rows" => {
                    for row in child.children() {
                        if row.local_name() == "table-row" {
                            rows.push(self.table_row(row, true));
                        }
                    }
                },
                _ => {},
            }
        }
        format!(
            r#"<table{} border="1" cellspacing="0" cellpadding="4">{}</table>"#,
            style_attr_css(&css),
            rows.concat()
        )
    }

    fn table_row(&mut self, row: &Node, is_header: bool) -> String {
        let cell_tag = if is_header { "th" } else { "td" };
        let mut cells = Vec::new();
        for child in row.children() {
            // Covered cells are consumed by a span and render nothing
            if child.local_name() == "table-cell" {
                cells.push(self.table_cell(child, cell_tag));
            }
        }
        format!("<tr>{}</tr>", cells.concat())
    }

    fn table_cell(&mut self, cell: &Node, cell_tag: &str) -> String {
        let css = self.styles.css(cell.attr_or("table:style-name", ""));

        let mut attrs = Vec::new();
        if !css.is_empty() {
            attrs.push(format!(r#"style="{}""#, css));
        }
        let colspan = cell.attr_or("table:number-columns-spanned", "");
        if !colspan.is_empty() && colspan != "1" {
            attrs.push(format!(r#"colspan="{}""#, colspan));
        }
        let rowspan = cell.attr_or("table:number-rows-spanned", "");
        if !rowspan.is_empty() && rowspan != "1" {
            attrs.push(format!(r#"rowspan="{}""#, rowspan));
        }
        let attr_str = if attrs.is_empty() {
            String::new()
        } else {
            format!(" {}", attrs.join(" "))
        };

        let mut parts = Vec::new();
        for child in cell.children() {
            match child.local_name() {
                "p" => parts.push(self.inline(child)),
                "list" => parts.push(self.list(child, 1)),
                _ => {},
            }
        }
        let content = if parts.is_empty() {
            "&nbsp;".to_string()
        } else {
            parts.join("<br>")
        };

        format!("<{cell_tag}{attr_str}>{content}</{cell_tag}>")
    }

    /// A `draw:frame` wraps images, text boxes, shapes or embedded objects,
    /// with sizing and anchoring on the frame itself.
    fn frame(&mut self, frame: &Node) -> String {
        let frame_name = frame.attr_or("draw:name", "").to_string();

        let mut style_parts = Vec::new();
        if let Some(width) = frame.attr("svg:width") {
            style_parts.push(format!("width: {}", width));
        }
        if let Some(height) = frame.attr("svg:height") {
            style_parts.push(format!("height: {}", height));
        }

        if let Some(props) = self.styles.resolve(frame.attr_or("draw:style-name", "")) {
            for key in [
                "border",
                "border-color",
                "border-width",
                "border-style",
                "background-color",
                "padding",
                "margin",
            ] {
                if let Some(value) = props.get(key) {
                    style_parts.push(format!("{}: {}", key, value));
                }
            }
            if props.contains("border") || props.contains("border-width") {
                style_parts.push("box-sizing: border-box".to_string());
            }
        }

        let x = frame.attr("svg:x");
        let y = frame.attr("svg:y");
        let anchor = frame.attr("draw:anchor-type");
        if (x.is_some() || y.is_some()) && anchor != Some("as-char") {
            style_parts.push("position: absolute".to_string());
            if let Some(x) = x {
                style_parts.push(format!("left: {}", x));
            }
            if let Some(y) = y {
                style_parts.push(format!("top: {}", y));
            }
        } else if anchor == Some("as-char") {
            style_parts.push("display: inline-block".to_string());
            // Baseline anchoring has no direct CSS equivalent
            style_parts.push("vertical-align: text-bottom".to_string());
        }

        let mut content_parts: Vec<String> = Vec::new();
        let mut has_positioned_children = false;

        for child in frame.children() {
            let mut child_style = Vec::new();
            if child.attr("svg:x").is_some() || child.attr("svg:y").is_some() {
                has_positioned_children = true;
                child_style.push("position: absolute".to_string());
                if let Some(cx) = child.attr("svg:x") {
                    child_style.push(format!("left: {}", cx));
                }
                if let Some(cy) = child.attr("svg:y") {
                    child_style.push(format!("top: {}", cy));
                }
            }
            if let Some(cw) = child.attr("svg:width") {
                child_style.push(format!("width: {}", cw));
            }
            if let Some(ch) = child.attr("svg:height") {
                child_style.push(format!("height: {}", ch));
            }
            if let Some(transform) = child.attr("draw:transform") {
                child_style.push(format!("transform: {}", transform));
            }

            let merged = [style_parts.clone(), child_style].concat();
            match child.local_name() {
                "image" => content_parts.push(self.image(child, merged, &frame_name)),
                "text-box" => {
                    // The box is a positioning context for shapes inside it
                    let mut tb_style = vec!["position: relative".to_string()];
                    if let Some(min_height) = child.attr("fo:min-height") {
                        tb_style.push(format!("min-height: {}", min_height));
                    }
                    let content = self.text_box_content(child);
                    content_parts.push(format!(
                        r#"<div class="text-box-container" style="{}">{}</div>"#,
                        tb_style.join("; "),
                        content
                    ));
                },
                "custom-shape" => content_parts.push(self.custom_shape(frame, child, merged)),
                "rect" => content_parts.push(self.rect(frame, merged)),
                "ellipse" => content_parts.push(self.ellipse(frame, merged)),
                "line" => content_parts.push(self.line(child, merged)),
                "object" => {
                    // Embedded objects fall back to their replacement image
                    if let Some(replacement) = frame.find("draw:image") {
                        content_parts.push(self.image(replacement, merged, &frame_name));
                    }
                },
                _ => {},
            }
        }

        if has_positioned_children {
            style_parts.push("position: relative".to_string());
            style_parts.push("display: inline-block".to_string());
        }

        let content: Vec<&str> = content_parts
            .iter()
            .map(String::as_str)
            .filter(|p| !p.is_empty())
            .collect();
        if !content.is_empty() {
            return format!(
                r#"<div class="drawing-frame" style="{}">{}</div>"#,
                style_parts.join("; "),
                content.join("\n")
            );
        }

        // A frame with no renderable children may still have a replacement
        // image stored per frame name
        if !frame_name.is_empty() {
            for name in self.resources.keys() {
                if name.contains("ObjectReplacement") && name.contains(&frame_name) {
                    return self.image_from_resource(name, &style_parts);
                }
            }
        }

        String::new()
    }

    fn image(&self, image: &Node, style_parts: Vec<String>, frame_name: &str) -> String {
        let href = image.attr_or("xlink:href", "");
        if href.is_empty() {
            return String::new();
        }
        let src = match self.resources.get(href) {
            Some(data) => data_uri(href, data),
            // External image, keep the reference
            None => href.to_string(),
        };
        format!(
            r#"<img src="{}"{} alt="{}">"#,
            src,
            style_attr(&style_parts),
            escape(frame_name)
        )
    }

    fn image_from_resource(&self, name: &str, style_parts: &[String]) -> String {
        let Some(data) = self.resources.get(name) else {
            return String::new();
        };
        format!(
            r#"<img src="{}"{} alt="">"#,
            data_uri(name, data),
            style_attr(style_parts)
        )
    }

    /// Render a custom shape: resolved geometry as an SVG path, with any
    /// shape text centered in an overlay.
    fn custom_shape(&mut self, frame: &Node, shape: &Node, style_parts: Vec<String>) -> String {
        let width = frame.attr_or("svg:width", "100px");
        let height = frame.attr_or("svg:height", "100px");

        let shape_style =
            ShapeStyle::from_properties(self.styles.resolve(shape.attr_or("draw:style-name", "")));
        let geometry = render::resolve_geometry(shape);
        let svg = if geometry.as_ref().is_some_and(|g| !g.path_data.is_empty()) {
            render::shape_svg(width, height, geometry.as_ref(), &shape_style)
        } else {
            // No usable geometry, keep the box visible with a placeholder
            render::rect_svg(
                unit::dimension_to_px(width, 100.0),
                unit::dimension_to_px(height, 100.0),
            )
        };

        let mut text_parts = Vec::new();
        for child in shape.children() {
            match child.local_name() {
                "p" => text_parts.push(format!(
                    r#"<p style="margin:0; padding:0;">{}</p>"#,
                    self.inline(child)
                )),
                "list" => text_parts.push(self.list(child, 1)),
                _ => {},
            }
        }

        let mut style_parts = style_parts;
        if !style_parts.iter().any(|p| p.starts_with("position")) {
            style_parts.push("position: relative".to_string());
        }
        if !style_parts.iter().any(|p| p.starts_with("display")) {
            style_parts.push("display: inline-block".to_string());
        }

        let mut content = svg;
        let text_html = text_parts.concat();
        if !text_html.trim().is_empty() {
            content.push_str(&format!(
                r#"<div style="position: absolute; top: 0; left: 0; width: 100%; height: 100%; display: flex; flex-direction: column; justify-content: center; align-items: center; overflow: hidden;">{}</div>"#,
                text_html
            ));
        }

        format!(
            r#"<div class="drawing-custom-shape" style="{}">{}</div>"#,
            style_parts.join("; "),
            content
        )
    }

    fn rect(&self, dims: &Node, style_parts: Vec<String>) -> String {
        let width = unit::dimension_to_px(dims.attr_or("svg:width", "100px"), 100.0);
        let height = unit::dimension_to_px(dims.attr_or("svg:height", "50px"), 50.0);
        drawing_div(&render::rect_svg(width, height), style_parts)
    }

    fn ellipse(&self, dims: &Node, style_parts: Vec<String>) -> String {
        let width = unit::dimension_to_px(dims.attr_or("svg:width", "100px"), 100.0);
        let height = unit::dimension_to_px(dims.attr_or("svg:height", "100px"), 100.0);
        drawing_div(&render::ellipse_svg(width, height), style_parts)
    }

    fn line(&self, line: &Node, style_parts: Vec<String>) -> String {
        let x1 = unit::dimension_to_px(line.attr_or("svg:x1", "0"), 0.0);
        let y1 = unit::dimension_to_px(line.attr_or("svg:y1", "0"), 0.0);
        let x2 = unit::dimension_to_px(line.attr_or("svg:x2", "100"), 100.0);
        let y2 = unit::dimension_to_px(line.attr_or("svg:y2", "0"), 0.0);
        drawing_div(&render::line_svg(x1, y1, x2, y2), style_parts)
    }

    /// A block-level text box outside any frame.
    fn text_box(&mut self, text_box: &Node) -> String {
        let content = self.blocks(text_box);
        let style = "border: 1px solid #ccc; padding: 8px; display: inline-block";
        format!(r#"<div class="text-box" style="{}">{}</div>"#, style, content)
    }

    /// Text box content inside a frame: caption paragraphs and lists only.
    fn text_box_content(&mut self, text_box: &Node) -> String {
        let mut parts = Vec::new();
        for child in text_box.children() {
            match child.local_name() {
                "p" => {
                    let content = self.inline(child);
                    if !content.trim().is_empty() {
                        let css = self.styles.css(child.attr_or("text:style-name", ""));
                        parts.push(format!(
                            r#"<p class="caption"{}>{}</p>"#,
                            style_attr_css(&css),
                            content
                        ));
                    }
                },
                "list" => parts.push(self.list(child, 1)),
                _ => {},
            }
        }
        parts.join("\n")
    }
}

/// Positioning for drawing elements that appear inline in a paragraph.
/// Explicitly anchored or fully positioned shapes go absolute; everything
/// else flows with the text.
fn anchor_style(node: &Node) -> Vec<String> {
    let x = node.attr("svg:x");
    let y = node.attr("svg:y");
    let anchor = node.attr("draw:anchor-type");

    let mut parts = Vec::new();
    if (x.is_some() && y.is_some()) || matches!(anchor, Some("paragraph" | "char")) {
        parts.push("position: absolute".to_string());
        if let Some(x) = x {
            parts.push(format!("left: {}", x));
        }
        if let Some(y) = y {
            parts.push(format!("top: {}", y));
        }
    } else {
        parts.push("display: inline-block".to_string());
        parts.push("vertical-align: text-bottom".to_string());
    }
    parts
}

fn drawing_div(svg: &str, mut style_parts: Vec<String>) -> String {
    if !style_parts
        .iter()
        .any(|p| p.starts_with("position") || p.starts_with("display"))
    {
        style_parts.push("display: inline-block".to_string());
    }
    format!(
        r#"<div class="drawing" style="{}">{}</div>"#,
        style_parts.join("; "),
        svg
    )
}

fn style_attr(parts: &[String]) -> String {
    if parts.is_empty() {
        String::new()
    } else {
        format!(r#" style="{}""#, parts.join("; "))
    }
}

fn style_attr_css(css: &str) -> String {
    if css.is_empty() {
        String::new()
    } else {
        format!(r#" style="{}""#, css)
    }
}

/// Escape text for HTML element and attribute content.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn data_uri(name: &str, data: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(data);
    format!("data:{};base64,{}", media_type(name), encoded)
}

fn media_type(name: &str) -> &'static str {
    let name = name.to_ascii_lowercase();
    if name.ends_with(".png") {
        "image/png"
    } else if name.ends_with(".jpg") || name.ends_with(".jpeg") {
        "image/jpeg"
    } else if name.ends_with(".gif") {
        "image/gif"
    } else if name.ends_with(".svg") {
        "image/svg+xml"
    } else if name.ends_with(".bmp") {
        "image/bmp"
    } else if name.ends_with(".webp") {
        "image/webp"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn build_package(
        content: &str,
        styles: Option<&str>,
        resources: &[(&str, &[u8])],
    ) -> Package {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("content.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
        if let Some(styles) = styles {
            writer
                .start_file("styles.xml", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(styles.as_bytes()).unwrap();
        }
        for (name, data) in resources {
            writer
                .start_file(name.to_string(), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        Package::from_reader(writer.finish().unwrap()).unwrap()
    }

    fn wrap_text(body: &str) -> String {
        format!(
            "<office:document-content><office:body><office:text>{}</office:text></office:body></office:document-content>",
            body
        )
    }

    fn convert_body(body: &str) -> String {
        let package = build_package(&wrap_text(body), None, &[]);
        convert(&package, ConvertOptions::default()).unwrap()
    }

    #[test]
    fn test_plain_paragraph() {
        let html = convert_body("<text:p>Hello &amp; welcome</text:p>");
        assert!(html.contains("<p>Hello &amp; welcome</p>"));
    }

    #[test]
    fn test_empty_paragraph_keeps_space() {
        let html = convert_body("<text:p/>");
        assert!(html.contains("<p>&nbsp;</p>"));
    }

    #[test]
    fn test_styled_span_and_paragraph() {
        let content = format!(
            r#"<office:document-content>
                <office:automatic-styles>
                    <style:style style:name="T1">
                        <style:text-properties fo:font-weight="bold"/>
                    </style:style>
                </office:automatic-styles>
                <office:body><office:text>{}</office:text></office:body>
            </office:document-content>"#,
            r#"<text:p>a<text:span text:style-name="T1">b</text:span>c</text:p>"#
        );
        let package = build_package(&content, None, &[]);
        let html = convert(&package, ConvertOptions::default()).unwrap();
        assert!(html.contains(r#"<p>a<span style="font-weight: bold">b</span>c</p>"#));
    }

    #[test]
    fn test_document_styles_visible_to_content() {
        let styles = r#"<office:document-styles><office:styles>
            <style:style style:name="P1">
                <style:paragraph-properties fo:text-align="center"/>
            </style:style>
        </office:styles></office:document-styles>"#;
        let content = wrap_text(r#"<text:p text:style-name="P1">centered</text:p>"#);
        let package = build_package(&content, Some(styles), &[]);
        let html = convert(&package, ConvertOptions::default()).unwrap();
        assert!(html.contains(r#"<p style="text-align: center">centered</p>"#));
    }

    #[test]
    fn test_heading_level_clamped() {
        let html = convert_body(r#"<text:h text:outline-level="9">Deep</text:h>"#);
        assert!(html.contains("<h6>Deep</h6>"));
    }

    #[test]
    fn test_tab_space_break() {
        let html = convert_body(
            r#"<text:p>a<text:tab/>b<text:s text:c="3"/>c<text:line-break/>d</text:p>"#,
        );
        assert!(html.contains("a&emsp;b&nbsp;&nbsp;&nbsp;c<br>d"));
    }

    #[test]
    fn test_space_run_clamped() {
        let html = convert_body(r#"<text:p>a<text:s text:c="999999999"/>b</text:p>"#);
        assert_eq!(html.matches("&nbsp;").count(), 1000);
    }

    #[test]
    fn test_link_and_bookmark() {
        let html = convert_body(
            r#"<text:p><text:a xlink:href="https://example.com">here</text:a><text:bookmark text:name="mark"/></text:p>"#,
        );
        assert!(html.contains(r#"<a href="https://example.com">here</a>"#));
        assert!(html.contains(r#"<a id="mark"></a>"#));
    }

    #[test]
    fn test_footnote_collection_and_section() {
        let html = convert_body(
            r#"<text:p>claim<text:note text:id="ftn1" text:note-class="footnote">
                <text:note-citation>1</text:note-citation>
                <text:note-body><text:p>evidence</text:p></text:note-body>
            </text:note></text:p>"#,
        );
        assert!(html.contains(r##"<a href="#note-ftn1" id="ref-ftn1">[1]</a>"##));
        assert!(html.contains(r#"<section class="footnotes">"#));
        assert!(html.contains(r#"<li id="note-ftn1" value="1">evidence"#));
    }

    #[test]
    fn test_list_ordered_by_style() {
        let content = format!(
            r#"<office:document-content>
                <office:automatic-styles>
                    <text:list-style style:name="L1">
                        <text:list-level-style-number text:level="1" style:num-format="1"/>
                    </text:list-style>
                </office:automatic-styles>
                <office:body><office:text>{}</office:text></office:body>
            </office:document-content>"#,
            r#"<text:list text:style-name="L1">
                <text:list-item><text:p>first</text:p></text:list-item>
                <text:list-item><text:p>second</text:p></text:list-item>
            </text:list>"#
        );
        let package = build_package(&content, None, &[]);
        let html = convert(&package, ConvertOptions::default()).unwrap();
        assert!(html.contains("<ol><li>first</li><li>second</li></ol>"));
    }

    #[test]
    fn test_nested_list_defaults_unordered() {
        let html = convert_body(
            r#"<text:list><text:list-item><text:p>outer</text:p>
                <text:list><text:list-item><text:p>inner</text:p></text:list-item></text:list>
            </text:list-item></text:list>"#,
        );
        assert!(html.contains("<ul><li>outer<ul><li>inner</li></ul></li></ul>"));
    }

    #[test]
    fn test_table_with_header_and_spans() {
        let html = convert_body(
            r#"<table:table>
                <table:table-header-rows><table:table-row>
                    <table:table-cell><text:p>H</text:p></table:table-cell>
                </table:table-row></table:table-header-rows>
                <table:table-row>
                    <table:table-cell table:number-columns-spanned="2"><text:p>wide</text:p></table:table-cell>
                    <table:covered-table-cell/>
                </table:table-row>
                <table:table-row>
                    <table:table-cell/><table:table-cell><text:p>x</text:p></table:table-cell>
                </table:table-row>
            </table:table>"#,
        );
        assert!(html.contains("<th>H</th>"));
        assert!(html.contains(r#"<td colspan="2">wide</td>"#));
        assert!(!html.contains("covered"));
        assert!(html.contains("<td>&nbsp;</td>"));
    }

    #[test]
    fn test_page_breaks_toggle() {
        let body = "<text:p>a</text:p><text:soft-page-break/><text:p>b</text:p>";
        let package = build_package(&wrap_text(body), None, &[]);

        let shown = convert(&package, ConvertOptions::default()).unwrap();
        assert!(shown.contains(r#"<div class="page-break">"#));

        let hidden = convert(
            &package,
            ConvertOptions {
                show_page_breaks: false,
                ..ConvertOptions::default()
            },
        )
        .unwrap();
        assert!(!hidden.contains("page-break"));
    }

    #[test]
    fn test_image_inlined_as_data_uri() {
        let body = r#"<text:p><draw:frame draw:name="Img" svg:width="2cm" svg:height="1cm">
            <draw:image xlink:href="Pictures/dot.png"/>
        </draw:frame></text:p>"#;
        let package = build_package(&wrap_text(body), None, &[("Pictures/dot.png", b"\x89PNG")]);
        let html = convert(&package, ConvertOptions::default()).unwrap();
        assert!(html.contains(r#"src="data:image/png;base64,iVBORw=="#));
        assert!(html.contains("width: 2cm"));
        assert!(html.contains(r#"alt="Img""#));
    }

    #[test]
    fn test_external_image_href_kept() {
        let body = r#"<text:p><draw:frame>
            <draw:image xlink:href="https://example.com/x.png"/>
        </draw:frame></text:p>"#;
        let html = convert(&build_package(&wrap_text(body), None, &[]), ConvertOptions::default())
            .unwrap();
        assert!(html.contains(r#"<img src="https://example.com/x.png""#));
    }

    #[test]
    fn test_custom_shape_renders_svg_path() {
        let body = r#"<text:p><draw:frame svg:width="3cm" svg:height="3cm">
            <draw:custom-shape>
                <draw:enhanced-geometry svg:viewBox="0 0 21600 21600"
                    draw:enhanced-path="U 10800 10800 10800 10800 0 360 Z N"/>
            </draw:custom-shape>
        </draw:frame></text:p>"#;
        let html = convert(&build_package(&wrap_text(body), None, &[]), ConvertOptions::default())
            .unwrap();
        assert!(html.contains(r#"class="drawing-custom-shape""#));
        assert!(html.contains("A 10800 10800 0 1 1"));
        assert!(html.contains(r##"fill="#e0e0e0""##));
        assert!(html.contains(r#"preserveAspectRatio="none""#));
    }

    #[test]
    fn test_shape_text_overlay() {
        let body = r#"<text:p><draw:frame svg:width="3cm" svg:height="1cm">
            <draw:custom-shape>
                <draw:enhanced-geometry draw:enhanced-path="M 0 0 L 21600 0 21600 21600 0 21600 Z"/>
                <text:p>Label</text:p>
            </draw:custom-shape>
        </draw:frame></text:p>"#;
        let html = convert(&build_package(&wrap_text(body), None, &[]), ConvertOptions::default())
            .unwrap();
        assert!(html.contains("justify-content: center"));
        assert!(html.contains(r#"<p style="margin:0; padding:0;">Label</p>"#));
    }

    #[test]
    fn test_custom_shape_without_geometry_gets_placeholder() {
        let body = r#"<text:p><draw:frame svg:width="100px" svg:height="50px">
            <draw:custom-shape/>
        </draw:frame></text:p>"#;
        let html = convert(&build_package(&wrap_text(body), None, &[]), ConvertOptions::default())
            .unwrap();
        assert!(html.contains(r#"<rect x="2" y="2" width="96" height="46""#));
    }

    #[test]
    fn test_object_replacement_image() {
        let body = r#"<text:p><draw:frame draw:name="Object1" svg:width="2cm">
            <draw:object xlink:href="./Object 1"/>
            <draw:image xlink:href="ObjectReplacements/Object 1"/>
        </draw:frame></text:p>"#;
        let package = build_package(
            &wrap_text(body),
            None,
            &[("ObjectReplacements/Object 1", b"bin")],
        );
        let html = convert(&package, ConvertOptions::default()).unwrap();
        assert!(html.contains("data:application/octet-stream;base64,"));
    }

    #[test]
    fn test_missing_body_placeholder() {
        let package = build_package("<office:document-content/>", None, &[]);
        let html = convert(&package, ConvertOptions::default()).unwrap();
        assert!(html.contains("<p>No content found in document.</p>"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"a<b>&"c""#), "a&lt;b&gt;&amp;&quot;c&quot;");
    }

    #[test]
    fn test_media_type_guess() {
        assert_eq!(media_type("Pictures/a.PNG"), "image/png");
        assert_eq!(media_type("x.jpeg"), "image/jpeg");
        assert_eq!(media_type("x.bin"), "application/octet-stream");
    }
}
