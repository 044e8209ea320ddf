//! Standalone HTML document template.
//!
//! The converted body is wrapped in a self-contained page: every resource is
//! already inlined as a data URI, so the output renders offline with no
//! companion files.

/// Base stylesheet shared by every converted document.
const BASE_CSS: &str = r#"        body {
            font-family: 'Noto Serif', 'Times New Roman', serif;
            line-height: 1.6;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
            color: #333;
            background-color: #fff;
        }
        p {
            margin: 0.5em 0;
            position: relative;
        }
        h1, h2, h3, h4, h5, h6 {
            margin-top: 1em;
            margin-bottom: 0.5em;
            color: #222;
        }
        table {
            border-collapse: collapse;
            margin: 1em 0;
        }
        th, td {
            padding: 8px;
            text-align: left;
        }
        th {
            background-color: #f5f5f5;
        }
        img {
            max-width: 100%;
            height: auto;
        }
        figure {
            margin: 1em 0;
            text-align: center;
        }
        figure img {
            display: block;
            margin: 0 auto;
        }
        figcaption {
            margin-top: 0.5em;
            font-style: italic;
            color: #666;
            font-size: 0.9em;
        }
        a {
            color: #0066cc;
        }
        ul, ol {
            margin: 0.5em 0;
            padding-left: 2em;
        }
        li {
            margin: 0.25em 0;
        }
        .footnote-ref a {
            text-decoration: none;
            color: #0066cc;
        }
        .footnotes {
            margin-top: 2em;
            padding-top: 1em;
            font-size: 0.9em;
        }
        .footnotes h4 {
            margin-bottom: 0.5em;
            color: #555;
        }
        .footnotes-list {
            padding-left: 1.5em;
        }
        .footnotes-list li {
            margin: 0.5em 0;
        }
        .footnote-backref {
            text-decoration: none;
            color: #0066cc;
            margin-left: 0.5em;
        }
        .footnotes-separator {
            border: none;
            border-top: 1px solid #ccc;
            margin: 2em 0 1em 0;
        }
        .drawing {
            margin: 0.5em 0;
        }
        .text-box {
            margin: 0.5em 0;
        }
"#;

/// Extra rules for the visual page-break separators.
const PAGE_BREAK_CSS: &str = r#"        .page-break {
            page-break-before: always;
            border: none;
            border-top: 2px dashed #999;
            margin: 2em 0;
            position: relative;
            text-align: center;
        }
        .page-break span {
            background: #fff;
            padding: 0 10px;
            color: #999;
            font-size: 12px;
            position: relative;
            top: -10px;
        }
        .inline-page-break::after {
            content: '\22EF';
            color: #999;
        }
"#;

/// Wrap the body markup in a complete HTML document.
pub(crate) fn wrap(body: &str, show_page_breaks: bool) -> String {
    let page_break_css = if show_page_breaks { PAGE_BREAK_CSS } else { "" };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="odt2html">
    <title>Converted Document</title>
    <style>
{base_css}{page_break_css}    </style>
</head>
<body>
{body}
</body>
</html>"#,
        base_css = BASE_CSS,
        page_break_css = page_break_css,
        body = body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_contains_body() {
        let html = wrap("<p>hi</p>", true);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<p>hi</p>"));
        assert!(html.contains(".page-break"));
    }

    #[test]
    fn test_page_break_css_optional() {
        let html = wrap("", false);
        assert!(!html.contains(".page-break"));
        assert!(html.contains("border-collapse"));
    }
}
