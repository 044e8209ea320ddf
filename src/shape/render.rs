//! SVG rendering of drawing shapes.
//!
//! Custom shapes resolve their enhanced geometry (modifiers, equations,
//! path) into an SVG `<path>` inside an `<svg>` sized by the frame and
//! stretched with `preserveAspectRatio="none"`, so the internal coordinate
//! space maps onto the frame box. Plain `draw:rect`, `draw:ellipse` and
//! `draw:line` elements get fixed placeholder renderings.

use super::env::VariableEnv;
use super::formula;
use super::path;
use crate::node::Node;
use crate::style::PropertyMap;

/// Fill and stroke presentation of one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyle {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: String,
}

impl ShapeStyle {
    /// Derive the presentation from a resolved graphic style.
    ///
    /// A shape with no style at all gets visible defaults; the `none`
    /// sentinels written by the style extractor pass through so disabled
    /// fills and strokes stay disabled.
    pub fn from_properties(props: Option<&PropertyMap>) -> Self {
        let fill = props
            .and_then(|p| p.get("fill"))
            .unwrap_or("#e0e0e0")
            .to_string();
        let stroke = props
            .and_then(|p| p.get("stroke"))
            .unwrap_or("#333333")
            .to_string();
        let stroke_width = props
            .and_then(|p| p.get("stroke-width"))
            .unwrap_or("1pt")
            .to_string();
        Self {
            fill,
            stroke,
            stroke_width,
        }
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self::from_properties(None)
    }
}

/// Resolved enhanced geometry: the drawing coordinate space and the
/// translated SVG path data.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub view_box: String,
    pub path_data: String,
}

/// Resolve a custom shape's `draw:enhanced-geometry` child, if present.
///
/// Seeds the variable environment from the modifiers and view-box, solves
/// the equations in declaration order, then translates the enhanced path.
pub fn resolve_geometry(shape: &Node) -> Option<Geometry> {
    let geometry = shape.find("draw:enhanced-geometry")?;

    let view_box = geometry.attr_or("svg:viewBox", "0 0 21600 21600");
    let mut env = VariableEnv::from_geometry(geometry.attr("draw:modifiers"), Some(view_box));

    let equations = geometry
        .find_all("draw:equation")
        .into_iter()
        .filter_map(|eq| Some((eq.attr("draw:name")?, eq.attr("draw:formula")?)));
    formula::solve_equations(equations, &mut env);

    let path_data = geometry
        .attr("draw:enhanced-path")
        .map(|raw| path::convert_path(raw, &env))
        .unwrap_or_default();

    Some(Geometry {
        view_box: view_box.to_string(),
        path_data,
    })
}

/// Render a custom shape as an `<svg>` fragment sized by the frame.
///
/// `width` and `height` are the frame's raw ODF dimensions ("3cm"); they
/// pass through unchanged since SVG accepts CSS lengths. Without geometry
/// the svg stays empty and only reserves space.
pub fn shape_svg(width: &str, height: &str, geometry: Option<&Geometry>, style: &ShapeStyle) -> String {
    let view_box = geometry
        .map(|g| g.view_box.as_str())
        .unwrap_or("0 0 21600 21600");
    let path = match geometry {
        Some(g) if !g.path_data.is_empty() => format!(
            r#"<path d="{}" fill="{}" stroke="{}" stroke-width="{}" vector-effect="non-scaling-stroke"/>"#,
            g.path_data, style.fill, style.stroke, style.stroke_width
        ),
        _ => String::new(),
    };
    format!(
        r#"<svg width="{}" height="{}" viewBox="{}" xmlns="http://www.w3.org/2000/svg" preserveAspectRatio="none">{}</svg>"#,
        width, height, view_box, path
    )
}

/// Placeholder rendering for `draw:rect`, inset so the stroke stays inside
/// the frame.
pub fn rect_svg(width_px: f64, height_px: f64) -> String {
    format!(
        r##"<svg width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg"><rect x="2" y="2" width="{iw}" height="{ih}" fill="#e0e0e0" stroke="#333" stroke-width="2"/></svg>"##,
        w = path::fmt_num(width_px),
        h = path::fmt_num(height_px),
        iw = path::fmt_num(width_px - 4.0),
        ih = path::fmt_num(height_px - 4.0),
    )
}

/// Placeholder rendering for `draw:ellipse`.
pub fn ellipse_svg(width_px: f64, height_px: f64) -> String {
    format!(
        r##"<svg width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg"><ellipse cx="{cx}" cy="{cy}" rx="{rx}" ry="{ry}" fill="#e0e0e0" stroke="#333" stroke-width="2"/></svg>"##,
        w = path::fmt_num(width_px),
        h = path::fmt_num(height_px),
        cx = path::fmt_num(width_px / 2.0),
        cy = path::fmt_num(height_px / 2.0),
        rx = path::fmt_num(width_px / 2.0 - 2.0),
        ry = path::fmt_num(height_px / 2.0 - 2.0),
    )
}

/// Render `draw:line` endpoints, with a margin so endpoints are not clipped.
pub fn line_svg(x1_px: f64, y1_px: f64, x2_px: f64, y2_px: f64) -> String {
    let width = x1_px.max(x2_px) + 10.0;
    let height = y1_px.max(y2_px) + 10.0;
    format!(
        r##"<svg width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg"><line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="#333" stroke-width="2"/></svg>"##,
        w = path::fmt_num(width),
        h = path::fmt_num(height),
        x1 = path::fmt_num(x1_px),
        y1 = path::fmt_num(y1_px),
        x2 = path::fmt_num(x2_px),
        y2 = path::fmt_num(y2_px),
    )
}
