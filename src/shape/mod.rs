//! Vector shape interpretation.
//!
//! ODF custom shapes carry an `draw:enhanced-geometry` block whose path
//! operands are expressions over modifiers and named equations. The
//! pipeline here goes environment ([`env`]) to equation solving
//! ([`formula`]) to path translation ([`path`]) to an SVG fragment
//! ([`render`]).

pub mod env;
pub mod formula;
pub mod path;
pub mod render;

pub use env::VariableEnv;
pub use path::{PathCommand, convert_path, to_svg_path, translate};
pub use render::{Geometry, ShapeStyle, resolve_geometry, shape_svg};
