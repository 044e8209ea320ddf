//! odt2html - Convert OpenDocument Text files to standalone HTML
//!
//! This library converts ODT documents (XML in a ZIP container) into a
//! single self-contained HTML file: every image and object replacement is
//! inlined as a base64 data URI, named and automatic styles are resolved
//! into inline CSS, and custom vector shapes are translated from ODF
//! enhanced geometry into SVG paths.
//!
//! # Features
//!
//! - **Style resolution**: Parent-style inheritance with deterministic,
//!   last-writer-wins property merging
//! - **Vector shapes**: Enhanced-geometry equation solving and path command
//!   translation to SVG, including arcs and quarter ellipses
//! - **Self-contained output**: Images, replacement graphics and footnotes
//!   embedded in one HTML document
//! - **Degrade, don't fail**: Malformed styles, formulas and path commands
//!   fall back locally and are logged, never aborting the document
//!
//! # Example
//!
//! ```no_run
//! use odt2html::{ConvertOptions, Package};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let package = Package::open("document.odt")?;
//! let html = odt2html::convert(&package, ConvertOptions::default())?;
//! std::fs::write("document.html", html)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod html;
pub mod node;
pub mod package;
pub mod shape;
pub mod style;
pub mod unit;

pub use error::{Error, Result};
pub use html::{ConvertOptions, convert};
pub use package::Package;

use std::path::Path;

/// Convert an ODT file on disk to a standalone HTML string.
pub fn convert_file<P: AsRef<Path>>(path: P, options: ConvertOptions) -> Result<String> {
    let package = Package::open(path)?;
    html::convert(&package, options)
}
