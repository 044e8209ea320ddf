//! Physical length parsing and pixel conversion.
//!
//! ODF dimensions carry explicit units ("2.5cm", "10pt", "0.05in"). CSS can
//! consume most of them verbatim, but SVG container sizing and line geometry
//! need a canonical pixel value, computed here at the CSS ratio of 96px per
//! inch.

use std::fmt;
use std::str::FromStr;

/// Pixels per centimeter at 96 DPI.
pub const PX_PER_CM: f64 = 37.795_275_591;
/// Pixels per millimeter at 96 DPI.
pub const PX_PER_MM: f64 = 3.779_527_559_1;
/// Pixels per inch.
pub const PX_PER_IN: f64 = 96.0;
/// Pixels per point (1/72 inch), rounded the way browsers render it.
pub const PX_PER_PT: f64 = 1.333;

/// Supported length units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    /// Centimeter
    Centimeter,
    /// Millimeter
    Millimeter,
    /// Inch
    Inch,
    /// Point (1/72 inch)
    Point,
    /// Pixel
    Pixel,
    /// Bare number, treated as already-pixel
    Unitless,
}

impl LengthUnit {
    /// Get the unit abbreviation
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Centimeter => "cm",
            Self::Millimeter => "mm",
            Self::Inch => "in",
            Self::Point => "pt",
            Self::Pixel => "px",
            Self::Unitless => "",
        }
    }

    /// Parse unit from its suffix
    fn from_suffix(s: &str) -> Option<Self> {
        match s {
            "cm" => Some(Self::Centimeter),
            "mm" => Some(Self::Millimeter),
            "in" | "inch" => Some(Self::Inch),
            "pt" => Some(Self::Point),
            "px" => Some(Self::Pixel),
            "" => Some(Self::Unitless),
            _ => None,
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Length value with unit
///
/// Supports parsing from ODF dimension strings and conversion to CSS pixels.
///
/// # Examples
///
/// ```
/// use odt2html::unit::{Length, LengthUnit};
///
/// let length = "2.54cm".parse::<Length>().unwrap();
/// assert_eq!(length.unit(), LengthUnit::Centimeter);
/// assert!((length.to_px() - 96.0).abs() < 0.1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    value: f64,
    unit: LengthUnit,
}

impl Length {
    /// Create a new length measurement
    #[inline]
    pub fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    /// Get the numeric value
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Get the unit
    #[inline]
    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    /// Convert to CSS pixels (96 DPI)
    pub fn to_px(&self) -> f64 {
        match self.unit {
            LengthUnit::Centimeter => self.value * PX_PER_CM,
            LengthUnit::Millimeter => self.value * PX_PER_MM,
            LengthUnit::Inch => self.value * PX_PER_IN,
            LengthUnit::Point => self.value * PX_PER_PT,
            LengthUnit::Pixel | LengthUnit::Unitless => self.value,
        }
    }

    /// Whether the measurement is exactly zero
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.value == 0.0
    }
}

impl FromStr for Length {
    type Err = crate::Error;

    /// Parse a length from an ODF dimension string (e.g. "2.5cm", "10pt")
    fn from_str(s: &str) -> crate::Result<Self> {
        let s = s.trim();
        let split = s
            .char_indices()
            .find(|(_, c)| c.is_ascii_alphabetic())
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        let (number, suffix) = s.split_at(split);

        let value: f64 = number.parse().map_err(|_| {
            crate::Error::InvalidFormat(format!("No numeric value found in '{}'", s))
        })?;
        let unit = LengthUnit::from_suffix(suffix).ok_or_else(|| {
            crate::Error::InvalidFormat(format!("Unknown length unit '{}'", suffix))
        })?;

        Ok(Self::new(value, unit))
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.as_str())
    }
}

/// Convert an ODF dimension string to pixels, falling back to `default`
/// when the string is empty or unparseable.
pub fn dimension_to_px(dim: &str, default: f64) -> f64 {
    match dim.trim().parse::<Length>() {
        Ok(length) => length.to_px(),
        Err(_) => default,
    }
}
