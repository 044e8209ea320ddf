//! Per-shape variable environment.
//!
//! Holds the numeric inputs of one enhanced-geometry evaluation: positional
//! modifiers (`$0`, `$1`, ...), the view-box constants, and equation results
//! as they resolve in declaration order. Created fresh for every shape and
//! discarded afterwards.

use std::collections::HashMap;

/// Default drawing coordinate space when no view-box is declared.
const DEFAULT_EXTENT: f64 = 21600.0;

/// Variable bindings for one shape's geometry.
#[derive(Debug, Clone)]
pub struct VariableEnv {
    values: HashMap<String, f64>,
}

impl VariableEnv {
    /// Create an environment holding only the fixed constants
    pub fn new() -> Self {
        let mut values = HashMap::new();
        values.insert("pi".to_string(), std::f64::consts::PI);
        values.insert("left".to_string(), 0.0);
        values.insert("top".to_string(), 0.0);
        values.insert("right".to_string(), DEFAULT_EXTENT);
        values.insert("bottom".to_string(), DEFAULT_EXTENT);
        Self { values }
    }

    /// Seed an environment from a geometry node's modifiers and view-box.
    ///
    /// Modifiers are whitespace-separated numbers bound to `$0`, `$1`, ...;
    /// a token that fails to parse binds 0.0 rather than failing the shape.
    /// A view-box ("minX minY width height") overrides the four edge
    /// constants.
    pub fn from_geometry(modifiers: Option<&str>, view_box: Option<&str>) -> Self {
        let mut env = Self::new();

        if let Some(modifiers) = modifiers {
            for (i, token) in modifiers.split_whitespace().enumerate() {
                let value = token.parse::<f64>().unwrap_or_else(|_| {
                    log::warn!("unparseable modifier '{}', defaulting to 0", token);
                    0.0
                });
                env.set(&format!("${}", i), value);
            }
        }

        if let Some(view_box) = view_box {
            let parts: Vec<f64> = view_box
                .split_whitespace()
                .filter_map(|p| p.parse().ok())
                .collect();
            if parts.len() == 4 {
                env.set("left", parts[0]);
                env.set("top", parts[1]);
                env.set("right", parts[2]);
                env.set("bottom", parts[3]);
            }
        }

        env
    }

    /// Bind or rebind a variable
    pub fn set(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_string(), value);
    }

    /// Look up a variable by its raw key (`$0`, a name, or a constant)
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Look up a positional modifier
    pub fn modifier(&self, index: u32) -> Option<f64> {
        self.get(&format!("${}", index))
    }
}

impl Default for VariableEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        let env = VariableEnv::new();
        assert_eq!(env.get("left"), Some(0.0));
        assert_eq!(env.get("right"), Some(21600.0));
        assert!((env.get("pi").unwrap() - std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(env.get("nope"), None);
    }

    #[test]
    fn test_modifier_seeding() {
        let env = VariableEnv::from_geometry(Some("3600 bogus 10"), None);
        assert_eq!(env.modifier(0), Some(3600.0));
        assert_eq!(env.modifier(1), Some(0.0));
        assert_eq!(env.modifier(2), Some(10.0));
        assert_eq!(env.modifier(3), None);
    }

    #[test]
    fn test_view_box_overrides_edges() {
        let env = VariableEnv::from_geometry(None, Some("0 0 1000 500"));
        assert_eq!(env.get("right"), Some(1000.0));
        assert_eq!(env.get("bottom"), Some(500.0));

        // Malformed view-box keeps the defaults
        let env = VariableEnv::from_geometry(None, Some("0 0 1000"));
        assert_eq!(env.get("right"), Some(21600.0));
    }
}
