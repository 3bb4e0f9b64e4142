//! Render configuration and its JSON override layer.
//!
//! Overrides arrive as a loose JSON object. Missing keys and values of the
//! wrong JSON type fall back to the defaults; a value of the right type that
//! lies outside its accepted range is an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::buffer::DEFAULT_PIXELS_PER_UNIT;
use crate::error::{check_range, SpriteError};

pub const MIN_RESOLUTION: usize = 32;
pub const MAX_RESOLUTION: usize = 256;
pub const DEFAULT_RESOLUTION: usize = 128;
const MIN_PIXELS_PER_UNIT: f64 = 1.0;
const MAX_PIXELS_PER_UNIT: f64 = 1000.0;

/// How a creature is turned into sprites.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Reference size in pixels: the largest possible torso spans it.
    pub resolution: usize,
    pub pixels_per_unit: f64,
    /// Composite the torso pattern when the parameters choose one.
    pub patterns: bool,
    /// Render optional surface details (spines, plates, horns, claws, humps).
    pub details: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            pixels_per_unit: DEFAULT_PIXELS_PER_UNIT,
            patterns: true,
            details: true,
        }
    }
}

impl RenderConfig {
    /// Reads overrides from a JSON object on top of the defaults.
    pub fn from_json(overrides: &Value) -> Result<Self, SpriteError> {
        let defaults = Self::default();
        let config = Self {
            resolution: param_usize(overrides, "resolution", defaults.resolution),
            pixels_per_unit: param_f64(overrides, "pixels_per_unit", defaults.pixels_per_unit),
            patterns: param_bool(overrides, "patterns", defaults.patterns),
            details: param_bool(overrides, "details", defaults.details),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_patterns(mut self, patterns: bool) -> Self {
        self.patterns = patterns;
        self
    }

    pub fn with_details(mut self, details: bool) -> Self {
        self.details = details;
        self
    }

    pub fn validate(&self) -> Result<(), SpriteError> {
        check_range(
            "resolution",
            self.resolution as f64,
            MIN_RESOLUTION as f64,
            MAX_RESOLUTION as f64,
        )?;
        check_range(
            "pixels_per_unit",
            self.pixels_per_unit,
            MIN_PIXELS_PER_UNIT,
            MAX_PIXELS_PER_UNIT,
        )?;
        Ok(())
    }
}

fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Negative or fractional numbers are not integers and fall back to `default`.
fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .map(|v| usize::try_from(v).unwrap_or(usize::MAX))
        .unwrap_or(default)
}

fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_gives_defaults() {
        let config = RenderConfig::from_json(&json!({})).unwrap();
        assert_eq!(config, RenderConfig::default());
        assert_eq!(config.resolution, 128);
        assert_eq!(config.pixels_per_unit, 100.0);
        assert!(config.patterns);
        assert!(config.details);
    }

    #[test]
    fn non_object_gives_defaults() {
        assert_eq!(
            RenderConfig::from_json(&json!(42)).unwrap(),
            RenderConfig::default()
        );
        assert_eq!(
            RenderConfig::from_json(&Value::Null).unwrap(),
            RenderConfig::default()
        );
    }

    #[test]
    fn overrides_are_applied() {
        let config = RenderConfig::from_json(&json!({
            "resolution": 64,
            "pixels_per_unit": 32,
            "patterns": false,
        }))
        .unwrap();
        assert_eq!(config.resolution, 64);
        assert_eq!(config.pixels_per_unit, 32.0);
        assert!(!config.patterns);
        assert!(config.details);
    }

    #[test]
    fn wrong_types_fall_back_to_defaults() {
        let config = RenderConfig::from_json(&json!({
            "resolution": "big",
            "patterns": 1,
            "pixels_per_unit": null,
        }))
        .unwrap();
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn out_of_range_values_are_errors() {
        for overrides in [
            json!({"resolution": 16}),
            json!({"resolution": 512}),
            json!({"pixels_per_unit": 0.5}),
        ] {
            assert!(
                matches!(
                    RenderConfig::from_json(&overrides),
                    Err(SpriteError::InvalidRange { .. })
                ),
                "{overrides} accepted"
            );
        }
    }

    #[test]
    fn resolution_bounds_are_inclusive() {
        assert!(RenderConfig::default().with_resolution(32).validate().is_ok());
        assert!(RenderConfig::default().with_resolution(256).validate().is_ok());
    }

    #[test]
    fn deserialize_fills_missing_fields() {
        let config: RenderConfig = serde_json::from_str(r#"{"details": false}"#).unwrap();
        assert!(!config.details);
        assert_eq!(config.resolution, DEFAULT_RESOLUTION);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn accepted_resolutions_are_exactly_the_range(resolution in 0_u64..1024) {
                let result = RenderConfig::from_json(&json!({"resolution": resolution}));
                let in_range = (32..=256).contains(&resolution);
                prop_assert_eq!(result.is_ok(), in_range);
            }
        }
    }
}
