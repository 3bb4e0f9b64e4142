//! Error types for the creature sprite core.

use thiserror::Error;

/// Errors produced by synthesis, rasterization and compositing.
///
/// Every variant is local to a single shape or pattern invocation and is
/// returned to the caller; nothing in the core substitutes a fallback.
#[derive(Debug, Error)]
pub enum SpriteError {
    /// Width or height was zero, or `width * height` overflowed.
    #[error("invalid dimensions {width}x{height}: width and height must be positive")]
    InvalidDimension { width: usize, height: usize },

    /// A value fell outside its documented closed interval.
    #[error("{name} = {value} is outside [{lo}, {hi}]")]
    InvalidRange {
        name: String,
        value: f64,
        lo: f64,
        hi: f64,
    },

    /// A shape kind name or code that does not map to a known primitive.
    #[error("unsupported shape kind: {0}")]
    UnsupportedShapeKind(String),

    /// A pattern kind name or code that does not map to a known pattern.
    #[error("unsupported pattern kind: {0}")]
    UnsupportedPatternKind(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Writing an exported image or manifest failed.
    #[error("i/o error: {0}")]
    Io(String),
}

impl SpriteError {
    /// Builds an [`SpriteError::InvalidRange`] for `name`.
    pub fn out_of_range(name: impl Into<String>, value: f64, lo: f64, hi: f64) -> Self {
        SpriteError::InvalidRange {
            name: name.into(),
            value,
            lo,
            hi,
        }
    }
}

/// Returns `Ok(value)` when `value` lies in `[lo, hi]`, `InvalidRange` otherwise.
///
/// NaN is always rejected.
pub fn check_range(name: &str, value: f64, lo: f64, hi: f64) -> Result<f64, SpriteError> {
    if value >= lo && value <= hi {
        Ok(value)
    } else {
        Err(SpriteError::out_of_range(name, value, lo, hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimension_displays_both_sizes() {
        let err = SpriteError::InvalidDimension {
            width: 0,
            height: 64,
        };
        let msg = format!("{err}");
        assert!(msg.contains("0x64"), "expected dimensions in: {msg}");
    }

    #[test]
    fn invalid_range_includes_name_and_bounds() {
        let err = SpriteError::out_of_range("body_size", 3.5, 0.7, 2.0);
        let msg = format!("{err}");
        assert!(msg.contains("body_size"), "missing name in: {msg}");
        assert!(msg.contains("3.5"), "missing value in: {msg}");
        assert!(msg.contains("0.7"), "missing lo in: {msg}");
        assert!(msg.contains('2'), "missing hi in: {msg}");
    }

    #[test]
    fn unsupported_kinds_include_the_offending_code() {
        let shape = SpriteError::UnsupportedShapeKind("star".into());
        let pattern = SpriteError::UnsupportedPatternKind("9".into());
        assert!(shape.to_string().contains("star"));
        assert!(pattern.to_string().contains('9'));
    }

    #[test]
    fn check_range_accepts_closed_bounds() {
        assert!(check_range("x", 0.0, 0.0, 1.0).is_ok());
        assert!(check_range("x", 1.0, 0.0, 1.0).is_ok());
    }

    #[test]
    fn check_range_rejects_outside_and_nan() {
        assert!(matches!(
            check_range("x", 1.01, 0.0, 1.0),
            Err(SpriteError::InvalidRange { .. })
        ));
        assert!(check_range("x", -0.01, 0.0, 1.0).is_err());
        assert!(check_range("x", f64::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn sprite_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SpriteError>();
    }

    #[test]
    fn sprite_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<SpriteError>();
    }
}
