//! RGBA and HSV color types and the conversions between them.
//!
//! Components are `f64` in [0, 1]. Hue is expressed as a fraction of the
//! color wheel (0.0 = red, 1/3 = green, 2/3 = blue) and always wraps modulo 1.

use crate::error::SpriteError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Straight (non-premultiplied) RGBA color with components in [0, 1].
///
/// Serializes as `"#rrggbbaa"`. The hex round-trip quantizes to 8 bits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

/// Hue / saturation / value, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Rgba {
    /// Fully transparent black. Every pixel outside a shape has this value.
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from RGB components.
    pub const fn opaque(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Same RGB with a different alpha.
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Multiplies RGB by `factor`, leaving alpha unchanged. Result is clamped.
    pub fn darken(self, factor: f64) -> Self {
        Self {
            r: (self.r * factor).clamp(0.0, 1.0),
            g: (self.g * factor).clamp(0.0, 1.0),
            b: (self.b * factor).clamp(0.0, 1.0),
            a: self.a,
        }
    }

    /// Linear interpolation of RGB toward `target` by `t`; alpha is kept.
    pub fn lerp_rgb(self, target: Rgba, t: f64) -> Self {
        Self {
            r: self.r + (target.r - self.r) * t,
            g: self.g + (target.g - self.g) * t,
            b: self.b + (target.b - self.b) * t,
            a: self.a,
        }
    }

    /// Returns the channels as an array, RGBA order.
    pub fn to_array(self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parses `"#rrggbb"` or `"#rrggbbaa"` (hash optional, case insensitive).
    pub fn from_hex(hex: &str) -> Result<Rgba, SpriteError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 && hex.len() != 8 {
            return Err(SpriteError::InvalidColor(format!(
                "expected 6 or 8 hex digits, got {}",
                hex.len()
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            hex.get(range)
                .ok_or_else(|| SpriteError::InvalidColor(format!("non-ascii {name} component")))
                .and_then(|digits| {
                    u8::from_str_radix(digits, 16).map_err(|e| {
                        SpriteError::InvalidColor(format!("invalid {name} component: {e}"))
                    })
                })
                .map(|v| v as f64 / 255.0)
        };
        let r = channel(0..2, "red")?;
        let g = channel(2..4, "green")?;
        let b = channel(4..6, "blue")?;
        let a = if hex.len() == 8 {
            channel(6..8, "alpha")?
        } else {
            1.0
        };
        Ok(Rgba { r, g, b, a })
    }

    /// Formats the color as `"#rrggbbaa"` with 8-bit rounding.
    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.to_array().map(quantize);
        format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

/// Quantizes a unit-interval channel to 8 bits with rounding.
pub fn quantize(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl Hsv {
    pub const fn new(h: f64, s: f64, v: f64) -> Self {
        Self { h, s, v }
    }
}

/// Converts RGB to HSV. Alpha is ignored.
///
/// Achromatic colors (max == min) report hue 0 and saturation 0.
pub fn rgb_to_hsv(c: Rgba) -> Hsv {
    let max = c.r.max(c.g).max(c.b);
    let min = c.r.min(c.g).min(c.b);
    let delta = max - min;

    let v = max;
    let s = if max > 0.0 { delta / max } else { 0.0 };
    if delta <= 0.0 {
        return Hsv { h: 0.0, s, v };
    }

    let sector = if max == c.r {
        (c.g - c.b) / delta
    } else if max == c.g {
        (c.b - c.r) / delta + 2.0
    } else {
        (c.r - c.g) / delta + 4.0
    };
    // rem_euclid can round a tiny negative hue up to exactly 1.0
    let h = (sector / 6.0).rem_euclid(1.0);
    Hsv {
        h: if h >= 1.0 { 0.0 } else { h },
        s,
        v,
    }
}

/// Converts HSV to an RGBA color with the given alpha.
///
/// Hue wraps modulo 1; saturation and value are clamped to [0, 1].
pub fn hsv_to_rgb(c: Hsv, alpha: f64) -> Rgba {
    let h = c.h.rem_euclid(1.0) * 6.0;
    let s = c.s.clamp(0.0, 1.0);
    let v = c.v.clamp(0.0, 1.0);

    let sector = (h.floor() as i64).rem_euclid(6);
    let f = h - h.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match sector {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgba::new(r, g, b, alpha)
}
