//! Pattern overlays composited onto rasterized parts.
//!
//! Each pattern is a scalar field over pixel coordinates. Visible pixels are
//! blended toward the pattern color by `clamp01(field * intensity)`; alpha
//! is never changed, so an overlay cannot grow or shrink a silhouette.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::color::Rgba;
use crate::error::{check_range, SpriteError};
use crate::noise::{CoherentNoise, NoiseOffset};
use crate::prng::Xorshift64;

/// Pixels at or below this alpha are copied through untouched.
pub const VISIBILITY_THRESHOLD: f64 = 0.1;

const SPOT_FREQUENCY: f64 = 0.05;
const SPOT_THRESHOLD: f64 = 0.6;
const STRIPE_ANGLE: f64 = 0.3;
const STRIPE_PERIOD: f64 = 10.0;
const SCALE_CELL: f64 = 15.0;
const SCALE_RADIUS: f64 = 0.4;
const PATCH_FREQUENCY: f64 = 0.03;
const PATCH_THRESHOLD: f64 = 0.5;

/// Overlay field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Noise thresholded into round blotches.
    Spots,
    /// Diagonal bands with noisy edges.
    Stripes,
    /// Linear ramp from the top-left corner.
    Gradient,
    /// Offset grid of discs.
    Scales,
    /// Soft-edged noise regions.
    Patches,
}

impl PatternKind {
    pub const ALL: [PatternKind; 5] = [
        PatternKind::Spots,
        PatternKind::Stripes,
        PatternKind::Gradient,
        PatternKind::Scales,
        PatternKind::Patches,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PatternKind::Spots => "spots",
            PatternKind::Stripes => "stripes",
            PatternKind::Gradient => "gradient",
            PatternKind::Scales => "scales",
            PatternKind::Patches => "patches",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, SpriteError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| SpriteError::UnsupportedPatternKind(name.to_string()))
    }

    /// Maps numeric codes 1..=5 in [`PatternKind::ALL`] order. Code 0 means
    /// "no pattern" to callers and is rejected here like any other unknown code.
    pub fn from_code(code: u32) -> Result<Self, SpriteError> {
        code.checked_sub(1)
            .and_then(|i| Self::ALL.get(i as usize).copied())
            .ok_or_else(|| SpriteError::UnsupportedPatternKind(code.to_string()))
    }
}

/// Overlay to composite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternSpec {
    pub kind: PatternKind,
    pub color: Rgba,
    /// Blend strength in [0, 1].
    pub intensity: f64,
    /// Feature size multiplier, finite and positive.
    pub scale: f64,
}

impl PatternSpec {
    pub fn new(kind: PatternKind, color: Rgba, intensity: f64, scale: f64) -> Self {
        Self {
            kind,
            color,
            intensity,
            scale,
        }
    }

    pub fn validate(&self) -> Result<(), SpriteError> {
        check_range("intensity", self.intensity, 0.0, 1.0)?;
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(SpriteError::out_of_range(
                "scale",
                self.scale,
                f64::MIN_POSITIVE,
                f64::MAX,
            ));
        }
        Ok(())
    }
}

/// Returns `buffer` with the pattern composited on its visible pixels.
///
/// Always draws two noise offsets from `rng` before validating, so the
/// stream advances identically whether or not the overlay has any effect.
pub fn apply_pattern(
    buffer: &PixelBuffer,
    spec: &PatternSpec,
    rng: &mut Xorshift64,
) -> Result<PixelBuffer, SpriteError> {
    let offset = NoiseOffset::draw(rng);
    spec.validate()?;
    if spec.intensity == 0.0 {
        return Ok(buffer.clone());
    }

    let field = PatternField {
        spec,
        offset,
        noise: CoherentNoise::new(),
        width: buffer.width() as f64,
        height: buffer.height() as f64,
    };
    Ok(buffer.map_pixels(|x, y, pixel| {
        if pixel.a <= VISIBILITY_THRESHOLD {
            return pixel;
        }
        let t = (field.value(x as f64, y as f64) * spec.intensity).clamp(0.0, 1.0);
        pixel.lerp_rgb(spec.color, t)
    }))
}

struct PatternField<'a> {
    spec: &'a PatternSpec,
    offset: NoiseOffset,
    noise: CoherentNoise,
    width: f64,
    height: f64,
}

impl PatternField<'_> {
    fn value(&self, x: f64, y: f64) -> f64 {
        let scale = self.spec.scale;
        match self.spec.kind {
            PatternKind::Spots => {
                let n = self.noise.sample(
                    self.offset.x + x * SPOT_FREQUENCY / scale,
                    self.offset.y + y * SPOT_FREQUENCY / scale,
                );
                if n > SPOT_THRESHOLD {
                    1.0
                } else {
                    0.0
                }
            }
            PatternKind::Stripes => {
                let p = (x * STRIPE_ANGLE.cos() + y * STRIPE_ANGLE.sin()) / (STRIPE_PERIOD * scale);
                let n = self.noise.sample(self.offset.x + p, self.offset.y);
                if (p * TAU).sin() * 0.5 + 0.5 > n {
                    1.0
                } else {
                    0.0
                }
            }
            PatternKind::Gradient => 0.5 * x / self.width + 0.5 * y / self.height,
            PatternKind::Scales => {
                let cell = SCALE_CELL * scale;
                let cy = y / cell;
                let row_shift = if cy.floor() as i64 % 2 == 1 { 0.5 } else { 0.0 };
                let cx = x / cell + row_shift;
                let fx = cx.fract() - 0.5;
                let fy = cy.fract() - 0.5;
                if fx.hypot(fy) < SCALE_RADIUS {
                    1.0
                } else {
                    0.0
                }
            }
            PatternKind::Patches => {
                let n = self.noise.sample(
                    self.offset.x + x * PATCH_FREQUENCY / scale,
                    self.offset.y + y * PATCH_FREQUENCY / scale,
                );
                if n > PATCH_THRESHOLD {
                    n
                } else {
                    0.0
                }
            }
        }
    }
}
