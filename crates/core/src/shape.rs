//! Anti-aliased shape rasterization.
//!
//! [`rasterize`] evaluates a per-pixel inside/outside field for one primitive
//! and converts it to alpha. Pixels are sampled at their centers relative to
//! the buffer center, so unperturbed shapes are exactly symmetric. Outside
//! pixels are always written as fully transparent black.
//!
//! Every primitive draws the same two noise offsets from the caller's stream
//! before touching any pixel. The number of draws therefore never depends on
//! the shape kind.

use std::f64::consts::PI;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::color::Rgba;
use crate::error::{check_range, SpriteError};
use crate::noise::{CoherentNoise, NoiseOffset};
use crate::prng::Xorshift64;

/// Fraction of the buffer half-size used for ellipse, diamond and rectangle extents.
const INSET: f64 = 0.9;
/// Blob base radius as a fraction of the buffer size.
const BLOB_RADIUS: f64 = 0.4;
/// Peak deviation of the blob radius multiplier at irregularity 1.
const BLOB_AMPLITUDE: f64 = 0.25;
/// Lower bound for any noise-driven radius multiplier.
const MIN_WOBBLE: f64 = 0.1;
/// Width in pixels of the anti-aliasing band on straight edges.
const EDGE_BAND: f64 = 2.0;
/// Segmented: RGB factor on odd bands and opacity factor near band seams.
const BAND_SHADE: f64 = 0.85;
const SEAM_OPACITY: f64 = 0.85;
/// Fraction of a band's height treated as seam on each side.
const SEAM_FRACTION: f64 = 0.1;
/// Largest accepted segment count.
pub const MAX_SEGMENTS: u32 = 12;

/// Primitive to rasterize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeKind {
    Ellipse,
    /// Rectangle whose corner radius is `roundness` × the smaller half extent.
    RoundedRect { roundness: f64 },
    /// Apex at the top, wide base at the bottom.
    Triangle,
    /// Ellipse with a noise-driven radius. Blob uses `variation` as its irregularity.
    Blob,
    /// Stack of bulging horizontal bands.
    Segmented { segments: u32 },
    Diamond,
    /// Wide crossbar on top of a narrow stem.
    Hammerhead,
}

impl ShapeKind {
    /// Canonical names accepted by [`ShapeKind::from_name`], in code order.
    pub const NAMES: [&'static str; 7] = [
        "ellipse",
        "rounded_rect",
        "triangle",
        "blob",
        "segmented",
        "diamond",
        "hammerhead",
    ];

    /// Parses a canonical name. Parameterized kinds get roundness 0.3 and 4
    /// segments.
    pub fn from_name(name: &str) -> Result<Self, SpriteError> {
        match name {
            "ellipse" => Ok(ShapeKind::Ellipse),
            "rounded_rect" => Ok(ShapeKind::RoundedRect { roundness: 0.3 }),
            "triangle" => Ok(ShapeKind::Triangle),
            "blob" => Ok(ShapeKind::Blob),
            "segmented" => Ok(ShapeKind::Segmented { segments: 4 }),
            "diamond" => Ok(ShapeKind::Diamond),
            "hammerhead" => Ok(ShapeKind::Hammerhead),
            other => Err(SpriteError::UnsupportedShapeKind(other.to_string())),
        }
    }

    /// Maps a numeric shape code (index into [`ShapeKind::NAMES`]).
    pub fn from_code(code: u32) -> Result<Self, SpriteError> {
        Self::NAMES
            .get(code as usize)
            .ok_or_else(|| SpriteError::UnsupportedShapeKind(code.to_string()))
            .and_then(|name| Self::from_name(name))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::RoundedRect { .. } => "rounded_rect",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Blob => "blob",
            ShapeKind::Segmented { .. } => "segmented",
            ShapeKind::Diamond => "diamond",
            ShapeKind::Hammerhead => "hammerhead",
        }
    }
}

/// What to rasterize and at which size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeSpec {
    pub kind: ShapeKind,
    pub width: usize,
    pub height: usize,
    pub color: Rgba,
    /// Silhouette perturbation in [0, 1]; the irregularity of a blob.
    pub variation: f64,
}

impl ShapeSpec {
    /// Unperturbed shape.
    pub fn new(kind: ShapeKind, width: usize, height: usize, color: Rgba) -> Self {
        Self {
            kind,
            width,
            height,
            color,
            variation: 0.0,
        }
    }

    pub fn with_variation(mut self, variation: f64) -> Self {
        self.variation = variation;
        self
    }

    /// Rejects zero dimensions and out-of-range coefficients.
    pub fn validate(&self) -> Result<(), SpriteError> {
        if self.width == 0 || self.height == 0 {
            return Err(SpriteError::InvalidDimension {
                width: self.width,
                height: self.height,
            });
        }
        check_range("variation", self.variation, 0.0, 1.0)?;
        for (name, value) in [
            ("color.r", self.color.r),
            ("color.g", self.color.g),
            ("color.b", self.color.b),
            ("color.a", self.color.a),
        ] {
            check_range(name, value, 0.0, 1.0)?;
        }
        match self.kind {
            ShapeKind::RoundedRect { roundness } => {
                check_range("roundness", roundness, 0.0, 1.0)?;
            }
            ShapeKind::Segmented { segments } => {
                check_range("segments", segments as f64, 1.0, MAX_SEGMENTS as f64)?;
            }
            _ => {}
        }
        Ok(())
    }
}

/// Rasterizes `spec` into a fresh buffer, drawing noise offsets from `rng`.
pub fn rasterize(spec: &ShapeSpec, rng: &mut Xorshift64) -> Result<PixelBuffer, SpriteError> {
    spec.validate()?;
    let offset = NoiseOffset::draw(rng);
    let mut buffer = PixelBuffer::new(spec.width, spec.height)?;
    let ctx = Canvas::new(spec, offset);
    let color = spec.color;

    match spec.kind {
        ShapeKind::Ellipse => buffer.fill_with(|p, _, _| paint(color, ctx.ellipse(p))),
        ShapeKind::RoundedRect { roundness } => {
            buffer.fill_with(|p, _, _| paint(color, ctx.rounded_rect(p, roundness)))
        }
        ShapeKind::Triangle => buffer.fill_with(|p, _, _| paint(color, ctx.triangle(p))),
        ShapeKind::Blob => buffer.fill_with(|p, _, _| paint(color, ctx.blob(p))),
        ShapeKind::Segmented { segments } => {
            buffer.fill_with(|p, _, _| ctx.segmented(p, segments, color))
        }
        ShapeKind::Diamond => buffer.fill_with(|p, _, _| paint(color, ctx.diamond(p))),
        ShapeKind::Hammerhead => buffer.fill_with(|p, _, _| paint(color, ctx.hammerhead(p))),
    }
    Ok(buffer)
}

/// Half-width multiplier of a segmented band at in-band progress `p` in [0, 1].
///
/// Bulges to 1.0 at the band center and falls to 0.75 at the seams; it never
/// drops below 0.5.
pub fn segment_width_multiplier(progress: f64) -> f64 {
    0.75 + 0.25 * (PI * progress.clamp(0.0, 1.0)).sin()
}

/// Base color at `coverage` opacity, or transparent black when uncovered.
fn paint(color: Rgba, coverage: f64) -> Rgba {
    if coverage <= 0.0 {
        Rgba::TRANSPARENT
    } else {
        color.with_alpha(color.a * coverage.min(1.0))
    }
}

fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

/// Per-call geometry shared by the primitive fields.
struct Canvas {
    size: DVec2,
    center: DVec2,
    variation: f64,
    offset: NoiseOffset,
    noise: CoherentNoise,
}

impl Canvas {
    fn new(spec: &ShapeSpec, offset: NoiseOffset) -> Self {
        let size = DVec2::new(spec.width as f64, spec.height as f64);
        Self {
            size,
            center: size * 0.5,
            variation: spec.variation,
            offset,
            noise: CoherentNoise::new(),
        }
    }

    /// Radius multiplier sampled around the silhouette.
    ///
    /// Noise is read on a small circle traced by the boundary angle, so the
    /// perturbation is continuous all the way around the shape.
    fn wobble(&self, angle: f64) -> f64 {
        if self.variation <= 0.0 {
            return 1.0;
        }
        let n = self.noise.sample(
            self.offset.x + (angle * 6.0).cos() * 0.5,
            self.offset.y + (angle * 6.0).sin() * 0.5,
        );
        (1.0 + (n - 0.5) * self.variation * 2.0).max(MIN_WOBBLE)
    }

    fn ellipse(&self, p: DVec2) -> f64 {
        let radii = self.size * 0.5 * INSET;
        let n = (p - self.center) / radii;
        let distance = n.length() / self.wobble(n.y.atan2(n.x));
        if distance <= 1.0 {
            clamp01((1.0 - distance) * 3.0)
        } else {
            0.0
        }
    }

    fn diamond(&self, p: DVec2) -> f64 {
        let radii = self.size * 0.5 * INSET;
        let n = (p - self.center) / radii;
        let distance = (n.x.abs() + n.y.abs()) / self.wobble(n.y.atan2(n.x));
        if distance <= 1.0 {
            clamp01((1.0 - distance) * 3.0)
        } else {
            0.0
        }
    }

    fn rounded_rect(&self, p: DVec2, roundness: f64) -> f64 {
        let half = self.size * 0.5 * INSET;
        let radius = half.min_element() * roundness;
        let rel = p - self.center;
        let n = rel / half;
        let rel = rel / self.wobble(n.y.atan2(n.x));
        rounded_rect_coverage(rel, half, radius)
    }

    fn triangle(&self, p: DVec2) -> f64 {
        let apex_y = self.size.y * 0.1;
        let base_y = self.size.y * 0.9;
        if p.y < apex_y || p.y > base_y {
            return 0.0;
        }
        let progress = clamp01((base_y - p.y) / (base_y - apex_y));
        let half = self.size.x * 0.8 * (1.0 - progress) * 0.5;
        let mut left = self.center.x - half;
        let mut right = self.center.x + half;
        if self.variation > 0.0 {
            let n = self
                .noise
                .sample(self.offset.x + p.x * 0.02, self.offset.y + p.y * 0.02);
            let shift = (n - 0.5) * self.variation * self.size.x * 0.3;
            left += shift;
            right += shift;
        }
        if p.x < left || p.x > right {
            return 0.0;
        }
        let edge = (p.x - left).min(right - p.x).min(base_y - p.y);
        clamp01(edge / EDGE_BAND)
    }

    fn blob(&self, p: DVec2) -> f64 {
        let radii = self.size * BLOB_RADIUS;
        let n = (p - self.center) / radii;
        let angle = n.y.atan2(n.x);
        let sample = self.noise.sample(
            self.offset.x + (angle * 3.0 + self.offset.x).cos() * 2.0,
            self.offset.y + (angle * 3.0 + self.offset.y).sin() * 2.0,
        );
        let multiplier =
            (1.0 + (sample - 0.5) * 2.0 * BLOB_AMPLITUDE * self.variation).max(MIN_WOBBLE);
        let distance = n.length() / multiplier;
        if distance <= 1.0 {
            clamp01((1.0 - distance) * 2.0)
        } else {
            0.0
        }
    }

    fn segmented(&self, p: DVec2, segments: u32, color: Rgba) -> Rgba {
        let top = self.size.y * 0.05;
        let bottom = self.size.y * 0.95;
        if p.y < top || p.y > bottom {
            return Rgba::TRANSPARENT;
        }
        let bands = segments.max(1);
        let band_height = (bottom - top) / bands as f64;
        let t = (p.y - top) / band_height;
        let band = (t.floor() as u32).min(bands - 1);
        let progress = clamp01(t - band as f64);

        let mut half = self.size.x * 0.5 * INSET * segment_width_multiplier(progress);
        if self.variation > 0.0 {
            let n = self
                .noise
                .sample(self.offset.x + p.y * 0.02, self.offset.y);
            half *= (1.0 + (n - 0.5) * self.variation).max(MIN_WOBBLE);
        }
        let dx = (p.x - self.center.x).abs();
        if dx > half {
            return Rgba::TRANSPARENT;
        }

        let edge = (half - dx).min(p.y - top).min(bottom - p.y);
        let mut coverage = clamp01(edge / EDGE_BAND);
        if !(SEAM_FRACTION..=1.0 - SEAM_FRACTION).contains(&progress) {
            coverage *= SEAM_OPACITY;
        }
        let shade = if band % 2 == 1 {
            color.darken(BAND_SHADE)
        } else {
            color
        };
        paint(shade, coverage)
    }

    fn hammerhead(&self, p: DVec2) -> f64 {
        let bar_center = DVec2::new(self.center.x, self.size.y * 0.2);
        let bar_half = DVec2::new(self.size.x * 0.5 * INSET, self.size.y * 0.15);
        let stem_center = DVec2::new(self.center.x, self.size.y * 0.575);
        let stem_half = DVec2::new(self.size.x * 0.175, self.size.y * 0.375);

        let n = (p - self.center) / (self.size * 0.5);
        let wobble = self.wobble(n.y.atan2(n.x));
        let bar = rounded_rect_coverage(
            (p - bar_center) / wobble,
            bar_half,
            bar_half.min_element() * 0.5,
        );
        let stem = rounded_rect_coverage(
            (p - stem_center) / wobble,
            stem_half,
            stem_half.min_element() * 0.5,
        );
        bar.max(stem)
    }
}

/// Coverage of an axis-aligned rounded rectangle centered at the origin.
///
/// Uses the signed distance to the outline. The anti-aliasing band lies
/// inside `half`, so nothing past the half extents is covered. The band is
/// the corner radius, clamped to between one pixel and [`EDGE_BAND`].
fn rounded_rect_coverage(rel: DVec2, half: DVec2, radius: f64) -> f64 {
    let radius = radius.clamp(0.0, half.min_element());
    let q = rel.abs() - (half - DVec2::splat(radius));
    let signed = q.max(DVec2::ZERO).length() + q.max_element().min(0.0) - radius;
    let falloff = radius.clamp(1.0, EDGE_BAND);
    clamp01(-signed / falloff)
}
