//! Seeded creature color palettes.
//!
//! A palette is chosen from one of four weighted color schemes. The scheme
//! fixes the hue/saturation/value sub-ranges the primary color is sampled
//! from; the remaining colors are fixed HSV offsets of that primary.

use serde::{Deserialize, Serialize};

use crate::color::{hsv_to_rgb, Hsv, Rgba};
use crate::prng::{Xorshift64, PALETTE_SALT};

/// Selector thresholds: earth below 0.4, muted below 0.7, warm below 0.85.
const EARTH_BELOW: f64 = 0.4;
const MUTED_BELOW: f64 = 0.7;
const WARM_BELOW: f64 = 0.85;

/// Probability that a palette carries a dedicated pattern color.
const PATTERN_COLOR_CHANCE: f64 = 0.6;

/// Color scheme a palette was sampled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    /// Browns, ochres, olive tones.
    Earth,
    /// Low saturation, including near-grayscale.
    Muted,
    /// Reds, oranges and yellows.
    Warm,
    /// Any hue at high saturation and brightness.
    Vibrant,
}

/// Closed sampling interval `[lo, hi)` for one HSV channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelRange {
    pub lo: f64,
    pub hi: f64,
}

impl ChannelRange {
    const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }
}

impl ColorScheme {
    /// Maps a selector draw in [0, 1) to a scheme.
    pub fn from_selector(selector: f64) -> Self {
        if selector < EARTH_BELOW {
            ColorScheme::Earth
        } else if selector < MUTED_BELOW {
            ColorScheme::Muted
        } else if selector < WARM_BELOW {
            ColorScheme::Warm
        } else {
            ColorScheme::Vibrant
        }
    }

    /// Hue range before wrapping. Warm straddles red, so it starts below 0.
    pub fn hue_range(self) -> ChannelRange {
        match self {
            ColorScheme::Earth => ChannelRange::new(0.05, 0.15),
            ColorScheme::Muted => ChannelRange::new(0.0, 1.0),
            ColorScheme::Warm => ChannelRange::new(-0.05, 0.12),
            ColorScheme::Vibrant => ChannelRange::new(0.0, 1.0),
        }
    }

    pub fn saturation_range(self) -> ChannelRange {
        match self {
            ColorScheme::Earth => ChannelRange::new(0.30, 0.60),
            ColorScheme::Muted => ChannelRange::new(0.0, 0.25),
            ColorScheme::Warm => ChannelRange::new(0.50, 0.85),
            ColorScheme::Vibrant => ChannelRange::new(0.70, 1.0),
        }
    }

    pub fn value_range(self) -> ChannelRange {
        match self {
            ColorScheme::Earth => ChannelRange::new(0.30, 0.60),
            ColorScheme::Muted => ChannelRange::new(0.35, 0.75),
            ColorScheme::Warm => ChannelRange::new(0.60, 0.90),
            ColorScheme::Vibrant => ChannelRange::new(0.75, 1.0),
        }
    }
}

/// Colors for one creature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub scheme: ColorScheme,
    pub primary: Rgba,
    pub secondary: Rgba,
    pub accent: Rgba,
    /// Dedicated overlay color; callers fall back to `accent` when absent.
    pub pattern: Option<Rgba>,
}

impl ColorPalette {
    /// Color used for pattern overlays.
    pub fn pattern_or_accent(&self) -> Rgba {
        self.pattern.unwrap_or(self.accent)
    }

    /// All colors in order primary, secondary, accent, pattern.
    pub fn colors(&self) -> Vec<Rgba> {
        let mut colors = vec![self.primary, self.secondary, self.accent];
        colors.extend(self.pattern);
        colors
    }
}

/// Synthesizes the palette for `seed` from its own palette stream.
///
/// Draw order: scheme selector, hue, saturation, value, pattern-color gate.
pub fn synthesize_palette(seed: u64) -> ColorPalette {
    let mut rng = Xorshift64::stream(seed, PALETTE_SALT);
    palette_from_stream(&mut rng)
}

/// Runs the palette draw sequence on an existing stream.
pub fn palette_from_stream(rng: &mut Xorshift64) -> ColorPalette {
    let scheme = ColorScheme::from_selector(rng.next_f64());
    let hue = sample(rng, scheme.hue_range()).rem_euclid(1.0);
    let sat = sample(rng, scheme.saturation_range());
    let val = sample(rng, scheme.value_range());
    let has_pattern_color = rng.next_f64() < PATTERN_COLOR_CHANCE;

    let primary = hsv_to_rgb(Hsv::new(hue, sat, val), 1.0);
    let secondary = hsv_to_rgb(Hsv::new(hue + 0.1, sat * 0.85, val * 0.9), 1.0);
    let accent = hsv_to_rgb(
        Hsv::new(hue + 0.3, (sat * 1.15).min(1.0), (val * 1.1).min(1.0)),
        1.0,
    );
    let pattern =
        has_pattern_color.then(|| hsv_to_rgb(Hsv::new(hue + 0.5, sat, val * 0.6), 1.0));

    ColorPalette {
        scheme,
        primary,
        secondary,
        accent,
        pattern,
    }
}

fn sample(rng: &mut Xorshift64, range: ChannelRange) -> f64 {
    rng.next_range(range.lo, range.hi)
}
