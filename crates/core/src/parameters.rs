//! Seeded creature parameter synthesis.
//!
//! [`synthesize_parameters`] turns a seed into a [`CreatureParameters`] record
//! by a fixed sequence of draws from the parameter stream. The order below is
//! part of the seed format: moving, adding or removing a draw changes every
//! creature generated after it.
//!
//! 1. body shape, size and proportions
//! 2. body features (humps, segments, neck)
//! 3. surface details (spines, armor, pattern)
//! 4. head and face
//! 5. legs
//! 6. tail
//! 7. global variation knobs
//!
//! Each numeric field has exactly one [`RealRange`] or [`CountRange`] that is
//! used both to draw it and to validate it.

use serde::{Deserialize, Serialize};

use crate::error::SpriteError;
use crate::pattern::PatternKind;
use crate::prng::{Xorshift64, PARAMETER_SALT};
use crate::shape::ShapeKind;

/// Closed interval for a continuous parameter. Draws land in `[lo, hi)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealRange {
    pub name: &'static str,
    pub lo: f64,
    pub hi: f64,
}

impl RealRange {
    const fn new(name: &'static str, lo: f64, hi: f64) -> Self {
        Self { name, lo, hi }
    }

    pub fn draw(&self, rng: &mut Xorshift64) -> f64 {
        rng.next_range(self.lo, self.hi)
    }

    pub fn check(&self, value: f64) -> Result<(), SpriteError> {
        crate::error::check_range(self.name, value, self.lo, self.hi).map(|_| ())
    }
}

/// Inclusive interval for a small count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountRange {
    pub name: &'static str,
    pub lo: u32,
    pub hi: u32,
}

impl CountRange {
    const fn new(name: &'static str, lo: u32, hi: u32) -> Self {
        Self { name, lo, hi }
    }

    pub fn draw(&self, rng: &mut Xorshift64) -> u32 {
        rng.next_int_inclusive(self.lo, self.hi)
    }

    pub fn check(&self, value: u32) -> Result<(), SpriteError> {
        if (self.lo..=self.hi).contains(&value) {
            Ok(())
        } else {
            Err(SpriteError::out_of_range(
                self.name,
                value as f64,
                self.lo as f64,
                self.hi as f64,
            ))
        }
    }
}

/// Documented interval of every numeric field.
pub mod ranges {
    use super::{CountRange, RealRange};

    pub const BODY_SIZE: RealRange = RealRange::new("body_size", 0.7, 2.0);
    pub const BODY_ASPECT: RealRange = RealRange::new("body_aspect", 1.0, 1.8);
    pub const BODY_TAPER: RealRange = RealRange::new("body_taper", 0.0, 0.4);
    pub const BODY_IRREGULARITY: RealRange = RealRange::new("body_irregularity", 0.0, 0.5);
    pub const BODY_ROUNDNESS: RealRange = RealRange::new("body_roundness", 0.2, 0.6);

    pub const HUMP_COUNT: CountRange = CountRange::new("hump_count", 0, 2);
    pub const SEGMENT_COUNT: CountRange = CountRange::new("segment_count", 2, 6);
    pub const NECK_LENGTH: RealRange = RealRange::new("neck_length", 0.0, 0.4);

    pub const SPINE_COUNT: CountRange = CountRange::new("spine_count", 3, 9);
    pub const SPINE_LENGTH: RealRange = RealRange::new("spine_length", 0.1, 0.4);
    pub const PLATE_COUNT: CountRange = CountRange::new("plate_count", 2, 6);
    pub const PATTERN_INTENSITY: RealRange = RealRange::new("pattern_intensity", 0.2, 0.7);
    pub const PATTERN_SCALE: RealRange = RealRange::new("pattern_scale", 0.5, 2.0);

    pub const HEAD_SIZE_RATIO: RealRange = RealRange::new("head_size_ratio", 0.35, 0.55);
    pub const EYE_COUNT: CountRange = CountRange::new("eye_count", 1, 4);
    pub const EYE_SIZE: RealRange = RealRange::new("eye_size", 0.1, 0.25);
    pub const EYE_SPACING: RealRange = RealRange::new("eye_spacing", 0.2, 0.5);
    pub const MOUTH_WIDTH: RealRange = RealRange::new("mouth_width", 0.2, 0.6);
    pub const HORN_COUNT: CountRange = CountRange::new("horn_count", 1, 3);
    pub const HORN_LENGTH: RealRange = RealRange::new("horn_length", 0.15, 0.5);

    pub const LEG_PAIR_COUNT: CountRange = CountRange::new("leg_pair_count", 1, 3);
    pub const LEG_LENGTH: RealRange = RealRange::new("leg_length", 0.7, 1.5);
    pub const LEG_THICKNESS: RealRange = RealRange::new("leg_thickness", 0.4, 1.0);
    pub const LEG_SPACING: RealRange = RealRange::new("leg_spacing", 0.3, 0.7);

    pub const TAIL_LENGTH: RealRange = RealRange::new("tail_length", 0.4, 1.6);
    pub const TAIL_THICKNESS: RealRange = RealRange::new("tail_thickness", 0.25, 0.7);

    pub const PROPORTION_VARIATION: RealRange = RealRange::new("proportion_variation", 0.1, 0.2);
    pub const SHAPE_VARIATION: RealRange = RealRange::new("shape_variation", 0.0, 0.2);
    pub const COLOR_VARIATION: RealRange = RealRange::new("color_variation", 0.5, 1.5);
}

/// Gate thresholds: a feature is present when its draw exceeds the threshold.
pub mod gates {
    pub const SPINES: f64 = 0.7;
    pub const ARMOR_PLATES: f64 = 0.75;
    pub const HORNS: f64 = 0.65;
    pub const CLAWS: f64 = 0.6;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyShape {
    Ellipse,
    RoundedRect,
    Blob,
    Segmented,
    Diamond,
}

impl BodyShape {
    pub const ALL: [BodyShape; 5] = [
        BodyShape::Ellipse,
        BodyShape::RoundedRect,
        BodyShape::Blob,
        BodyShape::Segmented,
        BodyShape::Diamond,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadShape {
    Ellipse,
    RoundedRect,
    Triangle,
    Blob,
    Diamond,
    Hammerhead,
}

impl HeadShape {
    pub const ALL: [HeadShape; 6] = [
        HeadShape::Ellipse,
        HeadShape::RoundedRect,
        HeadShape::Triangle,
        HeadShape::Blob,
        HeadShape::Diamond,
        HeadShape::Hammerhead,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EyeShape {
    Round,
    Oval,
    Slit,
}

impl EyeShape {
    pub const ALL: [EyeShape; 3] = [EyeShape::Round, EyeShape::Oval, EyeShape::Slit];

    /// Height-to-width ratio of the eye sprite.
    pub fn height_ratio(self) -> f64 {
        match self {
            EyeShape::Round => 1.0,
            EyeShape::Oval => 1.4,
            EyeShape::Slit => 2.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouthShape {
    Line,
    Beak,
    Fanged,
}

impl MouthShape {
    pub const ALL: [MouthShape; 3] = [MouthShape::Line, MouthShape::Beak, MouthShape::Fanged];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegShape {
    Rounded,
    Tapered,
    Segmented,
}

impl LegShape {
    pub const ALL: [LegShape; 3] = [LegShape::Rounded, LegShape::Tapered, LegShape::Segmented];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TailShape {
    Tapered,
    Rounded,
    Segmented,
    Club,
}

impl TailShape {
    pub const ALL: [TailShape; 4] = [
        TailShape::Tapered,
        TailShape::Rounded,
        TailShape::Segmented,
        TailShape::Club,
    ];
}

/// Pattern selection; `None` is drawn as index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternChoice {
    None,
    Spots,
    Stripes,
    Gradient,
    Scales,
    Patches,
}

impl PatternChoice {
    pub const ALL: [PatternChoice; 6] = [
        PatternChoice::None,
        PatternChoice::Spots,
        PatternChoice::Stripes,
        PatternChoice::Gradient,
        PatternChoice::Scales,
        PatternChoice::Patches,
    ];

    /// The compositor kind, or `None` when no pattern was chosen.
    pub fn kind(self) -> Option<PatternKind> {
        match self {
            PatternChoice::None => None,
            PatternChoice::Spots => Some(PatternKind::Spots),
            PatternChoice::Stripes => Some(PatternKind::Stripes),
            PatternChoice::Gradient => Some(PatternKind::Gradient),
            PatternChoice::Scales => Some(PatternKind::Scales),
            PatternChoice::Patches => Some(PatternKind::Patches),
        }
    }
}

/// Picks one variant of `all` with a single uniform integer draw.
fn pick<T: Copy, const N: usize>(rng: &mut Xorshift64, all: &[T; N]) -> T {
    all[rng.next_int_inclusive(0, N as u32 - 1) as usize]
}

/// Complete, range-bounded description of one creature.
///
/// Sizes and lengths are ratios relative to the render resolution or to the
/// part they attach to. Spacing, neck length and taper are carried for the
/// placement layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureParameters {
    pub body_shape: BodyShape,
    pub body_size: f64,
    pub body_aspect: f64,
    pub body_taper: f64,
    pub body_irregularity: f64,
    pub body_roundness: f64,

    pub hump_count: u32,
    pub segment_count: u32,
    pub neck_length: f64,

    pub has_spines: bool,
    pub spine_count: u32,
    pub spine_length: f64,
    pub has_armor_plates: bool,
    pub plate_count: u32,
    pub pattern: PatternChoice,
    pub pattern_intensity: f64,
    pub pattern_scale: f64,

    pub head_shape: HeadShape,
    pub head_size_ratio: f64,
    pub eye_count: u32,
    pub eye_shape: EyeShape,
    pub eye_size: f64,
    pub eye_spacing: f64,
    pub mouth_shape: MouthShape,
    pub mouth_width: f64,
    pub has_horns: bool,
    pub horn_count: u32,
    pub horn_length: f64,

    pub leg_shape: LegShape,
    pub leg_pair_count: u32,
    pub leg_length: f64,
    pub leg_thickness: f64,
    pub leg_spacing: f64,
    pub has_claws: bool,

    pub tail_shape: TailShape,
    pub tail_length: f64,
    pub tail_thickness: f64,

    pub proportion_variation: f64,
    pub shape_variation: f64,
    pub color_variation: f64,
}

/// Synthesizes the parameters for `seed` from its own parameter stream.
pub fn synthesize_parameters(seed: u64) -> CreatureParameters {
    let mut rng = Xorshift64::stream(seed, PARAMETER_SALT);
    parameters_from_stream(&mut rng)
}

/// Runs the fixed parameter draw sequence on an existing stream.
///
/// Counts for gated features are drawn whether or not the gate passes, so the
/// number of draws is the same for every seed.
pub fn parameters_from_stream(rng: &mut Xorshift64) -> CreatureParameters {
    use ranges::*;

    // 1. body
    let body_shape = pick(rng, &BodyShape::ALL);
    let body_size = BODY_SIZE.draw(rng);
    let body_aspect = BODY_ASPECT.draw(rng);
    let body_taper = BODY_TAPER.draw(rng);
    let body_irregularity = BODY_IRREGULARITY.draw(rng);
    let body_roundness = BODY_ROUNDNESS.draw(rng);

    // 2. body features
    let hump_count = HUMP_COUNT.draw(rng);
    let segment_count = SEGMENT_COUNT.draw(rng);
    let neck_length = NECK_LENGTH.draw(rng);

    // 3. surface details
    let has_spines = rng.chance_above(gates::SPINES);
    let spine_count = SPINE_COUNT.draw(rng);
    let spine_length = SPINE_LENGTH.draw(rng);
    let has_armor_plates = rng.chance_above(gates::ARMOR_PLATES);
    let plate_count = PLATE_COUNT.draw(rng);
    let pattern = pick(rng, &PatternChoice::ALL);
    let pattern_intensity = PATTERN_INTENSITY.draw(rng);
    let pattern_scale = PATTERN_SCALE.draw(rng);

    // 4. head and face
    let head_shape = pick(rng, &HeadShape::ALL);
    let head_size_ratio = HEAD_SIZE_RATIO.draw(rng);
    let eye_count = EYE_COUNT.draw(rng);
    let eye_shape = pick(rng, &EyeShape::ALL);
    let eye_size = EYE_SIZE.draw(rng);
    let eye_spacing = EYE_SPACING.draw(rng);
    let mouth_shape = pick(rng, &MouthShape::ALL);
    let mouth_width = MOUTH_WIDTH.draw(rng);
    let has_horns = rng.chance_above(gates::HORNS);
    let horn_count = HORN_COUNT.draw(rng);
    let horn_length = HORN_LENGTH.draw(rng);

    // 5. legs
    let leg_shape = pick(rng, &LegShape::ALL);
    let leg_pair_count = LEG_PAIR_COUNT.draw(rng);
    let leg_length = LEG_LENGTH.draw(rng);
    let leg_thickness = LEG_THICKNESS.draw(rng);
    let leg_spacing = LEG_SPACING.draw(rng);
    let has_claws = rng.chance_above(gates::CLAWS);

    // 6. tail
    let tail_shape = pick(rng, &TailShape::ALL);
    let tail_length = TAIL_LENGTH.draw(rng);
    let tail_thickness = TAIL_THICKNESS.draw(rng);

    // 7. global variation
    let proportion_variation = PROPORTION_VARIATION.draw(rng);
    let shape_variation = SHAPE_VARIATION.draw(rng);
    let color_variation = COLOR_VARIATION.draw(rng);

    CreatureParameters {
        body_shape,
        body_size,
        body_aspect,
        body_taper,
        body_irregularity,
        body_roundness,
        hump_count,
        segment_count,
        neck_length,
        has_spines,
        spine_count,
        spine_length,
        has_armor_plates,
        plate_count,
        pattern,
        pattern_intensity,
        pattern_scale,
        head_shape,
        head_size_ratio,
        eye_count,
        eye_shape,
        eye_size,
        eye_spacing,
        mouth_shape,
        mouth_width,
        has_horns,
        horn_count,
        horn_length,
        leg_shape,
        leg_pair_count,
        leg_length,
        leg_thickness,
        leg_spacing,
        has_claws,
        tail_shape,
        tail_length,
        tail_thickness,
        proportion_variation,
        shape_variation,
        color_variation,
    }
}

/// Number of stream draws consumed by [`parameters_from_stream`].
pub const PARAMETER_DRAW_COUNT: usize = 40;

impl CreatureParameters {
    /// Checks every numeric field against its documented interval.
    ///
    /// Returns the first violation as `InvalidRange` naming the field.
    pub fn validate(&self) -> Result<(), SpriteError> {
        use ranges::*;

        let reals = [
            (BODY_SIZE, self.body_size),
            (BODY_ASPECT, self.body_aspect),
            (BODY_TAPER, self.body_taper),
            (BODY_IRREGULARITY, self.body_irregularity),
            (BODY_ROUNDNESS, self.body_roundness),
            (NECK_LENGTH, self.neck_length),
            (SPINE_LENGTH, self.spine_length),
            (PATTERN_INTENSITY, self.pattern_intensity),
            (PATTERN_SCALE, self.pattern_scale),
            (HEAD_SIZE_RATIO, self.head_size_ratio),
            (EYE_SIZE, self.eye_size),
            (EYE_SPACING, self.eye_spacing),
            (MOUTH_WIDTH, self.mouth_width),
            (HORN_LENGTH, self.horn_length),
            (LEG_LENGTH, self.leg_length),
            (LEG_THICKNESS, self.leg_thickness),
            (LEG_SPACING, self.leg_spacing),
            (TAIL_LENGTH, self.tail_length),
            (TAIL_THICKNESS, self.tail_thickness),
            (PROPORTION_VARIATION, self.proportion_variation),
            (SHAPE_VARIATION, self.shape_variation),
            (COLOR_VARIATION, self.color_variation),
        ];
        for (range, value) in reals {
            range.check(value)?;
        }

        let counts = [
            (HUMP_COUNT, self.hump_count),
            (SEGMENT_COUNT, self.segment_count),
            (SPINE_COUNT, self.spine_count),
            (PLATE_COUNT, self.plate_count),
            (EYE_COUNT, self.eye_count),
            (HORN_COUNT, self.horn_count),
            (LEG_PAIR_COUNT, self.leg_pair_count),
        ];
        for (range, value) in counts {
            range.check(value)?;
        }
        Ok(())
    }

    /// Rasterizer primitive for the torso.
    pub fn body_kind(&self) -> ShapeKind {
        match self.body_shape {
            BodyShape::Ellipse => ShapeKind::Ellipse,
            BodyShape::RoundedRect => ShapeKind::RoundedRect {
                roundness: self.body_roundness,
            },
            BodyShape::Blob => ShapeKind::Blob,
            BodyShape::Segmented => ShapeKind::Segmented {
                segments: self.segment_count,
            },
            BodyShape::Diamond => ShapeKind::Diamond,
        }
    }

    /// Rasterizer primitive for the head.
    pub fn head_kind(&self) -> ShapeKind {
        match self.head_shape {
            HeadShape::Ellipse => ShapeKind::Ellipse,
            HeadShape::RoundedRect => ShapeKind::RoundedRect {
                roundness: self.body_roundness,
            },
            HeadShape::Triangle => ShapeKind::Triangle,
            HeadShape::Blob => ShapeKind::Blob,
            HeadShape::Diamond => ShapeKind::Diamond,
            HeadShape::Hammerhead => ShapeKind::Hammerhead,
        }
    }

    /// Rasterizer primitive for each eye.
    pub fn eye_kind(&self) -> ShapeKind {
        match self.eye_shape {
            EyeShape::Round | EyeShape::Oval => ShapeKind::Ellipse,
            EyeShape::Slit => ShapeKind::Diamond,
        }
    }

    /// Rasterizer primitive for the mouth.
    pub fn mouth_kind(&self) -> ShapeKind {
        match self.mouth_shape {
            MouthShape::Line => ShapeKind::RoundedRect { roundness: 1.0 },
            MouthShape::Beak | MouthShape::Fanged => ShapeKind::Triangle,
        }
    }

    /// Rasterizer primitive for each leg.
    pub fn leg_kind(&self) -> ShapeKind {
        match self.leg_shape {
            LegShape::Rounded => ShapeKind::RoundedRect { roundness: 0.5 },
            LegShape::Tapered => ShapeKind::Triangle,
            LegShape::Segmented => ShapeKind::Segmented {
                segments: self.segment_count,
            },
        }
    }

    /// Rasterizer primitive for the tail.
    pub fn tail_kind(&self) -> ShapeKind {
        match self.tail_shape {
            TailShape::Tapered => ShapeKind::Triangle,
            TailShape::Rounded => ShapeKind::RoundedRect { roundness: 0.6 },
            TailShape::Segmented => ShapeKind::Segmented {
                segments: self.segment_count,
            },
            TailShape::Club => ShapeKind::Blob,
        }
    }

    /// Pattern chosen for the torso, if any.
    pub fn pattern_kind(&self) -> Option<PatternKind> {
        self.pattern.kind()
    }
}
