#![deny(unsafe_code)]
//! Sprite pipeline: turns a [`CreatureRecipe`] into one pixel buffer per body
//! part, plus PNG/manifest export.
//!
//! This crate sits between `creature-sprite-core` (synthesis, rasterization,
//! compositing) and the CLI. It decides which parts a creature has, how large
//! each one is and in which order they layer. It does no positioning: every
//! sprite carries a normalized pivot and a sort order, and placement is left
//! to whatever consumes them.

pub mod manifest;
pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

use creature_sprite_core::color::Rgba;
use creature_sprite_core::parameters::MouthShape;
use creature_sprite_core::prng::DETAIL_SALT;
use creature_sprite_core::{
    apply_pattern, rasterize, synthesize_palette, synthesize_parameters, vary_color,
    ColorPalette, CreatureParameters, CreatureRecipe, PatternSpec, PixelBuffer, RenderConfig,
    ShapeKind, ShapeSpec, SpriteError, Xorshift64,
};
use glam::DVec2;
use serde::{Deserialize, Serialize};

pub use manifest::{Manifest, ManifestPart};

/// Smallest width or height a part is rasterized at.
const MIN_PART_PIXELS: f64 = 2.0;
/// Alpha above which a pixel counts as covered in diagnostics.
pub const COVERAGE_THRESHOLD: f64 = 0.1;

/// Body part a sprite depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartKind {
    Torso,
    Hump,
    ArmorPlate,
    Spine,
    Head,
    Eye,
    Mouth,
    Horn,
    FrontLeg,
    BackLeg,
    Claw,
    Tail,
}

impl PartKind {
    pub fn name(self) -> &'static str {
        match self {
            PartKind::Torso => "torso",
            PartKind::Hump => "hump",
            PartKind::ArmorPlate => "armor_plate",
            PartKind::Spine => "spine",
            PartKind::Head => "head",
            PartKind::Eye => "eye",
            PartKind::Mouth => "mouth",
            PartKind::Horn => "horn",
            PartKind::FrontLeg => "front_leg",
            PartKind::BackLeg => "back_leg",
            PartKind::Claw => "claw",
            PartKind::Tail => "tail",
        }
    }

    /// Whether a creature can have more than one of this part.
    pub fn is_repeated(self) -> bool {
        !matches!(
            self,
            PartKind::Torso | PartKind::Head | PartKind::Mouth | PartKind::Tail
        )
    }

    /// Optional surface detail, dropped when `RenderConfig::details` is off.
    pub fn is_detail(self) -> bool {
        matches!(
            self,
            PartKind::Hump
                | PartKind::ArmorPlate
                | PartKind::Spine
                | PartKind::Horn
                | PartKind::Claw
        )
    }
}

/// One rasterized body part.
#[derive(Debug, Clone, PartialEq)]
pub struct PartSprite {
    pub part: PartKind,
    /// Position among parts of the same kind, 0 for single parts.
    pub index: u32,
    /// Layering order; higher draws on top. The torso is 0.
    pub sort_order: i32,
    pub buffer: PixelBuffer,
}

impl PartSprite {
    /// File-friendly name: `torso`, `eye_2`, `front_leg_0`.
    pub fn file_stem(&self) -> String {
        if self.part.is_repeated() {
            format!("{}_{}", self.part.name(), self.index)
        } else {
            self.part.name().to_string()
        }
    }
}

/// Every sprite of one creature together with what produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatureSprites {
    recipe: CreatureRecipe,
    parameters: CreatureParameters,
    palette: ColorPalette,
    parts: Vec<PartSprite>,
}

impl CreatureSprites {
    /// Synthesizes parameters and palette for the recipe seed, then
    /// rasterizes every part in layering-independent generation order:
    /// torso, humps, armor plates, spines, head, eyes, mouth, horns, legs,
    /// claws, tail.
    ///
    /// Returns the first error any part produces.
    pub fn generate(recipe: &CreatureRecipe) -> Result<Self, SpriteError> {
        recipe.validate()?;
        let parameters = synthesize_parameters(recipe.seed);
        let palette = synthesize_palette(recipe.seed);

        let mut builder = PartBuilder {
            config: recipe.config,
            params: &parameters,
            palette: &palette,
            rng: Xorshift64::stream(recipe.seed, DETAIL_SALT),
            parts: Vec::new(),
        };
        builder.build()?;
        let parts = builder.parts;

        for sprite in &parts {
            log::debug!(
                "seed {}: {} {}x{} sort {} coverage {:.2}",
                recipe.seed,
                sprite.file_stem(),
                sprite.buffer.width(),
                sprite.buffer.height(),
                sprite.sort_order,
                sprite.buffer.coverage_ratio(COVERAGE_THRESHOLD),
            );
        }
        log::debug!(
            "seed {}: {} parts, {:?} palette",
            recipe.seed,
            parts.len(),
            palette.scheme
        );

        Ok(Self {
            recipe: *recipe,
            parameters,
            palette,
            parts,
        })
    }

    pub fn recipe(&self) -> &CreatureRecipe {
        &self.recipe
    }

    pub fn parameters(&self) -> &CreatureParameters {
        &self.parameters
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    /// Parts in generation order.
    pub fn parts(&self) -> &[PartSprite] {
        &self.parts
    }

    /// All sprites of one kind, in index order.
    pub fn parts_of(&self, part: PartKind) -> impl Iterator<Item = &PartSprite> + '_ {
        self.parts.iter().filter(move |s| s.part == part)
    }

    /// Parts sorted back to front.
    pub fn layered(&self) -> Vec<&PartSprite> {
        let mut layered: Vec<&PartSprite> = self.parts.iter().collect();
        layered.sort_by_key(|s| s.sort_order);
        layered
    }

    pub fn manifest(&self) -> Manifest {
        Manifest::from_sprites(self)
    }
}

/// Extent of a generated part in pixels, before rounding.
#[derive(Debug, Clone, Copy)]
struct Extent {
    width: f64,
    height: f64,
}

struct PartBuilder<'a> {
    config: RenderConfig,
    params: &'a CreatureParameters,
    palette: &'a ColorPalette,
    rng: Xorshift64,
    parts: Vec<PartSprite>,
}

impl PartBuilder<'_> {
    fn build(&mut self) -> Result<(), SpriteError> {
        let details = self.config.details;
        let torso = self.torso()?;
        if details {
            self.humps(torso)?;
            if self.params.has_armor_plates {
                self.armor_plates(torso)?;
            }
            if self.params.has_spines {
                self.spines(torso)?;
            }
        }
        let head = self.head()?;
        self.eyes(head)?;
        self.mouth(head)?;
        if details && self.params.has_horns {
            self.horns(head)?;
        }
        let legs = self.legs()?;
        if details && self.params.has_claws {
            self.claws(&legs)?;
        }
        self.tail()
    }

    /// Torso width before jitter: the resolution scaled by body size, so the
    /// largest creature's torso spans the full resolution.
    fn unit(&self) -> f64 {
        self.config.resolution as f64 * self.params.body_size * 0.5
    }

    fn jitter(&mut self, amount: f64) -> f64 {
        1.0 + (self.rng.next_f64() - 0.5) * amount
    }

    /// Varies `base` with channel variances scaled by the creature's color variation.
    fn tint(&mut self, base: Rgba, hue: f64, sat: f64, val: f64) -> Rgba {
        let k = self.params.color_variation;
        vary_color(base, hue * k, sat * k, val * k, &mut self.rng)
    }

    fn shape(
        &mut self,
        kind: ShapeKind,
        extent: Extent,
        color: Rgba,
        variation: f64,
    ) -> Result<PixelBuffer, SpriteError> {
        let spec = ShapeSpec::new(kind, pixels(extent.width), pixels(extent.height), color)
            .with_variation(variation.clamp(0.0, 1.0));
        rasterize(&spec, &mut self.rng)
    }

    fn push(&mut self, part: PartKind, index: u32, sort_order: i32, buffer: PixelBuffer, pivot: DVec2) {
        let buffer = buffer
            .with_pivot(pivot)
            .with_pixels_per_unit(self.config.pixels_per_unit);
        self.parts.push(PartSprite {
            part,
            index,
            sort_order,
            buffer,
        });
    }

    fn torso(&mut self) -> Result<Extent, SpriteError> {
        let pv = self.params.proportion_variation;
        let unit = self.unit();
        let extent = Extent {
            width: unit * self.jitter(pv),
            height: unit / self.params.body_aspect * self.jitter(pv),
        };
        let color = self.tint(self.palette.primary, 0.05, 0.1, 0.1);
        let kind = self.params.body_kind();
        let variation = match kind {
            ShapeKind::Blob => self.params.body_irregularity,
            _ => self.params.shape_variation,
        };
        let mut buffer = self.shape(kind, extent, color, variation)?;

        if self.config.patterns {
            if let Some(pattern) = self.params.pattern_kind() {
                let spec = PatternSpec::new(
                    pattern,
                    self.palette.pattern_or_accent(),
                    self.params.pattern_intensity,
                    self.params.pattern_scale,
                );
                buffer = apply_pattern(&buffer, &spec, &mut self.rng)?;
            }
        }
        self.push(PartKind::Torso, 0, 0, buffer, DVec2::splat(0.5));
        Ok(extent)
    }

    fn humps(&mut self, torso: Extent) -> Result<(), SpriteError> {
        let pv = self.params.proportion_variation;
        for i in 0..self.params.hump_count {
            let width = torso.width * 0.35 * self.jitter(pv);
            let extent = Extent {
                width,
                height: width * 0.6,
            };
            let color = self.tint(self.palette.primary, 0.03, 0.05, 0.05);
            let buffer = self.shape(ShapeKind::Ellipse, extent, color, self.params.shape_variation)?;
            self.push(PartKind::Hump, i, -1, buffer, DVec2::new(0.5, 1.0));
        }
        Ok(())
    }

    fn armor_plates(&mut self, torso: Extent) -> Result<(), SpriteError> {
        let pv = self.params.proportion_variation;
        for i in 0..self.params.plate_count {
            let width = torso.width * 0.18 * self.jitter(pv * 0.5);
            let extent = Extent {
                width,
                height: width * 0.75,
            };
            let color = self.tint(self.palette.secondary, 0.04, 0.08, 0.08);
            let kind = ShapeKind::RoundedRect { roundness: 0.25 };
            let buffer = self.shape(kind, extent, color, self.params.shape_variation * 0.5)?;
            self.push(PartKind::ArmorPlate, i, 2, buffer, DVec2::splat(0.5));
        }
        Ok(())
    }

    fn spines(&mut self, torso: Extent) -> Result<(), SpriteError> {
        let pv = self.params.proportion_variation;
        for i in 0..self.params.spine_count {
            let extent = Extent {
                width: torso.width * 0.07,
                height: torso.height * self.params.spine_length * self.jitter(pv),
            };
            let color = self.tint(self.palette.accent, 0.03, 0.08, 0.08);
            let buffer = self.shape(ShapeKind::Triangle, extent, color, 0.0)?;
            self.push(PartKind::Spine, i, -1, buffer, DVec2::new(0.5, 1.0));
        }
        Ok(())
    }

    fn head(&mut self) -> Result<Extent, SpriteError> {
        let width = self.unit() * self.params.head_size_ratio * self.jitter(self.params.proportion_variation);
        let extent = Extent {
            width,
            height: width * 1.1,
        };
        let color = self.tint(self.palette.primary, 0.08, 0.15, 0.1);
        let buffer = self.shape(
            self.params.head_kind(),
            extent,
            color,
            self.params.shape_variation,
        )?;
        self.push(PartKind::Head, 0, 1, buffer, DVec2::splat(0.5));
        Ok(extent)
    }

    fn eyes(&mut self, head: Extent) -> Result<(), SpriteError> {
        let pv = self.params.proportion_variation;
        let base = self.palette.accent.darken(0.25);
        for i in 0..self.params.eye_count {
            let width = head.width * self.params.eye_size * self.jitter(pv * 0.5);
            let extent = Extent {
                width,
                height: width * self.params.eye_shape.height_ratio(),
            };
            let color = self.tint(base, 0.02, 0.05, 0.05);
            let buffer = self.shape(self.params.eye_kind(), extent, color, 0.0)?;
            self.push(PartKind::Eye, i, 3, buffer, DVec2::splat(0.5));
        }
        Ok(())
    }

    fn mouth(&mut self, head: Extent) -> Result<(), SpriteError> {
        let width = head.width * self.params.mouth_width;
        let extent = Extent {
            width,
            height: width * mouth_height_ratio(self.params.mouth_shape),
        };
        let color = self.tint(self.palette.primary.darken(0.35), 0.02, 0.05, 0.05);
        let buffer = self.shape(self.params.mouth_kind(), extent, color, 0.0)?;
        self.push(PartKind::Mouth, 0, 3, buffer, DVec2::splat(0.5));
        Ok(())
    }

    fn horns(&mut self, head: Extent) -> Result<(), SpriteError> {
        let pv = self.params.proportion_variation;
        for i in 0..self.params.horn_count {
            let extent = Extent {
                width: head.width * 0.15 * self.jitter(pv * 0.5),
                height: head.height * self.params.horn_length * self.jitter(pv * 0.5),
            };
            let color = self.tint(self.palette.secondary, 0.04, 0.1, 0.15);
            let buffer = self.shape(
                ShapeKind::Triangle,
                extent,
                color,
                self.params.shape_variation * 0.5,
            )?;
            self.push(PartKind::Horn, i, 0, buffer, DVec2::new(0.5, 1.0));
        }
        Ok(())
    }

    /// Front and back leg per pair; returns `(width, sort_order)` per leg.
    fn legs(&mut self) -> Result<Vec<(f64, i32)>, SpriteError> {
        let pv = self.params.proportion_variation * 0.5;
        let unit = self.unit();
        let base_width = unit * 0.3 * self.params.leg_thickness;
        let base_height = unit * self.params.leg_length;
        let base_color = self.tint(self.palette.secondary, 0.05, 0.1, 0.1);
        let kind = self.params.leg_kind();

        let mut legs = Vec::new();
        for pair in 0..self.params.leg_pair_count {
            for (part, sort_order) in [(PartKind::FrontLeg, 1), (PartKind::BackLeg, -1)] {
                let extent = Extent {
                    width: base_width * self.jitter(pv),
                    height: base_height * self.jitter(pv),
                };
                let color = self.tint(base_color, 0.05, 0.1, 0.1);
                let buffer = self.shape(kind, extent, color, self.params.shape_variation * 0.5)?;
                self.push(part, pair, sort_order, buffer, DVec2::new(0.5, 0.0));
                legs.push((extent.width, sort_order));
            }
        }
        Ok(legs)
    }

    fn claws(&mut self, legs: &[(f64, i32)]) -> Result<(), SpriteError> {
        let base = self.palette.accent.darken(0.5);
        for (i, &(leg_width, leg_sort)) in legs.iter().enumerate() {
            let extent = Extent {
                width: leg_width * 0.9,
                height: leg_width * 0.45,
            };
            let color = self.tint(base, 0.02, 0.05, 0.05);
            let buffer = self.shape(ShapeKind::Triangle, extent, color, 0.0)?;
            self.push(PartKind::Claw, i as u32, leg_sort + 1, buffer, DVec2::new(0.5, 0.0));
        }
        Ok(())
    }

    fn tail(&mut self) -> Result<(), SpriteError> {
        let pv = self.params.proportion_variation;
        let unit = self.unit();
        let extent = Extent {
            width: unit * 0.8 * self.params.tail_length * self.jitter(pv),
            height: unit * 0.3 * self.params.tail_thickness * self.jitter(pv),
        };
        let color = self.tint(self.palette.accent, 0.1, 0.15, 0.15);
        let buffer = self.shape(
            self.params.tail_kind(),
            extent,
            color,
            self.params.shape_variation,
        )?;
        self.push(PartKind::Tail, 0, -2, buffer, DVec2::new(1.0, 0.5));
        Ok(())
    }
}

fn mouth_height_ratio(shape: MouthShape) -> f64 {
    match shape {
        MouthShape::Line => 0.15,
        MouthShape::Beak => 0.6,
        MouthShape::Fanged => 0.45,
    }
}

fn pixels(extent: f64) -> usize {
    extent.round().max(MIN_PART_PIXELS) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use creature_sprite_core::PatternKind;

    fn recipe(seed: u64) -> CreatureRecipe {
        CreatureRecipe::new(seed).with_config(RenderConfig::default().with_resolution(48))
    }

    fn generate(seed: u64) -> CreatureSprites {
        CreatureSprites::generate(&recipe(seed)).unwrap()
    }

    #[test]
    fn same_recipe_gives_identical_sprites() {
        assert_eq!(generate(42), generate(42));
    }

    #[test]
    fn different_seeds_give_different_torsos() {
        let a = generate(1);
        let b = generate(2);
        let torso_a = &a.parts_of(PartKind::Torso).next().unwrap().buffer;
        let torso_b = &b.parts_of(PartKind::Torso).next().unwrap().buffer;
        assert_ne!(torso_a, torso_b);
    }

    #[test]
    fn every_creature_has_the_core_parts() {
        for seed in 0..20 {
            let sprites = generate(seed);
            let params = sprites.parameters().clone();
            assert_eq!(sprites.parts_of(PartKind::Torso).count(), 1);
            assert_eq!(sprites.parts_of(PartKind::Head).count(), 1);
            assert_eq!(sprites.parts_of(PartKind::Mouth).count(), 1);
            assert_eq!(sprites.parts_of(PartKind::Tail).count(), 1);
            assert_eq!(
                sprites.parts_of(PartKind::Eye).count(),
                params.eye_count as usize
            );
            assert_eq!(
                sprites.parts_of(PartKind::FrontLeg).count(),
                params.leg_pair_count as usize
            );
            assert_eq!(
                sprites.parts_of(PartKind::BackLeg).count(),
                params.leg_pair_count as usize
            );
        }
    }

    #[test]
    fn gated_details_follow_parameters() {
        for seed in 0..20 {
            let sprites = generate(seed);
            let params = sprites.parameters();
            let spines = sprites.parts_of(PartKind::Spine).count();
            let plates = sprites.parts_of(PartKind::ArmorPlate).count();
            let horns = sprites.parts_of(PartKind::Horn).count();
            let claws = sprites.parts_of(PartKind::Claw).count();
            assert_eq!(spines, if params.has_spines { params.spine_count as usize } else { 0 });
            assert_eq!(plates, if params.has_armor_plates { params.plate_count as usize } else { 0 });
            assert_eq!(horns, if params.has_horns { params.horn_count as usize } else { 0 });
            let legs = 2 * params.leg_pair_count as usize;
            assert_eq!(claws, if params.has_claws { legs } else { 0 });
            assert_eq!(sprites.parts_of(PartKind::Hump).count(), params.hump_count as usize);
        }
    }

    #[test]
    fn disabling_details_drops_every_detail_part() {
        for seed in 0..20 {
            let config = RenderConfig::default().with_resolution(48).with_details(false);
            let sprites =
                CreatureSprites::generate(&CreatureRecipe::new(seed).with_config(config)).unwrap();
            assert!(sprites.parts().iter().all(|s| !s.part.is_detail()));
        }
    }

    #[test]
    fn parts_start_with_torso_and_end_with_tail() {
        let sprites = generate(7);
        assert_eq!(sprites.parts().first().unwrap().part, PartKind::Torso);
        assert_eq!(sprites.parts().last().unwrap().part, PartKind::Tail);
    }

    #[test]
    fn layering_puts_tail_behind_and_face_in_front() {
        let sprites = generate(3);
        let layered = sprites.layered();
        assert_eq!(layered.first().unwrap().part, PartKind::Tail);
        assert!(matches!(
            layered.last().unwrap().part,
            PartKind::Eye | PartKind::Mouth
        ));
    }

    #[test]
    fn every_part_carries_config_metadata() {
        let sprites = generate(11);
        for sprite in sprites.parts() {
            assert!(sprite.buffer.width() >= 2 && sprite.buffer.height() >= 2);
            assert_eq!(sprite.buffer.pixels_per_unit(), 100.0);
            let pivot = sprite.buffer.pivot();
            assert!((0.0..=1.0).contains(&pivot.x) && (0.0..=1.0).contains(&pivot.y));
        }
        let torso = sprites.parts_of(PartKind::Torso).next().unwrap();
        assert!(torso.buffer.coverage(COVERAGE_THRESHOLD) > 0);
    }

    #[test]
    fn torso_fits_the_resolution() {
        for seed in 0..20 {
            let sprites = generate(seed);
            let torso = &sprites.parts_of(PartKind::Torso).next().unwrap().buffer;
            // body_size < 2 and jitter < 1.1
            assert!(torso.width() as f64 <= 48.0 * 1.1 + 1.0, "seed {seed}");
        }
    }

    #[test]
    fn pattern_toggle_only_changes_the_torso_overlay() {
        let seed = (0..1000)
            .find(|&s| synthesize_parameters(s).pattern_kind() == Some(PatternKind::Gradient))
            .expect("some seed picks the gradient pattern");
        let on = CreatureSprites::generate(&CreatureRecipe::new(seed)).unwrap();
        let off = CreatureSprites::generate(
            &CreatureRecipe::new(seed).with_config(RenderConfig::default().with_patterns(false)),
        )
        .unwrap();
        let torso_on = &on.parts()[0].buffer;
        let torso_off = &off.parts()[0].buffer;
        assert_eq!(torso_on.width(), torso_off.width());
        assert_ne!(torso_on, torso_off);
        for (a, b) in torso_on.pixels().iter().zip(torso_off.pixels()) {
            assert_eq!(a.a, b.a);
        }
    }

    #[test]
    fn invalid_recipe_is_rejected() {
        let bad = CreatureRecipe::new(1).with_config(RenderConfig::default().with_resolution(4));
        assert!(matches!(
            CreatureSprites::generate(&bad),
            Err(SpriteError::InvalidRange { .. })
        ));
    }

    #[test]
    fn file_stems_are_unique() {
        let sprites = generate(5);
        let mut stems: Vec<String> = sprites.parts().iter().map(PartSprite::file_stem).collect();
        let total = stems.len();
        stems.sort();
        stems.dedup();
        assert_eq!(stems.len(), total);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(16))]

            #[test]
            fn any_seed_generates_bounded_sprites(seed: u64) {
                let sprites = CreatureSprites::generate(
                    &CreatureRecipe::new(seed).with_config(RenderConfig::default().with_resolution(32)),
                ).unwrap();
                prop_assert!(!sprites.parts().is_empty());
                for sprite in sprites.parts() {
                    for c in sprite.buffer.pixels() {
                        prop_assert!((0.0..=1.0).contains(&c.a));
                    }
                }
            }
        }
    }
}
