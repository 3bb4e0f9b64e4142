//! Serializable summary of a generated creature.
//!
//! The manifest records the recipe, the synthesized parameters and palette,
//! and per-part layering metadata. It is what a placement layer reads next to
//! the exported PNGs.

use creature_sprite_core::{ColorPalette, CreatureParameters, RenderConfig};
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::{CreatureSprites, PartKind, COVERAGE_THRESHOLD};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub seed: u64,
    pub config: RenderConfig,
    pub parameters: CreatureParameters,
    pub palette: ColorPalette,
    /// Parts in generation order.
    pub parts: Vec<ManifestPart>,
}

/// Layering metadata of one exported sprite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestPart {
    /// File stem of the exported PNG.
    pub name: String,
    pub part: PartKind,
    pub index: u32,
    pub sort_order: i32,
    pub width: usize,
    pub height: usize,
    /// Normalized anchor, measured from the top-left corner.
    pub pivot: DVec2,
    pub pixels_per_unit: f64,
    /// Pixels with alpha above the coverage threshold.
    pub coverage: usize,
}

impl Manifest {
    pub fn from_sprites(sprites: &CreatureSprites) -> Self {
        let parts = sprites
            .parts()
            .iter()
            .map(|sprite| ManifestPart {
                name: sprite.file_stem(),
                part: sprite.part,
                index: sprite.index,
                sort_order: sprite.sort_order,
                width: sprite.buffer.width(),
                height: sprite.buffer.height(),
                pivot: sprite.buffer.pivot(),
                pixels_per_unit: sprite.buffer.pixels_per_unit(),
                coverage: sprite.buffer.coverage(COVERAGE_THRESHOLD),
            })
            .collect();
        Self {
            seed: sprites.recipe().seed,
            config: sprites.recipe().config,
            parameters: sprites.parameters().clone(),
            palette: sprites.palette().clone(),
            parts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use creature_sprite_core::CreatureRecipe;

    fn sprites() -> CreatureSprites {
        let recipe =
            CreatureRecipe::new(42).with_config(RenderConfig::default().with_resolution(32));
        CreatureSprites::generate(&recipe).unwrap()
    }

    #[test]
    fn manifest_lists_every_part() {
        let sprites = sprites();
        let manifest = sprites.manifest();
        assert_eq!(manifest.seed, 42);
        assert_eq!(manifest.parts.len(), sprites.parts().len());
        assert_eq!(manifest.parts[0].name, "torso");
        assert_eq!(manifest.parts[0].sort_order, 0);
        assert_eq!(manifest.parameters, *sprites.parameters());
    }

    #[test]
    fn manifest_json_uses_snake_case_parts_and_hex_colors() {
        let json = serde_json::to_value(sprites().manifest()).unwrap();
        assert_eq!(json["parts"][0]["part"], "torso");
        assert_eq!(json["parts"][0]["pivot"], serde_json::json!([0.5, 0.5]));
        let primary = json["palette"]["primary"].as_str().unwrap();
        assert!(primary.starts_with('#') && primary.len() == 9, "{primary}");
        assert_eq!(json["config"]["resolution"], 32);
    }

    #[test]
    fn manifest_round_trips_through_json() {
        let manifest = sprites().manifest();
        let text = serde_json::to_string(&manifest).unwrap();
        let back: Manifest = serde_json::from_str(&text).unwrap();
        assert_eq!(back.seed, manifest.seed);
        assert_eq!(back.parts, manifest.parts);
        assert_eq!(back.parameters.body_shape, manifest.parameters.body_shape);
    }
}
