//! Reproducible description of one creature.
//!
//! A [`CreatureRecipe`] is everything needed to regenerate a sprite set: the
//! seed drives parameters, palette and detail streams, the config fixes how
//! they are rendered. Two equal recipes produce bit-identical sprites.

use serde::{Deserialize, Serialize};

use crate::config::RenderConfig;
use crate::error::SpriteError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreatureRecipe {
    pub seed: u64,
    #[serde(default)]
    pub config: RenderConfig,
}

impl CreatureRecipe {
    /// Recipe with the default render config.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            config: RenderConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn validate(&self) -> Result<(), SpriteError> {
        self.config.validate()
    }
}
