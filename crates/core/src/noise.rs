//! Coherent 2D noise remapped to the unit interval.
//!
//! Shape and pattern generators perturb silhouettes and fields with smooth
//! noise. The permutation table is fixed; per-creature variety comes from the
//! input offsets each generator draws from its stream.

use ::noise::{NoiseFn, Perlin};

use crate::prng::Xorshift64;

/// Permutation seed shared by every generator.
const PERMUTATION_SEED: u32 = 0x00C0_FFEE;

/// Upper bound (exclusive) of the offsets drawn by [`NoiseOffset::draw`].
pub const OFFSET_SPAN: f64 = 1000.0;

/// Smooth pseudo-random function of a 2D point with values in [0, 1].
#[derive(Clone)]
pub struct CoherentNoise {
    perlin: Perlin,
}

impl CoherentNoise {
    pub fn new() -> Self {
        Self {
            perlin: Perlin::new(PERMUTATION_SEED),
        }
    }

    /// Samples the field at `(x, y)`.
    ///
    /// Perlin output in [-1, 1] is mapped to [0, 1] and clamped, so lattice
    /// points sample exactly 0.5.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        (self.perlin.get([x, y]) * 0.5 + 0.5).clamp(0.0, 1.0)
    }
}

impl Default for CoherentNoise {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CoherentNoise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoherentNoise")
            .field("seed", &PERMUTATION_SEED)
            .finish()
    }
}

/// Pair of input offsets into the noise domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseOffset {
    pub x: f64,
    pub y: f64,
}

impl NoiseOffset {
    /// Draws an offset pair from `rng`: exactly two draws, x first.
    pub fn draw(rng: &mut Xorshift64) -> Self {
        let x = rng.next_range(0.0, OFFSET_SPAN);
        let y = rng.next_range(0.0, OFFSET_SPAN);
        Self { x, y }
    }
}
