//! Deterministic pseudorandom streams based on Xorshift64.
//!
//! Every random draw in the generator goes through an explicit [`Xorshift64`]
//! owned by the caller. Independent streams for the same creature seed are
//! derived with [`Xorshift64::stream`], so drawing from one stream can never
//! shift the values produced by another.

use serde::{Deserialize, Serialize};

/// Salt for the stream that drives [`crate::parameters::synthesize_parameters`].
pub const PARAMETER_SALT: u64 = 0x5041_5241_4D53_0001;
/// Salt for the stream that drives [`crate::palette::synthesize_palette`].
pub const PALETTE_SALT: u64 = 0x5041_4C45_5454_0002;
/// Salt for the stream that drives per-part rasterization and color jitter.
pub const DETAIL_SALT: u64 = 0x4445_5441_494C_0003;

/// Xorshift64 deterministic PRNG. Same seed always produces the same sequence.
///
/// Uses the shift triple (13, 7, 17). A seed of 0 is replaced with a non-zero
/// fallback to avoid the all-zeros fixed point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a new stream with the given raw state.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Derives an independent stream for `seed` keyed by `salt`.
    ///
    /// The seed and salt are mixed with SplitMix64 so nearby seeds (42, 43)
    /// start from unrelated states.
    pub fn stream(seed: u64, salt: u64) -> Self {
        Self::new(splitmix64(seed ^ salt))
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Returns a uniformly distributed f64 in [0, 1).
    ///
    /// Uses the upper 53 bits of `next_u64()` for full mantissa precision.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Returns a uniformly distributed f64 in [min, max).
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Returns a uniformly distributed integer in the inclusive range `[lo, hi]`.
    ///
    /// Consumes exactly one draw. Bounds given in the wrong order are swapped.
    pub fn next_int_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let span = (hi - lo) as u64 + 1;
        lo + (self.next_u64() % span) as u32
    }

    /// Draws a uniform value and reports whether it exceeds `threshold`.
    pub fn chance_above(&mut self, threshold: f64) -> bool {
        self.next_f64() > threshold
    }
}

/// SplitMix64 finalizer, used only to spread seeds before they enter a stream.
fn splitmix64(value: u64) -> u64 {
    let mut z = value.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_u64_produces_known_golden_value_for_seed_42() {
        // Golden value for xorshift64(seed=42, shifts=13,7,17). Every stored
        // creature seed depends on this sequence.
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn seed_zero_does_not_produce_all_zeros() {
        let mut rng = Xorshift64::new(0);
        assert_ne!(rng.next_u64(), 0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn same_seed_and_salt_produce_identical_streams() {
        let mut a = Xorshift64::stream(42, PARAMETER_SALT);
        let mut b = Xorshift64::stream(42, PARAMETER_SALT);
        for i in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64(), "streams diverged at index {i}");
        }
    }

    #[test]
    fn different_salts_produce_different_streams() {
        let mut params = Xorshift64::stream(42, PARAMETER_SALT);
        let mut palette = Xorshift64::stream(42, PALETTE_SALT);
        let mut detail = Xorshift64::stream(42, DETAIL_SALT);
        let p: Vec<u64> = (0..8).map(|_| params.next_u64()).collect();
        let c: Vec<u64> = (0..8).map(|_| palette.next_u64()).collect();
        let d: Vec<u64> = (0..8).map(|_| detail.next_u64()).collect();
        assert_ne!(p, c);
        assert_ne!(p, d);
        assert_ne!(c, d);
    }

    #[test]
    fn drawing_from_one_stream_leaves_another_untouched() {
        let mut palette = Xorshift64::stream(7, PALETTE_SALT);
        let expected: Vec<u64> = (0..4).map(|_| palette.next_u64()).collect();

        let mut params = Xorshift64::stream(7, PARAMETER_SALT);
        for _ in 0..100 {
            params.next_f64();
        }
        let mut palette = Xorshift64::stream(7, PALETTE_SALT);
        let got: Vec<u64> = (0..4).map(|_| palette.next_u64()).collect();
        assert_eq!(expected, got);
    }

    #[test]
    fn seed_zero_stream_is_usable() {
        let mut rng = Xorshift64::stream(0, 0);
        let v = rng.next_f64();
        assert!((0.0..1.0).contains(&v));
    }

    #[test]
    fn next_int_inclusive_hits_both_bounds() {
        let mut rng = Xorshift64::new(99);
        let draws: Vec<u32> = (0..2000).map(|_| rng.next_int_inclusive(2, 6)).collect();
        assert!(draws.iter().all(|v| (2..=6).contains(v)));
        assert!(draws.contains(&2), "lower bound never drawn");
        assert!(draws.contains(&6), "upper bound never drawn");
    }

    #[test]
    fn next_int_inclusive_single_value_range() {
        let mut rng = Xorshift64::new(5);
        for _ in 0..10 {
            assert_eq!(rng.next_int_inclusive(3, 3), 3);
        }
    }

    #[test]
    fn chance_above_consumes_one_draw() {
        let mut a = Xorshift64::new(1234);
        let mut b = Xorshift64::new(1234);
        let gate = a.chance_above(0.75);
        let v = b.next_f64();
        assert_eq!(gate, v > 0.75);
        assert_eq!(a, b);
    }

    #[test]
    fn serialization_roundtrip_preserves_state() {
        let mut rng = Xorshift64::stream(42, DETAIL_SALT);
        for _ in 0..50 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: Xorshift64 = serde_json::from_str(&json).unwrap();
        for i in 0..100 {
            assert_eq!(
                rng.next_u64(),
                restored.next_u64(),
                "sequences diverged after deserialization at index {i}"
            );
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_f64_in_unit_interval_for_any_stream(seed: u64, salt: u64) {
                let mut rng = Xorshift64::stream(seed, salt);
                for _ in 0..100 {
                    let v = rng.next_f64();
                    prop_assert!((0.0..1.0).contains(&v), "next_f64() = {v}");
                }
            }

            #[test]
            fn next_range_in_bounds(
                seed: u64,
                min in -1e6_f64..1e6,
                max in -1e6_f64..1e6,
            ) {
                prop_assume!(min < max);
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_range(min, max);
                    prop_assert!(v >= min && v < max, "next_range({min}, {max}) = {v}");
                }
            }

            #[test]
            fn next_int_inclusive_in_bounds(seed: u64, lo in 0_u32..100, span in 0_u32..100) {
                let hi = lo + span;
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_int_inclusive(lo, hi);
                    prop_assert!(v >= lo && v <= hi, "next_int_inclusive({lo}, {hi}) = {v}");
                }
            }
        }
    }
}
