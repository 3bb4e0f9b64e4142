//! Per-instance color jitter in HSV space.

use crate::color::{hsv_to_rgb, rgb_to_hsv, Rgba};
use crate::prng::Xorshift64;

/// Scales every channel offset. A variance of `v` therefore moves a channel by
/// at most `v * VARIANCE_DAMPING / 2` in either direction.
pub const VARIANCE_DAMPING: f64 = 0.5;

/// Jitters `base` in HSV space using the caller's stream.
///
/// Draws exactly three values, in the order hue, saturation, value. Each
/// offset is `(draw - 0.5) * variance * VARIANCE_DAMPING`. Saturation and
/// value are clamped to [0, 1], hue wraps modulo 1 and alpha is preserved.
pub fn vary_color(
    base: Rgba,
    hue_var: f64,
    sat_var: f64,
    val_var: f64,
    rng: &mut Xorshift64,
) -> Rgba {
    let mut hsv = rgb_to_hsv(base);
    hsv.h = (hsv.h + jitter(rng, hue_var)).rem_euclid(1.0);
    hsv.s = (hsv.s + jitter(rng, sat_var)).clamp(0.0, 1.0);
    hsv.v = (hsv.v + jitter(rng, val_var)).clamp(0.0, 1.0);
    hsv_to_rgb(hsv, base.a)
}

fn jitter(rng: &mut Xorshift64, variance: f64) -> f64 {
    (rng.next_f64() - 0.5) * variance * VARIANCE_DAMPING
}
