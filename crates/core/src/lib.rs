#![deny(unsafe_code)]
//! Core of the procedural creature sprite generator.
//!
//! Turns a `u64` seed into a bounded [`CreatureParameters`] record and a
//! [`ColorPalette`], rasterizes anti-aliased shape primitives into
//! [`PixelBuffer`]s, composites pattern overlays and jitters colors. All
//! randomness flows through explicit [`Xorshift64`] streams; nothing here
//! keeps global state or logs.

pub mod buffer;
pub mod color;
pub mod config;
pub mod error;
pub mod noise;
pub mod palette;
pub mod parameters;
pub mod pattern;
pub mod prng;
pub mod recipe;
pub mod shape;
pub mod variation;

pub use buffer::PixelBuffer;
pub use color::{Hsv, Rgba};
pub use config::RenderConfig;
pub use error::SpriteError;
pub use palette::{synthesize_palette, ColorPalette, ColorScheme};
pub use parameters::{synthesize_parameters, CreatureParameters};
pub use pattern::{apply_pattern, PatternKind, PatternSpec};
pub use prng::Xorshift64;
pub use recipe::CreatureRecipe;
pub use shape::{rasterize, ShapeKind, ShapeSpec};
pub use variation::vary_color;
