//! PNG export of sprites and creatures.
//!
//! Feature-gated behind `png` (default on) so the pipeline can be used
//! without pulling in the `image` crate. The byte conversion lives in
//! [`crate::pixel`].

use std::fs;
use std::path::{Path, PathBuf};

use creature_sprite_core::{PixelBuffer, SpriteError};

use crate::pixel::buffer_to_rgba8;
use crate::CreatureSprites;

/// File name of the manifest written by [`write_creature`].
pub const MANIFEST_FILE: &str = "manifest.json";

/// Writes a buffer as an RGBA PNG.
///
/// Returns `SpriteError::InvalidDimension` if the dimensions overflow `u32`,
/// or `SpriteError::Io` on write failure.
pub fn write_png(buffer: &PixelBuffer, path: &Path) -> Result<(), SpriteError> {
    let invalid = || SpriteError::InvalidDimension {
        width: buffer.width(),
        height: buffer.height(),
    };
    let w = u32::try_from(buffer.width()).map_err(|_| invalid())?;
    let h = u32::try_from(buffer.height()).map_err(|_| invalid())?;
    let img = image::RgbaImage::from_raw(w, h, buffer_to_rgba8(buffer))
        .ok_or_else(|| SpriteError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| SpriteError::Io(e.to_string()))
}

/// Writes one PNG per part plus `manifest.json` into `dir`, creating it if
/// needed. Returns the written paths, manifest last.
pub fn write_creature(sprites: &CreatureSprites, dir: &Path) -> Result<Vec<PathBuf>, SpriteError> {
    fs::create_dir_all(dir).map_err(|e| SpriteError::Io(format!("{}: {e}", dir.display())))?;

    let mut written = Vec::with_capacity(sprites.parts().len() + 1);
    for sprite in sprites.parts() {
        let path = dir.join(format!("{}.png", sprite.file_stem()));
        write_png(&sprite.buffer, &path)?;
        written.push(path);
    }

    let manifest = serde_json::to_string_pretty(&sprites.manifest())
        .map_err(|e| SpriteError::Io(e.to_string()))?;
    let path = dir.join(MANIFEST_FILE);
    fs::write(&path, manifest).map_err(|e| SpriteError::Io(format!("{}: {e}", path.display())))?;
    written.push(path);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use creature_sprite_core::{CreatureRecipe, RenderConfig, Rgba};

    use crate::Manifest;

    #[test]
    fn write_png_round_trip() {
        let mut buffer = PixelBuffer::new(16, 8).unwrap();
        buffer.set(3, 2, Rgba::new(1.0, 0.0, 0.0, 0.5));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("part.png");

        write_png(&buffer, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 16);
        assert_eq!(img.height(), 8);
        let px = img.get_pixel(3, 2).0;
        assert_eq!(px[0], 255);
        assert!(px[3] == 127 || px[3] == 128);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn write_png_into_missing_directory_is_io_error() {
        let buffer = PixelBuffer::new(2, 2).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/part.png");
        assert!(matches!(
            write_png(&buffer, &path),
            Err(SpriteError::Io(_))
        ));
    }

    #[test]
    fn write_creature_exports_parts_and_manifest() {
        let recipe =
            CreatureRecipe::new(9).with_config(RenderConfig::default().with_resolution(32));
        let sprites = CreatureSprites::generate(&recipe).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("creature");

        let written = write_creature(&sprites, &out).unwrap();

        assert_eq!(written.len(), sprites.parts().len() + 1);
        assert!(out.join("torso.png").exists());
        assert!(out.join("tail.png").exists());
        assert!(out.join("eye_0.png").exists());

        let text = fs::read_to_string(out.join(MANIFEST_FILE)).unwrap();
        let manifest: Manifest = serde_json::from_str(&text).unwrap();
        assert_eq!(manifest.seed, 9);
        assert_eq!(manifest.parts.len(), sprites.parts().len());

        let torso = image::open(out.join("torso.png")).unwrap();
        assert_eq!(torso.width() as usize, manifest.parts[0].width);
    }
}
