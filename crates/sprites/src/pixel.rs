//! RGBA8 conversion of pixel buffers.
//!
//! Always available (no feature gate) so callers without the `png` feature
//! can still hand sprites to their own encoders or texture uploads.

use creature_sprite_core::color::quantize;
use creature_sprite_core::PixelBuffer;

/// Quantizes every channel to a byte, row-major, straight (unpremultiplied)
/// alpha. The result has `width * height * 4` bytes.
pub fn buffer_to_rgba8(buffer: &PixelBuffer) -> Vec<u8> {
    buffer
        .pixels()
        .iter()
        .flat_map(|c| [quantize(c.r), quantize(c.g), quantize(c.b), quantize(c.a)])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use creature_sprite_core::Rgba;

    #[test]
    fn buffer_to_rgba8_correct_length() {
        let buffer = PixelBuffer::new(8, 4).unwrap();
        assert_eq!(buffer_to_rgba8(&buffer).len(), 8 * 4 * 4);
    }

    #[test]
    fn transparent_buffer_is_all_zero() {
        let buffer = PixelBuffer::new(3, 3).unwrap();
        assert!(buffer_to_rgba8(&buffer).iter().all(|&b| b == 0));
    }

    #[test]
    fn channels_map_to_byte_extremes() {
        let mut buffer = PixelBuffer::new(2, 1).unwrap();
        buffer.set(1, 0, Rgba::new(1.0, 0.0, 1.0, 1.0));
        let bytes = buffer_to_rgba8(&buffer);
        assert_eq!(&bytes[4..8], &[255, 0, 255, 255]);
    }

    #[test]
    fn half_alpha_rounds_to_middle_byte() {
        let buffer =
            PixelBuffer::from_pixels(1, 1, vec![Rgba::new(0.5, 0.5, 0.5, 0.5)]).unwrap();
        let bytes = buffer_to_rgba8(&buffer);
        assert!(bytes.iter().all(|&b| b == 127 || b == 128), "{bytes:?}");
    }
}
