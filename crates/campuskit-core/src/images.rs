//! Bounded downsampling for uploaded pictures.
//!
//! Profile pictures are capped at 300px on their larger dimension. The
//! service stores the original upload first and then shrinks it in place;
//! callers decide what to do when decoding fails (a corrupt upload must not
//! fail the save).

use std::io::Cursor;

use image::{ImageError, ImageFormat, ImageReader};

/// Maximum width/height for a stored profile picture, in pixels.
pub const MAX_PICTURE_DIM: u32 = 300;

/// Downsample `bytes` so that neither dimension exceeds `max_dim`,
/// preserving aspect ratio and the source encoding.
///
/// Returns `Ok(None)` when the image already fits. Decode and re-encode
/// failures are returned to the caller unchanged.
pub fn shrink_to_bounds(bytes: &[u8], max_dim: u32) -> Result<Option<Vec<u8>>, ImageError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let format = reader.format().unwrap_or(ImageFormat::Png);
    let img = reader.decode()?;

    if img.width() <= max_dim && img.height() <= max_dim {
        return Ok(None);
    }

    let resized = img.thumbnail(max_dim, max_dim);

    let mut out = Vec::new();
    resized.write_to(&mut Cursor::new(&mut out), format)?;
    Ok(Some(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::new_rgb8(width, height);
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn oversized_picture_is_bounded_with_aspect_preserved() {
        let original = png_bytes(600, 400);
        let shrunk = shrink_to_bounds(&original, MAX_PICTURE_DIM)
            .unwrap()
            .expect("600x400 should be resized");

        let img = image::load_from_memory(&shrunk).unwrap();
        assert_eq!(img.width(), 300);
        assert_eq!(img.height(), 200);
    }

    #[test]
    fn tall_picture_is_bounded_on_height() {
        let original = png_bytes(150, 900);
        let shrunk = shrink_to_bounds(&original, MAX_PICTURE_DIM)
            .unwrap()
            .expect("150x900 should be resized");

        let img = image::load_from_memory(&shrunk).unwrap();
        assert_eq!(img.height(), 300);
        assert_eq!(img.width(), 50);
    }

    #[test]
    fn small_picture_is_left_alone() {
        let original = png_bytes(120, 80);
        assert!(shrink_to_bounds(&original, MAX_PICTURE_DIM).unwrap().is_none());
    }

    #[test]
    fn exact_bound_is_not_resized() {
        let original = png_bytes(300, 300);
        assert!(shrink_to_bounds(&original, MAX_PICTURE_DIM).unwrap().is_none());
    }

    #[test]
    fn corrupt_bytes_error_out() {
        assert!(shrink_to_bounds(b"not an image", MAX_PICTURE_DIM).is_err());
    }

    #[test]
    fn format_is_preserved() {
        let img = DynamicImage::new_rgb8(500, 500);
        let mut jpeg = Vec::new();
        img.write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .unwrap();

        let shrunk = shrink_to_bounds(&jpeg, MAX_PICTURE_DIM).unwrap().unwrap();
        assert_eq!(image::guess_format(&shrunk).unwrap(), ImageFormat::Jpeg);
    }
}
