// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image decoding for canvas placement.
//!
//! Decoding converts arbitrary image bytes to RGBA8 suitable for both the
//! egui texture upload and the export compositor. A failed decode reports
//! [`EditorError::ImageDecodeFailed`] and nothing is placed.

use std::path::Path;

use crate::error::EditorError;

/// Largest width a freshly placed image is displayed at.
pub const FIT_WIDTH: f32 = 400.0;
/// Largest height a freshly placed image is displayed at.
pub const FIT_HEIGHT: f32 = 300.0;

/// Decoded RGBA pixels ready for placement.
#[derive(Debug)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decode image bytes (any format the `image` crate understands) to RGBA8.
pub fn decode_bytes(bytes: &[u8]) -> Result<DecodedImage, EditorError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| EditorError::ImageDecodeFailed(e.to_string()))?;
    let rgba = decoded.to_rgba8();
    Ok(DecodedImage {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}

/// Load and decode an image file.
pub fn decode_file(path: &Path) -> Result<DecodedImage, EditorError> {
    let bytes =
        std::fs::read(path).map_err(|e| EditorError::ImageDecodeFailed(e.to_string()))?;
    decode_bytes(&bytes)
}

/// Display size for a decoded image: fitted into 400x300, preserving the
/// aspect ratio.
pub fn fitted_size(width: u32, height: u32) -> (f32, f32) {
    let aspect = width as f32 / height as f32;
    let mut w = FIT_WIDTH;
    let mut h = FIT_WIDTH / aspect;
    if h > FIT_HEIGHT {
        h = FIT_HEIGHT;
        w = FIT_HEIGHT * aspect;
    }
    (w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fitted_size_wide_image() {
        let (w, h) = fitted_size(800, 400);
        assert_eq!(w, 400.0);
        assert_eq!(h, 200.0);
    }

    #[test]
    fn test_fitted_size_tall_image() {
        let (w, h) = fitted_size(400, 800);
        assert_eq!(h, 300.0);
        assert_eq!(w, 150.0);
    }

    #[test]
    fn test_fitted_size_square_image() {
        let (w, h) = fitted_size(1000, 1000);
        assert_eq!(w, 300.0);
        assert_eq!(h, 300.0);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_bytes(&[0, 1, 2, 3]).unwrap_err();
        assert!(matches!(err, EditorError::ImageDecodeFailed(_)));
    }

    #[test]
    fn test_decode_round_trips_png() {
        let mut png = Vec::new();
        let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let decoded = decode_bytes(&png).unwrap();
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(&decoded.rgba[0..4], &[10, 20, 30, 255]);
    }
}
