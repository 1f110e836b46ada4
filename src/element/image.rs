use std::io::Cursor;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use egui::{Pos2, Rect, Vec2};
use image::{ImageFormat, RgbaImage};
use log::info;

use super::Geometry;
use crate::error::BitmapError;
use crate::id_generator::next_bitmap_id;

/// Decoded RGBA pixels shared between the model, the renderer and the serializer.
///
/// Cloning is cheap; equality is identity, two decodes of the same file are distinct
/// bitmaps.
#[derive(Clone)]
pub struct Bitmap {
    id: u64,
    pixels: Arc<RgbaImage>,
}

// Custom Debug implementation to keep pixel data out of logs
impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("id", &self.id)
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .finish()
    }
}

impl PartialEq for Bitmap {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Bitmap {
    pub fn from_rgba(pixels: RgbaImage) -> Result<Self, BitmapError> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(BitmapError::InvalidDimensions {
                width: pixels.width(),
                height: pixels.height(),
            });
        }
        Ok(Self {
            id: next_bitmap_id(),
            pixels: Arc::new(pixels),
        })
    }

    /// Decode any supported encoded image (PNG, JPEG, ...)
    pub fn decode(bytes: &[u8]) -> Result<Self, BitmapError> {
        let decoded = image::load_from_memory(bytes).map_err(BitmapError::Decode)?;
        let bitmap = Self::from_rgba(decoded.to_rgba8())?;
        info!("🖼️ Decoded bitmap {}: {}x{}", bitmap.id, bitmap.width(), bitmap.height());
        Ok(bitmap)
    }

    /// Decode a base64 payload without any data-URL prefix
    pub fn decode_base64(encoded: &str) -> Result<Self, BitmapError> {
        let bytes = BASE64.decode(encoded.trim())?;
        Self::decode(&bytes)
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, BitmapError> {
        encode_png(&self.pixels)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32)
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

pub(crate) fn encode_png(pixels: &RgbaImage) -> Result<Vec<u8>, BitmapError> {
    let mut bytes = Vec::new();
    pixels
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(BitmapError::Encode)?;
    Ok(bytes)
}

/// Bitmap placed on the canvas, stretched to `size`
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub size: Vec2,
    pub bitmap: Bitmap,
}

impl Image {
    pub fn new(bitmap: Bitmap) -> Self {
        Self {
            size: bitmap.size(),
            bitmap,
        }
    }

    pub fn local_rect(&self) -> Rect {
        Rect::from_two_pos(Pos2::ZERO, self.size.to_pos2())
    }
}

impl Geometry for Image {
    fn local_bounds(&self) -> Rect {
        self.local_rect()
    }

    fn contains_local(&self, local: Pos2) -> bool {
        self.local_rect().contains(local)
    }

    fn extent(&self) -> Vec2 {
        Vec2::new(self.size.x.abs(), self.size.y.abs())
    }

    fn scale(&mut self, scale: Vec2) {
        self.size = self.size * scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let pixels = RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        encode_png(&pixels).unwrap()
    }

    #[test]
    fn test_decode_png() {
        let bitmap = Bitmap::decode(&tiny_png()).unwrap();
        assert_eq!(bitmap.size(), Vec2::new(3.0, 2.0));
        assert_eq!(bitmap.pixels().get_pixel(1, 1).0, [10, 20, 30, 255]);
    }

    #[test]
    fn test_decode_base64() {
        let encoded = BASE64.encode(tiny_png());
        let bitmap = Bitmap::decode_base64(&encoded).unwrap();
        assert_eq!(bitmap.width(), 3);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(Bitmap::decode(b"not an image"), Err(BitmapError::Decode(_))));
        assert!(matches!(
            Bitmap::decode_base64("!!!"),
            Err(BitmapError::InvalidBase64(_))
        ));
    }

    #[test]
    fn test_bitmaps_compare_by_identity() {
        let a = Bitmap::decode(&tiny_png()).unwrap();
        let b = Bitmap::decode(&tiny_png()).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_empty_bitmap_rejected() {
        let result = Bitmap::from_rgba(RgbaImage::new(0, 4));
        assert!(matches!(result, Err(BitmapError::InvalidDimensions { .. })));
    }
}
