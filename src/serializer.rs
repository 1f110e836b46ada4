use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::RgbaImage;
use log::debug;

use crate::config::EditorConfig;
use crate::element::image::encode_png;
use crate::error::BitmapError;
use crate::raster;
use crate::state::CanvasSnapshot;

/// Pixel density for file export
pub const EXPORT_PIXEL_RATIO: f32 = 2.0;

/// Pixel density for edit-service submission
pub const SUBMIT_PIXEL_RATIO: f32 = 1.0;

pub const EXPORT_FILE_NAME: &str = "image-editor-export.png";

/// Projects a canvas snapshot to PNG bytes. Holds no canvas state of its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSerializer {
    pub export_pixel_ratio: f32,
    pub submit_pixel_ratio: f32,
}

impl Default for CanvasSerializer {
    fn default() -> Self {
        Self {
            export_pixel_ratio: EXPORT_PIXEL_RATIO,
            submit_pixel_ratio: SUBMIT_PIXEL_RATIO,
        }
    }
}

impl CanvasSerializer {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            export_pixel_ratio: config.export_pixel_ratio,
            submit_pixel_ratio: config.submit_pixel_ratio,
        }
    }

    pub fn render(&self, snapshot: &CanvasSnapshot, pixel_ratio: f32) -> Result<RgbaImage, BitmapError> {
        raster::render(snapshot, pixel_ratio)
    }

    pub fn encode_png(&self, snapshot: &CanvasSnapshot, pixel_ratio: f32) -> Result<Vec<u8>, BitmapError> {
        let image = self.render(snapshot, pixel_ratio)?;
        let bytes = encode_png(&image)?;
        debug!(
            "Serialized canvas at {}x: {}x{} px, {} bytes",
            pixel_ratio,
            image.width(),
            image.height(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Quality-oriented PNG for saving to disk
    pub fn export_png(&self, snapshot: &CanvasSnapshot) -> Result<Vec<u8>, BitmapError> {
        self.encode_png(snapshot, self.export_pixel_ratio)
    }

    /// Size-oriented PNG, base64 encoded without any data-URL prefix
    pub fn submission_base64(&self, snapshot: &CanvasSnapshot) -> Result<String, BitmapError> {
        let bytes = self.encode_png(snapshot, self.submit_pixel_ratio)?;
        Ok(BASE64.encode(bytes))
    }

    pub fn data_url(&self, snapshot: &CanvasSnapshot, pixel_ratio: f32) -> Result<String, BitmapError> {
        let bytes = self.encode_png(snapshot, pixel_ratio)?;
        Ok(format!("data:image/png;base64,{}", BASE64.encode(bytes)))
    }
}

/// Strip a `data:...;base64,` prefix if present
pub fn strip_data_url(value: &str) -> &str {
    match value.split_once(',') {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_data_url() {
        assert_eq!(strip_data_url("data:image/png;base64,AAAA"), "AAAA");
        assert_eq!(strip_data_url("AAAA"), "AAAA");
    }
}
