use std::path::{Path, PathBuf};

use egui::{Align2, Color32, Id, LayerId, Order};
use log::{info, warn};

use crate::element::Bitmap;
use crate::error::FileError;

/// Extensions accepted for dropped and loaded images
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Whether `path` names a supported image file, judged by extension
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Read and decode an image file
pub async fn read_image_file(path: &Path) -> Result<Bitmap, FileError> {
    if !is_image_path(path) {
        return Err(FileError::UnsupportedType {
            path: path.display().to_string(),
        });
    }
    let bytes = tokio::fs::read(path).await.map_err(|source| FileError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let bitmap = Bitmap::decode(&bytes)?;
    info!("📂 Loaded {} ({}x{})", path.display(), bitmap.width(), bitmap.height());
    Ok(bitmap)
}

/// Write an exported PNG to disk
pub async fn export_png(path: &Path, bytes: &[u8]) -> Result<(), FileError> {
    tokio::fs::write(path, bytes).await.map_err(|source| FileError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!("💾 Exported {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Where a dropped file's content can be found
#[derive(Debug, Clone)]
pub enum DroppedSource {
    Bytes(std::sync::Arc<[u8]>),
    Path(PathBuf),
}

/// An image file dropped onto the window
#[derive(Debug, Clone)]
pub struct DroppedImage {
    pub name: String,
    pub source: DroppedSource,
}

impl DroppedImage {
    pub async fn load(&self) -> Result<Bitmap, FileError> {
        match &self.source {
            DroppedSource::Bytes(bytes) => Ok(Bitmap::decode(bytes)?),
            DroppedSource::Path(path) => read_image_file(path).await,
        }
    }
}

/// Collects image files dropped onto the window
#[derive(Debug, Default)]
pub struct FileHandler;

impl FileHandler {
    pub fn new() -> Self {
        Self
    }

    /// This frame's dropped files that are images. egui reports each drop once.
    pub fn take_dropped_images(&self, ctx: &egui::Context) -> Vec<DroppedImage> {
        dropped_images(ctx.input(|i| i.raw.dropped_files.clone()))
    }

    /// Darken the window and list the files being dragged over it
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        let text = ctx.input(|i| {
            if i.raw.hovered_files.is_empty() {
                return None;
            }
            let mut text = "Dropping files:\n".to_owned();
            for file in &i.raw.hovered_files {
                match &file.path {
                    Some(path) => text += &format!("\n{}", path.display()),
                    None => text += "\n(Path not available)",
                }
            }
            Some(text)
        });
        let Some(text) = text else {
            return;
        };

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            egui::FontId::proportional(20.0),
            Color32::WHITE,
        );
    }
}

/// Keep the dropped files that are images and carry readable data
pub fn dropped_images(files: Vec<egui::DroppedFile>) -> Vec<DroppedImage> {
    let mut images = Vec::new();

    for file in files {
        let name = match &file.path {
            Some(path) => path.display().to_string(),
            None if !file.name.is_empty() => file.name.clone(),
            None => "unknown".to_owned(),
        };

        let is_image = if !file.mime.is_empty() {
            file.mime.starts_with("image/")
        } else {
            file.path.as_deref().is_some_and(is_image_path)
        };
        if !is_image {
            warn!("⚠️ Dropped file is not a supported image: {}", name);
            continue;
        }

        let source = match (file.bytes, file.path) {
            (Some(bytes), _) => DroppedSource::Bytes(bytes),
            (None, Some(path)) => DroppedSource::Path(path),
            (None, None) => {
                warn!("⚠️ Dropped file has no accessible data: {}", name);
                continue;
            }
        };
        images.push(DroppedImage { name, source });
    }

    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_is_image_path() {
        assert!(is_image_path(Path::new("photo.PNG")));
        assert!(is_image_path(Path::new("/tmp/a.jpeg")));
        assert!(!is_image_path(Path::new("notes.txt")));
        assert!(!is_image_path(Path::new("no_extension")));
    }

    #[tokio::test]
    async fn test_read_image_file_round_trip() {
        let dir = std::env::temp_dir().join(format!("canvas-editor-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("tiny.png");

        let bitmap = Bitmap::from_rgba(RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 255]))).unwrap();
        export_png(&path, &bitmap.encode_png().unwrap()).await.unwrap();

        let loaded = read_image_file(&path).await.unwrap();
        assert_eq!((loaded.width(), loaded.height()), (3, 2));
        assert_eq!(loaded.pixels().get_pixel(0, 0).0, [1, 2, 3, 255]);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_read_rejects_non_image() {
        let err = read_image_file(Path::new("/tmp/readme.md")).await.unwrap_err();
        assert!(matches!(err, FileError::UnsupportedType { .. }));
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let err = read_image_file(Path::new("/definitely/not/here.png")).await.unwrap_err();
        assert!(matches!(err, FileError::Io { .. }));
    }

    #[tokio::test]
    async fn test_dropped_bytes_decode() {
        let bitmap = Bitmap::from_rgba(RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255]))).unwrap();
        let dropped = DroppedImage {
            name: "pasted".to_owned(),
            source: DroppedSource::Bytes(bitmap.encode_png().unwrap().into()),
        };
        assert_eq!(dropped.load().await.unwrap().size(), egui::Vec2::new(4.0, 4.0));
    }

    #[test]
    fn test_same_file_dropped_twice_is_taken_twice() {
        let file = egui::DroppedFile {
            name: "logo.png".to_owned(),
            mime: "image/png".to_owned(),
            bytes: Some(vec![1u8, 2, 3].into()),
            ..Default::default()
        };

        for _ in 0..2 {
            let images = dropped_images(vec![file.clone()]);
            assert_eq!(images.len(), 1);
            assert_eq!(images[0].name, "logo.png");
        }
    }

    #[test]
    fn test_dropped_non_images_are_skipped() {
        let text = egui::DroppedFile {
            name: "notes.txt".to_owned(),
            mime: "text/plain".to_owned(),
            bytes: Some(vec![b'x'].into()),
            ..Default::default()
        };
        let path_only = egui::DroppedFile {
            path: Some("/tmp/photo.webp".into()),
            ..Default::default()
        };

        let images = dropped_images(vec![text, path_only]);
        assert_eq!(images.len(), 1);
        assert!(matches!(images[0].source, DroppedSource::Path(_)));
    }
}
