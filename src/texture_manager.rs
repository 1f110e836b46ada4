use std::collections::HashMap;

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};

use crate::element::Bitmap;

/// Uploads bitmaps to the GPU once and reuses the texture while the bitmap lives.
///
/// Bitmaps are immutable, so the bitmap id alone is a sufficient cache key.
pub struct TextureManager {
    texture_cache: HashMap<u64, TextureHandle>,
    /// Frame each texture was last drawn in
    last_used: HashMap<u64, u64>,
    current_frame: u64,
    max_cache_size: usize,
}

impl std::fmt::Debug for TextureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureManager")
            .field("cached", &self.texture_cache.len())
            .field("current_frame", &self.current_frame)
            .field("max_cache_size", &self.max_cache_size)
            .finish()
    }
}

impl TextureManager {
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            texture_cache: HashMap::new(),
            last_used: HashMap::new(),
            current_frame: 0,
            max_cache_size,
        }
    }

    /// Should be called once at the start of each frame
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    pub fn texture_for(&mut self, bitmap: &Bitmap, ctx: &Context) -> TextureId {
        let key = bitmap.id();
        if let Some(handle) = self.texture_cache.get(&key) {
            self.last_used.insert(key, self.current_frame);
            return handle.id();
        }

        let pixels = bitmap.pixels();
        let image = ColorImage::from_rgba_unmultiplied(
            [pixels.width() as usize, pixels.height() as usize],
            pixels.as_raw(),
        );
        let handle = ctx.load_texture(format!("bitmap_{}", key), image, TextureOptions::LINEAR);
        let id = handle.id();
        self.texture_cache.insert(key, handle);
        self.last_used.insert(key, self.current_frame);
        self.prune_cache_if_needed();
        id
    }

    /// Evict least recently drawn textures beyond the cache limit. Textures used in
    /// the current frame are never evicted.
    fn prune_cache_if_needed(&mut self) {
        if self.texture_cache.len() <= self.max_cache_size {
            return;
        }

        let mut entries: Vec<(u64, u64)> = self
            .last_used
            .iter()
            .filter(|(_, frame)| **frame < self.current_frame)
            .map(|(key, frame)| (*key, *frame))
            .collect();
        entries.sort_by_key(|(_, frame)| *frame);

        let excess = self.texture_cache.len() - self.max_cache_size;
        for (key, _) in entries.into_iter().take(excess) {
            self.texture_cache.remove(&key);
            self.last_used.remove(&key);
        }
    }

    pub fn clear_cache(&mut self) {
        self.texture_cache.clear();
        self.last_used.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.texture_cache.len()
    }

    #[cfg(test)]
    fn is_cached(&self, bitmap: &Bitmap) -> bool {
        self.texture_cache.contains_key(&bitmap.id())
    }
}
