//! Texture keys and the per-key image cache
//!
//! Emoji and text images are produced by the host (canvas drawing, glyph
//! rasterizing). The engine only names them.

use std::collections::HashMap;

use serde::Serialize;

/// Identifies one sprite image
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureKey {
    /// A single emoji glyph
    Emoji(&'static str),
    /// A line of text
    Text {
        text: String,
        color: &'static str,
        font_size: u32,
    },
}

/// Host images keyed by [`TextureKey`], created on first use
#[derive(Debug)]
pub struct TextureCache<T> {
    entries: HashMap<TextureKey, T>,
}

impl<T> Default for TextureCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> TextureCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached image for `key`, creating it with `create` if missing
    pub fn get_or_create(&mut self, key: &TextureKey, create: impl FnOnce(&TextureKey) -> T) -> &T {
        if !self.entries.contains_key(key) {
            let image = create(key);
            self.entries.insert(key.clone(), image);
        }
        &self.entries[key]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every cached image (teardown)
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
