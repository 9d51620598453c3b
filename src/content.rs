//! Content the block factory draws from
//!
//! A bounded pool of image descriptors and text keywords, resolved one item
//! per spawn. Loading/decoding happens host-side before the round starts;
//! the sim only ever sees dimensions and opaque handles.

use serde::{Deserialize, Serialize};

/// A loadable image the host has prepared (sprite name or URL as handle)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAsset {
    /// Opaque handle the render host resolves to a drawable
    pub handle: String,
    /// Source width (px)
    pub width: f32,
    /// Source height (px)
    pub height: f32,
    /// False when the host failed to load it; the factory falls back
    #[serde(default = "default_usable")]
    pub usable: bool,
}

fn default_usable() -> bool {
    true
}

impl ImageAsset {
    pub fn new(handle: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            handle: handle.into(),
            width,
            height,
            usable: true,
        }
    }

    /// Height / width ratio, guarded against degenerate sources
    pub fn aspect(&self) -> f32 {
        if self.width <= 0.0 {
            1.0
        } else {
            self.height / self.width
        }
    }
}

/// Bounded content pool with per-spawn cursors
///
/// Each item is handed out once; when a pool runs dry the factory shifts to
/// the other kind. Cursors wrap on index so a short pool never panics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentSource {
    #[serde(default)]
    images: Vec<ImageAsset>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    image_cursor: usize,
    #[serde(default)]
    keyword_cursor: usize,
}

impl ContentSource {
    pub fn new(images: Vec<ImageAsset>, keywords: Vec<String>) -> Self {
        Self {
            images,
            keywords,
            image_cursor: 0,
            keyword_cursor: 0,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Images not yet handed out
    pub fn images_remaining(&self) -> usize {
        self.images.len().saturating_sub(self.image_cursor)
    }

    /// Keywords not yet handed out
    pub fn keywords_remaining(&self) -> usize {
        self.keywords.len().saturating_sub(self.keyword_cursor)
    }

    /// Resolve the next image, advancing the cursor
    pub fn next_image(&mut self) -> Option<ImageAsset> {
        if self.images.is_empty() {
            return None;
        }
        let asset = self.images[self.image_cursor % self.images.len()].clone();
        self.image_cursor += 1;
        Some(asset)
    }

    /// Resolve the next keyword, advancing the cursor
    pub fn next_keyword(&mut self) -> Option<String> {
        if self.keywords.is_empty() {
            return None;
        }
        let keyword = self.keywords[self.keyword_cursor % self.keywords.len()].clone();
        self.keyword_cursor += 1;
        Some(keyword)
    }
}
