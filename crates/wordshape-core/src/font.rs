//! Fonts as the shaping engine sees them
//!
//! A [`FontFace`] is one physical face: glyph coverage, metrics, and
//! (when available) the raw table bytes a shaping backend needs. A
//! [`Font`] bundles the primary face with its ordered fallbacks and the
//! feature flags that decide whether shaping word-by-word is safe.
//!
//! Faces are shared and reference-counted; many runs across many shape
//! results may hold the same `Arc<dyn FontFace>`.

// this_file: crates/wordshape-core/src/font.rs

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::types::GlyphId;

/// One physical font face
///
/// Every face speaks the same language through this trait, whether it
/// is backed by real font tables or by fixed metrics in a test.
pub trait FontFace: Send + Sync {
    /// Raw font bytes, or empty when the face is synthetic
    fn data(&self) -> &[u8] {
        &[]
    }

    /// The face's internal coordinate scale (1000 or 2048, usually)
    fn units_per_em(&self) -> u16;

    /// Find the glyph for this character; `None` when uncovered
    fn glyph_id(&self, ch: char) -> Option<GlyphId>;

    /// Advance of a glyph in pixels at the face's nominal size
    fn advance_width(&self, glyph: GlyphId) -> f32;

    /// Distance from the baseline to the top of the em box, in pixels
    fn ascent(&self) -> f32;

    /// Distance from the baseline to the bottom of the em box, in pixels
    fn descent(&self) -> f32;

    /// Stable identity used in cache keys
    fn key(&self) -> u64;
}

/// Typographic features that gate word-by-word shaping
///
/// Kerning and ligatures can reach across the spaces we would like to
/// split on, so enabling either makes per-word cache entries unsafe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FontFeatures {
    pub kerning: bool,
    pub ligatures: bool,
    pub small_caps: bool,
}

/// A primary face plus ordered fallbacks and shared feature settings
#[derive(Clone)]
pub struct Font {
    primary: Arc<dyn FontFace>,
    fallbacks: Vec<Arc<dyn FontFace>>,
    features: FontFeatures,
    size: f32,
}

impl Font {
    pub fn new(primary: Arc<dyn FontFace>, size: f32) -> Self {
        Self {
            primary,
            fallbacks: Vec::new(),
            features: FontFeatures::default(),
            size,
        }
    }

    pub fn with_fallbacks(mut self, fallbacks: Vec<Arc<dyn FontFace>>) -> Self {
        self.fallbacks = fallbacks;
        self
    }

    pub fn with_features(mut self, features: FontFeatures) -> Self {
        self.features = features;
        self
    }

    pub fn primary(&self) -> &Arc<dyn FontFace> {
        &self.primary
    }

    pub fn fallbacks(&self) -> &[Arc<dyn FontFace>] {
        &self.fallbacks
    }

    pub fn features(&self) -> FontFeatures {
        self.features
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Whether splitting the run into independently cached words is
    /// safe for this font's feature set
    pub fn can_shape_word_by_word(&self) -> bool {
        !self.features.kerning && !self.features.ligatures
    }

    /// The face that will render `ch`: the primary if it covers the
    /// character, else the first covering fallback, else the primary
    /// (which then produces .notdef or nothing at all)
    pub fn face_for(&self, ch: char) -> Arc<dyn FontFace> {
        if self.primary.glyph_id(ch).is_some() {
            return self.primary.clone();
        }
        for fallback in &self.fallbacks {
            if fallback.glyph_id(ch).is_some() {
                return fallback.clone();
            }
        }
        self.primary.clone()
    }

    /// Identity of the whole font stack for shape-cache keys
    pub fn cache_key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.primary.key().hash(&mut hasher);
        for fallback in &self.fallbacks {
            fallback.key().hash(&mut hasher);
        }
        self.features.hash(&mut hasher);
        self.size.to_bits().hash(&mut hasher);
        hasher.finish()
    }

    /// The OpenType feature list handed to the low-level shaper
    pub fn feature_list(&self) -> Vec<(String, u32)> {
        let mut features = Vec::new();
        if self.features.kerning {
            features.push(("kern".to_string(), 1));
        }
        if self.features.ligatures {
            features.push(("liga".to_string(), 1));
        }
        if self.features.small_caps {
            features.push(("smcp".to_string(), 1));
        }
        features
    }
}
