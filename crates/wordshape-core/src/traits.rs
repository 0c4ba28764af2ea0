//! The contract with the low-level shaping engine
//!
//! Word-level shaping never performs OpenType shaping itself. It hands
//! one homogeneous sub-range (one font face, one direction, one script)
//! to a [`Shaper`] and gets back an ordered glyph list with cluster
//! mapping. Swapping a HarfBuzz-backed implementation for a fixed-metric
//! fake in tests happens here.

// this_file: crates/wordshape-core/src/traits.rs

use std::sync::Arc;

use crate::error::Result;
use crate::font::FontFace;
use crate::types::{Direction, GlyphId};

/// One glyph as reported by the low-level shaper
///
/// `cluster` is a character index relative to the shaped sub-range,
/// 0-based. A cluster is one or more glyphs mapped to the same offset,
/// or one glyph mapped to several merged characters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedGlyph {
    pub glyph: GlyphId,
    pub cluster: u32,
    pub advance: f32,
    pub offset: (f32, f32),
}

/// How one homogeneous sub-range should be shaped
#[derive(Debug, Clone)]
pub struct ShapeOptions {
    pub direction: Direction,
    /// ISO 15924 script tag, e.g. "latn", "hani"
    pub script: String,
    pub language: Option<String>,
    /// Enabled OpenType features with their values
    pub features: Vec<(String, u32)>,
    /// Font size in pixels
    pub size: f32,
}

impl Default for ShapeOptions {
    fn default() -> Self {
        Self {
            direction: Direction::LeftToRight,
            script: "latn".to_string(),
            language: None,
            features: Vec::new(),
            size: 16.0,
        }
    }
}

/// The boundary to the OpenType shaping engine
///
/// Treated as an opaque, synchronous, pure function: the same inputs
/// always produce the same glyph list. Implementations must keep
/// cluster indices monotonic (non-decreasing for LTR, non-increasing
/// for RTL) and relative to the start of `text`.
pub trait Shaper: Send + Sync {
    /// Identify yourself in logs and error messages
    fn name(&self) -> &'static str;

    /// Shape one homogeneous sub-range into glyphs
    ///
    /// An empty glyph list is a valid answer (an unmappable character
    /// with no fallback); callers recover it as zero width.
    fn shape(
        &self,
        text: &[u16],
        face: Arc<dyn FontFace>,
        options: &ShapeOptions,
    ) -> Result<Vec<ShapedGlyph>>;
}
