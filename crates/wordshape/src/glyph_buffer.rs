//! The glyph buffer: shaped output ready for a rasterizer
//!
//! An ordered sequence of `(glyph id, face, position)` entries. The
//! shaping engine fills one per query; whoever draws consumes it and is
//! out of scope here.

// this_file: crates/wordshape/src/glyph_buffer.rs

use std::sync::Arc;

use wordshape_core::types::GlyphId;
use wordshape_core::FontFace;

/// One positioned glyph
#[derive(Clone)]
pub struct GlyphBufferEntry {
    pub glyph: GlyphId,
    pub face: Arc<dyn FontFace>,
    pub x: f32,
    pub y: f32,
}

impl std::fmt::Debug for GlyphBufferEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphBufferEntry")
            .field("glyph", &self.glyph)
            .field("face", &self.face.key())
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}

/// Ordered positioned glyphs for one fill query
#[derive(Debug, Clone, Default)]
pub struct GlyphBuffer {
    entries: Vec<GlyphBufferEntry>,
    has_vertical_offsets: bool,
}

impl GlyphBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, glyph: GlyphId, face: Arc<dyn FontFace>, x: f32, y: f32) {
        self.has_vertical_offsets |= y != 0.0;
        self.entries.push(GlyphBufferEntry { glyph, face, x, y });
    }

    pub fn entries(&self) -> &[GlyphBufferEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_vertical_offsets(&self) -> bool {
        self.has_vertical_offsets
    }

    /// Flatten to comparable tuples; handy for asserting that two fill
    /// paths produced identical output
    pub fn flattened(&self) -> Vec<(GlyphId, u64, f32, f32)> {
        self.entries
            .iter()
            .map(|entry| (entry.glyph, entry.face.key(), entry.x, entry.y))
            .collect()
    }
}
