//! Fixed-metric fakes shared by the unit tests

// this_file: crates/wordshape/src/test_support.rs

use std::sync::Arc;

use wordshape_core::run::decode_utf16_at;
use wordshape_core::types::GlyphId;
use wordshape_core::{Font, FontFace, Result, ShapeOptions, ShapedGlyph, Shaper};

/// A face where every glyph is `advance` wide
pub struct FixedFace {
    key: u64,
    advance: f32,
    ascii_only: bool,
}

impl FixedFace {
    pub fn new(key: u64, advance: f32) -> Self {
        Self {
            key,
            advance,
            ascii_only: false,
        }
    }

    pub fn ascii_only(key: u64, advance: f32) -> Self {
        Self {
            key,
            advance,
            ascii_only: true,
        }
    }
}

impl FontFace for FixedFace {
    fn units_per_em(&self) -> u16 {
        1000
    }

    fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        if self.ascii_only && !ch.is_ascii() {
            return None;
        }
        Some(ch as u32)
    }

    fn advance_width(&self, _glyph: GlyphId) -> f32 {
        self.advance
    }

    fn ascent(&self) -> f32 {
        8.0
    }

    fn descent(&self) -> f32 {
        2.0
    }

    fn key(&self) -> u64 {
        self.key
    }
}

/// Shapes one glyph per code point at a fixed advance. Clusters are
/// UTF-16 unit offsets relative to the shaped text; RTL output comes
/// back in visual order, like a real shaper's.
pub struct MockShaper {
    advance: f32,
    unmappable: Option<char>,
}

impl MockShaper {
    pub fn new(advance: f32) -> Self {
        Self {
            advance,
            unmappable: None,
        }
    }

    /// Pretend `ch` has no glyph in any face
    pub fn with_unmappable(mut self, ch: char) -> Self {
        self.unmappable = Some(ch);
        self
    }
}

impl Shaper for MockShaper {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn shape(
        &self,
        text: &[u16],
        face: Arc<dyn FontFace>,
        options: &ShapeOptions,
    ) -> Result<Vec<ShapedGlyph>> {
        let mut glyphs = Vec::new();
        let mut offset = 0;
        while offset < text.len() {
            let (ch, len) = decode_utf16_at(text, offset);
            if Some(ch) != self.unmappable {
                glyphs.push(ShapedGlyph {
                    glyph: face.glyph_id(ch).unwrap_or(0),
                    cluster: offset as u32,
                    advance: self.advance,
                    offset: (0.0, 0.0),
                });
            }
            offset += len;
        }
        if options.direction.is_rtl() {
            glyphs.reverse();
        }
        Ok(glyphs)
    }
}

pub fn test_font() -> Font {
    Font::new(Arc::new(FixedFace::new(1, 10.0)), 16.0)
}

pub fn test_font_with_fallback() -> Font {
    Font::new(Arc::new(FixedFace::ascii_only(1, 10.0)), 16.0)
        .with_fallbacks(vec![Arc::new(FixedFace::new(2, 10.0))])
}
