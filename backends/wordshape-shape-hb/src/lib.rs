//! HarfBuzz shaping backend for Wordshape

// this_file: backends/wordshape-shape-hb/src/lib.rs

use std::str::FromStr;
use std::sync::Arc;

use harfbuzz_rs::{Direction as HbDirection, Face, Feature, Font as HbFont, Tag, UnicodeBuffer};

use wordshape_core::error::Result;
use wordshape_core::traits::{ShapeOptions, ShapedGlyph, Shaper};
use wordshape_core::types::Direction;
use wordshape_core::FontFace;

/// HarfBuzz shaping backend
///
/// Shapes one homogeneous sub-range through HarfBuzz and maps the
/// returned byte clusters back to UTF-16 code unit offsets, which is
/// what the word-level layer speaks. Faces without raw table data fall
/// back to naive per-character placement.
pub struct HarfBuzzShaper;

impl HarfBuzzShaper {
    pub fn new() -> Self {
        Self
    }

    fn to_hb_direction(dir: Direction) -> HbDirection {
        match dir {
            Direction::LeftToRight => HbDirection::Ltr,
            Direction::RightToLeft => HbDirection::Rtl,
        }
    }

    fn tag(name: &str) -> Option<Tag> {
        if name.len() != 4 {
            return None;
        }
        let bytes = name.as_bytes();
        Some(Tag::new(
            bytes[0] as char,
            bytes[1] as char,
            bytes[2] as char,
            bytes[3] as char,
        ))
    }

    /// One glyph per code point at the face's nominal advance; used
    /// when the face carries no shapeable table data
    fn shape_naive(
        text: &[u16],
        face: &Arc<dyn FontFace>,
        options: &ShapeOptions,
    ) -> Vec<ShapedGlyph> {
        let mut glyphs = Vec::new();
        let mut offset = 0;
        while offset < text.len() {
            let (ch, len) = wordshape_core::run::decode_utf16_at(text, offset);
            if let Some(glyph) = face.glyph_id(ch) {
                glyphs.push(ShapedGlyph {
                    glyph,
                    cluster: offset as u32,
                    advance: face.advance_width(glyph),
                    offset: (0.0, 0.0),
                });
            } else {
                log::debug!("no glyph for {ch:?} in face {}", face.key());
            }
            offset += len;
        }
        if options.direction.is_rtl() {
            glyphs.reverse();
        }
        glyphs
    }
}

impl Default for HarfBuzzShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl Shaper for HarfBuzzShaper {
    fn name(&self) -> &'static str {
        "HarfBuzz"
    }

    fn shape(
        &self,
        text: &[u16],
        face: Arc<dyn FontFace>,
        options: &ShapeOptions,
    ) -> Result<Vec<ShapedGlyph>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let font_data = face.data();
        if font_data.is_empty() {
            return Ok(Self::shape_naive(text, &face, options));
        }

        // HarfBuzz consumes UTF-8 and reports clusters as byte offsets;
        // build the byte-to-code-unit table up front
        let mut string = String::with_capacity(text.len());
        let mut byte_to_unit: Vec<u32> = Vec::with_capacity(text.len() * 3 + 1);
        let mut unit = 0u32;
        let mut cursor = 0;
        while cursor < text.len() {
            let (ch, len) = wordshape_core::run::decode_utf16_at(text, cursor);
            for _ in 0..ch.len_utf8() {
                byte_to_unit.push(unit);
            }
            string.push(ch);
            unit += len as u32;
            cursor += len;
        }
        byte_to_unit.push(unit);

        let hb_face = Face::from_bytes(font_data, 0);
        let mut hb_font = HbFont::new(hb_face);
        let scale = (options.size * 64.0) as i32;
        hb_font.set_scale(scale, scale);

        let mut buffer = UnicodeBuffer::new()
            .add_str(&string)
            .set_direction(Self::to_hb_direction(options.direction));
        if let Some(tag) = Self::tag(&options.script) {
            buffer = buffer.set_script(tag);
        }
        if let Some(ref lang) = options.language {
            if let Ok(language) = harfbuzz_rs::Language::from_str(lang) {
                buffer = buffer.set_language(language);
            }
        }

        let features: Vec<Feature> = options
            .features
            .iter()
            .filter_map(|(name, value)| {
                Self::tag(name).map(|tag| Feature::new(tag, *value, 0..string.len()))
            })
            .collect();

        let output = harfbuzz_rs::shape(&hb_font, buffer, &features);
        let positions = output.get_glyph_positions();
        let infos = output.get_glyph_infos();

        let mut glyphs = Vec::with_capacity(infos.len());
        for (info, pos) in infos.iter().zip(positions.iter()) {
            let byte = info.cluster as usize;
            let cluster = byte_to_unit
                .get(byte)
                .copied()
                .unwrap_or_else(|| {
                    log::warn!("cluster byte offset {byte} outside shaped text");
                    0
                });
            glyphs.push(ShapedGlyph {
                glyph: info.codepoint,
                cluster,
                advance: pos.x_advance as f32 / 64.0,
                offset: (pos.x_offset as f32 / 64.0, pos.y_offset as f32 / 64.0),
            });
        }
        Ok(glyphs)
    }
}
