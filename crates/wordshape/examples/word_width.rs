//! Measure a line of text word by word and watch the cache work
//!
//! Uses a fixed-metric face and shaper so the example runs without any
//! font files; swap in `wordshape-shape-hb` and a real face for actual
//! OpenType shaping.
//!
//! Run with: RUST_LOG=debug cargo run --example word_width

// this_file: crates/wordshape/examples/word_width.rs

use std::sync::Arc;

use wordshape::{ShapeCache, WordShaper};
use wordshape_core::run::to_utf16;
use wordshape_core::types::{Direction, GlyphId, TextJustify};
use wordshape_core::{Font, FontFace, Result, ShapeOptions, ShapedGlyph, Shaper, TextRun};

struct DemoFace;

impl FontFace for DemoFace {
    fn units_per_em(&self) -> u16 {
        1000
    }

    fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        Some(ch as u32)
    }

    fn advance_width(&self, _glyph: GlyphId) -> f32 {
        9.5
    }

    fn ascent(&self) -> f32 {
        12.0
    }

    fn descent(&self) -> f32 {
        4.0
    }

    fn key(&self) -> u64 {
        1
    }
}

struct DemoShaper;

impl Shaper for DemoShaper {
    fn name(&self) -> &'static str {
        "demo"
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
            let (ch, len) = wordshape_core::run::decode_utf16_at(text, offset);
            if let Some(glyph) = face.glyph_id(ch) {
                glyphs.push(ShapedGlyph {
                    glyph,
                    cluster: offset as u32,
                    advance: face.advance_width(glyph),
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

fn main() -> Result<()> {
    env_logger::init();

    let shaper = WordShaper::new(Arc::new(DemoShaper), Arc::new(ShapeCache::new()));
    let font = Font::new(Arc::new(DemoFace), 16.0);

    let line = "the quick brown fox jumps over the lazy dog";
    let text = to_utf16(line);
    let run = TextRun::new(&text, Direction::LeftToRight);

    let width = shaper.width(&font, &run, None, None)?;
    println!("\"{line}\"");
    println!("  plain width:     {width:.1}px");

    let justified = TextRun::new(&text, Direction::LeftToRight)
        .with_expansion(40.0, TextJustify::InterWord);
    let wide = shaper.width(&font, &justified, None, None)?;
    println!("  justified +40px: {wide:.1}px");

    // "the" repeats, so the second pass is pure cache hits
    shaper.width(&font, &run, None, None)?;
    let metrics = shaper.cache().metrics();
    println!(
        "  cache: {} hits / {} misses ({:.0}% hit rate)",
        metrics.hits,
        metrics.misses,
        metrics.hit_rate() * 100.0
    );

    let caret = shaper.offset_for_position(&font, &run, width / 2.0, true)?;
    println!("  caret at half-width lands on character {caret}");

    Ok(())
}
