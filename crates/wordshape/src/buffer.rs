//! The shape result buffer: one request's words, queried as a whole
//!
//! A [`ShapeResultBuffer`] collects the per-word [`ShapeResult`]s of a
//! single shaping request in logical order and answers the aggregate
//! questions: glyph positions, caret mapping, character extents. It
//! lives for one request and is never cached.

// this_file: crates/wordshape/src/buffer.rs

use std::sync::Arc;

use wordshape_core::types::{CharacterRange, Direction};

use crate::glyph_buffer::GlyphBuffer;
use crate::result::ShapeResult;

struct BufferEntry {
    start_offset: usize,
    result: Arc<ShapeResult>,
}

/// Words of one shaping request, in logical order
pub struct ShapeResultBuffer {
    entries: Vec<BufferEntry>,
    direction: Direction,
    num_characters: usize,
    width: f32,
}

impl ShapeResultBuffer {
    pub fn new(direction: Direction) -> Self {
        Self {
            entries: Vec::new(),
            direction,
            num_characters: 0,
            width: 0.0,
        }
    }

    /// Append the next word in logical order
    pub fn push(&mut self, result: Arc<ShapeResult>) {
        self.width += result.width();
        let start_offset = self.num_characters;
        self.num_characters += result.num_characters() as usize;
        self.entries.push(BufferEntry {
            start_offset,
            result,
        });
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn num_characters(&self) -> usize {
        self.num_characters
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn results(&self) -> impl Iterator<Item = &Arc<ShapeResult>> {
        self.entries.iter().map(|e| &e.result)
    }

    pub fn has_vertical_offsets(&self) -> bool {
        self.entries.iter().any(|e| e.result.has_vertical_offsets())
    }

    /// Entries in visual order: logical for LTR, reversed for RTL
    fn visual_entries(&self) -> Vec<&BufferEntry> {
        let mut entries: Vec<&BufferEntry> = self.entries.iter().collect();
        if self.direction.is_rtl() {
            entries.reverse();
        }
        entries
    }

    /// Emit positioned glyphs for characters in `[from, to)` and return
    /// the total advance.
    ///
    /// A full-range request with no vertical offsets takes the blit
    /// path; anything else filters per glyph. Both walk the same loops
    /// and accumulate advance for every glyph, so a full-range filter
    /// pass produces identical output.
    pub fn fill_glyph_buffer(&self, from: usize, to: usize) -> (GlyphBuffer, f32) {
        if from == 0 && to == self.num_characters && !self.has_vertical_offsets() {
            self.fill_glyph_buffer_fast()
        } else {
            self.fill_glyph_buffer_filtered(from, to)
        }
    }

    fn fill_glyph_buffer_fast(&self) -> (GlyphBuffer, f32) {
        let mut buffer = GlyphBuffer::new();
        let mut x = 0.0f32;
        for entry in self.visual_entries() {
            for run in entry.result.runs() {
                for glyph in run.glyphs() {
                    buffer.add(
                        glyph.glyph,
                        Arc::clone(run.face()),
                        x + glyph.offset.0,
                        glyph.offset.1,
                    );
                    x += glyph.advance;
                }
            }
        }
        (buffer, x)
    }

    fn fill_glyph_buffer_filtered(&self, from: usize, to: usize) -> (GlyphBuffer, f32) {
        let mut buffer = GlyphBuffer::new();
        let mut x = 0.0f32;
        for entry in self.visual_entries() {
            for run in entry.result.runs() {
                for glyph in run.glyphs() {
                    let absolute = entry.start_offset
                        + run.start_index() as usize
                        + glyph.character_index as usize;
                    if (from..to).contains(&absolute) {
                        buffer.add(
                            glyph.glyph,
                            Arc::clone(run.face()),
                            x + glyph.offset.0,
                            glyph.offset.1,
                        );
                    }
                    // Skipped leading glyphs still offset emitted ones
                    x += glyph.advance;
                }
            }
        }
        (buffer, x)
    }

    /// Map an x coordinate to a logical character offset
    pub fn offset_for_position(&self, target_x: f32, include_partial_glyphs: bool) -> usize {
        let mut x = target_x;
        for entry in self.visual_entries() {
            let width = entry.result.width();
            if x < width {
                return entry.start_offset
                    + entry.result.offset_for_position(x, include_partial_glyphs);
            }
            x -= width;
        }
        // Past the visual right edge
        if self.direction.is_ltr() {
            self.num_characters
        } else {
            0
        }
    }

    /// Per-character advance buckets over the whole request
    fn character_advances(&self) -> Vec<f32> {
        let mut advances = vec![0.0f32; self.num_characters];
        for entry in &self.entries {
            let word = entry.result.character_advances();
            for (i, advance) in word.iter().enumerate() {
                advances[entry.start_offset + i] += advance;
            }
        }
        advances
    }

    /// x-interval covering logical characters `[from, to)`, normalized
    /// so start is numerically the lesser edge. An offset equal to the
    /// character count maps to the visual far edge.
    pub fn character_range(&self, from: usize, to: usize) -> CharacterRange {
        let advances = self.character_advances();
        let prefix = |offset: usize| -> f32 {
            advances[..offset.min(advances.len())].iter().sum()
        };
        if self.direction.is_ltr() {
            CharacterRange::new(prefix(from), prefix(to))
        } else {
            CharacterRange::new(self.width - prefix(to), self.width - prefix(from))
        }
    }

    /// One x-interval per character, `expected_characters` entries
    /// exactly.
    ///
    /// Characters past what the shaper mapped get the sentinel interval
    /// `(0, 0)` rather than shifting or stretching real entries.
    pub fn individual_character_ranges(&self, expected_characters: usize) -> Vec<CharacterRange> {
        let advances = self.character_advances();
        let mapped = advances.len().min(expected_characters);
        if mapped < expected_characters {
            log::warn!(
                "shaper mapped {mapped} of {expected_characters} characters; padding the rest",
            );
        }
        let mut ranges = Vec::with_capacity(expected_characters);
        if self.direction.is_ltr() {
            let mut x = 0.0;
            for advance in &advances[..mapped] {
                ranges.push(CharacterRange::new(x, x + advance));
                x += advance;
            }
        } else {
            let mut x = self.width;
            for advance in &advances[..mapped] {
                ranges.push(CharacterRange::new(x - advance, x));
                x -= advance;
            }
        }
        ranges.resize(expected_characters, CharacterRange::new(0.0, 0.0));
        ranges
    }
}
