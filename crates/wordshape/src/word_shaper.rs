//! The caching word shaper: the crate's front door
//!
//! [`WordShaper`] drives the whole pipeline for one request: segment the
//! run into words, resolve each word through the shape cache (shaping on
//! a miss), apply spacing to private copies, and answer the aggregate
//! queries off the resulting [`ShapeResultBuffer`].

// this_file: crates/wordshape/src/word_shaper.rs

use std::sync::Arc;

use wordshape_core::cache::ShapeCacheKey;
use wordshape_core::types::{CharacterRange, FloatRect};
use wordshape_core::{Font, FontFace, Result, ShapeError, ShapeOptions, Shaper, TextRun};
use wordshape_unicode::{CharClasses, Segment, WordIterator};

use crate::buffer::ShapeResultBuffer;
use crate::glyph_buffer::GlyphBuffer;
use crate::result::{RunInfo, ShapeResult};
use crate::spacing::ShapeResultSpacing;
use crate::ShapeCache;

/// Shapes runs word by word through a shared cache
pub struct WordShaper {
    shaper: Arc<dyn Shaper>,
    cache: Arc<ShapeCache>,
    classes: CharClasses,
}

impl WordShaper {
    pub fn new(shaper: Arc<dyn Shaper>, cache: Arc<ShapeCache>) -> Self {
        Self {
            shaper,
            cache,
            classes: CharClasses::new(),
        }
    }

    pub fn cache(&self) -> &Arc<ShapeCache> {
        &self.cache
    }

    /// Shape the whole run into a transient buffer of per-word results
    ///
    /// Cached entries stay unspaced; when the run carries letter/word
    /// spacing or a justification budget, each word is cloned and the
    /// copy spaced. Tab segments are positioned against the tab stops
    /// and bypass the cache, since their advances depend on where on
    /// the line they land.
    pub fn shape(&self, font: &Font, run: &TextRun<'_>) -> Result<ShapeResultBuffer> {
        let mut buffer = ShapeResultBuffer::new(run.direction());
        let mut spacing = ShapeResultSpacing::new(run);
        let mut position = 0.0f32;

        for segment in WordIterator::new(run, font.can_shape_word_by_word()) {
            let result = if is_tab_segment(run, &segment) {
                Arc::new(ShapeResult::for_tabulation(
                    run,
                    font.face_for(' '),
                    position,
                    segment.len() as u32,
                ))
            } else {
                self.shape_word(font, run, &segment)?
            };
            let result = if spacing.has_spacing() {
                Arc::new(result.apply_spacing_to_copy(&mut spacing, segment.start))
            } else {
                result
            };
            position += result.width();
            buffer.push(result);
        }
        Ok(buffer)
    }

    /// Total advance of the run. Unions each word's glyph bounds,
    /// translated by the running offset, into `glyph_bounds`, and
    /// records any fallback faces used in `fallback_fonts`.
    pub fn width(
        &self,
        font: &Font,
        run: &TextRun<'_>,
        mut fallback_fonts: Option<&mut Vec<Arc<dyn FontFace>>>,
        mut glyph_bounds: Option<&mut FloatRect>,
    ) -> Result<f32> {
        let buffer = self.shape(font, run)?;
        let mut width = 0.0f32;
        for result in buffer.results() {
            if let Some(bounds) = glyph_bounds.as_deref_mut() {
                bounds.unite(&result.glyph_bounding_box().translated_x(width));
            }
            if let Some(fallbacks) = fallback_fonts.as_deref_mut() {
                for info in result.runs() {
                    let key = info.face().key();
                    if key != font.primary().key()
                        && !fallbacks.iter().any(|face| face.key() == key)
                    {
                        fallbacks.push(Arc::clone(info.face()));
                    }
                }
            }
            width += result.width();
        }
        Ok(width)
    }

    /// Positioned glyphs for characters `[from, to)` plus the total advance
    pub fn fill_glyph_buffer(
        &self,
        font: &Font,
        run: &TextRun<'_>,
        from: usize,
        to: usize,
    ) -> Result<(GlyphBuffer, f32)> {
        ShapeError::check_range(from, to, run.len())?;
        Ok(self.shape(font, run)?.fill_glyph_buffer(from, to))
    }

    /// Character offset under an x coordinate
    pub fn offset_for_position(
        &self,
        font: &Font,
        run: &TextRun<'_>,
        target_x: f32,
        include_partial_glyphs: bool,
    ) -> Result<usize> {
        Ok(self
            .shape(font, run)?
            .offset_for_position(target_x, include_partial_glyphs))
    }

    /// x-interval covering logical characters `[from, to)`
    pub fn character_range(
        &self,
        font: &Font,
        run: &TextRun<'_>,
        from: usize,
        to: usize,
    ) -> Result<CharacterRange> {
        ShapeError::check_range(from, to, run.len())?;
        Ok(self.shape(font, run)?.character_range(from, to))
    }

    /// Metrics of a text-emphasis mark ("dot", "sesame", ...), shaped
    /// like any other run. Callers stack the mark over each base
    /// character, so they need its advance and vertical extent.
    pub fn emphasis_mark_metrics(
        &self,
        font: &Font,
        mark: &TextRun<'_>,
    ) -> Result<EmphasisMarkMetrics> {
        let buffer = self.shape(font, mark)?;
        let mut metrics = EmphasisMarkMetrics {
            advance: buffer.width(),
            ascent: 0.0,
            descent: 0.0,
        };
        for result in buffer.results() {
            for info in result.runs() {
                metrics.ascent = metrics.ascent.max(info.face().ascent());
                metrics.descent = metrics.descent.max(info.face().descent());
            }
        }
        Ok(metrics)
    }

    /// One x-interval per character in the run
    pub fn individual_character_ranges(
        &self,
        font: &Font,
        run: &TextRun<'_>,
    ) -> Result<Vec<CharacterRange>> {
        Ok(self
            .shape(font, run)?
            .individual_character_ranges(run.len()))
    }

    fn shape_word(
        &self,
        font: &Font,
        run: &TextRun<'_>,
        segment: &Segment,
    ) -> Result<Arc<ShapeResult>> {
        let word = run.subrange(segment.start, segment.end);
        let key = ShapeCacheKey::new(word, font.cache_key());
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }
        log::debug!(
            "shape cache miss for {:?}",
            String::from_utf16_lossy(word)
        );
        let shaped = Arc::new(self.shape_uncached(font, run, segment)?);
        self.cache.insert(key, Arc::clone(&shaped));
        Ok(shaped)
    }

    /// Shape one word from scratch: itemize into maximal same-face
    /// stretches, shape each, and insert the runs in visual order.
    fn shape_uncached(
        &self,
        font: &Font,
        run: &TextRun<'_>,
        segment: &Segment,
    ) -> Result<ShapeResult> {
        let mut result = ShapeResult::new(run.direction(), segment.len() as u32);
        for stretch in self.itemize(font, run, segment) {
            let text = run.subrange(stretch.start, stretch.end);
            let options = ShapeOptions {
                direction: run.direction(),
                script: stretch.script.to_string(),
                language: None,
                features: font.feature_list(),
                size: font.size(),
            };
            let glyphs = self.shaper.shape(text, Arc::clone(&stretch.face), &options)?;
            result.insert_run(RunInfo::new(
                stretch.face,
                run.direction(),
                stretch.script.to_string(),
                (stretch.start - segment.start) as u32,
                (stretch.end - stretch.start) as u32,
                glyphs,
            ));
        }
        Ok(result)
    }

    /// Split a word into maximal stretches sharing one face, tracking
    /// the first concrete script seen in each
    fn itemize(&self, font: &Font, run: &TextRun<'_>, segment: &Segment) -> Vec<Stretch> {
        let mut stretches: Vec<Stretch> = Vec::new();
        for (offset, ch, unit_len) in run.code_points(segment.start, segment.end) {
            let face = font.face_for(ch);
            let tag = self.classes.script_tag(ch);
            match stretches.last_mut() {
                Some(last) if last.face.key() == face.key() => {
                    last.end = offset + unit_len;
                    if last.script == "zyyy" && tag != "zyyy" {
                        last.script = tag;
                    }
                }
                _ => stretches.push(Stretch {
                    start: offset,
                    end: offset + unit_len,
                    face,
                    script: tag,
                }),
            }
        }
        stretches
    }
}

/// Vertical extent and advance of one shaped emphasis mark
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EmphasisMarkMetrics {
    pub advance: f32,
    pub ascent: f32,
    pub descent: f32,
}

struct Stretch {
    start: usize,
    end: usize,
    face: Arc<dyn FontFace>,
    script: &'static str,
}

fn is_tab_segment(run: &TextRun<'_>, segment: &Segment) -> bool {
    run.allows_tabs()
        && run
            .subrange(segment.start, segment.end)
            .iter()
            .all(|unit| *unit == wordshape_core::run::TAB_CHARACTER)
}
