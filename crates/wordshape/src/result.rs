//! Shape results: one shaped word and the runs inside it
//!
//! A [`ShapeResult`] owns the homogeneous sub-runs ([`RunInfo`]) the
//! low-level shaper produced for one word, kept in *visual* order.
//! Fallback-font substitution splits a word into several runs;
//! [`ShapeResult::insert_run`] puts each where it renders, not where it
//! reads. Cached instances are immutable; spacing always goes through
//! [`ShapeResult::apply_spacing_to_copy`].

// this_file: crates/wordshape/src/result.rs

use std::sync::Arc;

use wordshape_core::types::{Direction, FloatRect, GlyphId};
use wordshape_core::{FontFace, ShapedGlyph, TextRun};

use crate::spacing::ShapeResultSpacing;

/// One glyph as stored inside a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphData {
    pub glyph: GlyphId,
    /// Character (cluster) index, relative to the owning run, in UTF-16
    /// code units
    pub character_index: u32,
    pub advance: f32,
    pub offset: (f32, f32),
}

/// One homogeneous sub-run: one face, one direction, one script
#[derive(Clone)]
pub struct RunInfo {
    face: Arc<dyn FontFace>,
    direction: Direction,
    script: String,
    glyphs: Vec<GlyphData>,
    start_index: u32,
    num_characters: u32,
    width: f32,
}

impl std::fmt::Debug for RunInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunInfo")
            .field("face", &self.face.key())
            .field("direction", &self.direction)
            .field("script", &self.script)
            .field("start_index", &self.start_index)
            .field("num_characters", &self.num_characters)
            .field("glyphs", &self.glyphs.len())
            .field("width", &self.width)
            .finish()
    }
}

/// A cluster of glyphs in visual order, with its logical span
struct ClusterSpan {
    character_index: u32,
    advance: f32,
    num_characters: u32,
}

impl RunInfo {
    /// Wrap the low-level shaper's output for one sub-range.
    ///
    /// `start_index` and `num_characters` are relative to the owning
    /// word; glyph clusters stay relative to this run. Width is the
    /// clamped sum of advances.
    pub fn new(
        face: Arc<dyn FontFace>,
        direction: Direction,
        script: String,
        start_index: u32,
        num_characters: u32,
        shaped: Vec<ShapedGlyph>,
    ) -> Self {
        let glyphs: Vec<GlyphData> = shaped
            .into_iter()
            .map(|g| GlyphData {
                glyph: g.glyph,
                character_index: g.cluster,
                advance: g.advance,
                offset: g.offset,
            })
            .collect();
        let width = glyphs.iter().map(|g| g.advance).sum::<f32>().max(0.0);
        Self {
            face,
            direction,
            script,
            glyphs,
            start_index,
            num_characters,
            width,
        }
    }

    pub fn face(&self) -> &Arc<dyn FontFace> {
        &self.face
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn glyphs(&self) -> &[GlyphData] {
        &self.glyphs
    }

    pub fn start_index(&self) -> u32 {
        self.start_index
    }

    pub fn num_characters(&self) -> u32 {
        self.num_characters
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn has_vertical_offsets(&self) -> bool {
        self.glyphs.iter().any(|g| g.offset.1 != 0.0)
    }

    /// Group adjacent glyphs sharing a character index into clusters,
    /// in visual order, and work out each cluster's logical span
    fn cluster_spans(&self) -> Vec<ClusterSpan> {
        let mut spans: Vec<ClusterSpan> = Vec::new();
        for glyph in &self.glyphs {
            match spans.last_mut() {
                Some(last) if last.character_index == glyph.character_index => {
                    last.advance += glyph.advance;
                }
                _ => spans.push(ClusterSpan {
                    character_index: glyph.character_index,
                    advance: glyph.advance,
                    num_characters: 0,
                }),
            }
        }
        // Logical span: up to the neighboring cluster's index. For RTL
        // runs the logical successor sits to the visual left.
        let count = spans.len();
        for i in 0..count {
            let next_boundary = if self.direction.is_ltr() {
                spans
                    .get(i + 1)
                    .map(|s| s.character_index)
                    .unwrap_or(self.num_characters)
            } else if i == 0 {
                self.num_characters
            } else {
                spans[i - 1].character_index
            };
            spans[i].num_characters = next_boundary.saturating_sub(spans[i].character_index);
        }
        spans
    }

    /// Map an x position inside this run to a character offset relative
    /// to the run. With `include_partial` the cluster midpoint decides
    /// which side the caret lands on; without it, the answer is the
    /// character the position is on.
    pub fn character_index_for_x(&self, target_x: f32, include_partial: bool) -> u32 {
        let spans = self.cluster_spans();
        let left_edge = |span: &ClusterSpan| {
            if self.direction.is_ltr() {
                span.character_index
            } else {
                span.character_index + span.num_characters
            }
        };
        let right_edge = |span: &ClusterSpan| {
            if self.direction.is_ltr() {
                span.character_index + span.num_characters
            } else {
                span.character_index
            }
        };

        if let Some(first) = spans.first() {
            if target_x <= 0.0 {
                return left_edge(first);
            }
        } else {
            return if self.direction.is_ltr() {
                0
            } else {
                self.num_characters
            };
        }

        let mut x = 0.0;
        for span in &spans {
            if target_x < x + span.advance {
                if !include_partial {
                    return span.character_index;
                }
                return if target_x <= x + span.advance / 2.0 {
                    left_edge(span)
                } else {
                    right_edge(span)
                };
            }
            x += span.advance;
        }
        if self.direction.is_ltr() {
            self.num_characters
        } else {
            0
        }
    }
}

/// One shaped word: visually ordered runs plus aggregate metrics
#[derive(Debug, Clone)]
pub struct ShapeResult {
    runs: Vec<RunInfo>,
    width: f32,
    glyph_bounding_box: FloatRect,
    num_characters: u32,
    num_glyphs: u32,
    direction: Direction,
    has_vertical_offsets: bool,
}

impl ShapeResult {
    pub fn new(direction: Direction, num_characters: u32) -> Self {
        Self {
            runs: Vec::new(),
            width: 0.0,
            glyph_bounding_box: FloatRect::default(),
            num_characters,
            num_glyphs: 0,
            direction,
            has_vertical_offsets: false,
        }
    }

    /// Shape a run of tabulation characters against the tab stops.
    ///
    /// `position` is the x offset already consumed on the line; each
    /// tab advances to the next multiple of `run.tab_size()`. Never
    /// cached, since the advances depend on the position.
    pub fn for_tabulation(
        run: &TextRun<'_>,
        face: Arc<dyn FontFace>,
        position: f32,
        count: u32,
    ) -> Self {
        let space_glyph = face.glyph_id(' ').unwrap_or(0);
        let tab_size = run.tab_size();
        let mut x = position;
        let mut glyphs = Vec::with_capacity(count as usize);
        for i in 0..count {
            let advance = if tab_size > 0.0 {
                let to_next = tab_size - x.rem_euclid(tab_size);
                if to_next > 0.0 {
                    to_next
                } else {
                    tab_size
                }
            } else {
                face.advance_width(space_glyph)
            };
            glyphs.push(ShapedGlyph {
                glyph: space_glyph,
                cluster: i,
                advance,
                offset: (0.0, 0.0),
            });
            x += advance;
        }
        let mut result = Self::new(run.direction(), count);
        result.insert_run(RunInfo::new(
            face,
            run.direction(),
            "zyyy".to_string(),
            0,
            count,
            glyphs,
        ));
        result
    }

    pub fn runs(&self) -> &[RunInfo] {
        &self.runs
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn glyph_bounding_box(&self) -> FloatRect {
        self.glyph_bounding_box
    }

    pub fn num_characters(&self) -> u32 {
        self.num_characters
    }

    pub fn num_glyphs(&self) -> u32 {
        self.num_glyphs
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn has_vertical_offsets(&self) -> bool {
        self.has_vertical_offsets
    }

    /// Insert a newly shaped run preserving visual order.
    ///
    /// Forward runs go before the first run with a larger start index;
    /// backward runs go before the first run with a smaller one. Either
    /// way, no match means append.
    pub fn insert_run(&mut self, run: RunInfo) {
        let index = if run.direction().is_ltr() {
            self.runs
                .iter()
                .position(|r| r.start_index() > run.start_index())
        } else {
            self.runs
                .iter()
                .position(|r| r.start_index() < run.start_index())
        }
        .unwrap_or(self.runs.len());

        self.width = (self.width + run.width()).max(0.0);
        self.num_glyphs += run.glyphs().len() as u32;
        self.has_vertical_offsets |= run.has_vertical_offsets();
        self.runs.insert(index, run);
        self.recompute_bounding_box();
    }

    fn recompute_bounding_box(&mut self) {
        let mut bounds = FloatRect::default();
        let mut x = 0.0;
        for run in &self.runs {
            if !run.glyphs().is_empty() {
                let run_box =
                    FloatRect::new(x, -run.face().ascent(), x + run.width(), run.face().descent());
                bounds.unite(&run_box);
            }
            x += run.width();
        }
        self.glyph_bounding_box = bounds;
    }

    /// Per-character advance buckets for this word.
    ///
    /// Each cluster's whole advance lands on its character index; a
    /// glyph spanning several merged characters contributes to the
    /// first of them. Indices outside the declared character count are
    /// inconsistent shaper output and are dropped with a warning.
    pub fn character_advances(&self) -> Vec<f32> {
        let mut advances = vec![0.0f32; self.num_characters as usize];
        for run in &self.runs {
            for glyph in run.glyphs() {
                let index = (run.start_index() + glyph.character_index) as usize;
                if let Some(slot) = advances.get_mut(index) {
                    *slot += glyph.advance;
                } else {
                    log::warn!(
                        "glyph maps to character {index} outside a {}-character word",
                        self.num_characters
                    );
                }
            }
        }
        advances
    }

    /// Map an x position to a logical character offset in `[0, num_characters]`
    pub fn offset_for_position(&self, target_x: f32, include_partial: bool) -> usize {
        let mut x = target_x;
        for run in &self.runs {
            if x < run.width() {
                return (run.start_index() + run.character_index_for_x(x, include_partial)) as usize;
            }
            x -= run.width();
        }
        if self.direction.is_ltr() {
            self.num_characters as usize
        } else {
            0
        }
    }

    /// Clone this result and apply spacing to the clone.
    ///
    /// `text_start_offset` is this word's character offset in the whole
    /// run, so the spacing engine sees absolute indices. The original
    /// (typically a cache entry) is never touched.
    pub fn apply_spacing_to_copy(
        &self,
        spacing: &mut ShapeResultSpacing<'_>,
        text_start_offset: usize,
    ) -> ShapeResult {
        let mut copy = self.clone();
        copy.apply_spacing(spacing, text_start_offset);
        copy
    }

    fn apply_spacing(&mut self, spacing: &mut ShapeResultSpacing<'_>, text_start_offset: usize) {
        let mut total_space = 0.0;
        for run in &mut self.runs {
            let mut run_space = 0.0;
            let mut previous_cluster: Option<u32> = None;
            for glyph in &mut run.glyphs {
                // Spacing applies once per cluster, on its first glyph
                if previous_cluster == Some(glyph.character_index) {
                    continue;
                }
                previous_cluster = Some(glyph.character_index);
                let index = text_start_offset + (run.start_index + glyph.character_index) as usize;
                let mut glyph_shift = 0.0;
                let space = spacing.compute_spacing(index, &mut glyph_shift);
                glyph.advance += space;
                if spacing.is_vertical() {
                    glyph.offset.1 += glyph_shift;
                } else {
                    glyph.offset.0 += glyph_shift;
                }
                run_space += space;
            }
            run.width = (run.width + run_space).max(0.0);
            total_space += run_space;
        }
        self.width = (self.width + total_space).max(0.0);
        self.has_vertical_offsets = self.runs.iter().any(RunInfo::has_vertical_offsets);
        self.recompute_bounding_box();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FixedFace;

    fn glyph(cluster: u32, advance: f32) -> ShapedGlyph {
        ShapedGlyph {
            glyph: 100 + cluster,
            cluster,
            advance,
            offset: (0.0, 0.0),
        }
    }

    fn ltr_run(start: u32, chars: u32, advances: &[f32]) -> RunInfo {
        let shaped: Vec<ShapedGlyph> = advances
            .iter()
            .enumerate()
            .map(|(i, a)| glyph(i as u32, *a))
            .collect();
        RunInfo::new(
            Arc::new(FixedFace::new(1, 10.0)),
            Direction::LeftToRight,
            "latn".to_string(),
            start,
            chars,
            shaped,
        )
    }

    fn rtl_run(start: u32, chars: u32, advances: &[f32]) -> RunInfo {
        // Visual order: descending character indices
        let shaped: Vec<ShapedGlyph> = advances
            .iter()
            .enumerate()
            .map(|(i, a)| glyph(chars - 1 - i as u32, *a))
            .collect();
        RunInfo::new(
            Arc::new(FixedFace::new(1, 10.0)),
            Direction::RightToLeft,
            "hebr".to_string(),
            start,
            chars,
            shaped,
        )
    }

    #[test]
    fn test_run_width_is_clamped_sum_of_advances() {
        let run = ltr_run(0, 2, &[7.0, 5.0]);
        assert_eq!(run.width(), 12.0);

        let negative = ltr_run(0, 1, &[-3.0]);
        assert_eq!(negative.width(), 0.0);
    }

    #[test]
    fn test_insert_run_keeps_ltr_visual_order() {
        let mut result = ShapeResult::new(Direction::LeftToRight, 6);
        // Fallback split produced runs out of order: 4.., 0.., 2..
        result.insert_run(ltr_run(4, 2, &[1.0, 1.0]));
        result.insert_run(ltr_run(0, 2, &[1.0, 1.0]));
        result.insert_run(ltr_run(2, 2, &[1.0, 1.0]));
        let starts: Vec<u32> = result.runs().iter().map(RunInfo::start_index).collect();
        assert_eq!(starts, vec![0, 2, 4]);
    }

    #[test]
    fn test_insert_run_keeps_rtl_visual_order() {
        let mut result = ShapeResult::new(Direction::RightToLeft, 6);
        result.insert_run(rtl_run(0, 2, &[1.0, 1.0]));
        result.insert_run(rtl_run(4, 2, &[1.0, 1.0]));
        result.insert_run(rtl_run(2, 2, &[1.0, 1.0]));
        // Logically last text renders leftmost
        let starts: Vec<u32> = result.runs().iter().map(RunInfo::start_index).collect();
        assert_eq!(starts, vec![4, 2, 0]);
    }

    #[test]
    fn test_width_and_character_count_aggregate() {
        let mut result = ShapeResult::new(Direction::LeftToRight, 4);
        result.insert_run(ltr_run(0, 2, &[10.0, 10.0]));
        result.insert_run(ltr_run(2, 2, &[5.0, 5.0]));
        assert_eq!(result.width(), 30.0);
        let total: u32 = result.runs().iter().map(RunInfo::num_characters).sum();
        assert_eq!(total, result.num_characters());
    }

    #[test]
    fn test_character_advances_attribute_cluster_to_its_character() {
        let mut result = ShapeResult::new(Direction::LeftToRight, 3);
        // Two glyphs in one cluster at index 1 (a mark stacked on a base)
        let shaped = vec![glyph(0, 10.0), glyph(1, 8.0), glyph(1, 2.0), glyph(2, 10.0)];
        result.insert_run(RunInfo::new(
            Arc::new(FixedFace::new(1, 10.0)),
            Direction::LeftToRight,
            "latn".to_string(),
            0,
            3,
            shaped,
        ));
        assert_eq!(result.character_advances(), vec![10.0, 10.0, 10.0]);
    }

    #[test]
    fn test_offset_for_position_walks_clusters() {
        let mut result = ShapeResult::new(Direction::LeftToRight, 3);
        result.insert_run(ltr_run(0, 3, &[10.0, 10.0, 10.0]));
        assert_eq!(result.offset_for_position(-1.0, false), 0);
        assert_eq!(result.offset_for_position(5.0, false), 0);
        assert_eq!(result.offset_for_position(15.0, false), 1);
        assert_eq!(result.offset_for_position(31.0, false), 3);
    }

    #[test]
    fn test_offset_for_position_midpoint_with_partial_glyphs() {
        let mut result = ShapeResult::new(Direction::LeftToRight, 2);
        result.insert_run(ltr_run(0, 2, &[10.0, 10.0]));
        assert_eq!(result.offset_for_position(4.0, true), 0);
        assert_eq!(result.offset_for_position(6.0, true), 1);
        assert_eq!(result.offset_for_position(14.0, true), 1);
        assert_eq!(result.offset_for_position(16.0, true), 2);
    }

    #[test]
    fn test_offset_for_position_rtl() {
        let mut result = ShapeResult::new(Direction::RightToLeft, 3);
        result.insert_run(rtl_run(0, 3, &[10.0, 10.0, 10.0]));
        // Visual left is logical end
        assert_eq!(result.offset_for_position(-1.0, false), 3);
        assert_eq!(result.offset_for_position(5.0, false), 2);
        assert_eq!(result.offset_for_position(25.0, false), 0);
        assert_eq!(result.offset_for_position(31.0, false), 0);
    }

    #[test]
    fn test_tabulation_result_lands_on_tab_stops() {
        let units = wordshape_core::run::to_utf16("\t\t");
        let run = TextRun::new(&units, Direction::LeftToRight).with_tabs(8.0);
        let face = Arc::new(FixedFace::new(1, 10.0));
        // 3 units into the line: first tab advances 5, second a full 8
        let result = ShapeResult::for_tabulation(&run, face, 3.0, 2);
        let advances: Vec<f32> = result.runs()[0].glyphs().iter().map(|g| g.advance).collect();
        assert_eq!(advances, vec![5.0, 8.0]);
        assert_eq!(result.width(), 13.0);
    }

    #[test]
    fn test_empty_shape_keeps_character_count() {
        let mut result = ShapeResult::new(Direction::LeftToRight, 2);
        result.insert_run(ltr_run(0, 2, &[]));
        assert_eq!(result.width(), 0.0);
        assert_eq!(result.num_characters(), 2);
        assert_eq!(result.character_advances(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_bounding_box_spans_inserted_runs() {
        let mut result = ShapeResult::new(Direction::LeftToRight, 4);
        result.insert_run(ltr_run(0, 2, &[10.0, 10.0]));
        result.insert_run(ltr_run(2, 2, &[10.0, 10.0]));
        let bounds = result.glyph_bounding_box();
        assert_eq!(bounds.left, 0.0);
        assert_eq!(bounds.right, 40.0);
        assert!(bounds.top < 0.0);
        assert!(bounds.bottom > 0.0);
    }
}
