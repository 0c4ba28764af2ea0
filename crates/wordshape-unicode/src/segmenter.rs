//! The run segmenter: text in, atomic shaping units out.
//!
//! [`WordIterator`] walks a [`TextRun`] once, front to back, yielding
//! the character sub-ranges ("words") that are safe to shape and cache
//! independently. Spaces and tabs delimit; CJK ideographs go one per
//! segment so the cache keys stay small; emoji ZWJ sequences and
//! combining marks are never split from their base.

// this_file: crates/wordshape-unicode/src/segmenter.rs

use wordshape_core::run::TAB_CHARACTER;
use wordshape_core::TextRun;

use crate::character::{CharClasses, ZERO_WIDTH_JOINER};

/// One atomic shaping unit: `[start, end)` code unit offsets into the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Forward-only, non-restartable iterator over a run's words
///
/// Borrows the run for its whole life; create one per shaping request
/// and walk it to exhaustion. The sequence ends exactly when the
/// cursor reaches `run.len()`.
pub struct WordIterator<'a> {
    run: &'a TextRun<'a>,
    classes: CharClasses,
    offset: usize,
    shape_by_word: bool,
}

impl<'a> WordIterator<'a> {
    /// `shape_by_word` comes from `Font::can_shape_word_by_word`; when
    /// false the whole run is a single segment
    pub fn new(run: &'a TextRun<'a>, shape_by_word: bool) -> Self {
        Self {
            run,
            classes: CharClasses::new(),
            offset: 0,
            shape_by_word,
        }
    }

    fn is_word_delimiter(ch: char) -> bool {
        ch == ' ' || ch == '\t'
    }

    /// End offset of the word starting at `self.offset`
    fn next_word_end(&self) -> usize {
        let run = self.run;
        let len = run.len();
        let start = self.offset;

        // Consecutive tabs group into one segment for tab-stop layout,
        // and never merge with anything else
        if run.allows_tabs() && run.unit_at(start) == TAB_CHARACTER {
            let mut end = start + 1;
            while end < len && run.unit_at(end) == TAB_CHARACTER {
                end += 1;
            }
            return end;
        }

        let (first, first_len) = run.code_point_at(start);
        if start + first_len >= len || Self::is_word_delimiter(first) {
            return (start + first_len).min(len);
        }

        if !run.is_8bit() && self.classes.is_cjk_ideograph_or_symbol(first) {
            return self.cjk_segment_end(start + first_len);
        }

        for (offset, ch, _) in run.code_points(start + first_len, len) {
            if Self::is_word_delimiter(ch)
                || (!run.is_8bit() && self.classes.is_cjk_ideograph_or_symbol(ch))
            {
                return offset;
            }
        }
        len
    }

    /// Extend a CJK/emoji-led segment past everything that must stay
    /// attached: combining marks, modifiers, ZWJ-led sequence members,
    /// and common/inherited-script CJK symbols. A concrete-script
    /// character closes the segment.
    fn cjk_segment_end(&self, after_first: usize) -> usize {
        let run = self.run;
        let len = run.len();
        let mut end = after_first;
        let mut after_zwj = false;

        while end < len {
            let (ch, ch_len) = run.code_point_at(end);
            if ch == ZERO_WIDTH_JOINER {
                after_zwj = true;
                end += ch_len;
                continue;
            }
            let folds = (after_zwj && !Self::is_word_delimiter(ch))
                || self.classes.is_combining_mark(ch)
                || self.classes.is_modifier(ch)
                || (self.classes.is_common_or_inherited(ch)
                    && self.classes.is_cjk_ideograph_or_symbol(ch));
            if !folds {
                break;
            }
            after_zwj = false;
            end += ch_len;
        }
        end
    }
}

impl Iterator for WordIterator<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        let len = self.run.len();
        if self.offset >= len {
            return None;
        }
        let start = self.offset;
        let end = if self.shape_by_word {
            self.next_word_end()
        } else {
            len
        };
        debug_assert!(end > start, "segmenter produced an empty segment");
        self.offset = end;
        Some(Segment { start, end })
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use wordshape_core::run::to_utf16;
    use wordshape_core::types::Direction;

    proptest! {
        #[test]
        fn segments_partition_any_run(text in "\\PC*") {
            let units = to_utf16(&text);
            let run = TextRun::new(&units, Direction::LeftToRight);
            let segments: Vec<Segment> = WordIterator::new(&run, true).collect();

            // Segments are contiguous, non-empty, and cover the run
            let mut cursor = 0usize;
            for segment in &segments {
                prop_assert_eq!(segment.start, cursor);
                prop_assert!(segment.len() > 0);
                cursor = segment.end;
            }
            prop_assert_eq!(cursor, run.len());
        }

        #[test]
        fn whole_run_mode_never_splits(text in "\\PC*") {
            let units = to_utf16(&text);
            let run = TextRun::new(&units, Direction::LeftToRight);
            let segments: Vec<Segment> = WordIterator::new(&run, false).collect();
            prop_assert!(segments.len() <= 1);
        }
    }
}
