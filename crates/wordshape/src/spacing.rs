//! Letter-spacing, word-spacing, and justification
//!
//! [`ShapeResultSpacing`] is a stateful per-character spacing computer.
//! One instance spans a whole shaping request; words feed it their
//! characters in visual order through
//! [`ShapeResult::apply_spacing_to_copy`](crate::ShapeResult::apply_spacing_to_copy),
//! and it doles out the justification budget so the total comes out
//! exact despite float division.

// this_file: crates/wordshape/src/spacing.rs

use wordshape_core::types::TextJustify;
use wordshape_core::TextRun;
use wordshape_unicode::{
    expansion_opportunity_count, is_space_for_spacing, treat_as_zero_width_space, CharClasses,
};

/// Tracks remaining justification budget and the carry state between
/// adjacent opportunities
pub struct ShapeResultSpacing<'a> {
    run: &'a TextRun<'a>,
    classes: CharClasses,
    letter_spacing: f32,
    word_spacing: f32,
    expansion: f32,
    expansion_per_opportunity: f32,
    expansion_opportunity_count: usize,
    has_spacing: bool,
    is_after_expansion: bool,
    is_vertical: bool,
}

impl<'a> ShapeResultSpacing<'a> {
    pub fn new(run: &'a TextRun<'a>) -> Self {
        let classes = CharClasses::new();
        // text-justify: none switches justification off entirely
        let expansion = if run.text_justify() == TextJustify::None {
            0.0
        } else {
            run.expansion()
        };
        let mut count = 0;
        let mut per_opportunity = 0.0;
        if expansion > 0.0 {
            count = expansion_opportunity_count(&classes, run);
            if count > 0 {
                per_opportunity = expansion / count as f32;
            }
        }
        let has_spacing =
            run.letter_spacing() != 0.0 || run.word_spacing() != 0.0 || expansion > 0.0;
        Self {
            run,
            classes,
            letter_spacing: run.letter_spacing(),
            word_spacing: run.word_spacing(),
            expansion,
            expansion_per_opportunity: per_opportunity,
            expansion_opportunity_count: count,
            has_spacing,
            is_after_expansion: !run.allows_leading_expansion(),
            is_vertical: false,
        }
    }

    /// Whether any spacing is configured at all; callers skip the
    /// copy-and-apply step when not
    pub fn has_spacing(&self) -> bool {
        self.has_spacing
    }

    pub fn is_vertical(&self) -> bool {
        self.is_vertical
    }

    /// Budget not yet handed out; zero once the last opportunity fired
    pub fn expansion_remaining(&self) -> f32 {
        self.expansion
    }

    /// Draw the next share from the justification budget. The last
    /// opportunity takes everything that is left, so rounding error
    /// never accumulates into the line width.
    fn next_expansion(&mut self) -> f32 {
        if self.expansion_opportunity_count == 0 {
            log::warn!("justification ran out of expansion opportunities");
            return 0.0;
        }
        self.expansion_opportunity_count -= 1;
        if self.expansion_opportunity_count == 0 {
            let all = self.expansion;
            self.expansion = 0.0;
            return all;
        }
        self.expansion -= self.expansion_per_opportunity;
        self.expansion_per_opportunity
    }

    /// Spacing to add after the character at `index` (a code unit
    /// offset into the full run). CJK before-side expansion cannot
    /// widen the previous glyph, so it shifts this one instead;
    /// `offset_shift` receives that shift.
    pub fn compute_spacing(&mut self, index: usize, offset_shift: &mut f32) -> f32 {
        let (ch, _) = self.run.code_point_at(index);
        let mut spacing = 0.0;

        if self.letter_spacing != 0.0 && !treat_as_zero_width_space(ch) {
            spacing += self.letter_spacing;
        }
        if self.word_spacing != 0.0 && index > 0 && is_space_for_spacing(ch, self.run) {
            spacing += self.word_spacing;
        }

        if self.expansion <= 0.0 {
            return spacing;
        }
        // Same space category as word-spacing, so the count computed up
        // front matches what gets consumed here
        if is_space_for_spacing(ch, self.run) {
            spacing += self.next_expansion();
            self.is_after_expansion = true;
            return spacing;
        }
        if self.run.text_justify() == TextJustify::Auto
            && !self.run.is_8bit()
            && self.classes.is_cjk_ideograph_or_symbol(ch)
        {
            if !self.is_after_expansion {
                let before = self.next_expansion();
                *offset_shift += before;
                spacing += before;
            }
            spacing += self.next_expansion();
            self.is_after_expansion = true;
            return spacing;
        }
        self.is_after_expansion = false;
        spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordshape_core::run::to_utf16;
    use wordshape_core::types::Direction;

    fn total_spacing(run: &TextRun<'_>) -> f32 {
        let mut spacing = ShapeResultSpacing::new(run);
        let mut total = 0.0;
        let mut offset = 0;
        while offset < run.len() {
            let (_, len) = run.code_point_at(offset);
            let mut shift = 0.0;
            total += spacing.compute_spacing(offset, &mut shift);
            offset += len;
        }
        total
    }

    #[test]
    fn test_letter_spacing_applies_per_character() {
        let text = to_utf16("abc");
        let run = TextRun::new(&text, Direction::LeftToRight).with_letter_spacing(2.0);
        assert_eq!(total_spacing(&run), 6.0);
    }

    #[test]
    fn test_letter_spacing_skips_zero_width_characters() {
        let text = to_utf16("a\u{200B}b");
        let run = TextRun::new(&text, Direction::LeftToRight).with_letter_spacing(2.0);
        assert_eq!(total_spacing(&run), 4.0);
    }

    #[test]
    fn test_word_spacing_applies_to_interior_spaces() {
        let text = to_utf16(" a b ");
        let run = TextRun::new(&text, Direction::LeftToRight).with_word_spacing(5.0);
        // The leading space is exempt
        assert_eq!(total_spacing(&run), 15.0);
    }

    #[test]
    fn test_expansion_budget_distributes_exactly() {
        let text = to_utf16("one two three four");
        let run = TextRun::new(&text, Direction::LeftToRight)
            .with_expansion(10.0, TextJustify::InterWord);
        // 3 spaces, 10/3 is not exact in f32; the last draw absorbs the
        // remainder so the sum is exact
        let mut spacing = ShapeResultSpacing::new(&run);
        let mut total = 0.0;
        for index in 0..run.len() {
            let mut shift = 0.0;
            total += spacing.compute_spacing(index, &mut shift);
        }
        assert!((total - 10.0).abs() < 1e-4);
        assert_eq!(spacing.expansion_remaining(), 0.0);
    }

    #[test]
    fn test_justify_none_disables_expansion() {
        let text = to_utf16("a b");
        let run =
            TextRun::new(&text, Direction::LeftToRight).with_expansion(10.0, TextJustify::None);
        let spacing = ShapeResultSpacing::new(&run);
        assert!(!spacing.has_spacing());
        assert_eq!(spacing.expansion_remaining(), 0.0);
        assert_eq!(total_spacing(&run), 0.0);
    }

    #[test]
    fn test_newline_spacing_consistent_without_normalization() {
        // A raw newline is not in the space category, so it gets
        // neither word-spacing nor a share of the expansion budget
        let text = to_utf16("a\nb c");
        let raw = TextRun::new(&text, Direction::LeftToRight)
            .with_word_spacing(5.0)
            .with_expansion(9.0, TextJustify::InterWord);
        assert_eq!(total_spacing(&raw), 5.0 + 9.0);

        // Normalized, it joins the category for both at once
        let normalized = TextRun::new(&text, Direction::LeftToRight)
            .with_word_spacing(5.0)
            .with_expansion(9.0, TextJustify::InterWord)
            .with_normalize_space(true);
        assert_eq!(total_spacing(&normalized), 10.0 + 9.0);
    }

    #[test]
    fn test_cjk_expansion_shifts_glyph_before() {
        let text = to_utf16("a国");
        let run =
            TextRun::new(&text, Direction::LeftToRight).with_expansion(6.0, TextJustify::Auto);
        let mut spacing = ShapeResultSpacing::new(&run);
        let mut shift = 0.0;
        let latin = spacing.compute_spacing(0, &mut shift);
        assert_eq!(latin, 0.0);
        assert_eq!(shift, 0.0);
        // Ideograph gets both sides: before (shifting it right) and after
        let cjk = spacing.compute_spacing(1, &mut shift);
        assert_eq!(cjk, 6.0);
        assert_eq!(shift, 3.0);
        assert_eq!(spacing.expansion_remaining(), 0.0);
    }

    #[test]
    fn test_no_spacing_flag() {
        let text = to_utf16("ab");
        let plain = TextRun::new(&text, Direction::LeftToRight);
        assert!(!ShapeResultSpacing::new(&plain).has_spacing());
        let spaced = TextRun::new(&text, Direction::LeftToRight).with_letter_spacing(1.0);
        assert!(ShapeResultSpacing::new(&spaced).has_spacing());
    }

    #[test]
    fn test_meaningful_tab_gets_no_word_spacing() {
        let text = to_utf16("a\tb");
        let tabbed = TextRun::new(&text, Direction::LeftToRight)
            .with_word_spacing(5.0)
            .with_tabs(8.0);
        assert_eq!(total_spacing(&tabbed), 0.0);
        let plain = TextRun::new(&text, Direction::LeftToRight).with_word_spacing(5.0);
        assert_eq!(total_spacing(&plain), 5.0);
    }
}
