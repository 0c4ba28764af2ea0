//! Character classes the segmenter and spacing engine agree on.
//!
//! Scripts and general categories come from ICU data; the CJK-symbol
//! and emoji blocks that do not classify by script alone are explicit
//! range tables.

// this_file: crates/wordshape-unicode/src/character.rs

use icu_properties::props::{GeneralCategory, Script};
use icu_properties::{CodePointMapData, CodePointMapDataBorrowed};
use wordshape_core::types::TextJustify;
use wordshape_core::TextRun;

pub const ZERO_WIDTH_JOINER: char = '\u{200D}';

/// Blocks treated as "CJK ideograph or symbol" beyond what script
/// lookup gives us: ideographic punctuation, fullwidth forms, kana
/// extensions, and the emoji planes. One entry per inclusive range.
const CJK_SYMBOL_RANGES: &[(u32, u32)] = &[
    (0x2600, 0x27BF),   // Misc symbols, dingbats
    (0x2E80, 0x303E),   // CJK radicals, Kangxi, CJK symbols and punctuation
    (0x3041, 0x33FF),   // Kana, compatibility, enclosed CJK
    (0xF900, 0xFAFF),   // CJK compatibility ideographs
    (0xFE30, 0xFE4F),   // CJK compatibility forms
    (0xFF00, 0xFFEF),   // Fullwidth and halfwidth forms
    (0x1F000, 0x1FAFF), // Mahjong tiles through symbols and pictographs
];

/// The space-like characters a run can fold into its space category
pub fn treat_as_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | '\u{00A0}')
}

/// The logical "space" category a run exposes to word-spacing and
/// justification. Meaningful tabs (a run with tab stops) opt out;
/// other space-like characters beyond SPACE and NBSP join only when
/// the run normalizes them to spaces.
pub fn is_space_for_spacing(ch: char, run: &TextRun<'_>) -> bool {
    if ch == '\t' {
        return !run.allows_tabs();
    }
    ch == ' ' || ch == '\u{00A0}' || (run.normalizes_space() && treat_as_space(ch))
}

/// Characters that render at zero width and therefore never receive
/// letter-spacing
pub fn treat_as_zero_width_space(ch: char) -> bool {
    let cp = ch as u32;
    (cp < 0x20 && ch != '\t')
        || cp == 0x7F
        || (0x200B..=0x200F).contains(&cp)
        || (0x202A..=0x202E).contains(&cp)
        || cp == 0x2060
        || cp == 0xFEFF
}

/// Shared handles to the ICU property maps
pub struct CharClasses {
    script: CodePointMapDataBorrowed<'static, Script>,
    category: CodePointMapDataBorrowed<'static, GeneralCategory>,
}

impl CharClasses {
    /// Create classification maps with ICU data baked in.
    pub fn new() -> Self {
        Self {
            script: CodePointMapData::<Script>::new(),
            category: CodePointMapData::<GeneralCategory>::new(),
        }
    }

    /// CJK ideographs, kana, ideographic punctuation, and emoji: the
    /// characters that segment one-per-word and gain justification
    /// opportunities under `text-justify: auto`
    pub fn is_cjk_ideograph_or_symbol(&self, ch: char) -> bool {
        let script = self.script.get(ch);
        if matches!(
            script,
            Script::Han | Script::Hiragana | Script::Katakana | Script::Bopomofo
        ) {
            return true;
        }
        let cp = ch as u32;
        CJK_SYMBOL_RANGES
            .iter()
            .any(|(low, high)| (*low..=*high).contains(&cp))
    }

    /// Characters not yet attributed to any concrete script
    pub fn is_common_or_inherited(&self, ch: char) -> bool {
        matches!(self.script.get(ch), Script::Common | Script::Inherited)
    }

    /// Combining marks that must stay with their base character
    pub fn is_combining_mark(&self, ch: char) -> bool {
        matches!(
            self.category.get(ch),
            GeneralCategory::NonspacingMark
                | GeneralCategory::SpacingMark
                | GeneralCategory::EnclosingMark
        )
    }

    /// Modifier letters/symbols, including emoji skin-tone modifiers
    pub fn is_modifier(&self, ch: char) -> bool {
        matches!(
            self.category.get(ch),
            GeneralCategory::ModifierLetter | GeneralCategory::ModifierSymbol
        )
    }

    /// ISO 15924 tag for the low-level shaper
    pub fn script_tag(&self, ch: char) -> &'static str {
        match self.script.get(ch) {
            Script::Arabic => "arab",
            Script::Bengali => "beng",
            Script::Bopomofo => "bopo",
            Script::Cyrillic => "cyrl",
            Script::Devanagari => "deva",
            Script::Greek => "grek",
            Script::Hangul => "hang",
            Script::Han => "hani",
            Script::Hebrew => "hebr",
            Script::Hiragana => "hira",
            Script::Katakana => "kana",
            Script::Latin => "latn",
            Script::Tamil => "taml",
            Script::Thai => "thai",
            Script::Common | Script::Inherited => "zyyy",
            _ => "zzzz",
        }
    }
}

impl Default for CharClasses {
    fn default() -> Self {
        Self::new()
    }
}

/// Count justification opportunities in a run.
///
/// `text-justify: none` yields no opportunities. Otherwise every
/// character in the run's space category ([`is_space_for_spacing`])
/// counts. Under `text-justify: auto`, CJK ideographs and
/// symbols in a 16-bit run gain an opportunity on each side, with the
/// "before" side suppressed when the previous character already granted
/// its "after" side. RTL runs are scanned from their visual start, so
/// the leading/trailing allowances land on the right edges.
pub fn expansion_opportunity_count(classes: &CharClasses, run: &TextRun<'_>) -> usize {
    if run.text_justify() == TextJustify::None {
        return 0;
    }
    let cjk_eligible = run.text_justify() == TextJustify::Auto && !run.is_8bit();
    let mut count = 0usize;
    let mut is_after_expansion = !run.allows_leading_expansion();

    let logical: Vec<char> = run.code_points(0, run.len()).map(|(_, ch, _)| ch).collect();
    let mut scan = |ch: char| {
        if is_space_for_spacing(ch, run) {
            count += 1;
            is_after_expansion = true;
            return;
        }
        if cjk_eligible && classes.is_cjk_ideograph_or_symbol(ch) {
            if !is_after_expansion {
                count += 1;
            }
            count += 1;
            is_after_expansion = true;
            return;
        }
        is_after_expansion = false;
    };
    if run.direction().is_ltr() {
        logical.iter().copied().for_each(&mut scan);
    } else {
        logical.iter().rev().copied().for_each(&mut scan);
    }

    if is_after_expansion && !run.allows_trailing_expansion() && count > 0 {
        count -= 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordshape_core::run::to_utf16;
    use wordshape_core::types::Direction;

    #[test]
    fn test_cjk_classification() {
        let classes = CharClasses::new();
        assert!(classes.is_cjk_ideograph_or_symbol('国'));
        assert!(classes.is_cjk_ideograph_or_symbol('あ'));
        assert!(classes.is_cjk_ideograph_or_symbol('ア'));
        assert!(classes.is_cjk_ideograph_or_symbol('。'));
        assert!(classes.is_cjk_ideograph_or_symbol('\u{1F469}'));
        assert!(!classes.is_cjk_ideograph_or_symbol('a'));
        assert!(!classes.is_cjk_ideograph_or_symbol('м'));
    }

    #[test]
    fn test_space_and_zero_width_classes() {
        assert!(treat_as_space(' '));
        assert!(treat_as_space('\u{00A0}'));
        assert!(!treat_as_space('a'));
        assert!(treat_as_zero_width_space('\u{200B}'));
        assert!(treat_as_zero_width_space('\u{200D}'));
        assert!(!treat_as_zero_width_space('\t'));
        assert!(!treat_as_zero_width_space(' '));
    }

    #[test]
    fn test_combining_and_modifier_classes() {
        let classes = CharClasses::new();
        assert!(classes.is_combining_mark('\u{0301}'));
        assert!(classes.is_combining_mark('\u{FE0F}'));
        assert!(classes.is_modifier('\u{02C8}'));
        assert!(!classes.is_combining_mark('a'));
    }

    #[test]
    fn test_opportunity_count_spaces_only() {
        let classes = CharClasses::new();
        let text = to_utf16("one two three");
        let run = TextRun::new(&text, Direction::LeftToRight);
        assert_eq!(expansion_opportunity_count(&classes, &run), 2);
    }

    #[test]
    fn test_opportunity_count_cjk_both_sides() {
        let classes = CharClasses::new();
        let text = to_utf16("a国b");
        let run = TextRun::new(&text, Direction::LeftToRight);
        // Before and after the ideograph
        assert_eq!(expansion_opportunity_count(&classes, &run), 2);
    }

    #[test]
    fn test_opportunity_count_adjacent_cjk_shares_boundary() {
        let classes = CharClasses::new();
        let text = to_utf16("国国");
        let run = TextRun::new(&text, Direction::LeftToRight);
        // leading suppressed, shared middle, trailing allowed: 国(after) 国(after)
        // plus the second ideograph's before-side is consumed by the first's after
        assert_eq!(expansion_opportunity_count(&classes, &run), 2);
    }

    #[test]
    fn test_opportunity_count_ignores_cjk_in_interword_mode() {
        let classes = CharClasses::new();
        let text = to_utf16("国 国");
        let run = TextRun::new(&text, Direction::LeftToRight)
            .with_expansion(10.0, TextJustify::InterWord);
        assert_eq!(expansion_opportunity_count(&classes, &run), 1);
    }

    #[test]
    fn test_opportunity_count_zero_when_justify_none() {
        let classes = CharClasses::new();
        let text = to_utf16("one two 国");
        let run =
            TextRun::new(&text, Direction::LeftToRight).with_expansion(10.0, TextJustify::None);
        assert_eq!(expansion_opportunity_count(&classes, &run), 0);
    }

    #[test]
    fn test_opportunity_count_skips_meaningful_tabs() {
        let classes = CharClasses::new();
        let text = to_utf16("a\tb");
        let tabbed = TextRun::new(&text, Direction::LeftToRight).with_tabs(8.0);
        assert_eq!(expansion_opportunity_count(&classes, &tabbed), 0);
        let plain = TextRun::new(&text, Direction::LeftToRight);
        assert_eq!(expansion_opportunity_count(&classes, &plain), 1);
    }

    #[test]
    fn test_opportunity_count_newline_needs_normalization() {
        let classes = CharClasses::new();
        let text = to_utf16("a\nb");
        let raw = TextRun::new(&text, Direction::LeftToRight);
        assert_eq!(expansion_opportunity_count(&classes, &raw), 0);
        let normalized = TextRun::new(&text, Direction::LeftToRight).with_normalize_space(true);
        assert_eq!(expansion_opportunity_count(&classes, &normalized), 1);
    }

    #[test]
    fn test_opportunity_count_trailing_disallowed() {
        let classes = CharClasses::new();
        let text = to_utf16("ab ");
        let run = TextRun::new(&text, Direction::LeftToRight).with_expansion_allowances(false, false);
        assert_eq!(expansion_opportunity_count(&classes, &run), 0);
    }
}
