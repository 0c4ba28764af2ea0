//! Text runs: the borrowed input to every shaping request
//!
//! A [`TextRun`] is a view over one line's (or inline box's) worth of
//! UTF-16 code units plus the styling that affects shaping: direction,
//! letter/word spacing, justification budget, and tab/space handling.
//! All offsets and lengths in the shaping crates are UTF-16 code unit
//! offsets into the run.

// this_file: crates/wordshape-core/src/run.rs

use crate::types::{Direction, TextJustify};

pub const TAB_CHARACTER: u16 = 0x0009;
pub const SPACE_CHARACTER: u16 = 0x0020;

/// One run of text with its shaping-relevant style, borrowed from the
/// caller for the duration of a request
#[derive(Debug, Clone)]
pub struct TextRun<'a> {
    text: &'a [u16],
    direction: Direction,
    is_8bit: bool,
    letter_spacing: f32,
    word_spacing: f32,
    expansion: f32,
    text_justify: TextJustify,
    allows_leading_expansion: bool,
    allows_trailing_expansion: bool,
    allow_tabs: bool,
    tab_size: f32,
    normalize_space: bool,
}

impl<'a> TextRun<'a> {
    pub fn new(text: &'a [u16], direction: Direction) -> Self {
        Self {
            text,
            direction,
            is_8bit: text.iter().all(|unit| *unit < 0x100),
            letter_spacing: 0.0,
            word_spacing: 0.0,
            expansion: 0.0,
            text_justify: TextJustify::Auto,
            allows_leading_expansion: false,
            allows_trailing_expansion: true,
            allow_tabs: false,
            tab_size: 0.0,
            normalize_space: false,
        }
    }

    pub fn with_letter_spacing(mut self, spacing: f32) -> Self {
        self.letter_spacing = spacing;
        self
    }

    pub fn with_word_spacing(mut self, spacing: f32) -> Self {
        self.word_spacing = spacing;
        self
    }

    /// Set the justification budget and how it may be distributed
    pub fn with_expansion(mut self, expansion: f32, justify: TextJustify) -> Self {
        self.expansion = expansion;
        self.text_justify = justify;
        self
    }

    pub fn with_expansion_allowances(mut self, leading: bool, trailing: bool) -> Self {
        self.allows_leading_expansion = leading;
        self.allows_trailing_expansion = trailing;
        self
    }

    /// Keep tabs meaningful (tab-stop alignment) instead of treating
    /// them as spaces; `tab_size` is the stop interval in pixels
    pub fn with_tabs(mut self, tab_size: f32) -> Self {
        self.allow_tabs = true;
        self.tab_size = tab_size;
        self
    }

    pub fn with_normalize_space(mut self, normalize: bool) -> Self {
        self.normalize_space = normalize;
        self
    }

    pub fn units(&self) -> &'a [u16] {
        self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True when every code unit fits in a single byte; gates the CJK
    /// segmentation path and CJK justification
    pub fn is_8bit(&self) -> bool {
        self.is_8bit
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn letter_spacing(&self) -> f32 {
        self.letter_spacing
    }

    pub fn word_spacing(&self) -> f32 {
        self.word_spacing
    }

    pub fn expansion(&self) -> f32 {
        self.expansion
    }

    pub fn text_justify(&self) -> TextJustify {
        self.text_justify
    }

    pub fn allows_leading_expansion(&self) -> bool {
        self.allows_leading_expansion
    }

    pub fn allows_trailing_expansion(&self) -> bool {
        self.allows_trailing_expansion
    }

    pub fn allows_tabs(&self) -> bool {
        self.allow_tabs
    }

    pub fn tab_size(&self) -> f32 {
        self.tab_size
    }

    pub fn normalizes_space(&self) -> bool {
        self.normalize_space
    }

    /// The code unit at `index`; panics on out-of-range like slicing
    pub fn unit_at(&self, index: usize) -> u16 {
        self.text[index]
    }

    /// Decode the code point starting at `index`, pairing surrogates
    pub fn code_point_at(&self, index: usize) -> (char, usize) {
        decode_utf16_at(self.text, index)
    }

    /// A sub-slice of the run's code units
    pub fn subrange(&self, start: usize, end: usize) -> &'a [u16] {
        &self.text[start..end]
    }

    /// Iterate `(offset, code_point, unit_len)` over `[start, end)`
    pub fn code_points(&self, start: usize, end: usize) -> CodePoints<'a> {
        CodePoints {
            text: &self.text[..end],
            offset: start,
        }
    }
}

/// Iterator over code points with their UTF-16 offsets
pub struct CodePoints<'a> {
    text: &'a [u16],
    offset: usize,
}

impl Iterator for CodePoints<'_> {
    type Item = (usize, char, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.text.len() {
            return None;
        }
        let (ch, len) = decode_utf16_at(self.text, self.offset);
        let item = (self.offset, ch, len);
        self.offset += len;
        Some(item)
    }
}

/// Decode one code point at `index`. Unpaired surrogates decode to
/// U+FFFD with a length of one unit.
pub fn decode_utf16_at(units: &[u16], index: usize) -> (char, usize) {
    let unit = units[index];
    if (0xD800..0xDC00).contains(&unit) {
        if let Some(&low) = units.get(index + 1) {
            if (0xDC00..0xE000).contains(&low) {
                let cp = 0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                if let Some(ch) = char::from_u32(cp) {
                    return (ch, 2);
                }
            }
        }
        return (char::REPLACEMENT_CHARACTER, 1);
    }
    if (0xDC00..0xE000).contains(&unit) {
        return (char::REPLACEMENT_CHARACTER, 1);
    }
    (char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER), 1)
}

/// Encode a `&str` as UTF-16 code units; handy for callers and tests
pub fn to_utf16(text: &str) -> Vec<u16> {
    text.encode_utf16().collect()
}
