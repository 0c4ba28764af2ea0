//! Wordshape Core: the vocabulary of word-level shaping
//!
//! Text enters as a run of UTF-16 code units, leaves as positioned
//! glyphs. This crate holds the types every other wordshape crate
//! speaks: runs, glyph records, fonts, the low-level shaper contract,
//! and the cache that keeps shaped words around for next time.
//!
//! ## The Pieces
//!
//! - [`run::TextRun`] - A borrowed view over one line's worth of text
//!   plus its spacing and justification settings
//! - [`font::Font`] - A primary face, its fallbacks, and the feature
//!   flags that decide whether word-by-word shaping is safe
//! - [`traits::Shaper`] - The boundary to the low-level OpenType
//!   shaping engine; one homogeneous sub-range in, glyphs out
//! - [`cache::ShapeCache`] - Word text + font key to a shared,
//!   immutable shape result
//!
//! Everything here is synchronous and borrow-scoped: a shaping request
//! borrows the run and font for its duration and owns nothing past it.

// this_file: crates/wordshape-core/src/lib.rs

pub mod cache;
pub mod error;
pub mod font;
pub mod run;
pub mod traits;

pub use error::{Result, ShapeError};
pub use font::{Font, FontFace, FontFeatures};
pub use run::TextRun;
pub use traits::{ShapeOptions, ShapedGlyph, Shaper};

/// The data structures shared across the shaping crates
pub mod types {
    /// Unique identifier for a glyph within a font
    pub type GlyphId = u32;

    /// Which way the text flows
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Direction {
        LeftToRight,
        RightToLeft,
    }

    impl Direction {
        pub fn is_ltr(self) -> bool {
            self == Direction::LeftToRight
        }

        pub fn is_rtl(self) -> bool {
            self == Direction::RightToLeft
        }
    }

    /// How justification opportunities are chosen
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum TextJustify {
        /// Spaces expand; CJK ideographs gain opportunities on both sides
        #[default]
        Auto,
        /// Only word separators expand
        InterWord,
        /// No expansion at all
        None,
    }

    /// Axis-aligned box in shaped coordinates, y-down
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct FloatRect {
        pub left: f32,
        pub top: f32,
        pub right: f32,
        pub bottom: f32,
    }

    impl FloatRect {
        pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
            Self {
                left,
                top,
                right,
                bottom,
            }
        }

        pub fn width(&self) -> f32 {
            self.right - self.left
        }

        pub fn height(&self) -> f32 {
            self.bottom - self.top
        }

        pub fn is_empty(&self) -> bool {
            self.right <= self.left && self.bottom <= self.top
        }

        /// Grow this box to cover `other` as well
        pub fn unite(&mut self, other: &FloatRect) {
            if other.is_empty() {
                return;
            }
            if self.is_empty() {
                *self = *other;
                return;
            }
            self.left = self.left.min(other.left);
            self.top = self.top.min(other.top);
            self.right = self.right.max(other.right);
            self.bottom = self.bottom.max(other.bottom);
        }

        /// The same box shifted along the x axis
        pub fn translated_x(&self, dx: f32) -> FloatRect {
            FloatRect {
                left: self.left + dx,
                right: self.right + dx,
                ..*self
            }
        }
    }

    /// An x-interval covering some characters, always `start <= end`
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct CharacterRange {
        pub start: f32,
        pub end: f32,
    }

    impl CharacterRange {
        /// Build a range, swapping the endpoints if they arrive reversed
        pub fn new(start: f32, end: f32) -> Self {
            if start <= end {
                Self { start, end }
            } else {
                Self {
                    start: end,
                    end: start,
                }
            }
        }

        pub fn width(&self) -> f32 {
            self.end - self.start
        }
    }
}
