//! Wordshape: word-level text shaping with a cache in the middle
//!
//! Shaping text is expensive and text repeats itself, so this crate
//! shapes one word at a time and remembers each word's result. A
//! request flows through four stages:
//!
//! 1. The segmenter (in `wordshape-unicode`) splits the run into atomic
//!    words: space-delimited stretches, one CJK ideograph each, emoji
//!    sequences kept whole.
//! 2. The [`WordShaper`] resolves each word through the [`ShapeCache`],
//!    calling the low-level [`Shaper`](wordshape_core::Shaper) only on
//!    a miss.
//! 3. Letter-spacing, word-spacing, and justification are applied by
//!    [`ShapeResultSpacing`] to a private copy of each word, never to
//!    the cached original.
//! 4. The per-word results collect into a [`ShapeResultBuffer`], which
//!    answers the aggregate queries: width, glyph positions, caret
//!    mapping, character extents.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use wordshape::{ShapeCache, WordShaper};
//! use wordshape_core::run::to_utf16;
//! use wordshape_core::types::Direction;
//! use wordshape_core::TextRun;
//! # fn font() -> wordshape_core::Font { unimplemented!() }
//! # fn backend() -> Arc<dyn wordshape_core::Shaper> { unimplemented!() }
//!
//! let shaper = WordShaper::new(backend(), Arc::new(ShapeCache::new()));
//! let text = to_utf16("Hello, world");
//! let run = TextRun::new(&text, Direction::LeftToRight);
//! let width = shaper.width(&font(), &run, None, None)?;
//! # Ok::<(), wordshape_core::ShapeError>(())
//! ```

// this_file: crates/wordshape/src/lib.rs

pub mod buffer;
pub mod glyph_buffer;
pub mod result;
pub mod spacing;
pub mod word_shaper;

pub use buffer::ShapeResultBuffer;
pub use glyph_buffer::{GlyphBuffer, GlyphBufferEntry};
pub use result::{GlyphData, RunInfo, ShapeResult};
pub use spacing::ShapeResultSpacing;
pub use word_shaper::{EmphasisMarkMetrics, WordShaper};

use std::sync::Arc;

/// The word cache: word text + font key to a shared, immutable result
pub type ShapeCache = wordshape_core::cache::ShapeCache<Arc<ShapeResult>>;

#[cfg(test)]
pub(crate) mod test_support;
