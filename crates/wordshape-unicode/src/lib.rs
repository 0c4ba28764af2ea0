//! Unicode-aware word segmentation for the shaping engine.
//!
//! Two things live here: the character classification the segmenter and
//! the spacing engine share ([`character`]), and the forward-only
//! iterator that splits a text run into atomic, independently cacheable
//! shaping units ([`segmenter`]).

// this_file: crates/wordshape-unicode/src/lib.rs

pub mod character;
pub mod segmenter;

pub use character::{
    expansion_opportunity_count, is_space_for_spacing, treat_as_space, treat_as_zero_width_space,
    CharClasses,
    ZERO_WIDTH_JOINER,
};
pub use segmenter::{Segment, WordIterator};
