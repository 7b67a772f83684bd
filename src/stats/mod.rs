//! Counting over filtered lemma streams
//!
//! Term frequencies over the flattened corpus and pair co-occurrence counts
//! over per-document lemma sets.

pub mod frequency;
pub mod pairs;
