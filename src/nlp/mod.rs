//! Natural Language Processing components
//!
//! This module provides normalization, tokenization, stopword lists and the
//! morphological filter that turns raw text into lemma streams.

pub mod filter;
pub mod normalize;
pub mod stopwords;
pub mod tokenizer;
#[cfg(feature = "vibrato")]
pub mod vibrato;
