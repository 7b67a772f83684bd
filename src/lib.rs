//! # kotoba_graph
//!
//! Term-frequency statistics and co-occurrence networks for Japanese text.
//!
//! A batch of documents is normalized, segmented into morphemes and reduced
//! to content-word lemmas. From those lemma streams the crate builds:
//!
//! - a frequency ranking over the whole corpus
//! - the top-K lemma pairs by number of documents they share
//! - an undirected co-occurrence graph with isolated pairs pruned and node
//!   strength (weighted degree) attached
//!
//! ## Example
//!
//! ```rust
//! use kotoba_graph::{AnalysisConfig, LexiconTokenizer, LexicalCategory, NoopObserver, Pipeline};
//!
//! let tokenizer = LexiconTokenizer::new()
//!     .with_entry("走る", LexicalCategory::Verb, "一般", "走る");
//! let cfg = AnalysisConfig::word_frequency();
//! let result = Pipeline::new(tokenizer)
//!     .run(&["猫が走る", "犬が走る"], &cfg, &mut NoopObserver)
//!     .unwrap();
//!
//! assert_eq!(result.frequency.count("走る"), 2);
//! ```

pub mod errors;
pub mod graph;
pub mod nlp;
pub mod pipeline;
pub mod stats;
pub mod types;

pub use errors::{AnalysisError, Result};
pub use graph::cooccurrence::{CooccurrenceGraph, GraphEdge, GraphNode};
pub use nlp::normalize::{NeologdNormalizer, NoopNormalizer, Normalizer};
pub use nlp::stopwords::{parse_stopword_list, StopwordFilter};
pub use nlp::tokenizer::{LexiconTokenizer, Tokenizer};
#[cfg(feature = "vibrato")]
pub use nlp::vibrato::{FeatureLayout, VibratoTokenizer};
pub use pipeline::artifacts::{AnalysisResult, FilteredCorpus};
pub use pipeline::observer::{NoopObserver, PipelineObserver, StageTimingObserver};
pub use pipeline::runner::Pipeline;
pub use pipeline::spec::AnalysisSpec;
pub use stats::frequency::{FrequencyTable, RankedTerm};
pub use stats::pairs::LemmaPair;
pub use types::{AnalysisConfig, LexicalCategory, Token};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
