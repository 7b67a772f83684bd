//! Core types shared across the analysis pipeline.

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::errors::{AnalysisError, Result};
use crate::nlp::stopwords::StopwordFilter;

/// Number of rows in a tabular frequency summary.
pub const TABLE_TOP_N: usize = 10;

/// Number of terms shown in frequency charts and word clouds.
pub const CHART_TOP_N: usize = 30;

/// Number of co-occurrence pairs kept for graph construction.
pub const DEFAULT_PAIR_TOP_K: usize = 200;

/// Sub-category that marks dependent ("non-autonomous") verb forms.
pub const NON_AUTONOMOUS: &str = "非自立可能";

/// Top-level lexical category (part of speech) of a token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LexicalCategory {
    Noun,
    Pronoun,
    Verb,
    Adjective,
    AdjectivalNoun,
    Adverb,
    Adnominal,
    Conjunction,
    Interjection,
    Particle,
    AuxiliaryVerb,
    Prefix,
    Suffix,
    Symbol,
    SupplementarySymbol,
    Whitespace,
    /// Any label the dictionary emits that is not listed above
    Other(String),
}

impl LexicalCategory {
    /// Map a dictionary label (UniDic / IPADIC) to a category.
    ///
    /// Unrecognized labels are kept verbatim as [`LexicalCategory::Other`].
    pub fn from_dictionary_label(label: &str) -> Self {
        match label {
            "名詞" => Self::Noun,
            "代名詞" => Self::Pronoun,
            "動詞" => Self::Verb,
            "形容詞" => Self::Adjective,
            "形状詞" | "形容動詞" => Self::AdjectivalNoun,
            "副詞" => Self::Adverb,
            "連体詞" => Self::Adnominal,
            "接続詞" => Self::Conjunction,
            "感動詞" => Self::Interjection,
            "助詞" => Self::Particle,
            "助動詞" => Self::AuxiliaryVerb,
            "接頭辞" | "接頭詞" => Self::Prefix,
            "接尾辞" => Self::Suffix,
            "記号" => Self::Symbol,
            "補助記号" => Self::SupplementarySymbol,
            "空白" => Self::Whitespace,
            other => Self::Other(other.to_string()),
        }
    }

    /// The snake_case name used in JSON specs and results.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Noun => "noun",
            Self::Pronoun => "pronoun",
            Self::Verb => "verb",
            Self::Adjective => "adjective",
            Self::AdjectivalNoun => "adjectival_noun",
            Self::Adverb => "adverb",
            Self::Adnominal => "adnominal",
            Self::Conjunction => "conjunction",
            Self::Interjection => "interjection",
            Self::Particle => "particle",
            Self::AuxiliaryVerb => "auxiliary_verb",
            Self::Prefix => "prefix",
            Self::Suffix => "suffix",
            Self::Symbol => "symbol",
            Self::SupplementarySymbol => "supplementary_symbol",
            Self::Whitespace => "whitespace",
            Self::Other(label) => label,
        }
    }
}

impl FromStr for LexicalCategory {
    type Err = std::convert::Infallible;

    /// Accepts either the English name or a dictionary label.
    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let parsed = match value.trim().to_lowercase().as_str() {
            "noun" => Self::Noun,
            "pronoun" => Self::Pronoun,
            "verb" => Self::Verb,
            "adjective" => Self::Adjective,
            "adjectival_noun" => Self::AdjectivalNoun,
            "adverb" => Self::Adverb,
            "adnominal" => Self::Adnominal,
            "conjunction" => Self::Conjunction,
            "interjection" => Self::Interjection,
            "particle" => Self::Particle,
            "auxiliary_verb" => Self::AuxiliaryVerb,
            "prefix" => Self::Prefix,
            "suffix" => Self::Suffix,
            "symbol" => Self::Symbol,
            "supplementary_symbol" => Self::SupplementarySymbol,
            "whitespace" => Self::Whitespace,
            _ => Self::from_dictionary_label(value.trim()),
        };
        Ok(parsed)
    }
}

impl fmt::Display for LexicalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LexicalCategory {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LexicalCategory {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_else(|never| match never {}))
    }
}

/// A token produced by morphological analysis of one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Surface form as it appears in the (normalized) text
    pub surface: String,
    /// Top-level lexical category
    pub category: LexicalCategory,
    /// First sub-category label ("*" or empty when the dictionary has none)
    pub subcategory: String,
    /// Dictionary (lemma) form
    pub lemma: String,
}

impl Token {
    /// Create a new token
    pub fn new(
        surface: impl Into<String>,
        category: LexicalCategory,
        subcategory: impl Into<String>,
        lemma: impl Into<String>,
    ) -> Self {
        Self {
            surface: surface.into(),
            category,
            subcategory: subcategory.into(),
            lemma: lemma.into(),
        }
    }
}

/// Configuration for one analysis run.
///
/// Immutable once built; every pipeline invocation receives its own copy, so
/// concurrent runs with different settings never interfere.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Categories whose tokens survive filtering
    pub keep_categories: FxHashSet<LexicalCategory>,
    /// Sub-category that rejects a verb when present
    pub excluded_subcategory: Option<String>,
    /// Exact-match lemma stopwords (built-in list plus user extras)
    pub stopwords: StopwordFilter,
    /// Number of terms in the frequency ranking
    pub frequency_top_n: usize,
    /// Number of co-occurrence pairs kept for the graph
    pub pair_top_k: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::word_frequency()
    }
}

impl AnalysisConfig {
    /// Settings used for word-frequency charts and word clouds over tabular
    /// text: nouns, verbs and adjectives.
    pub fn word_frequency() -> Self {
        Self {
            keep_categories: [
                LexicalCategory::Noun,
                LexicalCategory::Verb,
                LexicalCategory::Adjective,
            ]
            .into_iter()
            .collect(),
            excluded_subcategory: Some(NON_AUTONOMOUS.to_string()),
            stopwords: StopwordFilter::frequency_defaults(),
            frequency_top_n: CHART_TOP_N,
            pair_top_k: DEFAULT_PAIR_TOP_K,
        }
    }

    /// Settings used for co-occurrence networks over scraped articles:
    /// nouns only, with a press-release oriented stopword list.
    pub fn cooccurrence() -> Self {
        Self {
            keep_categories: std::iter::once(LexicalCategory::Noun).collect(),
            excluded_subcategory: Some(NON_AUTONOMOUS.to_string()),
            stopwords: StopwordFilter::cooccurrence_defaults(),
            frequency_top_n: CHART_TOP_N,
            pair_top_k: DEFAULT_PAIR_TOP_K,
        }
    }

    /// Replace the kept categories
    pub fn with_keep_categories(
        mut self,
        categories: impl IntoIterator<Item = LexicalCategory>,
    ) -> Self {
        self.keep_categories = categories.into_iter().collect();
        self
    }

    /// Set or clear the excluded verb sub-category
    pub fn with_excluded_subcategory(mut self, subcategory: Option<&str>) -> Self {
        self.excluded_subcategory = subcategory.map(str::to_string);
        self
    }

    /// Replace the stopword filter
    pub fn with_stopwords(mut self, stopwords: StopwordFilter) -> Self {
        self.stopwords = stopwords;
        self
    }

    /// Add user-supplied stopwords on top of the current list
    pub fn with_extra_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stopwords.extend(words);
        self
    }

    /// Set the frequency ranking size
    pub fn with_frequency_top_n(mut self, n: usize) -> Self {
        self.frequency_top_n = n;
        self
    }

    /// Set the number of pairs kept for the graph
    pub fn with_pair_top_k(mut self, k: usize) -> Self {
        self.pair_top_k = k;
        self
    }

    /// Check the configuration before any document is processed.
    ///
    /// Sizes are unsigned here, so the only hard failure left for configs
    /// built in code is an empty category keep-set.
    pub fn validate(&self) -> Result<()> {
        if self.keep_categories.is_empty() {
            return Err(AnalysisError::configuration(
                "/keep_categories",
                "at least one lexical category must be kept",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_dictionary_label() {
        assert_eq!(LexicalCategory::from_dictionary_label("名詞"), LexicalCategory::Noun);
        assert_eq!(LexicalCategory::from_dictionary_label("動詞"), LexicalCategory::Verb);
        assert_eq!(
            LexicalCategory::from_dictionary_label("形容動詞"),
            LexicalCategory::AdjectivalNoun
        );
        assert_eq!(
            LexicalCategory::from_dictionary_label("フィラー"),
            LexicalCategory::Other("フィラー".to_string())
        );
    }

    #[test]
    fn test_category_parses_english_and_japanese() {
        let english: LexicalCategory = "Verb".parse().unwrap();
        let japanese: LexicalCategory = "動詞".parse().unwrap();
        assert_eq!(english, japanese);
        assert_eq!(english.to_string(), "verb");
    }

    #[test]
    fn test_category_serde_uses_english_name() {
        let json = serde_json::to_string(&LexicalCategory::AuxiliaryVerb).unwrap();
        assert_eq!(json, "\"auxiliary_verb\"");

        let back: LexicalCategory = serde_json::from_str("\"形容詞\"").unwrap();
        assert_eq!(back, LexicalCategory::Adjective);
    }

    #[test]
    fn test_presets() {
        let freq = AnalysisConfig::word_frequency();
        assert_eq!(freq.keep_categories.len(), 3);
        assert!(freq.stopwords.is_stopword("こと"));
        assert_eq!(freq.frequency_top_n, CHART_TOP_N);

        let cooc = AnalysisConfig::cooccurrence();
        assert!(cooc.keep_categories.contains(&LexicalCategory::Noun));
        assert!(!cooc.keep_categories.contains(&LexicalCategory::Verb));
        assert!(cooc.stopwords.is_stopword("株式会社"));
        assert_eq!(cooc.pair_top_k, DEFAULT_PAIR_TOP_K);
    }

    #[test]
    fn test_extra_stopwords_are_unioned() {
        let cfg = AnalysisConfig::word_frequency().with_extra_stopwords(["猫", "犬"]);
        assert!(cfg.stopwords.is_stopword("猫"));
        assert!(cfg.stopwords.is_stopword("こと"));
    }

    #[test]
    fn test_empty_keep_set_is_rejected() {
        let cfg = AnalysisConfig::default().with_keep_categories(std::iter::empty());
        assert!(matches!(cfg.validate(), Err(AnalysisError::Configuration { .. })));
        assert!(AnalysisConfig::default().validate().is_ok());
    }
}
