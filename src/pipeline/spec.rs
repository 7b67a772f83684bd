//! Analysis specification types.
//!
//! An [`AnalysisSpec`] is the JSON form of an [`AnalysisConfig`]: a preset
//! to start from plus optional overrides. Specs are checked by the
//! [`super::validation::ValidationEngine`] and only then resolved, so a bad
//! spec fails before any document is processed.
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "v": 1,
//!   "preset": "cooccurrence",
//!   "keep_categories": ["noun"],
//!   "excluded_subcategory": "非自立可能",
//!   "extra_stopwords": ["弊社"],
//!   "frequency_top_n": 30,
//!   "pair_top_k": 200,
//!   "strict": false
//! }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::validation::ValidationEngine;
use crate::errors::{AnalysisError, Result};
use crate::nlp::stopwords::StopwordFilter;
use crate::types::{AnalysisConfig, LexicalCategory};

/// Current spec version
pub const SPEC_VERSION: u32 = 1;

/// Known preset names
pub const PRESETS: &[&str] = &["word_frequency", "cooccurrence"];

/// Top-level analysis specification (v1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSpec {
    /// Spec version (currently `1`).
    pub v: u32,

    /// Preset used as a starting point: `"word_frequency"` (default) or
    /// `"cooccurrence"`.
    #[serde(default)]
    pub preset: Option<String>,

    /// Lexical categories to keep, by English name or dictionary label.
    #[serde(default)]
    pub keep_categories: Option<Vec<String>>,

    /// Verb sub-category to reject. An empty string disables the rule.
    #[serde(default)]
    pub excluded_subcategory: Option<String>,

    /// Replaces the preset's stopword list when present.
    #[serde(default)]
    pub stopwords: Option<Vec<String>>,

    /// Added on top of the (preset or replaced) stopword list.
    #[serde(default)]
    pub extra_stopwords: Vec<String>,

    /// Ranking size; signed so negative input is reported, not rejected by
    /// the parser.
    #[serde(default)]
    pub frequency_top_n: Option<i64>,

    /// Number of pairs kept for the graph.
    #[serde(default)]
    pub pair_top_k: Option<i64>,

    /// If `true`, unrecognized fields are errors; if `false`, warnings.
    #[serde(default)]
    pub strict: bool,

    /// Captures any fields not recognized by the schema.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl Default for AnalysisSpec {
    fn default() -> Self {
        Self {
            v: SPEC_VERSION,
            preset: None,
            keep_categories: None,
            excluded_subcategory: None,
            stopwords: None,
            extra_stopwords: Vec::new(),
            frequency_top_n: None,
            pair_top_k: None,
            strict: false,
            unknown_fields: HashMap::new(),
        }
    }
}

impl AnalysisSpec {
    /// Parse a spec from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate with the default rules and build the configuration.
    ///
    /// Any error diagnostic aborts with [`AnalysisError::Configuration`];
    /// warnings are logged and resolution continues.
    pub fn resolve(&self) -> Result<AnalysisConfig> {
        let report = ValidationEngine::with_defaults().validate(self);
        for warning in report.warnings() {
            tracing::warn!(%warning, "analysis spec warning");
        }
        if report.has_errors() {
            return Err(AnalysisError::Configuration { report });
        }
        Ok(self.build_config())
    }

    /// Apply overrides to the preset. Assumes the spec has been validated.
    fn build_config(&self) -> AnalysisConfig {
        let mut cfg = match self.preset.as_deref() {
            Some("cooccurrence") => AnalysisConfig::cooccurrence(),
            _ => AnalysisConfig::word_frequency(),
        };

        if let Some(categories) = &self.keep_categories {
            cfg = cfg.with_keep_categories(
                categories
                    .iter()
                    .map(|c| c.parse::<LexicalCategory>().unwrap_or_else(|never| match never {})),
            );
        }
        if let Some(sub) = &self.excluded_subcategory {
            let sub = sub.trim();
            cfg = cfg.with_excluded_subcategory((!sub.is_empty()).then_some(sub));
        }
        if let Some(words) = &self.stopwords {
            cfg = cfg.with_stopwords(words.iter().collect::<StopwordFilter>());
        }
        cfg = cfg.with_extra_stopwords(&self.extra_stopwords);

        if let Some(n) = self.frequency_top_n.and_then(|n| usize::try_from(n).ok()) {
            cfg = cfg.with_frequency_top_n(n);
        }
        if let Some(k) = self.pair_top_k.and_then(|k| usize::try_from(k).ok()) {
            cfg = cfg.with_pair_top_k(k);
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CHART_TOP_N, DEFAULT_PAIR_TOP_K};

    #[test]
    fn test_deserialize_minimal_spec() {
        let spec = AnalysisSpec::from_json(r#"{ "v": 1 }"#).unwrap();
        assert_eq!(spec.v, 1);
        assert!(spec.preset.is_none());
        assert!(!spec.strict);
    }

    #[test]
    fn test_minimal_spec_resolves_to_word_frequency() {
        let cfg = AnalysisSpec::default().resolve().unwrap();
        assert_eq!(cfg.keep_categories.len(), 3);
        assert_eq!(cfg.frequency_top_n, CHART_TOP_N);
        assert_eq!(cfg.pair_top_k, DEFAULT_PAIR_TOP_K);
    }

    #[test]
    fn test_full_spec() {
        let spec = AnalysisSpec::from_json(
            r#"{
                "v": 1,
                "preset": "cooccurrence",
                "keep_categories": ["noun", "形容詞"],
                "excluded_subcategory": "",
                "extra_stopwords": ["弊社"],
                "frequency_top_n": 10,
                "pair_top_k": 50,
                "strict": true
            }"#,
        )
        .unwrap();
        let cfg = spec.resolve().unwrap();

        assert!(cfg.keep_categories.contains(&LexicalCategory::Noun));
        assert!(cfg.keep_categories.contains(&LexicalCategory::Adjective));
        assert!(cfg.excluded_subcategory.is_none());
        assert!(cfg.stopwords.is_stopword("弊社"));
        assert!(cfg.stopwords.is_stopword("株式会社"));
        assert_eq!(cfg.frequency_top_n, 10);
        assert_eq!(cfg.pair_top_k, 50);
    }

    #[test]
    fn test_stopwords_replace_preset_list() {
        let spec = AnalysisSpec::from_json(
            r#"{ "v": 1, "stopwords": ["猫"], "extra_stopwords": ["犬"] }"#,
        )
        .unwrap();
        let cfg = spec.resolve().unwrap();

        assert!(cfg.stopwords.is_stopword("猫"));
        assert!(cfg.stopwords.is_stopword("犬"));
        assert!(!cfg.stopwords.is_stopword("こと"));
    }

    #[test]
    fn test_negative_limit_is_configuration_error() {
        let spec = AnalysisSpec::from_json(r#"{ "v": 1, "pair_top_k": -5 }"#).unwrap();
        match spec.resolve() {
            Err(AnalysisError::Configuration { report }) => {
                assert!(report.errors().any(|e| e.path == "/pair_top_k"));
            }
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_fields_captured() {
        let spec = AnalysisSpec::from_json(r#"{ "v": 1, "bogus_top_level": 42 }"#).unwrap();
        assert!(spec.unknown_fields.contains_key("bogus_top_level"));
        // Non-strict: only a warning
        assert!(spec.resolve().is_ok());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            AnalysisSpec::from_json("{ \"v\": "),
            Err(AnalysisError::InvalidSpec(_))
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = r#"{"v":1,"preset":"cooccurrence","pair_top_k":100}"#;
        let spec = AnalysisSpec::from_json(json).unwrap();
        let back = serde_json::to_value(&spec).unwrap();
        assert_eq!(back["preset"], "cooccurrence");
        assert_eq!(back["pair_top_k"], 100);
    }
}
