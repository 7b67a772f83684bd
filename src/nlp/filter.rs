//! Morphological filtering
//!
//! Reduces a document to the lemmas of its content-bearing tokens. Checks
//! run in a fixed order:
//!
//! 1. verb + excluded sub-category (dependent verb forms) → drop
//! 2. category not in the keep-set → drop
//! 3. single trivial character (kana, `ー`, ASCII digit or lowercase letter) → drop
//! 4. stopword → drop
//!
//! Survivors are emitted as lemmas in document order.

use crate::nlp::normalize::Normalizer;
use crate::nlp::tokenizer::{SegmentError, Tokenizer};
use crate::types::{AnalysisConfig, LexicalCategory, Token};

/// Why a token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    DependentVerb,
    Category,
    TrivialCharacter,
    Stopword,
}

/// Whether a lemma is exactly one "trivial" character.
///
/// Trivial characters are hiragana (ぁ-ん), katakana (ァ-ヶ), the prolonged
/// sound mark, ASCII digits and ASCII lowercase letters. Single ideographs
/// such as `猫` are not trivial.
pub fn is_trivial_single_char(lemma: &str) -> bool {
    let mut chars = lemma.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => matches!(c,
            'ぁ'..='ん' | 'ァ'..='ヶ' | 'ー' | '0'..='9' | 'a'..='z'
        ),
        _ => false,
    }
}

/// Token filter driven by an [`AnalysisConfig`].
///
/// Borrows the configuration, so one filter per run costs nothing and
/// concurrent runs never share mutable state.
#[derive(Debug, Clone, Copy)]
pub struct MorphologicalFilter<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> MorphologicalFilter<'a> {
    /// Create a filter for the given configuration
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    /// Decide whether a single token survives
    pub fn check(&self, token: &Token) -> Result<(), Rejection> {
        if token.category == LexicalCategory::Verb
            && self
                .config
                .excluded_subcategory
                .as_deref()
                .is_some_and(|excluded| excluded == token.subcategory)
        {
            return Err(Rejection::DependentVerb);
        }
        if !self.config.keep_categories.contains(&token.category) {
            return Err(Rejection::Category);
        }
        if is_trivial_single_char(&token.lemma) {
            return Err(Rejection::TrivialCharacter);
        }
        if self.config.stopwords.is_stopword(&token.lemma) {
            return Err(Rejection::Stopword);
        }
        Ok(())
    }

    /// Keep the lemmas of surviving tokens, in order
    pub fn filter_tokens(&self, tokens: &[Token]) -> Vec<String> {
        tokens
            .iter()
            .filter(|t| self.check(t).is_ok())
            .map(|t| t.lemma.clone())
            .collect()
    }

    /// Segment an already-normalized document and filter its tokens
    pub fn filter_text<T: Tokenizer + ?Sized>(
        &self,
        tokenizer: &T,
        normalized: &str,
    ) -> Result<Vec<String>, SegmentError> {
        if normalized.is_empty() {
            return Ok(Vec::new());
        }
        let tokens = tokenizer.segment(normalized)?;
        Ok(self.filter_tokens(&tokens))
    }

    /// Normalize, segment and filter one raw document
    pub fn process<N, T>(
        &self,
        normalizer: &N,
        tokenizer: &T,
        raw: &str,
    ) -> Result<Vec<String>, SegmentError>
    where
        N: Normalizer + ?Sized,
        T: Tokenizer + ?Sized,
    {
        let normalized = normalizer.normalize(raw);
        self.filter_text(tokenizer, &normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::normalize::NeologdNormalizer;
    use crate::nlp::stopwords::StopwordFilter;
    use crate::nlp::tokenizer::{LexiconTokenizer, COMMON_NOUN};
    use crate::types::NON_AUTONOMOUS;

    fn noun(lemma: &str) -> Token {
        Token::new(lemma, LexicalCategory::Noun, COMMON_NOUN, lemma)
    }

    fn verb(surface: &str, sub: &str, lemma: &str) -> Token {
        Token::new(surface, LexicalCategory::Verb, sub, lemma)
    }

    fn config() -> AnalysisConfig {
        AnalysisConfig::word_frequency()
    }

    #[test]
    fn test_trivial_single_chars() {
        for lemma in ["あ", "ん", "ア", "ヶ", "ー", "7", "x"] {
            assert!(is_trivial_single_char(lemma), "{lemma} should be trivial");
        }
        for lemma in ["猫", "X", "ab", "ねこ", "", "%"] {
            assert!(!is_trivial_single_char(lemma), "{lemma} should not be trivial");
        }
    }

    #[test]
    fn test_single_kanji_survives_single_kana_dropped() {
        let cfg = config();
        let filter = MorphologicalFilter::new(&cfg);

        assert_eq!(filter.check(&noun("猫")), Ok(()));
        assert_eq!(filter.check(&noun("あ")), Err(Rejection::TrivialCharacter));
    }

    #[test]
    fn test_dependent_verb_rejected_before_category() {
        let cfg = config();
        let filter = MorphologicalFilter::new(&cfg);

        assert_eq!(
            filter.check(&verb("できる", NON_AUTONOMOUS, "出来る")),
            Err(Rejection::DependentVerb)
        );
        assert_eq!(filter.check(&verb("走る", "一般", "走る")), Ok(()));
    }

    #[test]
    fn test_excluded_subcategory_only_applies_to_verbs() {
        let cfg = config();
        let filter = MorphologicalFilter::new(&cfg);

        let dependent_noun = Token::new("ため", LexicalCategory::Noun, NON_AUTONOMOUS, "為");
        // Rejected by the stopword list, not by the verb rule
        assert_eq!(filter.check(&dependent_noun), Err(Rejection::Stopword));

        let other = Token::new("事柄", LexicalCategory::Noun, NON_AUTONOMOUS, "事柄");
        assert_eq!(filter.check(&other), Ok(()));
    }

    #[test]
    fn test_no_excluded_subcategory() {
        let cfg = config().with_excluded_subcategory(None);
        let filter = MorphologicalFilter::new(&cfg);
        assert_eq!(filter.check(&verb("できる", NON_AUTONOMOUS, "出来る")), Ok(()));
    }

    #[test]
    fn test_category_filter() {
        let cfg = AnalysisConfig::cooccurrence();
        let filter = MorphologicalFilter::new(&cfg);

        assert_eq!(filter.check(&verb("走る", "一般", "走る")), Err(Rejection::Category));
        let particle = Token::new("が", LexicalCategory::Particle, "格助詞", "が");
        assert_eq!(filter.check(&particle), Err(Rejection::Category));
    }

    #[test]
    fn test_stopwords() {
        let cfg = config().with_stopwords(StopwordFilter::from_list(&["猫"]));
        let filter = MorphologicalFilter::new(&cfg);

        assert_eq!(filter.check(&noun("猫")), Err(Rejection::Stopword));
        assert_eq!(filter.check(&noun("こと")), Ok(()));
    }

    #[test]
    fn test_mixed_script_stopword_from_dictionary() {
        let cfg = config().with_stopwords(StopwordFilter::from_list(&["Tシャツ"]));
        let filter = MorphologicalFilter::new(&cfg);

        assert_eq!(filter.check(&noun("Tシャツ")), Err(Rejection::Stopword));
        assert_eq!(filter.check(&noun("tシャツ")), Err(Rejection::Stopword));
    }

    #[test]
    fn test_filter_preserves_order_and_duplicates() {
        let cfg = config();
        let filter = MorphologicalFilter::new(&cfg);
        let tokens = vec![
            noun("猫"),
            Token::new("が", LexicalCategory::Particle, "格助詞", "が"),
            noun("犬"),
            noun("猫"),
        ];
        assert_eq!(filter.filter_tokens(&tokens), vec!["猫", "犬", "猫"]);
    }

    #[test]
    fn test_process_is_deterministic() {
        let cfg = config();
        let filter = MorphologicalFilter::new(&cfg);
        let tokenizer = LexiconTokenizer::new()
            .with_entry("猫", LexicalCategory::Noun, COMMON_NOUN, "猫")
            .with_entry("が", LexicalCategory::Particle, "格助詞", "が")
            .with_entry("走る", LexicalCategory::Verb, "一般", "走る");

        let first = filter.process(&NeologdNormalizer, &tokenizer, "猫 が 走る").unwrap();
        let second = filter.process(&NeologdNormalizer, &tokenizer, "猫 が 走る").unwrap();
        assert_eq!(first, vec!["猫", "走る"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_document() {
        let cfg = config();
        let filter = MorphologicalFilter::new(&cfg);
        let lemmas = filter
            .process(&NeologdNormalizer, &LexiconTokenizer::new(), "   ")
            .unwrap();
        assert!(lemmas.is_empty());
    }
}
