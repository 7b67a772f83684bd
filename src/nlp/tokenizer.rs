//! Morphological segmentation
//!
//! The analyzer is a capability handed to the filter, never a global. Any
//! segmenter that can split Japanese text into tagged tokens with a lemma
//! implements [`Tokenizer`]. [`LexiconTokenizer`] is a self-contained
//! longest-match implementation driven by an in-memory lexicon; the
//! dictionary-backed `VibratoTokenizer` lives behind the `vibrato` feature.

use std::io::BufRead;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::errors::{AnalysisError, Result};
use crate::types::{LexicalCategory, Token};

/// Sub-category assigned to unknown content words.
pub const COMMON_NOUN: &str = "普通名詞";

/// Why a document could not be segmented.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{reason}")]
pub struct SegmentError {
    pub reason: String,
}

impl SegmentError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Splits normalized text into tagged tokens.
///
/// Implementations must segment at a single, deterministic granularity and
/// favour the longest (most merged) tokens. Returning an error marks the
/// document as malformed; the pipeline skips it and carries on.
pub trait Tokenizer: Send + Sync {
    /// Segment one document.
    fn segment(&self, text: &str) -> std::result::Result<Vec<Token>, SegmentError>;
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn segment(&self, text: &str) -> std::result::Result<Vec<Token>, SegmentError> {
        (**self).segment(text)
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for Box<T> {
    fn segment(&self, text: &str) -> std::result::Result<Vec<Token>, SegmentError> {
        (**self).segment(text)
    }
}

/// A lexicon entry: everything the filter needs to know about a surface form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconEntry {
    pub category: LexicalCategory,
    pub subcategory: String,
    pub lemma: String,
}

/// Script class used to group characters the lexicon does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Kanji,
    Hiragana,
    Katakana,
    Alphanumeric,
    Space,
    Other,
}

impl Script {
    fn of(c: char) -> Self {
        match c {
            '\u{3005}' | '\u{3007}' | '\u{3400}'..='\u{4DBF}' | '\u{4E00}'..='\u{9FFF}'
            | '\u{F900}'..='\u{FAFF}' | '\u{20000}'..='\u{2FA1F}' => Script::Kanji,
            '\u{3041}'..='\u{309F}' => Script::Hiragana,
            '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' => Script::Katakana,
            c if c.is_ascii_alphanumeric() => Script::Alphanumeric,
            c if c.is_whitespace() => Script::Space,
            _ => Script::Other,
        }
    }

    fn unknown_tag(self) -> (LexicalCategory, &'static str) {
        match self {
            Script::Kanji | Script::Katakana | Script::Alphanumeric => {
                (LexicalCategory::Noun, COMMON_NOUN)
            }
            Script::Hiragana => (LexicalCategory::Particle, "*"),
            Script::Space => (LexicalCategory::Whitespace, "*"),
            Script::Other => (LexicalCategory::SupplementarySymbol, "*"),
        }
    }
}

/// Greedy longest-match tokenizer over an in-memory lexicon.
///
/// At each position the longest lexicon surface that matches wins. Text the
/// lexicon does not cover is grouped into maximal runs of one script class
/// (kanji, hiragana, katakana, ASCII alphanumerics, other) and tagged as a
/// common noun (kanji, katakana, alphanumerics), a particle (hiragana) or a
/// symbol. Whitespace is dropped.
#[derive(Debug, Clone, Default)]
pub struct LexiconTokenizer {
    entries: FxHashMap<String, LexiconEntry>,
    /// Longest surface in the lexicon, in chars
    max_len: usize,
}

impl LexiconTokenizer {
    /// Create an empty tokenizer (everything is handled as unknown text)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry
    pub fn insert(
        &mut self,
        surface: &str,
        category: LexicalCategory,
        subcategory: &str,
        lemma: &str,
    ) {
        if surface.is_empty() {
            return;
        }
        self.max_len = self.max_len.max(surface.chars().count());
        self.entries.insert(
            surface.to_string(),
            LexiconEntry {
                category,
                subcategory: subcategory.to_string(),
                lemma: lemma.to_string(),
            },
        );
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with_entry(
        mut self,
        surface: &str,
        category: LexicalCategory,
        subcategory: &str,
        lemma: &str,
    ) -> Self {
        self.insert(surface, category, subcategory, lemma);
        self
    }

    /// Load a lexicon from tab-separated lines:
    /// `surface<TAB>category<TAB>subcategory<TAB>lemma`.
    ///
    /// Blank lines and lines starting with `#` are skipped. The category may
    /// be a dictionary label (`名詞`) or an English name (`noun`). An empty
    /// lemma column falls back to the surface.
    pub fn from_tsv<R: BufRead>(reader: R) -> Result<Self> {
        let mut tokenizer = Self::new();
        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.map_err(|e| AnalysisError::Lexicon {
                line: line_no,
                reason: e.to_string(),
            })?;
            let line = line.trim_end_matches(['\r', '\n']);
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let cols: Vec<&str> = line.split('\t').collect();
            if cols.len() < 3 || cols.len() > 4 {
                return Err(AnalysisError::Lexicon {
                    line: line_no,
                    reason: format!("expected 3 or 4 tab-separated columns, found {}", cols.len()),
                });
            }
            let surface = cols[0].trim();
            if surface.is_empty() {
                return Err(AnalysisError::Lexicon {
                    line: line_no,
                    reason: "empty surface form".to_string(),
                });
            }
            let category = LexicalCategory::from_dictionary_label(cols[1].trim());
            let category = match category {
                LexicalCategory::Other(label) => label.parse().unwrap_or_else(|never| match never {}),
                known => known,
            };
            let lemma = cols.get(3).map(|s| s.trim()).filter(|s| !s.is_empty()).unwrap_or(surface);

            tokenizer.insert(surface, category, cols[2].trim(), lemma);
        }
        Ok(tokenizer)
    }

    /// Number of lexicon entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the lexicon is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Longest lexicon entry starting at `start`, returned with its end index.
    fn longest_match(&self, chars: &[(usize, char)], text: &str, start: usize) -> Option<(usize, &LexiconEntry)> {
        let max = self.max_len.min(chars.len() - start);
        (1..=max).rev().find_map(|len| {
            let end = start + len;
            let from = chars[start].0;
            let to = chars.get(end).map_or(text.len(), |&(b, _)| b);
            self.entries.get(&text[from..to]).map(|entry| (end, entry))
        })
    }
}

impl Tokenizer for LexiconTokenizer {
    fn segment(&self, text: &str) -> std::result::Result<Vec<Token>, SegmentError> {
        if text.contains('\u{FFFD}') {
            return Err(SegmentError::new("text contains U+FFFD replacement characters"));
        }

        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let byte_at = |i: usize| chars.get(i).map_or(text.len(), |&(b, _)| b);
        let mut tokens = Vec::new();

        let mut i = 0;
        while i < chars.len() {
            if let Some((end, entry)) = self.longest_match(&chars, text, i) {
                tokens.push(Token::new(
                    &text[byte_at(i)..byte_at(end)],
                    entry.category.clone(),
                    entry.subcategory.clone(),
                    entry.lemma.clone(),
                ));
                i = end;
                continue;
            }

            // Unknown run: extend while the script class holds and no entry starts
            let script = Script::of(chars[i].1);
            let mut end = i + 1;
            while end < chars.len()
                && Script::of(chars[end].1) == script
                && self.longest_match(&chars, text, end).is_none()
            {
                end += 1;
            }

            if script != Script::Space {
                let surface = &text[byte_at(i)..byte_at(end)];
                let (category, subcategory) = script.unknown_tag();
                tokens.push(Token::new(surface, category, subcategory, surface));
            }
            i = end;
        }

        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> LexiconTokenizer {
        LexiconTokenizer::new()
            .with_entry("猫", LexicalCategory::Noun, COMMON_NOUN, "猫")
            .with_entry("が", LexicalCategory::Particle, "格助詞", "が")
            .with_entry("走る", LexicalCategory::Verb, "一般", "走る")
            .with_entry("走っ", LexicalCategory::Verb, "一般", "走る")
            .with_entry("た", LexicalCategory::AuxiliaryVerb, "*", "た")
            .with_entry("機械", LexicalCategory::Noun, COMMON_NOUN, "機械")
            .with_entry("機械学習", LexicalCategory::Noun, COMMON_NOUN, "機械学習")
    }

    fn lemmas(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.lemma.as_str()).collect()
    }

    #[test]
    fn test_lexicon_segmentation() {
        let tokens = lexicon().segment("猫が走る").unwrap();
        assert_eq!(lemmas(&tokens), vec!["猫", "が", "走る"]);
        assert_eq!(tokens[2].category, LexicalCategory::Verb);
    }

    #[test]
    fn test_conjugated_surface_maps_to_lemma() {
        let tokens = lexicon().segment("猫が走った").unwrap();
        assert_eq!(tokens[2].surface, "走っ");
        assert_eq!(tokens[2].lemma, "走る");
        assert_eq!(tokens[3].category, LexicalCategory::AuxiliaryVerb);
    }

    #[test]
    fn test_longest_match_wins() {
        let tokens = lexicon().segment("機械学習").unwrap();
        assert_eq!(lemmas(&tokens), vec!["機械学習"]);
    }

    #[test]
    fn test_unknown_runs_grouped_by_script() {
        let tokens = lexicon().segment("東京都でrust2024").unwrap();
        assert_eq!(lemmas(&tokens), vec!["東京都", "で", "rust2024"]);
        assert_eq!(tokens[0].category, LexicalCategory::Noun);
        assert_eq!(tokens[1].category, LexicalCategory::Particle);
        assert_eq!(tokens[2].category, LexicalCategory::Noun);
    }

    #[test]
    fn test_unknown_run_stops_at_known_entry() {
        // "犬" is unknown but "猫" is in the lexicon
        let tokens = lexicon().segment("犬猫").unwrap();
        assert_eq!(lemmas(&tokens), vec!["犬", "猫"]);
    }

    #[test]
    fn test_whitespace_dropped() {
        let tokens = lexicon().segment("machine learning").unwrap();
        assert_eq!(lemmas(&tokens), vec!["machine", "learning"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(lexicon().segment("").unwrap().is_empty());
    }

    #[test]
    fn test_replacement_character_is_malformed() {
        let err = lexicon().segment("猫\u{FFFD}").unwrap_err();
        assert!(err.reason.contains("U+FFFD"));
    }

    #[test]
    fn test_from_tsv() {
        let tsv = "# surface\tcategory\tsubcategory\tlemma\n\
                   猫\t名詞\t普通名詞\t猫\n\
                   走っ\tverb\t一般\t走る\n\
                   \n\
                   できる\t動詞\t非自立可能\n";
        let tokenizer = LexiconTokenizer::from_tsv(tsv.as_bytes()).unwrap();
        assert_eq!(tokenizer.len(), 3);

        let tokens = tokenizer.segment("猫走っできる").unwrap();
        assert_eq!(lemmas(&tokens), vec!["猫", "走る", "できる"]);
        assert_eq!(tokens[2].subcategory, "非自立可能");
    }

    #[test]
    fn test_from_tsv_reports_bad_line() {
        let tsv = "猫\t名詞\t普通名詞\t猫\nbroken line\n";
        match LexiconTokenizer::from_tsv(tsv.as_bytes()) {
            Err(AnalysisError::Lexicon { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected lexicon error, got {other:?}"),
        }
    }

    #[test]
    fn test_tokenizer_as_trait_object() {
        let boxed: Box<dyn Tokenizer> = Box::new(lexicon());
        assert_eq!(boxed.segment("猫").unwrap().len(), 1);
    }
}
