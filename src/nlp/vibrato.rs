//! Dictionary-backed tokenizer on top of the `vibrato` Viterbi analyzer.
//!
//! Vibrato reads MeCab-format system dictionaries (IPADIC, UniDic). The
//! feature string of each token is a comma-separated record whose column
//! layout depends on the dictionary, so [`FeatureLayout`] says where the
//! category, sub-category and lemma live.

use std::io::Read;

use crate::errors::{AnalysisError, Result};
use crate::nlp::tokenizer::{SegmentError, Tokenizer};
use crate::types::{LexicalCategory, Token};

/// Column positions inside a dictionary feature string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureLayout {
    pub category: usize,
    pub subcategory: usize,
    pub lemma: usize,
}

impl FeatureLayout {
    /// IPADIC: `品詞,細分類1,細分類2,細分類3,活用型,活用形,原形,読み,発音`
    pub const fn ipadic() -> Self {
        Self {
            category: 0,
            subcategory: 1,
            lemma: 6,
        }
    }

    /// UniDic (cwj): `pos1,pos2,pos3,pos4,cType,cForm,lForm,lemma,...`
    pub const fn unidic() -> Self {
        Self {
            category: 0,
            subcategory: 1,
            lemma: 7,
        }
    }
}

impl Default for FeatureLayout {
    fn default() -> Self {
        Self::unidic()
    }
}

/// [`Tokenizer`] backed by a vibrato system dictionary
pub struct VibratoTokenizer {
    inner: vibrato::Tokenizer,
    layout: FeatureLayout,
}

impl VibratoTokenizer {
    /// Read a compiled (uncompressed) vibrato dictionary.
    ///
    /// Distributed dictionaries are usually zstd-compressed; wrap the file
    /// in a decoder before passing it here.
    pub fn from_reader<R: Read>(reader: R, layout: FeatureLayout) -> Result<Self> {
        let dict = vibrato::Dictionary::read(reader)
            .map_err(|e| AnalysisError::Dictionary(e.to_string()))?;
        tracing::debug!(?layout, "loaded vibrato dictionary");
        Ok(Self {
            inner: vibrato::Tokenizer::new(dict),
            layout,
        })
    }

    /// Column layout in use
    pub fn layout(&self) -> FeatureLayout {
        self.layout
    }
}

/// Build a [`Token`] from a surface and its dictionary feature string.
///
/// Missing columns read as `*`; a `*` lemma falls back to the surface
/// (unknown words carry no dictionary form).
fn token_from_feature(surface: &str, feature: &str, layout: FeatureLayout) -> Token {
    let cols: Vec<&str> = feature.split(',').collect();
    let column = |idx: usize| cols.get(idx).copied().unwrap_or("*");

    let category = LexicalCategory::from_dictionary_label(column(layout.category));
    let lemma = match column(layout.lemma) {
        "*" | "" => surface,
        lemma => lemma,
    };
    Token::new(surface, category, column(layout.subcategory), lemma)
}

impl Tokenizer for VibratoTokenizer {
    fn segment(&self, text: &str) -> std::result::Result<Vec<Token>, SegmentError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        if text.contains('\u{FFFD}') {
            return Err(SegmentError::new("text contains U+FFFD replacement characters"));
        }

        let mut worker = self.inner.new_worker();
        worker.reset_sentence(text);
        worker.tokenize();

        let tokens = (0..worker.num_tokens())
            .map(|i| {
                let token = worker.token(i);
                token_from_feature(token.surface(), token.feature(), self.layout)
            })
            .filter(|t| t.category != LexicalCategory::Whitespace)
            .collect();
        Ok(tokens)
    }
}

impl std::fmt::Debug for VibratoTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VibratoTokenizer")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unidic_feature() {
        let feature = "動詞,非自立可能,*,*,上一段-カ行,終止形-一般,デキル,出来る,できる,デキル";
        let token = token_from_feature("できる", feature, FeatureLayout::unidic());
        assert_eq!(token.category, LexicalCategory::Verb);
        assert_eq!(token.subcategory, "非自立可能");
        assert_eq!(token.lemma, "出来る");
    }

    #[test]
    fn test_ipadic_feature() {
        let feature = "動詞,自立,*,*,五段・ラ行,連用タ接続,走る,ハシッ,ハシッ";
        let token = token_from_feature("走っ", feature, FeatureLayout::ipadic());
        assert_eq!(token.lemma, "走る");
        assert_eq!(token.subcategory, "自立");
    }

    #[test]
    fn test_unknown_word_falls_back_to_surface() {
        let token = token_from_feature("ほげ", "名詞,普通名詞,一般,*", FeatureLayout::unidic());
        assert_eq!(token.category, LexicalCategory::Noun);
        assert_eq!(token.lemma, "ほげ");
    }
}
