//! Stopword filtering
//!
//! Stopwords are matched exactly against lemmas after normalization. Two
//! built-in Japanese lists are provided: one tuned for word-frequency views
//! over free-form text, and one for co-occurrence networks over press
//! releases, where boilerplate (dates, addresses, company suffixes) would
//! otherwise dominate the graph.

use std::borrow::Cow;

use rustc_hash::FxHashSet;

/// Default stopwords for word-frequency and word-cloud analysis
const FREQUENCY_STOPWORDS: &[&str] = &[
    "事", "為", "気", "方", "前", "いう", "こと", "ため", "ところ", "ほう", "とき", "もの", "思う",
    "言う",
];

/// Default stopwords for co-occurrence analysis of articles
const COOCCURRENCE_STOPWORDS: &[&str] = &[
    "事", "こと", "年", "月", "時", "分", "日", "以下", "所在地", "円", "ため", "為", "URL", "url",
    "内容", "詳細", "もの", "物", "概要", "HTTPS", "開始", "対象", "代表者", "JP", "jp", "株式会社",
    "今後", "%", "皆", "兼", "他", "階", "もと", "以上", "前", "後", "中",
];

/// A filter for removing stopword lemmas
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopwordFilter {
    /// Set of stopwords (ASCII lowercased)
    stopwords: FxHashSet<String>,
}

impl StopwordFilter {
    /// Create an empty stopword filter (no filtering)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in list for word-frequency analysis
    pub fn frequency_defaults() -> Self {
        Self::from_list(FREQUENCY_STOPWORDS)
    }

    /// Built-in list for co-occurrence analysis
    pub fn cooccurrence_defaults() -> Self {
        Self::from_list(COOCCURRENCE_STOPWORDS)
    }

    /// Create a stopword filter from a custom list
    pub fn from_list(words: &[&str]) -> Self {
        let mut filter = Self::empty();
        filter.extend(words);
        filter
    }

    /// Add stopwords to the filter; empty entries are ignored
    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let word = word.as_ref().trim();
            if !word.is_empty() {
                self.stopwords.insert(word.to_ascii_lowercase());
            }
        }
    }

    /// Remove stopwords from the filter
    pub fn remove_stopwords(&mut self, words: &[&str]) {
        for word in words {
            self.stopwords.remove(&word.trim().to_ascii_lowercase());
        }
    }

    /// Check if a lemma is a stopword
    pub fn is_stopword(&self, lemma: &str) -> bool {
        self.stopwords.contains(fold_ascii(lemma).as_ref())
    }

    /// Iterate over the stopwords (unordered)
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.stopwords.iter().map(String::as_str)
    }

    /// Get the number of stopwords in the filter
    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    /// Check if the filter is empty
    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for StopwordFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut filter = Self::empty();
        filter.extend(iter);
        filter
    }
}

/// ASCII-lowercase `lemma`, borrowing when it has no uppercase ASCII.
fn fold_ascii(lemma: &str) -> Cow<'_, str> {
    if lemma.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(lemma.to_ascii_lowercase())
    } else {
        Cow::Borrowed(lemma)
    }
}

/// Split free-form user input into stopwords.
///
/// Entries are separated by commas, ASCII spaces or ideographic spaces;
/// empty pieces are dropped. Matching is exact, so `"猫"` only removes the
/// lemma `猫` and never `子猫`.
pub fn parse_stopword_list(input: &str) -> Vec<String> {
    input
        .split([',', ' ', '\u{3000}'])
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}
