//! Co-occurrence pair extraction
//!
//! Every document contributes each unordered pair of its distinct lemmas
//! once. Pairs are stored canonically (lexicographically smaller lemma
//! first), so `{a, b}` and `{b, a}` always land in the same bucket.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// An unordered pair of distinct lemmas
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(String, String)", into = "(String, String)")]
pub struct LemmaPair {
    first: String,
    second: String,
}

impl LemmaPair {
    /// Build a pair; `None` when both lemmas are the same
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Option<Self> {
        let (a, b) = (a.into(), b.into());
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { first: a, second: b }),
            std::cmp::Ordering::Greater => Some(Self { first: b, second: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The lexicographically smaller lemma
    pub fn first(&self) -> &str {
        &self.first
    }

    /// The lexicographically larger lemma
    pub fn second(&self) -> &str {
        &self.second
    }

    /// Whether `lemma` is one of the two ends
    pub fn contains(&self, lemma: &str) -> bool {
        self.first == lemma || self.second == lemma
    }

    /// The opposite end of `lemma`, if `lemma` is in the pair
    pub fn other(&self, lemma: &str) -> Option<&str> {
        if self.first == lemma {
            Some(&self.second)
        } else if self.second == lemma {
            Some(&self.first)
        } else {
            None
        }
    }
}

impl TryFrom<(String, String)> for LemmaPair {
    type Error = String;

    fn try_from((a, b): (String, String)) -> Result<Self, Self::Error> {
        LemmaPair::new(a, b).ok_or_else(|| "a lemma pair needs two distinct lemmas".to_string())
    }
}

impl From<LemmaPair> for (String, String) {
    fn from(pair: LemmaPair) -> Self {
        (pair.first, pair.second)
    }
}

/// Drop repeated lemmas, keeping the first occurrence of each
pub fn dedup_first_seen<S: AsRef<str>>(lemmas: &[S]) -> Vec<&str> {
    let mut seen = FxHashSet::default();
    lemmas
        .iter()
        .map(AsRef::as_ref)
        .filter(|lemma| seen.insert(*lemma))
        .collect()
}

/// Document co-occurrence counts per lemma pair, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct PairFrequencyTable {
    index: FxHashMap<LemmaPair, usize>,
    entries: Vec<(LemmaPair, u32)>,
    documents: usize,
}

impl PairFrequencyTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Count pairs over a sequence of per-document lemma lists
    pub fn from_documents<D, S>(documents: &[D]) -> Self
    where
        D: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for doc in documents {
            table.add_document(doc.as_ref());
        }
        table
    }

    /// Add one document.
    ///
    /// Duplicates are collapsed first, so a pair counts at most once per
    /// document. Pairs are generated as `(set[i], set[j])` for `i < j` over
    /// the first-seen ordering. Documents with fewer than two distinct
    /// lemmas add nothing but still count toward [`documents`](Self::documents).
    pub fn add_document<S: AsRef<str>>(&mut self, lemmas: &[S]) {
        self.documents += 1;
        let unique = dedup_first_seen(lemmas);
        for (i, a) in unique.iter().enumerate() {
            for b in &unique[i + 1..] {
                if let Some(pair) = LemmaPair::new(*a, *b) {
                    self.increment(pair);
                }
            }
        }
    }

    /// Counts saturate at `u32::MAX`
    fn increment(&mut self, pair: LemmaPair) {
        if let Some(&pos) = self.index.get(&pair) {
            let count = &mut self.entries[pos].1;
            *count = count.saturating_add(1);
            return;
        }
        self.index.insert(pair.clone(), self.entries.len());
        self.entries.push((pair, 1));
    }

    /// Co-occurrence count of `a` and `b`, in either order
    pub fn count(&self, a: &str, b: &str) -> u32 {
        LemmaPair::new(a, b)
            .and_then(|pair| self.index.get(&pair))
            .map_or(0, |&pos| self.entries[pos].1)
    }

    /// Number of documents added
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// Number of distinct pairs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no pair has been seen
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(pair, count)` in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&LemmaPair, u32)> {
        self.entries.iter().map(|(p, c)| (p, *c))
    }

    /// The `k` most frequent pairs, highest count first; ties keep
    /// first-seen order.
    pub fn top_k(&self, k: usize) -> Vec<(LemmaPair, u32)> {
        let mut sorted: Vec<&(LemmaPair, u32)> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.into_iter().take(k).cloned().collect()
    }
}
