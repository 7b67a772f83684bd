//! Term frequency counting
//!
//! Counts lemmas across the flattened corpus and ranks them. Entries are
//! stored in first-seen order next to an Fx index, so sorting by count with
//! a stable sort breaks ties by first appearance.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// One row of a ranked frequency table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedTerm {
    /// 1-based rank
    pub rank: usize,
    pub lemma: String,
    pub count: u32,
}

/// Lemma occurrence counts in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    /// lemma -> position in `entries`
    index: FxHashMap<String, usize>,
    entries: Vec<(String, u32)>,
}

impl FrequencyTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every lemma in a flattened stream
    pub fn from_lemmas<I, S>(lemmas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for lemma in lemmas {
            table.add(lemma.as_ref());
        }
        table
    }

    /// Record one occurrence of `lemma`; counts saturate at `u32::MAX`
    pub fn add(&mut self, lemma: &str) {
        if let Some(&pos) = self.index.get(lemma) {
            let count = &mut self.entries[pos].1;
            *count = count.saturating_add(1);
            return;
        }
        self.index.insert(lemma.to_string(), self.entries.len());
        self.entries.push((lemma.to_string(), 1));
    }

    /// Occurrences of `lemma` (0 if unseen)
    pub fn count(&self, lemma: &str) -> u32 {
        self.index
            .get(lemma)
            .map_or(0, |&pos| self.entries[pos].1)
    }

    /// Sum of all counts, i.e. the length of the flattened stream
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| u64::from(*c)).sum()
    }

    /// Number of distinct lemmas
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(lemma, count)` in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(l, c)| (l.as_str(), *c))
    }

    /// The `n` most frequent lemmas, highest count first.
    ///
    /// Ties keep first-seen order.
    pub fn top_n(&self, n: usize) -> Vec<(String, u32)> {
        let mut sorted: Vec<&(String, u32)> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.into_iter().take(n).cloned().collect()
    }

    /// [`top_n`](Self::top_n) reversed, smallest first.
    ///
    /// This is the order horizontal bar charts draw bottom-to-top.
    pub fn top_n_ascending(&self, n: usize) -> Vec<(String, u32)> {
        let mut top = self.top_n(n);
        top.reverse();
        top
    }

    /// [`top_n`](Self::top_n) as numbered rows for tabular display
    pub fn ranked(&self, n: usize) -> Vec<RankedTerm> {
        self.top_n(n)
            .into_iter()
            .enumerate()
            .map(|(i, (lemma, count))| RankedTerm {
                rank: i + 1,
                lemma,
                count,
            })
            .collect()
    }

    /// Every lemma with its count (word-cloud input)
    pub fn to_map(&self) -> FxHashMap<String, u32> {
        self.entries.iter().cloned().collect()
    }
}

impl Serialize for FrequencyTable {
    /// Serialized as `[[lemma, count], ...]` in first-seen order
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.iter())
    }
}
