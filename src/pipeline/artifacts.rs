//! First-class pipeline artifacts.
//!
//! Each type is a typed intermediate or final result flowing between the
//! pipeline stages. [`AnalysisResult`] is the public contract handed to the
//! presentation layer.

use serde::Serialize;

use crate::graph::cooccurrence::CooccurrenceGraph;
use crate::stats::frequency::{FrequencyTable, RankedTerm};
use crate::stats::pairs::{dedup_first_seen, LemmaPair, PairFrequencyTable};

/// A document that was skipped instead of analyzed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDocument {
    /// Position in the input batch
    pub index: usize,
    pub reason: String,
}

/// Surviving lemma streams, one per document, in input order.
///
/// Documents whose filtered stream is empty are not stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredCorpus {
    pub documents: Vec<Vec<String>>,
    /// Number of input documents, including empty and skipped ones
    pub documents_seen: usize,
    pub skipped: Vec<SkippedDocument>,
}

impl FilteredCorpus {
    /// Assemble a corpus from per-document results in input order.
    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = std::result::Result<Vec<String>, SkippedDocument>>,
    {
        let mut corpus = Self::default();
        for result in results {
            corpus.documents_seen += 1;
            match result {
                Ok(lemmas) if lemmas.is_empty() => {}
                Ok(lemmas) => corpus.documents.push(lemmas),
                Err(skipped) => corpus.skipped.push(skipped),
            }
        }
        corpus
    }

    /// Every lemma, document order then token order
    pub fn flattened(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().flatten().map(String::as_str)
    }

    /// Each document's distinct lemmas, first-seen order
    pub fn document_sets(&self) -> Vec<Vec<&str>> {
        self.documents.iter().map(|d| dedup_first_seen(d)).collect()
    }

    /// Length of the flattened stream
    pub fn lemma_count(&self) -> usize {
        self.documents.iter().map(Vec::len).sum()
    }

    /// Documents with at least one surviving lemma
    pub fn documents_kept(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Count lemmas over the flattened stream
    pub fn frequency(&self) -> FrequencyTable {
        FrequencyTable::from_lemmas(self.flattened())
    }

    /// Count document co-occurrence of lemma pairs
    pub fn pair_table(&self) -> PairFrequencyTable {
        PairFrequencyTable::from_documents(&self.documents)
    }
}

/// Everything one analysis run produces.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub documents_seen: usize,
    pub documents_kept: usize,
    pub skipped: Vec<SkippedDocument>,
    /// Full counts, first-seen order
    pub frequency: FrequencyTable,
    /// Top-N ranking rows
    pub ranking: Vec<RankedTerm>,
    /// Top-K pairs, highest count first
    pub pairs: Vec<(LemmaPair, u32)>,
    pub graph: CooccurrenceGraph,
}

impl AnalysisResult {
    pub fn is_empty(&self) -> bool {
        self.frequency.is_empty()
    }
}
