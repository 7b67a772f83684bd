//! Pipeline runner: orchestrates stage execution and artifact flow.
//!
//! The [`Pipeline`] struct holds a normalizer and a tokenizer. Calling
//! [`Pipeline::run`] executes the stages in order, threading artifacts
//! between them and notifying a [`PipelineObserver`] at each boundary:
//!
//! 1. Filter: normalize, segment and filter every document
//! 2. Frequency: count lemmas over the flattened corpus
//! 3. Pairs: count per-document lemma pairs and keep the top K
//! 4. Graph: build, prune two-node components, compute strength
//!
//! # Static dispatch
//!
//! `Pipeline` is generic over both components, so each combination is
//! monomorphized. Configuration is passed per call, never stored, so one
//! pipeline can serve concurrent runs with different settings.

use rayon::prelude::*;

use crate::errors::Result;
use crate::graph::builder::GraphBuilder;
use crate::graph::cooccurrence::{CooccurrenceGraph, ISOLATED_PAIR_SIZE};
use crate::graph::csr::CsrGraph;
use crate::nlp::filter::MorphologicalFilter;
use crate::nlp::normalize::{NeologdNormalizer, Normalizer};
use crate::nlp::tokenizer::Tokenizer;
use crate::pipeline::artifacts::{AnalysisResult, FilteredCorpus, SkippedDocument};
use crate::pipeline::observer::{
    PipelineObserver, StageClock, StageReportBuilder, STAGE_FILTER, STAGE_FREQUENCY, STAGE_GRAPH,
    STAGE_PAIRS,
};
use crate::pipeline::spec::AnalysisSpec;
use crate::types::AnalysisConfig;

/// Corpora with at least this many documents are filtered in parallel
pub const PARALLEL_THRESHOLD: usize = 64;

// ---------------------------------------------------------------------------
// Tracing support
// ---------------------------------------------------------------------------

/// Enter a tracing span for a pipeline stage; it closes at the end of the
/// enclosing block.
macro_rules! trace_stage {
    ($name:expr) => {
        let _span = tracing::info_span!("pipeline_stage", stage = $name).entered();
    };
}

// ============================================================================
// Pipeline
// ============================================================================

/// A pipeline composed of a concrete normalizer and tokenizer.
#[derive(Debug, Clone)]
pub struct Pipeline<T, N = NeologdNormalizer> {
    pub normalizer: N,
    pub tokenizer: T,
}

impl<T: Tokenizer> Pipeline<T> {
    /// Pipeline with the default Japanese normalizer
    pub fn new(tokenizer: T) -> Self {
        Self {
            normalizer: NeologdNormalizer,
            tokenizer,
        }
    }
}

impl<T: Tokenizer, N: Normalizer> Pipeline<T, N> {
    /// Swap the normalizer
    pub fn with_normalizer<M: Normalizer>(self, normalizer: M) -> Pipeline<T, M> {
        Pipeline {
            normalizer,
            tokenizer: self.tokenizer,
        }
    }

    /// Normalize, segment and filter every document.
    ///
    /// Large corpora are processed with rayon; results are gathered in input
    /// order either way, so first-seen tie-breaking downstream is the same
    /// as a sequential run.
    pub fn filter_corpus<S>(&self, documents: &[S], cfg: &AnalysisConfig) -> FilteredCorpus
    where
        S: AsRef<str> + Sync,
    {
        self.filter_with(documents, cfg, |doc| Ok(doc.as_ref()))
    }

    fn filter_with<D, F>(&self, documents: &[D], cfg: &AnalysisConfig, decode: F) -> FilteredCorpus
    where
        D: Sync,
        F: Fn(&D) -> std::result::Result<&str, String> + Sync,
    {
        let filter = MorphologicalFilter::new(cfg);
        let process = |index: usize, doc: &D| -> std::result::Result<Vec<String>, SkippedDocument> {
            let text = decode(doc).map_err(|reason| skip(index, reason))?;
            let lemmas = filter
                .process(&self.normalizer, &self.tokenizer, text)
                .map_err(|err| skip(index, err.reason))?;
            if lemmas.is_empty() {
                tracing::debug!(index, "document has no surviving lemmas");
            }
            Ok(lemmas)
        };

        if documents.len() >= PARALLEL_THRESHOLD {
            let results: Vec<_> = documents
                .par_iter()
                .enumerate()
                .map(|(i, doc)| process(i, doc))
                .collect();
            FilteredCorpus::from_results(results)
        } else {
            FilteredCorpus::from_results(documents.iter().enumerate().map(|(i, doc)| process(i, doc)))
        }
    }

    /// Run the whole analysis over text documents.
    ///
    /// The configuration is checked before any document is touched. Malformed
    /// documents are logged and skipped; an empty corpus yields an empty
    /// result rather than an error.
    pub fn run<S>(
        &self,
        documents: &[S],
        cfg: &AnalysisConfig,
        observer: &mut impl PipelineObserver,
    ) -> Result<AnalysisResult>
    where
        S: AsRef<str> + Sync,
    {
        cfg.validate()?;
        let corpus = {
            trace_stage!(STAGE_FILTER);
            observer.on_stage_start(STAGE_FILTER);
            let clock = StageClock::start();
            let corpus = self.filter_corpus(documents, cfg);
            self.finish_filter(clock, &corpus, observer);
            corpus
        };
        Ok(Self::analyze(corpus, cfg, observer))
    }

    /// Like [`run`](Self::run), for raw byte documents.
    ///
    /// Documents that are not valid UTF-8 are skipped as malformed.
    pub fn run_bytes<B>(
        &self,
        documents: &[B],
        cfg: &AnalysisConfig,
        observer: &mut impl PipelineObserver,
    ) -> Result<AnalysisResult>
    where
        B: AsRef<[u8]> + Sync,
    {
        cfg.validate()?;
        let corpus = {
            trace_stage!(STAGE_FILTER);
            observer.on_stage_start(STAGE_FILTER);
            let clock = StageClock::start();
            let corpus = self.filter_with(documents, cfg, |doc| {
                std::str::from_utf8(doc.as_ref()).map_err(|e| format!("invalid UTF-8: {e}"))
            });
            self.finish_filter(clock, &corpus, observer);
            corpus
        };
        Ok(Self::analyze(corpus, cfg, observer))
    }

    /// Resolve a JSON spec, then [`run`](Self::run).
    pub fn run_with_spec<S>(
        &self,
        documents: &[S],
        spec_json: &str,
        observer: &mut impl PipelineObserver,
    ) -> Result<AnalysisResult>
    where
        S: AsRef<str> + Sync,
    {
        let cfg = AnalysisSpec::from_json(spec_json)?.resolve()?;
        self.run(documents, &cfg, observer)
    }

    fn finish_filter(
        &self,
        clock: StageClock,
        corpus: &FilteredCorpus,
        observer: &mut impl PipelineObserver,
    ) {
        let report = StageReportBuilder::new(clock.elapsed())
            .documents(corpus.documents_kept())
            .lemmas(corpus.lemma_count())
            .build();
        observer.on_stage_end(STAGE_FILTER, &report);
        observer.on_corpus(corpus);
    }

    /// Stages 2 to 4
    fn analyze(
        corpus: FilteredCorpus,
        cfg: &AnalysisConfig,
        observer: &mut impl PipelineObserver,
    ) -> AnalysisResult {
        let frequency = {
            trace_stage!(STAGE_FREQUENCY);
            observer.on_stage_start(STAGE_FREQUENCY);
            let clock = StageClock::start();
            let frequency = corpus.frequency();
            let report = StageReportBuilder::new(clock.elapsed())
                .lemmas(frequency.len())
                .build();
            observer.on_stage_end(STAGE_FREQUENCY, &report);
            observer.on_frequency(&frequency);
            frequency
        };
        let ranking = frequency.ranked(cfg.frequency_top_n);

        let pairs = {
            trace_stage!(STAGE_PAIRS);
            observer.on_stage_start(STAGE_PAIRS);
            let clock = StageClock::start();
            let table = corpus.pair_table();
            let pairs = table.top_k(cfg.pair_top_k);
            tracing::debug!(distinct = table.len(), kept = pairs.len(), "pair extraction");
            let report = StageReportBuilder::new(clock.elapsed())
                .documents(table.documents())
                .edges(pairs.len())
                .build();
            observer.on_stage_end(STAGE_PAIRS, &report);
            observer.on_pairs(&pairs);
            pairs
        };

        let graph = {
            trace_stage!(STAGE_GRAPH);
            observer.on_stage_start(STAGE_GRAPH);
            let clock = StageClock::start();
            let mut builder = GraphBuilder::from_pairs(&pairs);
            let pruned = builder.prune_components(ISOLATED_PAIR_SIZE);
            let graph = CooccurrenceGraph::from_csr(&CsrGraph::from_builder(&builder));
            let report = StageReportBuilder::new(clock.elapsed())
                .nodes(graph.nodes.len())
                .edges(graph.edges.len())
                .pruned(pruned)
                .build();
            observer.on_stage_end(STAGE_GRAPH, &report);
            observer.on_graph(&graph);
            graph
        };

        tracing::info!(
            documents_seen = corpus.documents_seen,
            documents_kept = corpus.documents_kept(),
            skipped = corpus.skipped.len(),
            lemmas = frequency.len(),
            pairs = pairs.len(),
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "analysis finished"
        );

        let documents_kept = corpus.documents_kept();
        AnalysisResult {
            documents_seen: corpus.documents_seen,
            documents_kept,
            skipped: corpus.skipped,
            frequency,
            ranking,
            pairs,
            graph,
        }
    }
}

fn skip(index: usize, reason: String) -> SkippedDocument {
    tracing::warn!(index, %reason, "skipping malformed document");
    SkippedDocument { index, reason }
}

// ============================================================================
// Tests
// ============================================================================
