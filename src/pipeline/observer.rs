//! Pipeline observer: hooks for logging, profiling, and debugging.
//!
//! Observers receive notifications at stage boundaries without coupling to
//! stage logic. Use cases include timing stages, capturing intermediate
//! artifacts for debugging, and emitting structured telemetry.

use std::time::{Duration, Instant};

use crate::graph::cooccurrence::CooccurrenceGraph;
use crate::pipeline::artifacts::FilteredCorpus;
use crate::stats::frequency::FrequencyTable;
use crate::stats::pairs::LemmaPair;

/// Normalization, tokenization and morphological filtering
pub const STAGE_FILTER: &str = "filter";
/// Frequency aggregation
pub const STAGE_FREQUENCY: &str = "frequency";
/// Pair extraction and top-K cut
pub const STAGE_PAIRS: &str = "pairs";
/// Graph building and pruning
pub const STAGE_GRAPH: &str = "graph";

/// Wall-clock timer for a single stage
#[derive(Debug, Clone, Copy)]
pub struct StageClock {
    started: Instant,
}

impl StageClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// What a stage reports when it finishes.
///
/// Only the timing is always present; counts are filled in by the stages
/// they make sense for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    elapsed: Duration,
    documents: Option<usize>,
    lemmas: Option<usize>,
    nodes: Option<usize>,
    edges: Option<usize>,
    pruned: Option<usize>,
}

impl StageReport {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            elapsed,
            ..Self::default()
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn documents(&self) -> Option<usize> {
        self.documents
    }

    pub fn lemmas(&self) -> Option<usize> {
        self.lemmas
    }

    pub fn nodes(&self) -> Option<usize> {
        self.nodes
    }

    pub fn edges(&self) -> Option<usize> {
        self.edges
    }

    /// Nodes removed by component pruning
    pub fn pruned(&self) -> Option<usize> {
        self.pruned
    }
}

/// Builder for [`StageReport`]s carrying stage-specific counts
#[derive(Debug, Clone)]
pub struct StageReportBuilder {
    report: StageReport,
}

impl StageReportBuilder {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            report: StageReport::new(elapsed),
        }
    }

    pub fn documents(mut self, n: usize) -> Self {
        self.report.documents = Some(n);
        self
    }

    pub fn lemmas(mut self, n: usize) -> Self {
        self.report.lemmas = Some(n);
        self
    }

    pub fn nodes(mut self, n: usize) -> Self {
        self.report.nodes = Some(n);
        self
    }

    pub fn edges(mut self, n: usize) -> Self {
        self.report.edges = Some(n);
        self
    }

    pub fn pruned(mut self, n: usize) -> Self {
        self.report.pruned = Some(n);
        self
    }

    pub fn build(self) -> StageReport {
        self.report
    }
}

/// Callbacks invoked by [`super::runner::Pipeline::run`].
///
/// Every method has an empty default, so implementors override only what
/// they need.
pub trait PipelineObserver {
    fn on_stage_start(&mut self, _stage: &'static str) {}

    fn on_stage_end(&mut self, _stage: &'static str, _report: &StageReport) {}

    /// Filtered lemma streams, after the filter stage
    fn on_corpus(&mut self, _corpus: &FilteredCorpus) {}

    fn on_frequency(&mut self, _frequency: &FrequencyTable) {}

    /// Top-K pairs, after the cut
    fn on_pairs(&mut self, _pairs: &[(LemmaPair, u32)]) {}

    /// The pruned graph
    fn on_graph(&mut self, _graph: &CooccurrenceGraph) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Observer that records the report of every finished stage, in order.
#[derive(Debug, Clone, Default)]
pub struct StageTimingObserver {
    reports: Vec<(&'static str, StageReport)>,
}

impl StageTimingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[(&'static str, StageReport)] {
        &self.reports
    }

    /// Report for `stage`, if it ran
    pub fn report(&self, stage: &str) -> Option<&StageReport> {
        self.reports
            .iter()
            .find(|(name, _)| *name == stage)
            .map(|(_, r)| r)
    }

    /// Sum of all recorded stage times
    pub fn total_elapsed(&self) -> Duration {
        self.reports.iter().map(|(_, r)| r.elapsed()).sum()
    }
}

impl PipelineObserver for StageTimingObserver {
    fn on_stage_end(&mut self, stage: &'static str, report: &StageReport) {
        self.reports.push((stage, report.clone()));
    }
}
