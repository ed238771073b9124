use prometheus::{
    Counter, CounterVec, Gauge, Histogram, HistogramOpts, Opts, Registry,
};
use std::sync::Arc;

use crate::models::IndexStats;

/// Prometheus metrics for index builds and searches
#[derive(Clone)]
pub struct SearchMetrics {
    // Counters
    pub searches_total: CounterVec,
    pub builds_failed: Counter,

    // Gauges
    pub documents_indexed: Gauge,
    pub index_terms: Gauge,
    pub index_postings: Gauge,

    // Histograms
    pub build_duration: Histogram,
    pub search_latency: Histogram,
    pub search_hits: Histogram,

    // Registry
    registry: Arc<Registry>,
}

impl SearchMetrics {
    /// Create a new SearchMetrics instance
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Counters
        let searches_total = CounterVec::new(
            Opts::new("wikidex_searches_total", "Total number of searches by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(searches_total.clone()))?;

        let builds_failed = Counter::with_opts(Opts::new(
            "wikidex_builds_failed_total",
            "Total number of failed or cancelled index builds",
        ))?;
        registry.register(Box::new(builds_failed.clone()))?;

        // Gauges
        let documents_indexed = Gauge::with_opts(Opts::new(
            "wikidex_documents_indexed",
            "Number of documents in the published index",
        ))?;
        registry.register(Box::new(documents_indexed.clone()))?;

        let index_terms = Gauge::with_opts(Opts::new(
            "wikidex_index_terms",
            "Number of distinct terms in the published index",
        ))?;
        registry.register(Box::new(index_terms.clone()))?;

        let index_postings = Gauge::with_opts(Opts::new(
            "wikidex_index_postings",
            "Number of postings in the published index",
        ))?;
        registry.register(Box::new(index_postings.clone()))?;

        // Histograms
        let build_duration = Histogram::with_opts(
            HistogramOpts::new("wikidex_build_duration_seconds", "Index build duration")
                .buckets(vec![0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]),
        )?;
        registry.register(Box::new(build_duration.clone()))?;

        let search_latency = Histogram::with_opts(
            HistogramOpts::new("wikidex_search_latency_seconds", "Search latency")
                .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.5]),
        )?;
        registry.register(Box::new(search_latency.clone()))?;

        let search_hits = Histogram::with_opts(
            HistogramOpts::new("wikidex_search_hits", "Number of documents matched per search")
                .buckets(vec![0.0, 1.0, 10.0, 100.0, 1000.0, 10000.0, 100000.0]),
        )?;
        registry.register(Box::new(search_hits.clone()))?;

        Ok(Self {
            searches_total,
            builds_failed,
            documents_indexed,
            index_terms,
            index_postings,
            build_duration,
            search_latency,
            search_hits,
            registry: Arc::new(registry),
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Record a published index
    pub fn record_build(&self, stats: &IndexStats) {
        self.documents_indexed.set(stats.documents as f64);
        self.index_terms.set(stats.terms as f64);
        self.index_postings.set(stats.postings as f64);
        self.build_duration.observe(stats.build_ms as f64 / 1000.0);
    }

    /// Record a failed or cancelled build
    pub fn record_build_failure(&self) {
        self.builds_failed.inc();
    }

    /// Record a successful search
    pub fn record_search(&self, duration_secs: f64, hits: usize) {
        self.searches_total.with_label_values(&["ok"]).inc();
        self.search_latency.observe(duration_secs);
        self.search_hits.observe(hits as f64);
    }

    /// Record a search that ended in an error, labelled by error kind
    pub fn record_search_error(&self, kind: &str, duration_secs: f64) {
        self.searches_total.with_label_values(&[kind]).inc();
        self.search_latency.observe(duration_secs);
    }
}

impl Default for SearchMetrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}
