// Pipeline metrics - Prometheus counters and histograms
//
// Registered into a caller-supplied registry so tests and embedders can keep
// their own instance.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

use crate::pipeline::FallbackReason;

/// Counters and timings for the conversion pipeline
#[derive(Clone)]
pub struct PipelineMetrics {
    /// Requests served straight from the artifact cache
    pub cache_hits: IntCounter,

    /// Requests that had to run a conversion
    pub cache_misses: IntCounter,

    /// Conversions that produced and cached a real artifact
    pub conversions: IntCounter,

    /// Placeholder artifacts served, by reason
    pub fallbacks: IntCounterVec,

    /// Wall time of successful conversions (in seconds)
    pub conversion_duration: Histogram,
}

impl PipelineMetrics {
    /// Create the metrics and register them with `registry`
    pub fn register(registry: &Registry) -> prometheus::Result<Self> {
        let cache_hits = IntCounter::with_opts(Opts::new(
            "dwg2img_cache_hits_total",
            "Requests served from the artifact cache",
        ))?;
        let cache_misses = IntCounter::with_opts(Opts::new(
            "dwg2img_cache_misses_total",
            "Requests that required a conversion",
        ))?;
        let conversions = IntCounter::with_opts(Opts::new(
            "dwg2img_conversions_total",
            "Successful conversions stored in the cache",
        ))?;
        let fallbacks = IntCounterVec::new(
            Opts::new(
                "dwg2img_fallbacks_total",
                "Placeholder artifacts served instead of a conversion",
            ),
            &["reason"], // empty_source, load_failure, unexpected
        )?;
        let conversion_duration = Histogram::with_opts(
            HistogramOpts::new(
                "dwg2img_conversion_duration_seconds",
                "Wall time of successful conversions in seconds",
            )
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]), // 100ms to 2min
        )?;

        registry.register(Box::new(cache_hits.clone()))?;
        registry.register(Box::new(cache_misses.clone()))?;
        registry.register(Box::new(conversions.clone()))?;
        registry.register(Box::new(fallbacks.clone()))?;
        registry.register(Box::new(conversion_duration.clone()))?;

        Ok(Self {
            cache_hits,
            cache_misses,
            conversions,
            fallbacks,
            conversion_duration,
        })
    }

    /// Metrics registered into a private registry
    pub fn unregistered() -> Self {
        // Registering fresh collectors into a fresh registry cannot collide
        Self::register(&Registry::new()).expect("fresh registry accepts pipeline metrics")
    }

    pub fn record_fallback(&self, reason: FallbackReason) {
        self.fallbacks.with_label_values(&[reason.as_label()]).inc();
    }

    pub fn fallback_count(&self, reason: FallbackReason) -> u64 {
        self.fallbacks.with_label_values(&[reason.as_label()]).get()
    }
}

/// Everything in `registry` in the Prometheus text exposition format
pub fn encode_text(registry: &Registry) -> prometheus::Result<String> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

impl std::fmt::Debug for PipelineMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineMetrics")
            .field("cache_hits", &self.cache_hits.get())
            .field("cache_misses", &self.cache_misses.get())
            .field("conversions", &self.conversions.get())
            .finish()
    }
}
