// Conversion pipeline - turns (article, version) into served image bytes
//
// Per request:
//   cache hit  -> cached bytes
//   cache miss -> fetch -> rasterize -> strip mark -> crop -> cache -> bytes
// A failed miss is answered with a placeholder artifact from the cache.
// The caller's watermark is stamped on top of whichever bytes came back.

mod error;

use base64::Engine as _;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Instant;

pub use error::{ConversionError, FallbackReason, Stage};

use crate::cache::{ArtifactCache, CacheKey};
use crate::error::Error;
use crate::metrics::PipelineMetrics;
use crate::raster::{self, WatermarkSample};
use crate::rasterizer::{RasterOptions, RasterizeError, Rasterizer};
use crate::request_coalescing::{CoalescingSlot, RequestCoalescer};
use crate::source::DocumentSource;
use crate::watermark::{WatermarkCompositor, WatermarkSpec};

/// Orchestrates cache, document store, rasterizer and post-processing.
///
/// Built once at startup; every collaborator is owned here and shared by
/// concurrent requests through `&self`.
pub struct ConversionPipeline {
    cache: ArtifactCache,
    source: Arc<dyn DocumentSource>,
    rasterizer: Arc<dyn Rasterizer>,
    compositor: Arc<WatermarkCompositor>,
    raster_options: RasterOptions,
    sample: Option<Arc<WatermarkSample>>,
    coalescer: Option<RequestCoalescer>,
    metrics: PipelineMetrics,
}

impl ConversionPipeline {
    pub fn new(
        cache: ArtifactCache,
        source: Arc<dyn DocumentSource>,
        rasterizer: Arc<dyn Rasterizer>,
        compositor: Arc<WatermarkCompositor>,
    ) -> Self {
        Self {
            cache,
            source,
            rasterizer,
            compositor,
            raster_options: RasterOptions::default(),
            sample: None,
            coalescer: None,
            metrics: PipelineMetrics::unregistered(),
        }
    }

    /// Strip this reference mark from every fresh render.
    pub fn with_sample(mut self, sample: WatermarkSample) -> Self {
        self.sample = Some(Arc::new(sample));
        self
    }

    pub fn with_raster_options(mut self, options: RasterOptions) -> Self {
        self.raster_options = options;
        self
    }

    /// Let concurrent misses for the same key share one conversion.
    pub fn with_coalescing(mut self, enabled: bool) -> Self {
        self.coalescer = enabled.then(RequestCoalescer::new);
        self
    }

    pub fn with_metrics(mut self, metrics: PipelineMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn cache(&self) -> &ArtifactCache {
        &self.cache
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    /// Unwatermarked artifact for `key`: cached, freshly converted, or a placeholder.
    ///
    /// Only a failing cache surfaces as an error.
    pub async fn clean_artifact(&self, key: CacheKey) -> Result<Bytes, Error> {
        if let Some(bytes) = self.cached(key).await? {
            self.metrics.cache_hits.inc();
            tracing::debug!(article = key.article, version = key.version, "Cache hit");
            return Ok(bytes);
        }
        self.metrics.cache_misses.inc();
        tracing::debug!(article = key.article, version = key.version, "Cache miss");

        let Some(coalescer) = &self.coalescer else {
            return self.convert_or_fallback(key).await;
        };

        match coalescer.acquire(key).await {
            CoalescingSlot::Leader(guard) => {
                // A previous leader may have finished between the lookup and acquire
                let bytes = match self.cached(key).await? {
                    Some(bytes) => bytes,
                    None => self.convert_or_fallback(key).await?,
                };
                guard.complete(bytes.clone());
                Ok(bytes)
            }
            CoalescingSlot::Follower(Some(bytes)) => Ok(bytes),
            // Leader failed without an answer
            CoalescingSlot::Follower(None) => match self.cached(key).await? {
                Some(bytes) => Ok(bytes),
                None => self.convert_or_fallback(key).await,
            },
        }
    }

    /// Artifact for `key` with the caller's watermark, as PNG.
    pub async fn render(&self, key: CacheKey, spec: &WatermarkSpec) -> Result<Bytes, Error> {
        let clean = self.clean_artifact(key).await?;
        let compositor = Arc::clone(&self.compositor);
        let spec = spec.clone();
        let stamped = tokio::task::spawn_blocking(move || compositor.apply_png(&clean, &spec))
            .await
            .map_err(|e| Error::Task(e.to_string()))??;
        Ok(Bytes::from(stamped))
    }

    /// [`render`](Self::render), base64 encoded.
    pub async fn render_base64(&self, key: CacheKey, spec: &WatermarkSpec) -> Result<String, Error> {
        let png = self.render(key, spec).await?;
        Ok(base64::engine::general_purpose::STANDARD.encode(&png))
    }

    async fn cached(&self, key: CacheKey) -> Result<Option<Bytes>, Error> {
        if self.cache.exists(key).await? {
            Ok(Some(self.cache.read(key).await?))
        } else {
            Ok(None)
        }
    }

    async fn convert_or_fallback(&self, key: CacheKey) -> Result<Bytes, Error> {
        let started = Instant::now();
        match self.convert(key).await {
            Ok(bytes) => {
                let elapsed = started.elapsed();
                self.metrics.conversions.inc();
                self.metrics
                    .conversion_duration
                    .observe(elapsed.as_secs_f64());
                tracing::info!(
                    article = key.article,
                    version = key.version,
                    bytes = bytes.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Drawing converted"
                );
                Ok(bytes)
            }
            Err(failure) => {
                let reason = failure.reason();
                let fallback = reason.fallback_key();
                match &failure {
                    ConversionError::EmptySource => tracing::info!(
                        article = key.article,
                        version = key.version,
                        "No drawing stored, serving placeholder"
                    ),
                    _ => tracing::warn!(
                        article = key.article,
                        version = key.version,
                        reason = reason.as_label(),
                        error = %failure,
                        "Conversion failed, serving placeholder"
                    ),
                }
                self.metrics.record_fallback(reason);
                Ok(self.cache.read(fallback).await?)
            }
        }
    }

    async fn convert(&self, key: CacheKey) -> Result<Bytes, ConversionError> {
        let raw = self
            .source
            .fetch(key)
            .await
            .map_err(|e| ConversionError::unexpected(Stage::Fetching, e))?;
        if raw.is_empty() {
            return Err(ConversionError::EmptySource);
        }

        let rendered = self
            .rasterizer
            .rasterize(raw, &self.raster_options)
            .await
            .map_err(|e| match e {
                RasterizeError::Load(msg) => ConversionError::RasterizationLoad(msg),
                RasterizeError::Failed(msg) => ConversionError::unexpected(Stage::Rasterizing, msg),
            })?;

        let sample = self.sample.clone();
        let cleaned = tokio::task::spawn_blocking(move || postprocess(&rendered, sample.as_deref()))
            .await
            .map_err(|e| ConversionError::unexpected(Stage::Cropping, e))??;

        self.cache
            .write(key, cleaned.clone())
            .await
            .map_err(|e| ConversionError::unexpected(Stage::Caching, e))?;
        Ok(cleaned)
    }
}

/// Decode a fresh render, strip the reference mark, crop to content, re-encode.
pub fn postprocess(rendered: &[u8], sample: Option<&WatermarkSample>) -> Result<Bytes, ConversionError> {
    let mut image =
        raster::decode(rendered).map_err(|e| ConversionError::unexpected(Stage::Rasterizing, e))?;

    if let Some(sample) = sample {
        let cleared = sample
            .strip(&mut image)
            .map_err(|e| ConversionError::unexpected(Stage::WatermarkStripping, e))?;
        tracing::debug!(cleared, "Reference mark stripped");
    }

    let (cropped, _) = raster::crop_to_content(&image)
        .map_err(|e| ConversionError::unexpected(Stage::Cropping, e))?;
    let png =
        raster::encode_png(&cropped).map_err(|e| ConversionError::unexpected(Stage::Cropping, e))?;
    Ok(Bytes::from(png))
}
