// Conversion pipeline tests against a real on-disk cache and fake collaborators

use std::sync::Arc;
use tempfile::TempDir;

use dwg2img::cache::{ArtifactCache, CacheKey};
use dwg2img::pipeline::ConversionPipeline;
use dwg2img::raster;
use dwg2img::rasterizer::{RasterOptions, RasterizeError};
use dwg2img::watermark::{WatermarkCompositor, WatermarkSpec, WatermarkStyle};
use dwg2img::Error;
use image::RgbaImage;

use super::common::*;

const DRAWING: CacheKey = CacheKey::new(4711, 2);

async fn seeded_cache(dir: &TempDir) -> ArtifactCache {
    let cache = ArtifactCache::new(dir.path());
    cache
        .seed_fallbacks(
            png(&RgbaImage::from_pixel(10, 10, WHITE)),
            png(&RgbaImage::from_pixel(20, 20, WHITE)),
            png(&RgbaImage::from_pixel(30, 30, WHITE)),
        )
        .await
        .unwrap();
    cache
}

fn compositor() -> Arc<WatermarkCompositor> {
    Arc::new(WatermarkCompositor::new(
        Arc::new(BoxFace { advance: 0.5 }),
        WatermarkStyle::default(),
    ))
}

fn dimensions(bytes: &[u8]) -> (u32, u32) {
    raster::decode(bytes).unwrap().dimensions()
}

#[tokio::test]
async fn test_miss_is_converted_cropped_and_stored() {
    let dir = TempDir::new().unwrap();
    let cache = seeded_cache(&dir).await;
    let source = Arc::new(FakeSource::default().with(DRAWING, b"AC1015 drawing"));
    let rasterizer = Arc::new(FakeRasterizer::rendering(png(&page_with_rect(
        300, 200, 40, 30, 100, 50,
    ))));
    let pipeline = ConversionPipeline::new(cache, source.clone(), rasterizer.clone(), compositor());

    let bytes = pipeline.clean_artifact(DRAWING).await.unwrap();

    assert_eq!(dimensions(&bytes), (100, 50));
    let stored = std::fs::read(dir.path().join("4711-2.png")).unwrap();
    assert_eq!(stored, bytes.to_vec());
}

#[tokio::test]
async fn test_second_request_is_served_from_cache() {
    let dir = TempDir::new().unwrap();
    let cache = seeded_cache(&dir).await;
    let source = Arc::new(FakeSource::default().with(DRAWING, b"AC1015 drawing"));
    let rasterizer = Arc::new(FakeRasterizer::rendering(png(&page_with_rect(
        64, 64, 8, 8, 16, 16,
    ))));
    let pipeline = ConversionPipeline::new(cache, source.clone(), rasterizer.clone(), compositor());

    let first = pipeline.clean_artifact(DRAWING).await.unwrap();
    let second = pipeline.clean_artifact(DRAWING).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(source.fetches(), 1);
    assert_eq!(rasterizer.calls(), 1);
}

#[tokio::test]
async fn test_configured_options_reach_the_rasterizer() {
    let dir = TempDir::new().unwrap();
    let cache = seeded_cache(&dir).await;
    let source = Arc::new(FakeSource::default().with(DRAWING, b"AC1015 drawing"));
    let rasterizer = Arc::new(FakeRasterizer::rendering(png(&page_with_rect(
        64, 64, 8, 8, 16, 16,
    ))));
    let options = RasterOptions {
        page_width: 1200,
        page_height: 900,
        ..RasterOptions::default()
    };
    let pipeline = ConversionPipeline::new(cache, source, rasterizer.clone(), compositor())
        .with_raster_options(options);

    pipeline.clean_artifact(DRAWING).await.unwrap();

    assert_eq!(rasterizer.last_options(), Some(options));
}

#[tokio::test]
async fn test_unknown_drawing_gets_empty_source_placeholder() {
    let dir = TempDir::new().unwrap();
    let cache = seeded_cache(&dir).await;
    let rasterizer = Arc::new(FakeRasterizer::rendering(png(&RgbaImage::new(1, 1))));
    let pipeline = ConversionPipeline::new(
        cache,
        Arc::new(FakeSource::default()),
        rasterizer.clone(),
        compositor(),
    );

    let bytes = pipeline.clean_artifact(DRAWING).await.unwrap();

    assert_eq!(dimensions(&bytes), (10, 10));
    assert_eq!(rasterizer.calls(), 0);
    assert!(!dir.path().join("4711-2.png").exists());
}

#[tokio::test]
async fn test_unloadable_drawing_gets_load_failure_placeholder() {
    let dir = TempDir::new().unwrap();
    let cache = seeded_cache(&dir).await;
    let pipeline = ConversionPipeline::new(
        cache,
        Arc::new(FakeSource::default().with(DRAWING, b"not a drawing")),
        Arc::new(FakeRasterizer::failing(RasterizeError::Load)),
        compositor(),
    );

    let bytes = pipeline.clean_artifact(DRAWING).await.unwrap();

    assert_eq!(dimensions(&bytes), (20, 20));
    assert!(!dir.path().join("4711-2.png").exists());
}

#[tokio::test]
async fn test_rasterizer_crash_gets_unexpected_placeholder() {
    let dir = TempDir::new().unwrap();
    let cache = seeded_cache(&dir).await;
    let pipeline = ConversionPipeline::new(
        cache,
        Arc::new(FakeSource::default().with(DRAWING, b"AC1015 drawing")),
        Arc::new(FakeRasterizer::failing(RasterizeError::Failed)),
        compositor(),
    );

    let bytes = pipeline.clean_artifact(DRAWING).await.unwrap();
    assert_eq!(dimensions(&bytes), (30, 30));
}

#[tokio::test]
async fn test_store_outage_gets_unexpected_placeholder() {
    let dir = TempDir::new().unwrap();
    let cache = seeded_cache(&dir).await;
    let pipeline = ConversionPipeline::new(
        cache,
        Arc::new(FakeSource::failing()),
        Arc::new(FakeRasterizer::rendering(png(&RgbaImage::new(1, 1)))),
        compositor(),
    );

    let bytes = pipeline.clean_artifact(DRAWING).await.unwrap();
    assert_eq!(dimensions(&bytes), (30, 30));
}

#[tokio::test]
async fn test_unseeded_cache_fails_loudly() {
    let dir = TempDir::new().unwrap();
    let pipeline = ConversionPipeline::new(
        ArtifactCache::new(dir.path()),
        Arc::new(FakeSource::default()),
        Arc::new(FakeRasterizer::rendering(png(&RgbaImage::new(1, 1)))),
        compositor(),
    );

    let err = pipeline.clean_artifact(DRAWING).await.unwrap_err();
    assert!(matches!(err, Error::Cache(_)));
}

#[tokio::test]
async fn test_placeholders_are_watermarked_too() {
    let dir = TempDir::new().unwrap();
    let cache = seeded_cache(&dir).await;
    let pipeline = ConversionPipeline::new(
        cache,
        Arc::new(FakeSource::default()),
        Arc::new(FakeRasterizer::rendering(png(&RgbaImage::new(1, 1)))),
        compositor(),
    );
    let spec = WatermarkSpec::new(vec!["internal".to_string()]).unwrap();

    let stamped = raster::decode(&pipeline.render(DRAWING, &spec).await.unwrap()).unwrap();

    assert_eq!(stamped.dimensions(), (10, 10));
    assert!(stamped.pixels().any(|p| *p != WHITE));
}

#[tokio::test]
async fn test_watermark_is_not_cached() {
    let dir = TempDir::new().unwrap();
    let cache = seeded_cache(&dir).await;
    let pipeline = ConversionPipeline::new(
        cache.clone(),
        Arc::new(FakeSource::default().with(DRAWING, b"AC1015 drawing")),
        Arc::new(FakeRasterizer::rendering(png(&page_with_rect(
            900, 900, 0, 0, 800, 800,
        )))),
        compositor(),
    );
    let alice = WatermarkSpec::new(vec!["alice".to_string()]).unwrap();
    let bob = WatermarkSpec::new(vec!["bob".to_string()]).unwrap();

    let for_alice = pipeline.render(DRAWING, &alice).await.unwrap();
    let for_bob = pipeline.render(DRAWING, &bob).await.unwrap();

    assert_ne!(for_alice, for_bob);
    let clean = cache.read(DRAWING).await.unwrap();
    assert_eq!(clean, pipeline.clean_artifact(DRAWING).await.unwrap());
    assert!(raster::decode(&clean).unwrap().pixels().all(|p| *p == INK));
}

/// Full stack: zlib drawing on disk, external converter, disk cache.
#[cfg(unix)]
#[tokio::test]
async fn test_end_to_end_with_directory_source_and_command() {
    use dwg2img::rasterizer::CommandRasterizer;
    use dwg2img::source::DirectorySource;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;
    use std::time::Duration;

    let cache_dir = TempDir::new().unwrap();
    let source_dir = TempDir::new().unwrap();

    // The "converter" echoes its input, so the stored drawing is already a PNG
    let render = png(&page_with_rect(120, 90, 10, 20, 30, 40));
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&render).unwrap();
    std::fs::write(
        source_dir.path().join("4711-2.dwg.z"),
        encoder.finish().unwrap(),
    )
    .unwrap();

    let pipeline = ConversionPipeline::new(
        seeded_cache(&cache_dir).await,
        Arc::new(DirectorySource::new(source_dir.path())),
        Arc::new(CommandRasterizer::new(
            "sh",
            vec!["-c".to_string(), "cat".to_string(), "converter".to_string()],
            Duration::from_secs(10),
            2,
        )),
        compositor(),
    );

    let bytes = pipeline.clean_artifact(DRAWING).await.unwrap();
    assert_eq!(dimensions(&bytes), (30, 40));

    // Unknown drawing: no file in the source directory
    let missing = pipeline.clean_artifact(CacheKey::new(1, 1)).await.unwrap();
    assert_eq!(dimensions(&missing), (10, 10));
}
