// Document source and artifact cache tests through the public API

use bytes::Bytes;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;
use tempfile::TempDir;

use dwg2img::cache::{ArtifactCache, CacheKey};
use dwg2img::source::{DirectorySource, DocumentSource};

fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

#[tokio::test]
async fn test_directory_source_inflates_stored_drawing() {
    let dir = TempDir::new().unwrap();
    let drawing = b"AC1015\0\x01\x02 binary drawing payload".repeat(50);
    std::fs::write(dir.path().join("12-3.dwg.z"), zlib(&drawing)).unwrap();

    let source = DirectorySource::new(dir.path());
    let raw = source.fetch(CacheKey::new(12, 3)).await.unwrap();

    assert_eq!(raw, Bytes::from(drawing));
}

#[tokio::test]
async fn test_directory_source_missing_drawing_is_empty() {
    let dir = TempDir::new().unwrap();
    let source = DirectorySource::new(dir.path());

    let raw = source.fetch(CacheKey::new(12, 4)).await.unwrap();
    assert!(raw.is_empty());
}

#[tokio::test]
async fn test_directory_source_versions_are_distinct() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("12-0.dwg.z"), zlib(b"v0")).unwrap();
    std::fs::write(dir.path().join("12-1.dwg.z"), zlib(b"v1")).unwrap();
    let source = DirectorySource::new(dir.path());

    assert_eq!(source.fetch(CacheKey::new(12, 0)).await.unwrap(), "v0");
    assert_eq!(source.fetch(CacheKey::new(12, 1)).await.unwrap(), "v1");
}

#[tokio::test]
async fn test_cache_layout_is_flat_and_named_by_key() {
    let dir = TempDir::new().unwrap();
    let cache = ArtifactCache::new(dir.path().join("artifacts"));

    cache
        .write(CacheKey::new(-5, 0), Bytes::from_static(b"negative"))
        .await
        .unwrap();
    cache
        .write(CacheKey::new(77, 5), Bytes::from_static(b"drawing"))
        .await
        .unwrap();

    let mut names: Vec<String> = std::fs::read_dir(dir.path().join("artifacts"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["-5-0.png".to_string(), "77-5.png".to_string()]);
}

#[tokio::test]
async fn test_missing_fallbacks_reports_unseeded_sentinels() {
    let dir = TempDir::new().unwrap();
    let cache = ArtifactCache::new(dir.path());
    std::fs::write(cache.path_for(CacheKey::LOAD_FAILURE), b"png").unwrap();

    let missing = cache.missing_fallbacks().await.unwrap();

    assert_eq!(
        missing,
        vec![CacheKey::EMPTY_SOURCE, CacheKey::UNEXPECTED_FAILURE]
    );
}
