use anyhow::{bail, Context};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use prometheus::Registry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

use dwg2img::cache::{ArtifactCache, CacheKey};
use dwg2img::config::Config;
use dwg2img::metrics::PipelineMetrics;
use dwg2img::pipeline::ConversionPipeline;
use dwg2img::raster::WatermarkSample;
use dwg2img::source::DirectorySource;
use dwg2img::watermark::{FontFace, WatermarkCompositor, WatermarkSpec};

/// dwg2img - converts stored CAD drawings into cropped, watermarked PNG images
#[derive(Parser, Debug)]
#[command(name = "dwg2img")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Write the run's counters in Prometheus text format to this file
    #[arg(long, global = true)]
    metrics_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a drawing with a watermark
    #[command(allow_negative_numbers = true)]
    Render {
        article: i32,
        version: i32,

        /// Watermark line, repeatable
        #[arg(short, long = "watermark", required = true)]
        watermark: Vec<String>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit base64 text instead of raw PNG
        #[arg(long)]
        base64: bool,
    },

    /// Write the clean cached artifact without a watermark
    #[command(allow_negative_numbers = true)]
    Clean {
        article: i32,
        version: i32,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Store the placeholder images served when a conversion fails
    Seed {
        /// Placeholder for drawings the store has no data for
        #[arg(long)]
        empty: PathBuf,

        /// Placeholder for drawings the rasterizer cannot load
        #[arg(long)]
        load_failure: PathBuf,

        /// Placeholder for any other failure
        #[arg(long)]
        unexpected: PathBuf,
    },

    /// Validate the configuration and report missing placeholders
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration from file
    let config = Config::load(&args.config).unwrap_or_else(|e| {
        eprintln!("Failed to load {}: {}", args.config.display(), e);
        std::process::exit(1);
    });

    dwg2img::logging::init_subscriber(config.logging.format, &config.logging.level)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::info!(
        config_file = %args.config.display(),
        cache_dir = %config.cache.dir,
        source_dir = %config.source.dir,
        rasterizer = %config.rasterizer.program,
        coalescing = config.coalescing.enabled,
        "Configuration loaded successfully"
    );

    let cache = ArtifactCache::new(&config.cache.dir);

    match args.command {
        Command::Render {
            article,
            version,
            watermark,
            output,
            base64,
        } => {
            let registry = Registry::new();
            let pipeline = build_pipeline(&config, cache, &registry)?;
            let spec = WatermarkSpec::new(watermark)?;
            let key = CacheKey::new(article, version);

            let data = if base64 {
                Bytes::from(pipeline.render_base64(key, &spec).await?)
            } else {
                pipeline.render(key, &spec).await?
            };
            write_output(output.as_deref(), &data).await?;
            report_metrics(&registry, args.metrics_file.as_deref()).await?;
        }
        Command::Clean {
            article,
            version,
            output,
        } => {
            let registry = Registry::new();
            let pipeline = build_pipeline(&config, cache, &registry)?;
            let data = pipeline
                .clean_artifact(CacheKey::new(article, version))
                .await?;
            write_output(Some(&output), &data).await?;
            report_metrics(&registry, args.metrics_file.as_deref()).await?;
        }
        Command::Seed {
            empty,
            load_failure,
            unexpected,
        } => {
            cache
                .seed_fallbacks(
                    read_placeholder(&empty).await?,
                    read_placeholder(&load_failure).await?,
                    read_placeholder(&unexpected).await?,
                )
                .await?;
            tracing::info!(dir = %cache.dir().display(), "Placeholders stored");
        }
        Command::Check => {
            let missing = cache.missing_fallbacks().await?;
            if !missing.is_empty() {
                for key in &missing {
                    tracing::error!(key = %key, path = %cache.path_for(*key).display(), "Placeholder missing");
                }
                bail!("{} placeholder artifact(s) missing", missing.len());
            }
            tracing::info!("Configuration and placeholders OK");
        }
    }

    Ok(())
}

fn build_pipeline(
    config: &Config,
    cache: ArtifactCache,
    registry: &Registry,
) -> anyhow::Result<ConversionPipeline> {
    let face = FontFace::load(Path::new(&config.watermark.font_path))?;
    let compositor = WatermarkCompositor::new(Arc::new(face), config.watermark.to_style()?);
    let metrics = PipelineMetrics::register(registry).context("Failed to register metrics")?;

    let mut pipeline = ConversionPipeline::new(
        cache,
        Arc::new(DirectorySource::new(&config.source.dir)),
        Arc::new(config.rasterizer.to_command_rasterizer()),
        Arc::new(compositor),
    )
    .with_raster_options(config.rasterizer.to_raster_options())
    .with_coalescing(config.coalescing.enabled)
    .with_metrics(metrics);

    if let Some(path) = &config.watermark.sample_path {
        let sample = WatermarkSample::load(Path::new(path))?;
        let (width, height) = sample.dimensions();
        tracing::debug!(path = %path, width, height, "Reference mark sample loaded");
        pipeline = pipeline.with_sample(sample);
    }

    Ok(pipeline)
}

async fn read_placeholder(path: &Path) -> anyhow::Result<Bytes> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read placeholder {}", path.display()))?;
    // Reject anything that is not an image now rather than at serve time
    dwg2img::raster::decode(&data)
        .with_context(|| format!("Placeholder {} is not a readable image", path.display()))?;
    Ok(Bytes::from(data))
}

async fn write_output(path: Option<&Path>, data: &[u8]) -> anyhow::Result<()> {
    match path {
        Some(path) => tokio::fs::write(path, data)
            .await
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(data).await?;
            stdout.flush().await?;
            Ok(())
        }
    }
}

async fn report_metrics(registry: &Registry, path: Option<&Path>) -> anyhow::Result<()> {
    let text = dwg2img::metrics::encode_text(registry).context("Failed to encode metrics")?;
    tracing::debug!(metrics = %text, "Pipeline counters");
    if let Some(path) = path {
        tokio::fs::write(path, text)
            .await
            .with_context(|| format!("Failed to write metrics to {}", path.display()))?;
    }
    Ok(())
}
