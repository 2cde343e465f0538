//! Pastiche CLI - apply the style of an artwork to photographs.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pastiche::{
    Artwork, ArtworkCatalog, Config, DirectoryAssets, ModelRepository, OnnxEngine,
    StylizationPipeline,
};

/// Apply the style of an image to one or more content images.
#[derive(Parser, Debug)]
#[command(name = "pastiche")]
#[command(version, about, long_about = None)]
struct Args {
    /// Content image paths.
    #[arg(value_name = "CONTENT", required = true)]
    content: Vec<PathBuf>,

    /// Style image path.
    #[arg(short, long, value_name = "PATH", required_unless_present = "artwork")]
    style: Option<PathBuf>,

    /// Built-in artwork to use as style (e.g. starry_night).
    #[arg(short, long, value_name = "NAME", conflicts_with = "style")]
    artwork: Option<Artwork>,

    /// Directory holding the style-prediction and style-transfer models.
    #[arg(long, value_name = "DIR")]
    models_dir: Option<PathBuf>,

    /// Directory holding the built-in artwork images.
    #[arg(long, value_name = "DIR")]
    artwork_dir: Option<PathBuf>,

    /// Directory to write stylized images to.
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    output_dir: PathBuf,

    /// Write JPEG instead of PNG.
    #[arg(long)]
    jpeg: bool,

    /// Output JPEG quality (1-100).
    #[arg(short, long, default_value = "95", value_name = "INT")]
    quality: u8,

    /// Stretch non-square content instead of center-cropping it.
    #[arg(long)]
    no_crop: bool,

    /// Intra-op threads per model (0 = runtime default).
    #[arg(long, default_value = "0", value_name = "INT")]
    threads: usize,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("pastiche={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(&args) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(args: &Args) -> Result<()> {
    for path in &args.content {
        if !path.exists() {
            anyhow::bail!("Content file does not exist: {}", path.display());
        }
    }

    let config = Config {
        crop_content: !args.no_crop,
        output_quality: args.quality,
        ..Config::default()
    };

    let models_dir = args
        .models_dir
        .clone()
        .unwrap_or_else(DirectoryAssets::default_location);
    tracing::info!("Using models from {}", models_dir.display());

    let models = Arc::new(ModelRepository::new(DirectoryAssets::new(models_dir)));
    let engine = Arc::new(OnnxEngine::new().with_intra_threads(args.threads));
    let pipeline =
        StylizationPipeline::new(config, models, engine).context("Failed to initialize pipeline")?;

    let style = load_style(args)?;
    let embedding = pipeline
        .predict_style(&style)
        .context("Failed to predict style")?;

    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("Failed to create output directory {}", args.output_dir.display())
    })?;

    let pb = ProgressBar::new(args.content.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Stylizing [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Invalid progress template")?
            .progress_chars("#>-"),
    );

    let failed = stylize_batch(&args.content, &pb, |path| {
        let content = pastiche::image::load_image(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;

        let stylized = pipeline
            .stylize_with_embedding(&content, &embedding)
            .with_context(|| format!("Failed to stylize {}", path.display()))?;

        let output = output_path(&args.output_dir, path, args.jpeg);
        pastiche::image::save_image(&stylized, &output, pipeline.config().output_quality)
            .with_context(|| format!("Failed to save {}", output.display()))?;
        Ok(output)
    });

    pb.finish_with_message("done");

    if !failed.is_empty() {
        anyhow::bail!("Failed to stylize: {}", failed.join(", "));
    }

    Ok(())
}

/// Run `stylize_one` over every path, reporting failures without stopping the
/// batch. Returns the paths that failed.
fn stylize_batch(
    paths: &[PathBuf],
    pb: &ProgressBar,
    mut stylize_one: impl FnMut(&Path) -> Result<PathBuf>,
) -> Vec<String> {
    let mut failed = Vec::new();

    for path in paths {
        pb.set_message(path.display().to_string());

        match stylize_one(path) {
            Ok(output) => pb.println(format!("{} -> {}", path.display(), output.display())),
            Err(err) => {
                tracing::error!("{err:#}");
                failed.push(path.display().to_string());
            }
        }

        pb.inc(1);
    }

    failed
}

fn load_style(args: &Args) -> Result<pastiche::PixelBuffer> {
    if let Some(artwork) = args.artwork {
        let catalog = ArtworkCatalog::new(
            args.artwork_dir
                .clone()
                .unwrap_or_else(ArtworkCatalog::default_location),
        );
        return catalog
            .load(artwork)
            .with_context(|| format!("Failed to load artwork {artwork}"));
    }

    let path = args
        .style
        .as_deref()
        .context("Either --style or --artwork is required")?;
    pastiche::image::load_image(path).with_context(|| format!("Failed to load {}", path.display()))
}

/// `<output_dir>/<stem>_stylized.<png|jpg>`
fn output_path(output_dir: &Path, content: &Path, jpeg: bool) -> PathBuf {
    let stem = content
        .file_stem()
        .map_or_else(|| "output".into(), |s| s.to_string_lossy());
    let extension = if jpeg { "jpg" } else { "png" };
    output_dir.join(format!("{stem}_stylized.{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("out"), Path::new("photos/cat.jpeg"), false),
            PathBuf::from("out/cat_stylized.png")
        );
        assert_eq!(
            output_path(Path::new("out"), Path::new("dog.png"), true),
            PathBuf::from("out/dog_stylized.jpg")
        );
    }

    #[test]
    fn test_stylize_batch_continues_after_failure() {
        let paths = [
            PathBuf::from("a.jpg"),
            PathBuf::from("missing.jpg"),
            PathBuf::from("c.jpg"),
        ];
        let mut visited = Vec::new();

        let failed = stylize_batch(&paths, &ProgressBar::hidden(), |path| {
            visited.push(path.to_path_buf());
            if path == Path::new("missing.jpg") {
                anyhow::bail!("Failed to load {}", path.display());
            }
            Ok(output_path(Path::new("out"), path, false))
        });

        assert_eq!(visited, paths);
        assert_eq!(failed, vec!["missing.jpg".to_string()]);
    }

    #[test]
    fn test_args_require_style_source() {
        assert!(Args::try_parse_from(["pastiche", "photo.jpg"]).is_err());
        assert!(Args::try_parse_from(["pastiche", "photo.jpg", "--artwork", "scream"]).is_ok());
        assert!(Args::try_parse_from([
            "pastiche",
            "photo.jpg",
            "--artwork",
            "scream",
            "--style",
            "s.png"
        ])
        .is_err());
    }
}
