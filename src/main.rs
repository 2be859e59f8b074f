use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use icoforge::config::AppConfig;
use icoforge::export::{self, ExportReport};
use icoforge::ico::IcoContainer;
use icoforge::raster::{self, ResizeFilter, SourceImage};

#[derive(Parser)]
#[command(name = "icoforge", about = "Convert PNG/JPEG/WebP images into Windows ICO files")]
struct Cli {
    /// Source image (png, jpg, jpeg or webp)
    input: PathBuf,

    /// Directory to write the .ico into
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output file name; defaults to icon_<timestamp>.ico
    #[arg(short, long)]
    name: Option<String>,

    /// Comma-separated icon sizes, e.g. 16,32,48,256
    #[arg(short, long, value_delimiter = ',')]
    sizes: Option<Vec<u32>>,

    /// Resampling filter
    #[arg(long, value_enum)]
    filter: Option<ResizeFilter>,

    /// Print the export report as JSON
    #[arg(long)]
    json: bool,

    /// Remember sizes, filter and output directory as defaults
    #[arg(long)]
    save_defaults: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("icoforge={}", level).parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = AppConfig::load();
    if let Some(sizes) = cli.sizes.clone() {
        config.sizes = sizes;
    }
    if let Some(filter) = cli.filter {
        config.filter = filter;
    }
    if let Some(dir) = cli.output_dir.clone() {
        config.output_dir = Some(dir);
    }
    if cli.save_defaults {
        config.save()?;
    }

    let rt = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
    let report = rt.block_on(convert(&cli, &config))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }
    Ok(())
}

async fn convert(cli: &Cli, config: &AppConfig) -> Result<ExportReport> {
    let source = SourceImage::open(&cli.input, config.max_input_bytes)?;

    info!(
        "Converting {} to sizes {:?} ({:?})",
        source.name, config.sizes, config.filter
    );
    let images = raster::render_all(source.image.clone(), &config.sizes, config.filter).await?;

    let container = IcoContainer::new(images)?;
    let bytes = container.to_bytes();

    let filename = export::output_filename(cli.name.as_deref(), chrono::Local::now().naive_local());
    let dir = config
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let path = export::write_ico(&dir, &filename, &bytes)?;

    Ok(ExportReport::from_entries(&source.name, path, &container))
}
