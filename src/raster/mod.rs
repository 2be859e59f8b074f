pub mod validate;

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ico::header::MAX_DIMENSION;
use crate::ico::IconImage;
pub use validate::{validate_file, RasterError, DEFAULT_MAX_INPUT_BYTES};

/// Resampling filter used when scaling the source to each icon size.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(f: ResizeFilter) -> Self {
        match f {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// A decoded source image and where it came from.
pub struct SourceImage {
    pub name: String,
    pub byte_len: u64,
    pub image: Arc<DynamicImage>,
}

impl SourceImage {
    /// Validate, read and decode the file at `path`.
    pub fn open(path: &Path, max_bytes: u64) -> Result<Self> {
        let byte_len = validate_file(path, max_bytes)?;
        let data =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let image = image::load_from_memory(&data)
            .with_context(|| format!("Failed to decode {}", path.display()))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (w, h) = image.dimensions();
        info!("Loaded {} ({}x{}, {} bytes)", name, w, h, byte_len);

        Ok(Self {
            name,
            byte_len,
            image: Arc::new(image),
        })
    }
}

fn check_size(size: u32) -> Result<(), RasterError> {
    if size == 0 || size > MAX_DIMENSION {
        return Err(RasterError::InvalidSize(size));
    }
    Ok(())
}

/// Render `source` into a transparent `size`×`size` PNG.
///
/// The longer axis is cropped to a centered square first, then the square is
/// scaled to `size`. Nothing larger than the source or the canvas is allocated.
pub fn render(source: &DynamicImage, size: u32, filter: ResizeFilter) -> Result<IconImage> {
    check_size(size)?;

    let (w, h) = source.dimensions();
    let side = w.min(h);
    ensure!(side > 0, "source image is empty ({}x{})", w, h);
    let filled = source
        .crop_imm((w - side) / 2, (h - side) / 2, side, side)
        .resize_exact(size, size, filter.into());
    let canvas = DynamicImage::ImageRgba8(filled.to_rgba8());

    let mut png = Vec::new();
    canvas
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .with_context(|| format!("Failed to encode {}x{} PNG", size, size))?;
    debug!("Encoded {}x{} as {} PNG bytes", size, size, png.len());

    Ok(IconImage::new(size, png))
}

/// Render every requested size, preserving request order.
///
/// Sizes are rendered in parallel on tokio's blocking pool.
pub async fn render_all(
    source: Arc<DynamicImage>,
    sizes: &[u32],
    filter: ResizeFilter,
) -> Result<Vec<IconImage>> {
    for &size in sizes {
        check_size(size)?;
    }

    let handles: Vec<_> = sizes
        .iter()
        .map(|&size| {
            let source = Arc::clone(&source);
            tokio::task::spawn_blocking(move || render(&source, size, filter))
        })
        .collect();

    let total = sizes.len();
    let mut images = Vec::with_capacity(total);
    for (i, (handle, &size)) in handles.into_iter().zip(sizes).enumerate() {
        let image = handle
            .await
            .with_context(|| format!("Render task for {}x{} failed", size, size))??;
        info!("Rendered {}x{} ({}/{})", size, size, i + 1, total);
        images.push(image);
    }
    Ok(images)
}
