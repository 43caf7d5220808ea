//! Structure diagram download and normalization

use crate::crawler::Fetcher;
use crate::ScraperError;
use image::{DynamicImage, ImageError, ImageFormat};
use std::path::{Path, PathBuf};

/// Neither side of a stored raster diagram exceeds this many pixels
pub const MAX_DIMENSION: u32 = 200;

/// Kind of file a diagram is stored as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// Vector diagram, stored byte for byte
    Svg,
    /// Any raster format, re-encoded as PNG
    Png,
}

impl ImageKind {
    /// Picks the storage kind from a response `Content-Type`
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.to_ascii_lowercase().contains("image/svg+xml") {
            ImageKind::Svg
        } else {
            ImageKind::Png
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Svg => "svg",
            ImageKind::Png => "png",
        }
    }
}

/// Turns a product identifier into a safe file stem
///
/// Characters outside `[A-Za-z0-9._-]` become `_`. Returns None for a blank
/// identifier.
pub fn file_stem(product_id: &str) -> Option<String> {
    let id = product_id.trim();
    if id.is_empty() {
        return None;
    }
    Some(
        id.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect(),
    )
}

/// Downloads a structure diagram and stores it under `images_dir`
///
/// SVG responses are written as-is to `{id}.svg`. Anything else is decoded,
/// shrunk to fit within [`MAX_DIMENSION`] on both sides and written to
/// `{id}.png`. Returns the path of the stored file.
pub async fn save_image(
    fetcher: &dyn Fetcher,
    url: &str,
    product_id: &str,
    images_dir: &Path,
) -> Result<PathBuf, ScraperError> {
    let stem = file_stem(product_id)
        .ok_or_else(|| ScraperError::asset(url, "product has no identifier to name the image after"))?;

    let resource = fetcher.fetch(url).await.into_result(url)?;
    let kind = ImageKind::from_content_type(&resource.content_type);
    let path = images_dir.join(format!("{}.{}", stem, kind.extension()));

    match kind {
        ImageKind::Svg => {
            tokio::fs::write(&path, &resource.body)
                .await
                .map_err(|e| ScraperError::persistence(&path, e))?;
        }
        ImageKind::Png => {
            let target = path.clone();
            tokio::task::spawn_blocking(move || normalize_raster(&resource.body, &target))
                .await
                .map_err(|e| ScraperError::asset(url, format!("image task failed: {}", e)))?
                .map_err(|e| match e {
                    ImageError::IoError(io) => ScraperError::persistence(&path, io),
                    other => ScraperError::asset(url, other.to_string()),
                })?;
        }
    }

    tracing::debug!("Saved image {} -> {}", url, path.display());
    Ok(path)
}

/// Decodes a raster image, shrinks it and writes it as PNG
fn normalize_raster(bytes: &[u8], path: &Path) -> Result<(), ImageError> {
    let image = image::load_from_memory(bytes)?;
    shrink_to_fit(image, MAX_DIMENSION).save_with_format(path, ImageFormat::Png)
}

/// Scales an image down so both sides fit within `max`, keeping its aspect ratio
///
/// Images that already fit are returned untouched; nothing is ever enlarged.
pub fn shrink_to_fit(image: DynamicImage, max: u32) -> DynamicImage {
    if image.width() <= max && image.height() <= max {
        return image;
    }
    image.thumbnail(max, max)
}
