//! Secondary downloads made for each product
//!
//! Two independent, best-effort steps run after a detail page has been
//! extracted:
//! - the structure diagram is downloaded and normalized
//! - the safety data sheet is downloaded and scanned for a UN number
//!
//! Neither step raises. Each reports a `Result` that the coordinator logs
//! before falling back to an empty value.

mod diagram;
mod safety_sheet;

pub use diagram::{file_stem, save_image, shrink_to_fit, ImageKind, MAX_DIMENSION};
pub use safety_sheet::{extract_un_number, find_un_number, TRANSPORT_SECTION_MARKER};

use crate::config::OutputConfig;
use crate::crawler::Fetcher;
use crate::model::ProductAttributes;
use crate::ScraperError;
use std::path::PathBuf;
use std::sync::Arc;

/// Outcome of both asset steps for one product
///
/// `Ok(None)` means the page did not link the asset at all.
#[derive(Debug)]
pub struct ResolvedAssets {
    pub image: Result<Option<PathBuf>, ScraperError>,
    pub un_number: Result<Option<String>, ScraperError>,
}

/// Fetches and post-processes the assets linked from a product page
pub struct AssetResolver {
    fetcher: Arc<dyn Fetcher>,
    images_dir: PathBuf,
    scratch_dir: PathBuf,
}

impl AssetResolver {
    pub fn new(fetcher: Arc<dyn Fetcher>, images_dir: PathBuf, scratch_dir: PathBuf) -> Self {
        Self {
            fetcher,
            images_dir,
            scratch_dir,
        }
    }

    pub fn from_config(fetcher: Arc<dyn Fetcher>, output: &OutputConfig) -> Self {
        Self::new(
            fetcher,
            PathBuf::from(&output.images_dir),
            PathBuf::from(&output.scratch_dir),
        )
    }

    /// Runs the image step, then the safety sheet step
    pub async fn resolve(&self, attributes: &ProductAttributes) -> ResolvedAssets {
        let image = match &attributes.image_url {
            Some(url) => save_image(
                self.fetcher.as_ref(),
                url,
                attributes.id_or_empty(),
                &self.images_dir,
            )
            .await
            .map(Some),
            None => Ok(None),
        };

        let un_number = match &attributes.safety_sheet_url {
            Some(url) => extract_un_number(self.fetcher.as_ref(), url, &self.scratch_dir)
                .await
                .map(Some),
            None => Ok(None),
        };

        ResolvedAssets { image, un_number }
    }
}
