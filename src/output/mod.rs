//! Output module for persisting harvest results
//!
//! This module handles:
//! - Creating the directories a run writes into
//! - Writing the products JSON document
//! - Recording and printing run statistics

mod json;
pub mod stats;

pub use json::write_products;
pub use stats::{print_statistics, CrawlStatistics};

use crate::config::OutputConfig;
use crate::ScraperError;
use std::path::Path;

/// Creates the image, scratch and products directories
///
/// Runs before any request is made, so a read-only destination fails the
/// run immediately instead of after the crawl.
pub fn prepare_directories(output: &OutputConfig) -> Result<(), ScraperError> {
    let products_dir = Path::new(&output.products_file)
        .parent()
        .filter(|p| !p.as_os_str().is_empty());

    let dirs = [
        Some(Path::new(&output.images_dir)),
        Some(Path::new(&output.scratch_dir)),
        products_dir,
    ];

    for dir in dirs.into_iter().flatten() {
        std::fs::create_dir_all(dir).map_err(|e| ScraperError::persistence(dir, e))?;
    }

    Ok(())
}
