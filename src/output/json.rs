//! Products document writer

use crate::model::ProductRecord;
use crate::ScraperError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes all records to `output_path` as a pretty-printed JSON array
///
/// Any previous content is replaced. The parent directory is created when
/// missing. Failing to write is fatal for the run.
///
/// # Arguments
///
/// * `records` - The collected products
/// * `output_path` - Path of the JSON document
pub fn write_products(records: &[ProductRecord], output_path: &Path) -> Result<(), ScraperError> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ScraperError::persistence(parent, e))?;
    }

    let file = File::create(output_path).map_err(|e| ScraperError::persistence(output_path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer
        .flush()
        .map_err(|e| ScraperError::persistence(output_path, e))?;

    Ok(())
}
