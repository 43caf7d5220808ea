//! Package size and price extraction

use super::{full_text, select_all, select_first};
use crate::model::Packaging;
use scraper::ElementRef;

/// Cells in a well-formed variation row: image, package, stock, price, cart
const VARIATION_ROW_CELLS: usize = 5;
const PACKAGE_CELL: usize = 1;
const PRICE_CELL: usize = 3;

/// Reads the package variations table into a size -> price mapping
///
/// Only rows with exactly five cells are considered; header rows and layout
/// variants are skipped. A size listed twice keeps the last price.
pub fn extract_packaging(root: ElementRef<'_>) -> Packaging {
    let mut packaging = Packaging::new();

    let Some(table) = select_first(root, "table.product-variations-table") else {
        return packaging;
    };

    for row in select_all(table, "tr") {
        let cells = select_all(row, "td");
        if cells.len() != VARIATION_ROW_CELLS {
            continue;
        }

        let size = parse_size_label(&full_text(cells[PACKAGE_CELL]));
        let price = parse_price(&full_text(cells[PRICE_CELL]));
        packaging.insert(size, price);
    }

    packaging
}

/// Extracts the size from a package descriptor
///
/// `"Oleic acid - 100 mg"` becomes `"100 mg"`; descriptors without a `" - "`
/// separator are used whole.
pub fn parse_size_label(descriptor: &str) -> String {
    let descriptor = descriptor.trim();
    match descriptor.rfind(" - ") {
        Some(index) => descriptor[index + 3..].to_string(),
        None => descriptor.to_string(),
    }
}

/// Parses a displayed price, ignoring currency symbols and separators
///
/// Every character other than an ASCII digit or `.` is dropped before
/// parsing, so `"€ 1,234.50"` is 1234.50. Nothing left, or nothing
/// parseable, means the price is unknown.
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    match cleaned.parse::<f64>() {
        Ok(price) => Some(price),
        Err(e) => {
            tracing::debug!("Unparseable price {:?}: {}", text, e);
            None
        }
    }
}
