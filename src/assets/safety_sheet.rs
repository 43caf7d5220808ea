//! UN number extraction from safety data sheets
//!
//! Section 14.1 of a safety data sheet carries the UN number used for
//! transport classification, e.g. `14.1 UN number: UN 1993`.

use crate::crawler::Fetcher;
use crate::ScraperError;
use lopdf::Document;
use regex::Regex;
use std::io::Write;
use std::path::Path;
use std::sync::LazyLock;

/// Text that marks the transport information section
pub const TRANSPORT_SECTION_MARKER: &str = "14.1";

static UN_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"UN\s*(\d+)").expect("UN number pattern is valid"));

/// Finds the UN number in the pages of a safety data sheet
///
/// Pages are scanned in order. Only pages mentioning the transport section
/// marker are searched, and the first `UN <digits>` on such a page wins;
/// later pages are not read. A number on a page without the marker is
/// ignored.
pub fn find_un_number<I, S>(pages: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    pages.into_iter().find_map(|page| {
        let text = page.as_ref();
        if !text.contains(TRANSPORT_SECTION_MARKER) {
            return None;
        }
        UN_NUMBER
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// Downloads a safety data sheet and extracts its UN number
///
/// The PDF is written to a uniquely named file in `scratch_dir` for parsing.
/// That file is removed when this call returns, whatever the outcome.
pub async fn extract_un_number(
    fetcher: &dyn Fetcher,
    url: &str,
    scratch_dir: &Path,
) -> Result<String, ScraperError> {
    let resource = fetcher.fetch(url).await.into_result(url)?;

    let scratch_dir = scratch_dir.to_path_buf();
    let source = url.to_string();
    tokio::task::spawn_blocking(move || scan_safety_sheet(&resource.body, &scratch_dir, &source))
        .await
        .map_err(|e| ScraperError::asset(url, format!("safety sheet task failed: {}", e)))?
}

/// Stores the PDF in a scratch file, parses it and scans its pages
fn scan_safety_sheet(body: &[u8], scratch_dir: &Path, url: &str) -> Result<String, ScraperError> {
    // Deleted when dropped, on every return path below
    let mut scratch = tempfile::Builder::new()
        .prefix("sds-")
        .suffix(".pdf")
        .tempfile_in(scratch_dir)
        .map_err(|e| ScraperError::persistence(scratch_dir, e))?;

    let scratch_path = scratch.path().to_path_buf();
    scratch
        .write_all(body)
        .map_err(|e| ScraperError::persistence(&scratch_path, e))?;

    let document = Document::load(&scratch_path)
        .map_err(|e| ScraperError::asset(url, format!("unreadable PDF: {}", e)))?;

    let pages = document.get_pages().into_keys().filter_map(|number| {
        match document.extract_text(&[number]) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::debug!("No text on page {} of {}: {}", number, url, e);
                None
            }
        }
    });

    find_un_number(pages)
        .ok_or_else(|| ScraperError::asset(url, "no UN number in the transport section"))
}
